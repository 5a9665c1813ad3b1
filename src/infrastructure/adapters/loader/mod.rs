//! File Loader Adapters
//!
//! 实现 FileLoaderPort trait

mod local_file_loader;
mod remote_file_loader;
mod resolving_file_loader;

pub use local_file_loader::LocalFileLoader;
pub use remote_file_loader::{RemoteFileLoader, RemoteFileLoaderConfig, DEFAULT_REMOTE_BASE_URL};
pub use resolving_file_loader::ResolvingFileLoader;
