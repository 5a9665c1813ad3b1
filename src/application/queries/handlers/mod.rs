//! Query Handlers 实现
//!
//! 所有 QueryHandler 的具体实现

mod dunning_handlers;
mod frequency_handlers;

pub use dunning_handlers::*;
pub use frequency_handlers::*;
