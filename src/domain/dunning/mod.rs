//! Dunning 对数似然引擎
//!
//! 比较两个词频分布，找出各自显著偏多的词

mod chi_square;
mod display;
mod engine;

pub use chi_square::{chi_square_sf_1dof, erfc};
pub use display::format_dunning_table;
pub use engine::{
    dunn_individual_word, dunning_total, DunningError, DunningParams, DunningResult, WordScore,
    DEFAULT_MIN_COMBINED_COUNT,
};
