pub mod io;
pub mod models;
pub mod parsing;


// Re-export key types for easier usage
pub use io::*;
pub use models::*;
pub use parsing::{
    Block, BlockKind, BlockRange, IncompleteTasks, Outline, ParseOptions, Tasks, parse_outline,
};
