mod domains;
mod normalizer;
mod scheduler;
mod sink;
mod tables;
mod utils;

pub use domains::*;
pub use normalizer::*;
pub use scheduler::*;
pub use sink::*;
pub use tables::*;
pub use utils::*;
