mod places;
mod weather;

pub use places::*;
pub use weather::*;
