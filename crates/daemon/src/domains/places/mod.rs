mod resolve_place;

pub use resolve_place::*;
