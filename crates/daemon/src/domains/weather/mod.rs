mod fetch_weather;

pub use fetch_weather::*;
