#![forbid(unsafe_code)]

pub mod model;
pub mod session;
pub mod time;
pub mod voice;

pub use time::Clock;
