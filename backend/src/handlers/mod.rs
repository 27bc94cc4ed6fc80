//! HTTP request handlers

mod health;
mod spraying;
mod weather;

pub use health::*;
pub use spraying::*;
pub use weather::*;
