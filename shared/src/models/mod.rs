//! Domain models for the spraying advisory platform

mod spraying;
mod weather;

pub use spraying::*;
pub use weather::*;
