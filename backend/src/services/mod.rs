//! Business logic services for the spraying advisory platform

pub mod spraying;
pub mod weather;

pub use spraying::SprayingAdvisorService;
pub use weather::WeatherService;
