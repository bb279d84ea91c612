//! Infrastructure layer - External service implementations

pub mod cache;
pub mod logging;
pub mod observability;
pub mod services;
pub mod throttle;
pub mod upstream;
