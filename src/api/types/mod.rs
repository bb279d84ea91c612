//! API types

pub mod error;

pub use error::{ApiError, ProblemDetails, PROBLEM_JSON};
