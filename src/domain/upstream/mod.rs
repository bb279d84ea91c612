//! Upstream geodata services

mod provider;

pub use provider::{ElementsProvider, GeocodeProvider};

#[cfg(test)]
pub use provider::mock::{GeocodeCall, MockElementsProvider, MockGeocodeProvider};
