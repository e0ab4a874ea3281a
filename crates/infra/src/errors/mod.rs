//! Conversion boundary between external library errors and the domain taxonomy.

pub mod conversions;

pub use conversions::InfraError;
