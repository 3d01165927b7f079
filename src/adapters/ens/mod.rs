//! ENS name-resolution adapter.

pub mod resolver;

pub use resolver::EnsResolver;
