//! Helpers - Generic Support Types

pub mod bounded;

pub use bounded::BoundedQueue;
