//! Built-in application templates and placeholder substitution.
//!
//! Bundles are compiled into the binary; the registry is a read-only lookup
//! table that keeps registration order.

pub mod registry;
pub mod render;

pub use registry::*;
pub use render::*;
