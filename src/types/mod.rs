//! Bundled types
//!
//! The primitive types every registry starts with, and a handful of
//! extension types built only through the public registration API.
//!
pub mod cached_sum;
pub mod decimal;
pub mod distance;
pub mod primitive;
pub mod rational;

use crate::registry::Registry;

/// Register every bundled extension type
pub fn register_bundled(registry: &mut Registry) {
    decimal::register(registry);
    rational::register(registry);
    distance::register(registry);
    cached_sum::register(registry);
}
