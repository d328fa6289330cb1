//! Data model
//!
//! Types, prototypes and vector instances. Nothing in this module dispatches;
//! it only describes values. Dispatch lives with the [`Registry`].
//!
//! [`Registry`]: crate::registry::Registry
//!
pub mod coercion;

mod attrs;
pub use attrs::*;

mod class;
pub use class::*;

mod data;
pub use data::*;

mod na;
pub use na::*;

mod prototype;
pub use prototype::*;

mod vctr;
pub use vctr::*;
