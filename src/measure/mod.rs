//! Measure Registry
//!
//! This module assigns stable, compact identifiers to named measurement
//! streams and guarantees uniqueness and typed lookup across the process
//! lifetime.
//!
//! # Key Components
//!
//! - **Packed ids**: a measure id packs a sequential index, a validity bit,
//!   and a type bit into a single `u64` (see [`handle`])
//! - **Typed handles**: [`MeasureDouble`] / [`MeasureInt`] are `Copy` values
//!   carrying the packed id; sharing them requires no synchronization
//! - **Registry**: [`MeasureRegistry`] holds the descriptor list and the
//!   name map behind one reader/writer lock
//!
//! # Example
//!
//! ```rust
//! use kuba_stats::measure::{MeasureHandle, MeasureRegistry};
//!
//! let registry = MeasureRegistry::new();
//! let bytes = registry.register_int("http/request_bytes", "By", "request size");
//!
//! assert!(bytes.is_valid());
//! assert_eq!(registry.descriptor(bytes).units(), "By");
//! ```

pub mod descriptor;
pub mod handle;
pub mod registry;

pub use descriptor::{MeasureDescriptor, MeasureType};
pub use handle::{
    create_id, id_is_valid, id_to_index, id_to_type, MeasureDouble, MeasureHandle, MeasureInt,
};
pub use registry::MeasureRegistry;
