//! Process-wide measure registry
//!
//! The registry assigns stable, compact ids to named measurement streams and
//! guarantees uniqueness and typed lookup for the lifetime of the process.
//! Registration takes the writer lock; all lookups take the reader lock.
//! Returned handles are plain 64-bit values shareable across threads without
//! synchronization.
//!
//! # Example
//!
//! ```rust
//! use kuba_stats::measure::{MeasureHandle, MeasureRegistry};
//!
//! let registry = MeasureRegistry::new();
//! let latency = registry.register_double("rpc/latency", "ms", "RPC latency");
//! assert!(latency.is_valid());
//!
//! // Registration is idempotent by name.
//! assert_eq!(latency, registry.register_double("rpc/latency", "ms", "RPC latency"));
//!
//! // Unknown names resolve to the invalid sentinel.
//! assert!(!registry.double_by_name("rpc/unknown").is_valid());
//! ```

use std::collections::HashMap;

use lazy_static::lazy_static;
use parking_lot::RwLock;
use tracing::{debug, warn};

use crate::error::{Error, Result};

use super::descriptor::{MeasureDescriptor, MeasureType};
use super::handle::{
    create_id, id_is_valid, id_to_index, id_to_type, MeasureDouble, MeasureHandle, MeasureInt,
};

lazy_static! {
    static ref GLOBAL_REGISTRY: MeasureRegistry = MeasureRegistry::new();
}

/// Registry of measure descriptors, keyed by name and by packed id
///
/// A single reader/writer lock protects both the descriptor list and the
/// name map. Descriptors are append-only: ids index into the list, are
/// assigned monotonically, and are never reused.
#[derive(Debug, Default)]
pub struct MeasureRegistry {
    inner: RwLock<RegistryInner>,
}

#[derive(Debug, Default)]
struct RegistryInner {
    /// Registered descriptors; measure ids are indexes into this vector plus
    /// flag bits.
    descriptors: Vec<MeasureDescriptor>,

    /// Map from measure names to packed ids.
    ids_by_name: HashMap<String, u64>,
}

impl MeasureRegistry {
    /// Create an empty registry
    ///
    /// The recorder layer normally owns one registry value; [`global()`]
    /// provides a process-wide default for callers that do not.
    ///
    /// [`global()`]: MeasureRegistry::global
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide default registry, lazily initialized, never torn down
    pub fn global() -> &'static MeasureRegistry {
        &GLOBAL_REGISTRY
    }

    /// Register a measure recording `f64` observations
    ///
    /// Idempotent by name: re-registering returns the original handle. If the
    /// name is already registered with the integer type, returns the invalid
    /// sentinel handle (first registration wins).
    pub fn register_double(
        &self,
        name: impl Into<String>,
        units: impl Into<String>,
        description: impl Into<String>,
    ) -> MeasureDouble {
        self.try_register_double(name, units, description)
            .unwrap_or_else(|_| MeasureDouble::invalid())
    }

    /// Register a measure recording `i64` observations
    ///
    /// Same semantics as [`register_double`](MeasureRegistry::register_double)
    /// with the types swapped.
    pub fn register_int(
        &self,
        name: impl Into<String>,
        units: impl Into<String>,
        description: impl Into<String>,
    ) -> MeasureInt {
        self.try_register_int(name, units, description)
            .unwrap_or_else(|_| MeasureInt::invalid())
    }

    /// Register a double measure, surfacing a type conflict as an error
    pub fn try_register_double(
        &self,
        name: impl Into<String>,
        units: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<MeasureDouble> {
        let descriptor =
            MeasureDescriptor::new(name, units, description, MeasureType::Double);
        self.register(descriptor).map(MeasureDouble::from_raw)
    }

    /// Register an int measure, surfacing a type conflict as an error
    pub fn try_register_int(
        &self,
        name: impl Into<String>,
        units: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<MeasureInt> {
        let descriptor = MeasureDescriptor::new(name, units, description, MeasureType::Int64);
        self.register(descriptor).map(MeasureInt::from_raw)
    }

    fn register(&self, descriptor: MeasureDescriptor) -> Result<u64> {
        // Fast path: check if already registered (read lock only)
        {
            let inner = self.inner.read();
            if let Some(&id) = inner.ids_by_name.get(descriptor.name()) {
                return Self::existing_id(id, &descriptor);
            }
        }

        // Slow path: need to insert (write lock)
        let mut inner = self.inner.write();

        // Double-check after acquiring write lock (another thread might have
        // registered)
        if let Some(&id) = inner.ids_by_name.get(descriptor.name()) {
            return Self::existing_id(id, &descriptor);
        }

        let index = inner.descriptors.len();
        let id = create_id(index, true, descriptor.measure_type());
        debug!(name = descriptor.name(), index, "registered measure");
        inner
            .ids_by_name
            .insert(descriptor.name().to_string(), id);
        inner.descriptors.push(descriptor);
        Ok(id)
    }

    /// Resolve a repeat registration against the id already stored for the
    /// name: same type returns the original id, a conflicting type is an
    /// error.
    fn existing_id(id: u64, descriptor: &MeasureDescriptor) -> Result<u64> {
        let registered = id_to_type(id);
        if registered != descriptor.measure_type() {
            warn!(
                name = descriptor.name(),
                ?registered,
                requested = ?descriptor.measure_type(),
                "measure already registered with a different type"
            );
            return Err(Error::TypeMismatch {
                name: descriptor.name().to_string(),
                registered,
                requested: descriptor.measure_type(),
            });
        }
        Ok(id)
    }

    /// Look up a descriptor by measure name
    ///
    /// Returns [`Error::NotFound`] if the name was never registered.
    pub fn descriptor_by_name(&self, name: &str) -> Result<MeasureDescriptor> {
        let inner = self.inner.read();
        let id = inner
            .ids_by_name
            .get(name)
            .ok_or_else(|| Error::NotFound(name.to_string()))?;
        Ok(inner.descriptors[id_to_index(*id)].clone())
    }

    /// Look up a double-typed handle by name
    ///
    /// Returns the invalid sentinel when the name is unknown or registered
    /// with the integer type; callers test validity explicitly.
    pub fn double_by_name(&self, name: &str) -> MeasureDouble {
        MeasureDouble::from_raw(self.typed_id_by_name(name, MeasureType::Double))
    }

    /// Look up an int-typed handle by name
    ///
    /// Returns the invalid sentinel when the name is unknown or registered
    /// with the double type; callers test validity explicitly.
    pub fn int_by_name(&self, name: &str) -> MeasureInt {
        MeasureInt::from_raw(self.typed_id_by_name(name, MeasureType::Int64))
    }

    /// Raw packed id for a name, 0 when absent
    pub fn id_by_name(&self, name: &str) -> u64 {
        self.inner
            .read()
            .ids_by_name
            .get(name)
            .copied()
            .unwrap_or(0)
    }

    fn typed_id_by_name(&self, name: &str, measure_type: MeasureType) -> u64 {
        let id = self.id_by_name(name);
        if id_is_valid(id) && id_to_type(id) == measure_type {
            id
        } else {
            0
        }
    }

    /// Descriptor for a handle
    ///
    /// An invalid handle yields the shared empty default descriptor; this
    /// never fails.
    pub fn descriptor<H: MeasureHandle>(&self, handle: H) -> MeasureDescriptor {
        if !handle.is_valid() {
            return MeasureDescriptor::empty();
        }
        self.inner.read().descriptors[handle.index()].clone()
    }

    /// Number of registered measures
    pub fn len(&self) -> usize {
        self.inner.read().descriptors.len()
    }

    /// Whether no measures have been registered yet
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
