// Live interface handles exported by a hardware component
//
// A handle shares its cell with the owning motor record, so values written on
// either side are visible on the other without re-exporting.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Shared f64 cell
#[derive(Clone, Default)]
pub struct SharedValue(Arc<AtomicU64>);

impl SharedValue {
    pub fn get(&self) -> f64 {
        f64::from_bits(self.0.load(Ordering::Relaxed))
    }

    pub fn set(&self, value: f64) {
        self.0.store(value.to_bits(), Ordering::Relaxed);
    }
}

impl fmt::Debug for SharedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}

/// Read-only endpoint onto a measured value
#[derive(Debug, Clone)]
pub struct StateInterface {
    prefix: String,
    interface: String,
    value: SharedValue,
}

impl StateInterface {
    pub fn new(prefix: &str, interface: &str, value: SharedValue) -> Self {
        Self {
            prefix: prefix.to_string(),
            interface: interface.to_string(),
            value,
        }
    }

    /// "<joint>/<kind>"
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.prefix, self.interface)
    }

    pub fn value(&self) -> f64 {
        self.value.get()
    }
}

/// Writable endpoint onto a commanded value
#[derive(Debug, Clone)]
pub struct CommandInterface {
    prefix: String,
    interface: String,
    value: SharedValue,
}

impl CommandInterface {
    pub fn new(prefix: &str, interface: &str, value: SharedValue) -> Self {
        Self {
            prefix: prefix.to_string(),
            interface: interface.to_string(),
            value,
        }
    }

    pub fn full_name(&self) -> String {
        format!("{}/{}", self.prefix, self.interface)
    }

    pub fn value(&self) -> f64 {
        self.value.get()
    }

    pub fn set_value(&self, value: f64) {
        self.value.set(value);
    }
}
