//! Per-field sample collection

use serde_json::Value;
use std::collections::HashMap;

/// Default number of samples kept per field path
pub const DEFAULT_MAX_SAMPLES: usize = 10;

/// Collects up to `max_samples` raw values per logical field path
///
/// Paths are dot-separated for object nesting (`user.address.city`) and
/// `[]`-suffixed for array elements (`tags[]`). Values are kept in
/// observation order; `null` is never stored.
#[derive(Debug, Clone)]
pub struct SampleCollector {
    samples: HashMap<String, Vec<Value>>,
    max_samples: usize,
}

impl Default for SampleCollector {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_SAMPLES)
    }
}

impl SampleCollector {
    /// Create a collector; a cap of `0` falls back to [`DEFAULT_MAX_SAMPLES`]
    pub fn new(max_samples: usize) -> Self {
        Self {
            samples: HashMap::new(),
            max_samples: effective_max_samples(max_samples),
        }
    }

    /// Per-path sample cap
    pub fn max_samples(&self) -> usize {
        self.max_samples
    }

    /// Record a sample for `path`
    ///
    /// Returns whether the value was stored: nulls and samples beyond the
    /// cap are dropped.
    pub fn add_sample(&mut self, path: &str, value: Value) -> bool {
        if value.is_null() {
            return false;
        }

        let entry = self.samples.entry(path.to_string()).or_default();
        if entry.len() >= self.max_samples {
            return false;
        }
        entry.push(value);
        true
    }

    /// Samples recorded for `path`, in observation order
    pub fn samples(&self, path: &str) -> &[Value] {
        self.samples.get(path).map_or(&[], Vec::as_slice)
    }

    /// Whether `path` has any samples
    pub fn has_samples(&self, path: &str) -> bool {
        !self.samples(path).is_empty()
    }

    /// Number of paths with at least one sample
    pub fn path_count(&self) -> usize {
        self.samples.values().filter(|s| !s.is_empty()).count()
    }

    /// Clear all paths
    pub fn reset(&mut self) {
        self.samples.clear();
    }
}

/// Coerce a configured sample cap: `0` means "use the default"
pub fn effective_max_samples(configured: usize) -> usize {
    if configured == 0 {
        DEFAULT_MAX_SAMPLES
    } else {
        configured
    }
}

/// Sample path of a property nested under `path`
pub fn property_path(path: &str, property: &str) -> String {
    format!("{path}.{property}")
}

/// Sample path of the elements of the array at `path`
pub fn items_path(path: &str) -> String {
    format!("{path}[]")
}
