//! Parameter Storage Types
//!
//! Provides the parameter value type and the `ParameterStore` used to
//! configure the control pipeline. Parameters are registered with defaults by
//! each parameter group, optionally overridden, then loaded into typed
//! structs with `from_store`.

use super::error::ParameterError;
use bitflags::bitflags;
use heapless::index_map::FnvIndexMap;
use heapless::{String, Vec};

/// Maximum parameter name length
pub const PARAM_NAME_LEN: usize = 16;

/// Maximum number of parameters
pub const MAX_PARAMS: usize = 64;

/// Maximum string parameter length
pub const MAX_STRING_LEN: usize = 63;

/// Maximum float list length
pub const MAX_LIST_LEN: usize = 16;

bitflags! {
    /// Parameter flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ParamFlags: u8 {
        /// Parameter is read-only after registration
        const READ_ONLY = 0b00000001;
    }
}

/// Parameter value types
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    /// String parameter (max 63 chars)
    String(String<MAX_STRING_LEN>),
    /// Boolean parameter
    Bool(bool),
    /// 32-bit signed integer
    Int(i32),
    /// 32-bit floating point
    Float(f32),
    /// Short list of floats (e.g. lookup tables), empty means unset
    FloatList(Vec<f32, MAX_LIST_LEN>),
}

impl ParamValue {
    /// Build a string value, truncation is an error
    pub fn string(value: &str) -> Result<Self, ParameterError> {
        String::try_from(value)
            .map(ParamValue::String)
            .map_err(|_| ParameterError::InvalidConfig)
    }

    /// Build a list value, overflow is an error
    pub fn list(values: &[f32]) -> Result<Self, ParameterError> {
        Vec::from_slice(values)
            .map(ParamValue::FloatList)
            .map_err(|_| ParameterError::InvalidConfig)
    }

    /// Type discriminant
    pub fn type_id(&self) -> u8 {
        match self {
            ParamValue::String(_) => 0,
            ParamValue::Bool(_) => 1,
            ParamValue::Int(_) => 2,
            ParamValue::Float(_) => 3,
            ParamValue::FloatList(_) => 4,
        }
    }

    /// Whether `other` may replace this value (numbers are interchangeable)
    fn is_compatible(&self, other: &ParamValue) -> bool {
        matches!(
            (self, other),
            (ParamValue::Int(_) | ParamValue::Float(_), ParamValue::Int(_) | ParamValue::Float(_))
        ) || self.type_id() == other.type_id()
    }
}

/// Parameter metadata
#[derive(Debug, Clone)]
pub struct ParamMetadata {
    /// Parameter flags
    pub flags: ParamFlags,
}

type ParamName = String<PARAM_NAME_LEN>;

fn param_name(name: &str) -> Option<ParamName> {
    let mut key = ParamName::new();
    key.push_str(name).ok()?;
    Some(key)
}

/// Parameter store for configuration management
///
/// Stores parameters as key-value pairs with metadata (flags).
pub struct ParameterStore {
    /// Parameter values
    parameters: FnvIndexMap<ParamName, ParamValue, MAX_PARAMS>,
    /// Parameter metadata
    metadata: FnvIndexMap<ParamName, ParamMetadata, MAX_PARAMS>,
    /// Dirty flag (modified since last `clear_dirty`)
    dirty: bool,
}

impl ParameterStore {
    /// Create a new empty parameter store
    pub fn new() -> Self {
        Self {
            parameters: FnvIndexMap::new(),
            metadata: FnvIndexMap::new(),
            dirty: false,
        }
    }

    /// Get parameter value
    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.parameters.get(&param_name(name)?)
    }

    /// Numeric parameter as `f32` (ints are widened)
    pub fn float(&self, name: &str) -> Option<f32> {
        match self.get(name)? {
            ParamValue::Float(v) => Some(*v),
            ParamValue::Int(v) => Some(*v as f32),
            _ => None,
        }
    }

    /// Numeric parameter as `i32` (floats are truncated)
    pub fn int(&self, name: &str) -> Option<i32> {
        match self.get(name)? {
            ParamValue::Int(v) => Some(*v),
            ParamValue::Float(v) => Some(*v as i32),
            _ => None,
        }
    }

    /// Boolean parameter (ints are non-zero tests)
    pub fn flag(&self, name: &str) -> Option<bool> {
        match self.get(name)? {
            ParamValue::Bool(v) => Some(*v),
            ParamValue::Int(v) => Some(*v != 0),
            _ => None,
        }
    }

    pub fn string(&self, name: &str) -> Option<&str> {
        match self.get(name)? {
            ParamValue::String(v) => Some(v.as_str()),
            _ => None,
        }
    }

    pub fn list(&self, name: &str) -> Option<&[f32]> {
        match self.get(name)? {
            ParamValue::FloatList(v) => Some(v.as_slice()),
            _ => None,
        }
    }

    /// Set parameter value
    ///
    /// The parameter must be registered and the new value must have a
    /// compatible type. Marks the store as dirty.
    pub fn set(&mut self, name: &str, value: ParamValue) -> Result<(), ParameterError> {
        let key = param_name(name).ok_or(ParameterError::InvalidConfig)?;

        let Some(current) = self.parameters.get(&key) else {
            return Err(ParameterError::InvalidConfig);
        };
        if !current.is_compatible(&value) {
            return Err(ParameterError::TypeMismatch);
        }

        if let Some(meta) = self.metadata.get(&key) {
            if meta.flags.contains(ParamFlags::READ_ONLY) {
                return Err(ParameterError::ReadOnly);
            }
        }

        self.parameters.insert(key, value).ok();
        self.dirty = true;
        Ok(())
    }

    /// Register a new parameter with default value and flags
    ///
    /// If the parameter already exists, this is a no-op (idempotent).
    pub fn register(
        &mut self,
        name: &str,
        default_value: ParamValue,
        flags: ParamFlags,
    ) -> Result<(), ParameterError> {
        let key = param_name(name).ok_or(ParameterError::InvalidConfig)?;

        if self.parameters.contains_key(&key) {
            return Ok(());
        }

        self.parameters
            .insert(key.clone(), default_value)
            .map_err(|_| ParameterError::StoreFull)?;
        self.metadata
            .insert(key, ParamMetadata { flags })
            .map_err(|_| ParameterError::StoreFull)?;
        self.dirty = true;
        Ok(())
    }

    /// Iterate over all parameter names
    pub fn iter_names(&self) -> impl Iterator<Item = &str> {
        self.parameters.keys().map(|name| name.as_str())
    }

    /// Check if store has unsaved changes
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    /// Get metadata for a parameter by name
    pub fn get_metadata(&self, name: &str) -> Option<&ParamMetadata> {
        self.metadata.get(&param_name(name)?)
    }
}

impl Default for ParameterStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parameter_store_register_and_get() {
        let mut store = ParameterStore::new();
        store
            .register("TEST", ParamValue::Int(42), ParamFlags::empty())
            .unwrap();
        assert_eq!(store.get("TEST"), Some(&ParamValue::Int(42)));
        assert_eq!(store.int("TEST"), Some(42));
        assert_eq!(store.float("TEST"), Some(42.0));
    }

    #[test]
    fn test_parameter_store_set() {
        let mut store = ParameterStore::new();
        store
            .register("TEST", ParamValue::Float(0.5), ParamFlags::empty())
            .unwrap();
        store.clear_dirty();
        store.set("TEST", ParamValue::Float(0.25)).unwrap();
        assert_eq!(store.float("TEST"), Some(0.25));
        assert!(store.is_dirty());
    }

    #[test]
    fn test_parameter_store_set_unknown() {
        let mut store = ParameterStore::new();
        assert_eq!(
            store.set("UNKNOWN", ParamValue::Int(1)),
            Err(ParameterError::InvalidConfig)
        );
    }

    #[test]
    fn test_parameter_store_type_mismatch() {
        let mut store = ParameterStore::new();
        store
            .register("FLAG", ParamValue::Bool(true), ParamFlags::empty())
            .unwrap();
        assert_eq!(
            store.set("FLAG", ParamValue::Float(1.0)),
            Err(ParameterError::TypeMismatch)
        );

        // Int and Float are interchangeable
        store
            .register("NUM", ParamValue::Float(1.0), ParamFlags::empty())
            .unwrap();
        store.set("NUM", ParamValue::Int(3)).unwrap();
        assert_eq!(store.float("NUM"), Some(3.0));
    }

    #[test]
    fn test_parameter_store_register_idempotent() {
        let mut store = ParameterStore::new();
        store
            .register("TEST", ParamValue::Int(42), ParamFlags::empty())
            .unwrap();
        store.set("TEST", ParamValue::Int(100)).unwrap();
        store
            .register("TEST", ParamValue::Int(42), ParamFlags::empty())
            .unwrap();
        assert_eq!(store.get("TEST"), Some(&ParamValue::Int(100)));
    }

    #[test]
    fn test_parameter_name_too_long() {
        let mut store = ParameterStore::new();
        assert_eq!(
            store.register(
                "THIS_NAME_IS_WAY_TOO_LONG",
                ParamValue::Int(1),
                ParamFlags::empty()
            ),
            Err(ParameterError::InvalidConfig)
        );
    }

    #[test]
    fn test_parameter_read_only() {
        let mut store = ParameterStore::new();
        store
            .register("READONLY", ParamValue::Int(42), ParamFlags::READ_ONLY)
            .unwrap();
        assert_eq!(
            store.set("READONLY", ParamValue::Int(100)),
            Err(ParameterError::ReadOnly)
        );
    }

    #[test]
    fn test_string_and_list_values() {
        let mut store = ParameterStore::new();
        store
            .register("MODE", ParamValue::string("local").unwrap(), ParamFlags::empty())
            .unwrap();
        store
            .register("TABLE", ParamValue::list(&[0.0, 0.2]).unwrap(), ParamFlags::empty())
            .unwrap();

        assert_eq!(store.string("MODE"), Some("local"));
        assert_eq!(store.list("TABLE"), Some(&[0.0, 0.2][..]));
        assert_eq!(store.list("MODE"), None);

        store.set("TABLE", ParamValue::list(&[]).unwrap()).unwrap();
        assert_eq!(store.list("TABLE"), Some(&[][..]));
    }

    #[test]
    fn test_list_overflow_rejected() {
        let values = [0.0f32; MAX_LIST_LEN + 1];
        assert_eq!(ParamValue::list(&values), Err(ParameterError::InvalidConfig));
    }

    #[test]
    fn test_iter_names() {
        let mut store = ParameterStore::new();
        store
            .register("A", ParamValue::Int(1), ParamFlags::empty())
            .unwrap();
        store
            .register("B", ParamValue::Int(2), ParamFlags::empty())
            .unwrap();
        assert_eq!(store.iter_names().count(), 2);
        assert_eq!(store.len(), 2);
        assert!(!store.is_empty());
    }
}
