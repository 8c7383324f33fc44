use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::errors::{Result, UndoxError};

type Fields = BTreeMap<String, Map<String, Value>>;

/// Derive the shared-state field name for a command instance
///
/// The kind alone when no suffix (or an empty one) is given, otherwise
/// `"{kind}_{suffix}"`.
pub fn field_name(kind: &str, suffix: Option<&str>) -> String {
    match suffix {
        Some(suffix) if !suffix.is_empty() => format!("{}_{}", kind, suffix),
        _ => kind.to_string(),
    }
}

/// Process-local shared state for one run
///
/// Maps a field name to that field's private sub-mapping. Clones share the
/// same underlying map. Not thread-safe (`Rc<RefCell<..>>`), designed for
/// single-threaded use.
#[derive(Debug, Clone, Default)]
pub struct SharedState {
    fields: Rc<RefCell<Fields>>,
}

impl SharedState {
    /// Create a new empty SharedState
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new field and return a handle to its empty sub-mapping
    ///
    /// # Errors
    ///
    /// Returns `DuplicateField` if the field is already registered.
    pub fn register(&self, field: impl Into<String>) -> Result<StateHandle> {
        let field = field.into();
        {
            let mut fields = self.fields.borrow_mut();
            if fields.contains_key(&field) {
                return Err(UndoxError::DuplicateField { field });
            }
            fields.insert(field.clone(), Map::new());
        }
        tracing::debug!(state_field = %field, "registered shared-state field");
        Ok(StateHandle {
            state: self.clone(),
            field,
        })
    }

    /// Return a handle to an already registered field
    ///
    /// # Errors
    ///
    /// Returns `FieldNotRegistered` if the field does not exist.
    pub fn attach(&self, field: impl Into<String>) -> Result<StateHandle> {
        let field = field.into();
        if !self.contains(&field) {
            return Err(UndoxError::FieldNotRegistered { field });
        }
        Ok(StateHandle {
            state: self.clone(),
            field,
        })
    }

    /// Whether a field is registered
    pub fn contains(&self, field: &str) -> bool {
        self.fields.borrow().contains_key(field)
    }

    /// Registered field names, sorted
    pub fn fields(&self) -> Vec<String> {
        self.fields.borrow().keys().cloned().collect()
    }

    /// The full mapping as a JSON object
    pub fn to_json(&self) -> Value {
        Value::Object(
            self.fields
                .borrow()
                .iter()
                .map(|(field, map)| (field.clone(), Value::Object(map.clone())))
                .collect(),
        )
    }

    fn with_field<R>(
        &self,
        field: &str,
        f: impl FnOnce(&mut Map<String, Value>) -> R,
    ) -> Result<R> {
        let mut fields = self.fields.borrow_mut();
        let map = fields
            .get_mut(field)
            .ok_or_else(|| UndoxError::FieldNotRegistered {
                field: field.to_string(),
            })?;
        Ok(f(map))
    }
}

/// Handle to one field's sub-mapping inside a `SharedState`
#[derive(Debug, Clone)]
pub struct StateHandle {
    state: SharedState,
    field: String,
}

impl StateHandle {
    /// Name of the field this handle addresses
    pub fn field(&self) -> &str {
        &self.field
    }

    /// The store this handle writes into
    pub fn shared_state(&self) -> &SharedState {
        &self.state
    }

    /// Copy of the whole sub-mapping
    pub fn snapshot(&self) -> Map<String, Value> {
        self.state
            .with_field(&self.field, |map| map.clone())
            .unwrap_or_default()
    }

    /// Read a key; `None` if absent
    pub fn get(&self, key: &str) -> Option<Value> {
        self.state
            .with_field(&self.field, |map| map.get(key).cloned())
            .ok()
            .flatten()
    }

    /// Write a key
    ///
    /// # Errors
    ///
    /// Returns `FieldNotRegistered` if the handle's field is gone from the store.
    pub fn set(&self, key: &str, value: Value) -> Result<()> {
        self.state.with_field(&self.field, |map| {
            map.insert(key.to_string(), value);
        })
    }

    /// Existing value for `key`, or insert and return `default`
    ///
    /// # Errors
    ///
    /// Returns `FieldNotRegistered` if the handle's field is gone from the store.
    pub fn get_or_set(&self, key: &str, default: Value) -> Result<Value> {
        self.state.with_field(&self.field, |map| {
            map.entry(key.to_string()).or_insert(default).clone()
        })
    }

    /// Read a key and deserialize it
    ///
    /// # Errors
    ///
    /// Returns `UnexpectedValueType` if the stored value does not fit `T`.
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        self.get(key)
            .map(|value| self.decode(key, value))
            .transpose()
    }

    /// Serialize a value and write it under `key`
    ///
    /// # Errors
    ///
    /// Returns `Serialization` if `value` cannot be represented as JSON.
    pub fn set_as<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        self.set(key, serde_json::to_value(value)?)
    }

    /// Typed `get_or_set`
    ///
    /// # Errors
    ///
    /// Returns `Serialization` if `default` cannot be encoded, or
    /// `UnexpectedValueType` if an existing value does not fit `T`.
    pub fn get_or_set_as<T: Serialize + DeserializeOwned>(
        &self,
        key: &str,
        default: T,
    ) -> Result<T> {
        let value = self.get_or_set(key, serde_json::to_value(&default)?)?;
        self.decode(key, value)
    }

    /// Append to the array stored under `key`, creating it if absent
    ///
    /// # Errors
    ///
    /// Returns `UnexpectedValueType` if `key` holds a non-array value.
    pub fn push(&self, key: &str, value: Value) -> Result<()> {
        let field = self.field.clone();
        self.state.with_field(&self.field, |map| {
            match map
                .entry(key.to_string())
                .or_insert_with(|| Value::Array(Vec::new()))
            {
                Value::Array(items) => {
                    items.push(value);
                    Ok(())
                }
                _ => Err(UndoxError::UnexpectedValueType {
                    field,
                    key: key.to_string(),
                    expected: "an array",
                }),
            }
        })?
    }

    /// Remove and return the last element of the array stored under `key`
    ///
    /// `None` when the key is absent or the array is empty.
    ///
    /// # Errors
    ///
    /// Returns `UnexpectedValueType` if `key` holds a non-array value.
    pub fn pop(&self, key: &str) -> Result<Option<Value>> {
        let field = self.field.clone();
        self.state.with_field(&self.field, |map| match map.get_mut(key) {
            None => Ok(None),
            Some(Value::Array(items)) => Ok(items.pop()),
            Some(_) => Err(UndoxError::UnexpectedValueType {
                field,
                key: key.to_string(),
                expected: "an array",
            }),
        })?
    }

    fn decode<T: DeserializeOwned>(&self, key: &str, value: Value) -> Result<T> {
        serde_json::from_value(value).map_err(|_| UndoxError::UnexpectedValueType {
            field: self.field.clone(),
            key: key.to_string(),
            expected: std::any::type_name::<T>(),
        })
    }
}
