use std::collections::HashMap;

use zbus::zvariant::{OwnedValue, Value};

/// Untyped property payload as delivered by the bus.
///
/// The D-Bus layer converts every variant into one of these before the
/// watcher sees it, so field decoders match on a closed set of shapes.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    /// `b`
    Bool(bool),
    /// Signed integers (`n`, `i`, `x`)
    Int(i64),
    /// Unsigned integers (`y`, `q`, `u`, `t`)
    UInt(u64),
    /// `d`
    Float(f64),
    /// Strings, object paths and signatures
    Str(String),
    /// Arrays of strings (`as`, `ao`)
    StrList(Vec<String>),
    /// String-keyed dictionaries (`a{sv}`)
    Map(HashMap<String, PropertyValue>),
    /// Any shape the watcher has no use for
    Other,
}

impl From<&Value<'_>> for PropertyValue {
    fn from(value: &Value<'_>) -> Self {
        match value {
            Value::Bool(b) => Self::Bool(*b),
            Value::U8(n) => Self::UInt(u64::from(*n)),
            Value::U16(n) => Self::UInt(u64::from(*n)),
            Value::U32(n) => Self::UInt(u64::from(*n)),
            Value::U64(n) => Self::UInt(*n),
            Value::I16(n) => Self::Int(i64::from(*n)),
            Value::I32(n) => Self::Int(i64::from(*n)),
            Value::I64(n) => Self::Int(*n),
            Value::F64(f) => Self::Float(*f),
            Value::Str(s) => Self::Str(s.as_str().to_string()),
            Value::ObjectPath(path) => Self::Str(path.as_str().to_string()),
            Value::Signature(signature) => Self::Str(signature.to_string()),
            Value::Value(inner) => Self::from(inner.as_ref()),
            Value::Array(array) => {
                let items: Option<Vec<String>> = array
                    .iter()
                    .map(|item| match Self::from(item) {
                        Self::Str(s) => Some(s),
                        _ => None,
                    })
                    .collect();
                items.map_or(Self::Other, Self::StrList)
            }
            Value::Dict(dict) => {
                let mut map = HashMap::new();
                for (key, entry) in dict.iter() {
                    if let Self::Str(key) = Self::from(key) {
                        map.insert(key, Self::from(entry));
                    }
                }
                Self::Map(map)
            }
            _ => Self::Other,
        }
    }
}

impl From<Value<'_>> for PropertyValue {
    fn from(value: Value<'_>) -> Self {
        Self::from(&value)
    }
}

/// Convert a `GetAll` reply or `PropertiesChanged` payload into plain values.
pub fn property_map(entries: HashMap<String, OwnedValue>) -> HashMap<String, PropertyValue> {
    entries
        .iter()
        .map(|(name, value)| (name.clone(), PropertyValue::from(&**value)))
        .collect()
}
