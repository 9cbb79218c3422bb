//! Format-neutral document tree.
//!
//! TOML, YAML and JSON all decode into [`Value`] and encode back from it, so
//! addressing and merging are written once. Numbers keep the integer/float
//! distinction so a TOML `port = 8080` stays an integer after an edit.

use std::collections::BTreeMap;
use std::fmt;

pub type Mapping = BTreeMap<String, Value>;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Mapping(Mapping),
    Sequence(Vec<Value>),
}

impl Value {
    /// An empty mapping.
    pub fn mapping() -> Value {
        Value::Mapping(Mapping::new())
    }

    /// Human-readable name of the variant, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Mapping(_) => "mapping",
            Value::Sequence(_) => "sequence",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Value::Mapping(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_mapping_mut(&mut self) -> Option<&mut Mapping> {
        match self {
            Value::Mapping(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Value]> {
        match self {
            Value::Sequence(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_sequence_mut(&mut self) -> Option<&mut Vec<Value>> {
        match self {
            Value::Sequence(s) => Some(s),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Sequence(items)
    }
}

impl From<Mapping> for Value {
    fn from(map: Mapping) -> Self {
        Value::Mapping(map)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::String(s) => write!(f, "{s}"),
            Value::Mapping(_) | Value::Sequence(_) => {
                write!(f, "{}", serde_json::Value::from(self))
            }
        }
    }
}

// --- JSON ---

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Integer(i),
                None => n.as_f64().map(Value::Float).unwrap_or(Value::Null),
            },
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Sequence(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => Value::Mapping(
                map.into_iter()
                    .map(|(k, v)| (k, Value::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<&Value> for serde_json::Value {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Integer(i) => serde_json::Value::from(*i),
            // NaN and infinities have no JSON spelling.
            Value::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Sequence(items) => {
                serde_json::Value::Array(items.iter().map(serde_json::Value::from).collect())
            }
            Value::Mapping(map) => serde_json::Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), serde_json::Value::from(v)))
                    .collect(),
            ),
        }
    }
}

// --- YAML ---

impl From<serde_yaml::Value> for Value {
    fn from(value: serde_yaml::Value) -> Self {
        match value {
            serde_yaml::Value::Null => Value::Null,
            serde_yaml::Value::Bool(b) => Value::Bool(b),
            serde_yaml::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Integer(i),
                None => n.as_f64().map(Value::Float).unwrap_or(Value::Null),
            },
            serde_yaml::Value::String(s) => Value::String(s),
            serde_yaml::Value::Sequence(items) => {
                Value::Sequence(items.into_iter().map(Value::from).collect())
            }
            serde_yaml::Value::Mapping(map) => Value::Mapping(
                map.into_iter()
                    .map(|(k, v)| (yaml_key(k), Value::from(v)))
                    .collect(),
            ),
            serde_yaml::Value::Tagged(tagged) => Value::from(tagged.value),
        }
    }
}

/// YAML allows non-string keys; the tree model only has string keys.
fn yaml_key(key: serde_yaml::Value) -> String {
    match key {
        serde_yaml::Value::String(s) => s,
        serde_yaml::Value::Bool(b) => b.to_string(),
        serde_yaml::Value::Number(n) => n.to_string(),
        serde_yaml::Value::Null => "null".to_string(),
        other => serde_yaml::to_string(&other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}

impl From<&Value> for serde_yaml::Value {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => serde_yaml::Value::Null,
            Value::Bool(b) => serde_yaml::Value::Bool(*b),
            Value::Integer(i) => serde_yaml::Value::Number((*i).into()),
            Value::Float(f) => serde_yaml::Value::Number((*f).into()),
            Value::String(s) => serde_yaml::Value::String(s.clone()),
            Value::Sequence(items) => {
                serde_yaml::Value::Sequence(items.iter().map(serde_yaml::Value::from).collect())
            }
            Value::Mapping(map) => {
                let mut out = serde_yaml::Mapping::new();
                for (k, v) in map {
                    out.insert(serde_yaml::Value::String(k.clone()), v.into());
                }
                serde_yaml::Value::Mapping(out)
            }
        }
    }
}

// --- TOML ---

impl From<toml::Value> for Value {
    fn from(value: toml::Value) -> Self {
        match value {
            toml::Value::String(s) => Value::String(s),
            toml::Value::Integer(i) => Value::Integer(i),
            toml::Value::Float(f) => Value::Float(f),
            toml::Value::Boolean(b) => Value::Bool(b),
            toml::Value::Datetime(dt) => Value::String(dt.to_string()),
            toml::Value::Array(items) => {
                Value::Sequence(items.into_iter().map(Value::from).collect())
            }
            toml::Value::Table(table) => Value::from(table),
        }
    }
}

impl From<toml::Table> for Value {
    fn from(table: toml::Table) -> Self {
        Value::Mapping(
            table
                .into_iter()
                .map(|(k, v)| (k, Value::from(v)))
                .collect(),
        )
    }
}

/// Convert to a TOML value. `Null` yields `Ok(None)`: TOML has no null, so
/// null mapping entries are dropped and null sequence elements are an error.
pub(crate) fn to_toml(value: &Value) -> Result<Option<toml::Value>, String> {
    let converted = match value {
        Value::Null => return Ok(None),
        Value::Bool(b) => toml::Value::Boolean(*b),
        Value::Integer(i) => toml::Value::Integer(*i),
        Value::Float(f) => toml::Value::Float(*f),
        Value::String(s) => toml::Value::String(s.clone()),
        Value::Sequence(items) => {
            let mut out = Vec::with_capacity(items.len());
            for (i, item) in items.iter().enumerate() {
                match to_toml(item)? {
                    Some(v) => out.push(v),
                    None => return Err(format!("null at array index {i} has no TOML form")),
                }
            }
            toml::Value::Array(out)
        }
        Value::Mapping(map) => toml::Value::Table(to_toml_table(map)?),
    };
    Ok(Some(converted))
}

pub(crate) fn to_toml_table(map: &Mapping) -> Result<toml::Table, String> {
    let mut table = toml::Table::new();
    for (key, value) in map {
        if let Some(v) = to_toml(value)? {
            table.insert(key.clone(), v);
        }
    }
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_numbers_keep_integer_kind() {
        let v = Value::from(serde_json::json!({"a": 3, "b": 2.5}));
        let map = v.as_mapping().unwrap();
        assert_eq!(map["a"], Value::Integer(3));
        assert_eq!(map["b"], Value::Float(2.5));
    }

    #[test]
    fn json_nan_becomes_null() {
        let json = serde_json::Value::from(&Value::Float(f64::NAN));
        assert!(json.is_null());
    }

    #[test]
    fn yaml_non_string_keys_are_stringified() {
        let yaml: serde_yaml::Value = serde_yaml::from_str("1: one\ntrue: yes\n").unwrap();
        let v = Value::from(yaml);
        let map = v.as_mapping().unwrap();
        assert_eq!(map["1"], Value::from("one"));
        assert!(map.contains_key("true"));
    }

    #[test]
    fn yaml_tags_are_unwrapped() {
        let yaml: serde_yaml::Value = serde_yaml::from_str("!custom 5").unwrap();
        assert_eq!(Value::from(yaml), Value::Integer(5));
    }

    #[test]
    fn toml_datetime_becomes_string() {
        let table: toml::Table = toml::from_str("when = 2024-01-02T03:04:05Z").unwrap();
        let v = Value::from(table);
        assert_eq!(
            v.as_mapping().unwrap()["when"],
            Value::from("2024-01-02T03:04:05Z")
        );
    }

    #[test]
    fn toml_drops_null_entries() {
        let mut map = Mapping::new();
        map.insert("keep".into(), Value::from(1i64));
        map.insert("drop".into(), Value::Null);
        let table = to_toml_table(&map).unwrap();
        assert!(table.contains_key("keep"));
        assert!(!table.contains_key("drop"));
    }

    #[test]
    fn toml_rejects_null_in_array() {
        let seq = Value::Sequence(vec![Value::from("a"), Value::Null]);
        let err = to_toml(&seq).unwrap_err();
        assert!(err.contains("index 1"));
    }

    #[test]
    fn display_formats_scalars_plainly() {
        assert_eq!(Value::from("public").to_string(), "public");
        assert_eq!(Value::from(4i64).to_string(), "4");
        assert_eq!(Value::Null.to_string(), "null");
        let seq = Value::Sequence(vec![Value::from("a"), Value::from(true)]);
        assert_eq!(seq.to_string(), r#"["a",true]"#);
    }

    #[test]
    fn kind_names() {
        assert_eq!(Value::mapping().kind(), "mapping");
        assert_eq!(Value::Sequence(vec![]).kind(), "sequence");
    }
}
