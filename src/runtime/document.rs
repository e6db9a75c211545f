//! Decoder configuration documents
//!
//! Configuration is YAML. A session document holds a `decodes:` map with one
//! `decodeN` entry per decoder:
//!
//! ```yaml
//! decodes:
//!   decode1:
//!     id: 1
//!     protocol: Parallel Bus
//!     color: '#ffff00'
//!     nick: bus
//!     name: bus
//!     inputs:
//!       clk: 2
//!       d0: 0
//!     parameters:
//!       Clock Edge: '0'
//! ```
//!
//! Input values are channel ids from an [`IdTable`](super::id_table::IdTable);
//! `0` means unconnected. Entry and field order is preserved.

use super::errors::ConfigError;
use serde::{Deserialize, Deserializer, Serialize};
use serde_yaml::{Mapping, Value};
use std::fs;
use std::path::Path;

/// One saved decoder
///
/// Every field is optional when reading so that loading can report exactly
/// which one is missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DecoderConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nick: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Input name to channel id, in slot order
    #[serde(default, deserialize_with = "map_or_empty")]
    pub inputs: Mapping,
    /// Parameter name to parameter text
    #[serde(default, deserialize_with = "map_or_empty")]
    pub parameters: Mapping,
}

/// A bare `key:` with nothing under it reads as an empty map
fn map_or_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Mapping, D::Error> {
    Ok(Option::<Mapping>::deserialize(deserializer)?.unwrap_or_default())
}

/// Named decoder entries, in document order
pub type DecoderEntries = Vec<(String, DecoderConfig)>;

/// A whole `decodes:` session document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecoderDocument {
    pub entries: DecoderEntries,
}

impl DecoderDocument {
    /// Parse a document with a top-level `decodes:` section
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let root: Value = serde_yaml::from_str(text)?;
        let decodes = root
            .get("decodes")
            .ok_or_else(|| ConfigError::MissingField("decodes".to_string()))?;
        Ok(Self {
            entries: entries_from_value(decodes)?,
        })
    }

    /// Read and parse a document from disk
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::parse(&text)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        let mut root = Mapping::new();
        root.insert(Value::from("decodes"), entries_to_value(&self.entries)?);
        Ok(serde_yaml::to_string(&root)?)
    }
}

/// Parse bare `decodeN:` entries, without the `decodes:` header
pub fn parse_entries(text: &str) -> Result<DecoderEntries, ConfigError> {
    let value: Value = serde_yaml::from_str(text)?;
    entries_from_value(&value)
}

/// Write bare `decodeN:` entries, without the `decodes:` header
pub fn entries_to_yaml(entries: &[(String, DecoderConfig)]) -> Result<String, ConfigError> {
    Ok(serde_yaml::to_string(&entries_to_value(entries)?)?)
}

fn entries_from_value(value: &Value) -> Result<DecoderEntries, ConfigError> {
    if value.is_null() {
        return Ok(Vec::new());
    }
    let Some(map) = value.as_mapping() else {
        return Err(ConfigError::NotAMap("decodes".to_string()));
    };

    map.iter()
        .map(|(key, entry)| {
            let key = scalar_text(key).ok_or_else(|| ConfigError::NotAMap("decodes".to_string()))?;
            let config: DecoderConfig = serde_yaml::from_value(entry.clone())?;
            Ok((key, config))
        })
        .collect()
}

fn entries_to_value(entries: &[(String, DecoderConfig)]) -> Result<Value, ConfigError> {
    let mut map = Mapping::new();
    for (key, config) in entries {
        map.insert(Value::from(key.as_str()), serde_yaml::to_value(config)?);
    }
    Ok(Value::Mapping(map))
}

/// Text of a scalar node; numbers and booleans are rendered as written
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_document() {
        let text = "\
decodes:
    decode1:
        id:              3
        protocol:        \"I2C\"
        nick:            \"I2C: main\"
        inputs:
            sda:                 1
            scl:                 0
        parameters:
    decode7:
        id: 7
top: ignored
";
        let document = DecoderDocument::parse(text).unwrap();
        assert_eq!(document.entries.len(), 2);

        let (key, first) = &document.entries[0];
        assert_eq!(key, "decode1");
        assert_eq!(first.id, Some(3));
        assert_eq!(first.protocol.as_deref(), Some("I2C"));
        assert_eq!(first.nick.as_deref(), Some("I2C: main"));
        assert_eq!(first.name, None);
        assert!(first.parameters.is_empty());

        let slots: Vec<String> = first.inputs.iter().filter_map(|(k, _)| scalar_text(k)).collect();
        assert_eq!(slots, vec!["sda", "scl"]);

        assert_eq!(document.entries[1].0, "decode7");
    }

    #[test]
    fn test_awkward_keys_survive_a_round_trip() {
        let mut parameters = Mapping::new();
        for name in ["Mode: fast", "#Taps", "plain", " padded ", "quote\"d"] {
            parameters.insert(Value::from(name), Value::from(format!("{} value", name)));
        }
        let config = DecoderConfig {
            id: Some(1),
            nick: Some("# not a comment".to_string()),
            parameters,
            ..Default::default()
        };
        let document = DecoderDocument {
            entries: vec![("decode1".to_string(), config)],
        };

        let text = document.to_yaml().unwrap();
        assert_eq!(DecoderDocument::parse(&text).unwrap(), document);
    }

    #[test]
    fn test_numeric_looking_text_stays_text() {
        let mut parameters = Mapping::new();
        parameters.insert(Value::from("Rate"), Value::from("0.000000"));
        parameters.insert(Value::from("Enabled"), Value::from("true"));
        let entries = vec![(
            "decode2".to_string(),
            DecoderConfig {
                parameters,
                ..Default::default()
            },
        )];

        let parsed = parse_entries(&entries_to_yaml(&entries).unwrap()).unwrap();
        let values: Vec<&Value> = parsed[0].1.parameters.iter().map(|(_, v)| v).collect();
        assert_eq!(values, vec![&Value::from("0.000000"), &Value::from("true")]);
    }

    #[test]
    fn test_scalar_text() {
        assert_eq!(scalar_text(&Value::from(5u64)), Some("5".to_string()));
        assert_eq!(scalar_text(&Value::from(true)), Some("true".to_string()));
        assert_eq!(scalar_text(&Value::Null), None);
    }

    #[test]
    fn test_malformed_documents() {
        assert!(matches!(
            DecoderDocument::parse("other: 1\n"),
            Err(ConfigError::MissingField(field)) if field == "decodes"
        ));
        assert!(matches!(
            DecoderDocument::parse("decodes: 5\n"),
            Err(ConfigError::NotAMap(_))
        ));
        assert!(matches!(
            DecoderDocument::parse("decodes:\n  decode1:\n    inputs: 3\n"),
            Err(ConfigError::Yaml(_))
        ));
        assert!(matches!(
            DecoderDocument::parse("decodes: [unterminated\n"),
            Err(ConfigError::Yaml(_))
        ));
        assert_eq!(DecoderDocument::parse("decodes:\n").unwrap().entries.len(), 0);
    }
}
