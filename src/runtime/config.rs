//! Saving and loading decoder configuration
//!
//! Decoders are written as [`DecoderConfig`] entries named `decodeN`, where
//! `N` is the decoder's own id. Ids come from an [`IdTable`] and only mean
//! something within one save or load session.

use super::decoder::Decoder;
use super::document::{DecoderConfig, DecoderDocument, DecoderEntries, entries_to_yaml, scalar_text};
use super::errors::ConfigError;
use super::id_table::IdTable;
use super::node::{Channel, ChannelHandle};
use super::registry::DecoderRegistry;
use serde_yaml::{Mapping, Value};
use std::fs;
use std::path::Path;
use std::rc::Rc;
use tracing::{debug, error, info};

/// Describe one decoder, allocating ids for it and its inputs.
/// Returns the entry name along with the description.
pub fn decoder_config(decoder: &Rc<Decoder>, table: &mut IdTable) -> (String, DecoderConfig) {
    let handle: ChannelHandle = decoder.clone();
    let id = table.emplace(&handle);

    let mut inputs = Mapping::new();
    for i in 0..decoder.input_count() {
        let input_id = decoder.input(i).map_or(0, |channel| table.emplace(&channel));
        inputs.insert(Value::from(decoder.input_name(i)), Value::from(input_id as u64));
    }

    let mut parameters = Mapping::new();
    for (name, value) in decoder.parameters().iter() {
        parameters.insert(Value::from(name.as_str()), Value::from(value.format_text()));
    }

    let config = DecoderConfig {
        id: Some(id),
        protocol: Some(decoder.protocol_name().to_string()),
        color: Some(decoder.color()),
        nick: Some(decoder.display_name()),
        name: Some(decoder.hwname()),
        inputs,
        parameters,
    };
    (format!("decode{}", id), config)
}

/// Serialize one decoder as a single `decodeN:` entry
pub fn serialize_decoder(decoder: &Rc<Decoder>, table: &mut IdTable) -> Result<String, ConfigError> {
    entries_to_yaml(&[decoder_config(decoder, table)])
}

/// Serialize several decoders as a `decodes:` document
pub fn serialize_decoders(decoders: &[Rc<Decoder>], table: &mut IdTable) -> Result<String, ConfigError> {
    let document = DecoderDocument {
        entries: decoder_entries(decoders, table),
    };
    document.to_yaml()
}

/// Write a `decodes:` document to a file
pub fn save_decoders<P: AsRef<Path>>(
    path: P,
    decoders: &[Rc<Decoder>],
    table: &mut IdTable,
) -> Result<(), ConfigError> {
    let path = path.as_ref();
    fs::write(path, serialize_decoders(decoders, table)?)?;
    info!("Saved {} decoders to {}", decoders.len(), path.display());
    Ok(())
}

fn required<'a>(field: &'a Option<String>, key: &str) -> Result<&'a str, ConfigError> {
    field
        .as_deref()
        .ok_or_else(|| ConfigError::MissingField(key.to_string()))
}

/// Load nick, hardware name and parameters into `decoder`.
///
/// Unknown parameter names are logged and skipped.
pub fn load_parameters(decoder: &Decoder, config: &DecoderConfig) -> Result<(), ConfigError> {
    let nick = required(&config.nick, "nick")?;
    let name = required(&config.name, "name")?;

    decoder.set_display_name(nick);
    decoder.set_hwname(name);

    for (key, value) in config.parameters.iter() {
        match (scalar_text(key), scalar_text(value)) {
            (Some(key), Some(text)) => {
                // Failure is already logged by the decoder
                let _ = decoder.set_parameter_text(&key, &text);
            }
            _ => error!("Parameter {:?} of decoder '{}' is not a value", key, nick),
        }
    }
    Ok(())
}

/// Bind `decoder`'s inputs to the channels named by id in `config`.
///
/// Unknown slots and unresolved ids are logged and skipped.
pub fn load_inputs(decoder: &Decoder, config: &DecoderConfig, table: &IdTable) -> Result<(), ConfigError> {
    for (slot, value) in config.inputs.iter() {
        let Some(slot) = scalar_text(slot) else {
            error!("Decoder '{}' has an input with an invalid name", decoder.display_name());
            continue;
        };
        let Some(id) = scalar_text(value).and_then(|text| text.parse::<usize>().ok()) else {
            error!("Input '{}' of decoder '{}' has an invalid id", slot, decoder.display_name());
            continue;
        };

        let channel = if id == 0 {
            None
        } else {
            match table.get(id) {
                Some(channel) => Some(channel),
                None => {
                    error!(
                        "Input '{}' of decoder '{}' references unknown id {}",
                        slot,
                        decoder.display_name(),
                        id
                    );
                    continue;
                }
            }
        };

        // Failure is already logged by the decoder
        let _ = decoder.set_input_by_name(&slot, channel);
    }
    Ok(())
}

/// Load parameters and inputs into an existing decoder
pub fn deserialize_decoder(
    decoder: &Decoder,
    config: &DecoderConfig,
    table: &IdTable,
) -> Result<(), ConfigError> {
    load_parameters(decoder, config)?;
    load_inputs(decoder, config, table)
}

/// Create every decoder in a `decodes:` document.
///
/// All decoders are created and registered in `table` before any inputs are
/// bound, so decoders may feed each other regardless of their order in the
/// file. Entries naming an unknown protocol are logged and skipped.
pub fn load_decoders(
    document: &DecoderDocument,
    registry: &DecoderRegistry,
    table: &mut IdTable,
) -> Result<Vec<Rc<Decoder>>, ConfigError> {
    let mut created = Vec::new();
    for (key, config) in &document.entries {
        let protocol = required(&config.protocol, &format!("{}.protocol", key))?;
        let id = config
            .id
            .ok_or_else(|| ConfigError::MissingField(format!("{}.id", key)))?;
        let color = config.color.as_deref().unwrap_or("#ffffff");

        let Some(decoder) = registry.create(protocol, color) else {
            continue;
        };
        load_parameters(&decoder, config)?;
        table.insert(id, decoder.clone());
        created.push((decoder, config));
    }

    for (decoder, config) in &created {
        load_inputs(decoder, config, table)?;
    }

    debug!("Loaded {} decoders", created.len());
    Ok(created.into_iter().map(|(decoder, _)| decoder).collect())
}

/// Read a file and create the decoders it describes
pub fn load_decoders_from_file<P: AsRef<Path>>(
    path: P,
    registry: &DecoderRegistry,
    table: &mut IdTable,
) -> Result<Vec<Rc<Decoder>>, ConfigError> {
    let document = DecoderDocument::load(path)?;
    load_decoders(&document, registry, table)
}

/// Entries for `decoders` without writing them anywhere
pub fn decoder_entries(decoders: &[Rc<Decoder>], table: &mut IdTable) -> DecoderEntries {
    decoders.iter().map(|decoder| decoder_config(decoder, table)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nodes::SignalChannel;
    use crate::runtime::decoder::Parameters;
    use crate::runtime::document::parse_entries;
    use crate::runtime::node::Protocol;
    use crate::runtime::palette::Category;
    use crate::runtime::parameter::{ParameterKind, ParameterValue};
    use crate::runtime::ports::InputSchema;
    use crate::runtime::sample::{CaptureData, SignalType};

    struct TwoWire;

    impl Protocol for TwoWire {
        fn protocol_name(&self) -> &str {
            "TwoWire"
        }

        fn category(&self) -> Category {
            Category::Bus
        }

        fn input_schema(&self) -> Vec<InputSchema> {
            vec![
                InputSchema::new("sda", 0, SignalType::Digital),
                InputSchema::new("scl", 1, SignalType::Digital),
            ]
        }

        fn parameters(&self) -> Vec<(String, ParameterValue)> {
            vec![
                ("Address".to_string(), ParameterValue::new(ParameterKind::Int)),
                ("Rate".to_string(), ParameterValue::new(ParameterKind::Float)),
                ("Log File".to_string(), ParameterValue::new(ParameterKind::Filename)),
            ]
        }

        fn output_type(&self) -> SignalType {
            SignalType::Digital
        }

        fn refresh(&mut self, _: &[Option<ChannelHandle>], _: &Parameters) -> Option<CaptureData> {
            None
        }
    }

    /// Names that need quoting in YAML
    struct Punctuated;

    impl Protocol for Punctuated {
        fn protocol_name(&self) -> &str {
            "Punctuated"
        }

        fn category(&self) -> Category {
            Category::Misc
        }

        fn input_schema(&self) -> Vec<InputSchema> {
            vec![
                InputSchema::new("#clk", 0, SignalType::Digital),
                InputSchema::new("data: in", 1, SignalType::Digital),
            ]
        }

        fn parameters(&self) -> Vec<(String, ParameterValue)> {
            vec![
                ("Mode: fast".to_string(), ParameterValue::new(ParameterKind::Int)),
                ("#Taps".to_string(), ParameterValue::new(ParameterKind::Int)),
                ("- list".to_string(), ParameterValue::new(ParameterKind::Filename)),
            ]
        }

        fn output_type(&self) -> SignalType {
            SignalType::Digital
        }

        fn refresh(&mut self, _: &[Option<ChannelHandle>], _: &Parameters) -> Option<CaptureData> {
            None
        }
    }

    fn two_wire() -> Rc<Decoder> {
        Rc::new(Decoder::new(TwoWire, "#ffff00").with_name("i2c0"))
    }

    fn digital_source(name: &str) -> ChannelHandle {
        Rc::new(SignalChannel::new(name, "#ff0000", SignalType::Digital))
    }

    #[test]
    fn test_decoder_config_fields() {
        let sda = digital_source("CH1");
        let decoder = two_wire();
        decoder.set_input(0, Some(sda.clone())).unwrap();
        decoder.set_parameter_text("Address", "80").unwrap();

        let mut table = IdTable::new();
        let (key, config) = decoder_config(&decoder, &mut table);

        assert_eq!(key, "decode1");
        assert_eq!(config.id, Some(1));
        assert_eq!(config.protocol.as_deref(), Some("TwoWire"));
        assert_eq!(config.color.as_deref(), Some("#ffff00"));
        assert_eq!(config.nick.as_deref(), Some("i2c0"));

        let inputs: Vec<(String, String)> = config
            .inputs
            .iter()
            .filter_map(|(k, v)| Some((scalar_text(k)?, scalar_text(v)?)))
            .collect();
        assert_eq!(
            inputs,
            vec![("sda".to_string(), "2".to_string()), ("scl".to_string(), "0".to_string())]
        );

        let parameters: Vec<(String, String)> = config
            .parameters
            .iter()
            .filter_map(|(k, v)| Some((scalar_text(k)?, scalar_text(v)?)))
            .collect();
        assert_eq!(
            parameters,
            vec![
                ("Address".to_string(), "80".to_string()),
                ("Log File".to_string(), String::new()),
                ("Rate".to_string(), "0.000000".to_string()),
            ]
        );
        assert_eq!(table.id_of(&sda), Some(2));
    }

    #[test]
    fn test_round_trip_into_fresh_decoder() {
        let sda = digital_source("CH1");
        let scl = digital_source("CH2");

        let original = two_wire();
        original.set_input(0, Some(sda.clone())).unwrap();
        original.set_input(1, Some(scl.clone())).unwrap();
        original.set_parameter_text("Address", "1.5K").unwrap();
        original.set_parameter_text("Rate", "400K").unwrap();
        original.set_parameter_text("Log File", "/tmp/i2c log.txt").unwrap();

        let mut table = IdTable::new();
        let text = serialize_decoder(&original, &mut table).unwrap();
        let entries = parse_entries(&text).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].0, "decode1");

        let restored = Rc::new(Decoder::new(TwoWire, "#000000"));
        deserialize_decoder(&restored, &entries[0].1, &table).unwrap();

        assert_eq!(restored.display_name(), "i2c0");
        assert_eq!(restored.hwname(), "i2c0");
        assert!(Rc::ptr_eq(&restored.input(0).unwrap(), &sda));
        assert!(Rc::ptr_eq(&restored.input(1).unwrap(), &scl));
        for name in original.parameter_names() {
            assert_eq!(
                restored.parameter(&name).map(|p| p.format_text()),
                original.parameter(&name).map(|p| p.format_text())
            );
        }
    }

    #[test]
    fn test_round_trip_keeps_punctuated_names() {
        let clk = digital_source("CH1");
        let din = digital_source("CH2");

        let original = Rc::new(Decoder::new(Punctuated, "#ffff00").with_name("odd: one"));
        original.set_input(0, Some(clk.clone())).unwrap();
        original.set_input(1, Some(din.clone())).unwrap();
        original.set_parameter_text("Mode: fast", "7").unwrap();
        original.set_parameter_text("#Taps", "5").unwrap();
        original.set_parameter_text("- list", "# not a comment").unwrap();

        let mut table = IdTable::new();
        let text = serialize_decoder(&original, &mut table).unwrap();
        let entries = parse_entries(&text).unwrap();

        let restored = Rc::new(Decoder::new(Punctuated, "#000000"));
        deserialize_decoder(&restored, &entries[0].1, &table).unwrap();

        assert_eq!(restored.display_name(), "odd: one");
        assert_eq!(restored.parameter("Mode: fast").map(|p| p.as_int()), Some(7));
        assert_eq!(restored.parameter("#Taps").map(|p| p.as_int()), Some(5));
        assert_eq!(
            restored.parameter("- list").map(|p| p.format_text()),
            Some("# not a comment".to_string())
        );
        assert!(Rc::ptr_eq(&restored.input(0).unwrap(), &clk));
        assert!(Rc::ptr_eq(&restored.input(1).unwrap(), &din));
    }

    #[test]
    fn test_unknown_entries_are_skipped() {
        let entries = parse_entries(
            "e:\n  nick: x\n  name: y\n  inputs:\n    sda: 9\n    bogus: 0\n    scl: oops\n  parameters:\n    Nope: '1'\n    Address: 7\n",
        )
        .unwrap();
        let decoder = two_wire();
        deserialize_decoder(&decoder, &entries[0].1, &IdTable::new()).unwrap();

        assert!(decoder.input(0).is_none());
        assert_eq!(decoder.parameter("Address").map(|p| p.as_int()), Some(7));
        assert_eq!(decoder.display_name(), "x");
    }

    #[test]
    fn test_missing_nick_fails_without_changes() {
        let entries = parse_entries("e:\n  name: y\n  parameters:\n    Address: '7'\n").unwrap();
        let decoder = two_wire();
        assert!(matches!(
            load_parameters(&decoder, &entries[0].1),
            Err(ConfigError::MissingField(field)) if field == "nick"
        ));
        assert_eq!(decoder.parameter("Address").map(|p| p.as_int()), Some(0));
        assert_eq!(decoder.hwname(), "i2c0");
    }

    #[test]
    fn test_load_decoders_binds_across_entries() {
        let mut registry = DecoderRegistry::new();
        registry.register("TwoWire", |color| Decoder::new(TwoWire, color));

        // The consumer is listed before the decoder feeding it
        let text = "\
decodes:
  decode2:
    id: 2
    protocol: TwoWire
    color: '#00ffff'
    nick: second
    name: second
    inputs:
      sda: 1
  decode1:
    id: 1
    protocol: TwoWire
    nick: first
    name: first
  decode3:
    id: 3
    protocol: Unknown
    nick: skipped
    name: skipped
";
        let document = DecoderDocument::parse(text).unwrap();
        let mut table = IdTable::new();
        let decoders = load_decoders(&document, &registry, &mut table).unwrap();

        assert_eq!(decoders.len(), 2);
        let second = &decoders[0];
        let first = &decoders[1];
        assert_eq!(second.color(), "#00ffff");
        assert_eq!(first.color(), "#ffffff");
        let bound = second.input(0).unwrap();
        assert_eq!(bound.display_name(), "first");
        assert!(std::ptr::eq(bound.as_decoder().unwrap(), first.as_ref()));
    }

    #[test]
    fn test_load_decoders_requires_protocol() {
        let registry = DecoderRegistry::new();
        let document = DecoderDocument::parse("decodes:\n  decode1:\n    id: 1\n").unwrap();
        assert!(matches!(
            load_decoders(&document, &registry, &mut IdTable::new()),
            Err(ConfigError::MissingField(field)) if field == "decode1.protocol"
        ));
    }
}
