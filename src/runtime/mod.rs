//! Runtime support for decoder graphs

pub mod config;
pub mod decoder;
pub mod document;
pub mod errors;
pub mod id_table;
pub mod node;
pub mod palette;
pub mod parameter;
pub mod ports;
pub mod registry;
pub mod resample;
pub mod sample;

pub use config::{
    decoder_config, decoder_entries, deserialize_decoder, load_decoders, load_decoders_from_file,
    load_inputs, load_parameters, save_decoders, serialize_decoder, serialize_decoders,
};
pub use decoder::{Decoder, Parameters};
pub use document::{
    DecoderConfig, DecoderDocument, DecoderEntries, entries_to_yaml, parse_entries, scalar_text,
};
pub use errors::{BindError, ConfigError, ParameterError, RegistryError};
pub use id_table::IdTable;
pub use node::{Channel, ChannelHandle, Protocol};
pub use palette::{Category, StandardColor, ascii_text};
pub use parameter::{ParameterKind, ParameterValue};
pub use ports::InputSchema;
pub use registry::{
    DecoderFactory, DecoderRegistry, create_decoder, enumerate_protocols, register_decoder,
    with_registry,
};
pub use resample::{
    ClockEdge, find_zero_crossings, sample_on_any_edges, sample_on_edges,
    sample_on_falling_edges, sample_on_rising_edges,
};
pub use sample::{
    AnalogCapture, AsciiCapture, Capture, CaptureData, DigitalBusCapture, DigitalCapture, Sample,
    SignalType,
};
