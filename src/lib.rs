//! Protocol decoder graph for captured waveforms
//!
//! This library turns raw captured samples (digital, bus, analog or text)
//! into protocol-level output through a graph of composable decoder nodes.
//!
//! # Architecture
//!
//! - **Channels**: anything that can feed a decoder, physical or derived
//! - **Decoders**: graph nodes with named inputs, typed parameters and a lazily
//!   refreshed output capture
//! - **Resampling**: clock-edge sampling and threshold crossing helpers shared
//!   by protocol implementations
//! - **Registry**: creates decoders by protocol name
//! - **Configuration**: saves and restores decoders, their parameters and
//!   bindings
//!
//! # Example
//!
//! ```
//! use scopedecode::{Channel, CaptureData, DigitalCapture, SignalChannel, SignalType};
//! use scopedecode::{create_decoder, register_builtin_decoders};
//! use std::rc::Rc;
//!
//! register_builtin_decoders();
//!
//! let clk = Rc::new(SignalChannel::new("CH1", "#ffff00", SignalType::Digital));
//! clk.set_data(CaptureData::Digital(DigitalCapture::uniform(&[false, true, false, true], 1000)));
//! let d0 = Rc::new(SignalChannel::new("CH2", "#00ffff", SignalType::Digital));
//! d0.set_data(CaptureData::Digital(DigitalCapture::uniform(&[true, true, false, false], 1000)));
//!
//! let bus = create_decoder("Parallel Bus", "#336699").expect("registered");
//! bus.set_input_by_name("clk", Some(clk))?;
//! bus.set_input_by_name("d0", Some(d0))?;
//! bus.refresh_if_dirty();
//!
//! assert_eq!(bus.sample_text(0), "01");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use thiserror::Error;

pub mod nodes;
pub mod runtime;

// Re-export built-in decoders and sources
pub use nodes::SignalChannel;
pub use nodes::decoders::{
    AsciiDecoder, ParallelDecoder, ThresholdDecoder, register_builtin_decoders, register_builtins,
};

// Re-export runtime components
pub use runtime::{
    AnalogCapture, AsciiCapture, BindError, Capture, CaptureData, Category, Channel,
    ChannelHandle, ClockEdge, ConfigError, Decoder, DecoderConfig, DecoderDocument,
    DecoderEntries, DecoderFactory, DecoderRegistry, DigitalBusCapture, DigitalCapture, IdTable,
    InputSchema, ParameterError, ParameterKind, ParameterValue, Parameters, Protocol,
    RegistryError, Sample, SignalType, StandardColor, ascii_text, create_decoder, decoder_config,
    decoder_entries, deserialize_decoder, entries_to_yaml, enumerate_protocols,
    find_zero_crossings, load_decoders, load_decoders_from_file, load_inputs, load_parameters,
    parse_entries, register_decoder, sample_on_any_edges, sample_on_edges,
    sample_on_falling_edges, sample_on_rising_edges, save_decoders, scalar_text,
    serialize_decoder, serialize_decoders, with_registry,
};

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Bind(#[from] BindError),

    #[error(transparent)]
    Parameter(#[from] ParameterError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, DecodeError>;
