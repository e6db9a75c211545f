//! Built-in decoders
//!
//! Decoders built directly on the shared resampling primitives. Concrete bus
//! protocols live outside this crate and register themselves the same way.

pub mod ascii_decoder;
pub mod parallel_decoder;
pub mod threshold_decoder;
pub mod types;

// Re-export common types
pub use types::{ClockEdge, bus_value};

// Re-export decoders
pub use ascii_decoder::AsciiDecoder;
pub use parallel_decoder::ParallelDecoder;
pub use threshold_decoder::ThresholdDecoder;

use crate::runtime::decoder::Decoder;
use crate::runtime::registry::{DecoderRegistry, with_registry};

/// Add the built-in decoders to `registry`
pub fn register_builtins(registry: &mut DecoderRegistry) {
    registry.register(ParallelDecoder::PROTOCOL, |color| {
        Decoder::new(ParallelDecoder::new(), color)
    });
    registry.register(AsciiDecoder::PROTOCOL, |color| {
        Decoder::new(AsciiDecoder::new(), color)
    });
    registry.register(ThresholdDecoder::PROTOCOL, |color| {
        Decoder::new(ThresholdDecoder::new(), color)
    });
}

/// Register the built-in decoders in the process-wide registry.
///
/// Call once at start-up, before creating decoders by name.
pub fn register_builtin_decoders() {
    with_registry(register_builtins);
}
