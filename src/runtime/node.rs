//! Channel and protocol traits
//!
//! A [`Channel`] is anything that can feed a decoder input: a physical
//! acquisition channel or another decoder. A [`Protocol`] is the
//! decoder-specific half of a [`Decoder`](super::decoder::Decoder) and only
//! knows how to turn bound inputs into an output capture.

use super::decoder::{Decoder, Parameters};
use super::palette::{Category, StandardColor};
use super::parameter::ParameterValue;
use super::ports::InputSchema;
use super::sample::{CaptureData, SignalType};
use std::cell::Ref;
use std::rc::Rc;

/// Shared handle to a channel. The channel lives as long as any holder.
pub type ChannelHandle = Rc<dyn Channel>;

/// A named signal source in the decoder graph
pub trait Channel {
    /// Name shown to the user
    fn display_name(&self) -> String;

    /// Name of the underlying hardware (or decoder instance)
    fn hwname(&self) -> String;

    /// Display color, as a `#rrggbb` string
    fn color(&self) -> String;

    /// True for acquisition channels, false for derived ones
    fn is_physical(&self) -> bool;

    /// Kind of samples this channel produces
    fn signal_type(&self) -> SignalType;

    /// Current capture buffer, if any
    fn data(&self) -> Option<Ref<'_, CaptureData>>;

    /// Bring the output up to date. Plain sources are always current.
    fn refresh_if_dirty(&self) {}

    /// The decoder behind this channel, if it is one
    fn as_decoder(&self) -> Option<&Decoder> {
        None
    }
}

/// Decoder-specific behaviour plugged into a [`Decoder`](super::decoder::Decoder)
pub trait Protocol {
    /// Name used for registry lookup and configuration files
    fn protocol_name(&self) -> &str;

    /// Grouping for menus
    fn category(&self) -> Category;

    /// Named inputs, fixed for the lifetime of the decoder
    fn input_schema(&self) -> Vec<InputSchema>;

    /// Parameters with their default values
    fn parameters(&self) -> Vec<(String, ParameterValue)> {
        Vec::new()
    }

    /// Kind of samples the decoder produces
    fn output_type(&self) -> SignalType;

    /// Whether `channel` may be bound to input `slot`.
    /// Defaults to checking the slot's accepted signal types.
    fn validate_channel(&self, slot: usize, channel: &dyn Channel) -> bool {
        self.input_schema()
            .get(slot)
            .is_some_and(|schema| schema.accepts(channel.signal_type()))
    }

    /// Recompute the output from the (already refreshed) inputs
    fn refresh(
        &mut self,
        inputs: &[Option<ChannelHandle>],
        parameters: &Parameters,
    ) -> Option<CaptureData>;

    /// Palette entry for output sample `i`
    fn sample_color(&self, _output: &CaptureData, _i: usize) -> StandardColor {
        StandardColor::Error
    }

    /// Label for output sample `i`
    fn sample_text(&self, _output: &CaptureData, _i: usize) -> String {
        "(unimplemented)".to_string()
    }

    /// Whether the output is drawn over its inputs rather than as its own trace
    fn is_overlay(&self) -> bool {
        true
    }
}
