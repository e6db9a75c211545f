//! ASCII text decoder
//!
//! Samples a byte-wide bus on clock edges and renders each byte as text.

use super::types::{bus_value, clock_edge, clock_edge_parameter, input_data};
use crate::runtime::decoder::Parameters;
use crate::runtime::node::{ChannelHandle, Protocol};
use crate::runtime::palette::{Category, StandardColor, ascii_text};
use crate::runtime::parameter::ParameterValue;
use crate::runtime::ports::InputSchema;
use crate::runtime::resample::sample_on_edges;
use crate::runtime::sample::{AsciiCapture, CaptureData, Sample, SignalType};

/// ASCII decoder node
///
/// Inputs: clk (digital), din (digital bus, bit 0 first)
/// Output: one character per clock edge
#[derive(Debug, Default)]
pub struct AsciiDecoder;

impl AsciiDecoder {
    pub const PROTOCOL: &'static str = "ASCII";

    pub fn new() -> Self {
        Self
    }
}

impl Protocol for AsciiDecoder {
    fn protocol_name(&self) -> &str {
        Self::PROTOCOL
    }

    fn category(&self) -> Category {
        Category::Serial
    }

    fn input_schema(&self) -> Vec<InputSchema> {
        vec![
            InputSchema::new("clk", 0, SignalType::Digital),
            InputSchema::new("din", 1, SignalType::DigitalBus),
        ]
    }

    fn parameters(&self) -> Vec<(String, ParameterValue)> {
        vec![clock_edge_parameter()]
    }

    fn output_type(&self) -> SignalType {
        SignalType::Ascii
    }

    fn refresh(
        &mut self,
        inputs: &[Option<ChannelHandle>],
        parameters: &Parameters,
    ) -> Option<CaptureData> {
        let mut output = AsciiCapture::new(1);

        let clk = input_data(inputs, 0);
        let din = input_data(inputs, 1);
        let clock = clk.as_deref().and_then(|c| c.as_digital());
        let data = din.as_deref().and_then(|d| d.as_digital_bus());

        if let (Some(clock), Some(data)) = (clock, data) {
            output.samples = sample_on_edges(data, clock, clock_edge(parameters))
                .into_iter()
                .map(|s| Sample::new(s.offset, s.duration, (bus_value(&s.value) & 0xff) as u8))
                .collect();
        }

        Some(CaptureData::Ascii(output))
    }

    fn sample_color(&self, output: &CaptureData, i: usize) -> StandardColor {
        match output.as_ascii().and_then(|c| c.samples.get(i)) {
            Some(s) if (b' '..=b'~').contains(&s.value) => StandardColor::Data,
            Some(_) => StandardColor::Control,
            None => StandardColor::Error,
        }
    }

    fn sample_text(&self, output: &CaptureData, i: usize) -> String {
        output
            .as_ascii()
            .and_then(|c| c.samples.get(i))
            .map(|s| ascii_text(s.value))
            .unwrap_or_default()
    }
}
