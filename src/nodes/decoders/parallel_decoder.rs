//! Parallel bus decoder
//!
//! Samples every data line on the selected clock edges and assembles one bus
//! word per edge.

use super::types::{bus_value, clock_edge, clock_edge_parameter, input_data};
use crate::runtime::decoder::Parameters;
use crate::runtime::node::{ChannelHandle, Protocol};
use crate::runtime::palette::{Category, StandardColor};
use crate::runtime::parameter::ParameterValue;
use crate::runtime::ports::InputSchema;
use crate::runtime::resample::sample_on_edges;
use crate::runtime::sample::{CaptureData, DigitalBusCapture, Sample, SignalType};
use tracing::trace;

/// Parallel bus decoder
///
/// Inputs: clk, d0..dN - digital channels. Unbound data lines read as 0.
/// Output: one bus sample per clock edge
pub struct ParallelDecoder {
    num_data_bits: usize,
}

impl ParallelDecoder {
    pub const PROTOCOL: &'static str = "Parallel Bus";

    /// Create an 8-bit parallel decoder
    pub fn new() -> Self {
        Self::with_width(8)
    }

    /// Create a decoder with `num_data_bits` data lines (1-64)
    pub fn with_width(num_data_bits: usize) -> Self {
        Self {
            num_data_bits: num_data_bits.clamp(1, 64),
        }
    }
}

impl Default for ParallelDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Protocol for ParallelDecoder {
    fn protocol_name(&self) -> &str {
        Self::PROTOCOL
    }

    fn category(&self) -> Category {
        Category::Bus
    }

    fn input_schema(&self) -> Vec<InputSchema> {
        let mut schemas = vec![InputSchema::new("clk", 0, SignalType::Digital)];
        for i in 0..self.num_data_bits {
            schemas.push(InputSchema::new(format!("d{}", i), 1 + i, SignalType::Digital));
        }
        schemas
    }

    fn parameters(&self) -> Vec<(String, ParameterValue)> {
        vec![clock_edge_parameter()]
    }

    fn output_type(&self) -> SignalType {
        SignalType::DigitalBus
    }

    fn refresh(
        &mut self,
        inputs: &[Option<ChannelHandle>],
        parameters: &Parameters,
    ) -> Option<CaptureData> {
        let mut output = DigitalBusCapture::new(1);

        let clk = input_data(inputs, 0);
        let Some(clock) = clk.as_deref().and_then(|c| c.as_digital()) else {
            return Some(CaptureData::DigitalBus(output));
        };
        let edge = clock_edge(parameters);

        let lines: Vec<Option<Vec<Sample<bool>>>> = (0..self.num_data_bits)
            .map(|i| {
                let data = input_data(inputs, 1 + i)?;
                Some(sample_on_edges(data.as_digital()?, clock, edge))
            })
            .collect();

        // Every line samples the same edges; the shortest one sets the timeline
        let Some(timeline) = lines.iter().flatten().min_by_key(|l| l.len()) else {
            return Some(CaptureData::DigitalBus(output));
        };

        output.samples = timeline
            .iter()
            .enumerate()
            .map(|(j, s)| {
                let bits = lines
                    .iter()
                    .map(|line| line.as_ref().is_some_and(|l| l[j].value))
                    .collect();
                Sample::new(s.offset, s.duration, bits)
            })
            .collect();

        trace!("Parallel bus decoded {} words", output.samples.len());
        Some(CaptureData::DigitalBus(output))
    }

    fn sample_color(&self, _output: &CaptureData, _i: usize) -> StandardColor {
        StandardColor::Data
    }

    fn sample_text(&self, output: &CaptureData, i: usize) -> String {
        let Some(sample) = output.as_digital_bus().and_then(|c| c.samples.get(i)) else {
            return String::new();
        };
        let digits = self.num_data_bits.div_ceil(4);
        format!("{:0width$x}", bus_value(&sample.value), width = digits)
    }
}
