//! Analog to digital threshold decoder

use super::types::input_data;
use crate::runtime::decoder::Parameters;
use crate::runtime::node::{ChannelHandle, Protocol};
use crate::runtime::palette::{Category, StandardColor};
use crate::runtime::parameter::ParameterValue;
use crate::runtime::ports::InputSchema;
use crate::runtime::resample::find_zero_crossings;
use crate::runtime::sample::{CaptureData, DigitalCapture, Sample, SignalType};
use tracing::debug;

pub const THRESHOLD: &str = "Threshold";
pub const INVERT: &str = "Invert";

/// Threshold decoder node
///
/// Input: din (analog)
/// Output: digital waveform that toggles at each interpolated threshold
/// crossing, in picoseconds
#[derive(Debug, Default)]
pub struct ThresholdDecoder;

impl ThresholdDecoder {
    pub const PROTOCOL: &'static str = "Threshold";

    pub fn new() -> Self {
        Self
    }
}

impl Protocol for ThresholdDecoder {
    fn protocol_name(&self) -> &str {
        Self::PROTOCOL
    }

    fn category(&self) -> Category {
        Category::Math
    }

    fn input_schema(&self) -> Vec<InputSchema> {
        vec![InputSchema::new("din", 0, SignalType::Analog)]
    }

    fn parameters(&self) -> Vec<(String, ParameterValue)> {
        vec![
            (THRESHOLD.to_string(), ParameterValue::Float(0.0)),
            (INVERT.to_string(), ParameterValue::Bool(false)),
        ]
    }

    fn output_type(&self) -> SignalType {
        SignalType::Digital
    }

    fn refresh(
        &mut self,
        inputs: &[Option<ChannelHandle>],
        parameters: &Parameters,
    ) -> Option<CaptureData> {
        let mut output = DigitalCapture::new(1);

        let din = input_data(inputs, 0);
        let Some(analog) = din.as_deref().and_then(|d| d.as_analog()) else {
            return Some(CaptureData::Digital(output));
        };
        let (Some(first), Some(last)) = (analog.samples.first(), analog.samples.last()) else {
            return Some(CaptureData::Digital(output));
        };

        let threshold = parameters.get(THRESHOLD).map_or(0.0, |p| p.as_float()) as f32;
        let invert = parameters.get(INVERT).is_some_and(|p| p.as_bool());

        let edges = find_zero_crossings(analog, threshold);
        let end = analog.absolute_start(analog.len() - 1) + last.duration * analog.timescale;

        let mut level = (first.value > threshold) != invert;
        let mut start = analog.absolute_start(0);
        for edge in &edges {
            output.samples.push(Sample::new(start, edge - start, level));
            level = !level;
            start = *edge;
        }
        output.samples.push(Sample::new(start, (end - start).max(1), level));

        debug!(
            "Threshold {} V: {} crossings in {} samples",
            threshold,
            edges.len(),
            analog.len()
        );
        Some(CaptureData::Digital(output))
    }

    fn sample_color(&self, _output: &CaptureData, _i: usize) -> StandardColor {
        StandardColor::Data
    }

    fn sample_text(&self, output: &CaptureData, i: usize) -> String {
        match output.as_digital().and_then(|c| c.samples.get(i)) {
            Some(s) if s.value => "1".to_string(),
            Some(_) => "0".to_string(),
            None => String::new(),
        }
    }

    fn is_overlay(&self) -> bool {
        false
    }
}
