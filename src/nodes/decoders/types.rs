//! Common decoder types and helpers

use crate::runtime::decoder::Parameters;
use crate::runtime::node::ChannelHandle;
use crate::runtime::parameter::ParameterValue;
use crate::runtime::sample::CaptureData;
use std::cell::Ref;
use tracing::warn;

pub use crate::runtime::resample::ClockEdge;

/// Name of the clock edge selection parameter
pub const CLOCK_EDGE: &str = "Clock Edge";

/// Default clock edge parameter: rising
pub fn clock_edge_parameter() -> (String, ParameterValue) {
    (CLOCK_EDGE.to_string(), ParameterValue::Int(ClockEdge::Rising.index()))
}

/// Clock edge selected by the parameters, rising if unset or invalid
pub fn clock_edge(parameters: &Parameters) -> ClockEdge {
    let index = parameters.get(CLOCK_EDGE).map_or(0, |p| p.as_int());
    ClockEdge::from_index(index).unwrap_or_else(|| {
        warn!("Invalid clock edge {}, using rising edges", index);
        ClockEdge::Rising
    })
}

/// Current data of input `i`, if bound and populated
pub fn input_data(inputs: &[Option<ChannelHandle>], i: usize) -> Option<Ref<'_, CaptureData>> {
    inputs.get(i)?.as_ref()?.data()
}

/// Value of a bus sample, bit 0 first
pub fn bus_value(bits: &[bool]) -> u64 {
    bits.iter()
        .take(64)
        .enumerate()
        .filter(|(_, bit)| **bit)
        .fold(0u64, |value, (i, _)| value | (1u64 << i))
}
