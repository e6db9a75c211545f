//! Clock-relative resampling and threshold crossing helpers
//!
//! Inputs may use different timescales and need not be uniformly sampled.
//! All outputs are in picoseconds.

use super::sample::{AnalogCapture, Capture, DigitalCapture, Sample};

/// Which clock transitions trigger a sample
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockEdge {
    /// Low to high
    Rising,
    /// High to low
    Falling,
    /// Any change of level
    Any,
}

impl ClockEdge {
    /// Map a parameter value (0 rising, 1 falling, 2 any) to an edge mode
    pub fn from_index(index: i64) -> Option<Self> {
        match index {
            0 => Some(ClockEdge::Rising),
            1 => Some(ClockEdge::Falling),
            2 => Some(ClockEdge::Any),
            _ => None,
        }
    }

    pub fn index(self) -> i64 {
        match self {
            ClockEdge::Rising => 0,
            ClockEdge::Falling => 1,
            ClockEdge::Any => 2,
        }
    }

    #[inline]
    fn triggered(self, previous: bool, current: bool) -> bool {
        match self {
            ClockEdge::Rising => !previous && current,
            ClockEdge::Falling => previous && !current,
            ClockEdge::Any => previous != current,
        }
    }
}

/// Sample `data` on every `edge` transition of `clock`.
///
/// Each output sample starts at the clock edge and carries the first data
/// value whose start time is at or after that edge. Output samples are
/// stretched so each one ends where the next begins; the last one keeps a
/// duration of 1. Resampling stops at the first edge for which no data
/// remains.
pub fn sample_on_edges<T: Clone>(
    data: &Capture<T>,
    clock: &DigitalCapture,
    edge: ClockEdge,
) -> Vec<Sample<T>> {
    let mut samples: Vec<Sample<T>> = Vec::new();

    let mut ndata = 0;
    for i in 1..clock.samples.len() {
        if !edge.triggered(clock.samples[i - 1].value, clock.samples[i].value) {
            continue;
        }

        // Skip data until it catches up with the clock; never rewinds
        let clkstart = clock.absolute_start(i);
        while ndata < data.samples.len() && data.absolute_start(ndata) < clkstart {
            ndata += 1;
        }
        if ndata >= data.samples.len() {
            break;
        }

        if let Some(last) = samples.last_mut() {
            last.duration = clkstart - last.offset;
        }

        samples.push(Sample::new(clkstart, 1, data.samples[ndata].value.clone()));
    }

    samples
}

/// Sample `data` on rising edges of `clock`
pub fn sample_on_rising_edges<T: Clone>(data: &Capture<T>, clock: &DigitalCapture) -> Vec<Sample<T>> {
    sample_on_edges(data, clock, ClockEdge::Rising)
}

/// Sample `data` on falling edges of `clock`
pub fn sample_on_falling_edges<T: Clone>(data: &Capture<T>, clock: &DigitalCapture) -> Vec<Sample<T>> {
    sample_on_edges(data, clock, ClockEdge::Falling)
}

/// Sample `data` on both edges of `clock`
pub fn sample_on_any_edges<T: Clone>(data: &Capture<T>, clock: &DigitalCapture) -> Vec<Sample<T>> {
    sample_on_edges(data, clock, ClockEdge::Any)
}

/// Times, in picoseconds, at which `data` crosses `threshold`.
///
/// A sample is "high" when strictly above the threshold. The first sample
/// only sets the starting level. Each crossing is placed at the middle of the
/// sample after the transition, plus the linearly interpolated fraction of
/// the spacing between the two samples.
///
/// Edges are strictly increasing. Two crossings landing on the same instant
/// (a sample sitting exactly on the threshold) cancel out.
pub fn find_zero_crossings(data: &AnalogCapture, threshold: f32) -> Vec<i64> {
    let mut edges: Vec<i64> = Vec::new();

    let mut last = match data.samples.first() {
        Some(first) => first.value > threshold,
        None => return edges,
    };

    for i in 1..data.samples.len() {
        let value = data.samples[i].value > threshold;
        if value == last {
            continue;
        }
        last = value;

        let before = &data.samples[i - 1];
        let after = &data.samples[i];
        let fraction = interpolate_fraction(before.value, after.value, threshold);

        let start = data.trigger_phase
            + data.timescale * after.offset
            + data.timescale * after.duration / 2;
        let spacing = data.timescale * (after.offset - before.offset);
        let t = start + (spacing as f64 * fraction) as i64;

        match edges.last() {
            Some(&previous) if t <= previous => {
                edges.pop();
            }
            _ => edges.push(t),
        }
    }

    edges
}

/// Fraction of the way from `a` to `b` at which the line crosses `threshold`
fn interpolate_fraction(a: f32, b: f32, threshold: f32) -> f64 {
    let slope = f64::from(b) - f64::from(a);
    if slope == 0.0 {
        return 0.0;
    }
    ((f64::from(threshold) - f64::from(a)) / slope).clamp(0.0, 1.0)
}
