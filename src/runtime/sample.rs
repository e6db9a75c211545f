//! Capture buffers consumed and produced by decoders

use std::fmt;

/// One run-length encoded sample.
///
/// `offset` and `duration` are in units of the owning capture's timescale.
/// The value holds from `offset` until `offset + duration`.
#[derive(Clone, Debug, PartialEq)]
pub struct Sample<T> {
    pub offset: i64,
    pub duration: i64,
    pub value: T,
}

impl<T> Sample<T> {
    /// Create a new sample
    pub fn new(offset: i64, duration: i64, value: T) -> Self {
        Self {
            offset,
            duration,
            value,
        }
    }

    /// First time unit after this sample
    #[inline]
    pub fn end(&self) -> i64 {
        self.offset + self.duration
    }
}

impl<T: fmt::Debug> fmt::Display for Sample<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Sample[v={:?}, t={}, d={}]",
            self.value, self.offset, self.duration
        )
    }
}

/// Time-ordered samples from one acquisition channel.
///
/// Absolute time of a sample, in picoseconds, is
/// `trigger_phase + offset * timescale`.
#[derive(Clone, Debug, PartialEq)]
pub struct Capture<T> {
    pub samples: Vec<Sample<T>>,
    /// Picoseconds per offset unit
    pub timescale: i64,
    /// Picoseconds from the trigger to offset zero
    pub trigger_phase: i64,
}

impl<T> Capture<T> {
    /// Create an empty capture with the given timescale
    pub fn new(timescale: i64) -> Self {
        Self {
            samples: Vec::new(),
            timescale,
            trigger_phase: 0,
        }
    }

    /// Wrap already-timed samples
    pub fn from_samples(samples: Vec<Sample<T>>, timescale: i64) -> Self {
        Self {
            samples,
            timescale,
            trigger_phase: 0,
        }
    }

    /// With a non-zero trigger phase
    pub fn with_trigger_phase(mut self, trigger_phase: i64) -> Self {
        self.trigger_phase = trigger_phase;
        self
    }

    /// Absolute start time of sample `i` in picoseconds
    #[inline]
    pub fn absolute_start(&self, i: usize) -> i64 {
        self.trigger_phase + self.samples[i].offset * self.timescale
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

impl<T: Clone> Capture<T> {
    /// Build a uniformly sampled capture, one unit per value
    pub fn uniform(values: &[T], timescale: i64) -> Self {
        let samples = values
            .iter()
            .enumerate()
            .map(|(i, v)| Sample::new(i as i64, 1, v.clone()))
            .collect();
        Self::from_samples(samples, timescale)
    }
}

impl<T> fmt::Display for Capture<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Capture[samples={}, timescale={}, phase={}]",
            self.samples.len(),
            self.timescale,
            self.trigger_phase
        )
    }
}

pub type DigitalCapture = Capture<bool>;
pub type DigitalBusCapture = Capture<Vec<bool>>;
pub type AnalogCapture = Capture<f32>;
pub type AsciiCapture = Capture<u8>;

/// Kind of samples a channel carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignalType {
    Digital,
    DigitalBus,
    Analog,
    Ascii,
}

/// Capture buffer of any supported sample format
#[derive(Clone, Debug, PartialEq)]
pub enum CaptureData {
    Digital(DigitalCapture),
    DigitalBus(DigitalBusCapture),
    Analog(AnalogCapture),
    Ascii(AsciiCapture),
}

impl CaptureData {
    pub fn signal_type(&self) -> SignalType {
        match self {
            CaptureData::Digital(_) => SignalType::Digital,
            CaptureData::DigitalBus(_) => SignalType::DigitalBus,
            CaptureData::Analog(_) => SignalType::Analog,
            CaptureData::Ascii(_) => SignalType::Ascii,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            CaptureData::Digital(c) => c.len(),
            CaptureData::DigitalBus(c) => c.len(),
            CaptureData::Analog(c) => c.len(),
            CaptureData::Ascii(c) => c.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_digital(&self) -> Option<&DigitalCapture> {
        match self {
            CaptureData::Digital(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_digital_bus(&self) -> Option<&DigitalBusCapture> {
        match self {
            CaptureData::DigitalBus(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_analog(&self) -> Option<&AnalogCapture> {
        match self {
            CaptureData::Analog(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_ascii(&self) -> Option<&AsciiCapture> {
        match self {
            CaptureData::Ascii(c) => Some(c),
            _ => None,
        }
    }
}

impl fmt::Display for CaptureData {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CaptureData::Digital(c) => write!(f, "Digital{}", c),
            CaptureData::DigitalBus(c) => write!(f, "DigitalBus{}", c),
            CaptureData::Analog(c) => write!(f, "Analog{}", c),
            CaptureData::Ascii(c) => write!(f, "Ascii{}", c),
        }
    }
}
