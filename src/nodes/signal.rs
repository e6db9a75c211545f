//! Acquisition channel source
//!
//! Provides `SignalChannel` - a physical channel whose capture buffer is
//! filled by the acquisition side and read by decoders bound to it.

use crate::runtime::node::Channel;
use crate::runtime::sample::{CaptureData, SignalType};
use std::cell::{Ref, RefCell};
use tracing::warn;

/// A physical scope or logic analyzer channel
///
/// Always current as far as the decoder graph is concerned: refreshing a
/// decoder never re-acquires its source channels.
#[derive(Debug)]
pub struct SignalChannel {
    hwname: String,
    display_name: RefCell<String>,
    color: String,
    signal_type: SignalType,
    data: RefCell<Option<CaptureData>>,
}

impl SignalChannel {
    pub fn new(hwname: impl Into<String>, color: impl Into<String>, signal_type: SignalType) -> Self {
        let hwname = hwname.into();
        Self {
            display_name: RefCell::new(hwname.clone()),
            hwname,
            color: color.into(),
            signal_type,
            data: RefCell::new(None),
        }
    }

    /// With a display name different from the hardware name
    pub fn with_display_name(self, name: impl Into<String>) -> Self {
        self.set_display_name(name);
        self
    }

    pub fn set_display_name(&self, name: impl Into<String>) {
        *self.display_name.borrow_mut() = name.into();
    }

    /// Replace the capture buffer. Downstream decoders must be marked dirty
    /// by the caller.
    pub fn set_data(&self, data: CaptureData) {
        if data.signal_type() != self.signal_type {
            warn!(
                "Channel '{}' is {:?} but received a {:?} capture",
                self.hwname,
                self.signal_type,
                data.signal_type()
            );
        }
        *self.data.borrow_mut() = Some(data);
    }

    pub fn clear_data(&self) {
        *self.data.borrow_mut() = None;
    }
}

impl Channel for SignalChannel {
    fn display_name(&self) -> String {
        self.display_name.borrow().clone()
    }

    fn hwname(&self) -> String {
        self.hwname.clone()
    }

    fn color(&self) -> String {
        self.color.clone()
    }

    fn is_physical(&self) -> bool {
        true
    }

    fn signal_type(&self) -> SignalType {
        self.signal_type
    }

    fn data(&self) -> Option<Ref<'_, CaptureData>> {
        Ref::filter_map(self.data.borrow(), |d| d.as_ref()).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::sample::AnalogCapture;

    #[test]
    fn test_signal_channel() {
        let channel = SignalChannel::new("CH1", "#ffff00", SignalType::Analog).with_display_name("clk");
        assert!(channel.is_physical());
        assert!(channel.as_decoder().is_none());
        assert_eq!(channel.hwname(), "CH1");
        assert_eq!(channel.display_name(), "clk");
        assert!(channel.data().is_none());

        channel.set_data(CaptureData::Analog(AnalogCapture::uniform(&[0.0, 1.0, 0.5], 1000)));
        assert_eq!(channel.data().map(|d| d.len()), Some(3));

        channel.clear_data();
        assert!(channel.data().is_none());
    }
}
