//! Decoder graph nodes
//!
//! A [`Decoder`] owns a fixed set of named inputs, a set of named parameters
//! and an output capture. Inputs are shared [`ChannelHandle`]s, so a channel
//! stays alive while any decoder still has it bound.
//!
//! Output is recomputed lazily: structural changes mark the node dirty and
//! [`Channel::refresh_if_dirty`] walks the inputs depth-first before
//! recomputing. Each node recomputes at most once per pass because the flag is
//! cleared afterwards. The graph must be acyclic; cycles are not detected.

use super::errors::{BindError, ParameterError};
use super::node::{Channel, ChannelHandle, Protocol};
use super::palette::{Category, StandardColor, ascii_text};
use super::parameter::ParameterValue;
use super::ports::InputSchema;
use super::sample::{CaptureData, SignalType};
use std::cell::{Cell, Ref, RefCell, RefMut};
use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, error};

/// Decoder parameters by name, in name order
pub type Parameters = BTreeMap<String, ParameterValue>;

/// A protocol decoder node in the channel graph
pub struct Decoder {
    protocol_name: String,
    category: Category,
    output_type: SignalType,
    schema: Vec<InputSchema>,
    protocol: RefCell<Box<dyn Protocol>>,

    display_name: RefCell<String>,
    hwname: RefCell<String>,
    color: RefCell<String>,

    /// One entry per schema slot, `None` when unconnected
    channels: RefCell<Vec<Option<ChannelHandle>>>,
    parameters: RefCell<Parameters>,
    output: RefCell<Option<CaptureData>>,
    dirty: Cell<bool>,
}

impl Decoder {
    /// Wrap a protocol implementation in a new, dirty decoder node
    pub fn new<P: Protocol + 'static>(protocol: P, color: impl Into<String>) -> Self {
        let schema = protocol.input_schema();
        let parameters = protocol.parameters().into_iter().collect();
        let channels = vec![None; schema.len()];

        Self {
            protocol_name: protocol.protocol_name().to_string(),
            category: protocol.category(),
            output_type: protocol.output_type(),
            schema,
            protocol: RefCell::new(Box::new(protocol)),
            display_name: RefCell::new(String::new()),
            hwname: RefCell::new(String::new()),
            color: RefCell::new(color.into()),
            channels: RefCell::new(channels),
            parameters: RefCell::new(parameters),
            output: RefCell::new(None),
            dirty: Cell::new(true),
        }
    }

    /// With a display name and matching hardware name
    pub fn with_name(self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.set_hwname(name.clone());
        self.set_display_name(name);
        self
    }

    pub fn protocol_name(&self) -> &str {
        &self.protocol_name
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn is_overlay(&self) -> bool {
        self.protocol.borrow().is_overlay()
    }

    pub fn set_display_name(&self, name: impl Into<String>) {
        *self.display_name.borrow_mut() = name.into();
    }

    pub fn set_hwname(&self, name: impl Into<String>) {
        *self.hwname.borrow_mut() = name.into();
    }

    pub fn set_color(&self, color: impl Into<String>) {
        *self.color.borrow_mut() = color.into();
    }

    // ── Inputs ───────────────────────────────────────────────────────────

    pub fn input_count(&self) -> usize {
        self.schema.len()
    }

    pub fn input_schema(&self) -> &[InputSchema] {
        &self.schema
    }

    /// Name of input `i`, or an empty string if out of range
    pub fn input_name(&self, i: usize) -> &str {
        match self.schema.get(i) {
            Some(schema) => &schema.name,
            None => {
                error!("Invalid input index {} on decoder '{}'", i, self.protocol_name);
                ""
            }
        }
    }

    pub fn input_index(&self, name: &str) -> Option<usize> {
        self.schema.iter().position(|s| s.name == name)
    }

    /// Channel bound to input `i`, if any
    pub fn input(&self, i: usize) -> Option<ChannelHandle> {
        if i >= self.schema.len() {
            error!("Invalid input index {} on decoder '{}'", i, self.protocol_name);
            return None;
        }
        self.channels.borrow()[i].clone()
    }

    /// Bind `channel` to input `i`, releasing whatever was bound before.
    ///
    /// `None` always succeeds and leaves the input unconnected. A channel that
    /// fails the protocol's compatibility check is logged and bound anyway.
    pub fn set_input(&self, i: usize, channel: Option<ChannelHandle>) -> Result<(), BindError> {
        if i >= self.schema.len() {
            error!("Invalid input index {} on decoder '{}'", i, self.protocol_name);
            return Err(BindError::SlotOutOfRange(i, self.protocol_name.clone()));
        }

        if let Some(ch) = &channel
            && !self.protocol.borrow().validate_channel(i, ch.as_ref())
        {
            error!(
                "Invalid channel format: {:?} channel '{}' on input '{}' of decoder '{}'",
                ch.signal_type(),
                ch.display_name(),
                self.schema[i].name,
                self.protocol_name
            );
        }

        let previous = std::mem::replace(&mut self.channels.borrow_mut()[i], channel);
        drop(previous);

        self.dirty.set(true);
        Ok(())
    }

    /// Bind `channel` to the input called `name`
    pub fn set_input_by_name(
        &self,
        name: &str,
        channel: Option<ChannelHandle>,
    ) -> Result<(), BindError> {
        match self.input_index(name) {
            Some(i) => self.set_input(i, channel),
            None => {
                error!("Invalid input name '{}' on decoder '{}'", name, self.protocol_name);
                Err(BindError::SlotNotFound(name.to_string(), self.protocol_name.clone()))
            }
        }
    }

    // ── Parameters ───────────────────────────────────────────────────────

    pub fn parameter_names(&self) -> Vec<String> {
        self.parameters.borrow().keys().cloned().collect()
    }

    /// All parameters, in name order
    pub fn parameters(&self) -> Ref<'_, Parameters> {
        self.parameters.borrow()
    }

    /// Current value of a parameter
    pub fn parameter(&self, name: &str) -> Option<ParameterValue> {
        let value = self.parameters.borrow().get(name).cloned();
        if value.is_none() {
            error!("Invalid parameter name '{}' on decoder '{}'", name, self.protocol_name);
        }
        value
    }

    /// Mutable access to a parameter. Marks the decoder dirty.
    pub fn parameter_mut(&self, name: &str) -> Result<RefMut<'_, ParameterValue>, ParameterError> {
        match RefMut::filter_map(self.parameters.borrow_mut(), |p| p.get_mut(name)) {
            Ok(value) => {
                self.dirty.set(true);
                Ok(value)
            }
            Err(_) => {
                error!("Invalid parameter name '{}' on decoder '{}'", name, self.protocol_name);
                Err(ParameterError::NotFound(
                    name.to_string(),
                    self.protocol_name.clone(),
                ))
            }
        }
    }

    /// Parse `text` into the named parameter
    pub fn set_parameter_text(&self, name: &str, text: &str) -> Result<(), ParameterError> {
        self.parameter_mut(name)?.parse_text(text);
        Ok(())
    }

    // ── Refresh ──────────────────────────────────────────────────────────

    pub fn is_dirty(&self) -> bool {
        self.dirty.get()
    }

    /// Force recomputation on the next refresh pass
    pub fn set_dirty(&self) {
        self.dirty.set(true);
    }

    /// Recompute the output now from the inputs as they currently are
    pub fn refresh(&self) {
        let inputs = self.channels.borrow().clone();
        self.recompute(&inputs);
    }

    fn recompute(&self, inputs: &[Option<ChannelHandle>]) {
        let output = {
            let parameters = self.parameters.borrow();
            self.protocol.borrow_mut().refresh(inputs, &parameters)
        };

        debug!(
            "Refreshed decoder '{}' ({}): {} samples",
            self.display_name.borrow(),
            self.protocol_name,
            output.as_ref().map_or(0, |o| o.len())
        );

        *self.output.borrow_mut() = output;
    }

    // ── Presentation ─────────────────────────────────────────────────────

    /// Palette entry for output sample `i`
    pub fn sample_color(&self, i: usize) -> StandardColor {
        match self.output.borrow().as_ref() {
            Some(output) if i < output.len() => self.protocol.borrow().sample_color(output, i),
            _ => StandardColor::Error,
        }
    }

    /// Label for output sample `i`
    pub fn sample_text(&self, i: usize) -> String {
        match self.output.borrow().as_ref() {
            Some(output) if i < output.len() => self.protocol.borrow().sample_text(output, i),
            _ => String::new(),
        }
    }

    /// Label for sample `i` of a textual output, empty for other outputs
    pub fn text_for_ascii_channel(&self, i: usize) -> String {
        self.output
            .borrow()
            .as_ref()
            .and_then(|o| o.as_ascii())
            .and_then(|capture| capture.samples.get(i))
            .map(|sample| ascii_text(sample.value))
            .unwrap_or_default()
    }
}

impl Channel for Decoder {
    fn display_name(&self) -> String {
        self.display_name.borrow().clone()
    }

    fn hwname(&self) -> String {
        self.hwname.borrow().clone()
    }

    fn color(&self) -> String {
        self.color.borrow().clone()
    }

    fn is_physical(&self) -> bool {
        false
    }

    fn signal_type(&self) -> SignalType {
        self.output_type
    }

    fn data(&self) -> Option<Ref<'_, CaptureData>> {
        Ref::filter_map(self.output.borrow(), |o| o.as_ref()).ok()
    }

    fn refresh_if_dirty(&self) {
        if !self.dirty.get() {
            return;
        }

        let inputs = self.channels.borrow().clone();
        for input in inputs.iter().flatten() {
            input.refresh_if_dirty();
        }

        self.recompute(&inputs);
        self.dirty.set(false);
    }

    fn as_decoder(&self) -> Option<&Decoder> {
        Some(self)
    }
}

impl fmt::Debug for Decoder {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Decoder")
            .field("protocol", &self.protocol_name)
            .field("name", &self.display_name.borrow())
            .field("inputs", &self.schema.len())
            .field("dirty", &self.dirty.get())
            .finish()
    }
}

impl Drop for Decoder {
    fn drop(&mut self) {
        debug!(
            "Destroying decoder '{}' ({}), releasing {} inputs",
            self.display_name.get_mut(),
            self.protocol_name,
            self.channels.get_mut().iter().flatten().count()
        );
    }
}
