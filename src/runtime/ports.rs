//! Input slot schemas for decoder nodes

use super::sample::SignalType;

/// Schema describing one named decoder input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputSchema {
    pub name: String,
    pub index: usize,
    /// Signal types this input accepts
    pub accepts: Vec<SignalType>,
}

impl InputSchema {
    /// Create a new input schema accepting a single signal type
    pub fn new(name: impl Into<String>, index: usize, accepts: SignalType) -> Self {
        Self {
            name: name.into(),
            index,
            accepts: vec![accepts],
        }
    }

    /// Also accept another signal type
    pub fn or(mut self, accepts: SignalType) -> Self {
        if !self.accepts.contains(&accepts) {
            self.accepts.push(accepts);
        }
        self
    }

    pub fn accepts(&self, signal_type: SignalType) -> bool {
        self.accepts.contains(&signal_type)
    }
}
