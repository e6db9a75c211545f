//! Decoder registry for creating decoders by protocol name

use super::decoder::Decoder;
use super::errors::RegistryError;
use std::collections::BTreeMap;
use std::rc::Rc;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, error};

/// Builds a decoder given its display color
pub type DecoderFactory = Arc<dyn Fn(&str) -> Decoder + Send + Sync>;

/// Mapping from protocol name to decoder factory
#[derive(Default)]
pub struct DecoderRegistry {
    factories: BTreeMap<String, DecoderFactory>,
}

impl DecoderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory under `name`, replacing any earlier registration
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn(&str) -> Decoder + Send + Sync + 'static,
    {
        let name = name.into();
        debug!("Registering decoder '{}'", name);
        self.factories.insert(name, Arc::new(factory));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Factory registered under `name`
    pub fn factory(&self, name: &str) -> Result<DecoderFactory, RegistryError> {
        self.factories
            .get(name)
            .cloned()
            .ok_or_else(|| RegistryError::UnknownProtocol(name.to_string()))
    }

    /// Create a decoder, failing if `name` was never registered
    pub fn try_create(&self, name: &str, color: &str) -> Result<Rc<Decoder>, RegistryError> {
        let factory = self.factory(name)?;
        Ok(Rc::new(factory(color)))
    }

    /// Create a decoder, logging and returning `None` for unknown names
    pub fn create(&self, name: &str, color: &str) -> Option<Rc<Decoder>> {
        match self.try_create(name, color) {
            Ok(decoder) => Some(decoder),
            Err(e) => {
                error!("{}", e);
                None
            }
        }
    }

    /// Registered protocol names, sorted
    pub fn protocols(&self) -> Vec<String> {
        self.factories.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

// Process-wide registry, filled by explicit start-up registration
lazy_static::lazy_static! {
    static ref DECODER_REGISTRY: Mutex<DecoderRegistry> = Mutex::new(DecoderRegistry::new());
}

/// Run `f` against the process-wide registry.
///
/// Decoders are not `Send`; the lock only guards the factory table.
pub fn with_registry<R>(f: impl FnOnce(&mut DecoderRegistry) -> R) -> R {
    let mut registry = DECODER_REGISTRY
        .lock()
        .unwrap_or_else(PoisonError::into_inner);
    f(&mut registry)
}

/// Register a decoder factory in the process-wide registry
pub fn register_decoder<F>(name: impl Into<String>, factory: F)
where
    F: Fn(&str) -> Decoder + Send + Sync + 'static,
{
    with_registry(|registry| registry.register(name, factory));
}

/// Create a decoder from the process-wide registry.
///
/// The factory runs after the lock is released, so it may create other
/// decoders by name itself.
pub fn create_decoder(name: &str, color: &str) -> Option<Rc<Decoder>> {
    match with_registry(|registry| registry.factory(name)) {
        Ok(factory) => Some(Rc::new(factory(color))),
        Err(e) => {
            error!("{}", e);
            None
        }
    }
}

/// All protocol names in the process-wide registry
pub fn enumerate_protocols() -> Vec<String> {
    with_registry(|registry| registry.protocols())
}
