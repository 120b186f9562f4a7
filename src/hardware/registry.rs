// Plugin registry: hardware components instantiated by type name

use std::collections::HashMap;

use super::SystemInterface;
use crate::config::PLUGIN_NAME;
use crate::error::{HardwareError, Result};
use crate::plugin::EpmcHardwareInterface;

pub type Factory = fn() -> Box<dyn SystemInterface>;

#[derive(Default)]
pub struct HardwareRegistry {
    factories: HashMap<String, Factory>,
}

impl HardwareRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every plugin this crate provides
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry.register(PLUGIN_NAME, epmc);
        registry
    }

    /// Register a factory. A later registration under the same name wins.
    pub fn register(&mut self, name: &str, factory: Factory) {
        self.factories.insert(name.to_string(), factory);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Instantiate a registered plugin
    pub fn create(&self, name: &str) -> Result<Box<dyn SystemInterface>> {
        let factory = self
            .factories
            .get(name)
            .ok_or_else(|| HardwareError::UnknownPlugin(name.to_string()))?;
        Ok(factory())
    }
}

fn epmc() -> Box<dyn SystemInterface> {
    Box::new(EpmcHardwareInterface::new())
}
