// Hardware description handed to a component at init

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::error::{HardwareError, Result};

/// Standard interface kinds
pub const HW_IF_POSITION: &str = "position";
pub const HW_IF_VELOCITY: &str = "velocity";

/// One interface declared on a joint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterfaceInfo {
    pub name: String,
}

impl InterfaceInfo {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }
}

/// A joint and the interfaces it declares, in declaration order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentInfo {
    pub name: String,
    #[serde(default)]
    pub command_interfaces: Vec<InterfaceInfo>,
    #[serde(default)]
    pub state_interfaces: Vec<InterfaceInfo>,
}

impl ComponentInfo {
    pub fn new(name: &str, command_interfaces: &[&str], state_interfaces: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            command_interfaces: command_interfaces.iter().map(|n| InterfaceInfo::new(n)).collect(),
            state_interfaces: state_interfaces.iter().map(|n| InterfaceInfo::new(n)).collect(),
        }
    }
}

/// Full description of one hardware component
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HardwareInfo {
    pub name: String,
    /// Registered plugin type to instantiate
    pub plugin: String,
    #[serde(default)]
    pub hardware_parameters: HashMap<String, String>,
    #[serde(default)]
    pub joints: Vec<ComponentInfo>,
}

impl HardwareInfo {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Initialization shared by every component: take a copy of the description
/// after checking joint names are unique.
pub fn init_base(info: &HardwareInfo) -> Result<HardwareInfo> {
    let mut seen = HashSet::new();
    for joint in &info.joints {
        if !seen.insert(joint.name.as_str()) {
            return Err(HardwareError::DuplicateJoint(joint.name.clone()));
        }
    }
    Ok(info.clone())
}
