// Error types for the hardware plugin and its host-side plumbing

use std::num::ParseIntError;

use crate::hardware::LifecycleState;
use crate::motor::LinkError;

#[derive(Debug, thiserror::Error)]
pub enum HardwareError {
    #[error("Joint '{0}' is declared more than once")]
    DuplicateJoint(String),

    #[error("Missing hardware parameter '{0}'")]
    MissingParameter(String),

    #[error("Joint '{joint}' has {found} command interfaces found. 1 expected.")]
    CommandInterfaceCount { joint: String, found: usize },

    #[error("Joint '{joint}' have {found} command interfaces found. '{expected}' expected.")]
    CommandInterfaceKind {
        joint: String,
        found: String,
        expected: &'static str,
    },

    #[error("Joint '{joint}' has {found} state interface. 2 expected.")]
    StateInterfaceCount { joint: String, found: usize },

    #[error("Joint '{joint}' have '{found}' as first state interface. '{expected}' expected.")]
    FirstStateInterface {
        joint: String,
        found: String,
        expected: &'static str,
    },

    #[error("Joint '{joint}' have '{found}' as second state interface. '{expected}' expected.")]
    SecondStateInterface {
        joint: String,
        found: String,
        expected: &'static str,
    },

    #[error("Invalid command timeout '{value}': {source}")]
    InvalidTimeout {
        value: String,
        #[source]
        source: ParseIntError,
    },

    #[error("Hardware component has not been initialized")]
    NotInitialized,

    #[error("Motor controller is not connected")]
    NotConnected,

    #[error("Motor controller link error: {0}")]
    Link(#[from] LinkError),

    #[error("Cannot {transition} from {from:?} state")]
    InvalidTransition {
        from: LifecycleState,
        transition: &'static str,
    },

    #[error("No hardware plugin registered as '{0}'")]
    UnknownPlugin(String),

    #[error("No interface named '{0}'")]
    UnknownInterface(String),

    #[error("Invalid hardware description: {0}")]
    Description(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, HardwareError>;
