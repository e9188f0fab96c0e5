pub mod config;
pub mod error;
pub mod types;

pub use config::{EngineConfig, EngineContext};
pub use error::{EngineError, Result};
pub use types::{AbilityId, AbilityKind, CharacterId, EntityRef, MobileId};
