use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Duplicate ability in catalog: {kind} {id}")]
    DuplicateAbility {
        kind: crate::core::types::AbilityKind,
        id: crate::core::types::AbilityId,
    },
}

pub type Result<T> = std::result::Result<T, EngineError>;
