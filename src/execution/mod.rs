//! Ability execution: precondition gate, orchestration and effect application

pub mod effects;
pub mod executor;
pub mod gate;

pub use effects::{apply_effects, apply_effects_to_self, EffectInstance, EffectOutcome, EffectRegistry};
pub use executor::{AbilityExecutor, ExecutionResult};
pub use gate::{CheckResult, PreconditionGate};
