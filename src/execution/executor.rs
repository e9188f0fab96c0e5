//! The single entry point features call to run an ability
//!
//! Player flow: gate, caller logic, cooldown, proficiency growth. The cooldown
//! is applied whenever the gate passes, whether or not the caller's logic
//! reports success, and always before the growth check runs.

use crate::core::types::{CharacterId, EntityRef, MobileId};
use crate::execution::gate::{CheckResult, PreconditionGate};
use crate::skills::definitions::{AbilityDescriptor, AbilityRequest};
use crate::skills::proficiency::{ProficiencyDelta, ProficiencyEngine, ProficiencyOutcome, ProficiencyRecord};
use rand::Rng;

/// What happened when a player tried an ability
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
    /// The gate passed and the caller's logic ran
    pub executed: bool,
    /// The caller's logic reported success
    pub succeeded: bool,
    pub pre_check_failure: Option<String>,
    /// Present when a proficiency record was supplied
    pub proficiency: Option<ProficiencyOutcome>,
}

impl ExecutionResult {
    pub fn blocked(reason: impl Into<String>) -> Self {
        Self {
            executed: false,
            succeeded: false,
            pre_check_failure: Some(reason.into()),
            proficiency: None,
        }
    }

    pub fn proficiency_delta(&self) -> Option<ProficiencyDelta> {
        self.proficiency.as_ref().map(|p| p.delta)
    }

    pub fn proficiency_improved(&self) -> bool {
        self.proficiency.as_ref().map_or(false, ProficiencyOutcome::improved)
    }

    /// "Your X has improved! (N% -> N+1%)" when growth happened
    pub fn proficiency_message(&self) -> Option<String> {
        self.proficiency
            .as_ref()
            .and_then(ProficiencyOutcome::improvement_message)
    }
}

/// Runs abilities with consistent cooldown, precondition and growth behavior
#[derive(Debug, Clone)]
pub struct AbilityExecutor {
    gate: PreconditionGate,
    proficiency: ProficiencyEngine,
}

impl AbilityExecutor {
    pub fn new(gate: PreconditionGate, proficiency: ProficiencyEngine) -> Self {
        Self { gate, proficiency }
    }

    pub fn gate(&self) -> &PreconditionGate {
        &self.gate
    }

    /// Gate check alone; a stunned player still loses the stun
    pub fn check_only<'a>(
        &self,
        name: &str,
        character: Option<CharacterId>,
        ability: impl Into<AbilityRequest<'a>>,
    ) -> CheckResult {
        self.gate.check_player_and_consume_stun(name, character, ability)
    }

    pub fn execute_player<'a, F>(
        &self,
        name: &str,
        character: Option<CharacterId>,
        ability: impl Into<AbilityRequest<'a>>,
        record: Option<&mut ProficiencyRecord>,
        logic: F,
    ) -> ExecutionResult
    where
        F: FnOnce() -> bool,
    {
        self.execute_player_with_rng(name, character, ability, record, logic, &mut rand::thread_rng())
    }

    /// Player execution drawing growth rolls from `rng`
    pub fn execute_player_with_rng<'a, F, R>(
        &self,
        name: &str,
        character: Option<CharacterId>,
        ability: impl Into<AbilityRequest<'a>>,
        record: Option<&mut ProficiencyRecord>,
        logic: F,
        rng: &mut R,
    ) -> ExecutionResult
    where
        F: FnOnce() -> bool,
        R: Rng + ?Sized,
    {
        let request = ability.into();
        if let CheckResult::Failed { reason } =
            self.gate.check_player_and_consume_stun(name, character, request)
        {
            return ExecutionResult::blocked(reason);
        }
        let Some(ability) = request.descriptor() else {
            return ExecutionResult::blocked(format!("Invalid {}.", request.kind().noun()));
        };

        let succeeded = logic();
        let proficiency = self.record_use_with_rng(name, ability, record, succeeded, rng);

        ExecutionResult {
            executed: true,
            succeeded,
            pre_check_failure: None,
            proficiency,
        }
    }

    /// Post-execution bookkeeping for callers that ran their own checks
    ///
    /// Applies the cooldown, then runs the growth check if a record is given.
    pub fn record_use(
        &self,
        name: &str,
        ability: &AbilityDescriptor,
        record: Option<&mut ProficiencyRecord>,
        succeeded: bool,
    ) -> Option<ProficiencyOutcome> {
        self.record_use_with_rng(name, ability, record, succeeded, &mut rand::thread_rng())
    }

    pub fn record_use_with_rng<R: Rng + ?Sized>(
        &self,
        name: &str,
        ability: &AbilityDescriptor,
        record: Option<&mut ProficiencyRecord>,
        succeeded: bool,
        rng: &mut R,
    ) -> Option<ProficiencyOutcome> {
        self.gate.apply_cooldown(&EntityRef::player(name), ability);
        record.map(|record| self.proficiency.check_growth(ability, record, succeeded, rng))
    }

    /// Mobile execution: no growth, and the logic's own result is ignored
    ///
    /// Returns whether the ability ran.
    pub fn execute_mobile<'a, F>(
        &self,
        mobile: MobileId,
        ability: impl Into<AbilityRequest<'a>>,
        in_combat: bool,
        logic: F,
    ) -> bool
    where
        F: FnOnce() -> bool,
    {
        let request = ability.into();
        if self
            .gate
            .check_mobile_and_consume_stun(mobile, request, in_combat)
            .is_failure()
        {
            return false;
        }
        let Some(ability) = request.descriptor() else {
            return false;
        };

        let _ = logic();
        self.gate.apply_cooldown(&EntityRef::mobile(mobile), ability);
        true
    }
}
