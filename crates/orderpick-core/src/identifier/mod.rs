//! Location identifier generation
//!
//! A new location gets an external identifier of the form
//! `prefix + org id + six random digits`. The candidate is checked
//! against a uniqueness oracle; on a collision the suffix of the colliding
//! value is incremented by one and the check repeats.
//!
//! Checks run strictly one after another. The walk stops on:
//! - a free candidate (returned)
//! - `max_collisions` collisions in a row (`CollisionLimit`, 0 = no limit)
//! - `max_oracle_failures` consecutive oracle errors (`OracleUnavailable`)
//! - cancellation through the [`CancelToken`] (`Interrupted`)
//!
//! The generator sets no deadline on oracle calls; bounding a slow check is
//! the oracle's job, and a timed-out check counts as an oracle failure.

mod candidate;
mod oracle;
mod seed;

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::config::IdentifierConfig;
use crate::error::{OrderpickError, Result};
use crate::model::OrgId;

pub use candidate::IdentifierCandidate;
pub use oracle::{FileOracle, OracleError, SetOracle, UniquenessOracle};
pub use seed::{suffix_space, ClockSeed, FixedSeed, SeedSource};

/// Organization context a location is created under
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrgContext {
    pub org_id: OrgId,
}

impl OrgContext {
    pub fn new(org_id: impl Into<OrgId>) -> Self {
        OrgContext {
            org_id: org_id.into(),
        }
    }
}

/// Where the generator is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeneratorPhase {
    Init,
    CandidateGenerated,
    Valid,
    Collided,
    Finalized,
}

impl fmt::Display for GeneratorPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GeneratorPhase::Init => "init",
            GeneratorPhase::CandidateGenerated => "candidate_generated",
            GeneratorPhase::Valid => "valid",
            GeneratorPhase::Collided => "collided",
            GeneratorPhase::Finalized => "finalized",
        };
        f.write_str(name)
    }
}

/// Shared flag for abandoning a generation in progress
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// A finalized identifier and how it was reached
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedIdentifier {
    pub value: String,
    /// Candidates the oracle reported as taken
    pub collisions: u32,
    /// Oracle errors tolerated along the way
    pub oracle_failures: u32,
}

pub struct IdentifierGenerator<O, S = ClockSeed> {
    oracle: O,
    seed: S,
    config: IdentifierConfig,
    cancel: CancelToken,
    phase: GeneratorPhase,
}

impl<O: UniquenessOracle> IdentifierGenerator<O, ClockSeed> {
    pub fn new(oracle: O, config: IdentifierConfig) -> Self {
        Self::with_seed(oracle, ClockSeed, config)
    }
}

impl<O: UniquenessOracle, S: SeedSource> IdentifierGenerator<O, S> {
    pub fn with_seed(oracle: O, seed: S, config: IdentifierConfig) -> Self {
        IdentifierGenerator {
            oracle,
            seed,
            config,
            cancel: CancelToken::new(),
            phase: GeneratorPhase::Init,
        }
    }

    /// Share a cancellation token with the hosting dialog
    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn phase(&self) -> GeneratorPhase {
        self.phase
    }

    /// Generate a free identifier for the organization
    pub fn generate(&mut self, org: &OrgContext) -> Result<String> {
        self.generate_detailed(org).map(|generated| generated.value)
    }

    pub fn generate_detailed(&mut self, org: &OrgContext) -> Result<GeneratedIdentifier> {
        self.enter(GeneratorPhase::Init);
        let width = self.config.suffix_width;
        let suffix = self.seed.seed(&org.org_id, width);
        let candidate =
            IdentifierCandidate::new(self.config.prefix.clone(), org.org_id.clone(), suffix, width);
        self.walk(candidate, 0)
    }

    /// Continue from a value known to be taken, e.g. one the user typed.
    ///
    /// The first candidate checked is the taken value plus one.
    pub fn next_available(&mut self, org: &OrgContext, taken: &str) -> Result<GeneratedIdentifier> {
        self.enter(GeneratorPhase::Init);
        let colliding = IdentifierCandidate::parse(
            taken,
            &self.config.prefix,
            &org.org_id,
            self.config.suffix_width,
        )?;
        self.enter(GeneratorPhase::Collided);
        self.walk(colliding.next(), 1)
    }

    fn walk(&mut self, first: IdentifierCandidate, collisions: u32) -> Result<GeneratedIdentifier> {
        let start = Instant::now();
        let mut candidate = first;
        let mut collisions = collisions;
        let mut consecutive_failures = 0u32;
        let mut oracle_failures = 0u32;

        loop {
            self.enter(GeneratorPhase::CandidateGenerated);
            if self.cancel.is_cancelled() {
                tracing::debug!(candidate = %candidate, "identifier generation cancelled");
                return Err(OrderpickError::Interrupted);
            }

            let value = candidate.to_string();
            match self.oracle.is_available(&value) {
                Ok(true) => {
                    self.enter(GeneratorPhase::Valid);
                    self.enter(GeneratorPhase::Finalized);
                    crate::trace_time!(start, "generate_identifier", collisions = collisions);
                    tracing::debug!(identifier = %value, collisions, "identifier finalized");
                    return Ok(GeneratedIdentifier {
                        value,
                        collisions,
                        oracle_failures,
                    });
                }
                Ok(false) => {
                    self.enter(GeneratorPhase::Collided);
                    consecutive_failures = 0;
                    collisions += 1;
                    tracing::debug!(candidate = %value, collisions, "identifier taken");
                    let limit = self.config.max_collisions;
                    if limit > 0 && collisions >= limit {
                        return Err(OrderpickError::CollisionLimit {
                            attempts: collisions,
                            last: value,
                        });
                    }
                    candidate = candidate.next();
                }
                Err(e) => {
                    consecutive_failures += 1;
                    oracle_failures += 1;
                    tracing::warn!(
                        candidate = %value,
                        attempt = consecutive_failures,
                        error = %e,
                        "identifier oracle failed"
                    );
                    if consecutive_failures >= self.config.max_oracle_failures {
                        return Err(OrderpickError::OracleUnavailable {
                            attempts: consecutive_failures,
                            reason: e.to_string(),
                        });
                    }
                }
            }
        }
    }

    fn enter(&mut self, phase: GeneratorPhase) {
        tracing::trace!(from = %self.phase, to = %phase, "generator phase");
        self.phase = phase;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::time::Duration;

    /// Oracle that replays scripted answers and records what it was asked
    struct Scripted {
        answers: RefCell<Vec<std::result::Result<bool, OracleError>>>,
        asked: RefCell<Vec<String>>,
    }

    impl Scripted {
        fn new(answers: Vec<std::result::Result<bool, OracleError>>) -> Self {
            Scripted {
                answers: RefCell::new(answers.into_iter().rev().collect()),
                asked: RefCell::new(Vec::new()),
            }
        }
    }

    impl UniquenessOracle for Scripted {
        fn is_available(&self, candidate: &str) -> std::result::Result<bool, OracleError> {
            self.asked.borrow_mut().push(candidate.to_string());
            self.answers.borrow_mut().pop().unwrap_or(Ok(true))
        }
    }

    fn org() -> OrgContext {
        OrgContext::new("42")
    }

    #[test]
    fn test_free_seed_is_used_as_is() {
        let mut generator =
            IdentifierGenerator::with_seed(SetOracle::default(), FixedSeed(317), IdentifierConfig::default());
        let generated = generator.generate_detailed(&org()).unwrap();

        assert_eq!(generated.value, "LI42000317");
        assert_eq!(generated.collisions, 0);
        assert_eq!(generator.phase(), GeneratorPhase::Finalized);
    }

    #[test]
    fn test_collision_walk_increments_previous_suffix() {
        let oracle = SetOracle::new(["LI42000001", "LI42000002"]);
        let mut generator =
            IdentifierGenerator::with_seed(oracle, FixedSeed(1), IdentifierConfig::default());

        let generated = generator.generate_detailed(&org()).unwrap();
        assert_eq!(generated.value, "LI42000003");
        assert_eq!(generated.collisions, 2);
    }

    #[test]
    fn test_collision_limit() {
        let oracle = SetOracle::new(["LI42000001", "LI42000002", "LI42000003"]);
        let config = IdentifierConfig {
            max_collisions: 2,
            ..Default::default()
        };
        let mut generator = IdentifierGenerator::with_seed(oracle, FixedSeed(1), config);

        let err = generator.generate(&org()).unwrap_err();
        assert!(matches!(
            err,
            OrderpickError::CollisionLimit { attempts: 2, ref last } if last == "LI42000002"
        ));
    }

    #[test]
    fn test_oracle_failure_does_not_advance_suffix() {
        let oracle = Scripted::new(vec![
            Err(OracleError::Timeout(Duration::from_secs(5))),
            Ok(false),
            Err(OracleError::Unavailable("reset".into())),
            Ok(true),
        ]);
        let mut generator =
            IdentifierGenerator::with_seed(&oracle, FixedSeed(10), IdentifierConfig::default());

        let generated = generator.generate_detailed(&org()).unwrap();
        assert_eq!(generated.value, "LI42000011");
        assert_eq!(generated.collisions, 1);
        assert_eq!(generated.oracle_failures, 2);
        assert_eq!(
            *oracle.asked.borrow(),
            vec!["LI42000010", "LI42000010", "LI42000011", "LI42000011"]
        );
    }

    #[test]
    fn test_consecutive_oracle_failures_abort() {
        let down = || Err(OracleError::Unavailable("connection refused".into()));
        let oracle = Scripted::new(vec![down(), down(), down(), Ok(true)]);
        let mut generator =
            IdentifierGenerator::with_seed(&oracle, FixedSeed(10), IdentifierConfig::default());

        let err = generator.generate(&org()).unwrap_err();
        assert!(matches!(err, OrderpickError::OracleUnavailable { attempts: 3, .. }));
        assert!(err.is_retryable());
        assert_eq!(oracle.asked.borrow().len(), 3);
    }

    #[test]
    fn test_cancelled_before_first_check() {
        let oracle = Scripted::new(vec![]);
        let mut generator =
            IdentifierGenerator::with_seed(&oracle, FixedSeed(10), IdentifierConfig::default());
        generator.cancel_token().cancel();

        let err = generator.generate(&org()).unwrap_err();
        assert!(matches!(err, OrderpickError::Interrupted));
        assert!(oracle.asked.borrow().is_empty());
    }

    #[test]
    fn test_next_available_starts_after_taken_value() {
        let oracle = SetOracle::new(["LI42000500", "LI42000501"]);
        let mut generator =
            IdentifierGenerator::with_seed(oracle, FixedSeed(0), IdentifierConfig::default());

        let generated = generator.next_available(&org(), "LI42000500").unwrap();
        assert_eq!(generated.value, "LI42000502");
        assert_eq!(generated.collisions, 2);
    }

    #[test]
    fn test_next_available_rejects_foreign_value() {
        let mut generator =
            IdentifierGenerator::with_seed(SetOracle::default(), FixedSeed(0), IdentifierConfig::default());
        assert!(generator.next_available(&org(), "XX99").is_err());
    }
}
