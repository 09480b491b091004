//! Fallback ontology identifiers for markers without one.
//!
//! A synthesized identifier has the form `UBERON:99` followed by a
//! zero-padded five digit integer in `1..=99999`, e.g. `UBERON:9900042`.
//!
//! # Strategy pattern
//!
//! [`IdentifierSource`] produces identifiers; [`IdentifierStrategyKind`]
//! selects an implementation from configuration.  The default
//! [`Random`](IdentifierStrategyKind::Random) strategy draws from the
//! thread-local RNG and is **not reproducible**: two exports of the
//! same model generally assign different identifiers.
//! [`Seeded`](IdentifierStrategyKind::Seeded) draws the same sequence
//! for the same seed, so exports with the same marker order are
//! byte-identical.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Prefix of every synthesized identifier.
pub const SYNTHETIC_ID_PREFIX: &str = "UBERON:99";

/// Largest number drawn for a synthesized identifier.
pub const MAX_SYNTHETIC_NUMBER: u32 = 99_999;

/// Selects how fallback identifiers are generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentifierStrategyKind {
    /// Thread-local RNG; different on every run.
    #[default]
    Random,

    /// Deterministic RNG seeded with `seed`.
    Seeded {
        /// RNG seed.
        seed: u64,
    },
}

impl IdentifierStrategyKind {
    /// Create a fresh identifier source for one export pass.
    #[must_use]
    pub fn source(self) -> Box<dyn IdentifierSource> {
        match self {
            Self::Random => Box::new(RngIdentifiers::new(rand::thread_rng())),
            Self::Seeded { seed } => Box::new(RngIdentifiers::new(StdRng::seed_from_u64(seed))),
        }
    }
}

/// Trait for fallback identifier generators.
pub trait IdentifierSource {
    /// Produce the next synthesized ontology identifier.
    fn next_identifier(&mut self) -> String;
}

/// Identifier source drawing uniformly from `1..=99999` with any RNG.
#[derive(Debug, Clone)]
pub struct RngIdentifiers<R> {
    rng: R,
}

impl<R: Rng> RngIdentifiers<R> {
    /// Wrap an RNG.
    #[must_use]
    pub const fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> IdentifierSource for RngIdentifiers<R> {
    fn next_identifier(&mut self) -> String {
        format_identifier(self.rng.gen_range(1..=MAX_SYNTHETIC_NUMBER))
    }
}

/// Format a number as a synthesized identifier.
#[must_use]
pub fn format_identifier(number: u32) -> String {
    format!("{SYNTHETIC_ID_PREFIX}{number:05}")
}
