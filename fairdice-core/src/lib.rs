//! Engine for a provably-fair non-transitive dice duel.
//!
//! The computer commits to every random decision with an HMAC-SHA3-256 tag
//! published before the human answers, then reveals the value together with
//! the one-time key so the human can recompute the tag and confirm the
//! decision was never altered.

pub mod commitment;
pub mod dice;
pub mod error;
pub mod game;
pub mod probability;
pub mod protocol;
pub mod rng;
pub mod transcript;

pub use commitment::{CommitmentScheme, HmacCommitment};
pub use dice::{Die, DicePool};
pub use error::{GameError, Result};
pub use game::{Game, GameIo, Outcome, Turn};
pub use protocol::{FairRound, RoundReveal};
pub use rng::FairRandom;
pub use transcript::{RoundPurpose, Transcript, TranscriptEntry};
