use crate::commitment::HmacCommitment;
use crate::rng::{FairRandom, KEY_LEN};
use crate::{GameError, Result};
use rand::{CryptoRng, RngCore};

/// One commit-reveal round of the joint random protocol.
///
/// The computer's half is drawn and HMAC-published before the human's half
/// is read, and the human's half is fixed before the key is revealed, so
/// neither side can steer the combined number after seeing the other's
/// input.
pub struct FairRound {
    range: u64,
    commitment: HmacCommitment,
}

/// The opened side of a resolved round, everything the counterparty needs
/// to re-check the tag.
#[derive(Debug, Clone)]
pub struct RoundReveal {
    pub tag: String,
    pub value: u64,
    pub key: [u8; KEY_LEN],
    pub user_value: u64,
    pub range: u64,
}

impl FairRound {
    /// Draw a uniform value in `0..range` and commit to it.
    pub fn open<R: RngCore + CryptoRng>(rng: &mut FairRandom<R>, range: u64) -> Self {
        let value = rng.uniform(0, range - 1);
        let commitment = HmacCommitment::commit(value, rng);
        tracing::debug!(range, tag = %commitment.tag_hex(), "opened fair round");
        Self { range, commitment }
    }

    pub fn range(&self) -> u64 {
        self.range
    }

    /// The published half. Must reach the counterparty before their input
    /// is read.
    pub fn tag_hex(&self) -> String {
        self.commitment.tag_hex()
    }

    /// Close the round with the human's contribution.
    ///
    /// The reveal runs the same check a counterparty would: the opened pair
    /// must reproduce the published tag, otherwise the round is a protocol
    /// violation and the game aborts.
    pub fn resolve(self, user_value: u64) -> Result<RoundReveal> {
        let tag = self.commitment.tag_hex();
        let (value, key) = self.commitment.reveal();
        if !HmacCommitment::verify(&tag, value, &key) {
            return Err(GameError::CommitmentIntegrity);
        }
        Ok(RoundReveal {
            tag,
            value,
            key,
            user_value,
            range: self.range,
        })
    }
}

impl RoundReveal {
    /// The two contributions folded modulo the range.
    pub fn combined(&self) -> u64 {
        (self.value + self.user_value) % self.range
    }

    pub fn key_hex(&self) -> String {
        hex::encode(self.key)
    }
}
