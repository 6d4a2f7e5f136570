pub mod scheme;

pub use scheme::CommitmentScheme;

use crate::rng::{FairRandom, KEY_LEN};
use hmac::{Hmac, Mac};
use rand::{CryptoRng, RngCore};
use sha3::Sha3_256;

type HmacSha3 = Hmac<Sha3_256>;

/// One-shot HMAC-SHA3-256 commitment over an integer.
///
/// The tag binds the value before the counterparty answers; revealing the
/// key afterwards lets the counterparty recompute the tag and confirm the
/// value never moved. A commitment is consumed by `reveal` and never reused.
///
/// The value is hashed as its decimal ASCII form, so tags can be reproduced
/// with stock command-line tools.
#[derive(Debug, Clone)]
pub struct HmacCommitment {
    key: [u8; KEY_LEN],
    value: u64,
    tag: Vec<u8>,
}

impl HmacCommitment {
    /// Commit to `value` under a fresh 256-bit key from the secure source.
    pub fn commit<R: RngCore + CryptoRng>(value: u64, rng: &mut FairRandom<R>) -> Self {
        let key = rng.secret_key();
        let tag = Self::tag_for(value, &key);
        Self { key, value, tag }
    }

    fn tag_for(value: u64, key: &[u8]) -> Vec<u8> {
        let mut mac = HmacSha3::new_from_slice(key).expect("HMAC accepts keys of any length");
        mac.update(value.to_string().as_bytes());
        mac.finalize().into_bytes().to_vec()
    }

    /// The committed value. Only meaningful to the committing side before
    /// reveal; it must not be shown to the counterparty while the tag is
    /// the only published half.
    pub fn value(&self) -> u64 {
        self.value
    }

    /// Lowercase hex tag for publication.
    pub fn tag_hex(&self) -> String {
        hex::encode(&self.tag)
    }

    /// Consume the commitment, handing out the value and the key.
    pub fn reveal(self) -> (u64, [u8; KEY_LEN]) {
        (self.value, self.key)
    }

    /// The counterparty's check: does the revealed pair reproduce the tag
    /// published earlier? Comparison is constant-time.
    pub fn verify(tag_hex: &str, value: u64, key: &[u8]) -> bool {
        let Ok(published) = hex::decode(tag_hex) else {
            return false;
        };
        let mut mac = match HmacSha3::new_from_slice(key) {
            Ok(mac) => mac,
            Err(_) => return false,
        };
        mac.update(value.to_string().as_bytes());
        mac.verify_slice(&published).is_ok()
    }
}

impl CommitmentScheme for HmacCommitment {
    type Value = u64;

    fn published_tag(&self) -> String {
        self.tag_hex()
    }

    fn open(self) -> (Self::Value, [u8; KEY_LEN]) {
        self.reveal()
    }

    fn check(tag: &str, value: Self::Value, key: &[u8]) -> bool {
        Self::verify(tag, value, key)
    }
}
