use crate::rng::KEY_LEN;

/// Seam between the protocol and a concrete commitment construction.
///
/// A scheme publishes a binding, hiding tag first, opens to the committed
/// value and key second, and lets anyone check the pair against the tag.
pub trait CommitmentScheme {
    type Value;

    /// The tag to publish before the counterparty responds.
    fn published_tag(&self) -> String;

    /// Consume the commitment, releasing the value and the key.
    fn open(self) -> (Self::Value, [u8; KEY_LEN]);

    /// Recompute the tag from an opened pair and compare.
    fn check(tag: &str, value: Self::Value, key: &[u8]) -> bool;
}
