use {
    crate::{Hash256, Height, StdError, StdResult, sha2_256},
    borsh::{BorshDeserialize, BorshSerialize},
    serde::{Deserialize, Serialize},
    std::fmt::{self, Display, Formatter},
};

/// Sequence number of a packet on a channel. The first packet is sequence 1.
#[derive(
    Serialize,
    Deserialize,
    BorshSerialize,
    BorshDeserialize,
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
)]
#[serde(transparent)]
pub struct Sequence(u64);

impl Sequence {
    pub const ONE: Self = Self(1);

    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub const fn number(self) -> u64 {
        self.0
    }

    pub fn checked_increment(self) -> StdResult<Self> {
        self.0
            .checked_add(1)
            .map(Self)
            .ok_or_else(StdError::overflow::<Self>)
    }
}

impl From<u64> for Sequence {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<Sequence> for u64 {
    fn from(sequence: Sequence) -> Self {
        sequence.0
    }
}

impl Display for Sequence {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A sequence together with the digest stored under it, the element type of
/// commitment and acknowledgement listings.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacketDigest {
    pub sequence: Sequence,
    pub digest: Hash256,
}

/// Digest stored as the commitment of a sent packet:
///
/// ```plain
/// sha256(timeout_timestamp | timeout_height.revision_number | timeout_height.revision_height | sha256(data))
/// ```
///
/// All integers are 8-byte big-endian.
pub fn compute_packet_commitment(
    data: &[u8],
    timeout_height: Height,
    timeout_timestamp: u64,
) -> Hash256 {
    let mut preimage = Vec::with_capacity(8 * 3 + Hash256::LENGTH);
    preimage.extend_from_slice(&timeout_timestamp.to_be_bytes());
    preimage.extend_from_slice(&timeout_height.revision_number.to_be_bytes());
    preimage.extend_from_slice(&timeout_height.revision_height.to_be_bytes());
    preimage.extend_from_slice(&sha2_256(data));

    Hash256::from_inner(sha2_256(&preimage))
}

/// Digest stored for a written acknowledgement: the sha256 of its bytes.
pub fn compute_ack_commitment(ack: &[u8]) -> Hash256 {
    Hash256::from_inner(sha2_256(ack))
}
