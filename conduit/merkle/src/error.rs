use {conduit_types::Hash256, thiserror::Error};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProofError {
    #[error("incorrect proof type, expect {expect}, got {actual}")]
    IncorrectProofType {
        expect: &'static str,
        actual: &'static str,
    },

    #[error("root hash mismatch! computed: {computed}, actual: {actual}")]
    RootHashMismatch { computed: Hash256, actual: Hash256 },

    #[error("leaf index {index} is out of range for a tree of {leaf_count} leaves")]
    IndexOutOfRange { index: u64, leaf_count: u64 },

    #[error("sibling path has the wrong length for leaf {index} of {leaf_count}")]
    MalformedPath { index: u64, leaf_count: u64 },

    #[error("neighbor proof is for a tree of {actual} leaves, expecting {expect}")]
    LeafCountMismatch { expect: u64, actual: u64 },

    #[error("neighbor key is not on the correct side of the key being proven")]
    NeighborOutOfOrder,

    #[error("neighbors are not adjacent leaves: left {left:?}, right {right:?}")]
    NotAdjacent {
        left: Option<u64>,
        right: Option<u64>,
    },
}

pub type ProofResult<T> = core::result::Result<T, ProofError>;
