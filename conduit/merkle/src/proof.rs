use {
    crate::{ProofError, ProofResult, hash_internal_node, hash_leaf_node, hash_record},
    borsh::{BorshDeserialize, BorshSerialize},
    conduit_types::{Binary, Hash256, HashExt},
    serde::{Deserialize, Serialize},
};

#[derive(Serialize, Deserialize, BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Proof {
    Membership(MembershipProof),
    NonMembership(NonMembershipProof),
}

impl Proof {
    fn kind(&self) -> &'static str {
        match self {
            Proof::Membership(_) => "membership",
            Proof::NonMembership(_) => "non-membership",
        }
    }
}

/// Position of a leaf plus the sibling hashes on its path to the root, ordered
/// from the leaf upwards.
#[derive(Serialize, Deserialize, BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq)]
pub struct MembershipProof {
    pub index: u64,
    pub leaf_count: u64,
    pub sibling_hashes: Vec<Hash256>,
}

impl MembershipProof {
    /// Recompute the root hash from a leaf hash, following RFC 9162 section
    /// 2.1.3.2.
    pub fn compute_root(&self, leaf_hash: Hash256) -> ProofResult<Hash256> {
        if self.index >= self.leaf_count {
            return Err(ProofError::IndexOutOfRange {
                index: self.index,
                leaf_count: self.leaf_count,
            });
        }

        let malformed = || ProofError::MalformedPath {
            index: self.index,
            leaf_count: self.leaf_count,
        };

        let mut fnode = self.index;
        let mut snode = self.leaf_count - 1;
        let mut hash = leaf_hash;

        for sibling in &self.sibling_hashes {
            if snode == 0 {
                return Err(malformed());
            }

            if fnode & 1 == 1 || fnode == snode {
                hash = hash_internal_node(*sibling, hash);
                if fnode & 1 == 0 {
                    while fnode & 1 == 0 && fnode != 0 {
                        fnode >>= 1;
                        snode >>= 1;
                    }
                }
            } else {
                hash = hash_internal_node(hash, *sibling);
            }

            fnode >>= 1;
            snode >>= 1;
        }

        if snode != 0 {
            return Err(malformed());
        }

        Ok(hash)
    }
}

/// A leaf adjacent to the position where an absent key would be.
#[derive(Serialize, Deserialize, BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq)]
pub struct Neighbor {
    pub key: Binary,
    pub value_hash: Hash256,
    pub proof: MembershipProof,
}

/// Proof that a key is absent: the leaves immediately before and after it.
/// `left` is `None` if the key would be the first leaf, `right` is `None` if it
/// would be the last.
#[derive(Serialize, Deserialize, BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq)]
pub struct NonMembershipProof {
    pub leaf_count: u64,
    pub left: Option<Neighbor>,
    pub right: Option<Neighbor>,
}

fn check_root(computed: Hash256, actual: Hash256) -> ProofResult<()> {
    if computed != actual {
        return Err(ProofError::RootHashMismatch { computed, actual });
    }

    Ok(())
}

/// Verify a proof of either kind. `value` is `Some` for membership.
pub fn verify_proof(
    root_hash: Hash256,
    key: &[u8],
    value: Option<&[u8]>,
    proof: &Proof,
) -> ProofResult<()> {
    match value {
        Some(value) => verify_membership(root_hash, key, value, proof),
        None => verify_non_membership(root_hash, key, proof),
    }
}

pub fn verify_membership(
    root_hash: Hash256,
    key: &[u8],
    value: &[u8],
    proof: &Proof,
) -> ProofResult<()> {
    let Proof::Membership(proof) = proof else {
        return Err(ProofError::IncorrectProofType {
            expect: "membership",
            actual: proof.kind(),
        });
    };

    let computed = proof.compute_root(hash_record(key, value))?;

    check_root(computed, root_hash)
}

pub fn verify_non_membership(root_hash: Hash256, key: &[u8], proof: &Proof) -> ProofResult<()> {
    let Proof::NonMembership(proof) = proof else {
        return Err(ProofError::IncorrectProofType {
            expect: "non-membership",
            actual: proof.kind(),
        });
    };

    let mut indexes = [None, None];
    for (slot, neighbor) in indexes.iter_mut().zip([&proof.left, &proof.right]) {
        let Some(neighbor) = neighbor else {
            continue;
        };

        if neighbor.proof.leaf_count != proof.leaf_count {
            return Err(ProofError::LeafCountMismatch {
                expect: proof.leaf_count,
                actual: neighbor.proof.leaf_count,
            });
        }

        let leaf_hash = hash_leaf_node(neighbor.key.hash256(), neighbor.value_hash);
        check_root(neighbor.proof.compute_root(leaf_hash)?, root_hash)?;

        *slot = Some(neighbor.proof.index);
    }

    if let Some(left) = &proof.left {
        if left.key.as_ref() >= key {
            return Err(ProofError::NeighborOutOfOrder);
        }
    }

    if let Some(right) = &proof.right {
        if right.key.as_ref() <= key {
            return Err(ProofError::NeighborOutOfOrder);
        }
    }

    let last = proof.leaf_count.checked_sub(1);
    match (indexes[0], indexes[1]) {
        (None, None) if proof.leaf_count == 0 => check_root(Hash256::ZERO, root_hash),
        (Some(l), Some(r)) if l.checked_add(1) == Some(r) => Ok(()),
        (Some(l), None) if Some(l) == last => Ok(()),
        (None, Some(0)) => Ok(()),
        (left, right) => Err(ProofError::NotAdjacent { left, right }),
    }
}

// ----------------------------------- tests -----------------------------------
