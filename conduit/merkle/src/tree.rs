use {
    crate::{
        hash_internal_node, hash_leaf_node, MembershipProof, Neighbor, NonMembershipProof, Proof,
    },
    conduit_types::{Hash256, HashExt, Record},
};

/// A binary Merkle tree over a set of key-value pairs, sorted by key.
///
/// The shape follows RFC 6962: a tree of `n > 1` leaves has a left subtree
/// holding the largest power of two smaller than `n`, and the right subtree
/// holds the rest. Because leaves are sorted by key, absence of a key can be
/// proven by exhibiting its two neighbors at adjacent positions.
///
/// The tree is built in memory from a full snapshot, so it suits small states
/// and tests. An empty tree has the zero hash as its root.
#[derive(Debug, Clone, Default)]
pub struct MerkleTree {
    keys: Vec<Vec<u8>>,
    value_hashes: Vec<Hash256>,
    leaf_hashes: Vec<Hash256>,
}

impl MerkleTree {
    /// Build the tree. Records are sorted by key; for a repeated key the first
    /// record wins.
    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = Record>,
    {
        let mut leaves = records
            .into_iter()
            .map(|(key, value)| (key, value.hash256()))
            .collect::<Vec<_>>();
        leaves.sort_by(|a, b| a.0.cmp(&b.0));
        leaves.dedup_by(|later, earlier| later.0 == earlier.0);

        let mut tree = Self::default();
        for (key, value_hash) in leaves {
            tree.leaf_hashes.push(hash_leaf_node(key.hash256(), value_hash));
            tree.value_hashes.push(value_hash);
            tree.keys.push(key);
        }

        tree
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn root_hash(&self) -> Hash256 {
        if self.leaf_hashes.is_empty() {
            return Hash256::ZERO;
        }

        subtree_root(&self.leaf_hashes)
    }

    /// Generate a membership proof if the key exists, or a non-membership
    /// proof otherwise.
    pub fn prove(&self, key: &[u8]) -> Proof {
        match self.keys.binary_search_by(|stored| stored.as_slice().cmp(key)) {
            Ok(index) => Proof::Membership(self.membership_proof(index)),
            Err(insert_at) => Proof::NonMembership(NonMembershipProof {
                leaf_count: self.len() as u64,
                left: insert_at.checked_sub(1).map(|index| self.neighbor(index)),
                right: (insert_at < self.len()).then(|| self.neighbor(insert_at)),
            }),
        }
    }

    fn membership_proof(&self, index: usize) -> MembershipProof {
        let mut sibling_hashes = Vec::new();
        audit_path(index, &self.leaf_hashes, &mut sibling_hashes);

        MembershipProof {
            index: index as u64,
            leaf_count: self.len() as u64,
            sibling_hashes,
        }
    }

    fn neighbor(&self, index: usize) -> Neighbor {
        Neighbor {
            key: self.keys[index].clone().into(),
            value_hash: self.value_hashes[index],
            proof: self.membership_proof(index),
        }
    }
}

/// Largest power of two strictly smaller than `n`. Requires `n > 1`.
fn split_point(n: usize) -> usize {
    let mut k = 1;
    while k << 1 < n {
        k <<= 1;
    }
    k
}

fn subtree_root(leaves: &[Hash256]) -> Hash256 {
    match leaves {
        [] => Hash256::ZERO,
        [leaf] => *leaf,
        _ => {
            let k = split_point(leaves.len());
            hash_internal_node(subtree_root(&leaves[..k]), subtree_root(&leaves[k..]))
        },
    }
}

/// Sibling hashes from the leaf up to the root.
fn audit_path(index: usize, leaves: &[Hash256], path: &mut Vec<Hash256>) {
    if leaves.len() <= 1 {
        return;
    }

    let k = split_point(leaves.len());
    if index < k {
        audit_path(index, &leaves[..k], path);
        path.push(subtree_root(&leaves[k..]));
    } else {
        audit_path(index - k, &leaves[k..], path);
        path.push(subtree_root(&leaves[..k]));
    }
}
