use conduit_types::{Hash256, HashExt};

pub const INTERNAL_NODE_HASH_PREFIX: &[u8] = &[0];
pub const LEAF_NODE_HASH_PREFIX: &[u8] = &[1];

/// Hash of a leaf. Leaves are prefixed with a 1 byte, internal nodes with a
/// zero byte, so that one can never be passed off as the other.
pub fn hash_leaf_node(key_hash: Hash256, value_hash: Hash256) -> Hash256 {
    let mut preimage = Vec::with_capacity(LEAF_NODE_HASH_PREFIX.len() + Hash256::LENGTH * 2);
    preimage.extend_from_slice(LEAF_NODE_HASH_PREFIX);
    preimage.extend_from_slice(key_hash.as_bytes());
    preimage.extend_from_slice(value_hash.as_bytes());
    preimage.hash256()
}

pub fn hash_internal_node(left_hash: Hash256, right_hash: Hash256) -> Hash256 {
    let mut preimage = Vec::with_capacity(INTERNAL_NODE_HASH_PREFIX.len() + Hash256::LENGTH * 2);
    preimage.extend_from_slice(INTERNAL_NODE_HASH_PREFIX);
    preimage.extend_from_slice(left_hash.as_bytes());
    preimage.extend_from_slice(right_hash.as_bytes());
    preimage.hash256()
}

/// Hash of the leaf holding the given key-value pair.
pub fn hash_record(key: &[u8], value: &[u8]) -> Hash256 {
    hash_leaf_node(key.hash256(), value.hash256())
}
