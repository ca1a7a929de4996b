use {
    borsh::BorshSerialize,
    conduit_types::{Batch, Hash256, Storage},
};

/// Represents a versioned, Merklized key-value database.
///
/// Every committed batch becomes a new, immutable version. Versions start at 1
/// and map one to one onto revision heights of the chain. Old versions can be
/// pruned; after `prune(n)`, versions below `n` can no longer be read.
pub trait Db {
    type Error: ToString;

    /// Type of the Merkle proof. It is handed to callers as Borsh bytes.
    type Proof: BorshSerialize;

    /// An owned, read-only view of the state at one version.
    type StateStorage: Storage + Clone + 'static;

    /// The most recent committed version, `None` if nothing is committed yet.
    fn latest_version(&self) -> Option<u64>;

    /// The oldest version that can still be read, `None` if nothing is
    /// committed yet.
    fn oldest_version(&self) -> Option<u64>;

    /// Return the state at the given version, or the latest if unspecified.
    ///
    /// Errors if nothing is committed yet, or if the version is not yet
    /// committed or has been pruned.
    fn state_storage(&self, version: Option<u64>) -> Result<Self::StateStorage, Self::Error>;

    /// Merkle root hash at the given version, or the latest if unspecified.
    /// `None` if nothing is committed yet.
    fn root_hash(&self, version: Option<u64>) -> Result<Option<Hash256>, Self::Error>;

    /// Generate a Merkle proof of the given key at the given version, or the
    /// latest if unspecified. Returns the version the proof was actually
    /// generated at, together with a membership proof if the key exists or a
    /// non-membership proof otherwise.
    fn prove(&self, key: &[u8], version: Option<u64>) -> Result<(u64, Self::Proof), Self::Error>;

    /// Stage a batch of writes as the next version without making it visible.
    fn flush_but_not_commit(&self, batch: Batch) -> Result<(u64, Option<Hash256>), Self::Error>;

    /// Make the staged version visible to readers.
    fn commit(&self) -> Result<(), Self::Error>;

    /// Flush and commit in one go.
    fn flush_and_commit(&self, batch: Batch) -> Result<(u64, Option<Hash256>), Self::Error> {
        let (new_version, root_hash) = self.flush_but_not_commit(batch)?;
        self.commit()?;
        Ok((new_version, root_hash))
    }

    /// Drop every version below `up_to_version`.
    fn prune(&self, up_to_version: u64) -> Result<(), Self::Error>;
}
