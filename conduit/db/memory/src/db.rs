use {
    crate::{DbError, DbResult, VersionedMap},
    conduit_channel::Db,
    conduit_merkle::{MerkleTree, Proof},
    conduit_types::{Batch, Buffer, Hash256, Order, Record, Storage},
    std::{
        collections::BTreeMap,
        ops::Bound,
        sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard},
    },
};

struct ChangeSet {
    version: u64,
    root_hash: Hash256,
    batch: Batch,
}

struct MemDbInner {
    /// Version of the DB. `None` until the first batch is committed, which
    /// becomes version 1. Incremented by 1 with each commit afterwards.
    latest_version: Option<u64>,
    /// The oldest version that hasn't been pruned.
    oldest_version: Option<u64>,
    /// A versioned key-value storage: key => (version => value)
    state_storage: VersionedMap<Vec<u8>, Vec<u8>>,
    /// Merkle root of every retained version.
    root_hashes: BTreeMap<u64, Hash256>,
    /// Uncommitted changes
    changeset: Option<ChangeSet>,
}

/// An in-memory, versioned database.
///
/// Every committed version stays readable until pruned. Proofs are generated
/// by building a Merkle tree over the full state of the requested version,
/// which is fine for the data sizes this is used with.
pub struct MemDb {
    inner: Arc<RwLock<MemDbInner>>,
}

impl MemDb {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(MemDbInner {
                latest_version: None,
                oldest_version: None,
                state_storage: VersionedMap::new(),
                root_hashes: BTreeMap::new(),
                changeset: None,
            })),
        }
    }

    fn with_read<C, T>(&self, callback: C) -> T
    where
        C: FnOnce(RwLockReadGuard<MemDbInner>) -> T,
    {
        let lock = self.inner.read().unwrap_or_else(|err| {
            panic!("MemDb is poisoned: {err:?}");
        });
        callback(lock)
    }

    fn with_write<C, T>(&self, callback: C) -> T
    where
        C: FnOnce(RwLockWriteGuard<MemDbInner>) -> T,
    {
        let lock = self.inner.write().unwrap_or_else(|err| {
            panic!("MemDb is poisoned: {err:?}");
        });
        callback(lock)
    }

    /// Check that the version is committed and not pruned. `None` means the
    /// latest version.
    fn resolve_version(&self, version: Option<u64>) -> DbResult<u64> {
        self.with_read(|inner| {
            let latest = inner.latest_version.ok_or(DbError::NothingCommitted)?;
            let oldest = inner.oldest_version.unwrap_or(latest);

            match version {
                None => Ok(latest),
                Some(version) if version > latest => {
                    Err(DbError::VersionNotFound { version, latest })
                },
                Some(version) if version < oldest => {
                    Err(DbError::VersionPruned { version, oldest })
                },
                Some(version) => Ok(version),
            }
        })
    }

    fn merkle_tree(&self, version: u64) -> MerkleTree {
        let storage = StateStorage {
            db: self.clone(),
            version,
        };

        MerkleTree::from_records(storage.scan(None, None, Order::Ascending))
    }
}

impl Default for MemDb {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for MemDb {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl Db for MemDb {
    type Error = DbError;
    type Proof = Proof;
    type StateStorage = StateStorage;

    fn latest_version(&self) -> Option<u64> {
        self.with_read(|inner| inner.latest_version)
    }

    fn oldest_version(&self) -> Option<u64> {
        self.with_read(|inner| inner.oldest_version)
    }

    fn state_storage(&self, version: Option<u64>) -> DbResult<StateStorage> {
        Ok(StateStorage {
            db: self.clone(),
            version: self.resolve_version(version)?,
        })
    }

    fn root_hash(&self, version: Option<u64>) -> DbResult<Option<Hash256>> {
        if version.is_none() && self.latest_version().is_none() {
            return Ok(None);
        }

        let version = self.resolve_version(version)?;

        Ok(self.with_read(|inner| inner.root_hashes.get(&version).copied()))
    }

    fn prove(&self, key: &[u8], version: Option<u64>) -> DbResult<(u64, Proof)> {
        let version = self.resolve_version(version)?;

        Ok((version, self.merkle_tree(version).prove(key)))
    }

    // Everything that needs a read lock is done before the write lock is
    // taken. Locking again inside a `with_write` callback would deadlock.
    fn flush_but_not_commit(&self, batch: Batch) -> DbResult<(u64, Option<Hash256>)> {
        let old_version = self.with_read(|inner| {
            if inner.changeset.is_some() {
                return Err(DbError::ChangeSetAlreadySet);
            }

            Ok(inner.latest_version.unwrap_or(0))
        })?;

        let new_version = old_version + 1;

        let base = StateStorage {
            db: self.clone(),
            version: old_version,
        };
        let buffer = Buffer::new(base, Some(batch));
        let root_hash =
            MerkleTree::from_records(buffer.scan(None, None, Order::Ascending)).root_hash();
        let (_, batch) = buffer.disassemble();

        self.with_write(|mut inner| {
            if inner.changeset.is_some() {
                return Err(DbError::ChangeSetAlreadySet);
            }

            inner.changeset = Some(ChangeSet {
                version: new_version,
                root_hash,
                batch,
            });

            Ok(())
        })?;

        Ok((new_version, Some(root_hash)))
    }

    fn commit(&self) -> DbResult<()> {
        let (version, root_hash) = self.with_write(|mut inner| {
            let changeset = inner.changeset.take().ok_or(DbError::ChangeSetNotSet)?;

            inner
                .state_storage
                .write_batch(changeset.version, changeset.batch);
            inner.root_hashes.insert(changeset.version, changeset.root_hash);
            inner.latest_version = Some(changeset.version);
            inner.oldest_version.get_or_insert(changeset.version);

            Ok::<_, DbError>((changeset.version, changeset.root_hash))
        })?;

        tracing::info!(
            version,
            root_hash = root_hash.to_string(),
            "Committed new version"
        );

        Ok(())
    }

    fn prune(&self, up_to_version: u64) -> DbResult<()> {
        let pruned = self.with_write(|mut inner| {
            let latest = inner.latest_version.ok_or(DbError::NothingCommitted)?;

            if up_to_version > latest {
                return Err(DbError::InvalidPrune {
                    up_to: up_to_version,
                    latest,
                });
            }

            if inner.oldest_version.is_some_and(|oldest| up_to_version <= oldest) {
                return Ok(false);
            }

            inner.state_storage.prune(up_to_version);
            inner.root_hashes.retain(|version, _| *version >= up_to_version);
            inner.oldest_version = Some(up_to_version);

            Ok(true)
        })?;

        if pruned {
            tracing::info!(up_to_version, "Pruned old versions");
        }

        Ok(())
    }
}

// ------------------------------- state storage -------------------------------

/// A read-only view of the database at one version.
#[derive(Clone)]
pub struct StateStorage {
    db: MemDb,
    version: u64,
}

impl StateStorage {
    pub fn version(&self) -> u64 {
        self.version
    }
}

impl Storage for StateStorage {
    fn read(&self, key: &[u8]) -> Option<Vec<u8>> {
        self.db
            .with_read(|inner| inner.state_storage.get(key, self.version).cloned())
    }

    fn scan<'a>(
        &'a self,
        min: Option<&[u8]>,
        max: Option<&[u8]>,
        order: Order,
    ) -> Box<dyn Iterator<Item = Record> + 'a> {
        // `BTreeMap::range` panics if start > end. Min is inclusive and max is
        // exclusive, so start == end is fine.
        if let (Some(min), Some(max)) = (min, max) {
            if min > max {
                return Box::new(std::iter::empty());
            }
        }

        let min = min.map_or(Bound::Unbounded, Bound::Included);
        let max = max.map_or(Bound::Unbounded, Bound::Excluded);
        let vec = self.db.with_read(|inner| {
            // The iterator borrows from the read lock, which is released at
            // the end of this closure, so it must be collected.
            inner
                .state_storage
                .range::<_, [u8]>((min, max), self.version)
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect::<Vec<_>>()
        });
        match order {
            Order::Ascending => Box::new(vec.into_iter()),
            Order::Descending => Box::new(vec.into_iter().rev()),
        }
    }

    fn write(&mut self, _key: &[u8], _value: &[u8]) {
        unreachable!("write function called on read-only storage");
    }

    fn remove(&mut self, _key: &[u8]) {
        unreachable!("write function called on read-only storage");
    }
}

// ----------------------------------- tests -----------------------------------
