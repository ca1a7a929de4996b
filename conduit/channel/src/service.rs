use {
    crate::{
        normalize_candidates, query_acknowledgement, query_acknowledgements, query_channel,
        query_channel_client_state, query_channels, query_commitment, query_commitments,
        query_connection_channels, query_next_sequence_ack, query_next_sequence_recv,
        query_next_sequence_send, unreceived_packets, unrelayed_acknowledgements, ChannelError,
        ChannelResult, CursorKind, Db, Listing, Page, PageRequest, QueryConfig, ACKNOWLEDGEMENTS,
        CHANNELS, CLIENT_STATES, COMMITMENTS, NEXT_SEQUENCE_ACK, NEXT_SEQUENCE_RECV,
        NEXT_SEQUENCE_SEND,
    },
    borsh::BorshSerialize,
    conduit_types::{
        Binary, BorshSerExt, ChannelEnd, ChannelIdentity, ConnectionId, Hash256, Height,
        IdentifiedChannelEnd, IdentifiedClientState, IncludeProof, PacketDigest, QueryHeight,
        Sequence,
    },
    serde::{Deserialize, Serialize},
    serde_with::skip_serializing_none,
};

// --------------------------------- responses ---------------------------------

/// A value read at a single height, optionally with a Merkle proof of it at
/// that same height.
#[skip_serializing_none]
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Proven<T> {
    pub value: T,
    /// Borsh-encoded proof; present only if one was requested.
    pub proof: Option<Binary>,
    /// The height the value was read at. Reported even without a proof.
    pub proof_height: Height,
}

/// Result of a reconciliation query.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Reconciled {
    /// Sequences in ascending order, without duplicates.
    pub sequences: Vec<Sequence>,
    /// The height the acknowledgement store was read at.
    pub height: Height,
}

// --------------------------------- snapshot ----------------------------------

/// A read-only view of the state at one resolved height. Every read of an
/// operation goes through the same snapshot.
struct Snapshot<S> {
    storage: S,
    version: u64,
    height: Height,
}

// ---------------------------------- service ----------------------------------

/// Answers channel and packet queries against a versioned database.
///
/// Cloning is cheap if the database handle is; clones share the same
/// database.
#[derive(Debug, Clone)]
pub struct QueryService<DB> {
    db: DB,
    config: QueryConfig,
    revision_number: u64,
}

impl<DB> QueryService<DB> {
    pub fn new(db: DB, config: QueryConfig) -> Self {
        Self {
            revision_number: config.revision_number(),
            db,
            config,
        }
    }

    pub fn db(&self) -> &DB {
        &self.db
    }

    pub fn config(&self) -> &QueryConfig {
        &self.config
    }

    pub fn revision_number(&self) -> u64 {
        self.revision_number
    }

    fn height_at(&self, version: u64) -> Height {
        Height::new(self.revision_number, version)
    }
}

impl<DB> QueryService<DB>
where
    DB: Db,
    ChannelError: From<DB::Error>,
{
    /// The latest committed height.
    pub fn latest_height(&self) -> ChannelResult<Height> {
        self.db
            .latest_version()
            .map(|version| self.height_at(version))
            .ok_or(ChannelError::NoCommittedHeight)
    }

    // ------------------------------- channels --------------------------------

    pub fn channel(
        &self,
        channel: &ChannelIdentity,
        height: QueryHeight,
        prove: IncludeProof,
    ) -> ChannelResult<Proven<ChannelEnd>> {
        let snapshot = self.snapshot(height)?;

        tracing::debug!(
            channel = channel.to_string(),
            height = snapshot.height.to_string(),
            "Querying channel"
        );

        let channel_end = self.read(&snapshot, |storage| query_channel(storage, channel))?;

        self.proven(&snapshot, prove, CHANNELS.path(channel).storage_key(), channel_end)
    }

    /// The state of the light client behind the channel's first connection
    /// hop. A requested proof is of the client state.
    pub fn channel_client_state(
        &self,
        channel: &ChannelIdentity,
        height: QueryHeight,
        prove: IncludeProof,
    ) -> ChannelResult<Proven<IdentifiedClientState>> {
        let snapshot = self.snapshot(height)?;

        tracing::debug!(
            channel = channel.to_string(),
            height = snapshot.height.to_string(),
            "Querying channel client state"
        );

        let identified =
            self.read(&snapshot, |storage| query_channel_client_state(storage, channel))?;
        let path = CLIENT_STATES.path(&identified.client_id);

        self.proven(&snapshot, prove, path.storage_key(), identified)
    }

    pub fn channels(
        &self,
        page: &PageRequest,
        height: QueryHeight,
    ) -> ChannelResult<Page<IdentifiedChannelEnd>> {
        self.page(page, height, CursorKind::Channels, |storage, start_after, limit| {
            query_channels(storage, start_after, limit)
        })
    }

    pub fn connection_channels(
        &self,
        connection_id: &ConnectionId,
        page: &PageRequest,
        height: QueryHeight,
    ) -> ChannelResult<Page<IdentifiedChannelEnd>> {
        let kind = CursorKind::ConnectionChannels(connection_id.clone());

        self.page(page, height, kind, |storage, start_after, limit| {
            query_connection_channels(storage, connection_id, start_after, limit)
        })
    }

    // ------------------------------- packets ---------------------------------

    pub fn packet_commitment(
        &self,
        channel: &ChannelIdentity,
        sequence: Sequence,
        height: QueryHeight,
        prove: IncludeProof,
    ) -> ChannelResult<Proven<Hash256>> {
        let snapshot = self.snapshot(height)?;

        tracing::debug!(
            channel = channel.to_string(),
            sequence = sequence.number(),
            height = snapshot.height.to_string(),
            "Querying packet commitment"
        );

        let digest = self.read(&snapshot, |storage| query_commitment(storage, channel, sequence))?;
        let path = COMMITMENTS.path((channel, sequence));

        self.proven(&snapshot, prove, path.storage_key(), digest)
    }

    pub fn packet_commitments(
        &self,
        channel: &ChannelIdentity,
        page: &PageRequest,
        height: QueryHeight,
    ) -> ChannelResult<Page<PacketDigest>> {
        let kind = CursorKind::Commitments(channel.clone());

        self.page(page, height, kind, |storage, start_after, limit| {
            query_commitments(storage, channel, start_after, limit)
        })
    }

    pub fn packet_acknowledgement(
        &self,
        channel: &ChannelIdentity,
        sequence: Sequence,
        height: QueryHeight,
        prove: IncludeProof,
    ) -> ChannelResult<Proven<Hash256>> {
        let snapshot = self.snapshot(height)?;

        tracing::debug!(
            channel = channel.to_string(),
            sequence = sequence.number(),
            height = snapshot.height.to_string(),
            "Querying packet acknowledgement"
        );

        let digest =
            self.read(&snapshot, |storage| query_acknowledgement(storage, channel, sequence))?;
        let path = ACKNOWLEDGEMENTS.path((channel, sequence));

        self.proven(&snapshot, prove, path.storage_key(), digest)
    }

    pub fn packet_acknowledgements(
        &self,
        channel: &ChannelIdentity,
        page: &PageRequest,
        height: QueryHeight,
    ) -> ChannelResult<Page<PacketDigest>> {
        let kind = CursorKind::Acknowledgements(channel.clone());

        self.page(page, height, kind, |storage, start_after, limit| {
            query_acknowledgements(storage, channel, start_after, limit)
        })
    }

    // ------------------------------- sequences -------------------------------

    pub fn next_sequence_send(
        &self,
        channel: &ChannelIdentity,
        height: QueryHeight,
        prove: IncludeProof,
    ) -> ChannelResult<Proven<Sequence>> {
        let snapshot = self.snapshot(height)?;
        let sequence = self.read(&snapshot, |storage| query_next_sequence_send(storage, channel))?;

        tracing::debug!(
            channel = channel.to_string(),
            height = snapshot.height.to_string(),
            "Queried next send sequence"
        );

        let path = NEXT_SEQUENCE_SEND.path(channel);
        self.proven(&snapshot, prove, path.storage_key(), sequence)
    }

    pub fn next_sequence_recv(
        &self,
        channel: &ChannelIdentity,
        height: QueryHeight,
        prove: IncludeProof,
    ) -> ChannelResult<Proven<Sequence>> {
        let snapshot = self.snapshot(height)?;
        let sequence = self.read(&snapshot, |storage| query_next_sequence_recv(storage, channel))?;

        tracing::debug!(
            channel = channel.to_string(),
            height = snapshot.height.to_string(),
            "Queried next receive sequence"
        );

        let path = NEXT_SEQUENCE_RECV.path(channel);
        self.proven(&snapshot, prove, path.storage_key(), sequence)
    }

    pub fn next_sequence_ack(
        &self,
        channel: &ChannelIdentity,
        height: QueryHeight,
        prove: IncludeProof,
    ) -> ChannelResult<Proven<Sequence>> {
        let snapshot = self.snapshot(height)?;
        let sequence = self.read(&snapshot, |storage| query_next_sequence_ack(storage, channel))?;

        tracing::debug!(
            channel = channel.to_string(),
            height = snapshot.height.to_string(),
            "Queried next acknowledgement sequence"
        );

        let path = NEXT_SEQUENCE_ACK.path(channel);
        self.proven(&snapshot, prove, path.storage_key(), sequence)
    }

    // ---------------------------- reconciliation -----------------------------

    /// Of the given sequences, those the local chain has not received, judged
    /// by the absence of an acknowledgement.
    pub fn unreceived_packets(
        &self,
        channel: &ChannelIdentity,
        candidates: &[Sequence],
        height: QueryHeight,
    ) -> ChannelResult<Reconciled> {
        let candidates = normalize_candidates(candidates, self.config.max_candidate_sequences)?;
        let snapshot = self.snapshot(height)?;
        let sequences = self.read(&snapshot, |storage| {
            Ok(unreceived_packets(storage, channel, &candidates))
        })?;

        tracing::debug!(
            channel = channel.to_string(),
            height = snapshot.height.to_string(),
            candidates = candidates.len(),
            unreceived = sequences.len(),
            "Computed unreceived packets"
        );

        Ok(Reconciled {
            sequences,
            height: snapshot.height,
        })
    }

    /// Of the given sequences, those the local chain has acknowledged.
    pub fn unrelayed_acknowledgements(
        &self,
        channel: &ChannelIdentity,
        candidates: &[Sequence],
        height: QueryHeight,
    ) -> ChannelResult<Reconciled> {
        let candidates = normalize_candidates(candidates, self.config.max_candidate_sequences)?;
        let snapshot = self.snapshot(height)?;
        let sequences = self.read(&snapshot, |storage| {
            Ok(unrelayed_acknowledgements(storage, channel, &candidates))
        })?;

        tracing::debug!(
            channel = channel.to_string(),
            height = snapshot.height.to_string(),
            candidates = candidates.len(),
            unrelayed = sequences.len(),
            "Computed unrelayed acknowledgements"
        );

        Ok(Reconciled {
            sequences,
            height: snapshot.height,
        })
    }

    // -------------------------------- helpers --------------------------------

    /// Resolve a query height to a committed, unpruned version.
    fn resolve_version(&self, height: QueryHeight) -> ChannelResult<u64> {
        let latest = self
            .db
            .latest_version()
            .ok_or(ChannelError::NoCommittedHeight)?;

        let requested = match height {
            QueryHeight::Latest => return Ok(latest),
            QueryHeight::Specific(requested) => requested,
        };

        if requested.revision_number != self.revision_number {
            return Err(ChannelError::invalid_argument(format!(
                "height {requested} is not in the current revision {}",
                self.revision_number
            )));
        }

        if requested.revision_height > latest {
            return Err(ChannelError::HeightNotReached {
                requested,
                latest: self.height_at(latest),
            });
        }

        let oldest = self.db.oldest_version().unwrap_or(latest);
        if requested.revision_height < oldest {
            return Err(ChannelError::HeightPruned {
                requested,
                oldest: self.height_at(oldest),
            });
        }

        Ok(requested.revision_height)
    }

    fn snapshot(&self, height: QueryHeight) -> ChannelResult<Snapshot<DB::StateStorage>> {
        let version = self.resolve_version(height)?;
        let storage = self.db.state_storage(Some(version))?;

        Ok(Snapshot {
            storage,
            version,
            height: self.height_at(version),
        })
    }

    /// Run reads against the snapshot, then make sure its version is still
    /// retained. A version pruned while it was being read may have come back
    /// with missing entries instead of an error, so neither the reads nor
    /// their errors can be trusted then.
    fn read<T, F>(&self, snapshot: &Snapshot<DB::StateStorage>, reads: F) -> ChannelResult<T>
    where
        F: FnOnce(&DB::StateStorage) -> ChannelResult<T>,
    {
        let result = reads(&snapshot.storage);

        match self.db.oldest_version() {
            Some(oldest) if oldest > snapshot.version => {
                tracing::error!(
                    snapshot_version = snapshot.version,
                    oldest,
                    "Snapshot was pruned while being read"
                );

                Err(ChannelError::HeightPruned {
                    requested: snapshot.height,
                    oldest: self.height_at(oldest),
                })
            },
            _ => result,
        }
    }

    /// Attach a proof of the given key to a value read from the snapshot, if
    /// one is requested. The proof must come from the snapshot's version.
    fn proven<T>(
        &self,
        snapshot: &Snapshot<DB::StateStorage>,
        prove: IncludeProof,
        key: &[u8],
        value: T,
    ) -> ChannelResult<Proven<T>> {
        let proof = if prove.is_yes() {
            let (proof_version, proof) = self.read(snapshot, |_| {
                self.db.prove(key, Some(snapshot.version)).map_err(Into::into)
            })?;

            if proof_version != snapshot.version {
                tracing::error!(
                    snapshot_version = snapshot.version,
                    proof_version,
                    "Proof generated at a different version than the value"
                );

                return Err(ChannelError::ProofInconsistency {
                    snapshot_version: snapshot.version,
                    proof_version,
                });
            }

            Some(encode_proof(&proof)?)
        } else {
            None
        };

        Ok(Proven {
            value,
            proof,
            proof_height: snapshot.height,
        })
    }

    /// Serve one page of a listing.
    ///
    /// If the request carries a cursor, the cursor must belong to this listing
    /// and its height must still be readable. A request at the latest height
    /// follows the cursor's height, so that a client walking through the
    /// pages sees one consistent state.
    fn page<T, F>(
        &self,
        page: &PageRequest,
        height: QueryHeight,
        kind: CursorKind,
        list: F,
    ) -> ChannelResult<Page<T>>
    where
        F: FnOnce(&DB::StateStorage, Option<u64>, usize) -> ChannelResult<Listing<T>>,
    {
        let limit = self.config.page_limit(page.limit)?;

        let (snapshot, start_after) = match &page.cursor {
            Some(cursor) => {
                let data = cursor.decode()?;

                if data.kind != kind {
                    tracing::warn!(
                        expected = kind.to_string(),
                        found = data.kind.to_string(),
                        "Rejected cursor of another listing"
                    );

                    return Err(ChannelError::invalid_cursor(format!(
                        "cursor belongs to {}, not {kind}",
                        data.kind
                    )));
                }

                if let QueryHeight::Specific(requested) = height {
                    if requested != data.height {
                        tracing::warn!(
                            requested = requested.to_string(),
                            cursor_height = data.height.to_string(),
                            "Rejected cursor of another height"
                        );

                        return Err(ChannelError::invalid_cursor(format!(
                            "cursor was produced at height {}, not {requested}",
                            data.height
                        )));
                    }
                }

                let snapshot = self.snapshot(data.height.into()).map_err(|err| {
                    tracing::warn!(
                        cursor_height = data.height.to_string(),
                        err = err.to_string(),
                        "Rejected stale cursor"
                    );

                    ChannelError::invalid_cursor(err)
                })?;

                (snapshot, Some(data.last_key))
            },
            None => (self.snapshot(height)?, None),
        };

        tracing::debug!(
            listing = kind.to_string(),
            height = snapshot.height.to_string(),
            limit,
            "Querying listing"
        );

        let listing = self.read(&snapshot, |storage| list(storage, start_after, limit))?;

        Page::from_listing(listing, kind, snapshot.height)
    }
}

fn encode_proof<P>(proof: &P) -> ChannelResult<Binary>
where
    P: BorshSerialize,
{
    Ok(proof.to_borsh_vec()?.into())
}
