use {
    conduit_channel::{host, ChannelError, ChannelResult, Db, QueryConfig, QueryService},
    conduit_db_memory::MemDb,
    conduit_types::{
        compute_ack_commitment, compute_packet_commitment, Batch, Binary, Buffer, ChannelEnd,
        ChannelId, ChannelIdentity, ClientId, ConnectionCounterparty, ConnectionEnd, ConnectionId,
        Counterparty, Height, Ordering, PortId, Sequence, State, Storage,
    },
    std::mem,
};

/// Timeout height attached to every packet sent through [`TestSuite::send_packet`].
pub const DEFAULT_TIMEOUT_HEIGHT: Height = Height::new(0, 1_000_000);

/// Build a channel end routing through the given connections.
///
/// The counterparty is on the same port, with its channel id not yet known.
pub fn mock_channel_end(state: State, connection_hops: &[&str]) -> ChannelEnd {
    ChannelEnd {
        state,
        ordering: Ordering::Unordered,
        counterparty: Counterparty {
            port_id: PortId::new_unchecked("transfer"),
            channel_id: None,
        },
        connection_hops: connection_hops
            .iter()
            .map(|hop| ConnectionId::new_unchecked(*hop))
            .collect(),
        version: "ics20-1".to_string(),
    }
}

// --------------------------------- TestSuite ---------------------------------

/// A chain in a box: a versioned database with the query service on top.
///
/// Writes go through the host primitives into a pending batch, which becomes
/// the next height when [`make_block`](Self::make_block) is called. Queries
/// only ever see committed heights.
pub struct TestSuite<DB = MemDb> {
    pub service: QueryService<DB>,
    /// Writes made since the last block.
    pending: Batch,
}

impl TestSuite {
    /// Create a new test suite over an empty in-memory database.
    ///
    /// It's not recommended to call this directly. Use [`TestBuilder`](crate::TestBuilder)
    /// instead.
    pub fn new(config: QueryConfig) -> Self {
        Self::new_with_db(MemDb::new(), config)
    }
}

impl<DB> TestSuite<DB>
where
    DB: Db,
    ChannelError: From<DB::Error>,
{
    pub fn new_with_db(db: DB, config: QueryConfig) -> Self {
        Self {
            service: QueryService::new(db, config),
            pending: Batch::new(),
        }
    }

    pub fn db(&self) -> &DB {
        self.service.db()
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// The latest committed height. Panics if nothing is committed yet.
    pub fn height(&self) -> Height {
        self.service
            .latest_height()
            .unwrap_or_else(|err| panic!("no height to speak of: {err}"))
    }

    /// Commit the pending writes as a new height, and return it.
    pub fn make_block(&mut self) -> Height {
        let batch = mem::take(&mut self.pending);

        self.db().flush_and_commit(batch).unwrap_or_else(|err| {
            panic!("fatal error while committing block: {}", err.to_string());
        });

        self.height()
    }

    /// Make a number of empty blocks; return the last height.
    pub fn make_empty_blocks(&mut self, count: u64) -> Height {
        assert!(!self.has_pending(), "making empty blocks with pending writes");

        for _ in 0..count {
            self.make_block();
        }

        self.height()
    }

    /// Drop every height below the given one.
    pub fn prune(&self, up_to: Height) -> ChannelResult<()> {
        Ok(self.db().prune(up_to.revision_height)?)
    }

    /// Run a write against the latest committed state plus the pending
    /// writes. A failed write leaves the pending writes untouched.
    fn write<F, T>(&mut self, action: F) -> ChannelResult<T>
    where
        F: FnOnce(&mut dyn Storage) -> ChannelResult<T>,
    {
        let base = self.db().state_storage(None)?;
        let mut buffer = Buffer::new(base, Some(self.pending.clone()));

        let output = action(&mut buffer)?;

        let (_, pending) = buffer.disassemble();
        self.pending = pending;

        Ok(output)
    }

    // ------------------------------ host writes ------------------------------

    pub fn save_channel(
        &mut self,
        channel: &ChannelIdentity,
        channel_end: &ChannelEnd,
    ) -> ChannelResult<()> {
        self.write(|storage| host::save_channel(storage, channel, channel_end))
    }

    /// Create a channel and take it through the handshake to OPEN, all within
    /// the pending block.
    pub fn open_channel(
        &mut self,
        port_id: &str,
        channel_id: &str,
        connection_hops: &[&str],
    ) -> ChannelResult<ChannelIdentity> {
        let channel = ChannelIdentity::parse(port_id, channel_id)?;

        self.save_channel(&channel, &mock_channel_end(State::Init, connection_hops))?;

        let mut channel_end = mock_channel_end(State::Open, connection_hops);
        channel_end.counterparty.channel_id = Some(ChannelId::new_unchecked(channel_id));
        self.save_channel(&channel, &channel_end)?;

        Ok(channel)
    }

    /// Create a light client with the given state, and a connection verified
    /// by it.
    pub fn create_connection(
        &mut self,
        connection_id: &str,
        client_id: &str,
        client_state: &[u8],
    ) -> ChannelResult<ClientId> {
        let connection_id = connection_id.parse::<ConnectionId>()?;
        let client_id = client_id.parse::<ClientId>()?;

        self.save_client_state(&client_id, client_state)?;

        let connection_end = ConnectionEnd {
            client_id: client_id.clone(),
            counterparty: ConnectionCounterparty {
                client_id: ClientId::with_index("07-tendermint", 0),
                connection_id: None,
            },
        };
        self.write(|storage| host::save_connection(storage, &connection_id, &connection_end))?;

        Ok(client_id)
    }

    pub fn save_client_state(
        &mut self,
        client_id: &ClientId,
        client_state: &[u8],
    ) -> ChannelResult<()> {
        let client_state = Binary::from(client_state);

        self.write(|storage| host::save_client_state(storage, client_id, &client_state))
    }

    /// Send a packet carrying the given data; return its sequence.
    pub fn send_packet(
        &mut self,
        channel: &ChannelIdentity,
        data: &[u8],
    ) -> ChannelResult<Sequence> {
        let digest = compute_packet_commitment(data, DEFAULT_TIMEOUT_HEIGHT, 0);

        self.write(|storage| host::commit_packet(storage, channel, digest))
    }

    pub fn delete_commitment(
        &mut self,
        channel: &ChannelIdentity,
        sequence: Sequence,
    ) -> ChannelResult<()> {
        self.write(|storage| host::delete_commitment(storage, channel, sequence))
    }

    pub fn write_acknowledgement(
        &mut self,
        channel: &ChannelIdentity,
        sequence: Sequence,
        ack: &[u8],
    ) -> ChannelResult<()> {
        let digest = compute_ack_commitment(ack);

        self.write(|storage| host::write_acknowledgement(storage, channel, sequence, digest))
    }

    pub fn set_next_sequence_send(
        &mut self,
        channel: &ChannelIdentity,
        sequence: Sequence,
    ) -> ChannelResult<()> {
        self.write(|storage| host::set_next_sequence_send(storage, channel, sequence))
    }

    pub fn set_next_sequence_recv(
        &mut self,
        channel: &ChannelIdentity,
        sequence: Sequence,
    ) -> ChannelResult<()> {
        self.write(|storage| host::set_next_sequence_recv(storage, channel, sequence))
    }

    pub fn set_next_sequence_ack(
        &mut self,
        channel: &ChannelIdentity,
        sequence: Sequence,
    ) -> ChannelResult<()> {
        self.write(|storage| host::set_next_sequence_ack(storage, channel, sequence))
    }
}
