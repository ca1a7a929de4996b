use {
    crate::{
        ChannelError, ChannelResult, Db, ErrorKind, Page, PageRequest, Proven, QueryService,
        Reconciled,
    },
    conduit_types::{
        ChannelEnd, ChannelIdentity, ConnectionId, Hash256, IdentifiedChannelEnd,
        IdentifiedClientState, IncludeProof, JsonDeExt, JsonSerExt, PacketDigest, QueryHeight,
        Sequence,
    },
    paste::paste,
    serde::{Deserialize, Serialize},
};

// ----------------------------------- trait -----------------------------------

/// Represents one query request type.
pub trait QueryRequest: Sized {
    /// The full query enum that contains this request.
    type Message: From<Self>;

    /// The response type for this query.
    type Response;
}

// ---------------------------------- request ----------------------------------

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Query {
    /// Query a single channel end, optionally with a proof.
    Channel(QueryChannelRequest),
    /// Enumerate channels in registration order.
    Channels(QueryChannelsRequest),
    /// Enumerate the channels routing through a connection.
    ConnectionChannels(QueryConnectionChannelsRequest),
    /// Query the state of the light client a channel is verified by.
    ChannelClientState(QueryChannelClientStateRequest),
    /// Query the commitment of a sent packet.
    PacketCommitment(QueryPacketCommitmentRequest),
    /// Enumerate outstanding packet commitments of a channel.
    PacketCommitments(QueryPacketCommitmentsRequest),
    /// Query the acknowledgement of a received packet.
    PacketAcknowledgement(QueryPacketAcknowledgementRequest),
    /// Enumerate acknowledgements written on a channel.
    PacketAcknowledgements(QueryPacketAcknowledgementsRequest),
    NextSequenceSend(QueryNextSequenceSendRequest),
    NextSequenceReceive(QueryNextSequenceReceiveRequest),
    NextSequenceAck(QueryNextSequenceAckRequest),
    /// Filter a list of sequences down to those not yet received.
    UnreceivedPackets(QueryUnreceivedPacketsRequest),
    /// Filter a list of sequences down to those acknowledged.
    UnrelayedAcknowledgements(QueryUnrelayedAcknowledgementsRequest),
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct QueryChannelRequest {
    pub port_id: String,
    pub channel_id: String,
    #[serde(default)]
    pub height: QueryHeight,
    #[serde(default)]
    pub include_proof: IncludeProof,
}

#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq, Eq)]
pub struct QueryChannelsRequest {
    #[serde(default)]
    pub page: PageRequest,
    #[serde(default)]
    pub height: QueryHeight,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct QueryConnectionChannelsRequest {
    pub connection_id: String,
    #[serde(default)]
    pub page: PageRequest,
    #[serde(default)]
    pub height: QueryHeight,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct QueryChannelClientStateRequest {
    pub port_id: String,
    pub channel_id: String,
    #[serde(default)]
    pub height: QueryHeight,
    #[serde(default)]
    pub include_proof: IncludeProof,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct QueryPacketCommitmentRequest {
    pub port_id: String,
    pub channel_id: String,
    pub sequence: Sequence,
    #[serde(default)]
    pub height: QueryHeight,
    #[serde(default)]
    pub include_proof: IncludeProof,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct QueryPacketCommitmentsRequest {
    pub port_id: String,
    pub channel_id: String,
    #[serde(default)]
    pub page: PageRequest,
    #[serde(default)]
    pub height: QueryHeight,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct QueryPacketAcknowledgementRequest {
    pub port_id: String,
    pub channel_id: String,
    pub sequence: Sequence,
    #[serde(default)]
    pub height: QueryHeight,
    #[serde(default)]
    pub include_proof: IncludeProof,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct QueryPacketAcknowledgementsRequest {
    pub port_id: String,
    pub channel_id: String,
    #[serde(default)]
    pub page: PageRequest,
    #[serde(default)]
    pub height: QueryHeight,
}

macro_rules! next_sequence_request {
    ($($name:ident),+ $(,)?) => {
        $(
            #[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
            pub struct $name {
                pub port_id: String,
                pub channel_id: String,
                #[serde(default)]
                pub height: QueryHeight,
                #[serde(default)]
                pub include_proof: IncludeProof,
            }
        )+
    };
}

next_sequence_request! {
    QueryNextSequenceSendRequest,
    QueryNextSequenceReceiveRequest,
    QueryNextSequenceAckRequest,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct QueryUnreceivedPacketsRequest {
    pub port_id: String,
    pub channel_id: String,
    pub sequences: Vec<Sequence>,
    #[serde(default)]
    pub height: QueryHeight,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct QueryUnrelayedAcknowledgementsRequest {
    pub port_id: String,
    pub channel_id: String,
    pub sequences: Vec<Sequence>,
    #[serde(default)]
    pub height: QueryHeight,
}

macro_rules! impl_into_query {
    ($variant:ident => $req:ty => $res:ty) => {
        impl From<$req> for Query {
            #[inline]
            fn from(req: $req) -> Self {
                Query::$variant(req)
            }
        }

        impl QueryRequest for $req {
            type Message = Query;
            type Response = $res;
        }
    };
    ($($variant:ident => $req:ty => $res:ty),+ $(,)?) => {
        $(
            impl_into_query!($variant => $req => $res);
        )+
    };
}

impl_into_query! {
    Channel                   => QueryChannelRequest                   => Proven<ChannelEnd>,
    Channels                  => QueryChannelsRequest                  => Page<IdentifiedChannelEnd>,
    ConnectionChannels        => QueryConnectionChannelsRequest        => Page<IdentifiedChannelEnd>,
    ChannelClientState        => QueryChannelClientStateRequest        => Proven<IdentifiedClientState>,
    PacketCommitment          => QueryPacketCommitmentRequest          => Proven<Hash256>,
    PacketCommitments         => QueryPacketCommitmentsRequest         => Page<PacketDigest>,
    PacketAcknowledgement     => QueryPacketAcknowledgementRequest     => Proven<Hash256>,
    PacketAcknowledgements    => QueryPacketAcknowledgementsRequest    => Page<PacketDigest>,
    NextSequenceSend          => QueryNextSequenceSendRequest          => Proven<Sequence>,
    NextSequenceReceive       => QueryNextSequenceReceiveRequest       => Proven<Sequence>,
    NextSequenceAck           => QueryNextSequenceAckRequest           => Proven<Sequence>,
    UnreceivedPackets         => QueryUnreceivedPacketsRequest         => Reconciled,
    UnrelayedAcknowledgements => QueryUnrelayedAcknowledgementsRequest => Reconciled,
}

// --------------------------------- response ----------------------------------

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum QueryResponse {
    Channel(Proven<ChannelEnd>),
    Channels(Page<IdentifiedChannelEnd>),
    ConnectionChannels(Page<IdentifiedChannelEnd>),
    ChannelClientState(Proven<IdentifiedClientState>),
    PacketCommitment(Proven<Hash256>),
    PacketCommitments(Page<PacketDigest>),
    PacketAcknowledgement(Proven<Hash256>),
    PacketAcknowledgements(Page<PacketDigest>),
    NextSequenceSend(Proven<Sequence>),
    NextSequenceReceive(Proven<Sequence>),
    NextSequenceAck(Proven<Sequence>),
    UnreceivedPackets(Reconciled),
    UnrelayedAcknowledgements(Reconciled),
}

macro_rules! generate_downcast {
    ($id:ident => $ret:ty) => {
        paste! {
            pub fn [<as_$id:snake>](self) -> $ret {
                match self {
                    QueryResponse::$id(value) => value,
                    _ => panic!("QueryResponse is not {}", stringify!($id)),
                }
            }
        }
    };
    ($($id:ident => $ret:ty),+ $(,)?) => {
        $(
            generate_downcast!($id => $ret);
        )+
    };
}

impl QueryResponse {
    generate_downcast! {
        Channel                   => Proven<ChannelEnd>,
        Channels                  => Page<IdentifiedChannelEnd>,
        ConnectionChannels        => Page<IdentifiedChannelEnd>,
        ChannelClientState        => Proven<IdentifiedClientState>,
        PacketCommitment          => Proven<Hash256>,
        PacketCommitments         => Page<PacketDigest>,
        PacketAcknowledgement     => Proven<Hash256>,
        PacketAcknowledgements    => Page<PacketDigest>,
        NextSequenceSend          => Proven<Sequence>,
        NextSequenceReceive       => Proven<Sequence>,
        NextSequenceAck           => Proven<Sequence>,
        UnreceivedPackets         => Reconciled,
        UnrelayedAcknowledgements => Reconciled,
    }
}

/// An error as reported over the JSON interface.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct QueryError {
    pub kind: ErrorKind,
    pub message: String,
}

impl From<ChannelError> for QueryError {
    fn from(err: ChannelError) -> Self {
        Self {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

/// The outcome of a JSON query: either a response or an error.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum QueryOutcome {
    Ok(QueryResponse),
    Error(QueryError),
}

// ---------------------------------- adapter ----------------------------------

/// The query operations, taking requests as they arrive over the wire.
///
/// Identifiers in requests are plain strings and are validated here, so that a
/// malformed one is reported as an invalid argument rather than failing the
/// whole request decoding.
pub trait ChannelQuery {
    fn query_channel(&self, req: QueryChannelRequest) -> ChannelResult<Proven<ChannelEnd>>;

    fn query_channels(&self, req: QueryChannelsRequest)
        -> ChannelResult<Page<IdentifiedChannelEnd>>;

    fn query_connection_channels(
        &self,
        req: QueryConnectionChannelsRequest,
    ) -> ChannelResult<Page<IdentifiedChannelEnd>>;

    fn query_channel_client_state(
        &self,
        req: QueryChannelClientStateRequest,
    ) -> ChannelResult<Proven<IdentifiedClientState>>;

    fn query_packet_commitment(
        &self,
        req: QueryPacketCommitmentRequest,
    ) -> ChannelResult<Proven<Hash256>>;

    fn query_packet_commitments(
        &self,
        req: QueryPacketCommitmentsRequest,
    ) -> ChannelResult<Page<PacketDigest>>;

    fn query_packet_acknowledgement(
        &self,
        req: QueryPacketAcknowledgementRequest,
    ) -> ChannelResult<Proven<Hash256>>;

    fn query_packet_acknowledgements(
        &self,
        req: QueryPacketAcknowledgementsRequest,
    ) -> ChannelResult<Page<PacketDigest>>;

    fn query_next_sequence_send(
        &self,
        req: QueryNextSequenceSendRequest,
    ) -> ChannelResult<Proven<Sequence>>;

    fn query_next_sequence_receive(
        &self,
        req: QueryNextSequenceReceiveRequest,
    ) -> ChannelResult<Proven<Sequence>>;

    fn query_next_sequence_ack(
        &self,
        req: QueryNextSequenceAckRequest,
    ) -> ChannelResult<Proven<Sequence>>;

    fn query_unreceived_packets(
        &self,
        req: QueryUnreceivedPacketsRequest,
    ) -> ChannelResult<Reconciled>;

    fn query_unrelayed_acknowledgements(
        &self,
        req: QueryUnrelayedAcknowledgementsRequest,
    ) -> ChannelResult<Reconciled>;

    fn query(&self, query: Query) -> ChannelResult<QueryResponse> {
        match query {
            Query::Channel(req) => self.query_channel(req).map(QueryResponse::Channel),
            Query::Channels(req) => self.query_channels(req).map(QueryResponse::Channels),
            Query::ConnectionChannels(req) => self
                .query_connection_channels(req)
                .map(QueryResponse::ConnectionChannels),
            Query::ChannelClientState(req) => self
                .query_channel_client_state(req)
                .map(QueryResponse::ChannelClientState),
            Query::PacketCommitment(req) => self
                .query_packet_commitment(req)
                .map(QueryResponse::PacketCommitment),
            Query::PacketCommitments(req) => self
                .query_packet_commitments(req)
                .map(QueryResponse::PacketCommitments),
            Query::PacketAcknowledgement(req) => self
                .query_packet_acknowledgement(req)
                .map(QueryResponse::PacketAcknowledgement),
            Query::PacketAcknowledgements(req) => self
                .query_packet_acknowledgements(req)
                .map(QueryResponse::PacketAcknowledgements),
            Query::NextSequenceSend(req) => self
                .query_next_sequence_send(req)
                .map(QueryResponse::NextSequenceSend),
            Query::NextSequenceReceive(req) => self
                .query_next_sequence_receive(req)
                .map(QueryResponse::NextSequenceReceive),
            Query::NextSequenceAck(req) => self
                .query_next_sequence_ack(req)
                .map(QueryResponse::NextSequenceAck),
            Query::UnreceivedPackets(req) => self
                .query_unreceived_packets(req)
                .map(QueryResponse::UnreceivedPackets),
            Query::UnrelayedAcknowledgements(req) => self
                .query_unrelayed_acknowledgements(req)
                .map(QueryResponse::UnrelayedAcknowledgements),
        }
    }

    /// Answer a JSON-encoded [`Query`] with a JSON-encoded [`QueryOutcome`].
    ///
    /// Never fails: malformed input is reported as an invalid argument error
    /// in the outcome.
    fn query_json(&self, raw_query: &[u8]) -> Vec<u8> {
        let outcome = match raw_query.deserialize_json::<Query>() {
            Ok(query) => match self.query(query) {
                Ok(response) => QueryOutcome::Ok(response),
                Err(err) => QueryOutcome::Error(err.into()),
            },
            Err(err) => QueryOutcome::Error(ChannelError::invalid_argument(err).into()),
        };

        outcome.to_json_vec().unwrap_or_else(|err| {
            tracing::error!(err = err.to_string(), "Failed to serialize query outcome");

            br#"{"error":{"kind":"internal","message":"failed to serialize query outcome"}}"#
                .to_vec()
        })
    }
}

impl<DB> ChannelQuery for QueryService<DB>
where
    DB: Db,
    ChannelError: From<DB::Error>,
{
    fn query_channel(&self, req: QueryChannelRequest) -> ChannelResult<Proven<ChannelEnd>> {
        let channel = ChannelIdentity::parse(&req.port_id, &req.channel_id)?;
        self.channel(&channel, req.height, req.include_proof)
    }

    fn query_channels(
        &self,
        req: QueryChannelsRequest,
    ) -> ChannelResult<Page<IdentifiedChannelEnd>> {
        self.channels(&req.page, req.height)
    }

    fn query_connection_channels(
        &self,
        req: QueryConnectionChannelsRequest,
    ) -> ChannelResult<Page<IdentifiedChannelEnd>> {
        let connection_id = req.connection_id.parse::<ConnectionId>()?;
        self.connection_channels(&connection_id, &req.page, req.height)
    }

    fn query_channel_client_state(
        &self,
        req: QueryChannelClientStateRequest,
    ) -> ChannelResult<Proven<IdentifiedClientState>> {
        let channel = ChannelIdentity::parse(&req.port_id, &req.channel_id)?;
        self.channel_client_state(&channel, req.height, req.include_proof)
    }

    fn query_packet_commitment(
        &self,
        req: QueryPacketCommitmentRequest,
    ) -> ChannelResult<Proven<Hash256>> {
        let channel = ChannelIdentity::parse(&req.port_id, &req.channel_id)?;
        self.packet_commitment(&channel, req.sequence, req.height, req.include_proof)
    }

    fn query_packet_commitments(
        &self,
        req: QueryPacketCommitmentsRequest,
    ) -> ChannelResult<Page<PacketDigest>> {
        let channel = ChannelIdentity::parse(&req.port_id, &req.channel_id)?;
        self.packet_commitments(&channel, &req.page, req.height)
    }

    fn query_packet_acknowledgement(
        &self,
        req: QueryPacketAcknowledgementRequest,
    ) -> ChannelResult<Proven<Hash256>> {
        let channel = ChannelIdentity::parse(&req.port_id, &req.channel_id)?;
        self.packet_acknowledgement(&channel, req.sequence, req.height, req.include_proof)
    }

    fn query_packet_acknowledgements(
        &self,
        req: QueryPacketAcknowledgementsRequest,
    ) -> ChannelResult<Page<PacketDigest>> {
        let channel = ChannelIdentity::parse(&req.port_id, &req.channel_id)?;
        self.packet_acknowledgements(&channel, &req.page, req.height)
    }

    fn query_next_sequence_send(
        &self,
        req: QueryNextSequenceSendRequest,
    ) -> ChannelResult<Proven<Sequence>> {
        let channel = ChannelIdentity::parse(&req.port_id, &req.channel_id)?;
        self.next_sequence_send(&channel, req.height, req.include_proof)
    }

    fn query_next_sequence_receive(
        &self,
        req: QueryNextSequenceReceiveRequest,
    ) -> ChannelResult<Proven<Sequence>> {
        let channel = ChannelIdentity::parse(&req.port_id, &req.channel_id)?;
        self.next_sequence_recv(&channel, req.height, req.include_proof)
    }

    fn query_next_sequence_ack(
        &self,
        req: QueryNextSequenceAckRequest,
    ) -> ChannelResult<Proven<Sequence>> {
        let channel = ChannelIdentity::parse(&req.port_id, &req.channel_id)?;
        self.next_sequence_ack(&channel, req.height, req.include_proof)
    }

    fn query_unreceived_packets(
        &self,
        req: QueryUnreceivedPacketsRequest,
    ) -> ChannelResult<Reconciled> {
        let channel = ChannelIdentity::parse(&req.port_id, &req.channel_id)?;
        self.unreceived_packets(&channel, &req.sequences, req.height)
    }

    fn query_unrelayed_acknowledgements(
        &self,
        req: QueryUnrelayedAcknowledgementsRequest,
    ) -> ChannelResult<Reconciled> {
        let channel = ChannelIdentity::parse(&req.port_id, &req.channel_id)?;
        self.unrelayed_acknowledgements(&channel, &req.sequences, req.height)
    }
}
