use {
    conduit_types::{
        ChannelId, ChannelIdentity, ClientId, ConnectionId, Height, PortId, Sequence, State,
        StdError,
    },
    serde::{Deserialize, Serialize},
    strum_macros::{Display, EnumString},
    thiserror::Error,
};

/// Classification of a [`ChannelError`], surfaced to callers of the query
/// service and the transport adapter.
#[derive(
    Serialize, Deserialize, Display, EnumString, Debug, Clone, Copy, PartialEq, Eq, Hash,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    /// A channel, connection, client state, commitment, acknowledgement,
    /// counter or height is absent.
    NotFound,
    /// A pagination cursor that doesn't decode, belongs to another listing, or
    /// refers to a height that is no longer available.
    InvalidCursor,
    /// Malformed identifiers, page sizes, heights or candidate lists.
    InvalidArgument,
    /// A proof was generated at a different version than the value it
    /// accompanies.
    ProofInconsistency,
    /// A write would break a channel invariant.
    FailedPrecondition,
    /// Store or codec failures.
    Internal,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChannelError {
    #[error(transparent)]
    Std(#[from] StdError),

    #[error("database error: {0}")]
    Db(String),

    #[error("config error: {0}")]
    Config(String),

    // ------------------------------ not found -------------------------------
    #[error("channel not found! port: {port_id}, channel: {channel_id}")]
    ChannelNotFound {
        port_id: PortId,
        channel_id: ChannelId,
    },

    #[error("packet commitment not found! channel: {channel}, sequence: {sequence}")]
    CommitmentNotFound {
        channel: ChannelIdentity,
        sequence: Sequence,
    },

    #[error("acknowledgement not found! channel: {channel}, sequence: {sequence}")]
    AcknowledgementNotFound {
        channel: ChannelIdentity,
        sequence: Sequence,
    },

    #[error("{counter} not found for channel {channel}")]
    SequenceNotFound {
        counter: &'static str,
        channel: ChannelIdentity,
    },

    #[error("channel {channel} has no connection hops")]
    NoConnectionHops { channel: ChannelIdentity },

    #[error("connection not found: {connection_id}")]
    ConnectionNotFound { connection_id: ConnectionId },

    #[error("client state not found: {client_id}")]
    ClientStateNotFound { client_id: ClientId },

    #[error("no state has been committed yet")]
    NoCommittedHeight,

    #[error("height {requested} is not yet available! latest: {latest}")]
    HeightNotReached { requested: Height, latest: Height },

    #[error("height {requested} has been pruned! oldest available: {oldest}")]
    HeightPruned { requested: Height, oldest: Height },

    // --------------------------- invalid request ----------------------------
    #[error("invalid cursor: {reason}")]
    InvalidCursor { reason: String },

    #[error("invalid argument: {reason}")]
    InvalidArgument { reason: String },

    // ------------------------------- proofs ---------------------------------
    #[error("proof was generated at version {proof_version}, but the value was read at version {snapshot_version}")]
    ProofInconsistency {
        snapshot_version: u64,
        proof_version: u64,
    },

    // ---------------------------- host writes -------------------------------
    #[error("channel {channel} can't move from {from} to {to}")]
    IllegalTransition {
        channel: ChannelIdentity,
        from: State,
        to: State,
    },

    #[error("channel {channel} can't be created in state {state}")]
    IllegalInitialState { channel: ChannelIdentity, state: State },

    #[error("connection hops of channel {channel} can't be changed")]
    ConnectionHopsChanged { channel: ChannelIdentity },

    #[error("channel {channel} is not open! state: {state}")]
    ChannelNotOpen { channel: ChannelIdentity, state: State },

    #[error("{counter} of channel {channel} can't decrease from {current} to {new}")]
    SequenceRegression {
        counter: &'static str,
        channel: ChannelIdentity,
        current: Sequence,
        new: Sequence,
    },

    #[error("acknowledgement already written! channel: {channel}, sequence: {sequence}")]
    DuplicateAcknowledgement {
        channel: ChannelIdentity,
        sequence: Sequence,
    },

    #[error("client of connection {connection_id} can't change from {from} to {to}")]
    ConnectionClientChanged {
        connection_id: ConnectionId,
        from: ClientId,
        to: ClientId,
    },
}

impl ChannelError {
    pub fn channel_not_found(channel: &ChannelIdentity) -> Self {
        Self::ChannelNotFound {
            port_id: channel.port_id.clone(),
            channel_id: channel.channel_id.clone(),
        }
    }

    pub fn invalid_cursor<R>(reason: R) -> Self
    where
        R: ToString,
    {
        Self::InvalidCursor {
            reason: reason.to_string(),
        }
    }

    pub fn invalid_argument<R>(reason: R) -> Self
    where
        R: ToString,
    {
        Self::InvalidArgument {
            reason: reason.to_string(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ChannelError::Std(StdError::DataNotFound { .. })
            | ChannelError::ChannelNotFound { .. }
            | ChannelError::CommitmentNotFound { .. }
            | ChannelError::AcknowledgementNotFound { .. }
            | ChannelError::SequenceNotFound { .. }
            | ChannelError::NoConnectionHops { .. }
            | ChannelError::ConnectionNotFound { .. }
            | ChannelError::ClientStateNotFound { .. }
            | ChannelError::NoCommittedHeight
            | ChannelError::HeightNotReached { .. }
            | ChannelError::HeightPruned { .. } => ErrorKind::NotFound,
            ChannelError::InvalidCursor { .. } => ErrorKind::InvalidCursor,
            ChannelError::Std(StdError::InvalidIdentifier { .. })
            | ChannelError::InvalidArgument { .. } => ErrorKind::InvalidArgument,
            ChannelError::ProofInconsistency { .. } => ErrorKind::ProofInconsistency,
            ChannelError::IllegalTransition { .. }
            | ChannelError::IllegalInitialState { .. }
            | ChannelError::ConnectionHopsChanged { .. }
            | ChannelError::ChannelNotOpen { .. }
            | ChannelError::SequenceRegression { .. }
            | ChannelError::DuplicateAcknowledgement { .. }
            | ChannelError::ConnectionClientChanged { .. } => ErrorKind::FailedPrecondition,
            ChannelError::Std(_) | ChannelError::Db(_) | ChannelError::Config(_) => {
                ErrorKind::Internal
            },
        }
    }
}

impl From<config::ConfigError> for ChannelError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

pub type ChannelResult<T> = core::result::Result<T, ChannelError>;
