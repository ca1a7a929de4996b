use {
    crate::{ChannelId, ChannelIdentity, ConnectionId, PortId},
    borsh::{BorshDeserialize, BorshSerialize},
    serde::{Deserialize, Serialize},
    strum_macros::{Display, EnumString},
};

/// Handshake state of a channel end.
///
/// The variants are declared in the order a channel moves through them.
#[derive(
    Serialize,
    Deserialize,
    BorshSerialize,
    BorshDeserialize,
    Display,
    EnumString,
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum State {
    Init,
    TryOpen,
    Open,
    Closed,
}

impl State {
    /// Whether a channel end currently in `self` may be saved as `next`.
    ///
    /// States only move forward. Saving the same state again is allowed (the
    /// counterparty channel id may be filled in during TRYOPEN, for example).
    /// CLOSED is terminal.
    pub fn can_transition_to(self, next: State) -> bool {
        match self {
            State::Closed => next == State::Closed,
            _ => next >= self,
        }
    }

    /// A channel end can only come into existence in INIT or TRYOPEN.
    pub fn is_initial(self) -> bool {
        matches!(self, State::Init | State::TryOpen)
    }
}

/// Delivery ordering guarantee of a channel.
#[derive(
    Serialize,
    Deserialize,
    BorshSerialize,
    BorshDeserialize,
    Display,
    EnumString,
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum Ordering {
    Unordered,
    Ordered,
}

/// The other end of a channel. The channel id is unknown until the
/// counterparty has executed its side of the handshake.
#[derive(
    Serialize, Deserialize, BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq, Hash,
)]
pub struct Counterparty {
    pub port_id: PortId,
    pub channel_id: Option<ChannelId>,
}

#[derive(
    Serialize, Deserialize, BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq, Hash,
)]
pub struct ChannelEnd {
    pub state: State,
    pub ordering: Ordering,
    pub counterparty: Counterparty,
    pub connection_hops: Vec<ConnectionId>,
    pub version: String,
}

impl ChannelEnd {
    pub fn is_open(&self) -> bool {
        self.state == State::Open
    }

    pub fn routes_through(&self, connection_id: &ConnectionId) -> bool {
        self.connection_hops.contains(connection_id)
    }
}

/// A channel end together with the identity it is stored under.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct IdentifiedChannelEnd {
    pub port_id: PortId,
    pub channel_id: ChannelId,
    pub channel_end: ChannelEnd,
}

impl IdentifiedChannelEnd {
    pub fn new(identity: ChannelIdentity, channel_end: ChannelEnd) -> Self {
        Self {
            port_id: identity.port_id,
            channel_id: identity.channel_id,
            channel_end,
        }
    }

    pub fn identity(&self) -> ChannelIdentity {
        ChannelIdentity::new(self.port_id.clone(), self.channel_id.clone())
    }
}
