use {
    conduit_storage::{Counter, Map},
    conduit_types::{
        Binary, ChannelEnd, ChannelIdentity, ClientId, ConnectionEnd, ConnectionId, Hash256,
        Sequence,
    },
};

/// (port, channel) => channel end
pub const CHANNELS: Map<&ChannelIdentity, ChannelEnd> = Map::new("channels");

/// Number of channels ever registered. Doubles as the insertion index of the
/// next channel.
pub const CHANNEL_COUNT: Counter<u64> = Counter::new("channel_count", 0, 1);

/// insertion index => (port, channel)
pub const CHANNEL_INSERTIONS: Map<u64, ChannelIdentity> = Map::new("channel_insertions");

/// (connection, insertion index) => (port, channel)
pub const CONNECTION_CHANNELS: Map<(&ConnectionId, u64), ChannelIdentity> =
    Map::new("connection_channels");

/// (port, channel, sequence) => packet commitment digest
pub const COMMITMENTS: Map<(&ChannelIdentity, Sequence), Hash256> = Map::new("commitments");

/// (port, channel, sequence) => acknowledgement digest
pub const ACKNOWLEDGEMENTS: Map<(&ChannelIdentity, Sequence), Hash256> = Map::new("acks");

pub const NEXT_SEQUENCE_SEND: Map<&ChannelIdentity, Sequence> = Map::new("next_sequence_send");

pub const NEXT_SEQUENCE_RECV: Map<&ChannelIdentity, Sequence> = Map::new("next_sequence_recv");

pub const NEXT_SEQUENCE_ACK: Map<&ChannelIdentity, Sequence> = Map::new("next_sequence_ack");

/// connection => connection end
pub const CONNECTIONS: Map<&ConnectionId, ConnectionEnd> = Map::new("connections");

/// client => client state, in the encoding of the client implementation
pub const CLIENT_STATES: Map<&ClientId, Binary> = Map::new("client_states");
