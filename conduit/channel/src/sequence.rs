use {
    crate::{
        ChannelError, ChannelResult, NEXT_SEQUENCE_ACK, NEXT_SEQUENCE_RECV, NEXT_SEQUENCE_SEND,
    },
    conduit_types::{ChannelIdentity, Sequence, Storage},
};

pub fn query_next_sequence_send(
    storage: &dyn Storage,
    channel: &ChannelIdentity,
) -> ChannelResult<Sequence> {
    NEXT_SEQUENCE_SEND
        .may_load(storage, channel)?
        .ok_or_else(|| ChannelError::SequenceNotFound {
            counter: "next_sequence_send",
            channel: channel.clone(),
        })
}

pub fn query_next_sequence_recv(
    storage: &dyn Storage,
    channel: &ChannelIdentity,
) -> ChannelResult<Sequence> {
    NEXT_SEQUENCE_RECV
        .may_load(storage, channel)?
        .ok_or_else(|| ChannelError::SequenceNotFound {
            counter: "next_sequence_recv",
            channel: channel.clone(),
        })
}

pub fn query_next_sequence_ack(
    storage: &dyn Storage,
    channel: &ChannelIdentity,
) -> ChannelResult<Sequence> {
    NEXT_SEQUENCE_ACK
        .may_load(storage, channel)?
        .ok_or_else(|| ChannelError::SequenceNotFound {
            counter: "next_sequence_ack",
            channel: channel.clone(),
        })
}
