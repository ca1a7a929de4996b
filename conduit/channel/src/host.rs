//! Write primitives called by the handshake and packet handling logic of the
//! host chain. The query service never calls these; they exist so that the
//! invariants the reads rely on are enforced at the single place state is
//! written.

use {
    crate::{
        ChannelError, ChannelResult, ACKNOWLEDGEMENTS, CHANNELS, CHANNEL_COUNT, CHANNEL_INSERTIONS,
        CLIENT_STATES, COMMITMENTS, CONNECTIONS, CONNECTION_CHANNELS, NEXT_SEQUENCE_ACK,
        NEXT_SEQUENCE_RECV, NEXT_SEQUENCE_SEND,
    },
    conduit_storage::Map,
    conduit_types::{
        Binary, ChannelEnd, ChannelIdentity, ClientId, ConnectionEnd, ConnectionId, Hash256,
        Sequence, Storage,
    },
};

// ---------------------------------- channel ----------------------------------

/// Create or update a channel end.
///
/// A new channel must start in INIT or TRYOPEN. It's assigned the next
/// insertion index, indexed under every connection it routes through, and its
/// three sequence counters are set to 1. An existing channel may only move
/// forward in state, and its connection hops can't change.
pub fn save_channel(
    storage: &mut dyn Storage,
    channel: &ChannelIdentity,
    channel_end: &ChannelEnd,
) -> ChannelResult<()> {
    match _save_channel(storage, channel, channel_end) {
        Ok(created) => {
            tracing::info!(
                channel = channel.to_string(),
                state = channel_end.state.to_string(),
                created,
                "Saved channel"
            );

            Ok(())
        },
        Err(err) => {
            tracing::warn!(
                channel = channel.to_string(),
                err = err.to_string(),
                "Failed to save channel"
            );

            Err(err)
        },
    }
}

fn _save_channel(
    storage: &mut dyn Storage,
    channel: &ChannelIdentity,
    channel_end: &ChannelEnd,
) -> ChannelResult<bool> {
    if let Some(existing) = CHANNELS.may_load(storage, channel)? {
        if !existing.state.can_transition_to(channel_end.state) {
            return Err(ChannelError::IllegalTransition {
                channel: channel.clone(),
                from: existing.state,
                to: channel_end.state,
            });
        }

        if existing.connection_hops != channel_end.connection_hops {
            return Err(ChannelError::ConnectionHopsChanged {
                channel: channel.clone(),
            });
        }

        CHANNELS.save(storage, channel, channel_end)?;

        return Ok(false);
    }

    if !channel_end.state.is_initial() {
        return Err(ChannelError::IllegalInitialState {
            channel: channel.clone(),
            state: channel_end.state,
        });
    }

    let (index, _) = CHANNEL_COUNT.increment(storage)?;

    CHANNELS.save(storage, channel, channel_end)?;
    CHANNEL_INSERTIONS.save(storage, index, channel)?;

    for connection_id in &channel_end.connection_hops {
        CONNECTION_CHANNELS.save(storage, (connection_id, index), channel)?;
    }

    NEXT_SEQUENCE_SEND.save(storage, channel, &Sequence::ONE)?;
    NEXT_SEQUENCE_RECV.save(storage, channel, &Sequence::ONE)?;
    NEXT_SEQUENCE_ACK.save(storage, channel, &Sequence::ONE)?;

    Ok(true)
}

// --------------------------- connections & clients ---------------------------

/// Create or update a connection end. The client a connection is verified by
/// is fixed when the connection is created.
pub fn save_connection(
    storage: &mut dyn Storage,
    connection_id: &ConnectionId,
    connection_end: &ConnectionEnd,
) -> ChannelResult<()> {
    if let Some(existing) = CONNECTIONS.may_load(storage, connection_id)? {
        if existing.client_id != connection_end.client_id {
            let err = ChannelError::ConnectionClientChanged {
                connection_id: connection_id.clone(),
                from: existing.client_id,
                to: connection_end.client_id.clone(),
            };

            tracing::warn!(err = err.to_string(), "Failed to save connection");

            return Err(err);
        }
    }

    CONNECTIONS.save(storage, connection_id, connection_end)?;

    tracing::info!(
        connection_id = connection_id.as_str(),
        client_id = connection_end.client_id.as_str(),
        "Saved connection"
    );

    Ok(())
}

/// Store the latest state of a light client, replacing the previous one.
pub fn save_client_state(
    storage: &mut dyn Storage,
    client_id: &ClientId,
    client_state: &Binary,
) -> ChannelResult<()> {
    CLIENT_STATES.save(storage, client_id, client_state)?;

    tracing::debug!(client_id = client_id.as_str(), "Saved client state");

    Ok(())
}

// ---------------------------------- packets ----------------------------------

/// Record the commitment of an outgoing packet under the next send sequence,
/// and return that sequence. The channel must be OPEN.
pub fn commit_packet(
    storage: &mut dyn Storage,
    channel: &ChannelIdentity,
    digest: Hash256,
) -> ChannelResult<Sequence> {
    match _commit_packet(storage, channel, digest) {
        Ok(sequence) => {
            tracing::debug!(
                channel = channel.to_string(),
                sequence = sequence.number(),
                "Committed packet"
            );

            Ok(sequence)
        },
        Err(err) => {
            tracing::warn!(
                channel = channel.to_string(),
                err = err.to_string(),
                "Failed to commit packet"
            );

            Err(err)
        },
    }
}

fn _commit_packet(
    storage: &mut dyn Storage,
    channel: &ChannelIdentity,
    digest: Hash256,
) -> ChannelResult<Sequence> {
    let channel_end = CHANNELS
        .may_load(storage, channel)?
        .ok_or_else(|| ChannelError::channel_not_found(channel))?;

    if !channel_end.is_open() {
        return Err(ChannelError::ChannelNotOpen {
            channel: channel.clone(),
            state: channel_end.state,
        });
    }

    let sequence = load_counter(storage, &NEXT_SEQUENCE_SEND, "next_sequence_send", channel)?;
    let next = sequence.checked_increment()?;

    COMMITMENTS.save(storage, (channel, sequence), &digest)?;
    NEXT_SEQUENCE_SEND.save(storage, channel, &next)?;

    Ok(sequence)
}

/// Clear the commitment of a packet, once it's been acknowledged or timed out.
pub fn delete_commitment(
    storage: &mut dyn Storage,
    channel: &ChannelIdentity,
    sequence: Sequence,
) -> ChannelResult<()> {
    if !COMMITMENTS.has(storage, (channel, sequence)) {
        return Err(ChannelError::CommitmentNotFound {
            channel: channel.clone(),
            sequence,
        });
    }

    COMMITMENTS.remove(storage, (channel, sequence));

    tracing::debug!(
        channel = channel.to_string(),
        sequence = sequence.number(),
        "Deleted packet commitment"
    );

    Ok(())
}

/// Record the acknowledgement of a received packet. Acknowledgements are
/// written once and never overwritten.
pub fn write_acknowledgement(
    storage: &mut dyn Storage,
    channel: &ChannelIdentity,
    sequence: Sequence,
    digest: Hash256,
) -> ChannelResult<()> {
    match _write_acknowledgement(storage, channel, sequence, digest) {
        Ok(()) => {
            tracing::debug!(
                channel = channel.to_string(),
                sequence = sequence.number(),
                "Wrote acknowledgement"
            );

            Ok(())
        },
        Err(err) => {
            tracing::warn!(
                channel = channel.to_string(),
                sequence = sequence.number(),
                err = err.to_string(),
                "Failed to write acknowledgement"
            );

            Err(err)
        },
    }
}

fn _write_acknowledgement(
    storage: &mut dyn Storage,
    channel: &ChannelIdentity,
    sequence: Sequence,
    digest: Hash256,
) -> ChannelResult<()> {
    if !CHANNELS.has(storage, channel) {
        return Err(ChannelError::channel_not_found(channel));
    }

    if ACKNOWLEDGEMENTS.has(storage, (channel, sequence)) {
        return Err(ChannelError::DuplicateAcknowledgement {
            channel: channel.clone(),
            sequence,
        });
    }

    ACKNOWLEDGEMENTS.save(storage, (channel, sequence), &digest)?;

    Ok(())
}

// --------------------------------- sequences ---------------------------------

pub fn set_next_sequence_send(
    storage: &mut dyn Storage,
    channel: &ChannelIdentity,
    sequence: Sequence,
) -> ChannelResult<()> {
    set_counter(storage, &NEXT_SEQUENCE_SEND, "next_sequence_send", channel, sequence)
}

pub fn set_next_sequence_recv(
    storage: &mut dyn Storage,
    channel: &ChannelIdentity,
    sequence: Sequence,
) -> ChannelResult<()> {
    set_counter(storage, &NEXT_SEQUENCE_RECV, "next_sequence_recv", channel, sequence)
}

pub fn set_next_sequence_ack(
    storage: &mut dyn Storage,
    channel: &ChannelIdentity,
    sequence: Sequence,
) -> ChannelResult<()> {
    set_counter(storage, &NEXT_SEQUENCE_ACK, "next_sequence_ack", channel, sequence)
}

fn load_counter<'a>(
    storage: &dyn Storage,
    map: &Map<'_, &'a ChannelIdentity, Sequence>,
    counter: &'static str,
    channel: &'a ChannelIdentity,
) -> ChannelResult<Sequence> {
    map.may_load(storage, channel)?
        .ok_or_else(|| ChannelError::SequenceNotFound {
            counter,
            channel: channel.clone(),
        })
}

fn set_counter<'a>(
    storage: &mut dyn Storage,
    map: &Map<'_, &'a ChannelIdentity, Sequence>,
    counter: &'static str,
    channel: &'a ChannelIdentity,
    sequence: Sequence,
) -> ChannelResult<()> {
    let current = load_counter(storage, map, counter, channel)?;

    if sequence < current {
        return Err(ChannelError::SequenceRegression {
            counter,
            channel: channel.clone(),
            current,
            new: sequence,
        });
    }

    map.save(storage, channel, &sequence)?;

    Ok(())
}

// ----------------------------------- tests -----------------------------------
