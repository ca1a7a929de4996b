use {
    crate::{ChannelError, ChannelResult, CHANNELS, CLIENT_STATES, CONNECTIONS},
    conduit_types::{ChannelIdentity, IdentifiedClientState, Storage},
};

/// The state of the light client that verifies a channel's counterparty,
/// found through the first connection the channel routes through.
pub fn query_channel_client_state(
    storage: &dyn Storage,
    channel: &ChannelIdentity,
) -> ChannelResult<IdentifiedClientState> {
    let channel_end = CHANNELS
        .may_load(storage, channel)?
        .ok_or_else(|| ChannelError::channel_not_found(channel))?;

    let Some(connection_id) = channel_end.connection_hops.first() else {
        return Err(ChannelError::NoConnectionHops {
            channel: channel.clone(),
        });
    };

    let connection_end = CONNECTIONS
        .may_load(storage, connection_id)?
        .ok_or_else(|| ChannelError::ConnectionNotFound {
            connection_id: connection_id.clone(),
        })?;

    let client_state = CLIENT_STATES
        .may_load(storage, &connection_end.client_id)?
        .ok_or_else(|| ChannelError::ClientStateNotFound {
            client_id: connection_end.client_id.clone(),
        })?;

    Ok(IdentifiedClientState::new(connection_end.client_id, client_state))
}
