use {
    crate::{
        ChannelError, ChannelResult, Listing, CHANNELS, CHANNEL_INSERTIONS, CONNECTION_CHANNELS,
    },
    conduit_storage::Bound,
    conduit_types::{
        ChannelEnd, ChannelIdentity, ConnectionId, IdentifiedChannelEnd, Order, Storage,
    },
};

pub fn query_channel(
    storage: &dyn Storage,
    channel: &ChannelIdentity,
) -> ChannelResult<ChannelEnd> {
    CHANNELS
        .may_load(storage, channel)?
        .ok_or_else(|| ChannelError::channel_not_found(channel))
}

/// List channels in the order they were first registered.
///
/// The listing is keyed by insertion index.
pub fn query_channels(
    storage: &dyn Storage,
    start_after: Option<u64>,
    limit: usize,
) -> ChannelResult<Listing<IdentifiedChannelEnd>> {
    let iter = CHANNEL_INSERTIONS
        .range(storage, start_after.map(Bound::Exclusive), None, Order::Ascending)
        .map(|res| -> ChannelResult<_> {
            let (index, channel) = res?;
            let channel_end = CHANNELS.load(storage, &channel)?;
            Ok((index, IdentifiedChannelEnd::new(channel, channel_end)))
        });

    Listing::collect(iter, limit)
}

/// List the channels routing through the given connection, in the order they
/// were first registered.
pub fn query_connection_channels(
    storage: &dyn Storage,
    connection_id: &ConnectionId,
    start_after: Option<u64>,
    limit: usize,
) -> ChannelResult<Listing<IdentifiedChannelEnd>> {
    let iter = CONNECTION_CHANNELS
        .prefix(connection_id)
        .range(storage, start_after.map(Bound::Exclusive), None, Order::Ascending)
        .map(|res| -> ChannelResult<_> {
            let (index, channel) = res?;
            let channel_end = CHANNELS.load(storage, &channel)?;
            Ok((index, IdentifiedChannelEnd::new(channel, channel_end)))
        });

    Listing::collect(iter, limit)
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::{host, ErrorKind},
        conduit_types::{ChannelId, Counterparty, MockStorage, Ordering, PortId, State},
    };

    fn channel_end(hops: &[u64]) -> ChannelEnd {
        ChannelEnd {
            state: State::Init,
            ordering: Ordering::Ordered,
            counterparty: Counterparty {
                port_id: PortId::new_unchecked("transfer"),
                channel_id: None,
            },
            connection_hops: hops.iter().copied().map(ConnectionId::with_index).collect(),
            version: "ics20-1".to_string(),
        }
    }

    fn setup() -> MockStorage {
        let mut storage = MockStorage::new();
        // Register in an order that differs from the lexicographic one.
        for (index, hops) in [(10, vec![0]), (2, vec![1]), (7, vec![0, 1]), (1, vec![0])] {
            let channel = ChannelIdentity::new(
                PortId::new_unchecked("transfer"),
                ChannelId::with_index(index),
            );
            host::save_channel(&mut storage, &channel, &channel_end(&hops)).unwrap();
        }
        storage
    }

    fn channel_ids(listing: &Listing<IdentifiedChannelEnd>) -> Vec<String> {
        listing
            .items
            .iter()
            .map(|item| item.channel_id.to_string())
            .collect()
    }

    #[test]
    fn querying_single_channel() {
        let storage = setup();

        let channel = ChannelIdentity::parse("transfer", "channel-7").unwrap();
        let end = query_channel(&storage, &channel).unwrap();
        assert_eq!(end.connection_hops.len(), 2);

        let missing = ChannelIdentity::parse("transfer", "channel-8").unwrap();
        let err = query_channel(&storage, &missing).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn channels_are_listed_in_insertion_order() {
        let storage = setup();

        let first = query_channels(&storage, None, 3).unwrap();
        assert_eq!(channel_ids(&first), ["channel-10", "channel-2", "channel-7"]);
        assert_eq!(first.last_key, Some(2));

        let second = query_channels(&storage, first.last_key, 3).unwrap();
        assert_eq!(channel_ids(&second), ["channel-1"]);
        assert_eq!(second.last_key, None);
    }

    #[test]
    fn channels_are_filtered_by_connection() {
        let storage = setup();

        let listing =
            query_connection_channels(&storage, &ConnectionId::with_index(0), None, 10).unwrap();
        assert_eq!(channel_ids(&listing), ["channel-10", "channel-7", "channel-1"]);

        let listing =
            query_connection_channels(&storage, &ConnectionId::with_index(1), None, 1).unwrap();
        assert_eq!(channel_ids(&listing), ["channel-2"]);
        assert_eq!(listing.last_key, Some(1));

        let listing =
            query_connection_channels(&storage, &ConnectionId::with_index(5), None, 10).unwrap();
        assert!(listing.items.is_empty());
    }
}
