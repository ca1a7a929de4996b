use {
    crate::{ChannelError, ChannelResult, Listing, ACKNOWLEDGEMENTS},
    conduit_storage::Bound,
    conduit_types::{ChannelIdentity, Hash256, Order, PacketDigest, Sequence, Storage},
};

pub fn query_acknowledgement(
    storage: &dyn Storage,
    channel: &ChannelIdentity,
    sequence: Sequence,
) -> ChannelResult<Hash256> {
    ACKNOWLEDGEMENTS
        .may_load(storage, (channel, sequence))?
        .ok_or_else(|| ChannelError::AcknowledgementNotFound {
            channel: channel.clone(),
            sequence,
        })
}

/// Whether an acknowledgement has been written for the packet. Only the
/// existence of the key is checked; the digest isn't decoded.
pub fn has_acknowledgement(
    storage: &dyn Storage,
    channel: &ChannelIdentity,
    sequence: Sequence,
) -> bool {
    ACKNOWLEDGEMENTS.has(storage, (channel, sequence))
}

pub fn query_acknowledgements(
    storage: &dyn Storage,
    channel: &ChannelIdentity,
    start_after: Option<u64>,
    limit: usize,
) -> ChannelResult<Listing<PacketDigest>> {
    let iter = ACKNOWLEDGEMENTS
        .prefix(channel)
        .range(
            storage,
            start_after.map(|sequence| Bound::Exclusive(Sequence::new(sequence))),
            None,
            Order::Ascending,
        )
        .map(|res| -> ChannelResult<_> {
            let (sequence, digest) = res?;
            Ok((sequence.number(), PacketDigest { sequence, digest }))
        });

    Listing::collect(iter, limit)
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        conduit_types::{compute_ack_commitment, MockStorage},
        test_case::test_case,
    };

    fn channel() -> ChannelIdentity {
        ChannelIdentity::parse("transfer", "channel-0").unwrap()
    }

    fn setup() -> MockStorage {
        let mut storage = MockStorage::new();
        for sequence in [1, 3, 300] {
            ACKNOWLEDGEMENTS
                .save(
                    &mut storage,
                    (&channel(), Sequence::new(sequence)),
                    &compute_ack_commitment(b"ok"),
                )
                .unwrap();
        }
        storage
    }

    #[test_case(1 => true; "written")]
    #[test_case(2 => false; "gap")]
    #[test_case(0 => false; "zero")]
    #[test_case(300 => true; "sorted numerically not lexicographically")]
    #[test_case(u64::MAX => false; "far future")]
    fn checking_acknowledgement(sequence: u64) -> bool {
        has_acknowledgement(&setup(), &channel(), Sequence::new(sequence))
    }

    #[test]
    fn querying_acknowledgement() {
        let storage = setup();

        assert_eq!(
            query_acknowledgement(&storage, &channel(), Sequence::new(3)).unwrap(),
            compute_ack_commitment(b"ok")
        );
        assert!(matches!(
            query_acknowledgement(&storage, &channel(), Sequence::new(2)),
            Err(ChannelError::AcknowledgementNotFound { .. })
        ));
    }

    #[test]
    fn acknowledgements_are_listed_by_sequence() {
        let storage = setup();

        let listing = query_acknowledgements(&storage, &channel(), Some(1), 10).unwrap();
        let sequences = listing
            .items
            .iter()
            .map(|item| item.sequence.number())
            .collect::<Vec<_>>();
        assert_eq!(sequences, [3, 300]);
        assert_eq!(listing.last_key, None);
    }
}
