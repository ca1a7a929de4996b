use {
    crate::{ChannelError, ChannelResult, Listing, COMMITMENTS},
    conduit_storage::Bound,
    conduit_types::{ChannelIdentity, Hash256, Order, PacketDigest, Sequence, Storage},
};

/// Load the commitment of a packet. A packet that was never sent, or whose
/// commitment has been cleared, is not found; a zero digest is never returned
/// in its place.
pub fn query_commitment(
    storage: &dyn Storage,
    channel: &ChannelIdentity,
    sequence: Sequence,
) -> ChannelResult<Hash256> {
    COMMITMENTS
        .may_load(storage, (channel, sequence))?
        .ok_or_else(|| ChannelError::CommitmentNotFound {
            channel: channel.clone(),
            sequence,
        })
}

/// List outstanding commitments of a channel in ascending sequence.
pub fn query_commitments(
    storage: &dyn Storage,
    channel: &ChannelIdentity,
    start_after: Option<u64>,
    limit: usize,
) -> ChannelResult<Listing<PacketDigest>> {
    let iter = COMMITMENTS
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
