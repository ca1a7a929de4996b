//! Relayer-facing set computations over the acknowledgement store.
//!
//! Given the sequences a relayer believes are in flight, work out which of
//! them the local chain hasn't received yet, and which it has acknowledged
//! but whose acknowledgement may still need relaying.

use {
    crate::{has_acknowledgement, ChannelError, ChannelResult},
    conduit_types::{ChannelIdentity, Sequence, Storage},
    std::collections::BTreeSet,
};

/// Deduplicate and sort a candidate list, rejecting it if it carries more than
/// `max` entries.
///
/// The length is checked before deduplication: it bounds the size of the
/// request, not the size of the set.
pub fn normalize_candidates(
    candidates: &[Sequence],
    max: usize,
) -> ChannelResult<BTreeSet<Sequence>> {
    if candidates.len() > max {
        return Err(ChannelError::invalid_argument(format!(
            "too many candidate sequences: {} > {max}",
            candidates.len()
        )));
    }

    Ok(candidates.iter().copied().collect())
}

/// Candidates for which no acknowledgement exists, in ascending order.
pub fn unreceived_packets(
    storage: &dyn Storage,
    channel: &ChannelIdentity,
    candidates: &BTreeSet<Sequence>,
) -> Vec<Sequence> {
    partition(storage, channel, candidates).1
}

/// Candidates for which an acknowledgement exists, in ascending order.
///
/// Whether the packet's commitment still exists on the sending chain is for
/// the caller to check there.
pub fn unrelayed_acknowledgements(
    storage: &dyn Storage,
    channel: &ChannelIdentity,
    candidates: &BTreeSet<Sequence>,
) -> Vec<Sequence> {
    partition(storage, channel, candidates).0
}

/// Split candidates into (acknowledged, not acknowledged), one lookup each.
fn partition(
    storage: &dyn Storage,
    channel: &ChannelIdentity,
    candidates: &BTreeSet<Sequence>,
) -> (Vec<Sequence>, Vec<Sequence>) {
    candidates
        .iter()
        .partition(|sequence| has_acknowledgement(storage, channel, **sequence))
}
