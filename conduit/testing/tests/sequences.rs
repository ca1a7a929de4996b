use {
    conduit_channel::ErrorKind,
    conduit_testing::{ResultExt, TestBuilder},
    conduit_types::{ChannelIdentity, Height, IncludeProof, QueryHeight, Sequence},
};

#[test]
fn counters_start_at_one() {
    let mut suite = TestBuilder::new().build().unwrap();

    let channel = suite
        .open_channel("transfer", "channel-0", &["connection-0"])
        .should_succeed();
    suite.make_block();

    for sequence in [
        suite.service.next_sequence_send(&channel, QueryHeight::Latest, IncludeProof::No),
        suite.service.next_sequence_recv(&channel, QueryHeight::Latest, IncludeProof::No),
        suite.service.next_sequence_ack(&channel, QueryHeight::Latest, IncludeProof::No),
    ] {
        sequence
            .map(|proven| proven.value)
            .should_succeed_and_equal(Sequence::ONE);
    }
}

#[test]
fn counters_of_unknown_channels_are_not_found() {
    let suite = TestBuilder::new().build().unwrap();
    let channel = ChannelIdentity::parse("transfer", "channel-0").unwrap();

    suite
        .service
        .next_sequence_send(&channel, QueryHeight::Latest, IncludeProof::No)
        .should_fail_with_kind(ErrorKind::NotFound);
    suite
        .service
        .next_sequence_recv(&channel, QueryHeight::Latest, IncludeProof::No)
        .should_fail_with_kind(ErrorKind::NotFound);
    suite
        .service
        .next_sequence_ack(&channel, QueryHeight::Latest, IncludeProof::No)
        .should_fail_with_kind(ErrorKind::NotFound);
}

#[test]
fn counters_never_decrease() {
    let mut suite = TestBuilder::new().build().unwrap();

    let channel = suite
        .open_channel("transfer", "channel-0", &["connection-0"])
        .should_succeed();
    suite.make_block();

    suite
        .set_next_sequence_recv(&channel, Sequence::new(5))
        .should_succeed();

    // Setting the same value again is fine.
    suite
        .set_next_sequence_recv(&channel, Sequence::new(5))
        .should_succeed();

    suite
        .set_next_sequence_recv(&channel, Sequence::new(4))
        .should_fail_with_kind(ErrorKind::FailedPrecondition);

    suite
        .set_next_sequence_ack(&channel, Sequence::new(3))
        .should_succeed();

    suite
        .set_next_sequence_send(&channel, Sequence::new(0))
        .should_fail_with_kind(ErrorKind::FailedPrecondition);

    suite.make_block();

    suite
        .service
        .next_sequence_recv(&channel, QueryHeight::Latest, IncludeProof::No)
        .map(|proven| proven.value)
        .should_succeed_and_equal(Sequence::new(5));
    suite
        .service
        .next_sequence_ack(&channel, QueryHeight::Latest, IncludeProof::No)
        .map(|proven| proven.value)
        .should_succeed_and_equal(Sequence::new(3));
}

#[test]
fn counters_are_monotonic_across_heights() {
    let mut suite = TestBuilder::new().build().unwrap();

    let channel = suite
        .open_channel("transfer", "channel-0", &["connection-0"])
        .should_succeed();
    let first = suite.make_block();

    let mut heights = vec![first];
    for round in 1..=6_u8 {
        // Some blocks send packets, some don't.
        for i in 0..(round % 3) {
            suite.send_packet(&channel, &[round, i]).should_succeed();
        }

        suite
            .set_next_sequence_recv(&channel, Sequence::new(u64::from(round) * 2))
            .should_succeed();

        heights.push(suite.make_block());
    }

    let observed = heights
        .iter()
        .map(|height| {
            let height = QueryHeight::Specific(*height);
            let send = suite
                .service
                .next_sequence_send(&channel, height, IncludeProof::No)
                .should_succeed();
            let recv = suite
                .service
                .next_sequence_recv(&channel, height, IncludeProof::No)
                .should_succeed();

            (send.value, recv.value)
        })
        .collect::<Vec<_>>();

    assert!(observed.windows(2).all(|w| w[0].0 <= w[1].0 && w[0].1 <= w[1].1));
    assert_eq!(observed.last().unwrap().0, Sequence::new(1 + 1 + 2 + 0 + 1 + 2 + 0));
    assert_eq!(observed.last().unwrap().1, Sequence::new(12));
}

#[test]
fn heights_outside_the_committed_range() {
    let suite = TestBuilder::new().build().unwrap();
    let channel = ChannelIdentity::parse("transfer", "channel-0").unwrap();
    let latest = suite.height();

    // Not reached yet.
    let future = Height::new(latest.revision_number, latest.revision_height + 1);
    suite
        .service
        .next_sequence_send(&channel, future.into(), IncludeProof::No)
        .should_fail_with_kind(ErrorKind::NotFound);

    // Another revision.
    let other_revision = Height::new(latest.revision_number + 1, latest.revision_height);
    suite
        .service
        .next_sequence_send(&channel, other_revision.into(), IncludeProof::No)
        .should_fail_with_kind(ErrorKind::InvalidArgument);
}

#[test]
fn nothing_committed() {
    let suite = TestBuilder::new().set_genesis_blocks(0).build().unwrap();
    let channel = ChannelIdentity::parse("transfer", "channel-0").unwrap();

    suite.service.latest_height().should_fail_with_kind(ErrorKind::NotFound);

    suite
        .service
        .next_sequence_send(&channel, QueryHeight::Latest, IncludeProof::No)
        .should_fail_with_error("no state has been committed yet");
}
