use {
    assertor::*,
    conduit_channel::{Cursor, ErrorKind, Page, PageRequest},
    conduit_testing::{ResultExt, TestBuilder, TestSuite},
    conduit_types::{ChannelIdentity, Height, PacketDigest, QueryHeight, Sequence},
    proptest::prelude::*,
    test_case::test_case,
};

/// A suite with the given number of packets sent on one channel, with page
/// limits of 5 by default and 8 at most.
fn setup(packets: u64) -> (TestSuite, ChannelIdentity) {
    let mut suite = TestBuilder::new().set_page_limits(5, 8).build().unwrap();

    let channel = suite
        .open_channel("transfer", "channel-0", &["connection-0"])
        .should_succeed();

    for i in 0..packets {
        suite.send_packet(&channel, &i.to_be_bytes()).should_succeed();
    }

    suite.make_block();

    (suite, channel)
}

fn commitments(
    suite: &TestSuite,
    channel: &ChannelIdentity,
    page: &PageRequest,
    height: QueryHeight,
) -> conduit_channel::ChannelResult<Page<PacketDigest>> {
    suite.service.packet_commitments(channel, page, height)
}

/// Walk the listing to the end; return the sequences seen and the number of
/// pages it took.
fn walk(suite: &TestSuite, channel: &ChannelIdentity, limit: Option<u32>) -> (Vec<u64>, usize) {
    let mut seen = vec![];
    let mut pages = 0;
    let mut request = PageRequest {
        cursor: None,
        limit,
    };

    loop {
        let page = commitments(suite, channel, &request, QueryHeight::Latest).should_succeed();
        pages += 1;
        seen.extend(page.items.iter().map(|item| item.sequence.number()));

        match page.next {
            Some(cursor) => request = PageRequest::after(cursor, limit),
            None => break,
        }
    }

    (seen, pages)
}

#[test_case(0, None => 1; "empty listing")]
#[test_case(5, None => 1; "exactly one default page")]
#[test_case(6, None => 2; "one past the default page")]
#[test_case(12, Some(3) => 4; "explicit limit")]
#[test_case(12, Some(1_000) => 2; "limit is clamped")]
#[test_case(17, Some(8) => 3; "limit at the maximum")]
fn walking_pages(packets: u64, limit: Option<u32>) -> usize {
    let (suite, channel) = setup(packets);

    let (seen, pages) = walk(&suite, &channel, limit);

    // Every item exactly once, in order.
    assert_eq!(seen, (1..=packets).collect::<Vec<_>>());

    pages
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    /// Following cursors visits every item exactly once, in ascending order,
    /// in as many pages as the effective limit calls for.
    #[test]
    fn walking_is_complete(packets in 0_u64..30, limit in 1_u32..12) {
        let (suite, channel) = setup(packets);

        let (seen, pages) = walk(&suite, &channel, Some(limit));

        let effective = u64::from(limit.min(8));
        let expected_pages = packets.div_ceil(effective).max(1);

        prop_assert_eq!(seen, (1..=packets).collect::<Vec<_>>());
        prop_assert_eq!(pages as u64, expected_pages);
    }
}

#[test]
fn zero_limit_is_rejected() {
    let (suite, channel) = setup(3);

    commitments(&suite, &channel, &PageRequest::first(0), QueryHeight::Latest)
        .should_fail_with_kind(ErrorKind::InvalidArgument);
}

#[test]
fn pages_stay_at_the_height_of_the_first_page() {
    let (mut suite, channel) = setup(4);

    let first = commitments(&suite, &channel, &PageRequest::first(2), QueryHeight::Latest)
        .should_succeed();
    let cursor = first.next.clone().unwrap();

    // The chain moves on: one commitment is cleared, another one added.
    suite.delete_commitment(&channel, Sequence::new(3)).should_succeed();
    suite.send_packet(&channel, b"late").should_succeed();
    suite.make_block();

    let second = commitments(
        &suite,
        &channel,
        &PageRequest::after(cursor.clone(), Some(10)),
        QueryHeight::Latest,
    )
    .should_succeed();

    assert_eq!(second.height, first.height);
    assert_that!(second.next).is_none();
    assert_that!(second.items.iter().map(|item| item.sequence.number()).collect::<Vec<_>>())
        .is_equal_to(vec![3, 4]);

    // Asking for the cursor's own height explicitly is the same.
    commitments(
        &suite,
        &channel,
        &PageRequest::after(cursor.clone(), Some(10)),
        first.height.into(),
    )
    .should_succeed_and_equal(second);

    // Asking for any other height is not.
    commitments(
        &suite,
        &channel,
        &PageRequest::after(cursor, Some(10)),
        suite.height().into(),
    )
    .should_fail_with_kind(ErrorKind::InvalidCursor);
}

#[test]
fn cursors_of_other_listings_are_rejected() {
    let (mut suite, channel) = setup(4);

    let other = suite
        .open_channel("transfer", "channel-1", &["connection-0"])
        .should_succeed();
    suite.make_block();

    let cursor = commitments(&suite, &channel, &PageRequest::first(1), QueryHeight::Latest)
        .should_succeed()
        .next
        .unwrap();

    // Same kind of listing, other channel.
    commitments(&suite, &other, &PageRequest::after(cursor.clone(), None), QueryHeight::Latest)
        .should_fail_with_kind(ErrorKind::InvalidCursor);

    // Other kind of listing, same channel.
    suite
        .service
        .packet_acknowledgements(
            &channel,
            &PageRequest::after(cursor.clone(), None),
            QueryHeight::Latest,
        )
        .should_fail_with_kind(ErrorKind::InvalidCursor);

    suite
        .service
        .channels(&PageRequest::after(cursor, None), QueryHeight::Latest)
        .should_fail_with_kind(ErrorKind::InvalidCursor);
}

#[test_case("" ; "empty")]
#[test_case("not a cursor!" ; "not base64")]
#[test_case("AAAA" ; "not a cursor payload")]
fn garbage_cursors_are_rejected(text: &str) {
    let (suite, channel) = setup(4);

    commitments(
        &suite,
        &channel,
        &PageRequest::after(Cursor::new(text), None),
        QueryHeight::Latest,
    )
    .should_fail_with_kind(ErrorKind::InvalidCursor);
}

#[test]
fn cursors_of_pruned_heights_are_rejected() {
    let (mut suite, channel) = setup(4);

    let cursor = commitments(&suite, &channel, &PageRequest::first(1), QueryHeight::Latest)
        .should_succeed()
        .next
        .unwrap();

    let latest = suite.make_empty_blocks(2);
    suite.prune(latest).should_succeed();

    commitments(&suite, &channel, &PageRequest::after(cursor, None), QueryHeight::Latest)
        .should_fail_with_kind(ErrorKind::InvalidCursor);
}

#[test]
fn listing_channels_by_page() {
    let mut suite = TestBuilder::new().set_page_limits(2, 2).build().unwrap();

    for i in 0..5 {
        suite
            .open_channel("transfer", &format!("channel-{i}"), &["connection-0"])
            .should_succeed();
    }
    let height = suite.make_block();

    let mut seen = vec![];
    let mut request = PageRequest::default();

    loop {
        let page = suite
            .service
            .connection_channels(&"connection-0".parse().unwrap(), &request, QueryHeight::Latest)
            .should_succeed();

        assert!(page.items.len() <= 2);
        assert_eq!(page.height, height);
        seen.extend(page.items.into_iter().map(|item| item.channel_id.to_string()));

        match page.next {
            Some(cursor) => request = PageRequest::after(cursor, None),
            None => break,
        }
    }

    assert_eq!(
        seen,
        ["channel-0", "channel-1", "channel-2", "channel-3", "channel-4"]
    );
}

#[test]
fn cursor_heights_are_checked_against_the_revision() {
    let (suite, channel) = setup(4);

    let cursor = commitments(&suite, &channel, &PageRequest::first(1), QueryHeight::Latest)
        .should_succeed()
        .next
        .unwrap();

    let elsewhere = Height::new(
        suite.service.revision_number() + 1,
        suite.height().revision_height,
    );

    commitments(&suite, &channel, &PageRequest::after(cursor, None), elsewhere.into())
        .should_fail_with_kind(ErrorKind::InvalidCursor);
}
