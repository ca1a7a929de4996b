use {
    conduit_channel::{Db, ErrorKind, PageRequest, QueryConfig},
    conduit_db_memory::{DbResult, MemDb, StateStorage},
    conduit_merkle::Proof,
    conduit_testing::{ResultExt, TestBuilder, TestSuite},
    conduit_types::{Batch, Hash256, Height, IncludeProof, QueryHeight, Sequence},
    std::sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};

#[test]
fn pruned_heights_are_gone() {
    let mut suite = TestBuilder::new().build().unwrap();

    let channel = suite
        .open_channel("transfer", "channel-0", &["connection-0"])
        .should_succeed();
    let opened = suite.make_block();

    suite.send_packet(&channel, b"one").should_succeed();
    let first = suite.make_block();

    suite.send_packet(&channel, b"two").should_succeed();
    let second = suite.make_block();

    suite.prune(second).should_succeed();

    for height in [opened, first] {
        let err = suite
            .service
            .next_sequence_send(&channel, height.into(), IncludeProof::No)
            .should_fail_with_kind(ErrorKind::NotFound);

        assert!(err.to_string().contains("pruned"), "unexpected error: {err}");
    }

    // State written before the pruned heights is still there.
    suite
        .service
        .channel(&channel, second.into(), IncludeProof::Yes)
        .should_succeed();

    suite
        .service
        .next_sequence_send(&channel, second.into(), IncludeProof::No)
        .map(|proven| proven.value)
        .should_succeed_and_equal(Sequence::new(3));

    let page = suite
        .service
        .packet_commitments(&channel, &PageRequest::default(), second.into())
        .should_succeed();
    assert_eq!(page.items.len(), 2);
}

#[test]
fn pruning_is_bounded_by_the_latest_height() {
    let mut suite = TestBuilder::new().build().unwrap();
    let latest = suite.make_empty_blocks(3);

    // Pruning past the latest height would leave nothing readable.
    let beyond = Height::new(latest.revision_number, latest.revision_height + 1);
    suite.prune(beyond).should_fail_with_kind(ErrorKind::Internal);

    // Pruning up to a height that is already the oldest is a no-op.
    let genesis = Height::new(latest.revision_number, 1);
    suite.prune(genesis).should_succeed();

    suite
        .service
        .channels(&PageRequest::default(), genesis.into())
        .should_succeed();

    suite.prune(latest).should_succeed();

    suite
        .service
        .channels(&PageRequest::default(), genesis.into())
        .should_fail_with_kind(ErrorKind::NotFound);

    suite
        .service
        .channels(&PageRequest::default(), QueryHeight::Latest)
        .should_succeed();
}

// --------------------------- pruning during reads ----------------------------

/// A database that, once armed, prunes every version but the latest right
/// after handing out the next historical snapshot.
#[derive(Clone, Default)]
struct PruningDb {
    db: MemDb,
    armed: Arc<AtomicBool>,
}

impl PruningDb {
    fn arm(&self) {
        self.armed.store(true, Ordering::SeqCst);
    }
}

impl Db for PruningDb {
    type Error = <MemDb as Db>::Error;
    type Proof = Proof;
    type StateStorage = StateStorage;

    fn latest_version(&self) -> Option<u64> {
        self.db.latest_version()
    }

    fn oldest_version(&self) -> Option<u64> {
        self.db.oldest_version()
    }

    fn state_storage(&self, version: Option<u64>) -> DbResult<StateStorage> {
        let storage = self.db.state_storage(version)?;

        if version.is_some() && self.armed.swap(false, Ordering::SeqCst) {
            if let Some(latest) = self.db.latest_version() {
                self.db.prune(latest)?;
            }
        }

        Ok(storage)
    }

    fn root_hash(&self, version: Option<u64>) -> DbResult<Option<Hash256>> {
        self.db.root_hash(version)
    }

    fn prove(&self, key: &[u8], version: Option<u64>) -> DbResult<(u64, Proof)> {
        self.db.prove(key, version)
    }

    fn flush_but_not_commit(&self, batch: Batch) -> DbResult<(u64, Option<Hash256>)> {
        self.db.flush_but_not_commit(batch)
    }

    fn commit(&self) -> DbResult<()> {
        self.db.commit()
    }

    fn prune(&self, up_to_version: u64) -> DbResult<()> {
        self.db.prune(up_to_version)
    }
}

#[test]
fn listing_a_snapshot_pruned_midway_fails() {
    let mut suite = TestSuite::new_with_db(PruningDb::default(), QueryConfig::default());

    let channel = suite
        .open_channel("transfer", "channel-0", &["connection-0"])
        .should_succeed();
    for data in [b"one", b"two", b"six"] {
        suite.send_packet(&channel, data).should_succeed();
    }
    let sent = suite.make_block();

    suite.delete_commitment(&channel, Sequence::new(2)).should_succeed();
    suite.make_block();
    suite.make_block();

    // Before pruning, the listing at that height sees all three.
    let page = suite
        .service
        .packet_commitments(&channel, &PageRequest::default(), sent.into())
        .should_succeed();
    assert_eq!(page.items.len(), 3);

    // Pruning leaves the deleted commitment out of the old snapshot. The
    // listing must not come back short.
    suite.db().arm();
    suite
        .service
        .packet_commitments(&channel, &PageRequest::default(), sent.into())
        .should_fail_with_error("pruned");

    suite
        .service
        .packet_commitments(&channel, &PageRequest::default(), QueryHeight::Latest)
        .map(|page| page.items.len())
        .should_succeed_and_equal(2);
}

#[test]
fn reading_a_snapshot_pruned_midway_fails() {
    let mut suite = TestSuite::new_with_db(PruningDb::default(), QueryConfig::default());

    let channel = suite
        .open_channel("transfer", "channel-0", &["connection-0"])
        .should_succeed();
    let opened = suite.make_block();

    suite
        .set_next_sequence_recv(&channel, Sequence::new(5))
        .should_succeed();
    suite.make_block();
    suite.make_block();

    suite.db().arm();
    let err = suite
        .service
        .next_sequence_recv(&channel, opened.into(), IncludeProof::No)
        .should_fail_with_kind(ErrorKind::NotFound);

    assert!(err.to_string().contains("pruned"), "unexpected error: {err}");

    suite
        .service
        .next_sequence_recv(&channel, QueryHeight::Latest, IncludeProof::No)
        .map(|proven| proven.value)
        .should_succeed_and_equal(Sequence::new(5));
}
