use {
    conduit_channel::{
        Db, ErrorKind, Proven, QueryConfig, ACKNOWLEDGEMENTS, CHANNELS, COMMITMENTS,
        NEXT_SEQUENCE_RECV,
    },
    conduit_db_memory::{DbResult, MemDb, StateStorage},
    conduit_merkle::{verify_proof, Proof},
    conduit_testing::{ResultExt, TestBuilder, TestSuite},
    conduit_types::{
        Batch, BorshDeExt, ChannelIdentity, Hash256, IncludeProof, QueryHeight, Sequence,
        Storage,
    },
};

/// Check the proof of a value against the root hash of the height it was read
/// at. `key` is the storage key of the value; a missing raw value means the
/// proof must be of non-membership.
fn verify<T>(suite: &TestSuite, key: &[u8], proven: &Proven<T>) {
    let version = proven.proof_height.revision_height;

    let root_hash = suite
        .db()
        .root_hash(Some(version))
        .unwrap()
        .expect("committed version without root hash");

    let raw_value = suite.db().state_storage(Some(version)).unwrap().read(key);

    let proof: Proof = proven
        .proof
        .as_ref()
        .expect("proof was requested")
        .deserialize_borsh()
        .unwrap();

    verify_proof(root_hash, key, raw_value.as_deref(), &proof).unwrap();
}

fn setup() -> (TestSuite, ChannelIdentity) {
    let mut suite = TestBuilder::new().build().unwrap();

    let channel = suite
        .open_channel("transfer", "channel-0", &["connection-0"])
        .should_succeed();
    suite.send_packet(&channel, b"first").should_succeed();
    suite.send_packet(&channel, b"second").should_succeed();
    suite
        .write_acknowledgement(&channel, Sequence::new(1), b"ok")
        .should_succeed();
    suite.make_block();

    (suite, channel)
}

#[test]
fn proofs_verify_against_the_root_of_their_height() {
    let (mut suite, channel) = setup();

    let proven = suite
        .service
        .channel(&channel, QueryHeight::Latest, IncludeProof::Yes)
        .should_succeed();
    verify(&suite, CHANNELS.path(&channel).storage_key(), &proven);

    let proven = suite
        .service
        .packet_commitment(&channel, Sequence::new(2), QueryHeight::Latest, IncludeProof::Yes)
        .should_succeed();
    let path = COMMITMENTS.path((&channel, Sequence::new(2)));
    verify(&suite, path.storage_key(), &proven);

    let proven = suite
        .service
        .packet_acknowledgement(&channel, Sequence::new(1), QueryHeight::Latest, IncludeProof::Yes)
        .should_succeed();
    let path = ACKNOWLEDGEMENTS.path((&channel, Sequence::new(1)));
    verify(&suite, path.storage_key(), &proven);

    let proven = suite
        .service
        .next_sequence_recv(&channel, QueryHeight::Latest, IncludeProof::Yes)
        .should_succeed();
    verify(&suite, NEXT_SEQUENCE_RECV.path(&channel).storage_key(), &proven);

    // A proof of an older height verifies against that height's root, even
    // after the state has moved on.
    let old = suite
        .service
        .packet_commitment(&channel, Sequence::new(1), QueryHeight::Latest, IncludeProof::Yes)
        .should_succeed();

    suite.delete_commitment(&channel, Sequence::new(1)).should_succeed();
    suite.make_block();

    let replayed = suite
        .service
        .packet_commitment(&channel, Sequence::new(1), old.proof_height.into(), IncludeProof::Yes)
        .should_succeed();

    assert_eq!(replayed, old);

    let path = COMMITMENTS.path((&channel, Sequence::new(1)));
    verify(&suite, path.storage_key(), &replayed);
}

#[test]
fn proof_height_is_reported_without_a_proof() {
    let (suite, channel) = setup();

    let proven = suite
        .service
        .packet_commitment(&channel, Sequence::new(1), QueryHeight::Latest, IncludeProof::No)
        .should_succeed();

    assert!(proven.proof.is_none());
    assert_eq!(proven.proof_height, suite.height());
}

// ------------------------------- skewed proofs -------------------------------

/// A database that proves every key at its latest version, whatever version
/// is asked for.
#[derive(Clone, Default)]
struct SkewedDb(MemDb);

impl Db for SkewedDb {
    type Error = <MemDb as Db>::Error;
    type Proof = Proof;
    type StateStorage = StateStorage;

    fn latest_version(&self) -> Option<u64> {
        self.0.latest_version()
    }

    fn oldest_version(&self) -> Option<u64> {
        self.0.oldest_version()
    }

    fn state_storage(&self, version: Option<u64>) -> DbResult<StateStorage> {
        self.0.state_storage(version)
    }

    fn root_hash(&self, version: Option<u64>) -> DbResult<Option<Hash256>> {
        self.0.root_hash(version)
    }

    fn prove(&self, key: &[u8], _version: Option<u64>) -> DbResult<(u64, Proof)> {
        self.0.prove(key, None)
    }

    fn flush_but_not_commit(&self, batch: Batch) -> DbResult<(u64, Option<Hash256>)> {
        self.0.flush_but_not_commit(batch)
    }

    fn commit(&self) -> DbResult<()> {
        self.0.commit()
    }

    fn prune(&self, up_to_version: u64) -> DbResult<()> {
        self.0.prune(up_to_version)
    }
}

#[test]
fn proofs_from_another_version_are_refused() {
    let mut suite = TestSuite::new_with_db(SkewedDb::default(), QueryConfig::default());
    suite.make_block();

    let channel = suite
        .open_channel("transfer", "channel-0", &["connection-0"])
        .should_succeed();
    let opened = suite.make_block();
    suite.make_block();

    // At the latest height the skew doesn't show.
    suite
        .service
        .channel(&channel, QueryHeight::Latest, IncludeProof::Yes)
        .should_succeed();

    suite
        .service
        .channel(&channel, opened.into(), IncludeProof::Yes)
        .should_fail_with_kind(ErrorKind::ProofInconsistency);

    // Without a proof nothing is generated, so nothing can go wrong.
    suite
        .service
        .channel(&channel, opened.into(), IncludeProof::No)
        .should_succeed();
}
