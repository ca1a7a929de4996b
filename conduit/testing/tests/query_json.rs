use {
    conduit_channel::{ChannelQuery, ErrorKind, QueryOutcome},
    conduit_testing::{ResultExt, TestBuilder, TestSuite},
    serde_json::json,
    test_case::test_case,
};

fn setup() -> TestSuite {
    let mut suite = TestBuilder::new().build().unwrap();

    let channel = suite
        .open_channel("transfer", "channel-0", &["connection-0"])
        .should_succeed();
    suite.send_packet(&channel, b"hello").should_succeed();
    suite
        .write_acknowledgement(&channel, 1.into(), b"ok")
        .should_succeed();
    suite.make_block();

    suite
}

fn query(suite: &TestSuite, request: serde_json::Value) -> QueryOutcome {
    let raw = suite.service.query_json(request.to_string().as_bytes());

    serde_json::from_slice(&raw).unwrap()
}

#[test]
fn answering_json_queries() {
    let suite = setup();

    let outcome = query(
        &suite,
        json!({
            "channel": {
                "port_id": "transfer",
                "channel_id": "channel-0",
                "include_proof": "yes",
            },
        }),
    );

    let response = match outcome {
        QueryOutcome::Ok(response) => response,
        outcome => panic!("expecting ok, got: {outcome:?}"),
    };

    let proven = response.as_channel();
    assert!(proven.proof.is_some());
    assert_eq!(proven.proof_height, suite.height());

    let outcome = query(
        &suite,
        json!({
            "unreceived_packets": {
                "port_id": "transfer",
                "channel_id": "channel-0",
                "sequences": [3, 1, 2, 1],
            },
        }),
    );

    let response = match outcome {
        QueryOutcome::Ok(response) => response,
        outcome => panic!("expecting ok, got: {outcome:?}"),
    };

    let numbers = response
        .as_unreceived_packets()
        .sequences
        .into_iter()
        .map(|sequence| sequence.number())
        .collect::<Vec<_>>();
    assert_eq!(numbers, [2, 3]);
}

#[test]
fn listing_over_json() {
    let suite = setup();

    let raw = suite.service.query_json(
        json!({
            "packet_commitments": {
                "port_id": "transfer",
                "channel_id": "channel-0",
                "page": { "limit": 10 },
            },
        })
        .to_string()
        .as_bytes(),
    );

    let value: serde_json::Value = serde_json::from_slice(&raw).unwrap();
    let page = &value["ok"]["packet_commitments"];

    assert_eq!(page["items"].as_array().map(Vec::len), Some(1));
    assert_eq!(page["items"][0]["sequence"], json!(1));
    // The listing is exhausted, so no cursor is sent.
    assert!(page.get("next").is_none());
}

#[test_case(
    json!({ "channel": { "port_id": "transfer", "channel_id": "channel-9" } }),
    ErrorKind::NotFound;
    "missing channel"
)]
#[test_case(
    json!({ "channel": { "port_id": "x", "channel_id": "channel-0" } }),
    ErrorKind::InvalidArgument;
    "malformed port id"
)]
#[test_case(
    json!({ "channel_by_name": {} }),
    ErrorKind::InvalidArgument;
    "unknown query"
)]
#[test_case(
    json!({
        "packet_acknowledgements": {
            "port_id": "transfer",
            "channel_id": "channel-0",
            "page": { "cursor": "garbage!" },
        },
    }),
    ErrorKind::InvalidCursor;
    "garbage cursor"
)]
#[test_case(
    json!({
        "next_sequence_send": {
            "port_id": "transfer",
            "channel_id": "channel-0",
            "height": { "specific": { "revision_number": 1, "revision_height": 1000 } },
        },
    }),
    ErrorKind::NotFound;
    "height not reached"
)]
#[test_case(
    json!({ "channel_client_state": { "port_id": "transfer", "channel_id": "channel-0" } }),
    ErrorKind::NotFound;
    "client state of a channel without connection"
)]
fn json_errors(request: serde_json::Value, kind: ErrorKind) {
    let suite = setup();

    match query(&suite, request) {
        QueryOutcome::Error(err) => assert_eq!(err.kind, kind, "{}", err.message),
        outcome => panic!("expecting error, got: {outcome:?}"),
    }
}

#[test]
fn undecodable_input() {
    let suite = setup();

    let raw = suite.service.query_json(b"\xff not json");
    let value: serde_json::Value = serde_json::from_slice(&raw).unwrap();

    assert_eq!(value["error"]["kind"], json!("invalid_argument"));
}
