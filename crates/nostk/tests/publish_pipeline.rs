use std::fs;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use nostk::{
    Error, Nostk, NostkConfig, NostrTag, RelayAttemptState, RelayConnection, RelayConnector,
    EMOJI_FILE, KIND_METADATA, KIND_RELAY_LIST, KIND_TEXT_NOTE, RELAYS_FILE,
};
use nostr_sdk::prelude::{Event, Kind};

const PUBKEY: &str = "3bf0c63fcb93463407af97a5e5ee64fa883d107ef9e558472c4eb9aaaefa459d";

/// Records every event it is asked to publish; refuses URLs containing "down".
#[derive(Clone, Default)]
struct RecordingConnector {
    attempts: Arc<Mutex<Vec<String>>>,
    published: Arc<Mutex<Vec<(String, Event)>>>,
}

struct RecordingConnection {
    url: String,
    published: Arc<Mutex<Vec<(String, Event)>>>,
}

#[async_trait]
impl RelayConnector for RecordingConnector {
    async fn connect(&self, url: &str) -> Result<Box<dyn RelayConnection>, Error> {
        self.attempts.lock().unwrap().push(url.to_string());
        if url.contains("down") {
            return Err(Error::Relay {
                url: url.to_string(),
                reason: "connection refused".to_string(),
            });
        }
        Ok(Box::new(RecordingConnection {
            url: url.to_string(),
            published: self.published.clone(),
        }))
    }
}

#[async_trait]
impl RelayConnection for RecordingConnection {
    async fn publish(&self, event: &Event) -> Result<(), Error> {
        self.published
            .lock()
            .unwrap()
            .push((self.url.clone(), event.clone()));
        Ok(())
    }
}

fn setup() -> (tempfile::TempDir, Nostk<RecordingConnector>, RecordingConnector) {
    let dir = tempfile::tempdir().unwrap();
    let connector = RecordingConnector::default();
    let nostk = Nostk::with_connector(NostkConfig::new(dir.path().join("nostk")), connector.clone());

    nostk.init().unwrap();
    nostk.genkey(false).unwrap();
    fs::write(
        nostk.store().path(RELAYS_FILE),
        r#"{
            "wss://first.example": {"read": true, "write": true},
            "wss://down.example": {"read": true, "write": true},
            "wss://third.example": {"read": false, "write": true}
        }"#,
    )
    .unwrap();

    (dir, nostk, connector)
}

fn argv(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

fn tags_of(event: &Event) -> Vec<NostrTag> {
    event.tags.iter().map(NostrTag::from_sdk_tag).collect()
}

#[tokio::test]
async fn message_reaches_every_reachable_relay() {
    let (_dir, nostk, connector) = setup();

    let report = nostk
        .publish_args(&argv(&["nostk", "pubMessageTo", "gm #nostr", PUBKEY]))
        .await
        .unwrap();

    assert_eq!(
        *connector.attempts.lock().unwrap(),
        vec!["wss://first.example", "wss://down.example", "wss://third.example"]
    );

    let states: Vec<_> = report.outcomes.iter().map(|o| o.state).collect();
    assert_eq!(
        states,
        vec![
            RelayAttemptState::Published,
            RelayAttemptState::ConnectFailed,
            RelayAttemptState::Published,
        ]
    );
    assert_eq!(report.succeeded(), 2);
    assert_eq!(report.failed(), 1);

    let published = connector.published.lock().unwrap();
    assert_eq!(published.len(), 2);
    let (_, event) = &published[0];
    assert_eq!(event.kind, Kind::from(KIND_TEXT_NOTE));
    assert_eq!(event.content, "gm #nostr");
    assert_eq!(
        tags_of(event),
        vec![
            NostrTag::new("p", vec![PUBKEY.to_string()]),
            NostrTag::new("t", vec!["nostr".to_string()]),
        ]
    );
    assert!(event.verify().is_ok());
    assert_eq!(published[0].1.id, published[1].1.id);
}

#[tokio::test]
async fn preflight_errors_never_touch_relays() {
    let (_dir, nostk, connector) = setup();

    let cases = [
        argv(&["nostk", "unknownCmd", "hello"]),
        argv(&["nostk", "pubMessage"]),
        argv(&["nostk", "pubMessageTo", "hi"]),
        argv(&["nostk", "pubMessageTo", "hi", PUBKEY, "extra"]),
        argv(&[
            "nostk",
            "pubMessage",
            "nsec1vl029mgpspedva04g90vltkh6fvh240zqtv9k0t9af8935ke9laqsnlfe5",
        ]),
    ];
    for args in cases {
        assert!(nostk.publish_args(&args).await.is_err(), "{args:?}");
    }

    assert!(connector.attempts.lock().unwrap().is_empty());
}

#[tokio::test]
async fn unknown_subcommand_reported_before_emoji_file_is_read() {
    let (_dir, nostk, connector) = setup();
    fs::write(nostk.store().path(EMOJI_FILE), "{ not json").unwrap();

    let result = nostk
        .publish_args(&argv(&["nostk", "unknownCmd", "x"]))
        .await;
    assert!(matches!(
        result,
        Err(Error::UnsupportedSubcommand { position: None, .. })
    ));
    assert!(connector.attempts.lock().unwrap().is_empty());
}

#[tokio::test]
async fn fresh_init_adds_no_emoji_tags() {
    let (_dir, nostk, connector) = setup();

    nostk
        .publish_args(&argv(&["nostk", "pubMessage", "my :name: is"]))
        .await
        .unwrap();

    let published = connector.published.lock().unwrap();
    let (_, event) = &published[0];
    assert!(tags_of(event).is_empty());
}

#[tokio::test]
async fn missing_keys_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let connector = RecordingConnector::default();
    let nostk = Nostk::with_connector(NostkConfig::new(dir.path()), connector.clone());
    nostk.init().unwrap();

    let result = nostk
        .publish_args(&argv(&["nostk", "pubMessage", "hello"]))
        .await;
    assert!(matches!(result, Err(Error::KeyNotFound(_))));
    assert!(connector.attempts.lock().unwrap().is_empty());
}

#[tokio::test]
async fn relay_list_event() {
    let (_dir, nostk, connector) = setup();

    let report = nostk.publish_relays().await.unwrap();
    assert_eq!(report.outcomes.len(), 3);

    let published = connector.published.lock().unwrap();
    let (_, event) = &published[0];
    assert_eq!(event.kind, Kind::from(KIND_RELAY_LIST));
    assert!(event.content.is_empty());
    let tags: Vec<Vec<String>> = tags_of(event).into_iter().map(Vec::from).collect();
    assert_eq!(
        tags,
        vec![
            vec!["r", "wss://first.example"],
            vec!["r", "wss://down.example"],
            vec!["r", "wss://third.example", "write"],
        ]
    );
}

#[tokio::test]
async fn profile_event() {
    let (_dir, nostk, connector) = setup();
    fs::write(
        nostk.store().path("profile.json"),
        "{\n  \"name\": \"alice\",\n  \"about\": \"hi\",\n  \"lud06\": \"lnurl1xyz\",\n  \"bot\": true\n}\n",
    )
    .unwrap();

    nostk.publish_profile().await.unwrap();

    let published = connector.published.lock().unwrap();
    let (_, event) = &published[0];
    assert_eq!(event.kind, Kind::from(KIND_METADATA));
    assert!(event.tags.is_empty());

    let content: serde_json::Value = serde_json::from_str(&event.content).unwrap();
    assert_eq!(content["name"], "alice");
    assert_eq!(content["about"], "hi");
    assert_eq!(content["lud16"], "");
    assert_eq!(content["lud06"], "lnurl1xyz");
    assert_eq!(content["bot"], true);
    assert!(!event.content.contains('\n'));
}

#[test]
fn genkey_refuses_to_overwrite() {
    let dir = tempfile::tempdir().unwrap();
    let nostk = Nostk::with_connector(
        NostkConfig::new(dir.path()),
        RecordingConnector::default(),
    );

    let first = nostk.genkey(false).unwrap();
    assert!(matches!(nostk.genkey(false), Err(Error::KeyExists(_))));
    let second = nostk.genkey(true).unwrap();
    assert_ne!(first.hex_secret, second.hex_secret);
}

#[test]
fn relay_lines() {
    let (_dir, nostk, _) = setup();
    assert_eq!(
        nostk.relay_lines().unwrap(),
        vec![
            "wss://first.example R:true W:true",
            "wss://down.example R:true W:true",
            "wss://third.example R:false W:true",
        ]
    );
}
