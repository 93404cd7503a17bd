//! Command-line Nostr client: build, validate and publish events.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                              NOSTK                               │
//! │                                                                  │
//! │  argv ─► EventBuilder ──► DraftEvent ──► sign ──► RelayPublisher │
//! │              │   │   │                               │           │
//! │  SubcommandRegistry  │ TagSchema             one relay at a time │
//! │                ContentScanner                        │           │
//! │                                                      ▼           │
//! │  LocalStore (keys, relays.json, profile.json)   PublishReport    │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything up to [`DraftEvent`] is pure: an unsupported subcommand, a
//! missing argument, a tag the kind does not allow, or content that looks
//! like a private key stops the command before any key is read or relay is
//! contacted. Relay failures after that point are per relay and only show
//! up in the [`PublishReport`].
//!
//! # Event kinds and tags
//!
//! | Kind  | Allowed tags |
//! |-------|--------------|
//! | 0     | none |
//! | 1     | `content-warning client e emoji expiration p q r t` |
//! | 6     | `e p` |
//! | 10000 | `e p t word` |
//! | 10001 | `e` |
//! | 10002 | `r` |
//! | 30315 | `d emoji expiration r` |
//!
//! # Example
//!
//! ```rust,ignore
//! use nostk::{EventBuilder, NostkConfig, Nostk};
//!
//! let builder = EventBuilder::standard()?;
//! let args: Vec<String> = ["nostk", "pubMessage", "hello #nostr"]
//!     .iter()
//!     .map(|s| s.to_string())
//!     .collect();
//! let draft = builder.build(&args)?;
//! assert_eq!(draft.tags[0].values, vec!["nostr"]);
//!
//! let nostk = Nostk::new(NostkConfig::from_env()?);
//! let report = nostk.publish_args(&args).await?;
//! for outcome in &report.outcomes {
//!     println!("{outcome}");
//! }
//! ```

mod builder;
mod commands;
mod config;
mod editor;
mod error;
mod events;
mod publish;
mod registry;
mod scanner;
mod schema;
mod store;

pub use builder::EventBuilder;
pub use commands::Nostk;
pub use config::{NostkConfig, DEFAULT_DIR_NAME};
pub use editor::edit_file;
pub use error::Error;
pub use events::{
    content_warning_tag, emoji_tag, hashtag_tag, pubkey_tag, relay_tag, tag_value, DraftEvent,
    NostrTag, KIND_METADATA, KIND_MUTE_LIST, KIND_PIN_LIST, KIND_RELAY_LIST, KIND_REPOST,
    KIND_TEXT_NOTE, KIND_USER_STATUS, TAG_CONTENT_WARNING, TAG_EMOJI, TAG_HASHTAG, TAG_PUBKEY,
    TAG_RELAY,
};
pub use publish::{
    NostrSdkConnector, PublishOutcome, PublishReport, RelayAttemptState, RelayConnection,
    RelayConnector, RelayPublisher,
};
pub use registry::{
    ArgBinding, SubcommandRegistry, SubcommandSpec, CONTENT_POSITION, SUBCOMMAND_POSITION,
};
pub use scanner::{tags_have_prefix, ContentScanner, SECRET_KEY_PREFIX};
pub use schema::TagSchema;
pub use store::{
    KeyFiles, LocalStore, ProfileMetadata, RelayList, RwFlag, BECH32_PUBLIC_FILE,
    BECH32_SECRET_FILE, EMOJI_FILE, HEX_PUBLIC_FILE, HEX_SECRET_FILE, PROFILE_FILE, RELAYS_FILE,
};

/// Crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
