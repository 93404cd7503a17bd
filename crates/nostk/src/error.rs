use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("nostr client error: {0}")]
    NostrClient(#[from] nostr_sdk::client::Error),
    #[error("nostr key error: {0}")]
    NostrKey(#[from] nostr_sdk::nostr::key::Error),
    #[error("nostr tag error: {0}")]
    NostrTag(#[from] nostr_sdk::nostr::event::tag::Error),
    #[error("nostr signing error: {0}")]
    NostrSign(#[from] nostr_sdk::nostr::event::builder::Error),
    #[error("bech32 encoding error: {0}")]
    Bech32(String),
    #[error("serde json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("regex error: {0}")]
    Regex(#[from] regex::Error),
    #[error("missing env var: {0}")]
    MissingEnv(&'static str),
    #[error(
        "not supported subcommand {subcommand}{}",
        binding_suffix(.position)
    )]
    UnsupportedSubcommand {
        subcommand: String,
        position: Option<usize>,
    },
    #[error("missing argument {position} ({name})")]
    MissingArgument { position: usize, name: String },
    #[error("inclusion of invalid tag in specified kind: kind {kind}, tag {tag}")]
    InvalidTag { kind: u16, tag: String },
    #[error("refusing to publish: {0} looks like a private key")]
    SecretKeyLeak(&'static str),
    #[error("{} not found; run `nostk init`", .0.display())]
    NotInitialized(PathBuf),
    #[error("key pair not found at {}; run `nostk genkey`", .0.display())]
    KeyNotFound(PathBuf),
    #[error("key pair already exists at {}; pass --force to replace it", .0.display())]
    KeyExists(PathBuf),
    #[error("editor `{editor}` failed: {reason}")]
    Editor { editor: String, reason: String },
    #[error("relay {url}: {reason}")]
    Relay { url: String, reason: String },
    #[error("relay {url} rejected event: {reason}")]
    Rejected { url: String, reason: String },
    #[error("operation timed out")]
    Timeout,
}

fn binding_suffix(position: &Option<usize>) -> String {
    match position {
        Some(position) => format!(" (no tag binding for argument {position})"),
        None => String::new(),
    }
}
