use nostr_sdk::prelude::*;
use serde::{Deserialize, Serialize};

use crate::Error;

pub const KIND_METADATA: u16 = 0;
pub const KIND_TEXT_NOTE: u16 = 1;
pub const KIND_REPOST: u16 = 6;
pub const KIND_MUTE_LIST: u16 = 10000;
pub const KIND_PIN_LIST: u16 = 10001;
pub const KIND_RELAY_LIST: u16 = 10002;
pub const KIND_USER_STATUS: u16 = 30315;

pub const TAG_CONTENT_WARNING: &str = "content-warning";
pub const TAG_EMOJI: &str = "emoji";
pub const TAG_PUBKEY: &str = "p";
pub const TAG_RELAY: &str = "r";
pub const TAG_HASHTAG: &str = "t";

/// A tag as it travels on the wire: `[name, value...]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "Vec<String>", try_from = "Vec<String>")]
pub struct NostrTag {
    pub name: String,
    pub values: Vec<String>,
}

impl NostrTag {
    pub fn new(name: impl Into<String>, values: Vec<String>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    /// Every field of the tag, name first.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str()).chain(self.values.iter().map(|v| v.as_str()))
    }

    pub fn to_sdk_tag(&self) -> Result<Tag, Error> {
        Ok(Tag::parse(Vec::<String>::from(self.clone()))?)
    }

    pub fn from_sdk_tag(tag: &Tag) -> Self {
        let parts = tag.clone().to_vec();
        let name = parts.first().cloned().unwrap_or_default();
        let values = parts.into_iter().skip(1).collect();
        Self { name, values }
    }
}

impl From<NostrTag> for Vec<String> {
    fn from(tag: NostrTag) -> Self {
        let mut parts = Vec::with_capacity(1 + tag.values.len());
        parts.push(tag.name);
        parts.extend(tag.values);
        parts
    }
}

impl TryFrom<Vec<String>> for NostrTag {
    type Error = String;

    fn try_from(parts: Vec<String>) -> Result<Self, Self::Error> {
        let mut parts = parts.into_iter();
        let name = parts.next().ok_or_else(|| "empty tag".to_string())?;
        Ok(Self {
            name,
            values: parts.collect(),
        })
    }
}

/// Unsigned event produced by the builder and handed to the signer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftEvent {
    pub kind: u16,
    pub content: String,
    pub tags: Vec<NostrTag>,
}

impl DraftEvent {
    pub fn new(kind: u16, content: impl Into<String>) -> Self {
        Self {
            kind,
            content: content.into(),
            tags: Vec::new(),
        }
    }

    pub fn to_json(&self) -> Result<String, Error> {
        Ok(serde_json::to_string(self)?)
    }

    /// Sign the draft. Sets pubkey, created_at, id and sig.
    pub fn sign(&self, keys: &Keys) -> Result<Event, Error> {
        let tags = self
            .tags
            .iter()
            .map(NostrTag::to_sdk_tag)
            .collect::<Result<Vec<_>, _>>()?;

        let event = nostr_sdk::EventBuilder::new(Kind::from(self.kind), &self.content)
            .tags(tags)
            .sign_with_keys(keys)?;
        Ok(event)
    }
}

pub fn content_warning_tag(reason: &str) -> NostrTag {
    NostrTag::new(TAG_CONTENT_WARNING, vec![reason.to_string()])
}

pub fn pubkey_tag(pubkey: &str) -> NostrTag {
    NostrTag::new(TAG_PUBKEY, vec![pubkey.to_string()])
}

pub fn hashtag_tag(topic: &str) -> NostrTag {
    NostrTag::new(TAG_HASHTAG, vec![topic.to_string()])
}

pub fn emoji_tag(shortcode: &str, url: &str) -> NostrTag {
    NostrTag::new(TAG_EMOJI, vec![shortcode.to_string(), url.to_string()])
}

/// Relay list entry. A marker is only written when exactly one of the
/// read/write flags is set.
pub fn relay_tag(url: &str, read: bool, write: bool) -> NostrTag {
    let mut values = vec![url.to_string()];
    match (read, write) {
        (true, false) => values.push("read".to_string()),
        (false, true) => values.push("write".to_string()),
        _ => {}
    }
    NostrTag::new(TAG_RELAY, values)
}

pub fn tag_value<'a>(tags: &'a [NostrTag], name: &str) -> Option<&'a str> {
    tags.iter()
        .find(|tag| tag.name == name)
        .and_then(|tag| tag.values.first().map(|s| s.as_str()))
}
