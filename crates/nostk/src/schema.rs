//! Allowed tag names per event kind.

use std::collections::{HashMap, HashSet};

use tracing::warn;

use crate::events::{
    NostrTag, KIND_METADATA, KIND_MUTE_LIST, KIND_PIN_LIST, KIND_RELAY_LIST, KIND_REPOST,
    KIND_TEXT_NOTE, KIND_USER_STATUS,
};
use crate::Error;

const TEXT_NOTE_TAGS: &[&str] = &[
    "content-warning",
    "client",
    "e",
    "emoji",
    "expiration",
    "p",
    "q",
    "r",
    "t",
];

const STANDARD_TABLE: &[(u16, &[&str])] = &[
    (KIND_METADATA, &[]),
    (KIND_TEXT_NOTE, TEXT_NOTE_TAGS),
    (KIND_REPOST, &["e", "p"]),
    (KIND_MUTE_LIST, &["e", "p", "t", "word"]),
    (KIND_PIN_LIST, &["e"]),
    (KIND_RELAY_LIST, &["r"]),
    (KIND_USER_STATUS, &["d", "emoji", "expiration", "r"]),
];

/// Immutable table of which tag names each kind may carry.
///
/// Kinds missing from the table allow no tags at all.
#[derive(Debug, Clone)]
pub struct TagSchema {
    allowed: HashMap<u16, HashSet<&'static str>>,
}

impl TagSchema {
    /// The table used by every publish path.
    pub fn standard() -> Self {
        Self::from_table(STANDARD_TABLE)
    }

    pub fn from_table(table: &[(u16, &[&'static str])]) -> Self {
        let allowed = table
            .iter()
            .map(|(kind, names)| (*kind, names.iter().copied().collect()))
            .collect();
        Self { allowed }
    }

    pub fn allows(&self, kind: u16, tag_name: &str) -> bool {
        self.allowed
            .get(&kind)
            .is_some_and(|names| names.contains(tag_name))
    }

    pub fn knows_kind(&self, kind: u16) -> bool {
        self.allowed.contains_key(&kind)
    }

    /// Fails on the first tag whose name is not allowed for `kind`.
    pub fn validate(&self, kind: u16, tags: &[NostrTag]) -> Result<(), Error> {
        let empty = HashSet::new();
        let names = self.allowed.get(&kind).unwrap_or(&empty);

        for tag in tags {
            if !names.contains(tag.name.as_str()) {
                warn!(kind, tag = %tag.name, "Tag not allowed for kind");
                return Err(Error::InvalidTag {
                    kind,
                    tag: tag.name.clone(),
                });
            }
        }
        Ok(())
    }
}

impl Default for TagSchema {
    fn default() -> Self {
        Self::standard()
    }
}
