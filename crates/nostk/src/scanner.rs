//! Free-text analysis: hashtags, custom emoji and private-key leaks.

use std::borrow::Cow;

use indexmap::IndexMap;
use regex::Regex;

use crate::events::{emoji_tag, hashtag_tag, NostrTag};
use crate::Error;

/// Bech32 human-readable prefix of a private key, separator included.
pub const SECRET_KEY_PREFIX: &str = "nsec1";
/// Number of data characters following the prefix in an encoded key.
const SECRET_KEY_DATA_LEN: usize = 58;

// ASCII '#', small '﹟' and fullwidth '＃' all count as hash delimiters.
const HASHTAG_PATTERN: &str = r"(?:^|\s)[#﹟＃]([^#\s﹟＃]+)";
const PAIRED_HASHTAG_PATTERN: &str = r"(?:^|\s)([#﹟＃][^#﹟＃]\S*[#﹟＃]\S*)";
const EMOJI_SHORTCODE_PATTERN: &str = r":([A-Za-z0-9_]+):";

/// Regex-backed scanner. Patterns are compiled once per instance.
#[derive(Debug, Clone)]
pub struct ContentScanner {
    hashtag: Regex,
    paired_hashtag: Regex,
    emoji_shortcode: Regex,
    secret_key_prefix: Regex,
}

impl ContentScanner {
    pub fn new() -> Result<Self, Error> {
        let secret_key_prefix = format!("(?i){}", regex::escape(SECRET_KEY_PREFIX));
        Ok(Self {
            hashtag: Regex::new(HASHTAG_PATTERN)?,
            paired_hashtag: Regex::new(PAIRED_HASHTAG_PATTERN)?,
            emoji_shortcode: Regex::new(EMOJI_SHORTCODE_PATTERN)?,
            secret_key_prefix: Regex::new(&secret_key_prefix)?,
        })
    }

    /// Remove tokens like `#word#other#`, which read as markup or citations
    /// rather than topics.
    pub fn strip_paired_hashtags<'a>(&self, content: &'a str) -> Cow<'a, str> {
        self.paired_hashtag.replace_all(content, "")
    }

    /// Hashtag topics in order of appearance, delimiters stripped.
    pub fn hashtags(&self, content: &str) -> Vec<String> {
        let scanned = self.strip_paired_hashtags(content);
        self.hashtag
            .captures_iter(&scanned)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
            .collect()
    }

    pub fn hashtag_tags(&self, content: &str) -> Vec<NostrTag> {
        self.hashtags(content)
            .iter()
            .map(|topic| hashtag_tag(topic))
            .collect()
    }

    /// `emoji` tags for each known `:shortcode:`, first appearance wins.
    pub fn emoji_tags(&self, content: &str, emojis: &IndexMap<String, String>) -> Vec<NostrTag> {
        let mut seen = Vec::new();
        let mut tags = Vec::new();
        for caps in self.emoji_shortcode.captures_iter(content) {
            let Some(shortcode) = caps.get(1).map(|m| m.as_str()) else {
                continue;
            };
            if seen.contains(&shortcode) {
                continue;
            }
            if let Some(url) = emojis.get(shortcode) {
                seen.push(shortcode);
                tags.push(emoji_tag(shortcode, url));
            }
        }
        tags
    }

    /// True when the content carries something shaped like an encoded
    /// private key, in either case. Every prefix occurrence is checked on
    /// its own, so a stray prefix in front of a key cannot hide it. Data
    /// made only of repeated prefixes is not a key.
    pub fn contains_secret_key(&self, content: &str) -> bool {
        let repeated = SECRET_KEY_PREFIX.repeat(SECRET_KEY_DATA_LEN / SECRET_KEY_PREFIX.len() + 1);
        self.secret_key_prefix.find_iter(content).any(|m| {
            let Some(data) = content.get(m.end()..m.end() + SECRET_KEY_DATA_LEN) else {
                return false;
            };
            data.bytes().all(|b| b.is_ascii_alphanumeric())
                && !repeated.starts_with(&data.to_ascii_lowercase())
        })
    }
}

/// True if any field of any tag starts with `prefix`.
pub fn tags_have_prefix(tags: &[NostrTag], prefix: &str) -> bool {
    tags.iter()
        .any(|tag| tag.fields().any(|field| field.starts_with(prefix)))
}
