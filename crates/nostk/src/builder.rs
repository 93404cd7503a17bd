//! Turns command-line arguments into a validated draft event.

use indexmap::IndexMap;
use tracing::debug;

use crate::events::{DraftEvent, NostrTag};
use crate::registry::{SubcommandRegistry, CONTENT_POSITION};
use crate::scanner::{tags_have_prefix, ContentScanner, SECRET_KEY_PREFIX};
use crate::schema::TagSchema;
use crate::Error;

/// Composes draft events. Nothing here touches the network or disk.
#[derive(Debug, Clone)]
pub struct EventBuilder {
    registry: SubcommandRegistry,
    schema: TagSchema,
    scanner: ContentScanner,
    emojis: IndexMap<String, String>,
}

impl EventBuilder {
    pub fn new(registry: SubcommandRegistry, schema: TagSchema) -> Result<Self, Error> {
        Ok(Self {
            registry,
            schema,
            scanner: ContentScanner::new()?,
            emojis: IndexMap::new(),
        })
    }

    pub fn standard() -> Result<Self, Error> {
        Self::new(SubcommandRegistry::standard(), TagSchema::standard())
    }

    /// Custom emoji (shortcode to image URL) to tag when seen in content.
    pub fn with_emojis(mut self, emojis: IndexMap<String, String>) -> Self {
        self.emojis = emojis;
        self
    }

    pub fn registry(&self) -> &SubcommandRegistry {
        &self.registry
    }

    /// Build from a full argument vector: `[program, subcommand, content, tag args...]`.
    pub fn build(&self, args: &[String]) -> Result<DraftEvent, Error> {
        let spec = self.registry.lookup(args)?;

        let content = args
            .get(CONTENT_POSITION)
            .filter(|content| !content.is_empty())
            .ok_or_else(|| Error::MissingArgument {
                position: CONTENT_POSITION,
                name: "content".to_string(),
            })?;

        let mut tags = Vec::new();
        for (position, value) in args.iter().enumerate().skip(CONTENT_POSITION + 1) {
            let binding = spec
                .binding(position)
                .ok_or_else(|| Error::UnsupportedSubcommand {
                    subcommand: spec.name.to_string(),
                    position: Some(position),
                })?;
            tags.push(NostrTag::new(binding.tag, vec![value.clone()]));
        }

        if let Some(missing) = spec
            .bindings
            .iter()
            .find(|b| b.required && b.position >= args.len())
        {
            return Err(Error::MissingArgument {
                position: missing.position,
                name: missing.tag.to_string(),
            });
        }

        tags.extend(self.scanner.hashtag_tags(content));
        tags.extend(self.scanner.emoji_tags(content, &self.emojis));

        debug!(subcommand = spec.name, kind = spec.kind, tags = tags.len(), "Built draft");
        self.compose(spec.kind, content.clone(), tags)
    }

    /// Assemble a draft from parts, refusing anything that would leak a
    /// private key or break the tag schema.
    pub fn compose(
        &self,
        kind: u16,
        content: String,
        tags: Vec<NostrTag>,
    ) -> Result<DraftEvent, Error> {
        if self.scanner.contains_secret_key(&content) {
            return Err(Error::SecretKeyLeak("content"));
        }
        if tags_have_prefix(&tags, SECRET_KEY_PREFIX) {
            return Err(Error::SecretKeyLeak("tag"));
        }
        self.schema.validate(kind, &tags)?;

        Ok(DraftEvent {
            kind,
            content,
            tags,
        })
    }
}
