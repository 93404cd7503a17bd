//! The nostk subcommands, independent of argument parsing.

use std::path::PathBuf;

use nostr_sdk::prelude::*;
use tracing::info;

use crate::builder::EventBuilder;
use crate::config::NostkConfig;
use crate::editor::edit_file;
use crate::events::{DraftEvent, KIND_METADATA, KIND_RELAY_LIST};
use crate::publish::{NostrSdkConnector, PublishReport, RelayConnector, RelayPublisher};
use crate::store::{KeyFiles, LocalStore, PROFILE_FILE, RELAYS_FILE};
use crate::Error;

pub struct Nostk<C> {
    config: NostkConfig,
    store: LocalStore,
    publisher: RelayPublisher<C>,
}

impl Nostk<NostrSdkConnector> {
    pub fn new(config: NostkConfig) -> Self {
        let connector = NostrSdkConnector::new(config.connect_timeout, config.publish_timeout);
        Self::with_connector(config, connector)
    }
}

impl<C: RelayConnector> Nostk<C> {
    pub fn with_connector(config: NostkConfig, connector: C) -> Self {
        Self {
            store: LocalStore::new(config.home.clone()),
            config,
            publisher: RelayPublisher::new(connector),
        }
    }

    pub fn store(&self) -> &LocalStore {
        &self.store
    }

    pub fn init(&self) -> Result<Vec<PathBuf>, Error> {
        self.store.init()
    }

    /// Generate and save a new key pair. Existing keys are kept unless
    /// `force` is set.
    pub fn genkey(&self, force: bool) -> Result<KeyFiles, Error> {
        if self.store.has_keys() && !force {
            return Err(Error::KeyExists(self.store.dir().to_path_buf()));
        }
        let files = KeyFiles::from_keys(&Keys::generate())?;
        self.store.save_keys(&files)?;
        info!(npub = %files.bech32_public, "Generated key pair");
        Ok(files)
    }

    /// One `<url> R:<read> W:<write>` line per relay.
    pub fn relay_lines(&self) -> Result<Vec<String>, Error> {
        let relays = self.store.relay_list()?;
        Ok(relays
            .entries()
            .map(|(url, flag)| format!("{url} R:{} W:{}", flag.read, flag.write))
            .collect())
    }

    pub fn edit_relays(&self) -> Result<(), Error> {
        edit_file(self.config.editor()?, &self.store.path(RELAYS_FILE))
    }

    pub fn edit_profile(&self) -> Result<(), Error> {
        edit_file(self.config.editor()?, &self.store.path(PROFILE_FILE))
    }

    /// Publish a registry subcommand. `args` is the full argument vector,
    /// program name first.
    pub async fn publish_args(&self, args: &[String]) -> Result<PublishReport, Error> {
        let builder = EventBuilder::standard()?;
        builder.registry().lookup(args)?;
        let draft = builder.with_emojis(self.store.emojis()?).build(args)?;
        self.sign_and_publish(draft).await
    }

    pub async fn publish_profile(&self) -> Result<PublishReport, Error> {
        let profile = self.store.profile()?;
        let content = serde_json::to_string(&profile)?;
        let draft = EventBuilder::standard()?.compose(KIND_METADATA, content, Vec::new())?;
        self.sign_and_publish(draft).await
    }

    pub async fn publish_relays(&self) -> Result<PublishReport, Error> {
        let relays = self.store.relay_list()?;
        let draft =
            EventBuilder::standard()?.compose(KIND_RELAY_LIST, String::new(), relays.to_tags())?;
        self.sign_and_publish(draft).await
    }

    async fn sign_and_publish(&self, draft: DraftEvent) -> Result<PublishReport, Error> {
        let keys = self.store.read_keys()?;
        let urls = self.store.relay_list()?.urls();
        let event = draft.sign(&keys)?;

        info!(kind = draft.kind, relays = urls.len(), event_id = %event.id, "Publishing");
        Ok(self.publisher.publish(&event, &urls).await)
    }
}
