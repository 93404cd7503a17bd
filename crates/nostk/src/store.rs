//! Local data directory: key files, relay list, profile and custom emoji.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use nostr_sdk::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::events::{relay_tag, NostrTag};
use crate::Error;

pub const HEX_SECRET_FILE: &str = ".hsec";
pub const BECH32_SECRET_FILE: &str = ".nsec";
pub const HEX_PUBLIC_FILE: &str = ".hpub";
pub const BECH32_PUBLIC_FILE: &str = ".npub";
pub const RELAYS_FILE: &str = "relays.json";
pub const PROFILE_FILE: &str = "profile.json";
pub const EMOJI_FILE: &str = "customemoji.json";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RwFlag {
    pub read: bool,
    pub write: bool,
}

/// Relay URLs with their read/write intent, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RelayList(pub IndexMap<String, RwFlag>);

impl RelayList {
    /// Skeleton written by `init`: one blank entry to fill in.
    pub fn skeleton() -> Self {
        let mut relays = IndexMap::new();
        relays.insert(
            String::new(),
            RwFlag {
                read: true,
                write: true,
            },
        );
        Self(relays)
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &RwFlag)> {
        self.0
            .iter()
            .filter(|(url, _)| !url.trim().is_empty())
            .map(|(url, flag)| (url.as_str(), flag))
    }

    /// URLs to publish to. Blank entries are skipped.
    pub fn urls(&self) -> Vec<String> {
        if self.0.keys().any(|url| url.trim().is_empty()) {
            warn!("Skipping blank relay entry; run `nostk editRelays`");
        }
        self.entries().map(|(url, _)| url.to_string()).collect()
    }

    /// `r` tags for a relay list event.
    pub fn to_tags(&self) -> Vec<NostrTag> {
        self.entries()
            .map(|(url, flag)| relay_tag(url, flag.read, flag.write))
            .collect()
    }
}

/// Kind 0 profile. Fields beyond the common ones are carried through as
/// written.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileMetadata {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub about: String,
    #[serde(default)]
    pub website: String,
    #[serde(default)]
    pub picture: String,
    #[serde(default)]
    pub banner: String,
    #[serde(default)]
    pub nip05: String,
    #[serde(default)]
    pub lud16: String,
    #[serde(flatten)]
    pub extra: IndexMap<String, serde_json::Value>,
}

/// Key pair in both encodings, as written by `genkey`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyFiles {
    pub hex_secret: String,
    pub bech32_secret: String,
    pub hex_public: String,
    pub bech32_public: String,
}

impl KeyFiles {
    pub fn from_keys(keys: &Keys) -> Result<Self, Error> {
        Ok(Self {
            hex_secret: keys.secret_key().to_secret_hex(),
            bech32_secret: keys
                .secret_key()
                .to_bech32()
                .map_err(|e| Error::Bech32(e.to_string()))?,
            hex_public: keys.public_key().to_hex(),
            bech32_public: keys
                .public_key()
                .to_bech32()
                .map_err(|e| Error::Bech32(e.to_string()))?,
        })
    }
}

/// File-backed store rooted at the nostk data directory.
#[derive(Debug, Clone)]
pub struct LocalStore {
    dir: PathBuf,
}

impl LocalStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path(&self, file: &str) -> PathBuf {
        self.dir.join(file)
    }

    /// Create the data directory (mode 0700 on unix) if it is missing.
    pub fn ensure_dir(&self) -> Result<(), Error> {
        if self.dir.is_dir() {
            return Ok(());
        }
        let mut builder = fs::DirBuilder::new();
        builder.recursive(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::DirBuilderExt;
            builder.mode(0o700);
        }
        builder.create(&self.dir)?;
        Ok(())
    }

    /// Write skeleton profile, relay list and emoji files. Existing files
    /// are left alone. Returns the files that were created.
    pub fn init(&self) -> Result<Vec<PathBuf>, Error> {
        self.ensure_dir()?;

        let emojis: IndexMap<String, String> = IndexMap::new();

        let skeletons = [
            (PROFILE_FILE, serde_json::to_string(&ProfileMetadata::default())?),
            (RELAYS_FILE, serde_json::to_string(&RelayList::skeleton())?),
            (EMOJI_FILE, serde_json::to_string(&emojis)?),
        ];

        let mut created = Vec::new();
        for (file, body) in skeletons {
            let path = self.path(file);
            if path.exists() {
                warn!(path = %path.display(), "Already exists, leaving it untouched");
                continue;
            }
            fs::write(&path, body)?;
            info!(path = %path.display(), "Created");
            created.push(path);
        }
        Ok(created)
    }

    pub fn has_keys(&self) -> bool {
        self.path(HEX_SECRET_FILE).exists()
    }

    pub fn save_keys(&self, keys: &KeyFiles) -> Result<(), Error> {
        self.ensure_dir()?;
        for (file, value) in [
            (HEX_SECRET_FILE, &keys.hex_secret),
            (BECH32_SECRET_FILE, &keys.bech32_secret),
            (HEX_PUBLIC_FILE, &keys.hex_public),
            (BECH32_PUBLIC_FILE, &keys.bech32_public),
        ] {
            write_private(&self.path(file), value)?;
        }
        Ok(())
    }

    /// Signing keys from the first non-empty line of the hex secret file.
    pub fn read_keys(&self) -> Result<Keys, Error> {
        let path = self.path(HEX_SECRET_FILE);
        let body = match fs::read_to_string(&path) {
            Ok(body) => body,
            Err(e) if e.kind() == ErrorKind::NotFound => return Err(Error::KeyNotFound(path)),
            Err(e) => return Err(e.into()),
        };
        let secret = body
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .ok_or_else(|| Error::KeyNotFound(path.clone()))?;
        Ok(Keys::parse(secret)?)
    }

    pub fn relay_list(&self) -> Result<RelayList, Error> {
        self.read_json(RELAYS_FILE)
    }

    pub fn profile(&self) -> Result<ProfileMetadata, Error> {
        self.read_json(PROFILE_FILE)
    }

    /// Custom emoji list. A missing file means no custom emoji.
    pub fn emojis(&self) -> Result<IndexMap<String, String>, Error> {
        match self.read_json(EMOJI_FILE) {
            Err(Error::NotInitialized(_)) => Ok(IndexMap::new()),
            other => other,
        }
    }

    fn read_json<T: serde::de::DeserializeOwned>(&self, file: &str) -> Result<T, Error> {
        let path = self.path(file);
        let body = match fs::read_to_string(&path) {
            Ok(body) => body,
            Err(e) if e.kind() == ErrorKind::NotFound => return Err(Error::NotInitialized(path)),
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_str(&body)?)
    }
}

fn write_private(path: &Path, value: &str) -> Result<(), Error> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let mut file = options.open(path)?;
    std::io::Write::write_all(&mut file, value.as_bytes())?;
    Ok(())
}
