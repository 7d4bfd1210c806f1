use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::config::Settings;
use crate::crypto::{self, KdfParams};
use crate::tracker::Tracker;

const DATA_FILE: &str = "data.cyclecast";

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("crypto error: {0}")]
    Crypto(#[from] crypto::CryptoError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Passphrase-encrypted file holding one serialized [`Tracker`].
#[derive(Debug, Clone)]
pub struct Vault {
    path: PathBuf,
    kdf: KdfParams,
}

impl Vault {
    pub fn new(path: impl Into<PathBuf>, kdf: KdfParams) -> Self {
        Self {
            path: path.into(),
            kdf,
        }
    }

    /// Vault file inside `dir`.
    pub fn in_dir(dir: &Path, kdf: KdfParams) -> Self {
        Self::new(dir.join(DATA_FILE), kdf)
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::in_dir(&settings.data_dir, settings.kdf)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether a vault has been created before.
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    pub fn save(&self, passphrase: &str, tracker: &Tracker) -> Result<(), StorageError> {
        let json = zeroize::Zeroizing::new(serde_json::to_vec(tracker)?);
        let encrypted = crypto::encrypt(passphrase, &json, self.kdf)?;

        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }
        // replace atomically
        let staging = self.path.with_extension("tmp");
        fs::write(&staging, encrypted)?;
        fs::rename(&staging, &self.path)?;

        debug!(path = %self.path.display(), "saved vault");
        Ok(())
    }

    pub fn load(&self, passphrase: &str) -> Result<Tracker, StorageError> {
        let encrypted = fs::read(&self.path)?;
        let decrypted = zeroize::Zeroizing::new(crypto::decrypt(passphrase, &encrypted, self.kdf)?);
        let tracker = serde_json::from_slice(&decrypted)?;
        debug!(path = %self.path.display(), "loaded vault");
        Ok(tracker)
    }

    /// Delete the vault permanently. Missing files are not an error.
    pub fn wipe(&self) -> Result<(), StorageError> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
            info!(path = %self.path.display(), "wiped vault");
        }
        Ok(())
    }
}
