//! secrets::file_store
//!
//! Credentials kept in `~/.atomgit-code/secrets.toml`.
//!
//! The file holds a single `[entries]` table. It is created with mode 0600
//! on Unix and every update goes through a temp file followed by a rename,
//! so a crash never leaves a half-written credential behind.

use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

use serde::{Deserialize, Serialize};

use super::traits::{SecretError, SecretStore};

/// On-disk layout of the secrets file.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct SecretsDocument {
    entries: BTreeMap<String, String>,
}

/// File-backed [`SecretStore`], the default provider.
#[derive(Debug)]
pub struct FileSecretStore {
    path: PathBuf,
}

impl FileSecretStore {
    /// Store at `~/.atomgit-code/secrets.toml`.
    pub fn new() -> Result<Self, SecretError> {
        let home = dirs::home_dir()
            .ok_or_else(|| SecretError::ReadError("cannot determine home directory".into()))?;
        Ok(Self::with_path(home.join(".atomgit-code").join("secrets.toml")))
    }

    /// Store at an explicit path.
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    /// Location of the secrets file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<SecretsDocument, SecretError> {
        if !self.path.exists() {
            return Ok(SecretsDocument::default());
        }

        let raw = fs::read_to_string(&self.path)
            .map_err(|e| SecretError::ReadError(format!("cannot read secrets file: {}", e)))?;
        toml::from_str(&raw)
            .map_err(|e| SecretError::ReadError(format!("cannot parse secrets file: {}", e)))
    }

    fn save(&self, doc: &SecretsDocument) -> Result<(), SecretError> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)
                .map_err(|e| SecretError::WriteError(format!("cannot create directory: {}", e)))?;
        }

        let body = toml::to_string_pretty(doc)
            .map_err(|e| SecretError::WriteError(format!("cannot serialize secrets: {}", e)))?;
        let staging = self.path.with_extension("toml.tmp");

        {
            let mut file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&staging)
                .map_err(|e| SecretError::WriteError(format!("cannot create temp file: {}", e)))?;

            // Restrict before any content lands on disk.
            #[cfg(unix)]
            file.set_permissions(fs::Permissions::from_mode(0o600))
                .map_err(|e| SecretError::WriteError(format!("cannot set permissions: {}", e)))?;

            file.write_all(body.as_bytes())
                .and_then(|_| file.sync_all())
                .map_err(|e| SecretError::WriteError(format!("cannot write secrets: {}", e)))?;
        }

        fs::rename(&staging, &self.path)
            .map_err(|e| SecretError::WriteError(format!("cannot replace secrets file: {}", e)))
    }

    /// Whether the file is private to its owner. An absent file counts as private.
    #[cfg(unix)]
    pub fn is_private(&self) -> Result<bool, SecretError> {
        match fs::metadata(&self.path) {
            Ok(meta) => Ok(meta.permissions().mode() & 0o777 == 0o600),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(true),
            Err(e) => Err(SecretError::ReadError(format!(
                "cannot read file metadata: {}",
                e
            ))),
        }
    }

    /// Whether the file is private to its owner. Always true off Unix.
    #[cfg(not(unix))]
    pub fn is_private(&self) -> Result<bool, SecretError> {
        Ok(true)
    }
}

impl SecretStore for FileSecretStore {
    fn get(&self, key: &str) -> Result<Option<String>, SecretError> {
        Ok(self.load()?.entries.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SecretError> {
        let mut doc = self.load()?;
        doc.entries.insert(key.to_string(), value.to_string());
        self.save(&doc)
    }

    fn delete(&self, key: &str) -> Result<(), SecretError> {
        let mut doc = self.load()?;
        if doc.entries.remove(key).is_none() {
            return Ok(());
        }
        self.save(&doc)
    }
}
