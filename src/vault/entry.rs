//! Plaintext data model of an unlocked vault.
//!
//! A `VaultDocument` only ever exists in memory. It is serialized to JSON
//! right before encryption, and the serialized bytes are wiped after use.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::errors::{Result, VaultError};

/// A single stored credential.
///
/// `id` is assigned once at creation and never changes. Text fields are
/// zeroed when the entry is dropped.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct CredentialEntry {
    #[zeroize(skip)]
    id: Uuid,
    name: String,
    secret: String,
    notes: String,
    #[zeroize(skip)]
    created_at: DateTime<Utc>,
    #[zeroize(skip)]
    updated_at: DateTime<Utc>,
}

impl CredentialEntry {
    /// Build a fresh entry. Inputs must already be validated.
    fn new(id: Uuid, name: String, secret: String, notes: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            name,
            secret,
            notes,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Case-insensitive substring match on name and notes.
    pub fn matches(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.name.to_lowercase().contains(&query) || self.notes.to_lowercase().contains(&query)
    }
}

impl std::fmt::Debug for CredentialEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialEntry")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("secret", &"<redacted>")
            .field("notes", &"<redacted>")
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .finish()
    }
}

/// Fields to change on an existing entry. `None` leaves a field as-is.
#[derive(Default, Clone, Zeroize, ZeroizeOnDrop)]
pub struct EntryUpdate {
    pub name: Option<String>,
    pub secret: Option<String>,
    pub notes: Option<String>,
}

impl EntryUpdate {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn secret(mut self, secret: impl Into<String>) -> Self {
        self.secret = Some(secret.into());
        self
    }

    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.secret.is_none() && self.notes.is_none()
    }
}

impl std::fmt::Debug for EntryUpdate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntryUpdate")
            .field("name", &self.name)
            .field("secret", &self.secret.as_ref().map(|_| "<redacted>"))
            .field("notes", &self.notes.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// The decrypted vault: an ordered list of entries plus its creation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultDocument {
    entries: Vec<CredentialEntry>,
    created_at: DateTime<Utc>,
}

impl Default for VaultDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl VaultDocument {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            created_at: Utc::now(),
        }
    }

    pub fn entries(&self) -> &[CredentialEntry] {
        &self.entries
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: Uuid) -> Option<&CredentialEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    fn position(&self, id: Uuid) -> Result<usize> {
        self.entries
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| VaultError::EntryNotFound(id.to_string()))
    }

    /// Append a new entry with a fresh id that no other entry uses.
    pub fn add(&mut self, name: &str, secret: &str, notes: &str) -> Result<&CredentialEntry> {
        let name = validate_name(name)?;
        validate_secret(secret)?;

        let mut id = Uuid::new_v4();
        while self.get(id).is_some() {
            id = Uuid::new_v4();
        }

        let entry = CredentialEntry::new(id, name, secret.to_string(), notes.trim().to_string());
        self.entries.push(entry);
        let last = self.entries.len() - 1;
        Ok(&self.entries[last])
    }

    /// Apply `update` to the entry with `id` and refresh its `updated_at`.
    ///
    /// All supplied fields are validated before any is applied.
    pub fn update(&mut self, id: Uuid, update: &EntryUpdate) -> Result<&CredentialEntry> {
        let index = self.position(id)?;

        let name = update.name.as_deref().map(validate_name).transpose()?;
        if let Some(secret) = update.secret.as_deref() {
            validate_secret(secret)?;
        }

        let entry = &mut self.entries[index];
        if let Some(name) = name {
            entry.name.zeroize();
            entry.name = name;
        }
        if let Some(secret) = update.secret.as_deref() {
            entry.secret.zeroize();
            entry.secret = secret.to_string();
        }
        if let Some(notes) = update.notes.as_deref() {
            entry.notes.zeroize();
            entry.notes = notes.trim().to_string();
        }
        entry.updated_at = Utc::now();

        Ok(&self.entries[index])
    }

    /// Remove the entry with `id`.
    pub fn remove(&mut self, id: Uuid) -> Result<()> {
        let index = self.position(id)?;
        self.entries.remove(index);
        Ok(())
    }
}

fn validate_name(name: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(VaultError::Validation("name cannot be empty".into()));
    }
    Ok(trimmed.to_string())
}

fn validate_secret(secret: &str) -> Result<()> {
    if secret.trim().is_empty() {
        return Err(VaultError::Validation("secret cannot be empty".into()));
    }
    Ok(())
}
