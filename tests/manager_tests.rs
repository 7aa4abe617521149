//! Integration tests for `VaultManager` and `SharedVault`.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use pwvault::crypto::{Argon2Params, KdfParams};
use pwvault::errors::{Result, VaultError};
use pwvault::storage::{FileStore, KeyValueStore, MemoryStore};
use pwvault::vault::format::{decode_blob, encode_blob};
use pwvault::vault::store::{BLOB_KEY, KDF_KEY, VERIFIER_KEY};
use pwvault::vault::{EntryUpdate, SharedVault, VaultManager};
use tempfile::TempDir;
use uuid::Uuid;

/// Cheapest Argon2id parameters the vault accepts, to keep setup/login fast.
fn fast_params() -> KdfParams {
    KdfParams::Argon2id(Argon2Params {
        memory_kib: 8192,
        iterations: 1,
        parallelism: 1,
    })
}

fn new_vault() -> (Arc<MemoryStore>, VaultManager<Arc<MemoryStore>>) {
    let backend = Arc::new(MemoryStore::new());
    let vault = VaultManager::with_kdf_params(Arc::clone(&backend), fast_params());
    (backend, vault)
}

fn persisted_nonce(backend: &MemoryStore) -> Vec<u8> {
    let raw = backend.get(BLOB_KEY).unwrap().unwrap();
    decode_blob(&raw).unwrap().nonce().unwrap().to_vec()
}

/// Wraps a store and fails every write while `fail_writes` is set.
struct FailingStore {
    inner: MemoryStore,
    fail_writes: AtomicBool,
}

impl FailingStore {
    fn new() -> Self {
        Self {
            inner: MemoryStore::new(),
            fail_writes: AtomicBool::new(false),
        }
    }
}

impl KeyValueStore for FailingStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(VaultError::Storage("disk full".into()));
        }
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.inner.remove(key)
    }
}

// ---------------------------------------------------------------------------
// Setup and authentication
// ---------------------------------------------------------------------------

#[test]
fn entries_survive_lock_and_login() {
    let (_backend, mut vault) = new_vault();
    vault.setup("Abcd1234").unwrap();
    vault.add_entry("Email", "hunter2", "").unwrap();
    vault.lock();
    vault.login("Abcd1234").unwrap();

    let entries = vault.list_entries().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].name(), "Email");
    assert_eq!(entries[0].secret(), "hunter2");
}

#[test]
fn wrong_passphrase_leaves_vault_locked() {
    let (_backend, mut vault) = new_vault();
    vault.setup("Abcd1234").unwrap();
    vault.lock();

    assert!(matches!(
        vault.login("WrongPass1"),
        Err(VaultError::WrongPassphrase)
    ));
    assert!(!vault.is_unlocked());
    assert!(matches!(vault.list_entries(), Err(VaultError::Locked)));
}

#[test]
fn correct_and_policy_failing_passphrases() {
    let (_backend, mut vault) = new_vault();
    vault.setup("Passw0rd!").unwrap();
    vault.lock();

    vault.login("Passw0rd!").unwrap();
    assert!(vault.is_unlocked());
    assert!(matches!(vault.login("wrong"), Err(VaultError::WrongPassphrase)));
    assert!(!vault.is_unlocked());
}

#[test]
fn failed_login_while_unlocked_locks() {
    let (_backend, mut vault) = new_vault();
    vault.setup("Abcd1234").unwrap();
    assert!(vault.login("Zzzz9999").is_err());
    assert!(!vault.is_unlocked());
}

#[test]
fn setup_twice_is_rejected() {
    let (_backend, mut vault) = new_vault();
    vault.setup("Abcd1234").unwrap();
    assert!(matches!(
        vault.setup("Other9999"),
        Err(VaultError::AlreadyInitialized)
    ));
    vault.lock();
    vault.login("Abcd1234").unwrap();
}

#[test]
fn weak_passphrase_leaves_vault_uninitialized() {
    let (backend, mut vault) = new_vault();
    for weak in ["short1", "lettersonly", "12345678", ""] {
        assert!(matches!(
            vault.setup(weak),
            Err(VaultError::WeakPassphrase(_))
        ));
    }
    assert!(!vault.is_initialized().unwrap());
    assert!(backend.keys().unwrap().is_empty());
}

#[test]
fn login_before_setup_is_not_initialized() {
    let (_backend, mut vault) = new_vault();
    assert!(matches!(
        vault.login("Abcd1234"),
        Err(VaultError::NotInitialized)
    ));
}

#[test]
fn setup_leaves_vault_unlocked_and_empty() {
    let (backend, mut vault) = new_vault();
    vault.setup("Abcd1234").unwrap();
    assert!(vault.is_unlocked());
    assert!(vault.list_entries().unwrap().is_empty());
    assert_eq!(
        backend.keys().unwrap(),
        vec![BLOB_KEY.to_string(), KDF_KEY.to_string(), VERIFIER_KEY.to_string()]
    );
}

// ---------------------------------------------------------------------------
// Corruption
// ---------------------------------------------------------------------------

#[test]
fn tampered_blob_is_reported_as_corrupt() {
    let (backend, mut vault) = new_vault();
    vault.setup("Abcd1234").unwrap();
    vault.add_entry("Email", "hunter2", "").unwrap();
    vault.lock();

    let raw = backend.get(BLOB_KEY).unwrap().unwrap();
    let mut bytes = decode_blob(&raw).unwrap().into_bytes();
    let last = bytes.len() - 1;
    bytes[last] ^= 0x01;
    let tampered = pwvault::crypto::VaultBlob::from_bytes(bytes);
    backend.set(BLOB_KEY, encode_blob(&tampered).as_bytes()).unwrap();

    assert!(matches!(
        vault.login("Abcd1234"),
        Err(VaultError::CorruptVault(_))
    ));
    assert!(!vault.is_unlocked());
}

#[test]
fn wrong_passphrase_wins_over_corrupt_blob() {
    let (backend, mut vault) = new_vault();
    vault.setup("Abcd1234").unwrap();
    vault.lock();
    backend.set(BLOB_KEY, b"AAAA").unwrap();

    assert!(matches!(
        vault.login("Wrong9999"),
        Err(VaultError::WrongPassphrase)
    ));
}

#[test]
fn missing_blob_or_kdf_record_is_corrupt() {
    let (backend, mut vault) = new_vault();
    vault.setup("Abcd1234").unwrap();
    vault.lock();

    backend.remove(BLOB_KEY).unwrap();
    assert!(matches!(
        vault.login("Abcd1234"),
        Err(VaultError::CorruptVault(_))
    ));

    backend.remove(KDF_KEY).unwrap();
    assert!(matches!(
        vault.login("Abcd1234"),
        Err(VaultError::CorruptVault(_))
    ));
}

#[test]
fn tampered_kdf_record_is_corrupt() {
    let (backend, mut vault) = new_vault();
    vault.setup("Abcd1234").unwrap();
    vault.add_entry("Email", "hunter2", "").unwrap();
    vault.lock();
    let good = backend.get(KDF_KEY).unwrap().unwrap();
    let salt = r#""salt":"AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA=""#;

    let tampered = [
        // weakened below the iteration minimum
        format!(r#"{{"version":1,"algorithm":"pbkdf2-sha256","iterations":1000,{salt}}}"#),
        // one-byte salt
        r#"{"version":1,"algorithm":"argon2id","memory_kib":8192,"iterations":1,"parallelism":1,"salt":"AQ=="}"#.to_string(),
        // memory cost far beyond anything allocatable
        format!(
            r#"{{"version":1,"algorithm":"argon2id","memory_kib":4000000000,"iterations":1,"parallelism":1,{salt}}}"#
        ),
        // unknown algorithm
        format!(r#"{{"version":1,"algorithm":"md5",{salt}}}"#),
        "not json".to_string(),
    ];

    for record in &tampered {
        backend.set(KDF_KEY, record.as_bytes()).unwrap();
        assert!(
            matches!(vault.login("Abcd1234"), Err(VaultError::CorruptVault(_))),
            "record accepted: {record}"
        );
        assert!(!vault.is_unlocked());
    }

    backend.set(KDF_KEY, &good).unwrap();
    vault.login("Abcd1234").unwrap();
    assert_eq!(vault.list_entries().unwrap().len(), 1);
}

#[test]
fn garbage_verifier_is_corrupt() {
    let (backend, mut vault) = new_vault();
    vault.setup("Abcd1234").unwrap();
    vault.lock();
    backend.set(VERIFIER_KEY, b"not base64 at all!").unwrap();

    assert!(matches!(
        vault.login("Abcd1234"),
        Err(VaultError::CorruptVault(_))
    ));
}

#[test]
fn reset_recovers_from_corruption() {
    let (backend, mut vault) = new_vault();
    vault.setup("Abcd1234").unwrap();
    vault.lock();
    backend.set(BLOB_KEY, b"!!!").unwrap();
    assert!(vault.login("Abcd1234").is_err());

    vault.reset().unwrap();
    assert!(!vault.is_initialized().unwrap());
    vault.setup("Fresh1234").unwrap();
    assert!(vault.list_entries().unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// CRUD
// ---------------------------------------------------------------------------

#[test]
fn add_then_delete_leaves_empty_list() {
    let (_backend, mut vault) = new_vault();
    vault.setup("Abcd1234").unwrap();
    let id = vault.add_entry("A", "s", "").unwrap().id();
    vault.delete_entry(id).unwrap();
    assert!(vault.list_entries().unwrap().is_empty());
}

#[test]
fn list_is_stable_between_mutations() {
    let (_backend, mut vault) = new_vault();
    vault.setup("Abcd1234").unwrap();
    for name in ["B", "A", "C"] {
        vault.add_entry(name, "s", "").unwrap();
    }

    let first = vault.list_entries().unwrap().to_vec();
    let second = vault.list_entries().unwrap().to_vec();
    assert_eq!(first, second);
    let names: Vec<&str> = first.iter().map(|e| e.name()).collect();
    assert_eq!(names, vec!["B", "A", "C"]);
}

#[test]
fn fields_are_normalized_on_add() {
    let (_backend, mut vault) = new_vault();
    vault.setup("Abcd1234").unwrap();
    let entry = vault.add_entry("  Email ", " pass word ", "\tpersonal\n").unwrap();

    assert_eq!(entry.name(), "Email");
    assert_eq!(entry.notes(), "personal");
    assert_eq!(entry.secret(), " pass word ");
    assert_eq!(entry.created_at(), entry.updated_at());
}

#[test]
fn blank_required_fields_are_rejected() {
    let (_backend, mut vault) = new_vault();
    vault.setup("Abcd1234").unwrap();

    assert!(matches!(
        vault.add_entry("   ", "s", ""),
        Err(VaultError::Validation(_))
    ));
    assert!(matches!(
        vault.add_entry("Email", "", ""),
        Err(VaultError::Validation(_))
    ));
    assert!(matches!(
        vault.add_entry("Email", "  \n", ""),
        Err(VaultError::Validation(_))
    ));
    assert!(vault.list_entries().unwrap().is_empty());
}

#[test]
fn update_merges_fields_and_refreshes_timestamp() {
    let (_backend, mut vault) = new_vault();
    vault.setup("Abcd1234").unwrap();
    let original = vault.add_entry("Email", "hunter2", "old").unwrap();

    let updated = vault
        .update_entry(original.id(), EntryUpdate::default().notes("new"))
        .unwrap();
    assert_eq!(updated.id(), original.id());
    assert_eq!(updated.name(), "Email");
    assert_eq!(updated.secret(), "hunter2");
    assert_eq!(updated.notes(), "new");
    assert_eq!(updated.created_at(), original.created_at());
    assert!(updated.updated_at() >= original.updated_at());

    vault.lock();
    vault.login("Abcd1234").unwrap();
    assert_eq!(vault.get_entry(original.id()).unwrap().notes(), "new");
}

#[test]
fn invalid_update_changes_nothing() {
    let (_backend, mut vault) = new_vault();
    vault.setup("Abcd1234").unwrap();
    let id = vault.add_entry("Email", "hunter2", "").unwrap().id();

    let result = vault.update_entry(id, EntryUpdate::default().secret("changed").name(" "));
    assert!(matches!(result, Err(VaultError::Validation(_))));
    assert_eq!(vault.get_entry(id).unwrap().secret(), "hunter2");
}

#[test]
fn unknown_ids_are_not_found() {
    let (_backend, mut vault) = new_vault();
    vault.setup("Abcd1234").unwrap();
    vault.add_entry("Email", "hunter2", "").unwrap();
    let missing = Uuid::new_v4();

    assert!(matches!(
        vault.get_entry(missing),
        Err(VaultError::EntryNotFound(_))
    ));
    assert!(matches!(
        vault.update_entry(missing, EntryUpdate::default().name("x")),
        Err(VaultError::EntryNotFound(_))
    ));
    assert!(matches!(
        vault.delete_entry(missing),
        Err(VaultError::EntryNotFound(_))
    ));
    assert_eq!(vault.list_entries().unwrap().len(), 1);
}

// ---------------------------------------------------------------------------
// Persistence
// ---------------------------------------------------------------------------

#[test]
fn every_persisted_blob_has_a_fresh_nonce() {
    let (backend, mut vault) = new_vault();
    vault.setup("Abcd1234").unwrap();

    let mut seen = HashSet::new();
    assert!(seen.insert(persisted_nonce(&backend)));

    // Pair each add with a delete so the document stays small.
    for i in 0..10_000 {
        let id = vault.add_entry(&format!("entry {i}"), "s3cret", "").unwrap().id();
        assert!(seen.insert(persisted_nonce(&backend)), "nonce reused on add {i}");
        vault.delete_entry(id).unwrap();
        assert!(seen.insert(persisted_nonce(&backend)), "nonce reused on delete {i}");
    }
    assert_eq!(seen.len(), 20_001);
}

#[test]
fn failed_save_keeps_memory_and_storage_in_sync() {
    let backend = Arc::new(FailingStore::new());
    let mut vault = VaultManager::with_kdf_params(Arc::clone(&backend), fast_params());
    vault.setup("Abcd1234").unwrap();
    let id = vault.add_entry("Email", "hunter2", "").unwrap().id();

    backend.fail_writes.store(true, Ordering::SeqCst);
    assert!(matches!(
        vault.add_entry("Bank", "1234", ""),
        Err(VaultError::Storage(_))
    ));
    assert!(vault
        .update_entry(id, EntryUpdate::default().secret("changed"))
        .is_err());
    assert!(vault.delete_entry(id).is_err());

    let in_memory = vault.list_entries().unwrap().to_vec();
    assert_eq!(in_memory.len(), 1);
    assert_eq!(in_memory[0].secret(), "hunter2");

    backend.fail_writes.store(false, Ordering::SeqCst);
    vault.lock();
    vault.login("Abcd1234").unwrap();
    assert_eq!(vault.list_entries().unwrap(), in_memory.as_slice());
}

#[test]
fn empty_update_writes_nothing() {
    let backend = Arc::new(FailingStore::new());
    let mut vault = VaultManager::with_kdf_params(Arc::clone(&backend), fast_params());
    vault.setup("Abcd1234").unwrap();
    let id = vault.add_entry("Email", "hunter2", "").unwrap().id();

    backend.fail_writes.store(true, Ordering::SeqCst);
    let entry = vault.update_entry(id, EntryUpdate::default()).unwrap();
    assert_eq!(entry.name(), "Email");
}

#[test]
fn file_backed_vault_reopens_in_new_manager() {
    let dir = TempDir::new().unwrap();
    let id = {
        let mut vault =
            VaultManager::with_kdf_params(FileStore::open(dir.path()).unwrap(), fast_params());
        vault.setup("Abcd1234").unwrap();
        vault.add_entry("GitHub", "ghp_token", "work").unwrap().id()
    };

    // Setup params are read back from disk, not from the constructor.
    let mut reopened = VaultManager::new(FileStore::open(dir.path()).unwrap());
    assert!(reopened.is_initialized().unwrap());
    assert!(!reopened.is_unlocked());
    reopened.login("Abcd1234").unwrap();
    let entry = reopened.get_entry(id).unwrap();
    assert_eq!(entry.secret(), "ghp_token");
    assert_eq!(entry.notes(), "work");
}

// ---------------------------------------------------------------------------
// Concurrency
// ---------------------------------------------------------------------------

#[test]
fn shared_vault_serializes_concurrent_mutations() {
    let backend = Arc::new(MemoryStore::new());
    let shared = SharedVault::new(VaultManager::with_kdf_params(
        Arc::clone(&backend),
        fast_params(),
    ));
    shared.setup("Abcd1234").unwrap();

    let handles: Vec<_> = (0..8)
        .map(|t| {
            let vault = shared.clone();
            thread::spawn(move || {
                for i in 0..25 {
                    vault
                        .add_entry(&format!("t{t}-{i}"), "secret1", "")
                        .unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(shared.list_entries().unwrap().len(), 200);

    // Every mutation reached storage.
    let mut fresh = VaultManager::new(Arc::clone(&backend));
    fresh.login("Abcd1234").unwrap();
    assert_eq!(fresh.list_entries().unwrap().len(), 200);
}

#[test]
fn shared_vault_lock_blocks_all_handles() {
    let shared = SharedVault::new(VaultManager::with_kdf_params(
        MemoryStore::new(),
        fast_params(),
    ));
    shared.setup("Abcd1234").unwrap();
    let other = shared.clone();

    shared.lock().unwrap();
    assert!(!other.is_unlocked().unwrap());
    assert!(matches!(
        other.add_entry("A", "s", ""),
        Err(VaultError::Locked)
    ));
}

// ---------------------------------------------------------------------------
// Secret hygiene
// ---------------------------------------------------------------------------

#[test]
fn debug_output_never_shows_secrets() {
    let (_backend, mut vault) = new_vault();
    vault.setup("Abcd1234").unwrap();
    let entry = vault.add_entry("Email", "hunter2", "pin 4321").unwrap();

    let shown = format!("{entry:?}");
    assert!(shown.contains("Email"));
    assert!(!shown.contains("hunter2"));
    assert!(!shown.contains("4321"));

    let update = format!("{:?}", EntryUpdate::default().secret("hunter2"));
    assert!(!update.contains("hunter2"));
}

#[test]
fn error_messages_never_quote_secrets() {
    let (_backend, mut vault) = new_vault();
    vault.setup("Abcd1234").unwrap();
    vault.lock();

    let err = vault.login("Secret999").unwrap_err();
    assert!(!err.to_string().contains("Secret999"));
    let err = vault.setup("weak").unwrap_err();
    assert!(!err.to_string().contains("weak"));
}
