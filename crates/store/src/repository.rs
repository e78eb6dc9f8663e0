use crate::error::StoreError;
use core_types::Ledger;
use std::fs;
use std::path::{Path, PathBuf};

/// Durably saves and loads the ledger document.
///
/// The ledger lives as one pretty-printed JSON file so it stays
/// human-inspectable for auditing. Writes go to a sibling temp file first
/// and are renamed into place, so a crash mid-write leaves the previously
/// committed document untouched.
#[derive(Debug, Clone)]
pub struct LedgerStore {
    path: PathBuf,
}

impl LedgerStore {
    /// Creates a store over an explicit ledger path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Creates a store at the platform default location,
    /// `<data dir>/meridian/ledger.json`.
    pub fn at_default_path() -> Result<Self, StoreError> {
        let dirs = directories::ProjectDirs::from("", "", "meridian")
            .ok_or(StoreError::NoDataDir)?;
        Ok(Self::new(dirs.data_dir().join("ledger.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether a ledger document already exists at this path.
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Loads the persisted ledger. `None` means no document exists yet,
    /// which is the only case that warrants a fresh start. A
    /// present-but-unreadable document is an error; it is never silently
    /// replaced.
    pub fn load(&self) -> Result<Option<Ledger>, StoreError> {
        if !self.path.exists() {
            tracing::debug!(path = %self.path.display(), "no ledger document found");
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path)?;
        let ledger = serde_json::from_str(&content)?;
        tracing::debug!(path = %self.path.display(), "loaded ledger document");
        Ok(Some(ledger))
    }

    /// Atomically persists the ledger: serialize, write to a temp file in
    /// the same directory, then rename over the committed document.
    pub fn save(&self, ledger: &Ledger) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(ledger)?;
        let tmp_path = self.tmp_path();
        fs::write(&tmp_path, content)?;
        fs::rename(&tmp_path, &self.path)?;
        tracing::debug!(path = %self.path.display(), "saved ledger document");
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "ledger.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::Account;
    use rust_decimal_macros::dec;

    fn sample_ledger() -> Ledger {
        Ledger::new(Account::new(dec!(10000), "USDT"))
    }

    #[test]
    fn missing_document_loads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = LedgerStore::new(dir.path().join("ledger.json"));
        assert!(store.load().unwrap().is_none());
        assert!(!store.exists());
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = LedgerStore::new(dir.path().join("ledger.json"));

        let ledger = sample_ledger();
        store.save(&ledger).unwrap();
        assert_eq!(store.load().unwrap().unwrap(), ledger);
    }

    #[test]
    fn save_creates_missing_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let store = LedgerStore::new(dir.path().join("nested/deeper/ledger.json"));
        store.save(&sample_ledger()).unwrap();
        assert!(store.exists());
    }

    #[test]
    fn save_leaves_no_temp_file_behind() {
        let dir = tempfile::tempdir().unwrap();
        let store = LedgerStore::new(dir.path().join("ledger.json"));
        store.save(&sample_ledger()).unwrap();

        let leftovers: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(leftovers, vec!["ledger.json"]);
    }

    #[test]
    fn corrupt_document_is_an_error_not_a_fresh_ledger() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.json");
        fs::write(&path, "{ not json").unwrap();

        let store = LedgerStore::new(path);
        assert!(matches!(store.load(), Err(StoreError::Json(_))));
    }

    #[test]
    fn interrupted_write_preserves_the_committed_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.json");
        let store = LedgerStore::new(&path);

        let committed = sample_ledger();
        store.save(&committed).unwrap();

        // A crash between write and rename leaves a half-written temp
        // file next to the document. Load must still see the committed state.
        fs::write(dir.path().join("ledger.json.tmp"), "{ half written").unwrap();
        assert_eq!(store.load().unwrap().unwrap(), committed);
    }
}
