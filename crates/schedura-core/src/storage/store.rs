//! Whole-document JSON persistence.
//!
//! The document is rewritten in full on every save through a temp file and a
//! rename, so readers never observe a half-written file. Loading degrades to
//! a freshly seeded document instead of failing.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{CoreError, EntityKind, Result};
use crate::model::Document;

pub const DATA_FILE: &str = "user_data.json";
const BACKUP_DIR: &str = "backups";
const BACKUP_LIMIT: usize = 5;

/// Top-level keys an import payload must carry.
pub const REQUIRED_KEYS: [&str; 6] = [
    "user_profile",
    "categories",
    "tasks",
    "goals",
    "habits",
    "calendar_events",
];

/// A saved copy of the document file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BackupInfo {
    pub name: String,
    /// Seconds since the Unix epoch.
    pub modified: i64,
}

#[derive(Serialize)]
struct ExportEnvelope<'a> {
    #[serde(flatten)]
    document: &'a Document,
    exported_at: chrono::NaiveDateTime,
}

/// Persistence for one backing file.
#[derive(Debug, Clone)]
pub struct Store {
    path: PathBuf,
}

impl Store {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the configured location under the data directory.
    pub fn open_default(config: &super::Config) -> Result<Self> {
        Ok(Self::new(config.data_file()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the document. A missing or malformed file yields a seeded one.
    pub fn load(&self) -> Document {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) => {
                if e.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!(path = %self.path.display(), "cannot read document: {e}");
                }
                return Document::seeded();
            }
        };
        match serde_json::from_str::<Document>(&content) {
            Ok(doc) => doc,
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    "malformed document, starting fresh: {e}"
                );
                self.quarantine_malformed();
                Document::seeded()
            }
        }
    }

    /// Move an unparsable file aside as `<stem>.corrupt-<timestamp>.json`
    /// so the next save cannot overwrite it.
    fn quarantine_malformed(&self) {
        let stem = self
            .path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("user_data");
        let timestamp = chrono::Local::now().format("%Y%m%d-%H%M%S%3f");
        let target = self.root().join(format!("{stem}.corrupt-{timestamp}.json"));
        match fs::rename(&self.path, &target) {
            Ok(()) => tracing::warn!(kept = %target.display(), "malformed document moved aside"),
            Err(e) => tracing::warn!(
                path = %self.path.display(),
                "cannot move malformed document: {e}"
            ),
        }
    }

    /// Overwrite the backing file with `document`.
    pub fn save(&self, document: &Document) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        write_atomic(&self.path, document)?;
        tracing::debug!(path = %self.path.display(), "document saved");
        Ok(())
    }

    /// Serialize `document` for backup, stamped with the export time.
    pub fn export(&self, document: &Document) -> Result<String> {
        let envelope = ExportEnvelope {
            document,
            exported_at: crate::model::now(),
        };
        Ok(serde_json::to_string_pretty(&envelope)?)
    }

    /// Parse an exported payload. Does not touch the live document.
    pub fn import(&self, blob: &str) -> Result<Document> {
        parse_import(blob)
    }

    /// Replace the backing file with a fresh seeded document.
    pub fn reset(&self) -> Result<Document> {
        self.backup_current()?;
        let document = Document::seeded();
        self.save(&document)?;
        tracing::info!(path = %self.path.display(), "document reset");
        Ok(document)
    }

    fn root(&self) -> PathBuf {
        self.path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    }

    fn backup_dir(&self) -> PathBuf {
        self.root().join(BACKUP_DIR)
    }

    /// Copy the current file into the backup directory, if it exists.
    pub fn backup_current(&self) -> Result<Option<BackupInfo>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let dir = self.backup_dir();
        fs::create_dir_all(&dir)?;
        let stem = self
            .path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("user_data");
        let timestamp = chrono::Local::now().format("%Y%m%d-%H%M%S%3f");
        let name = format!("{stem}-{timestamp}.json");
        fs::copy(&self.path, dir.join(&name))?;
        self.trim_backups()?;
        tracing::info!(backup = %name, "document backed up");
        Ok(Some(BackupInfo {
            name,
            modified: chrono::Utc::now().timestamp(),
        }))
    }

    /// Backups, oldest first.
    pub fn list_backups(&self) -> Result<Vec<BackupInfo>> {
        let dir = self.backup_dir();
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let mut results = Vec::new();
        for entry in sorted_entries(&dir)? {
            if let Some(name) = entry.file_name().to_str() {
                let modified = entry
                    .metadata()
                    .and_then(|m| m.modified())
                    .ok()
                    .and_then(|time| time.duration_since(std::time::UNIX_EPOCH).ok())
                    .map(|dur| dur.as_secs() as i64)
                    .unwrap_or(0);
                results.push(BackupInfo {
                    name: name.to_string(),
                    modified,
                });
            }
        }
        Ok(results)
    }

    /// Make backup `name` the live document and return it.
    pub fn restore_backup(&self, name: &str) -> Result<Document> {
        if name.contains(['/', '\\']) || name.contains("..") {
            return Err(CoreError::not_found(EntityKind::Backup, name));
        }
        let path = self.backup_dir().join(name);
        let content = fs::read_to_string(&path)
            .map_err(|_| CoreError::not_found(EntityKind::Backup, name))?;
        let document = parse_import(&content)?;
        self.backup_current()?;
        self.save(&document)?;
        tracing::info!(backup = %name, "backup restored");
        Ok(document)
    }

    fn trim_backups(&self) -> Result<()> {
        let entries = sorted_entries(&self.backup_dir())?;
        let to_remove = entries.len().saturating_sub(BACKUP_LIMIT);
        for entry in entries.into_iter().take(to_remove) {
            if let Err(e) = fs::remove_file(entry.path()) {
                tracing::warn!(
                    path = %entry.path().display(),
                    "cannot remove old backup: {e}"
                );
            }
        }
        Ok(())
    }
}

fn sorted_entries(dir: &Path) -> Result<Vec<fs::DirEntry>> {
    let mut entries: Vec<_> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().extension().is_some_and(|ext| ext == "json"))
        .collect();
    // Names embed a sortable timestamp.
    entries.sort_by_key(|entry| entry.file_name());
    Ok(entries)
}

fn write_atomic<T: Serialize>(path: &Path, data: &T) -> Result<()> {
    let temp_path = path.with_extension("tmp");
    let json = serde_json::to_vec_pretty(data)?;
    {
        let mut file = File::create(&temp_path)?;
        file.write_all(&json)?;
        file.sync_all()?;
    }
    fs::rename(temp_path, path)?;
    Ok(())
}

fn parse_import(blob: &str) -> Result<Document> {
    let value: serde_json::Value = serde_json::from_str(blob)
        .map_err(|e| CoreError::Format(format!("payload is not valid JSON: {e}")))?;
    let obj = value
        .as_object()
        .ok_or_else(|| CoreError::Format("payload must be a JSON object".to_string()))?;

    let missing: Vec<&str> = REQUIRED_KEYS
        .iter()
        .copied()
        .filter(|key| !obj.contains_key(*key))
        .collect();
    if !missing.is_empty() {
        return Err(CoreError::Format(format!(
            "missing required keys: {}",
            missing.join(", ")
        )));
    }

    serde_json::from_value(value).map_err(|e| CoreError::Format(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Task;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> Store {
        Store::new(dir.path().join("data").join(DATA_FILE))
    }

    #[test]
    fn load_missing_file_returns_seeded_document() {
        let dir = TempDir::new().unwrap();
        let doc = store_in(&dir).load();
        assert_eq!(doc.categories.len(), 4);
        assert!(doc.tasks.is_empty());
    }

    #[test]
    fn load_malformed_file_returns_seeded_document() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), "{ not json").unwrap();
        let doc = store.load();
        assert_eq!(doc.categories.len(), 4);
    }

    fn corrupt_copies(store: &Store) -> Vec<PathBuf> {
        fs::read_dir(store.path().parent().unwrap())
            .unwrap()
            .map(|entry| entry.unwrap().path())
            .filter(|path| path.to_string_lossy().contains(".corrupt-"))
            .collect()
    }

    #[test]
    fn malformed_file_survives_the_next_save() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let original = r#"{"tasks":[{"title":"precious"}], "broken": "#;
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), original).unwrap();

        let mut doc = store.load();
        doc.tasks.push(Task::new("new"));
        store.save(&doc).unwrap();

        let kept = corrupt_copies(&store);
        assert_eq!(kept.len(), 1);
        assert_eq!(fs::read_to_string(&kept[0]).unwrap(), original);
        assert_eq!(store.load().tasks[0].title, "new");
        assert_eq!(corrupt_copies(&store).len(), 1);
    }

    #[test]
    fn save_creates_parent_dir_and_roundtrips() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let mut doc = Document::seeded();
        doc.tasks.push(Task::new("Write tests"));
        doc.points = 15;

        store.save(&doc).unwrap();
        assert!(store.path().exists());
        assert!(!store.path().with_extension("tmp").exists());
        assert_eq!(store.load(), doc);
    }

    #[test]
    fn import_reports_every_missing_key() {
        let dir = TempDir::new().unwrap();
        let err = store_in(&dir)
            .import(r#"{"user_profile": {}, "categories": []}"#)
            .unwrap_err();
        let message = err.to_string();
        assert!(matches!(err, CoreError::Format(_)));
        assert!(message.contains("tasks"));
        assert!(message.contains("calendar_events"));
    }

    #[test]
    fn import_rejects_non_object_payloads() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        assert!(matches!(store.import("[1, 2]"), Err(CoreError::Format(_))));
        assert!(matches!(store.import("nope"), Err(CoreError::Format(_))));
    }

    #[test]
    fn export_then_import_is_identity() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let mut doc = Document::seeded();
        doc.tasks.push(Task::new("Plan trip"));
        let blob = store.export(&doc).unwrap();
        assert!(blob.contains("exported_at"));
        assert_eq!(store.import(&blob).unwrap(), doc);
    }

    #[test]
    fn reset_backs_up_and_reseeds() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let mut doc = Document::seeded();
        doc.tasks.push(Task::new("Old task"));
        store.save(&doc).unwrap();

        let fresh = store.reset().unwrap();
        assert!(fresh.tasks.is_empty());
        assert!(store.load().tasks.is_empty());
        assert_eq!(store.list_backups().unwrap().len(), 1);
    }

    #[test]
    fn backups_are_trimmed_to_limit() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.save(&Document::seeded()).unwrap();
        for _ in 0..(BACKUP_LIMIT + 3) {
            store.backup_current().unwrap();
            std::thread::sleep(std::time::Duration::from_millis(5));
        }
        assert_eq!(store.list_backups().unwrap().len(), BACKUP_LIMIT);
    }

    #[test]
    fn restore_backup_brings_back_old_document() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let mut doc = Document::seeded();
        doc.tasks.push(Task::new("Keep me"));
        store.save(&doc).unwrap();
        let backup = store.backup_current().unwrap().unwrap();

        store.save(&Document::seeded()).unwrap();
        let restored = store.restore_backup(&backup.name).unwrap();
        assert_eq!(restored.tasks.len(), 1);
        assert_eq!(store.load().tasks[0].title, "Keep me");
    }

    #[test]
    fn restore_unknown_backup_is_not_found() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        assert!(matches!(
            store.restore_backup("nope.json"),
            Err(CoreError::NotFound { kind: EntityKind::Backup, .. })
        ));
        assert!(matches!(
            store.restore_backup("../escape.json"),
            Err(CoreError::NotFound { .. })
        ));
    }
}
