use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::ffi::OsString;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::error::{Result, StoreError};

/// A single todo record. `id` is the primary key and is chosen by the
/// caller, not generated here.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub id: i64,
    pub title: String,
    pub done: bool,
}

/// File-backed todo store.
///
/// The backing file holds a single JSON array of items and is the source
/// of truth: every operation reloads it, mutates the in-memory map, and
/// (for writes) rewrites the whole file. The map is only a cache of the
/// last successful load.
///
/// Operations are serialized in-process by a mutex held across the full
/// load-mutate-save sequence. Two processes pointed at the same file are
/// still a last-writer-wins race; coordinate externally if you need that.
#[derive(Debug)]
pub struct Store {
    path: PathBuf,
    items: Mutex<HashMap<i64, Item>>,
}

impl Store {
    /// Bind a store to `path`, seeding the file with an empty array `[]`
    /// if it doesn't exist yet. Existing file contents are not validated
    /// here; a corrupt file surfaces as a parse error on first use.
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if !path.exists() {
            fs::write(&path, "[]")?;
        }
        Ok(Self {
            path,
            items: Mutex::new(HashMap::new()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Add `item` to the store. Fails with [`StoreError::Duplicate`] if
    /// an item with the same id already exists.
    pub fn add_item(&self, item: Item) -> Result<()> {
        let mut items = self.lock();
        self.load_all(&mut items)?;
        if items.contains_key(&item.id) {
            return Err(StoreError::Duplicate(item.id));
        }
        items.insert(item.id, item);
        self.save_all(&items)
    }

    /// Look up an item by id. Never writes the file.
    pub fn get_item(&self, id: i64) -> Result<Item> {
        let mut items = self.lock();
        self.load_all(&mut items)?;
        items.get(&id).cloned().ok_or(StoreError::NotFound(id))
    }

    /// All items in the store, in no particular order. An empty store
    /// yields an empty vec, not an error.
    pub fn get_all_items(&self) -> Result<Vec<Item>> {
        let mut items = self.lock();
        self.load_all(&mut items)?;
        Ok(items.values().cloned().collect())
    }

    /// Replace the stored item with the same id wholesale. Fails with
    /// [`StoreError::NotFound`] if the id isn't present.
    pub fn update_item(&self, item: Item) -> Result<()> {
        let mut items = self.lock();
        self.load_all(&mut items)?;
        if !items.contains_key(&item.id) {
            return Err(StoreError::NotFound(item.id));
        }
        items.insert(item.id, item);
        self.save_all(&items)
    }

    /// Remove the item with `id`. Fails with [`StoreError::NotFound`] if
    /// the id isn't present, leaving the store unchanged.
    pub fn delete_item(&self, id: i64) -> Result<()> {
        let mut items = self.lock();
        self.load_all(&mut items)?;
        if items.remove(&id).is_none() {
            return Err(StoreError::NotFound(id));
        }
        self.save_all(&items)
    }

    /// Flip the done flag on an existing item. Built strictly on
    /// `get_item` + `update_item` so a status change goes through the
    /// same validation and persistence path as any other update, and a
    /// missing id fails exactly like `get_item` would.
    pub fn set_done(&self, id: i64, value: bool) -> Result<()> {
        let item = self.get_item(id)?;
        self.update_item(Item { done: value, ..item })
    }

    /// Overwrite the database file with the contents of its `.bak`
    /// sibling, byte for byte. The copy isn't validated as JSON and no
    /// atomic swap is attempted; a failure mid-copy can leave a partial
    /// file behind. The in-memory map is untouched, the next operation
    /// reloads from the restored file.
    pub fn restore(&self) -> Result<()> {
        let mut db_file = File::create(&self.path)?;
        let mut backup_file = File::open(self.backup_path())?;
        io::copy(&mut backup_file, &mut db_file)?;
        Ok(())
    }

    /// Backup path is the database path with `.bak` appended.
    pub fn backup_path(&self) -> PathBuf {
        let mut os = OsString::from(self.path.as_os_str());
        os.push(".bak");
        PathBuf::from(os)
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<i64, Item>> {
        self.items.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Reload the map from disk. The map is cleared only after a
    /// successful parse, so it always mirrors the last good load; with a
    /// malformed file the error propagates and memory stays as it was.
    /// Duplicate ids in the file resolve to the last entry.
    fn load_all(&self, items: &mut HashMap<i64, Item>) -> Result<()> {
        let data = fs::read_to_string(&self.path)?;
        let list: Vec<Item> = serde_json::from_str(&data)?;
        items.clear();
        for item in list {
            items.insert(item.id, item);
        }
        Ok(())
    }

    /// Whole-file overwrite with the full item set as a pretty JSON
    /// array. No rollback: a write failure leaves the file in an unknown
    /// state and the caller should reload before retrying.
    fn save_all(&self, items: &HashMap<i64, Item>) -> Result<()> {
        let list: Vec<&Item> = items.values().collect();
        let data = serde_json::to_string_pretty(&list)?;
        fs::write(&self.path, data)?;
        Ok(())
    }
}

/// Parse a JSON string into an [`Item`]. Pure, no file I/O; this is how
/// the CLI turns its `add`/`update` argument into an item.
pub fn parse_item(json: &str) -> Result<Item> {
    let item = serde_json::from_str(json)?;
    Ok(item)
}

/// Render an [`Item`] as pretty-printed JSON.
pub fn format_item(item: &Item) -> Result<String> {
    let json = serde_json::to_string_pretty(item)?;
    Ok(json)
}
