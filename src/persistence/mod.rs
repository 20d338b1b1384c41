use std::{
    collections::BTreeMap,
    fs,
    path::PathBuf,
    sync::{
        atomic::{
            AtomicBool,
            Ordering,
        },
        Mutex,
    },
};

use serde::{
    Deserialize,
    Serialize,
};

use crate::core::FloraError;

const APP_NAME: &str = "florafind";

pub fn get_app_data_dir() -> PathBuf {
    if let Some(data_dir) = dirs::data_local_dir() {
        let app_dir = data_dir.join(APP_NAME);
        let _ = fs::create_dir_all(&app_dir);
        app_dir
    } else {
        PathBuf::from(".")
    }
}

pub fn get_data_file_path(filename: &str) -> PathBuf {
    get_app_data_dir().join(filename)
}

pub fn save_json<T: Serialize>(data: &T, filename: &str) -> Result<(), FloraError> {
    let file_path = get_data_file_path(filename);
    let json = serde_json::to_string_pretty(data)?;
    fs::write(&file_path, json)?;
    tracing::debug!(path = %file_path.display(), "data saved");
    Ok(())
}

pub fn load_json<T: for<'de> Deserialize<'de> + Default>(filename: &str) -> Result<T, FloraError> {
    let file_path = get_data_file_path(filename);

    if !file_path.exists() {
        return Ok(T::default());
    }

    let json = fs::read_to_string(&file_path)?;
    let data: T = serde_json::from_str(&json)?;
    tracing::debug!(path = %file_path.display(), "data loaded");
    Ok(data)
}

pub fn load_json_or_default<T: for<'de> Deserialize<'de> + Default>(filename: &str) -> T {
    match load_json::<T>(filename) {
        Ok(data) => data,
        Err(e) => {
            tracing::warn!("Failed to load {}: {}. Using defaults.", filename, e);
            T::default()
        }
    }
}

/// String key/value storage with the shape of browser local storage.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: String) -> Result<(), FloraError>;
    fn remove(&self, key: &str);
    fn keys(&self) -> Vec<String>;

    /// Persists buffered writes. Stores without a backing file have nothing to do.
    fn flush(&self) -> Result<(), FloraError> {
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
    capacity: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rejects writes once the summed key+value length would exceed `bytes`,
    /// the way local storage rejects writes past its quota.
    pub fn with_capacity(bytes: usize) -> Self {
        Self { entries: Mutex::new(BTreeMap::new()), capacity: Some(bytes) }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: String) -> Result<(), FloraError> {
        let mut entries =
            self.entries.lock().map_err(|_| FloraError::Storage("store lock poisoned".to_string()))?;

        if let Some(capacity) = self.capacity {
            let used: usize = entries
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum();
            if used + key.len() + value.len() > capacity {
                return Err(FloraError::Storage("quota exceeded".to_string()));
            }
        }

        entries.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&self, key: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.remove(key);
        }
    }

    fn keys(&self) -> Vec<String> {
        self.entries.lock().map(|e| e.keys().cloned().collect()).unwrap_or_default()
    }
}

/// A single JSON object on disk. Writes stay in memory until [`KeyValueStore::flush`]
/// or drop, so concurrent lookups never wait on the file.
pub struct JsonFileStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
    dirty: AtomicBool,
}

impl JsonFileStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(json) => serde_json::from_str(&json).unwrap_or_else(|e| {
                tracing::warn!(path = %path.display(), "Discarding unreadable store: {}", e);
                BTreeMap::new()
            }),
            Err(_) => BTreeMap::new(),
        };

        Self { path, entries: Mutex::new(entries), dirty: AtomicBool::new(false) }
    }

    pub fn in_app_dir(filename: &str) -> Self {
        Self::open(get_data_file_path(filename))
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::Acquire)
    }

    fn write_file(&self, json: String) -> Result<(), FloraError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, json)?;
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: String) -> Result<(), FloraError> {
        let mut entries =
            self.entries.lock().map_err(|_| FloraError::Storage("store lock poisoned".to_string()))?;
        entries.insert(key.to_string(), value);
        self.dirty.store(true, Ordering::Release);
        Ok(())
    }

    fn remove(&self, key: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            if entries.remove(key).is_some() {
                self.dirty.store(true, Ordering::Release);
            }
        }
    }

    fn keys(&self) -> Vec<String> {
        self.entries.lock().map(|e| e.keys().cloned().collect()).unwrap_or_default()
    }

    fn flush(&self) -> Result<(), FloraError> {
        if !self.dirty.swap(false, Ordering::AcqRel) {
            return Ok(());
        }

        // Serialise under the lock, write outside it.
        let json = {
            let entries =
                self.entries.lock().map_err(|_| FloraError::Storage("store lock poisoned".to_string()))?;
            serde_json::to_string(&*entries)?
        };

        self.write_file(json).inspect_err(|_| self.dirty.store(true, Ordering::Release))
    }
}

impl Drop for JsonFileStore {
    fn drop(&mut self) {
        if let Err(e) = self.flush() {
            tracing::warn!(path = %self.path.display(), "Failed to persist store: {}", e);
        }
    }
}
