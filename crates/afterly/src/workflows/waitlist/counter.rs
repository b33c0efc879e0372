use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fmt::Debug;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tracing::warn;

/// Fixed name the waitlist position is stored under.
pub const COUNTER_KEY: &str = "afterly-waitlist-count";

#[derive(Debug, thiserror::Error)]
pub enum CounterError {
    #[error("counter store {path} unreadable: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("counter store {path} is not a valid document: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("counter store unavailable: {0}")]
    Unavailable(String),
    #[error("waitlist counter exhausted at {current}")]
    Exhausted { current: u64 },
}

/// String key/value storage, the server-side stand-in for browser local storage.
pub trait CounterStore: Send + Sync + Debug {
    fn load(&self, key: &str) -> Result<Option<String>, CounterError>;
    fn store(&self, key: &str, value: &str) -> Result<(), CounterError>;
}

#[derive(Debug, Default)]
pub struct MemoryCounterStore {
    values: Mutex<BTreeMap<String, String>>,
}

impl CounterStore for MemoryCounterStore {
    fn load(&self, key: &str) -> Result<Option<String>, CounterError> {
        let guard = self
            .values
            .lock()
            .map_err(|_| CounterError::Unavailable("memory store lock poisoned".to_string()))?;
        Ok(guard.get(key).cloned())
    }

    fn store(&self, key: &str, value: &str) -> Result<(), CounterError> {
        let mut guard = self
            .values
            .lock()
            .map_err(|_| CounterError::Unavailable("memory store lock poisoned".to_string()))?;
        guard.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// JSON object on disk, rewritten whole on every store.
#[derive(Debug, Clone)]
pub struct FileCounterStore {
    path: PathBuf,
}

impl FileCounterStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_document(&self) -> Result<BTreeMap<String, String>, CounterError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(source) => {
                return Err(CounterError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        if raw.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        serde_json::from_str(&raw).map_err(|source| CounterError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    /// Sibling path the next document is written to before the rename.
    fn staging_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(OsString::from)
            .unwrap_or_default();
        name.push(".staging");
        self.path.with_file_name(name)
    }

    fn io_error(&self, source: std::io::Error) -> CounterError {
        CounterError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl CounterStore for FileCounterStore {
    fn load(&self, key: &str) -> Result<Option<String>, CounterError> {
        Ok(self.read_document()?.remove(key))
    }

    fn store(&self, key: &str, value: &str) -> Result<(), CounterError> {
        let mut document = self.read_document()?;
        document.insert(key.to_string(), value.to_string());

        let serialized = serde_json::to_string_pretty(&document).map_err(|source| {
            CounterError::Corrupt {
                path: self.path.clone(),
                source,
            }
        })?;

        if let Some(parent) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|err| self.io_error(err))?;
        }

        let staging = self.staging_path();
        std::fs::write(&staging, serialized).map_err(|err| self.io_error(err))?;
        std::fs::rename(&staging, &self.path).map_err(|err| self.io_error(err))
    }
}

/// Sequential waitlist positions backed by a [`CounterStore`].
///
/// Read, increment and write happen under one lock, so positions handed out by
/// a single process are strictly increasing.
#[derive(Debug)]
pub struct WaitlistCounter {
    store: Arc<dyn CounterStore>,
    key: String,
    sequence: Mutex<()>,
}

impl WaitlistCounter {
    pub fn new(store: Arc<dyn CounterStore>) -> Self {
        Self::with_key(store, COUNTER_KEY)
    }

    pub fn with_key(store: Arc<dyn CounterStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
            sequence: Mutex::new(()),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryCounterStore::default()))
    }

    /// Current value without incrementing; absent counts as 0.
    pub fn current_position(&self) -> Result<u64, CounterError> {
        let raw = self.store.load(&self.key)?;
        Ok(self.parse(raw))
    }

    /// Increment and persist, returning the new position.
    pub fn next_position(&self) -> Result<u64, CounterError> {
        let _sequence = self
            .sequence
            .lock()
            .map_err(|_| CounterError::Unavailable("counter lock poisoned".to_string()))?;

        let current = self.current_position()?;
        let next = current
            .checked_add(1)
            .ok_or(CounterError::Exhausted { current })?;
        self.store.store(&self.key, &next.to_string())?;
        Ok(next)
    }

    fn parse(&self, raw: Option<String>) -> u64 {
        match raw {
            None => 0,
            Some(value) => value.trim().parse::<u64>().unwrap_or_else(|_| {
                warn!(key = %self.key, %value, "ignoring unparsable waitlist counter");
                0
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_path(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "afterly-counter-{}-{}",
            name,
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&dir);
        dir.join("counter.json")
    }

    #[test]
    fn sequential_positions_start_at_one() {
        let counter = WaitlistCounter::in_memory();
        assert_eq!(counter.current_position().expect("read"), 0);
        assert_eq!(counter.next_position().expect("first"), 1);
        assert_eq!(counter.next_position().expect("second"), 2);
        assert_eq!(counter.next_position().expect("third"), 3);
        assert_eq!(counter.current_position().expect("read"), 3);
    }

    #[test]
    fn unparsable_value_restarts_from_zero() {
        let store = Arc::new(MemoryCounterStore::default());
        store.store(COUNTER_KEY, "NaN").expect("seed");
        let counter = WaitlistCounter::new(store.clone());
        assert_eq!(counter.next_position().expect("next"), 1);
        assert_eq!(store.load(COUNTER_KEY).expect("load").as_deref(), Some("1"));
    }

    #[test]
    fn file_store_persists_across_instances() {
        let path = scratch_path("persist");

        let first = WaitlistCounter::new(Arc::new(FileCounterStore::new(&path)));
        assert_eq!(first.next_position().expect("first"), 1);
        assert_eq!(first.next_position().expect("second"), 2);

        let reopened = WaitlistCounter::new(Arc::new(FileCounterStore::new(&path)));
        assert_eq!(reopened.next_position().expect("third"), 3);

        let raw = std::fs::read_to_string(&path).expect("counter file written");
        assert!(raw.contains(COUNTER_KEY));
        let _ = std::fs::remove_dir_all(path.parent().expect("parent dir"));
    }

    #[test]
    fn exhausted_counter_refuses_to_repeat_a_position() {
        let store = Arc::new(MemoryCounterStore::default());
        store
            .store(COUNTER_KEY, &u64::MAX.to_string())
            .expect("seed");
        let counter = WaitlistCounter::new(store.clone());

        assert!(matches!(
            counter.next_position(),
            Err(CounterError::Exhausted { current: u64::MAX })
        ));
        assert_eq!(counter.current_position().expect("read"), u64::MAX);
    }

    #[test]
    fn staging_file_never_aliases_the_document() {
        let path = scratch_path("staging").with_file_name("counter.tmp");
        let store = FileCounterStore::new(&path);
        assert_ne!(store.staging_path(), path);
        assert_ne!(
            FileCounterStore::new("waitlist.json").staging_path(),
            FileCounterStore::new("waitlist.txt").staging_path()
        );

        let counter = WaitlistCounter::new(Arc::new(store));
        assert_eq!(counter.next_position().expect("first"), 1);
        assert_eq!(counter.next_position().expect("second"), 2);

        let reopened = WaitlistCounter::new(Arc::new(FileCounterStore::new(&path)));
        assert_eq!(reopened.current_position().expect("read"), 2);
        assert!(!path.with_file_name("counter.tmp.staging").exists());
        let _ = std::fs::remove_dir_all(path.parent().expect("parent dir"));
    }

    #[test]
    fn corrupt_file_is_reported() {
        let path = scratch_path("corrupt");
        std::fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
        std::fs::write(&path, "not json").expect("seed");

        let counter = WaitlistCounter::new(Arc::new(FileCounterStore::new(&path)));
        assert!(matches!(
            counter.next_position(),
            Err(CounterError::Corrupt { .. })
        ));
        let _ = std::fs::remove_dir_all(path.parent().expect("parent dir"));
    }

    #[test]
    fn concurrent_callers_never_share_a_position() {
        let counter = Arc::new(WaitlistCounter::in_memory());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let counter = counter.clone();
                std::thread::spawn(move || {
                    (0..25)
                        .map(|_| counter.next_position().expect("next"))
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let mut positions: Vec<u64> = handles
            .into_iter()
            .flat_map(|handle| handle.join().expect("thread"))
            .collect();
        positions.sort_unstable();
        positions.dedup();
        assert_eq!(positions.len(), 200);
        assert_eq!(positions.last(), Some(&200));
    }
}
