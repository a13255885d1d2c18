//! Core store type and its builder.

use crate::codec::{Codec, JsonCodec};
use crate::error::{Error, Result};
use crate::persist::{atomic_write, ensure_parent_dir, load};
use crate::transaction::Transaction;
use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// Persistent key-value store mirrored to one JSON file.
///
/// Keys are strings, values are any `T` serde can round-trip. The whole map
/// lives in memory behind a single reader-writer lock: `get`, `get_all` and
/// friends share it, every mutation holds it exclusively until the file has
/// been rewritten. When a mutating call returns `Ok`, the file on disk
/// matches memory. When it returns `Err`, memory is left as it was before
/// the call, so the two never drift apart.
///
/// Share it across threads with `Arc<JsonKv<T>>`.
pub struct JsonKv<T> {
    data: RwLock<HashMap<String, T>>,
    path: PathBuf,
    codec: JsonCodec,
    sync: bool,
}

impl<T> JsonKv<T>
where
    T: Serialize + DeserializeOwned + Clone,
{
    /// Open (or create) a store at `path` with pretty JSON and fsync on write.
    ///
    /// Missing parent directories are created. A missing or empty file
    /// starts an empty store; a file that doesn't decode is an error.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::builder(path).build()
    }

    /// Start configuring a new store. Call [`.build()`](JsonKvBuilder::build)
    /// when ready.
    pub fn builder(path: impl AsRef<Path>) -> JsonKvBuilder<T> {
        JsonKvBuilder::new(path)
    }

    // ---- reads ----

    /// Get a copy of the value for `key`, or `None` if absent.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<T> {
        self.data.read().get(key).cloned()
    }

    /// `true` if the key exists.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.data.read().contains_key(key)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    /// `true` when the store has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.read().is_empty()
    }

    /// Independent copy of every entry. Changing it doesn't touch the store.
    #[must_use]
    pub fn get_all(&self) -> HashMap<String, T> {
        self.data.read().clone()
    }

    /// Snapshot of all keys.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        self.data.read().keys().cloned().collect()
    }

    /// Path to the backing JSON file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    // ---- writes ----

    /// Insert or overwrite `key`, persist, and return the previous value.
    pub fn set(&self, key: impl Into<String>, value: T) -> Result<Option<T>> {
        let key = key.into();
        let mut data = self.data.write();
        let prev = data.insert(key.clone(), value);
        if let Err(e) = self.persist(&data) {
            match prev {
                Some(old) => data.insert(key, old),
                None => data.remove(&key),
            };
            return Err(e);
        }
        Ok(prev)
    }

    /// Remove `key`, persist, and return its value if it was present.
    /// Removing a missing key is not an error.
    pub fn delete(&self, key: &str) -> Result<Option<T>> {
        let mut data = self.data.write();
        let prev = data.remove(key);
        if let Err(e) = self.persist(&data) {
            if let Some(old) = prev {
                data.insert(key.to_string(), old);
            }
            return Err(e);
        }
        Ok(prev)
    }

    /// Bulk-set from an iterator. Writes the file once, not once per entry,
    /// and applies all entries or none.
    pub fn extend<I, K>(&self, iter: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, T)>,
        K: Into<String>,
    {
        self.transaction(|tx| {
            for (k, v) in iter {
                tx.set(k, v);
            }
            Ok::<_, Error>(())
        })
    }

    /// Mutate the value at `key` in place and persist. Returns `false` if the
    /// key doesn't exist (nothing is written in that case).
    pub fn update<F>(&self, key: &str, f: F) -> Result<bool>
    where
        F: FnOnce(&mut T),
    {
        let mut data = self.data.write();
        // edit a copy, so a panicking `f` leaves the live entry alone
        let mut value = match data.get(key) {
            Some(v) => v.clone(),
            None => return Ok(false),
        };
        f(&mut value);
        let old = data.insert(key.to_string(), value);
        if let Err(e) = self.persist(&data) {
            if let Some(old) = old {
                data.insert(key.to_string(), old);
            }
            return Err(e);
        }
        Ok(true)
    }

    /// Drop all entries and persist the empty map.
    pub fn clear(&self) -> Result<()> {
        let mut data = self.data.write();
        let old = std::mem::take(&mut *data);
        if let Err(e) = self.persist(&data) {
            *data = old;
            return Err(e);
        }
        debug!(path = %self.path.display(), dropped = old.len(), "store cleared");
        Ok(())
    }

    /// Rewrite the file from memory. Mutations already persist on their own;
    /// this is for restoring a file that was removed or damaged externally.
    pub fn flush(&self) -> Result<()> {
        let data = self.data.write();
        self.persist(&data)
    }

    /// Run `f` against a private copy of the map and commit it atomically.
    ///
    /// The write lock is held for the whole call, so `f` sees no concurrent
    /// changes and must not call back into this store (that would deadlock).
    /// If `f` returns `Err` (or panics) the copy is thrown away and the
    /// store is untouched; the error comes back unchanged. On `Ok` the copy
    /// is written to disk once and only then becomes the store's map.
    ///
    /// ```rust,no_run
    /// use json_kv::{Error, JsonKv};
    ///
    /// let db = JsonKv::<i64>::open("accounts.json")?;
    /// db.transaction(|tx| {
    ///     let alice = tx.get("alice").unwrap_or(0);
    ///     let bob = tx.get("bob").unwrap_or(0);
    ///     tx.set("alice", alice - 10);
    ///     tx.set("bob", bob + 10);
    ///     Ok::<_, Error>(())
    /// })?;
    /// # Ok::<_, Error>(())
    /// ```
    pub fn transaction<R, E, F>(&self, f: F) -> std::result::Result<R, E>
    where
        F: FnOnce(&mut Transaction<T>) -> std::result::Result<R, E>,
        E: From<Error>,
    {
        let mut data = self.data.write();
        let mut tx = Transaction::new(data.clone());
        let out = match f(&mut tx) {
            Ok(out) => out,
            Err(e) => {
                debug!(path = %self.path.display(), "transaction rolled back");
                return Err(e);
            }
        };
        let staged = tx.into_inner();
        self.persist(&staged)?;
        *data = staged;
        debug!(path = %self.path.display(), entries = data.len(), "transaction committed");
        Ok(out)
    }

    // ---- internal ----

    fn persist(&self, data: &HashMap<String, T>) -> Result<()> {
        let bytes = self.codec.encode_verified(data)?;
        atomic_write(&self.path, &bytes, self.sync)?;
        trace!(path = %self.path.display(), bytes = bytes.len(), "persisted");
        Ok(())
    }
}

impl<T> std::fmt::Debug for JsonKv<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonKv")
            .field("path", &self.path)
            .field("pretty", &self.codec.is_pretty())
            .field("sync", &self.sync)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Configures and opens a [`JsonKv`] store.
///
/// ```rust,no_run
/// use json_kv::JsonKv;
///
/// let db = JsonKv::<i32>::builder("data/db.json")
///     .pretty(false)
///     .sync(false)
///     .build()
///     .unwrap();
/// ```
pub struct JsonKvBuilder<T> {
    path: PathBuf,
    pretty: bool,
    sync: bool,
    _marker: PhantomData<T>,
}

impl<T> JsonKvBuilder<T>
where
    T: Serialize + DeserializeOwned + Clone,
{
    fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            pretty: true,
            sync: true,
            _marker: PhantomData,
        }
    }

    /// Write human-readable JSON with two-space indentation (default: on).
    pub fn pretty(mut self, yes: bool) -> Self {
        self.pretty = yes;
        self
    }

    /// fsync the file and its directory on every write (default: on).
    /// Turning it off trades crash durability for speed.
    pub fn sync(mut self, yes: bool) -> Self {
        self.sync = yes;
        self
    }

    /// Create the parent directory if needed, load the file, and return the store.
    pub fn build(self) -> Result<JsonKv<T>> {
        if self.path.file_name().is_none() {
            return Err(Error::Config(format!(
                "path does not name a file: {}",
                self.path.display()
            )));
        }

        let codec = if self.pretty {
            JsonCodec::pretty()
        } else {
            JsonCodec::compact()
        };

        ensure_parent_dir(&self.path)?;
        let data = load::<T, _>(&self.path, &codec)?;
        debug!(path = %self.path.display(), entries = data.len(), "store opened");

        Ok(JsonKv {
            data: RwLock::new(data),
            path: self.path,
            codec,
            sync: self.sync,
        })
    }
}

impl<T> std::fmt::Debug for JsonKvBuilder<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonKvBuilder")
            .field("path", &self.path)
            .field("pretty", &self.pretty)
            .field("sync", &self.sync)
            .finish()
    }
}
