//! Durable state slots.

use crate::{Cache, StoreError};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// Envelope version written with every slot.
pub const STATE_VERSION: u32 = 0;

#[derive(Serialize)]
struct EnvelopeRef<'a, T> {
    state: &'a T,
    version: u32,
}

#[derive(Deserialize)]
struct Envelope<T> {
    state: T,
    #[serde(default)]
    version: u32,
}

/// A single named piece of state mirrored to a [`Cache`] key.
///
/// A slot starts out not hydrated, holding `T::default()`. Until
/// [`rehydrate`](Self::rehydrate) has run, [`get`](Self::get) returns `None`
/// so callers cannot act on the placeholder value, and [`update`](Self::update)
/// and [`reset`](Self::reset) fail with [`StoreError::NotHydrated`] rather than
/// overwrite the durable copy. Every mutation writes through to the cache.
#[derive(Debug)]
pub struct Persisted<T> {
    cache: Cache,
    key: String,
    state: T,
    hydrated: bool,
}

impl<T> Persisted<T>
where
    T: Serialize + DeserializeOwned + Default,
{
    /// Create a slot bound to `key`. Nothing is read yet.
    pub fn new(cache: Cache, key: impl Into<String>) -> Self {
        Self {
            cache,
            key: key.into(),
            state: T::default(),
            hydrated: false,
        }
    }

    /// Create a slot and immediately load it.
    pub fn load(cache: Cache, key: impl Into<String>) -> Self {
        let mut slot = Self::new(cache, key);
        slot.rehydrate();
        slot
    }

    /// Load the durable copy.
    ///
    /// A missing key yields the default state. An unreadable or corrupt payload
    /// is logged and replaced by the default. The slot is hydrated afterwards
    /// either way.
    pub fn rehydrate(&mut self) {
        self.state = match self.cache.get::<Envelope<T>>(&self.key) {
            Ok(Some(envelope)) => {
                if envelope.version != STATE_VERSION {
                    tracing::debug!(
                        key = %self.key,
                        stored = envelope.version,
                        current = STATE_VERSION,
                        "persisted state version differs"
                    );
                }
                envelope.state
            }
            Ok(None) => T::default(),
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "discarding unreadable persisted state");
                T::default()
            }
        };
        self.hydrated = true;
    }

    /// Whether [`rehydrate`](Self::rehydrate) has completed.
    pub fn hydrated(&self) -> bool {
        self.hydrated
    }

    /// The state, once hydrated.
    pub fn get(&self) -> Option<&T> {
        self.hydrated.then_some(&self.state)
    }

    /// The in-memory state regardless of hydration.
    pub fn state(&self) -> &T {
        &self.state
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Mutate the state and write it through.
    pub fn update<R>(&mut self, f: impl FnOnce(&mut T) -> R) -> Result<R, StoreError> {
        self.ensure_hydrated()?;
        let out = f(&mut self.state);
        self.persist()?;
        Ok(out)
    }

    /// Replace the state with its default and write it through.
    pub fn reset(&mut self) -> Result<(), StoreError> {
        self.ensure_hydrated()?;
        self.state = T::default();
        self.persist()
    }

    /// Remove the durable copy and reset the in-memory state.
    ///
    /// Allowed before hydration: the slot is known to be empty afterwards.
    pub fn clear(&mut self) -> Result<(), StoreError> {
        self.state = T::default();
        self.hydrated = true;
        self.cache.delete(&self.key)
    }

    fn ensure_hydrated(&self) -> Result<(), StoreError> {
        if self.hydrated {
            Ok(())
        } else {
            Err(StoreError::NotHydrated(self.key.clone()))
        }
    }

    fn persist(&self) -> Result<(), StoreError> {
        self.cache.set(
            &self.key,
            &EnvelopeRef {
                state: &self.state,
                version: STATE_VERSION,
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
    struct Counter {
        hits: u32,
        #[serde(default)]
        label: String,
    }

    #[test]
    fn test_not_hydrated_until_rehydrate() {
        let cache = Cache::in_memory();
        let mut slot: Persisted<Counter> = Persisted::new(cache, "counter");
        assert!(!slot.hydrated());
        assert!(slot.get().is_none());
        assert_eq!(slot.state(), &Counter::default());

        slot.rehydrate();
        assert!(slot.hydrated());
        assert_eq!(slot.get(), Some(&Counter::default()));
    }

    #[test]
    fn test_update_writes_through() {
        let cache = Cache::in_memory();
        let mut slot: Persisted<Counter> = Persisted::load(cache.clone(), "counter");
        let hits = slot
            .update(|c| {
                c.hits += 2;
                c.hits
            })
            .unwrap();
        assert_eq!(hits, 2);

        let reloaded: Persisted<Counter> = Persisted::load(cache.clone(), "counter");
        assert_eq!(reloaded.get().unwrap().hits, 2);

        let raw: serde_json::Value = cache.get("counter").unwrap().unwrap();
        assert_eq!(raw["version"], 0);
        assert_eq!(raw["state"]["hits"], 2);
    }

    #[test]
    fn test_reset_and_clear() {
        let cache = Cache::in_memory();
        let mut slot: Persisted<Counter> = Persisted::load(cache.clone(), "counter");
        slot.update(|c| c.hits = 5).unwrap();

        slot.reset().unwrap();
        assert_eq!(slot.state().hits, 0);
        assert!(cache.exists("counter").unwrap());

        slot.clear().unwrap();
        assert!(!cache.exists("counter").unwrap());
    }

    #[test]
    fn test_mutation_before_rehydrate_keeps_durable_copy() {
        let cache = Cache::in_memory();
        let mut seeded: Persisted<Counter> = Persisted::load(cache.clone(), "counter");
        seeded.update(|c| c.hits = 4).unwrap();

        let mut early: Persisted<Counter> = Persisted::new(cache.clone(), "counter");
        let err = early.update(|c| c.hits += 1).unwrap_err();
        assert!(matches!(err, StoreError::NotHydrated(ref key) if key == "counter"));
        assert!(matches!(early.reset(), Err(StoreError::NotHydrated(_))));

        let reloaded: Persisted<Counter> = Persisted::load(cache.clone(), "counter");
        assert_eq!(reloaded.get().unwrap().hits, 4);

        early.rehydrate();
        assert_eq!(early.update(|c| c.hits + 1).unwrap(), 5);
    }

    #[test]
    fn test_clear_before_rehydrate() {
        let cache = Cache::in_memory();
        cache.set("counter", &serde_json::json!({"state": {"hits": 1}, "version": 0})).unwrap();

        let mut slot: Persisted<Counter> = Persisted::new(cache.clone(), "counter");
        slot.clear().unwrap();
        assert!(slot.hydrated());
        assert_eq!(slot.get(), Some(&Counter::default()));
        assert!(!cache.exists("counter").unwrap());
    }

    #[test]
    fn test_corrupt_payload_falls_back_to_default() {
        let cache = Cache::in_memory();
        cache.set("counter", &serde_json::json!({"state": "nonsense"})).unwrap();

        let slot: Persisted<Counter> = Persisted::load(cache, "counter");
        assert!(slot.hydrated());
        assert_eq!(slot.get(), Some(&Counter::default()));
    }

    #[test]
    fn test_reads_older_version() {
        let cache = Cache::in_memory();
        cache
            .set("counter", &serde_json::json!({"state": {"hits": 3}, "version": 7}))
            .unwrap();
        let slot: Persisted<Counter> = Persisted::load(cache, "counter");
        assert_eq!(slot.get().unwrap().hits, 3);
    }
}
