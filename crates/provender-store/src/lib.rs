//! Provender Store - Injected storage abstraction
//!
//! Quote, cart, mandate, and payment maps are mutated through this trait
//! so a production deployment can back them with a real datastore without
//! touching business logic. Business logic may only assume lookup-by-ID
//! and atomic update: every state transition goes through `get` +
//! `compare_and_swap` (see [`modify`]).

use async_trait::async_trait;
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Keyed entity storage
///
/// Implementations must make `compare_and_swap` atomic with respect to
/// concurrent writers of the same key.
#[async_trait]
pub trait Store<K, V>: Send + Sync
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    V: Clone + PartialEq + Send + Sync + 'static,
{
    /// Fetch a value by key
    async fn get(&self, key: &K) -> Option<V>;

    /// Insert or replace a value, returning the previous one
    async fn put(&self, key: K, value: V) -> Option<V>;

    /// Replace the value only if it still equals `expected`
    async fn compare_and_swap(&self, key: &K, expected: &V, new: V) -> bool;

    /// Remove a value by key
    async fn remove(&self, key: &K) -> Option<V>;

    /// Snapshot of all stored values
    async fn values(&self) -> Vec<V>;
}

/// Read-modify-write with a compare-and-swap retry loop
///
/// `f` inspects the current value and either fails (the error is returned
/// untouched) or produces the replacement value plus an output. Returns
/// `None` when the key is absent.
pub async fn modify<K, V, T, E, F>(
    store: &dyn Store<K, V>,
    key: &K,
    mut f: F,
) -> Option<Result<T, E>>
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    V: Clone + PartialEq + Send + Sync + 'static,
    F: FnMut(&V) -> Result<(V, T), E> + Send,
{
    loop {
        let current = store.get(key).await?;
        match f(&current) {
            Err(e) => return Some(Err(e)),
            Ok((next, out)) => {
                if store.compare_and_swap(key, &current, next).await {
                    return Some(Ok(out));
                }
                // lost the race; re-read and retry
            }
        }
    }
}

/// In-memory store over a `RwLock`'d map; the process-local default
#[derive(Debug)]
pub struct MemoryStore<K, V> {
    entries: Arc<RwLock<HashMap<K, V>>>,
}

impl<K, V> MemoryStore<K, V> {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl<K, V> Default for MemoryStore<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> Clone for MemoryStore<K, V> {
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
        }
    }
}

#[async_trait]
impl<K, V> Store<K, V> for MemoryStore<K, V>
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    V: Clone + PartialEq + Send + Sync + 'static,
{
    async fn get(&self, key: &K) -> Option<V> {
        self.entries.read().await.get(key).cloned()
    }

    async fn put(&self, key: K, value: V) -> Option<V> {
        self.entries.write().await.insert(key, value)
    }

    async fn compare_and_swap(&self, key: &K, expected: &V, new: V) -> bool {
        let mut entries = self.entries.write().await;
        match entries.get(key) {
            Some(current) if current == expected => {
                entries.insert(key.clone(), new);
                true
            }
            _ => false,
        }
    }

    async fn remove(&self, key: &K) -> Option<V> {
        self.entries.write().await.remove(key)
    }

    async fn values(&self) -> Vec<V> {
        self.entries.read().await.values().cloned().collect()
    }
}
