use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Completion of one in-flight call. `Err` carries the reason the task died.
type Completion<T> = Shared<BoxFuture<'static, Result<T, String>>>;

struct Call<T> {
    id: u64,
    done: Completion<T>,
}

/// Drops the call's table entry when its task ends, including by panic.
struct Unregister<T> {
    calls: Arc<DashMap<String, Call<T>>>,
    key: String,
    id: u64,
}

impl<T> Drop for Unregister<T> {
    fn drop(&mut self) {
        // A newer call may already sit under this key; only drop our own.
        let id = self.id;
        self.calls.remove_if(&self.key, |_, current| current.id == id);
    }
}

/// Collapses concurrent calls for the same key into a single execution.
///
/// Results are only shared while a call is in flight. Once it resolves, the
/// entry is removed and the next call for that key runs its function again.
pub struct FlightGroup<T> {
    /// Key -> the call currently in flight.
    calls: Arc<DashMap<String, Call<T>>>,
    next_id: AtomicU64,
}

impl<T> FlightGroup<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self {
            calls: Arc::new(DashMap::new()),
            next_id: AtomicU64::new(0),
        }
    }

    /// Runs `f` for `key` unless a call for the same key is already running,
    /// in which case this waits for that call and returns a clone of its result.
    ///
    /// The future returned by `f` is driven by its own tokio task, so dropping
    /// any caller (the one that started it included) never aborts the call.
    /// The task removes the table entry when it finishes.
    ///
    /// # Panics
    /// If the shared call panicked, every caller waiting on it panics too.
    pub async fn run<F, Fut>(&self, key: &str, f: F) -> T
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T> + Send + 'static,
    {
        let done = match self.calls.entry(key.to_string()) {
            Entry::Occupied(entry) => entry.get().done.clone(),
            Entry::Vacant(entry) => {
                let id = self.next_id.fetch_add(1, Ordering::Relaxed);
                let done = self.spawn_call(key, id, f());
                entry.insert(Call {
                    id,
                    done: done.clone(),
                });
                done
            }
        };

        match done.await {
            Ok(value) => value,
            Err(reason) => panic!("in-flight call for {} failed: {}", key, reason),
        }
    }

    fn spawn_call<Fut>(&self, key: &str, id: u64, work: Fut) -> Completion<T>
    where
        Fut: Future<Output = T> + Send + 'static,
    {
        let unregister = Unregister {
            calls: self.calls.clone(),
            key: key.to_string(),
            id,
        };

        let handle = tokio::spawn(async move {
            let _unregister = unregister;
            work.await
        });

        handle
            .map(|joined| joined.map_err(|e| e.to_string()))
            .boxed()
            .shared()
    }

    /// Number of keys with a call currently in flight.
    pub fn in_flight(&self) -> usize {
        self.calls.len()
    }
}

impl<T> Default for FlightGroup<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}
