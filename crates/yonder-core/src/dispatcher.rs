//! Fan-out of one address to every active provider.
//!
//! [`Dispatcher::dispatch`] replaces the current [`ResultSet`], bumps the
//! request [`Generation`] and spawns one Tokio task per active provider.
//! Each task writes its outcome into the shared result set the moment the
//! lookup completes, which also runs the set's `on_update` listeners on that
//! task. A write carrying a superseded generation is rejected by the set and
//! dropped.
//!
//! Callers that prefer to pull can await [`Dispatcher::next_update`], which
//! yields every applied write of the current request in arrival order.
//!
//! ```rust,ignore
//! let mut dispatcher = Dispatcher::new(Arc::new(registry));
//! dispatcher.dispatch_with("1600 Amphitheatre Pkwy", &ProviderId::ALL, |results| {
//!     results.on_update(|update| println!("{} settled", update.slot.provider));
//! });
//! let results = dispatcher.settle().await;
//! ```

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use tokio::sync::mpsc;

use crate::provider::{ErrorMarker, GeocodeOutcome};
use crate::registry::ProviderRegistry;
use crate::result_set::{Generation, RecordError, ResultSet, Slot};
use crate::ProviderId;

/// A write that landed in the result set of `generation`.
#[derive(Debug)]
struct AppliedUpdate {
    generation: Generation,
    slot: Slot,
}

/// Owns the current request's [`ResultSet`] and the tasks writing into it.
pub struct Dispatcher {
    registry: Arc<ProviderRegistry>,
    generation: Generation,
    results: Arc<Mutex<ResultSet>>,
    expected: usize,
    delivered: usize,
    sender: mpsc::UnboundedSender<AppliedUpdate>,
    updates: mpsc::UnboundedReceiver<AppliedUpdate>,
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("registry", &self.registry)
            .field("generation", &self.generation)
            .field("results", &*lock_results(&self.results))
            .field("delivered", &self.delivered)
            .finish()
    }
}

impl Dispatcher {
    pub fn new(registry: Arc<ProviderRegistry>) -> Self {
        let (sender, updates) = mpsc::unbounded_channel();
        Self {
            registry,
            generation: Generation::default(),
            results: Arc::new(Mutex::new(ResultSet::empty())),
            expected: 0,
            delivered: 0,
            sender,
            updates,
        }
    }

    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    pub const fn generation(&self) -> Generation {
        self.generation
    }

    /// Current result set. Lookups keep writing into it once the guard drops.
    pub fn results(&self) -> MutexGuard<'_, ResultSet> {
        lock_results(&self.results)
    }

    /// Start a new request, discarding the previous result set.
    ///
    /// Unknown ids are skipped. With no active provider the new set is empty
    /// and already settled. Must be called from within a Tokio runtime.
    pub fn dispatch(&mut self, address: &str, active: &[ProviderId]) -> Generation {
        self.dispatch_with(address, active, |_| {})
    }

    /// Like [`dispatch`](Self::dispatch), with `prepare` run on the fresh
    /// result set before any lookup starts, so listeners registered there
    /// observe every write.
    pub fn dispatch_with<F>(
        &mut self,
        address: &str,
        active: &[ProviderId],
        prepare: F,
    ) -> Generation
    where
        F: FnOnce(&mut ResultSet),
    {
        self.generation = self.generation.next();
        let generation = self.generation;
        let providers = self.registry.active(active);

        let mut results = ResultSet::new(
            generation,
            address,
            providers.iter().map(|provider| provider.descriptor().clone()),
        );
        prepare(&mut results);
        *lock_results(&self.results) = results;
        self.expected = providers.len();
        self.delivered = 0;

        tracing::debug!(
            %generation,
            providers = providers.len(),
            "dispatching geocode request"
        );

        for provider in providers {
            let results = Arc::clone(&self.results);
            let sender = self.sender.clone();
            let address = address.to_owned();
            let id = provider.id();

            tokio::spawn(async move {
                let started = Instant::now();
                let lookup = tokio::spawn(async move { provider.geocode(&address).await });
                let outcome = lookup.await.unwrap_or_else(|error| {
                    Err(ErrorMarker::parse_failed(format!(
                        "lookup task did not complete: {error}"
                    )))
                });

                if let Err(error) = &outcome {
                    tracing::warn!(
                        provider = %id,
                        code = error.code(),
                        cause = error.cause().unwrap_or_default(),
                        "geocode lookup failed"
                    );
                }

                let latency_ms = elapsed_ms(started);
                if let Some(slot) = apply(&results, generation, id, outcome, latency_ms) {
                    // The receiver is gone only when the dispatcher was dropped.
                    let _ = sender.send(AppliedUpdate { generation, slot });
                }
            });
        }

        generation
    }

    /// Wait for the next write to the current request's result set.
    ///
    /// Returns the settled slot, or `None` once every slot of the current
    /// request has been yielded.
    pub async fn next_update(&mut self) -> Option<Slot> {
        while self.delivered < self.expected {
            let update = self.updates.recv().await?;
            if update.generation != self.generation {
                continue;
            }

            self.delivered += 1;
            return Some(update.slot);
        }

        None
    }

    /// Wait until every slot of the current request has settled.
    pub async fn settle(&mut self) -> MutexGuard<'_, ResultSet> {
        while self.next_update().await.is_some() {}
        self.results()
    }
}

/// Record one outcome; returns a copy of the slot when the write landed.
fn apply(
    results: &Mutex<ResultSet>,
    generation: Generation,
    provider: ProviderId,
    outcome: GeocodeOutcome,
    latency_ms: u64,
) -> Option<Slot> {
    let mut results = lock_results(results);
    match results.record(generation, provider, outcome, latency_ms) {
        Ok(slot) => {
            tracing::debug!(
                %generation,
                %provider,
                status = ?slot.status(),
                latency_ms,
                "applied geocode completion"
            );
            Some(slot.clone())
        }
        Err(RecordError::Stale {
            current,
            completion,
        }) => {
            tracing::debug!(
                %current,
                stale = %completion,
                %provider,
                "discarding stale completion"
            );
            None
        }
        Err(error) => {
            tracing::warn!(%error, "completion rejected");
            None
        }
    }
}

/// A panicking listener must not wedge later writes.
fn lock_results(results: &Mutex<ResultSet>) -> MutexGuard<'_, ResultSet> {
    results.lock().unwrap_or_else(PoisonError::into_inner)
}

fn elapsed_ms(started: Instant) -> u64 {
    started.elapsed().as_millis().min(u128::from(u64::MAX)) as u64
}
