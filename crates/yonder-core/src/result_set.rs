//! Per-request collection of provider outcomes.
//!
//! A [`ResultSet`] holds one [`Slot`] per active provider. Slots start
//! pending and settle exactly once, independently of each other. Every
//! settlement is pushed to the listeners registered with
//! [`ResultSet::on_update`] as it happens.

use std::fmt::{Debug, Display, Formatter};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::provider::{ErrorMarker, GeocodeOutcome, ProviderDescriptor};
use crate::{NormalizedResult, ProviderId};

/// Request-generation token. Each dispatch gets a strictly larger one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Generation(u64);

impl Generation {
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub const fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl Display for Generation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotStatus {
    Pending,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SlotState {
    Pending,
    Success {
        result: NormalizedResult,
        latency_ms: u64,
    },
    Error {
        error: ErrorMarker,
        latency_ms: u64,
    },
}

/// One provider's place in a [`ResultSet`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slot {
    pub provider: ProviderId,
    pub display_name: String,
    pub color: String,
    #[serde(flatten)]
    pub state: SlotState,
}

impl Slot {
    fn pending(descriptor: ProviderDescriptor) -> Self {
        Self {
            provider: descriptor.id,
            display_name: descriptor.display_name,
            color: descriptor.color,
            state: SlotState::Pending,
        }
    }

    pub const fn status(&self) -> SlotStatus {
        match self.state {
            SlotState::Pending => SlotStatus::Pending,
            SlotState::Success { .. } => SlotStatus::Success,
            SlotState::Error { .. } => SlotStatus::Error,
        }
    }

    pub const fn is_settled(&self) -> bool {
        !matches!(self.state, SlotState::Pending)
    }

    pub fn result(&self) -> Option<&NormalizedResult> {
        match &self.state {
            SlotState::Success { result, .. } => Some(result),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&ErrorMarker> {
        match &self.state {
            SlotState::Error { error, .. } => Some(error),
            _ => None,
        }
    }

    pub fn latency_ms(&self) -> Option<u64> {
        match &self.state {
            SlotState::Pending => None,
            SlotState::Success { latency_ms, .. } | SlotState::Error { latency_ms, .. } => {
                Some(*latency_ms)
            }
        }
    }
}

/// Notification passed to [`ResultSet::on_update`] listeners.
#[derive(Debug, Clone, Copy)]
pub struct SlotUpdate<'a> {
    pub generation: Generation,
    pub slot: &'a Slot,
}

/// Why a completion was not written.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RecordError {
    #[error("completion from generation {completion} is stale (current {current})")]
    Stale {
        current: Generation,
        completion: Generation,
    },
    #[error("provider '{0}' has no slot in this result set")]
    UnknownProvider(ProviderId),
    #[error("provider '{0}' already settled")]
    AlreadySettled(ProviderId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ResultSummary {
    pub total: usize,
    pub pending: usize,
    pub succeeded: usize,
    pub failed: usize,
}

type Listener = Box<dyn FnMut(&SlotUpdate<'_>) + Send>;

/// Slots for one geocode request, keyed by provider id.
#[derive(Serialize)]
pub struct ResultSet {
    generation: Generation,
    address: String,
    slots: Vec<Slot>,
    #[serde(skip)]
    listeners: Vec<Listener>,
}

impl Debug for ResultSet {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResultSet")
            .field("generation", &self.generation)
            .field("address", &self.address)
            .field("slots", &self.slots)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl ResultSet {
    /// Fresh set with one pending slot per descriptor, in the given order.
    pub fn new(
        generation: Generation,
        address: impl Into<String>,
        descriptors: impl IntoIterator<Item = ProviderDescriptor>,
    ) -> Self {
        Self {
            generation,
            address: address.into(),
            slots: descriptors.into_iter().map(Slot::pending).collect(),
            listeners: Vec::new(),
        }
    }

    pub fn empty() -> Self {
        Self::new(Generation::default(), "", Vec::new())
    }

    pub const fn generation(&self) -> Generation {
        self.generation
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn get(&self, provider: ProviderId) -> Option<&Slot> {
        self.slots.iter().find(|slot| slot.provider == provider)
    }

    pub fn status(&self, provider: ProviderId) -> Option<SlotStatus> {
        self.get(provider).map(Slot::status)
    }

    /// True once no slot is pending. An empty set is settled.
    pub fn all_settled(&self) -> bool {
        self.slots.iter().all(Slot::is_settled)
    }

    pub fn summary(&self) -> ResultSummary {
        self.slots
            .iter()
            .fold(ResultSummary::default(), |mut summary, slot| {
                summary.total += 1;
                match slot.status() {
                    SlotStatus::Pending => summary.pending += 1,
                    SlotStatus::Success => summary.succeeded += 1,
                    SlotStatus::Error => summary.failed += 1,
                }
                summary
            })
    }

    /// Register a listener called after every settled write.
    pub fn on_update<F>(&mut self, listener: F)
    where
        F: FnMut(&SlotUpdate<'_>) + Send + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    /// Settle `provider`'s slot with `outcome`.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError`] without touching any slot when the completion
    /// belongs to another generation, names a provider outside this set, or
    /// targets a slot that already settled.
    pub fn record(
        &mut self,
        generation: Generation,
        provider: ProviderId,
        outcome: GeocodeOutcome,
        latency_ms: u64,
    ) -> Result<&Slot, RecordError> {
        if generation != self.generation {
            return Err(RecordError::Stale {
                current: self.generation,
                completion: generation,
            });
        }

        let index = self
            .slots
            .iter()
            .position(|slot| slot.provider == provider)
            .ok_or(RecordError::UnknownProvider(provider))?;
        if self.slots[index].is_settled() {
            return Err(RecordError::AlreadySettled(provider));
        }

        self.slots[index].state = match outcome {
            Ok(result) => SlotState::Success { result, latency_ms },
            Err(error) => SlotState::Error { error, latency_ms },
        };

        let slot = &self.slots[index];
        let update = SlotUpdate {
            generation: self.generation,
            slot,
        };
        for listener in &mut self.listeners {
            listener(&update);
        }

        Ok(slot)
    }
}

impl Default for ResultSet {
    fn default() -> Self {
        Self::empty()
    }
}
