//! Paced titan spawning under a population cap.
//!
//! A batch spawns at most one titan per scheduler tick. Before each spawn the
//! live population is compared to the cap; a batch that finds the cap reached
//! is finished and its remaining count dropped. Spawn points are captured when
//! the batch starts and chosen uniformly with replacement.

use std::fmt;

use rand::{Rng, RngCore};

use guardian_core::session::{EntityRegistry, SpawnPoint};
use guardian_core::titan::{TitanConfiguration, TitanType};

/// Caller-supplied titan configuration generator for a batch.
pub type CustomSource = Box<dyn FnMut(&mut dyn RngCore) -> TitanConfiguration + Send>;

/// What each spawn of a batch is configured from.
pub enum TitanSource {
    /// The gamemode's regular titan configuration.
    Random,
    /// A random configuration forced to one archetype.
    Fixed(TitanType),
    /// The player-titan configuration (attack set applied).
    Player,
    Custom(CustomSource),
}

impl fmt::Debug for TitanSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Random => f.write_str("Random"),
            Self::Fixed(t) => f.debug_tuple("Fixed").field(t).finish(),
            Self::Player => f.write_str("Player"),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Identifies one in-flight batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SpawnHandle(u64);

#[derive(Debug)]
struct SpawnBatch {
    handle: SpawnHandle,
    remaining: u32,
    points: Vec<SpawnPoint>,
    source: TitanSource,
}

enum BatchStep {
    Spawned,
    CapReached,
    NoSpawnPoints,
}

impl SpawnBatch {
    fn advance(
        &mut self,
        registry: &mut dyn EntityRegistry,
        rng: &mut dyn RngCore,
        titan_limit: u32,
        generate: &mut dyn FnMut(&mut TitanSource, &mut dyn RngCore) -> TitanConfiguration,
    ) -> BatchStep {
        if registry.count_live_titans() >= titan_limit as usize {
            return BatchStep::CapReached;
        }
        if self.points.is_empty() {
            return BatchStep::NoSpawnPoints;
        }
        let point = self.points[rng.random_range(0..self.points.len())];
        let config = generate(&mut self.source, rng);
        tracing::trace!(
            batch = self.handle.0,
            titan_type = ?config.titan_type,
            health = config.health,
            "Spawning titan"
        );
        registry.spawn_titan(&point, config);
        self.remaining -= 1;
        BatchStep::Spawned
    }
}

/// Owns every pending spawn batch of a session.
#[derive(Debug, Default)]
pub struct SpawnScheduler {
    batches: Vec<SpawnBatch>,
    next_id: u64,
}

impl SpawnScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a batch of `amount` spawns over `points`.
    ///
    /// The first spawn happens on the next [`tick`](Self::tick).
    pub fn start(&mut self, amount: u32, points: Vec<SpawnPoint>, source: TitanSource) -> SpawnHandle {
        self.next_id += 1;
        let handle = SpawnHandle(self.next_id);
        if points.is_empty() {
            tracing::warn!(batch = handle.0, amount, "No titan spawn points, batch dropped");
            return handle;
        }
        if amount == 0 {
            return handle;
        }
        tracing::debug!(batch = handle.0, amount, ?source, points = points.len(), "Spawn batch started");
        self.batches.push(SpawnBatch {
            handle,
            remaining: amount,
            points,
            source,
        });
        handle
    }

    /// Stop one batch. Returns false if it already finished.
    pub fn cancel(&mut self, handle: SpawnHandle) -> bool {
        let before = self.batches.len();
        self.batches.retain(|b| b.handle != handle);
        self.batches.len() != before
    }

    /// Stop every batch. Returns how many were pending.
    pub fn cancel_all(&mut self) -> usize {
        let count = self.batches.len();
        if count > 0 {
            tracing::debug!(count, "Cancelled pending spawn batches");
        }
        self.batches.clear();
        count
    }

    pub fn is_pending(&self, handle: SpawnHandle) -> bool {
        self.batches.iter().any(|b| b.handle == handle)
    }

    /// True when no batch is in flight.
    pub fn is_idle(&self) -> bool {
        self.batches.is_empty()
    }

    /// Spawns still owed across all batches.
    pub fn pending_spawns(&self) -> u32 {
        self.batches.iter().map(|b| b.remaining).sum()
    }

    /// Advance every batch by one spawn. Returns how many titans were created.
    pub fn tick(
        &mut self,
        registry: &mut dyn EntityRegistry,
        rng: &mut dyn RngCore,
        titan_limit: u32,
        generate: &mut dyn FnMut(&mut TitanSource, &mut dyn RngCore) -> TitanConfiguration,
    ) -> u32 {
        let mut spawned = 0;
        let mut i = 0;
        while i < self.batches.len() {
            let batch = &mut self.batches[i];
            match batch.advance(registry, rng, titan_limit, generate) {
                BatchStep::Spawned => {
                    spawned += 1;
                    if batch.remaining == 0 {
                        self.batches.remove(i);
                    } else {
                        i += 1;
                    }
                },
                BatchStep::CapReached => {
                    tracing::debug!(
                        batch = batch.handle.0,
                        dropped = batch.remaining,
                        titan_limit,
                        "Titan limit reached, batch finished"
                    );
                    self.batches.remove(i);
                },
                BatchStep::NoSpawnPoints => {
                    tracing::warn!(batch = batch.handle.0, "Spawn batch has no points");
                    self.batches.remove(i);
                },
            }
        }
        spawned
    }
}
