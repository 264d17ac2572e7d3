use std::sync::Arc;

use crossbeam_queue::SegQueue;
use hashbrown::{HashMap, HashSet};
use threadpool::ThreadPool;

use crate::world::chunk::{BoundaryFaces, Chunk};
use crate::world::location::ChunkLocation;
use crate::world::worldgen::NoiseSource;

pub struct ChunkGenResult<const SIZE: usize>(pub ChunkLocation, pub Chunk<SIZE>);

/// A window move that waits for its newly exposed chunks to be generated off-thread.
pub struct PendingShift<const SIZE: usize> {
    pub target: ChunkLocation,
    missing: HashSet<ChunkLocation>,
    received: HashMap<ChunkLocation, Chunk<SIZE>>,
}

impl<const SIZE: usize> PendingShift<SIZE> {
    pub fn is_complete(&self) -> bool {
        self.missing.len() == self.received.len()
    }

    pub fn into_received(self) -> HashMap<ChunkLocation, Chunk<SIZE>> {
        self.received
    }
}

/// Generates chunks on a worker thread pool. Every chunk is generated, visibility-updated and meshed
/// completely before it is pushed onto the result queue.
pub struct ChunkStreamer<const SIZE: usize> {
    worker_thread_pool: ThreadPool,
    generated_chunks_queue: Arc<SegQueue<ChunkGenResult<SIZE>>>,
    /// Locations queued on or running in the pool whose result was not popped yet.
    in_flight: HashSet<ChunkLocation>,
    /// Finished chunks no request asked for, kept until the next request decides whether it needs them.
    unclaimed: HashMap<ChunkLocation, Chunk<SIZE>>,
    pending: Option<PendingShift<SIZE>>,
}

impl<const SIZE: usize> ChunkStreamer<SIZE> {
    pub fn new(num_workers: usize) -> Self {
        Self {
            worker_thread_pool: ThreadPool::new(num_workers.max(1)),
            generated_chunks_queue: Arc::new(SegQueue::new()),
            in_flight: HashSet::new(),
            unclaimed: HashMap::new(),
            pending: None,
        }
    }

    pub fn pending_target(&self) -> Option<ChunkLocation> {
        self.pending
            .as_ref()
            .map(|pending| pending.target)
    }

    /// Replaces the current request. Chunks that are still needed are never generated twice: finished ones are
    /// kept and the ones still being generated are waited for.
    pub fn request<N: NoiseSource + 'static>(
        &mut self,
        target: ChunkLocation,
        missing: Vec<ChunkLocation>,
        noise: &Arc<N>,
        boundary_faces: BoundaryFaces,
    ) {
        self.drain_finished();

        let missing: HashSet<ChunkLocation> = missing.into_iter().collect();
        let mut received = self
            .pending
            .take()
            .map(PendingShift::into_received)
            .unwrap_or_default();
        received.extend(self.unclaimed.drain());

        let num_received = received.len();
        received.retain(|location, _| missing.contains(location));
        if received.len() < num_received {
            log::warn!("discarding {} stale chunks from earlier streaming requests", num_received - received.len());
        }

        for &location in &missing {
            if !received.contains_key(&location) && !self.in_flight.contains(&location) {
                self.enqueue_generation(location, Arc::clone(noise), boundary_faces);
            }
        }

        self.pending = Some(PendingShift {
            target,
            missing,
            received,
        });
    }

    pub fn cancel(&mut self) {
        if let Some(pending) = self.pending.take() {
            log::debug!("cancelled streaming towards {:?}", *pending.target);
            self.unclaimed.extend(pending.into_received());
        }
    }

    /// Moves finished chunks into the pending request and hands it out once it is complete.
    pub fn poll(&mut self) -> Option<PendingShift<SIZE>> {
        self.drain_finished();

        if self
            .pending
            .as_ref()
            .is_some_and(PendingShift::is_complete)
        {
            return self.pending.take();
        }

        None
    }

    /// Blocks until all queued generation jobs are done.
    pub fn wait(&self) {
        self.worker_thread_pool.join();
    }

    fn drain_finished(&mut self) {
        while let Some(ChunkGenResult(location, chunk)) = self.generated_chunks_queue.pop() {
            self.in_flight.remove(&location);

            match &mut self.pending {
                Some(pending) if pending.missing.contains(&location) => {
                    pending.received.insert(location, chunk);
                }
                _ => {
                    self.unclaimed.insert(location, chunk);
                }
            }
        }
    }

    fn enqueue_generation<N: NoiseSource + 'static>(&mut self, location: ChunkLocation, noise: Arc<N>, boundary_faces: BoundaryFaces) {
        self.in_flight.insert(location);
        let generated_chunks_queue = Arc::clone(&self.generated_chunks_queue);

        self.worker_thread_pool.execute(move || {
            let chunk = Chunk::generated(location, &*noise, boundary_faces);
            generated_chunks_queue.push(ChunkGenResult(location, chunk));
        });
    }
}
