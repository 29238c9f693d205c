//! Tile request lifecycle: one visual slot, at most one load chain
//!
//! A [`TileSlot`] owns the [`TileRequestState`] of the tile shown in one grid
//! cell. `start` spawns a chain that drives a [`RetryScheduler`]; `cancel`
//! aborts it. Every chain carries the slot generation it was started under and
//! only touches the slot while that generation is current, so a load or timer
//! that completes after `cancel` (or after a newer `start`) has no effect.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures::future::{self, Either};

use super::fetcher::TileFetcher;
use super::scheduler::{RetryPolicy, RetryScheduler, Step, TilePhase, TileRequestState};
use super::source::TileSource;
use super::types::{TileData, TileImage, TileLoadFailure};
use crate::core::geo::TileAddress;
use crate::runtime::{self, AsyncHandle};

/// Rendering target supplied by the map host.
///
/// `display` is called at most once per `start`, with the address the slot
/// requested and the image to show for it. It runs while the slot is locked,
/// so it must not call back into the same slot.
pub trait TileTarget: Send + Sync {
    fn display(&self, requested: TileAddress, image: TileImage);
}

#[derive(Debug, Default)]
struct SlotShared {
    generation: u64,
    state: Option<TileRequestState>,
}

pub struct TileSlot {
    source: Arc<dyn TileSource>,
    fetcher: Arc<dyn TileFetcher>,
    target: Arc<dyn TileTarget>,
    policy: RetryPolicy,
    shared: Arc<Mutex<SlotShared>>,
    chain: Option<Box<dyn AsyncHandle>>,
}

impl TileSlot {
    pub fn new(
        source: Arc<dyn TileSource>,
        fetcher: Arc<dyn TileFetcher>,
        target: Arc<dyn TileTarget>,
        policy: RetryPolicy,
    ) -> Self {
        Self {
            source,
            fetcher,
            target,
            policy,
            shared: Arc::new(Mutex::new(SlotShared::default())),
            chain: None,
        }
    }

    /// Begin loading `address`, cancelling whatever this slot was doing
    pub fn start(&mut self, address: TileAddress) {
        self.cancel();

        let mut scheduler = RetryScheduler::new(address, self.source.clone(), self.policy);
        let first = scheduler.begin();
        let generation = match self.shared.lock() {
            Ok(mut shared) => {
                shared.generation += 1;
                shared.state = Some(scheduler.state().clone());
                shared.generation
            }
            Err(_) => {
                log::error!("tile slot lock poisoned; not starting {}", address);
                return;
            }
        };

        let chain = LoadChain {
            generation,
            shared: self.shared.clone(),
            fetcher: self.fetcher.clone(),
            target: self.target.clone(),
            scheduler,
        };
        self.chain = Some(runtime::spawn(chain.run(first)));
    }

    /// Drop the current request. Pending loads and timers become no-ops.
    /// Safe to call repeatedly and on an idle slot.
    pub fn cancel(&mut self) {
        if let Some(chain) = self.chain.take() {
            chain.cancel();
        }
        if let Ok(mut shared) = self.shared.lock() {
            if let Some(state) = shared.state.take() {
                log::debug!("tile {} cancelled in {:?}", state.requested, state.phase);
                shared.generation += 1;
            }
        }
    }

    /// Snapshot of the current request, `None` while idle
    pub fn state(&self) -> Option<TileRequestState> {
        self.shared.lock().ok().and_then(|shared| shared.state.clone())
    }

    pub fn phase(&self) -> TilePhase {
        self.state().map(|s| s.phase).unwrap_or(TilePhase::Idle)
    }

    pub fn requested(&self) -> Option<TileAddress> {
        self.state().map(|s| s.requested)
    }

    pub fn is_done(&self) -> bool {
        self.phase() == TilePhase::Done
    }
}

impl Drop for TileSlot {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// One spawned run of a scheduler on behalf of a slot generation
struct LoadChain {
    generation: u64,
    shared: Arc<Mutex<SlotShared>>,
    fetcher: Arc<dyn TileFetcher>,
    target: Arc<dyn TileTarget>,
    scheduler: RetryScheduler,
}

impl LoadChain {
    async fn run(mut self, mut step: Step) {
        loop {
            step = match step {
                Step::Load { url, .. } => {
                    let timeout = self.scheduler.policy().load_timeout;
                    let outcome = load_once(self.fetcher.as_ref(), &url, timeout).await;
                    match outcome {
                        Ok(data) => self.scheduler.on_success(data),
                        Err(failure) => self.scheduler.on_failure(&failure),
                    }
                }
                Step::Wait(delay) => {
                    runtime::sleep(delay).await;
                    self.scheduler.on_timer()
                }
                Step::Deliver(image) => {
                    self.deliver(image);
                    return;
                }
            };
            if !self.publish() {
                return;
            }
        }
    }

    /// Copy the scheduler state into the slot; false once this chain is stale
    fn publish(&self) -> bool {
        match self.shared.lock() {
            Ok(mut shared) if shared.generation == self.generation => {
                shared.state = Some(self.scheduler.state().clone());
                true
            }
            _ => false,
        }
    }

    fn deliver(&mut self, image: TileImage) {
        let Ok(mut shared) = self.shared.lock() else {
            return;
        };
        if shared.generation != self.generation {
            return;
        }
        let requested = self.scheduler.state().requested;
        self.target.display(requested, image);
        self.scheduler.finish();
        shared.state = Some(self.scheduler.state().clone());
    }
}

async fn load_once(
    fetcher: &dyn TileFetcher,
    url: &str,
    timeout: Option<Duration>,
) -> Result<TileData, TileLoadFailure> {
    let Some(limit) = timeout else {
        return fetcher.fetch(url).await;
    };
    match future::select(fetcher.fetch(url), runtime::sleep(limit)).await {
        Either::Left((outcome, _)) => outcome,
        Either::Right(((), _)) => Err(TileLoadFailure::TimedOut(limit)),
    }
}
