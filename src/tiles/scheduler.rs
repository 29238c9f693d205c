//! Retry scheduler for a single tile request
//!
//! [`RetryScheduler`] is a synchronous state machine. It never performs I/O or
//! sleeps; it tells its driver what to do next through [`Step`] and is fed the
//! outcome of each load and the firing of each backoff timer. Per address it
//! allows `max_attempts` failed loads, waiting `base_delay * 2^(k-1)` before
//! retry `k`, then escalates to the parent tile with a fresh attempt count.
//! Once zoom 0 is exhausted it hands out the placeholder, so every run ends
//! with something on screen.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::source::TileSource;
use super::types::{TileData, TileImage, TileLoadFailure};
use crate::core::constants::{DEFAULT_BASE_DELAY_MS, DEFAULT_LOAD_TIMEOUT_MS, DEFAULT_MAX_ATTEMPTS};
use crate::core::geo::TileAddress;

/// Bounds on how hard one tile request tries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Failed loads allowed per address before escalating
    pub max_attempts: u32,
    pub base_delay: Duration,
    /// Deadline for a single load; `None` waits for the fetcher to fail
    pub load_timeout: Option<Duration>,
}

impl RetryPolicy {
    /// Delay before retry `attempt` (1-indexed): `base_delay * 2^(attempt-1)`
    pub fn backoff(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(31);
        self.base_delay.saturating_mul(1u32 << exponent)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay: Duration::from_millis(DEFAULT_BASE_DELAY_MS),
            load_timeout: Some(Duration::from_millis(DEFAULT_LOAD_TIMEOUT_MS)),
        }
    }
}

/// Where a request is in its life. Ordered: a request never moves to an
/// earlier phase, and nothing follows `Done`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TilePhase {
    /// No request, or the request was cancelled
    Idle,
    /// First load of the requested address
    Loading,
    /// Reloading the requested address after a failure
    Retrying,
    /// Loading (or retrying) one of the requested address's ancestors
    FallbackParent,
    /// All tiers exhausted; the placeholder is being delivered
    Placeholder,
    /// Something has been delivered to the slot
    Done,
}

/// Mutable record of one slot's request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileRequestState {
    /// The address the slot asked for
    pub requested: TileAddress,
    /// The address currently being loaded (the requested one or an ancestor)
    pub address: TileAddress,
    /// Failed loads of `address` so far
    pub attempt: u32,
    pub phase: TilePhase,
    /// Set while a backoff timer is pending
    pub pending_retry: Option<Duration>,
}

impl TileRequestState {
    pub fn new(requested: TileAddress) -> Self {
        Self {
            requested,
            address: requested,
            attempt: 0,
            phase: TilePhase::Idle,
            pending_retry: None,
        }
    }

    pub fn is_done(&self) -> bool {
        self.phase == TilePhase::Done
    }
}

/// The next thing the driver must do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Start exactly one load of `url`
    Load { address: TileAddress, url: String },
    /// Arm exactly one timer, then call [`RetryScheduler::on_timer`]
    Wait(Duration),
    /// Hand `image` to the slot, then call [`RetryScheduler::finish`]
    Deliver(TileImage),
}

pub struct RetryScheduler {
    source: Arc<dyn TileSource>,
    policy: RetryPolicy,
    state: TileRequestState,
}

impl RetryScheduler {
    pub fn new(requested: TileAddress, source: Arc<dyn TileSource>, policy: RetryPolicy) -> Self {
        Self {
            source,
            policy,
            state: TileRequestState::new(requested),
        }
    }

    pub fn state(&self) -> &TileRequestState {
        &self.state
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Issue the first load of the requested address
    pub fn begin(&mut self) -> Step {
        self.state.address = self.state.requested;
        self.state.attempt = 0;
        self.state.pending_retry = None;
        self.state.phase = TilePhase::Loading;
        log::debug!("tile {} loading", self.state.requested);
        self.load_current()
    }

    pub fn on_success(&mut self, data: TileData) -> Step {
        log::debug!(
            "tile {} loaded from {} after {} failed attempt(s)",
            self.state.requested,
            self.state.address,
            self.state.attempt
        );
        Step::Deliver(TileImage::Loaded {
            address: self.state.address,
            data,
        })
    }

    pub fn on_failure(&mut self, failure: &TileLoadFailure) -> Step {
        self.state.attempt += 1;
        log::warn!(
            "tile {} attempt {}/{} failed: {}",
            self.state.address,
            self.state.attempt,
            self.policy.max_attempts,
            failure
        );

        if self.state.attempt < self.policy.max_attempts {
            if self.state.phase == TilePhase::Loading {
                self.state.phase = TilePhase::Retrying;
            }
            let delay = self.policy.backoff(self.state.attempt);
            self.state.pending_retry = Some(delay);
            return Step::Wait(delay);
        }

        match self.source.parent_of(self.state.address) {
            Some(parent) => {
                log::debug!(
                    "tile {} exhausted, falling back to {}",
                    self.state.address,
                    parent
                );
                self.state.address = parent;
                self.state.attempt = 0;
                self.state.phase = TilePhase::FallbackParent;
                self.load_current()
            }
            None => {
                log::info!(
                    "tile {} unavailable at every zoom level, using placeholder",
                    self.state.requested
                );
                self.state.phase = TilePhase::Placeholder;
                Step::Deliver(TileImage::Placeholder)
            }
        }
    }

    /// The backoff timer fired: reload the same address
    pub fn on_timer(&mut self) -> Step {
        self.state.pending_retry = None;
        self.load_current()
    }

    /// The delivered image is on screen
    pub fn finish(&mut self) {
        self.state.pending_retry = None;
        self.state.phase = TilePhase::Done;
    }

    fn load_current(&self) -> Step {
        Step::Load {
            address: self.state.address,
            url: self.source.url(self.state.address),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tiles::source::AssetTileSource;

    fn scheduler(address: TileAddress, max_attempts: u32) -> RetryScheduler {
        let policy = RetryPolicy {
            max_attempts,
            base_delay: Duration::from_millis(200),
            load_timeout: None,
        };
        RetryScheduler::new(address, Arc::new(AssetTileSource::new()), policy)
    }

    /// Drive a scheduler to completion synchronously. `outcome` decides each
    /// load; returns every load issued, every wait, and the delivered image.
    fn drive(
        scheduler: &mut RetryScheduler,
        mut outcome: impl FnMut(TileAddress) -> bool,
    ) -> (Vec<TileAddress>, Vec<Duration>, TileImage, Vec<TilePhase>) {
        let mut loads = Vec::new();
        let mut waits = Vec::new();
        let mut phases = vec![scheduler.state().phase];
        let mut step = scheduler.begin();
        loop {
            phases.push(scheduler.state().phase);
            step = match step {
                Step::Load { address, .. } => {
                    loads.push(address);
                    if outcome(address) {
                        scheduler.on_success(TileData::new(vec![1], 256, 256))
                    } else {
                        scheduler.on_failure(&TileLoadFailure::Missing)
                    }
                }
                Step::Wait(delay) => {
                    waits.push(delay);
                    scheduler.on_timer()
                }
                Step::Deliver(image) => {
                    scheduler.finish();
                    phases.push(scheduler.state().phase);
                    return (loads, waits, image, phases);
                }
            };
        }
    }

    #[test]
    fn test_backoff_doubles() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.backoff(1), Duration::from_millis(200));
        assert_eq!(policy.backoff(2), Duration::from_millis(400));
        assert_eq!(policy.backoff(3), Duration::from_millis(800));
        assert_eq!(policy.backoff(40), policy.base_delay.saturating_mul(1 << 31));
    }

    #[test]
    fn test_success_on_first_attempt() {
        let mut s = scheduler(TileAddress::new(2, 5, 7), 4);
        let (loads, waits, image, _) = drive(&mut s, |_| true);
        assert_eq!(loads, vec![TileAddress::new(2, 5, 7)]);
        assert!(waits.is_empty());
        assert_eq!(image.source_address(), Some(TileAddress::new(2, 5, 7)));
        assert!(s.state().is_done());
    }

    #[test]
    fn test_first_load_uses_asset_path() {
        let mut s = scheduler(TileAddress::new(2, 5, 7), 4);
        assert_eq!(
            s.begin(),
            Step::Load {
                address: TileAddress::new(2, 5, 7),
                url: "/tiles/2/5_7.png".to_string(),
            }
        );
        assert_eq!(s.state().phase, TilePhase::Loading);
        assert_eq!(s.state().attempt, 0);
    }

    #[test]
    fn test_transient_failure_is_masked_by_retry() {
        let mut s = scheduler(TileAddress::new(3, 1, 1), 4);
        let mut failures_left = 2;
        let (loads, waits, image, _) = drive(&mut s, |_| {
            if failures_left > 0 {
                failures_left -= 1;
                false
            } else {
                true
            }
        });
        assert_eq!(loads.len(), 3);
        assert!(loads.iter().all(|a| *a == TileAddress::new(3, 1, 1)));
        assert_eq!(waits, vec![Duration::from_millis(200), Duration::from_millis(400)]);
        assert_eq!(image.source_address(), Some(TileAddress::new(3, 1, 1)));
    }

    #[test]
    fn test_full_escalation_to_placeholder() {
        let mut s = scheduler(TileAddress::new(2, 5, 7), 4);
        let (loads, waits, image, _) = drive(&mut s, |_| false);

        let mut expected = Vec::new();
        for address in [
            TileAddress::new(2, 5, 7),
            TileAddress::new(1, 2, 3),
            TileAddress::new(0, 1, 1),
        ] {
            expected.extend(std::iter::repeat(address).take(4));
        }
        assert_eq!(loads, expected);

        let per_level = [200, 400, 800].map(Duration::from_millis);
        assert_eq!(waits, per_level.repeat(3));
        assert!(image.is_placeholder());
        assert!(s.state().is_done());
    }

    #[test]
    fn test_distinct_addresses_equal_zoom_plus_one() {
        for zoom in 0..6u8 {
            let mut s = scheduler(TileAddress::new(zoom, 0, 0), 3);
            let (mut loads, _, image, _) = drive(&mut s, |_| false);
            assert_eq!(loads.len(), 3 * (zoom as usize + 1));
            loads.dedup();
            assert_eq!(loads.len(), zoom as usize + 1);
            assert!(image.is_placeholder());
        }
    }

    #[test]
    fn test_root_tile_gets_placeholder_after_max_attempts() {
        let mut s = scheduler(TileAddress::new(0, 0, 0), 4);
        let (loads, _, image, _) = drive(&mut s, |_| false);
        assert_eq!(loads.len(), 4);
        assert!(image.is_placeholder());
    }

    #[test]
    fn test_parent_success_delivers_parent_pixels() {
        let mut s = scheduler(TileAddress::new(2, 5, 7), 2);
        let (loads, _, image, _) = drive(&mut s, |a| a.zoom == 1);
        assert_eq!(loads.len(), 3);
        assert_eq!(image.source_address(), Some(TileAddress::new(1, 2, 3)));
        assert_eq!(s.state().requested, TileAddress::new(2, 5, 7));
    }

    #[test]
    fn test_attempt_resets_on_escalation() {
        let mut s = scheduler(TileAddress::new(1, 0, 0), 2);
        s.begin();
        assert!(matches!(s.on_failure(&TileLoadFailure::Missing), Step::Wait(_)));
        assert_eq!(s.state().attempt, 1);
        assert_eq!(s.state().pending_retry, Some(Duration::from_millis(200)));
        s.on_timer();
        assert_eq!(s.state().pending_retry, None);

        let step = s.on_failure(&TileLoadFailure::Status(500));
        assert!(matches!(step, Step::Load { address, .. } if address == TileAddress::new(0, 0, 0)));
        assert_eq!(s.state().attempt, 0);
        assert_eq!(s.state().phase, TilePhase::FallbackParent);
    }

    #[test]
    fn test_phases_only_move_forward() {
        let mut s = scheduler(TileAddress::new(3, 7, 2), 4);
        let (_, _, _, phases) = drive(&mut s, |_| false);
        assert!(phases.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(phases.first(), Some(&TilePhase::Idle));
        assert_eq!(phases.last(), Some(&TilePhase::Done));
        assert!(phases.contains(&TilePhase::Retrying));
        assert!(phases.contains(&TilePhase::FallbackParent));
        assert!(phases.contains(&TilePhase::Placeholder));
    }

    #[test]
    fn test_single_attempt_policy_escalates_immediately() {
        let mut s = scheduler(TileAddress::new(1, 1, 1), 1);
        let (loads, waits, image, _) = drive(&mut s, |_| false);
        assert_eq!(loads, vec![TileAddress::new(1, 1, 1), TileAddress::new(0, 0, 0)]);
        assert!(waits.is_empty());
        assert!(image.is_placeholder());
    }
}
