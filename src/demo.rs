//! Synthetic workload that keeps two pools busy.
//!
//! Pools `M1` (15 workers) and `M2` (5 workers) are registered for
//! monitoring. Once a second the feeder tops up any pool whose active count
//! has dropped below its low-water mark with a burst of sleeping jobs.
//! Burst sizes and job lengths walk their ranges with a fixed stride, so a
//! run is reproducible.

use std::ops::RangeInclusive;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::monitor::{MonitorError, MonitorRegistry};
use crate::pool::WorkerPool;
use crate::source::PoolMetrics;

/// Time between top-ups.
pub const FEED_INTERVAL: Duration = Duration::from_secs(1);

/// Stride used to walk burst and job-length ranges.
const STRIDE: u64 = 7;

/// Top-up policy for one pool.
#[derive(Debug)]
pub struct Feed {
    pool: Arc<WorkerPool>,
    /// Top up when fewer than this many workers are busy.
    low_water: usize,
    burst: RangeInclusive<u64>,
    /// Job length in multiples of `unit`.
    job_length: RangeInclusive<u64>,
    unit: Duration,
    turn: u64,
}

/// `turn`-th value of `range`, stepping by [`STRIDE`] and wrapping.
fn pick(range: &RangeInclusive<u64>, turn: u64) -> u64 {
    let span = range.end().saturating_sub(*range.start()) + 1;
    range.start() + (turn.wrapping_mul(STRIDE) % span)
}

impl Feed {
    pub fn new(
        pool: Arc<WorkerPool>,
        low_water: usize,
        burst: RangeInclusive<u64>,
        job_length: RangeInclusive<u64>,
        unit: Duration,
    ) -> Self {
        Self {
            pool,
            low_water,
            burst,
            job_length,
            unit,
            turn: 0,
        }
    }

    pub fn pool(&self) -> &Arc<WorkerPool> {
        &self.pool
    }

    /// Submit a burst if the pool is running low. Returns the jobs accepted.
    pub fn top_up(&mut self) -> usize {
        if self.pool.is_shutdown() || self.pool.active_count() >= self.low_water {
            return 0;
        }

        let count = pick(&self.burst, self.turn);
        let mut accepted = 0;
        for i in 0..count {
            let length = self.unit * pick(&self.job_length, self.turn + i) as u32;
            if self.pool.submit(move || std::thread::sleep(length)).is_err() {
                break;
            }
            accepted += 1;
        }
        self.turn += 1;

        debug!(pool = self.pool.name(), accepted, "demo burst submitted");
        accepted
    }
}

/// The running demo: its pools and the feeder task.
#[derive(Debug)]
pub struct Demo {
    pools: Vec<Arc<WorkerPool>>,
    stop_tx: watch::Sender<bool>,
    feeder: JoinHandle<()>,
}

impl Demo {
    /// Create the demo pools in `registry` and start feeding them.
    ///
    /// With `run_for` set, the pools are shut down after that long, which
    /// lets their monitors drain and disappear.
    pub fn start(registry: &MonitorRegistry, run_for: Option<Duration>) -> Result<Self, MonitorError> {
        let m1 = registry.named_pool("M1", 15)?;
        let m2 = registry.named_pool("M2", 5)?;
        let unit = Duration::from_secs(1);
        let feeds = vec![
            Feed::new(m1.clone(), 5, 20..=50, 2..=10, unit),
            Feed::new(m2.clone(), 3, 5..=10, 2..=3, unit),
        ];
        Ok(Self::spawn(feeds, vec![m1, m2], run_for))
    }

    fn spawn(mut feeds: Vec<Feed>, pools: Vec<Arc<WorkerPool>>, run_for: Option<Duration>) -> Self {
        let (stop_tx, mut stop_rx) = watch::channel(false);

        let feeder = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(FEED_INTERVAL);
            let deadline = async {
                match run_for {
                    Some(after) => tokio::time::sleep(after).await,
                    None => std::future::pending::<()>().await,
                }
            };
            tokio::pin!(deadline);

            loop {
                tokio::select! {
                    biased;
                    changed = stop_rx.changed() => {
                        if changed.is_err() || *stop_rx.borrow() {
                            break;
                        }
                    }
                    _ = &mut deadline => {
                        info!("demo time is up, shutting pools down");
                        for feed in &feeds {
                            feed.pool().shutdown();
                        }
                        break;
                    }
                    _ = ticker.tick() => {
                        for feed in &mut feeds {
                            feed.top_up();
                        }
                    }
                }
            }
        });

        Self {
            pools,
            stop_tx,
            feeder,
        }
    }

    pub fn pools(&self) -> &[Arc<WorkerPool>] {
        &self.pools
    }

    /// Stop feeding and shut every pool down. Queued jobs still drain.
    pub fn shutdown(&self) {
        let _ = self.stop_tx.send(true);
        for pool in &self.pools {
            pool.shutdown();
        }
    }

    pub fn is_feeding(&self) -> bool {
        !self.feeder.is_finished()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monitor::{presentation_channel, MonitorOptions};
    use crate::pool::PoolNaming;

    #[test]
    fn test_pick_walks_range() {
        let range = 2..=10;
        let picks: Vec<u64> = (0..5).map(|t| pick(&range, t)).collect();
        assert_eq!(picks, vec![2, 9, 7, 5, 3]);
        assert!((0..100).all(|t| range.contains(&pick(&range, t))));
        assert_eq!(pick(&(4..=4), 13), 4);
    }

    #[test]
    fn test_top_up_only_when_low() {
        let naming = PoolNaming::new();
        let pool = Arc::new(WorkerPool::new("feed", 2, &naming).unwrap());
        let mut feed = Feed::new(pool.clone(), 1, 4..=4, 1..=1, Duration::from_millis(1));

        assert_eq!(feed.top_up(), 4);
        assert_eq!(pool.submitted_count(), 4);

        pool.shutdown();
        assert_eq!(feed.top_up(), 0);
        pool.join();
        assert_eq!(pool.completed_count(), 4);
    }

    #[tokio::test]
    async fn test_demo_registers_both_pools() {
        let (tx, _rx) = presentation_channel();
        let registry = MonitorRegistry::new(MonitorOptions::default(), tx);
        let demo = Demo::start(&registry, None).unwrap();

        assert_eq!(registry.len(), 2);
        let names: Vec<&str> = demo.pools().iter().map(|p| p.name()).collect();
        assert_eq!(names, vec!["M1", "M2"]);
        assert_eq!(demo.pools()[0].capacity(), 15);

        demo.shutdown();
        assert!(demo.pools().iter().all(|p| p.is_shutdown()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_shuts_pools_down() {
        let naming = PoolNaming::new();
        let pool = Arc::new(WorkerPool::new("short", 1, &naming).unwrap());
        let feed = Feed::new(pool.clone(), 0, 1..=1, 1..=1, Duration::from_millis(1));
        let demo = Demo::spawn(vec![feed], vec![pool.clone()], Some(Duration::from_secs(3)));

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(!pool.is_shutdown());
        assert!(demo.is_feeding());

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(pool.is_shutdown());
        assert!(!demo.is_feeding());
    }
}
