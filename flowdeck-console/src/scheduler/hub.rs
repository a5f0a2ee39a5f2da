//! Reference-counted shared timer
//!
//! The hub multiplexes every registered poll job onto a single interval
//! timer. Registration runs the job once immediately and counts a
//! subscriber; the timer is started on the 0 -> 1 transition and stopped on
//! the 1 -> 0 transition, so its existence is a pure function of the
//! clamped subscriber count. Job failures are logged and contained per job:
//! a broken feed can never stall the timer or its siblings.

use anyhow::Result;
use futures::future::BoxFuture;
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};
use tracing::{debug, error, info, warn};

/// A registered poll action, shared between the registry and in-flight runs
type JobAction = Arc<dyn Fn() -> BoxFuture<'static, Result<()>> + Send + Sync>;

/// Process-wide scheduler for periodic dashboard feeds
///
/// Constructed once at startup and passed around by `Arc`. All mutation
/// goes through [`PollHub::register_job`] and [`PollHub::unregister_job`];
/// nothing else may start or stop the underlying timer.
pub struct PollHub {
    /// Fixed tick period, set at construction
    tick_interval: Duration,
    /// Registered jobs by id; shared with the ticker task
    jobs: Arc<Mutex<HashMap<String, JobAction>>>,
    /// Subscriber accounting and ownership of the single ticker task
    lifecycle: Mutex<Lifecycle>,
}

struct Lifecycle {
    subscribers: usize,
    ticker: Option<JoinHandle<()>>,
}

impl PollHub {
    /// Creates a new hub with the given tick period
    pub fn new(tick_interval: Duration) -> Self {
        Self {
            tick_interval,
            jobs: Arc::new(Mutex::new(HashMap::new())),
            lifecycle: Mutex::new(Lifecycle {
                subscribers: 0,
                ticker: None,
            }),
        }
    }

    /// Registers a poll job under `id`, replacing any previous action
    ///
    /// The action runs once immediately as a detached task so the caller's
    /// view is populated without waiting out a full tick; any failure of
    /// that run is logged and discarded. The subscriber count is then
    /// incremented, starting the shared timer on the 0 -> 1 transition.
    pub fn register_job<F, Fut>(&self, id: impl Into<String>, action: F)
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        let id = id.into();
        let action: JobAction = Arc::new(move || Box::pin(action()));

        {
            let mut jobs = self.jobs.lock().unwrap();
            jobs.insert(id.clone(), Arc::clone(&action));
        }

        // Immediate run, dispatched before the subscriber is counted.
        Self::spawn_job(id.clone(), action);

        let mut lifecycle = self.lifecycle.lock().unwrap();
        lifecycle.subscribers += 1;
        if lifecycle.subscribers == 1 {
            lifecycle.ticker = Some(self.spawn_ticker());
            info!("Shared timer started (interval: {:?})", self.tick_interval);
        }
        debug!(
            "Registered job {} ({} subscriber(s))",
            id, lifecycle.subscribers
        );
    }

    /// Unregisters the job under `id` and releases one subscription
    ///
    /// Removing an unknown id is a registry no-op but still decrements the
    /// (clamped) subscriber count. An in-flight run of the removed job is
    /// not cancelled; it only stops being dispatched on future ticks. The
    /// shared timer is stopped when the count reaches 0.
    pub fn unregister_job(&self, id: &str) {
        {
            let mut jobs = self.jobs.lock().unwrap();
            if jobs.remove(id).is_none() {
                warn!("Unregistered unknown job {}", id);
            }
        }

        let mut lifecycle = self.lifecycle.lock().unwrap();
        lifecycle.subscribers = lifecycle.subscribers.saturating_sub(1);
        if lifecycle.subscribers == 0
            && let Some(ticker) = lifecycle.ticker.take()
        {
            ticker.abort();
            info!("Shared timer stopped");
        }
        debug!(
            "Unregistered job {} ({} subscriber(s))",
            id, lifecycle.subscribers
        );
    }

    /// Number of live subscriptions (clamped at 0)
    pub fn subscriber_count(&self) -> usize {
        self.lifecycle.lock().unwrap().subscribers
    }

    /// Whether the shared timer task is currently running
    pub fn timer_active(&self) -> bool {
        self.lifecycle.lock().unwrap().ticker.is_some()
    }

    /// The fixed tick period this hub was built with
    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    /// Spawns the single ticker task
    ///
    /// Each tick snapshots the registry and dispatches every job as its own
    /// detached task, without awaiting completion: a slow job overlaps its
    /// own next run rather than delaying the tick or its siblings.
    fn spawn_ticker(&self) -> JoinHandle<()> {
        let jobs = Arc::clone(&self.jobs);
        let period = self.tick_interval;

        tokio::spawn(async move {
            // Registration already ran each job once; skip the lead-off
            // tick tokio's interval would otherwise fire immediately.
            let mut ticker = time::interval_at(Instant::now() + period, period);

            loop {
                ticker.tick().await;

                let snapshot: Vec<(String, JobAction)> = {
                    let jobs = jobs.lock().unwrap();
                    jobs.iter()
                        .map(|(id, action)| (id.clone(), Arc::clone(action)))
                        .collect()
                };

                debug!("Tick: dispatching {} job(s)", snapshot.len());

                for (id, action) in snapshot {
                    Self::spawn_job(id, action);
                }
            }
        })
    }

    /// Runs one job as a detached task, containing any failure
    fn spawn_job(id: String, action: JobAction) {
        tokio::spawn(async move {
            if let Err(e) = action().await {
                error!("Job {} failed: {:#}", id, e);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Lets detached job tasks run on the current-thread test runtime
    async fn run_pending() {
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
    }

    fn counting_action(counter: Arc<AtomicUsize>) -> impl Fn() -> BoxFuture<'static, Result<()>> {
        move || {
            let counter = Arc::clone(&counter);
            Box::pin(async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(())
            })
        }
    }

    fn failing_action(counter: Arc<AtomicUsize>) -> impl Fn() -> BoxFuture<'static, Result<()>> {
        move || {
            let counter = Arc::clone(&counter);
            Box::pin(async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Err(anyhow!("simulated feed failure"))
            })
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_timer_runs_iff_subscribed() {
        let hub = PollHub::new(Duration::from_millis(1000));
        assert!(!hub.timer_active());
        assert_eq!(hub.subscriber_count(), 0);

        hub.register_job("a", counting_action(Arc::new(AtomicUsize::new(0))));
        assert!(hub.timer_active());

        hub.register_job("b", counting_action(Arc::new(AtomicUsize::new(0))));
        assert!(hub.timer_active());
        assert_eq!(hub.subscriber_count(), 2);

        hub.unregister_job("a");
        assert!(hub.timer_active());

        hub.unregister_job("b");
        assert!(!hub.timer_active());
        assert_eq!(hub.subscriber_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_register_runs_action_once_immediately() {
        let hub = PollHub::new(Duration::from_millis(1000));
        let count = Arc::new(AtomicUsize::new(0));

        hub.register_job("feed", counting_action(Arc::clone(&count)));
        run_pending().await;

        // One immediate run, no tick has elapsed yet.
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert!(hub.timer_active());
    }

    #[tokio::test(start_paused = true)]
    async fn test_failing_immediate_run_still_counts_subscriber() {
        let hub = PollHub::new(Duration::from_millis(1000));
        let count = Arc::new(AtomicUsize::new(0));

        hub.register_job("broken", failing_action(Arc::clone(&count)));
        run_pending().await;

        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(hub.subscriber_count(), 1);
        assert!(hub.timer_active());
    }

    #[tokio::test(start_paused = true)]
    async fn test_failing_job_does_not_suppress_siblings() {
        let hub = PollHub::new(Duration::from_millis(1000));
        let broken = Arc::new(AtomicUsize::new(0));
        let healthy = Arc::new(AtomicUsize::new(0));

        hub.register_job("broken", failing_action(Arc::clone(&broken)));
        hub.register_job("healthy", counting_action(Arc::clone(&healthy)));
        run_pending().await;

        for _ in 0..2 {
            time::advance(Duration::from_millis(1000)).await;
            run_pending().await;
        }

        // Both keep firing on every tick despite one failing every time.
        assert_eq!(broken.load(Ordering::SeqCst), 3);
        assert_eq!(healthy.load(Ordering::SeqCst), 3);
        assert!(hub.timer_active());
    }

    #[tokio::test(start_paused = true)]
    async fn test_unregister_unknown_id_floors_at_zero() {
        let hub = PollHub::new(Duration::from_millis(1000));

        hub.unregister_job("never-registered");
        assert_eq!(hub.subscriber_count(), 0);
        assert!(!hub.timer_active());

        // Still usable afterwards.
        let count = Arc::new(AtomicUsize::new(0));
        hub.register_job("feed", counting_action(Arc::clone(&count)));
        run_pending().await;
        assert_eq!(hub.subscriber_count(), 1);
        assert!(hub.timer_active());
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reregister_replaces_action() {
        let hub = PollHub::new(Duration::from_millis(1000));
        let first = Arc::new(AtomicUsize::new(0));
        let second = Arc::new(AtomicUsize::new(0));

        hub.register_job("x", counting_action(Arc::clone(&first)));
        run_pending().await;
        hub.register_job("x", counting_action(Arc::clone(&second)));
        run_pending().await;

        time::advance(Duration::from_millis(1000)).await;
        run_pending().await;

        // The tick runs only the replacement; the old action stops at its
        // single immediate run.
        assert_eq!(first.load(Ordering::SeqCst), 1);
        assert_eq!(second.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_two_feeds_over_three_ticks() {
        let hub = PollHub::new(Duration::from_millis(1000));
        let a = Arc::new(AtomicUsize::new(0));
        let b = Arc::new(AtomicUsize::new(0));

        hub.register_job("a", counting_action(Arc::clone(&a)));
        hub.register_job("b", counting_action(Arc::clone(&b)));
        run_pending().await;

        time::advance(Duration::from_millis(1100)).await;
        run_pending().await;
        time::advance(Duration::from_millis(1000)).await;
        run_pending().await;
        time::advance(Duration::from_millis(1000)).await;
        run_pending().await;

        // 3100 ms elapsed: one immediate run plus three ticks each.
        assert_eq!(a.load(Ordering::SeqCst), 4);
        assert_eq!(b.load(Ordering::SeqCst), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_job_overlaps_instead_of_delaying_ticks() {
        let hub = PollHub::new(Duration::from_millis(1000));
        let started = Arc::new(AtomicUsize::new(0));
        let in_flight = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let action = {
            let started = Arc::clone(&started);
            let in_flight = Arc::clone(&in_flight);
            let peak = Arc::clone(&peak);
            move || {
                let started = Arc::clone(&started);
                let in_flight = Arc::clone(&in_flight);
                let peak = Arc::clone(&peak);
                Box::pin(async move {
                    started.fetch_add(1, Ordering::SeqCst);
                    let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                    peak.fetch_max(now, Ordering::SeqCst);
                    time::sleep(Duration::from_millis(2500)).await;
                    in_flight.fetch_sub(1, Ordering::SeqCst);
                    Ok(())
                }) as BoxFuture<'static, Result<()>>
            }
        };

        hub.register_job("slow", action);
        run_pending().await;

        for _ in 0..3 {
            time::advance(Duration::from_millis(1000)).await;
            run_pending().await;
        }

        // Every tick dispatched a fresh run while earlier ones were still
        // sleeping: dispatch never waits for completion.
        assert_eq!(started.load(Ordering::SeqCst), 4);
        assert!(peak.load(Ordering::SeqCst) >= 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_removed_job_stops_at_next_tick() {
        let hub = PollHub::new(Duration::from_millis(1000));
        let removed = Arc::new(AtomicUsize::new(0));
        let kept = Arc::new(AtomicUsize::new(0));

        hub.register_job("removed", counting_action(Arc::clone(&removed)));
        hub.register_job("kept", counting_action(Arc::clone(&kept)));
        run_pending().await;

        time::advance(Duration::from_millis(1000)).await;
        run_pending().await;

        hub.unregister_job("removed");

        time::advance(Duration::from_millis(1000)).await;
        run_pending().await;

        assert_eq!(removed.load(Ordering::SeqCst), 2);
        assert_eq!(kept.load(Ordering::SeqCst), 3);
        assert!(hub.timer_active());
    }
}
