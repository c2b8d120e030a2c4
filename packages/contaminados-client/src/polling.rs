use log::info;
use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollControl {
    Continue,
    Stop,
}

/// Repeating refresh timer. At most one loop runs at a time.
#[derive(Default)]
pub struct Poller {
    handle: Option<JoinHandle<()>>,
}

impl Poller {
    pub fn new() -> Self {
        Self::default()
    }

    /// (Re)starts the loop, cancelling any loop already running.
    ///
    /// `tick` first runs one `period` after the call and then every `period`
    /// until it returns [`PollControl::Stop`] or the poller is stopped.
    pub fn start<F, Fut>(&mut self, period: Duration, mut tick: F)
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = PollControl> + Send + 'static,
    {
        self.abort();
        let handle = tokio::spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // the first tick completes immediately
            ticker.tick().await;
            loop {
                ticker.tick().await;
                if tick().await == PollControl::Stop {
                    info!("Auto-refresh stopped");
                    break;
                }
            }
        });
        self.handle = Some(handle);
        info!("Auto-refresh on (every {}s)", period.as_secs_f32());
    }

    pub fn stop(&mut self) {
        if self.abort() {
            info!("Auto-refresh off");
        }
    }

    fn abort(&mut self) -> bool {
        match self.handle.take() {
            Some(handle) => {
                handle.abort();
                true
            }
            None => false,
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle
            .as_ref()
            .map(|h| !h.is_finished())
            .unwrap_or(false)
    }

    /// Waits for the loop to end on its own.
    pub async fn join(&mut self) {
        if let Some(handle) = self.handle.as_mut() {
            let _ = handle.await;
            self.handle = None;
        }
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn counting(counter: Arc<AtomicUsize>, stop_after: usize) -> impl FnMut() -> std::future::Ready<PollControl> {
        move || {
            let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
            std::future::ready(if n >= stop_after {
                PollControl::Stop
            } else {
                PollControl::Continue
            })
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticks_every_period() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut poller = Poller::new();
        poller.start(Duration::from_secs(5), counting(counter.clone(), usize::MAX));

        tokio::time::sleep(Duration::from_millis(4_900)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 2);
        assert!(poller.is_running());

        poller.stop();
        assert!(!poller.is_running());
        tokio::time::sleep(Duration::from_secs(20)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_replaces_previous_loop() {
        let first = Arc::new(AtomicUsize::new(0));
        let second = Arc::new(AtomicUsize::new(0));
        let mut poller = Poller::new();

        poller.start(Duration::from_secs(5), counting(first.clone(), usize::MAX));
        poller.start(Duration::from_secs(5), counting(second.clone(), usize::MAX));

        tokio::time::sleep(Duration::from_millis(15_100)).await;
        assert_eq!(first.load(Ordering::SeqCst), 0);
        assert_eq!(second.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_from_tick_ends_loop() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut poller = Poller::new();
        poller.start(Duration::from_secs(1), counting(counter.clone(), 2));

        poller.join().await;
        assert_eq!(counter.load(Ordering::SeqCst), 2);
        assert!(!poller.is_running());
    }
}
