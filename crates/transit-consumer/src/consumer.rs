use crate::error::Result;
use crate::source::EventSource;
use parking_lot::Mutex;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use transit::{DispatchOutcome, Dispatcher};
use transit_core::{observe, ConsumerConfig, Message};

/// Last offset seen on one topic partition
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Position {
    pub topic: String,
    pub partition: i32,
    pub offset: i64,
}

/// Consumer: pulls messages from a source and feeds the dispatcher
///
/// Messages are applied one at a time on the calling task, which makes the
/// consumer the single writer of the projection. Redelivered messages are
/// applied again; the projection is last-write-wins.
pub struct Consumer<S: EventSource> {
    source: Arc<S>,
    dispatcher: Dispatcher,
    config: ConsumerConfig,
    shutdown: Arc<AtomicBool>,
    positions: Mutex<HashMap<(String, i32), i64>>,
}

impl<S: EventSource> Consumer<S> {
    pub fn new(source: Arc<S>, dispatcher: Dispatcher, config: ConsumerConfig) -> Self {
        Self {
            source,
            dispatcher,
            config,
            shutdown: Arc::new(AtomicBool::new(false)),
            positions: Mutex::new(HashMap::new()),
        }
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn source(&self) -> &Arc<S> {
        &self.source
    }

    /// Drain the source until it is empty or `max_drain` messages were handled.
    ///
    /// A poll failure is logged and ends the drain early. A dispatch error is
    /// a bug in the projection and is returned.
    pub fn run_once(&self) -> Result<ConsumerStats> {
        let start = Instant::now();
        let mut stats = ConsumerStats::default();
        let result = self.drain(&mut stats, |message| self.dispatcher.dispatch(message));

        stats.duration = start.elapsed();
        observe::record_drain(stats.duration, stats.messages as u64);
        if let Err(e) = result {
            tracing::error!(
                "Drain aborted after {} messages ({} applied): {}",
                stats.messages,
                stats.applied,
                e
            );
            return Err(e);
        }
        Ok(stats)
    }

    fn drain<F>(&self, stats: &mut ConsumerStats, mut apply: F) -> Result<()>
    where
        F: FnMut(&Message) -> transit_core::Result<DispatchOutcome>,
    {
        while stats.messages < self.config.max_drain {
            let message = match self.source.poll(self.config.consume_timeout()) {
                Ok(Some(message)) => message,
                Ok(None) => break,
                Err(e) => {
                    tracing::error!("Error while polling event source: {}", e);
                    stats.poll_failed = true;
                    break;
                }
            };

            let outcome = apply(&message)?;
            stats.record(&outcome);
            self.positions
                .lock()
                .insert((message.topic, message.partition), message.offset);
        }
        Ok(())
    }

    /// Run until shutdown, draining then waiting for more messages.
    ///
    /// Waits on the source's notifier when it has one, and never longer
    /// than `poll_interval_ms`, so shutdown is observed within one interval.
    pub async fn run_continuous(&self) -> Result<()> {
        tracing::info!("Consumer started");
        let notify = self.source.notifier();

        while !self.shutdown.load(Ordering::SeqCst) {
            match self.run_once() {
                Ok(stats) => {
                    if stats.messages == 0 || stats.poll_failed {
                        if let Some(notify) = &notify {
                            tokio::select! {
                                _ = notify.notified() => {}
                                _ = tokio::time::sleep(self.config.poll_interval()) => {}
                            }
                        } else {
                            tokio::time::sleep(self.config.poll_interval()).await;
                        }
                    } else {
                        tracing::debug!(
                            "Handled {} messages ({} applied, {} dropped) in {:?}",
                            stats.messages,
                            stats.applied,
                            stats.dropped,
                            stats.duration
                        );
                    }
                }
                Err(e) => {
                    tracing::error!("Consumer error: {}", e);
                    // Back off on error
                    tokio::time::sleep(Duration::from_secs(1)).await;
                }
            }
        }

        tracing::info!("Consumer stopped");
        Ok(())
    }

    /// Signal graceful shutdown
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::SeqCst);
    }

    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle {
            shutdown: self.shutdown.clone(),
        }
    }

    /// Last offset seen per topic partition, sorted by topic then partition
    pub fn positions(&self) -> Vec<Position> {
        let mut positions: Vec<Position> = self
            .positions
            .lock()
            .iter()
            .map(|((topic, partition), offset)| Position {
                topic: topic.clone(),
                partition: *partition,
                offset: *offset,
            })
            .collect();
        positions.sort_by(|a, b| (&a.topic, a.partition).cmp(&(&b.topic, b.partition)));
        positions
    }
}

/// Handle for stopping a running consumer from another task
#[derive(Clone)]
pub struct ShutdownHandle {
    shutdown: Arc<AtomicBool>,
}

impl ShutdownHandle {
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::SeqCst);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConsumerStats {
    pub messages: usize,
    pub applied: usize,
    pub ignored: usize,
    pub dropped: usize,
    pub poll_failed: bool,
    pub duration: Duration,
}

impl ConsumerStats {
    fn record(&mut self, outcome: &DispatchOutcome) {
        self.messages += 1;
        match outcome {
            DispatchOutcome::Applied(_) => self.applied += 1,
            DispatchOutcome::Ignored(_) => self.ignored += 1,
            DispatchOutcome::Dropped(_) => self.dropped += 1,
        }
    }
}
