//! Coalescing worker for realtime change notifications.
//!
//! Receives change events from an mpsc channel, collects them for a fixed
//! window starting at the first event, then hands one refresh plan for the
//! whole batch to a [`RefreshSink`].

use std::time::Duration;

use log::{debug, info};
use tokio::sync::mpsc;
use tokio::time::Instant;

use super::change_event::ChangeEvent;
use super::refresh_planner::{plan_refresh, RefreshPlan};

/// Receives refresh plans produced by the worker.
///
/// `refresh()` must be fast and non-blocking; implementations queue the plan.
pub trait RefreshSink: Send + Sync {
    fn refresh(&self, plan: RefreshPlan);
}

impl RefreshSink for mpsc::UnboundedSender<RefreshPlan> {
    fn refresh(&self, plan: RefreshPlan) {
        if self.send(plan).is_err() {
            debug!("Refresh plan dropped: receiver closed");
        }
    }
}

/// Runs until the event channel closes, flushing any pending batch first.
///
/// Three inserts inside one window produce exactly one plan. Bursts longer
/// than the window produce one plan per window, so latency stays bounded.
pub async fn invalidation_worker<S: RefreshSink>(
    mut rx: mpsc::UnboundedReceiver<ChangeEvent>,
    table: String,
    window: Duration,
    sink: S,
) {
    info!("Invalidation worker started for table '{}'", table);

    let mut pending: Vec<ChangeEvent> = Vec::new();
    let mut deadline: Option<Instant> = None;

    loop {
        match deadline {
            Some(flush_at) => {
                tokio::select! {
                    event = rx.recv() => match event {
                        Some(e) => pending.push(e),
                        None => {
                            flush(&mut pending, &table, &sink);
                            break;
                        }
                    },
                    _ = tokio::time::sleep_until(flush_at) => {
                        flush(&mut pending, &table, &sink);
                        deadline = None;
                    }
                }
            }
            None => match rx.recv().await {
                Some(e) => {
                    pending.push(e);
                    deadline = Some(Instant::now() + window);
                }
                None => break,
            },
        }
    }

    info!("Invalidation worker for table '{}' shutting down", table);
}

fn flush<S: RefreshSink>(pending: &mut Vec<ChangeEvent>, table: &str, sink: &S) {
    let batch = std::mem::take(pending);
    if batch.is_empty() {
        return;
    }
    debug!("Coalesced {} change event(s)", batch.len());
    if let Some(plan) = plan_refresh(&batch, table) {
        sink.refresh(plan);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::NOTES_TABLE;

    fn start(window: Duration) -> (
        mpsc::UnboundedSender<ChangeEvent>,
        mpsc::UnboundedReceiver<RefreshPlan>,
        tokio::task::JoinHandle<()>,
    ) {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (plan_tx, plan_rx) = mpsc::unbounded_channel();
        let worker = tokio::spawn(invalidation_worker(
            event_rx,
            NOTES_TABLE.to_string(),
            window,
            plan_tx,
        ));
        (event_tx, plan_rx, worker)
    }

    #[tokio::test(start_paused = true)]
    async fn test_three_inserts_in_window_produce_one_refresh() {
        let (events, mut plans, worker) = start(Duration::from_millis(250));

        for _ in 0..3 {
            events.send(ChangeEvent::insert(NOTES_TABLE)).unwrap();
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        tokio::time::sleep(Duration::from_millis(300)).await;

        assert_eq!(plans.recv().await, Some(RefreshPlan::full()));
        assert!(plans.try_recv().is_err());

        drop(events);
        worker.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_events_in_separate_windows_produce_separate_refreshes() {
        let (events, mut plans, worker) = start(Duration::from_millis(250));

        events.send(ChangeEvent::update(NOTES_TABLE, None)).unwrap();
        tokio::time::sleep(Duration::from_millis(400)).await;
        events.send(ChangeEvent::insert(NOTES_TABLE)).unwrap();
        tokio::time::sleep(Duration::from_millis(400)).await;

        let first = plans.recv().await.unwrap();
        assert!(first.refresh_totals && !first.refresh_listing);
        assert_eq!(plans.recv().await, Some(RefreshPlan::full()));

        drop(events);
        worker.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_pending_batch_is_flushed_on_shutdown() {
        let (events, mut plans, worker) = start(Duration::from_secs(10));

        events.send(ChangeEvent::insert(NOTES_TABLE)).unwrap();
        tokio::task::yield_now().await;
        drop(events);
        worker.await.unwrap();

        assert_eq!(plans.recv().await, Some(RefreshPlan::full()));
    }
}
