//! Runtime around the listing reducer.
//!
//! One task owns the [`ListingState`]. It receives [`ListingEvent`]s, runs the
//! reducer, performs the resulting commands against the material service and
//! publishes every new state on a watch channel. Filter changes are debounced
//! on the trailing edge; remote changes bypass the debounce.

use std::sync::Arc;

use log::{debug, info};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::Instant;

use super::listing_model::ListingConfig;
use super::listing_state::{reduce, ListingCommand, ListingEvent, ListingState};
use crate::materials::MaterialServiceTrait;
use crate::realtime::{RefreshPlan, RefreshSink};

/// Handle to a running listing view. Dropping every clone tears the view down.
#[derive(Clone)]
pub struct ListingHandle {
    events: mpsc::UnboundedSender<ListingEvent>,
    state: watch::Receiver<ListingState>,
}

impl ListingHandle {
    /// Queues an event for the listing task.
    pub fn dispatch(&self, event: ListingEvent) {
        if self.events.send(event).is_err() {
            debug!("Listing event dropped: view already torn down");
        }
    }

    /// Returns a receiver that observes every published state.
    pub fn subscribe(&self) -> watch::Receiver<ListingState> {
        self.state.clone()
    }

    /// Current state.
    pub fn snapshot(&self) -> ListingState {
        self.state.borrow().clone()
    }

    /// Waits until the published state satisfies `predicate` and returns it.
    ///
    /// Returns `None` if the listing task stopped first.
    pub async fn wait_for<F>(&self, predicate: F) -> Option<ListingState>
    where
        F: Fn(&ListingState) -> bool,
    {
        let mut rx = self.state.clone();
        rx.wait_for(|state| predicate(state))
            .await
            .ok()
            .map(|state| state.clone())
    }
}

impl RefreshSink for ListingHandle {
    fn refresh(&self, plan: RefreshPlan) {
        self.dispatch(ListingEvent::RemoteChange(plan));
    }
}

/// Starts the listing task and returns its handle together with the task.
pub fn spawn_listing(
    service: Arc<dyn MaterialServiceTrait>,
    config: ListingConfig,
) -> (ListingHandle, JoinHandle<()>) {
    let (events_tx, events_rx) = mpsc::unbounded_channel();
    let (state_tx, state_rx) = watch::channel(ListingState::default());

    let task = tokio::spawn(run_listing(service, config, events_rx, state_tx));
    let handle = ListingHandle {
        events: events_tx,
        state: state_rx,
    };
    (handle, task)
}

async fn run_listing(
    service: Arc<dyn MaterialServiceTrait>,
    config: ListingConfig,
    mut events: mpsc::UnboundedReceiver<ListingEvent>,
    state_tx: watch::Sender<ListingState>,
) {
    info!("Listing view started");

    // Fetch results come back on a private channel so the view stops as soon
    // as every external handle is gone.
    let (results_tx, mut results) = mpsc::unbounded_channel::<ListingEvent>();
    let mut state = ListingState::default();
    let mut debounce_until: Option<Instant> = None;

    loop {
        let event = match debounce_until {
            Some(deadline) => tokio::select! {
                event = events.recv() => match event {
                    Some(e) => e,
                    None => break,
                },
                Some(result) = results.recv() => result,
                _ = tokio::time::sleep_until(deadline) => {
                    debounce_until = None;
                    ListingEvent::DebounceElapsed
                }
            },
            None => tokio::select! {
                event = events.recv() => match event {
                    Some(e) => e,
                    None => break,
                },
                Some(result) = results.recv() => result,
            },
        };

        let transition = reduce(state, event);
        state = transition.state;

        for command in transition.commands {
            match command {
                ListingCommand::RestartDebounce => {
                    debounce_until = Some(Instant::now() + config.debounce);
                }
                ListingCommand::FetchRows { generation, query } => {
                    let service = service.clone();
                    let tx = results_tx.clone();
                    tokio::spawn(async move {
                        let event = match service.list_materials(&query).await {
                            Ok(rows) => ListingEvent::RowsLoaded { generation, rows },
                            Err(e) => ListingEvent::RowsFailed {
                                generation,
                                message: e.to_string(),
                            },
                        };
                        let _ = tx.send(event);
                    });
                }
                ListingCommand::FetchTotals => {
                    let service = service.clone();
                    let tx = results_tx.clone();
                    tokio::spawn(async move {
                        let event = match service.get_totals().await {
                            Ok(totals) => ListingEvent::TotalsLoaded(totals),
                            Err(e) => ListingEvent::TotalsFailed(e.to_string()),
                        };
                        let _ = tx.send(event);
                    });
                }
                ListingCommand::FetchSubjects => {
                    let service = service.clone();
                    let tx = results_tx.clone();
                    tokio::spawn(async move {
                        let event = match service.get_subjects().await {
                            Ok(subjects) => ListingEvent::SubjectsLoaded(subjects),
                            Err(e) => ListingEvent::SubjectsFailed(e.to_string()),
                        };
                        let _ = tx.send(event);
                    });
                }
            }
        }

        state_tx.send_replace(state.clone());
    }

    info!("Listing view torn down");
}
