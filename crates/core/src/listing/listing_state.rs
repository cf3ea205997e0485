//! Listing view state machine.
//!
//! `reduce` is pure: it maps the current state and one event to the next state
//! plus the commands the runtime must perform. Every rows request carries a
//! generation number and only the response for the latest generation is
//! applied, so slow responses can never overwrite newer results.

use log::{debug, warn};

use super::listing_model::{ListingFilters, SortKey};
use super::listing_query::build_listing_query;
use crate::errors::ValidationError;
use crate::materials::{CatalogTotals, StudyMaterial};
use crate::query::SelectQuery;
use crate::realtime::RefreshPlan;

/// Snapshot of the listing view.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingState {
    pub filters: ListingFilters,
    pub rows: Vec<StudyMaterial>,
    pub loading: bool,
    pub show_all: bool,
    pub totals: CatalogTotals,
    pub subjects: Vec<String>,
    /// Set when the current filters cannot be turned into a query.
    pub filter_error: Option<ValidationError>,
    /// Generation of the latest rows request issued.
    pub issued_generation: u64,
    /// Generation whose result is currently shown.
    pub applied_generation: u64,
}

impl ListingState {
    /// Rows to render: a preview unless "show all" is on or a filter is active.
    pub fn visible_rows(&self, preview_size: usize) -> &[StudyMaterial] {
        if self.show_all || self.filters.has_active_filters() {
            &self.rows
        } else {
            &self.rows[..self.rows.len().min(preview_size)]
        }
    }
}

/// Inputs to the listing view.
#[derive(Debug, Clone, PartialEq)]
pub enum ListingEvent {
    /// The view was opened.
    Mounted,
    SearchChanged(String),
    MediumChanged(String),
    GradeChanged(String),
    TypeChanged(String),
    YearChanged(String),
    SubjectChanged(String),
    SortChanged(SortKey),
    FiltersCleared,
    ShowAllToggled,
    /// The debounce window passed without further filter changes.
    DebounceElapsed,
    RowsLoaded {
        generation: u64,
        rows: Vec<StudyMaterial>,
    },
    RowsFailed {
        generation: u64,
        message: String,
    },
    TotalsLoaded(CatalogTotals),
    TotalsFailed(String),
    SubjectsLoaded(Vec<String>),
    SubjectsFailed(String),
    /// Remote rows changed.
    RemoteChange(RefreshPlan),
}

/// Effects requested by the reducer.
#[derive(Debug, Clone, PartialEq)]
pub enum ListingCommand {
    /// (Re)start the debounce timer.
    RestartDebounce,
    FetchRows { generation: u64, query: SelectQuery },
    FetchTotals,
    FetchSubjects,
}

/// Result of one reduction step.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub state: ListingState,
    pub commands: Vec<ListingCommand>,
}

impl Transition {
    fn new(state: ListingState) -> Self {
        Self {
            state,
            commands: Vec::new(),
        }
    }

    fn with(mut self, command: ListingCommand) -> Self {
        self.commands.push(command);
        self
    }
}

pub fn reduce(state: ListingState, event: ListingEvent) -> Transition {
    match event {
        ListingEvent::Mounted => Transition::new(state)
            .with(ListingCommand::FetchTotals)
            .with(ListingCommand::FetchSubjects)
            .with(ListingCommand::RestartDebounce),

        ListingEvent::SearchChanged(value) => change_filters(state, |f| f.search = value),
        ListingEvent::MediumChanged(value) => change_filters(state, |f| f.medium = value),
        ListingEvent::GradeChanged(value) => change_filters(state, |f| f.grade = value),
        ListingEvent::TypeChanged(value) => change_filters(state, |f| f.material_type = value),
        ListingEvent::YearChanged(value) => change_filters(state, |f| f.year = value),
        ListingEvent::SubjectChanged(value) => change_filters(state, |f| f.subject = value),
        ListingEvent::SortChanged(sort) => change_filters(state, |f| f.sort = sort),
        ListingEvent::FiltersCleared => change_filters(state, |f| {
            *f = ListingFilters {
                sort: f.sort,
                ..Default::default()
            }
        }),

        ListingEvent::ShowAllToggled => {
            let show_all = !state.show_all;
            Transition::new(ListingState { show_all, ..state })
        }

        ListingEvent::DebounceElapsed => issue_rows_request(state),

        ListingEvent::RowsLoaded { generation, rows } => {
            if generation != state.issued_generation {
                debug!(
                    "Discarding stale rows for generation {} (latest {})",
                    generation, state.issued_generation
                );
                return Transition::new(state);
            }
            Transition::new(ListingState {
                rows,
                loading: false,
                applied_generation: generation,
                ..state
            })
        }

        ListingEvent::RowsFailed {
            generation,
            message,
        } => {
            warn!("Error fetching materials: {}", message);
            if generation != state.issued_generation {
                return Transition::new(state);
            }
            Transition::new(ListingState {
                loading: false,
                ..state
            })
        }

        ListingEvent::TotalsLoaded(totals) => Transition::new(ListingState { totals, ..state }),
        ListingEvent::TotalsFailed(message) => {
            warn!("Error fetching download totals: {}", message);
            Transition::new(state)
        }

        ListingEvent::SubjectsLoaded(subjects) => {
            Transition::new(ListingState { subjects, ..state })
        }
        ListingEvent::SubjectsFailed(message) => {
            warn!("Error fetching subjects: {}", message);
            Transition::new(state)
        }

        ListingEvent::RemoteChange(plan) => apply_remote_change(state, plan),
    }
}

fn change_filters<F>(state: ListingState, edit: F) -> Transition
where
    F: FnOnce(&mut ListingFilters),
{
    let mut filters = state.filters.clone();
    edit(&mut filters);
    if filters == state.filters {
        return Transition::new(state);
    }
    Transition::new(ListingState { filters, ..state }).with(ListingCommand::RestartDebounce)
}

fn issue_rows_request(state: ListingState) -> Transition {
    let generation = state.issued_generation + 1;
    match build_listing_query(&state.filters) {
        Ok(query) => Transition::new(ListingState {
            loading: true,
            filter_error: None,
            issued_generation: generation,
            ..state
        })
        .with(ListingCommand::FetchRows { generation, query }),
        Err(e) => {
            // Nothing can match; show an empty list without asking the backend.
            warn!("Not querying materials: {}", e);
            Transition::new(ListingState {
                rows: Vec::new(),
                loading: false,
                filter_error: Some(e),
                issued_generation: generation,
                applied_generation: generation,
                ..state
            })
        }
    }
}

fn apply_remote_change(mut state: ListingState, plan: RefreshPlan) -> Transition {
    for patched in &plan.patched_rows {
        if let Some(row) = state.rows.iter_mut().find(|r| r.id == patched.id) {
            *row = patched.clone();
        }
    }

    let mut transition = if plan.refresh_listing {
        issue_rows_request(state)
    } else {
        Transition::new(state)
    };
    if plan.refresh_totals {
        transition = transition.with(ListingCommand::FetchTotals);
    }
    if plan.refresh_subjects {
        transition = transition.with(ListingCommand::FetchSubjects);
    }
    transition
}
