use anyhow::Context;
use clap::Args;
use tokio::sync::mpsc;

use studyshare_backend::RealtimeClient;
use studyshare_core::constants::NOTES_TABLE;
use studyshare_core::listing::{spawn_listing, ListingEvent, ListingState, SortKey};
use studyshare_core::materials::{CatalogTotals, StudyMaterial};
use studyshare_core::realtime::invalidation_worker;
use studyshare_core::utils::text_utils::format_compact_number;

use crate::main_lib::AppState;

#[derive(Args, Debug, Default)]
pub struct ListingArgs {
    /// Matches title, subject, grade or author
    #[arg(short, long)]
    pub search: Option<String>,

    #[arg(long)]
    pub medium: Option<String>,

    #[arg(long)]
    pub grade: Option<String>,

    #[arg(long = "type")]
    pub material_type: Option<String>,

    #[arg(long)]
    pub year: Option<String>,

    #[arg(long)]
    pub subject: Option<String>,

    /// newest, oldest, most-downloaded or a-z
    #[arg(long, default_value = "newest")]
    pub sort: String,

    /// Show every row instead of the preview
    #[arg(long)]
    pub all: bool,
}

impl ListingArgs {
    fn events(&self) -> Vec<ListingEvent> {
        let mut events = Vec::new();
        let text_filters: [(&Option<String>, fn(String) -> ListingEvent); 6] = [
            (&self.search, ListingEvent::SearchChanged),
            (&self.medium, ListingEvent::MediumChanged),
            (&self.grade, ListingEvent::GradeChanged),
            (&self.material_type, ListingEvent::TypeChanged),
            (&self.year, ListingEvent::YearChanged),
            (&self.subject, ListingEvent::SubjectChanged),
        ];
        for (value, event) in text_filters {
            if let Some(value) = value {
                events.push(event(value.clone()));
            }
        }
        let sort = SortKey::parse_or_default(&self.sort);
        if sort != SortKey::default() {
            events.push(ListingEvent::SortChanged(sort));
        }
        if self.all {
            events.push(ListingEvent::ShowAllToggled);
        }
        events
    }
}

pub async fn list(state: &AppState, args: ListingArgs) -> anyhow::Result<()> {
    let (handle, _task) = spawn_listing(state.materials.clone(), state.listing_config);
    handle.dispatch(ListingEvent::Mounted);
    for event in args.events() {
        handle.dispatch(event);
    }

    let listing = handle
        .wait_for(|s| s.applied_generation >= 1 && !s.loading)
        .await
        .context("Listing stopped before loading")?;
    print_listing(&listing, state.listing_config.preview_size);
    Ok(())
}

pub async fn watch(state: &AppState, args: ListingArgs) -> anyhow::Result<()> {
    let (handle, _task) = spawn_listing(state.materials.clone(), state.listing_config);

    let subscription = match &state.backend {
        Some(backend) => {
            let (tx, rx) = mpsc::unbounded_channel();
            let subscription = RealtimeClient::new(backend.clone())
                .subscribe(NOTES_TABLE, tx)
                .await?;
            tokio::spawn(invalidation_worker(
                rx,
                NOTES_TABLE.to_string(),
                state.coalesce_window,
                handle.clone(),
            ));
            Some(subscription)
        }
        None => {
            tracing::warn!("Offline mode: live updates are disabled");
            None
        }
    };

    handle.dispatch(ListingEvent::Mounted);
    for event in args.events() {
        handle.dispatch(event);
    }

    let mut updates = handle.subscribe();
    let mut shown: Option<(CatalogTotals, Vec<StudyMaterial>)> = None;
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let current = updates.borrow_and_update().clone();
                if current.loading || current.applied_generation == 0 {
                    continue;
                }
                let snapshot = (current.totals, current.rows.clone());
                if shown.as_ref() == Some(&snapshot) {
                    continue;
                }
                print_listing(&current, state.listing_config.preview_size);
                println!();
                shown = Some(snapshot);
            }
        }
    }

    if let Some(subscription) = subscription {
        subscription.unsubscribe().await;
    }
    Ok(())
}

fn print_listing(state: &ListingState, preview_size: usize) {
    println!(
        "{} materials | {} downloads",
        format_compact_number(state.totals.total_materials as i64),
        format_compact_number(state.totals.total_downloads)
    );
    if let Some(error) = &state.filter_error {
        println!("{}", error);
    }
    let summary = state.filters.summary();
    if !summary.is_empty() {
        println!("Filters: {}", summary);
    }

    let rows = state.visible_rows(preview_size);
    if rows.is_empty() {
        println!("No materials found.");
        return;
    }
    for material in rows {
        print_material(material);
    }
    let hidden = state.rows.len() - rows.len();
    if hidden > 0 {
        println!("... {} more (use --all)", hidden);
    }
}

pub fn print_material(material: &StudyMaterial) {
    println!(
        "[{}] {} | {} | {} | {} | {} | {} downloads",
        material.id,
        material.title,
        material.subject.as_deref().unwrap_or("-"),
        material.grade,
        material.type_label(),
        material.author_display(),
        material.downloads
    );
}
