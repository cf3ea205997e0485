use studyshare_core::stats::{LabelCount, StatsServiceTrait};
use studyshare_core::utils::text_utils::format_compact_number;

use crate::main_lib::AppState;

pub async fn run(state: &AppState) -> anyhow::Result<()> {
    let report = state.stats.impact_report().await?;
    let totals = &report.totals;

    println!("Downloads:    {}", format_compact_number(totals.total_downloads));
    println!("Materials:    {}", format_compact_number(totals.total_materials as i64));
    println!("Contributors: {}", totals.total_contributors);
    println!(
        "Requests:     {} ({} fulfilled, {}%)",
        totals.total_requests,
        totals.requests_fulfilled,
        report.fulfilment_rate()
    );

    print_counts("By grade", &report.by_grade);
    print_counts("By type", &report.by_type);
    print_counts("By subject", &report.by_subject);
    print_counts("Top contributors", &report.top_contributors);

    println!("\nRecent uploads");
    for material in &report.recent {
        println!("  {} ({})", material.title, material.author_display());
    }

    let gaps = &report.gaps;
    println!("\nCoverage gaps");
    println!("  Missing:   {}", join_or_none(&gaps.missing));
    let low: Vec<String> = gaps
        .low
        .iter()
        .map(|c| format!("{} ({})", c.label, c.count))
        .collect();
    println!("  Few files: {}", join_or_none(&low));
    println!("  Requested: {}", join_or_none(&gaps.requested));
    Ok(())
}

fn print_counts(title: &str, counts: &[LabelCount]) {
    println!("\n{}", title);
    for count in counts {
        println!("  {:<24} {}", count.label, count.count);
    }
}

fn join_or_none(values: &[String]) -> String {
    if values.is_empty() {
        "none".to_string()
    } else {
        values.join(", ")
    }
}
