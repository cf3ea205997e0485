use std::path::PathBuf;

use anyhow::Context;
use chrono::{Local, NaiveDate};
use clap::{Args, Subcommand};

use studyshare_core::planner::{export_schedule, share_summary, EntryStatus, StudyPlan};

use crate::main_lib::AppState;

#[derive(Args, Debug)]
pub struct PlannerArgs {
    #[command(subcommand)]
    pub command: PlannerCommand,
}

#[derive(Subcommand, Debug)]
pub enum PlannerCommand {
    /// Show the plan and schedule
    Show,
    AddSubject { subject: String },
    RemoveSubject { subject: String },
    /// Set the exam date (YYYY-MM-DD)
    ExamDate { date: NaiveDate },
    Hours { hours: u32 },
    /// Split the days until the exam across the subjects
    Generate,
    /// Mark a schedule entry done or not done
    Toggle { id: String },
    /// Write the schedule as plain text
    Export {
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print a short summary to share
    Share,
}

pub fn run(state: &AppState, args: PlannerArgs) -> anyhow::Result<()> {
    let today = Local::now().date_naive();
    let planner = &state.planner;

    match args.command {
        PlannerCommand::Show => print_plan(&planner.load()?, today),
        PlannerCommand::AddSubject { subject } => {
            if !planner.update(|plan| Ok(plan.add_subject(&subject)))? {
                println!("'{}' is already in the plan", subject.trim());
            }
        }
        PlannerCommand::RemoveSubject { subject } => {
            planner.update(|plan| {
                plan.remove_subject(&subject);
                Ok(())
            })?;
        }
        PlannerCommand::ExamDate { date } => {
            planner.update(|plan| {
                plan.exam_date = Some(date);
                Ok(())
            })?;
            println!("{} days until the exam", planner.load()?.days_until_exam(today));
        }
        PlannerCommand::Hours { hours } => planner.update(|plan| plan.set_hours_per_day(hours))?,
        PlannerCommand::Generate => {
            planner.update(|plan| plan.generate_schedule(today))?;
            print_plan(&planner.load()?, today);
        }
        PlannerCommand::Toggle { id } => {
            let done = planner.update(|plan| {
                plan.toggle_complete(&id);
                Ok(plan.is_complete(&id))
            })?;
            println!("{} marked {}", id, if done { "done" } else { "not done" });
        }
        PlannerCommand::Export { output } => {
            let text = export_schedule(&planner.load()?)
                .context("No schedule yet; run `studyshare planner generate` first")?;
            match output {
                Some(path) => std::fs::write(&path, text)
                    .with_context(|| format!("Could not write {}", path.display()))?,
                None => print!("{}", text),
            }
        }
        PlannerCommand::Share => {
            let text = share_summary(&planner.load()?, today)
                .context("No schedule yet; run `studyshare planner generate` first")?;
            print!("{}", text);
        }
    }
    Ok(())
}

fn print_plan(plan: &StudyPlan, today: NaiveDate) {
    match plan.exam_date {
        Some(date) => println!("Exam: {} ({} days left)", date, plan.days_until_exam(today)),
        None => println!("Exam: not set"),
    }
    println!("Subjects: {}", plan.subjects.join(", "));
    println!("Hours per day: {}", plan.hours_per_day);

    let Some(schedule) = &plan.schedule else {
        return;
    };
    println!(
        "Progress: {}/{} days ({}%)",
        plan.completed_count(),
        schedule.len(),
        plan.progress_percent()
    );
    for entry in schedule {
        let marker = match plan.entry_status(entry, today) {
            EntryStatus::Completed => "[x]",
            EntryStatus::Today => "[>]",
            EntryStatus::Missed => "[!]",
            EntryStatus::Upcoming => "[ ]",
        };
        println!(
            "{} {} {} {} {}h  {}  ({})",
            marker, entry.date, entry.day, entry.subject, entry.hours, entry.topic, entry.id
        );
    }
}
