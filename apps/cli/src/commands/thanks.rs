use chrono::Utc;
use clap::{Args, Subcommand};

use studyshare_core::thanks::{
    filter_by_contributor, NewThankYouNote, ThankYouNote, ThanksServiceTrait,
};

use crate::main_lib::AppState;

#[derive(Args, Debug)]
pub struct ThanksArgs {
    #[command(subcommand)]
    pub command: ThanksCommand,
}

#[derive(Subcommand, Debug)]
pub enum ThanksCommand {
    /// Show the wall, newest first
    List {
        #[arg(long)]
        contributor: Option<String>,
    },
    /// Thank a contributor (or everyone)
    Send {
        #[arg(long, default_value = "")]
        name: String,
        #[arg(long)]
        message: String,
        /// Contributor to thank; omit for all contributors
        #[arg(long, default_value = "")]
        to: String,
        #[arg(long)]
        anonymous: bool,
    },
    /// Names that can be thanked
    Contributors,
}

pub async fn run(state: &AppState, args: ThanksArgs) -> anyhow::Result<()> {
    match args.command {
        ThanksCommand::List { contributor } => {
            let notes = state.thanks.list_notes().await;
            let shown = filter_by_contributor(&notes, contributor.as_deref());
            if shown.is_empty() {
                println!("No thank-you notes yet.");
            }
            for note in shown {
                print_note(note);
            }
        }
        ThanksCommand::Send {
            name,
            message,
            to,
            anonymous,
        } => {
            let note = state
                .thanks
                .submit_note(NewThankYouNote {
                    student_name: name,
                    message,
                    contributor_name: to,
                    anonymous,
                })
                .await?;
            print_note(&note);
        }
        ThanksCommand::Contributors => {
            for name in state.thanks.contributors().await? {
                println!("{}", name);
            }
        }
    }
    Ok(())
}

fn print_note(note: &ThankYouNote) {
    println!(
        "{} -> {} ({})",
        note.student_name,
        note.contributor_name,
        note.time_ago(Utc::now())
    );
    println!("    {}", note.message);
}
