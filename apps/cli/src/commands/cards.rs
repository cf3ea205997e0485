use clap::{Args, Subcommand};

use studyshare_core::revision::{card_by_id, saved_cards_text, subjects, Deck, Level};

use crate::main_lib::AppState;

#[derive(Args, Debug)]
pub struct CardsArgs {
    #[command(subcommand)]
    pub command: CardsCommand,
}

#[derive(Subcommand, Debug)]
pub enum CardsCommand {
    /// Subjects with cards
    Subjects,
    /// Show one card of a deck
    Show {
        subject: String,
        /// O/L or A/L
        #[arg(long, default_value = "O/L")]
        level: Level,
        /// Steps from the first card; negative values go backwards
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        step: i64,
    },
    /// Save or unsave a card
    Save { id: u32 },
    /// Print every saved card
    Saved,
}

pub fn run(state: &AppState, args: CardsArgs) -> anyhow::Result<()> {
    match args.command {
        CardsCommand::Subjects => {
            for subject in subjects() {
                println!("{}", subject);
            }
        }
        CardsCommand::Show {
            subject,
            level,
            step,
        } => {
            let mut deck = Deck::new(&subject, level);
            if deck.is_empty() {
                anyhow::bail!("No {} cards for '{}'", level, subject);
            }
            for _ in 0..step.unsigned_abs() {
                if step > 0 {
                    deck.next();
                } else {
                    deck.previous();
                }
            }
            let saved = state.revision.saved()?;
            if let Some(card) = deck.current() {
                let marker = if saved.contains(card.id) { " (saved)" } else { "" };
                println!(
                    "Card {}/{} #{}{}",
                    deck.position() + 1,
                    deck.len(),
                    card.id,
                    marker
                );
                println!("{}", card.copy_text());
            }
        }
        CardsCommand::Save { id } => {
            let card = card_by_id(id).ok_or_else(|| anyhow::anyhow!("No card with id {}", id))?;
            let saved = state.revision.toggle_saved(id)?;
            let verb = if saved { "Saved" } else { "Removed" };
            println!("{} '{}'", verb, card.title);
        }
        CardsCommand::Saved => {
            let cards = state.revision.saved_cards()?;
            match saved_cards_text(&cards) {
                Some(text) => print!("{}", text),
                None => println!("No saved cards."),
            }
        }
    }
    Ok(())
}
