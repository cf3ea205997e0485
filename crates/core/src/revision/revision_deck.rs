use super::revision_catalog::cards_for;
use super::revision_model::{Level, RevisionCard};

/// Cards of one subject and level with a cursor that wraps both ways.
#[derive(Debug, Clone)]
pub struct Deck {
    subject: String,
    level: Level,
    cards: Vec<&'static RevisionCard>,
    index: usize,
}

impl Deck {
    pub fn new(subject: &str, level: Level) -> Self {
        Self {
            subject: subject.to_string(),
            level,
            cards: cards_for(subject, level),
            index: 0,
        }
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Zero-based position of the current card.
    pub fn position(&self) -> usize {
        self.index
    }

    pub fn current(&self) -> Option<&'static RevisionCard> {
        self.cards.get(self.index).copied()
    }

    pub fn next(&mut self) -> Option<&'static RevisionCard> {
        if !self.cards.is_empty() {
            self.index = (self.index + 1) % self.cards.len();
        }
        self.current()
    }

    pub fn previous(&mut self) -> Option<&'static RevisionCard> {
        if !self.cards.is_empty() {
            self.index = (self.index + self.cards.len() - 1) % self.cards.len();
        }
        self.current()
    }

    pub fn cards(&self) -> &[&'static RevisionCard] {
        &self.cards
    }
}

/// All saved cards as one shareable text, numbered in save order.
pub fn saved_cards_text(cards: &[&RevisionCard]) -> Option<String> {
    if cards.is_empty() {
        return None;
    }
    let mut text = String::from("My Saved Revision Cards\n\n");
    for (index, card) in cards.iter().enumerate() {
        text.push_str(&format!("{}. {}\n{}\n\n", index + 1, card.title, card.content));
    }
    Some(text)
}
