//! The expense record rendered onto the summary page

use chrono::NaiveDate;

use crate::amount::Amount;

/// One hospitality expense, built only from a validated form
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseRecord {
    reason: String,
    date: NaiveDate,
    attendees: Vec<String>,
    amount: Amount,
    tip: Amount,
}

impl ExpenseRecord {
    /// `None` when `amount + tip` does not fit, so `total()` is always exact
    pub(crate) fn new(
        reason: String,
        date: NaiveDate,
        attendees: Vec<String>,
        amount: Amount,
        tip: Amount,
    ) -> Option<Self> {
        amount.checked_add(tip)?;
        Some(Self { reason, date, attendees, amount, tip })
    }

    /// Occasion of the hospitality
    pub fn reason(&self) -> &str {
        &self.reason
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Attendees in the order they were entered
    pub fn attendees(&self) -> &[String] {
        &self.attendees
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn tip(&self) -> Amount {
        self.tip
    }

    /// Amount plus tip
    pub fn total(&self) -> Amount {
        // Checked in `new`
        Amount::from_cents(self.amount.cents() + self.tip.cents())
    }
}

/// Split newline-delimited attendee text into trimmed, non-empty names
pub fn parse_attendees(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}
