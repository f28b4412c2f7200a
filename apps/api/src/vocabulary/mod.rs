//! Daily word selection: a deterministic calendar rotation over a fixed bank.

use chrono::{Datelike, NaiveDate};

pub mod word_bank;

pub use word_bank::WORD_BANK;

/// Picks `count` consecutive words from `bank`, starting at a day-of-year offset.
///
/// Start index = `(ordinal0(date) * count) mod len(bank)`, wrapping around the
/// end of the bank. `count` is clamped to the bank size so a day never repeats a
/// word. The same date always yields the same words.
pub fn select_daily_words(bank: &[&str], date: NaiveDate, count: usize) -> Vec<String> {
    if bank.is_empty() {
        return Vec::new();
    }

    let count = count.min(bank.len());
    let start = (date.ordinal0() as usize * count) % bank.len();

    bank.iter()
        .cycle()
        .skip(start)
        .take(count)
        .map(|w| w.to_string())
        .collect()
}
