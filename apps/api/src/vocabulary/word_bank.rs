/// Words handed out by the daily rotation. Order matters: the rotation walks it
/// front to back, so appending is safe but reordering changes past days.
pub static WORD_BANK: &[&str] = &[
    "ephemeral",
    "ubiquitous",
    "serendipity",
    "mellifluous",
    "labyrinthine",
    "eloquent",
    "pernicious",
    "benevolent",
    "cacophony",
    "diligent",
    "enigmatic",
    "fastidious",
    "gregarious",
    "harbinger",
    "idiosyncratic",
    "juxtapose",
    "laconic",
    "magnanimous",
    "nefarious",
    "obfuscate",
    "panacea",
    "quintessential",
    "resilient",
    "sagacious",
    "tenacious",
    "ubiquity",
    "vicarious",
    "wistful",
    "zealous",
    "ambivalent",
    "candor",
    "dichotomy",
    "effervescent",
    "frugal",
    "garrulous",
    "hubris",
    "impetuous",
    "jubilant",
    "kinetic",
    "lucid",
    "meticulous",
    "nostalgia",
    "ostentatious",
    "pragmatic",
    "quandary",
    "reticent",
    "sycophant",
    "transient",
    "unassuming",
    "venerable",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_bank_has_no_duplicates() {
        let mut words = WORD_BANK.to_vec();
        words.sort_unstable();
        words.dedup();
        assert_eq!(words.len(), WORD_BANK.len());
    }

    #[test]
    fn test_word_bank_holds_at_least_a_week() {
        assert!(WORD_BANK.len() >= 7);
    }
}
