// File: ./src/model/normalize.rs
// Canonicalizes typed due-date shorthand before it is sent to the resolver
/// Sent to the service to clear a task's due date.
pub const NO_DATE: &str = "no date";

const ABBREVIATIONS: &[(&str, &str)] = &[
    ("tmrw", "tomorrow"),
    ("tmr", "tomorrow"),
    ("tom", "tomorrow"),
    ("tmw", "tomorrow"),
    ("tod", "today"),
    ("tdy", "today"),
    ("yday", "yesterday"),
    ("yest", "yesterday"),
    ("mon", "monday"),
    ("tue", "tuesday"),
    ("tues", "tuesday"),
    ("wed", "wednesday"),
    ("thu", "thursday"),
    ("thur", "thursday"),
    ("thurs", "thursday"),
    ("fri", "friday"),
    ("sat", "saturday"),
    ("sun", "sunday"),
];

/// Expands whole-word abbreviations ("tmrw", "fri", ...) and collapses whitespace.
///
/// Matching ignores case, but words that are not abbreviations keep their casing,
/// so "NEXT FRI" becomes "NEXT friday" and "March 15" is returned as typed.
/// Punctuation hugging a word is kept around the expansion ("(fri)" becomes
/// "(friday)"); punctuation inside a word makes it opaque ("3|pm", "fri|3pm").
/// Whitespace-only input yields an empty string. Never fails.
pub fn normalize_due_string(input: &str) -> String {
    input
        .split_whitespace()
        .map(expand_word)
        .collect::<Vec<_>>()
        .join(" ")
}

/// The due-string a submit should send: the normalized text, or [`NO_DATE`] when
/// nothing meaningful was typed.
pub fn due_string_for_submit(input: &str) -> String {
    let normalized = normalize_due_string(input);
    if normalized.is_empty() {
        NO_DATE.to_string()
    } else {
        normalized
    }
}

fn expand_word(word: &str) -> String {
    let is_punct = |c: char| c.is_ascii_punctuation();
    let lead = word.len() - word.trim_start_matches(is_punct).len();
    let core = word[lead..].trim_end_matches(is_punct);
    match expand_abbreviation(core) {
        Some(full) => format!("{}{}{}", &word[..lead], full, &word[lead + core.len()..]),
        None => word.to_string(),
    }
}

fn expand_abbreviation(word: &str) -> Option<&'static str> {
    ABBREVIATIONS
        .iter()
        .find(|(abbr, _)| abbr.eq_ignore_ascii_case(word))
        .map(|(_, full)| *full)
}
