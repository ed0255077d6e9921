//! Dose-number suffix parsing for vaccine names.
//!
//! Grammar (whitespace `ws` is any Unicode whitespace):
//!
//! ```text
//! name   := prefix "(" ws* "Dose" ws* digits ws* ")" ws*
//! digits := [0-9]+
//! ```
//!
//! `"Dose"` is matched ASCII case-insensitively and the suffix must be the
//! last thing in the name. Anything else is a name without a dose suffix.

/// A parsed trailing `(Dose N)` suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DoseSuffix<'a> {
    /// Everything before the opening parenthesis, untouched.
    pub prefix: &'a str,
    /// Dose index.
    pub number: u32,
}

/// Parses a trailing `(Dose N)` suffix.
///
/// Returns `None` when the name does not end with a well-formed suffix.
#[must_use]
pub fn parse_dose_suffix(name: &str) -> Option<DoseSuffix<'_>> {
    let (prefix, rest) = name.trim_end().rsplit_once('(')?;
    let inner = rest.strip_suffix(')')?.trim();

    let keyword = inner.get(..4)?;
    if !keyword.eq_ignore_ascii_case("dose") {
        return None;
    }
    let digits = inner.get(4..)?.trim_start();
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let number = digits.parse().ok()?;
    Some(DoseSuffix { prefix, number })
}

/// Computes the name of the dose following `name`.
///
/// `"<prefix>(Dose N)"` becomes `"<prefix>(Dose N+1)"`, normalizing the
/// spacing inside the parentheses. Any other name gets `" (Dose 2)"`
/// appended.
#[must_use]
pub fn next_dose_name(name: &str) -> String {
    match parse_dose_suffix(name) {
        Some(DoseSuffix { prefix, number }) => match number.checked_add(1) {
            Some(next) => format!("{prefix}(Dose {next})"),
            None => format!("{name} (Dose 2)"),
        },
        None => format!("{name} (Dose 2)"),
    }
}
