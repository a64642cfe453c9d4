//! Loose human date parsing for the date-typed column: `MM/YYYY` or `YYYY`.

use crate::error::TranscodeError;
use time::{Date, Month};

/// Parse the two accepted human encodings into a concrete calendar date:
/// - `MM/YYYY` -> first day of that month
/// - `YYYY`    -> January 1 of that year
///
/// Anything else fails loudly with [`TranscodeError::MalformedDate`] carrying
/// the input verbatim. Silent coercion here would corrupt the loaded table,
/// so there is no fallback.
pub fn parse_loose_date(text: &str) -> Result<Date, TranscodeError> {
    let malformed = || TranscodeError::MalformedDate { text: text.to_string() };

    let parts: Vec<&str> = text.trim().split('/').collect();
    let (month_str, year_str) = match parts.as_slice() {
        [year] => (None, *year),
        [month, year] => (Some(*month), *year),
        _ => return Err(malformed()),
    };

    let year: i32 = year_str.parse().map_err(|_| malformed())?;
    let month: u8 = match month_str {
        Some(m) => m.parse().map_err(|_| malformed())?,
        None => 1,
    };
    let month = Month::try_from(month).map_err(|_| malformed())?;

    Date::from_calendar_date(year, month, 1).map_err(|_| malformed())
}
