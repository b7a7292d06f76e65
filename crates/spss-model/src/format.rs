//! Display formatting shared by the dashboard, detail view and reports

use chrono::{DateTime, Datelike, NaiveDate, Utc};

/// Placeholder shown for missing values
pub const EMPTY: &str = "—";

/// Turn a stored key into a label: `life_member` → `Life Member`
#[must_use]
pub fn format_label(key: &str) -> String {
    if key.is_empty() {
        return EMPTY.to_string();
    }
    let mut out = String::with_capacity(key.len());
    let mut prev_is_word = false;
    for c in key.chars() {
        let c = if c == '_' { ' ' } else { c };
        let is_word = c.is_alphanumeric();
        if is_word && !prev_is_word {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        prev_is_word = is_word;
    }
    out
}

/// Parse a `YYYY-MM-DD` date of birth
#[must_use]
pub fn parse_dob(dob: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(dob.trim(), "%Y-%m-%d").ok()
}

/// `YYYY-MM-DD` → `DD/MM/YYYY`
#[must_use]
pub fn format_dob(dob: &str) -> String {
    parse_dob(dob).map_or_else(|| EMPTY.to_string(), |d| d.format("%d/%m/%Y").to_string())
}

/// Age in whole years on `today`
///
/// `None` for unparseable or future dates.
#[must_use]
pub fn age_on(dob: &str, today: NaiveDate) -> Option<u32> {
    let birth = parse_dob(dob)?;
    let mut age = today.year() - birth.year();
    if (today.month(), today.day()) < (birth.month(), birth.day()) {
        age -= 1;
    }
    u32::try_from(age).ok()
}

/// `12 Mar 2025, 09:30`
#[must_use]
pub fn format_timestamp(ts: Option<&DateTime<Utc>>) -> String {
    ts.map_or_else(
        || EMPTY.to_string(),
        |t| t.format("%d %b %Y, %H:%M").to_string(),
    )
}

/// `n member` / `n members`
#[must_use]
pub fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

/// Value or the placeholder
#[inline]
#[must_use]
pub fn or_dash(value: &str) -> &str {
    if value.trim().is_empty() {
        EMPTY
    } else {
        value
    }
}
