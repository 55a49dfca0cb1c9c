use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;

/// The ordering system writes dates as `26.02.2025`, sometimes with stray
/// whitespace around the dots.
fn date_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(\d{1,2})\s*\.\s*(\d{1,2})\s*\.\s*(\d{4})").expect("regex should be valid")
    })
}

fn weekday_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)\b(pondělí|úterý|středa|čtvrtek|pátek|sobota|neděle|monday|tuesday|wednesday|thursday|friday|saturday|sunday)\b",
        )
        .expect("regex should be valid")
    })
}

/// First calendar date found in a day heading, if any. Nonsense dates
/// (`31.02.2025`) are rejected.
pub fn date_in(text: &str) -> Option<NaiveDate> {
    let caps = date_regex().captures(text)?;
    let day = caps[1].parse().ok()?;
    let month = caps[2].parse().ok()?;
    let year = caps[3].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Whether a text fragment could be a day heading: it either embeds a date
/// or names a weekday.
pub fn looks_like_day_heading(text: &str) -> bool {
    date_in(text).is_some() || weekday_regex().is_match(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_date_from_heading() {
        assert_eq!(
            date_in("Středa 26.02.2025"),
            NaiveDate::from_ymd_opt(2025, 2, 26)
        );
        assert_eq!(
            date_in("obědy na 3. 1. 2024, výdej od 11:30"),
            NaiveDate::from_ymd_opt(2024, 1, 3)
        );
    }

    #[test]
    fn rejects_missing_or_impossible_dates() {
        assert_eq!(date_in("Menu of the Week"), None);
        assert_eq!(date_in("31.02.2025"), None);
        assert_eq!(date_in("1.2.25"), None);
    }

    #[test]
    fn recognizes_weekday_headings() {
        assert!(looks_like_day_heading("Úterý"));
        assert!(looks_like_day_heading("wednesday specials"));
        assert!(looks_like_day_heading("27.02.2025"));
        assert!(!looks_like_day_heading("Oběd 1"));
    }
}
