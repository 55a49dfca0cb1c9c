use std::ops::RangeInclusive;

use chrono::NaiveDate;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::parse::{DayBucket, MenuSnapshot};

/// Days shown by default: two days back through three days ahead.
pub const DEFAULT_WINDOW: RangeInclusive<i64> = -2..=3;

/// Windowing is skipped when it would leave fewer days than this; a sparse
/// upstream snapshot is more useful whole than over-filtered.
const WINDOW_MIN_DAYS: usize = 2;

/// A day bucket annotated with its signed distance from the reference day:
/// 0 is today, positive is future, negative is past.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedDay {
    distance: i64,
    bucket: DayBucket,
}

impl RankedDay {
    pub const fn distance(&self) -> i64 {
        self.distance
    }

    pub const fn bucket(&self) -> &DayBucket {
        &self.bucket
    }
}

/// The ranked form of a snapshot. Serializes exactly like [`MenuSnapshot`]:
/// a map from day label to meals, in ranked order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RankedMenu {
    days: Vec<RankedDay>,
}

impl RankedMenu {
    pub fn days(&self) -> &[RankedDay] {
        &self.days
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

impl Serialize for RankedMenu {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for day in self.days() {
            map.serialize_entry(day.bucket().label(), day.bucket().meals())?;
        }
        map.end()
    }
}

/// Orders the snapshot's days by closeness to `today`: today itself first,
/// then upcoming days nearest-first, then past days most-recent-first.
/// Buckets whose heading yielded no date cannot be placed and are dropped.
pub fn ranked(snapshot: &MenuSnapshot, today: NaiveDate) -> RankedMenu {
    let mut days: Vec<RankedDay> = snapshot
        .days()
        .iter()
        .filter_map(|bucket| {
            bucket.date().map(|date| RankedDay {
                distance: (date - today).num_days(),
                bucket: bucket.clone(),
            })
        })
        .collect();
    // stable sort keeps the page's order for same-date headings
    days.sort_by_key(|day| sort_key(day.distance));
    RankedMenu { days }
}

/// Like [`ranked`], but narrowed to a window of distances around today.
/// Falls back to the full ranked set when the window keeps too few days.
pub fn ranked_within(
    snapshot: &MenuSnapshot,
    today: NaiveDate,
    window: RangeInclusive<i64>,
) -> RankedMenu {
    let full = ranked(snapshot, today);
    let days: Vec<RankedDay> = full
        .days
        .iter()
        .filter(|day| window.contains(&day.distance()))
        .cloned()
        .collect();
    if days.len() < WINDOW_MIN_DAYS {
        full
    } else {
        RankedMenu { days }
    }
}

const fn sort_key(distance: i64) -> (u8, i64) {
    if distance == 0 {
        (0, 0)
    } else if distance > 0 {
        (1, distance)
    } else {
        (2, -distance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::MealEntry;
    use std::fs;

    fn day(label: &str, meals: &[(&str, &str)]) -> DayBucket {
        let date = crate::parse::day_label::date_in(label);
        let meals = meals
            .iter()
            .enumerate()
            .map(|(i, (meal_type, name))| MealEntry {
                id: date.map_or_else(
                    || MealEntry::positional_id(0, meal_type, i),
                    |d| MealEntry::date_id(d, meal_type),
                ),
                meal_type: (*meal_type).to_owned(),
                name: (*name).to_owned(),
            })
            .collect();
        DayBucket::new(label.to_owned(), date, meals)
    }

    fn snapshot(days: Vec<DayBucket>) -> MenuSnapshot {
        MenuSnapshot::from_days(days)
    }

    fn labels(menu: &RankedMenu) -> Vec<&str> {
        menu.days().iter().map(|d| d.bucket().label()).collect()
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 2, 26).unwrap()
    }

    #[test]
    fn today_first_then_future_then_past() {
        let menu = ranked(
            &snapshot(vec![
                day("Pondělí 24.02.2025", &[("Oběd 1", "a")]),
                day("Úterý 25.02.2025", &[("Oběd 1", "b")]),
                day("Středa 26.02.2025", &[("Oběd 1", "c")]),
                day("Pátek 28.02.2025", &[("Oběd 1", "d")]),
                day("Čtvrtek 27.02.2025", &[("Oběd 1", "e")]),
            ]),
            today(),
        );
        assert_eq!(
            labels(&menu),
            [
                "Středa 26.02.2025",
                "Čtvrtek 27.02.2025",
                "Pátek 28.02.2025",
                "Úterý 25.02.2025",
                "Pondělí 24.02.2025",
            ]
        );
        assert_eq!(
            menu.days().iter().map(RankedDay::distance).collect::<Vec<_>>(),
            [0, 1, 2, -1, -2]
        );
    }

    #[test]
    fn undated_headings_are_dropped_from_ranked_output() {
        let source = snapshot(vec![
            day("Jídelníček na tento týden", &[("Oběd 1", "a")]),
            day("Středa 26.02.2025", &[("Oběd 1", "b")]),
        ]);
        assert_eq!(source.len(), 2);
        let menu = ranked(&source, today());
        assert_eq!(labels(&menu), ["Středa 26.02.2025"]);
    }

    #[test]
    fn zero_parseable_days_rank_to_an_empty_menu() {
        let menu = ranked(
            &snapshot(vec![day("Jídelníček", &[("Oběd 1", "a")])]),
            today(),
        );
        assert!(menu.is_empty());
        assert!(ranked(&MenuSnapshot::default(), today()).is_empty());
    }

    #[test]
    fn window_keeps_nearby_days() {
        let menu = ranked_within(
            &snapshot(vec![
                day("Sobota 22.02.2025", &[("Oběd 1", "a")]),
                day("Středa 26.02.2025", &[("Oběd 1", "b")]),
                day("Čtvrtek 27.02.2025", &[("Oběd 1", "c")]),
                day("Pondělí 10.03.2025", &[("Oběd 1", "d")]),
            ]),
            today(),
            DEFAULT_WINDOW,
        );
        assert_eq!(labels(&menu), ["Středa 26.02.2025", "Čtvrtek 27.02.2025"]);
    }

    #[test]
    fn window_is_skipped_when_it_would_leave_too_little() {
        let source = snapshot(vec![
            day("Středa 26.02.2025", &[("Oběd 1", "a")]),
            day("Pondělí 10.03.2025", &[("Oběd 1", "b")]),
        ]);
        let menu = ranked_within(&source, today(), DEFAULT_WINDOW);
        // only one day falls inside [-2, 3], so the full set comes back
        assert_eq!(menu.len(), 2);
        assert_eq!(menu, ranked(&source, today()));
    }

    #[test]
    fn ranked_example_week_serializes_in_order() {
        let html = fs::read_to_string("./src/parse/html_examples/menu_page/week.html").unwrap();
        let source = MenuSnapshot::from_html(&html);
        let menu = ranked(&source, today());
        assert_eq!(labels(&menu), ["Středa 26.02.2025", "Čtvrtek 27.02.2025"]);
        assert_eq!(menu.days()[0].distance(), 0);
        assert_eq!(menu.days()[0].bucket().meals().len(), 2);
        assert_eq!(menu.days()[1].distance(), 1);
        assert_eq!(menu.days()[1].bucket().meals().len(), 1);
        let json = serde_json::to_string(&menu).unwrap();
        assert!(json.find("Středa").unwrap() < json.find("Čtvrtek").unwrap());
    }
}
