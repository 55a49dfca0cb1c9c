use std::collections::{HashMap, HashSet};
use std::fmt;

use scraper::Html;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::day::DayBucket;
use super::meal::MealEntry;
use super::{fallback, structured};
use crate::parse::{day_label, normalize::normalize_whitespace};

/// One complete extraction result: day buckets keyed by their heading text,
/// in the order the page (or a later ranking pass) produced them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MenuSnapshot {
    days: Vec<DayBucket>,
}

/// Extraction strategies in the order they are attempted. The next one runs
/// only when the previous one found no meals at all.
const STRATEGIES: [(&str, fn(&Html) -> SnapshotBuilder); 3] = [
    ("structured", structured::scan),
    ("tabular", fallback::tabular_scan),
    ("generic", fallback::generic_scan),
];

impl MenuSnapshot {
    /// Extracts a snapshot from the raw HTML of the menu page. Never fails:
    /// a page where nothing matches yields an empty snapshot.
    pub fn from_html(html: &str) -> Self {
        let document = Html::parse_document(html);
        for (name, scan) in STRATEGIES {
            let found = scan(&document);
            if found.is_empty() {
                log::debug!("{name} scan found no meals, falling through");
                continue;
            }
            return found.finish();
        }
        log::warn!("no scan strategy matched the menu page, returning an empty snapshot");
        Self::default()
    }

    pub(crate) fn from_days(days: Vec<DayBucket>) -> Self {
        Self { days }
    }

    pub fn days(&self) -> &[DayBucket] {
        &self.days
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

/// Accumulates `(day label, meal type, meal name)` triples while a scan
/// walks the page, merging duplicate day headings and keeping the first
/// meal seen for each type within a day.
pub(super) struct SnapshotBuilder {
    days: Vec<(String, Vec<RawMeal>)>,
    by_label: HashMap<String, usize>,
}

pub(super) struct RawMeal {
    meal_type: String,
    name: String,
}

impl SnapshotBuilder {
    pub fn new() -> Self {
        Self {
            days: Vec::new(),
            by_label: HashMap::new(),
        }
    }

    /// Adds one meal candidate. Candidates with an empty label, type or
    /// name after whitespace normalization are rejected.
    pub fn push(&mut self, label: &str, meal_type: &str, name: &str) {
        let label = normalize_whitespace(label);
        let meal_type = normalize_whitespace(meal_type);
        let name = normalize_whitespace(name);
        if label.is_empty() || meal_type.is_empty() || name.is_empty() {
            return;
        }
        let index = match self.by_label.get(label.as_ref()) {
            Some(&i) => i,
            None => {
                self.days.push((label.clone().into_owned(), Vec::new()));
                let i = self.days.len() - 1;
                self.by_label.insert(label.into_owned(), i);
                i
            }
        };
        let meals = &mut self.days[index].1;
        // first entry per type wins; the page repeats options per serving
        // counter and we want one representative per slot
        if meals.iter().any(|m| m.meal_type == meal_type.as_ref()) {
            return;
        }
        meals.push(RawMeal {
            meal_type: meal_type.into_owned(),
            name: name.into_owned(),
        });
    }

    /// True when no meal was accepted anywhere, which makes the cascade try
    /// the next strategy.
    pub fn is_empty(&self) -> bool {
        self.days.iter().all(|(_, meals)| meals.is_empty())
    }

    /// Parses dates out of the day headings and assigns identifiers. An id
    /// derived from `(date, type)` that is already taken (two headings
    /// naming the same date) degrades to the positional form so ids stay
    /// unique within the snapshot.
    pub fn finish(self) -> MenuSnapshot {
        let mut used_ids = HashSet::new();
        let days = self
            .days
            .into_iter()
            .filter(|(_, meals)| !meals.is_empty())
            .enumerate()
            .map(|(day_index, (label, meals))| {
                let date = day_label::date_in(&label);
                let meals = meals
                    .into_iter()
                    .enumerate()
                    .map(|(position, raw)| {
                        let id = date
                            .map(|d| MealEntry::date_id(d, &raw.meal_type))
                            .filter(|id| !used_ids.contains(id))
                            .unwrap_or_else(|| {
                                MealEntry::positional_id(day_index, &raw.meal_type, position)
                            });
                        used_ids.insert(id.clone());
                        MealEntry {
                            id,
                            meal_type: raw.meal_type,
                            name: raw.name,
                        }
                    })
                    .collect();
                DayBucket::new(label, date, meals)
            })
            .collect();
        MenuSnapshot::from_days(days)
    }
}

/// Serialized as the caller-facing JSON shape: an object mapping each day
/// label to its meals, in iteration order.
impl Serialize for MenuSnapshot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.days.len()))?;
        for day in &self.days {
            map.serialize_entry(day.label(), day.meals())?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for MenuSnapshot {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SnapshotVisitor;

        impl<'de> Visitor<'de> for SnapshotVisitor {
            type Value = MenuSnapshot;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map from day label to a list of meals")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut days = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((label, meals)) = access.next_entry::<String, Vec<MealEntry>>()? {
                    let date = day_label::date_in(&label);
                    days.push(DayBucket::new(label, date, meals));
                }
                Ok(MenuSnapshot { days })
            }
        }

        deserializer.deserialize_map(SnapshotVisitor)
    }
}
