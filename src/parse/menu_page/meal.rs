use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// One ordering option of a single day, e.g. "Oběd 1".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MealEntry {
    pub id: String,
    #[serde(rename = "type")]
    pub meal_type: String,
    pub name: String,
}

impl MealEntry {
    /// Identifier derived from the day's date and the meal type. Stable
    /// across repeated scrapes as long as the upstream page keeps the date.
    pub fn date_id(date: NaiveDate, meal_type: &str) -> String {
        format!(
            "{:04}{:02}{:02}-{}",
            date.year(),
            date.month(),
            date.day(),
            type_token(meal_type)
        )
    }

    /// Positional identifier used when the day heading carries no parseable
    /// date. Unique within one snapshot only; callers must not expect it to
    /// survive a rescrape.
    pub fn positional_id(day_index: usize, meal_type: &str, position: usize) -> String {
        format!("{day_index}_{}_{position}", type_token(meal_type))
    }
}

fn type_token(meal_type: &str) -> String {
    meal_type.chars().filter(|c| !c.is_whitespace()).collect()
}
