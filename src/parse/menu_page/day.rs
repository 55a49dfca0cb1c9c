use chrono::NaiveDate;

use super::meal::MealEntry;

/// One day of the menu: the raw heading text as it appeared on the page,
/// the date recovered from it (when the heading was parseable) and the
/// deduplicated meals offered that day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayBucket {
    label: String,
    date: Option<NaiveDate>,
    meals: Vec<MealEntry>,
}

impl DayBucket {
    pub fn new(label: String, date: Option<NaiveDate>, meals: Vec<MealEntry>) -> Self {
        Self { label, date, meals }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub const fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    pub fn meals(&self) -> &[MealEntry] {
        &self.meals
    }
}
