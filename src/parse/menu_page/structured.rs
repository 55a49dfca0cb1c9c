use scraper::Html;

use super::snapshot::SnapshotBuilder;
use crate::parse::normalize::element_text;
use crate::static_selector;

/// Primary strategy: the ordering system renders one container per day with
/// a heading on top and one element per offered meal. Each meal item is
/// paired with the nearest preceding type label; items without their own
/// label inherit the last one seen.
pub(super) fn scan(document: &Html) -> SnapshotBuilder {
    static_selector!(DAY_SELECTOR <- "div.jidelnicekDen");
    static_selector!(HEADING_SELECTOR <- ".jidelnicekTop");
    static_selector!(ITEM_SELECTOR <- ".jidelnicekItem");
    static_selector!(TYPE_SELECTOR <- "span.smallBoldTitle");

    let mut out = SnapshotBuilder::new();
    for day in document.select(&DAY_SELECTOR) {
        let Some(heading) = day.select(&HEADING_SELECTOR).next() else {
            // a day block we cannot key on is useless
            continue;
        };
        let label = element_text(heading);
        let mut current_type = String::new();
        for item in day.select(&ITEM_SELECTOR) {
            if let Some(type_label) = item.select(&TYPE_SELECTOR).next() {
                current_type = element_text(type_label);
            }
            let text = element_text(item);
            // the item's flattened text repeats its own type label
            let name = text
                .strip_prefix(current_type.as_str())
                .unwrap_or(&text)
                .trim_start();
            out.push(&label, &current_type, name);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn pairs_items_with_preceding_type_labels() {
        let html = fs::read_to_string("./src/parse/html_examples/menu_page/week.html").unwrap();
        let document = Html::parse_document(&html);
        let snapshot = scan(&document).finish();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(
            snapshot.days()[0]
                .meals()
                .iter()
                .map(|m| m.meal_type.as_str())
                .collect::<Vec<_>>(),
            ["Oběd 1", "Oběd 2"]
        );
    }

    #[test]
    fn skips_items_with_no_usable_type_or_name() {
        let document = Html::parse_document(
            r#"<div class="jidelnicekDen">
                <div class="jidelnicekTop">Pondělí 24.02.2025</div>
                <div class="jidelnicekItem"><span class="smallBoldTitle">Oběd 1</span></div>
                <div class="jidelnicekItem">Guláš bez označení</div>
               </div>"#,
        );
        // the first item has a type but no name; the second inherits the
        // type and is accepted
        let snapshot = scan(&document).finish();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot.days()[0].meals().len(), 1);
        assert_eq!(snapshot.days()[0].meals()[0].name, "Guláš bez označení");
    }

    #[test]
    fn heading_less_day_blocks_are_ignored() {
        let document = Html::parse_document(
            r#"<div class="jidelnicekDen">
                <div class="jidelnicekItem"><span class="smallBoldTitle">Oběd 1</span> Guláš</div>
               </div>"#,
        );
        assert!(scan(&document).is_empty());
    }
}
