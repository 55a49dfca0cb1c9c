use std::sync::OnceLock;

use scraper::Selector;

/// A CSS selector compiled once on first use and shared afterwards.
#[derive(Debug)]
pub(crate) struct LazySelector<'a> {
    cell: OnceLock<Selector>,
    source: &'a str,
}

impl<'a> LazySelector<'a> {
    pub(crate) const fn new(source: &'a str) -> Self {
        Self {
            cell: OnceLock::new(),
            source,
        }
    }
}

impl<'a> core::ops::Deref for LazySelector<'a> {
    type Target = Selector;

    fn deref(&self) -> &Self::Target {
        self.cell.get_or_init(|| match Selector::parse(self.source) {
            Ok(sel) => sel,
            Err(e) => panic!("invalid selector `{}`: {:?}", self.source, e),
        })
    }
}

#[macro_export]
macro_rules! static_selector {
    ($x: ident <- $sel: literal) => {
        static $x: $crate::parse::static_selector::LazySelector =
            $crate::parse::static_selector::LazySelector::new($sel);
    };
}
