use clap::ValueEnum;

use crate::stats::PageViews;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortOrder {
    /// Least to most visited
    #[value(name = "asc", alias = "ascending")]
    Ascending,
    /// Most to least visited
    #[default]
    #[value(name = "desc", alias = "descending")]
    Descending,
}

/// Renders page views as `"<page> <count> visit(s)"` lines sorted by count.
///
/// The sort is stable and looks at the count only, so pages with equal counts
/// keep their map order in either direction.
pub fn format_page_views(views: &PageViews, order: SortOrder) -> Vec<String> {
    let mut pairs: Vec<(&String, &usize)> = views.iter().collect();
    match order {
        SortOrder::Ascending => pairs.sort_by(|a, b| a.1.cmp(b.1)),
        SortOrder::Descending => pairs.sort_by(|a, b| b.1.cmp(a.1)),
    }

    pairs
        .into_iter()
        .map(|(page, count)| format_line(page, *count))
        .collect()
}

pub fn format_line(page: &str, count: usize) -> String {
    let word = if count == 1 { "visit" } else { "visits" };
    format!("{page} {count} {word}")
}
