use crate::types::Category;
use crate::types::Record;
use serde::Serialize;
use std::collections::BTreeMap;

/// Summary counts over a table.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct TableStats {
    pub total: usize,
    /// Every category is present, with zero when unused.
    pub by_category: BTreeMap<Category, usize>,
    /// Keyed by the status text exactly as written.
    pub by_status: BTreeMap<String, usize>,
    pub followed_up: usize,
}

pub fn summarize(records: &[Record]) -> TableStats {
    let mut by_category: BTreeMap<Category, usize> =
        Category::ALL.into_iter().map(|c| (c, 0)).collect();
    let mut by_status: BTreeMap<String, usize> = BTreeMap::new();
    let mut followed_up = 0usize;
    for record in records {
        *by_category.entry(record.category).or_default() += 1;
        *by_status.entry(record.status.clone()).or_default() += 1;
        if record.has_follow_up() {
            followed_up += 1;
        }
    }
    TableStats {
        total: records.len(),
        by_category,
        by_status,
        followed_up,
    }
}
