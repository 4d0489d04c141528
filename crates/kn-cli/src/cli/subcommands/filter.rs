use std::collections::BTreeSet;

use clap::Args;
use kn_core::filter::ItemFilter;

/// Item selection shared by `import` and `list`.
#[derive(Clone, Debug, Default, Args)]
pub struct FilterArgs {
    /// Case-insensitive text matched against title, body and list entries.
    #[arg(short, long)]
    pub query: Option<String>,
    /// Comma-separated label names; items with any of them match.
    #[arg(short, long)]
    pub labels: Option<String>,
}

impl FilterArgs {
    #[must_use]
    pub fn to_filter(&self) -> ItemFilter {
        let query = self
            .query
            .as_deref()
            .map(str::trim)
            .filter(|query| !query.is_empty())
            .map(str::to_string);
        let labels = self.labels.as_deref().map(split_labels);
        ItemFilter::new(query, labels)
    }
}

fn split_labels(raw: &str) -> BTreeSet<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}
