use serde::Serialize;
use shared::models::{FilterSelection, Transaction};

/// Records of a dataset that satisfy a [`FilterSelection`], in source order.
/// Borrows from the dataset; never copies or mutates records.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct FilteredView<'a> {
    records: Vec<&'a Transaction>,
}

impl<'a> FilteredView<'a> {
    pub fn from_records(records: Vec<&'a Transaction>) -> Self {
        FilteredView { records }
    }

    pub fn records(&self) -> &[&'a Transaction] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Transaction> + '_ {
        self.records.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

pub fn filter_transactions<'a>(
    transactions: &'a [Transaction],
    selection: &FilterSelection,
) -> FilteredView<'a> {
    let records: Vec<&Transaction> = transactions.iter().filter(|t| selection.matches(t)).collect();
    tracing::debug!(
        month = %selection.month,
        channels = selection.channels.len(),
        matched = records.len(),
        "Applied filter"
    );
    FilteredView { records }
}
