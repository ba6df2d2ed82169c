//! The final tabular result returned to callers.

use polars::prelude::{Column, DataFrame};

/// Index levels promoted out of the frame body, in promotion order.
#[derive(Debug, Clone)]
pub struct FrameIndex {
    /// The level columns, removed from the body.
    pub levels: Vec<Column>,
    /// One name per level. `None` is an anonymous level, used when the
    /// labels were synthesized rather than supplied by the caller.
    pub names: Vec<Option<String>>,
}

impl FrameIndex {
    pub fn depth(&self) -> usize {
        self.levels.len()
    }

    /// True when every level name was cleared.
    pub fn is_anonymous(&self) -> bool {
        self.names.iter().all(Option::is_none)
    }
}

/// A normalized tabular result: the body plus an optional materialized index.
#[derive(Debug, Clone)]
pub struct ResultFrame {
    pub data: DataFrame,
    pub index: Option<FrameIndex>,
}

impl ResultFrame {
    pub fn new(data: DataFrame) -> Self {
        Self { data, index: None }
    }

    pub fn with_index(data: DataFrame, index: FrameIndex) -> Self {
        Self {
            data,
            index: Some(index),
        }
    }

    pub fn height(&self) -> usize {
        self.data.height()
    }

    pub fn width(&self) -> usize {
        self.data.width()
    }

    /// Body column labels in order.
    pub fn column_names(&self) -> Vec<String> {
        self.data
            .get_column_names()
            .into_iter()
            .map(|name| name.to_string())
            .collect()
    }

    pub fn is_indexed(&self) -> bool {
        self.index.is_some()
    }

    /// Index level names, empty when no index was materialized.
    pub fn index_names(&self) -> Vec<Option<String>> {
        self.index
            .as_ref()
            .map(|index| index.names.clone())
            .unwrap_or_default()
    }
}
