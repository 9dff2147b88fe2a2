//! Configuration for component tables.

use std::borrow::Cow;

/// Configuration for one [`ComponentTable`](crate::ComponentTable).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableConfig {
    /// Name used in log lines and error context.
    pub label: Cow<'static, str>,

    /// Number of records to reserve up front.
    pub initial_capacity: usize,

    /// Minimum number of freed slots before `gc` compacts. Always at least 1.
    pub gc_threshold: usize,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            label: Cow::Borrowed("components"),
            initial_capacity: 0,
            gc_threshold: 1,
        }
    }
}

impl TableConfig {
    /// Creates a configuration with the given label.
    #[must_use]
    pub fn named(label: impl Into<Cow<'static, str>>) -> Self {
        Self {
            label: label.into(),
            ..Self::default()
        }
    }

    /// Creates a configuration for tables that hold many short-lived records.
    ///
    /// Reserves space up front and lets freed slots accumulate before paying
    /// for a compaction.
    #[must_use]
    pub fn high_churn(label: impl Into<Cow<'static, str>>) -> Self {
        Self {
            label: label.into(),
            initial_capacity: 1024,
            gc_threshold: 64,
        }
    }

    /// Builder method to set the label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<Cow<'static, str>>) -> Self {
        self.label = label.into();
        self
    }

    /// Builder method to set the initial capacity.
    #[must_use]
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    /// Builder method to set the compaction threshold.
    #[must_use]
    pub fn with_gc_threshold(mut self, threshold: usize) -> Self {
        self.gc_threshold = threshold.max(1);
        self
    }
}
