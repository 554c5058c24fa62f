//! Date-indexed tables of named indicator columns.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::AmplitudeError;

/// A named column of optional values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    /// Column label.
    pub name: String,
    /// One value per table date; `None` is a missing value.
    pub values: Vec<Option<f64>>,
}

/// A date axis plus ordered named columns of equal length.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct IndicatorTable {
    dates: Vec<NaiveDate>,
    columns: Vec<Column>,
}

impl IndicatorTable {
    /// Table with the given date axis and no columns.
    #[must_use]
    pub const fn new(dates: Vec<NaiveDate>) -> Self {
        Self {
            dates,
            columns: Vec::new(),
        }
    }

    /// Append a column.
    ///
    /// # Errors
    /// Returns `AmplitudeError::Data` when the column length differs from the
    /// date axis or the name is already taken.
    pub fn push_column(
        &mut self,
        name: impl Into<String>,
        values: Vec<Option<f64>>,
    ) -> Result<(), AmplitudeError> {
        let name = name.into();
        if values.len() != self.dates.len() {
            return Err(AmplitudeError::Data(format!(
                "column {name} has {} values for {} dates",
                values.len(),
                self.dates.len()
            )));
        }
        if self.column(&name).is_some() {
            return Err(AmplitudeError::Data(format!("duplicate column {name}")));
        }
        self.columns.push(Column { name, values });
        Ok(())
    }

    /// Append a column whose values are all present.
    ///
    /// # Errors
    /// Same as [`IndicatorTable::push_column`].
    pub fn push_dense(
        &mut self,
        name: impl Into<String>,
        values: Vec<f64>,
    ) -> Result<(), AmplitudeError> {
        self.push_column(name, values.into_iter().map(Some).collect())
    }

    /// Values of the column called `name`.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&[Option<f64>]> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.values.as_slice())
    }

    /// Column names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    /// Borrow every column.
    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// The date axis.
    #[must_use]
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Number of dates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// True when the table has no dates.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Keep only the last `n` dates of every column.
    #[must_use]
    pub fn tail(mut self, n: usize) -> Self {
        let skip = self.dates.len().saturating_sub(n);
        self.dates.drain(..skip);
        for c in &mut self.columns {
            c.values.drain(..skip);
        }
        self
    }

    /// Convert to a polars `DataFrame` with a leading string `Date` column.
    ///
    /// # Errors
    /// Returns `AmplitudeError::Data` if polars rejects the frame.
    #[cfg(feature = "dataframe")]
    pub fn to_dataframe(&self) -> Result<polars::prelude::DataFrame, AmplitudeError> {
        use polars::prelude::{Column as PlColumn, DataFrame};

        let mut cols = Vec::with_capacity(self.columns.len() + 1);
        let dates: Vec<String> = self.dates.iter().map(ToString::to_string).collect();
        cols.push(PlColumn::new("Date".into(), dates));
        for c in &self.columns {
            cols.push(PlColumn::new(c.name.as_str().into(), c.values.clone()));
        }
        DataFrame::new(cols).map_err(|e| AmplitudeError::Data(format!("dataframe: {e}")))
    }
}
