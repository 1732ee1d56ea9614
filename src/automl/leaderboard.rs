//! Leaderboard materialization.
//!
//! The server reports a run's leaderboard twice: as an ordered list of model
//! keys and as a column-major `TwoDimTableV3`. [`Leaderboard`] keeps the
//! ordered ids for leader resolution and converts the table into a `polars`
//! [`DataFrame`] for inspection.

use crate::client::schema::{AutoMLV99, TwoDimTableV3};
use crate::core::error::{H2oAutoMLError, Result};

use polars::prelude::*;
use serde_json::Value;

/// Name of the model id column in a leaderboard frame.
pub const MODEL_ID_COLUMN: &str = "model_id";

/// Models of one AutoML run, best first.
#[derive(Debug, Clone)]
pub struct Leaderboard {
    model_ids: Vec<String>,
    sort_metric: Option<String>,
    table: DataFrame,
}

impl Leaderboard {
    /// Build a leaderboard from a run description.
    ///
    /// Without a `leaderboard_table`, the frame holds only the model ids.
    pub fn from_run(run: &AutoMLV99) -> Result<Self> {
        let model_ids: Vec<String> = run
            .leaderboard
            .models
            .iter()
            .map(|key| key.name.clone())
            .collect();

        let table = match run.leaderboard_table {
            Some(ref table) => table_to_frame(table)?,
            None => DataFrame::new(vec![Column::new(
                MODEL_ID_COLUMN.into(),
                model_ids.clone(),
            )])?,
        };

        Ok(Leaderboard {
            model_ids,
            sort_metric: run.leaderboard.sort_metric.clone(),
            table,
        })
    }

    /// Model ids, best first
    pub fn model_ids(&self) -> &[String] {
        &self.model_ids
    }

    /// Best model id, if any model was built
    pub fn leader_id(&self) -> Option<&str> {
        self.model_ids.first().map(String::as_str)
    }

    /// Metric the server ranked by, when reported
    pub fn sort_metric(&self) -> Option<&str> {
        self.sort_metric.as_deref()
    }

    /// Number of ranked models
    pub fn len(&self) -> usize {
        self.model_ids.len()
    }

    /// Whether the run produced no models
    pub fn is_empty(&self) -> bool {
        self.model_ids.is_empty()
    }

    /// Model id and metric columns, one row per model
    pub fn table(&self) -> &DataFrame {
        &self.table
    }

    /// Same ids in the same order, and equal tables.
    pub fn same_as(&self, other: &Leaderboard) -> bool {
        self.model_ids == other.model_ids && self.table.equals_missing(&other.table)
    }
}

/// Convert a column-major H2O table into a `DataFrame`.
///
/// The leading row-header column (an unnamed string column) is dropped.
/// `double`/`float` cells become `f64`, `int`/`long` cells `i64`, and
/// everything else strings.
pub fn table_to_frame(table: &TwoDimTableV3) -> Result<DataFrame> {
    if table.columns.len() != table.data.len() {
        return Err(H2oAutoMLError::leaderboard(format!(
            "table '{}' declares {} columns but carries {}",
            table.name.as_deref().unwrap_or(""),
            table.columns.len(),
            table.data.len()
        )));
    }

    let mut columns = Vec::with_capacity(table.columns.len());
    for (position, (spec, cells)) in table.columns.iter().zip(&table.data).enumerate() {
        if position == 0 && spec.name.trim().is_empty() {
            continue;
        }
        if cells.len() != table.rowcount {
            return Err(H2oAutoMLError::leaderboard(format!(
                "column '{}' has {} cells, expected {}",
                spec.name,
                cells.len(),
                table.rowcount
            )));
        }

        let name: PlSmallStr = spec.name.as_str().into();
        let column = match spec.column_type.as_str() {
            "double" | "float" => {
                Column::new(name, cells.iter().map(cell_f64).collect::<Vec<Option<f64>>>())
            }
            "int" | "long" => {
                Column::new(name, cells.iter().map(cell_i64).collect::<Vec<Option<i64>>>())
            }
            _ => Column::new(
                name,
                cells.iter().map(cell_string).collect::<Vec<Option<String>>>(),
            ),
        };
        columns.push(column);
    }

    Ok(DataFrame::new(columns)?)
}

fn cell_f64(cell: &Value) -> Option<f64> {
    match cell {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

fn cell_i64(cell: &Value) -> Option<i64> {
    match cell {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

fn cell_string(cell: &Value) -> Option<String> {
    match cell {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
