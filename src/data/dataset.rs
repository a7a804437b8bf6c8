//! dataset.rs
//! Immutable tabular data in a dense columnar layout. Missing cells are NaN.

use super::variable::{Variable, VariableId};
use crate::error::{CausalError, Result};
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq)]
pub struct DataSet {
    variables: Vec<Variable>,
    // Column-major: column j occupies values[j * rows..(j + 1) * rows].
    values: Vec<f64>,
    rows: usize,
}

impl DataSet {
    /// Builds a data set from row-oriented records.
    pub fn new(variables: Vec<Variable>, records: Vec<Vec<f64>>) -> Result<Self> {
        Self::check_variables(&variables)?;
        let cols = variables.len();
        let rows = records.len();
        let mut values = vec![0.0; rows * cols];

        for (r, record) in records.iter().enumerate() {
            if record.len() != cols {
                return Err(CausalError::invalid_argument(format!(
                    "Row {} has {} values, expected {}", r, record.len(), cols
                )));
            }
            for (c, &v) in record.iter().enumerate() {
                values[c * rows + r] = v;
            }
        }

        Ok(Self { variables, values, rows })
    }

    /// Builds a data set from one vector per variable.
    pub fn from_columns(variables: Vec<Variable>, columns: Vec<Vec<f64>>) -> Result<Self> {
        Self::check_variables(&variables)?;
        if columns.len() != variables.len() {
            return Err(CausalError::invalid_argument(format!(
                "Got {} columns for {} variables", columns.len(), variables.len()
            )));
        }
        let rows = columns.first().map(|c| c.len()).unwrap_or(0);
        if let Some(bad) = columns.iter().position(|c| c.len() != rows) {
            return Err(CausalError::invalid_argument(format!(
                "Column '{}' has {} values, expected {}", variables[bad].name, columns[bad].len(), rows
            )));
        }

        Ok(Self { variables, values: columns.concat(), rows })
    }

    fn check_variables(variables: &[Variable]) -> Result<()> {
        if variables.is_empty() {
            return Err(CausalError::invalid_argument("A data set needs at least one variable"));
        }
        let mut used_names = HashSet::with_capacity(variables.len());
        for v in variables {
            if !used_names.insert(v.name.as_str()) {
                return Err(CausalError::invalid_argument(format!("Duplicate variable name '{}'", v.name)));
            }
        }
        Ok(())
    }

    pub fn num_rows(&self) -> usize { self.rows }
    pub fn num_columns(&self) -> usize { self.variables.len() }
    pub fn variables(&self) -> &[Variable] { &self.variables }

    pub fn variable(&self, id: VariableId) -> &Variable { &self.variables[id.index()] }

    pub fn variable_ids(&self) -> impl DoubleEndedIterator<Item = VariableId> + ExactSizeIterator + '_ {
        (0..self.variables.len()).map(VariableId::new)
    }

    pub fn variable_by_name(&self, name: &str) -> Option<VariableId> {
        self.variables.iter().position(|v| v.name == name).map(VariableId::new)
    }

    #[inline(always)]
    pub fn column(&self, col: usize) -> &[f64] {
        &self.values[col * self.rows..(col + 1) * self.rows]
    }

    #[inline(always)]
    pub fn value(&self, row: usize, col: usize) -> f64 {
        self.values[col * self.rows + row]
    }

    pub fn has_missing(&self) -> bool {
        self.values.iter().any(|v| v.is_nan())
    }

    /// Rows whose cells are defined for every listed column.
    pub fn complete_rows(&self, cols: &[usize]) -> Vec<usize> {
        (0..self.rows)
            .filter(|&r| cols.iter().all(|&c| !self.value(r, c).is_nan()))
            .collect()
    }

    /// Returns a new data set holding the given rows, in the given order.
    /// Row indices may repeat (sampling with replacement).
    pub fn select_rows(&self, rows: &[usize]) -> Result<Self> {
        if let Some(&bad) = rows.iter().find(|&&r| r >= self.rows) {
            return Err(CausalError::invalid_argument(format!(
                "Row {} out of range for data set with {} rows", bad, self.rows
            )));
        }
        let n = rows.len();
        let mut values = Vec::with_capacity(n * self.variables.len());
        for c in 0..self.variables.len() {
            let column = self.column(c);
            values.extend(rows.iter().map(|&r| column[r]));
        }
        Ok(Self { variables: self.variables.clone(), values, rows: n })
    }
}
