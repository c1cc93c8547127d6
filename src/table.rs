use serde_json::{Map, Value};

use crate::error::AneelError;

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
    Null,
}

impl Cell {
    pub fn infer(raw: &str) -> Self {
        if raw.is_empty() {
            return Cell::Null;
        }
        if let Ok(value) = raw.parse::<i64>() {
            return Cell::Int(value);
        }
        if let Ok(value) = raw.parse::<f64>() {
            return Cell::Float(value);
        }
        Cell::Text(raw.to_string())
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Int(value) => Some(*value as f64),
            Cell::Float(value) => Some(*value),
            _ => None,
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            Cell::Int(value) => Value::from(*value),
            Cell::Float(value) => Value::from(*value),
            Cell::Bool(value) => Value::from(*value),
            Cell::Text(value) => Value::from(value.as_str()),
            Cell::Null => Value::Null,
        }
    }

    pub fn to_csv_field(&self) -> String {
        match self {
            Cell::Int(value) => value.to_string(),
            Cell::Float(value) => value.to_string(),
            Cell::Bool(value) => value.to_string(),
            Cell::Text(value) => value.clone(),
            Cell::Null => String::new(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn columns_mut(&mut self) -> &mut Vec<String> {
        &mut self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }

    pub fn push_row(&mut self, row: Vec<Cell>) -> Result<(), AneelError> {
        if row.len() != self.columns.len() {
            return Err(AneelError::Filesystem(format!(
                "row width {} does not match {} columns",
                row.len(),
                self.columns.len()
            )));
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn push_column(&mut self, name: impl Into<String>, values: Vec<Cell>) {
        debug_assert_eq!(values.len(), self.rows.len());
        self.columns.push(name.into());
        for (row, value) in self.rows.iter_mut().zip(values) {
            row.push(value);
        }
    }

    // Rows reordered in place; column set untouched.
    pub fn reorder_rows(&mut self, order: Vec<usize>) {
        debug_assert_eq!(order.len(), self.rows.len());
        let mut reordered = Vec::with_capacity(self.rows.len());
        let mut rows = std::mem::take(&mut self.rows);
        let mut taken = vec![false; rows.len()];
        for index in order {
            debug_assert!(!taken[index]);
            taken[index] = true;
            reordered.push(std::mem::take(&mut rows[index]));
        }
        self.rows = reordered;
    }

    pub fn to_records(&self) -> Vec<Map<String, Value>> {
        self.rows
            .iter()
            .map(|row| {
                self.columns
                    .iter()
                    .zip(row)
                    .map(|(column, cell)| (column.clone(), cell.to_json()))
                    .collect()
            })
            .collect()
    }
}
