use std::cmp::Ordering;

use crate::cache::DatasetCache;
use crate::error::AneelError;
use crate::table::{Cell, Table};

pub const SCORE_COLUMN: &str = "Score";

const WEIGHTED_COLUMNS: [(&str, f64); 3] = [
    ("Perdas_Nao_Tecnicas", 0.5),
    ("Perdas_Totais", 0.3),
    ("Consumo", 0.2),
];

pub fn list_datasets(cache: &DatasetCache) -> Vec<String> {
    cache.names()
}

pub fn get_dataset<'a>(cache: &'a DatasetCache, name: &str) -> Result<&'a Table, AneelError> {
    cache
        .get(name)
        .ok_or_else(|| AneelError::DatasetNotFound(name.to_string()))
}

// Full row set of the loss dataset with a derived Score column, sorted by
// descending Score. The sort is stable: equal scores keep source order.
pub fn loss_indicators(cache: &DatasetCache) -> Result<Table, AneelError> {
    let (_, table) = cache.loss_table().ok_or(AneelError::LossDatasetNotFound)?;

    let mut weighted = Vec::with_capacity(WEIGHTED_COLUMNS.len());
    for (column, weight) in WEIGHTED_COLUMNS {
        let index = table
            .column_index(column)
            .ok_or_else(|| AneelError::MissingColumn(column.to_string()))?;
        weighted.push((column, index, weight));
    }

    let mut scores = Vec::with_capacity(table.len());
    for (row_index, row) in table.rows().iter().enumerate() {
        let mut score = 0.0;
        for (column, cell_index, weight) in &weighted {
            let value = row[*cell_index]
                .as_f64()
                .ok_or_else(|| AneelError::ColumnNotNumeric {
                    column: column.to_string(),
                    row: row_index,
                })?;
            score += value * weight;
        }
        scores.push(score);
    }

    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| scores[b].partial_cmp(&scores[a]).unwrap_or(Ordering::Equal));

    let mut result = table.clone();
    result.push_column(SCORE_COLUMN, scores.iter().map(|score| Cell::Float(*score)).collect());
    result.reorder_rows(order);
    Ok(result)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use assert_matches::assert_matches;

    use super::*;

    fn loss_table(rows: &[(f64, f64, f64)]) -> Table {
        let mut table = Table::new(vec![
            "Distribuidora".to_string(),
            "Perdas_Nao_Tecnicas".to_string(),
            "Perdas_Totais".to_string(),
            "Consumo".to_string(),
        ]);
        for (index, (non_technical, total, consumption)) in rows.iter().enumerate() {
            table
                .push_row(vec![
                    Cell::Text(format!("D{index}")),
                    Cell::Float(*non_technical),
                    Cell::Float(*total),
                    Cell::Float(*consumption),
                ])
                .unwrap();
        }
        table
    }

    fn cache_with(name: &str, table: Table) -> DatasetCache {
        let mut tables = HashMap::new();
        tables.insert(name.to_string(), table);
        DatasetCache::from_tables(tables)
    }

    #[test]
    fn score_ranking_matches_reference_scenario() {
        // 10*0.5 + 5*0.3 + 100*0.2 = 26.5 vs 20*0.5 + 5*0.3 + 50*0.2 = 22.5
        let cache = cache_with("perdas.csv", loss_table(&[(10.0, 5.0, 100.0), (20.0, 5.0, 50.0)]));
        let result = loss_indicators(&cache).unwrap();

        let score_index = result.column_index(SCORE_COLUMN).unwrap();
        assert_eq!(result.rows()[0][score_index], Cell::Float(26.5));
        assert_eq!(result.rows()[1][score_index], Cell::Float(22.5));
        assert_eq!(result.rows()[0][0], Cell::Text("D0".to_string()));
    }

    #[test]
    fn equal_scores_keep_source_order() {
        let cache = cache_with(
            "perdas.csv",
            loss_table(&[(1.0, 1.0, 1.0), (2.0, 2.0, 2.0), (1.0, 1.0, 1.0)]),
        );
        let result = loss_indicators(&cache).unwrap();

        // D1 scores highest; the two tied rows keep their file order.
        assert_eq!(result.rows()[0][0], Cell::Text("D1".to_string()));
        assert_eq!(result.rows()[1][0], Cell::Text("D0".to_string()));
        assert_eq!(result.rows()[2][0], Cell::Text("D2".to_string()));
    }

    #[test]
    fn missing_column_is_reported() {
        let mut table = Table::new(vec!["Perdas_Totais".to_string(), "Consumo".to_string()]);
        table
            .push_row(vec![Cell::Float(1.0), Cell::Float(2.0)])
            .unwrap();
        let cache = cache_with("perdas.xlsx", table);

        let err = loss_indicators(&cache).unwrap_err();
        assert_matches!(err, AneelError::MissingColumn(column) if column == "Perdas_Nao_Tecnicas");
    }

    #[test]
    fn non_numeric_cell_is_reported() {
        let table = loss_table(&[(1.0, 1.0, 1.0)]);
        let consumption = table.column_index("Consumo").unwrap();
        let mut broken = Table::new(table.columns().to_vec());
        let mut row = table.rows()[0].clone();
        row[consumption] = Cell::Text("n/d".to_string());
        broken.push_row(row).unwrap();
        let cache = cache_with("perdas.csv", broken);

        let err = loss_indicators(&cache).unwrap_err();
        assert_matches!(err, AneelError::ColumnNotNumeric { column, row: 0 } if column == "Consumo");
    }

    #[test]
    fn absent_loss_dataset() {
        let cache = DatasetCache::default();
        assert_matches!(loss_indicators(&cache), Err(AneelError::LossDatasetNotFound));
    }

    #[test]
    fn get_dataset_not_found() {
        let cache = DatasetCache::default();
        let err = get_dataset(&cache, "qualquer.csv").unwrap_err();
        assert_matches!(err, AneelError::DatasetNotFound(_));
    }
}
