use camino::{Utf8Path, Utf8PathBuf};

use crate::decode::{CsvOptions, read_table};
use crate::error::AneelError;
use crate::table::Table;

// Trim, then replace every space with an underscore. Consecutive spaces
// become consecutive underscores; the regulator's headers are exported
// that way and downstream consumers match on the literal result.
pub fn normalize_header(header: &str) -> String {
    header.trim().replace(' ', "_")
}

pub fn normalize_headers(table: &mut Table) {
    for column in table.columns_mut() {
        *column = normalize_header(column);
    }
}

pub fn clean_output_path(path: &Utf8Path) -> Utf8PathBuf {
    let stem = path.file_stem().unwrap_or("");
    path.with_file_name(format!("{stem}_clean.csv"))
}

pub fn normalize(path: &Utf8Path, csv_options: &CsvOptions) -> Result<Utf8PathBuf, AneelError> {
    let mut table = read_table(path, csv_options)?;
    normalize_headers(&mut table);

    let output = clean_output_path(path);
    write_clean_csv(&output, &table)?;
    tracing::info!(source = %path, clean = %output, rows = table.len(), "normalized");
    Ok(output)
}

fn write_clean_csv(path: &Utf8Path, table: &Table) -> Result<(), AneelError> {
    let mut writer = csv::Writer::from_path(path.as_std_path())
        .map_err(|err| AneelError::Filesystem(err.to_string()))?;
    writer
        .write_record(table.columns())
        .map_err(|err| AneelError::Filesystem(err.to_string()))?;
    for row in table.rows() {
        let fields: Vec<String> = row.iter().map(|cell| cell.to_csv_field()).collect();
        writer
            .write_record(&fields)
            .map_err(|err| AneelError::Filesystem(err.to_string()))?;
    }
    writer
        .flush()
        .map_err(|err| AneelError::Filesystem(err.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_header_trims_and_underscores() {
        assert_eq!(normalize_header("  Perdas Totais "), "Perdas_Totais");
        assert_eq!(normalize_header("Consumo"), "Consumo");
    }

    #[test]
    fn consecutive_spaces_keep_consecutive_underscores() {
        assert_eq!(normalize_header("Perdas  Totais"), "Perdas__Totais");
    }

    #[test]
    fn normalize_header_is_stable_on_normalized_input() {
        let once = normalize_header("Perdas Nao Tecnicas");
        assert_eq!(normalize_header(&once), once);
    }

    #[test]
    fn clean_path_replaces_extension() {
        let path = Utf8PathBuf::from("processed/perdas.xlsx");
        assert_eq!(
            clean_output_path(&path),
            Utf8PathBuf::from("processed/perdas_clean.csv")
        );
    }
}
