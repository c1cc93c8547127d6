use std::fs;

use camino::Utf8PathBuf;

use aneel_data::cache::DatasetCache;
use aneel_data::table::Cell;

#[test]
fn missing_directory_yields_empty_cache() {
    let temp = tempfile::tempdir().unwrap();
    let dir = Utf8PathBuf::from_path_buf(temp.path().join("nonexistent")).unwrap();

    let cache = DatasetCache::load(&dir).unwrap();
    assert!(cache.is_empty());
    assert!(cache.names().is_empty());
}

#[test]
fn utf8_csv_is_loaded() {
    let temp = tempfile::tempdir().unwrap();
    let dir = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).unwrap();
    fs::write(
        dir.join("geracao_clean.csv").as_std_path(),
        "Usina,Potencia\nItaipu,14000\n",
    )
    .unwrap();

    let cache = DatasetCache::load(&dir).unwrap();
    let table = cache.get("geracao_clean.csv").unwrap();
    assert_eq!(table.columns(), ["Usina", "Potencia"]);
    assert_eq!(table.rows()[0][1], Cell::Int(14000));
}

#[test]
fn latin1_csv_loads_via_retry() {
    let temp = tempfile::tempdir().unwrap();
    let dir = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).unwrap();
    // 0xE3 is not valid UTF-8; the Latin-1 retry decodes it as "ã".
    fs::write(
        dir.join("regioes.csv").as_std_path(),
        b"Regi\xE3o,Consumo\nNorte,10\n",
    )
    .unwrap();

    let cache = DatasetCache::load(&dir).unwrap();
    let table = cache.get("regioes.csv").unwrap();
    assert_eq!(table.columns()[0], "Região");
}

#[test]
fn undecodable_file_is_omitted_without_failing_the_scan() {
    let temp = tempfile::tempdir().unwrap();
    let dir = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).unwrap();
    fs::write(dir.join("bom.csv").as_std_path(), "a,b\n1,2\n").unwrap();
    fs::write(dir.join("quebrado.xlsx").as_std_path(), b"not a workbook").unwrap();

    let cache = DatasetCache::load(&dir).unwrap();
    assert_eq!(cache.len(), 1);
    assert!(cache.get("bom.csv").is_some());
    assert!(cache.get("quebrado.xlsx").is_none());
}

#[test]
fn scan_ignores_directories_and_other_extensions() {
    let temp = tempfile::tempdir().unwrap();
    let dir = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).unwrap();
    fs::create_dir_all(dir.join("sub").as_std_path()).unwrap();
    fs::write(dir.join("sub/ignorado.csv").as_std_path(), "a\n1\n").unwrap();
    fs::write(dir.join("notas.txt").as_std_path(), "texto livre").unwrap();
    fs::write(dir.join("dados.csv").as_std_path(), "a\n1\n").unwrap();

    let cache = DatasetCache::load(&dir).unwrap();
    assert_eq!(cache.names(), ["dados.csv"]);
}
