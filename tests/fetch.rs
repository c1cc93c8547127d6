use std::fs;

use camino::Utf8PathBuf;

use aneel_data::fetch::{FetchOutcome, FileFetcher, HttpFetcher};

#[test]
fn existing_file_short_circuits_before_any_network_access() {
    let temp = tempfile::tempdir().unwrap();
    let dir = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).unwrap();
    fs::write(dir.join("report.csv").as_std_path(), "conteudo antigo").unwrap();

    // The url is unreachable; an attempted request would fail, so an Ok
    // outcome proves the fetcher skipped by name without touching it.
    let fetcher = HttpFetcher::new().unwrap();
    let outcome = fetcher
        .fetch("http://127.0.0.1:9/report.csv?v=2", &dir)
        .unwrap();

    assert_eq!(outcome, FetchOutcome::AlreadyExists(dir.join("report.csv")));
    let content = fs::read_to_string(dir.join("report.csv").as_std_path()).unwrap();
    assert_eq!(content, "conteudo antigo");
}

#[test]
fn unreachable_host_reports_fetch_error() {
    let temp = tempfile::tempdir().unwrap();
    let dir = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).unwrap();

    let fetcher = HttpFetcher::new().unwrap();
    let err = fetcher.fetch("http://127.0.0.1:9/novo.csv", &dir).unwrap_err();
    assert!(err.to_string().contains("download failed"));
}
