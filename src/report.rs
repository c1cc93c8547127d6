use std::io::{self, Write};

use serde::Serialize;

use crate::ingest::{IngestReport, ItemOutcome};

#[derive(Debug, Clone, Copy)]
pub enum OutputMode {
    Human,
    Json,
}

pub struct JsonOutput;

impl JsonOutput {
    pub fn print_report(report: &IngestReport) -> io::Result<()> {
        Self::print_json(report)
    }

    fn print_json<T: Serialize>(value: &T) -> io::Result<()> {
        let json = serde_json::to_string_pretty(value)
            .map_err(|err| io::Error::new(io::ErrorKind::Other, err))?;
        let mut stdout = io::stdout();
        stdout.write_all(json.as_bytes())?;
        stdout.write_all(b"\n")?;
        Ok(())
    }
}

pub fn print_summary(report: &IngestReport) {
    let produced = report.produced();
    println!("Arquivos gerados: {}", produced.len());
    for path in &produced {
        println!(" - {path}");
    }

    let skipped = report
        .items
        .iter()
        .filter(|item| matches!(item.outcome, ItemOutcome::SkippedExisting { .. }))
        .count();
    if skipped > 0 {
        println!("Ja presentes (pulados): {skipped}");
    }

    let failures = report.failures();
    if failures > 0 {
        println!("Falhas: {failures}");
        for item in &report.items {
            if let ItemOutcome::Failed { stage, error } = &item.outcome {
                let resource = item.resource.as_deref().unwrap_or("-");
                println!("   {} / {} ({:?}): {}", item.dataset, resource, stage, error);
            }
        }
    }
}
