use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use log::{info, warn};
use serde::Deserialize;

use chartforge::data::model::Value;
use chartforge::error::ExportError;
use chartforge::session::{ExportArtifact, Session};
use chartforge::ChartSpec;

/// Run configuration standing in for the UI widgets: filter selections plus
/// the per-chart specs.
#[derive(Debug, Deserialize)]
struct RunConfig {
    #[serde(default)]
    filters: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    charts: Vec<ChartSpec>,
}

fn main() -> Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let (data_path, config_path) = match (args.next(), args.next()) {
        (Some(d), Some(c)) => (PathBuf::from(d), PathBuf::from(c)),
        _ => bail!("usage: chartforge <dataset.{{csv,xls,xlsx}}> <config.json> [out-dir]"),
    };
    let out_dir = args.next().map_or_else(|| PathBuf::from("."), PathBuf::from);

    let config: RunConfig = serde_json::from_str(
        &std::fs::read_to_string(&config_path)
            .with_context(|| format!("reading {}", config_path.display()))?,
    )
    .context("parsing run config")?;

    let bytes = std::fs::read(&data_path)
        .with_context(|| format!("reading {}", data_path.display()))?;
    let filename = data_path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("upload.csv");

    let mut session = Session::default();
    session
        .load_dataset(filename, &bytes)
        .context("loading dataset")?;

    for (column, selected) in config.filters {
        session.filters.insert(
            column,
            selected.iter().map(|s| Value::parse(s)).collect(),
        );
    }
    session.set_chart_specs(config.charts)?;

    let report = session.build_charts();
    for output in &report.charts {
        println!("Chart {}: {}", output.index + 1, output.title);
        if let Some(conclusion) = &output.conclusion {
            println!("  {conclusion}");
        }
    }
    for warning in &report.warnings {
        warn!("{warning}");
    }

    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;

    write_artifact(&out_dir, session.export_excel())?;
    write_artifact(&out_dir, session.export_charts_pdf(&report))?;
    write_artifact(&out_dir, session.export_conclusions_pdf(&report))?;
    write_artifact(&out_dir, session.export_full_report(&report))?;

    Ok(())
}

fn write_artifact(out_dir: &Path, artifact: Result<ExportArtifact, ExportError>) -> Result<()> {
    match artifact {
        Ok(artifact) => {
            let path = out_dir.join(artifact.filename);
            std::fs::write(&path, &artifact.bytes)
                .with_context(|| format!("writing {}", path.display()))?;
            info!("wrote {} ({})", path.display(), artifact.mime);
        }
        Err(ExportError::NoCharts) => warn!("no charts generated, export skipped"),
        Err(e) => return Err(e.into()),
    }
    Ok(())
}
