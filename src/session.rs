use log::{info, warn};

use crate::chart::aggregate::{aggregate, Aggregate};
use crate::chart::conclusion::derive_conclusion;
use crate::chart::render::render_png;
use crate::chart::{ChartSpec, MAX_CHARTS};
use crate::data::filter::{apply_filters, filter_options, FilterState};
use crate::data::loader::load_bytes;
use crate::data::model::{Table, Value};
use crate::error::{ConfigError, ExportError, LoadError};
use crate::report::excel::table_to_xlsx;
use crate::report::pdf::{charts_pdf, conclusions_pdf, full_report_pdf, ChartImage};

// ---------------------------------------------------------------------------
// Session – the explicit context the UI layer drives
// ---------------------------------------------------------------------------

pub const XLSX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
pub const PDF_MIME: &str = "application/pdf";

/// One user session: the uploaded table, the active filter selections, and
/// the configured chart specs. Every chart-build pass recomputes everything
/// from this state; nothing is cached between passes.
#[derive(Default)]
pub struct Session {
    table: Option<Table>,
    pub filters: FilterState,
    chart_specs: Vec<ChartSpec>,
}

/// Result of building one chart: the aggregate and title are always present,
/// the conclusion and image only when their derivation succeeded.
#[derive(Debug, Clone)]
pub struct ChartOutput {
    pub index: usize,
    pub spec: ChartSpec,
    pub title: String,
    pub aggregate: Aggregate,
    pub conclusion: Option<String>,
    pub png: Option<Vec<u8>>,
}

/// Everything one chart-build pass produced, plus the non-fatal warnings
/// collected along the way (per-chart failures never abort the pass).
#[derive(Debug, Clone, Default)]
pub struct ChartBuildReport {
    pub charts: Vec<ChartOutput>,
    pub warnings: Vec<String>,
}

impl ChartBuildReport {
    /// Ordered conclusion sentences, tagged with their 0-based chart index.
    pub fn conclusions(&self) -> Vec<(usize, String)> {
        self.charts
            .iter()
            .filter_map(|c| c.conclusion.clone().map(|s| (c.index, s)))
            .collect()
    }

    /// Successfully rasterized images, in chart-index order.
    pub fn images(&self) -> Vec<ChartImage> {
        self.charts
            .iter()
            .filter_map(|c| {
                c.png.clone().map(|png| ChartImage {
                    chart_index: c.index,
                    png,
                })
            })
            .collect()
    }
}

/// A downloadable byte stream with its media type and suggested filename.
#[derive(Debug, Clone)]
pub struct ExportArtifact {
    pub bytes: Vec<u8>,
    pub mime: &'static str,
    pub filename: &'static str,
}

impl Session {
    /// Ingest an uploaded file, replacing any previous table and resetting
    /// the filter selections.
    pub fn load_dataset(&mut self, filename: &str, bytes: &[u8]) -> Result<(), LoadError> {
        let table = load_bytes(filename, bytes)?;
        self.filters = FilterState::default();
        self.table = Some(table);
        Ok(())
    }

    pub fn table(&self) -> Option<&Table> {
        self.table.as_ref()
    }

    /// Selectable filter options for the designated columns of the current
    /// table, sorted ascending.
    pub fn filter_options(&self) -> Vec<(String, Vec<Value>)> {
        self.table.as_ref().map(filter_options).unwrap_or_default()
    }

    /// Replace the chart configuration. At most [`MAX_CHARTS`] specs.
    pub fn set_chart_specs(&mut self, specs: Vec<ChartSpec>) -> Result<(), ConfigError> {
        if specs.len() > MAX_CHARTS {
            return Err(ConfigError::TooManyCharts(specs.len()));
        }
        self.chart_specs = specs;
        Ok(())
    }

    pub fn chart_specs(&self) -> &[ChartSpec] {
        &self.chart_specs
    }

    /// The current table reduced by the active filters.
    pub fn filtered_table(&self) -> Option<Table> {
        self.table
            .as_ref()
            .map(|t| apply_filters(t, &self.filters))
    }

    /// One full chart-build pass: for each spec, aggregate, derive the
    /// conclusion, and rasterize. Each chart is independent; failures are
    /// downgraded to warnings and the pass continues.
    pub fn build_charts(&self) -> ChartBuildReport {
        let mut report = ChartBuildReport::default();
        let table = match self.filtered_table() {
            Some(t) => t,
            None => return report,
        };

        for (index, spec) in self.chart_specs.iter().enumerate() {
            let agg = match aggregate(&table, &spec.group_column, &spec.value_column) {
                Ok(agg) => agg,
                Err(e) => {
                    warn!("chart {}: {e}", index + 1);
                    report.warnings.push(format!("Chart {}: {e}", index + 1));
                    continue;
                }
            };

            let conclusion = match derive_conclusion(&agg, spec.kind) {
                Ok(sentence) => Some(sentence),
                Err(e) => {
                    warn!("chart {}: {e}", index + 1);
                    report
                        .warnings
                        .push(format!("Chart {}: conclusion omitted: {e}", index + 1));
                    None
                }
            };

            let title = agg.title();
            let png = match render_png(&agg, spec.kind, &title) {
                Ok(png) => Some(png),
                Err(e) => {
                    warn!("chart {} image could not be saved: {e}", index + 1);
                    report.warnings.push(format!(
                        "Chart {} image could not be saved. Error: {e}",
                        index + 1
                    ));
                    None
                }
            };

            report.charts.push(ChartOutput {
                index,
                spec: spec.clone(),
                title,
                aggregate: agg,
                conclusion,
                png,
            });
        }

        info!(
            "chart build pass: {} charts, {} warnings",
            report.charts.len(),
            report.warnings.len()
        );
        report
    }

    // -- Export entry points ------------------------------------------------

    /// The filtered table as an xlsx download, independent of chart state.
    pub fn export_excel(&self) -> Result<ExportArtifact, ExportError> {
        let table = self.filtered_table().ok_or(ExportError::NoDataset)?;
        Ok(ExportArtifact {
            bytes: table_to_xlsx(&table)?,
            mime: XLSX_MIME,
            filename: "hotel_data.xlsx",
        })
    }

    pub fn export_charts_pdf(
        &self,
        report: &ChartBuildReport,
    ) -> Result<ExportArtifact, ExportError> {
        let images = report.images();
        if images.is_empty() {
            return Err(ExportError::NoCharts);
        }
        Ok(ExportArtifact {
            bytes: charts_pdf(&images)?,
            mime: PDF_MIME,
            filename: "charts_only.pdf",
        })
    }

    pub fn export_conclusions_pdf(
        &self,
        report: &ChartBuildReport,
    ) -> Result<ExportArtifact, ExportError> {
        let conclusions = report.conclusions();
        if conclusions.is_empty() {
            return Err(ExportError::NoCharts);
        }
        Ok(ExportArtifact {
            bytes: conclusions_pdf(&conclusions)?,
            mime: PDF_MIME,
            filename: "conclusions_only.pdf",
        })
    }

    pub fn export_full_report(
        &self,
        report: &ChartBuildReport,
    ) -> Result<ExportArtifact, ExportError> {
        let images = report.images();
        let conclusions = report.conclusions();
        if images.is_empty() && conclusions.is_empty() {
            return Err(ExportError::NoCharts);
        }
        Ok(ExportArtifact {
            bytes: full_report_pdf(&images, &conclusions)?,
            mime: PDF_MIME,
            filename: "full_report.pdf",
        })
    }
}
