use thiserror::Error;

// ---------------------------------------------------------------------------
// Error taxonomy
// ---------------------------------------------------------------------------

/// The uploaded bytes could not be parsed in the declared format.
///
/// Fatal to the whole pass: without a table there is nothing to operate on.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to parse delimited text: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to read spreadsheet: {0}")]
    Spreadsheet(#[from] calamine::Error),

    #[error("the file contains no data (missing header row or empty sheet)")]
    EmptyTable,
}

/// A single chart's configuration or aggregate failed.
///
/// Scoped to one chart; other charts in the same pass are unaffected.
#[derive(Debug, Error)]
pub enum ChartError {
    #[error("column '{0}' does not exist in the table")]
    MissingColumn(String),

    #[error("aggregate has no rows (group column has no non-missing values)")]
    EmptyAggregate,
}

/// Chart-to-image conversion failed.
///
/// Downgraded to a warning by the chart-build pass; the chart object itself
/// stays usable, only image-dependent exports skip it.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("nothing to draw: aggregate has no rows")]
    EmptyChart,

    #[error("drawing failed: {0}")]
    Draw(String),

    #[error("PNG encoding failed: {0}")]
    Encode(#[from] image::ImageError),

    #[error("pixel buffer size mismatch")]
    BufferSize,
}

impl RenderError {
    /// Collapse a plotters backend error into a displayable variant.
    pub(crate) fn draw<E: std::fmt::Display>(e: E) -> Self {
        RenderError::Draw(e.to_string())
    }
}

/// An export document could not be produced.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("no dataset loaded")]
    NoDataset,

    #[error("no charts generated")]
    NoCharts,

    #[error("failed to write spreadsheet: {0}")]
    Excel(#[from] rust_xlsxwriter::XlsxError),

    #[error("failed to assemble PDF: {0}")]
    Pdf(String),
}

/// Invalid chart-build configuration from the caller.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("chart count {0} exceeds the maximum of 10")]
    TooManyCharts(usize),
}
