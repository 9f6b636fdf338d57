/// Report layer: spreadsheet and PDF document builders, all producing
/// in-memory byte streams.
pub mod excel;
pub mod pdf;
