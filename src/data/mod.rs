/// Data layer: core types, loading, and filtering.
///
/// Architecture:
/// ```text
///  .csv / .xls / .xlsx bytes
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse byte stream → Table
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Table    │  Vec<Column>, per-column element kind
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  column-membership predicates → filtered Table
///   └──────────┘
/// ```
pub mod filter;
pub mod loader;
pub mod model;
