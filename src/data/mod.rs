/// Data layer: core types, CSV ingestion, and export.
///
/// Architecture:
/// ```text
///   uploaded .csv bytes
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse CSV → UploadedTable  (or ParseError)
///   └──────────┘
///        │
///        ▼
///   ┌───────────────┐
///   │ UploadedTable  │  ordered columns, typed cells
///   └───────────────┘
///        │   (pipeline: reconcile + predict)
///        ▼
///   ┌─────────────────┐
///   │ PredictionTable  │  one probability row per upload row
///   └─────────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  export   │  prediction.csv (text/csv)
///   └──────────┘
/// ```

pub mod export;
pub mod loader;
pub mod table;
