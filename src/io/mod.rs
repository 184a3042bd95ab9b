pub mod csv;
pub mod geojson;

pub use self::csv::{CsvRangeConfig, MarkerSource, classify_csv};
pub use self::geojson::CellsToGeoJson;
