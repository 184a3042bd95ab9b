use crate::config::RangeSettings;
use crate::coord::GeoPoint;
use crate::error::RangeError;
use crate::geom::{geometry_to_points, parse_geometry};
use crate::index::CellIndex;
use crate::range::{RangeResult, detect_one_way, range_query};
use rayon::prelude::*;
use std::collections::HashSet;
use std::fs::File;
use std::path::Path;
use tracing::{info, warn};

enum SourceIndices {
    Geometry(usize),
    Coordinates { lat_idx: usize, lng_idx: usize },
}

#[derive(Debug, Clone)]
pub enum MarkerSource {
    /// A single column containing a WKT or GeoJSON geometry.
    GeometryColumn(String),
    /// Separate latitude and longitude columns in degrees.
    CoordinateColumns {
        lat_column: String,
        lng_column: String,
    },
}

/// Describes how to read markers from a CSV and which range to test them against.
#[derive(Debug, Clone)]
pub struct CsvRangeConfig {
    pub center: GeoPoint,
    pub source: MarkerSource,
    pub exclude_columns: Vec<String>,
    pub settings: RangeSettings,
}

impl CsvRangeConfig {
    /// Create config for a CSV with a geometry column (WKT or GeoJSON).
    ///
    /// # Example
    /// ```
    /// use drone_range::{CsvRangeConfig, GeoPoint};
    ///
    /// # fn main() -> Result<(), drone_range::RangeError> {
    /// let config = CsvRangeConfig::new(GeoPoint::new(47.6205, -122.3493)?, "geometry");
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(center: GeoPoint, geometry_column: impl Into<String>) -> Self {
        Self {
            center,
            source: MarkerSource::GeometryColumn(geometry_column.into()),
            exclude_columns: Vec::new(),
            settings: RangeSettings::default(),
        }
    }

    /// Create config for a CSV with separate latitude/longitude columns.
    ///
    /// # Example
    /// ```
    /// use drone_range::{CalculationMethod, CsvRangeConfig, GeoPoint, RangeSettings};
    ///
    /// # fn main() -> Result<(), drone_range::RangeError> {
    /// let center = GeoPoint::new(47.6205, -122.3493)?;
    /// let config = CsvRangeConfig::from_coords(center, "Latitude", "Longitude")
    ///     .settings(RangeSettings::default().calculation_method(CalculationMethod::L17_570M));
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_coords(
        center: GeoPoint,
        lat_column: impl Into<String>,
        lng_column: impl Into<String>,
    ) -> Self {
        Self {
            center,
            source: MarkerSource::CoordinateColumns {
                lat_column: lat_column.into(),
                lng_column: lng_column.into(),
            },
            exclude_columns: Vec::new(),
            settings: RangeSettings::default(),
        }
    }

    pub fn exclude(mut self, columns: Vec<String>) -> Self {
        self.exclude_columns = columns;
        self
    }

    pub fn settings(mut self, settings: RangeSettings) -> Self {
        self.settings = settings;
        self
    }
}

/// Per-marker classification written to the output columns.
#[derive(Debug, Clone, PartialEq)]
struct Classification {
    cell: CellIndex,
    in_range: bool,
    one_way: bool,
}

fn find_column(headers: &csv::StringRecord, name: &str, label: &str) -> Result<usize, RangeError> {
    if name.is_empty() {
        return Err(RangeError::CsvError(format!(
            "{} column name cannot be empty",
            label
        )));
    }
    headers
        .iter()
        .position(|h| h == name)
        .ok_or_else(|| RangeError::CsvError(format!("{} column '{}' not found", label, name)))
}

fn parse_field(record: &csv::StringRecord, idx: usize, label: &str) -> Result<f64, RangeError> {
    let field = record
        .get(idx)
        .ok_or_else(|| RangeError::CsvError(format!("Missing {} column at index {}", label, idx)))?
        .trim();
    field
        .parse()
        .map_err(|_| RangeError::CsvError(format!("Invalid {}: '{}'", label, field)))
}

fn record_markers(
    record: &csv::StringRecord,
    source: &SourceIndices,
) -> Result<Vec<GeoPoint>, RangeError> {
    match source {
        SourceIndices::Geometry(idx) => {
            let geom_str = record.get(*idx).ok_or_else(|| {
                RangeError::CsvError(format!("Missing geometry column at index {}", idx))
            })?;
            geometry_to_points(&parse_geometry(geom_str)?)
        }
        SourceIndices::Coordinates { lat_idx, lng_idx } => {
            let lat = parse_field(record, *lat_idx, "latitude")?;
            let lng = parse_field(record, *lng_idx, "longitude")?;
            Ok(vec![GeoPoint::new(lat, lng)?])
        }
    }
}

fn classify(
    marker: &GeoPoint,
    range: &RangeResult,
    settings: &RangeSettings,
) -> Result<Classification, RangeError> {
    let cell = CellIndex::from_geo_point(marker, range.level())?;
    let in_range = range.contains(&cell);

    let one_way = in_range
        && settings.show_one_way
        && detect_one_way(range, std::slice::from_ref(marker))?
            .iter()
            .any(|jump| settings.one_way_policy.admits(jump));

    Ok(Classification {
        cell,
        in_range,
        one_way,
    })
}

/// Classifies every marker row of a CSV against the drone range around
/// `config.center`.
///
/// The range is computed once; rows are then classified in parallel. The output
/// keeps the input columns (minus any excluded ones) and appends `range_cell`,
/// `in_range` and `one_way`. A geometry that stands for several markers (a
/// multi-point) produces one output row per marker; an empty multi-point
/// produces none and is logged. Lines and polygons without a centroid fail
/// the whole run.
///
/// # Example
///
/// ```no_run
/// use drone_range::{CsvRangeConfig, GeoPoint, classify_csv};
///
/// # fn main() -> Result<(), drone_range::RangeError> {
/// let center = GeoPoint::new(47.6205, -122.3493)?;
/// let config = CsvRangeConfig::from_coords(center, "lat", "lng")
///     .exclude(vec!["notes".into()]);
///
/// classify_csv("markers.csv", "classified.csv", &config)?;
/// # Ok(())
/// # }
/// ```
pub fn classify_csv(
    csv_path: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
    config: &CsvRangeConfig,
) -> Result<(), RangeError> {
    let file = File::open(csv_path).map_err(|e| RangeError::CsvError(e.to_string()))?;
    let mut reader = csv::Reader::from_reader(file);

    let headers = reader
        .headers()
        .map_err(|e| RangeError::CsvError(e.to_string()))?
        .clone();

    let source_indices = match &config.source {
        MarkerSource::GeometryColumn(col) => {
            SourceIndices::Geometry(find_column(&headers, col, "Geometry")?)
        }
        MarkerSource::CoordinateColumns {
            lat_column,
            lng_column,
        } => SourceIndices::Coordinates {
            lat_idx: find_column(&headers, lat_column, "Latitude")?,
            lng_idx: find_column(&headers, lng_column, "Longitude")?,
        },
    };

    let exclude_indices: HashSet<usize> = config
        .exclude_columns
        .iter()
        .filter_map(|col| headers.iter().position(|h| h == col))
        .collect();

    let records: Vec<csv::StringRecord> = reader
        .records()
        .collect::<Result<_, _>>()
        .map_err(|e| RangeError::CsvError(e.to_string()))?;

    let method = config.settings.calculation_method;
    let range = range_query(&config.center, method.radius_meters, method.grid_level)?;

    let classified: Vec<Vec<Classification>> = records
        .par_iter()
        .enumerate()
        .map(|(row, record)| {
            let markers = record_markers(record, &source_indices)?;
            if markers.is_empty() {
                warn!(row, "row has no marker position, skipped");
            }
            markers
                .iter()
                .map(|marker| classify(marker, &range, &config.settings))
                .collect::<Result<Vec<_>, _>>()
        })
        .collect::<Result<_, _>>()?;

    let out_file = File::create(output_path).map_err(|e| RangeError::IoError(e.to_string()))?;
    let mut writer = csv::Writer::from_writer(out_file);

    let mut header_row: Vec<&str> = headers
        .iter()
        .enumerate()
        .filter(|(i, _)| !exclude_indices.contains(i))
        .map(|(_, h)| h)
        .collect();
    header_row.extend(["range_cell", "in_range", "one_way"]);
    writer
        .write_record(&header_row)
        .map_err(|e| RangeError::CsvError(e.to_string()))?;

    let mut rows = 0usize;
    let mut in_range = 0usize;
    let mut one_way = 0usize;

    for (record, classifications) in records.iter().zip(&classified) {
        for c in classifications {
            let mut row: Vec<String> = record
                .iter()
                .enumerate()
                .filter(|(i, _)| !exclude_indices.contains(i))
                .map(|(_, field)| field.to_string())
                .collect();
            row.push(c.cell.to_string());
            row.push(c.in_range.to_string());
            row.push(c.one_way.to_string());

            writer
                .write_record(&row)
                .map_err(|e| RangeError::CsvError(e.to_string()))?;

            rows += 1;
            in_range += usize::from(c.in_range);
            one_way += usize::from(c.one_way);
        }
    }

    writer
        .flush()
        .map_err(|e| RangeError::CsvError(e.to_string()))?;

    info!(
        method = %method,
        range_cells = range.len(),
        rows,
        in_range,
        one_way,
        "classified marker csv"
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::destination_point;
    use crate::range::OneWayPolicy;
    use std::io::Write;
    use tempfile::tempdir;

    fn seattle() -> GeoPoint {
        GeoPoint::new(47.6205, -122.3493).unwrap()
    }

    fn read_rows(path: &Path) -> Result<Vec<csv::StringRecord>, RangeError> {
        let mut reader =
            csv::Reader::from_path(path).map_err(|e| RangeError::CsvError(e.to_string()))?;
        reader
            .records()
            .collect::<Result<_, _>>()
            .map_err(|e| RangeError::CsvError(e.to_string()))
    }

    #[test]
    fn test_classify_from_coords() -> Result<(), RangeError> {
        let dir = tempdir().map_err(|e| RangeError::IoError(e.to_string()))?;
        let csv_path = dir.path().join("markers.csv");
        let output_path = dir.path().join("output.csv");

        let mut file = File::create(&csv_path).map_err(|e| RangeError::IoError(e.to_string()))?;
        writeln!(file, "name,lat,lng,notes").map_err(|e| RangeError::IoError(e.to_string()))?;
        writeln!(file, "needle,47.6205,-122.3493,landmark")
            .map_err(|e| RangeError::IoError(e.to_string()))?;
        writeln!(file, "renton,47.481489,-122.196868,far away")
            .map_err(|e| RangeError::IoError(e.to_string()))?;

        let config = CsvRangeConfig::from_coords(seattle(), "lat", "lng")
            .exclude(vec!["notes".into()]);
        classify_csv(&csv_path, &output_path, &config)?;

        let output =
            std::fs::read_to_string(&output_path).map_err(|e| RangeError::IoError(e.to_string()))?;
        assert!(output.starts_with("name,lat,lng,range_cell,in_range,one_way"));
        assert!(!output.contains("notes"));

        let rows = read_rows(&output_path)?;
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][3], "F2ij[51443,59639]@16");
        assert_eq!(&rows[0][4], "true");
        assert_eq!(&rows[0][5], "false");
        assert_eq!(&rows[1][4], "false");
        assert_eq!(&rows[1][5], "false");
        Ok(())
    }

    #[test]
    fn test_classify_geometry_column() -> Result<(), RangeError> {
        let dir = tempdir().map_err(|e| RangeError::IoError(e.to_string()))?;
        let csv_path = dir.path().join("markers.csv");
        let output_path = dir.path().join("output.csv");

        let mut file = File::create(&csv_path).map_err(|e| RangeError::IoError(e.to_string()))?;
        writeln!(file, "id,geometry").map_err(|e| RangeError::IoError(e.to_string()))?;
        writeln!(file, "1,\"POINT(-122.3480 47.6215)\"")
            .map_err(|e| RangeError::IoError(e.to_string()))?;
        writeln!(
            file,
            "2,\"{{\"\"type\"\":\"\"Point\"\",\"\"coordinates\"\":[-122.196868,47.481489]}}\""
        )
        .map_err(|e| RangeError::IoError(e.to_string()))?;
        writeln!(file, "3,\"MULTIPOINT((-122.3493 47.6205),(-122.196868 47.481489))\"")
            .map_err(|e| RangeError::IoError(e.to_string()))?;

        let config = CsvRangeConfig::new(seattle(), "geometry");
        classify_csv(&csv_path, &output_path, &config)?;

        let rows = read_rows(&output_path)?;
        let flags: Vec<(&str, &str)> = rows.iter().map(|r| (&r[0], &r[3])).collect();
        assert_eq!(
            flags,
            vec![("1", "true"), ("2", "false"), ("3", "true"), ("3", "false")]
        );
        Ok(())
    }

    #[test]
    fn test_classify_flags_one_way() -> Result<(), RangeError> {
        let dir = tempdir().map_err(|e| RangeError::IoError(e.to_string()))?;
        let csv_path = dir.path().join("markers.csv");
        let output_path = dir.path().join("output.csv");

        let center = seattle();
        let range = range_query(&center, 500.0, 16)?;
        let mut markers = Vec::new();
        for bearing in (0..360).step_by(5) {
            let p = destination_point(&center, bearing as f64, 501.0)?;
            if range.contains_point(&p)? {
                markers.push(p);
            }
        }
        assert!(!markers.is_empty());

        let mut file = File::create(&csv_path).map_err(|e| RangeError::IoError(e.to_string()))?;
        writeln!(file, "lat,lng").map_err(|e| RangeError::IoError(e.to_string()))?;
        for p in &markers {
            writeln!(file, "{},{}", p.lat(), p.lng())
                .map_err(|e| RangeError::IoError(e.to_string()))?;
        }

        let settings = RangeSettings::default().one_way_policy(OneWayPolicy::Outbound);
        let config = CsvRangeConfig::from_coords(center, "lat", "lng").settings(settings);
        classify_csv(&csv_path, &output_path, &config)?;

        let rows = read_rows(&output_path)?;
        assert_eq!(rows.len(), markers.len());
        for row in &rows {
            assert_eq!(&row[3], "true");
            assert_eq!(&row[4], "true");
        }
        Ok(())
    }

    #[test]
    fn test_missing_column() -> Result<(), RangeError> {
        let dir = tempdir().map_err(|e| RangeError::IoError(e.to_string()))?;
        let csv_path = dir.path().join("markers.csv");
        let output_path = dir.path().join("output.csv");

        let mut file = File::create(&csv_path).map_err(|e| RangeError::IoError(e.to_string()))?;
        writeln!(file, "x,y").map_err(|e| RangeError::IoError(e.to_string()))?;
        writeln!(file, "1,2").map_err(|e| RangeError::IoError(e.to_string()))?;

        let config = CsvRangeConfig::from_coords(seattle(), "lat", "lng");
        let result = classify_csv(&csv_path, &output_path, &config);
        assert!(matches!(result, Err(RangeError::CsvError(msg)) if msg.contains("'lat'")));
        Ok(())
    }

    #[test]
    fn test_invalid_marker_row() -> Result<(), RangeError> {
        let dir = tempdir().map_err(|e| RangeError::IoError(e.to_string()))?;
        let csv_path = dir.path().join("markers.csv");
        let output_path = dir.path().join("output.csv");

        let mut file = File::create(&csv_path).map_err(|e| RangeError::IoError(e.to_string()))?;
        writeln!(file, "lat,lng").map_err(|e| RangeError::IoError(e.to_string()))?;
        writeln!(file, "95.0,10.0").map_err(|e| RangeError::IoError(e.to_string()))?;

        let config = CsvRangeConfig::from_coords(seattle(), "lat", "lng");
        assert_eq!(
            classify_csv(&csv_path, &output_path, &config),
            Err(RangeError::InvalidCoordinate { lat: 95.0, lng: 10.0 })
        );
        Ok(())
    }

    #[test]
    fn test_empty_geometry_is_an_error() -> Result<(), RangeError> {
        let dir = tempdir().map_err(|e| RangeError::IoError(e.to_string()))?;
        let csv_path = dir.path().join("markers.csv");
        let output_path = dir.path().join("output.csv");

        let mut file = File::create(&csv_path).map_err(|e| RangeError::IoError(e.to_string()))?;
        writeln!(file, "id,geometry").map_err(|e| RangeError::IoError(e.to_string()))?;
        writeln!(file, "1,\"POINT(-122.3493 47.6205)\"")
            .map_err(|e| RangeError::IoError(e.to_string()))?;
        writeln!(file, "2,\"LINESTRING EMPTY\"")
            .map_err(|e| RangeError::IoError(e.to_string()))?;

        let config = CsvRangeConfig::new(seattle(), "geometry");
        assert!(matches!(
            classify_csv(&csv_path, &output_path, &config),
            Err(RangeError::GeometryParseError(_))
        ));
        Ok(())
    }
}
