/// Error type for drone-range operations.
#[derive(Debug, PartialEq)]
pub enum RangeError {
    /// Latitude/longitude is non-finite or outside [-90, 90] x [-180, 180].
    InvalidCoordinate { lat: f64, lng: f64 },
    /// The grid level is outside the valid range (0-27).
    InvalidLevel(u8),
    /// The travel radius is negative or non-finite.
    InvalidRadius(f64),
    /// A cube face index outside 0-5 was produced or supplied.
    InvalidFace(u8),
    /// A cell identifier could not be parsed or is out of bounds for its level.
    InvalidCellId(String),
    /// A calculation method key such as "500/16" could not be parsed.
    InvalidCalculationMethod(String),
    /// Failed to parse geometry from string (GeoJSON or WKT).
    GeometryParseError(String),
    /// CSV parsing or reading error.
    CsvError(String),
    /// File I/O error.
    IoError(String),
    /// Settings or GeoJSON (de)serialization error.
    SerializationError(String),
}

impl std::fmt::Display for RangeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RangeError::InvalidCoordinate { lat, lng } => {
                write!(f, "Invalid coordinate: lat={}, lng={}", lat, lng)
            }
            RangeError::InvalidLevel(l) => write!(f, "Invalid grid level: {}", l),
            RangeError::InvalidRadius(r) => write!(f, "Invalid radius: {}", r),
            RangeError::InvalidFace(face) => write!(f, "Invalid cube face: {}", face),
            RangeError::InvalidCellId(msg) => write!(f, "Invalid cell id: {}", msg),
            RangeError::InvalidCalculationMethod(msg) => {
                write!(f, "Invalid calculation method: {}", msg)
            }
            RangeError::GeometryParseError(msg) => write!(f, "Geometry parse error: {}", msg),
            RangeError::CsvError(msg) => write!(f, "CSV error: {}", msg),
            RangeError::IoError(msg) => write!(f, "IO error: {}", msg),
            RangeError::SerializationError(msg) => write!(f, "Serialization error: {}", msg),
        }
    }
}

impl std::error::Error for RangeError {}
