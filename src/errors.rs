//! Centralized error handling for seaice_regions
//!
//! Every failure is carried as a structured variant so that callers and tests
//! can match on the kind of failure and the offending grid, quadrant or path.

use crate::quadrant::Quadrant;
use std::fmt;
use std::path::PathBuf;

/// Main error type for seaice_regions operations
#[derive(Debug)]
pub enum RegionsError {
    /// Unknown grid name or grid id
    Configuration {
        grid_name: String,
        valid_names: Vec<String>,
    },

    /// An expected input file does not exist
    InputMissing {
        quadrant: Option<Quadrant>,
        path: PathBuf,
    },

    /// Decoded raster shape disagrees with the grid geometry.
    /// Shapes are `(rows, cols)`.
    ShapeMismatch {
        quadrant: Option<Quadrant>,
        path: PathBuf,
        expected: (usize, usize),
        actual: Vec<usize>,
    },

    /// The same quadrant was supplied more than once for one composite
    DuplicateQuadrant { quadrant: Quadrant },

    /// Output file already exists and overwrite was not requested
    OutputConflict { path: PathBuf },

    /// Variable not found in NetCDF file
    VariableNotFound { var: String, path: PathBuf },

    /// A vertex file path names neither or both hemispheres
    AmbiguousHemisphere { path: String },

    /// Malformed vertex table
    InvalidTable { message: String },

    /// NetCDF file operation errors
    NetCDFError(netcdf::Error),

    /// I/O operation errors
    IoError(std::io::Error),

    /// CSV / text table errors
    CsvError(csv::Error),

    /// GeoJSON serialization errors
    JsonError(serde_json::Error),

    /// Shapefile writing errors
    ShapefileError(shapefile::Error),

    /// Array shape or dimension error
    ArrayError(ndarray::ShapeError),

    /// Thread pool configuration error
    ThreadPoolError(String),
}

impl fmt::Display for RegionsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegionsError::Configuration {
                grid_name,
                valid_names,
            } => write!(
                f,
                "No such grid_name defined: {}. Possible grid names: {}",
                grid_name,
                valid_names.join(" ")
            ),
            RegionsError::InputMissing { quadrant, path } => match quadrant {
                Some(q) => write!(f, "Missing {} quadrant file: {}", q.suffix(), path.display()),
                None => write!(f, "No such input file: {}", path.display()),
            },
            RegionsError::ShapeMismatch {
                quadrant,
                path,
                expected,
                actual,
            } => {
                let label = quadrant.map(|q| q.suffix()).unwrap_or("raster");
                write!(
                    f,
                    "Shape mismatch for {} {}: expected ({}, {}), found {:?}",
                    label,
                    path.display(),
                    expected.0,
                    expected.1,
                    actual
                )
            }
            RegionsError::DuplicateQuadrant { quadrant } => {
                write!(f, "Quadrant {} supplied more than once", quadrant)
            }
            RegionsError::OutputConflict { path } => {
                write!(f, "{} exists, but overwrite is not enabled", path.display())
            }
            RegionsError::VariableNotFound { var, path } => {
                write!(f, "Variable '{}' not found in {}", var, path.display())
            }
            RegionsError::AmbiguousHemisphere { path } => write!(
                f,
                "Need exactly one of nh or sh in input path: {}",
                path
            ),
            RegionsError::InvalidTable { message } => write!(f, "Invalid vertex table: {}", message),
            RegionsError::NetCDFError(e) => write!(f, "NetCDF error: {}", e),
            RegionsError::IoError(e) => write!(f, "I/O error: {}", e),
            RegionsError::CsvError(e) => write!(f, "CSV error: {}", e),
            RegionsError::JsonError(e) => write!(f, "JSON error: {}", e),
            RegionsError::ShapefileError(e) => write!(f, "Shapefile error: {}", e),
            RegionsError::ArrayError(e) => write!(f, "Array error: {}", e),
            RegionsError::ThreadPoolError(msg) => write!(f, "Thread pool error: {}", msg),
        }
    }
}

impl std::error::Error for RegionsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RegionsError::NetCDFError(e) => Some(e),
            RegionsError::IoError(e) => Some(e),
            RegionsError::CsvError(e) => Some(e),
            RegionsError::JsonError(e) => Some(e),
            RegionsError::ShapefileError(e) => Some(e),
            RegionsError::ArrayError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<netcdf::Error> for RegionsError {
    fn from(error: netcdf::Error) -> Self {
        RegionsError::NetCDFError(error)
    }
}

impl From<std::io::Error> for RegionsError {
    fn from(error: std::io::Error) -> Self {
        RegionsError::IoError(error)
    }
}

impl From<csv::Error> for RegionsError {
    fn from(error: csv::Error) -> Self {
        RegionsError::CsvError(error)
    }
}

impl From<serde_json::Error> for RegionsError {
    fn from(error: serde_json::Error) -> Self {
        RegionsError::JsonError(error)
    }
}

impl From<shapefile::Error> for RegionsError {
    fn from(error: shapefile::Error) -> Self {
        RegionsError::ShapefileError(error)
    }
}

impl From<ndarray::ShapeError> for RegionsError {
    fn from(error: ndarray::ShapeError) -> Self {
        RegionsError::ArrayError(error)
    }
}

/// Result type alias for seaice_regions operations
pub type Result<T> = std::result::Result<T, RegionsError>;
