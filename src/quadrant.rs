//! Quadrant tiles of a polar grid
//!
//! The reprojection step produces one single-band netCDF file per quadrant,
//! named `{base}_{UL|UR|LR|LL}.nc`. Each tile is stored bottom-to-top and is
//! validated against the grid geometry before it is flipped and clipped.

use crate::errors::{RegionsError, Result};
use crate::grids::GridGeometry;
use log::debug;
use ndarray::{s, Array2};
use std::fmt;
use std::path::{Path, PathBuf};

/// File extension of the reprojected quadrant files
pub const QUADRANT_EXTENSION: &str = "nc";

/// One of the four rectangular tiles of a full grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quadrant {
    UpperLeft,
    UpperRight,
    LowerRight,
    LowerLeft,
}

/// Which side of the grid a quadrant covers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Row {
    Upper,
    Lower,
}

// suffix, column, row
const QUADRANT_LAYOUT: [(Quadrant, &str, Column, Row); 4] = [
    (Quadrant::UpperLeft, "UL", Column::Left, Row::Upper),
    (Quadrant::UpperRight, "UR", Column::Right, Row::Upper),
    (Quadrant::LowerRight, "LR", Column::Right, Row::Lower),
    (Quadrant::LowerLeft, "LL", Column::Left, Row::Lower),
];

impl Quadrant {
    /// Processing order used by the stitcher
    pub const ALL: [Quadrant; 4] = [
        Quadrant::UpperLeft,
        Quadrant::UpperRight,
        Quadrant::LowerRight,
        Quadrant::LowerLeft,
    ];

    fn layout(&self) -> (&'static str, Column, Row) {
        let (_, suffix, column, row) = QUADRANT_LAYOUT[*self as usize];
        (suffix, column, row)
    }

    /// File name suffix, e.g. `UL`
    pub fn suffix(&self) -> &'static str {
        self.layout().0
    }

    /// Expected tile size as `(width, height)`
    pub fn expected_size(&self, geometry: &GridGeometry) -> (usize, usize) {
        let (_, column, row) = self.layout();
        let width = match column {
            Column::Left => geometry.left_width,
            Column::Right => geometry.right_width,
        };
        let height = match row {
            Row::Upper => geometry.upper_height,
            Row::Lower => geometry.lower_height,
        };
        (width, height)
    }

    /// Expected tile shape as `(rows, cols)`
    pub fn expected_shape(&self, geometry: &GridGeometry) -> (usize, usize) {
        let (width, height) = self.expected_size(geometry);
        (height, width)
    }

    /// Top-left corner of this quadrant inside the composite, as `(row, col)`
    pub fn origin(&self, geometry: &GridGeometry) -> (usize, usize) {
        let (_, column, row) = self.layout();
        let row0 = match row {
            Row::Upper => 0,
            Row::Lower => geometry.upper_height,
        };
        let col0 = match column {
            Column::Left => 0,
            Column::Right => geometry.left_width,
        };
        (row0, col0)
    }

    /// Path of this quadrant's file for a given base prefix
    pub fn tile_path(&self, base_prefix: &Path) -> PathBuf {
        let mut name = base_prefix.as_os_str().to_owned();
        name.push(format!("_{}.{}", self.suffix(), QUADRANT_EXTENSION));
        PathBuf::from(name)
    }
}

impl fmt::Display for Quadrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

/// A decoded, shape-checked quadrant tile
#[derive(Debug, Clone)]
pub struct QuadrantTile {
    quadrant: Quadrant,
    path: PathBuf,
    /// Raw pixel values as stored in the file (bottom row first)
    data: Array2<u8>,
}

impl QuadrantTile {
    pub fn quadrant(&self) -> Quadrant {
        self.quadrant
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn data(&self) -> &Array2<u8> {
        &self.data
    }

    /// Wraps already-decoded pixels, rejecting any shape other than the one
    /// the geometry prescribes for `quadrant`.
    pub fn from_array(
        quadrant: Quadrant,
        path: PathBuf,
        data: Array2<u8>,
        geometry: &GridGeometry,
    ) -> Result<Self> {
        let expected = quadrant.expected_shape(geometry);
        if data.dim() != expected {
            return Err(RegionsError::ShapeMismatch {
                quadrant: Some(quadrant),
                path,
                expected,
                actual: data.shape().to_vec(),
            });
        }
        Ok(Self {
            quadrant,
            path,
            data,
        })
    }

    /// Loads the quadrant file for `base_prefix` and decodes its band.
    ///
    /// Values are read as stored; no fill-value masking or scaling is applied.
    pub fn load(quadrant: Quadrant, base_prefix: &Path, geometry: &GridGeometry) -> Result<Self> {
        let path = quadrant.tile_path(base_prefix);
        if !path.is_file() {
            return Err(RegionsError::InputMissing {
                quadrant: Some(quadrant),
                path,
            });
        }

        let (width, height) = quadrant.expected_size(geometry);
        debug!("{}: ({}, {}) from {}", quadrant, width, height, path.display());

        let file = netcdf::open(&path)?;
        let band = geometry.band_name();
        let var = file
            .variable(band)
            .ok_or_else(|| RegionsError::VariableNotFound {
                var: band.to_string(),
                path: path.clone(),
            })?;

        let shape: Vec<usize> = var.dimensions().iter().map(|d| d.len()).collect();
        if shape != [height, width] {
            return Err(RegionsError::ShapeMismatch {
                quadrant: Some(quadrant),
                path,
                expected: (height, width),
                actual: shape,
            });
        }

        let values = var.get_values::<u8, _>(..)?;
        let data = Array2::from_shape_vec((height, width), values)?;
        Self::from_array(quadrant, path, data, geometry)
    }

    /// Flips the tile top-to-bottom and resets every value above
    /// `max_region` to 0.
    pub fn into_oriented(self, max_region: u8) -> Array2<u8> {
        let mut oriented = self.data.slice(s![..;-1, ..]).to_owned();
        oriented.mapv_inplace(|v| if v > max_region { 0 } else { v });
        oriented
    }
}
