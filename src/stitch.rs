//! Quadrant stitching
//!
//! Four quadrant tiles are loaded, validated, flipped and clipped, then copied
//! into disjoint rectangles of one zero-filled composite:
//!
//! ```text
//!            left_width   right_width
//!          +------------+-------------+
//!  upper   |     UL     |     UR      |
//!          +------------+-------------+
//!  lower   |     LL     |     LR      |
//!          +------------+-------------+
//! ```
//!
//! The composite is written as a flat `.dat` file: row-major, one byte per
//! pixel, no header. Its shape `(height, width)` is not stored in the file and
//! must be taken from the grid geometry.

use crate::errors::{RegionsError, Result};
use crate::grids::{lookup_grid, GridGeometry};
use crate::quadrant::{Quadrant, QuadrantTile};
use log::{debug, info};
use ndarray::{s, Array2};
use rayon::prelude::*;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Extension of the stitched raw raster
pub const FLAT_RASTER_EXTENSION: &str = "dat";

/// The assembled full-grid raster
#[derive(Debug, Clone, PartialEq)]
pub struct CompositeRaster {
    data: Array2<u8>,
}

impl CompositeRaster {
    /// Zero-filled raster of shape `(height, width)`
    pub fn zeros(height: usize, width: usize) -> Self {
        Self {
            data: Array2::zeros((height, width)),
        }
    }

    pub fn width(&self) -> usize {
        self.data.ncols()
    }

    pub fn height(&self) -> usize {
        self.data.nrows()
    }

    /// Shape as `(rows, cols)`
    pub fn shape(&self) -> (usize, usize) {
        self.data.dim()
    }

    pub fn data(&self) -> &Array2<u8> {
        &self.data
    }

    /// Writes the pixels as a headerless row-major byte file.
    ///
    /// Fails with [`RegionsError::OutputConflict`] when `path` exists and
    /// `overwrite` is false.
    pub fn write_flat(&self, path: &Path, overwrite: bool) -> Result<()> {
        ensure_writable(path, overwrite)?;
        let bytes: Vec<u8> = self.data.iter().copied().collect();
        fs::write(path, bytes)?;
        info!(
            "Wrote {} bytes of shape ({}, {}) to {}",
            self.data.len(),
            self.height(),
            self.width(),
            path.display()
        );
        Ok(())
    }
}

/// Refuses to proceed when `path` exists and overwriting was not requested.
pub fn ensure_writable(path: &Path, overwrite: bool) -> Result<()> {
    if !overwrite && path.exists() {
        return Err(RegionsError::OutputConflict {
            path: path.to_path_buf(),
        });
    }
    Ok(())
}

/// Conventional output path `{base_prefix}.dat`
pub fn flat_output_path(base_prefix: &Path) -> PathBuf {
    let mut name = base_prefix.as_os_str().to_owned();
    name.push(format!(".{}", FLAT_RASTER_EXTENSION));
    PathBuf::from(name)
}

/// Reads a headerless byte raster back into shape `(rows, cols)`.
pub fn read_flat_raster(path: &Path, shape: (usize, usize)) -> Result<Array2<u8>> {
    if !path.is_file() {
        return Err(RegionsError::InputMissing {
            quadrant: None,
            path: path.to_path_buf(),
        });
    }
    let bytes = fs::read(path)?;
    if bytes.len() != shape.0 * shape.1 {
        return Err(RegionsError::ShapeMismatch {
            quadrant: None,
            path: path.to_path_buf(),
            expected: shape,
            actual: vec![bytes.len()],
        });
    }
    Ok(Array2::from_shape_vec(shape, bytes)?)
}

/// Stitches the four quadrant files of `base_prefix` on the named grid.
pub fn stitch(base_prefix: &Path, grid_name: &str, max_region: u8) -> Result<CompositeRaster> {
    let geometry = lookup_grid(grid_name)?;
    stitch_with_geometry(base_prefix, geometry, max_region)
}

/// Stitches the four quadrant files of `base_prefix` using a resolved geometry.
///
/// Tiles are loaded on the rayon pool. Failures are reported in the fixed
/// UL, UR, LR, LL order, so the first bad quadrant in that order wins.
pub fn stitch_with_geometry(
    base_prefix: &Path,
    geometry: &GridGeometry,
    max_region: u8,
) -> Result<CompositeRaster> {
    info!(
        "Stitching {} quadrants of {} (max region {})",
        geometry.name,
        base_prefix.display(),
        max_region
    );

    let loaded: Vec<Result<QuadrantTile>> = Quadrant::ALL
        .par_iter()
        .map(|&quadrant| QuadrantTile::load(quadrant, base_prefix, geometry))
        .collect();
    let tiles = loaded.into_iter().collect::<Result<Vec<_>>>()?;

    assemble(geometry, tiles, max_region)
}

/// Stitches `base_prefix` on the named grid and writes `{base_prefix}.dat`.
///
/// The output path is checked before any tile is read, so an existing file
/// without `overwrite` fails fast. `max_region` defaults to the region count
/// of the grid's family. Returns the written path with the composite.
pub fn stitch_to_flat(
    base_prefix: &Path,
    grid_name: &str,
    max_region: Option<u8>,
    overwrite: bool,
) -> Result<(PathBuf, CompositeRaster)> {
    let geometry = lookup_grid(grid_name)?;
    let output = flat_output_path(base_prefix);
    ensure_writable(&output, overwrite)?;

    let max_region = match max_region {
        Some(v) => v,
        None => geometry.family()?.region_count(),
    };
    let composite = stitch_with_geometry(base_prefix, geometry, max_region)?;
    composite.write_flat(&output, overwrite)?;
    Ok((output, composite))
}

/// Orients, clips and places already-validated tiles into a new composite.
///
/// Each quadrant may appear at most once and must match `geometry`; a
/// missing quadrant leaves its rectangle zero-filled.
pub fn assemble(
    geometry: &GridGeometry,
    tiles: Vec<QuadrantTile>,
    max_region: u8,
) -> Result<CompositeRaster> {
    let (height, width) = geometry.shape();
    let mut composite = CompositeRaster::zeros(height, width);
    let mut placed = HashSet::new();

    for tile in tiles {
        let quadrant = tile.quadrant();
        if !placed.insert(quadrant) {
            return Err(RegionsError::DuplicateQuadrant { quadrant });
        }

        // tiles may have been validated against another grid
        let (rows, cols) = quadrant.expected_shape(geometry);
        if tile.data().dim() != (rows, cols) {
            return Err(RegionsError::ShapeMismatch {
                quadrant: Some(quadrant),
                path: tile.path().to_path_buf(),
                expected: (rows, cols),
                actual: tile.data().shape().to_vec(),
            });
        }
        let (row0, col0) = quadrant.origin(geometry);
        debug!(
            "{}: rows [{}, {}) cols [{}, {})",
            quadrant,
            row0,
            row0 + rows,
            col0,
            col0 + cols
        );

        let oriented = tile.into_oriented(max_region);
        composite
            .data
            .slice_mut(s![row0..row0 + rows, col0..col0 + cols])
            .assign(&oriented);
    }

    Ok(composite)
}
