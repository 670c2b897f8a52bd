//! Static grid tables for the NSIDC polar grids
//!
//! Grid names follow the `{family}{resolution}` convention used across the
//! workflow, e.g. `psn25` (polar stereographic north, 25 km) or `e2s6.25`
//! (EASE-Grid 2.0 south, 6.25 km). The tables here are immutable
//! configuration; nothing in the crate mutates them.

use crate::errors::{RegionsError, Result};

/// Band name used by the reprojected quadrant files when none is configured
pub const DEFAULT_BAND_NAME: &str = "Band1";

/// Pixel extents contributed by each quadrant pair of a named grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridGeometry {
    pub name: &'static str,
    pub left_width: usize,
    pub right_width: usize,
    pub upper_height: usize,
    pub lower_height: usize,
    pub band_name: Option<&'static str>,
}

impl GridGeometry {
    const fn new(
        name: &'static str,
        left_width: usize,
        right_width: usize,
        upper_height: usize,
        lower_height: usize,
    ) -> Self {
        Self {
            name,
            left_width,
            right_width,
            upper_height,
            lower_height,
            band_name: None,
        }
    }

    /// Full raster width in pixels
    pub fn width(&self) -> usize {
        self.left_width + self.right_width
    }

    /// Full raster height in pixels
    pub fn height(&self) -> usize {
        self.upper_height + self.lower_height
    }

    /// Full raster shape as `(rows, cols)`
    pub fn shape(&self) -> (usize, usize) {
        (self.height(), self.width())
    }

    /// Name of the band holding the quadrant data
    pub fn band_name(&self) -> &'static str {
        self.band_name.unwrap_or(DEFAULT_BAND_NAME)
    }

    /// The projection family this grid belongs to
    pub fn family(&self) -> Result<GridFamily> {
        GridFamily::from_grid_name(self.name)
    }
}

/// All grids that can be stitched from quadrants
pub const GRID_TABLE: &[GridGeometry] = &[
    GridGeometry::new("psn25", 154, 150, 234, 214),
    GridGeometry::new("psn12.5", 308, 300, 468, 428),
    GridGeometry::new("psn6.25", 616, 600, 936, 856),
    GridGeometry::new("psn3.125", 1232, 1200, 1872, 1712),
    GridGeometry::new("pss25", 158, 158, 174, 158),
    GridGeometry::new("pss12.5", 316, 316, 348, 316),
    GridGeometry::new("pss6.25", 632, 632, 696, 632),
    GridGeometry::new("pss3.125", 1264, 1264, 1392, 1264),
    GridGeometry::new("e2n25", 360, 360, 360, 360),
    GridGeometry::new("e2n12.5", 720, 720, 720, 720),
    GridGeometry::new("e2n6.25", 1440, 1440, 1440, 1440),
    GridGeometry::new("e2n3.125", 2880, 2880, 2880, 2880),
    GridGeometry::new("e2s25", 360, 360, 360, 360),
    GridGeometry::new("e2s12.5", 720, 720, 720, 720),
    GridGeometry::new("e2s6.25", 1440, 1440, 1440, 1440),
    GridGeometry::new("e2s3.125", 2880, 2880, 2880, 2880),
];

/// Names of every grid in [`GRID_TABLE`], in table order
pub fn grid_names() -> Vec<String> {
    GRID_TABLE.iter().map(|g| g.name.to_string()).collect()
}

fn unknown_grid(grid_name: &str) -> RegionsError {
    RegionsError::Configuration {
        grid_name: grid_name.to_string(),
        valid_names: grid_names(),
    }
}

/// Resolves a grid name to its geometry.
pub fn lookup_grid(grid_name: &str) -> Result<&'static GridGeometry> {
    GRID_TABLE
        .iter()
        .find(|g| g.name == grid_name)
        .ok_or_else(|| unknown_grid(grid_name))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hemisphere {
    North,
    South,
}

impl Hemisphere {
    /// Detects the hemisphere from a vertex file path.
    ///
    /// The whole path is searched, so a marker in a directory name counts.
    /// It must contain `_nh`/`nh_` or `_sh`/`sh_`, but not both.
    pub fn from_path(path: &str) -> Result<Self> {
        let is_nh = path.contains("_nh") || path.contains("nh_");
        let is_sh = path.contains("_sh") || path.contains("sh_");
        match (is_nh, is_sh) {
            (true, false) => Ok(Hemisphere::North),
            (false, true) => Ok(Hemisphere::South),
            _ => Err(RegionsError::AmbiguousHemisphere {
                path: path.to_string(),
            }),
        }
    }

    /// Upper case hemisphere letter used in product file names
    pub fn letter(&self) -> char {
        match self {
            Hemisphere::North => 'N',
            Hemisphere::South => 'S',
        }
    }
}

/// Projection and hemisphere family of a grid name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridFamily {
    /// NSIDC polar stereographic north
    Psn,
    /// NSIDC polar stereographic south
    Pss,
    /// EASE-Grid 2.0 north
    E2n,
    /// EASE-Grid 2.0 south
    E2s,
}

/// Projected extent of a grid family, in metres
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProjectedExtent {
    pub xleft: i64,
    pub xright: i64,
    pub yupper: i64,
    pub ylower: i64,
}

impl GridFamily {
    pub const ALL: [GridFamily; 4] = [
        GridFamily::Psn,
        GridFamily::Pss,
        GridFamily::E2n,
        GridFamily::E2s,
    ];

    pub fn from_grid_name(grid_name: &str) -> Result<Self> {
        let prefix = grid_name.get(..3).unwrap_or("");
        GridFamily::ALL
            .into_iter()
            .find(|family| family.prefix() == prefix)
            .ok_or_else(|| unknown_grid(grid_name))
    }

    pub fn prefix(&self) -> &'static str {
        match self {
            GridFamily::Psn => "psn",
            GridFamily::Pss => "pss",
            GridFamily::E2n => "e2n",
            GridFamily::E2s => "e2s",
        }
    }

    pub fn hemisphere(&self) -> Hemisphere {
        match self {
            GridFamily::Psn | GridFamily::E2n => Hemisphere::North,
            GridFamily::Pss | GridFamily::E2s => Hemisphere::South,
        }
    }

    /// Number of named sea regions mapped on grids of this family
    pub fn region_count(&self) -> u8 {
        match self.hemisphere() {
            Hemisphere::North => 18,
            Hemisphere::South => 5,
        }
    }

    pub fn extent(&self) -> ProjectedExtent {
        match self {
            GridFamily::Psn => ProjectedExtent {
                xleft: -3_850_000,
                xright: 3_750_000,
                yupper: 5_850_000,
                ylower: -5_350_000,
            },
            GridFamily::Pss => ProjectedExtent {
                xleft: -3_950_000,
                xright: 3_950_000,
                yupper: 4_350_000,
                ylower: -3_950_000,
            },
            GridFamily::E2n | GridFamily::E2s => ProjectedExtent {
                xleft: -9_000_000,
                xright: 9_000_000,
                yupper: 9_000_000,
                ylower: -9_000_000,
            },
        }
    }

    /// Human readable grid description used in titles
    pub fn description(&self) -> &'static str {
        match self {
            GridFamily::Psn => "NSIDC Polar Stereo Northern Hemisphere",
            GridFamily::Pss => "NSIDC Polar Stereo Southern Hemisphere",
            GridFamily::E2n => "EASE 2.0 Northern Hemisphere",
            GridFamily::E2s => "EASE 2.0 Southern Hemisphere",
        }
    }

    /// Projection label used in product file names
    pub fn projection_label(&self) -> &'static str {
        match self {
            GridFamily::Psn | GridFamily::Pss => "PS",
            GridFamily::E2n | GridFamily::E2s => "EASE2",
        }
    }

    /// EPSG code reported as `geospatial_bounds_crs`
    pub fn epsg(&self) -> u32 {
        match self {
            GridFamily::Psn => 3411,
            GridFamily::Pss => 3412,
            GridFamily::E2n => 6931,
            GridFamily::E2s => 6932,
        }
    }

    /// Latitude coverage as `(min, max)` in degrees north
    pub fn lat_range(&self) -> (f64, f64) {
        match self {
            GridFamily::Psn => (30.98, 90.0),
            GridFamily::Pss => (-90.0, -39.23),
            GridFamily::E2n => (0.0, 90.0),
            GridFamily::E2s => (-90.0, 0.0),
        }
    }
}

/// Nominal grid cell size of a grid name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridResolution {
    pub metres: i64,
    /// Resolution as written in grid names, e.g. `12.5`
    pub label: &'static str,
}

impl GridResolution {
    const KNOWN: [GridResolution; 4] = [
        GridResolution { metres: 3125, label: "3.125" },
        GridResolution { metres: 6250, label: "6.25" },
        GridResolution { metres: 12500, label: "12.5" },
        GridResolution { metres: 25000, label: "25" },
    ];

    pub fn from_grid_name(grid_name: &str) -> Result<Self> {
        let suffix = grid_name.get(3..).unwrap_or("");
        GridResolution::KNOWN
            .into_iter()
            .find(|res| res.label == suffix)
            .ok_or_else(|| unknown_grid(grid_name))
    }
}

/// A fully resolved grid id: family plus resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridSpec {
    pub family: GridFamily,
    pub resolution: GridResolution,
}

impl GridSpec {
    pub fn parse(grid_id: &str) -> Result<Self> {
        Ok(Self {
            family: GridFamily::from_grid_name(grid_id)?,
            resolution: GridResolution::from_grid_name(grid_id)?,
        })
    }

    pub fn grid_id(&self) -> String {
        format!("{}{}", self.family.prefix(), self.resolution.label)
    }

    /// Raster shape `(rows, cols)` covering the family extent at this resolution
    pub fn shape(&self) -> (usize, usize) {
        let ext = self.family.extent();
        let res = self.resolution.metres;
        (
            ((ext.yupper - ext.ylower) / res) as usize,
            ((ext.xright - ext.xleft) / res) as usize,
        )
    }

    /// Cell centre x coordinates, west to east
    pub fn x_coords(&self) -> Vec<f32> {
        let ext = self.family.extent();
        let res = self.resolution.metres as f64;
        (0..self.shape().1)
            .map(|i| (ext.xleft as f64 + res * (i as f64 + 0.5)) as f32)
            .collect()
    }

    /// Cell centre y coordinates, north to south
    pub fn y_coords(&self) -> Vec<f32> {
        let ext = self.family.extent();
        let res = self.resolution.metres as f64;
        (0..self.shape().0)
            .map(|j| (ext.yupper as f64 - res * (j as f64 + 0.5)) as f32)
            .collect()
    }
}
