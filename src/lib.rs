//! seaice_regions: sea ice region masks for the NSIDC polar grids
//!
//! A set of one-shot tools used when producing the sea ice region mask
//! product. Each tool reads one input format, performs a single pass
//! transformation and writes one output file.
//!
//! ## Module Organization
//!
//! - [`grids`]: static grid geometry tables, grid families and resolutions
//! - [`quadrant`]: quadrant tiles: naming, loading, validation and orientation
//! - [`stitch`]: assembling four quadrants into one flat full-grid raster
//! - [`vertices`]: converting the region vertex spreadsheet export to a text table
//! - [`polygons`]: building per-region polygons from the vertex table
//! - [`metadata`]: CF / ACDD attributes and region flag labels
//! - [`netcdf_io`]: writing region masks to netCDF
//! - [`region_masks`]: locating stitched rasters and producing the product file
//! - [`parallel`]: Rayon thread pool configuration
//! - [`errors`]: centralized error handling
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::path::Path;
//! use seaice_regions::prelude::*;
//!
//! // Stitch regions_nh_UL.nc ... regions_nh_LL.nc on the 25 km north grid
//! let base = Path::new("regions_nh");
//! let composite = stitch(base, "psn25", 18).unwrap();
//! assert_eq!(composite.shape(), (448, 304));
//! composite.write_flat(&flat_output_path(base), false).unwrap();
//! ```

pub mod errors;
pub mod grids;
pub mod metadata;
pub mod netcdf_io;
pub mod parallel;
pub mod polygons;
pub mod quadrant;
pub mod region_masks;
pub mod stitch;
pub mod vertices;

pub use errors::*;

pub mod prelude {
    //! Commonly used imports for convenience
    pub use crate::errors::{RegionsError, Result};
    pub use crate::grids::{lookup_grid, GridFamily, GridGeometry, GridSpec, Hemisphere};
    pub use crate::parallel::ParallelConfig;
    pub use crate::quadrant::{Quadrant, QuadrantTile};
    pub use crate::stitch::{flat_output_path, stitch, stitch_to_flat, CompositeRaster};
}
