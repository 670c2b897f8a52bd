//! Defines command-line interface options using `clap` for seaice-regions.

use clap::{Parser, Subcommand};
use seaice_regions::region_masks::DEFAULT_PRODUCT_VERSION;
use std::path::PathBuf;

/// Tools for building sea ice region masks on NSIDC polar grids
#[derive(Parser, Debug)]
#[command(
    name = "seaice-regions",
    version,
    about = "Build sea ice region masks on NSIDC polar grids"
)]
pub struct Args {
    /// Increase log verbosity (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Number of threads used to load quadrant tiles. Defaults to rayon's global pool size.
    #[arg(short = 't', long, global = true)]
    pub threads: Option<usize>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Stitch {BASE}_UL/UR/LR/LL.nc into {BASE}.dat.
    ///
    /// The output is headerless row-major uint8 of shape
    /// (upper+lower, left+right) for the grid; see `grids` for the shapes.
    Stitch {
        /// Base file prefix of the quadrant files
        base_prefix: PathBuf,

        /// Grid name, e.g. psn25
        grid_name: String,

        /// Largest valid region value; higher values become 0.
        /// Defaults to 18 for northern grids and 5 for southern grids.
        #[arg(long)]
        max_region: Option<u8>,

        /// Replace an existing output file
        #[arg(long, default_value_t = false)]
        overwrite: bool,
    },

    /// Convert the region vertex spreadsheet export (.csv) to a text table
    CsvToTxt {
        /// Input CSV with Region, Lat, Lon, RegionNo, VertexNo columns
        input: PathBuf,

        /// Output text table
        output: PathBuf,
    },

    /// Build region polygons from a text vertex table.
    ///
    /// The input path must mark the hemisphere with _nh/nh_ or _sh/sh_.
    Polygons {
        /// Input text vertex table
        input: PathBuf,

        /// Output file: a .shp name writes a shapefile, anything else GeoJSON
        output: PathBuf,
    },

    /// Create the region-mask netCDF file for a grid from stitched .dat files
    RegionNetcdf {
        /// Grid id, e.g. psn25 or e2s6.25
        grid_id: String,

        /// Directory holding the stitched rasters. Defaults to ./{family}_fields
        #[arg(long)]
        fields_dir: Option<PathBuf>,

        /// Output path. Defaults to the product naming convention.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Product version written to the file and its name
        #[arg(long, default_value = DEFAULT_PRODUCT_VERSION)]
        product_version: String,

        /// Replace an existing output file
        #[arg(long, default_value_t = false)]
        overwrite: bool,
    },

    /// List known grid names with their stitched shapes
    Grids,
}
