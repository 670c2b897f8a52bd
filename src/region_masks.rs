//! Region-mask netCDF generation from stitched rasters
//!
//! The stitched `.dat` rasters of one grid live in a per-family fields
//! directory (`./psn_fields`, `./e2s_fields`, ...):
//!
//! - `seaice_regions_{set}_{grid}.dat`: regions only
//! - `seaice_regions_{set}_{grid}_withland.dat`: regions with surface mask
//!
//! where `set` is `nh` in the north and `sh_orig` / `sh_RH` in the south.

use crate::errors::Result;
use crate::grids::{GridSpec, Hemisphere};
use crate::metadata::RegionScheme;
use crate::netcdf_io::{MaskField, RegionMaskWriter};
use crate::stitch::{ensure_writable, read_flat_raster};
use log::info;
use std::path::{Path, PathBuf};

pub const DEFAULT_PRODUCT_VERSION: &str = "v1.0";

/// One family of stitched rasters and the variables it becomes
struct MaskSet {
    file_key: &'static str,
    var_name: &'static str,
    scheme: RegionScheme,
    long_name: &'static str,
    surface_long_name: &'static str,
}

const NORTH_SETS: [MaskSet; 1] = [MaskSet {
    file_key: "nh",
    var_name: "sea_ice_region",
    scheme: RegionScheme::North,
    long_name: "sea ice region mask",
    surface_long_name: "sea ice region mask with surface mask",
}];

const SOUTH_SETS: [MaskSet; 2] = [
    MaskSet {
        file_key: "sh_orig",
        var_name: "sea_ice_region_NASA",
        scheme: RegionScheme::SouthNasa,
        long_name: "seaice region mask",
        surface_long_name: "seaice region mask (NASA) with surface mask",
    },
    MaskSet {
        file_key: "sh_RH",
        var_name: "sea_ice_region_RH",
        scheme: RegionScheme::SouthRh,
        long_name: "seaice region mask (RH)",
        surface_long_name: "seaice region mask (RH) with surface mask",
    },
];

fn mask_sets(hemisphere: Hemisphere) -> &'static [MaskSet] {
    match hemisphere {
        Hemisphere::North => &NORTH_SETS,
        Hemisphere::South => &SOUTH_SETS,
    }
}

/// Default fields directory for a grid, e.g. `./psn_fields`
pub fn default_fields_dir(spec: &GridSpec) -> PathBuf {
    PathBuf::from(format!("./{}_fields", spec.family.prefix()))
}

/// Product file name, e.g. `NSIDC-0780_SeaIceRegions_PS-N25km_v1.0.nc`
pub fn default_output_name(spec: &GridSpec, product_version: &str) -> String {
    format!(
        "NSIDC-0780_SeaIceRegions_{}-{}{}km_{}.nc",
        spec.family.projection_label(),
        spec.family.hemisphere().letter(),
        spec.resolution.label,
        product_version
    )
}

/// Paths of the region-only and with-land rasters for one mask set
pub fn mask_input_paths(fields_dir: &Path, file_key: &str, grid_id: &str) -> (PathBuf, PathBuf) {
    (
        fields_dir.join(format!("seaice_regions_{}_{}.dat", file_key, grid_id)),
        fields_dir.join(format!("seaice_regions_{}_{}_withland.dat", file_key, grid_id)),
    )
}

/// Reads every stitched raster required for `spec` into mask fields.
pub fn load_mask_fields(spec: &GridSpec, fields_dir: &Path) -> Result<Vec<MaskField>> {
    let grid_id = spec.grid_id();
    let shape = spec.shape();
    let mut fields = Vec::new();

    for set in mask_sets(spec.family.hemisphere()) {
        let (region_path, land_path) = mask_input_paths(fields_dir, set.file_key, &grid_id);
        info!("Reading region raster from {}", region_path.display());
        let regions = read_flat_raster(&region_path, shape)?;
        info!("Reading land/region raster from {}", land_path.display());
        let with_land = read_flat_raster(&land_path, shape)?;

        fields.push(MaskField {
            name: set.var_name.to_string(),
            long_name: set.long_name.to_string(),
            scheme: set.scheme,
            data: regions,
        });
        fields.push(MaskField {
            name: format!("{}_surface_mask", set.var_name),
            long_name: set.surface_long_name.to_string(),
            scheme: set.scheme,
            data: with_land,
        });
    }

    Ok(fields)
}

/// Builds the region-mask netCDF file for `grid_id`.
///
/// Returns the path that was written.
pub fn create_region_netcdf(
    grid_id: &str,
    fields_dir: Option<&Path>,
    output: Option<&Path>,
    product_version: &str,
    overwrite: bool,
) -> Result<PathBuf> {
    let spec = GridSpec::parse(grid_id)?;
    let fields_dir = fields_dir
        .map(Path::to_path_buf)
        .unwrap_or_else(|| default_fields_dir(&spec));
    let output = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(default_output_name(&spec, product_version)));

    ensure_writable(&output, overwrite)?;
    let fields = load_mask_fields(&spec, &fields_dir)?;

    RegionMaskWriter::new(&spec, &output)
        .overwrite(overwrite)
        .write(&fields, product_version)?;

    Ok(output)
}
