//! CF / ACDD metadata for region-mask netCDF files
//!
//! This module holds the static attribute sets written alongside the region
//! rasters: flag labels for each region numbering scheme, the grid-mapping
//! (`crs`) attributes of each grid family and the ACDD global attributes.

use crate::grids::{GridFamily, GridSpec, Hemisphere};
use log::warn;
use netcdf::AttributeValue;
use std::collections::BTreeSet;

/// Named attribute ready to be written to a variable or a file
pub type Attribute = (&'static str, AttributeValue);

/// Fill value of the byte region rasters
pub const REGION_FILL_VALUE: u8 = 255;

pub const NO_REGION_LABEL: &str = "ocean_no_region_specified";

const NORTH_REGIONS: [&str; 18] = [
    "central_arctic",
    "beaufort_sea",
    "chukchi_sea",
    "east_siberian_sea",
    "laptev_sea",
    "kara_sea",
    "barents_sea",
    "east_greenland_sea",
    "baffin_bay_and_labrador_seas",
    "gulf_of_st_lawrence",
    "hudson_bay",
    "canadian_archipelago",
    "bering_sea",
    "sea_of_okhotsk",
    "sea_of_japan",
    "bohai_and_yellow_seas",
    "baltic_sea",
    "gulf_of_alaska",
];

const SOUTH_NASA_REGIONS: [&str; 5] = [
    "weddell_sea",
    "indian_ocean",
    "south_pacific_ocean",
    "ross_sea",
    "amundsen_and_bellingshausen_seas",
];

const SOUTH_RH_REGIONS: [&str; 5] = [
    "weddell_sea",
    "kinghaakonVII_sea",
    "east_antarctica",
    "ross_and_amundsen_seas",
    "amundsen_and_bellingshausen_seas",
];

const SURFACE_CLASSES: [(u8, &str); 6] = [
    (30, "land"),
    (32, "fresh_free_water"),
    (33, "ice_on_land"),
    (34, "floating_ice_shelf"),
    (35, "ocean_disconnected"),
    (40, "off_earth"),
];

/// Region numbering scheme of a mask variable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionScheme {
    /// Northern hemisphere, 18 regions
    North,
    /// Southern hemisphere, NASA sectors
    SouthNasa,
    /// Southern hemisphere, RH sectors
    SouthRh,
}

impl RegionScheme {
    fn regions(&self) -> &'static [&'static str] {
        match self {
            RegionScheme::North => &NORTH_REGIONS,
            RegionScheme::SouthNasa => &SOUTH_NASA_REGIONS,
            RegionScheme::SouthRh => &SOUTH_RH_REGIONS,
        }
    }

    /// Flag label of a raster value, if it has one
    pub fn label(&self, value: u8) -> Option<&'static str> {
        if value == 0 {
            return Some(NO_REGION_LABEL);
        }
        let regions = self.regions();
        if (value as usize) <= regions.len() {
            return Some(regions[value as usize - 1]);
        }
        SURFACE_CLASSES
            .iter()
            .find(|(v, _)| *v == value)
            .map(|(_, label)| *label)
    }

    /// Space separated `flag_meanings` for the given `flag_values`.
    ///
    /// Values without a label are skipped with a warning.
    pub fn flag_meanings(&self, values: &[u8]) -> String {
        values
            .iter()
            .filter_map(|&v| {
                let label = self.label(v);
                if label.is_none() {
                    warn!("No flag label for value {} in {:?} scheme", v, self);
                }
                label
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Sorted distinct values of a raster, used as `flag_values`
pub fn flag_values<'a>(values: impl IntoIterator<Item = &'a u8>) -> Vec<u8> {
    values
        .into_iter()
        .copied()
        .collect::<BTreeSet<u8>>()
        .into_iter()
        .collect()
}

fn text(value: impl Into<String>) -> AttributeValue {
    AttributeValue::Str(value.into())
}

const PSN_WKT: &str = r#"PROJCS["WGS 84 / NSIDC Sea Ice Polar Stereographic North",GEOGCS["WGS 84",DATUM["WGS_1984",SPHEROID["WGS 84",6378137,298.257223563,AUTHORITY["EPSG","7030"]],AUTHORITY["EPSG","6326"]],PRIMEM["Greenwich",0,AUTHORITY["EPSG","8901"]],UNIT["degree",0.0174532925199433,AUTHORITY["EPSG","9122"]],AUTHORITY["EPSG","4326"]],PROJECTION["Polar_Stereographic"],PARAMETER["latitude_of_origin",70],PARAMETER["central_meridian",-45],PARAMETER["false_easting",0],PARAMETER["false_northing",0],UNIT["metre",1,AUTHORITY["EPSG","9001"]],AXIS["Easting",SOUTH],AXIS["Northing",SOUTH],AUTHORITY["EPSG","3413"]]"#;

const PSS_WKT: &str = r#"PROJCS["WGS 84 / NSIDC Sea Ice Polar Stereographic South",GEOGCS["WGS 84",DATUM["WGS_1984",SPHEROID["WGS 84",6378137,298.257223563,AUTHORITY["EPSG","7030"]],AUTHORITY["EPSG","6326"]],PRIMEM["Greenwich",0,AUTHORITY["EPSG","8901"]],UNIT["degree",0.0174532925199433,AUTHORITY["EPSG","9122"]],AUTHORITY["EPSG","4326"]],PROJECTION["Polar_Stereographic"],PARAMETER["latitude_of_origin",-70],PARAMETER["central_meridian",0],PARAMETER["false_easting",0],PARAMETER["false_northing",0],UNIT["metre",1,AUTHORITY["EPSG","9001"]],AXIS["Easting",NORTH],AXIS["Northing",NORTH],AUTHORITY["EPSG","3976"]]"#;

const E2N_WKT: &str = r#"PROJCS["WGS 84 / NSIDC EASE-Grid 2.0 North",GEOGCS["WGS 84",DATUM["WGS_1984",SPHEROID["WGS 84",6378137,298.257223563,AUTHORITY["EPSG","7030"]],AUTHORITY["EPSG","6326"]],PRIMEM["Greenwich",0,AUTHORITY["EPSG","8901"]],UNIT["degree",0.0174532925199433,AUTHORITY["EPSG","9122"]],AUTHORITY["EPSG","4326"]],PROJECTION["Lambert_Azimuthal_Equal_Area"],PARAMETER["latitude_of_center",90],PARAMETER["longitude_of_center",0],PARAMETER["false_easting",0],PARAMETER["false_northing",0],UNIT["metre",1,AUTHORITY["EPSG","9001"]],AXIS["Easting",SOUTH],AXIS["Northing",SOUTH],AUTHORITY["EPSG","6931"]]"#;

const E2S_WKT: &str = r#"PROJCS["WGS 84 / NSIDC EASE-Grid 2.0 South",GEOGCS["WGS 84",DATUM["WGS_1984",SPHEROID["WGS 84",6378137,298.257223563,AUTHORITY["EPSG","7030"]],AUTHORITY["EPSG","6326"]],PRIMEM["Greenwich",0,AUTHORITY["EPSG","8901"]],UNIT["degree",0.0174532925199433,AUTHORITY["EPSG","9122"]],AUTHORITY["EPSG","4326"]],PROJECTION["Lambert_Azimuthal_Equal_Area"],PARAMETER["latitude_of_center",-90],PARAMETER["longitude_of_center",0],PARAMETER["false_easting",0],PARAMETER["false_northing",0],UNIT["metre",1,AUTHORITY["EPSG","9001"]],AXIS["Easting",NORTH],AXIS["Northing",NORTH],AUTHORITY["EPSG","6932"]]"#;

/// Grid-mapping attributes of the scalar `crs` variable
pub fn crs_attributes(spec: &GridSpec) -> Vec<Attribute> {
    let family = spec.family;
    let ext = family.extent();
    let res = spec.resolution.metres;

    let mut attrs: Vec<Attribute> = match family {
        GridFamily::Psn | GridFamily::Pss => {
            let (meridian, origin_lat, parallel) = match family.hemisphere() {
                Hemisphere::North => (-45.0, 90.0, 70.0),
                Hemisphere::South => (0.0, -90.0, -70.0),
            };
            vec![
                ("grid_mapping_name", text("polar_stereographic")),
                (
                    "straight_vertical_longitude_from_pole",
                    AttributeValue::Double(meridian),
                ),
                ("false_easting", AttributeValue::Double(0.0)),
                ("false_northing", AttributeValue::Double(0.0)),
                (
                    "latitude_of_projection_origin",
                    AttributeValue::Double(origin_lat),
                ),
                ("standard_parallel", AttributeValue::Double(parallel)),
            ]
        }
        GridFamily::E2n | GridFamily::E2s => {
            let origin_lat = match family.hemisphere() {
                Hemisphere::North => 90.0,
                Hemisphere::South => -90.0,
            };
            vec![
                ("grid_mapping_name", text("lambert_azimuthal_equal_area")),
                ("false_easting", AttributeValue::Double(0.0)),
                ("false_northing", AttributeValue::Double(0.0)),
                (
                    "latitude_of_projection_origin",
                    AttributeValue::Double(origin_lat),
                ),
                (
                    "longitude_of_projection_origin",
                    AttributeValue::Double(0.0),
                ),
            ]
        }
    };

    let wkt = match family {
        GridFamily::Psn => PSN_WKT,
        GridFamily::Pss => PSS_WKT,
        GridFamily::E2n => E2N_WKT,
        GridFamily::E2s => E2S_WKT,
    };

    attrs.extend([
        ("long_name", text("CRS definition")),
        ("longitude_of_prime_meridian", AttributeValue::Double(0.0)),
        ("semi_major_axis", AttributeValue::Double(6378137.0)),
        ("inverse_flattening", AttributeValue::Double(298.257223563)),
        ("spatial_ref", text(wkt)),
        (
            "GeoTransform",
            text(format!("{} {} 0 {} 0 -{} ", ext.xleft, res, ext.yupper, res)),
        ),
    ]);
    attrs
}

/// WKT polygon of the projected grid extent
pub fn geospatial_bounds(family: GridFamily) -> String {
    let e = family.extent();
    format!(
        "POLYGON (({xl} {yu}, {xr} {yu}, {xr} {yd}, {xl} {yd}, {xl} {yu}))",
        xl = e.xleft,
        xr = e.xright,
        yu = e.yupper,
        yd = e.ylower
    )
}

const PRODUCT_ID: &str = "10.5067/CYW3O8ZUNIWC";

const INSTITUTION: &str =
    "NASA National Snow and Ice Data Center Distributed Active Archive Center";

const LICENSE: &str = "Access Constraint: These data are freely, openly, and fully accessible, provided that you are logged into your NASA Earthdata profile (https://urs.earthdata.nasa.gov/).  Use Constraint: These data are freely, openly, and fully available to use without restrictions, provided that you cite the data according to the recommended citation at https://nsidc.org/about/use_copyright.html. For more information on the NASA EOSDIS Data Use Policy, see https://earthdata.nasa.gov/earth-observation-data/data-use-policy.";

/// ACDD global attributes of a region-mask file
pub fn global_attributes(spec: &GridSpec, product_version: &str, date_created: &str) -> Vec<Attribute> {
    let family = spec.family;
    let res_str = format!("{}km", spec.resolution.label);
    let grid_str = family.description();
    let (lat_min, lat_max) = family.lat_range();
    let (contributor_name, contributor_role) = match family.hemisphere() {
        Hemisphere::North => (
            "Meier, W. N., J. S. Stewart",
            "project_scientist scientific_programmer",
        ),
        Hemisphere::South => (
            "Stewart J. S., W. N. Meier",
            "scientific_programmer project_scientist",
        ),
    };

    vec![
        (
            "title",
            text(format!(
                "Geographic regions for sea ice for the {} {} grid",
                res_str, grid_str
            )),
        ),
        (
            "summary",
            text(format!(
                "This file provides a description of regions useful for sea ice on the {} {} grid.  \
                 A general raster of the regions is provided without a surface mask so that these \
                 region descriptions can be used with any surface mask.  Fields are also provided \
                 with a surface mask derived from BU-MODIS land classification data ",
                res_str, grid_str
            )),
        ),
        (
            "acknowledgment",
            text(format!("These data are produced and supported by the {}", INSTITUTION)),
        ),
        ("id", text(PRODUCT_ID)),
        ("naming_authority", text("org.doi.dx")),
        (
            "standard_name_authority",
            text("CF Standard Name Table (v77, 19 January 2021)"),
        ),
        (
            "keywords_vocabulary",
            text("NASA Global Change Master Directory (GCMD) Earth Science Keywords, Version 8.1"),
        ),
        ("license", text(LICENSE)),
        ("product_version", text(product_version)),
        ("metadata_link", text(PRODUCT_ID)),
        ("date_created", text(date_created)),
        ("Conventions", text("CF-1.6, ACDD-1.3")),
        ("institution", text(INSTITUTION)),
        ("contributor_name", text(contributor_name)),
        ("contributor_role", text(contributor_role)),
        ("publisher_type", text("institution")),
        (
            "publisher_institution",
            text("National Snow and Ice Data Center, Cooperative Institute for Research in Environmental Sciences, University of Colorado at Boulder, Boulder, CO"),
        ),
        ("publisher_url", text("https://nsidc.org/daac")),
        ("publisher_email", text("nsidc@nsidc.org")),
        (
            "geospatial_bounds_crs",
            text(format!("EPSG:{}", family.epsg())),
        ),
        ("geospatial_bounds", text(geospatial_bounds(family))),
        ("geospatial_lat_min", AttributeValue::Double(lat_min)),
        ("geospatial_lat_max", AttributeValue::Double(lat_max)),
        ("geospatial_lat_units", text("degrees_north")),
        ("geospatial_lon_min", AttributeValue::Double(-180.0)),
        ("geospatial_lon_max", AttributeValue::Double(180.0)),
        ("geospatial_lon_units", text("degrees_east")),
    ]
}
