//! NetCDF output for region masks
//!
//! Writes one or more byte region rasters on a polar grid, together with
//! projected coordinates, a `crs` grid-mapping variable and ACDD global
//! attributes.

use crate::errors::{RegionsError, Result};
use crate::grids::GridSpec;
use crate::metadata::{crs_attributes, flag_values, global_attributes, RegionScheme, REGION_FILL_VALUE};
use crate::stitch::ensure_writable;
use chrono::Utc;
use log::{debug, info};
use ndarray::Array2;
use netcdf::create;
use std::{fs, path::Path};

/// Deflate level for mask variables
const DEFLATE_LEVEL: i32 = 4;

/// One region raster to be written as a netCDF variable
#[derive(Debug, Clone)]
pub struct MaskField {
    pub name: String,
    pub long_name: String,
    pub scheme: RegionScheme,
    pub data: Array2<u8>,
}

/// Unified NetCDF writer for region masks
pub struct RegionMaskWriter<'a> {
    spec: &'a GridSpec,
    output_path: &'a Path,
    overwrite: bool,
}

impl<'a> RegionMaskWriter<'a> {
    pub fn new(spec: &'a GridSpec, output_path: &'a Path) -> Self {
        Self {
            spec,
            output_path,
            overwrite: false,
        }
    }

    pub fn overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Write all mask fields to the output file
    pub fn write(&self, fields: &[MaskField], product_version: &str) -> Result<()> {
        ensure_writable(self.output_path, self.overwrite)?;

        let shape = self.spec.shape();
        for field in fields {
            if field.data.dim() != shape {
                return Err(RegionsError::ShapeMismatch {
                    quadrant: None,
                    path: self.output_path.to_path_buf(),
                    expected: shape,
                    actual: field.data.shape().to_vec(),
                });
            }
        }

        if self.output_path.exists() {
            fs::remove_file(self.output_path)?;
        }

        let mut file = create(self.output_path)?;

        file.add_dimension("y", shape.0)?;
        file.add_dimension("x", shape.1)?;

        let ext = self.spec.family.extent();

        {
            let mut x_var = file.add_variable::<f32>("x", &["x"])?;
            x_var.put_attribute("standard_name", "projection_x_coordinate")?;
            x_var.put_attribute("long_name", "x coordinate of projection")?;
            x_var.put_attribute("units", "m")?;
            x_var.put_attribute("coverage_content_type", "coordinate")?;
            x_var.put_attribute("valid_range", vec![ext.xleft as f32, ext.xright as f32])?;
            x_var.put_values(&self.spec.x_coords(), ..)?;
        }

        {
            let mut y_var = file.add_variable::<f32>("y", &["y"])?;
            y_var.put_attribute("standard_name", "projection_y_coordinate")?;
            y_var.put_attribute("long_name", "y coordinate of projection")?;
            y_var.put_attribute("units", "m")?;
            y_var.put_attribute("coverage_content_type", "coordinate")?;
            y_var.put_attribute("valid_range", vec![ext.ylower as f32, ext.yupper as f32])?;
            y_var.put_values(&self.spec.y_coords(), ..)?;
        }

        {
            let mut crs_var = file.add_variable::<i32>("crs", &[])?;
            for (name, value) in crs_attributes(self.spec) {
                crs_var.put_attribute(name, value)?;
            }
        }

        for field in fields {
            let values = flag_values(field.data.iter());
            let max_value = values.last().copied().unwrap_or(0);
            debug!(
                "{}: flag values {:?}, max {}",
                field.name, values, max_value
            );

            let mut var = file.add_variable::<u8>(&field.name, &["y", "x"])?;
            var.set_compression(DEFLATE_LEVEL, false)?;
            var.put_attribute("standard_name", "region")?;
            var.put_attribute("long_name", field.long_name.as_str())?;
            var.put_attribute("grid_mapping", "crs")?;
            var.put_attribute("valid_range", vec![0u8, max_value])?;
            var.put_attribute("_Unsigned", "true")?;
            var.put_attribute("_FillValue", REGION_FILL_VALUE)?;
            var.put_attribute("flag_meanings", field.scheme.flag_meanings(&values))?;
            var.put_attribute("flag_values", values)?;
            var.put_attribute("coverage_content_type", "image")?;
            var.put(field.data.view(), ..)?;
        }

        let date_created = Utc::now().format("%Y-%m-%d").to_string();
        for (name, value) in global_attributes(self.spec, product_version, &date_created) {
            file.add_attribute(name, value)?;
        }
        file.add_attribute(
            "history",
            format!("Created by seaice_regions on {}", Utc::now().to_rfc3339()),
        )?;

        info!(
            "Wrote {} mask variable(s) of shape {:?} to {}",
            fields.len(),
            shape,
            self.output_path.display()
        );
        Ok(())
    }
}
