//! Region polygons assembled from a vertex table
//!
//! Each named region in the table becomes one polygon whose ring follows the
//! region's `Vertex_Index` order. Overarching ocean areas that contain other
//! regions are dropped, as are regions lying entirely in the other
//! hemisphere. The result is written in WGS84 longitude/latitude, either as
//! an ESRI shapefile (`.shp` with `.shx`, `.dbf` and `.prj` siblings) or as a
//! GeoJSON FeatureCollection, chosen by the output extension.

use crate::errors::{RegionsError, Result};
use crate::grids::Hemisphere;
use crate::vertices::{read_vertex_table, unique_names, VertexRecord};
use log::info;
use serde_json::{json, Value};
use shapefile::dbase::{FieldName, FieldValue, Record, TableWriterBuilder};
use shapefile::{Point, Polygon, PolygonRing};
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;

/// Smallest number of distinct vertices that encloses an area
pub const MIN_RING_VERTICES: usize = 3;

/// Attribute columns of the shapefile table
pub const REGION_FIELD: &str = "Region";
pub const SEA_ID_FIELD: &str = "Sea_ID";

const REGION_FIELD_WIDTH: u8 = 80;
const SEA_ID_FIELD_WIDTH: u8 = 10;

const WGS84_PRJ: &str = r#"GEOGCS["GCS_WGS_1984",DATUM["D_WGS_1984",SPHEROID["WGS_1984",6378137.0,298.257223563]],PRIMEM["Greenwich",0.0],UNIT["Degree",0.0174532925199433]]"#;

/// Overarching areas that would overlap the individual seas
pub const EXCLUDED_REGIONS: [&str; 11] = [
    "Pacific_Ocean,_western_part",
    "Pacific_Ocean,_eastern_part",
    "North_Pacific_Ocean,_western_part",
    "North_Pacific_Ocean,_eastern_part",
    "North_Atlantic_Ocean",
    "Atlantic_Ocean",
    "Arctic_Ocean,_western_part",
    "Arctic_Ocean,_eastern_part",
    "Indian_Ocean",
    "Eastern_Basin",
    "Mediterranean_Region",
];

/// A named sea region outline
#[derive(Debug, Clone, PartialEq)]
pub struct RegionPolygon {
    pub name: String,
    pub sea_id: i64,
    /// `(lon, lat)` vertices in table order, not closed
    pub ring: Vec<(f64, f64)>,
}

impl RegionPolygon {
    /// True when any vertex lies strictly inside `hemisphere`
    pub fn touches(&self, hemisphere: Hemisphere) -> bool {
        self.ring.iter().any(|&(_, lat)| match hemisphere {
            Hemisphere::North => lat > 0.0,
            Hemisphere::South => lat < 0.0,
        })
    }

    fn to_feature(&self) -> Value {
        let mut ring: Vec<[f64; 2]> = self.ring.iter().map(|&(lon, lat)| [lon, lat]).collect();
        if let (Some(&first), Some(&last)) = (ring.first(), ring.last()) {
            if first != last {
                ring.push(first);
            }
        }
        json!({
            "type": "Feature",
            "properties": {
                "Region": self.name,
                "Sea_ID": self.sea_id,
            },
            "geometry": {
                "type": "Polygon",
                "coordinates": [ring],
            },
        })
    }
}

/// Orders one region's rows by `Vertex_Index`, requiring exactly `1..=n`
/// with at least [`MIN_RING_VERTICES`] rows.
fn ordered_ring(name: &str, rows: &[&VertexRecord]) -> Result<Vec<(f64, f64)>> {
    let n = rows.len();
    if n < MIN_RING_VERTICES {
        return Err(RegionsError::InvalidTable {
            message: format!(
                "{}: {} vertices, a polygon needs at least {}",
                name, n, MIN_RING_VERTICES
            ),
        });
    }
    let mut slots: Vec<Option<(f64, f64)>> = vec![None; n];

    for row in rows {
        let index = row.vertex_index;
        if index < 1 || index as usize > n {
            return Err(RegionsError::InvalidTable {
                message: format!(
                    "{}: vertex index {} outside 1..={}",
                    name, index, n
                ),
            });
        }
        let slot = &mut slots[index as usize - 1];
        if slot.is_some() {
            return Err(RegionsError::InvalidTable {
                message: format!("{}: duplicate vertex index {}", name, index),
            });
        }
        *slot = Some((row.longitude, row.latitude));
    }

    // n rows filling n distinct slots leaves none empty
    Ok(slots.into_iter().flatten().collect())
}

/// Builds one polygon per region of `hemisphere`.
pub fn build_region_polygons(records: &[VertexRecord], hemisphere: Hemisphere) -> Result<Vec<RegionPolygon>> {
    let mut polygons = Vec::new();

    for name in unique_names(records) {
        if EXCLUDED_REGIONS.contains(&name) {
            info!("Excluding (list): {}", name);
            continue;
        }

        let rows: Vec<&VertexRecord> = records.iter().filter(|r| r.name == name).collect();
        let polygon = RegionPolygon {
            name: name.to_string(),
            sea_id: rows[0].sea_id,
            ring: ordered_ring(name, &rows)?,
        };

        if !polygon.touches(hemisphere) {
            info!("Excluding (coords): {}", name);
            continue;
        }
        polygons.push(polygon);
    }

    Ok(polygons)
}

/// GeoJSON FeatureCollection of the polygons
pub fn to_feature_collection(polygons: &[RegionPolygon]) -> Value {
    json!({
        "type": "FeatureCollection",
        "features": polygons.iter().map(RegionPolygon::to_feature).collect::<Vec<_>>(),
    })
}

pub fn write_geojson(polygons: &[RegionPolygon], path: &Path) -> Result<()> {
    let writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(writer, &to_feature_collection(polygons))?;
    Ok(())
}

fn field_name(name: &str) -> Result<FieldName> {
    FieldName::try_from(name).map_err(|e| RegionsError::InvalidTable {
        message: format!("bad shapefile field name '{}': {:?}", name, e),
    })
}

/// Writes the polygons as a shapefile with `Region` and `Sea_ID` attributes.
///
/// `path` names the `.shp` file; the `.shx`, `.dbf` and WGS84 `.prj`
/// files are written next to it.
pub fn write_shapefile(polygons: &[RegionPolygon], path: &Path) -> Result<()> {
    let table = TableWriterBuilder::new()
        .add_character_field(field_name(REGION_FIELD)?, REGION_FIELD_WIDTH)
        .add_numeric_field(field_name(SEA_ID_FIELD)?, SEA_ID_FIELD_WIDTH, 0);

    {
        let mut writer = shapefile::Writer::from_path(path, table)?;
        for polygon in polygons {
            let points = polygon
                .ring
                .iter()
                .map(|&(lon, lat)| Point::new(lon, lat))
                .collect();
            let shape = Polygon::new(PolygonRing::Outer(points));

            let mut record = Record::default();
            record.insert(
                REGION_FIELD.to_string(),
                FieldValue::Character(Some(polygon.name.clone())),
            );
            record.insert(
                SEA_ID_FIELD.to_string(),
                FieldValue::Numeric(Some(polygon.sea_id as f64)),
            );
            writer.write_shape_and_record(&shape, &record)?;
        }
        // headers are finalized when the writer is dropped
    }

    fs::write(path.with_extension("prj"), WGS84_PRJ)?;
    Ok(())
}

/// True when `path` names a shapefile rather than GeoJSON output
pub fn is_shapefile_path(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("shp"))
        .unwrap_or(false)
}

/// Reads the text vertex table at `input` and writes region polygons to
/// `output`, as a shapefile for `.shp` and GeoJSON otherwise. The
/// hemisphere is taken from the input path.
pub fn generate_region_polygons(input: &Path, output: &Path) -> Result<Vec<RegionPolygon>> {
    let hemisphere = Hemisphere::from_path(&input.to_string_lossy())?;

    let records = read_vertex_table(input)?;
    info!(
        "Number of unique sea names: {}",
        unique_names(&records).len()
    );

    let polygons = build_region_polygons(&records, hemisphere)?;
    if is_shapefile_path(output) {
        write_shapefile(&polygons, output)?;
    } else {
        write_geojson(&polygons, output)?;
    }
    info!("Wrote {} seas to {}", polygons.len(), output.display());
    Ok(polygons)
}
