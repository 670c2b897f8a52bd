//! Unit tests for seaice_regions modules
//!
//! These tests exercise the in-memory logic (grid tables, quadrant layout,
//! assembly, metadata, polygons) without touching netCDF files.

use ndarray::Array2;
use netcdf::AttributeValue;
use seaice_regions::{
    errors::RegionsError,
    grids::{lookup_grid, grid_names, GridFamily, GridGeometry, GridSpec, Hemisphere, GRID_TABLE},
    metadata::{crs_attributes, flag_values, geospatial_bounds, RegionScheme, NO_REGION_LABEL},
    parallel::ParallelConfig,
    polygons::{build_region_polygons, to_feature_collection},
    quadrant::{Quadrant, QuadrantTile},
    region_masks::default_output_name,
    stitch::{
        assemble, ensure_writable, flat_output_path, read_flat_raster, stitch_to_flat,
        CompositeRaster,
    },
    vertices::{read_vertex_table, VertexRecord},
};
use std::path::{Path, PathBuf};
use tempfile::tempdir;

/// Small uneven grid so that every quadrant has a distinct shape
fn small_grid() -> GridGeometry {
    GridGeometry {
        name: "test",
        left_width: 3,
        right_width: 2,
        upper_height: 2,
        lower_height: 4,
        band_name: None,
    }
}

fn tile(quadrant: Quadrant, geometry: &GridGeometry, value: u8) -> QuadrantTile {
    let shape = quadrant.expected_shape(geometry);
    QuadrantTile::from_array(
        quadrant,
        PathBuf::from(format!("mem_{}.nc", quadrant)),
        Array2::from_elem(shape, value),
        geometry,
    )
    .expect("tile shape matches geometry")
}

#[test]
fn test_lookup_known_grid() {
    let g = lookup_grid("psn25").unwrap();
    assert_eq!(g.left_width, 154);
    assert_eq!(g.right_width, 150);
    assert_eq!(g.upper_height, 234);
    assert_eq!(g.lower_height, 214);
    assert_eq!(g.shape(), (448, 304));
    assert_eq!(g.band_name(), "Band1");
}

#[test]
fn test_unknown_grid_lists_valid_names() {
    let err = lookup_grid("not_a_grid").unwrap_err();
    match &err {
        RegionsError::Configuration {
            grid_name,
            valid_names,
        } => {
            assert_eq!(grid_name, "not_a_grid");
            assert!(valid_names.contains(&"psn25".to_string()));
            assert_eq!(valid_names.len(), GRID_TABLE.len());
        }
        other => panic!("Expected Configuration error, got {:?}", other),
    }
    let message = err.to_string();
    assert!(message.contains("not_a_grid"));
    assert!(message.contains("psn25"));
    assert!(message.contains("e2s3.125"));
}

#[test]
fn test_grid_table_matches_projected_extents() {
    for g in GRID_TABLE {
        let spec = GridSpec::parse(g.name).unwrap();
        assert_eq!(spec.shape(), g.shape(), "grid {}", g.name);
        assert_eq!(spec.grid_id(), g.name);
        assert!(g.left_width > 0 && g.right_width > 0);
        assert!(g.upper_height > 0 && g.lower_height > 0);
    }
    assert_eq!(grid_names().len(), 16);
}

#[test]
fn test_grid_family_and_region_count() {
    assert_eq!(GridFamily::from_grid_name("psn12.5").unwrap(), GridFamily::Psn);
    assert_eq!(GridFamily::from_grid_name("e2s6.25").unwrap(), GridFamily::E2s);
    assert!(GridFamily::from_grid_name("xx").is_err());

    assert_eq!(lookup_grid("psn25").unwrap().family().unwrap().region_count(), 18);
    assert_eq!(lookup_grid("e2n3.125").unwrap().family().unwrap().region_count(), 18);
    assert_eq!(lookup_grid("pss6.25").unwrap().family().unwrap().region_count(), 5);
    assert_eq!(lookup_grid("e2s25").unwrap().family().unwrap().region_count(), 5);
}

#[test]
fn test_grid_spec_rejects_unknown_resolution() {
    assert!(matches!(
        GridSpec::parse("psn50"),
        Err(RegionsError::Configuration { .. })
    ));
    let spec = GridSpec::parse("psn12.5").unwrap();
    assert_eq!(spec.resolution.metres, 12500);
}

#[test]
fn test_cell_centre_coordinates() {
    let spec = GridSpec::parse("psn25").unwrap();
    let x = spec.x_coords();
    let y = spec.y_coords();
    assert_eq!(x.len(), 304);
    assert_eq!(y.len(), 448);
    assert_eq!(x[0], -3_837_500.0);
    assert_eq!(x[303], 3_737_500.0);
    assert_eq!(y[0], 5_837_500.0);
    assert_eq!(y[447], -5_337_500.0);
}

#[test]
fn test_quadrant_layout() {
    let g = lookup_grid("psn25").unwrap();
    assert_eq!(Quadrant::UpperLeft.expected_size(g), (154, 234));
    assert_eq!(Quadrant::UpperRight.expected_size(g), (150, 234));
    assert_eq!(Quadrant::LowerRight.expected_size(g), (150, 214));
    assert_eq!(Quadrant::LowerLeft.expected_size(g), (154, 214));

    assert_eq!(Quadrant::UpperLeft.origin(g), (0, 0));
    assert_eq!(Quadrant::UpperRight.origin(g), (0, 154));
    assert_eq!(Quadrant::LowerRight.origin(g), (234, 154));
    assert_eq!(Quadrant::LowerLeft.origin(g), (234, 0));

    let suffixes: Vec<&str> = Quadrant::ALL.iter().map(|q| q.suffix()).collect();
    assert_eq!(suffixes, vec!["UL", "UR", "LR", "LL"]);
}

#[test]
fn test_tile_path_naming() {
    let base = Path::new("data/regions_20210924_nh_3411");
    assert_eq!(
        Quadrant::LowerRight.tile_path(base),
        PathBuf::from("data/regions_20210924_nh_3411_LR.nc")
    );
    assert_eq!(flat_output_path(base), PathBuf::from("data/regions_20210924_nh_3411.dat"));
}

#[test]
fn test_tile_shape_mismatch() {
    let g = small_grid();
    let result = QuadrantTile::from_array(
        Quadrant::UpperRight,
        PathBuf::from("bad_UR.nc"),
        Array2::zeros((2, 3)),
        &g,
    );
    match result {
        Err(RegionsError::ShapeMismatch {
            quadrant,
            expected,
            actual,
            ..
        }) => {
            assert_eq!(quadrant, Some(Quadrant::UpperRight));
            assert_eq!(expected, (2, 2));
            assert_eq!(actual, vec![2, 3]);
        }
        other => panic!("Expected ShapeMismatch error, got {:?}", other),
    }
}

#[test]
fn test_each_quadrant_lands_in_its_rectangle() {
    let g = small_grid();
    let tiles = vec![
        tile(Quadrant::UpperLeft, &g, 1),
        tile(Quadrant::UpperRight, &g, 2),
        tile(Quadrant::LowerRight, &g, 3),
        tile(Quadrant::LowerLeft, &g, 4),
    ];
    let composite = assemble(&g, tiles, 18).unwrap();
    assert_eq!(composite.shape(), (6, 5));

    for ((row, col), &value) in composite.data().indexed_iter() {
        let expected = match (row < 2, col < 3) {
            (true, true) => 1,
            (true, false) => 2,
            (false, false) => 3,
            (false, true) => 4,
        };
        assert_eq!(value, expected, "pixel ({}, {})", row, col);
    }
}

#[test]
fn test_assembly_order_does_not_matter() {
    let g = small_grid();
    let forward = assemble(
        &g,
        Quadrant::ALL.iter().map(|&q| tile(q, &g, q as u8 + 1)).collect(),
        18,
    )
    .unwrap();
    let reversed = assemble(
        &g,
        Quadrant::ALL.iter().rev().map(|&q| tile(q, &g, q as u8 + 1)).collect(),
        18,
    )
    .unwrap();
    assert_eq!(forward, reversed);
}

#[test]
fn test_assembly_rejects_duplicate_quadrant() {
    let g = small_grid();
    let ul = tile(Quadrant::UpperLeft, &g, 1);
    match assemble(&g, vec![ul.clone(), tile(Quadrant::LowerLeft, &g, 4), ul], 18) {
        Err(RegionsError::DuplicateQuadrant { quadrant }) => {
            assert_eq!(quadrant, Quadrant::UpperLeft)
        }
        other => panic!("Expected DuplicateQuadrant error, got {:?}", other),
    }
}

#[test]
fn test_assembly_rejects_tile_from_other_grid() {
    let g = small_grid();
    let narrow = GridGeometry {
        left_width: 2,
        ..small_grid()
    };
    // 2x2 upper-left tile is valid for `narrow` but not for `g`
    let ul = tile(Quadrant::UpperLeft, &narrow, 1);
    match assemble(&g, vec![ul], 18) {
        Err(RegionsError::ShapeMismatch {
            quadrant,
            expected,
            actual,
            ..
        }) => {
            assert_eq!(quadrant, Some(Quadrant::UpperLeft));
            assert_eq!(expected, (2, 3));
            assert_eq!(actual, vec![2, 2]);
        }
        other => panic!("Expected ShapeMismatch error, got {:?}", other),
    }
}

#[test]
fn test_values_above_ceiling_are_cleared() {
    let g = small_grid();
    let values: Vec<u8> = vec![0, 5, 18, 19, 30, 255];
    let data = Array2::from_shape_vec((2, 3), values).unwrap();
    let ul = QuadrantTile::from_array(Quadrant::UpperLeft, PathBuf::from("ul"), data, &g).unwrap();

    let composite = assemble(&g, vec![ul], 18).unwrap();
    let d = composite.data();
    // rows are flipped: stored row 1 becomes composite row 0
    assert_eq!([d[[0, 0]], d[[0, 1]], d[[0, 2]]], [0, 0, 0]);
    assert_eq!([d[[1, 0]], d[[1, 1]], d[[1, 2]]], [0, 5, 18]);
}

#[test]
fn test_tile_is_flipped_vertically() {
    let g = small_grid();
    let mut data = Array2::<u8>::zeros((4, 3));
    data.row_mut(0).fill(7);
    data.row_mut(3).fill(9);
    let ll = QuadrantTile::from_array(Quadrant::LowerLeft, PathBuf::from("ll"), data, &g).unwrap();

    let oriented = ll.clone().into_oriented(18);
    assert!(oriented.row(0).iter().all(|&v| v == 9));
    assert!(oriented.row(3).iter().all(|&v| v == 7));

    let composite = assemble(&g, vec![ll], 18).unwrap();
    let d = composite.data();
    assert!((0..3).all(|c| d[[2, c]] == 9));
    assert!((0..3).all(|c| d[[5, c]] == 7));
}

#[test]
fn test_missing_quadrant_stays_zero() {
    let g = small_grid();
    let composite = assemble(&g, vec![tile(Quadrant::UpperLeft, &g, 1)], 18).unwrap();
    let total: u32 = composite.data().iter().map(|&v| v as u32).sum();
    assert_eq!(total, 6);
}

#[test]
fn test_flat_raster_round_trip_and_conflict() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("regions.dat");

    let mut composite = CompositeRaster::zeros(2, 3);
    assert_eq!(composite.width(), 3);
    assert_eq!(composite.height(), 2);
    composite.write_flat(&path, false).unwrap();
    assert_eq!(std::fs::read(&path).unwrap(), vec![0u8; 6]);

    assert!(matches!(
        composite.write_flat(&path, false),
        Err(RegionsError::OutputConflict { .. })
    ));
    assert!(ensure_writable(&path, true).is_ok());

    let g = small_grid();
    composite = assemble(&g, vec![tile(Quadrant::UpperRight, &g, 2)], 18).unwrap();
    composite.write_flat(&path, true).unwrap();
    let back = read_flat_raster(&path, (6, 5)).unwrap();
    assert_eq!(&back, composite.data());
    // row-major: UR occupies the last two bytes of row 0
    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(&bytes[..5], &[0, 0, 0, 2, 2]);

    assert!(matches!(
        read_flat_raster(&path, (5, 5)),
        Err(RegionsError::ShapeMismatch { .. })
    ));
    assert!(matches!(
        read_flat_raster(&dir.path().join("missing.dat"), (6, 5)),
        Err(RegionsError::InputMissing { quadrant: None, .. })
    ));
}

#[test]
fn test_hemisphere_from_path() {
    assert_eq!(
        Hemisphere::from_path("regions_apr22_nh.txt").unwrap(),
        Hemisphere::North
    );
    assert_eq!(
        Hemisphere::from_path("sh_regions.txt").unwrap(),
        Hemisphere::South
    );
    // marker in a directory name
    assert_eq!(
        Hemisphere::from_path("data_nh/regions.txt").unwrap(),
        Hemisphere::North
    );
    assert!(matches!(
        Hemisphere::from_path("regions.txt"),
        Err(RegionsError::AmbiguousHemisphere { .. })
    ));
    assert!(Hemisphere::from_path("nh_and_sh.txt").is_err());
    assert!(Hemisphere::from_path("data_sh/regions_nh.txt").is_err());
}

#[test]
fn test_flag_labels() {
    assert_eq!(RegionScheme::North.label(0), Some(NO_REGION_LABEL));
    assert_eq!(RegionScheme::North.label(1), Some("central_arctic"));
    assert_eq!(RegionScheme::North.label(18), Some("gulf_of_alaska"));
    assert_eq!(RegionScheme::North.label(19), None);
    assert_eq!(RegionScheme::SouthNasa.label(2), Some("indian_ocean"));
    assert_eq!(RegionScheme::SouthRh.label(2), Some("kinghaakonVII_sea"));
    assert_eq!(RegionScheme::SouthRh.label(6), None);
    assert_eq!(RegionScheme::SouthNasa.label(34), Some("floating_ice_shelf"));

    let values = flag_values(&[3u8, 0, 30, 3, 1, 30]);
    assert_eq!(values, vec![0, 1, 3, 30]);
    assert_eq!(
        RegionScheme::North.flag_meanings(&values),
        "ocean_no_region_specified central_arctic chukchi_sea land"
    );
}

#[test]
fn test_crs_and_bounds_metadata() {
    let spec = GridSpec::parse("psn12.5").unwrap();
    let attrs = crs_attributes(&spec);
    let text_attr = |wanted: &str| {
        attrs.iter().find_map(|(name, value)| match value {
            AttributeValue::Str(s) if *name == wanted => Some(s.clone()),
            _ => None,
        })
    };
    assert_eq!(
        text_attr("GeoTransform").as_deref(),
        Some("-3850000 12500 0 5850000 0 -12500 ")
    );
    assert_eq!(
        text_attr("grid_mapping_name").as_deref(),
        Some("polar_stereographic")
    );

    assert_eq!(
        geospatial_bounds(GridFamily::Pss),
        "POLYGON ((-3950000 4350000, 3950000 4350000, 3950000 -3950000, -3950000 -3950000, -3950000 4350000))"
    );
}

#[test]
fn test_default_output_name() {
    let spec = GridSpec::parse("psn25").unwrap();
    assert_eq!(
        default_output_name(&spec, "v1.0"),
        "NSIDC-0780_SeaIceRegions_PS-N25km_v1.0.nc"
    );
    let spec = GridSpec::parse("e2s3.125").unwrap();
    assert_eq!(
        default_output_name(&spec, "v1.0"),
        "NSIDC-0780_SeaIceRegions_EASE2-S3.125km_v1.0.nc"
    );
}

fn vertex(name: &str, lat: f64, lon: f64, sea_id: i64, index: i64) -> VertexRecord {
    VertexRecord {
        name: name.to_string(),
        latitude: lat,
        longitude: lon,
        sea_id,
        vertex_index: index,
    }
}

#[test]
fn test_region_polygons() {
    let records = vec![
        vertex("Baltic_Sea", 60.0, 20.0, 17, 2),
        vertex("Baltic_Sea", 55.0, 10.0, 17, 1),
        vertex("Baltic_Sea", 65.0, 25.0, 17, 3),
        vertex("Atlantic_Ocean", 10.0, -30.0, 99, 1),
        vertex("Atlantic_Ocean", 20.0, -30.0, 99, 2),
        vertex("Atlantic_Ocean", 20.0, -20.0, 99, 3),
        vertex("Ross_Sea", -75.0, 170.0, 4, 1),
        vertex("Ross_Sea", -70.0, -160.0, 4, 2),
        vertex("Ross_Sea", -78.0, -150.0, 4, 3),
    ];

    let north = build_region_polygons(&records, Hemisphere::North).unwrap();
    assert_eq!(north.len(), 1);
    assert_eq!(north[0].name, "Baltic_Sea");
    assert_eq!(north[0].sea_id, 17);
    assert_eq!(north[0].ring, vec![(10.0, 55.0), (20.0, 60.0), (25.0, 65.0)]);

    let south = build_region_polygons(&records, Hemisphere::South).unwrap();
    assert_eq!(south.len(), 1);
    assert_eq!(south[0].name, "Ross_Sea");

    let collection = to_feature_collection(&north);
    let ring = &collection["features"][0]["geometry"]["coordinates"][0];
    assert_eq!(ring.as_array().unwrap().len(), 4);
    assert_eq!(ring[0], ring[3]);
    assert_eq!(collection["features"][0]["properties"]["Sea_ID"], 17);
}

#[test]
fn test_region_polygons_reject_bad_vertex_indices() {
    let duplicate = vec![
        vertex("Kara_Sea", 70.0, 60.0, 6, 1),
        vertex("Kara_Sea", 75.0, 70.0, 6, 1),
        vertex("Kara_Sea", 78.0, 80.0, 6, 3),
    ];
    assert!(matches!(
        build_region_polygons(&duplicate, Hemisphere::North),
        Err(RegionsError::InvalidTable { .. })
    ));

    let gap = vec![
        vertex("Kara_Sea", 70.0, 60.0, 6, 1),
        vertex("Kara_Sea", 75.0, 70.0, 6, 2),
        vertex("Kara_Sea", 78.0, 80.0, 6, 4),
    ];
    assert!(matches!(
        build_region_polygons(&gap, Hemisphere::North),
        Err(RegionsError::InvalidTable { .. })
    ));
}

#[test]
fn test_region_polygons_need_three_vertices() {
    let tiny = vec![
        vertex("Tiny", 70.0, 10.0, 1, 1),
        vertex("Tiny", 71.0, 11.0, 1, 2),
    ];
    match build_region_polygons(&tiny, Hemisphere::North) {
        Err(RegionsError::InvalidTable { message }) => {
            assert!(message.contains("Tiny"));
            assert!(message.contains("at least 3"));
        }
        other => panic!("Expected InvalidTable error, got {:?}", other),
    }

    let single = vec![vertex("Dot", 70.0, 10.0, 2, 1)];
    assert!(build_region_polygons(&single, Hemisphere::North).is_err());
}

#[test]
fn test_vertex_table_rejects_non_integer_ids() {
    let dir = tempdir().expect("Failed to create temp dir");
    let header = "Name Latitude Longitude Sea_ID Vertex_Index\n";

    let fractional = dir.path().join("fractional_nh.txt");
    std::fs::write(
        &fractional,
        format!("{}Kara_Sea 70.0 60.0 6 1\nKara_Sea 75.0 70.0 6 3.5\n", header),
    )
    .unwrap();
    match read_vertex_table(&fractional) {
        Err(RegionsError::InvalidTable { message }) => {
            assert!(message.contains("row 2"));
            assert!(message.contains("3.5"));
        }
        other => panic!("Expected InvalidTable error, got {:?}", other),
    }

    let text = dir.path().join("text_nh.txt");
    std::fs::write(&text, format!("{}Kara_Sea 70.0 60.0 abc 1\n", header)).unwrap();
    match read_vertex_table(&text) {
        Err(RegionsError::InvalidTable { message }) => {
            assert!(message.contains("row 1"));
            assert!(message.contains("Sea_ID"));
        }
        other => panic!("Expected InvalidTable error, got {:?}", other),
    }

    let whole = dir.path().join("whole_nh.txt");
    std::fs::write(&whole, format!("{}Kara_Sea 70.0 60.0 6.0 2\n", header)).unwrap();
    let records = read_vertex_table(&whole).unwrap();
    assert_eq!(records[0].sea_id, 6);
    assert_eq!(records[0].vertex_index, 2);
}

#[test]
fn test_error_display() {
    let err = RegionsError::ShapeMismatch {
        quadrant: Some(Quadrant::LowerLeft),
        path: PathBuf::from("x_LL.nc"),
        expected: (214, 154),
        actual: vec![214, 150],
    };
    let message = err.to_string();
    assert!(message.contains("LL"));
    assert!(message.contains("(214, 154)"));
    assert!(message.contains("[214, 150]"));

    let err = RegionsError::OutputConflict {
        path: PathBuf::from("out.dat"),
    };
    assert!(err.to_string().contains("out.dat exists"));
}

#[test]
fn test_parallel_config() {
    let default_config = ParallelConfig::default();
    assert!(default_config.num_threads.is_none());
    assert!(default_config.setup_global_pool().is_ok());
    assert_eq!(ParallelConfig::new(Some(4)).num_threads, Some(4));
}

#[test]
fn test_stitch_checks_output_before_reading_tiles() {
    let dir = tempdir().expect("Failed to create temp dir");
    let base = dir.path().join("regions_nh");
    let output = flat_output_path(&base);
    std::fs::write(&output, b"keep").unwrap();

    // no quadrant files exist, so a late check would report InputMissing
    assert!(matches!(
        stitch_to_flat(&base, "psn25", None, false),
        Err(RegionsError::OutputConflict { .. })
    ));
    assert_eq!(std::fs::read(&output).unwrap(), b"keep");

    assert!(matches!(
        stitch_to_flat(&base, "psn25", None, true),
        Err(RegionsError::InputMissing {
            quadrant: Some(Quadrant::UpperLeft),
            ..
        })
    ));
    assert!(matches!(
        stitch_to_flat(&base, "not_a_grid", None, true),
        Err(RegionsError::Configuration { .. })
    ));
}
