//! Entry point for seaice-regions.
//! Handles CLI parsing and logging setup, then dispatches to the library tools.

use clap::Parser;
use std::process;

mod cli;

use cli::{Args, Command};
use seaice_regions::errors::Result;
use seaice_regions::grids::GRID_TABLE;
use seaice_regions::parallel::ParallelConfig;
use seaice_regions::polygons::generate_region_polygons;
use seaice_regions::region_masks::create_region_netcdf;
use seaice_regions::stitch::stitch_to_flat;
use seaice_regions::vertices::convert_vertex_csv;

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

fn run(args: Args) -> Result<()> {
    ParallelConfig::new(args.threads).setup_global_pool()?;

    match args.command {
        Command::Stitch {
            base_prefix,
            grid_name,
            max_region,
            overwrite,
        } => {
            let (output, composite) =
                stitch_to_flat(&base_prefix, &grid_name, max_region, overwrite)?;
            println!("✅ Wrote data to: {}", output.display());
            println!(
                "   of shape (rows, cols): ({}, {}), uint8, no header",
                composite.height(),
                composite.width()
            );
        }
        Command::CsvToTxt { input, output } => {
            let records = convert_vertex_csv(&input, &output)?;
            println!("✅ Wrote {} vertices to {}", records.len(), output.display());
        }
        Command::Polygons { input, output } => {
            let polygons = generate_region_polygons(&input, &output)?;
            println!("✅ Wrote: {}", output.display());
            println!("   Total seas: {}", polygons.len());
        }
        Command::RegionNetcdf {
            grid_id,
            fields_dir,
            output,
            product_version,
            overwrite,
        } => {
            let written = create_region_netcdf(
                &grid_id,
                fields_dir.as_deref(),
                output.as_deref(),
                &product_version,
                overwrite,
            )?;
            println!("✅ Wrote: {}", written.display());
        }
        Command::Grids => {
            println!("\n Grid        left  right  upper  lower   shape (rows, cols)");
            println!("==============================================================");
            for g in GRID_TABLE {
                println!(
                    " {:<10} {:>5} {:>6} {:>6} {:>6}   ({}, {})",
                    g.name,
                    g.left_width,
                    g.right_width,
                    g.upper_height,
                    g.lower_height,
                    g.height(),
                    g.width()
                );
            }
        }
    }

    Ok(())
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
