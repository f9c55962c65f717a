// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! mapmesh command-line front end

mod args;

use anyhow::{Context, Result};
use args::{Cli, Commands};
use clap::Parser;
use mapmesh_processing::{
    convert_image, mesh_for_config, read_grid_record, rebuild_from_record, ExportConfig,
    ExportSummary,
};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Environment first, then arguments on top
    let mut config =
        ExportConfig::from_env().context("invalid MAPMESH_* environment variable")?;
    tracing::debug!(?config, "Configuration loaded from environment");

    match cli.command {
        Commands::Convert {
            image,
            output,
            grid_filename,
            source,
            mesh,
        } => {
            output.apply(&mut config);
            mesh.apply(&mut config);
            if let Some(name) = grid_filename {
                config.grid_filename = name;
            }

            let summary = convert_image(&image, &source.to_config(), &config)
                .with_context(|| format!("failed to convert {}", image.display()))?;
            print_summary(&summary);
        }
        Commands::Rebuild {
            record,
            output,
            mesh,
        } => {
            output.apply(&mut config);
            mesh.apply(&mut config);

            let summary = rebuild_from_record(&record, &config)
                .with_context(|| format!("failed to rebuild from {}", record.display()))?;
            print_summary(&summary);
        }
        Commands::Info {
            record,
            cell_size,
            height,
            mesh,
        } => {
            if let Some(cell_size) = cell_size {
                config.cell_size = cell_size;
            }
            if let Some(height) = height {
                config.height = height;
            }
            mesh.apply(&mut config);

            let grid = read_grid_record(&record)
                .with_context(|| format!("failed to read {}", record.display()))?;
            let built = mesh_for_config(&grid, &config)?;

            println!("Grid:      {} rows x {} cols", grid.rows(), grid.cols());
            println!("Solid:     {} cells", grid.solid_count());
            println!("Vertices:  {}", built.vertex_count());
            println!("Normals:   {}", built.normal_count());
            println!("Triangles: {}", built.triangle_count());
            if !built.is_empty() {
                let (min, max) = built.bounds();
                println!(
                    "Bounds:    ({:.3}, {:.3}, {:.3}) - ({:.3}, {:.3}, {:.3})",
                    min.x, min.y, min.z, max.x, max.y, max.z
                );
            }
        }
    }

    Ok(())
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // Logs go to stderr so stdout only carries the summary
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn print_summary(summary: &ExportSummary) {
    println!("Grid:      {} rows x {} cols", summary.rows, summary.cols);
    println!("Solid:     {} cells", summary.solid_cells);
    println!(
        "Mesh:      {} vertices, {} normals, {} triangles",
        summary.vertices, summary.normals, summary.faces
    );
    println!("OBJ:       {}", summary.obj_path.display());
    if let Some(grid_path) = &summary.grid_path {
        println!("Grid file: {}", grid_path.display());
    }
}
