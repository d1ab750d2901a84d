//! gentk-query CLI entry point
//!
//! Loads a project snapshot and runs one query, printing the JSON document
//! the query service would return.

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use gentk_query::core::{RangeSampler, StructureId};
use gentk_query::{load_project, QueryEngine};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "gentk-query")]
#[command(about = "Genomic coordinate resolution and array sampling")]
#[command(version)]
struct Cli {
    /// Project snapshot (JSON, optionally .gz or .bz2)
    #[arg(short = 'p', long, global = true, default_value = "project.json")]
    project: PathBuf,

    /// Directory BigWig track locators are resolved against
    /// (default: the snapshot's directory)
    #[arg(long = "track-root", global = true)]
    track_root: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, default_value = "pretty")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Indented JSON
    #[value(name = "pretty")]
    Pretty,
    /// Single-line JSON
    #[value(name = "compact")]
    Compact,
}

#[derive(Subcommand)]
enum Commands {
    /// List all gene names
    Genes,
    /// Show one gene's metadata
    Gene {
        name: String,
    },
    /// Genes overlapping locations (e.g. "2400000-2800000,3076875")
    GenesForLocations {
        locations: String,
    },
    /// Genes overlapping segments of a structure (e.g. "7,8-10")
    GenesForSegments {
        segments: String,
        #[arg(short = 's', long, default_value = "0", allow_negative_numbers = true)]
        structure: StructureId,
    },
    /// Segments of a structure overlapping genes (comma-separated names)
    SegmentsForGenes {
        genes: String,
        #[arg(short = 's', long, default_value = "0", allow_negative_numbers = true)]
        structure: StructureId,
    },
    /// Full segment records of a structure
    Segments {
        #[arg(short = 's', long, default_value = "0", allow_negative_numbers = true)]
        structure: StructureId,
    },
    /// Segment ids of a structure
    SegmentIds {
        #[arg(short = 's', long, default_value = "0", allow_negative_numbers = true)]
        structure: StructureId,
    },
    /// Per-segment unmapped mask of a structure
    Unmapped {
        #[arg(short = 's', long, default_value = "0", allow_negative_numbers = true)]
        structure: StructureId,
    },
    /// Fetch an array with one whole slice
    Array {
        id: u64,
        #[arg(long, default_value = "0")]
        slice: usize,
    },
    /// List arrays of a type (structure, sequence)
    Arrays {
        #[arg(default_value = "structure")]
        kind: String,
    },
    /// Array values over a genomic range
    Sample {
        id: u64,
        begin: u64,
        end: u64,
        #[arg(long, default_value = "0")]
        slice: usize,
        /// Number of bins for dense sequence tracks
        #[arg(short = 'n', long = "samples", default_value = "100")]
        samples: usize,
    },
    /// Records of a contact map
    Contacts {
        #[arg(default_value = "0", allow_negative_numbers = true)]
        map: i64,
    },
    /// Dataset ids of the project
    Datasets,
    /// Segment width of the project
    Interval,
}

fn print_json<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<()> {
    let text = match format {
        OutputFormat::Pretty => serde_json::to_string_pretty(value)?,
        OutputFormat::Compact => serde_json::to_string(value)?,
    };
    println!("{}", text);
    Ok(())
}

#[cfg(feature = "bigwig")]
fn create_sampler(track_root: &Path) -> Box<dyn RangeSampler> {
    Box::new(gentk_query::BigWigSampler::new(track_root))
}

#[cfg(not(feature = "bigwig"))]
fn create_sampler(track_root: &Path) -> Box<dyn RangeSampler> {
    log::debug!("built without bigwig support; tracks under {:?} are not readable", track_root);
    Box::new(gentk_query::NoSampler)
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let start = Instant::now();
    let repo = load_project(&cli.project)
        .with_context(|| format!("Failed to load project {:?}", cli.project))?;
    log::info!(
        "Project {} loaded in {:.2}s",
        repo.project_id(),
        start.elapsed().as_secs_f64()
    );

    let track_root = cli.track_root.clone().unwrap_or_else(|| {
        cli.project
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default()
    });
    let sampler = create_sampler(&track_root);
    let engine = QueryEngine::new(&repo, sampler.as_ref(), repo.project_id());
    let format = cli.format;

    match cli.command {
        Commands::Genes => print_json(&engine.genes()?, format)?,
        Commands::Gene { name } => print_json(&engine.gene(&name)?, format)?,
        Commands::GenesForLocations { locations } => {
            print_json(&engine.genes_for_locations(&locations)?, format)?
        }
        Commands::GenesForSegments { segments, structure } => {
            print_json(&engine.genes_for_segments(structure, &segments)?, format)?
        }
        Commands::SegmentsForGenes { genes, structure } => {
            print_json(&engine.segments_for_genes(structure, &genes)?, format)?
        }
        Commands::Segments { structure } => {
            print_json(&engine.structure_segments(structure)?, format)?
        }
        Commands::SegmentIds { structure } => print_json(&engine.segment_ids(structure)?, format)?,
        Commands::Unmapped { structure } => print_json(&engine.unmapped(structure)?, format)?,
        Commands::Array { id, slice } => print_json(&engine.array(id, slice)?, format)?,
        Commands::Arrays { kind } => print_json(&engine.arrays(&kind)?, format)?,
        Commands::Sample {
            id,
            begin,
            end,
            slice,
            samples,
        } => print_json(&engine.sample_array(id, slice, begin, end, samples)?, format)?,
        Commands::Contacts { map } => print_json(&engine.contacts(map)?, format)?,
        Commands::Datasets => print_json(&engine.dataset_ids()?, format)?,
        Commands::Interval => print_json(&engine.interval()?, format)?,
    }

    log::debug!("Query answered in {:.3}s", start.elapsed().as_secs_f64());
    Ok(())
}
