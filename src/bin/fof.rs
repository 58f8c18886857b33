use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use fof::gadget::{self, ReadOptions};
use fof::{FriendsOfFriends, PointSet, Threshold};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    /// Whitespace- or comma-separated rows of coordinates
    Text,
    /// Gadget-2 snapshot (SnapFormat 2)
    Gadget,
}

#[derive(Parser)]
#[command(name = "fof")]
#[command(about = "Friends-of-friends groups of a point cloud", long_about = None)]
struct Cli {
    /// Input file
    input: PathBuf,

    /// Linking length
    #[arg(short, long)]
    linking_length: f64,

    /// Input format
    #[arg(short, long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Check all pairs instead of building an R-tree
    #[arg(long, action = ArgAction::SetTrue)]
    brute: bool,

    /// Link only pairs strictly closer than the linking length
    #[arg(long, action = ArgAction::SetTrue)]
    exclusive: bool,

    /// R-tree node capacity
    #[arg(long, default_value_t = fof::index::DEFAULT_NODE_CAPACITY)]
    node_capacity: usize,

    /// Gadget particle type to load
    #[arg(long, default_value_t = gadget::DARK_MATTER)]
    particle_type: usize,

    /// Divide Gadget positions by the box size
    #[arg(long, action = ArgAction::SetTrue)]
    normalize: bool,

    /// Ignore groups smaller than this in the report
    #[arg(long, default_value_t = 1)]
    min_size: usize,

    /// Number of largest groups to list
    #[arg(long, default_value_t = 10)]
    top: usize,
}

fn load(cli: &Cli) -> Result<PointSet> {
    let points = match cli.format {
        Format::Text => {
            let file = File::open(&cli.input)
                .with_context(|| format!("opening {}", cli.input.display()))?;
            PointSet::read_text(BufReader::new(file))?
        }
        Format::Gadget => {
            let options = ReadOptions {
                particle_type: cli.particle_type,
                normalize: cli.normalize,
            };
            let (header, points) = gadget::open(&cli.input, options)
                .with_context(|| format!("reading snapshot {}", cli.input.display()))?;
            info!(
                redshift = header.redshift,
                box_size = header.box_size,
                files = header.num_files,
                "snapshot header"
            );
            points
        }
    };
    Ok(points)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("fof=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let start = Instant::now();
    let points = load(&cli)?;
    info!(
        n = points.len(),
        dim = points.dim(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "loaded points"
    );

    let threshold = if cli.exclusive {
        Threshold::Exclusive
    } else {
        Threshold::Inclusive
    };
    let start = Instant::now();
    let groups = FriendsOfFriends::new(cli.linking_length)
        .with_brute(cli.brute)
        .with_threshold(threshold)
        .with_node_capacity(cli.node_capacity)
        .fit(&points)?;
    info!(
        groups = groups.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "clustering finished"
    );

    let mut sizes: Vec<usize> = groups
        .sizes()
        .into_iter()
        .filter(|&s| s >= cli.min_size)
        .collect();
    sizes.sort_unstable_by(|a, b| b.cmp(a));

    println!("points: {}", points.len());
    println!("groups: {} (size >= {})", sizes.len(), cli.min_size);
    for (rank, size) in sizes.iter().take(cli.top).enumerate() {
        println!("  #{:<4} {size}", rank + 1);
    }
    Ok(())
}
