//! Batch near-duplicate HTML clustering.
//!
//! Reads a list of HTML files, computes the pairwise gross-similarity
//! matrix, clusters it, and writes the run's artifacts (id listing, matrix
//! CSV, cluster listing, timing report) into a work directory.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, bail};
use clap::Parser;
use dejavu::{
    Document, GrossSim, SharedNeighborClusterer, SimilarityComputer, parse_file, report,
};
use tedium::matrix::pairwise;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "dejavu", version, about = "Cluster near-duplicate HTML pages")]
struct Cli {
    /// File containing one HTML file path per line (blank lines and lines
    /// starting with '#' are skipped)
    #[arg(long)]
    list: PathBuf,

    /// Directory to write ids.txt, gross-sim.csv, clusters.txt and
    /// report.txt into (created if missing)
    #[arg(long)]
    workdir: PathBuf,

    /// Minimum gross similarity for a neighbor (τ)
    #[arg(long, default_value_t = 0.75)]
    threshold: f64,

    /// Maximum neighborhood size per document (k)
    #[arg(long, default_value_t = 100)]
    neighbors: usize,

    /// Minimum shared neighbors for two clusters to merge (kt)
    #[arg(long, default_value_t = 3)]
    merge_threshold: usize,

    /// Weight of structural similarity in the gross score; style similarity
    /// gets the complement
    #[arg(long, default_value_t = 0.8)]
    structure_weight: f64,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let started = Instant::now();

    let listing = fs::read_to_string(&cli.list)
        .with_context(|| format!("failed to read list file {}", cli.list.display()))?;
    let mut docs: Vec<Document> = Vec::new();
    let mut skipped = 0usize;
    for line in listing.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        match parse_file(Path::new(line)) {
            Ok(doc) => docs.push(doc),
            Err(err) => {
                warn!(path = line, error = %err, "skipping document");
                skipped += 1;
            }
        }
    }
    if docs.len() < 2 {
        bail!(
            "need at least 2 parseable documents to cluster, got {} ({skipped} skipped)",
            docs.len()
        );
    }
    let parsed_in = started.elapsed();
    info!(documents = docs.len(), skipped, "parsed batch");

    fs::create_dir_all(&cli.workdir)
        .with_context(|| format!("failed to create workdir {}", cli.workdir.display()))?;

    let labels: Vec<String> = docs.iter().map(|d| d.id.clone()).collect();
    report::write_ids(&labels, &cli.workdir.join("ids.txt"))
        .context("failed to write ids.txt")?;

    let matrix_started = Instant::now();
    let sim = GrossSim::web(cli.structure_weight)?;
    let matrix = pairwise(&docs, 1.0, true, |a, b| sim.compute(a, b))?;
    let matrix_in = matrix_started.elapsed();
    info!(order = matrix.order(), elapsed = ?matrix_in, "similarity matrix built");
    report::write_matrix_csv(&matrix, &cli.workdir.join("gross-sim.csv"))
        .context("failed to write gross-sim.csv")?;

    let cluster_started = Instant::now();
    let clusterer =
        SharedNeighborClusterer::new(cli.threshold, cli.neighbors, cli.merge_threshold)?;
    let clusters = clusterer.cluster(&matrix, &labels)?;
    let clustered_in = cluster_started.elapsed();
    info!(clusters = clusters.len(), elapsed = ?clustered_in, "clustered batch");
    report::write_clusters(&clusters, &cli.workdir.join("clusters.txt"))
        .context("failed to write clusters.txt")?;

    let report_text = format!(
        "documents: {}\nskipped: {}\nclusters: {}\nparse: {:?}\nmatrix: {:?}\ncluster: {:?}\ntotal: {:?}\n",
        docs.len(),
        skipped,
        clusters.len(),
        parsed_in,
        matrix_in,
        clustered_in,
        started.elapsed(),
    );
    fs::write(cli.workdir.join("report.txt"), report_text)
        .context("failed to write report.txt")?;

    info!(workdir = %cli.workdir.display(), "done");
    Ok(())
}
