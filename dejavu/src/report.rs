//! Batch output files.
//!
//! Three small, deliberately plain formats so downstream tooling (spreadsheet
//! imports, shell one-liners) can consume a run without a parser:
//!
//! - an id listing, one label per line, in matrix row order;
//! - the similarity matrix as CSV, rows in the same order as the id listing;
//! - the cluster listing, a header with the total followed by one section
//!   per cluster.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use tedium::SquareMatrix;

/// Write one label per line, in matrix row order.
pub fn write_ids(ids: &[String], path: &Path) -> io::Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    for id in ids {
        writeln!(out, "{id}")?;
    }
    out.flush()
}

/// Write the matrix as comma-separated rows, no header.
///
/// Row and column order match the id listing written alongside it.
pub fn write_matrix_csv(matrix: &SquareMatrix, path: &Path) -> io::Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    for row in matrix.rows() {
        let mut first = true;
        for value in row {
            if first {
                first = false;
            } else {
                write!(out, ",")?;
            }
            write!(out, "{value}")?;
        }
        writeln!(out)?;
    }
    out.flush()
}

/// Write the cluster listing: a `##Total Clusters:N` header, then one
/// `#Cluster:i` section per cluster with its member labels one per line.
pub fn write_clusters(clusters: &[Vec<String>], path: &Path) -> io::Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    writeln!(out, "##Total Clusters:{}", clusters.len())?;
    for (index, cluster) in clusters.iter().enumerate() {
        writeln!(out, "#Cluster:{index}")?;
        for member in cluster {
            writeln!(out, "{member}")?;
        }
    }
    out.flush()
}
