//! Graph file loading.
//!
//! Two text formats are supported. The vertex-list format carries one
//! node per line, the node id first and its out-neighbors after it;
//! ids must appear in ascending order and gaps are padded with
//! isolated nodes. The edge-list format carries one directed edge per
//! line and tolerates `#` and `%` comment lines, as published graph
//! datasets commonly use. Node ids in either format are densified to
//! `0..=max`.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use rustc_hash::{FxHashMap, FxHashSet};
use seedcast_core::{Edge, GraphStore, NodeId, WeightModel};
use tracing::warn;

use crate::errors::CliError;
use crate::options::GraphFormat;

/// Loads `path` into an immutable graph, assigning edge weights under
/// `weights`. The graph takes its name from the file stem.
pub fn load_graph(
    path: &Path,
    format: GraphFormat,
    weights: WeightModel,
) -> Result<GraphStore, CliError> {
    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "graph".to_string());
    let reader = BufReader::new(File::open(path)?);
    match format {
        GraphFormat::VertexList => vertex_list(reader, path, &name, weights),
        GraphFormat::EdgeList => edge_list(reader, path, &name, weights),
    }
}

/// Loads a seed set: one node id per line, `#` comments and blank
/// lines skipped. Ids keep their file order; a repeated id is dropped
/// with a warning so downstream spread estimates never double-count a
/// seed.
pub fn load_seed_set(path: &Path) -> Result<Vec<NodeId>, CliError> {
    let reader = BufReader::new(File::open(path)?);
    let mut seeds = Vec::new();
    let mut seen = FxHashSet::default();
    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let id: NodeId = trimmed.parse().map_err(|_| CliError::MalformedSeedSet {
            path: path.display().to_string(),
            reason: format!("line {}: expected a node id, got '{trimmed}'", line_no + 1),
        })?;
        if seen.insert(id) {
            seeds.push(id);
        } else {
            warn!(id, "duplicate seed ignored");
        }
    }
    Ok(seeds)
}

/// Numeric fields of a line; any non-digit run separates fields, so
/// spaces, tabs and commas all work.
fn fields(line: &str) -> impl Iterator<Item = NodeId> + '_ {
    line.split(|c: char| !c.is_ascii_digit())
        .filter(|s| !s.is_empty())
        .filter_map(|s| s.parse().ok())
}

fn malformed(path: &Path, reason: impl Into<String>) -> CliError {
    CliError::MalformedGraph {
        path: path.display().to_string(),
        reason: reason.into(),
    }
}

fn vertex_list(
    reader: impl BufRead,
    path: &Path,
    name: &str,
    weights: WeightModel,
) -> Result<GraphStore, CliError> {
    let mut builder = GraphStore::builder(name);
    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        let mut tokens = fields(&line);
        let Some(id) = tokens.next() else {
            continue;
        };
        let next = builder.next_id();
        if id < next {
            return Err(malformed(
                path,
                format!("line {}: node {id} repeats or runs backwards", line_no + 1),
            ));
        }
        if id > next {
            warn!(missing = id - next, "padding gap in vertex ids with isolated nodes");
            for _ in next..id {
                builder.push_node([]);
            }
        }
        builder.push_node(tokens.map(Edge::new));
    }
    Ok(builder.build(weights)?)
}

fn edge_list(
    reader: impl BufRead,
    path: &Path,
    name: &str,
    weights: WeightModel,
) -> Result<GraphStore, CliError> {
    let mut adjacency: FxHashMap<NodeId, Vec<NodeId>> = FxHashMap::default();
    let mut max_id = None;
    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim_start();
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('%') {
            continue;
        }
        let mut tokens = fields(trimmed);
        let (Some(source), Some(destination)) = (tokens.next(), tokens.next()) else {
            return Err(malformed(
                path,
                format!("line {}: expected a source and a destination", line_no + 1),
            ));
        };
        adjacency.entry(source).or_default().push(destination);
        max_id = max_id.max(Some(source.max(destination)));
    }

    let mut builder = GraphStore::builder(name);
    if let Some(max_id) = max_id {
        for v in 0..=max_id {
            let edges = adjacency.remove(&v).unwrap_or_default();
            builder.push_node(edges.into_iter().map(Edge::new));
        }
    }
    Ok(builder.build(weights)?)
}
