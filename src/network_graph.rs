//! Adapter for the collaboration network export, a comma-separated file
//! of `source_name,target_name` pairs, shaped into the node/path JSON
//! the D3 client reads.

use anyhow::{bail, Context, Result};
use serde::Serialize;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct NetworkNode {
    pub name: String,
    pub parent: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct NetworkPath {
    pub source: usize,
    pub target: usize,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct NetworkGraph {
    pub nodes: Vec<NetworkNode>,
    pub paths: Vec<NetworkPath>,
}

/// Build the graph from `(source, target)` name pairs.
///
/// Names are deduplicated in first-seen order (source before target
/// within a row) and indexed from zero. A node's parent is the target
/// of the first row where it appears as a source; a name that never
/// appears as a source is its own parent.
pub fn build_graph<S: AsRef<str>>(pairs: &[(S, S)]) -> NetworkGraph {
    let mut names: Vec<String> = Vec::new();
    let index_of = |names: &mut Vec<String>, name: &str| -> usize {
        match names.iter().position(|n| n == name) {
            Some(i) => i,
            None => {
                names.push(name.to_string());
                names.len() - 1
            }
        }
    };

    let mut paths = Vec::with_capacity(pairs.len());
    for (source, target) in pairs {
        let source_index = index_of(&mut names, source.as_ref());
        let target_index = index_of(&mut names, target.as_ref());
        paths.push(NetworkPath {
            source: source_index,
            target: target_index,
        });
    }

    let nodes = names
        .iter()
        .map(|name| {
            let parent = pairs
                .iter()
                .find(|(source, _)| source.as_ref() == name)
                .map(|(_, target)| target.as_ref().to_string())
                .unwrap_or_else(|| name.clone());
            NetworkNode {
                name: name.clone(),
                parent,
            }
        })
        .collect();

    NetworkGraph { nodes, paths }
}

/// Read a network CSV and build the graph. Blank lines are skipped,
/// anything other than two comma-separated fields is fatal.
pub fn load_graph(path: &Path) -> Result<NetworkGraph> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open network csv {}", path.display()))?;

    let mut pairs: Vec<(String, String)> = Vec::new();
    for (line_number, line) in BufReader::new(file).lines().enumerate() {
        let line = line.with_context(|| format!("Failed to read {}", path.display()))?;
        let line = line.trim_end_matches(['\r', '\n']);
        if line.is_empty() {
            continue;
        }
        match line.split_once(',') {
            Some((source, target)) if !source.is_empty() && !target.contains(',') => {
                pairs.push((source.to_string(), target.to_string()));
            }
            _ => bail!(
                "{}:{}: expected \"source,target\", got {:?}",
                path.display(),
                line_number + 1,
                line
            ),
        }
    }

    Ok(build_graph(&pairs))
}
