// ============================================================
// Layer 5 — Graph Encoders
// ============================================================
// Implementations of the GraphEncoder contract.
//
//   NodeTableEncoder — looks up one vector per node in a table
//                      exported by the graph-representation
//                      model and sums them. Table file format
//                      (node2vec / word2vec text):
//
//                        <num_nodes> <dim>
//                        12 0.13 -0.02 ... (dim values)
//                        40 0.91  0.44 ...
//
//   NullGraphEncoder — zero vector for every graph; used when
//                      no node table is supplied.
//
// The graph model itself is trained elsewhere; this layer only
// reads what it produced.

use anyhow::{bail, ensure, Context, Result};
use std::{collections::HashMap, fs, path::Path};

use crate::domain::sentence_pair::NodeId;
use crate::domain::traits::GraphEncoder;

/// Embedding width used when no node table fixes it
pub const DEFAULT_GRAPH_DIM: usize = 128;

/// Sums pre-computed node vectors.
#[derive(Debug, Clone)]
pub struct NodeTableEncoder {
    dim:   usize,
    table: HashMap<NodeId, Vec<f32>>,
}

impl NodeTableEncoder {
    /// Build from an in-memory table; every row must have `dim` values.
    pub fn new(dim: usize, table: HashMap<NodeId, Vec<f32>>) -> Result<Self> {
        for (node, row) in &table {
            ensure!(
                row.len() == dim,
                "node {node} has {} values, expected {dim}",
                row.len()
            );
        }
        Ok(Self { dim, table })
    }

    /// Load a node-embedding text file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("Cannot read node embeddings '{}'", path.display()))?;
        let encoder = Self::parse(&text)
            .with_context(|| format!("Malformed node embeddings '{}'", path.display()))?;

        tracing::info!(
            "Loaded {} node embeddings (dim={}) from '{}'",
            encoder.len(),
            encoder.dim,
            path.display()
        );
        Ok(encoder)
    }

    /// Parse the `<num_nodes> <dim>` header followed by one row per node.
    pub fn parse(text: &str) -> Result<Self> {
        let mut lines = text.lines().enumerate().filter(|(_, l)| !l.trim().is_empty());

        let (_, header) = lines.next().context("empty node embedding file")?;
        let header: Vec<&str> = header.split_whitespace().collect();
        if header.len() != 2 {
            bail!("line 1: expected '<num_nodes> <dim>' header");
        }
        let expected: usize = header[0].parse().context("line 1: bad node count")?;
        let dim:      usize = header[1].parse().context("line 1: bad dimension")?;

        let mut table = HashMap::with_capacity(expected);
        for (i, line) in lines {
            let mut fields = line.split_whitespace();
            let node: NodeId = fields
                .next()
                .unwrap_or_default()
                .parse()
                .with_context(|| format!("line {}: bad node id", i + 1))?;
            let row = fields
                .map(str::parse::<f32>)
                .collect::<Result<Vec<_>, _>>()
                .with_context(|| format!("line {}: bad value", i + 1))?;
            ensure!(
                row.len() == dim,
                "line {}: node {node} has {} values, expected {dim}",
                i + 1,
                row.len()
            );
            if table.insert(node, row).is_some() {
                bail!("line {}: node {node} listed twice", i + 1);
            }
        }

        if table.len() != expected {
            tracing::warn!(
                "Node embedding header announces {} nodes, found {}",
                expected,
                table.len()
            );
        }

        Ok(Self { dim, table })
    }

    /// Number of nodes in the table
    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

impl GraphEncoder for NodeTableEncoder {
    fn embedding_dim(&self) -> usize {
        self.dim
    }

    fn encode(&self, nodes: &[NodeId]) -> Result<Vec<f32>> {
        let mut sum = vec![0.0f32; self.dim];
        for node in nodes {
            let row = self
                .table
                .get(node)
                .with_context(|| format!("graph node {node} has no embedding"))?;
            for (acc, v) in sum.iter_mut().zip(row) {
                *acc += v;
            }
        }
        Ok(sum)
    }
}

/// Zero vector for every graph.
#[derive(Debug, Clone, Copy)]
pub struct NullGraphEncoder {
    dim: usize,
}

impl NullGraphEncoder {
    pub fn new(dim: usize) -> Self {
        Self { dim }
    }
}

impl Default for NullGraphEncoder {
    fn default() -> Self {
        Self::new(DEFAULT_GRAPH_DIM)
    }
}

impl GraphEncoder for NullGraphEncoder {
    fn embedding_dim(&self) -> usize {
        self.dim
    }

    fn encode(&self, _nodes: &[NodeId]) -> Result<Vec<f32>> {
        Ok(vec![0.0; self.dim])
    }
}
