//! Dependency graph of emitted build artifacts.
//!
//! This crate turns the artifact snapshot a bundler emits at the end of a
//! build into a flat list of [`DependencyNode`]s and finds circular
//! dependencies in it.
//!
//! # Features
//!
//! - Structural artifact-to-node transform with defaults for missing metadata
//! - Cycle detection with an explicit traversal stack (no recursion limit)
//! - Indexed lookup by artifact file name
//! - Optional serde support
//!
//! # Example
//!
//! ```
//! use buildscope_graph::{ArtifactMeta, build_dependency_graph, find_cycles};
//!
//! let artifacts = vec![
//!     ("a".to_string(), ArtifactMeta::new("a.js").with_dependencies(["b.js"])),
//!     ("b".to_string(), ArtifactMeta::new("b.js").with_dependencies(["a.js"])),
//! ];
//!
//! let graph = build_dependency_graph(artifacts);
//! let cycles = find_cycles(&graph);
//! assert_eq!(cycles, vec![vec!["a.js".to_string(), "b.js".to_string()]]);
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]
#![warn(unused_results)]

use std::collections::{HashMap, HashSet};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Error types for indexed graph lookups.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    /// No node with the given file name
    #[error("Artifact {0} not found in graph")]
    NodeNotFound(String),
}

/// Result type for graph operations.
pub type GraphResult<T> = Result<T, GraphError>;

/// Metadata of one emitted artifact, as reported by the bundler.
///
/// Every field except the file name is optional; missing lists become empty
/// and a missing content length becomes zero.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct ArtifactMeta {
    /// Output file name of the artifact
    pub file_name: String,
    /// Identifiers imported by this artifact
    #[cfg_attr(feature = "serde", serde(default))]
    pub imports: Option<Vec<String>>,
    /// Identifiers this artifact depends on
    #[cfg_attr(feature = "serde", serde(default))]
    pub dependencies: Option<Vec<String>>,
    /// Generated content, used for size measurement
    #[cfg_attr(feature = "serde", serde(default))]
    pub code: Option<String>,
    /// Content length when the content itself is not shipped
    #[cfg_attr(feature = "serde", serde(default))]
    pub size: Option<u64>,
}

impl ArtifactMeta {
    /// Create metadata for an artifact with no imports, dependencies or content.
    #[must_use]
    pub fn new(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            ..Self::default()
        }
    }

    /// Set the import list.
    #[must_use]
    pub fn with_imports<I, S>(mut self, imports: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.imports = Some(imports.into_iter().map(Into::into).collect());
        self
    }

    /// Set the dependency list.
    #[must_use]
    pub fn with_dependencies<I, S>(mut self, dependencies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dependencies = Some(dependencies.into_iter().map(Into::into).collect());
        self
    }

    /// Set the generated content.
    #[must_use]
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Content length in bytes, zero when unknown.
    #[must_use]
    pub fn content_length(&self) -> u64 {
        match (&self.code, self.size) {
            (Some(code), _) => code.len() as u64,
            (None, Some(size)) => size,
            (None, None) => 0,
        }
    }
}

/// One emitted artifact in the dependency graph.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DependencyNode {
    /// Artifact identifier, unique within a graph
    pub file: String,
    /// Imported identifiers, in emitted order
    pub imports: Vec<String>,
    /// Byte length of generated content
    pub size: u64,
    /// Identifiers followed by cycle detection
    pub dependencies: Vec<String>,
}

impl From<ArtifactMeta> for DependencyNode {
    fn from(meta: ArtifactMeta) -> Self {
        let size = meta.content_length();
        Self {
            file: meta.file_name,
            imports: meta.imports.unwrap_or_default(),
            size,
            dependencies: meta.dependencies.unwrap_or_default(),
        }
    }
}

/// Build one [`DependencyNode`] per artifact, in the iteration order of `artifacts`.
///
/// The artifact key is not used; the node is identified by the artifact's
/// file name.
pub fn build_dependency_graph<K, I>(artifacts: I) -> Vec<DependencyNode>
where
    I: IntoIterator<Item = (K, ArtifactMeta)>,
{
    artifacts
        .into_iter()
        .map(|(_, meta)| DependencyNode::from(meta))
        .collect()
}

/// Find all circular dependencies in `graph`.
///
/// Each cycle is the slice of the current traversal path starting at the
/// first occurrence of the revisited node, ending with the node whose edge
/// closed the cycle. Dependencies without a node are dead ends.
#[must_use]
pub fn find_cycles(graph: &[DependencyNode]) -> Vec<Vec<String>> {
    CycleFinder::new(graph).run()
}

/// A traversal frame: the node and the index of its next unexplored dependency.
struct Frame<'a> {
    node: &'a str,
    next_dep: usize,
}

struct CycleFinder<'a> {
    graph: &'a [DependencyNode],
    // First node per file name wins
    index: HashMap<&'a str, &'a DependencyNode>,
    visited: HashSet<&'a str>,
    on_stack: HashSet<&'a str>,
    stack: Vec<Frame<'a>>,
    cycles: Vec<Vec<String>>,
}

impl<'a> CycleFinder<'a> {
    fn new(graph: &'a [DependencyNode]) -> Self {
        let mut index = HashMap::with_capacity(graph.len());
        for node in graph {
            let _ = index.entry(node.file.as_str()).or_insert(node);
        }

        Self {
            graph,
            index,
            visited: HashSet::new(),
            on_stack: HashSet::new(),
            stack: Vec::new(),
            cycles: Vec::new(),
        }
    }

    fn run(mut self) -> Vec<Vec<String>> {
        for node in self.graph {
            if !self.visited.contains(node.file.as_str()) {
                self.enter(node.file.as_str());
                self.drain();
            }
        }
        self.cycles
    }

    fn enter(&mut self, node: &'a str) {
        let _ = self.visited.insert(node);
        let _ = self.on_stack.insert(node);
        self.stack.push(Frame { node, next_dep: 0 });
    }

    fn drain(&mut self) {
        while let Some(frame) = self.stack.last_mut() {
            let deps: &'a [String] = self
                .index
                .get(frame.node)
                .copied()
                .map_or(&[][..], |node| node.dependencies.as_slice());

            let Some(dep) = deps.get(frame.next_dep) else {
                let node = frame.node;
                let _ = self.stack.pop();
                let _ = self.on_stack.remove(node);
                continue;
            };
            frame.next_dep += 1;

            let dep = dep.as_str();
            if self.on_stack.contains(dep) {
                if let Some(start) = self.stack.iter().position(|f| f.node == dep) {
                    self.cycles.push(
                        self.stack[start..]
                            .iter()
                            .map(|f| f.node.to_string())
                            .collect(),
                    );
                }
            } else if !self.visited.contains(dep) {
                self.enter(dep);
            }
        }
    }
}

/// An indexed view over a dependency graph.
///
/// Keeps nodes in their original order and adds O(1) lookup by file name.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    nodes: Vec<DependencyNode>,
    index: HashMap<String, usize>,
}

impl DependencyGraph {
    /// Index `nodes` by file name. For duplicate file names the first node wins.
    #[must_use]
    pub fn new(nodes: Vec<DependencyNode>) -> Self {
        let mut index = HashMap::with_capacity(nodes.len());
        for (i, node) in nodes.iter().enumerate() {
            let _ = index.entry(node.file.clone()).or_insert(i);
        }
        Self { nodes, index }
    }

    /// Look up a node by file name.
    ///
    /// # Errors
    ///
    /// Returns `GraphError::NodeNotFound` if no node has this file name.
    pub fn node(&self, file: &str) -> GraphResult<&DependencyNode> {
        self.index
            .get(file)
            .map(|&i| &self.nodes[i])
            .ok_or_else(|| GraphError::NodeNotFound(file.to_string()))
    }

    /// All nodes in original order.
    #[must_use]
    pub fn nodes(&self) -> &[DependencyNode] {
        &self.nodes
    }

    /// Get the number of nodes in the graph.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Get the number of dependency edges in the graph.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.nodes.iter().map(|n| n.dependencies.len()).sum()
    }

    /// Files that list `file` as a dependency, in graph order.
    ///
    /// # Errors
    ///
    /// Returns `GraphError::NodeNotFound` if `file` is not a node.
    pub fn dependents(&self, file: &str) -> GraphResult<Vec<&str>> {
        let _ = self.node(file)?;
        Ok(self
            .nodes
            .iter()
            .filter(|n| n.dependencies.iter().any(|d| d == file))
            .map(|n| n.file.as_str())
            .collect())
    }

    /// Find all circular dependencies. See [`find_cycles`].
    #[must_use]
    pub fn find_cycles(&self) -> Vec<Vec<String>> {
        find_cycles(&self.nodes)
    }

    /// Consume the view and return the nodes.
    #[must_use]
    pub fn into_nodes(self) -> Vec<DependencyNode> {
        self.nodes
    }
}
