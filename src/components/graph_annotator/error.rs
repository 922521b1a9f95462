//! Errors raised by the annotator.

use std::fmt;

use thiserror::Error;

/// Which element list an index referred to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ElementKind {
	/// The node list.
	Node,
	/// The edge list.
	Edge,
}

impl fmt::Display for ElementKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			ElementKind::Node => "node",
			ElementKind::Edge => "edge",
		})
	}
}

/// Everything that can go wrong building or driving an annotator.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum AnnotatorError {
	/// Attribute update addressed an element that does not exist. Nothing changed.
	#[error("{kind} index {index} out of range (len {len})")]
	IndexOutOfRange {
		/// List the index was checked against.
		kind: ElementKind,
		/// Offending index.
		index: usize,
		/// Length of that list.
		len: usize,
	},
	#[error("edge {edge} references node {node}, but the graph has {node_count} nodes")]
	/// An edge endpoint is not a node of the graph.
	InvalidTopology {
		/// Index of the bad edge.
		edge: usize,
		/// Endpoint that does not exist.
		node: usize,
		/// Number of nodes the graph was given.
		node_count: usize,
	},
	#[error("failed to load image from {src}")]
	/// The backing image could not be loaded.
	ImageLoad {
		/// Image URL that failed.
		src: String,
	},
	#[error("DOM error: {0}")]
	/// A browser API call failed.
	Dom(String),
}

/// Result alias for annotator operations.
pub type Result<T> = std::result::Result<T, AnnotatorError>;
