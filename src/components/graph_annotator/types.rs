//! Graph model: fixed topology, placed positions and per-element style overrides.

use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

use super::error::{AnnotatorError, ElementKind, Result};

/// A point in surface pixel coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
	/// Pixels from the left edge.
	pub x: f64,
	/// Pixels from the top edge.
	pub y: f64,
}

impl Point {
	/// Point at `(x, y)`.
	pub const fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}

	/// Euclidean distance.
	pub fn distance_to(self, other: Point) -> f64 {
		let (dx, dy) = (self.x - other.x, self.y - other.y);
		(dx * dx + dy * dy).sqrt()
	}

	/// Clamp into `[0, width] x [0, height]`.
	pub fn clamp_to(self, width: f64, height: f64) -> Self {
		Self {
			x: self.x.clamp(0.0, width.max(0.0)),
			y: self.y.clamp(0.0, height.max(0.0)),
		}
	}
}

impl From<(f64, f64)> for Point {
	fn from((x, y): (f64, f64)) -> Self {
		Self { x, y }
	}
}

/// An RGB stroke colour.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgb {
	/// Red channel.
	pub r: u8,
	/// Green channel.
	pub g: u8,
	/// Blue channel.
	pub b: u8,
}

impl Rgb {
	/// `[0, 255, 255]`, the default stroke for nodes and edges.
	pub const CYAN: Rgb = Rgb::new(0, 255, 255);

	/// Colour from its channels.
	pub const fn new(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b }
	}

	/// CSS colour string, e.g. `rgb(0, 255, 255)`.
	pub fn css(self) -> String {
		format!("rgb({}, {}, {})", self.r, self.g, self.b)
	}
}

impl From<[u8; 3]> for Rgb {
	fn from([r, g, b]: [u8; 3]) -> Self {
		Self { r, g, b }
	}
}

impl fmt::Display for Rgb {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "[{}, {}, {}]", self.r, self.g, self.b)
	}
}

/// Style overrides for a single node. `None` defers to the widget default.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct NodeAttributes {
	/// Marker stroke colour.
	pub color: Option<Rgb>,
	/// Marker stroke width in pixels.
	pub line_width: Option<f64>,
	/// Marker diameter in pixels.
	pub diameter: Option<f64>,
}

impl NodeAttributes {
	/// Override the colour.
	pub fn with_color(mut self, color: impl Into<Rgb>) -> Self {
		self.color = Some(color.into());
		self
	}

	/// Override the stroke width.
	pub fn with_line_width(mut self, line_width: f64) -> Self {
		self.line_width = Some(line_width);
		self
	}

	/// Override the marker diameter.
	pub fn with_diameter(mut self, diameter: f64) -> Self {
		self.diameter = Some(diameter);
		self
	}

	/// Shallow per-field overwrite: fields set in `other` win, the rest are kept.
	pub fn merge(&mut self, other: &NodeAttributes) {
		if other.color.is_some() {
			self.color = other.color;
		}
		if other.line_width.is_some() {
			self.line_width = other.line_width;
		}
		if other.diameter.is_some() {
			self.diameter = other.diameter;
		}
	}
}

/// Style overrides for a single edge.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct EdgeAttributes {
	/// Line colour.
	pub color: Option<Rgb>,
	/// Line width in pixels.
	pub line_width: Option<f64>,
}

impl EdgeAttributes {
	/// Override the colour.
	pub fn with_color(mut self, color: impl Into<Rgb>) -> Self {
		self.color = Some(color.into());
		self
	}

	/// Override the line width.
	pub fn with_line_width(mut self, line_width: f64) -> Self {
		self.line_width = Some(line_width);
		self
	}

	/// Same overwrite rule as [`NodeAttributes::merge`].
	pub fn merge(&mut self, other: &EdgeAttributes) {
		if other.color.is_some() {
			self.color = other.color;
		}
		if other.line_width.is_some() {
			self.line_width = other.line_width;
		}
	}
}

/// An annotation target. Its identity is its index in the graph.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Node {
	/// Display label; not used for identity.
	pub name: Option<String>,
	/// Set once the node has been placed, afterwards only ever overwritten.
	pub position: Option<Point>,
	/// Style overrides for this node.
	pub attributes: NodeAttributes,
}

impl Node {
	/// Unplaced node with a label.
	pub fn named(name: impl Into<String>) -> Self {
		Self {
			name: Some(name.into()),
			..Self::default()
		}
	}

	/// Replace the style overrides.
	pub fn with_attributes(mut self, attributes: NodeAttributes) -> Self {
		self.attributes = attributes;
		self
	}

	/// True once the node has a position.
	pub fn is_placed(&self) -> bool {
		self.position.is_some()
	}
}

/// A link between two node indices, drawn once both ends are placed.
#[derive(Clone, Debug, PartialEq)]
pub struct Edge {
	/// First endpoint.
	pub a: usize,
	/// Second endpoint.
	pub b: usize,
	/// Style overrides for this edge.
	pub attributes: EdgeAttributes,
}

impl Edge {
	/// Unstyled edge between nodes `a` and `b`.
	pub fn new(a: usize, b: usize) -> Self {
		Self {
			a,
			b,
			attributes: EdgeAttributes::default(),
		}
	}

	/// Replace the style overrides.
	pub fn with_attributes(mut self, attributes: EdgeAttributes) -> Self {
		self.attributes = attributes;
		self
	}
}

impl From<(usize, usize)> for Edge {
	fn from((a, b): (usize, usize)) -> Self {
		Self::new(a, b)
	}
}

/// Read-only live view of an annotator's graph.
///
/// Clones share the same graph, so a handle taken before a gesture shows the
/// positions that gesture produced. Mutation stays with the annotator, which
/// redraws on every change. Hold a borrow only briefly; a borrow held across a
/// pointer event will panic.
#[derive(Clone, Debug)]
pub struct SharedGraph(Rc<RefCell<Graph>>);

impl SharedGraph {
	pub(crate) fn new(graph: Graph) -> Self {
		Self(Rc::new(RefCell::new(graph)))
	}

	/// Borrow the current state of the graph.
	pub fn borrow(&self) -> Ref<'_, Graph> {
		self.0.borrow()
	}

	pub(crate) fn borrow_mut(&self) -> RefMut<'_, Graph> {
		self.0.borrow_mut()
	}

	/// True if both handles view the same graph.
	pub fn ptr_eq(&self, other: &SharedGraph) -> bool {
		Rc::ptr_eq(&self.0, &other.0)
	}
}

/// Nodes and edges with a topology fixed at construction.
#[derive(Clone, Debug, PartialEq)]
pub struct Graph {
	nodes: Vec<Node>,
	edges: Vec<Edge>,
}

impl Default for Graph {
	/// Two nodes joined by a single edge.
	fn default() -> Self {
		Self {
			nodes: vec![Node::default(), Node::default()],
			edges: vec![Edge::new(0, 1)],
		}
	}
}

impl Graph {
	/// Build a graph, rejecting edges whose endpoints do not exist.
	pub fn new(nodes: Vec<Node>, edges: Vec<Edge>) -> Result<Self> {
		let node_count = nodes.len();
		for (i, edge) in edges.iter().enumerate() {
			for node in [edge.a, edge.b] {
				if node >= node_count {
					return Err(AnnotatorError::InvalidTopology {
						edge: i,
						node,
						node_count,
					});
				}
			}
		}
		Ok(Self { nodes, edges })
	}

	/// Named nodes joined by `(a, b)` index pairs.
	pub fn from_names(names: &[&str], edges: &[(usize, usize)]) -> Result<Self> {
		Self::new(
			names.iter().map(|n| Node::named(*n)).collect(),
			edges.iter().copied().map(Edge::from).collect(),
		)
	}

	/// Nodes in declaration order.
	pub fn nodes(&self) -> &[Node] {
		&self.nodes
	}

	/// Edges in declaration order.
	pub fn edges(&self) -> &[Edge] {
		&self.edges
	}

	/// Node at `index`, if it exists.
	pub fn node(&self, index: usize) -> Option<&Node> {
		self.nodes.get(index)
	}

	/// Edge at `index`, if it exists.
	pub fn edge(&self, index: usize) -> Option<&Edge> {
		self.edges.get(index)
	}

	/// Number of nodes.
	pub fn node_count(&self) -> usize {
		self.nodes.len()
	}

	/// Number of edges.
	pub fn edge_count(&self) -> usize {
		self.edges.len()
	}

	/// Nodes that have a position.
	pub fn placed_count(&self) -> usize {
		self.nodes.iter().filter(|n| n.is_placed()).count()
	}

	/// True once every node has a position.
	pub fn is_complete(&self) -> bool {
		self.nodes.iter().all(Node::is_placed)
	}

	/// Endpoint positions of an edge, if both endpoints are placed.
	pub fn edge_endpoints(&self, edge: &Edge) -> Option<(Point, Point)> {
		let a = self.nodes.get(edge.a)?.position?;
		let b = self.nodes.get(edge.b)?.position?;
		Some((a, b))
	}

	/// Merge `attributes` into node `index`, or into every node when `index` is `None`.
	pub(crate) fn set_node_attributes(
		&mut self,
		index: Option<usize>,
		attributes: &NodeAttributes,
	) -> Result<()> {
		match index {
			Some(i) => {
				let len = self.nodes.len();
				let node = self.nodes.get_mut(i).ok_or(AnnotatorError::IndexOutOfRange {
					kind: ElementKind::Node,
					index: i,
					len,
				})?;
				node.attributes.merge(attributes);
			}
			None => self
				.nodes
				.iter_mut()
				.for_each(|n| n.attributes.merge(attributes)),
		}
		Ok(())
	}

	/// Merge `attributes` into edge `index`, or into every edge when `index` is `None`.
	pub(crate) fn set_edge_attributes(
		&mut self,
		index: Option<usize>,
		attributes: &EdgeAttributes,
	) -> Result<()> {
		match index {
			Some(i) => {
				let len = self.edges.len();
				let edge = self.edges.get_mut(i).ok_or(AnnotatorError::IndexOutOfRange {
					kind: ElementKind::Edge,
					index: i,
					len,
				})?;
				edge.attributes.merge(attributes);
			}
			None => self
				.edges
				.iter_mut()
				.for_each(|e| e.attributes.merge(attributes)),
		}
		Ok(())
	}

	/// Place or move a node. Returns false for an unknown index.
	pub(crate) fn place_node(&mut self, index: usize, position: Point) -> bool {
		match self.nodes.get_mut(index) {
			Some(node) => {
				node.position = Some(position);
				true
			}
			None => false,
		}
	}
}
