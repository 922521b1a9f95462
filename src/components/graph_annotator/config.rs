//! Caller options and the widget-level style they resolve to.

use std::fmt;
use std::rc::Rc;

use super::annotator::Annotator;
use super::error::AnnotatorError;
use super::types::{Graph, Rgb};

/// Stroke width when neither element nor widget sets one.
pub const DEFAULT_LINE_WIDTH: f64 = 3.0;
/// Node marker diameter when unset.
pub const DEFAULT_NODE_DIAMETER: f64 = 3.0;
/// Pixels within which a press grabs a placed node.
pub const DEFAULT_HIT_DISTANCE: f64 = 10.0;
/// Stroke colour for both nodes and edges when unset.
pub const DEFAULT_COLOR: Rgb = Rgb::CYAN;

/// Called with the annotator and the node index a gesture targeted.
pub type NodeCallback = Rc<dyn Fn(&Annotator, usize)>;
/// Called once the backing image is ready.
pub type LoadCallback = Rc<dyn Fn(&Annotator)>;
/// Called when the backing image fails to load.
pub type ErrorCallback = Rc<dyn Fn(&Annotator, &AnnotatorError)>;

/// Caller-facing options. Every field is optional.
#[derive(Clone, Default)]
pub struct AnnotatorConfig {
	/// Topology to annotate; two nodes and one edge when absent.
	pub graph: Option<Graph>,
	/// Fired once per completed press-drag-release. Pointer input is only
	/// wired when this is set.
	pub on_change: Option<NodeCallback>,
	/// Fired on every press that resolves a node, placed or not.
	pub on_select: Option<NodeCallback>,
	/// Fired once the image has loaded and the first frame is drawn.
	pub on_load: Option<LoadCallback>,
	/// Fired when the image fails to load.
	pub on_error: Option<ErrorCallback>,
	/// Element to render into; a `div` is appended to `<body>` when absent.
	pub container: Option<web_sys::Element>,
	/// Default stroke width for nodes and edges.
	pub line_width: Option<f64>,
	/// Default node colour.
	pub node_color: Option<Rgb>,
	/// Default edge colour.
	pub edge_color: Option<Rgb>,
	/// Default node marker diameter.
	pub node_diameter: Option<f64>,
	/// Grab radius for placed nodes.
	pub hit_distance: Option<f64>,
}

impl fmt::Debug for AnnotatorConfig {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("AnnotatorConfig")
			.field("graph", &self.graph)
			.field("on_change", &self.on_change.is_some())
			.field("on_select", &self.on_select.is_some())
			.field("on_load", &self.on_load.is_some())
			.field("on_error", &self.on_error.is_some())
			.field("container", &self.container.is_some())
			.field("line_width", &self.line_width)
			.field("node_color", &self.node_color)
			.field("edge_color", &self.edge_color)
			.field("node_diameter", &self.node_diameter)
			.field("hit_distance", &self.hit_distance)
			.finish()
	}
}

impl AnnotatorConfig {
	/// All options unset.
	pub fn new() -> Self {
		Self::default()
	}

	/// Set [`AnnotatorConfig::graph`].
	pub fn graph(mut self, graph: Graph) -> Self {
		self.graph = Some(graph);
		self
	}

	/// Set the change callback; this also enables pointer input.
	pub fn on_change(mut self, f: impl Fn(&Annotator, usize) + 'static) -> Self {
		self.on_change = Some(Rc::new(f));
		self
	}

	/// Set the selection callback.
	pub fn on_select(mut self, f: impl Fn(&Annotator, usize) + 'static) -> Self {
		self.on_select = Some(Rc::new(f));
		self
	}

	/// Set the load callback.
	pub fn on_load(mut self, f: impl Fn(&Annotator) + 'static) -> Self {
		self.on_load = Some(Rc::new(f));
		self
	}

	/// Set the image error callback.
	pub fn on_error(mut self, f: impl Fn(&Annotator, &AnnotatorError) + 'static) -> Self {
		self.on_error = Some(Rc::new(f));
		self
	}

	/// Render into `container` instead of a fresh `div`.
	pub fn container(mut self, container: web_sys::Element) -> Self {
		self.container = Some(container);
		self
	}

	/// Widget stroke width.
	pub fn line_width(mut self, line_width: f64) -> Self {
		self.line_width = Some(line_width);
		self
	}

	/// Widget node colour.
	pub fn node_color(mut self, color: impl Into<Rgb>) -> Self {
		self.node_color = Some(color.into());
		self
	}

	/// Widget edge colour.
	pub fn edge_color(mut self, color: impl Into<Rgb>) -> Self {
		self.edge_color = Some(color.into());
		self
	}

	/// Widget node diameter.
	pub fn node_diameter(mut self, diameter: f64) -> Self {
		self.node_diameter = Some(diameter);
		self
	}

	/// Grab radius.
	pub fn hit_distance(mut self, distance: f64) -> Self {
		self.hit_distance = Some(distance);
		self
	}
}

/// Widget-level defaults after falling back from unset options.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Style {
	/// Stroke width for elements without their own.
	pub line_width: f64,
	/// Node colour for nodes without their own.
	pub node_color: Rgb,
	/// Edge colour for edges without their own.
	pub edge_color: Rgb,
	/// Marker diameter for nodes without their own.
	pub node_diameter: f64,
	/// Grab radius for placed nodes.
	pub hit_distance: f64,
}

impl Default for Style {
	fn default() -> Self {
		Self {
			line_width: DEFAULT_LINE_WIDTH,
			node_color: DEFAULT_COLOR,
			edge_color: DEFAULT_COLOR,
			node_diameter: DEFAULT_NODE_DIAMETER,
			hit_distance: DEFAULT_HIT_DISTANCE,
		}
	}
}

impl Style {
	/// Resolve options, treating zero, negative and NaN numbers as unset.
	pub fn from_config(config: &AnnotatorConfig) -> Self {
		Self {
			line_width: positive(config.line_width).unwrap_or(DEFAULT_LINE_WIDTH),
			node_color: config.node_color.unwrap_or(DEFAULT_COLOR),
			edge_color: config.edge_color.unwrap_or(DEFAULT_COLOR),
			node_diameter: positive(config.node_diameter).unwrap_or(DEFAULT_NODE_DIAMETER),
			hit_distance: positive(config.hit_distance).unwrap_or(DEFAULT_HIT_DISTANCE),
		}
	}
}

/// Zero, negative and NaN count as unset.
pub(crate) fn positive(value: Option<f64>) -> Option<f64> {
	value.filter(|v| *v > 0.0)
}
