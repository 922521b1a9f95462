//! Full redraw of the graph onto a 2D surface.

use std::f64::consts::PI;

use web_sys::{CanvasRenderingContext2d, HtmlImageElement};

use super::config::{Style, positive};
use super::types::{Edge, Graph, Node, Point, Rgb};

/// Resolved stroke for one draw call.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stroke {
	/// Stroke colour.
	pub color: Rgb,
	/// Stroke width in pixels.
	pub width: f64,
}

/// 2D drawing target the renderer paints onto.
pub trait Surface {
	/// Drawable size in pixels; pointer input is clamped to it.
	fn size(&self) -> (f64, f64);
	/// Reset to the bare background, discarding everything drawn before.
	fn clear(&mut self);
	/// Straight segment from `from` to `to`.
	fn stroke_line(&mut self, from: Point, to: Point, stroke: Stroke);
	/// Circle outline centred on `center`.
	fn stroke_circle(&mut self, center: Point, diameter: f64, stroke: Stroke);
}

/// Redraw the whole graph: edges first, then node markers on top.
pub fn render(graph: &Graph, style: &Style, surface: &mut dyn Surface) {
	surface.clear();
	draw_edges(graph, style, surface);
	draw_nodes(graph, style, surface);
}

fn draw_edges(graph: &Graph, style: &Style, surface: &mut dyn Surface) {
	for edge in graph.edges() {
		let Some((from, to)) = graph.edge_endpoints(edge) else {
			continue;
		};
		surface.stroke_line(from, to, edge_stroke(edge, style));
	}
}

fn draw_nodes(graph: &Graph, style: &Style, surface: &mut dyn Surface) {
	for node in graph.nodes() {
		let Some(center) = node.position else {
			continue;
		};
		let diameter = positive(node.attributes.diameter).unwrap_or(style.node_diameter);
		surface.stroke_circle(center, diameter, node_stroke(node, style));
	}
}

fn edge_stroke(edge: &Edge, style: &Style) -> Stroke {
	Stroke {
		color: edge.attributes.color.unwrap_or(style.edge_color),
		width: positive(edge.attributes.line_width).unwrap_or(style.line_width),
	}
}

fn node_stroke(node: &Node, style: &Style) -> Stroke {
	Stroke {
		color: node.attributes.color.unwrap_or(style.node_color),
		width: positive(node.attributes.line_width).unwrap_or(style.line_width),
	}
}

/// Canvas 2D surface with the annotated image as background.
pub struct CanvasSurface {
	ctx: CanvasRenderingContext2d,
	image: Option<HtmlImageElement>,
	width: f64,
	height: f64,
}

impl CanvasSurface {
	/// Surface of `width` x `height` pixels drawing through `ctx`.
	pub fn new(ctx: CanvasRenderingContext2d, width: f64, height: f64) -> Self {
		Self {
			ctx,
			image: None,
			width,
			height,
		}
	}

	/// Paint `image` at its natural size beneath every frame.
	pub fn with_background(mut self, image: HtmlImageElement) -> Self {
		self.image = Some(image);
		self
	}
}

impl Surface for CanvasSurface {
	fn size(&self) -> (f64, f64) {
		(self.width, self.height)
	}

	fn clear(&mut self) {
		let _ = self.ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0);
		let _ = self.ctx.set_line_dash(&js_sys::Array::new());
		self.ctx.set_global_alpha(1.0);
		self.ctx.clear_rect(0.0, 0.0, self.width, self.height);
		if let Some(image) = &self.image {
			let _ = self.ctx.draw_image_with_html_image_element(image, 0.0, 0.0);
		}
	}

	fn stroke_line(&mut self, from: Point, to: Point, stroke: Stroke) {
		self.ctx.set_stroke_style_str(&stroke.color.css());
		self.ctx.set_line_width(stroke.width);
		self.ctx.set_line_cap("round");
		self.ctx.begin_path();
		self.ctx.move_to(from.x, from.y);
		self.ctx.line_to(to.x, to.y);
		self.ctx.stroke();
	}

	fn stroke_circle(&mut self, center: Point, diameter: f64, stroke: Stroke) {
		self.ctx.set_stroke_style_str(&stroke.color.css());
		self.ctx.set_line_width(stroke.width);
		self.ctx.begin_path();
		let _ = self.ctx.arc(center.x, center.y, diameter / 2.0, 0.0, 2.0 * PI);
		self.ctx.stroke();
	}
}
