//! The annotator: graph model, gesture controller and renderer behind one handle.
//!
//! Every operation takes `&self`. Internal state sits in `RefCell`s that are
//! never borrowed while a user callback runs, so callbacks receive the
//! annotator itself and may call back into any operation.

use std::cell::RefCell;

use log::{debug, info, warn};

use super::config::{AnnotatorConfig, ErrorCallback, LoadCallback, NodeCallback, Style};
use super::error::{AnnotatorError, Result};
use super::hit::{next_unplaced, resolve_target};
use super::render::{self, Surface};
use super::state::{GestureController, PressOutcome, ReleaseOutcome};
use super::types::{EdgeAttributes, NodeAttributes, Point, SharedGraph};

/// Progress of the backing image.
#[derive(Clone, Debug, PartialEq)]
pub enum LoadState {
	/// Waiting for the image.
	Pending,
	/// Surface attached; size matches the image's natural dimensions.
	/// Image loaded with the given natural size.
	Ready {
		/// Image width in pixels.
		width: f64,
		/// Image height in pixels.
		height: f64,
	},
	/// Load failed; holds the error message.
	Failed(String),
}

/// Interactive annotator over one graph and at most one drawing surface.
pub struct Annotator {
	graph: SharedGraph,
	style: Style,
	controller: RefCell<GestureController>,
	surface: RefCell<Option<Box<dyn Surface>>>,
	load_state: RefCell<LoadState>,
	on_change: Option<NodeCallback>,
	on_select: Option<NodeCallback>,
	on_load: Option<LoadCallback>,
	on_error: Option<ErrorCallback>,
}

impl Annotator {
	/// Build an annotator with no surface yet. Drawing starts at [`Annotator::attach_surface`].
	pub fn new(config: AnnotatorConfig) -> Self {
		let style = Style::from_config(&config);
		let graph = config.graph.unwrap_or_default();
		debug!(
			"annotator created: {} nodes, {} edges, {:?}",
			graph.node_count(),
			graph.edge_count(),
			style
		);
		Self {
			graph: SharedGraph::new(graph),
			style,
			controller: RefCell::default(),
			surface: RefCell::new(None),
			load_state: RefCell::new(LoadState::Pending),
			on_change: config.on_change,
			on_select: config.on_select,
			on_load: config.on_load,
			on_error: config.on_error,
		}
	}

	/// Live handle to the graph. Later gestures show through it.
	pub fn graph(&self) -> SharedGraph {
		self.graph.clone()
	}

	/// Widget-level defaults in effect.
	pub fn style(&self) -> &Style {
		&self.style
	}

	/// Where image loading stands.
	pub fn load_state(&self) -> LoadState {
		self.load_state.borrow().clone()
	}

	/// Pointer input is only wired when a change callback is configured.
	pub fn is_interactive(&self) -> bool {
		self.on_change.is_some()
	}

	/// True while a gesture is in progress.
	pub fn is_dragging(&self) -> bool {
		self.controller.borrow().is_dragging()
	}

	/// First node still waiting for a position; `None` once annotation is complete.
	pub fn next_node(&self) -> Option<usize> {
		next_unplaced(&self.graph.borrow())
	}

	/// Node a press at `pointer` would grab.
	pub fn resolve_target(&self, pointer: Option<Point>) -> Option<usize> {
		resolve_target(&self.graph.borrow(), pointer, self.style.hit_distance)
	}

	/// Merge `attributes` into one node, or all nodes when `index` is `None`, then redraw.
	pub fn set_node_attributes(&self, index: Option<usize>, attributes: &NodeAttributes) -> Result<()> {
		let result = self.graph.borrow_mut().set_node_attributes(index, attributes);
		self.after_attribute_update(result)
	}

	/// Merge `attributes` into one edge, or all edges when `index` is `None`, then redraw.
	pub fn set_edge_attributes(&self, index: Option<usize>, attributes: &EdgeAttributes) -> Result<()> {
		let result = self.graph.borrow_mut().set_edge_attributes(index, attributes);
		self.after_attribute_update(result)
	}

	fn after_attribute_update(&self, result: Result<()>) -> Result<()> {
		match result {
			Ok(()) => {
				self.render();
				Ok(())
			}
			Err(err) => {
				warn!("attribute update rejected: {err}");
				Err(err)
			}
		}
	}

	/// Redraw the full graph. No-op until a surface is attached.
	pub fn render(&self) {
		let graph = self.graph.borrow();
		if let Some(surface) = self.surface.borrow_mut().as_mut() {
			render::render(&graph, &self.style, surface.as_mut());
		}
	}

	/// Start drawing onto `surface`, then fire `on_load`.
	pub fn attach_surface(&self, surface: impl Surface + 'static) {
		let (width, height) = surface.size();
		*self.surface.borrow_mut() = Some(Box::new(surface));
		*self.load_state.borrow_mut() = LoadState::Ready { width, height };
		info!("annotator ready: {width}x{height}");
		self.render();
		if let Some(cb) = self.on_load.clone() {
			cb(self);
		}
	}

	/// Record a failed image load and fire `on_error`.
	pub fn fail_load(&self, err: AnnotatorError) {
		warn!("annotator load failed: {err}");
		*self.load_state.borrow_mut() = LoadState::Failed(err.to_string());
		if let Some(cb) = self.on_error.clone() {
			cb(self, &err);
		}
	}

	/// Press: bind and place the target node, redraw, fire `on_select`.
	/// Ignored while a gesture is already running.
	pub fn pointer_down(&self, at: Point) {
		let at = self.clamp(at);
		let outcome = {
			let mut graph = self.graph.borrow_mut();
			self.controller
				.borrow_mut()
				.press(&mut graph, at, self.style.hit_distance)
		};
		let Some(PressOutcome { target: Some(idx) }) = outcome else {
			return;
		};
		self.render();
		if let Some(cb) = self.on_select.clone() {
			cb(self, idx);
		}
	}

	/// Drag the bound node to `at` and redraw.
	pub fn pointer_move(&self, at: Point) {
		let at = self.clamp(at);
		let moved = {
			let mut graph = self.graph.borrow_mut();
			self.controller.borrow_mut().drag(&mut graph, at)
		};
		if moved.is_some() {
			self.render();
		}
	}

	/// Release: commit `at`, redraw, fire `on_change` once, unbind.
	pub fn pointer_up(&self, at: Point) {
		let at = self.clamp(at);
		let outcome = {
			let mut graph = self.graph.borrow_mut();
			self.controller.borrow_mut().release(&mut graph, at)
		};
		let Some(ReleaseOutcome { target: Some(idx) }) = outcome else {
			return;
		};
		self.render();
		if self.next_node().is_none() {
			info!("annotation complete");
		}
		if let Some(cb) = self.on_change.clone() {
			cb(self, idx);
		}
	}

	fn clamp(&self, at: Point) -> Point {
		match self.surface.borrow().as_ref() {
			Some(surface) => {
				let (w, h) = surface.size();
				at.clamp_to(w, h)
			}
			None => at,
		}
	}
}

#[cfg(test)]
mod tests {
	use std::cell::RefCell;
	use std::rc::Rc;

	use super::*;
	use crate::components::graph_annotator::render::testing::{DrawCall, RecordingSurface};
	use crate::components::graph_annotator::types::{Graph, Rgb};
	use pretty_assertions::assert_eq;

	#[derive(Clone, Debug, PartialEq)]
	enum Event {
		Select(usize),
		Change(usize),
	}

	type Log = Rc<RefCell<Vec<Event>>>;

	fn logging_config(graph: Graph, log: &Log) -> AnnotatorConfig {
		let (select_log, change_log) = (log.clone(), log.clone());
		AnnotatorConfig::new()
			.graph(graph)
			.on_select(move |_, idx| select_log.borrow_mut().push(Event::Select(idx)))
			.on_change(move |_, idx| change_log.borrow_mut().push(Event::Change(idx)))
	}

	fn ready(config: AnnotatorConfig) -> (Annotator, RecordingSurface) {
		let annotator = Annotator::new(config);
		let surface = RecordingSurface::new(200.0, 100.0);
		annotator.attach_surface(surface.clone());
		(annotator, surface)
	}

	fn positions(annotator: &Annotator) -> Vec<Option<Point>> {
		annotator
			.graph()
			.borrow()
			.nodes()
			.iter()
			.map(|n| n.position)
			.collect()
	}

	#[test]
	fn one_gesture_notifies_select_and_change_once() {
		let log = Log::default();
		let graph = Graph::from_names(&["a", "b", "c"], &[(0, 1), (1, 2)]).unwrap();
		let (annotator, _) = ready(logging_config(graph, &log));

		annotator.pointer_down(Point::new(5.0, 5.0));
		for i in 0..10 {
			annotator.pointer_move(Point::new(5.0 + i as f64, 5.0));
		}
		assert_eq!(*log.borrow(), vec![Event::Select(0)]);
		annotator.pointer_up(Point::new(20.0, 5.0));

		assert_eq!(*log.borrow(), vec![Event::Select(0), Event::Change(0)]);
		assert_eq!(annotator.next_node(), Some(1));
	}

	#[test]
	fn two_node_scenario_completes() {
		let log = Log::default();
		let (annotator, _) = ready(logging_config(Graph::default(), &log));

		annotator.pointer_down(Point::new(10.0, 10.0));
		annotator.pointer_up(Point::new(10.0, 10.0));
		annotator.pointer_down(Point::new(50.0, 50.0));
		annotator.pointer_up(Point::new(50.0, 50.0));

		assert_eq!(annotator.next_node(), None);
		assert_eq!(
			positions(&annotator),
			vec![Some(Point::new(10.0, 10.0)), Some(Point::new(50.0, 50.0))]
		);
		assert_eq!(
			*log.borrow(),
			vec![
				Event::Select(0),
				Event::Change(0),
				Event::Select(1),
				Event::Change(1),
			]
		);
	}

	#[test]
	fn reselecting_moves_only_that_node() {
		let log = Log::default();
		let (annotator, _) = ready(logging_config(Graph::default(), &log));
		annotator.pointer_down(Point::new(10.0, 10.0));
		annotator.pointer_up(Point::new(10.0, 10.0));
		annotator.pointer_down(Point::new(50.0, 50.0));
		annotator.pointer_up(Point::new(50.0, 50.0));
		let before = annotator.graph().borrow().clone();
		log.borrow_mut().clear();

		annotator.pointer_down(Point::new(48.0, 52.0));
		annotator.pointer_move(Point::new(70.0, 60.0));
		annotator.pointer_up(Point::new(80.0, 60.0));

		assert_eq!(*log.borrow(), vec![Event::Select(1), Event::Change(1)]);
		let graph = annotator.graph();
		let graph = graph.borrow();
		assert_eq!(graph.node_count(), before.node_count());
		assert_eq!(graph.edges(), before.edges());
		assert_eq!(graph.node(0), before.node(0));
		assert_eq!(graph.node(1).unwrap().position, Some(Point::new(80.0, 60.0)));
	}

	#[test]
	fn shared_graph_reflects_later_gestures() {
		let log = Log::default();
		let (annotator, _) = ready(logging_config(Graph::default(), &log));
		let early = annotator.graph();
		let copy = early.clone();
		assert_eq!(early.borrow().placed_count(), 0);

		annotator.pointer_down(Point::new(1.0, 2.0));
		annotator.pointer_up(Point::new(3.0, 4.0));

		assert!(copy.ptr_eq(&annotator.graph()));
		assert_eq!(copy.borrow().node(0).unwrap().position, Some(Point::new(3.0, 4.0)));
		assert_eq!(early.borrow().placed_count(), 1);
		assert_eq!((copy.borrow().node_count(), copy.borrow().edge_count()), (2, 1));
	}

	#[test]
	fn attribute_changes_seen_through_handle_were_redrawn() {
		let (annotator, surface) = ready(AnnotatorConfig::new());
		let graph = annotator.graph();
		annotator
			.set_node_attributes(None, &NodeAttributes::default().with_diameter(6.0))
			.unwrap();
		assert_eq!(graph.borrow().node(1).unwrap().attributes.diameter, Some(6.0));
		assert_eq!(surface.clear_count(), 2);
	}

	#[test]
	fn callbacks_can_call_back_into_the_annotator() {
		let seen = Rc::new(RefCell::new(Vec::new()));
		let seen_cb = seen.clone();
		let config = AnnotatorConfig::new()
			.on_select(|annotator, idx| {
				annotator
					.set_node_attributes(Some(idx), &NodeAttributes::default().with_color([9, 9, 9]))
					.unwrap();
			})
			.on_change(move |annotator, idx| {
				let graph = annotator.graph();
				let position = graph.borrow().node(idx).unwrap().position;
				seen_cb.borrow_mut().push((idx, position, annotator.next_node()));
			});
		let (annotator, _) = ready(config);

		annotator.pointer_down(Point::new(7.0, 8.0));
		annotator.pointer_up(Point::new(9.0, 9.0));

		assert_eq!(*seen.borrow(), vec![(0, Some(Point::new(9.0, 9.0)), Some(1))]);
		assert_eq!(
			annotator.graph().borrow().node(0).unwrap().attributes.color,
			Some(Rgb::new(9, 9, 9))
		);
	}

	#[test]
	fn pointer_is_clamped_to_surface() {
		let (annotator, _) = ready(AnnotatorConfig::new().on_change(|_, _| {}));
		annotator.pointer_down(Point::new(-30.0, 40.0));
		annotator.pointer_move(Point::new(500.0, 500.0));
		assert_eq!(positions(&annotator)[0], Some(Point::new(200.0, 100.0)));
		annotator.pointer_up(Point::new(150.0, -1.0));
		assert_eq!(positions(&annotator)[0], Some(Point::new(150.0, 0.0)));
	}

	#[test]
	fn every_mutation_redraws() {
		let (annotator, surface) = ready(AnnotatorConfig::new());
		assert_eq!(surface.clear_count(), 1);
		annotator.pointer_down(Point::new(1.0, 1.0));
		annotator.pointer_move(Point::new(2.0, 2.0));
		annotator.pointer_move(Point::new(3.0, 3.0));
		annotator.pointer_up(Point::new(3.0, 3.0));
		assert_eq!(surface.clear_count(), 5);
		annotator
			.set_edge_attributes(None, &EdgeAttributes::default().with_line_width(2.0))
			.unwrap();
		assert_eq!(surface.clear_count(), 6);
	}

	#[test]
	fn rejected_attribute_update_does_not_redraw() {
		let (annotator, surface) = ready(AnnotatorConfig::new());
		let err = annotator
			.set_edge_attributes(Some(1), &EdgeAttributes::default().with_line_width(2.0))
			.unwrap_err();
		assert!(matches!(err, AnnotatorError::IndexOutOfRange { index: 1, len: 1, .. }));
		assert_eq!(surface.clear_count(), 1);
	}

	#[test]
	fn state_set_before_load_is_drawn_on_attach() {
		let annotator = Annotator::new(AnnotatorConfig::new().node_color([5, 5, 5]));
		annotator
			.set_node_attributes(Some(0), &NodeAttributes::default().with_diameter(9.0))
			.unwrap();
		annotator.pointer_down(Point::new(4.0, 4.0));
		annotator.pointer_up(Point::new(4.0, 4.0));
		assert_eq!(annotator.load_state(), LoadState::Pending);

		let surface = RecordingSurface::new(50.0, 50.0);
		annotator.attach_surface(surface.clone());
		assert_eq!(
			annotator.load_state(),
			LoadState::Ready {
				width: 50.0,
				height: 50.0,
			}
		);
		assert_eq!(surface.frame().len(), 1);
		assert!(matches!(surface.frame()[0], DrawCall::Circle(_, d, _) if d == 9.0));
	}

	#[test]
	fn load_callbacks_fire() {
		let loaded = Rc::new(RefCell::new(0));
		let failed = Rc::new(RefCell::new(Vec::new()));
		let (loaded_cb, failed_cb) = (loaded.clone(), failed.clone());
		let config = AnnotatorConfig::new()
			.on_load(move |_| *loaded_cb.borrow_mut() += 1)
			.on_error(move |_, err| failed_cb.borrow_mut().push(err.clone()));

		let annotator = Annotator::new(config.clone());
		annotator.attach_surface(RecordingSurface::new(1.0, 1.0));
		assert_eq!(*loaded.borrow(), 1);

		let broken = Annotator::new(config);
		let err = AnnotatorError::ImageLoad {
			src: "missing.png".into(),
		};
		broken.fail_load(err.clone());
		assert_eq!(*failed.borrow(), vec![err.clone()]);
		assert_eq!(broken.load_state(), LoadState::Failed(err.to_string()));
		assert_eq!(*loaded.borrow(), 1);
	}

	#[test]
	fn silent_annotator_is_not_interactive() {
		let (annotator, _) = ready(AnnotatorConfig::new());
		assert!(!annotator.is_interactive());
		let (annotator, _) = ready(AnnotatorConfig::new().on_change(|_, _| {}));
		assert!(annotator.is_interactive());
	}

	#[test]
	fn press_with_no_nodes_is_harmless() {
		let log = Log::default();
		let graph = Graph::new(Vec::new(), Vec::new()).unwrap();
		let (annotator, surface) = ready(logging_config(graph, &log));
		annotator.pointer_down(Point::new(1.0, 1.0));
		assert!(annotator.is_dragging());
		annotator.pointer_move(Point::new(2.0, 2.0));
		annotator.pointer_up(Point::new(3.0, 3.0));
		assert!(!annotator.is_dragging());
		assert!(log.borrow().is_empty());
		assert_eq!(surface.clear_count(), 1);
	}
}
