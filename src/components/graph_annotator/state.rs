//! Press-move-release gesture state machine.

use log::debug;

use super::hit::resolve_target;
use super::types::{Graph, Point};

/// Where the controller is within a press-move-release sequence.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Gesture {
	/// No pointer held.
	#[default]
	Idle,
	/// Pointer is down. `target` is the node bound at press time, if any.
	Dragging {
		/// Bound node.
		target: Option<usize>,
	},
}

/// Result of a press the controller accepted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PressOutcome {
	/// Node placed under the pointer. Redraw and notify selection when set.
	pub target: Option<usize>,
}

/// Result of a release that ended a gesture.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReleaseOutcome {
	/// Node whose final position was committed. Redraw and notify change when set.
	pub target: Option<usize>,
}

/// Two-state machine turning pointer events into node placements.
#[derive(Clone, Debug, Default)]
pub struct GestureController {
	gesture: Gesture,
}

impl GestureController {
	/// Idle controller.
	pub fn new() -> Self {
		Self::default()
	}

	/// Current state.
	pub fn gesture(&self) -> Gesture {
		self.gesture
	}

	/// True between an accepted press and its release.
	pub fn is_dragging(&self) -> bool {
		matches!(self.gesture, Gesture::Dragging { .. })
	}

	/// Node bound to the running gesture.
	pub fn target(&self) -> Option<usize> {
		match self.gesture {
			Gesture::Dragging { target } => target,
			Gesture::Idle => None,
		}
	}

	/// Begin a gesture. Ignored (returns `None`) while one is already running.
	pub fn press(&mut self, graph: &mut Graph, at: Point, hit_distance: f64) -> Option<PressOutcome> {
		if self.is_dragging() {
			debug!("press ignored: gesture already in progress");
			return None;
		}
		let target = resolve_target(graph, Some(at), hit_distance)
			.filter(|&idx| graph.place_node(idx, at));
		debug!("press at ({}, {}) -> {:?}", at.x, at.y, target);
		self.gesture = Gesture::Dragging { target };
		Some(PressOutcome { target })
	}

	/// Move the bound node. Returns the node moved, if any.
	pub fn drag(&mut self, graph: &mut Graph, to: Point) -> Option<usize> {
		self.target().filter(|&idx| graph.place_node(idx, to))
	}

	/// End the gesture, committing `at` as the final position.
	pub fn release(&mut self, graph: &mut Graph, at: Point) -> Option<ReleaseOutcome> {
		let Gesture::Dragging { target } = self.gesture else {
			return None;
		};
		let target = target.filter(|&idx| graph.place_node(idx, at));
		self.gesture = Gesture::Idle;
		debug!("release at ({}, {}) -> {:?}", at.x, at.y, target);
		Some(ReleaseOutcome { target })
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;

	const HIT: f64 = 10.0;

	fn chain3() -> Graph {
		Graph::from_names(&["a", "b", "c"], &[(0, 1), (1, 2)]).unwrap()
	}

	#[test]
	fn press_places_first_unplaced_node() {
		let mut graph = chain3();
		let mut ctl = GestureController::new();
		let out = ctl.press(&mut graph, Point::new(5.0, 6.0), HIT).unwrap();
		assert_eq!(out.target, Some(0));
		assert_eq!(ctl.gesture(), Gesture::Dragging { target: Some(0) });
		assert_eq!(graph.node(0).unwrap().position, Some(Point::new(5.0, 6.0)));
	}

	#[test]
	fn every_move_is_applied_and_release_commits() {
		let mut graph = chain3();
		let mut ctl = GestureController::new();
		ctl.press(&mut graph, Point::new(0.0, 0.0), HIT);
		for i in 1..=5 {
			let p = Point::new(i as f64, 2.0 * i as f64);
			assert_eq!(ctl.drag(&mut graph, p), Some(0));
			assert_eq!(graph.node(0).unwrap().position, Some(p));
		}
		let out = ctl.release(&mut graph, Point::new(7.0, 7.0)).unwrap();
		assert_eq!(out.target, Some(0));
		assert_eq!(graph.node(0).unwrap().position, Some(Point::new(7.0, 7.0)));
		assert_eq!(ctl.gesture(), Gesture::Idle);
	}

	#[test]
	fn press_while_dragging_is_ignored() {
		let mut graph = chain3();
		let mut ctl = GestureController::new();
		ctl.press(&mut graph, Point::new(0.0, 0.0), HIT);
		assert_eq!(ctl.press(&mut graph, Point::new(90.0, 90.0), HIT), None);
		assert_eq!(ctl.target(), Some(0));
		assert!(!graph.node(1).unwrap().is_placed());
	}

	#[test]
	fn move_and_release_while_idle_do_nothing() {
		let mut graph = chain3();
		let mut ctl = GestureController::new();
		assert_eq!(ctl.drag(&mut graph, Point::new(1.0, 1.0)), None);
		assert_eq!(ctl.release(&mut graph, Point::new(1.0, 1.0)), None);
		assert_eq!(graph.placed_count(), 0);
	}

	#[test]
	fn press_near_placed_node_rebinds_it() {
		let mut graph = chain3();
		let mut ctl = GestureController::new();
		ctl.press(&mut graph, Point::new(10.0, 10.0), HIT);
		ctl.release(&mut graph, Point::new(10.0, 10.0));

		let out = ctl.press(&mut graph, Point::new(13.0, 12.0), HIT).unwrap();
		assert_eq!(out.target, Some(0));
		ctl.release(&mut graph, Point::new(30.0, 30.0));
		assert_eq!(graph.node(0).unwrap().position, Some(Point::new(30.0, 30.0)));
		assert_eq!(graph.placed_count(), 1);
	}

	#[test]
	fn press_without_target_still_completes_gesture() {
		let mut graph = Graph::new(Vec::new(), Vec::new()).unwrap();
		let mut ctl = GestureController::new();
		let out = ctl.press(&mut graph, Point::new(1.0, 1.0), HIT).unwrap();
		assert_eq!(out.target, None);
		assert!(ctl.is_dragging());
		assert_eq!(ctl.drag(&mut graph, Point::new(2.0, 2.0)), None);
		assert_eq!(
			ctl.release(&mut graph, Point::new(3.0, 3.0)),
			Some(ReleaseOutcome { target: None })
		);
		assert!(!ctl.is_dragging());
	}
}
