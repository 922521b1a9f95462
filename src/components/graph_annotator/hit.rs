//! Resolving which node a pointer is over, and which node to place next.

use super::types::{Graph, Point};

/// Target for a pointer position.
///
/// The nearest placed node within `hit_distance` wins, lowest index on ties.
/// Otherwise, or with no pointer, this is the first unplaced node.
/// `None` means every node is placed.
pub fn resolve_target(graph: &Graph, pointer: Option<Point>, hit_distance: f64) -> Option<usize> {
	pointer
		.and_then(|p| nearest_placed(graph, p, hit_distance))
		.or_else(|| next_unplaced(graph))
}

/// First node in declaration order without a position.
pub fn next_unplaced(graph: &Graph) -> Option<usize> {
	graph.nodes().iter().position(|n| !n.is_placed())
}

fn nearest_placed(graph: &Graph, pointer: Point, hit_distance: f64) -> Option<usize> {
	let mut best: Option<(usize, f64)> = None;
	for (idx, node) in graph.nodes().iter().enumerate() {
		let Some(pos) = node.position else {
			continue;
		};
		let dist = pos.distance_to(pointer);
		// Strict comparison keeps the earlier index on equal distances.
		if best.is_none_or(|(_, d)| dist < d) {
			best = Some((idx, dist));
		}
	}
	best.filter(|&(_, d)| d <= hit_distance).map(|(idx, _)| idx)
}
