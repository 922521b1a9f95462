use leptos::prelude::*;
use log::{debug, error, info};

use crate::components::graph_annotator::{
	AnnotatorConfig, Edge, EdgeAttributes, Graph, GraphAnnotatorCanvas, Node, NodeAttributes,
};

const SAMPLE_IMAGE: &str = "/assets/sample.jpg";

const JOINTS: &[&str] = &[
	"head",
	"neck",
	"left shoulder",
	"left elbow",
	"left wrist",
	"right shoulder",
	"right elbow",
	"right wrist",
	"pelvis",
];

const BONES: &[(usize, usize)] = &[
	(0, 1),
	(1, 2),
	(2, 3),
	(3, 4),
	(1, 5),
	(5, 6),
	(6, 7),
	(1, 8),
];

/// Upper-body skeleton; the head is drawn larger and the spine highlighted.
fn skeleton() -> Graph {
	let head = NodeAttributes::default().with_diameter(9.0);
	let spine = EdgeAttributes::default().with_color([255, 200, 0]);
	let nodes = JOINTS
		.iter()
		.enumerate()
		.map(|(i, name)| match i {
			0 => Node::named(*name).with_attributes(head),
			_ => Node::named(*name),
		})
		.collect();
	let edges = BONES
		.iter()
		.map(|&(a, b)| match (a, b) {
			(1, 8) => Edge::new(a, b).with_attributes(spine),
			_ => Edge::new(a, b),
		})
		.collect();
	Graph::new(nodes, edges).unwrap_or_else(|err| {
		error!("invalid skeleton topology: {err}");
		Graph::default()
	})
}

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	let (next, set_next) = signal(Some(0usize));
	let (status, set_status) = signal(String::from("Loading image..."));
	let graph = skeleton();
	let names: Vec<String> = graph
		.nodes()
		.iter()
		.enumerate()
		.map(|(i, n)| n.name.clone().unwrap_or_else(|| format!("node {i}")))
		.collect();

	let config = AnnotatorConfig::new()
		.graph(graph)
		.hit_distance(12.0)
		.on_load(move |annotator| {
			set_status.set(String::new());
			set_next.set(annotator.next_node());
		})
		.on_select(|_, idx| debug!("selected node {idx}"))
		.on_change(move |annotator, idx| {
			let graph = annotator.graph();
			if let Some(pos) = graph.borrow().node(idx).and_then(|n| n.position) {
				info!("node {idx} placed at ({}, {})", pos.x, pos.y);
			}
			set_next.set(annotator.next_node());
		})
		.on_error(move |_, err| set_status.set(err.to_string()));

	let prompt = move || match next.get() {
		Some(idx) => format!(
			"Click to place: {}",
			names.get(idx).map(String::as_str).unwrap_or("?")
		),
		None => "All joints placed. Drag any joint to adjust it.".to_string(),
	};

	view! {
		<div class="annotator-page">
			<div class="annotator-overlay">
				<h1>"Graph Annotator"</h1>
				<p class="subtitle">{prompt}</p>
				<p class="status">{move || status.get()}</p>
			</div>
			<GraphAnnotatorCanvas src=SAMPLE_IMAGE config=config />
		</div>
	}
}
