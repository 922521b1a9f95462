//! Graph annotation over images: place a fixed node/edge topology by dragging
//! points on a canvas, plus the Leptos client-side app wiring around it.

use leptos::prelude::*;
use leptos_meta::*;
use leptos_router::components::*;
use leptos_router::path;
use log::{Level, info};

// Modules
mod components;
mod pages;

pub use crate::components::graph_annotator::{
	Annotator, AnnotatorConfig, AnnotatorError, AnnotatorHandle, CanvasSurface, Edge,
	EdgeAttributes, ElementKind, ErrorCallback, Gesture, GestureController, Graph,
	GraphAnnotatorCanvas, LoadCallback, LoadState, Node, NodeAttributes, NodeCallback, Point,
	PressOutcome, ReleaseOutcome, Rgb, SharedGraph, Stroke, Surface, mount, next_unplaced,
	resolve_target,
};
// Renamed to stay clear of `leptos_meta::Style` and the prelude's names.
pub use crate::components::graph_annotator::{
	Result as AnnotatorResult, Style as AnnotatorStyle, render as render_graph,
};

// Top-Level pages
use crate::pages::home::Home;
use crate::pages::not_found::NotFound;

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("Logging initialized");
}

/// An app router which renders the annotator page and handles 404's
#[component]
pub fn App() -> impl IntoView {
	// Provides context that manages stylesheets, titles, meta tags, etc.
	provide_meta_context();

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="light" />

		// sets the document title
		<Title text="Graph Annotator" />

		// injects metadata in the <head> of the page
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<Router>
			<Routes fallback=|| view! { <NotFound /> }>
				<Route path=path!("/") view=Home />
			</Routes>
		</Router>
	}
}
