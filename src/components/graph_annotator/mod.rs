//! Annotate an image by placing the nodes of a fixed graph with the pointer.

mod annotator;
mod component;
mod config;
mod error;
mod hit;
mod render;
mod state;
mod types;

pub use annotator::{Annotator, LoadState};
pub use component::{AnnotatorHandle, GraphAnnotatorCanvas, mount};
pub use config::{AnnotatorConfig, ErrorCallback, LoadCallback, NodeCallback, Style};
pub use error::{AnnotatorError, ElementKind, Result};
pub use hit::{next_unplaced, resolve_target};
pub use render::{CanvasSurface, Stroke, Surface, render};
pub use state::{Gesture, GestureController, PressOutcome, ReleaseOutcome};
pub use types::{Edge, EdgeAttributes, Graph, Node, NodeAttributes, Point, Rgb, SharedGraph};
