//! Browser wiring: canvas creation, image loading and pointer listeners.

use std::cell::RefCell;
use std::ops::Deref;
use std::rc::{Rc, Weak};

use leptos::prelude::*;
use log::{error, info};
use wasm_bindgen::prelude::*;
use web_sys::{
	CanvasRenderingContext2d, Element, Event, EventTarget, HtmlCanvasElement, HtmlElement,
	HtmlImageElement, MouseEvent,
};

use super::annotator::Annotator;
use super::config::AnnotatorConfig;
use super::error::{AnnotatorError, Result};
use super::render::CanvasSurface;
use super::types::Point;

type Listeners = Rc<RefCell<Vec<Listener>>>;

/// A DOM event listener, removed again on drop.
struct Listener {
	target: EventTarget,
	kind: &'static str,
	callback: Closure<dyn FnMut(Event)>,
}

impl Listener {
	fn new(target: &EventTarget, kind: &'static str, f: impl FnMut(Event) + 'static) -> Result<Self> {
		let callback = Closure::<dyn FnMut(Event)>::new(f);
		target
			.add_event_listener_with_callback(kind, callback.as_ref().unchecked_ref())
			.map_err(dom_err)?;
		Ok(Self {
			target: target.clone(),
			kind,
			callback,
		})
	}
}

impl Drop for Listener {
	fn drop(&mut self) {
		let _ = self
			.target
			.remove_event_listener_with_callback(self.kind, self.callback.as_ref().unchecked_ref());
	}
}

/// A mounted annotator. Dereferences to [`Annotator`]; dropping it detaches all listeners.
pub struct AnnotatorHandle {
	annotator: Rc<Annotator>,
	canvas: HtmlCanvasElement,
	listeners: Listeners,
}

impl AnnotatorHandle {
	/// Shared reference to the annotator, e.g. for use in other closures.
	pub fn annotator(&self) -> Rc<Annotator> {
		Rc::clone(&self.annotator)
	}

	/// Canvas the annotator draws on.
	pub fn canvas(&self) -> &HtmlCanvasElement {
		&self.canvas
	}
}

impl Deref for AnnotatorHandle {
	type Target = Annotator;

	fn deref(&self) -> &Annotator {
		&self.annotator
	}
}

impl Drop for AnnotatorHandle {
	fn drop(&mut self) {
		self.listeners.borrow_mut().clear();
	}
}

fn dom_err(err: JsValue) -> AnnotatorError {
	AnnotatorError::Dom(format!("{err:?}"))
}

/// Create a canvas in `config.container` (or a new `div` on `<body>`) and start loading `image_src`.
///
/// The canvas is sized to the image and pointer input is wired once the image
/// has loaded; until then the returned handle only accepts attribute updates.
pub fn mount(image_src: &str, mut config: AnnotatorConfig) -> Result<AnnotatorHandle> {
	let window = web_sys::window().ok_or_else(|| AnnotatorError::Dom("no window".into()))?;
	let document = window
		.document()
		.ok_or_else(|| AnnotatorError::Dom("no document".into()))?;

	let container: Element = match config.container.take() {
		Some(container) => container,
		None => {
			let div = document.create_element("div").map_err(dom_err)?;
			let body = document
				.body()
				.ok_or_else(|| AnnotatorError::Dom("no body".into()))?;
			body.append_child(&div).map_err(dom_err)?;
			div
		}
	};
	let canvas: HtmlCanvasElement = document
		.create_element("canvas")
		.map_err(dom_err)?
		.dyn_into()
		.map_err(|_| AnnotatorError::Dom("created element is not a canvas".into()))?;
	canvas.set_class_name("graph-annotator-canvas");
	let _ = HtmlElement::style(&canvas).set_property("display", "block");
	container.append_child(&canvas).map_err(dom_err)?;

	let annotator = Rc::new(Annotator::new(config));
	let image = HtmlImageElement::new().map_err(dom_err)?;
	let listeners: Listeners = Rc::default();

	let on_load = {
		let (annotator, canvas, image) = (annotator.clone(), canvas.clone(), image.clone());
		let listeners = Rc::downgrade(&listeners);
		move |_: Event| {
			if let Err(err) = on_image_load(&annotator, &canvas, &image, &listeners) {
				error!("annotator setup failed: {err}");
				annotator.fail_load(err);
			}
		}
	};
	let on_error = {
		let (annotator, src) = (annotator.clone(), image_src.to_string());
		move |_: Event| annotator.fail_load(AnnotatorError::ImageLoad { src: src.clone() })
	};
	{
		let mut wired = listeners.borrow_mut();
		wired.push(Listener::new(&image, "load", on_load)?);
		wired.push(Listener::new(&image, "error", on_error)?);
	}
	image.set_src(image_src);
	info!("loading annotation image {image_src}");

	Ok(AnnotatorHandle {
		annotator,
		canvas,
		listeners,
	})
}

fn on_image_load(
	annotator: &Rc<Annotator>,
	canvas: &HtmlCanvasElement,
	image: &HtmlImageElement,
	listeners: &Weak<RefCell<Vec<Listener>>>,
) -> Result<()> {
	// Handle already dropped.
	let Some(listeners) = listeners.upgrade() else {
		return Ok(());
	};
	let (w, h) = (image.natural_width(), image.natural_height());
	canvas.set_width(w);
	canvas.set_height(h);
	let ctx: CanvasRenderingContext2d = canvas
		.get_context("2d")
		.map_err(dom_err)?
		.ok_or_else(|| AnnotatorError::Dom("2d context unavailable".into()))?
		.dyn_into()
		.map_err(|_| AnnotatorError::Dom("unexpected context type".into()))?;

	if annotator.is_interactive() {
		let wired = wire_pointer(annotator, canvas)?;
		listeners.borrow_mut().extend(wired);
		let _ = HtmlElement::style(canvas).set_property("cursor", "crosshair");
	} else {
		info!("no change callback configured; pointer input disabled");
	}
	annotator.attach_surface(
		CanvasSurface::new(ctx, w as f64, h as f64).with_background(image.clone()),
	);
	Ok(())
}

/// Press on the canvas; move and release on the window so drags survive leaving the canvas.
fn wire_pointer(annotator: &Rc<Annotator>, canvas: &HtmlCanvasElement) -> Result<Vec<Listener>> {
	let window: EventTarget = web_sys::window()
		.ok_or_else(|| AnnotatorError::Dom("no window".into()))?
		.into();

	let on_down = {
		let (annotator, canvas) = (annotator.clone(), canvas.clone());
		move |ev: Event| {
			let Some(ev) = ev.dyn_ref::<MouseEvent>() else {
				return;
			};
			if ev.button() != 0 {
				return;
			}
			ev.prevent_default();
			annotator.pointer_down(surface_point(&canvas, ev));
		}
	};
	let on_move = {
		let (annotator, canvas) = (annotator.clone(), canvas.clone());
		move |ev: Event| {
			let Some(ev) = ev.dyn_ref::<MouseEvent>() else {
				return;
			};
			if annotator.is_dragging() {
				annotator.pointer_move(surface_point(&canvas, ev));
			}
		}
	};
	let on_up = {
		let (annotator, canvas) = (annotator.clone(), canvas.clone());
		move |ev: Event| {
			let Some(ev) = ev.dyn_ref::<MouseEvent>() else {
				return;
			};
			if annotator.is_dragging() {
				annotator.pointer_up(surface_point(&canvas, ev));
			}
		}
	};

	Ok(vec![
		Listener::new(canvas, "mousedown", on_down)?,
		Listener::new(&window, "mousemove", on_move)?,
		Listener::new(&window, "mouseup", on_up)?,
	])
}

fn surface_point(canvas: &HtmlCanvasElement, ev: &MouseEvent) -> Point {
	let rect = canvas.get_bounding_client_rect();
	to_surface(
		Point::new(ev.client_x() as f64, ev.client_y() as f64),
		Point::new(rect.left(), rect.top()),
		(rect.width(), rect.height()),
		(canvas.width(), canvas.height()),
	)
}

/// Client coordinates to canvas pixels, undoing any CSS scaling of the canvas.
/// A collapsed rect maps 1:1.
fn to_surface(client: Point, rect_origin: Point, rect_size: (f64, f64), canvas: (u32, u32)) -> Point {
	let scale = |pixels: u32, css: f64| if css > 0.0 { pixels as f64 / css } else { 1.0 };
	Point::new(
		(client.x - rect_origin.x) * scale(canvas.0, rect_size.0),
		(client.y - rect_origin.y) * scale(canvas.1, rect_size.1),
	)
}

/// Annotate the image at `src` inside a Leptos-managed container.
#[component]
pub fn GraphAnnotatorCanvas(#[prop(into)] src: String, config: AnnotatorConfig) -> impl IntoView {
	let container_ref = NodeRef::<leptos::html::Div>::new();
	let handle: Rc<RefCell<Option<AnnotatorHandle>>> = Rc::new(RefCell::new(None));
	let mut pending = Some(config);

	Effect::new(move |_| {
		let Some(container) = container_ref.get() else {
			return;
		};
		let Some(config) = pending.take() else {
			return;
		};
		let container: Element = container.into();
		match mount(&src, config.container(container)) {
			Ok(mounted) => *handle.borrow_mut() = Some(mounted),
			Err(err) => error!("failed to mount annotator: {err}"),
		}
	});

	view! { <div node_ref=container_ref class="graph-annotator"></div> }
}
