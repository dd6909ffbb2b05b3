//! DOM-backed surfaces for the three gaze renderers.

use crate::constants::{
    CSS_X_STEPS, CSS_Y_STEPS, DISPLACEMENT_EVENT, HAVE_CURRENT_DATA, TEXTURES_EVENT,
};
use crate::deferred::Deferred;
use crate::dom;
use gaze_core::{DisplacementTarget, Grid, ImageSurface, MeshSurface, Rect, VideoSurface};
use glam::Vec2;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsValue;
use web_sys as web;

/// Decoded image; used both as an `<img>` source and as a mesh texture.
pub type Texture = web::HtmlImageElement;

// ---------------- Image grid ----------------

/// `<img>` elements of the preview grid, shared with the photo loader so it
/// can repopulate them when the grid changes.
#[derive(Clone)]
pub struct DomImageGrid {
    container: web::HtmlElement,
    images: Rc<RefCell<Vec<web::HtmlImageElement>>>,
}

impl DomImageGrid {
    pub fn new(container: web::HtmlElement) -> Self {
        Self {
            container,
            images: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub fn element(&self) -> &web::HtmlElement {
        &self.container
    }

    /// Replace the preview with one `<img>` per sample, each showing its own pose.
    pub fn populate(
        &self,
        document: &web::Document,
        grid: &Grid,
        image_url: impl Fn(&str) -> String,
    ) -> anyhow::Result<()> {
        let style = self.container.style();
        _ = style.set_property(CSS_X_STEPS, &grid.width().to_string());
        _ = style.set_property(CSS_Y_STEPS, &grid.height().to_string());
        self.container.set_inner_html("");

        let mut images = Vec::with_capacity(grid.len());
        for sample in grid {
            let img: web::HtmlImageElement = dom::create(document, "img")?;
            img.set_src(&image_url(&sample.filename));
            img.set_alt(&format!("Position {}, {}", sample.x, sample.y));
            self.container
                .append_child(&img)
                .map_err(|e| anyhow::anyhow!("append preview image: {:?}", e))?;
            images.push(img);
        }
        *self.images.borrow_mut() = images;
        Ok(())
    }
}

impl ImageSurface for DomImageGrid {
    fn element_count(&self) -> usize {
        self.images.borrow().len()
    }

    fn element_center(&self, i: usize) -> Option<Vec2> {
        self.images.borrow().get(i).and_then(|img| dom::client_center(img))
    }

    fn set_source(&mut self, i: usize, url: &str) {
        if let Some(img) = self.images.borrow().get(i) {
            img.set_src(url);
        }
    }
}

// ---------------- Video ----------------

#[derive(Clone)]
pub struct DomVideo {
    container: web::HtmlElement,
    video: web::HtmlVideoElement,
}

impl DomVideo {
    pub fn new(container: web::HtmlElement, video: web::HtmlVideoElement) -> Self {
        Self { container, video }
    }

    pub fn set_source(&self, url: &str) {
        self.video.set_src(url);
        self.video.load();
    }

    pub fn element(&self) -> &web::HtmlElement {
        &self.container
    }
}

impl VideoSurface for DomVideo {
    fn container(&self) -> Rect {
        dom::client_rect(&self.container)
    }

    fn has_current_data(&self) -> bool {
        self.video.ready_state() >= HAVE_CURRENT_DATA
    }

    fn seek(&mut self, seconds: f64) {
        self.video.set_current_time(seconds);
    }
}

// ---------------- Displacement mesh ----------------

/// A `CustomEvent` waiting to be dispatched on the 3D container.
pub struct MeshEvent {
    name: &'static str,
    detail: JsValue,
}

/// Events raised by [`DomMesh`] while the session is borrowed.
///
/// Page listeners may call back into the viewer, so events are only
/// dispatched from [`MeshEvents::flush`] after every borrow is released.
#[derive(Clone)]
pub struct MeshEvents {
    target: web::HtmlElement,
    queue: Deferred<MeshEvent>,
}

impl MeshEvents {
    pub fn flush(&self) {
        self.queue.flush(|ev| {
            let init = web::CustomEventInit::new();
            init.set_detail(&ev.detail);
            match web::CustomEvent::new_with_event_init_dict(ev.name, &init) {
                Ok(custom) => {
                    _ = self.target.dispatch_event(&custom);
                }
                Err(e) => log::error!("[mesh] {} event error: {:?}", ev.name, e),
            }
        });
    }
}

/// The 3D container. Scene setup is owned by page script, which listens for
/// texture and displacement events raised here.
pub struct DomMesh {
    container: web::HtmlElement,
    events: MeshEvents,
}

impl DomMesh {
    pub fn new(container: web::HtmlElement) -> Self {
        Self {
            events: MeshEvents {
                target: container.clone(),
                queue: Deferred::default(),
            },
            container,
        }
    }

    pub fn events(&self) -> MeshEvents {
        self.events.clone()
    }

    fn raise(&self, name: &'static str, detail: JsValue) {
        self.events.queue.push(MeshEvent { name, detail });
    }
}

impl DisplacementTarget for DomMesh {
    fn set_displacement_scale(&mut self, scale: f32) {
        self.raise(DISPLACEMENT_EVENT, JsValue::from_f64(scale as f64));
    }
}

impl MeshSurface<Texture> for DomMesh {
    fn container(&self) -> Rect {
        dom::client_rect(&self.container)
    }

    fn set_textures(&mut self, color: &Texture, depth: Option<&Texture>) {
        let detail = js_sys::Object::new();
        _ = js_sys::Reflect::set(&detail, &"color".into(), color);
        let depth = depth.map_or(JsValue::NULL, |d| d.clone().into());
        _ = js_sys::Reflect::set(&detail, &"depth".into(), &depth);
        self.raise(TEXTURES_EVENT, detail.into());
    }
}
