use crate::constants::{
    DEPTH_CONTROL_CLASS, DEPTH_CONTROL_ID, DEPTH_CONTROL_STEP, PREVIEW_ID, VIDEO_CONTAINER_CLASS,
    VIDEO_CONTAINER_ID, VIEWER_3D_ID,
};
use crate::dom;
use crate::overlay;
use crate::preload;
use crate::surfaces::{DomImageGrid, DomMesh, DomVideo, MeshEvents, Texture};
use gaze_core::{
    GazeConfig, GazeSession, GridSpec, ImageGridRenderer, MeshRenderer, MeshSurface, Rect,
    Renderer, VideoRenderer, VideoSurface, DEFAULT_DISPLACEMENT_SCALE, MAX_DISPLACEMENT_SCALE,
};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

pub type Session = GazeSession<Texture>;
pub type RendererList = Vec<Box<dyn Renderer<Texture>>>;

/// Shared handles of the running viewer. Cloning is cheap (all `Rc`).
#[derive(Clone)]
pub struct App {
    pub document: web::Document,
    pub session: Rc<RefCell<Session>>,
    pub renderers: Rc<RefCell<RendererList>>,
    preview: Option<DomImageGrid>,
    video: Option<DomVideo>,
    mesh: Option<Rc<RefCell<MeshRenderer<DomMesh>>>>,
    mesh_events: Option<MeshEvents>,
}

impl App {
    /// Build renderers for whichever containers the page provides.
    pub fn build(document: web::Document, config: GazeConfig) -> anyhow::Result<Self> {
        let session = GazeSession::new(config)?;
        let mut renderers: RendererList = Vec::new();

        let preview = dom::html_element_by_id(&document, PREVIEW_ID).map(DomImageGrid::new);
        let video = match &preview {
            Some(p) => Some(build_video(&document, p)?),
            None => None,
        };
        if let Some(p) = &preview {
            renderers.push(Box::new(ImageGridRenderer::new(p.clone())));
        }
        if let Some(v) = &video {
            renderers.push(Box::new(VideoRenderer::new(v.clone())));
        }

        let mesh = match dom::html_element_by_id(&document, VIEWER_3D_ID) {
            Some(container) => {
                build_depth_control(&document, &container)?;
                let mesh = Rc::new(RefCell::new(MeshRenderer::new(DomMesh::new(container))));
                mesh.borrow_mut()
                    .set_displacement_scale(DEFAULT_DISPLACEMENT_SCALE);
                renderers.push(Box::new(mesh.clone()));
                Some(mesh)
            }
            None => None,
        };

        let mesh_events = mesh.as_ref().map(|m| m.borrow().surface().events());

        if renderers.is_empty() {
            log::warn!("[app] page has no #{} or #{}", PREVIEW_ID, VIEWER_3D_ID);
        }
        log::info!("[app] {} renderer(s) wired", renderers.len());

        Ok(Self {
            document,
            session: Rc::new(RefCell::new(session)),
            renderers: Rc::new(RefCell::new(renderers)),
            preview,
            video,
            mesh,
            mesh_events,
        })
    }

    /// Point every surface at the active grid's assets and start preloading.
    pub fn activate(&self) -> anyhow::Result<()> {
        {
            let session = self.session.borrow();
            let grid = session.grid();
            let layout = session.layout();
            if let Some(p) = &self.preview {
                p.populate(&self.document, grid, |f| layout.image(f))?;
            }
            if let Some(v) = &self.video {
                v.set_source(&layout.video());
            }
            overlay::show_grid(&self.document, grid.prefix(), grid.width(), grid.height());
        }
        spawn_local(preload::preload(self.clone()));
        self.flush_events();
        Ok(())
    }

    /// Switch the active photo. On invalid input the current grid stays up.
    pub fn load_photo(&self, prefix: &str, x_steps: u32, y_steps: u32) -> anyhow::Result<()> {
        let spec = GridSpec::new(x_steps, y_steps, prefix)?;
        let before = self.session.borrow().generation();
        let after = self.session.borrow_mut().load_grid(spec)?;
        if after != before {
            self.activate()?;
        }
        Ok(())
    }

    /// Container the session tracks the pointer against.
    pub fn reference_rect(&self) -> Option<Rect> {
        if let Some(v) = &self.video {
            return Some(v.container());
        }
        self.mesh.as_ref().map(|m| m.borrow().surface().container())
    }

    pub fn set_displacement_scale(&self, scale: f32) -> Option<f32> {
        let applied = self
            .mesh
            .as_ref()
            .map(|m| m.borrow_mut().set_displacement_scale(scale));
        self.flush_events();
        applied
    }

    /// Show the resting cell on every renderer.
    pub fn present(&self) {
        {
            let session = self.session.borrow();
            let mut renderers = self.renderers.borrow_mut();
            session.present(&mut renderers);
        }
        self.flush_events();
    }

    /// Dispatch surface events queued during rendering. Callers must not
    /// hold the session or renderer borrows.
    pub fn flush_events(&self) {
        if let Some(events) = &self.mesh_events {
            events.flush();
        }
    }
}

fn build_video(document: &web::Document, preview: &DomImageGrid) -> anyhow::Result<DomVideo> {
    let container: web::HtmlElement = dom::create(document, "div")?;
    container.set_id(VIDEO_CONTAINER_ID);
    container.set_class_name(VIDEO_CONTAINER_CLASS);

    let video: web::HtmlVideoElement = dom::create(document, "video")?;
    video.set_preload("auto");
    video.set_muted(true);
    container
        .append_child(&video)
        .map_err(|e| anyhow::anyhow!("append video: {:?}", e))?;

    let anchor: &web::Node = preview.element().as_ref();
    let parent = anchor
        .parent_node()
        .ok_or_else(|| anyhow::anyhow!("#{} is detached", PREVIEW_ID))?;
    parent
        .insert_before(&container, Some(anchor))
        .map_err(|e| anyhow::anyhow!("insert video container: {:?}", e))?;

    let v = video.clone();
    dom::add_listener::<web::Event>(&video, "loadedmetadata", move |_| {
        log::info!("[video] loaded, duration {:.2}s", v.duration());
    });
    Ok(DomVideo::new(container, video))
}

fn build_depth_control(
    document: &web::Document,
    container: &web::HtmlElement,
) -> anyhow::Result<()> {
    let input: web::HtmlInputElement = dom::create(document, "input")?;
    input.set_type("range");
    input.set_id(DEPTH_CONTROL_ID);
    input.set_class_name(DEPTH_CONTROL_CLASS);
    input.set_min("0");
    input.set_max(&MAX_DISPLACEMENT_SCALE.to_string());
    input.set_step(&DEPTH_CONTROL_STEP.to_string());
    input.set_value(&DEFAULT_DISPLACEMENT_SCALE.to_string());

    let label: web::HtmlElement = dom::create(document, "label")?;
    label
        .append_child(&input)
        .map_err(|e| anyhow::anyhow!("append depth control: {:?}", e))?;
    container
        .append_child(&label)
        .map_err(|e| anyhow::anyhow!("append depth label: {:?}", e))?;
    Ok(())
}
