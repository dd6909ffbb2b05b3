// Host-side tests for the session context driving the three renderers
// through in-memory surfaces.

use gaze_core::{
    DisplacementTarget, FrameOutcome, GazeConfig, GazeSession, GridCoord, GridSpec,
    ImageGridRenderer, ImageSurface, MeshRenderer, MeshSurface, Rect, Renderer, VideoRenderer,
    VideoSurface, DEFAULT_DISPLACEMENT_SCALE, MAX_DISPLACEMENT_SCALE,
};
use glam::Vec2;
use instant::Instant;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

type Handle = String;
type Shared<T> = Rc<RefCell<T>>;

struct FakeImages {
    centers: Vec<Option<Vec2>>,
    sources: Vec<Option<String>>,
}

impl ImageSurface for FakeImages {
    fn element_count(&self) -> usize {
        self.centers.len()
    }
    fn element_center(&self, i: usize) -> Option<Vec2> {
        self.centers[i]
    }
    fn set_source(&mut self, i: usize, url: &str) {
        self.sources[i] = Some(url.to_string());
    }
}

struct FakeVideo {
    rect: Rect,
    ready: bool,
    seeks: Vec<f64>,
}

impl VideoSurface for FakeVideo {
    fn container(&self) -> Rect {
        self.rect
    }
    fn has_current_data(&self) -> bool {
        self.ready
    }
    fn seek(&mut self, seconds: f64) {
        self.seeks.push(seconds);
    }
}

#[derive(Default)]
struct FakeMesh {
    rect: Rect,
    textures: Vec<(Handle, Option<Handle>)>,
    scales: Vec<f32>,
}

impl DisplacementTarget for FakeMesh {
    fn set_displacement_scale(&mut self, scale: f32) {
        self.scales.push(scale);
    }
}

impl MeshSurface<Handle> for FakeMesh {
    fn container(&self) -> Rect {
        self.rect
    }
    fn set_textures(&mut self, color: &Handle, depth: Option<&Handle>) {
        self.textures.push((color.clone(), depth.cloned()));
    }
}

const RECT: Rect = Rect::new(0.0, 0.0, 200.0, 100.0);

fn session(w: u32, h: u32) -> GazeSession<Handle> {
    let spec = GridSpec::new(w, h, "p").unwrap();
    let mut s = GazeSession::new(GazeConfig::with_grid(spec)).unwrap();
    s.set_reference(Some(RECT));
    s
}

fn load_all_images(s: &mut GazeSession<Handle>) {
    let gen = s.generation();
    let names: Vec<String> = s.grid().filenames().map(str::to_string).collect();
    for name in names {
        assert!(s.insert_image(gen, &name, format!("img:{name}")));
    }
}

/// Event clock advancing past the 60fps interval on every tick.
struct Clock(Instant);

impl Clock {
    fn tick(&mut self) -> Instant {
        self.0 += Duration::from_millis(20);
        self.0
    }
}

fn video(ready: bool) -> Shared<VideoRenderer<FakeVideo>> {
    Rc::new(RefCell::new(VideoRenderer::new(FakeVideo {
        rect: RECT,
        ready,
        seeks: Vec::new(),
    })))
}

#[test]
fn new_session_rests_at_grid_center() {
    let s = session(5, 5);
    assert_eq!(s.pointer().cell, GridCoord::new(2, 2));
    assert_eq!(s.pointer().last_update, None);
    assert_eq!(s.layout().video(), "./outputs/p/p.mp4");
}

#[test]
fn gate_drops_events_inside_interval() {
    let mut s = session(5, 5);
    let mut renderers: Vec<Box<dyn Renderer<Handle>>> = vec![Box::new(video(true))];
    let t0 = Instant::now();
    assert!(s.pointer_moved(t0, Vec2::ZERO, &mut renderers).is_some());
    let dropped = s.pointer_moved(t0 + Duration::from_millis(10), Vec2::new(200.0, 100.0), &mut renderers);
    assert!(dropped.is_none());
    // the dropped event did not move the tracked cell
    assert_eq!(s.pointer().cell, GridCoord::new(0, 0));
}

#[test]
fn video_seeks_to_cell_frame_time() {
    let mut s = session(5, 5);
    let v = video(true);
    let mut renderers: Vec<Box<dyn Renderer<Handle>>> = vec![Box::new(v.clone())];
    let mut clock = Clock(Instant::now());

    let out = s.pointer_moved(clock.tick(), Vec2::new(200.0, 100.0), &mut renderers);
    assert_eq!(out, Some(vec![FrameOutcome::Applied]));
    assert_eq!(s.pointer().cell, GridCoord::new(4, 4));
    assert_eq!(s.pointer().normalized, Vec2::ONE);
    assert!((v.borrow().surface().seeks[0] - 24.0 / 60.0).abs() < 1e-9);

    // same cell again: no second seek
    let out = s.pointer_moved(clock.tick(), Vec2::new(199.0, 99.0), &mut renderers);
    assert_eq!(out, Some(vec![FrameOutcome::Unchanged]));
    assert_eq!(v.borrow().surface().seeks.len(), 1);
}

#[test]
fn video_without_data_keeps_previous_frame() {
    let mut s = session(5, 5);
    let v = video(false);
    let mut renderers: Vec<Box<dyn Renderer<Handle>>> = vec![Box::new(v.clone())];
    let out = s.pointer_moved(Instant::now(), Vec2::ZERO, &mut renderers);
    assert_eq!(out, Some(vec![FrameOutcome::Pending]));
    assert!(v.borrow().surface().seeks.is_empty());
}

#[test]
fn mesh_waits_for_color_then_swaps_textures() {
    let mut s = session(5, 5);
    let mesh = Rc::new(RefCell::new(MeshRenderer::new(FakeMesh {
        rect: RECT,
        ..FakeMesh::default()
    })));
    let mut renderers: Vec<Box<dyn Renderer<Handle>>> = vec![Box::new(mesh.clone())];
    let mut clock = Clock(Instant::now());

    let out = s.pointer_moved(clock.tick(), Vec2::ZERO, &mut renderers);
    assert_eq!(out, Some(vec![FrameOutcome::Pending]));
    assert!(mesh.borrow().surface().textures.is_empty());

    let gen = s.generation();
    let name = s.grid().get(0, 0).unwrap().filename.clone();
    s.insert_image(gen, &name, "color".into());
    let out = s.pointer_moved(clock.tick(), Vec2::ZERO, &mut renderers);
    assert_eq!(out, Some(vec![FrameOutcome::Applied]));
    assert_eq!(
        mesh.borrow().surface().textures,
        vec![("color".to_string(), None)]
    );

    // depth for the next cell is used when present
    let next = s.grid().get(4, 4).unwrap().filename.clone();
    s.insert_image(gen, &next, "color2".into());
    s.insert_depth(gen, &next, "depth2".into());
    s.pointer_moved(clock.tick(), Vec2::new(200.0, 100.0), &mut renderers);
    assert_eq!(
        mesh.borrow().surface().textures.last(),
        Some(&("color2".to_string(), Some("depth2".to_string())))
    );
}

#[test]
fn displacement_scale_is_clamped() {
    let mut mesh = MeshRenderer::new(FakeMesh::default());
    assert_eq!(mesh.displacement_scale(), DEFAULT_DISPLACEMENT_SCALE);
    assert_eq!(mesh.set_displacement_scale(9.0), MAX_DISPLACEMENT_SCALE);
    assert_eq!(mesh.set_displacement_scale(-1.0), 0.0);
    assert_eq!(mesh.set_displacement_scale(f32::NAN), DEFAULT_DISPLACEMENT_SCALE);
    assert_eq!(mesh.set_displacement_scale(1.5), 1.5);
    assert_eq!(
        mesh.surface().scales,
        vec![MAX_DISPLACEMENT_SCALE, 0.0, DEFAULT_DISPLACEMENT_SCALE, 1.5]
    );
}

#[test]
fn image_grid_elements_gaze_independently() {
    let mut s = session(5, 5);
    load_all_images(&mut s);
    let images = Rc::new(RefCell::new(ImageGridRenderer::new(FakeImages {
        centers: vec![Some(Vec2::ZERO), Some(Vec2::new(1000.0, 0.0)), None],
        sources: vec![None; 3],
    })));
    let mut renderers: Vec<Box<dyn Renderer<Handle>>> = vec![Box::new(images.clone())];

    let out = s.pointer_moved(Instant::now(), Vec2::new(500.0, 0.0), &mut renderers);
    assert_eq!(out, Some(vec![FrameOutcome::Applied]));

    let right = s.layout().image(&s.grid().get(4, 2).unwrap().filename);
    let left = s.layout().image(&s.grid().get(0, 2).unwrap().filename);
    let r = images.borrow();
    assert_eq!(r.surface().sources[0].as_deref(), Some(right.as_str()));
    assert_eq!(r.surface().sources[1].as_deref(), Some(left.as_str()));
    // element without a layout box is left alone
    assert_eq!(r.surface().sources[2], None);
}

#[test]
fn image_grid_pending_until_loaded() {
    let mut s = session(5, 5);
    let images = Rc::new(RefCell::new(ImageGridRenderer::new(FakeImages {
        centers: vec![Some(Vec2::ZERO)],
        sources: vec![None],
    })));
    let mut renderers: Vec<Box<dyn Renderer<Handle>>> = vec![Box::new(images.clone())];
    let out = s.pointer_moved(Instant::now(), Vec2::new(500.0, 0.0), &mut renderers);
    assert_eq!(out, Some(vec![FrameOutcome::Pending]));
    assert_eq!(images.borrow().surface().sources[0], None);
}

#[test]
fn present_shows_resting_cell() {
    let s = session(5, 5);
    let v = video(true);
    let images = ImageGridRenderer::new(FakeImages {
        centers: vec![Some(Vec2::ZERO)],
        sources: vec![None],
    });
    let mut renderers: Vec<Box<dyn Renderer<Handle>>> =
        vec![Box::new(images), Box::new(v.clone())];
    let out = s.present(&mut renderers);
    assert_eq!(out, vec![FrameOutcome::Unchanged, FrameOutcome::Applied]);
    // center (2,2) of a 5-wide grid is frame 12
    assert!((v.borrow().surface().seeks[0] - 12.0 / 60.0).abs() < 1e-9);
}

#[test]
fn reload_discards_stale_assets() {
    let mut s = session(5, 5);
    let old = s.generation();
    let name = s.grid().samples()[0].filename.clone();
    assert!(s.insert_image(old, &name, "a".into()));

    let new = s.load_grid(GridSpec::new(3, 3, "q").unwrap()).unwrap();
    assert_ne!(new, old);
    assert!(s.images().is_empty());
    assert!(!s.insert_image(old, &name, "late".into()));
    assert!(s.images().is_empty());
    assert_eq!(s.pointer().cell, GridCoord::new(1, 1));
    assert_eq!(s.layout().image("x.webp"), "./outputs/q/x.webp");
    assert_eq!(s.preload_plan().iter().map(Vec::len).sum::<usize>(), 9);
}

#[test]
fn failed_or_identical_load_keeps_session() {
    let mut s = session(5, 5);
    let gen = s.generation();

    let same = s.config().clone();
    assert_eq!(s.load(same).unwrap(), gen);

    let bad = GazeConfig {
        fps: 0.0,
        ..s.config().clone()
    };
    assert!(s.load(bad).is_err());
    assert_eq!(s.generation(), gen);
    assert_eq!(s.grid().width(), 5);
    assert_eq!(s.config().fps, 60.0);
}
