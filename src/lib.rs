#![cfg(target_arch = "wasm32")]
use gaze_core::GazeConfig;
use std::cell::RefCell;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

mod app;
mod constants;
mod deferred;
mod dom;
mod events;
mod overlay;
mod preload;
mod surfaces;

use app::App;

thread_local! {
    static APP: RefCell<Option<App>> = const { RefCell::new(None) };
}

fn with_app<T>(f: impl FnOnce(&App) -> T) -> Option<T> {
    APP.with(|slot| slot.borrow().as_ref().map(f))
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("gaze-web starting");

    spawn_local(async move {
        if let Err(e) = init().await {
            log::error!("init error: {:?}", e);
        }
    });
    Ok(())
}

async fn init() -> anyhow::Result<()> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow::anyhow!("no document"))?;

    let app = App::build(document, GazeConfig::default())?;
    events::wire_pointermove(&app);
    events::wire_depth_control(&app);
    app.activate()?;

    APP.with(|slot| *slot.borrow_mut() = Some(app));
    Ok(())
}

/// Switch the viewer to another photo's grid. Invalid input leaves the
/// current grid in place and reports the error to the caller.
#[wasm_bindgen(js_name = loadPhoto)]
pub fn load_photo(prefix: String, x_steps: u32, y_steps: u32) -> Result<(), JsValue> {
    let result = with_app(|app| app.load_photo(&prefix, x_steps, y_steps))
        .ok_or_else(|| JsValue::from_str("viewer not initialised"))?;
    result.map_err(|e| {
        log::error!("[app] load {}: {:?}", prefix, e);
        JsValue::from_str(&e.to_string())
    })
}

/// Set the mesh displacement scale; returns the value actually applied.
#[wasm_bindgen(js_name = setDisplacementScale)]
pub fn set_displacement_scale(scale: f32) -> Option<f32> {
    with_app(|app| app.set_displacement_scale(scale)).flatten()
}
