use crate::app::App;
use crate::constants::DEPTH_CONTROL_ID;
use crate::dom;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Forward the displacement slider to the mesh renderer.
pub fn wire_depth_control(app: &App) {
    let Some(input) = app
        .document
        .get_element_by_id(DEPTH_CONTROL_ID)
        .and_then(|el| el.dyn_into::<web::HtmlInputElement>().ok())
    else {
        return;
    };

    let app = app.clone();
    let target = input.clone();
    dom::add_listener::<web::Event>(&input, "input", move |_| {
        let Ok(value) = target.value().parse::<f32>() else {
            return;
        };
        if let Some(applied) = app.set_displacement_scale(value) {
            log::debug!("[mesh] displacement scale {:.1}", applied);
        }
    });
}
