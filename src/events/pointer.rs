use crate::app::App;
use crate::dom;
use instant::Instant;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Route window pointer moves through the session's gate to every renderer.
pub fn wire_pointermove(app: &App) {
    let app = app.clone();

    let closure = wasm_bindgen::closure::Closure::wrap(Box::new(move |ev: web::PointerEvent| {
        let now = Instant::now();
        let pos = dom::pointer_client_px(&ev);

        let reference = app.reference_rect();
        let accepted = {
            let mut session = app.session.borrow_mut();
            session.set_reference(reference);
            let mut renderers = app.renderers.borrow_mut();
            let accepted = session
                .pointer_moved(now, pos, &mut renderers)
                .map(|outcomes| (session.pointer().cell, outcomes));
            accepted
        };
        if let Some((cell, outcomes)) = accepted {
            log::trace!("[pointer] cell ({},{}) -> {:?}", cell.x, cell.y, outcomes);
            // page listeners may re-enter the viewer, so only after the borrows end
            app.flush_events();
        }
    }) as Box<dyn FnMut(_)>);

    if let Some(wnd) = web::window() {
        _ = wnd.add_event_listener_with_callback("pointermove", closure.as_ref().unchecked_ref());
    }

    closure.forget();
}
