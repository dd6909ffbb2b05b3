use crate::constants::HINT_OVERLAY_ID;
use web_sys as web;

const HINT_STYLE: &str = "color: #cfe7ff; font: 13px system-ui; background: rgba(10, 14, 24, 0.8); padding: 8px 12px; border-radius: 6px; border: 1px solid rgba(80, 110, 150, 0.35);";

fn set_hint(document: &web::Document, text: &str) {
    if let Some(el) = document.get_element_by_id(HINT_OVERLAY_ID) {
        el.set_inner_html(&format!("<div style='{}'>{}</div>", HINT_STYLE, text));
        _ = el.set_attribute("style", "");
    }
}

#[inline]
pub fn hide(document: &web::Document) {
    if let Some(el) = document.get_element_by_id(HINT_OVERLAY_ID) {
        _ = el.set_attribute("style", "display:none");
    }
}

/// Describe the active photo grid.
pub fn show_grid(document: &web::Document, prefix: &str, width: u32, height: u32) {
    set_hint(
        document,
        &format!("Photo: {} • Grid: {}×{}", escape(prefix), width, height),
    );
}

/// Preload progress; hides itself once everything is in.
pub fn show_progress(document: &web::Document, done: usize, total: usize) {
    if done >= total {
        hide(document);
    } else {
        set_hint(document, &format!("Loading {} / {}", done, total));
    }
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('\'', "&#39;")
}
