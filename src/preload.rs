use crate::app::App;
use crate::overlay;
use crate::surfaces::Texture;
use gaze_core::{Generation, PreloadRequest};
use wasm_bindgen_futures::JsFuture;

struct InFlight {
    filename: String,
    image: Texture,
    image_decode: JsFuture,
    depth: Texture,
    depth_decode: JsFuture,
}

fn start_load(req: &PreloadRequest) -> anyhow::Result<InFlight> {
    let image = Texture::new().map_err(|e| anyhow::anyhow!("new Image: {:?}", e))?;
    image.set_src(&req.image_url);
    let depth = Texture::new().map_err(|e| anyhow::anyhow!("new Image: {:?}", e))?;
    depth.set_src(&req.depth_url);
    Ok(InFlight {
        filename: req.filename.clone(),
        image_decode: JsFuture::from(image.decode()),
        image,
        depth_decode: JsFuture::from(depth.decode()),
        depth,
    })
}

/// Load every asset of the active grid, one batch at a time.
///
/// Completions are inserted under the generation they were started for; the
/// session drops them if the grid changed meanwhile, and the loop stops at
/// the next batch boundary.
pub async fn preload(app: App) {
    let (generation, plan) = {
        let session = app.session.borrow();
        (session.generation(), session.preload_plan())
    };
    let total: usize = plan.iter().map(Vec::len).sum();
    log::info!("[preload] {} textures (gen {})", total, generation.0);

    let mut done = 0usize;
    for batch in plan {
        if app.session.borrow().generation() != generation {
            log::debug!("[preload] gen {} superseded, stopping", generation.0);
            return;
        }
        let in_flight: Vec<InFlight> = batch
            .iter()
            .filter_map(|req| match start_load(req) {
                Ok(f) => Some(f),
                Err(e) => {
                    log::error!("[preload] {}: {:?}", req.filename, e);
                    None
                }
            })
            .collect();
        // decodes are already running; awaiting in order just collects them
        for f in in_flight {
            finish_load(&app, generation, f).await;
        }
        done += batch.len();
        log::info!("[preload] loaded {} / {}", done, total);
        if let Some(document) = crate::dom::window_document() {
            overlay::show_progress(&document, done, total);
        }
        app.present();
    }
    log::info!("[preload] all textures loaded");
}

async fn finish_load(app: &App, generation: Generation, f: InFlight) {
    match f.image_decode.await {
        Ok(_) => {
            app.session
                .borrow_mut()
                .insert_image(generation, &f.filename, f.image);
        }
        Err(e) => {
            log::warn!("[preload] image not found: {} ({:?})", f.filename, e);
        }
    }
    match f.depth_decode.await {
        Ok(_) => {
            app.session
                .borrow_mut()
                .insert_depth(generation, &f.filename, f.depth);
        }
        // depth maps are optional; the mesh renders flat without one
        Err(_) => log::debug!("[preload] no depth map for {}", f.filename),
    }
}
