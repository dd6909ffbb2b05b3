//! Generation jobs for the external expression-editing model.

use gaze_core::{Grid, COST_PER_IMAGE_USD, CROP_FACTOR, OUTPUT_QUALITY};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// One image the model still has to produce.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Job {
    pub image: PathBuf,
    pub rotate_yaw: f64,
    pub rotate_pitch: f64,
    pub pupil_x: f64,
    pub pupil_y: f64,
    pub crop_factor: f64,
    pub output_quality: u32,
    pub output: PathBuf,
}

#[derive(Debug, Default)]
pub struct JobPlan {
    pub jobs: Vec<Job>,
    /// Samples whose output file already exists.
    pub skipped: usize,
}

/// Jobs for every sample of `grid` whose image is not yet under `outputs`.
pub fn plan_jobs(grid: &Grid, source: &Path, outputs: &Path) -> JobPlan {
    let dir = outputs.join(grid.prefix());
    let mut plan = JobPlan::default();
    for sample in grid {
        let output = dir.join(&sample.filename);
        if output.exists() {
            log::debug!("[jobs] skipping {}, already exists", sample.filename);
            plan.skipped += 1;
            continue;
        }
        plan.jobs.push(Job {
            image: source.to_path_buf(),
            rotate_yaw: sample.pose.yaw,
            rotate_pitch: sample.pose.pitch,
            pupil_x: sample.pose.pupil_x,
            pupil_y: sample.pose.pupil_y,
            crop_factor: CROP_FACTOR,
            output_quality: OUTPUT_QUALITY,
            output,
        });
    }
    plan
}

/// Estimated model cost in USD for `images` generations.
#[inline]
pub fn estimate_cost(images: usize) -> f64 {
    images as f64 * COST_PER_IMAGE_USD
}
