//! Assemble a grid's pose images into the scrubbable video.
//!
//! Frames are concatenated in row-major order, so frame `y * width + x` shows
//! sample `(x, y)`. The viewer seeks by that index.

use anyhow::{bail, Context, Result};
use gaze_core::Grid;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

pub const CONCAT_FILE: &str = "concat.txt";

/// ffmpeg concat-demuxer list of the grid's images.
///
/// The demuxer resolves relative entries against the list's own directory,
/// so the list must be written next to the images it names.
pub fn concat_list(grid: &Grid) -> String {
    grid.filenames()
        .map(|f| format!("file '{}'", quote_entry(f)))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Escape `'` for a single-quoted concat entry.
fn quote_entry(name: &str) -> String {
    name.replace('\'', r"'\''")
}

pub fn ffmpeg_args(concat: &Path, fps: f64, output: &Path) -> Vec<String> {
    let mut args: Vec<String> = ["-y", "-f", "concat", "-safe", "0", "-r"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    args.push(fps.to_string());
    args.push("-i".into());
    args.push(concat.display().to_string());
    for s in [
        "-c:v", "libx264", "-preset", "slow", "-crf", "23", "-pix_fmt", "yuv420p",
    ] {
        args.push(s.to_string());
    }
    args.push(output.display().to_string());
    args
}

/// Write the concat list into the grid's output directory and run ffmpeg.
/// The list is removed once the video is written.
pub fn build_video(grid: &Grid, outputs: &Path, fps: f64) -> Result<PathBuf> {
    let dir = outputs.join(grid.prefix());
    if !dir.is_dir() {
        bail!("no images at {}", dir.display());
    }
    let concat = dir.join(CONCAT_FILE);
    fs::write(&concat, concat_list(grid))
        .with_context(|| format!("writing {}", concat.display()))?;

    let output = dir.join(format!("{}.{}", grid.prefix(), gaze_core::VIDEO_EXTENSION));
    log::info!(
        "[video] encoding {} frames at {} fps -> {}",
        grid.len(),
        fps,
        output.display()
    );
    let result = Command::new("ffmpeg")
        .args(ffmpeg_args(&concat, fps, &output))
        .output()
        .context("running ffmpeg")?;
    if !result.status.success() {
        bail!(
            "ffmpeg failed ({}): {}",
            result.status,
            String::from_utf8_lossy(&result.stderr)
        );
    }
    fs::remove_file(&concat).with_context(|| format!("removing {}", concat.display()))?;
    log::info!("[video] wrote {}", output.display());
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gaze_core::generate;
    use tempfile::tempdir;

    /// Undo the concat demuxer's single quoting of one `file` line.
    fn unquote(line: &str) -> String {
        line.strip_prefix("file '")
            .and_then(|l| l.strip_suffix('\''))
            .unwrap()
            .replace(r"'\''", "'")
    }

    #[test]
    fn concat_list_is_row_major() {
        let grid = generate(2, 2, "p").unwrap();
        let list = concat_list(&grid);
        let lines: Vec<&str> = list.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[1], format!("file '{}'", grid.samples()[1].filename));
        assert!(lines[1].contains("_001_1_0_"));
        assert!(lines[2].contains("_002_0_1_"));
    }

    #[test]
    fn concat_entries_resolve_next_to_the_list() {
        let root = tempdir().unwrap();
        // relative outputs root, as with the default `./outputs`
        let outputs = root.path().join(".").join("outputs");
        let grid = generate(3, 2, "p").unwrap();
        let dir = outputs.join(grid.prefix());
        fs::create_dir_all(&dir).unwrap();
        for name in grid.filenames() {
            fs::write(dir.join(name), b"x").unwrap();
        }

        let concat = dir.join(CONCAT_FILE);
        fs::write(&concat, concat_list(&grid)).unwrap();
        let base = concat.parent().unwrap();
        let text = fs::read_to_string(&concat).unwrap();
        for line in text.lines() {
            let entry = unquote(line);
            assert!(Path::new(&entry).is_relative());
            assert!(base.join(&entry).is_file(), "{} does not resolve", entry);
        }
    }

    #[test]
    fn quotes_in_names_are_escaped() {
        let grid = generate(1, 1, "it's").unwrap();
        let list = concat_list(&grid);
        assert!(list.starts_with(r"file 'it'\''s_000_"));
        assert_eq!(unquote(&list), grid.samples()[0].filename);
    }

    #[test]
    fn ffmpeg_args_use_grid_fps() {
        let args = ffmpeg_args(Path::new("c.txt"), 60.0, Path::new("p.mp4"));
        let r = args.iter().position(|a| a == "-r").unwrap();
        assert_eq!(args[r + 1], "60");
        assert_eq!(args.last().unwrap(), "p.mp4");
        assert!(args.windows(2).any(|w| w[0] == "-crf" && w[1] == "23"));
    }

    #[test]
    fn build_video_requires_images() {
        let dir = tempdir().unwrap();
        let grid = generate(2, 2, "missing").unwrap();
        assert!(build_video(&grid, dir.path(), 60.0).is_err());
    }
}
