//! Baseline screenshots.
//!
//! Baselines live at `{dir}/{engine}/{name}`. A missing baseline is written from
//! the actual screenshot and reported as [`SiteCheckError::MissingBaseline`] so the
//! first run never passes silently; with `update` set the baseline is (re)written
//! and the check passes.

use crate::result::{SiteCheckError, SiteCheckResult};
use crate::theme::Theme;
use image::{DynamicImage, GenericImageView, Rgba};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Baseline name of a full-page screenshot in `theme`
#[must_use]
pub fn baseline_name(theme: Theme) -> String {
    format!("page_with_{theme}_mode.png")
}

/// Comparison tolerances and storage location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapshotConfig {
    /// Baseline root directory
    pub dir: PathBuf,
    /// Overwrite baselines instead of comparing
    pub update: bool,
    /// Ratio of pixels (0.0-1.0) allowed to differ
    pub max_diff_pixel_ratio: f64,
    /// Per-channel difference (0-255) under which two pixels are equal
    pub color_threshold: u8,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("__snapshots__"),
            update: false,
            max_diff_pixel_ratio: 0.01,
            color_threshold: 10,
        }
    }
}

/// Result of a passing comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SnapshotOutcome {
    /// Screenshot matched its baseline
    Matched {
        /// Ratio of differing pixels
        diff_ratio: f64,
    },
    /// Baseline was written because updates are enabled
    Updated {
        /// Baseline path
        path: PathBuf,
    },
}

impl SnapshotOutcome {
    /// Whether an existing baseline was compared
    #[must_use]
    pub const fn is_match(&self) -> bool {
        matches!(self, Self::Matched { .. })
    }
}

/// Pixel statistics of one comparison
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageDiff {
    /// Pixels over the color threshold
    pub diff_pixels: usize,
    /// Total pixels compared
    pub total_pixels: usize,
}

impl ImageDiff {
    /// Ratio of differing pixels (0.0-1.0)
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn ratio(&self) -> f64 {
        if self.total_pixels == 0 {
            0.0
        } else {
            self.diff_pixels as f64 / self.total_pixels as f64
        }
    }
}

/// Baseline store
#[derive(Debug, Clone, Default)]
pub struct SnapshotStore {
    config: SnapshotConfig,
}

impl SnapshotStore {
    /// Store rooted at `dir` with default tolerances
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            config: SnapshotConfig {
                dir: dir.into(),
                ..SnapshotConfig::default()
            },
        }
    }

    /// Store from config
    #[must_use]
    pub const fn from_config(config: SnapshotConfig) -> Self {
        Self { config }
    }

    /// Enable or disable baseline updates
    #[must_use]
    pub const fn with_update(mut self, update: bool) -> Self {
        self.config.update = update;
        self
    }

    /// Set the allowed ratio of differing pixels
    #[must_use]
    pub const fn with_max_diff_pixel_ratio(mut self, ratio: f64) -> Self {
        self.config.max_diff_pixel_ratio = ratio;
        self
    }

    /// Set the per-channel color threshold
    #[must_use]
    pub const fn with_color_threshold(mut self, threshold: u8) -> Self {
        self.config.color_threshold = threshold;
        self
    }

    /// Configuration
    #[must_use]
    pub const fn config(&self) -> &SnapshotConfig {
        &self.config
    }

    /// Path of baseline `name` for `engine`
    #[must_use]
    pub fn baseline_path(&self, engine: &str, name: &str) -> PathBuf {
        self.config.dir.join(engine).join(name)
    }

    /// Path the actual screenshot is written to on mismatch
    #[must_use]
    pub fn actual_path(&self, engine: &str, name: &str) -> PathBuf {
        let baseline = self.baseline_path(engine, name);
        let stem = baseline
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        baseline.with_file_name(format!("{stem}-actual.png"))
    }

    /// Compare a PNG screenshot against baseline `name`
    ///
    /// # Errors
    ///
    /// - [`SiteCheckError::MissingBaseline`] when no baseline exists (it is written)
    /// - [`SiteCheckError::VisualMismatch`] when too many pixels differ
    /// - [`SiteCheckError::ImageComparisonError`] for undecodable images or a size change
    pub fn compare(&self, engine: &str, name: &str, actual: &[u8]) -> SiteCheckResult<SnapshotOutcome> {
        let path = self.baseline_path(engine, name);

        if self.config.update {
            write_file(&path, actual)?;
            tracing::info!(path = %path.display(), "baseline updated");
            return Ok(SnapshotOutcome::Updated { path });
        }

        if !path.exists() {
            write_file(&path, actual)?;
            tracing::warn!(path = %path.display(), "baseline missing, actual screenshot written");
            return Err(SiteCheckError::MissingBaseline {
                path: path.display().to_string(),
            });
        }

        let expected = std::fs::read(&path)?;
        let diff = self.diff(actual, &expected)?;
        let diff_ratio = diff.ratio();
        tracing::debug!(%name, diff_ratio, "compared screenshot");

        if diff_ratio > self.config.max_diff_pixel_ratio {
            write_file(&self.actual_path(engine, name), actual)?;
            return Err(SiteCheckError::VisualMismatch {
                name: name.to_string(),
                diff_ratio,
            });
        }
        Ok(SnapshotOutcome::Matched { diff_ratio })
    }

    /// Count differing pixels of two PNG images
    ///
    /// # Errors
    ///
    /// Returns [`SiteCheckError::ImageComparisonError`] if either image cannot be
    /// decoded or the dimensions differ
    pub fn diff(&self, actual: &[u8], expected: &[u8]) -> SiteCheckResult<ImageDiff> {
        let actual = decode(actual, "actual")?;
        let expected = decode(expected, "expected")?;

        let (width, height) = actual.dimensions();
        let (exp_width, exp_height) = expected.dimensions();
        if width != exp_width || height != exp_height {
            return Err(SiteCheckError::ImageComparisonError {
                message: format!(
                    "Image dimensions differ: actual {width}x{height}, expected {exp_width}x{exp_height}"
                ),
            });
        }

        let actual = actual.to_rgba8();
        let expected = expected.to_rgba8();
        let threshold = self.config.color_threshold;
        let diff_pixels = actual
            .pixels()
            .zip(expected.pixels())
            .filter(|(a, b)| pixel_differs(**a, **b, threshold))
            .count();

        Ok(ImageDiff {
            diff_pixels,
            total_pixels: (width as usize) * (height as usize),
        })
    }
}

fn decode(bytes: &[u8], which: &str) -> SiteCheckResult<DynamicImage> {
    image::load_from_memory(bytes).map_err(|e| SiteCheckError::ImageComparisonError {
        message: format!("Failed to decode {which} image: {e}"),
    })
}

fn pixel_differs(a: Rgba<u8>, b: Rgba<u8>, threshold: u8) -> bool {
    a.0.iter()
        .zip(b.0.iter())
        .any(|(x, y)| x.abs_diff(*y) > threshold)
}

fn write_file(path: &Path, bytes: &[u8]) -> SiteCheckResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, bytes)?;
    Ok(())
}
