//! Tuned constants for the gravity playground.
//!
//! Nothing here is physically meaningful: the values are picked so that a
//! handful of bodies on an 800×600 canvas produce visible orbits within a
//! few seconds. Every field can be overridden from a JSON file; missing
//! fields fall back to [`Config::default`].

use std::{fs, path::Path};

use anyhow::{Context, ensure};
use serde::{Deserialize, Serialize};

use crate::types::Rgb;

/// Closed interval used for sliders and random sampling.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    pub min: f32,
    pub max: f32,
}

impl ValueRange {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Clamps `v` into the range.
    ///
    /// Unlike [`f32::clamp`] this never panics, even on an inverted range.
    pub fn clamp(&self, v: f32) -> f32 {
        v.max(self.min).min(self.max)
    }

    /// `true` if both endpoints are finite.
    pub fn is_finite(&self) -> bool {
        self.min.is_finite() && self.max.is_finite()
    }

    pub fn contains(&self, v: f32) -> bool {
        v >= self.min && v <= self.max
    }

    pub fn as_inclusive(&self) -> std::ops::RangeInclusive<f32> {
        self.min..=self.max
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Gravitational constant.
    pub gravity: f32,
    /// Drawn radius of every body; also the hit-test radius for clicks.
    pub body_radius: f32,
    /// Extra gap kept between a body's edge and the canvas edge.
    pub wall_padding: f32,
    /// Floor for the squared distance in the force law.
    pub min_distance_squared: f32,
    /// Logical time advanced per frame at speed 1.
    pub base_time_step: f32,

    pub max_bodies: usize,

    pub default_trail_length: usize,
    pub min_trail_length: usize,
    pub max_trail_length: usize,

    pub default_speed: f32,
    pub speed: ValueRange,

    /// Range new bodies draw their mass from.
    pub initial_mass: ValueRange,
    pub mass_edit: ValueRange,
    pub velocity_edit: ValueRange,

    pub palette: Vec<Rgb>,

    pub canvas_width: f32,
    pub canvas_height: f32,

    /// Seed for mass sampling; `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        let body_radius = 8.0;
        Self {
            gravity: 0.5,
            body_radius,
            wall_padding: 5.0,
            min_distance_squared: (body_radius * 2.0) * (body_radius * 2.0),
            base_time_step: 0.05,
            max_bodies: 50,
            default_trail_length: 500,
            min_trail_length: 10,
            max_trail_length: 2500,
            default_speed: 10.0,
            speed: ValueRange::new(1.0, 20.0),
            initial_mass: ValueRange::new(50.0, 150.0),
            mass_edit: ValueRange::new(10.0, 500.0),
            velocity_edit: ValueRange::new(-10.0, 10.0),
            palette: vec![
                Rgb(0xFF, 0x63, 0x47), // tomato
                Rgb(0x46, 0x82, 0xB4), // steel blue
                Rgb(0x3C, 0xB3, 0x71), // medium sea green
                Rgb(0xFF, 0xD7, 0x00), // gold
                Rgb(0xBA, 0x55, 0xD3), // medium orchid
            ],
            canvas_width: 800.0,
            canvas_height: 600.0,
            seed: None,
        }
    }
}

impl Config {
    /// Distance from each canvas edge inside which a body's center is kept.
    pub fn wall_margin(&self) -> f32 {
        self.body_radius + self.wall_padding
    }

    pub fn clamp_trail_length(&self, len: usize) -> usize {
        len.max(self.min_trail_length).min(self.max_trail_length)
    }

    /// Reads a JSON config file and validates it.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let cfg: Config = serde_json::from_str(&json)
            .with_context(|| format!("parsing config {}", path.display()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).with_context(|| format!("writing config {}", path.display()))?;
        Ok(())
    }

    /// Rejects configurations that would break the body invariants.
    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(self.gravity.is_finite(), "gravity must be finite");
        ensure!(
            self.body_radius.is_finite() && self.body_radius > 0.0,
            "body_radius must be finite and > 0"
        );
        ensure!(
            self.wall_padding.is_finite() && self.wall_padding >= 0.0,
            "wall_padding must be finite and >= 0"
        );
        ensure!(
            self.min_distance_squared.is_finite() && self.min_distance_squared > 0.0,
            "min_distance_squared must be finite and > 0"
        );
        ensure!(
            self.base_time_step.is_finite() && self.base_time_step > 0.0,
            "base_time_step must be finite and > 0"
        );
        for (name, range) in [
            ("speed", self.speed),
            ("initial_mass", self.initial_mass),
            ("mass_edit", self.mass_edit),
            ("velocity_edit", self.velocity_edit),
        ] {
            ensure!(range.is_finite(), "{name} range must have finite endpoints");
        }
        ensure!(self.max_bodies > 0, "max_bodies must be > 0");
        ensure!(
            self.min_trail_length >= 1 && self.min_trail_length <= self.max_trail_length,
            "trail length range must satisfy 1 <= min <= max"
        );
        ensure!(
            self.speed.min > 0.0 && self.speed.min <= self.speed.max,
            "speed range must be positive and ordered"
        );
        ensure!(
            self.initial_mass.min > 0.0 && self.initial_mass.min <= self.initial_mass.max,
            "initial_mass range must be positive and ordered"
        );
        ensure!(
            self.mass_edit.min > 0.0 && self.mass_edit.min <= self.mass_edit.max,
            "mass_edit range must be positive and ordered"
        );
        ensure!(
            self.velocity_edit.min <= self.velocity_edit.max,
            "velocity_edit range must be ordered"
        );
        ensure!(!self.palette.is_empty(), "palette must not be empty");
        ensure!(
            self.canvas_width.is_finite()
                && self.canvas_height.is_finite()
                && self.canvas_width > 0.0
                && self.canvas_height > 0.0,
            "canvas size must be finite and positive"
        );
        Ok(())
    }
}
