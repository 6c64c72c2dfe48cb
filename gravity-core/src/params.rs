use crate::{config::Config, types::Canvas};

/// Runtime parameters the user can change between (and during) runs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimParams {
    pub show_trails: bool,
    pub trail_length: usize,
    /// Multiplier on [`Config::base_time_step`].
    pub speed: f32,
    pub canvas: Canvas,
}

impl SimParams {
    pub fn from_config(cfg: &Config) -> Self {
        Self {
            show_trails: true,
            trail_length: cfg.clamp_trail_length(cfg.default_trail_length),
            speed: cfg.speed.clamp(cfg.default_speed),
            canvas: Canvas::new(cfg.canvas_width, cfg.canvas_height),
        }
    }

    /// Logical time advanced by the next step.
    pub fn effective_dt(&self, cfg: &Config) -> f32 {
        cfg.base_time_step * self.speed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_follow_config() {
        let cfg = Config::default();
        let params = SimParams::from_config(&cfg);
        assert!(params.show_trails);
        assert_eq!(params.trail_length, 500);
        assert_eq!(params.speed, 10.0);
        assert_eq!(params.canvas, Canvas::new(800.0, 600.0));
    }

    #[test]
    fn effective_dt_scales_base_step() {
        let cfg = Config::default();
        let mut params = SimParams::from_config(&cfg);
        params.speed = 2.0;
        assert!((params.effective_dt(&cfg) - 0.1).abs() < 1e-6);
    }
}
