//! Tunable constants for the table, the shot model and the rules.
//!
//! Every field has a default, so a host can override only what it cares
//! about:
//!
//! ```json
//! { "max_power": 2.0, "foul_policy": "reset_on_red", "seed": 7 }
//! ```

use std::cell::RefCell;

use baize_engine::Easing;
use serde::Deserialize;

use crate::error::SnookerError;

/// Where a hand-dragged cue ball may be put down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlacementRule {
    /// Anywhere inside the cushions.
    #[default]
    Table,
    /// Only inside the D behind the baulk line.
    D,
}

/// How a red pot interacts with the consecutive-colour foul.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FoulPolicy {
    /// Only colored pots update the tracker; a red in between does not
    /// break a same-colour streak.
    #[default]
    ColoredOnly,
    /// Potting a red clears the tracker.
    ResetOnRed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PotEasing {
    #[default]
    Linear,
    QuadIn,
    SineInOut,
}

impl PotEasing {
    pub fn easing(self) -> Easing {
        match self {
            PotEasing::Linear => Easing::Linear,
            PotEasing::QuadIn => Easing::QuadIn,
            PotEasing::SineInOut => Easing::SineInOut,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SnookerConfig {
    // -- canvas & table --
    pub canvas_width: f32,
    pub canvas_height: f32,
    pub table_length: f32,
    pub table_width: f32,
    pub table_center: [f32; 2],
    /// Gap between the cushions and the outer walls.
    pub clearance: f32,
    pub rail_thickness: f32,
    pub rail_corner_radius: f32,
    /// Distance of the pocket centres from the table edge.
    pub pocket_inset: f32,

    // -- balls --
    /// Defaults to table length / 36.
    pub ball_diameter: Option<f32>,
    /// Centre distance at which a ball counts as potted. Defaults to one ball diameter.
    pub pocket_radius: Option<f32>,
    pub density: f32,
    pub linear_damping: f32,
    pub angular_damping: f32,
    pub restitution: f32,
    pub friction: f32,
    pub rail_restitution: f32,

    // -- shot --
    /// Power per pixel of drag.
    pub power_scale: f32,
    pub max_power: f32,
    /// Releases with a shorter drag cancel the shot.
    pub min_shot_drag: f32,
    /// Cue ball speed (px/s) per unit of power.
    pub shot_speed_per_power: f32,
    /// Speed (px/s) of the press nudge per pixel between pointer and cue ball.
    pub nudge_speed_per_px: f32,
    pub nudge_max_speed: f32,
    /// Extra clearance kept from the cushions when dragging the cue ball.
    pub drag_margin: f32,
    pub placement: PlacementRule,

    // -- rules & timing --
    pub pot_animation_seconds: f32,
    pub pot_easing: PotEasing,
    pub foul_policy: FoulPolicy,
    /// Below this speed (px/s) a ball counts as stopped.
    pub rest_speed: f32,
    /// Fallback: a shot that has not settled after this long is stopped.
    pub max_shot_seconds: f32,
    pub physics_substeps: u32,

    // -- layouts --
    pub seed: u64,
    /// Attempts per ball to find a non-overlapping random spot.
    pub placement_retries: u32,
    pub cue_trail_len: usize,
}

impl Default for SnookerConfig {
    fn default() -> Self {
        Self {
            canvas_width: 1200.0,
            canvas_height: 900.0,
            table_length: 1000.0,
            table_width: 500.0,
            table_center: [600.0, 400.0],
            clearance: 20.0,
            rail_thickness: 20.0,
            rail_corner_radius: 10.0,
            pocket_inset: 10.0,

            ball_diameter: None,
            pocket_radius: None,
            density: 0.01,
            linear_damping: 1.75,
            angular_damping: 1.0,
            restitution: 0.95,
            friction: 0.2,
            rail_restitution: 0.95,

            power_scale: 0.01,
            max_power: 1.5,
            min_shot_drag: 5.0,
            shot_speed_per_power: 1600.0,
            nudge_speed_per_px: 0.024,
            nudge_max_speed: 3.0,
            drag_margin: 5.0,
            placement: PlacementRule::Table,

            pot_animation_seconds: 1.0,
            pot_easing: PotEasing::Linear,
            foul_policy: FoulPolicy::ColoredOnly,
            rest_speed: 2.0,
            max_shot_seconds: 15.0,
            physics_substeps: 4,

            seed: 0x5eed,
            placement_retries: 32,
            cue_trail_len: 60,
        }
    }
}

impl SnookerConfig {
    /// Parse and validate a JSON config. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, SnookerError> {
        let config: SnookerConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn ball_diameter(&self) -> f32 {
        self.ball_diameter.unwrap_or(self.table_length / 36.0)
    }

    pub fn ball_radius(&self) -> f32 {
        self.ball_diameter() / 2.0
    }

    pub fn pocket_radius(&self) -> f32 {
        self.pocket_radius.unwrap_or_else(|| self.ball_diameter())
    }

    pub fn validate(&self) -> Result<(), SnookerError> {
        let positive: [(&'static str, f32); 13] = [
            ("canvas_width", self.canvas_width),
            ("canvas_height", self.canvas_height),
            ("table_length", self.table_length),
            ("table_width", self.table_width),
            ("rail_thickness", self.rail_thickness),
            ("ball_diameter", self.ball_diameter()),
            ("pocket_radius", self.pocket_radius()),
            ("density", self.density),
            ("power_scale", self.power_scale),
            ("max_power", self.max_power),
            ("shot_speed_per_power", self.shot_speed_per_power),
            ("rest_speed", self.rest_speed),
            ("max_shot_seconds", self.max_shot_seconds),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(out_of_range(field, value as f64));
            }
        }

        let non_negative: [(&'static str, f32); 9] = [
            ("clearance", self.clearance),
            ("rail_corner_radius", self.rail_corner_radius),
            ("pocket_inset", self.pocket_inset),
            ("linear_damping", self.linear_damping),
            ("angular_damping", self.angular_damping),
            ("min_shot_drag", self.min_shot_drag),
            ("nudge_speed_per_px", self.nudge_speed_per_px),
            ("nudge_max_speed", self.nudge_max_speed),
            ("pot_animation_seconds", self.pot_animation_seconds),
        ];
        for (field, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(out_of_range(field, value as f64));
            }
        }

        if !(self.rail_thickness.is_finite() && self.rail_thickness >= 2.0 * self.rail_corner_radius) {
            return Err(out_of_range("rail_thickness", self.rail_thickness as f64));
        }
        if !(1..=16).contains(&self.physics_substeps) {
            return Err(out_of_range("physics_substeps", self.physics_substeps as f64));
        }
        if self.ball_diameter() * 5.0 >= self.table_width {
            return Err(out_of_range("ball_diameter", self.ball_diameter() as f64));
        }
        Ok(())
    }
}

fn out_of_range(field: &'static str, value: f64) -> SnookerError {
    SnookerError::ConfigOutOfRange { field, value }
}

thread_local! {
    static STAGED: RefCell<Option<SnookerConfig>> = RefCell::new(None);
}

/// Hold a config until the next game is constructed.
pub fn stage(config: SnookerConfig) {
    STAGED.with(|cell| *cell.borrow_mut() = Some(config));
}

/// Take the staged config, if any. Later games fall back to the defaults.
pub fn take_staged() -> Option<SnookerConfig> {
    STAGED.with(|cell| cell.borrow_mut().take())
}
