//! Pointer-driven cue control: placing the cue ball by hand, aiming,
//! striking, and timing out a shot that never settles.

use glam::Vec2;

use baize_engine::{EngineContext, EntityId};

use crate::config::{PlacementRule, SnookerConfig};
use crate::table::TableLayout;

/// Fixed part of the drawn aim line, in pixels.
pub const AIM_LINE_LENGTH: f32 = 280.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShotState {
    Idle,
    DraggingCueBall,
    Aiming { drag_start: Vec2, pointer: Vec2 },
    /// Balls are moving after a strike.
    Resolving { elapsed: f32 },
}

/// What a pointer event did, for the caller to react to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShotAction {
    Ignored,
    PickedUp,
    Moved(Vec2),
    /// The cue ball was put down by hand at this point.
    Placed(Vec2),
    /// A press away from the cue ball nudged it and started aiming.
    Nudged(Vec2),
    Aiming,
    Struck(Vec2),
    Cancelled,
}

/// Segments for the aim overlay, all in world coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AimLine {
    pub cue: Vec2,
    /// Far end of the cue stick line, beyond the pointer.
    pub far: Vec2,
    pub pointer: Vec2,
    /// End of the guide drawn from the cue ball away from the pointer, the
    /// direction the ball will travel.
    pub guide_end: Vec2,
}

impl AimLine {
    pub fn to_floats(&self) -> [f32; 8] {
        [
            self.cue.x,
            self.cue.y,
            self.far.x,
            self.far.y,
            self.pointer.x,
            self.pointer.y,
            self.guide_end.x,
            self.guide_end.y,
        ]
    }
}

#[derive(Debug, Clone, Copy)]
struct ShotParams {
    ball_radius: f32,
    power_scale: f32,
    max_power: f32,
    min_shot_drag: f32,
    speed_per_power: f32,
    nudge_speed_per_px: f32,
    nudge_max_speed: f32,
    drag_margin: f32,
    placement: PlacementRule,
    max_shot_seconds: f32,
}

#[derive(Debug, Clone)]
pub struct ShotController {
    state: ShotState,
    power: f32,
    params: ShotParams,
}

impl ShotController {
    pub fn new(cfg: &SnookerConfig) -> Self {
        Self {
            state: ShotState::Idle,
            power: 0.0,
            params: ShotParams {
                ball_radius: cfg.ball_radius(),
                power_scale: cfg.power_scale,
                max_power: cfg.max_power,
                min_shot_drag: cfg.min_shot_drag,
                speed_per_power: cfg.shot_speed_per_power,
                nudge_speed_per_px: cfg.nudge_speed_per_px,
                nudge_max_speed: cfg.nudge_max_speed,
                drag_margin: cfg.drag_margin,
                placement: cfg.placement,
                max_shot_seconds: cfg.max_shot_seconds,
            },
        }
    }

    pub fn state(&self) -> ShotState {
        self.state
    }

    pub fn power(&self) -> f32 {
        self.power
    }

    pub fn max_power(&self) -> f32 {
        self.params.max_power
    }

    pub fn is_resolving(&self) -> bool {
        matches!(self.state, ShotState::Resolving { .. })
    }

    pub fn is_idle(&self) -> bool {
        self.state == ShotState::Idle
    }

    pub fn pointer_down(
        &mut self,
        ctx: &mut EngineContext,
        cue: EntityId,
        p: Vec2,
        cue_in_play: &mut bool,
    ) -> ShotAction {
        if self.is_resolving() || !*cue_in_play {
            return ShotAction::Ignored;
        }
        let Some(cue_pos) = ctx.scene.get(cue).map(|e| e.pos) else {
            log::warn!("pointer_down: cue ball {:?} not in scene", cue);
            return ShotAction::Ignored;
        };

        if cue_pos.distance(p) < self.params.ball_radius {
            self.state = ShotState::DraggingCueBall;
            return ShotAction::PickedUp;
        }

        // A light tap toward the cue ball's side away from the pointer.
        let offset = cue_pos - p;
        let speed = (offset.length() * self.params.nudge_speed_per_px).min(self.params.nudge_max_speed);
        let impulse = offset.normalize_or_zero() * speed * ctx.mass(cue);
        ctx.apply_impulse(cue, impulse);

        *cue_in_play = false;
        self.power = 0.0;
        self.state = ShotState::Aiming { drag_start: p, pointer: p };
        ShotAction::Nudged(impulse)
    }

    pub fn pointer_move(
        &mut self,
        ctx: &mut EngineContext,
        cue: EntityId,
        table: &TableLayout,
        p: Vec2,
        cue_in_play: bool,
    ) -> ShotAction {
        match self.state {
            ShotState::DraggingCueBall if cue_in_play => {
                let pos = self.placement_for(table, p);
                place(ctx, cue, pos);
                ShotAction::Moved(pos)
            }
            ShotState::Aiming { drag_start, .. } => {
                self.state = ShotState::Aiming { drag_start, pointer: p };
                self.power = self.power_for(drag_start - p);
                ShotAction::Aiming
            }
            _ => ShotAction::Ignored,
        }
    }

    pub fn pointer_up(
        &mut self,
        ctx: &mut EngineContext,
        cue: EntityId,
        table: &TableLayout,
        p: Vec2,
        cue_in_play: &mut bool,
    ) -> ShotAction {
        match self.state {
            ShotState::DraggingCueBall => {
                self.state = ShotState::Idle;
                if !*cue_in_play {
                    return ShotAction::Ignored;
                }
                let pos = self.placement_for(table, p);
                place(ctx, cue, pos);
                ShotAction::Placed(pos)
            }
            ShotState::Aiming { drag_start, .. } => {
                let drag = drag_start - p;
                if drag.length() < self.params.min_shot_drag {
                    self.state = ShotState::Idle;
                    self.power = 0.0;
                    *cue_in_play = true;
                    return ShotAction::Cancelled;
                }
                self.power = self.power_for(drag);
                let speed = self.power * self.params.speed_per_power;
                let impulse = drag.normalize_or_zero() * speed * ctx.mass(cue);
                ctx.apply_impulse(cue, impulse);
                self.state = ShotState::Resolving { elapsed: 0.0 };
                log::info!("shot: power {:.2}, impulse {:?}", self.power, impulse);
                ShotAction::Struck(impulse)
            }
            ShotState::Idle | ShotState::Resolving { .. } => ShotAction::Ignored,
        }
    }

    /// Advance the settle timeout. Returns `true` once a resolving shot has
    /// run past the limit.
    pub fn tick(&mut self, dt: f32) -> bool {
        if let ShotState::Resolving { elapsed } = &mut self.state {
            *elapsed += dt;
            return *elapsed >= self.params.max_shot_seconds;
        }
        false
    }

    /// The shot is over: back to idle with the meter emptied.
    pub fn finish(&mut self) {
        self.state = ShotState::Idle;
        self.power = 0.0;
    }

    pub fn reset(&mut self) {
        self.finish();
    }

    /// Aim overlay while aiming, from the cue ball's current position.
    pub fn aim_line(&self, cue_pos: Vec2) -> Option<AimLine> {
        let ShotState::Aiming { pointer, .. } = self.state else {
            return None;
        };
        let to_pointer = pointer - cue_pos;
        let dir = to_pointer.normalize_or_zero();
        Some(AimLine {
            cue: cue_pos,
            far: cue_pos + dir * (AIM_LINE_LENGTH + to_pointer.length()),
            pointer,
            guide_end: cue_pos - to_pointer,
        })
    }

    fn power_for(&self, drag: Vec2) -> f32 {
        (drag.length() * self.params.power_scale).clamp(0.0, self.params.max_power)
    }

    fn placement_for(&self, table: &TableLayout, p: Vec2) -> Vec2 {
        let margin = self.params.ball_radius + self.params.drag_margin;
        let pos = table.clamp_to_playable(p, margin);
        let pos = match self.params.placement {
            PlacementRule::Table => pos,
            PlacementRule::D => table.clamp_to_d(pos, 0.0),
        };
        table.clear_of_pockets(pos, self.params.ball_radius)
    }
}

fn place(ctx: &mut EngineContext, cue: EntityId, pos: Vec2) {
    ctx.set_position(cue, pos);
    ctx.set_velocity(cue, Vec2::ZERO);
    ctx.set_angular_velocity(cue, 0.0);
}
