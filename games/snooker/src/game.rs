//! Snooker game: two players, Rapier2D table physics, pot animations and
//! rest-based turn changes.

use std::collections::VecDeque;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use baize_engine::{
    EngineContext, EntityId, Game, GameConfig, GameEvent, InputEvent, InputQueue, RenderContext,
    RenderInstance,
};

use crate::config::{self, SnookerConfig};
use crate::error::SnookerError;
use crate::pots::PotEngine;
use crate::rack::LayoutMode;
use crate::registry::BallRegistry;
use crate::shot::{AimLine, ShotAction, ShotController};
use crate::table::TableLayout;
use crate::turn::{is_table_at_rest, MatchState, Players, RestDetector};

/// Custom commands from the host UI
pub mod events {
    pub const RESET: u32 = 1;
}

/// Game event kinds to the host
pub mod game_events {
    /// a = active player index
    pub const TURN: f32 = 1.0;
    /// a = power, b = max power
    pub const POWER: f32 = 2.0;
    /// a = 1 when the cue ball is in play
    pub const CUE_IN_PLAY: f32 = 3.0;
    /// a = reds still on the table
    pub const REDS_REMAINING: f32 = 4.0;
    /// a = layout index, b = challenge level
    pub const LAYOUT: f32 = 5.0;
}

pub const RESET_MESSAGE: &str = "Game Reset! Challenge Mode selected.";

/// Last values sent to the host, so events only go out on change.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
struct HudState {
    turn: Option<usize>,
    power: Option<f32>,
    cue_in_play: Option<bool>,
    reds: Option<usize>,
    layout: Option<(u32, u32)>,
}

pub struct SnookerGame {
    config: SnookerConfig,
    table: TableLayout,
    registry: BallRegistry,
    shot: ShotController,
    pots: PotEngine,
    state: MatchState,
    rest: RestDetector,
    rng: Pcg32,
    /// Recent cue ball positions, oldest first.
    trail: VecDeque<Vec2>,
    cue_pos: Option<Vec2>,
    hud: HudState,
}

impl SnookerGame {
    /// Build with the config staged by the host, or the defaults.
    pub fn new() -> Self {
        Self::with_config(config::take_staged().unwrap_or_default())
    }

    pub fn with_config(config: SnookerConfig) -> Self {
        let table = TableLayout::new(&config);
        Self {
            registry: BallRegistry::new(&config, &table),
            shot: ShotController::new(&config),
            pots: PotEngine::new(&config),
            state: MatchState::default(),
            rest: RestDetector::default(),
            rng: Pcg32::seed_from_u64(config.seed),
            trail: VecDeque::with_capacity(config.cue_trail_len),
            cue_pos: None,
            hud: HudState::default(),
            table,
            config,
        }
    }

    pub fn state(&self) -> &MatchState {
        &self.state
    }

    pub fn registry(&self) -> &BallRegistry {
        &self.registry
    }

    pub fn table(&self) -> &TableLayout {
        &self.table
    }

    pub fn shot(&self) -> &ShotController {
        &self.shot
    }

    pub fn power(&self) -> f32 {
        self.shot.power()
    }

    pub fn turn_label(&self) -> String {
        self.state.turn_label()
    }

    pub fn trail(&self) -> impl Iterator<Item = &Vec2> {
        self.trail.iter()
    }

    pub fn aim_line(&self, ctx: &EngineContext) -> Option<AimLine> {
        let cue = self.registry.cue_id()?;
        let pos = ctx.scene.get(cue)?.pos;
        self.shot.aim_line(pos)
    }

    /// Restart the layout generator. Affects the next random rack.
    pub fn reseed(&mut self, seed: u64) {
        self.rng = Pcg32::seed_from_u64(seed);
    }

    /// Validate the names and start a fresh match on the triangle layout.
    /// Invalid names leave everything untouched.
    pub fn start_match(
        &mut self,
        ctx: &mut EngineContext,
        first: &str,
        second: &str,
    ) -> Result<(), SnookerError> {
        let players = Players::new(first, second)?;
        self.state = MatchState {
            players: Some(players),
            ..MatchState::default()
        };
        self.pots.cancel_all(ctx, &mut self.registry);
        self.shot.reset();
        self.rest.reset();
        self.trail.clear();
        self.registry.respawn_cue_ball(ctx, self.table.cue_start());
        self.rack(ctx);
        let label = self.state.turn_label();
        ctx.post_message(label);
        Ok(())
    }

    /// Back to level one of the challenge layout with a clean foul tracker.
    pub fn reset_game(&mut self, ctx: &mut EngineContext) {
        self.state.level = 1;
        self.state.mode = LayoutMode::Challenge;
        self.pots.cancel_all(ctx, &mut self.registry);
        self.shot.reset();
        self.rest.reset();
        self.rack(ctx);
        self.state.cue_in_play = true;
        self.state.last_colored = None;
        ctx.post_message(RESET_MESSAGE);
    }

    pub fn select_layout(&mut self, ctx: &mut EngineContext, mode: LayoutMode) {
        self.state.mode = mode;
        ctx.post_message(mode.selected_message());
        self.pots.cancel_all(ctx, &mut self.registry);
        self.rack(ctx);
    }

    fn rack(&mut self, ctx: &mut EngineContext) {
        let (mode, level) = (self.state.mode, self.state.level);
        self.registry
            .spawn_rack(ctx, mode, level, &mut self.rng, &self.table);
    }

    fn cue_id(&mut self, ctx: &mut EngineContext) -> EntityId {
        match self.registry.cue_id() {
            Some(id) if ctx.scene.contains(id) => id,
            _ => self.registry.respawn_cue_ball(ctx, self.table.cue_start()),
        }
    }

    fn handle_input(&mut self, ctx: &mut EngineContext, event: &InputEvent) {
        if !self.state.started() {
            return;
        }
        match *event {
            InputEvent::Key { key } => {
                if let Some(mode) = LayoutMode::from_key(key) {
                    self.select_layout(ctx, mode);
                }
            }
            InputEvent::Command { kind } => match kind {
                events::RESET => self.reset_game(ctx),
                other => log::debug!("unknown command {}", other),
            },
            InputEvent::PointerDown { x, y } => {
                let cue = self.cue_id(ctx);
                self.shot
                    .pointer_down(ctx, cue, Vec2::new(x, y), &mut self.state.cue_in_play);
            }
            InputEvent::PointerMove { x, y } => {
                let cue = self.cue_id(ctx);
                self.shot
                    .pointer_move(ctx, cue, &self.table, Vec2::new(x, y), self.state.cue_in_play);
            }
            InputEvent::PointerUp { x, y } => {
                let cue = self.cue_id(ctx);
                let action = self.shot.pointer_up(
                    ctx,
                    cue,
                    &self.table,
                    Vec2::new(x, y),
                    &mut self.state.cue_in_play,
                );
                if let ShotAction::Placed(_) = action {
                    self.trail.clear();
                }
            }
        }
    }

    fn finish_pot_animations(&mut self, ctx: &mut EngineContext) {
        let done = ctx.tick_tweens(ctx.dt());
        if !self.pots.complete(ctx, &mut self.registry, &done) {
            return;
        }
        if self.state.mode == LayoutMode::Challenge {
            self.state.level += 1;
            log::info!("challenge cleared, level {}", self.state.level);
        } else {
            log::info!("all reds potted, re-racking");
        }
        let (mode, level) = (self.state.mode, self.state.level);
        self.registry
            .spawn_reds(ctx, mode, level, &mut self.rng, &self.table);
    }

    fn report_cue_contacts(&self, ctx: &mut EngineContext) {
        let Some(cue) = self.registry.cue_id() else {
            return;
        };
        let labels: Vec<&'static str> = ctx
            .collisions()
            .iter()
            .filter(|pair| pair.started)
            .filter_map(|pair| pair.other(cue))
            .filter_map(|other| self.registry.kind_of(other))
            .map(|kind| kind.contact_label())
            .collect();
        for label in labels {
            ctx.post_message(format!("Cue ball collided with {}", label));
        }
    }

    /// Hand the turn over once the table settles after a shot, or stop
    /// everything if it never does.
    fn advance_turn(&mut self, ctx: &mut EngineContext) {
        let timed_out = self.shot.tick(ctx.dt());
        let waiting = self.shot.is_resolving() || (self.shot.is_idle() && !self.state.cue_in_play);
        if !waiting {
            self.rest.reset();
            return;
        }

        if timed_out {
            log::warn!(
                "shot still moving after {}s, stopping all balls",
                self.config.max_shot_seconds
            );
            let ids: Vec<_> = self.registry.balls().filter(|b| !b.pocketed).map(|b| b.id).collect();
            for id in ids {
                ctx.set_velocity(id, Vec2::ZERO);
                ctx.set_angular_velocity(id, 0.0);
            }
        } else {
            let at_rest = !self.pots.has_pending()
                && is_table_at_rest(ctx, &self.registry, self.config.rest_speed);
            if !self.rest.observe(at_rest) {
                return;
            }
        }

        let label = self.state.end_turn();
        self.shot.finish();
        self.rest.reset();
        if !label.is_empty() {
            ctx.post_message(label);
        }
    }

    fn track_cue_trail(&mut self, ctx: &EngineContext) {
        self.cue_pos = self
            .registry
            .cue_id()
            .and_then(|id| ctx.scene.get(id))
            .map(|e| e.pos);
        let Some(pos) = self.cue_pos else {
            return;
        };
        if self.trail.back().is_some_and(|last| last.distance(pos) < 0.5) {
            return;
        }
        self.trail.push_back(pos);
        while self.trail.len() > self.config.cue_trail_len {
            self.trail.pop_front();
        }
    }

    fn emit_hud_events(&mut self, ctx: &mut EngineContext) {
        let now = HudState {
            turn: self.state.started().then_some(self.state.active),
            power: Some(self.shot.power()),
            cue_in_play: Some(self.state.cue_in_play),
            reds: Some(self.registry.active_red_count()),
            layout: Some((self.state.mode.index(), self.state.level)),
        };
        if now.turn != self.hud.turn {
            if let Some(active) = now.turn {
                ctx.emit_event(GameEvent::new(game_events::TURN, active as f32));
            }
        }
        if now.power != self.hud.power {
            ctx.emit_event(
                GameEvent::new(game_events::POWER, self.shot.power()).with_b(self.shot.max_power()),
            );
        }
        if now.cue_in_play != self.hud.cue_in_play {
            let flag = if self.state.cue_in_play { 1.0 } else { 0.0 };
            ctx.emit_event(GameEvent::new(game_events::CUE_IN_PLAY, flag));
        }
        if now.reds != self.hud.reds {
            ctx.emit_event(GameEvent::new(
                game_events::REDS_REMAINING,
                self.registry.active_red_count() as f32,
            ));
        }
        if now.layout != self.hud.layout {
            ctx.emit_event(
                GameEvent::new(game_events::LAYOUT, self.state.mode.index() as f32)
                    .with_b(self.state.level as f32),
            );
        }
        self.hud = now;
    }
}

impl Default for SnookerGame {
    fn default() -> Self {
        Self::new()
    }
}

impl Game for SnookerGame {
    fn config(&self) -> GameConfig {
        GameConfig {
            fixed_dt: 1.0 / 60.0,
            world_width: self.config.canvas_width,
            world_height: self.config.canvas_height,
            max_instances: 256 + self.config.cue_trail_len,
            max_events: 32,
            physics_substeps: self.config.physics_substeps,
            ..GameConfig::default()
        }
    }

    fn init(&mut self, ctx: &mut EngineContext) {
        for (id, kind) in self.table.spawn_bodies(ctx, &self.config) {
            self.registry.register_fixture(id, kind);
        }
        self.registry.respawn_cue_ball(ctx, self.table.cue_start());
        self.rack(ctx);
        log::info!("snooker: table ready, waiting for players");
    }

    fn update(&mut self, ctx: &mut EngineContext, input: &InputQueue) {
        for event in input.iter() {
            self.handle_input(ctx, event);
        }

        self.finish_pot_animations(ctx);
        self.report_cue_contacts(ctx);
        self.pots
            .detect(ctx, &mut self.registry, &self.table, &mut self.state);
        self.pots
            .check_escaped(ctx, &mut self.registry, &self.table, &mut self.state);
        self.advance_turn(ctx);
        self.track_cue_trail(ctx);
        self.emit_hud_events(ctx);
    }

    /// Flame trail behind the cue ball: red at the tail, yellow at the head.
    fn render(&self, ctx: &mut RenderContext) {
        let n = self.trail.len();
        if n == 0 {
            return;
        }
        let radius = self.registry.ball_radius();
        for (i, pos) in self.trail.iter().enumerate() {
            if self.cue_pos.is_some_and(|cue| cue.distance(*pos) < radius) {
                continue;
            }
            let t = (i + 1) as f32 / n as f32;
            let instance = RenderInstance {
                x: pos.x,
                y: pos.y,
                radius: radius * (0.3 + 0.5 * t),
                rotation: 0.0,
                r: 1.0,
                g: t,
                b: 0.0,
                alpha: 0.6 * t,
            };
            if !ctx.render_buffer.push(instance) {
                break;
            }
        }
    }
}
