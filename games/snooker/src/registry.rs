//! Ball registry: which entity is which ball, plus every spawn, removal and
//! reset the rules perform on balls.

use std::collections::HashMap;

use glam::Vec2;
use rand::Rng;

use baize_engine::{
    BodyDesc, ColliderDesc, ColliderMaterial, DiscComponent, EngineContext, Entity, EntityId,
    RenderLayer,
};

use crate::balls::{BallKind, BodyKind, ColorSlot};
use crate::config::SnookerConfig;
use crate::rack::{self, LayoutMode};
use crate::table::{Rect, TableLayout};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ball {
    pub id: EntityId,
    pub kind: BallKind,
    /// Set from the moment a pot is detected until the ball is reset or removed.
    pub pocketed: bool,
}

/// Read-only view of one ball for renderers and tests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BallSnapshot {
    pub id: EntityId,
    pub kind: BallKind,
    pub pos: Vec2,
    pub vel: Vec2,
    pub pocketed: bool,
}

/// Physical properties shared by every ball.
#[derive(Debug, Clone, Copy)]
struct BallSpec {
    radius: f32,
    linear_damping: f32,
    angular_damping: f32,
    material: ColliderMaterial,
    retries: u32,
}

pub struct BallRegistry {
    cue: Option<Ball>,
    reds: Vec<Ball>,
    /// Indexed by slot order once a rack has been spawned.
    coloreds: Vec<Ball>,
    kinds: HashMap<EntityId, BodyKind>,
    slots: [Vec2; 6],
    spec: BallSpec,
}

impl BallRegistry {
    pub fn new(cfg: &SnookerConfig, table: &TableLayout) -> Self {
        Self {
            cue: None,
            reds: Vec::with_capacity(rack::RED_COUNT),
            coloreds: Vec::with_capacity(6),
            kinds: HashMap::new(),
            slots: *table.colored_slots(),
            spec: BallSpec {
                radius: cfg.ball_radius(),
                linear_damping: cfg.linear_damping,
                angular_damping: cfg.angular_damping,
                material: ColliderMaterial {
                    restitution: cfg.restitution,
                    friction: cfg.friction,
                    density: cfg.density,
                },
                retries: cfg.placement_retries,
            },
        }
    }

    /// Record the tag of a rail or pocket body.
    pub fn register_fixture(&mut self, id: EntityId, kind: BodyKind) {
        self.kinds.insert(id, kind);
    }

    pub fn kind_of(&self, id: EntityId) -> Option<BodyKind> {
        self.kinds.get(&id).copied()
    }

    pub fn ball_radius(&self) -> f32 {
        self.spec.radius
    }

    pub fn cue_ball(&self) -> Option<&Ball> {
        self.cue.as_ref()
    }

    pub fn cue_id(&self) -> Option<EntityId> {
        self.cue.map(|b| b.id)
    }

    pub fn reds(&self) -> &[Ball] {
        &self.reds
    }

    pub fn coloreds(&self) -> &[Ball] {
        &self.coloreds
    }

    /// Reds still on the table (pocketed reds mid-animation excluded).
    pub fn active_red_count(&self) -> usize {
        self.reds.iter().filter(|b| !b.pocketed).count()
    }

    pub fn slot_position(&self, slot: ColorSlot) -> Vec2 {
        self.slots[slot.index()]
    }

    /// Every ball: reds, then coloreds, then the cue ball.
    pub fn balls(&self) -> impl Iterator<Item = &Ball> {
        self.reds.iter().chain(self.coloreds.iter()).chain(self.cue.iter())
    }

    pub fn ball(&self, id: EntityId) -> Option<&Ball> {
        self.balls().find(|b| b.id == id)
    }

    pub fn ball_mut(&mut self, id: EntityId) -> Option<&mut Ball> {
        self.reds
            .iter_mut()
            .chain(self.coloreds.iter_mut())
            .chain(self.cue.iter_mut())
            .find(|b| b.id == id)
    }

    pub fn snapshot(&self, ctx: &EngineContext) -> Vec<BallSnapshot> {
        self.balls()
            .map(|b| BallSnapshot {
                id: b.id,
                kind: b.kind,
                pos: ctx.scene.get(b.id).map(|e| e.pos).unwrap_or_default(),
                vel: ctx.velocity(b.id),
                pocketed: b.pocketed,
            })
            .collect()
    }

    fn spawn_ball(&mut self, ctx: &mut EngineContext, kind: BallKind, pos: Vec2) -> Ball {
        let id = ctx.next_id();
        let entity = Entity::new(id)
            .with_layer(RenderLayer::Balls)
            .with_disc(DiscComponent::new(self.spec.radius, kind.color()));
        let desc = BodyDesc::dynamic(ColliderDesc::Ball { radius: self.spec.radius })
            .with_position(pos)
            .with_linear_damping(self.spec.linear_damping)
            .with_angular_damping(self.spec.angular_damping)
            .with_ccd(true);
        ctx.spawn_with_body(entity, desc, self.spec.material);
        self.kinds.insert(id, BodyKind::Ball(kind));
        Ball { id, kind, pocketed: false }
    }

    fn despawn_ball(&mut self, ctx: &mut EngineContext, id: EntityId) {
        self.kinds.remove(&id);
        if !ctx.despawn(id) {
            log::warn!("ball {:?} was already gone from the scene", id);
        }
    }

    /// Clear and repopulate the table for `mode`.
    ///
    /// Reds are always replaced. Colored balls are replaced too, except in
    /// straight-line mode where they keep their current positions (they are
    /// only created if missing).
    pub fn spawn_rack<R: Rng>(
        &mut self,
        ctx: &mut EngineContext,
        mode: LayoutMode,
        level: u32,
        rng: &mut R,
        table: &TableLayout,
    ) {
        for red in std::mem::take(&mut self.reds) {
            self.despawn_ball(ctx, red.id);
        }

        if !mode.keeps_colored() || self.coloreds.is_empty() {
            for ball in std::mem::take(&mut self.coloreds) {
                self.despawn_ball(ctx, ball.id);
            }
            let positions: Vec<Vec2> = if mode == LayoutMode::RandomAll {
                let mut occupied = pocket_positions(table);
                occupied.extend(self.cue_position(ctx));
                rack::random_positions(
                    rng,
                    self.spawn_area(table),
                    6,
                    self.spec.radius * 2.0,
                    &occupied,
                    self.spec.retries,
                )
            } else {
                self.slots.to_vec()
            };
            for (slot, pos) in ColorSlot::ALL.into_iter().zip(positions) {
                let ball = self.spawn_ball(ctx, BallKind::Colored(slot), pos);
                self.coloreds.push(ball);
            }
        }

        self.spawn_reds(ctx, mode, level, rng, table);
        log::info!(
            "rack: {} with {} reds and {} colored",
            mode.label(),
            self.reds.len(),
            self.coloreds.len()
        );
    }

    /// Add a red rack for `mode` without touching anything else.
    pub fn spawn_reds<R: Rng>(
        &mut self,
        ctx: &mut EngineContext,
        mode: LayoutMode,
        level: u32,
        rng: &mut R,
        table: &TableLayout,
    ) {
        let diameter = self.spec.radius * 2.0;
        let count = mode.red_count(level);
        let positions = match mode {
            LayoutMode::Triangle => rack::triangle(table.rack_apex(), diameter),
            LayoutMode::StraightLine => rack::straight_line(table.line_start(), diameter, count),
            LayoutMode::RandomAll | LayoutMode::RandomReds | LayoutMode::Challenge => {
                let mut occupied = pocket_positions(table);
                occupied.extend(
                    self.balls()
                        .filter(|b| !b.pocketed)
                        .filter_map(|b| ctx.scene.get(b.id).map(|e| e.pos)),
                );
                rack::random_positions(
                    rng,
                    self.spawn_area(table),
                    count,
                    diameter,
                    &occupied,
                    self.spec.retries,
                )
            }
        };
        for pos in positions {
            let ball = self.spawn_ball(ctx, BallKind::Red, pos);
            self.reds.push(ball);
        }
    }

    fn spawn_area(&self, table: &TableLayout) -> Rect {
        table.playable_rect().inset(self.spec.radius)
    }

    fn cue_position(&self, ctx: &EngineContext) -> Option<Vec2> {
        self.cue_id().and_then(|id| ctx.scene.get(id)).map(|e| e.pos)
    }

    /// Delete a red for good. Returns `false` for an id that is not a red.
    pub fn remove_red(&mut self, ctx: &mut EngineContext, id: EntityId) -> bool {
        let Some(index) = self.reds.iter().position(|b| b.id == id) else {
            log::warn!("remove_red: {:?} is not a red on the table", id);
            return false;
        };
        self.reds.remove(index);
        self.despawn_ball(ctx, id);
        true
    }

    /// Put a colored ball back on its slot, at rest and collidable again.
    pub fn reset_colored_to_slot(&mut self, ctx: &mut EngineContext, id: EntityId) -> bool {
        let Some(ball) = self.coloreds.iter_mut().find(|b| b.id == id) else {
            log::warn!("reset_colored_to_slot: {:?} is not a colored ball", id);
            return false;
        };
        let BallKind::Colored(slot) = ball.kind else {
            return false;
        };
        ball.pocketed = false;
        let pos = self.slots[slot.index()];
        settle_at(ctx, id, pos);
        true
    }

    /// Move the cue ball to `pos` at rest, creating it if it does not exist.
    pub fn respawn_cue_ball(&mut self, ctx: &mut EngineContext, pos: Vec2) -> EntityId {
        if let Some(cue) = self.cue.as_mut() {
            if ctx.scene.contains(cue.id) {
                cue.pocketed = false;
                let id = cue.id;
                settle_at(ctx, id, pos);
                return id;
            }
            log::warn!("cue ball {:?} missing from the scene, recreating", cue.id);
            self.kinds.remove(&cue.id);
        }
        let ball = self.spawn_ball(ctx, BallKind::Cue, pos);
        self.cue = Some(ball);
        ball.id
    }
}

/// Random spots keep a ball's width away from the pockets so a fresh
/// rack never starts inside one.
fn pocket_positions(table: &TableLayout) -> Vec<Vec2> {
    table.pockets().iter().map(|p| p.pos).collect()
}

/// Teleport to `pos` with zero linear and angular velocity, collisions on,
/// back on the ball layer.
fn settle_at(ctx: &mut EngineContext, id: EntityId, pos: Vec2) {
    ctx.tweens.cancel_entity(id);
    ctx.set_position(id, pos);
    ctx.set_velocity(id, Vec2::ZERO);
    ctx.set_angular_velocity(id, 0.0);
    ctx.set_collisions_enabled(id, true);
    if let Some(entity) = ctx.scene.get_mut(id) {
        entity.layer = RenderLayer::Balls;
    }
}
