use glam::Vec2;

use crate::api::types::{EntityId, GameEvent};
use crate::components::entity::Entity;
use crate::core::physics::{BodyDesc, ColliderMaterial, CollisionPair, PhysicsBody, PhysicsWorld};
use crate::core::scene::Scene;
use crate::extensions::tween::{TweenDone, TweenState};
use crate::input::queue::InputQueue;
use crate::renderer::instance::RenderBuffer;
use crate::systems::messages::MessageLog;

/// Configuration for the engine, provided by the game.
#[derive(Debug, Clone)]
pub struct GameConfig {
    /// Fixed timestep in seconds (default: 1/60).
    pub fixed_dt: f32,
    /// World width in game units.
    pub world_width: f32,
    /// World height in game units.
    pub world_height: f32,
    /// Maximum number of render instances (default: 128).
    pub max_instances: usize,
    /// Maximum number of game events per frame (default: 32).
    pub max_events: usize,
    /// Gravity vector. Top-down tables keep the default of zero.
    pub gravity: Vec2,
    /// Physics pipeline steps per fixed tick (default: 1).
    pub physics_substeps: u32,
    /// Most fixed ticks run for one host frame (default: 8).
    pub max_catch_up_steps: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            fixed_dt: 1.0 / 60.0,
            world_width: 800.0,
            world_height: 600.0,
            max_instances: 128,
            max_events: 32,
            gravity: Vec2::ZERO,
            physics_substeps: 1,
            max_catch_up_steps: 8,
        }
    }
}

/// The core contract every game must fulfill.
pub trait Game {
    /// Return engine configuration. Called once before init.
    fn config(&self) -> GameConfig {
        GameConfig::default()
    }

    /// Setup initial state, spawn entities, configure the scene.
    fn init(&mut self, ctx: &mut EngineContext);

    /// One fixed tick. `input` holds everything queued since the last tick.
    fn update(&mut self, ctx: &mut EngineContext, input: &InputQueue);

    /// Optional read-only pass that appends overlay instances after the
    /// scene has been drawn into the buffer.
    fn render(&self, _ctx: &mut RenderContext) {}
}

/// Mutable access to engine state, passed to Game::init and Game::update.
pub struct EngineContext {
    pub scene: Scene,
    pub physics: PhysicsWorld,
    pub tweens: TweenState,
    pub events: Vec<GameEvent>,
    pub messages: MessageLog,
    next_id: u32,
    dt: f32,
    max_events: usize,
    collision_events: Vec<CollisionPair>,
}

impl EngineContext {
    pub fn new() -> Self {
        Self::from_config(&GameConfig::default())
    }

    pub fn from_config(config: &GameConfig) -> Self {
        let mut physics = PhysicsWorld::new(config.gravity);
        physics.set_dt(config.fixed_dt);
        physics.set_substeps(config.physics_substeps);
        Self {
            scene: Scene::new(),
            physics,
            tweens: TweenState::new(),
            events: Vec::new(),
            messages: MessageLog::default(),
            next_id: 1,
            dt: config.fixed_dt,
            max_events: config.max_events,
            collision_events: Vec::new(),
        }
    }

    /// Length of one fixed tick in seconds.
    pub fn dt(&self) -> f32 {
        self.dt
    }

    /// Generate the next unique entity ID.
    pub fn next_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Emit a game event to be forwarded to the host this frame.
    pub fn emit_event(&mut self, event: GameEvent) {
        if self.events.len() >= self.max_events {
            log::warn!("event buffer full, dropping kind {}", event.kind);
            return;
        }
        self.events.push(event);
    }

    /// Show a status line to the player.
    pub fn post_message(&mut self, text: impl Into<String>) {
        self.messages.post(text);
    }

    /// Clear per-frame transient data. Collision events are owned by
    /// `step_physics` and survive until the next step.
    pub fn clear_frame_data(&mut self) {
        self.events.clear();
    }

    // -- Physics convenience methods --

    fn body_of(&self, id: EntityId) -> Option<PhysicsBody> {
        self.scene.get(id).and_then(|e| e.body)
    }

    /// Spawn an entity with a physics body. Returns the EntityId.
    pub fn spawn_with_body(
        &mut self,
        entity: Entity,
        desc: BodyDesc,
        material: ColliderMaterial,
    ) -> EntityId {
        let id = entity.id;
        let body = self.physics.create_body(id, &desc, material);
        let entity = entity.with_pos(desc.position).with_body(body);
        self.scene.spawn(entity);
        id
    }

    /// Despawn an entity, cleaning up its physics body and tweens.
    /// Returns `false` if the entity did not exist.
    pub fn despawn(&mut self, id: EntityId) -> bool {
        self.tweens.cancel_entity(id);
        match self.scene.despawn(id) {
            Some(entity) => {
                if let Some(body) = &entity.body {
                    self.physics.remove_body(body);
                }
                true
            }
            None => false,
        }
    }

    /// Teleport an entity and its body. The scene copy updates immediately.
    pub fn set_position(&mut self, id: EntityId, pos: Vec2) {
        if let Some(body) = self.body_of(id) {
            self.physics.set_position(&body, pos);
        }
        if let Some(entity) = self.scene.get_mut(id) {
            entity.pos = pos;
        }
    }

    /// Apply an instantaneous impulse to an entity's physics body.
    pub fn apply_impulse(&mut self, id: EntityId, impulse: Vec2) {
        if let Some(body) = self.body_of(id) {
            self.physics.apply_impulse(&body, impulse);
        }
    }

    pub fn set_velocity(&mut self, id: EntityId, vel: Vec2) {
        if let Some(body) = self.body_of(id) {
            self.physics.set_velocity(&body, vel);
        }
    }

    pub fn set_angular_velocity(&mut self, id: EntityId, angvel: f32) {
        if let Some(body) = self.body_of(id) {
            self.physics.set_angular_velocity(&body, angvel);
        }
    }

    pub fn velocity(&self, id: EntityId) -> Vec2 {
        self.body_of(id)
            .map(|body| self.physics.velocity(&body))
            .unwrap_or(Vec2::ZERO)
    }

    pub fn angular_velocity(&self, id: EntityId) -> f32 {
        self.body_of(id)
            .map(|body| self.physics.angular_velocity(&body))
            .unwrap_or(0.0)
    }

    pub fn mass(&self, id: EntityId) -> f32 {
        self.body_of(id)
            .map(|body| self.physics.mass(&body))
            .unwrap_or(0.0)
    }

    pub fn set_collisions_enabled(&mut self, id: EntityId, enabled: bool) {
        if let Some(body) = self.body_of(id) {
            self.physics.set_collisions_enabled(&body, enabled);
        }
    }

    /// Advance tweens by `dt`. Tweened entities drag their bodies along with
    /// zero velocity, so the physics step leaves them where the tween put them.
    pub fn tick_tweens(&mut self, dt: f32) -> Vec<TweenDone> {
        let targets = self.tweens.targets();
        let done = self.tweens.tick(dt, &mut self.scene);
        for id in targets {
            let Some((pos, Some(body))) = self.scene.get(id).map(|e| (e.pos, e.body)) else {
                continue;
            };
            self.physics.set_position(&body, pos);
            self.physics.set_velocity(&body, Vec2::ZERO);
            self.physics.set_angular_velocity(&body, 0.0);
        }
        done
    }

    /// Get collision events from the most recent physics step.
    pub fn collisions(&self) -> &[CollisionPair] {
        &self.collision_events
    }

    /// Step the physics simulation and sync positions back to entities.
    /// Called automatically by the game runner after `Game::update()`.
    pub fn step_physics(&mut self) {
        self.collision_events.clear();
        self.physics.step_into(&mut self.collision_events);

        // Sync Rapier body positions back to entity positions
        for entity in self.scene.iter_mut() {
            if let Some(body) = &entity.body {
                let (pos, rot) = self.physics.body_position(body);
                entity.pos = pos;
                entity.rotation = rot;
            }
        }
    }
}

impl Default for EngineContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Render context for optional custom render commands.
pub struct RenderContext<'a> {
    pub render_buffer: &'a mut RenderBuffer,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::physics::ColliderDesc;
    use crate::extensions::easing::Easing;
    use crate::extensions::tween::Tween;

    fn spawn_ball(ctx: &mut EngineContext, pos: Vec2) -> EntityId {
        let id = ctx.next_id();
        let desc = BodyDesc::dynamic(ColliderDesc::Ball { radius: 10.0 }).with_position(pos);
        ctx.spawn_with_body(Entity::new(id), desc, ColliderMaterial::default())
    }

    #[test]
    fn spawn_with_body_creates_entity_and_physics() {
        let mut ctx = EngineContext::new();
        let id = spawn_ball(&mut ctx, Vec2::new(100.0, 200.0));

        assert_eq!(ctx.scene.len(), 1);
        assert_eq!(ctx.physics.body_count(), 1);
        let e = ctx.scene.get(id).unwrap();
        assert!(e.body.is_some());
        assert_eq!(e.pos, Vec2::new(100.0, 200.0));
    }

    #[test]
    fn despawn_cleans_up_physics_and_tweens() {
        let mut ctx = EngineContext::new();
        let id = spawn_ball(&mut ctx, Vec2::ZERO);
        ctx.tweens.add(id, Tween::position(Vec2::ZERO, Vec2::ONE, 1.0, Easing::Linear));

        assert!(ctx.despawn(id));
        assert!(!ctx.despawn(id));
        assert_eq!(ctx.scene.len(), 0);
        assert_eq!(ctx.physics.body_count(), 0);
        assert!(ctx.tweens.is_empty());
    }

    #[test]
    fn unknown_ids_are_harmless() {
        let mut ctx = EngineContext::new();
        let ghost = EntityId(99);
        ctx.set_position(ghost, Vec2::ONE);
        ctx.set_velocity(ghost, Vec2::ONE);
        ctx.apply_impulse(ghost, Vec2::ONE);
        assert_eq!(ctx.velocity(ghost), Vec2::ZERO);
        assert_eq!(ctx.mass(ghost), 0.0);
    }

    #[test]
    fn step_physics_syncs_positions() {
        let config = GameConfig {
            gravity: Vec2::new(0.0, 100.0),
            ..GameConfig::default()
        };
        let mut ctx = EngineContext::from_config(&config);
        let id = spawn_ball(&mut ctx, Vec2::new(100.0, 0.0));

        for _ in 0..10 {
            ctx.step_physics();
        }

        let entity = ctx.scene.get(id).unwrap();
        assert!(entity.pos.y > 0.0, "Entity should have moved down: y={}", entity.pos.y);
    }

    #[test]
    fn set_position_moves_entity_and_body() {
        let mut ctx = EngineContext::new();
        let id = spawn_ball(&mut ctx, Vec2::new(10.0, 10.0));
        ctx.set_position(id, Vec2::new(250.0, 400.0));

        assert_eq!(ctx.scene.get(id).unwrap().pos, Vec2::new(250.0, 400.0));
        ctx.step_physics();
        let pos = ctx.scene.get(id).unwrap().pos;
        assert!((pos - Vec2::new(250.0, 400.0)).length() < 0.001);
    }

    #[test]
    fn tweened_body_follows_tween() {
        let mut ctx = EngineContext::new();
        let id = spawn_ball(&mut ctx, Vec2::ZERO);
        ctx.set_velocity(id, Vec2::new(500.0, 0.0));
        ctx.tweens.add(
            id,
            Tween::position(Vec2::ZERO, Vec2::new(0.0, 60.0), 1.0, Easing::Linear),
        );

        assert!(ctx.tick_tweens(0.5).is_empty());
        ctx.step_physics();
        let pos = ctx.scene.get(id).unwrap().pos;
        assert!((pos - Vec2::new(0.0, 30.0)).length() < 0.01, "pos = {:?}", pos);
        assert_eq!(ctx.velocity(id), Vec2::ZERO);

        let done = ctx.tick_tweens(0.5);
        assert_eq!(done.len(), 1);
        assert_eq!(done[0].entity, id);
    }

    #[test]
    fn events_are_capped_per_frame() {
        let config = GameConfig {
            max_events: 2,
            ..GameConfig::default()
        };
        let mut ctx = EngineContext::from_config(&config);
        for k in 0..5 {
            ctx.emit_event(GameEvent::new(k as f32, 0.0));
        }
        assert_eq!(ctx.events.len(), 2);
        ctx.clear_frame_data();
        assert!(ctx.events.is_empty());
    }
}
