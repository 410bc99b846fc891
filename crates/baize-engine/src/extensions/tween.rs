// extensions/tween.rs
//
// Position tweens keyed by EntityId. Each tween is a one-shot task that can
// be cancelled through its handle; completions are reported back to the
// caller instead of being scheduled as callbacks.
//
// Usage:
//   let id = tweens.add(ball, Tween::position(from, to, 1.0, Easing::Linear));
//   for done in tweens.tick(dt, &mut scene) { /* finalise done.entity */ }

use std::collections::HashMap;

use glam::Vec2;

use super::easing::{ease_vec2, Easing};
use crate::api::types::EntityId;
use crate::core::scene::Scene;

/// A single position animation.
#[derive(Debug, Clone)]
pub struct Tween {
    pub from: Vec2,
    pub to: Vec2,
    /// Duration in seconds.
    pub duration: f32,
    pub elapsed: f32,
    pub easing: Easing,
}

impl Tween {
    pub fn position(from: Vec2, to: Vec2, duration: f32, easing: Easing) -> Self {
        Self {
            from,
            to,
            duration,
            elapsed: 0.0,
            easing,
        }
    }

    /// Normalized progress [0, 1].
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            1.0
        } else {
            (self.elapsed / self.duration).clamp(0.0, 1.0)
        }
    }

    pub fn is_complete(&self) -> bool {
        self.elapsed >= self.duration
    }

    fn current(&self) -> Vec2 {
        ease_vec2(self.from, self.to, self.progress(), self.easing)
    }
}

/// Handle to a tween for later reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TweenId(pub u32);

/// A tween that reached its end this tick. The entity sits exactly at `to`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TweenDone {
    pub id: TweenId,
    pub entity: EntityId,
    pub to: Vec2,
}

/// Manages all active tweens.
#[derive(Debug, Default)]
pub struct TweenState {
    tweens: HashMap<TweenId, (EntityId, Tween)>,
    next_id: u32,
}

impl TweenState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tween for an entity. Returns a handle for cancellation.
    pub fn add(&mut self, entity: EntityId, tween: Tween) -> TweenId {
        let id = TweenId(self.next_id);
        self.next_id += 1;
        self.tweens.insert(id, (entity, tween));
        id
    }

    /// Cancel a tween. The entity stays wherever the tween last put it.
    /// Returns the animated entity, or `None` for an unknown or finished handle.
    pub fn cancel(&mut self, id: TweenId) -> Option<EntityId> {
        self.tweens.remove(&id).map(|(entity, _)| entity)
    }

    /// Cancel every tween driving `entity`.
    pub fn cancel_entity(&mut self, entity: EntityId) {
        self.tweens.retain(|_, (e, _)| *e != entity);
    }

    pub fn contains(&self, id: TweenId) -> bool {
        self.tweens.contains_key(&id)
    }

    /// Whether any tween is driving `entity`.
    pub fn is_animating(&self, entity: EntityId) -> bool {
        self.tweens.values().any(|(e, _)| *e == entity)
    }

    pub fn get(&self, id: TweenId) -> Option<&Tween> {
        self.tweens.get(&id).map(|(_, t)| t)
    }

    /// Entities currently driven by a tween.
    pub fn targets(&self) -> Vec<EntityId> {
        let mut ids: Vec<EntityId> = self.tweens.values().map(|(e, _)| *e).collect();
        ids.sort();
        ids.dedup();
        ids
    }

    /// Advance all tweens and write positions into the scene.
    ///
    /// Finished tweens are removed and returned in creation order, so that
    /// simultaneous completions are handled deterministically. A tween whose
    /// entity has left the scene still completes.
    pub fn tick(&mut self, dt: f32, scene: &mut Scene) -> Vec<TweenDone> {
        let mut done = Vec::new();

        for (&id, (entity_id, tween)) in self.tweens.iter_mut() {
            tween.elapsed += dt;

            if let Some(entity) = scene.get_mut(*entity_id) {
                entity.pos = tween.current();
            }

            if tween.is_complete() {
                done.push(TweenDone {
                    id,
                    entity: *entity_id,
                    to: tween.to,
                });
            }
        }

        done.sort_by_key(|d| d.id);
        for d in &done {
            self.tweens.remove(&d.id);
        }
        done
    }

    pub fn len(&self) -> usize {
        self.tweens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tweens.is_empty()
    }

    pub fn clear(&mut self) {
        self.tweens.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::entity::Entity;

    #[test]
    fn tween_position() {
        let mut tweens = TweenState::new();
        let mut scene = Scene::new();
        let id = EntityId(1);

        scene.spawn(Entity::new(id).with_pos(Vec2::ZERO));
        let tid = tweens.add(
            id,
            Tween::position(Vec2::ZERO, Vec2::new(100.0, 0.0), 1.0, Easing::Linear),
        );

        // Tick halfway
        assert!(tweens.tick(0.5, &mut scene).is_empty());
        let e = scene.get(id).unwrap();
        assert!((e.pos.x - 50.0).abs() < 0.01);
        assert!(tweens.is_animating(id));

        // Tick to completion
        let done = tweens.tick(0.5, &mut scene);
        assert_eq!(done.len(), 1);
        assert_eq!(done[0].id, tid);
        assert_eq!(done[0].entity, id);
        let e = scene.get(id).unwrap();
        assert!((e.pos.x - 100.0).abs() < 0.01);

        assert!(tweens.is_empty());
        assert!(!tweens.contains(tid));
    }

    #[test]
    fn cancel_stops_without_completing() {
        let mut tweens = TweenState::new();
        let mut scene = Scene::new();
        let id = EntityId(3);
        scene.spawn(Entity::new(id));

        let tid = tweens.add(
            id,
            Tween::position(Vec2::ZERO, Vec2::new(10.0, 0.0), 1.0, Easing::Linear),
        );
        tweens.tick(0.25, &mut scene);
        assert_eq!(tweens.cancel(tid), Some(id));
        assert_eq!(tweens.cancel(tid), None);

        assert!(tweens.tick(5.0, &mut scene).is_empty());
        let e = scene.get(id).unwrap();
        assert!((e.pos.x - 2.5).abs() < 0.01);
    }

    #[test]
    fn completions_come_in_creation_order() {
        let mut tweens = TweenState::new();
        let mut scene = Scene::new();
        let ids: Vec<TweenId> = (1..=5)
            .map(|i| {
                tweens.add(
                    EntityId(i),
                    Tween::position(Vec2::ZERO, Vec2::ONE, 0.1, Easing::QuadIn),
                )
            })
            .collect();

        let done: Vec<TweenId> = tweens.tick(1.0, &mut scene).iter().map(|d| d.id).collect();
        assert_eq!(done, ids);
    }

    #[test]
    fn cancel_entity_and_targets() {
        let mut tweens = TweenState::new();
        tweens.add(EntityId(2), Tween::position(Vec2::ZERO, Vec2::ONE, 1.0, Easing::Linear));
        tweens.add(EntityId(1), Tween::position(Vec2::ZERO, Vec2::ONE, 1.0, Easing::Linear));
        tweens.add(EntityId(1), Tween::position(Vec2::ONE, Vec2::ZERO, 1.0, Easing::Linear));

        assert_eq!(tweens.targets(), vec![EntityId(1), EntityId(2)]);
        tweens.cancel_entity(EntityId(1));
        assert_eq!(tweens.len(), 1);
        assert_eq!(tweens.targets(), vec![EntityId(2)]);

        tweens.clear();
        assert!(tweens.is_empty());
    }
}
