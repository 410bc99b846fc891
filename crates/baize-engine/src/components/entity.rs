use glam::Vec2;

use crate::api::types::{EntityId, Rgb};
use crate::components::layer::RenderLayer;
use crate::core::physics::PhysicsBody;

/// A filled circle drawn at the entity position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiscComponent {
    pub radius: f32,
    pub color: Rgb,
    pub alpha: f32,
}

impl DiscComponent {
    pub fn new(radius: f32, color: Rgb) -> Self {
        Self { radius, color, alpha: 1.0 }
    }
}

/// Fat Entity: one struct with optional components.
#[derive(Debug, Clone)]
pub struct Entity {
    pub id: EntityId,
    /// Inactive entities are skipped by the render pass.
    pub active: bool,
    /// Position in world space (mirrors the physics body after each step).
    pub pos: Vec2,
    /// Rotation in radians.
    pub rotation: f32,
    pub layer: RenderLayer,
    /// Entities without a disc are invisible (rails, pocket sensors).
    pub disc: Option<DiscComponent>,
    pub body: Option<PhysicsBody>,
}

impl Entity {
    /// Create a new entity with the given ID at the origin.
    pub fn new(id: EntityId) -> Self {
        Self {
            id,
            active: true,
            pos: Vec2::ZERO,
            rotation: 0.0,
            layer: RenderLayer::default(),
            disc: None,
            body: None,
        }
    }

    // -- Builder pattern --

    pub fn with_pos(mut self, pos: Vec2) -> Self {
        self.pos = pos;
        self
    }

    pub fn with_layer(mut self, layer: RenderLayer) -> Self {
        self.layer = layer;
        self
    }

    pub fn with_disc(mut self, disc: DiscComponent) -> Self {
        self.disc = Some(disc);
        self
    }

    pub fn with_body(mut self, body: PhysicsBody) -> Self {
        self.body = Some(body);
        self
    }
}
