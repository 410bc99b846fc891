pub mod api;
pub mod components;
pub mod core;
pub mod extensions;
pub mod input;
pub mod renderer;
pub mod systems;

// Re-export key types at crate root for convenience
pub use api::game::{EngineContext, Game, GameConfig, RenderContext};
pub use api::types::{EntityId, GameEvent, Rgb};
pub use components::entity::{DiscComponent, Entity};
pub use components::layer::RenderLayer;
pub use crate::core::physics::{
    BodyDesc, BodyType, ColliderDesc, ColliderMaterial, CollisionPair, PhysicsBody, PhysicsWorld,
};
pub use crate::core::scene::Scene;
pub use crate::core::time::SimClock;
pub use input::queue::{InputEvent, InputQueue};
pub use renderer::instance::{RenderBuffer, RenderInstance};
pub use systems::messages::MessageLog;
pub use systems::render::build_render_buffer;

// Extensions: decoupled optional systems
pub use extensions::{ease_vec2, lerp_vec2, Easing, Tween, TweenDone, TweenId, TweenState};
