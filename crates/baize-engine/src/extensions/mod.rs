// extensions/mod.rs
//
// Optional extension modules. These are decoupled from core Entity/Scene:
// games opt in through `EngineContext::tweens`.

pub mod easing;
pub mod tween;

pub use easing::{ease_vec2, lerp_vec2, Easing};
pub use tween::{Tween, TweenDone, TweenId, TweenState};
