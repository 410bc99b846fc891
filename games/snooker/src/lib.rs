use wasm_bindgen::prelude::*;

pub mod balls;
pub mod config;
pub mod error;
pub mod game;
pub mod pots;
pub mod rack;
pub mod registry;
pub mod shot;
pub mod table;
pub mod turn;

use config::SnookerConfig;
use game::SnookerGame;

baize_web::export_game!(SnookerGame, "snooker");

// ---- Snooker-specific exports ----

/// Validate the two names and start a match. Errors come back as the
/// message to show next to the name form.
#[wasm_bindgen]
pub fn snooker_start_match(first: &str, second: &str) -> Result<(), JsValue> {
    with_runner(|r| {
        let (game, ctx) = r.game_and_context();
        game.start_match(ctx, first, second)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    })
}

/// Stage a JSON config for the next `game_init()`.
#[wasm_bindgen]
pub fn snooker_load_config(json: &str) -> Result<(), JsValue> {
    let config = SnookerConfig::from_json(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
    config::stage(config);
    Ok(())
}

#[wasm_bindgen]
pub fn snooker_seed(seed: u64) {
    with_runner(|r| r.game_and_context().0.reseed(seed));
}

/// Recent status lines, oldest first.
#[wasm_bindgen]
pub fn snooker_messages() -> baize_web::js_sys::Array {
    with_runner(|r| {
        let (_, ctx) = r.game_and_context();
        ctx.messages.history().map(JsValue::from_str).collect()
    })
}

/// `[cue.x, cue.y, far.x, far.y, pointer.x, pointer.y, guide.x, guide.y]`
/// while aiming, otherwise empty.
#[wasm_bindgen]
pub fn snooker_aim_line() -> Vec<f32> {
    with_runner(|r| {
        let (game, ctx) = r.game_and_context();
        game.aim_line(ctx)
            .map(|line| line.to_floats().to_vec())
            .unwrap_or_default()
    })
}

#[wasm_bindgen]
pub fn snooker_turn_label() -> String {
    with_runner(|r| r.game().turn_label())
}

#[wasm_bindgen]
pub fn snooker_power() -> f32 {
    with_runner(|r| r.game().power())
}
