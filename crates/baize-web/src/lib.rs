pub mod runner;

pub use baize_engine as engine;
pub use console_error_panic_hook;
pub use console_log;
pub use js_sys;
pub use log;
pub use runner::GameRunner;
pub use web_sys;

/// Generate the `#[wasm_bindgen]` exports for a game.
///
/// Generates:
/// - `thread_local!` storage for the GameRunner
/// - a `with_runner()` helper that game crates can reuse for their own exports
/// - init, tick, input and data accessor exports
///
/// # Usage
///
/// ```ignore
/// use wasm_bindgen::prelude::*;
///
/// mod game;
/// use game::MyGame;
///
/// baize_web::export_game!(MyGame, "my-game");
/// ```
///
/// The game type must provide `fn new() -> Self`. The calling crate needs
/// `wasm-bindgen` as a dependency; logging and the panic hook come through
/// this crate.
#[macro_export]
macro_rules! export_game {
    ($game_type:ty, $game_name:literal) => {
        use std::cell::RefCell;

        thread_local! {
            static RUNNER: RefCell<Option<$crate::GameRunner<$game_type>>> = RefCell::new(None);
        }

        fn with_runner<R>(f: impl FnOnce(&mut $crate::GameRunner<$game_type>) -> R) -> R {
            RUNNER.with(|cell| {
                let mut borrow = cell.borrow_mut();
                let runner = borrow.as_mut().expect("Game not initialized. Call game_init() first.");
                f(runner)
            })
        }

        #[wasm_bindgen]
        pub fn game_init() {
            $crate::console_error_panic_hook::set_once();
            if $crate::console_log::init_with_level($crate::log::Level::Info).is_err() {
                $crate::web_sys::console::warn_1(&"logger already initialized".into());
            }

            let game = <$game_type>::new();
            let runner = $crate::GameRunner::new(game);

            RUNNER.with(|cell| {
                *cell.borrow_mut() = Some(runner);
            });

            with_runner(|r| r.init());
            $crate::log::info!("{}: initialized", $game_name);
        }

        #[wasm_bindgen]
        pub fn game_tick(dt: f32) {
            with_runner(|r| r.tick(dt));
        }

        #[wasm_bindgen]
        pub fn game_pointer_down(x: f32, y: f32) {
            with_runner(|r| r.push_input($crate::engine::InputEvent::PointerDown { x, y }));
        }

        #[wasm_bindgen]
        pub fn game_pointer_up(x: f32, y: f32) {
            with_runner(|r| r.push_input($crate::engine::InputEvent::PointerUp { x, y }));
        }

        #[wasm_bindgen]
        pub fn game_pointer_move(x: f32, y: f32) {
            with_runner(|r| r.push_input($crate::engine::InputEvent::PointerMove { x, y }));
        }

        /// `key` is a `KeyboardEvent.key` string; only single characters are forwarded.
        #[wasm_bindgen]
        pub fn game_key(key: &str) {
            let mut chars = key.chars();
            if let (Some(key), None) = (chars.next(), chars.next()) {
                with_runner(|r| r.push_input($crate::engine::InputEvent::Key { key }));
            }
        }

        #[wasm_bindgen]
        pub fn game_command(kind: u32) {
            with_runner(|r| r.push_input($crate::engine::InputEvent::Command { kind }));
        }

        // ---- Data accessors ----

        #[wasm_bindgen]
        pub fn get_instances_ptr() -> *const f32 {
            with_runner(|r| r.instances_ptr())
        }

        #[wasm_bindgen]
        pub fn get_instances() -> Vec<f32> {
            with_runner(|r| r.instance_floats())
        }

        /// Status messages posted since the last call, as a JS array of strings.
        #[wasm_bindgen]
        pub fn game_take_messages() -> $crate::js_sys::Array {
            with_runner(|r| {
                r.take_messages()
                    .into_iter()
                    .map(|m| wasm_bindgen::JsValue::from_str(&m))
                    .collect()
            })
        }

        #[wasm_bindgen]
        pub fn get_instance_count() -> u32 {
            with_runner(|r| r.instance_count())
        }

        #[wasm_bindgen]
        pub fn get_game_events_ptr() -> *const f32 {
            with_runner(|r| r.game_events_ptr())
        }

        #[wasm_bindgen]
        pub fn get_game_events_len() -> u32 {
            with_runner(|r| r.game_events_len())
        }

        #[wasm_bindgen]
        pub fn get_world_width() -> f32 {
            with_runner(|r| r.world_width())
        }

        #[wasm_bindgen]
        pub fn get_world_height() -> f32 {
            with_runner(|r| r.world_height())
        }

        #[wasm_bindgen]
        pub fn get_max_instances() -> u32 {
            with_runner(|r| r.max_instances())
        }

        #[wasm_bindgen]
        pub fn get_max_events() -> u32 {
            with_runner(|r| r.max_events())
        }
    };
}
