use baize_engine::{
    build_render_buffer, EngineContext, Game, GameConfig, GameEvent, InputEvent, InputQueue,
    RenderBuffer, RenderContext, SimClock,
};

/// Generic game runner that wires up the engine loop.
///
/// Each concrete game creates a `thread_local!` GameRunner and exports free
/// functions via `#[wasm_bindgen]` (see `export_game!`), because wasm-bindgen
/// cannot export generic structs directly.
pub struct GameRunner<G: Game> {
    game: G,
    ctx: EngineContext,
    input: InputQueue,
    render_buffer: RenderBuffer,
    clock: SimClock,
    config: GameConfig,
    initialized: bool,
}

impl<G: Game> GameRunner<G> {
    pub fn new(game: G) -> Self {
        let config = game.config();
        Self {
            ctx: EngineContext::from_config(&config),
            input: InputQueue::new(),
            render_buffer: RenderBuffer::new(config.max_instances),
            clock: SimClock::new(config.fixed_dt, config.max_catch_up_steps),
            game,
            config,
            initialized: false,
        }
    }

    /// Initialize the game. Call once after construction.
    pub fn init(&mut self) {
        self.game.init(&mut self.ctx);
        self.initialized = true;
        self.rebuild_render_buffer();
    }

    /// Push an input event into the queue.
    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// Run one host frame: as many fixed ticks as the clock allows, each
    /// one `Game::update` followed by a physics step, then rebuild the
    /// render buffer.
    ///
    /// Queued input is handed to the first tick only; with zero ticks it
    /// waits for the next frame.
    pub fn tick(&mut self, dt: f32) {
        if !self.initialized {
            return;
        }

        self.ctx.clear_frame_data();

        let steps = self.clock.advance(dt);
        for _ in 0..steps {
            self.game.update(&mut self.ctx, &self.input);
            self.ctx.step_physics();
            self.input.clear();
        }

        self.rebuild_render_buffer();
    }

    fn rebuild_render_buffer(&mut self) {
        build_render_buffer(self.ctx.scene.iter(), &mut self.render_buffer);
        let mut render_ctx = RenderContext {
            render_buffer: &mut self.render_buffer,
        };
        self.game.render(&mut render_ctx);
    }

    /// Split borrow for host calls that reach into game state between frames.
    pub fn game_and_context(&mut self) -> (&mut G, &mut EngineContext) {
        (&mut self.game, &mut self.ctx)
    }

    pub fn game(&self) -> &G {
        &self.game
    }

    /// Messages posted since the last call, oldest first.
    pub fn take_messages(&mut self) -> Vec<String> {
        self.ctx.messages.drain()
    }

    pub fn ticks(&self) -> u64 {
        self.clock.ticks()
    }

    // ---- Accessors for host reads ----

    pub fn instances_ptr(&self) -> *const f32 {
        self.render_buffer.as_floats().as_ptr()
    }

    pub fn instance_floats(&self) -> Vec<f32> {
        self.render_buffer.as_floats().to_vec()
    }

    pub fn instance_count(&self) -> u32 {
        self.render_buffer.instance_count()
    }

    pub fn game_events_ptr(&self) -> *const f32 {
        self.ctx.events.as_ptr() as *const f32
    }

    pub fn game_events_len(&self) -> u32 {
        self.ctx.events.len() as u32
    }

    pub fn game_events(&self) -> &[GameEvent] {
        &self.ctx.events
    }

    pub fn world_width(&self) -> f32 {
        self.config.world_width
    }

    pub fn world_height(&self) -> f32 {
        self.config.world_height
    }

    pub fn max_instances(&self) -> u32 {
        self.config.max_instances as u32
    }

    pub fn max_events(&self) -> u32 {
        self.config.max_events as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use baize_engine::{DiscComponent, Entity, Rgb};
    use glam::Vec2;

    #[derive(Default)]
    struct Counter {
        updates: u32,
        keys_seen: Vec<char>,
    }

    impl Game for Counter {
        fn config(&self) -> GameConfig {
            GameConfig {
                fixed_dt: 0.25,
                max_catch_up_steps: 4,
                ..GameConfig::default()
            }
        }

        fn init(&mut self, ctx: &mut EngineContext) {
            let id = ctx.next_id();
            ctx.scene.spawn(
                Entity::new(id)
                    .with_pos(Vec2::new(1.0, 2.0))
                    .with_disc(DiscComponent::new(3.0, Rgb::WHITE)),
            );
        }

        fn update(&mut self, ctx: &mut EngineContext, input: &InputQueue) {
            self.updates += 1;
            for event in input.iter() {
                if let InputEvent::Key { key } = event {
                    self.keys_seen.push(*key);
                    ctx.post_message(format!("key {}", key));
                }
            }
        }
    }

    #[test]
    fn tick_before_init_does_nothing() {
        let mut runner = GameRunner::new(Counter::default());
        runner.tick(1.0);
        assert_eq!(runner.game().updates, 0);
        assert_eq!(runner.instance_count(), 0);
    }

    #[test]
    fn runs_fixed_steps_and_renders() {
        let mut runner = GameRunner::new(Counter::default());
        runner.init();
        assert_eq!(runner.instance_count(), 1);

        runner.tick(0.5);
        assert_eq!(runner.game().updates, 2);
        assert_eq!(runner.ticks(), 2);
        assert_eq!(&runner.instance_floats()[..3], &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn input_is_delivered_exactly_once() {
        let mut runner = GameRunner::new(Counter::default());
        runner.init();

        runner.push_input(InputEvent::Key { key: '3' });
        runner.tick(0.1); // no fixed step yet: input waits
        assert!(runner.game().keys_seen.is_empty());

        runner.tick(0.9);
        assert_eq!(runner.game().keys_seen, vec!['3']);
        assert_eq!(runner.take_messages(), vec!["key 3".to_string()]);
        assert!(runner.take_messages().is_empty());
    }
}
