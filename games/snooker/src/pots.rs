//! Pot resolution: spotting balls that reached a pocket (or left the
//! table), the consecutive-colour foul, and the animations that carry
//! potted balls into the pocket before they are reset or removed.

use glam::Vec2;

use baize_engine::{Easing, EngineContext, EntityId, RenderLayer, Tween, TweenDone, TweenId};

use crate::balls::{BallKind, ColorSlot};
use crate::config::{FoulPolicy, SnookerConfig};
use crate::registry::BallRegistry;
use crate::table::TableLayout;
use crate::turn::MatchState;

pub const FOUL_MESSAGE: &str = "Error: Consecutive colored balls of the same type potted.";
pub const CUE_RESPOT_MESSAGE: &str = "Cue Ball is in Play";

/// Update the last-colour tracker for a pot of `kind`. Returns `true` when
/// the pot repeats the previous colored ball.
pub fn check_and_update_consecutive(
    last: &mut Option<ColorSlot>,
    kind: BallKind,
    policy: FoulPolicy,
) -> bool {
    match kind {
        BallKind::Colored(slot) => {
            let foul = *last == Some(slot);
            *last = Some(slot);
            foul
        }
        BallKind::Red => {
            if policy == FoulPolicy::ResetOnRed {
                *last = None;
            }
            false
        }
        BallKind::Cue => false,
    }
}

/// A potted ball travelling to its pocket.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PotAnimation {
    pub tween: TweenId,
    pub ball: EntityId,
    pub kind: BallKind,
    pub pocket: usize,
}

/// One ball that went down this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pot {
    pub ball: EntityId,
    pub kind: BallKind,
    pub pocket: usize,
    pub foul: bool,
}

#[derive(Debug, Clone)]
pub struct PotEngine {
    pending: Vec<PotAnimation>,
    duration: f32,
    easing: Easing,
    policy: FoulPolicy,
}

impl PotEngine {
    pub fn new(cfg: &SnookerConfig) -> Self {
        Self {
            pending: Vec::new(),
            duration: cfg.pot_animation_seconds,
            easing: cfg.pot_easing.easing(),
            policy: cfg.foul_policy,
        }
    }

    pub fn pending(&self) -> &[PotAnimation] {
        &self.pending
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Check every ball against every pocket: reds, then coloreds, then the
    /// cue ball, pockets in creation order. The first pocket in reach wins.
    pub fn detect(
        &mut self,
        ctx: &mut EngineContext,
        registry: &mut BallRegistry,
        table: &TableLayout,
        state: &mut MatchState,
    ) -> Vec<Pot> {
        let mut hits = Vec::new();
        for ball in registry.balls().filter(|b| !b.pocketed) {
            let Some(pos) = ctx.scene.get(ball.id).map(|e| e.pos) else {
                continue;
            };
            if let Some(pocket) = table.pockets().iter().find(|p| p.pos.distance(pos) < p.radius) {
                hits.push((ball.id, ball.kind, pocket.index));
            }
        }

        hits.into_iter()
            .map(|(id, kind, pocket)| self.dispatch(ctx, registry, table, state, id, kind, pocket))
            .collect()
    }

    /// Balls that jumped the rails count as potted: the cue ball is
    /// re-spotted and any other ball goes into the nearest pocket.
    pub fn check_escaped(
        &mut self,
        ctx: &mut EngineContext,
        registry: &mut BallRegistry,
        table: &TableLayout,
        state: &mut MatchState,
    ) -> Vec<Pot> {
        let bounds = table.escape_bounds();
        let mut escaped = Vec::new();
        for ball in registry.balls().filter(|b| !b.pocketed) {
            let Some(pos) = ctx.scene.get(ball.id).map(|e| e.pos) else {
                continue;
            };
            if !bounds.contains(pos) {
                let pocket = table.nearest_pocket(pos).index;
                log::warn!("{} ball escaped at {:?}, potting into pocket {}", ball.kind.name(), pos, pocket);
                escaped.push((ball.id, ball.kind, pocket));
            }
        }

        escaped
            .into_iter()
            .map(|(id, kind, pocket)| self.dispatch(ctx, registry, table, state, id, kind, pocket))
            .collect()
    }

    #[allow(clippy::too_many_arguments)]
    fn dispatch(
        &mut self,
        ctx: &mut EngineContext,
        registry: &mut BallRegistry,
        table: &TableLayout,
        state: &mut MatchState,
        id: EntityId,
        kind: BallKind,
        pocket: usize,
    ) -> Pot {
        if kind == BallKind::Cue {
            state.cue_in_play = false;
            registry.respawn_cue_ball(ctx, table.cue_respot());
            log::info!("cue ball potted in pocket {}", pocket);
            ctx.post_message(CUE_RESPOT_MESSAGE);
            return Pot { ball: id, kind, pocket, foul: false };
        }

        let foul = check_and_update_consecutive(&mut state.last_colored, kind, self.policy);
        if foul {
            log::info!("foul: {} potted twice in a row", kind.name());
            ctx.post_message(FOUL_MESSAGE);
        }

        if let Some(ball) = registry.ball_mut(id) {
            ball.pocketed = true;
        }
        let from = ctx.scene.get(id).map(|e| e.pos).unwrap_or(Vec2::ZERO);
        let to = table.pockets()[pocket].pos;
        ctx.set_velocity(id, Vec2::ZERO);
        ctx.set_angular_velocity(id, 0.0);
        ctx.set_collisions_enabled(id, false);
        if let Some(entity) = ctx.scene.get_mut(id) {
            entity.layer = RenderLayer::Pocketing;
        }
        let tween = ctx.tweens.add(id, Tween::position(from, to, self.duration, self.easing));
        self.pending.push(PotAnimation { tween, ball: id, kind, pocket });
        log::info!("{} potted in pocket {}", kind.name(), pocket);

        Pot { ball: id, kind, pocket, foul }
    }

    /// Finish the animations that completed this tick: colored balls go back
    /// to their slots and reds leave for good. Returns `true` when that
    /// removed the last red.
    pub fn complete(
        &mut self,
        ctx: &mut EngineContext,
        registry: &mut BallRegistry,
        done: &[TweenDone],
    ) -> bool {
        let mut removed_red = false;
        for d in done {
            let Some(index) = self.pending.iter().position(|a| a.tween == d.id) else {
                continue;
            };
            let anim = self.pending.remove(index);
            if registry.ball(anim.ball).is_none() {
                log::warn!("pot animation finished for {:?}, which is no longer a ball", anim.ball);
                continue;
            }
            match anim.kind {
                BallKind::Colored(_) => {
                    registry.reset_colored_to_slot(ctx, anim.ball);
                }
                BallKind::Red => {
                    removed_red |= registry.remove_red(ctx, anim.ball);
                }
                BallKind::Cue => {}
            }
        }
        removed_red && registry.reds().is_empty()
    }

    /// Stop every running animation and finalise its ball immediately.
    pub fn cancel_all(&mut self, ctx: &mut EngineContext, registry: &mut BallRegistry) {
        for anim in std::mem::take(&mut self.pending) {
            ctx.tweens.cancel(anim.tween);
            if registry.ball(anim.ball).is_none() {
                continue;
            }
            match anim.kind {
                BallKind::Colored(_) => {
                    registry.reset_colored_to_slot(ctx, anim.ball);
                }
                BallKind::Red => {
                    registry.remove_red(ctx, anim.ball);
                }
                BallKind::Cue => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rack::LayoutMode;
    use crate::turn::Players;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    struct Fixture {
        ctx: EngineContext,
        table: TableLayout,
        registry: BallRegistry,
        pots: PotEngine,
        state: MatchState,
    }

    fn fixture_with(cfg: SnookerConfig, mode: LayoutMode, level: u32) -> Fixture {
        let table = TableLayout::new(&cfg);
        let mut registry = BallRegistry::new(&cfg, &table);
        let mut ctx = EngineContext::new();
        let mut rng = Pcg32::seed_from_u64(9);
        registry.respawn_cue_ball(&mut ctx, table.cue_start());
        registry.spawn_rack(&mut ctx, mode, level, &mut rng, &table);
        Fixture {
            ctx,
            table,
            registry,
            pots: PotEngine::new(&cfg),
            state: MatchState {
                players: Some(Players::new("Ann", "Bob").unwrap()),
                ..MatchState::default()
            },
        }
    }

    fn fixture() -> Fixture {
        fixture_with(SnookerConfig::default(), LayoutMode::Triangle, 1)
    }

    impl Fixture {
        fn detect(&mut self) -> Vec<Pot> {
            self.pots.detect(&mut self.ctx, &mut self.registry, &self.table, &mut self.state)
        }

        fn drop_in(&mut self, id: EntityId, pocket: usize) {
            let p = self.table.pockets()[pocket].pos + Vec2::new(3.0, 3.0);
            self.ctx.set_position(id, p);
        }

        /// Run tweens to completion the way the game tick does.
        fn finish_animations(&mut self) -> bool {
            let done = self.ctx.tick_tweens(10.0);
            self.pots.complete(&mut self.ctx, &mut self.registry, &done)
        }

        fn pos(&self, id: EntityId) -> Vec2 {
            self.ctx.scene.get(id).unwrap().pos
        }
    }

    #[test]
    fn tracker_colored_only_policy() {
        let mut last = None;
        let p = FoulPolicy::ColoredOnly;
        assert!(!check_and_update_consecutive(&mut last, BallKind::Colored(ColorSlot::Yellow), p));
        assert!(check_and_update_consecutive(&mut last, BallKind::Colored(ColorSlot::Yellow), p));
        assert!(!check_and_update_consecutive(&mut last, BallKind::Red, p));
        assert!(check_and_update_consecutive(&mut last, BallKind::Colored(ColorSlot::Yellow), p));
        assert!(!check_and_update_consecutive(&mut last, BallKind::Cue, p));
        assert!(!check_and_update_consecutive(&mut last, BallKind::Colored(ColorSlot::Black), p));
    }

    #[test]
    fn tracker_reset_on_red_policy() {
        let mut last = None;
        let p = FoulPolicy::ResetOnRed;
        check_and_update_consecutive(&mut last, BallKind::Colored(ColorSlot::Yellow), p);
        assert!(!check_and_update_consecutive(&mut last, BallKind::Red, p));
        assert_eq!(last, None);
        assert!(!check_and_update_consecutive(&mut last, BallKind::Colored(ColorSlot::Yellow), p));
    }

    #[test]
    fn cue_pot_respots_without_removal() {
        let mut f = fixture();
        let cue = f.registry.cue_id().unwrap();
        f.ctx.set_velocity(cue, Vec2::new(400.0, 0.0));
        f.drop_in(cue, 1);

        let pots = f.detect();
        assert_eq!(pots.len(), 1);
        assert_eq!(pots[0].kind, BallKind::Cue);
        assert!(!f.state.cue_in_play);
        assert_eq!(f.registry.cue_id(), Some(cue));
        assert_eq!(f.pos(cue), f.table.cue_respot());
        assert_eq!(f.ctx.velocity(cue), Vec2::ZERO);
        assert!(!f.registry.cue_ball().unwrap().pocketed);
        assert!(!f.pots.has_pending());
        assert_eq!(f.ctx.messages.latest(), Some(CUE_RESPOT_MESSAGE));
    }

    #[test]
    fn colored_pot_animates_then_returns_to_slot() {
        let mut f = fixture();
        let blue = f.registry.coloreds()[3].id;
        f.drop_in(blue, 4);

        let pots = f.detect();
        assert_eq!(pots, vec![Pot { ball: blue, kind: BallKind::Colored(ColorSlot::Blue), pocket: 4, foul: false }]);
        assert!(f.registry.ball(blue).unwrap().pocketed);
        assert_eq!(f.ctx.scene.get(blue).unwrap().layer, RenderLayer::Pocketing);
        assert_eq!(f.pots.pending().len(), 1);

        // not matched again while animating
        assert!(f.detect().is_empty());

        assert!(!f.finish_animations());
        assert_eq!(f.pos(blue), Vec2::new(600.0, 400.0));
        assert_eq!(f.ctx.velocity(blue), Vec2::ZERO);
        assert_eq!(f.ctx.angular_velocity(blue), 0.0);
        assert!(!f.registry.ball(blue).unwrap().pocketed);
        assert_eq!(f.registry.coloreds().len(), 6);
        assert!(!f.pots.has_pending());
    }

    #[test]
    fn animation_moves_ball_toward_pocket() {
        let mut f = fixture();
        let pink = f.registry.coloreds()[4].id;
        let pocket = f.table.pockets()[1].pos;
        let start = pocket + Vec2::new(-20.0, 5.0);
        f.ctx.set_position(pink, start);
        f.detect();
        f.ctx.tick_tweens(0.5);
        let mid = f.pos(pink);
        assert!(mid.distance(pocket) < start.distance(pocket));
        assert!(mid.distance(pocket) > 0.0);
    }

    #[test]
    fn same_colored_twice_is_a_foul() {
        let mut f = fixture();
        let brown = f.registry.coloreds()[1].id;
        f.drop_in(brown, 0);
        f.detect();
        f.finish_animations();
        assert_ne!(f.ctx.messages.latest(), Some(FOUL_MESSAGE));

        f.drop_in(brown, 2);
        let pots = f.detect();
        assert!(pots[0].foul);
        assert_eq!(f.ctx.messages.latest(), Some(FOUL_MESSAGE));
    }

    #[test]
    fn red_in_between_follows_policy() {
        for (policy, expect_foul) in [(FoulPolicy::ColoredOnly, true), (FoulPolicy::ResetOnRed, false)] {
            let cfg = SnookerConfig { foul_policy: policy, ..SnookerConfig::default() };
            let mut f = fixture_with(cfg, LayoutMode::Triangle, 1);
            let brown = f.registry.coloreds()[1].id;
            let red = f.registry.reds()[0].id;

            f.drop_in(brown, 0);
            f.detect();
            f.finish_animations();
            f.drop_in(red, 1);
            f.detect();
            f.finish_animations();
            f.drop_in(brown, 2);
            let pots = f.detect();
            assert_eq!(pots[0].foul, expect_foul, "{:?}", policy);
        }
    }

    #[test]
    fn red_pot_removes_permanently() {
        let mut f = fixture();
        let red = f.registry.reds()[0].id;
        f.drop_in(red, 3);
        f.detect();
        assert_eq!(f.registry.active_red_count(), 14);
        assert_eq!(f.registry.reds().len(), 15);
        let body = f.ctx.scene.get(red).unwrap().body.unwrap();
        assert!(!f.ctx.physics.collisions_enabled(&body));

        assert!(!f.finish_animations());
        assert_eq!(f.registry.reds().len(), 14);
        assert!(!f.ctx.scene.contains(red));
    }

    #[test]
    fn detection_order_and_first_pocket_wins() {
        let mut f = fixture();
        let red = f.registry.reds()[0].id;
        let green = f.registry.coloreds()[0].id;
        let cue = f.registry.cue_id().unwrap();
        f.drop_in(cue, 0);
        f.drop_in(green, 5);
        f.drop_in(red, 2);
        let kinds: Vec<_> = f.detect().iter().map(|p| p.kind).collect();
        assert_eq!(kinds, vec![BallKind::Red, BallKind::Colored(ColorSlot::Green), BallKind::Cue]);
    }

    #[test]
    fn clearing_the_last_red_is_reported() {
        let mut f = fixture_with(SnookerConfig::default(), LayoutMode::Challenge, 2);
        let reds: Vec<_> = f.registry.reds().iter().map(|b| b.id).collect();
        f.drop_in(reds[0], 0);
        f.detect();
        assert!(!f.finish_animations());
        f.drop_in(reds[1], 1);
        f.detect();
        assert!(f.finish_animations());
        assert!(f.registry.reds().is_empty());
        assert_eq!(f.registry.coloreds().len(), 6);
    }

    #[test]
    fn escaped_balls_are_potted() {
        let mut f = fixture();
        let cue = f.registry.cue_id().unwrap();
        let yellow = f.registry.coloreds()[2].id;
        f.ctx.set_position(cue, Vec2::new(50.0, 400.0));
        f.ctx.set_position(yellow, Vec2::new(1150.0, 700.0));

        let pots = f.pots.check_escaped(&mut f.ctx, &mut f.registry, &f.table, &mut f.state);
        assert_eq!(pots.len(), 2);
        assert_eq!(pots[0].kind, BallKind::Colored(ColorSlot::Yellow));
        assert_eq!(pots[0].pocket, 3);
        assert_eq!(f.pos(cue), f.table.cue_respot());
        assert!(!f.state.cue_in_play);

        f.finish_animations();
        assert_eq!(f.pos(yellow), Vec2::new(350.0, 480.0));
    }

    #[test]
    fn cancel_all_finalises_survivors() {
        let mut f = fixture();
        let red = f.registry.reds()[0].id;
        let pink = f.registry.coloreds()[4].id;
        f.drop_in(red, 0);
        f.drop_in(pink, 1);
        f.detect();
        assert_eq!(f.pots.pending().len(), 2);

        f.pots.cancel_all(&mut f.ctx, &mut f.registry);
        assert!(!f.pots.has_pending());
        assert!(f.ctx.tweens.is_empty());
        assert!(f.registry.ball(red).is_none());
        assert_eq!(f.pos(pink), Vec2::new(730.0, 400.0));
        assert!(!f.registry.ball(pink).unwrap().pocketed);
    }

    #[test]
    fn stale_completion_is_a_no_op() {
        let mut f = fixture();
        let red = f.registry.reds()[0].id;
        f.drop_in(red, 0);
        f.detect();
        // the rack is replaced underneath the animation
        f.registry.remove_red(&mut f.ctx, red);
        let reds = f.registry.reds().len();
        let done = [TweenDone { id: f.pots.pending()[0].tween, entity: red, to: Vec2::ZERO }];
        assert!(!f.pots.complete(&mut f.ctx, &mut f.registry, &done));
        assert_eq!(f.registry.reds().len(), reds);
        assert!(!f.pots.has_pending());

        let unknown = [TweenDone { id: TweenId(999), entity: red, to: Vec2::ZERO }];
        assert!(!f.pots.complete(&mut f.ctx, &mut f.registry, &unknown));
    }
}
