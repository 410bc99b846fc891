//! Table geometry: rails, pockets, baulk line and the D.
//!
//! Everything here is derived once from [`SnookerConfig`] and never changes.
//! With the default config the table spans x 100..1100, y 150..650 on a
//! 1200×900 canvas; the cushion faces sit 10 px inside that.

use glam::Vec2;

use baize_engine::{
    BodyDesc, ColliderDesc, ColliderMaterial, DiscComponent, EngineContext, Entity, EntityId,
    RenderLayer, Rgb,
};

use crate::balls::BodyKind;
use crate::config::SnookerConfig;

/// Axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    pub fn clamp(&self, p: Vec2) -> Vec2 {
        p.clamp(self.min, self.max)
    }

    /// Shrink by `margin` on every side. An over-shrunk rect collapses to its centre.
    pub fn inset(&self, margin: f32) -> Rect {
        let centre = (self.min + self.max) * 0.5;
        let min = (self.min + Vec2::splat(margin)).min(centre);
        let max = (self.max - Vec2::splat(margin)).max(centre);
        Rect { min, max }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pocket {
    pub index: usize,
    pub pos: Vec2,
    /// Centre distance below which a ball counts as potted.
    pub radius: f32,
}

/// A straight rail: centre and outer half extents.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Slab {
    pub centre: Vec2,
    pub half: Vec2,
}

#[derive(Debug, Clone)]
pub struct TableLayout {
    /// Outer edge of the playing surface; the walls' inner faces.
    bounds: Rect,
    /// Inside the cushion faces.
    playable: Rect,
    cushions: [Slab; 4],
    walls: [Slab; 4],
    corner_radius: f32,
    pockets: [Pocket; 6],
    baulk_x: f32,
    d_radius: f32,
    centre: Vec2,
    colored_slots: [Vec2; 6],
    cue_start: Vec2,
    cue_respot: Vec2,
    rack_apex: Vec2,
    line_start: Vec2,
}

impl TableLayout {
    pub fn new(cfg: &SnookerConfig) -> Self {
        let centre = Vec2::new(cfg.table_center[0], cfg.table_center[1]);
        let half = Vec2::new(cfg.table_length, cfg.table_width) * 0.5;
        let bounds = Rect::new(centre - half, centre + half);
        let t = cfg.rail_thickness * 0.5;
        let playable = bounds.inset(t);

        let (left, right, top, bottom) = (bounds.min.x, bounds.max.x, bounds.min.y, bounds.max.y);
        let long = (cfg.table_length - cfg.clearance) * 0.5;
        let short = (cfg.table_width - cfg.clearance - cfg.pocket_inset) * 0.5;
        let cushions = [
            Slab { centre: Vec2::new(centre.x, top), half: Vec2::new(long, t) },
            Slab { centre: Vec2::new(centre.x, bottom), half: Vec2::new(long, t) },
            Slab { centre: Vec2::new(left, centre.y), half: Vec2::new(t, short) },
            Slab { centre: Vec2::new(right, centre.y), half: Vec2::new(t, short) },
        ];

        let gap = cfg.clearance * 0.5;
        let wall_long = half.x + cfg.clearance;
        let wall_short = half.y + cfg.clearance;
        let walls = [
            Slab { centre: Vec2::new(centre.x, top - gap), half: Vec2::new(wall_long, t) },
            Slab { centre: Vec2::new(centre.x, bottom + gap), half: Vec2::new(wall_long, t) },
            Slab { centre: Vec2::new(left - gap, centre.y), half: Vec2::new(t, wall_short) },
            Slab { centre: Vec2::new(right + gap, centre.y), half: Vec2::new(t, wall_short) },
        ];

        let inset = cfg.pocket_inset;
        let radius = cfg.pocket_radius();
        let pocket_at = [
            Vec2::new(left + inset, top + inset),
            Vec2::new(right - inset, top + inset),
            Vec2::new(left + inset, bottom - inset),
            Vec2::new(right - inset, bottom - inset),
            Vec2::new(centre.x, top + inset),
            Vec2::new(centre.x, bottom - inset),
        ];
        let pockets = std::array::from_fn(|index| Pocket { index, pos: pocket_at[index], radius });

        let baulk_x = left + cfg.table_length * 0.25;
        let d_radius = cfg.table_width * 0.16;
        let colored_slots = [
            Vec2::new(baulk_x, centre.y - d_radius),
            Vec2::new(baulk_x, centre.y),
            Vec2::new(baulk_x, centre.y + d_radius),
            centre,
            Vec2::new(centre.x + cfg.table_length * 0.13, centre.y),
            Vec2::new(centre.x + cfg.table_width / 1.251, centre.y),
        ];

        Self {
            bounds,
            playable,
            cushions,
            walls,
            corner_radius: cfg.rail_corner_radius,
            pockets,
            baulk_x,
            d_radius,
            centre,
            colored_slots,
            cue_start: Vec2::new(baulk_x - 100.0, centre.y),
            cue_respot: Vec2::new(baulk_x - 70.0, centre.y),
            rack_apex: Vec2::new(cfg.canvas_width * 0.7, centre.y),
            line_start: Vec2::new(cfg.canvas_width * 0.3, centre.y),
        }
    }

    pub fn playable_rect(&self) -> Rect {
        self.playable
    }

    /// Leaving this rect means a ball has jumped the rails.
    pub fn escape_bounds(&self) -> Rect {
        self.bounds
    }

    pub fn is_inside_playable_area(&self, p: Vec2, margin: f32) -> bool {
        self.playable.inset(margin).contains(p)
    }

    pub fn clamp_to_playable(&self, p: Vec2, margin: f32) -> Vec2 {
        self.playable.inset(margin).clamp(p)
    }

    /// Push `p` out to at least `clearance` beyond every pocket's capture
    /// radius. Pockets sit on the cushion faces, so the push points into
    /// the table.
    pub fn clear_of_pockets(&self, p: Vec2, clearance: f32) -> Vec2 {
        let mut out = p;
        for pocket in &self.pockets {
            let reach = pocket.radius + clearance;
            let offset = out - pocket.pos;
            if offset.length() >= reach {
                continue;
            }
            let dir = offset
                .try_normalize()
                .unwrap_or_else(|| (self.centre - pocket.pos).normalize_or_zero());
            out = pocket.pos + dir * reach;
        }
        out
    }

    /// Inside the D: the half disc behind the baulk line.
    pub fn baulk_zone_contains(&self, p: Vec2) -> bool {
        p.x <= self.baulk_x && p.distance(self.d_centre()) <= self.d_radius
    }

    /// Nearest point inside the D whose distance from the D's arc is at
    /// least `margin`.
    pub fn clamp_to_d(&self, p: Vec2, margin: f32) -> Vec2 {
        let c = self.d_centre();
        let limit = (self.d_radius - margin).max(0.0);
        let mut offset = Vec2::new((p.x - c.x).min(0.0), p.y - c.y);
        if offset.length() > limit {
            offset = offset.normalize_or_zero() * limit;
        }
        c + offset
    }

    pub fn d_centre(&self) -> Vec2 {
        Vec2::new(self.baulk_x, self.centre.y)
    }

    pub fn d_radius(&self) -> f32 {
        self.d_radius
    }

    pub fn baulk_x(&self) -> f32 {
        self.baulk_x
    }

    pub fn centre(&self) -> Vec2 {
        self.centre
    }

    pub fn pockets(&self) -> &[Pocket; 6] {
        &self.pockets
    }

    pub fn nearest_pocket(&self, p: Vec2) -> &Pocket {
        let mut best = &self.pockets[0];
        for pocket in &self.pockets[1..] {
            if pocket.pos.distance_squared(p) < best.pos.distance_squared(p) {
                best = pocket;
            }
        }
        best
    }

    pub fn colored_slots(&self) -> &[Vec2; 6] {
        &self.colored_slots
    }

    pub fn cue_start(&self) -> Vec2 {
        self.cue_start
    }

    pub fn cue_respot(&self) -> Vec2 {
        self.cue_respot
    }

    pub fn rack_apex(&self) -> Vec2 {
        self.rack_apex
    }

    pub fn line_start(&self) -> Vec2 {
        self.line_start
    }

    /// Create the fixed rails and the pocket sensors. Returns every spawned
    /// entity with its tag so the caller can register it.
    pub fn spawn_bodies(
        &self,
        ctx: &mut EngineContext,
        cfg: &SnookerConfig,
    ) -> Vec<(EntityId, BodyKind)> {
        let rail = ColliderMaterial {
            restitution: cfg.rail_restitution,
            friction: cfg.friction,
            density: 1.0,
        };
        let mut spawned = Vec::with_capacity(14);

        for slab in &self.cushions {
            let id = ctx.next_id();
            let desc = BodyDesc::fixed(ColliderDesc::RoundCuboid {
                half_width: slab.half.x,
                half_height: slab.half.y,
                corner_radius: self.corner_radius,
            })
            .with_position(slab.centre);
            ctx.spawn_with_body(Entity::new(id).with_layer(RenderLayer::Table), desc, rail);
            spawned.push((id, BodyKind::Cushion));
        }

        for slab in &self.walls {
            let id = ctx.next_id();
            let desc = BodyDesc::fixed(ColliderDesc::Cuboid {
                half_width: slab.half.x,
                half_height: slab.half.y,
            })
            .with_position(slab.centre);
            ctx.spawn_with_body(Entity::new(id).with_layer(RenderLayer::Table), desc, rail);
            spawned.push((id, BodyKind::Wall));
        }

        for pocket in &self.pockets {
            let id = ctx.next_id();
            let entity = Entity::new(id)
                .with_layer(RenderLayer::Table)
                .with_disc(DiscComponent::new(pocket.radius, Rgb::BLACK));
            let desc = BodyDesc::fixed(ColliderDesc::Ball { radius: pocket.radius })
                .with_position(pocket.pos)
                .as_sensor();
            ctx.spawn_with_body(entity, desc, ColliderMaterial::default());
            spawned.push((id, BodyKind::Pocket(pocket.index)));
        }

        log::info!(
            "table: {} rails, {} pockets, baulk at x={}",
            self.cushions.len() + self.walls.len(),
            self.pockets.len(),
            self.baulk_x
        );
        spawned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> TableLayout {
        TableLayout::new(&SnookerConfig::default())
    }

    fn close(a: Vec2, b: Vec2) -> bool {
        a.distance(b) < 1e-3
    }

    #[test]
    fn default_geometry() {
        let t = table();
        assert_eq!(t.playable_rect(), Rect::new(Vec2::new(110.0, 160.0), Vec2::new(1090.0, 640.0)));
        assert_eq!(t.escape_bounds(), Rect::new(Vec2::new(100.0, 150.0), Vec2::new(1100.0, 650.0)));
        assert_eq!(t.baulk_x(), 350.0);
        assert_eq!(t.d_radius(), 80.0);
        assert_eq!(t.cue_start(), Vec2::new(250.0, 400.0));
        assert_eq!(t.cue_respot(), Vec2::new(280.0, 400.0));
        assert_eq!(t.rack_apex(), Vec2::new(840.0, 400.0));
        assert_eq!(t.line_start(), Vec2::new(360.0, 400.0));
    }

    #[test]
    fn pockets_in_creation_order() {
        let t = table();
        let expected = [
            Vec2::new(110.0, 160.0),
            Vec2::new(1090.0, 160.0),
            Vec2::new(110.0, 640.0),
            Vec2::new(1090.0, 640.0),
            Vec2::new(600.0, 160.0),
            Vec2::new(600.0, 640.0),
        ];
        for (pocket, want) in t.pockets().iter().zip(expected) {
            assert!(close(pocket.pos, want));
            assert!((pocket.radius - 1000.0 / 36.0).abs() < 1e-3);
        }
        assert_eq!(t.pockets()[4].index, 4);
    }

    #[test]
    fn colored_slot_positions() {
        let t = table();
        let s = t.colored_slots();
        assert!(close(s[0], Vec2::new(350.0, 320.0)));
        assert!(close(s[1], Vec2::new(350.0, 400.0)));
        assert!(close(s[2], Vec2::new(350.0, 480.0)));
        assert!(close(s[3], Vec2::new(600.0, 400.0)));
        assert!(close(s[4], Vec2::new(730.0, 400.0)));
        assert!((s[5].x - (600.0 + 500.0 / 1.251)).abs() < 1e-3);
    }

    #[test]
    fn rails_meet_at_the_cushion_faces() {
        let t = table();
        let top = t.cushions[0];
        assert_eq!(top.centre, Vec2::new(600.0, 150.0));
        assert_eq!(top.half, Vec2::new(490.0, 10.0));
        assert_eq!(top.centre.y + top.half.y, t.playable_rect().min.y);

        let left_wall = t.walls[2];
        assert_eq!(left_wall.centre, Vec2::new(90.0, 400.0));
        assert_eq!(left_wall.centre.x + left_wall.half.x, t.escape_bounds().min.x);
    }

    #[test]
    fn playable_area_with_margin() {
        let t = table();
        assert!(t.is_inside_playable_area(Vec2::new(600.0, 400.0), 20.0));
        assert!(t.is_inside_playable_area(Vec2::new(111.0, 161.0), 0.0));
        assert!(!t.is_inside_playable_area(Vec2::new(111.0, 161.0), 5.0));
        assert!(!t.is_inside_playable_area(Vec2::new(50.0, 400.0), 0.0));
    }

    #[test]
    fn clamp_to_playable_for_any_point() {
        let t = table();
        let margin = 1000.0 / 72.0 + 5.0;
        let inner = t.playable_rect().inset(margin);
        for p in [
            Vec2::new(-500.0, -500.0),
            Vec2::new(2000.0, 300.0),
            Vec2::new(600.0, 2000.0),
            Vec2::new(f32::MAX, f32::MIN),
            Vec2::new(500.0, 500.0),
        ] {
            let c = t.clamp_to_playable(p, margin);
            assert!(inner.contains(c), "{:?} -> {:?}", p, c);
        }
        assert_eq!(t.clamp_to_playable(Vec2::new(500.0, 500.0), margin), Vec2::new(500.0, 500.0));
    }

    #[test]
    fn clear_of_pockets_pushes_into_the_table() {
        let t = table();
        let reach = t.pockets()[0].radius + 10.0;
        let c = t.clear_of_pockets(Vec2::new(600.0, 170.0), 10.0);
        assert!(close(c, Vec2::new(600.0, 160.0 + reach)), "{:?}", c);

        // dead centre of a pocket goes toward the middle of the table
        let c = t.clear_of_pockets(Vec2::new(110.0, 160.0), 10.0);
        assert!((c.distance(Vec2::new(110.0, 160.0)) - reach).abs() < 1e-3);
        assert!(t.is_inside_playable_area(c, 0.0));

        let open = Vec2::new(500.0, 400.0);
        assert_eq!(t.clear_of_pockets(open, 10.0), open);
    }

    #[test]
    fn d_membership_and_clamp() {
        let t = table();
        assert!(t.baulk_zone_contains(Vec2::new(300.0, 400.0)));
        assert!(t.baulk_zone_contains(Vec2::new(350.0, 330.0)));
        assert!(!t.baulk_zone_contains(Vec2::new(360.0, 400.0)));
        assert!(!t.baulk_zone_contains(Vec2::new(260.0, 400.0)));

        let c = t.clamp_to_d(Vec2::new(500.0, 400.0), 0.0);
        assert!(close(c, Vec2::new(350.0, 400.0)));
        let c = t.clamp_to_d(Vec2::new(100.0, 400.0), 10.0);
        assert!(close(c, Vec2::new(280.0, 400.0)));
        for p in [Vec2::new(0.0, 0.0), Vec2::new(900.0, 900.0), Vec2::new(340.0, 100.0)] {
            let c = t.clamp_to_d(p, 0.0);
            assert!(c.x <= t.baulk_x());
            assert!(c.distance(t.d_centre()) <= t.d_radius() + 1e-3);
        }
    }

    #[test]
    fn nearest_pocket_picks_closest() {
        let t = table();
        assert_eq!(t.nearest_pocket(Vec2::new(80.0, 140.0)).index, 0);
        assert_eq!(t.nearest_pocket(Vec2::new(620.0, 700.0)).index, 5);
        assert_eq!(t.nearest_pocket(Vec2::new(1150.0, 400.0)).index, 1);
    }

    #[test]
    fn rect_inset_never_inverts() {
        let r = Rect::new(Vec2::ZERO, Vec2::new(10.0, 4.0));
        let i = r.inset(3.0);
        assert_eq!(i.min, Vec2::new(3.0, 2.0));
        assert_eq!(i.max, Vec2::new(7.0, 2.0));
        assert_eq!(i.min.y, i.max.y);
    }

    #[test]
    fn spawn_bodies_tags_every_fixture() {
        let t = table();
        let mut ctx = EngineContext::new();
        let spawned = t.spawn_bodies(&mut ctx, &SnookerConfig::default());
        assert_eq!(spawned.len(), 14);
        assert_eq!(ctx.physics.body_count(), 14);
        let pockets: Vec<_> = spawned
            .iter()
            .filter_map(|(_, k)| match k {
                BodyKind::Pocket(i) => Some(*i),
                _ => None,
            })
            .collect();
        assert_eq!(pockets, vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(spawned.iter().filter(|(_, k)| *k == BodyKind::Cushion).count(), 4);

        let (pocket_id, _) = spawned[8];
        let pocket = ctx.scene.get(pocket_id).unwrap();
        assert_eq!(pocket.pos, t.pockets()[0].pos);
        assert!(pocket.disc.is_some());
    }
}
