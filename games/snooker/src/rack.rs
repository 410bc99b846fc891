//! Rack layouts. Pure position generators; spawning lives in the registry.

use glam::Vec2;
use rand::Rng;

use crate::table::Rect;

/// Full-size red rack.
pub const RED_COUNT: usize = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutMode {
    /// The standard opening triangle.
    Triangle,
    RandomAll,
    RandomReds,
    /// Practice row of reds; the colored balls are left where they are.
    StraightLine,
    /// `level` random reds, one more each time the table is cleared.
    Challenge,
}

impl LayoutMode {
    /// Layout selected by the number keys.
    pub fn from_key(key: char) -> Option<Self> {
        match key {
            '1' => Some(LayoutMode::Triangle),
            '2' => Some(LayoutMode::RandomAll),
            '3' => Some(LayoutMode::RandomReds),
            '4' => Some(LayoutMode::StraightLine),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            LayoutMode::Triangle => "Triangle",
            LayoutMode::RandomAll => "Random All",
            LayoutMode::RandomReds => "Random Reds",
            LayoutMode::StraightLine => "Straight Line",
            LayoutMode::Challenge => "Challenge",
        }
    }

    pub fn selected_message(self) -> String {
        format!("{} Mode Selected", self.label())
    }

    /// Stable index used in host events.
    pub fn index(self) -> u32 {
        match self {
            LayoutMode::Triangle => 0,
            LayoutMode::RandomAll => 1,
            LayoutMode::RandomReds => 2,
            LayoutMode::StraightLine => 3,
            LayoutMode::Challenge => 4,
        }
    }

    pub fn red_count(self, level: u32) -> usize {
        match self {
            LayoutMode::Challenge => level.max(1) as usize,
            _ => RED_COUNT,
        }
    }

    /// Whether a rack reset leaves the colored balls alone.
    pub fn keeps_colored(self) -> bool {
        self == LayoutMode::StraightLine
    }
}

/// Fifteen reds in rows of 1..5 opening to the right of `apex`.
/// Rows are `diameter * 0.95` apart and so are the balls within a row.
pub fn triangle(apex: Vec2, diameter: f32) -> Vec<Vec2> {
    let sep = diameter * 0.95;
    let mut out = Vec::with_capacity(RED_COUNT);
    for row in 0..5 {
        for col in 0..=row {
            let x = apex.x + row as f32 * sep;
            let y = apex.y - row as f32 * sep / 2.0 + col as f32 * sep;
            out.push(Vec2::new(x, y));
        }
    }
    out
}

/// `count` balls in one horizontal row, `diameter + 5` apart.
pub fn straight_line(start: Vec2, diameter: f32, count: usize) -> Vec<Vec2> {
    (0..count)
        .map(|i| Vec2::new(start.x + i as f32 * (diameter + 5.0), start.y))
        .collect()
}

/// Uniform random positions inside `area`.
///
/// Each ball gets up to `retries` draws to land at least `min_dist` from
/// everything in `occupied` and from the balls placed before it. When every
/// draw collides the last one is kept; the physics step pushes the pair apart.
pub fn random_positions<R: Rng>(
    rng: &mut R,
    area: Rect,
    count: usize,
    min_dist: f32,
    occupied: &[Vec2],
    retries: u32,
) -> Vec<Vec2> {
    let mut out: Vec<Vec2> = Vec::with_capacity(count);
    for _ in 0..count {
        let mut candidate = sample(rng, area);
        for _ in 1..retries.max(1) {
            let clear = occupied
                .iter()
                .chain(out.iter())
                .all(|p| p.distance(candidate) >= min_dist);
            if clear {
                break;
            }
            candidate = sample(rng, area);
        }
        out.push(candidate);
    }
    out
}

fn sample<R: Rng>(rng: &mut R, area: Rect) -> Vec2 {
    Vec2::new(
        rng.random_range(area.min.x..=area.max.x),
        rng.random_range(area.min.y..=area.max.y),
    )
}
