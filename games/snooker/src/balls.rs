//! Snooker ball data: the six colored slots, ball kinds and the tags
//! carried by every body the game spawns.

use baize_engine::Rgb;

/// A colored ball, identified by the slot it re-spots to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorSlot {
    Green,
    Brown,
    Yellow,
    Blue,
    Pink,
    Black,
}

impl ColorSlot {
    /// Slot order: the three baulk colors top to bottom, then blue, pink, black.
    pub const ALL: [ColorSlot; 6] = [
        ColorSlot::Green,
        ColorSlot::Brown,
        ColorSlot::Yellow,
        ColorSlot::Blue,
        ColorSlot::Pink,
        ColorSlot::Black,
    ];

    pub fn index(self) -> usize {
        match self {
            ColorSlot::Green => 0,
            ColorSlot::Brown => 1,
            ColorSlot::Yellow => 2,
            ColorSlot::Blue => 3,
            ColorSlot::Pink => 4,
            ColorSlot::Black => 5,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn color(self) -> Rgb {
        match self {
            ColorSlot::Green => Rgb::from_u8(74, 183, 142),
            ColorSlot::Brown => Rgb::from_u8(144, 70, 23),
            ColorSlot::Yellow => Rgb::from_u8(255, 234, 45),
            ColorSlot::Blue => Rgb::from_u8(55, 78, 233),
            ColorSlot::Pink => Rgb::from_u8(250, 155, 197),
            ColorSlot::Black => Rgb::from_u8(89, 89, 89),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ColorSlot::Green => "green",
            ColorSlot::Brown => "brown",
            ColorSlot::Yellow => "yellow",
            ColorSlot::Blue => "blue",
            ColorSlot::Pink => "pink",
            ColorSlot::Black => "black",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BallKind {
    Cue,
    Red,
    Colored(ColorSlot),
}

impl BallKind {
    pub fn color(self) -> Rgb {
        match self {
            BallKind::Cue => Rgb::WHITE,
            BallKind::Red => Rgb::from_u8(255, 0, 0),
            BallKind::Colored(slot) => slot.color(),
        }
    }

    /// Short name for log lines.
    pub fn name(self) -> &'static str {
        match self {
            BallKind::Cue => "cue",
            BallKind::Red => "red",
            BallKind::Colored(slot) => slot.name(),
        }
    }
}

/// Tag attached to every physics entity at creation. Collision handling
/// matches on pairs of these instead of searching ball lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    Ball(BallKind),
    Cushion,
    Wall,
    Pocket(usize),
}

impl BodyKind {
    /// How a cue-ball contact with this body is reported to the player.
    pub fn contact_label(self) -> &'static str {
        match self {
            BodyKind::Ball(BallKind::Red) => "red ball",
            BodyKind::Ball(BallKind::Colored(_)) => "colored ball",
            BodyKind::Ball(BallKind::Cue) => "cue ball",
            BodyKind::Cushion | BodyKind::Wall => "cushion",
            BodyKind::Pocket(_) => "pocket",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_index_round_trips() {
        for (i, slot) in ColorSlot::ALL.iter().enumerate() {
            assert_eq!(slot.index(), i);
            assert_eq!(ColorSlot::from_index(i), Some(*slot));
        }
        assert_eq!(ColorSlot::from_index(6), None);
    }

    #[test]
    fn ball_colors() {
        assert_eq!(BallKind::Cue.color(), Rgb::WHITE);
        assert_eq!(BallKind::Red.color(), Rgb::new(1.0, 0.0, 0.0));
        assert_eq!(BallKind::Colored(ColorSlot::Brown).color(), Rgb::from_u8(144, 70, 23));
    }

    #[test]
    fn contact_labels() {
        assert_eq!(BodyKind::Cushion.contact_label(), "cushion");
        assert_eq!(BodyKind::Wall.contact_label(), "cushion");
        assert_eq!(BodyKind::Pocket(3).contact_label(), "pocket");
        assert_eq!(BodyKind::Ball(BallKind::Red).contact_label(), "red ball");
        assert_eq!(BodyKind::Ball(BallKind::Colored(ColorSlot::Pink)).contact_label(), "colored ball");
    }

    #[test]
    fn log_names() {
        assert_eq!(BallKind::Red.name(), "red");
        assert_eq!(BallKind::Colored(ColorSlot::Yellow).name(), "yellow");
        assert_eq!(BallKind::Cue.name(), "cue");
    }
}
