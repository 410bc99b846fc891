/// Render layer, drawn back-to-front.
///
/// A ball sliding into a pocket is moved to `Pocketing` so it passes under
/// the balls still in play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(u8)]
pub enum RenderLayer {
    Table = 0,
    Pocketing = 1,
    #[default]
    Balls = 2,
    Overlay = 3,
}

impl RenderLayer {
    pub const COUNT: usize = 4;

    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Table),
            1 => Some(Self::Pocketing),
            2 => Some(Self::Balls),
            3 => Some(Self::Overlay),
            _ => None,
        }
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }
}
