use std::fmt;

/// Unique identifier for any entity tracked by the host simulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntityId(pub u32);

impl EntityId {
    /// Reserved identifier for the controllable player character.
    pub const PLAYER: Self = Self(0);

    /// Returns true if this entity represents the player.
    #[inline]
    pub const fn is_player(self) -> bool {
        self.0 == Self::PLAYER.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Discrete grid position expressed in tile coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const ORIGIN: Self = Self { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Chebyshev (king-move) distance: diagonal steps cost the same as
    /// orthogonal ones, matching 8-way movement.
    pub fn chebyshev(self, other: Position) -> u32 {
        let dx = (self.x - other.x).unsigned_abs();
        let dy = (self.y - other.y).unsigned_abs();
        dx.max(dy)
    }

    /// Returns the neighbouring position one step in `direction`.
    pub fn step(self, direction: Direction) -> Position {
        let (dx, dy) = direction.delta();
        Position::new(self.x + dx, self.y + dy)
    }

    /// Iterates the 8 neighbours in [`Direction::ALL`] order.
    pub fn neighbors(self) -> impl Iterator<Item = (Direction, Position)> {
        Direction::ALL.into_iter().map(move |dir| (dir, self.step(dir)))
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::ORIGIN
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// One of the eight king-move directions on the grid.
///
/// Variants are declared clockwise starting at north, so rotating by one
/// index is a 45° turn. North is +y, matching the map coordinate system.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum Direction {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl Direction {
    pub const ALL: [Direction; 8] = [
        Direction::North,
        Direction::NorthEast,
        Direction::East,
        Direction::SouthEast,
        Direction::South,
        Direction::SouthWest,
        Direction::West,
        Direction::NorthWest,
    ];

    pub const fn delta(self) -> (i32, i32) {
        match self {
            Direction::North => (0, 1),
            Direction::NorthEast => (1, 1),
            Direction::East => (1, 0),
            Direction::SouthEast => (1, -1),
            Direction::South => (0, -1),
            Direction::SouthWest => (-1, -1),
            Direction::West => (-1, 0),
            Direction::NorthWest => (-1, 1),
        }
    }

    pub fn from_delta(dx: i32, dy: i32) -> Option<Direction> {
        Direction::ALL
            .into_iter()
            .find(|dir| dir.delta() == (dx.signum(), dy.signum()) && (dx, dy) != (0, 0))
    }

    pub const fn is_orthogonal(self) -> bool {
        matches!(
            self,
            Direction::North | Direction::East | Direction::South | Direction::West
        )
    }

    pub const fn is_diagonal(self) -> bool {
        !self.is_orthogonal()
    }

    const fn index(self) -> i32 {
        match self {
            Direction::North => 0,
            Direction::NorthEast => 1,
            Direction::East => 2,
            Direction::SouthEast => 3,
            Direction::South => 4,
            Direction::SouthWest => 5,
            Direction::West => 6,
            Direction::NorthWest => 7,
        }
    }

    /// Rotates clockwise by `steps` × 45°. Negative values rotate
    /// counter-clockwise.
    pub fn rotate(self, steps: i32) -> Direction {
        let index = (self.index() + steps).rem_euclid(8);
        Direction::ALL[index as usize]
    }

    pub fn opposite(self) -> Direction {
        self.rotate(4)
    }
}

/// Integer resource meter (e.g., health) tracked per actor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResourceMeter {
    pub current: u32,
    pub maximum: u32,
}

impl ResourceMeter {
    pub const fn new(current: u32, maximum: u32) -> Self {
        Self { current, maximum }
    }

    pub const fn full(maximum: u32) -> Self {
        Self::new(maximum, maximum)
    }

    /// Current value as a fraction of the maximum, in [0, 1].
    ///
    /// A zero maximum reads as full so that stat-less actors never look wounded.
    pub fn fraction(&self) -> f32 {
        if self.maximum == 0 {
            return 1.0;
        }
        (self.current as f32 / self.maximum as f32).clamp(0.0, 1.0)
    }

    pub fn is_depleted(&self) -> bool {
        self.maximum > 0 && self.current == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chebyshev_treats_diagonals_as_one_step() {
        let origin = Position::new(0, 0);
        assert_eq!(origin.chebyshev(Position::new(3, 3)), 3);
        assert_eq!(origin.chebyshev(Position::new(-2, 5)), 5);
        assert_eq!(origin.chebyshev(origin), 0);
    }

    #[test]
    fn rotation_wraps_both_ways() {
        assert_eq!(Direction::North.rotate(1), Direction::NorthEast);
        assert_eq!(Direction::North.rotate(-1), Direction::NorthWest);
        assert_eq!(Direction::West.rotate(4), Direction::East);
        assert_eq!(Direction::SouthEast.opposite(), Direction::NorthWest);
    }

    #[test]
    fn from_delta_normalizes_magnitude() {
        assert_eq!(Direction::from_delta(5, 0), Some(Direction::East));
        assert_eq!(Direction::from_delta(-2, -7), Some(Direction::SouthWest));
        assert_eq!(Direction::from_delta(0, 0), None);
    }

    #[test]
    fn meter_fraction_is_clamped() {
        assert_eq!(ResourceMeter::new(20, 100).fraction(), 0.2);
        assert_eq!(ResourceMeter::new(0, 0).fraction(), 1.0);
        assert!(ResourceMeter::new(0, 10).is_depleted());
    }
}
