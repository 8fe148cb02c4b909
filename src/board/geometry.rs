//! Star-board geometry.
//!
//! Cells live on a triangular grid addressed by axial coordinates `(x, y)`
//! with the implied cube coordinate `z = -x - y`. The playable star is the
//! union of two large triangles: a central hexagon plus six triangular arms.
//! All functions here are pure; occupancy lives on `Board`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::config::{ConfigError, MAX_WIDTH, MIN_WIDTH};
use super::player::PlayDirection;

/// Errors raised when a cell id or coordinate does not name a board cell.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    #[error("cell {0} is not on the board")]
    InvalidCell(CellId),

    #[error("position ({x}, {y}) is not on the board")]
    OffBoard { x: i32, y: i32 },

    #[error("malformed cell id: '{0}'")]
    MalformedCellId(String),
}

/// Axial coordinates of a cell. `y` grows downwards row by row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Position { x, y }
    }

    /// The third cube coordinate.
    pub const fn z(self) -> i32 {
        -self.x - self.y
    }

    /// The position one step away in `dir`.
    pub const fn offset(self, dir: Direction) -> Position {
        let (dx, dy) = dir.delta();
        Position::new(self.x + dx, self.y + dy)
    }
}

/// Stable integer key of a cell, packed from its coordinates.
///
/// Keys sort row-major: first by `y`, then by `x`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CellId(u16);

impl CellId {
    const BIAS: i32 = 64;
    const SHIFT: u32 = 7;
    const MASK: u16 = (1 << Self::SHIFT) - 1;

    /// Packs a position into a key. Returns `None` for coordinates outside
    /// the packable range (far beyond any supported board).
    pub fn from_position(pos: Position) -> Option<CellId> {
        let range = -Self::BIAS..Self::BIAS;
        if !range.contains(&pos.x) || !range.contains(&pos.y) {
            return None;
        }
        let col = (pos.x + Self::BIAS) as u16;
        let row = (pos.y + Self::BIAS) as u16;
        Some(CellId((row << Self::SHIFT) | col))
    }

    /// Unpacks the coordinates this key was built from.
    pub fn position(self) -> Position {
        let col = (self.0 & Self::MASK) as i32;
        let row = (self.0 >> Self::SHIFT) as i32;
        Position::new(col - Self::BIAS, row - Self::BIAS)
    }

    /// Returns the raw key.
    pub const fn key(self) -> u16 {
        self.0
    }

    /// Rebuilds an id from a raw key.
    pub const fn from_key(key: u16) -> CellId {
        CellId(key)
    }
}

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pos = self.position();
        write!(f, "{},{}", pos.x, pos.y)
    }
}

impl FromStr for CellId {
    type Err = BoardError;

    /// Parses the `"x,y"` notation produced by `Display`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || BoardError::MalformedCellId(s.to_string());
        let (x, y) = s.split_once(',').ok_or_else(malformed)?;
        let x = x.trim().parse::<i32>().map_err(|_| malformed())?;
        let y = y.trim().parse::<i32>().map_err(|_| malformed())?;
        CellId::from_position(Position::new(x, y)).ok_or_else(malformed)
    }
}

/// The six grid directions, counter-clockwise starting east.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    East,
    NorthEast,
    NorthWest,
    West,
    SouthWest,
    SouthEast,
}

impl Direction {
    pub const ALL: [Direction; 6] = [
        Direction::East,
        Direction::NorthEast,
        Direction::NorthWest,
        Direction::West,
        Direction::SouthWest,
        Direction::SouthEast,
    ];

    /// Axial `(dx, dy)` step for this direction.
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Direction::East => (1, 0),
            Direction::NorthEast => (1, -1),
            Direction::NorthWest => (0, -1),
            Direction::West => (-1, 0),
            Direction::SouthWest => (-1, 1),
            Direction::SouthEast => (0, 1),
        }
    }
}

/// One of the six triangular arms of the star, clockwise from the top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Arm {
    Top,
    TopRight,
    BottomRight,
    Bottom,
    BottomLeft,
    TopLeft,
}

impl Arm {
    pub const ALL: [Arm; 6] = [
        Arm::Top,
        Arm::TopRight,
        Arm::BottomRight,
        Arm::Bottom,
        Arm::BottomLeft,
        Arm::TopLeft,
    ];

    /// The arm across the center of the board.
    pub const fn opposite(self) -> Arm {
        match self {
            Arm::Top => Arm::Bottom,
            Arm::TopRight => Arm::BottomLeft,
            Arm::BottomRight => Arm::TopLeft,
            Arm::Bottom => Arm::Top,
            Arm::BottomLeft => Arm::TopRight,
            Arm::TopLeft => Arm::BottomRight,
        }
    }
}

/// Neighbor list; a cell never has more than six.
pub type Neighbors = SmallVec<[CellId; 6]>;

/// Shape of a star board of a given width.
///
/// `width` is the number of cells across the central hexagon's widest row,
/// so each arm is a triangle of `(width - 1) / 2` rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    width: u8,
    arm: i32,
}

impl Geometry {
    /// Builds the geometry for `width`, which must be odd and within
    /// `MIN_WIDTH..=MAX_WIDTH`.
    pub fn new(width: u8) -> Result<Geometry, ConfigError> {
        if width % 2 == 0 || !(MIN_WIDTH..=MAX_WIDTH).contains(&width) {
            return Err(ConfigError::UnsupportedWidth(width));
        }
        Ok(Geometry {
            width,
            arm: i32::from((width - 1) / 2),
        })
    }

    pub const fn width(&self) -> u8 {
        self.width
    }

    /// Number of rows in each arm (and pieces along an arm's base).
    pub const fn arm_size(&self) -> i32 {
        self.arm
    }

    /// Returns true if `pos` lies inside the star.
    pub fn contains(&self, pos: Position) -> bool {
        let n = self.arm;
        let (x, y, z) = (pos.x, pos.y, pos.z());
        (x >= -n && y >= -n && z >= -n) || (x <= n && y <= n && z <= n)
    }

    /// Maps a cell id to its coordinates.
    pub fn to_position(&self, id: CellId) -> Result<Position, BoardError> {
        let pos = id.position();
        if self.contains(pos) {
            Ok(pos)
        } else {
            Err(BoardError::InvalidCell(id))
        }
    }

    /// Maps coordinates to the id of the board cell there.
    ///
    /// Bad coordinates are reported as `OffBoard` with the offending `x`
    /// and `y`; `InvalidCell` is kept for ids that name no board cell.
    pub fn to_cell_id(&self, x: i32, y: i32) -> Result<CellId, BoardError> {
        let pos = Position::new(x, y);
        if !self.contains(pos) {
            return Err(BoardError::OffBoard { x, y });
        }
        CellId::from_position(pos).ok_or(BoardError::OffBoard { x, y })
    }

    /// Hex-grid manhattan distance: 1 between neighbors, 2 across a hop.
    pub fn manhattan_distance(a: Position, b: Position) -> u32 {
        let dx = (a.x - b.x).unsigned_abs();
        let dy = (a.y - b.y).unsigned_abs();
        let dz = (a.z() - b.z()).unsigned_abs();
        (dx + dy + dz) / 2
    }

    /// The board cell adjacent to `pos` in `dir`, if there is one.
    pub fn step(&self, pos: Position, dir: Direction) -> Option<CellId> {
        let next = pos.offset(dir);
        if self.contains(next) {
            CellId::from_position(next)
        } else {
            None
        }
    }

    /// Adjacent board cells of `id`, in `Direction::ALL` order.
    pub fn neighbors(&self, id: CellId) -> Result<Neighbors, BoardError> {
        let pos = self.to_position(id)?;
        Ok(Direction::ALL
            .iter()
            .filter_map(|&dir| self.step(pos, dir))
            .collect())
    }

    /// The arm containing `pos`, or `None` for the central hexagon and
    /// positions off the board.
    pub fn arm_of(&self, pos: Position) -> Option<Arm> {
        if !self.contains(pos) {
            return None;
        }
        let n = self.arm;
        let (x, y, z) = (pos.x, pos.y, pos.z());
        if y < -n {
            Some(Arm::Top)
        } else if x > n {
            Some(Arm::TopRight)
        } else if z < -n {
            Some(Arm::BottomRight)
        } else if y > n {
            Some(Arm::Bottom)
        } else if x < -n {
            Some(Arm::BottomLeft)
        } else if z > n {
            Some(Arm::TopLeft)
        } else {
            None
        }
    }

    /// Every board cell in row-major order.
    pub fn cells(&self) -> Vec<CellId> {
        let reach = 2 * self.arm;
        let mut cells = Vec::new();
        for y in -reach..=reach {
            for x in -reach..=reach {
                let pos = Position::new(x, y);
                if self.contains(pos) {
                    if let Some(id) = CellId::from_position(pos) {
                        cells.push(id);
                    }
                }
            }
        }
        cells
    }

    /// Cells of one arm in row-major order.
    pub fn arm_cells(&self, arm: Arm) -> Vec<CellId> {
        self.cells()
            .into_iter()
            .filter(|id| self.arm_of(id.position()) == Some(arm))
            .collect()
    }

    /// Cells where a player moving in `direction` may pass through but not
    /// end a turn: every arm other than their home and goal arm.
    pub fn no_parking_cells(&self, direction: PlayDirection) -> Vec<CellId> {
        let home = direction.home_arm();
        let goal = direction.goal_arm();
        self.cells()
            .into_iter()
            .filter(|id| match self.arm_of(id.position()) {
                Some(arm) => arm != home && arm != goal,
                None => false,
            })
            .collect()
    }
}
