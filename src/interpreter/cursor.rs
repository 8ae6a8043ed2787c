//! Execution cursor: position, direction pointer (DP), and chooser (CC)
//!
//! DP picks the edge of the current region to leave from; CC picks the codel
//! on that edge. For each DP, CC resolves to an absolute perpendicular
//! direction:
//!
//! | DP    | CC left | CC right |
//! |-------|---------|----------|
//! | Right | up      | down     |
//! | Down  | right   | left     |
//! | Left  | down    | up       |
//! | Up    | left    | right    |

use crate::grid::region::Region;
use crate::grid::{Grid, Position};
use std::fmt;

/// Direction pointer, clockwise order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Right,
    Down,
    Left,
    Up,
}

impl Direction {
    const CLOCKWISE: [Direction; 4] = [
        Direction::Right,
        Direction::Down,
        Direction::Left,
        Direction::Up,
    ];

    /// One step clockwise
    pub fn clockwise(self) -> Direction {
        self.rotated(1)
    }

    /// Rotate by `steps`: positive is clockwise, negative counter-clockwise
    pub fn rotated(self, steps: i64) -> Direction {
        let idx = (self as usize + steps.rem_euclid(4) as usize) % 4;
        Self::CLOCKWISE[idx]
    }

    /// Unit vector as `(dx, dy)`, `y` growing downward
    pub fn delta(self) -> (isize, isize) {
        match self {
            Direction::Right => (1, 0),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Up => (0, -1),
        }
    }

    /// Neighboring position in this direction, if it is on the grid
    pub fn step_from(self, pos: Position, grid: &Grid) -> Option<Position> {
        let (dx, dy) = self.delta();
        let x = pos.x.checked_add_signed(dx)?;
        let y = pos.y.checked_add_signed(dy)?;
        let next = Position::new(x, y);
        grid.contains(next).then_some(next)
    }

    pub fn arrow(self) -> char {
        match self {
            Direction::Right => '→',
            Direction::Down => '↓',
            Direction::Left => '←',
            Direction::Up => '↑',
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::Right => "right",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Up => "up",
        };
        f.pad(name)
    }
}

/// Codel chooser
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Chooser {
    Left,
    Right,
}

impl Chooser {
    pub fn toggled(self) -> Chooser {
        match self {
            Chooser::Left => Chooser::Right,
            Chooser::Right => Chooser::Left,
        }
    }

    /// Absolute direction this chooser points to when facing `dp`
    pub fn absolute(self, dp: Direction) -> Direction {
        match self {
            Chooser::Left => dp.rotated(-1),
            Chooser::Right => dp.rotated(1),
        }
    }
}

impl fmt::Display for Chooser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Chooser::Left => "left",
            Chooser::Right => "right",
        };
        f.pad(name)
    }
}

/// Where the interpreter stands and which way it faces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    pub position: Position,
    pub dp: Direction,
    pub cc: Chooser,
}

impl Cursor {
    /// Cursor at the top-left codel, facing right with the chooser left
    pub fn start() -> Self {
        Cursor {
            position: Position::new(0, 0),
            dp: Direction::Right,
            cc: Chooser::Left,
        }
    }
}

impl Default for Cursor {
    fn default() -> Self {
        Self::start()
    }
}

/// Signed projection of a position onto a direction
fn project(pos: Position, dir: Direction) -> isize {
    let (dx, dy) = dir.delta();
    pos.x as isize * dx + pos.y as isize * dy
}

/// The codel of `region` from which an exit toward `dp` is attempted
///
/// First the region's furthest edge in `dp` is found (all codels sharing the
/// maximal coordinate along `dp`), then the codel on that edge furthest
/// toward the chooser's absolute direction.
pub fn exit_candidate(region: &Region, dp: Direction, cc: Chooser) -> Position {
    let edge = region
        .cells
        .iter()
        .map(|&p| project(p, dp))
        .max()
        .unwrap_or(0);
    let side = cc.absolute(dp);

    region
        .cells
        .iter()
        .copied()
        .filter(|&p| project(p, dp) == edge)
        .max_by_key(|&p| project(p, side))
        // Regions always hold at least one codel
        .unwrap_or(Position::new(0, 0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::region::Regions;

    #[test]
    fn test_rotation() {
        assert_eq!(Direction::Right.clockwise(), Direction::Down);
        assert_eq!(Direction::Up.clockwise(), Direction::Right);
        assert_eq!(Direction::Right.rotated(2), Direction::Left);
        assert_eq!(Direction::Right.rotated(-1), Direction::Up);
        assert_eq!(Direction::Down.rotated(-9), Direction::Right);
        assert_eq!(Direction::Left.rotated(i64::MIN), Direction::Left);
    }

    #[test]
    fn test_chooser_absolute_directions() {
        assert_eq!(Chooser::Left.absolute(Direction::Right), Direction::Up);
        assert_eq!(Chooser::Right.absolute(Direction::Right), Direction::Down);
        assert_eq!(Chooser::Left.absolute(Direction::Down), Direction::Right);
        assert_eq!(Chooser::Right.absolute(Direction::Down), Direction::Left);
        assert_eq!(Chooser::Left.absolute(Direction::Left), Direction::Down);
        assert_eq!(Chooser::Right.absolute(Direction::Left), Direction::Up);
        assert_eq!(Chooser::Left.absolute(Direction::Up), Direction::Left);
        assert_eq!(Chooser::Right.absolute(Direction::Up), Direction::Right);
    }

    #[test]
    fn test_step_from_edges() {
        let grid: Grid = "W W\nW W".parse().expect("valid");
        let origin = Position::new(0, 0);
        assert_eq!(Direction::Left.step_from(origin, &grid), None);
        assert_eq!(Direction::Up.step_from(origin, &grid), None);
        assert_eq!(
            Direction::Right.step_from(origin, &grid),
            Some(Position::new(1, 0))
        );
        assert_eq!(Direction::Down.step_from(Position::new(1, 1), &grid), None);
    }

    #[test]
    fn test_exit_candidate_on_irregular_region() {
        // Red region:
        //   R R R .
        //   R . R R
        //   R R . .
        let grid: Grid = "R R R K\nR K R R\nR R K K".parse().expect("valid");
        let regions = Regions::segment(&grid);
        let red = regions.region_at(Position::new(0, 0));
        assert_eq!(red.size(), 8);

        let cases = [
            (Direction::Right, Chooser::Left, Position::new(3, 1)),
            (Direction::Right, Chooser::Right, Position::new(3, 1)),
            (Direction::Down, Chooser::Left, Position::new(1, 2)),
            (Direction::Down, Chooser::Right, Position::new(0, 2)),
            (Direction::Left, Chooser::Left, Position::new(0, 2)),
            (Direction::Left, Chooser::Right, Position::new(0, 0)),
            (Direction::Up, Chooser::Left, Position::new(0, 0)),
            (Direction::Up, Chooser::Right, Position::new(2, 0)),
        ];
        for (dp, cc, expected) in cases {
            assert_eq!(exit_candidate(red, dp, cc), expected, "dp {} cc {}", dp, cc);
        }
    }
}
