#![warn(clippy::all, clippy::pedantic)]
#![allow(
    // Allow potential wrapping when casting between types of same size as window offsets are tiny
    clippy::cast_possible_wrap
)]

use crate::components::{Board, GemColor, Pos, PowerUpKind};
use crate::game::EXPLOSION_THRESHOLD;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// A maximal run of three or more same-colored cells in one row or column.
#[derive(Debug, Clone)]
pub struct Chain {
    pub color: GemColor,
    pub orientation: Orientation,
    pub cells: Vec<Pos>,
}

impl Chain {
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// The cell a power-up spawned from this chain lands on.
    #[must_use]
    pub fn middle(&self) -> Pos {
        self.cells[self.cells.len() / 2]
    }
}

/// A detected 2x2 square (fly-away source) or L-pentomino (TNT source).
#[derive(Debug, Clone)]
pub struct SpecialPattern {
    pub anchor: Pos,
    pub kind: PowerUpKind,
    pub members: Vec<Pos>,
}

/// Scans every row and column for maximal same-color runs of at least
/// three cells. Runs are greedy and non-overlapping: the scan resumes
/// after each emitted run, never backtracking into a shorter grouping.
#[must_use]
pub fn find_exploding_chains(board: &Board) -> Vec<Chain> {
    let mut chains = Vec::new();
    let size = board.size();

    for row in 0..size {
        let line: Vec<Pos> = (0..size).map(|col| Pos { row, col }).collect();
        scan_line(board, &line, Orientation::Horizontal, &mut chains);
    }
    for col in 0..size {
        let line: Vec<Pos> = (0..size).map(|row| Pos { row, col }).collect();
        scan_line(board, &line, Orientation::Vertical, &mut chains);
    }

    chains
}

fn scan_line(board: &Board, line: &[Pos], orientation: Orientation, chains: &mut Vec<Chain>) {
    let mut i = 0;
    while i < line.len() {
        let Some(color) = board.get(line[i]).matchable() else {
            i += 1;
            continue;
        };

        let mut j = i + 1;
        while j < line.len() && board.get(line[j]).matchable() == Some(color) {
            j += 1;
        }

        if j - i >= EXPLOSION_THRESHOLD {
            chains.push(Chain {
                color,
                orientation,
                cells: line[i..j].to_vec(),
            });
        }
        i = j;
    }
}

/// Point query: does some horizontal or vertical run of at least three
/// same-colored cells pass through `pos`? Checked by sliding a
/// threshold-sized window over every offset that includes the cell.
#[must_use]
pub fn should_explode(board: &Board, pos: Pos) -> bool {
    let Some(color) = board.get(pos).matchable() else {
        return false;
    };

    let window = EXPLOSION_THRESHOLD as isize;
    for (dr, dc) in [(0isize, 1isize), (1, 0)] {
        for start in (1 - window)..=0 {
            let mut all_match = true;
            for k in 0..window {
                let matched = board
                    .offset(pos, dr * (start + k), dc * (start + k))
                    .is_some_and(|p| board.get(p).matchable() == Some(color));
                if !matched {
                    all_match = false;
                    break;
                }
            }
            if all_match {
                return true;
            }
        }
    }

    false
}

// The four L rotations: two cells along the first arm, two along the
// perpendicular arm, all relative to the center.
const L_ROTATIONS: [[(isize, isize); 2]; 4] = [
    [(0, 1), (1, 0)],
    [(1, 0), (0, -1)],
    [(0, -1), (-1, 0)],
    [(-1, 0), (0, 1)],
];

/// Finds 2x2 squares, then L-pentominoes, claiming cells as it goes so no
/// cell joins two patterns in the same pass. Squares take priority.
#[must_use]
pub fn detect_special_patterns(board: &Board) -> Vec<SpecialPattern> {
    let size = board.size();
    let mut claimed = vec![false; size * size];
    let claim_idx = |pos: Pos| pos.row * size + pos.col;
    let mut patterns = Vec::new();

    // Pass 1: 2x2 squares anchored at their top-left corner
    for row in 0..size.saturating_sub(1) {
        for col in 0..size.saturating_sub(1) {
            let anchor = Pos { row, col };
            let members = [
                anchor,
                Pos { row, col: col + 1 },
                Pos { row: row + 1, col },
                Pos {
                    row: row + 1,
                    col: col + 1,
                },
            ];

            let Some(color) = board.get(anchor).matchable() else {
                continue;
            };
            let uniform = members
                .iter()
                .all(|&p| board.get(p).matchable() == Some(color));
            let free = members.iter().all(|&p| !claimed[claim_idx(p)]);
            if uniform && free {
                for &p in &members {
                    claimed[claim_idx(p)] = true;
                }
                patterns.push(SpecialPattern {
                    anchor,
                    kind: PowerUpKind::FlyAway,
                    members: members.to_vec(),
                });
            }
        }
    }

    // Pass 2: L-pentominoes anchored at their center; the first matching
    // rotation wins
    for center in board.positions() {
        if claimed[claim_idx(center)] {
            continue;
        }
        let Some(color) = board.get(center).matchable() else {
            continue;
        };

        for arms in L_ROTATIONS {
            let mut members = vec![center];
            let mut valid = true;
            for (dr, dc) in arms {
                for reach in 1..=2isize {
                    match board.offset(center, dr * reach, dc * reach) {
                        Some(p) if board.get(p).matchable() == Some(color) => members.push(p),
                        _ => {
                            valid = false;
                            break;
                        }
                    }
                }
                if !valid {
                    break;
                }
            }

            if valid && members.iter().all(|&p| !claimed[claim_idx(p)]) {
                for &p in &members {
                    claimed[claim_idx(p)] = true;
                }
                patterns.push(SpecialPattern {
                    anchor: center,
                    kind: PowerUpKind::Tnt,
                    members,
                });
                break;
            }
        }
    }

    patterns
}

/// True if any cell sits in a linear match or any special pattern exists.
#[must_use]
pub fn board_should_explode(board: &Board) -> bool {
    board.positions().any(|pos| should_explode(board, pos))
        || !detect_special_patterns(board).is_empty()
}
