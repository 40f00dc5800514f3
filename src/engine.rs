#![warn(clippy::all, clippy::pedantic)]

use log::{debug, info};

use crate::components::{Board, BoardEffect, Cell, EffectBus, GemColor, GemRng, Pos};
use crate::game::{self, BOARD_SIZE};
use crate::matcher;
use crate::powerup::{self, PowerUpPlacement};

/// Everything one player move did. A rejected move leaves the board
/// untouched and reports `accepted: false`; rejection is policy, not an
/// error.
#[derive(Debug, Clone, Default)]
pub struct MoveOutcome {
    pub accepted: bool,
    pub score_delta: u32,
    pub destroyed_cells: Vec<Pos>,
    pub power_ups_created: Vec<PowerUpPlacement>,
    pub cascades: u32,
    pub final_board: Board,
}

/// The single entry point for a player move: swap two adjacent cells, then
/// resolve activations, combinations, matches and cascades to fixpoint.
pub fn attempt_move(
    board: &mut Board,
    rng: &mut GemRng,
    fx: &mut EffectBus,
    from: Pos,
    to: Pos,
) -> MoveOutcome {
    let mut outcome = MoveOutcome::default();

    if !board.in_bounds(from) || !board.in_bounds(to) || !from.is_adjacent(to) {
        debug!("Rejected swap {from} -> {to}: out of range or not adjacent");
        outcome.final_board = board.clone();
        return outcome;
    }

    let from_power = board.get(from).power_up;
    let to_power = board.get(to).power_up;

    board.swap(from, to);

    if from_power.is_some() || to_power.is_some() {
        // After the swap the dragged cell sits at `to`. Trigger whichever
        // side holds a power-up, handing it the other cell as swap
        // partner; two power-ups become a combination anchored at `to`.
        let (powered, other) = if from_power.is_some() {
            (to, from)
        } else {
            (from, to)
        };
        let report = powerup::trigger_power_up(board, rng, fx, powered, Some(other));

        outcome.accepted = true;
        for &group in &report.groups {
            outcome.score_delta += game::chain_points(group, 0);
        }
        outcome.destroyed_cells.extend(report.destroyed);
        apply_gravity(board, rng, fx);
        run_cascade(board, rng, fx, &mut outcome, 1);
    } else if matcher::board_should_explode(board) {
        outcome.accepted = true;
        run_cascade(board, rng, fx, &mut outcome, 0);
    } else {
        // Fruitless swap: revert and consume nothing
        board.swap(from, to);
        debug!("Rejected swap {from} -> {to}: no match produced");
        outcome.final_board = board.clone();
        return outcome;
    }

    info!(
        "Move {from} -> {to}: +{} points, {} cells destroyed, {} cascades",
        outcome.score_delta,
        outcome.destroyed_cells.len(),
        outcome.cascades
    );
    outcome.final_board = board.clone();
    outcome
}

/// Detect -> create power-ups -> destroy -> score -> fall -> refill, until
/// a pass finds neither chains nor patterns. Each pass multiplies its
/// scores by one more than the last.
fn run_cascade(
    board: &mut Board,
    rng: &mut GemRng,
    fx: &mut EffectBus,
    outcome: &mut MoveOutcome,
    first_index: u32,
) {
    let mut cascade_index = first_index;
    loop {
        let patterns = matcher::detect_special_patterns(board);
        let chains = matcher::find_exploding_chains(board);
        if patterns.is_empty() && chains.is_empty() {
            break;
        }

        let (placements, report) = powerup::create_power_ups(board, &chains, &patterns, fx);
        for &group in &report.groups {
            outcome.score_delta += game::chain_points(group, cascade_index);
        }
        outcome.destroyed_cells.extend(report.destroyed);
        outcome.power_ups_created.extend(placements);

        apply_gravity(board, rng, fx);
        cascade_index += 1;
        outcome.cascades += 1;
    }
}

// Gravity and refill always run as a pair after a destruction pass.
fn apply_gravity(board: &mut Board, rng: &mut GemRng, fx: &mut EffectBus) {
    board.make_cells_fall();
    let refilled = board.refill(rng);
    if !refilled.is_empty() {
        fx.push(BoardEffect::Refilled { cells: refilled });
    }
}

/// Tries every adjacent swap on the current board and keeps the ones that
/// would explode something. Every trial swap is reverted immediately; the
/// board is bit-identical before and after the call.
pub fn get_winning_moves(board: &mut Board) -> Vec<(Pos, Pos)> {
    let mut moves = Vec::new();
    for here in board.positions().collect::<Vec<_>>() {
        for (dr, dc) in [(0isize, 1isize), (1, 0)] {
            let Some(next) = board.offset(here, dr, dc) else {
                continue;
            };
            board.swap(here, next);
            if matcher::board_should_explode(board) {
                moves.push((here, next));
            }
            board.swap(here, next);
        }
    }
    moves
}

#[must_use]
pub fn is_game_over(board: &mut Board) -> bool {
    get_winning_moves(board).is_empty()
}

/// A fresh randomly-filled board with the no-immediate-match guarantee:
/// every placed color is drawn uniformly from the palette colors that
/// complete neither a run of three nor a 2x2 square.
pub fn new_board(rng: &mut GemRng) -> Board {
    let mut board = Board::new(BOARD_SIZE);
    fill_board(&mut board, rng);
    board
}

pub fn fill_board(board: &mut Board, rng: &mut GemRng) {
    for pos in board.positions().collect::<Vec<_>>() {
        let mut candidates = Vec::with_capacity(GemColor::PALETTE.len());
        for &color in &GemColor::PALETTE {
            *board.get_mut(pos) = Cell::gem(color);
            if !matcher::should_explode(board, pos) && !completes_square(board, pos) {
                candidates.push(color);
            }
        }
        // Six colors against at most a handful of constraints: the pool
        // cannot empty, but fall back to an unconstrained pick anyway
        let color = if candidates.is_empty() {
            rng.pick(&GemColor::PALETTE)
        } else {
            candidates[rng.usize(candidates.len())]
        };
        *board.get_mut(pos) = Cell::gem(color);
    }
}

// Would the cell at `pos` currently close a 2x2 same-color square?
fn completes_square(board: &Board, pos: Pos) -> bool {
    let Some(color) = board.get(pos).matchable() else {
        return false;
    };
    for (dr, dc) in [(-1isize, -1isize), (-1, 0), (0, -1), (0, 0)] {
        let Some(anchor) = board.offset(pos, dr, dc) else {
            continue;
        };
        let corners = [(0isize, 0isize), (0, 1), (1, 0), (1, 1)];
        let full = corners.iter().all(|&(r, c)| {
            board
                .offset(anchor, r, c)
                .is_some_and(|p| board.get(p).matchable() == Some(color))
        });
        if full {
            return true;
        }
    }
    false
}
