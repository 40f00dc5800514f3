#![warn(clippy::all, clippy::pedantic)]
#![allow(
    // Allow potential wrapping when casting between types of same size as blast radii are tiny
    clippy::cast_possible_wrap
)]

use std::collections::{HashSet, VecDeque};

use log::debug;

use crate::components::{Board, BoardEffect, EffectBus, GemColor, GemRng, Pos, PowerUpKind};
use crate::game::{COLOR_BOMB_RUN_LENGTH, FLY_AWAY_RADIUS, ROCKET_RUN_LENGTH, TNT_RADIUS};
use crate::matcher::{Chain, Orientation, SpecialPattern};

/// A power-up the factory placed on the board this pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PowerUpPlacement {
    pub kind: PowerUpKind,
    pub pos: Pos,
}

/// What one resolution (factory pass, activation, or combination) did to
/// the board: which cells died, and the per-group sizes scoring needs.
#[derive(Debug, Clone, Default)]
pub struct ActivationReport {
    pub destroyed: Vec<Pos>,
    pub groups: Vec<usize>,
}

/// Converts one detector pass worth of chains and patterns into power-up
/// placements and destroyed cells. Special patterns were detected with
/// their cells claimed, so a chain overlapping a pattern loses its claim to
/// a power-up but its cells are still destroyed.
pub fn create_power_ups(
    board: &mut Board,
    chains: &[Chain],
    patterns: &[SpecialPattern],
    fx: &mut EffectBus,
) -> (Vec<PowerUpPlacement>, ActivationReport) {
    let mut placements = Vec::new();
    let mut report = ActivationReport::default();
    let mut pattern_cells: HashSet<Pos> = HashSet::new();

    for pattern in patterns {
        for &member in &pattern.members {
            pattern_cells.insert(member);
            if member != pattern.anchor {
                destroy_plain(board, member, &mut report.destroyed);
            }
        }
        place(board, pattern.kind, pattern.anchor, &mut placements, fx);
        report.groups.push(pattern.members.len());
        fx.push(BoardEffect::Destroyed {
            cells: pattern.members.clone(),
        });
    }

    for chain in chains {
        let overlaps = chain.cells.iter().any(|c| pattern_cells.contains(c));
        let anchor = if overlaps || chain.len() < ROCKET_RUN_LENGTH {
            // Plain destruction: too short for a power-up, or the pattern
            // pass already owns part of this run
            None
        } else if chain.len() >= COLOR_BOMB_RUN_LENGTH {
            Some((PowerUpKind::ColorBomb, chain.middle()))
        } else if chain.orientation == Orientation::Horizontal {
            Some((PowerUpKind::HorizontalRocket, chain.middle()))
        } else {
            Some((PowerUpKind::VerticalRocket, chain.middle()))
        };

        // A crossing chain may have claimed the anchor cell already
        let anchor = anchor.filter(|&(_, pos)| board.get(pos).matchable().is_some());

        for &cell in &chain.cells {
            if anchor.is_none_or(|(_, pos)| pos != cell) {
                destroy_plain(board, cell, &mut report.destroyed);
            }
        }
        if let Some((kind, pos)) = anchor {
            place(board, kind, pos, &mut placements, fx);
        }
        report.groups.push(chain.len());
        fx.push(BoardEffect::Destroyed {
            cells: chain.cells.clone(),
        });
    }

    (placements, report)
}

fn place(
    board: &mut Board,
    kind: PowerUpKind,
    pos: Pos,
    placements: &mut Vec<PowerUpPlacement>,
    fx: &mut EffectBus,
) {
    let cell = board.get_mut(pos);
    cell.power_up = Some(kind);
    cell.color = None;
    cell.empty = false;
    placements.push(PowerUpPlacement { kind, pos });
    fx.push(BoardEffect::PowerUpSpawned { kind, pos });
    debug!("Spawned {kind:?} at {pos}");
}

// Ordinary destruction never touches power-up cells; those only die
// through their own activation.
fn destroy_plain(board: &mut Board, pos: Pos, destroyed: &mut Vec<Pos>) {
    let cell = board.get(pos);
    if cell.empty || cell.power_up.is_some() {
        return;
    }
    board.destroy(pos);
    destroyed.push(pos);
}

/// Activates the power-up at `pos`. If `swapped_with` holds a power-up of
/// its own, control transfers entirely to the combination resolver and the
/// single-activation logic never runs. No-op on a plain cell.
pub fn trigger_power_up(
    board: &mut Board,
    rng: &mut GemRng,
    fx: &mut EffectBus,
    pos: Pos,
    swapped_with: Option<Pos>,
) -> ActivationReport {
    if board.get(pos).power_up.is_none() {
        return ActivationReport::default();
    }
    if let Some(other) = swapped_with {
        if board.get(other).power_up.is_some() {
            return crate::combo::execute_combination(board, rng, fx, other, pos);
        }
    }

    let mut resolver = Resolver::new(board, fx);
    resolver.enqueue(pos, swapped_with);
    resolver.run();
    resolver.into_report()
}

pub(crate) struct Activation {
    pub pos: Pos,
    pub swapped_with: Option<Pos>,
}

pub(crate) struct Flight {
    pub origin: Pos,
    pub target: Pos,
}

/// Worklist-based activation engine. Every pending activation is a queue
/// entry; a position enters `consumed` exactly once, which bounds the whole
/// resolution even when power-ups reference each other. Fly-away second
/// phases are explicit flight tasks drained after the queue empties, so a
/// flight's destruction happens after every blast already in progress.
pub(crate) struct Resolver<'a> {
    pub board: &'a mut Board,
    pub fx: &'a mut EffectBus,
    pub consumed: HashSet<Pos>,
    pub(crate) queue: VecDeque<Activation>,
    pub(crate) flights: VecDeque<Flight>,
    pub(crate) destroyed: Vec<Pos>,
    pub(crate) groups: Vec<usize>,
}

impl<'a> Resolver<'a> {
    pub fn new(board: &'a mut Board, fx: &'a mut EffectBus) -> Self {
        Self {
            board,
            fx,
            consumed: HashSet::new(),
            queue: VecDeque::new(),
            flights: VecDeque::new(),
            destroyed: Vec::new(),
            groups: Vec::new(),
        }
    }

    pub fn enqueue(&mut self, pos: Pos, swapped_with: Option<Pos>) {
        self.queue.push_back(Activation { pos, swapped_with });
    }

    /// Drains activations, then flights, until both are exhausted. A
    /// completed flight may chain-activate and refill the queue.
    pub fn run(&mut self) {
        loop {
            while let Some(act) = self.queue.pop_front() {
                self.activate(act);
            }
            match self.flights.pop_front() {
                Some(flight) => self.complete_flight(&flight),
                None => break,
            }
        }
    }

    pub fn into_report(self) -> ActivationReport {
        ActivationReport {
            destroyed: self.destroyed,
            groups: self.groups,
        }
    }

    /// Consumes the two combination anchors up front so nothing re-triggers
    /// them, and counts them toward the destruction log.
    pub fn consume_anchor(&mut self, pos: Pos) {
        self.consumed.insert(pos);
        if !self.board.get(pos).empty {
            self.board.destroy(pos);
            self.destroyed.push(pos);
        }
    }

    fn activate(&mut self, act: Activation) {
        if self.consumed.contains(&act.pos) {
            return;
        }
        let Some(kind) = self.board.get(act.pos).power_up else {
            return;
        };
        self.consumed.insert(act.pos);
        self.board.destroy(act.pos);
        self.destroyed.push(act.pos);
        debug!("Activating {kind:?} at {}", act.pos);
        self.blast(act.pos, kind, act.swapped_with);
    }

    /// Applies `kind`'s footprint anchored at `origin`. The origin cell is
    /// already consumed; it counts as one member of the scoring group.
    pub(crate) fn blast(&mut self, origin: Pos, kind: PowerUpKind, swapped_with: Option<Pos>) {
        let footprint = match kind {
            PowerUpKind::HorizontalRocket => row_cells(self.board, origin.row),
            PowerUpKind::VerticalRocket => col_cells(self.board, origin.col),
            PowerUpKind::Tnt => cross_cells(self.board, origin, TNT_RADIUS),
            PowerUpKind::ColorBomb => {
                match bomb_target_color(self.board, origin, swapped_with) {
                    Some(color) => cells_of_color(self.board, color),
                    None => Vec::new(),
                }
            }
            PowerUpKind::FlyAway => {
                // Phase 1: the immediate blast around the origin. The
                // target search runs on the post-blast board, and phase 2
                // is deferred to a flight task.
                let mut neighbors = cross_cells(self.board, origin, FLY_AWAY_RADIUS);
                neighbors.retain(|&p| p != origin);
                let direct = self.apply_footprint(&neighbors);
                self.fx.push(BoardEffect::Blast {
                    kind,
                    origin,
                    cells: neighbors,
                });
                self.groups.push(1 + direct);

                if let Some(target) = find_best_target(self.board, &[origin]) {
                    self.fx.push(BoardEffect::Flight {
                        from: origin,
                        to: target,
                    });
                    self.flights.push_back(Flight { origin, target });
                }
                return;
            }
        };

        let direct = self.apply_footprint(&footprint);
        self.fx.push(BoardEffect::Blast {
            kind,
            origin,
            cells: footprint,
        });
        self.groups.push(1 + direct);
    }

    fn complete_flight(&mut self, flight: &Flight) {
        let cells = cross_cells(self.board, flight.target, FLY_AWAY_RADIUS);
        debug!("Fly-away from {} landing at {}", flight.origin, flight.target);
        let direct = self.apply_footprint(&cells);
        self.fx.push(BoardEffect::Blast {
            kind: PowerUpKind::FlyAway,
            origin: flight.target,
            cells,
        });
        self.groups.push(direct);
    }

    /// Destroys every plain cell of the footprint; cells holding a not yet
    /// consumed power-up are chain-activated instead of destroyed. Returns
    /// how many cells died directly.
    pub(crate) fn apply_footprint(&mut self, cells: &[Pos]) -> usize {
        let mut direct = 0;
        for &pos in cells {
            let cell = self.board.get(pos);
            if cell.power_up.is_some() {
                if !self.consumed.contains(&pos) {
                    self.queue.push_back(Activation {
                        pos,
                        swapped_with: None,
                    });
                }
            } else if !cell.empty {
                self.board.destroy(pos);
                self.destroyed.push(pos);
                direct += 1;
            }
        }
        direct
    }
}

/// The color a color bomb erases: the partner gem's color when swapped
/// into a plain gem, otherwise the first colored neighbor scanning
/// up, down, left, right.
fn bomb_target_color(board: &Board, origin: Pos, swapped_with: Option<Pos>) -> Option<GemColor> {
    if let Some(other) = swapped_with {
        if let Some(color) = board.get(other).matchable() {
            return Some(color);
        }
    }
    [(-1isize, 0isize), (1, 0), (0, -1), (0, 1)]
        .iter()
        .filter_map(|&(dr, dc)| board.offset(origin, dr, dc))
        .find_map(|p| board.get(p).matchable())
}

pub(crate) fn row_cells(board: &Board, row: usize) -> Vec<Pos> {
    (0..board.size()).map(|col| Pos { row, col }).collect()
}

pub(crate) fn col_cells(board: &Board, col: usize) -> Vec<Pos> {
    (0..board.size()).map(|row| Pos { row, col }).collect()
}

/// Plus-shape of the given radius, center included, clipped to the board.
pub(crate) fn cross_cells(board: &Board, center: Pos, radius: usize) -> Vec<Pos> {
    let mut cells = vec![center];
    for (dr, dc) in [(-1isize, 0isize), (1, 0), (0, -1), (0, 1)] {
        for reach in 1..=radius as isize {
            match board.offset(center, dr * reach, dc * reach) {
                Some(p) => cells.push(p),
                None => break,
            }
        }
    }
    cells
}

pub(crate) fn cells_of_color(board: &Board, color: GemColor) -> Vec<Pos> {
    board
        .positions()
        .filter(|&p| board.get(p).matchable() == Some(color))
        .collect()
}

/// The fly-away target: the colored, power-up-free cell with the most
/// same-colored orthogonal neighbors, ties broken by row-major order.
/// Positions in `excluded` never qualify.
pub(crate) fn find_best_target(board: &Board, excluded: &[Pos]) -> Option<Pos> {
    let mut best: Option<(Pos, usize)> = None;
    for pos in board.positions() {
        if excluded.contains(&pos) {
            continue;
        }
        let Some(color) = board.get(pos).matchable() else {
            continue;
        };
        let same_neighbors = [(-1isize, 0isize), (1, 0), (0, -1), (0, 1)]
            .iter()
            .filter_map(|&(dr, dc)| board.offset(pos, dr, dc))
            .filter(|&p| board.get(p).matchable() == Some(color))
            .count();
        if best.is_none_or(|(_, count)| same_neighbors > count) {
            best = Some((pos, same_neighbors));
        }
    }
    best.map(|(pos, _)| pos)
}

/// Collapses duplicate positions, keeping first-seen order.
pub(crate) fn dedup_cells(cells: Vec<Pos>) -> Vec<Pos> {
    let mut seen = HashSet::new();
    cells.into_iter().filter(|&p| seen.insert(p)).collect()
}
