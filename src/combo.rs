#![warn(clippy::all, clippy::pedantic)]
#![allow(
    // Allow potential wrapping when casting between types of same size as blast radii are tiny
    clippy::cast_possible_wrap
)]

use log::debug;

use crate::components::{Board, BoardEffect, EffectBus, GemColor, GemRng, Pos, PowerUpKind};
use crate::game::{FLY_AWAY_COMBO_TARGETS, FLY_AWAY_RADIUS, TNT_RADIUS};
use crate::powerup::{
    ActivationReport, Resolver, cells_of_color, col_cells, cross_cells, dedup_cells,
    find_best_target, row_cells,
};

// Reach of the combined fly-away + TNT blast
const FLY_AWAY_TNT_RADIUS: usize = 4;

/// Resolves the swap of two power-ups into one combined effect anchored at
/// `second`, the swap destination. Both power-ups are consumed up front and
/// never re-trigger; everything else their footprint touches either dies or
/// chain-activates. The pair lookup is order-independent.
pub fn execute_combination(
    board: &mut Board,
    rng: &mut GemRng,
    fx: &mut EffectBus,
    first: Pos,
    second: Pos,
) -> ActivationReport {
    let (Some(first_kind), Some(second_kind)) =
        (board.get(first).power_up, board.get(second).power_up)
    else {
        return ActivationReport::default();
    };

    let anchor = second;
    let pair = if first_kind <= second_kind {
        (first_kind, second_kind)
    } else {
        (second_kind, first_kind)
    };
    debug!("Combination {pair:?} anchored at {anchor}");

    let footprint = combined_footprint(board, rng, fx, anchor, pair);

    let mut resolver = Resolver::new(board, fx);
    match footprint {
        Some(cells) => {
            resolver.consume_anchor(first);
            resolver.consume_anchor(second);
            let direct = resolver.apply_footprint(&cells);
            resolver.groups.push(2 + direct);
            resolver.fx.push(BoardEffect::Combination {
                kinds: (first_kind, second_kind),
                anchor,
                cells,
            });
        }
        None => {
            // Unknown pairing: each power-up simply fires on its own
            resolver.enqueue(first, None);
            resolver.enqueue(second, None);
        }
    }
    resolver.run();
    resolver.into_report()
}

#[allow(clippy::too_many_lines)]
fn combined_footprint(
    board: &Board,
    rng: &mut GemRng,
    fx: &mut EffectBus,
    anchor: Pos,
    pair: (PowerUpKind, PowerUpKind),
) -> Option<Vec<Pos>> {
    use PowerUpKind::{ColorBomb, FlyAway, HorizontalRocket, Tnt, VerticalRocket};

    let cells = match pair {
        (HorizontalRocket, VerticalRocket) => {
            let mut cells = row_cells(board, anchor.row);
            cells.extend(col_cells(board, anchor.col));
            cells
        }
        (HorizontalRocket, HorizontalRocket) => {
            let mut cells = Vec::new();
            for dr in -1isize..=1 {
                if let Some(p) = board.offset(anchor, dr, 0) {
                    cells.extend(row_cells(board, p.row));
                }
            }
            cells
        }
        (VerticalRocket, VerticalRocket) => {
            let mut cells = Vec::new();
            for dc in -1isize..=1 {
                if let Some(p) = board.offset(anchor, 0, dc) {
                    cells.extend(col_cells(board, p.col));
                }
            }
            cells
        }
        (Tnt, Tnt) => {
            let mut cells = Vec::new();
            for dr in -2isize..=2 {
                for dc in -2isize..=2 {
                    if let Some(p) = board.offset(anchor, dr, dc) {
                        cells.push(p);
                    }
                }
            }
            cells
        }
        (HorizontalRocket, Tnt) => {
            let mut cells = Vec::new();
            for p in row_cells(board, anchor.row) {
                cells.extend(cross_cells(board, p, TNT_RADIUS));
            }
            cells
        }
        (VerticalRocket, Tnt) => {
            let mut cells = Vec::new();
            for p in col_cells(board, anchor.col) {
                cells.extend(cross_cells(board, p, TNT_RADIUS));
            }
            cells
        }
        (ColorBomb, ColorBomb) => board.positions().collect(),
        (HorizontalRocket, ColorBomb) => {
            let color = combo_target_color(board, rng, anchor);
            let mut cells = Vec::new();
            for p in cells_of_color(board, color) {
                cells.extend(row_cells(board, p.row));
            }
            cells
        }
        (VerticalRocket, ColorBomb) => {
            let color = combo_target_color(board, rng, anchor);
            let mut cells = Vec::new();
            for p in cells_of_color(board, color) {
                cells.extend(col_cells(board, p.col));
            }
            cells
        }
        (Tnt, ColorBomb) => {
            let color = combo_target_color(board, rng, anchor);
            let mut cells = Vec::new();
            for p in cells_of_color(board, color) {
                cells.extend(cross_cells(board, p, TNT_RADIUS));
            }
            cells
        }
        (ColorBomb, FlyAway) => {
            let color = combo_target_color(board, rng, anchor);
            let mut cells = Vec::new();
            for p in cells_of_color(board, color) {
                cells.extend(cross_cells(board, p, FLY_AWAY_RADIUS));
            }
            cells
        }
        (FlyAway, FlyAway) => {
            let mut cells = Vec::new();
            let mut picked = Vec::new();
            for _ in 0..FLY_AWAY_COMBO_TARGETS {
                let Some(target) = find_best_target(board, &picked) else {
                    break;
                };
                fx.push(BoardEffect::Flight {
                    from: anchor,
                    to: target,
                });
                cells.extend(cross_cells(board, target, FLY_AWAY_RADIUS));
                picked.push(target);
            }
            cells
        }
        (HorizontalRocket, FlyAway) => {
            let target = flight_target(board, fx, anchor);
            row_cells(board, target.row)
        }
        (VerticalRocket, FlyAway) => {
            let target = flight_target(board, fx, anchor);
            col_cells(board, target.col)
        }
        (Tnt, FlyAway) => {
            let target = flight_target(board, fx, anchor);
            cross_cells(board, target, FLY_AWAY_TNT_RADIUS)
        }
        _ => return None,
    };

    Some(dedup_cells(cells))
}

// Best fly-away target, with the anchor itself as the fallback when the
// board offers no colored cell at all.
fn flight_target(board: &Board, fx: &mut EffectBus, anchor: Pos) -> Pos {
    match find_best_target(board, &[]) {
        Some(target) => {
            fx.push(BoardEffect::Flight {
                from: anchor,
                to: target,
            });
            target
        }
        None => anchor,
    }
}

/// The color a color-bomb combination erases: a colored neighbor of the
/// anchor when one exists, otherwise a random palette color.
fn combo_target_color(board: &Board, rng: &mut GemRng, anchor: Pos) -> GemColor {
    [(-1isize, 0isize), (1, 0), (0, -1), (0, 1)]
        .iter()
        .filter_map(|&(dr, dc)| board.offset(anchor, dr, dc))
        .find_map(|p| board.get(p).matchable())
        .unwrap_or_else(|| rng.pick(&GemColor::PALETTE))
}
