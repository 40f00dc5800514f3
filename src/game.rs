#![warn(clippy::all, clippy::pedantic)]

// Game board dimensions
pub const BOARD_SIZE: usize = 8;

// Minimum run length for a linear match
pub const EXPLOSION_THRESHOLD: usize = 3;

// Number of normal gem colors in the palette
pub const PALETTE_SIZE: usize = 6;

// Scoring
pub const CHAIN_BASE_POINTS: u32 = 50; // Per cell beyond the free two of any destruction group

// Power-up thresholds (run lengths)
pub const ROCKET_RUN_LENGTH: usize = 4; // Run of 4 makes a rocket
pub const COLOR_BOMB_RUN_LENGTH: usize = 5; // Run of 5+ makes a color bomb

// Blast radii
pub const TNT_RADIUS: usize = 2; // TNT reaches 2 cells in each axis direction
pub const FLY_AWAY_RADIUS: usize = 1; // Fly-away blasts are a tight cross
pub const FLY_AWAY_COMBO_TARGETS: usize = 3; // Targets hit by a double fly-away

// Move budget for a fresh game (config can override)
pub const DEFAULT_STARTING_MOVES: u32 = 30;

// Presentation pacing (seconds); the engine resolves synchronously, these
// only gate how fast the host accepts the next move
pub const DESTRUCTION_PAUSE: f32 = 0.25;
pub const FLIGHT_PAUSE: f32 = 0.45;

/// Points for a destruction group of `n` cells at the given cascade depth.
///
/// A linear chain of length L scores `50 * (L - 2)` on the first pass of a
/// move, doubled on the second pass, tripled on the third, and so on. The
/// same rule applies to special patterns, power-up activations, and
/// combinations, keyed on how many cells the group destroyed directly.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn chain_points(cells_destroyed: usize, cascade_index: u32) -> u32 {
    let beyond = cells_destroyed.saturating_sub(EXPLOSION_THRESHOLD - 1) as u32;
    CHAIN_BASE_POINTS * beyond * (cascade_index + 1)
}
