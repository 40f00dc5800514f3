#![warn(clippy::all, clippy::pedantic)]
#![allow(
    // Allow truncation when casting from usize to i32 since board dimensions are always small enough to fit in i32
    clippy::cast_possible_truncation,
    // Allow sign loss when going from signed to unsigned types since we validate values are non-negative before casting
    clippy::cast_sign_loss,
    // Allow precision loss when casting between numeric types since exact precision isn't critical in this game
    clippy::cast_precision_loss,
    // Allow potential wrapping when casting between types of same size as we validate values are in range
    clippy::cast_possible_wrap,
    // Allow more than 3 bools in structs for game states and input handling where bools represent distinct flags
    clippy::struct_excessive_bools
)]

use bevy_ecs::prelude::*;
use crossterm::event::KeyEvent;
use std::fmt;
use std::time::Instant;

use crate::game::{BOARD_SIZE, DEFAULT_STARTING_MOVES, PALETTE_SIZE};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GemColor {
    Red,
    Green,
    Blue,
    Yellow,
    Magenta,
    Cyan,
}

impl GemColor {
    pub const PALETTE: [GemColor; PALETTE_SIZE] = [
        GemColor::Red,
        GemColor::Green,
        GemColor::Blue,
        GemColor::Yellow,
        GemColor::Magenta,
        GemColor::Cyan,
    ];

    #[must_use]
    pub fn ui_color(self) -> ratatui::style::Color {
        match self {
            GemColor::Red => ratatui::style::Color::Red,
            GemColor::Green => ratatui::style::Color::Green,
            GemColor::Blue => ratatui::style::Color::Blue,
            GemColor::Yellow => ratatui::style::Color::Yellow,
            GemColor::Magenta => ratatui::style::Color::Magenta,
            GemColor::Cyan => ratatui::style::Color::Cyan,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PowerUpKind {
    HorizontalRocket,
    VerticalRocket,
    Tnt,
    ColorBomb,
    FlyAway,
}

impl PowerUpKind {
    #[must_use]
    pub fn glyph(self) -> &'static str {
        match self {
            PowerUpKind::HorizontalRocket => "==",
            PowerUpKind::VerticalRocket => "||",
            PowerUpKind::Tnt => "**",
            PowerUpKind::ColorBomb => "()",
            PowerUpKind::FlyAway => "->",
        }
    }
}

/// A board coordinate. `row` 0 is the top of the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pos {
    pub row: usize,
    pub col: usize,
}

impl Pos {
    #[must_use]
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// True if `other` shares an edge with this position.
    #[must_use]
    pub fn is_adjacent(self, other: Pos) -> bool {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col) == 1
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// One slot of the board arena. A cell holding a power-up has no gem color,
/// which keeps it out of linear matching entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub color: Option<GemColor>,
    pub empty: bool,
    pub power_up: Option<PowerUpKind>,
}

impl Cell {
    #[must_use]
    pub fn gem(color: GemColor) -> Self {
        Self {
            color: Some(color),
            empty: false,
            power_up: None,
        }
    }

    #[must_use]
    pub fn vacant() -> Self {
        Self {
            color: None,
            empty: true,
            power_up: None,
        }
    }

    /// The color this cell contributes to run and pattern matching, if any.
    /// Empty cells and power-up cells never match.
    #[must_use]
    pub fn matchable(&self) -> Option<GemColor> {
        if self.empty || self.power_up.is_some() {
            None
        } else {
            self.color
        }
    }
}

// Contract violations of deterministic board injection; gameplay rejections
// are MoveOutcome { accepted: false }, never errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    NotSquare { rows: usize, bad_row_len: usize },
    EmptyGrid,
    OutOfRange { row: usize, col: usize },
}

impl fmt::Display for BoardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoardError::NotSquare { rows, bad_row_len } => {
                write!(f, "board must be square: {rows} rows but a row of {bad_row_len} cells")
            }
            BoardError::EmptyGrid => write!(f, "board must have at least one row"),
            BoardError::OutOfRange { row, col } => {
                write!(f, "position ({row}, {col}) is outside the board")
            }
        }
    }
}

impl std::error::Error for BoardError {}

/// The board: a flat row-major arena of cells. Cells are addressed by
/// `row * size + col` and swapped by value; the arena itself never resizes.
#[derive(Resource, Debug, Clone, PartialEq, Eq)]
pub struct Board {
    size: usize,
    cells: Vec<Cell>,
}

impl Board {
    #[must_use]
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![Cell::vacant(); size * size],
        }
    }

    /// Builds a board from an explicit color grid, bypassing random
    /// initialization and its no-match guarantee. Rejects non-square input.
    pub fn from_colors(rows: &[Vec<GemColor>]) -> Result<Self, BoardError> {
        let size = rows.len();
        if size == 0 {
            return Err(BoardError::EmptyGrid);
        }
        for row in rows {
            if row.len() != size {
                return Err(BoardError::NotSquare {
                    rows: size,
                    bad_row_len: row.len(),
                });
            }
        }

        let mut board = Board::new(size);
        for (r, row) in rows.iter().enumerate() {
            for (c, &color) in row.iter().enumerate() {
                board.cells[r * size + c] = Cell::gem(color);
            }
        }
        Ok(board)
    }

    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    fn idx(&self, pos: Pos) -> usize {
        debug_assert!(pos.row < self.size && pos.col < self.size);
        pos.row * self.size + pos.col
    }

    #[must_use]
    pub fn in_bounds(&self, pos: Pos) -> bool {
        pos.row < self.size && pos.col < self.size
    }

    /// The position `(dr, dc)` away from `pos`, if it stays on the board.
    #[must_use]
    pub fn offset(&self, pos: Pos, dr: isize, dc: isize) -> Option<Pos> {
        let row = pos.row.checked_add_signed(dr)?;
        let col = pos.col.checked_add_signed(dc)?;
        let candidate = Pos { row, col };
        self.in_bounds(candidate).then_some(candidate)
    }

    #[must_use]
    pub fn get(&self, pos: Pos) -> &Cell {
        &self.cells[self.idx(pos)]
    }

    pub fn get_mut(&mut self, pos: Pos) -> &mut Cell {
        let i = self.idx(pos);
        &mut self.cells[i]
    }

    /// Exchanges the two cells. Positions themselves are fixed slots; the
    /// cell contents move.
    pub fn swap(&mut self, a: Pos, b: Pos) {
        let (ia, ib) = (self.idx(a), self.idx(b));
        self.cells.swap(ia, ib);
    }

    /// Row-major iteration over every position.
    pub fn positions(&self) -> impl Iterator<Item = Pos> + use<> {
        let size = self.size;
        (0..size).flat_map(move |row| (0..size).map(move |col| Pos { row, col }))
    }

    /// Marks the cell destroyed. Callers are responsible for routing
    /// power-up cells through activation instead.
    pub fn destroy(&mut self, pos: Pos) {
        let cell = self.get_mut(pos);
        cell.color = None;
        cell.power_up = None;
        cell.empty = true;
    }

    /// Direct power-up placement for tests and tooling.
    pub fn spawn_power_up(&mut self, kind: PowerUpKind, pos: Pos) -> Result<(), BoardError> {
        if !self.in_bounds(pos) {
            return Err(BoardError::OutOfRange {
                row: pos.row,
                col: pos.col,
            });
        }
        let cell = self.get_mut(pos);
        cell.power_up = Some(kind);
        cell.color = None;
        cell.empty = false;
        Ok(())
    }

    /// Compacts every column downward: each surviving cell is swapped into
    /// the lowest empty slot below it, preserving relative order. Returns
    /// the new position and fall distance of every cell that moved.
    pub fn make_cells_fall(&mut self) -> Vec<(Pos, usize)> {
        let mut falls = Vec::new();

        for col in 0..self.size {
            // Lowest row still awaiting a survivor, scanned bottom-up
            let mut write = self.size as isize - 1;
            for row in (0..self.size).rev() {
                let pos = Pos { row, col };
                if self.get(pos).empty {
                    continue;
                }
                let target = write as usize;
                if target != row {
                    self.swap(pos, Pos { row: target, col });
                    falls.push((Pos { row: target, col }, target - row));
                }
                write -= 1;
            }
        }

        falls
    }

    /// Fills every empty cell with a fresh random gem. Unlike board
    /// initialization, refilled colors are not checked against the board:
    /// a refill may legally create an immediate match for the next pass.
    pub fn refill(&mut self, rng: &mut GemRng) -> Vec<Pos> {
        let mut refilled = Vec::new();
        for pos in self.positions().collect::<Vec<_>>() {
            if self.get(pos).empty {
                *self.get_mut(pos) = Cell::gem(rng.pick(&GemColor::PALETTE));
                refilled.push(pos);
            }
        }
        refilled
    }

    #[must_use]
    pub fn count_empty(&self) -> usize {
        self.cells.iter().filter(|c| c.empty).count()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new(BOARD_SIZE)
    }
}

/// Seeded random source for initialization and refill. Wraps `fastrand` so
/// tests can sow a fixed seed and replay a board exactly.
#[derive(Resource, Debug, Clone)]
pub struct GemRng {
    rng: fastrand::Rng,
}

impl GemRng {
    #[must_use]
    pub fn new() -> Self {
        Self {
            rng: fastrand::Rng::new(),
        }
    }

    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: fastrand::Rng::with_seed(seed),
        }
    }

    /// Reseeds the source in place.
    pub fn sow(&mut self, seed: u64) {
        self.rng = fastrand::Rng::with_seed(seed);
    }

    /// Uniformly picks one color from the given palette.
    pub fn pick(&mut self, palette: &[GemColor]) -> GemColor {
        palette[self.rng.usize(..palette.len())]
    }

    pub fn usize(&mut self, upper: usize) -> usize {
        self.rng.usize(..upper)
    }
}

impl Default for GemRng {
    fn default() -> Self {
        Self::new()
    }
}

// Everything the presentation layer needs to play a destruction, flight or
// refill without touching the board.
#[derive(Debug, Clone)]
pub enum BoardEffect {
    Destroyed {
        cells: Vec<Pos>,
    },
    Blast {
        kind: PowerUpKind,
        origin: Pos,
        cells: Vec<Pos>,
    },
    Combination {
        kinds: (PowerUpKind, PowerUpKind),
        anchor: Pos,
        cells: Vec<Pos>,
    },
    Flight {
        from: Pos,
        to: Pos,
    },
    PowerUpSpawned {
        kind: PowerUpKind,
        pos: Pos,
    },
    Refilled {
        cells: Vec<Pos>,
    },
}

/// Effect sink injected into the engine. The engine appends, the host
/// drains; the engine never blocks on presentation.
#[derive(Resource, Debug, Default)]
pub struct EffectBus {
    events: Vec<BoardEffect>,
}

impl EffectBus {
    pub fn push(&mut self, effect: BoardEffect) {
        self.events.push(effect);
    }

    pub fn drain(&mut self) -> Vec<BoardEffect> {
        std::mem::take(&mut self.events)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOverReason {
    OutOfMoves,
    NoLegalMoves,
}

#[derive(Debug, Resource, Clone)]
pub struct GameState {
    pub score: u32,
    pub moves_left: u32,
    pub moves_used: u32,
    pub game_over: bool,
    pub game_over_reason: Option<GameOverReason>,
    pub cascades_resolved: u32,
    pub best_cascade: u32,
    pub power_ups_created: u32,
    pub started_at: Instant,
    pub finished_at: Option<Instant>,
    pub last_key: Option<KeyEvent>,
    pub was_paused_for_resize: bool,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            score: 0,
            moves_left: DEFAULT_STARTING_MOVES,
            moves_used: 0,
            game_over: false,
            game_over_reason: None,
            cascades_resolved: 0,
            best_cascade: 0,
            power_ups_created: 0,
            started_at: Instant::now(),
            finished_at: None,
            last_key: None,
            was_paused_for_resize: false,
        }
    }
}

impl GameState {
    #[must_use]
    pub fn with_moves(starting_moves: u32) -> Self {
        Self {
            moves_left: starting_moves,
            ..Self::default()
        }
    }

    pub fn reset(&mut self, starting_moves: u32) {
        *self = Self::with_moves(starting_moves);
    }

    pub fn end_game(&mut self, reason: GameOverReason) {
        if !self.game_over {
            self.game_over = true;
            self.game_over_reason = Some(reason);
            self.finished_at = Some(Instant::now());
        }
    }

    /// The `{score, moves, duration}` tuple handed to external score
    /// consumers once the game ends.
    #[must_use]
    pub fn final_summary(&self) -> (u32, u32, f32) {
        let end = self.finished_at.unwrap_or_else(Instant::now);
        let duration = end.duration_since(self.started_at).as_secs_f32();
        (self.score, self.moves_used, duration)
    }
}

/// Cursor and pending selection for the swap input flow.
#[derive(Resource, Debug, Clone)]
pub struct Cursor {
    pub pos: Pos,
    pub selected: Option<Pos>,
}

impl Default for Cursor {
    fn default() -> Self {
        Self {
            pos: Pos::new(BOARD_SIZE / 2, BOARD_SIZE / 2),
            selected: None,
        }
    }
}

/// Remaining presentation time for the move in flight. The engine resolves
/// synchronously; this only stops the host accepting the next move while
/// destruction and flight effects are still playing.
#[derive(Resource, Debug, Clone, Default)]
pub struct EffectClock {
    pub cooldown: f32,
}

impl EffectClock {
    #[must_use]
    pub fn busy(&self) -> bool {
        self.cooldown > 0.0
    }

    pub fn extend(&mut self, seconds: f32) {
        // Cap so a monster cascade cannot lock the board for long
        self.cooldown = (self.cooldown + seconds).min(3.0);
    }

    pub fn tick(&mut self, delta_seconds: f32) {
        self.cooldown = (self.cooldown - delta_seconds).max(0.0);
    }
}

// Input state for keyboard controls
#[derive(Resource, Debug, Clone, Default)]
pub struct Input {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub select: bool,
    pub cancel: bool,
    pub restart: bool,
}

// Particle system for visual effects
#[derive(Debug, Clone, Component)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub velocity: (f32, f32),
    pub color: ratatui::style::Color,
    pub lifetime: f32,
    pub size: f32,
}

// Screen shake effect
#[derive(Debug, Clone, Resource, Default)]
pub struct ScreenShake {
    pub intensity: f32,
    pub duration: f32,
    pub current_offset: (i16, i16),
    pub is_active: bool,
    pub horizontal_bias: bool, // When true, shake will prioritize horizontal movement
}
