#![warn(clippy::all, clippy::pedantic)]

use bevy_ecs::prelude::*;
use std::error;

use crate::Time;
use crate::components::{Cursor, EffectBus, EffectClock, GameState, GemRng, Input, ScreenShake};
use crate::config;
use crate::engine;

pub type AppResult<T> = std::result::Result<T, Box<dyn error::Error>>;

pub struct App {
    pub world: World,
    pub should_quit: bool,
    pub score: u32,
    pub moves_left: u32,
}

impl App {
    pub fn new() -> Self {
        let starting_moves = config::starting_moves();

        let mut world = World::new();
        world.insert_resource(Time::new());
        world.insert_resource(Input::default());
        world.insert_resource(ScreenShake::default());
        world.insert_resource(EffectClock::default());
        world.insert_resource(EffectBus::default());
        world.insert_resource(Cursor::default());
        world.insert_resource(GameState::with_moves(starting_moves));

        let mut rng = GemRng::new();
        let board = engine::new_board(&mut rng);
        world.insert_resource(board);
        world.insert_resource(rng);

        Self {
            world,
            should_quit: false,
            score: 0,
            moves_left: starting_moves,
        }
    }

    // Mirror the bits of game state the render loop reads every frame
    pub fn sync_game_state(&mut self) {
        let game_state = self.world.resource::<GameState>();
        self.score = game_state.score;
        self.moves_left = game_state.moves_left;
    }

    /// Starts a fresh game: new board, full move budget, cleared effects.
    /// The random source is kept so a seeded session stays reproducible.
    pub fn reset(&mut self) {
        crate::systems::new_game(&mut self.world);
        self.sync_game_state();
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}
