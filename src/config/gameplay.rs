use serde::{Deserialize, Serialize};

// Tunables for a game session and its presentation pacing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameplayConfig {
    // How many moves a fresh game starts with
    pub starting_moves: u32,

    // Seconds the board stays locked after a destruction pass
    pub destruction_pause: f32,

    // Extra seconds for a fly-away's travel before its landing blast shows
    pub flight_pause: f32,

    // Particle effects can be turned off for slow terminals
    pub particles_enabled: bool,
}

impl Default for GameplayConfig {
    fn default() -> Self {
        Self {
            starting_moves: crate::game::DEFAULT_STARTING_MOVES,
            destruction_pause: crate::game::DESTRUCTION_PAUSE,
            flight_pause: crate::game::FLIGHT_PAUSE,
            particles_enabled: true,
        }
    }
}
