use std::net::{IpAddr, SocketAddr};

use clap::Parser;
use sim_rs::GameConfig;

#[derive(Debug, Parser)]
#[command(author, version, about = "Play Sim against a minimax opponent over HTTP")]
pub(crate) struct Config {
    /// Address to listen on
    #[arg(long, env = "SIM_HOST", default_value = "127.0.0.1")]
    host: IpAddr,

    #[arg(long, env = "PORT", default_value_t = 4000)]
    port: u16,

    /// Number of points on every new board
    #[arg(long, env = "SIM_POINTS", default_value_t = 6)]
    points: usize,

    /// Search depth used when `/start` doesn't ask for one
    #[arg(long, env = "SIM_DIFFICULTY", default_value_t = 3)]
    default_difficulty: usize,

    /// Requested difficulties above this are clamped down to it
    #[arg(long, env = "SIM_MAX_DIFFICULTY", default_value_t = 8)]
    max_difficulty: usize,
}

impl Config {
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::from((self.host, self.port))
    }

    pub fn game_settings(&self) -> GameSettings {
        GameSettings {
            points: self.points,
            default_difficulty: self.default_difficulty.min(self.max_difficulty),
            max_difficulty: self.max_difficulty,
        }
    }
}

/// What every game started by this server looks like
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct GameSettings {
    pub points: usize,
    pub default_difficulty: usize,
    pub max_difficulty: usize,
}

impl Default for GameSettings {
    fn default() -> Self {
        let defaults = GameConfig::default();

        Self {
            points: defaults.points,
            default_difficulty: defaults.difficulty,
            max_difficulty: 8,
        }
    }
}

impl GameSettings {
    pub fn config_for(&self, requested_difficulty: Option<usize>) -> GameConfig {
        let difficulty = requested_difficulty
            .unwrap_or(self.default_difficulty)
            .min(self.max_difficulty);

        GameConfig {
            points: self.points,
            difficulty,
        }
    }
}
