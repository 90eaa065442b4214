//=========================================================================
// Game State
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;

//=== GameState ===========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GameState {
    /// Title screen. Windows can be pushed around; ESC quits.
    #[default]
    Attract,
    /// Gameplay. ESC returns to the attract screen.
    Game,
}

impl GameState {
    /// Label carried in `OnGameStateChanged` arguments.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Attract => "ATTRACT",
            Self::Game => "GAME",
        }
    }

    /// Inverse of [`as_str`](Self::as_str).
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "ATTRACT" => Some(Self::Attract),
            "GAME" => Some(Self::Game),
            _ => None,
        }
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
