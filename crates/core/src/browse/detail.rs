use crate::models::Game;

/// State of the single-game view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailState {
    /// Waiting for the lookup of `id`.
    Loading {
        /// Requested game.
        id: i64,
    },
    /// The lookup succeeded.
    Ready {
        /// Requested game.
        id: i64,
        /// Loaded record.
        game: Game,
    },
    /// The lookup failed; the placeholder stays up.
    Unavailable {
        /// Requested game.
        id: i64,
    },
}

impl DetailState {
    /// Start viewing `id`.
    pub fn open(id: i64) -> Self {
        DetailState::Loading { id }
    }

    /// Identifier of the game this view is addressed by.
    pub fn id(&self) -> i64 {
        match self {
            DetailState::Loading { id }
            | DetailState::Ready { id, .. }
            | DetailState::Unavailable { id } => *id,
        }
    }

    /// The loaded game, if any.
    pub fn game(&self) -> Option<&Game> {
        match self {
            DetailState::Ready { game, .. } => Some(game),
            _ => None,
        }
    }

    /// Whether the view still shows its placeholder.
    pub fn is_placeholder(&self) -> bool {
        self.game().is_none()
    }

    /// Apply a lookup result for `id`. Results for another game are ignored.
    pub fn resolve(&mut self, id: i64, game: Option<Game>) -> bool {
        if !matches!(self, DetailState::Loading { id: current } if *current == id) {
            return false;
        }
        *self = match game {
            Some(game) => DetailState::Ready { id, game },
            None => DetailState::Unavailable { id },
        };
        true
    }
}
