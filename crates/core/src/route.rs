//! Navigation paths.

use std::fmt;

/// Where the user is: the list, or a single game addressed by id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// The filterable game list at `/`.
    Browse,
    /// The detail view at `/game/{id}`.
    Game(i64),
}

impl Route {
    /// Parse a navigation path. Unknown paths fall back to the list.
    pub fn parse(path: &str) -> Self {
        let trimmed = path.trim().trim_matches('/');
        let mut parts = trimmed.split('/');
        match (parts.next(), parts.next(), parts.next()) {
            (Some("game"), Some(id), None) => id
                .parse::<i64>()
                .map(Route::Game)
                .unwrap_or(Route::Browse),
            _ => Route::Browse,
        }
    }

    /// Path addressing this route.
    pub fn path(&self) -> String {
        match self {
            Route::Browse => "/".to_string(),
            Route::Game(id) => format!("/game/{id}"),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_game_paths() {
        assert_eq!(Route::parse("/game/3328"), Route::Game(3328));
        assert_eq!(Route::parse("game/3328/"), Route::Game(3328));
        assert_eq!(Route::Game(3328).path(), "/game/3328");
    }

    #[test]
    fn unknown_paths_fall_back_to_browse() {
        assert_eq!(Route::parse("/"), Route::Browse);
        assert_eq!(Route::parse("/game/witcher"), Route::Browse);
        assert_eq!(Route::parse("/game/1/extra"), Route::Browse);
        assert_eq!(Route::parse("/games"), Route::Browse);
    }
}
