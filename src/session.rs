//! Local score accumulation and leaderboard standings.
//!
//! The round controller reports each positive score here; the session keeps
//! per-player totals and produces the ranked standings the sidebar overlay
//! renders. Everything is in-memory for the lifetime of the page — remote
//! persistence and authentication are deliberately out of scope.

/// One leaderboard entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Player {
    pub id: String,
    pub name: String,
    pub score: u32,
}

/// Seed opponents shown on a fresh leaderboard so the player has something
/// to chase from the first round.
const SEED_PLAYERS: &[(&str, &str, u32)] = &[
    ("player-1", "AI-Player-1", 150),
    ("player-2", "AI-Player-2", 125),
    ("player-3", "AI-Player-3", 90),
    ("player-4", "AI-Player-4", 50),
];

/// One browser session: the signed-in player plus the seeded opponents.
pub struct Session {
    players: Vec<Player>,
    current: usize,
}

impl Session {
    /// Start a session for `name` with a zero score, alongside the seeded
    /// opponents.
    pub fn new(name: &str) -> Self {
        let mut players: Vec<Player> = SEED_PLAYERS
            .iter()
            .map(|&(id, name, score)| Player {
                id: id.to_string(),
                name: name.to_string(),
                score,
            })
            .collect();
        players.push(Player {
            id: "user-local".to_string(),
            name: name.to_string(),
            score: 0,
        });
        let current = players.len() - 1;
        Session { players, current }
    }

    /// Credit a finished round to the current player.
    pub fn report_score(&mut self, points: u32) {
        self.players[self.current].score += points;
    }

    pub fn current_score(&self) -> u32 {
        self.players[self.current].score
    }

    pub fn current_name(&self) -> &str {
        &self.players[self.current].name
    }

    /// Is this standings entry the session's own player?
    pub fn is_current(&self, player: &Player) -> bool {
        player.id == self.players[self.current].id
    }

    /// Players ranked by score, highest first. The sort is stable so equal
    /// scores keep their insertion order.
    pub fn standings(&self) -> Vec<&Player> {
        let mut ranked: Vec<&Player> = self.players.iter().collect();
        ranked.sort_by(|a, b| b.score.cmp(&a.score));
        ranked
    }
}
