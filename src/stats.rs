use std::fs;
use std::path::{Path, PathBuf};

/// Mutable run state plus the one value that outlives a run: the high
/// score, persisted as a decimal ASCII integer in a file next to the
/// executable.
pub struct GameStats {
    pub score: u32,
    pub level: u32,
    pub ships_left: u32,
    pub game_active: bool,
    pub high_score: u32,
    path: PathBuf,
}

impl GameStats {
    pub fn load(ship_limit: u32) -> Self {
        Self::load_from(Self::score_path(), ship_limit)
    }

    pub fn load_from(path: PathBuf, ship_limit: u32) -> Self {
        let high_score = read_high_score(&path);
        let mut stats = GameStats {
            score: 0,
            level: 1,
            ships_left: 0,
            game_active: false,
            high_score,
            path,
        };
        stats.reset(ship_limit);
        stats
    }

    fn score_path() -> PathBuf {
        // Store next to the executable
        if let Ok(exe) = std::env::current_exe() {
            if let Some(dir) = exe.parent() {
                return dir.join("alien_invasion.score");
            }
        }
        PathBuf::from("alien_invasion.score")
    }

    /// Reset everything that does not survive across runs.
    pub fn reset(&mut self, ship_limit: u32) {
        self.ships_left = ship_limit;
        self.score = 0;
        self.level = 1;
    }

    /// Fold the current score into the session high score. Returns true
    /// if a new high score was set.
    pub fn check_high_score(&mut self) -> bool {
        if self.score > self.high_score {
            self.high_score = self.score;
            true
        } else {
            false
        }
    }

    /// Best-effort write on quit; failures are logged and ignored.
    pub fn save_high_score(&self) {
        if let Err(err) = fs::write(&self.path, self.high_score.to_string()) {
            log::error!("failed to write high score to {:?}: {err}", self.path);
        }
    }
}

fn read_high_score(path: &Path) -> u32 {
    fs::read_to_string(path)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(0)
}
