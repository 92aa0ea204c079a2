use ratatui::prelude::*;

use crate::stats::GameStats;

/// HUD text for score / high score / level / ships left. The formatted
/// strings are cached and only re-prepared when the underlying numbers
/// change, so the per-frame cost is a clone of ready-made spans.
pub struct Scoreboard {
    score_text: String,
    high_score_text: String,
    level_text: String,
    ships_text: String,
}

impl Scoreboard {
    pub fn new(stats: &GameStats) -> Self {
        let mut sb = Scoreboard {
            score_text: String::new(),
            high_score_text: String::new(),
            level_text: String::new(),
            ships_text: String::new(),
        };
        sb.prep_score(stats);
        sb.prep_high_score(stats);
        sb.prep_level(stats);
        sb.prep_ships(stats);
        sb
    }

    pub fn prep_score(&mut self, stats: &GameStats) {
        self.score_text = format!("Score: {} ", stats.score);
    }

    pub fn prep_high_score(&mut self, stats: &GameStats) {
        self.high_score_text = format!("High: {} ", stats.high_score);
    }

    pub fn prep_level(&mut self, stats: &GameStats) {
        self.level_text = format!("Level: {} ", stats.level);
    }

    pub fn prep_ships(&mut self, stats: &GameStats) {
        self.ships_text = format!("Ships: {}", "\u{25b2} ".repeat(stats.ships_left as usize));
    }

    pub fn status_line(&self) -> Line<'static> {
        Line::from(vec![
            Span::styled(" \u{1f6f8} ", Style::default()),
            Span::styled(
                self.score_text.clone(),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
            Span::styled(" | ", Style::default().fg(Color::DarkGray)),
            Span::styled(self.high_score_text.clone(), Style::default().fg(Color::Cyan)),
            Span::styled(" | ", Style::default().fg(Color::DarkGray)),
            Span::styled(self.level_text.clone(), Style::default().fg(Color::Green)),
            Span::styled(" | ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                self.ships_text.clone(),
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn stats() -> GameStats {
        GameStats::load_from(PathBuf::from("/nonexistent/score"), 3)
    }

    #[test]
    fn cached_text_tracks_preps() {
        let mut stats = stats();
        let mut sb = Scoreboard::new(&stats);
        assert_eq!(sb.score_text, "Score: 0 ");

        stats.score = 1250;
        // Not re-prepped yet: the cache is stale on purpose
        assert_eq!(sb.score_text, "Score: 0 ");
        sb.prep_score(&stats);
        assert_eq!(sb.score_text, "Score: 1250 ");
    }

    #[test]
    fn ships_text_shows_one_marker_per_ship() {
        let mut stats = stats();
        stats.ships_left = 2;
        let sb = Scoreboard::new(&stats);
        assert_eq!(sb.ships_text.matches('\u{25b2}').count(), 2);
    }
}
