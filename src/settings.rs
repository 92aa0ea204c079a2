use ratatui::style::Color;

/// Logical playfield units an entity moves per tick, per unit of
/// configured speed.
pub const TICK_SCALE: f32 = 12.0;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Difficulty {
    Normal,
    Hard,
    Nightmare,
}

impl Difficulty {
    pub fn label(&self) -> &'static str {
        match self {
            Difficulty::Normal => "Normal",
            Difficulty::Hard => "Hard",
            Difficulty::Nightmare => "Nightmare",
        }
    }

    pub fn color(&self) -> Color {
        match self {
            Difficulty::Normal => Color::Rgb(0, 255, 0),
            Difficulty::Hard => Color::Rgb(255, 255, 0),
            Difficulty::Nightmare => Color::Rgb(255, 0, 0),
        }
    }
}

/// All tunables for one run. The dynamic block at the bottom is only ever
/// written by `apply_difficulty` or `increase_speed`.
pub struct Settings {
    // Playfield
    pub screen_width: i32,
    pub screen_height: i32,
    pub bg_color: Color,

    // Ship
    pub ship_limit: u32,
    pub ship_width: i32,
    pub ship_height: i32,

    // Bullets
    pub bullet_width: i32,
    pub bullet_height: i32,
    pub bullet_color: Color,
    pub bullets_allowed: usize,

    // Aliens
    pub alien_width: i32,
    pub alien_height: i32,
    pub fleet_drop_speed: i32,

    // Ramp
    pub speedup_scale: f32,
    pub score_scale: f32,

    // Power-up
    pub powerup_width: i32,
    pub powerup_height: i32,
    pub powerup_bullet_width: i32,
    pub powerup_bullet_height: i32,
    pub powerup_bullet_color: Color,

    // Dynamic, set per difficulty and ramped per level
    pub ship_speed: f32,
    pub bullet_speed: f32,
    pub alien_speed: f32,
    pub fleet_direction: f32,
    pub alien_points: u32,
    pub difficulty: Difficulty,
}

impl Settings {
    pub fn new() -> Self {
        let mut settings = Self {
            screen_width: 1200,
            screen_height: 800,
            bg_color: Color::Rgb(230, 230, 230),

            ship_limit: 3,
            ship_width: 60,
            ship_height: 48,

            bullet_width: 3,
            bullet_height: 15,
            bullet_color: Color::Rgb(60, 60, 60),
            bullets_allowed: 3,

            alien_width: 60,
            alien_height: 58,
            fleet_drop_speed: 10,

            speedup_scale: 1.1,
            score_scale: 1.5,

            powerup_width: 60,
            powerup_height: 60,
            powerup_bullet_width: 10,
            powerup_bullet_height: 40,
            powerup_bullet_color: Color::Rgb(255, 0, 0),

            ship_speed: 0.0,
            bullet_speed: 0.0,
            alien_speed: 0.0,
            fleet_direction: 1.0,
            alien_points: 0,
            difficulty: Difficulty::Normal,
        };
        settings.apply_difficulty(Difficulty::Normal);
        settings
    }

    /// Reset the dynamic block for a fresh run at the given difficulty.
    pub fn apply_difficulty(&mut self, difficulty: Difficulty) {
        let (ship, bullet, alien, points) = match difficulty {
            Difficulty::Normal => (0.5, 1.0, 0.25, 50),
            Difficulty::Hard => (0.75, 2.0, 0.5, 75),
            Difficulty::Nightmare => (2.0, 3.0, 1.0, 200),
        };
        self.ship_speed = ship;
        self.bullet_speed = bullet;
        self.alien_speed = alien;
        self.fleet_direction = 1.0;
        self.alien_points = points;
        self.difficulty = difficulty;
    }

    /// Powered shots travel half again as fast as the current bullet speed.
    pub fn powerup_bullet_speed(&self) -> f32 {
        1.5 * self.bullet_speed
    }

    /// Ramp speeds and alien point value after a cleared level.
    pub fn increase_speed(&mut self) {
        self.ship_speed *= self.speedup_scale;
        self.bullet_speed *= self.speedup_scale;
        self.alien_speed *= self.speedup_scale;
        self.alien_points = (self.alien_points as f32 * self.score_scale) as u32;
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::new()
    }
}
