use std::time::{Duration, Instant};

use crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::audio::{Cue, Sfx};
use crate::button::Button;
use crate::entities::{Alien, Bullet, PowerUp, Ship};
use crate::powerup::PowerUpState;
use crate::scoreboard::Scoreboard;
use crate::settings::{Difficulty, Settings};
use crate::stats::GameStats;

/// Wall-clock breather after a ship hit or a power-up pickup. The loop
/// keeps polling and drawing; only the entity updates sit out.
const PAUSE_DURATION: Duration = Duration::from_millis(500);

/// Number of aliens in a fleet row for the given playfield and alien
/// width. Spacing equals one alien width, offset one width from each edge.
pub fn fleet_columns(screen_width: i32, alien_width: i32) -> i32 {
    (screen_width - 2 * alien_width) / (2 * alien_width)
}

/// Number of fleet rows that fit above the ship with a three-alien-height
/// margin.
pub fn fleet_rows(screen_height: i32, alien_height: i32, ship_height: i32) -> i32 {
    (screen_height - 3 * alien_height - ship_height) / (2 * alien_height)
}

/// The orchestrator: owns every component, translates input events into
/// entity mutations, runs collision checks, and drives the level/life
/// transitions. Two macro-states: Inactive (menu up, entities frozen) and
/// Active.
pub struct App {
    pub settings: Settings,
    pub stats: GameStats,
    pub scoreboard: Scoreboard,
    pub ship: Ship,
    pub bullets: Vec<Bullet>,
    pub aliens: Vec<Alien>,
    pub powerup: Option<PowerUp>,
    pub powerup_state: PowerUpState,
    pub buttons: [Button; 3],
    pub should_quit: bool,
    /// Whether the terminal reports key releases; without them, arrow
    /// presses nudge the ship directly instead of latching flags.
    pub release_events_supported: bool,
    paused_until: Option<Instant>,
    rng: StdRng,
    sfx: Option<Sfx>,
}

impl App {
    pub fn new() -> Self {
        let mut app = Self::with_rng(StdRng::from_entropy());
        app.sfx = Sfx::new();
        app
    }

    /// Build with an explicit RNG and no audio device. This is the
    /// deterministic entry point the tests drive.
    pub fn with_rng(mut rng: StdRng) -> Self {
        let settings = Settings::new();
        let stats = GameStats::load(settings.ship_limit);
        let scoreboard = Scoreboard::new(&stats);
        let ship = Ship::new(&settings);
        let powerup_state = PowerUpState::new(&mut rng);

        let mut app = App {
            settings,
            stats,
            scoreboard,
            ship,
            bullets: Vec::new(),
            aliens: Vec::new(),
            powerup: None,
            powerup_state,
            buttons: [
                Button::new(Difficulty::Normal),
                Button::new(Difficulty::Hard),
                Button::new(Difficulty::Nightmare),
            ],
            should_quit: false,
            release_events_supported: true,
            paused_until: None,
            rng,
            sfx: None,
        };
        // Fleet backdrop behind the menu
        app.create_fleet();
        app
    }

    pub fn on_tick(&mut self) {
        self.advance(Instant::now());
    }

    /// One update step of the game loop at the given instant. Inactive
    /// state and the timed pause sub-state both freeze the entities.
    pub fn advance(&mut self, now: Instant) {
        if !self.stats.game_active {
            return;
        }
        if let Some(until) = self.paused_until {
            if now < until {
                return;
            }
            self.paused_until = None;
        }

        self.ship.update(&self.settings);
        self.update_bullets();
        self.update_aliens(now);
        self.update_powerup(now);
        self.powerup_state.tick(now);
    }

    pub fn on_key(&mut self, key: KeyEvent) {
        if key.kind == KeyEventKind::Release {
            match key.code {
                KeyCode::Right => self.ship.moving_right = false,
                KeyCode::Left => self.ship.moving_left = false,
                _ => {}
            }
            return;
        }

        // Ctrl+C always quits
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.quit();
            return;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => self.quit(),
            KeyCode::Right => {
                if self.release_events_supported {
                    self.ship.moving_right = true;
                } else if self.stats.game_active {
                    self.ship.nudge(&self.settings, 1.0);
                }
            }
            KeyCode::Left => {
                if self.release_events_supported {
                    self.ship.moving_left = true;
                } else if self.stats.game_active {
                    self.ship.nudge(&self.settings, -1.0);
                }
            }
            KeyCode::Char(' ') => {
                if self.stats.game_active {
                    self.fire_bullet();
                }
            }
            KeyCode::Char('p') | KeyCode::Char('P') => {
                // Quick restart at the currently selected difficulty
                if !self.stats.game_active {
                    self.select_difficulty(self.settings.difficulty);
                }
            }
            KeyCode::Char('1') => self.menu_select(Difficulty::Normal),
            KeyCode::Char('2') => self.menu_select(Difficulty::Hard),
            KeyCode::Char('3') => self.menu_select(Difficulty::Nightmare),
            _ => {}
        }
    }

    pub fn on_mouse(&mut self, mouse: MouseEvent) {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return;
        }
        if self.stats.game_active {
            return;
        }
        let clicked = self
            .buttons
            .iter()
            .find(|b| b.contains(mouse.column, mouse.row))
            .map(|b| b.difficulty);
        if let Some(difficulty) = clicked {
            self.select_difficulty(difficulty);
        }
    }

    fn menu_select(&mut self, difficulty: Difficulty) {
        if !self.stats.game_active {
            self.select_difficulty(difficulty);
        }
    }

    /// Persist the high score and wind down. Persistence is best-effort;
    /// the quit proceeds regardless.
    pub fn quit(&mut self) {
        self.stats.save_high_score();
        self.should_quit = true;
    }

    fn select_difficulty(&mut self, difficulty: Difficulty) {
        self.settings.apply_difficulty(difficulty);
        self.start_game();
    }

    fn start_game(&mut self) {
        self.stats.reset(self.settings.ship_limit);
        self.stats.game_active = true;
        self.scoreboard.prep_score(&self.stats);
        self.scoreboard.prep_high_score(&self.stats);
        self.scoreboard.prep_level(&self.stats);
        self.scoreboard.prep_ships(&self.stats);

        self.bullets.clear();
        self.powerup = None;
        self.powerup_state.reset(&mut self.rng);
        self.paused_until = None;

        self.create_fleet();
        self.ship.center(&self.settings);
        self.ship.moving_left = false;
        self.ship.moving_right = false;
    }

    fn fire_bullet(&mut self) {
        if self.bullets.len() < self.settings.bullets_allowed {
            let powered = self.powerup_state.active;
            self.bullets.push(Bullet::fire(&self.settings, &self.ship, powered));
            self.play(if powered { Cue::PowerUpFire } else { Cue::ShipFire });
        }
    }

    fn update_bullets(&mut self) {
        for bullet in &mut self.bullets {
            bullet.update();
        }
        self.bullets.retain(|b| b.rect.bottom() > 0);
        self.check_bullet_alien_collisions();
    }

    /// First-touch bullet/alien collisions. Indices are collected during
    /// iteration and applied afterwards, in reverse order.
    fn check_bullet_alien_collisions(&mut self) {
        let mut dead_bullets: Vec<usize> = Vec::new();
        let mut dead_aliens: Vec<usize> = Vec::new();
        for (bi, bullet) in self.bullets.iter().enumerate() {
            for (ai, alien) in self.aliens.iter().enumerate() {
                if dead_aliens.contains(&ai) {
                    continue;
                }
                if bullet.rect.overlaps(&alien.rect) {
                    dead_bullets.push(bi);
                    dead_aliens.push(ai);
                    break;
                }
            }
        }

        let kills = dead_aliens.len() as u32;
        if kills > 0 {
            dead_aliens.sort_unstable();
            for &i in dead_aliens.iter().rev() {
                self.aliens.remove(i);
            }
            for &i in dead_bullets.iter().rev() {
                self.bullets.remove(i);
            }

            self.stats.score += self.settings.alien_points * kills;
            self.scoreboard.prep_score(&self.stats);
            if self.stats.check_high_score() {
                self.scoreboard.prep_high_score(&self.stats);
            }

            if self.powerup_state.record_kills(kills, &mut self.rng) {
                self.spawn_powerup();
            }
        }

        if self.aliens.is_empty() {
            self.start_new_level();
        }
    }

    fn spawn_powerup(&mut self) {
        // At most one on screen, at most one per level
        if self.powerup.is_some() || self.powerup_state.spawned_this_level {
            return;
        }
        let max_x = self.settings.screen_width - self.settings.powerup_width;
        let x = self.rng.gen_range(0..=max_x);
        let y = self.ship.rect.y - self.settings.powerup_height + 50;
        self.powerup = Some(PowerUp::new(&self.settings, x, y));
        self.powerup_state.spawned_this_level = true;
    }

    fn update_aliens(&mut self, now: Instant) {
        self.check_fleet_edges();
        for alien in &mut self.aliens {
            alien.update(&self.settings);
        }

        if self
            .aliens
            .iter()
            .any(|a| a.rect.overlaps(&self.ship.rect))
        {
            self.ship_hit(now);
            return;
        }

        // An alien reaching the bottom counts the same as a ship hit
        if self
            .aliens
            .iter()
            .any(|a| a.rect.bottom() >= self.settings.screen_height)
        {
            self.ship_hit(now);
        }
    }

    /// Drop the whole fleet and reverse direction when any alien touches
    /// a horizontal edge. Direction is fleet-global.
    fn check_fleet_edges(&mut self) {
        if self.aliens.iter().any(|a| a.at_edge(&self.settings)) {
            for alien in &mut self.aliens {
                alien.drop_by(self.settings.fleet_drop_speed);
            }
            self.settings.fleet_direction = -self.settings.fleet_direction;
        }
    }

    fn ship_hit(&mut self, now: Instant) {
        self.stats.ships_left = self.stats.ships_left.saturating_sub(1);
        self.scoreboard.prep_ships(&self.stats);

        if self.stats.ships_left == 0 {
            self.play(Cue::GameOver);
            self.stats.game_active = false;
            return;
        }

        self.play(Cue::ShipHit);
        self.aliens.clear();
        self.bullets.clear();
        self.create_fleet();
        self.ship.center(&self.settings);
        self.paused_until = Some(now + PAUSE_DURATION);
    }

    fn start_new_level(&mut self) {
        self.bullets.clear();
        self.create_fleet();
        self.settings.increase_speed();
        self.stats.level += 1;
        self.scoreboard.prep_level(&self.stats);
        self.powerup_state.level_reset();
        self.play(Cue::LevelComplete);
    }

    /// Build the fleet grid from the current geometry. Recomputed on
    /// every call, never cached.
    fn create_fleet(&mut self) {
        self.aliens.clear();
        let cols = fleet_columns(self.settings.screen_width, self.settings.alien_width);
        let rows = fleet_rows(
            self.settings.screen_height,
            self.settings.alien_height,
            self.settings.ship_height,
        );
        for row in 0..rows {
            for col in 0..cols {
                let x = (self.settings.alien_width + 2 * self.settings.alien_width * col) as f32;
                let y =
                    (self.settings.alien_height + 2 * self.settings.alien_height * row) as f32;
                self.aliens.push(Alien::new(&self.settings, x, y));
            }
        }
    }

    /// Single per-tick check: does the ship touch the present power-up?
    fn update_powerup(&mut self, now: Instant) {
        let collected = self
            .powerup
            .as_ref()
            .is_some_and(|p| p.rect.overlaps(&self.ship.rect));
        if collected {
            self.powerup = None;
            self.powerup_state.collect(now);
            self.play(Cue::PowerUpPickup);
            self.paused_until = Some(now + PAUSE_DURATION);
        }
    }

    fn play(&self, cue: Cue) {
        if let Some(sfx) = &self.sfx {
            sfx.play(cue);
        }
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}
