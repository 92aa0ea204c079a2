use std::time::{Duration, Instant};

use crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

use alien_invasion::app::{fleet_columns, fleet_rows, App};
use alien_invasion::entities::PowerUp;
use alien_invasion::settings::Difficulty;
use alien_invasion::stats::GameStats;

fn app() -> App {
    App::with_rng(StdRng::seed_from_u64(7))
}

fn press(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn release(code: KeyCode) -> KeyEvent {
    KeyEvent::new_with_kind(code, KeyModifiers::NONE, KeyEventKind::Release)
}

fn full_fleet_size(app: &App) -> usize {
    let cols = fleet_columns(app.settings.screen_width, app.settings.alien_width);
    let rows = fleet_rows(
        app.settings.screen_height,
        app.settings.alien_height,
        app.settings.ship_height,
    );
    (cols * rows) as usize
}

#[test]
fn every_difficulty_starts_a_fresh_run() {
    for (key, difficulty) in [
        (KeyCode::Char('1'), Difficulty::Normal),
        (KeyCode::Char('2'), Difficulty::Hard),
        (KeyCode::Char('3'), Difficulty::Nightmare),
    ] {
        let mut app = app();
        app.on_key(press(key));

        assert!(app.stats.game_active);
        assert_eq!(app.stats.ships_left, app.settings.ship_limit);
        assert_eq!(app.stats.score, 0);
        assert_eq!(app.stats.level, 1);
        assert_eq!(app.settings.difficulty, difficulty);
        assert_eq!(app.aliens.len(), full_fleet_size(&app));
    }
}

#[test]
fn difficulty_buttons_start_on_click() {
    let mut app = app();
    // The renderer would normally write the areas; fake one frame's worth
    app.buttons[1].area = ratatui::layout::Rect::new(10, 5, 20, 3);

    app.on_mouse(MouseEvent {
        kind: MouseEventKind::Down(MouseButton::Left),
        column: 15,
        row: 6,
        modifiers: KeyModifiers::NONE,
    });

    assert!(app.stats.game_active);
    assert_eq!(app.settings.difficulty, Difficulty::Hard);
}

#[test]
fn clicks_are_ignored_while_active() {
    let mut app = app();
    app.on_key(press(KeyCode::Char('3')));
    assert_eq!(app.settings.difficulty, Difficulty::Nightmare);

    app.buttons[0].area = ratatui::layout::Rect::new(10, 5, 20, 3);
    app.on_mouse(MouseEvent {
        kind: MouseEventKind::Down(MouseButton::Left),
        column: 15,
        row: 6,
        modifiers: KeyModifiers::NONE,
    });
    // Still the nightmare run; no restart happened
    assert_eq!(app.settings.difficulty, Difficulty::Nightmare);
}

#[test]
fn quick_restart_resets_ramped_settings() {
    let mut app = app();
    app.on_key(press(KeyCode::Char('2')));
    app.settings.increase_speed();
    app.stats.game_active = false;

    app.on_key(press(KeyCode::Char('p')));

    assert!(app.stats.game_active);
    assert_eq!(app.settings.difficulty, Difficulty::Hard);
    assert_eq!(app.settings.ship_speed, 0.75);
    assert_eq!(app.settings.alien_points, 75);
}

#[test]
fn movement_flags_follow_press_and_release() {
    let mut app = app();
    app.on_key(press(KeyCode::Char('1')));

    app.on_key(press(KeyCode::Right));
    assert!(app.ship.moving_right);
    app.on_key(release(KeyCode::Right));
    assert!(!app.ship.moving_right);

    app.on_key(press(KeyCode::Left));
    assert!(app.ship.moving_left);
    app.on_key(release(KeyCode::Left));
    assert!(!app.ship.moving_left);
}

#[test]
fn fire_respects_bullet_cap() {
    let mut app = app();
    app.on_key(press(KeyCode::Char('1')));

    for _ in 0..10 {
        app.on_key(press(KeyCode::Char(' ')));
    }
    assert_eq!(app.bullets.len(), app.settings.bullets_allowed);
}

#[test]
fn simultaneous_kills_award_full_score() {
    let mut app = app();
    app.on_key(press(KeyCode::Char('1')));
    let fleet = full_fleet_size(&app);
    let points = app.settings.alien_points;

    // Three bullets parked inside the first three aliens' columns
    for i in 0..3 {
        app.on_key(press(KeyCode::Char(' ')));
        let alien_rect = app.aliens[i].rect;
        let bullet = &mut app.bullets[i];
        bullet.rect.x = alien_rect.x + alien_rect.width / 2;
        bullet.y = (alien_rect.y + alien_rect.height / 2) as f32;
        bullet.rect.y = bullet.y as i32;
    }

    app.advance(Instant::now());

    assert_eq!(app.stats.score, 3 * points);
    assert_eq!(app.stats.high_score, 3 * points);
    assert_eq!(app.aliens.len(), fleet - 3);
    assert!(app.bullets.is_empty());
}

#[test]
fn clearing_the_fleet_starts_a_new_level() {
    let mut app = app();
    app.on_key(press(KeyCode::Char('1')));
    let points = app.settings.alien_points;

    // Leave one alien and park a bullet inside it
    app.aliens.truncate(1);
    app.on_key(press(KeyCode::Char(' ')));
    let alien_rect = app.aliens[0].rect;
    let bullet = &mut app.bullets[0];
    bullet.rect.x = alien_rect.x + alien_rect.width / 2;
    bullet.y = (alien_rect.y + alien_rect.height / 2) as f32;
    bullet.rect.y = bullet.y as i32;

    app.advance(Instant::now());

    assert_eq!(app.stats.level, 2);
    assert_eq!(app.stats.score, points);
    // Speeds and point value ramped once
    assert_eq!(app.settings.alien_points, 75);
    assert!((app.settings.ship_speed - 0.55).abs() < 1e-6);
    // Fresh full fleet, no leftover bullets
    assert_eq!(app.aliens.len(), full_fleet_size(&app));
    assert!(app.bullets.is_empty());
}

#[test]
fn fleet_at_edge_drops_and_reverses() {
    let mut app = app();
    app.on_key(press(KeyCode::Char('1')));

    // Push one alien against the right edge
    let last = app.aliens.len() - 1;
    app.aliens[last].x = (app.settings.screen_width - app.settings.alien_width) as f32;
    app.aliens[last].rect.x = app.aliens[last].x as i32;

    let tops: Vec<i32> = app.aliens.iter().map(|a| a.rect.top()).collect();
    app.advance(Instant::now());

    assert_eq!(app.settings.fleet_direction, -1.0);
    for (alien, old_top) in app.aliens.iter().zip(tops) {
        assert_eq!(alien.rect.top(), old_top + app.settings.fleet_drop_speed);
    }
}

#[test]
fn ship_hit_rebuilds_and_pauses() {
    let mut app = app();
    app.on_key(press(KeyCode::Char('1')));
    let t0 = Instant::now();

    // Drop an alien onto the ship
    app.aliens[0].x = app.ship.x;
    app.aliens[0].y = app.ship.rect.y as f32;
    app.aliens[0].rect.x = app.ship.rect.x;
    app.aliens[0].rect.y = app.ship.rect.y;
    app.on_key(press(KeyCode::Char(' ')));
    app.advance(t0);

    assert_eq!(app.stats.ships_left, app.settings.ship_limit - 1);
    assert!(app.stats.game_active);
    assert_eq!(app.aliens.len(), full_fleet_size(&app));
    assert!(app.bullets.is_empty());

    // The pause sub-state freezes entities for half a second
    let frozen_x = app.aliens[0].x;
    app.advance(t0 + Duration::from_millis(100));
    assert_eq!(app.aliens[0].x, frozen_x);

    app.advance(t0 + Duration::from_millis(600));
    assert_ne!(app.aliens[0].x, frozen_x);
}

#[test]
fn losing_the_last_ship_ends_the_game() {
    let mut app = app();
    app.on_key(press(KeyCode::Char('1')));
    app.stats.ships_left = 1;

    app.aliens[0].x = app.ship.x;
    app.aliens[0].y = app.ship.rect.y as f32;
    app.aliens[0].rect.x = app.ship.rect.x;
    app.aliens[0].rect.y = app.ship.rect.y;
    let fleet_before = app.aliens.len();
    app.advance(Instant::now());

    assert_eq!(app.stats.ships_left, 0);
    assert!(!app.stats.game_active);
    // No rebuild on game over
    assert_eq!(app.aliens.len(), fleet_before);
}

#[test]
fn alien_reaching_bottom_counts_as_ship_hit() {
    let mut app = app();
    app.on_key(press(KeyCode::Char('1')));

    app.aliens[0].y = (app.settings.screen_height - 1) as f32;
    app.aliens[0].rect.y = app.aliens[0].y as i32;
    // Keep it away from the ship horizontally
    app.aliens[0].x = 0.0;
    app.aliens[0].rect.x = 0;
    app.ship.x = 600.0;
    app.ship.rect.x = 600;

    app.advance(Instant::now());
    assert_eq!(app.stats.ships_left, app.settings.ship_limit - 1);
}

#[test]
fn powerup_window_runs_on_the_game_clock() {
    let mut app = app();
    app.on_key(press(KeyCode::Char('1')));
    let t0 = Instant::now();

    // A bullet fired before the pickup keeps the plain variant
    app.on_key(press(KeyCode::Char(' ')));
    assert!(!app.bullets[0].powered);

    // Park the token on the ship and pick it up
    app.powerup = Some(PowerUp::new(&app.settings, app.ship.rect.x, app.ship.rect.y));
    app.advance(t0);
    assert!(app.powerup.is_none());
    assert!(app.powerup_state.active);
    assert!(!app.bullets.is_empty() && !app.bullets[0].powered);

    // Shots fired inside the window are powered
    app.bullets.clear();
    app.on_key(press(KeyCode::Char(' ')));
    assert!(app.bullets[0].powered);
    assert_eq!(app.bullets[0].rect.width, app.settings.powerup_bullet_width);

    // Still active right up to the boundary...
    app.advance(t0 + Duration::from_millis(4999));
    assert!(app.powerup_state.active);

    // ...and cleared on the first check past it
    app.advance(t0 + Duration::from_millis(5001));
    assert!(!app.powerup_state.active);

    app.bullets.clear();
    app.on_key(press(KeyCode::Char(' ')));
    assert!(!app.bullets[0].powered);
}

#[test]
fn quit_persists_the_high_score() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hs.score");

    let mut app = app();
    app.stats = GameStats::load_from(path.clone(), app.settings.ship_limit);
    app.stats.score = 4200;
    app.stats.check_high_score();

    app.on_key(press(KeyCode::Char('q')));
    assert!(app.should_quit);
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "4200");

    // And it comes back on the next run
    let reloaded = GameStats::load_from(path, 3);
    assert_eq!(reloaded.high_score, 4200);
}
