use ratatui::style::Color;

use crate::settings::{Settings, TICK_SCALE};

/// Axis-aligned integer rectangle in playfield coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Rect { x, y, width, height }
    }

    pub fn left(&self) -> i32 {
        self.x
    }

    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    pub fn top(&self) -> i32 {
        self.y
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }
}

/// The player's ship. Sits on the bottom edge; horizontal position is
/// tracked as a float and projected to the rect every update.
pub struct Ship {
    pub x: f32,
    pub rect: Rect,
    pub moving_left: bool,
    pub moving_right: bool,
}

impl Ship {
    pub fn new(settings: &Settings) -> Self {
        let mut ship = Ship {
            x: 0.0,
            rect: Rect::new(0, 0, settings.ship_width, settings.ship_height),
            moving_left: false,
            moving_right: false,
        };
        ship.center(settings);
        ship
    }

    /// Recenter on the bottom edge (new game, ship lost).
    pub fn center(&mut self, settings: &Settings) {
        self.x = (settings.screen_width - settings.ship_width) as f32 / 2.0;
        self.rect.y = settings.screen_height - settings.ship_height;
        self.sync_rect();
    }

    /// Advance one tick according to the movement flags, clamped to the
    /// playfield.
    pub fn update(&mut self, settings: &Settings) {
        let step = settings.ship_speed * TICK_SCALE;
        if self.moving_right {
            self.x += step;
        }
        if self.moving_left {
            self.x -= step;
        }
        let max_x = (settings.screen_width - settings.ship_width) as f32;
        self.x = self.x.clamp(0.0, max_x);
        self.sync_rect();
    }

    /// One-step move for terminals that never report key releases.
    pub fn nudge(&mut self, settings: &Settings, direction: f32) {
        self.x += direction * settings.ship_speed * TICK_SCALE;
        let max_x = (settings.screen_width - settings.ship_width) as f32;
        self.x = self.x.clamp(0.0, max_x);
        self.sync_rect();
    }

    fn sync_rect(&mut self) {
        self.rect.x = self.x as i32;
    }
}

/// A single shot. `powered` selects the wide/fast/red variant; the speed
/// is captured at fire time so already-flying bullets keep their pace.
pub struct Bullet {
    pub y: f32,
    pub rect: Rect,
    pub speed: f32,
    pub powered: bool,
    pub color: Color,
}

impl Bullet {
    /// Create a bullet at the ship's mid-top.
    pub fn fire(settings: &Settings, ship: &Ship, powered: bool) -> Self {
        let (width, height, speed, color) = if powered {
            (
                settings.powerup_bullet_width,
                settings.powerup_bullet_height,
                settings.powerup_bullet_speed(),
                settings.powerup_bullet_color,
            )
        } else {
            (
                settings.bullet_width,
                settings.bullet_height,
                settings.bullet_speed,
                settings.bullet_color,
            )
        };
        let x = ship.rect.x + (ship.rect.width - width) / 2;
        let y = (ship.rect.top() - height) as f32;
        Bullet {
            y,
            rect: Rect::new(x, y as i32, width, height),
            speed,
            powered,
            color,
        }
    }

    /// Move up the screen.
    pub fn update(&mut self) {
        self.y -= self.speed * TICK_SCALE;
        self.rect.y = self.y as i32;
    }
}

/// One member of the fleet. Horizontal speed and direction are
/// fleet-global, read from settings each tick.
pub struct Alien {
    pub x: f32,
    pub y: f32,
    pub rect: Rect,
}

impl Alien {
    pub fn new(settings: &Settings, x: f32, y: f32) -> Self {
        Alien {
            x,
            y,
            rect: Rect::new(
                x as i32,
                y as i32,
                settings.alien_width,
                settings.alien_height,
            ),
        }
    }

    /// True if the rect touches a horizontal playfield edge.
    pub fn at_edge(&self, settings: &Settings) -> bool {
        self.rect.right() >= settings.screen_width || self.rect.left() <= 0
    }

    /// Slide horizontally in the fleet direction.
    pub fn update(&mut self, settings: &Settings) {
        self.x += settings.alien_speed * settings.fleet_direction * TICK_SCALE;
        self.rect.x = self.x as i32;
    }

    /// Vertical fleet drop when an edge is reached.
    pub fn drop_by(&mut self, amount: i32) {
        self.y += amount as f32;
        self.rect.y = self.y as i32;
    }
}

/// A collectible power-up token. Stationary once placed.
pub struct PowerUp {
    pub rect: Rect,
}

impl PowerUp {
    pub fn new(settings: &Settings, x: i32, y: i32) -> Self {
        PowerUp {
            rect: Rect::new(x, y, settings.powerup_width, settings.powerup_height),
        }
    }
}
