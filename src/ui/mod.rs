use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::app::App;
use crate::entities;

pub fn render(frame: &mut Frame, app: &mut App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Rgb(80, 200, 80)))
        .title(" Alien Invasion ")
        .title_style(
            Style::default()
                .fg(Color::Rgb(100, 255, 100))
                .add_modifier(Modifier::BOLD),
        );

    let inner = block.inner(frame.area());
    frame.render_widget(block, frame.area());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(8),
            Constraint::Length(1),
        ])
        .split(inner);

    // Status bar
    let mut status = app.scoreboard.status_line();
    if app.powerup_state.active {
        status.spans.push(Span::styled(
            " | POWERED ",
            Style::default()
                .fg(Color::Rgb(255, 0, 0))
                .add_modifier(Modifier::BOLD),
        ));
    }
    frame.render_widget(Paragraph::new(status), chunks[0]);

    // Playfield
    let fw = chunks[1].width as usize;
    let fh = chunks[1].height as usize;
    if fw > 0 && fh > 0 {
        let lines = render_field(app, fw, fh);
        frame.render_widget(Paragraph::new(lines), chunks[1]);
    }

    // Help bar
    let help = Paragraph::new(Line::from(vec![
        Span::styled(" \u{2190}\u{2192} Move ", Style::default().fg(Color::DarkGray)),
        Span::styled("| ", Style::default().fg(Color::Rgb(60, 60, 60))),
        Span::styled(
            "Space Fire ",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ),
        Span::styled("| ", Style::default().fg(Color::Rgb(60, 60, 60))),
        Span::styled("P Restart ", Style::default().fg(Color::DarkGray)),
        Span::styled("| ", Style::default().fg(Color::Rgb(60, 60, 60))),
        Span::styled("Q Quit", Style::default().fg(Color::DarkGray)),
    ]));
    frame.render_widget(help, chunks[2]);

    // Difficulty menu on top of the frozen field while inactive
    if !app.stats.game_active {
        render_menu(frame, frame.area(), app);
    }
}

/// Scale the 1200x800 logical playfield onto the available cells.
fn render_field(app: &App, width: usize, height: usize) -> Vec<Line<'static>> {
    let bg = app.settings.bg_color;
    let sx = width as f32 / app.settings.screen_width as f32;
    let sy = height as f32 / app.settings.screen_height as f32;

    let mut grid: Vec<Vec<(char, Style)>> =
        vec![vec![(' ', Style::default().bg(bg)); width]; height];

    for alien in &app.aliens {
        fill_rect(
            &mut grid,
            &alien.rect,
            sx,
            sy,
            '\u{2593}',
            Style::default().fg(Color::Rgb(60, 110, 60)).bg(bg),
        );
    }

    if let Some(powerup) = &app.powerup {
        fill_rect(
            &mut grid,
            &powerup.rect,
            sx,
            sy,
            '\u{25c6}',
            Style::default()
                .fg(Color::Rgb(255, 140, 0))
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        );
    }

    for bullet in &app.bullets {
        let ch = if bullet.powered { '\u{2503}' } else { '\u{2502}' };
        fill_rect(
            &mut grid,
            &bullet.rect,
            sx,
            sy,
            ch,
            Style::default()
                .fg(bullet.color)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        );
    }

    fill_rect(
        &mut grid,
        &app.ship.rect,
        sx,
        sy,
        '\u{2588}',
        Style::default().fg(Color::Rgb(40, 60, 130)).bg(bg),
    );

    grid.into_iter()
        .map(|row| {
            let spans: Vec<Span<'static>> = row
                .into_iter()
                .map(|(ch, style)| Span::styled(String::from(ch), style))
                .collect();
            Line::from(spans)
        })
        .collect()
}

/// Project a logical rect onto the cell grid and fill it. Anything on
/// screen covers at least one cell so thin bullets stay visible.
fn fill_rect(
    grid: &mut [Vec<(char, Style)>],
    rect: &entities::Rect,
    sx: f32,
    sy: f32,
    ch: char,
    style: Style,
) {
    let h = grid.len();
    if h == 0 {
        return;
    }
    let w = grid[0].len();

    let x0 = (rect.left() as f32 * sx).floor().max(0.0) as usize;
    let y0 = (rect.top() as f32 * sy).floor().max(0.0) as usize;
    let x1 = ((rect.right() as f32 * sx).ceil() as usize).max(x0 + 1);
    let y1 = ((rect.bottom() as f32 * sy).ceil() as usize).max(y0 + 1);

    for y in y0..y1.min(h) {
        for x in x0..x1.min(w) {
            grid[y][x] = (ch, style);
        }
    }
}

/// Centered overlay with the three difficulty buttons. Button screen
/// rectangles are written back for mouse hit-testing.
fn render_menu(frame: &mut Frame, area: Rect, app: &mut App) {
    let overlay_w = 36u16.min(area.width.saturating_sub(4));
    let overlay_h = 17u16.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(overlay_w)) / 2;
    let y = area.y + (area.height.saturating_sub(overlay_h)) / 2;
    let overlay_area = Rect::new(x, y, overlay_w, overlay_h);

    frame.render_widget(Clear, overlay_area);

    let title = if app.stats.score > 0 {
        " GAME OVER "
    } else {
        " ALIEN INVASION "
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(Style::default().fg(Color::Rgb(255, 220, 80)))
        .title(title)
        .title_style(
            Style::default()
                .fg(Color::Rgb(255, 220, 80))
                .add_modifier(Modifier::BOLD),
        )
        .style(Style::default().bg(Color::Rgb(15, 15, 25)));
    let inner = block.inner(overlay_area);
    frame.render_widget(block, overlay_area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // high score
            Constraint::Length(3), // Normal
            Constraint::Length(1),
            Constraint::Length(3), // Hard
            Constraint::Length(1),
            Constraint::Length(3), // Nightmare
            Constraint::Min(1), // hint
        ])
        .split(inner);

    let high = Paragraph::new(Line::from(vec![Span::styled(
        format!("High score: {}", app.stats.high_score),
        Style::default().fg(Color::Rgb(80, 200, 255)),
    )]))
    .centered();
    frame.render_widget(high, rows[0]);

    for (i, row) in [rows[1], rows[3], rows[5]].into_iter().enumerate() {
        let button = &mut app.buttons[i];
        let bw = 22u16.min(row.width);
        let bx = row.x + (row.width.saturating_sub(bw)) / 2;
        let button_area = Rect::new(bx, row.y, bw, row.height);
        button.area = button_area;

        let widget = Paragraph::new(Line::from(Span::styled(
            button.label,
            Style::default().fg(Color::Black).add_modifier(Modifier::BOLD),
        )))
        .centered()
        .block(Block::default().style(Style::default().bg(button.color)));
        frame.render_widget(widget, button_area);
    }

    let hint = Paragraph::new(Line::from(vec![
        Span::styled("Click or press ", Style::default().fg(Color::Rgb(120, 120, 140))),
        Span::styled(
            "1/2/3",
            Style::default().fg(Color::Rgb(80, 200, 255)).add_modifier(Modifier::BOLD),
        ),
        Span::styled(" to play", Style::default().fg(Color::Rgb(120, 120, 140))),
    ]))
    .centered();
    frame.render_widget(hint, rows[6]);
}
