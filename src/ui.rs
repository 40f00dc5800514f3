use crate::app::App;
use crate::components::{
    Board, Cursor, GameOverReason, GameState, GemColor, Particle, PowerUpKind, ScreenShake,
};
use crate::game::BOARD_SIZE;
use crate::systems::power_up_name;
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph, Wrap},
};

pub fn render(f: &mut Frame, app: &mut App) {
    // Define minimum sizes required for the game to be playable
    let cell_width = 2; // Each cell is 2 characters wide
    let board_width = BOARD_SIZE as u16 * cell_width + 2; // +2 for borders
    let board_height = BOARD_SIZE as u16 + 2; // +2 for borders
    let min_info_width = 22u16;
    let min_total_width = board_width + min_info_width;
    let min_total_height = board_height + 5; // Adding space for title and borders

    // Check if the terminal is too small to render the game properly
    if f.area().width < min_total_width || f.area().height < min_total_height {
        // Pause the game by updating the game state
        let mut game_state = app.world.resource_mut::<GameState>();
        if !game_state.game_over {
            game_state.was_paused_for_resize = true;
        }

        let warning_text = Paragraph::new(
            "Terminal too small!\nPlease resize your terminal\nto continue playing.",
        )
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Gemswap - Paused"),
        );

        let warning_area = centered_rect(50, 30, f.area());
        f.render_widget(warning_text, warning_area);
        return;
    } else if app.world.resource::<GameState>().was_paused_for_resize {
        let mut game_state = app.world.resource_mut::<GameState>();
        game_state.was_paused_for_resize = false;
    }

    // Get screen shake offset if active
    let (shake_x, shake_y) = {
        let screen_shake = app.world.resource::<ScreenShake>();
        (screen_shake.current_offset.0, screen_shake.current_offset.1)
    };

    // Apply screen shake to the entire frame
    let original_area = f.area();
    let shake_area = Rect {
        x: (original_area.x as i16 + shake_x).max(0) as u16,
        y: (original_area.y as i16 + shake_y).max(0) as u16,
        width: original_area.width,
        height: original_area.height,
    };

    let main_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(board_width + 2),
            Constraint::Fill(1),
        ])
        .split(shake_area);

    let game_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),            // Title
            Constraint::Fill(1),              // Flexible spacing above game board
            Constraint::Length(board_height), // Game board (fixed height)
            Constraint::Length(1),            // Bottom border
        ])
        .split(main_layout[0]);

    let info_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),  // Title
            Constraint::Length(8),  // Score and move budget
            Constraint::Length(7),  // Power-up legend
            Constraint::Min(5),     // Controls
            Constraint::Length(1),  // Bottom border
        ])
        .split(main_layout[1]);

    // Render game title
    let title = Paragraph::new("GEMSWAP")
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::BOTTOM));
    f.render_widget(title, game_layout[0]);

    render_game_board(f, app, game_layout[2]);

    // Render score and info
    let info_title = Paragraph::new("INFO")
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::BOTTOM));
    f.render_widget(info_title, info_layout[0]);

    let game_state = app.world.resource::<GameState>();
    let basic_stats = format!(
        "Score: {}\nMoves left: {}\nMoves used: {}\nPower-ups: {}\nBest cascade: x{}",
        game_state.score,
        game_state.moves_left,
        game_state.moves_used,
        game_state.power_ups_created,
        game_state.best_cascade,
    );

    let basic_info = Paragraph::new(basic_stats)
        .block(Block::default().borders(Borders::NONE))
        .wrap(Wrap { trim: true });
    f.render_widget(basic_info, info_layout[1]);

    // Legend of the five power-up glyphs
    let legend = [
        PowerUpKind::HorizontalRocket,
        PowerUpKind::VerticalRocket,
        PowerUpKind::Tnt,
        PowerUpKind::ColorBomb,
        PowerUpKind::FlyAway,
    ]
    .iter()
    .map(|&kind| format!("{} {}", kind.glyph(), power_up_name(kind)))
    .collect::<Vec<_>>()
    .join("\n");

    let legend_widget = Paragraph::new(format!("Power-ups:\n{legend}"))
        .block(Block::default().borders(Borders::TOP))
        .wrap(Wrap { trim: true });
    f.render_widget(legend_widget, info_layout[2]);

    // Render controls with updated key bindings
    let controls = Paragraph::new(
        "Controls:\n\
        Arrows/WASD: Move cursor\n\
        Space/Enter: Select & swap\n\
        Esc: Clear selection\n\
        N: New game\n\
        Q: Quit\n\
        ",
    )
    .block(Block::default().borders(Borders::TOP))
    .wrap(Wrap { trim: true });
    f.render_widget(controls, info_layout[3]);
}

fn render_game_board(f: &mut Frame, app: &mut App, area: Rect) {
    let cell_width = 2; // Each cell is 2 characters wide

    // Calculate the inner area (inside the borders)
    let inner_area = Block::default().borders(Borders::ALL).inner(area);

    // Render the game board border
    f.render_widget(Block::default().borders(Borders::ALL), area);

    let (cursor_pos, selected) = {
        let cursor = app.world.resource::<Cursor>();
        (cursor.pos, cursor.selected)
    };

    let board = app.world.resource::<Board>().clone();
    for pos in board.positions() {
        let screen_x = inner_area.left() + pos.col as u16 * cell_width;
        let screen_y = inner_area.top() + pos.row as u16;
        if screen_x >= inner_area.right() || screen_y >= inner_area.bottom() {
            continue;
        }

        let cell = board.get(pos);
        let (symbols, fg, bg) = if let Some(kind) = cell.power_up {
            let glyph = kind.glyph();
            let chars: Vec<char> = glyph.chars().collect();
            ((chars[0], chars[1]), Color::White, Color::DarkGray)
        } else if cell.empty {
            ((' ', ' '), Color::Reset, Color::Black)
        } else {
            let color = cell.color.map_or(Color::Gray, GemColor::ui_color);
            (('█', '█'), color, Color::Black)
        };

        // Cursor and selection highlights override the background
        let bg = if pos == cursor_pos {
            Color::Gray
        } else if selected == Some(pos) {
            Color::Blue
        } else {
            bg
        };

        for (i, symbol) in [symbols.0, symbols.1].iter().enumerate() {
            if let Some(buf_cell) = f.buffer_mut().cell_mut((screen_x + i as u16, screen_y)) {
                buf_cell.set_char(*symbol);
                buf_cell.set_fg(fg);
                buf_cell.set_bg(bg);
            }
        }
    }

    // Render particles
    render_particles(f, app, inner_area);

    // If game is over, overlay the final summary
    let game_state = app.world.resource::<GameState>();
    if game_state.game_over {
        let reason = match game_state.game_over_reason {
            Some(GameOverReason::NoLegalMoves) => "NO MOVES LEFT",
            _ => "OUT OF MOVES",
        };
        let game_over = Paragraph::new(format!("GAME OVER - {reason}\nEnter: new game"))
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD));

        let game_over_area = Rect {
            x: area.x,
            y: inner_area.y + (inner_area.height / 2),
            width: area.width,
            height: 2,
        };

        f.render_widget(game_over, game_over_area);
    }
}

// Render all particles
fn render_particles(f: &mut Frame, app: &mut App, area: Rect) {
    let particles_data = app
        .world
        .query::<&Particle>()
        .iter(&app.world)
        .cloned()
        .collect::<Vec<_>>();

    for particle in particles_data {
        if particle.x < 0.0 || particle.y < 0.0 {
            continue;
        }
        let x = particle.x as u16;
        let y = particle.y as u16;

        // Check if particle is inside the board area
        if x < BOARD_SIZE as u16 && y < BOARD_SIZE as u16 {
            let particle_x = area.left() + x * 2;
            let particle_y = area.top() + y;

            if particle_x < area.right() && particle_y < area.bottom() {
                // Different particle size based on the size attribute
                let particle_size = if particle.size > 0.7 {
                    "█" // Full block for larger particles
                } else if particle.size > 0.4 {
                    "▓" // Medium density for medium particles
                } else {
                    "▒" // Low density for small particles
                };

                if let Some(cell) = f.buffer_mut().cell_mut((particle_x, particle_y)) {
                    cell.set_symbol(particle_size);
                    cell.set_fg(particle.color);
                }
            }
        }
    }
}

/// Helper function to create a centered rect using up certain percentage of the available rect
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
