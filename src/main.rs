#![warn(clippy::all, clippy::pedantic)]

use std::io;
use std::os::fd::AsRawFd;
use std::time::{Duration, Instant};

use crossterm::event::KeyCode;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use gemswap::app::{App, AppResult};
use gemswap::components::{GameState, Input};
use gemswap::{Time, config, systems, ui};
use log::{debug, error, info};
use ratatui::{Terminal, prelude::*};

fn main() -> AppResult<()> {
    // Create log file and redirect stderr to it
    let log_path = "gemswap.log";
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(log_path)
        .expect("Failed to create log file");

    // Redirect stderr to the log file
    let stderr_handle = std::io::stderr();
    let stderr_fd = stderr_handle.as_raw_fd();
    let log_file_fd = log_file.as_raw_fd();

    // Safety: We're redirecting stderr to our log file using standard POSIX operations
    unsafe {
        libc::dup2(log_file_fd, stderr_fd);
    }

    // Set RUST_BACKTRACE environment variable for detailed panic messages
    unsafe {
        std::env::set_var("RUST_BACKTRACE", "1");
    }

    // Configure the logger to use stderr (which is now redirected to our file)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .format_module_path(false)
        .init();

    info!("Starting Gemswap");

    // Initialize configuration system
    if let Err(e) = config::loader::load_config_from_file() {
        error!("Failed to load configuration: {e:?}");
        // Continue with default configuration
    } else {
        info!("Configuration loaded successfully");
    }

    // Terminal initialization
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create app and run it
    let tick_rate = Duration::from_millis(33); // ~30 FPS
    let game_tick_rate = Duration::from_millis(50); // Game logic updates less often

    let app = App::new();
    let res = run_app(&mut terminal, app, tick_rate, game_tick_rate);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        error!("Game error: {err:?}");
    }

    Ok(())
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    mut app: App,
    tick_rate: Duration,
    game_tick_rate: Duration,
) -> AppResult<()> {
    let mut last_render = Instant::now();
    let mut last_game_tick = Instant::now();

    // Explicitly flush any pending input events that might be in the buffer
    while crossterm::event::poll(Duration::from_millis(0))? {
        let _ = event::read()?;
    }

    debug!("Resources initialized");

    loop {
        // Draw the UI
        if last_render.elapsed() >= tick_rate {
            terminal.draw(|f| ui::render(f, &mut app))?;
            last_render = Instant::now();
        }

        // Check if any systems need updating
        if last_game_tick.elapsed() >= game_tick_rate {
            let delta_seconds = last_game_tick.elapsed().as_secs_f32();
            last_game_tick = Instant::now();

            // Update time resource
            {
                let mut time = app.world.resource_mut::<Time>();
                time.update();
            }

            // Exit if needed
            if app.should_quit {
                return Ok(());
            }

            // Run game systems
            systems::input_system(&mut app.world);
            systems::game_tick_system(&mut app.world, delta_seconds);
            app.sync_game_state();

            // Pick up config file edits between moves
            config::Config::check_and_reload();
        }

        // Process keyboard input
        if crossterm::event::poll(Duration::from_millis(5))? {
            if let Event::Key(key) = event::read()? {
                debug!("Key event: {key:?}");

                // Only act on presses; releases would double every input
                if key.kind == event::KeyEventKind::Release {
                    continue;
                }

                let is_game_over = {
                    let game_state = app.world.resource::<GameState>();
                    game_state.game_over
                };

                // Allow quitting with 'q' regardless of game state
                if key.code == KeyCode::Char('q') {
                    app.should_quit = true;
                    continue;
                }

                if is_game_over && key.code == KeyCode::Enter {
                    info!("Restarting after game over");
                    app.reset();
                    continue;
                }

                // Update input state for normal gameplay
                {
                    let mut input = app.world.resource_mut::<Input>();
                    match key.code {
                        KeyCode::Left | KeyCode::Char('a') => input.left = true,
                        KeyCode::Right | KeyCode::Char('d') => input.right = true,
                        KeyCode::Up | KeyCode::Char('w') => input.up = true,
                        KeyCode::Down | KeyCode::Char('s') => input.down = true,
                        KeyCode::Char(' ') | KeyCode::Enter => input.select = true,
                        KeyCode::Esc => input.cancel = true,
                        KeyCode::Char('n') => input.restart = true,
                        _ => (),
                    }
                }

                // Update last key in game state
                let mut game_state = app.world.resource_mut::<GameState>();
                game_state.last_key = Some(key);
            }
        }
    }
}
