// ============================================================================
// HOUSEHOLD LEDGER - terminal household budget book
// ============================================================================
//
// MODULE STRUCTURE:
// 1. date_input      - Masked date field with popover calendar
// 2. ledger          - Transactions, categories, budgets, fixed costs, summaries
// 3. forms           - Transaction, fixed cost and budget forms
// 4. monthly_list    - Month tabs, filter, paging and swipe gestures
// 5. app / ui        - Event handling and rendering
// 6. storage/import  - Persistence and CSV/JSON import
// 7. config/logging  - config.toml and the log file
// ============================================================================

mod app;
mod config;
mod date_input;
mod forms;
mod import;
mod ledger;
mod logging;
mod monthly_list;
mod storage;
mod theme;
mod ui;

use std::io;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::App;

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {err:?}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let config = config::load_config()?;
    let data_dir = config.data_dir()?;
    let log_path = logging::setup_logging(&data_dir, config.log_level())?;
    log::info!("starting; logging to {}", log_path.display());

    let data = storage::load_or_recover(&data_dir)?;
    let mut app = App::new(config, data_dir, data)?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, event::EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode().ok();
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        event::DisableMouseCapture
    )
    .ok();
    terminal.show_cursor().ok();

    if let Err(err) = &res {
        log::error!("exiting with error: {err:#}");
    }
    res
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|frame| ui::draw(frame, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::from_secs(0));

        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if app.handle_key(key)? {
                        // Save before exit
                        app.save_on_exit();
                        break;
                    }
                }
                Event::Mouse(mouse) => app.handle_mouse(mouse),
                Event::Resize(_, _) => app.on_resize(),
                _ => {}
            }
        }

        if last_tick.elapsed() >= tick_rate {
            app.tick();
            last_tick = Instant::now();
        }
    }

    log::info!("bye");
    Ok(())
}
