mod app;
mod storage;
mod store;
mod task;
mod ui;
mod view;

use std::io;

use anyhow::Result;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use app::App;
use storage::FileStore;
use store::TaskStore;

const DATA_FILE: &str = "taskdeck.json";

fn main() -> Result<()> {
    let data_file = std::env::var("TASKDECK_FILE").unwrap_or_else(|_| DATA_FILE.to_string());
    let storage = FileStore::open(&data_file)?;
    let mut store = TaskStore::new(storage);
    store.load_all()?;
    let mut app = App::new(store);

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = ui::run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}
