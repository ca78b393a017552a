use std::rc::Rc;
use std::time::Instant;

use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::App;
use crate::engine::RodioEngine;
use crate::error::Result;
use crate::library::CategoryStore;
use crate::session::PlaybackController;
use crate::storage::KeyValueStore;

mod event_loop;
mod logging;
pub(crate) mod settings;
mod startup;

pub(crate) type Controller = PlaybackController<RodioEngine, Rc<dyn KeyValueStore>>;

pub fn run() -> Result<()> {
    let settings = settings::load_settings();
    if let Err(e) = logging::init(&settings) {
        eprintln!("cadence: logging disabled: {e}");
    }

    let store = startup::open_store(&settings);
    let mut controller: Controller = PlaybackController::new(
        RodioEngine::new(),
        Rc::clone(&store),
        rand::thread_rng(),
        &settings.playback,
    );
    // A missing output device is reported as a notice; the library stays usable.
    let _ = controller.initialize();

    let mut app = App::new(CategoryStore::load(&store));
    startup::restore_last_category(&mut app, &mut controller, Instant::now());

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result = event_loop::run(&mut terminal, &settings, &mut app, &mut controller);

    controller.shutdown();

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    run_result
}
