//! Terminal setup and the main event loop.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use simdeck_core::boot::boot_device;
use simdeck_core::catalog;
use simdeck_core::simctl::Simctl;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::app::{App, AppEvent, Effect, ToastKind};
use crate::host::{Host, SystemHost};
use crate::ui;

/// Poll interval for terminal input; also drives the spinner.
const TICK: Duration = Duration::from_millis(80);

/// Spawn a blocking task that loads the catalog and reports back, unless
/// cancelled first.
fn spawn_load_task(simctl: Simctl, load_id: u64, tx: mpsc::Sender<AppEvent>, cancel: CancellationToken) {
    tokio::spawn(async move {
        let load = tokio::task::spawn_blocking(move || catalog::load(&simctl));
        tokio::select! {
            _ = cancel.cancelled() => {
                info!(load_id, "catalog load cancelled");
            }
            joined = load => {
                match joined {
                    Ok(result) => {
                        let _ = tx.send(AppEvent::CatalogLoaded { load_id, result }).await;
                    }
                    Err(e) => warn!(load_id, error = %e, "catalog load task panicked"),
                }
            }
        }
    });
}

/// Spawn a blocking task to boot a simulator. Fire-and-forget.
fn spawn_boot_task(simctl: Simctl, udid: String, tx: mpsc::Sender<AppEvent>) {
    tokio::spawn(async move {
        let result = tokio::task::spawn_blocking(move || boot_device(&simctl, &udid)).await;
        match result {
            Ok(result) => {
                let _ = tx.send(AppEvent::BootFinished(result)).await;
            }
            Err(e) => warn!(error = %e, "boot task panicked"),
        }
    });
}

/// Spawn a blocking task to reveal a path; only failures are reported back.
fn spawn_reveal_task<H: Host>(host: Arc<H>, path: PathBuf, tx: mpsc::Sender<AppEvent>) {
    tokio::spawn(async move {
        let result = tokio::task::spawn_blocking(move || host.reveal(&path)).await;
        match result {
            Ok(Ok(())) => {}
            Ok(Err(message)) => {
                let _ = tx.send(AppEvent::RevealFailed(message)).await;
            }
            Err(e) => warn!(error = %e, "reveal task panicked"),
        }
    });
}

struct Runner<H: Host> {
    simctl: Simctl,
    host: Arc<H>,
    tx: mpsc::Sender<AppEvent>,
    load_cancel: Option<CancellationToken>,
}

impl<H: Host> Runner<H> {
    fn apply(&mut self, app: &mut App, effect: Effect) {
        let now = Instant::now();
        match effect {
            Effect::LoadCatalog { load_id } => {
                if let Some(previous) = self.load_cancel.take() {
                    previous.cancel();
                }
                let cancel = CancellationToken::new();
                self.load_cancel = Some(cancel.clone());
                spawn_load_task(self.simctl.clone(), load_id, self.tx.clone(), cancel);
            }
            Effect::CancelLoad => {
                if let Some(cancel) = self.load_cancel.take() {
                    cancel.cancel();
                }
            }
            Effect::CopyUdid(udid) => match self.host.copy_text(&udid) {
                Ok(()) => app.notify(format!("Copied {}", udid), ToastKind::Info, now),
                Err(e) => app.notify(e, ToastKind::Error, now),
            },
            Effect::Boot(udid) => spawn_boot_task(self.simctl.clone(), udid, self.tx.clone()),
            Effect::Reveal(path) => spawn_reveal_task(self.host.clone(), path, self.tx.clone()),
        }
    }
}

/// Run the interactive browser until the user quits.
pub async fn run(simctl: Simctl, toast_duration: Duration) -> io::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, simctl, toast_duration).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

async fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    simctl: Simctl,
    toast_duration: Duration,
) -> io::Result<()> {
    let (event_tx, mut event_rx) = mpsc::channel::<AppEvent>(32);
    let mut app = App::new(toast_duration);
    let mut runner = Runner {
        simctl,
        host: Arc::new(SystemHost),
        tx: event_tx,
        load_cancel: None,
    };
    let mut needs_redraw = true;

    loop {
        while let Ok(app_event) = event_rx.try_recv() {
            app.handle_event(app_event, Instant::now());
            needs_redraw = true;
        }

        if app.on_tick(Instant::now()) {
            needs_redraw = true;
        }

        if needs_redraw {
            terminal.draw(|f| ui::render(f, &app))?;
            needs_redraw = false;
        }

        // Terminal polling blocks, so keep it off the runtime's async workers.
        let polled = tokio::task::block_in_place(|| -> io::Result<Option<Event>> {
            if event::poll(TICK)? {
                event::read().map(Some)
            } else {
                Ok(None)
            }
        })?;

        match polled {
            Some(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                needs_redraw = true;
                if let Some(effect) = app.handle_key(key.code) {
                    runner.apply(&mut app, effect);
                }
            }
            Some(Event::Resize(_, _)) => needs_redraw = true,
            _ => {}
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
