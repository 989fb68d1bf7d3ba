pub mod action;
pub mod dialog;
pub mod state;
pub mod view;

use crate::client::TaskClient;
use crate::config::Config;
use crate::error::DueUpdateError;
use crate::logging;
use crate::reconcile::DueReconciler;
use crate::storage::{LocalStorage, TaskStore};
use action::{Action, AppEvent};
use dialog::{DialogCommand, EditOp};
use state::AppState;
use view::draw;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::Backend, backend::CrosstermBackend};
use std::{env, io, sync::Arc, time::Duration};
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{error, info};

pub async fn run() -> Result<()> {
    // --- 1. PREAMBLE & CONFIG ---
    let args: Vec<String> = env::args().collect();
    if args.len() > 1 && (args[1] == "--help" || args[1] == "-h") {
        println!("Usage: dueline");
        println!(
            "Config file: {}",
            Config::get_path_string().unwrap_or_else(|_| "[unknown]".to_string())
        );
        return Ok(());
    }

    let config = match Config::load() {
        Ok(cfg) => cfg,
        Err(e) => {
            let path_str = Config::get_path_string()
                .unwrap_or_else(|_| "[Could not determine config path]".to_string());
            eprintln!("{:#}", e);
            eprintln!("Please create a configuration file at:");
            eprintln!("  {}", path_str);
            eprintln!("containing at least: api_token = \"...\"");
            return Ok(());
        }
    };

    let data_dir = config
        .resolve_data_dir()
        .context("Could not determine data directory")?;
    let _log_guard = logging::init(&data_dir, &config.log_level);

    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        error!(target: "runtime.panic", "{}", info);
        default_hook(info);
    }));

    let store: Arc<dyn TaskStore> = Arc::new(LocalStorage::in_dir(&data_dir));
    let client = TaskClient::from_config(&config)?;
    let reconciler = DueReconciler::new(Arc::new(client), store.clone());
    info!(data_dir = %data_dir.display(), api_url = %config.api_url, "starting");

    // --- 2. TERMINAL ---
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app_state = AppState::new();
    let (action_tx, action_rx) = mpsc::channel(10);
    let (event_tx, mut event_rx) = mpsc::channel(10);

    let worker_handle = tokio::spawn(worker(reconciler, store, action_rx, event_tx));

    let result = event_loop(&mut terminal, &mut app_state, &action_tx, &mut event_rx).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // Nobody reads events any more; pending updates must still reach the store.
    drop(event_rx);
    if !app_state.in_flight.is_empty() {
        println!(
            "Waiting for {} pending due date update(s)...",
            app_state.in_flight.len()
        );
    }
    if let Err(e) = worker_handle.await {
        error!("worker ended abnormally: {}", e);
    }

    result
}

async fn event_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    app_state: &mut AppState,
    action_tx: &mpsc::Sender<Action>,
    event_rx: &mut mpsc::Receiver<AppEvent>,
) -> Result<()> {
    loop {
        terminal.draw(|f| draw(f, app_state))?;

        while let Ok(event) = event_rx.try_recv() {
            apply_event(app_state, event);
        }

        if !event::poll(Duration::from_millis(50))? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        // --- DIALOG MODE ---
        if app_state.dialog.is_open() {
            if let Some(command) = dialog_command(key) {
                let action = app_state.handle_dialog(command);
                if matches!(action, Action::SetTaskDueString(..)) {
                    let _ = action_tx.send(action).await;
                }
            }
            continue;
        }

        // --- NORMAL MODE ---
        match key.code {
            KeyCode::Char('q') => {
                let _ = action_tx.send(Action::Quit).await;
                break;
            }
            KeyCode::Down | KeyCode::Char('j') => app_state.next(),
            KeyCode::Up | KeyCode::Char('k') => app_state.previous(),
            KeyCode::PageDown => app_state.jump_forward(10),
            KeyCode::PageUp => app_state.jump_backward(10),
            KeyCode::Char('D') => app_state.open_due_dialog(),
            _ => {}
        }
    }
    Ok(())
}

fn apply_event(app_state: &mut AppState, event: AppEvent) {
    match event {
        AppEvent::TasksLoaded(tasks) => app_state.set_tasks(tasks),
        AppEvent::DueUpdated { task_id, message } | AppEvent::DueFailed { task_id, message } => {
            app_state.finish_due_update(task_id, message)
        }
        AppEvent::Error(msg) => {
            app_state.message = format!("Error: {}", msg);
            app_state.loading = false;
        }
        AppEvent::Status(msg) => app_state.message = msg,
    }
}

/// Maps a key press to a dialog command while a dialog has focus.
pub fn dialog_command(key: KeyEvent) -> Option<DialogCommand> {
    let command = match key.code {
        KeyCode::Enter => DialogCommand::Submit,
        KeyCode::Esc => DialogCommand::Cancel,
        KeyCode::Backspace => DialogCommand::Edit(EditOp::Backspace),
        KeyCode::Delete => DialogCommand::Edit(EditOp::Delete),
        KeyCode::Left => DialogCommand::Edit(EditOp::Left),
        KeyCode::Right => DialogCommand::Edit(EditOp::Right),
        KeyCode::Home => DialogCommand::Edit(EditOp::Home),
        KeyCode::End => DialogCommand::Edit(EditOp::End),
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            DialogCommand::Edit(EditOp::Insert(c))
        }
        _ => return None,
    };
    Some(command)
}

// Owns the service side: every due update runs as its own task so a slow
// request never holds up the next one. On quit the outstanding updates are
// awaited, so a response the service already applied is also stored locally.
async fn worker(
    reconciler: DueReconciler,
    store: Arc<dyn TaskStore>,
    mut action_rx: mpsc::Receiver<Action>,
    event_tx: mpsc::Sender<AppEvent>,
) {
    let _ = event_tx
        .send(AppEvent::Status("Loading tasks...".to_string()))
        .await;
    match store.list() {
        Ok(tasks) => {
            let _ = event_tx.send(AppEvent::TasksLoaded(tasks)).await;
        }
        Err(e) => {
            let _ = event_tx.send(AppEvent::Error(e.to_string())).await;
        }
    }

    let mut updates = JoinSet::new();
    while let Some(action) = action_rx.recv().await {
        match action {
            Action::Quit => break,
            Action::SetTaskDueString(task_id, due_string) => {
                let reconciler = reconciler.clone();
                let store = store.clone();
                let event_tx = event_tx.clone();
                updates.spawn(async move {
                    let event = match reconciler.set_task_due_string(task_id, &due_string).await {
                        Ok(done) => AppEvent::DueUpdated {
                            task_id,
                            message: done.message,
                        },
                        Err(e) => AppEvent::DueFailed {
                            task_id,
                            message: failure_message(&e),
                        },
                    };
                    if let Ok(tasks) = store.list() {
                        let _ = event_tx.send(AppEvent::TasksLoaded(tasks)).await;
                    }
                    let _ = event_tx.send(event).await;
                });
            }
            Action::None | Action::HideDialog => {}
        }
        while updates.try_join_next().is_some() {}
    }

    if !updates.is_empty() {
        info!(pending = updates.len(), "waiting for due updates before exit");
    }
    while let Some(joined) = updates.join_next().await {
        if let Err(e) = joined {
            error!("due update task failed: {}", e);
        }
    }
}

fn failure_message(e: &DueUpdateError) -> String {
    match e {
        DueUpdateError::TaskNotFound(_) => "Task no longer exists; due date not saved.".to_string(),
        e if e.is_retryable() => format!("Error: {}. Press D to try again.", e),
        e => format!("Error: {}", e),
    }
}
