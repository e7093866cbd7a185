use std::io;
use std::sync::Arc;

use anyhow::Result;
use chrono::Datelike;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use tokio::sync::{Semaphore, mpsc};
use tracing::{debug, error, warn};

use crate::api::FilmClient;
use crate::api::models::SortField;
use crate::app::actions::{
    Action, DataPayload, FilmTarget, LoadSource, PageTarget, SideEffect,
};
use crate::app::route::{Route, Tab};
use crate::app::state::{AppState, Screen, SearchFocus};
use crate::app::update::update;
use crate::app::view;

pub async fn run(client: FilmClient, start: Route) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Install panic hook to restore terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let result = run_loop(&mut terminal, client, start).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;

    result
}

async fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    client: FilmClient,
    start: Route,
) -> Result<()> {
    let current_year = chrono::Local::now().year();
    let mut state = AppState::new(client.base_url().to_string(), current_year);

    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();
    let semaphore = Arc::new(Semaphore::new(4));

    for effect in update(&mut state, Action::Navigate(start)) {
        spawn_side_effect(effect, &client, &action_tx, &semaphore);
    }

    let mut event_stream = crossterm::event::EventStream::new();

    loop {
        terminal.draw(|f| view::render(f, &state))?;

        if state.should_quit {
            break;
        }

        tokio::select! {
            // Terminal events
            maybe_event = event_stream.next() => {
                if let Some(Ok(event)) = maybe_event
                    && let Some(action) = map_event_to_action(&event, &state) {
                        for effect in update(&mut state, action) {
                            spawn_side_effect(effect, &client, &action_tx, &semaphore);
                        }
                    }
            }
            // Completions from background tasks
            Some(action) = action_rx.recv() => {
                for effect in update(&mut state, action) {
                    spawn_side_effect(effect, &client, &action_tx, &semaphore);
                }
            }
        }
    }

    Ok(())
}

pub fn map_event_to_action(event: &Event, state: &AppState) -> Option<Action> {
    let Event::Key(KeyEvent {
        code,
        modifiers,
        kind: event::KeyEventKind::Press,
        ..
    }) = event
    else {
        return None;
    };
    let ctrl = modifiers.contains(KeyModifiers::CONTROL);

    if ctrl && *code == KeyCode::Char('c') {
        return Some(Action::Quit);
    }

    // Modals swallow everything else
    if state.alert.is_some() {
        return match code {
            KeyCode::Esc | KeyCode::Enter => Some(Action::DismissAlert),
            _ => None,
        };
    }
    if state.confirm.is_some() {
        return match code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                Some(Action::ConfirmDelete)
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => Some(Action::CancelDelete),
            _ => None,
        };
    }

    match code {
        KeyCode::F(1) => return Some(Action::Navigate(Tab::Films.route())),
        KeyCode::F(2) => return Some(Action::Navigate(Tab::AddFilm.route())),
        KeyCode::F(3) => return Some(Action::Navigate(Tab::Search.route())),
        _ => {}
    }

    match &state.screen {
        Screen::Form(_) => map_form_key(*code),
        Screen::Search(search) => map_search_key(*code, ctrl, search.focus),
        Screen::List(_) => map_list_key(*code),
        Screen::Detail(_) => map_detail_key(*code),
    }
}

fn map_global_key(code: KeyCode) -> Option<Action> {
    match code {
        KeyCode::Char('q') => Some(Action::Quit),
        KeyCode::Char('1') => Some(Action::Navigate(Tab::Films.route())),
        KeyCode::Char('2') | KeyCode::Char('n') => Some(Action::Navigate(Tab::AddFilm.route())),
        KeyCode::Char('3') | KeyCode::Char('/') => Some(Action::Navigate(Tab::Search.route())),
        KeyCode::Char('o') => Some(Action::OpenDocs),
        KeyCode::Char('r') => Some(Action::Reload),
        _ => None,
    }
}

fn map_list_key(code: KeyCode) -> Option<Action> {
    match code {
        KeyCode::Char('j') | KeyCode::Down => Some(Action::MoveDown),
        KeyCode::Char('k') | KeyCode::Up => Some(Action::MoveUp),
        KeyCode::Enter | KeyCode::Char('l') => Some(Action::OpenSelected),
        KeyCode::Char('e') => Some(Action::EditSelected),
        KeyCode::Char('d') | KeyCode::Delete => Some(Action::RequestDelete),
        KeyCode::Char('t') => Some(Action::SortBy(SortField::Title)),
        KeyCode::Char('y') => Some(Action::SortBy(SortField::Year)),
        KeyCode::Char('R') => Some(Action::SortBy(SortField::Rating)),
        KeyCode::Right | KeyCode::PageDown | KeyCode::Char(']') => Some(Action::NextPage),
        KeyCode::Left | KeyCode::PageUp | KeyCode::Char('[') => Some(Action::PrevPage),
        other => map_global_key(other),
    }
}

fn map_detail_key(code: KeyCode) -> Option<Action> {
    match code {
        KeyCode::Esc | KeyCode::Backspace | KeyCode::Left | KeyCode::Char('h') => {
            Some(Action::Navigate(Route::FilmList))
        }
        KeyCode::Char('e') => Some(Action::EditSelected),
        KeyCode::Char('d') | KeyCode::Delete => Some(Action::RequestDelete),
        other => map_global_key(other),
    }
}

fn map_form_key(code: KeyCode) -> Option<Action> {
    match code {
        KeyCode::Esc => Some(Action::FormCancel),
        KeyCode::Enter => Some(Action::FormSubmit),
        KeyCode::Tab | KeyCode::Down => Some(Action::FormNextField),
        KeyCode::BackTab | KeyCode::Up => Some(Action::FormPrevField),
        KeyCode::Backspace => Some(Action::FormBackspace),
        KeyCode::Char(c) => Some(Action::FormInput(c)),
        _ => None,
    }
}

fn map_search_key(code: KeyCode, ctrl: bool, focus: SearchFocus) -> Option<Action> {
    if ctrl {
        return match code {
            KeyCode::Char('s') => Some(Action::CycleFilterSort),
            KeyCode::Char('o') => Some(Action::ToggleFilterOrder),
            KeyCode::Char('x') => Some(Action::ClearFilters),
            KeyCode::Char('r') => Some(Action::Reload),
            _ => None,
        };
    }

    let on_results = focus == SearchFocus::Results;
    match code {
        KeyCode::Esc => Some(Action::Navigate(Route::FilmList)),
        KeyCode::Tab => Some(Action::SearchNextField),
        KeyCode::BackTab => Some(Action::SearchPrevField),
        KeyCode::Down | KeyCode::Char('j') if on_results => Some(Action::MoveDown),
        KeyCode::Up | KeyCode::Char('k') if on_results => Some(Action::MoveUp),
        KeyCode::Down => Some(Action::SearchNextField),
        KeyCode::Up => Some(Action::SearchPrevField),
        KeyCode::PageDown => Some(Action::NextPage),
        KeyCode::PageUp => Some(Action::PrevPage),
        KeyCode::Enter => Some(match focus {
            SearchFocus::Query => Action::SubmitSearch,
            SearchFocus::Results => Action::OpenSelected,
            _ => Action::ApplyFilter,
        }),
        KeyCode::Backspace => Some(Action::SearchBackspace),
        KeyCode::Char(c) if !on_results => Some(Action::SearchInput(c)),
        _ => None,
    }
}

fn spawn_side_effect(
    effect: SideEffect,
    client: &FilmClient,
    action_tx: &mpsc::UnboundedSender<Action>,
    semaphore: &Arc<Semaphore>,
) {
    if let SideEffect::OpenUrl(url) = effect {
        tokio::task::spawn_blocking(move || {
            if let Err(e) = crate::util::browser::open_url(&url) {
                error!(error = %e, "Failed to open URL");
            }
        });
        return;
    }

    let client = client.clone();
    let tx = action_tx.clone();
    let sem = semaphore.clone();

    tokio::spawn(async move {
        let _permit = sem.acquire().await;
        if let Some(action) = execute_effect(&client, effect).await {
            let _ = tx.send(action);
        }
    });
}

/// Perform one network side effect and turn its outcome into the action that
/// reports it back to the reducer.
pub async fn execute_effect(client: &FilmClient, effect: SideEffect) -> Option<Action> {
    let action = match effect {
        SideEffect::FetchFilms {
            request,
            query,
            target,
        } => {
            let source = match target {
                PageTarget::List => LoadSource::List,
                PageTarget::Search => LoadSource::Search,
            };
            match client.list_films(&query).await {
                Ok(page) => Action::DataLoaded(match target {
                    PageTarget::List => DataPayload::ListPage { request, page },
                    PageTarget::Search => DataPayload::SearchResults { request, page },
                }),
                Err(e) => {
                    error!(error = %e, ?target, "Failed to fetch films");
                    Action::LoadFailed {
                        source,
                        request,
                        message: e.to_string(),
                    }
                }
            }
        }
        SideEffect::FetchFilm {
            request,
            id,
            target,
        } => match client.get_film(id).await {
            Ok(film) => Action::DataLoaded(match target {
                FilmTarget::Detail => DataPayload::DetailFilm { request, film },
                FilmTarget::Form => DataPayload::FormFilm { request, film },
            }),
            Err(e) => {
                error!(id, error = %e, "Failed to fetch film");
                Action::LoadFailed {
                    source: match target {
                        FilmTarget::Detail => LoadSource::Detail,
                        FilmTarget::Form => LoadSource::FormLoad,
                    },
                    request,
                    message: e.to_string(),
                }
            }
        },
        SideEffect::SearchFilms {
            request,
            query,
            page,
            size,
        } => match client.search_films(&query, page, size).await {
            Ok(page) => Action::DataLoaded(DataPayload::SearchResults { request, page }),
            Err(e) => {
                error!(query = %query, error = %e, "Title search failed");
                Action::LoadFailed {
                    source: LoadSource::Search,
                    request,
                    message: e.to_string(),
                }
            }
        },
        SideEffect::FetchStats { request } => match client.fetch_stats().await {
            Ok(stats) => Action::DataLoaded(DataPayload::Stats { request, stats }),
            Err(e) => {
                warn!(error = %e, "Failed to load catalog stats");
                Action::LoadFailed {
                    source: LoadSource::Stats,
                    request,
                    message: e.to_string(),
                }
            }
        },
        SideEffect::CreateFilm { request, payload } => {
            match client.create_film(&payload).await {
                Ok(film) => {
                    debug!(id = film.id, "Film created");
                    Action::DataLoaded(DataPayload::Saved { request, film })
                }
                Err(e) => {
                    error!(error = %e, "Failed to create film");
                    Action::LoadFailed {
                        source: LoadSource::FormSubmit,
                        request,
                        message: e.to_string(),
                    }
                }
            }
        }
        SideEffect::UpdateFilm {
            request,
            id,
            payload,
        } => match client.update_film(id, &payload).await {
            Ok(film) => {
                debug!(id, "Film updated");
                Action::DataLoaded(DataPayload::Saved { request, film })
            }
            Err(e) => {
                error!(id, error = %e, "Failed to update film");
                Action::LoadFailed {
                    source: LoadSource::FormSubmit,
                    request,
                    message: e.to_string(),
                }
            }
        },
        SideEffect::DeleteFilm { id, origin } => match client.delete_film(id).await {
            Ok(()) => {
                debug!(id, "Film deleted");
                Action::DataLoaded(DataPayload::Deleted { id, origin })
            }
            Err(e) => {
                error!(id, error = %e, "Failed to delete film");
                Action::DeleteFailed {
                    origin,
                    message: e.to_string(),
                }
            }
        },
        SideEffect::OpenUrl(_) => return None,
    };
    Some(action)
}

