use tracing::debug;

use crate::api::client::docs_url;
use crate::api::models::SortOrder;

use crate::app::actions::{
    Action, DataPayload, DeleteOrigin, FilmTarget, LoadSource, PageTarget, RequestId, SideEffect,
};
use crate::app::form::FilmForm;
use crate::app::route::Route;
use crate::app::state::{
    AppState, ConfirmDelete, DetailStatus, DetailView, FormMode, FormView, ListView, PAGE_SIZE,
    Screen, SearchFocus, SearchMode, SearchPhase, SearchView,
};

pub fn update(state: &mut AppState, action: Action) -> Vec<SideEffect> {
    match action {
        Action::Quit => {
            state.should_quit = true;
            vec![]
        }
        Action::Navigate(route) => navigate(state, route),
        Action::OpenDocs => vec![SideEffect::OpenUrl(docs_url(&state.api_url))],
        Action::MoveUp => {
            move_cursor(state, false);
            vec![]
        }
        Action::MoveDown => {
            move_cursor(state, true);
            vec![]
        }
        Action::OpenSelected => {
            let selected = match &state.screen {
                Screen::List(list) => list.selected().map(|film| film.id),
                Screen::Search(search) if search.focus == SearchFocus::Results => {
                    search.selected().map(|film| film.id)
                }
                _ => None,
            };
            match selected {
                Some(id) => navigate(state, Route::FilmDetail(id)),
                None => vec![],
            }
        }
        Action::EditSelected => {
            let target = match &state.screen {
                Screen::List(list) => list.selected().map(|film| film.id),
                Screen::Detail(detail) => detail.film().map(|film| film.id),
                _ => None,
            };
            match target {
                Some(id) => navigate(state, Route::EditFilm(id)),
                None => vec![],
            }
        }
        Action::NextPage => change_page(state, true),
        Action::PrevPage => change_page(state, false),
        Action::SortBy(field) => {
            let Screen::List(list) = &mut state.screen else {
                return vec![];
            };
            if list.sort_field == field {
                list.sort_order = list.sort_order.toggled();
            } else {
                list.sort_field = field;
                list.sort_order = SortOrder::Asc;
            }
            fetch_list(state)
        }
        Action::Reload => {
            let filter_mode = state
                .search()
                .is_some_and(|search| search.mode == SearchMode::Filter);
            match state.route() {
                Route::FilmList => fetch_list(state),
                Route::FilmDetail(_) => fetch_detail(state),
                Route::Search if filter_mode => fetch_filter(state),
                _ => vec![],
            }
        }
        Action::RequestDelete => {
            let (film, origin) = match &state.screen {
                Screen::List(list) => (list.selected(), DeleteOrigin::List),
                Screen::Detail(detail) => (detail.film(), DeleteOrigin::Detail),
                _ => (None, DeleteOrigin::List),
            };
            if let Some(film) = film {
                state.confirm = Some(ConfirmDelete {
                    id: film.id,
                    title: film.title.clone(),
                    origin,
                });
            }
            vec![]
        }
        Action::ConfirmDelete => match state.confirm.take() {
            Some(confirm) => vec![SideEffect::DeleteFilm {
                id: confirm.id,
                origin: confirm.origin,
            }],
            None => vec![],
        },
        Action::CancelDelete => {
            state.confirm = None;
            vec![]
        }
        Action::DismissAlert => {
            state.alert = None;
            vec![]
        }

        Action::FormInput(ch) => {
            if let Screen::Form(view) = &mut state.screen
                && view.ready
            {
                view.form.push_char(ch);
            }
            vec![]
        }
        Action::FormBackspace => {
            if let Screen::Form(view) = &mut state.screen
                && view.ready
            {
                view.form.backspace();
            }
            vec![]
        }
        Action::FormNextField => {
            if let Screen::Form(view) = &mut state.screen {
                view.form.focus_next();
            }
            vec![]
        }
        Action::FormPrevField => {
            if let Screen::Form(view) = &mut state.screen {
                view.form.focus_prev();
            }
            vec![]
        }
        Action::FormSubmit => submit_form(state),
        Action::FormCancel => match state.form().map(|view| view.mode) {
            Some(FormMode::Edit(id)) => navigate(state, Route::FilmDetail(id)),
            Some(FormMode::Create) => navigate(state, Route::FilmList),
            None => vec![],
        },

        Action::SearchInput(ch) => {
            if let Screen::Search(search) = &mut state.screen {
                push_search_char(search, ch);
            }
            vec![]
        }
        Action::SearchBackspace => {
            if let Screen::Search(search) = &mut state.screen
                && let Some(input) = search.focused_input()
            {
                input.pop();
            }
            vec![]
        }
        Action::SearchNextField => {
            if let Screen::Search(search) = &mut state.screen {
                search.focus = search.focus.next();
            }
            vec![]
        }
        Action::SearchPrevField => {
            if let Screen::Search(search) = &mut state.screen {
                search.focus = search.focus.prev();
            }
            vec![]
        }
        Action::SubmitSearch => submit_search(state),
        Action::ApplyFilter => {
            if let Screen::Search(search) = &mut state.screen {
                search.mode = SearchMode::Filter;
            }
            fetch_filter(state)
        }
        Action::CycleFilterSort => {
            let Screen::Search(search) = &mut state.screen else {
                return vec![];
            };
            search.filters.sort_field = search.filters.sort_field.next_filter_field();
            refetch_filter_mode(state)
        }
        Action::ToggleFilterOrder => {
            let Screen::Search(search) = &mut state.screen else {
                return vec![];
            };
            search.filters.sort_order = search.filters.sort_order.toggled();
            refetch_filter_mode(state)
        }
        Action::ClearFilters => {
            if let Screen::Search(search) = &mut state.screen {
                search.filters = Default::default();
                search.mode = SearchMode::Title;
                search.query.clear();
                search.films.clear();
                search.total = 0;
                search.cursor = 0;
                search.phase = SearchPhase::Idle;
                search.request = None;
            }
            vec![]
        }

        Action::DataLoaded(payload) => apply_payload(state, payload),
        Action::LoadFailed {
            source,
            request,
            message,
        } => {
            apply_failure(state, source, request, message);
            vec![]
        }
        Action::DeleteFailed { origin, message } => {
            debug!(?origin, "Delete failed");
            state.alert = Some(format!("Failed to delete: {}", message));
            vec![]
        }
    }
}

/// Mount the view for `route` with fresh state and issue its initial fetches.
fn navigate(state: &mut AppState, route: Route) -> Vec<SideEffect> {
    debug!(route = %route, "Navigating");
    state.confirm = None;
    match route {
        Route::FilmList => {
            state.screen = Screen::List(ListView::default());
            fetch_list(state)
        }
        Route::FilmDetail(id) => {
            state.screen = Screen::Detail(DetailView::new(id));
            fetch_detail(state)
        }
        Route::NewFilm => {
            state.screen = Screen::Form(FormView::create(state.current_year));
            vec![]
        }
        Route::EditFilm(id) => {
            state.screen = Screen::Form(FormView::edit(id, state.current_year));
            let request = state.issue_request();
            if let Screen::Form(view) = &mut state.screen {
                view.request = Some(request);
            }
            vec![SideEffect::FetchFilm {
                request,
                id,
                target: FilmTarget::Form,
            }]
        }
        Route::Search => {
            state.screen = Screen::Search(SearchView::default());
            let request = state.issue_request();
            if let Screen::Search(search) = &mut state.screen {
                search.stats_request = Some(request);
            }
            vec![SideEffect::FetchStats { request }]
        }
    }
}

fn fetch_list(state: &mut AppState) -> Vec<SideEffect> {
    let request = state.issue_request();
    let Screen::List(list) = &mut state.screen else {
        return vec![];
    };
    list.loading = true;
    list.error = None;
    list.request = Some(request);
    vec![SideEffect::FetchFilms {
        request,
        query: list.query(),
        target: PageTarget::List,
    }]
}

fn fetch_detail(state: &mut AppState) -> Vec<SideEffect> {
    let request = state.issue_request();
    let Screen::Detail(detail) = &mut state.screen else {
        return vec![];
    };
    detail.status = DetailStatus::Loading;
    detail.request = Some(request);
    vec![SideEffect::FetchFilm {
        request,
        id: detail.id,
        target: FilmTarget::Detail,
    }]
}

fn fetch_filter(state: &mut AppState) -> Vec<SideEffect> {
    let request = state.issue_request();
    let Screen::Search(search) = &mut state.screen else {
        return vec![];
    };
    search.phase = SearchPhase::Loading;
    search.request = Some(request);
    vec![SideEffect::FetchFilms {
        request,
        query: search.filters.to_query(search.page, PAGE_SIZE),
        target: PageTarget::Search,
    }]
}

/// Re-issue the filter query after a page or sort change, as long as a
/// filter with at least one bound is active.
fn refetch_filter_mode(state: &mut AppState) -> Vec<SideEffect> {
    match state.search() {
        Some(search) if search.mode == SearchMode::Filter && search.filters.has_bounds() => {
            fetch_filter(state)
        }
        _ => vec![],
    }
}

fn submit_search(state: &mut AppState) -> Vec<SideEffect> {
    let query = match state.search() {
        Some(search) => search.query.trim().to_string(),
        None => return vec![],
    };
    if query.is_empty() {
        return vec![];
    }

    let request = state.issue_request();
    let Screen::Search(search) = &mut state.screen else {
        return vec![];
    };
    search.mode = SearchMode::Title;
    search.phase = SearchPhase::Loading;
    search.request = Some(request);
    vec![SideEffect::SearchFilms {
        request,
        query,
        page: search.page,
        size: PAGE_SIZE,
    }]
}

fn submit_form(state: &mut AppState) -> Vec<SideEffect> {
    let Screen::Form(view) = &mut state.screen else {
        return vec![];
    };
    if !view.ready || view.submitting {
        return vec![];
    }

    let payload = match view.form.validate() {
        Ok(payload) => payload,
        Err(errors) => {
            debug!(fields = errors.len(), "Form validation failed");
            view.form.errors = errors;
            return vec![];
        }
    };
    view.form.errors.clear();
    let mode = view.mode;

    let request = state.issue_request();
    let Screen::Form(view) = &mut state.screen else {
        return vec![];
    };
    view.submitting = true;
    view.error = None;
    view.request = Some(request);

    match mode {
        FormMode::Create => vec![SideEffect::CreateFilm { request, payload }],
        FormMode::Edit(id) => vec![SideEffect::UpdateFilm {
            request,
            id,
            payload,
        }],
    }
}

fn push_search_char(search: &mut SearchView, ch: char) {
    let focus = search.focus;
    let Some(input) = search.focused_input() else {
        return;
    };
    let accepted = match focus {
        SearchFocus::YearMin | SearchFocus::YearMax => ch.is_ascii_digit(),
        SearchFocus::RatingMin | SearchFocus::RatingMax => {
            ch.is_ascii_digit() || (ch == '.' && !input.contains('.'))
        }
        _ => !ch.is_control(),
    };
    if accepted {
        input.push(ch);
    }
}

fn move_cursor(state: &mut AppState, down: bool) {
    let (cursor, len) = match &mut state.screen {
        Screen::List(list) => (&mut list.cursor, list.films.len()),
        Screen::Search(search) if search.focus == SearchFocus::Results => {
            (&mut search.cursor, search.films.len())
        }
        Screen::Form(view) => {
            if down {
                view.form.focus_next();
            } else {
                view.form.focus_prev();
            }
            return;
        }
        _ => return,
    };
    if down {
        if *cursor + 1 < len {
            *cursor += 1;
        }
    } else if *cursor > 0 {
        *cursor -= 1;
    }
}

fn change_page(state: &mut AppState, forward: bool) -> Vec<SideEffect> {
    match &mut state.screen {
        Screen::List(list) => {
            if !step_page(&mut list.page, list.pages, forward) {
                return vec![];
            }
            list.cursor = 0;
            fetch_list(state)
        }
        Screen::Search(search) => {
            if !step_page(&mut search.page, search.pages, forward) {
                return vec![];
            }
            search.cursor = 0;
            // Title results are only re-fetched on the next explicit submit.
            refetch_filter_mode(state)
        }
        _ => vec![],
    }
}

fn step_page(page: &mut u32, pages: u32, forward: bool) -> bool {
    if forward && *page < pages {
        *page += 1;
        true
    } else if !forward && *page > 1 {
        *page -= 1;
        true
    } else {
        false
    }
}

/// Accept a completion only if it answers the view's newest request.
fn take_if_current(pending: &mut Option<RequestId>, request: RequestId) -> bool {
    if *pending == Some(request) {
        *pending = None;
        true
    } else {
        debug!(request, expected = ?pending, "Dropping stale response");
        false
    }
}

fn apply_payload(state: &mut AppState, payload: DataPayload) -> Vec<SideEffect> {
    match payload {
        DataPayload::ListPage { request, page } => {
            if let Screen::List(list) = &mut state.screen
                && take_if_current(&mut list.request, request)
            {
                list.films = page.items;
                list.total = page.total;
                list.pages = page.pages.max(1);
                list.loading = false;
                list.cursor = list.cursor.min(list.films.len().saturating_sub(1));
            }
            vec![]
        }
        DataPayload::DetailFilm { request, film } => {
            if let Screen::Detail(detail) = &mut state.screen
                && take_if_current(&mut detail.request, request)
            {
                detail.status = match film {
                    Some(film) => DetailStatus::Loaded(film),
                    None => DetailStatus::NotFound,
                };
            }
            vec![]
        }
        DataPayload::FormFilm { request, film } => {
            if let Screen::Form(view) = &mut state.screen
                && take_if_current(&mut view.request, request)
            {
                view.loading_film = false;
                match film {
                    Some(film) => {
                        view.form = FilmForm::from_film(&film);
                        view.ready = true;
                    }
                    None => view.error = Some("Film not found".to_string()),
                }
            }
            vec![]
        }
        DataPayload::SearchResults { request, page } => {
            if let Screen::Search(search) = &mut state.screen
                && take_if_current(&mut search.request, request)
            {
                search.films = page.items;
                search.total = page.total;
                search.pages = page.pages.max(1);
                search.cursor = 0;
                search.phase = SearchPhase::Results;
            }
            vec![]
        }
        DataPayload::Stats { request, stats } => {
            if let Screen::Search(search) = &mut state.screen
                && take_if_current(&mut search.stats_request, request)
            {
                search.stats = Some(stats);
            }
            vec![]
        }
        DataPayload::Saved { request, film } => {
            let Screen::Form(view) = &mut state.screen else {
                return vec![];
            };
            if !take_if_current(&mut view.request, request) {
                return vec![];
            }
            view.submitting = false;
            let id = match view.mode {
                FormMode::Create => film.id,
                FormMode::Edit(id) => id,
            };
            navigate(state, Route::FilmDetail(id))
        }
        DataPayload::Deleted { id, origin } => match origin {
            DeleteOrigin::List => {
                let Screen::List(list) = &mut state.screen else {
                    return vec![];
                };
                let before = list.films.len();
                list.films.retain(|film| film.id != id);
                // Only step back if the film was on this page and emptied it.
                let emptied_page = before == 1 && list.films.is_empty();
                list.cursor = list.cursor.min(list.films.len().saturating_sub(1));
                if emptied_page && list.page > 1 {
                    list.page -= 1;
                }
                fetch_list(state)
            }
            DeleteOrigin::Detail => {
                if state.route() == Route::FilmDetail(id) {
                    navigate(state, Route::FilmList)
                } else {
                    vec![]
                }
            }
        },
    }
}

fn apply_failure(state: &mut AppState, source: LoadSource, request: RequestId, message: String) {
    match (source, &mut state.screen) {
        (LoadSource::List, Screen::List(list)) => {
            if take_if_current(&mut list.request, request) {
                list.loading = false;
                list.error = Some(message);
            }
        }
        (LoadSource::Detail, Screen::Detail(detail)) => {
            if take_if_current(&mut detail.request, request) {
                detail.status = DetailStatus::Failed(message);
            }
        }
        (LoadSource::FormLoad, Screen::Form(view)) => {
            if take_if_current(&mut view.request, request) {
                view.loading_film = false;
                view.error = Some(message);
            }
        }
        (LoadSource::FormSubmit, Screen::Form(view)) => {
            if take_if_current(&mut view.request, request) {
                view.submitting = false;
                view.error = Some(message);
            }
        }
        (LoadSource::Search, Screen::Search(search)) => {
            if take_if_current(&mut search.request, request) {
                search.phase = SearchPhase::Failed(message);
            }
        }
        (LoadSource::Stats, Screen::Search(search)) => {
            // A failed stats fetch leaves the panel empty.
            take_if_current(&mut search.stats_request, request);
        }
        _ => debug!(?source, request, "Dropping failure for an unmounted view"),
    }
}
