use filmdeck::api::models::{Film, FilmPage, FilmPayload, FilmStats, SortField, SortOrder};
use filmdeck::app::actions::{
    Action, DataPayload, DeleteOrigin, FilmTarget, LoadSource, PageTarget, SideEffect,
};
use filmdeck::app::form::FormField;
use filmdeck::app::route::Route;
use filmdeck::app::state::{AppState, DetailStatus, Screen, SearchFocus, SearchMode, SearchPhase};
use filmdeck::app::update::update;

fn make_state() -> AppState {
    AppState::new("http://localhost:8000".into(), 2026)
}

fn make_film(id: i64, title: &str) -> Film {
    Film {
        id,
        title: title.into(),
        director: "Some Director".into(),
        year: 2000,
        rating: 7.5,
        genre: "Drama".into(),
        description: None,
        created_at: None,
        updated_at: None,
    }
}

fn make_page(films: Vec<Film>, total: u64, pages: u32) -> FilmPage {
    FilmPage {
        items: films,
        total,
        page: None,
        pages,
    }
}

fn request_of(effect: &SideEffect) -> u64 {
    match effect {
        SideEffect::FetchFilms { request, .. }
        | SideEffect::FetchFilm { request, .. }
        | SideEffect::SearchFilms { request, .. }
        | SideEffect::FetchStats { request }
        | SideEffect::CreateFilm { request, .. }
        | SideEffect::UpdateFilm { request, .. } => *request,
        other => panic!("effect carries no request id: {:?}", other),
    }
}

/// Navigate to the list and deliver one page for it.
fn load_list(state: &mut AppState, films: Vec<Film>, total: u64, pages: u32) {
    let effects = update(state, Action::Navigate(Route::FilmList));
    let request = request_of(&effects[0]);
    update(
        state,
        Action::DataLoaded(DataPayload::ListPage {
            request,
            page: make_page(films, total, pages),
        }),
    );
}

fn list_page(state: &AppState) -> u32 {
    state.list().expect("list screen").page
}

#[test]
fn test_navigate_to_list_fetches_first_page() {
    let mut state = make_state();
    let effects = update(&mut state, Action::Navigate(Route::FilmList));

    assert_eq!(effects.len(), 1);
    match &effects[0] {
        SideEffect::FetchFilms { query, target, .. } => {
            assert_eq!(*target, PageTarget::List);
            assert_eq!(query.page, 1);
            assert_eq!(query.size, 12);
            assert_eq!(query.sort_by, SortField::Id);
            assert_eq!(query.sort_order, SortOrder::Asc);
        }
        other => panic!("unexpected effect {:?}", other),
    }
    assert!(state.list().unwrap().loading);
    assert!(state.is_loading());
}

#[test]
fn test_navigate_to_detail_and_edit() {
    let mut state = make_state();

    let effects = update(&mut state, Action::Navigate(Route::FilmDetail(5)));
    assert!(matches!(
        effects[0],
        SideEffect::FetchFilm {
            id: 5,
            target: FilmTarget::Detail,
            ..
        }
    ));
    assert_eq!(state.route(), Route::FilmDetail(5));

    let effects = update(&mut state, Action::Navigate(Route::EditFilm(5)));
    assert!(matches!(
        effects[0],
        SideEffect::FetchFilm {
            id: 5,
            target: FilmTarget::Form,
            ..
        }
    ));
    let form = state.form().unwrap();
    assert!(!form.ready);
    assert!(form.loading_film);
}

#[test]
fn test_new_film_form_needs_no_fetch() {
    let mut state = make_state();
    let effects = update(&mut state, Action::Navigate(Route::NewFilm));
    assert!(effects.is_empty());

    let form = state.form().unwrap();
    assert!(form.ready);
    assert_eq!(form.form.year, "2026");
    assert_eq!(form.form.rating, "0.0");
}

#[test]
fn test_search_mount_fetches_stats_only() {
    let mut state = make_state();
    let effects = update(&mut state, Action::Navigate(Route::Search));
    assert_eq!(effects.len(), 1);
    assert!(matches!(effects[0], SideEffect::FetchStats { .. }));
    assert_eq!(state.search().unwrap().phase, SearchPhase::Idle);
}

#[test]
fn test_navigation_remounts_fresh_state() {
    let mut state = make_state();
    load_list(&mut state, vec![make_film(1, "A"), make_film(2, "B")], 30, 3);
    update(&mut state, Action::NextPage);
    assert_eq!(list_page(&state), 2);

    update(&mut state, Action::Navigate(Route::Search));
    update(&mut state, Action::Navigate(Route::FilmList));
    assert_eq!(list_page(&state), 1);
    assert!(state.list().unwrap().films.is_empty());
}

#[test]
fn test_sort_same_field_toggles_order() {
    let mut state = make_state();
    load_list(&mut state, vec![make_film(1, "A")], 1, 1);

    let effects = update(&mut state, Action::SortBy(SortField::Title));
    match &effects[0] {
        SideEffect::FetchFilms { query, .. } => {
            assert_eq!(query.sort_by, SortField::Title);
            assert_eq!(query.sort_order, SortOrder::Asc);
        }
        other => panic!("unexpected effect {:?}", other),
    }

    let effects = update(&mut state, Action::SortBy(SortField::Title));
    match &effects[0] {
        SideEffect::FetchFilms { query, .. } => assert_eq!(query.sort_order, SortOrder::Desc),
        other => panic!("unexpected effect {:?}", other),
    }

    update(&mut state, Action::SortBy(SortField::Year));
    let list = state.list().unwrap();
    assert_eq!(list.sort_field, SortField::Year);
    assert_eq!(list.sort_order, SortOrder::Asc);
}

#[test]
fn test_paging_is_clamped() {
    let mut state = make_state();
    load_list(&mut state, vec![make_film(1, "A")], 13, 2);

    assert!(update(&mut state, Action::PrevPage).is_empty());
    assert_eq!(update(&mut state, Action::NextPage).len(), 1);
    assert_eq!(list_page(&state), 2);
    assert!(update(&mut state, Action::NextPage).is_empty());
    assert_eq!(list_page(&state), 2);
}

#[test]
fn test_cursor_movement_stays_in_bounds() {
    let mut state = make_state();
    load_list(&mut state, vec![make_film(1, "A"), make_film(2, "B")], 2, 1);

    update(&mut state, Action::MoveUp);
    assert_eq!(state.list().unwrap().cursor, 0);
    update(&mut state, Action::MoveDown);
    update(&mut state, Action::MoveDown);
    assert_eq!(state.list().unwrap().cursor, 1);

    let effects = update(&mut state, Action::OpenSelected);
    assert_eq!(state.route(), Route::FilmDetail(2));
    assert_eq!(effects.len(), 1);
}

#[test]
fn test_stale_list_response_is_dropped() {
    let mut state = make_state();
    let first = update(&mut state, Action::Navigate(Route::FilmList));
    let stale = request_of(&first[0]);
    let second = update(&mut state, Action::SortBy(SortField::Rating));
    let current = request_of(&second[0]);

    update(
        &mut state,
        Action::DataLoaded(DataPayload::ListPage {
            request: stale,
            page: make_page(vec![make_film(1, "Stale")], 1, 1),
        }),
    );
    assert!(state.list().unwrap().films.is_empty());
    assert!(state.list().unwrap().loading);

    update(
        &mut state,
        Action::DataLoaded(DataPayload::ListPage {
            request: current,
            page: make_page(vec![make_film(2, "Fresh")], 1, 1),
        }),
    );
    let list = state.list().unwrap();
    assert_eq!(list.films[0].title, "Fresh");
    assert!(!list.loading);
}

#[test]
fn test_response_for_previous_screen_is_dropped() {
    let mut state = make_state();
    let effects = update(&mut state, Action::Navigate(Route::FilmDetail(1)));
    let request = request_of(&effects[0]);
    update(&mut state, Action::Navigate(Route::FilmDetail(2)));

    update(
        &mut state,
        Action::DataLoaded(DataPayload::DetailFilm {
            request,
            film: Some(make_film(1, "Wrong")),
        }),
    );
    assert_eq!(state.detail().unwrap().status, DetailStatus::Loading);
}

#[test]
fn test_list_failure_shows_error() {
    let mut state = make_state();
    let effects = update(&mut state, Action::Navigate(Route::FilmList));
    update(
        &mut state,
        Action::LoadFailed {
            source: LoadSource::List,
            request: request_of(&effects[0]),
            message: "Server error (500)".into(),
        },
    );
    let list = state.list().unwrap();
    assert!(!list.loading);
    assert_eq!(list.error.as_deref(), Some("Server error (500)"));
}

#[test]
fn test_detail_missing_film_is_not_found() {
    let mut state = make_state();
    let effects = update(&mut state, Action::Navigate(Route::FilmDetail(99)));
    update(
        &mut state,
        Action::DataLoaded(DataPayload::DetailFilm {
            request: request_of(&effects[0]),
            film: None,
        }),
    );
    assert_eq!(state.detail().unwrap().status, DetailStatus::NotFound);
}

#[test]
fn test_delete_requires_confirmation() {
    let mut state = make_state();
    load_list(&mut state, vec![make_film(4, "Alien")], 1, 1);

    update(&mut state, Action::RequestDelete);
    let confirm = state.confirm.as_ref().unwrap();
    assert_eq!(confirm.id, 4);
    assert_eq!(confirm.title, "Alien");

    assert!(update(&mut state, Action::CancelDelete).is_empty());
    assert!(state.confirm.is_none());

    update(&mut state, Action::RequestDelete);
    let effects = update(&mut state, Action::ConfirmDelete);
    assert_eq!(
        effects,
        vec![SideEffect::DeleteFilm {
            id: 4,
            origin: DeleteOrigin::List,
        }]
    );
    assert!(state.confirm.is_none());
}

#[test]
fn test_deleting_last_film_on_page_steps_back() {
    let mut state = make_state();
    load_list(&mut state, vec![make_film(1, "A")], 13, 2);
    update(&mut state, Action::NextPage);
    let effects = update(&mut state, Action::NextPage);
    assert!(effects.is_empty());
    let list = state.list().unwrap();
    let request = list.request.unwrap();
    update(
        &mut state,
        Action::DataLoaded(DataPayload::ListPage {
            request,
            page: make_page(vec![make_film(13, "Only")], 13, 2),
        }),
    );

    let effects = update(
        &mut state,
        Action::DataLoaded(DataPayload::Deleted {
            id: 13,
            origin: DeleteOrigin::List,
        }),
    );
    assert_eq!(list_page(&state), 1);
    match &effects[0] {
        SideEffect::FetchFilms { query, .. } => assert_eq!(query.page, 1),
        other => panic!("unexpected effect {:?}", other),
    }
}

#[test]
fn test_deleting_one_of_many_refetches_same_page() {
    let mut state = make_state();
    load_list(&mut state, vec![make_film(1, "A")], 30, 3);
    update(&mut state, Action::NextPage);
    let request = state.list().unwrap().request.unwrap();
    update(
        &mut state,
        Action::DataLoaded(DataPayload::ListPage {
            request,
            page: make_page(vec![make_film(13, "M"), make_film(14, "N")], 30, 3),
        }),
    );

    let effects = update(
        &mut state,
        Action::DataLoaded(DataPayload::Deleted {
            id: 13,
            origin: DeleteOrigin::List,
        }),
    );
    let list = state.list().unwrap();
    assert_eq!(list.page, 2);
    assert_eq!(list.films.len(), 1);
    match &effects[0] {
        SideEffect::FetchFilms { query, .. } => assert_eq!(query.page, 2),
        other => panic!("unexpected effect {:?}", other),
    }
}

#[test]
fn test_delete_completing_after_page_change_keeps_page() {
    let mut state = make_state();
    load_list(&mut state, vec![make_film(1, "A")], 25, 3);
    update(&mut state, Action::NextPage);
    let request = state.list().unwrap().request.unwrap();
    update(
        &mut state,
        Action::DataLoaded(DataPayload::ListPage {
            request,
            page: make_page(vec![make_film(13, "M"), make_film(14, "N")], 25, 3),
        }),
    );
    update(&mut state, Action::RequestDelete);
    assert_eq!(
        update(&mut state, Action::ConfirmDelete),
        vec![SideEffect::DeleteFilm {
            id: 13,
            origin: DeleteOrigin::List,
        }]
    );

    // Page forward to a page holding a single film before the delete lands.
    update(&mut state, Action::NextPage);
    let request = state.list().unwrap().request.unwrap();
    update(
        &mut state,
        Action::DataLoaded(DataPayload::ListPage {
            request,
            page: make_page(vec![make_film(25, "Y")], 25, 3),
        }),
    );

    let effects = update(
        &mut state,
        Action::DataLoaded(DataPayload::Deleted {
            id: 13,
            origin: DeleteOrigin::List,
        }),
    );
    let list = state.list().unwrap();
    assert_eq!(list.page, 3);
    assert_eq!(list.films.len(), 1);
    match &effects[0] {
        SideEffect::FetchFilms { query, .. } => assert_eq!(query.page, 3),
        other => panic!("unexpected effect {:?}", other),
    }
}

#[test]
fn test_delete_from_detail_returns_to_list() {
    let mut state = make_state();
    let effects = update(&mut state, Action::Navigate(Route::FilmDetail(7)));
    update(
        &mut state,
        Action::DataLoaded(DataPayload::DetailFilm {
            request: request_of(&effects[0]),
            film: Some(make_film(7, "Heat")),
        }),
    );

    update(&mut state, Action::RequestDelete);
    assert_eq!(state.confirm.as_ref().unwrap().origin, DeleteOrigin::Detail);
    update(&mut state, Action::ConfirmDelete);

    let effects = update(
        &mut state,
        Action::DataLoaded(DataPayload::Deleted {
            id: 7,
            origin: DeleteOrigin::Detail,
        }),
    );
    assert_eq!(state.route(), Route::FilmList);
    assert!(matches!(effects[0], SideEffect::FetchFilms { .. }));
}

#[test]
fn test_delete_failure_raises_alert() {
    let mut state = make_state();
    load_list(&mut state, vec![make_film(1, "A")], 1, 1);
    update(
        &mut state,
        Action::DeleteFailed {
            origin: DeleteOrigin::List,
            message: "Film not found".into(),
        },
    );
    assert_eq!(state.alert.as_deref(), Some("Failed to delete: Film not found"));
    assert_eq!(state.list().unwrap().films.len(), 1);

    update(&mut state, Action::DismissAlert);
    assert!(state.alert.is_none());
}

fn type_into(state: &mut AppState, text: &str) {
    for ch in text.chars() {
        update(state, Action::FormInput(ch));
    }
}

fn clear_field(state: &mut AppState) {
    for _ in 0..8 {
        update(state, Action::FormBackspace);
    }
}

#[test]
fn test_create_film_submits_and_opens_detail() {
    let mut state = make_state();
    update(&mut state, Action::Navigate(Route::NewFilm));

    type_into(&mut state, "The Matrix");
    update(&mut state, Action::FormNextField);
    type_into(&mut state, "The Wachowskis");
    update(&mut state, Action::FormNextField);
    clear_field(&mut state);
    type_into(&mut state, "1999");
    update(&mut state, Action::FormNextField);
    clear_field(&mut state);
    type_into(&mut state, "8.7");
    update(&mut state, Action::FormNextField);
    type_into(&mut state, "Sci-Fi");

    let effects = update(&mut state, Action::FormSubmit);
    let expected = FilmPayload {
        title: "The Matrix".into(),
        director: "The Wachowskis".into(),
        year: 1999,
        rating: 8.7,
        genre: "Sci-Fi".into(),
        description: None,
    };
    let request = match &effects[0] {
        SideEffect::CreateFilm { request, payload } => {
            assert_eq!(*payload, expected);
            *request
        }
        other => panic!("unexpected effect {:?}", other),
    };
    assert!(state.form().unwrap().submitting);

    // A second submit while saving is ignored.
    assert!(update(&mut state, Action::FormSubmit).is_empty());

    let mut saved = make_film(42, "The Matrix");
    saved.year = 1999;
    let effects = update(
        &mut state,
        Action::DataLoaded(DataPayload::Saved {
            request,
            film: saved,
        }),
    );
    assert_eq!(state.route(), Route::FilmDetail(42));
    assert!(matches!(effects[0], SideEffect::FetchFilm { id: 42, .. }));
}

#[test]
fn test_invalid_form_reports_field_errors() {
    let mut state = make_state();
    update(&mut state, Action::Navigate(Route::NewFilm));
    type_into(&mut state, "Title");
    update(&mut state, Action::FormNextField);
    type_into(&mut state, "Director");
    update(&mut state, Action::FormNextField);
    clear_field(&mut state);
    type_into(&mut state, "1887");
    update(&mut state, Action::FormNextField);
    clear_field(&mut state);
    type_into(&mut state, "10.1");

    let effects = update(&mut state, Action::FormSubmit);
    assert!(effects.is_empty());

    let errors = &state.form().unwrap().form.errors;
    assert_eq!(
        errors.get(&FormField::Year).map(String::as_str),
        Some("Year must be between 1888 and 2100")
    );
    assert_eq!(
        errors.get(&FormField::Rating).map(String::as_str),
        Some("Rating must be between 0.0 and 10.0")
    );
    assert_eq!(
        errors.get(&FormField::Genre).map(String::as_str),
        Some("Genre is required")
    );
    assert!(!errors.contains_key(&FormField::Title));
    assert!(!state.form().unwrap().submitting);
}

#[test]
fn test_edit_form_loads_film_then_updates() {
    let mut state = make_state();
    let effects = update(&mut state, Action::Navigate(Route::EditFilm(3)));
    let mut film = make_film(3, "Heat");
    film.description = Some("Crime epic".into());
    update(
        &mut state,
        Action::DataLoaded(DataPayload::FormFilm {
            request: request_of(&effects[0]),
            film: Some(film),
        }),
    );

    let view = state.form().unwrap();
    assert!(view.ready);
    assert_eq!(view.form.title, "Heat");
    assert_eq!(view.form.description, "Crime epic");

    let effects = update(&mut state, Action::FormSubmit);
    let request = match &effects[0] {
        SideEffect::UpdateFilm { request, id, payload } => {
            assert_eq!(*id, 3);
            assert_eq!(payload.description.as_deref(), Some("Crime epic"));
            *request
        }
        other => panic!("unexpected effect {:?}", other),
    };

    update(
        &mut state,
        Action::DataLoaded(DataPayload::Saved {
            request,
            film: make_film(3, "Heat"),
        }),
    );
    assert_eq!(state.route(), Route::FilmDetail(3));
}

#[test]
fn test_edit_form_for_missing_film_stays_disabled() {
    let mut state = make_state();
    let effects = update(&mut state, Action::Navigate(Route::EditFilm(9)));
    update(
        &mut state,
        Action::DataLoaded(DataPayload::FormFilm {
            request: request_of(&effects[0]),
            film: None,
        }),
    );

    let view = state.form().unwrap();
    assert!(!view.ready);
    assert_eq!(view.error.as_deref(), Some("Film not found"));
    assert!(update(&mut state, Action::FormSubmit).is_empty());
}

#[test]
fn test_save_failure_keeps_form_values() {
    let mut state = make_state();
    update(&mut state, Action::Navigate(Route::NewFilm));
    type_into(&mut state, "Title");
    update(&mut state, Action::FormNextField);
    type_into(&mut state, "Director");
    update(&mut state, Action::FormNextField);
    update(&mut state, Action::FormNextField);
    update(&mut state, Action::FormNextField);
    type_into(&mut state, "Drama");

    let effects = update(&mut state, Action::FormSubmit);
    update(
        &mut state,
        Action::LoadFailed {
            source: LoadSource::FormSubmit,
            request: request_of(&effects[0]),
            message: "Title already exists".into(),
        },
    );

    let view = state.form().unwrap();
    assert!(!view.submitting);
    assert_eq!(view.error.as_deref(), Some("Title already exists"));
    assert_eq!(view.form.title, "Title");
    assert_eq!(state.route(), Route::NewFilm);
}

#[test]
fn test_cancel_form_navigates_back() {
    let mut state = make_state();
    update(&mut state, Action::Navigate(Route::NewFilm));
    update(&mut state, Action::FormCancel);
    assert_eq!(state.route(), Route::FilmList);

    update(&mut state, Action::Navigate(Route::EditFilm(2)));
    update(&mut state, Action::FormCancel);
    assert_eq!(state.route(), Route::FilmDetail(2));
}

fn type_search(state: &mut AppState, text: &str) {
    for ch in text.chars() {
        update(state, Action::SearchInput(ch));
    }
}

#[test]
fn test_blank_title_search_is_ignored() {
    let mut state = make_state();
    update(&mut state, Action::Navigate(Route::Search));
    type_search(&mut state, "   ");
    assert!(update(&mut state, Action::SubmitSearch).is_empty());
}

#[test]
fn test_title_search_results() {
    let mut state = make_state();
    update(&mut state, Action::Navigate(Route::Search));
    type_search(&mut state, "matrix");

    let effects = update(&mut state, Action::SubmitSearch);
    let request = match &effects[0] {
        SideEffect::SearchFilms {
            request,
            query,
            page,
            size,
        } => {
            assert_eq!(query, "matrix");
            assert_eq!(*page, 1);
            assert_eq!(*size, 12);
            *request
        }
        other => panic!("unexpected effect {:?}", other),
    };
    assert_eq!(state.search().unwrap().phase, SearchPhase::Loading);

    update(
        &mut state,
        Action::DataLoaded(DataPayload::SearchResults {
            request,
            page: make_page(vec![make_film(1, "The Matrix")], 1, 1),
        }),
    );
    let search = state.search().unwrap();
    assert_eq!(search.phase, SearchPhase::Results);
    assert_eq!(search.films.len(), 1);
}

#[test]
fn test_filter_inputs_reject_invalid_characters() {
    let mut state = make_state();
    update(&mut state, Action::Navigate(Route::Search));
    update(&mut state, Action::SearchNextField);
    type_search(&mut state, "19a9x0");
    update(&mut state, Action::SearchNextField);
    update(&mut state, Action::SearchNextField);
    type_search(&mut state, "7.5.2");

    let filters = &state.search().unwrap().filters;
    assert_eq!(filters.year_min, "1990");
    assert_eq!(filters.rating_min, "7.52");
}

#[test]
fn test_apply_filter_builds_query() {
    let mut state = make_state();
    update(&mut state, Action::Navigate(Route::Search));
    update(&mut state, Action::SearchNextField);
    type_search(&mut state, "1990");
    update(&mut state, Action::SearchNextField);
    update(&mut state, Action::SearchNextField);
    type_search(&mut state, "8");
    update(&mut state, Action::SearchNextField);
    update(&mut state, Action::SearchNextField);
    type_search(&mut state, "Drama");

    let effects = update(&mut state, Action::ApplyFilter);
    match &effects[0] {
        SideEffect::FetchFilms { query, target, .. } => {
            assert_eq!(*target, PageTarget::Search);
            assert_eq!(query.year_min, Some(1990));
            assert_eq!(query.year_max, None);
            assert_eq!(query.rating_min, Some(8.0));
            assert_eq!(query.genre.as_deref(), Some("Drama"));
            assert_eq!(query.sort_by, SortField::Rating);
            assert_eq!(query.sort_order, SortOrder::Desc);
        }
        other => panic!("unexpected effect {:?}", other),
    }
    assert_eq!(state.search().unwrap().mode, SearchMode::Filter);
}

#[test]
fn test_sort_changes_refetch_only_in_filter_mode() {
    let mut state = make_state();
    update(&mut state, Action::Navigate(Route::Search));

    assert!(update(&mut state, Action::CycleFilterSort).is_empty());
    assert_eq!(state.search().unwrap().filters.sort_field, SortField::Year);

    update(&mut state, Action::SearchNextField);
    type_search(&mut state, "1990");
    update(&mut state, Action::ApplyFilter);
    let effects = update(&mut state, Action::ToggleFilterOrder);
    match &effects[0] {
        SideEffect::FetchFilms { query, .. } => {
            assert_eq!(query.sort_by, SortField::Year);
            assert_eq!(query.sort_order, SortOrder::Asc);
            assert_eq!(query.year_min, Some(1990));
        }
        other => panic!("unexpected effect {:?}", other),
    }
}

#[test]
fn test_filter_without_bounds_does_not_refetch_on_sort() {
    let mut state = make_state();
    update(&mut state, Action::Navigate(Route::Search));

    assert_eq!(update(&mut state, Action::ApplyFilter).len(), 1);
    assert!(update(&mut state, Action::CycleFilterSort).is_empty());
    assert!(update(&mut state, Action::ToggleFilterOrder).is_empty());
}

#[test]
fn test_title_mode_paging_does_not_refetch() {
    let mut state = make_state();
    update(&mut state, Action::Navigate(Route::Search));
    type_search(&mut state, "the");
    let effects = update(&mut state, Action::SubmitSearch);
    update(
        &mut state,
        Action::DataLoaded(DataPayload::SearchResults {
            request: request_of(&effects[0]),
            page: make_page(vec![make_film(1, "The One")], 20, 2),
        }),
    );

    assert!(update(&mut state, Action::NextPage).is_empty());
    assert_eq!(state.search().unwrap().page, 2);

    let effects = update(&mut state, Action::SubmitSearch);
    assert!(matches!(effects[0], SideEffect::SearchFilms { page: 2, .. }));
}

#[test]
fn test_clear_filters_resets_search() {
    let mut state = make_state();
    update(&mut state, Action::Navigate(Route::Search));
    type_search(&mut state, "alien");
    update(&mut state, Action::SearchNextField);
    type_search(&mut state, "1979");
    update(&mut state, Action::SearchNextField);
    type_search(&mut state, "1986");
    update(&mut state, Action::SearchNextField);
    type_search(&mut state, "7");
    update(&mut state, Action::SearchNextField);
    type_search(&mut state, "9.5");
    update(&mut state, Action::SearchNextField);
    type_search(&mut state, "Sci-Fi");

    let effects = update(&mut state, Action::ApplyFilter);
    update(
        &mut state,
        Action::DataLoaded(DataPayload::SearchResults {
            request: request_of(&effects[0]),
            page: make_page(vec![make_film(1, "Alien"), make_film(2, "Aliens")], 2, 1),
        }),
    );
    assert_eq!(state.search().unwrap().films.len(), 2);

    update(&mut state, Action::ClearFilters);
    let search = state.search().unwrap();
    assert!(search.films.is_empty());
    assert_eq!(search.total, 0);
    assert!(search.query.is_empty());
    assert!(search.filters.year_min.is_empty());
    assert!(search.filters.year_max.is_empty());
    assert!(search.filters.rating_min.is_empty());
    assert!(search.filters.rating_max.is_empty());
    assert!(search.filters.genre.is_empty());
    assert_eq!(search.filters.sort_field, SortField::Rating);
    assert_eq!(search.filters.sort_order, SortOrder::Desc);
    assert_eq!(search.phase, SearchPhase::Idle);
}

#[test]
fn test_in_flight_search_is_dropped_after_clear() {
    let mut state = make_state();
    update(&mut state, Action::Navigate(Route::Search));
    type_search(&mut state, "alien");
    let effects = update(&mut state, Action::SubmitSearch);
    let request = request_of(&effects[0]);

    update(&mut state, Action::ClearFilters);
    update(
        &mut state,
        Action::DataLoaded(DataPayload::SearchResults {
            request,
            page: make_page(vec![make_film(1, "Alien")], 1, 1),
        }),
    );
    assert!(state.search().unwrap().films.is_empty());
}

#[test]
fn test_sort_after_clear_does_not_refill_results() {
    let mut state = make_state();
    update(&mut state, Action::Navigate(Route::Search));
    update(&mut state, Action::SearchNextField);
    type_search(&mut state, "1990");
    let effects = update(&mut state, Action::ApplyFilter);
    update(
        &mut state,
        Action::DataLoaded(DataPayload::SearchResults {
            request: request_of(&effects[0]),
            page: make_page(vec![make_film(3, "Goodfellas")], 1, 1),
        }),
    );

    update(&mut state, Action::ClearFilters);
    assert_eq!(state.search().unwrap().mode, SearchMode::Title);
    assert!(update(&mut state, Action::CycleFilterSort).is_empty());
    assert!(update(&mut state, Action::ToggleFilterOrder).is_empty());
    assert!(update(&mut state, Action::NextPage).is_empty());
    assert!(state.search().unwrap().films.is_empty());
}

#[test]
fn test_stats_failure_is_silent() {
    let mut state = make_state();
    let effects = update(&mut state, Action::Navigate(Route::Search));
    update(
        &mut state,
        Action::LoadFailed {
            source: LoadSource::Stats,
            request: request_of(&effects[0]),
            message: "Cannot reach the server".into(),
        },
    );
    let search = state.search().unwrap();
    assert!(search.stats.is_none());
    assert_eq!(search.phase, SearchPhase::Idle);
    assert!(state.alert.is_none());
}

#[test]
fn test_stats_loaded() {
    let mut state = make_state();
    let effects = update(&mut state, Action::Navigate(Route::Search));
    let stats = FilmStats {
        total_films: 3,
        average_rating: 8.1,
        min_rating: 7.0,
        max_rating: 9.2,
        films_by_year: Default::default(),
        films_by_genre: Default::default(),
    };
    update(
        &mut state,
        Action::DataLoaded(DataPayload::Stats {
            request: request_of(&effects[0]),
            stats: stats.clone(),
        }),
    );
    assert_eq!(state.search().unwrap().stats, Some(stats));
}

#[test]
fn test_results_focus_opens_selected() {
    let mut state = make_state();
    update(&mut state, Action::Navigate(Route::Search));
    update(&mut state, Action::ApplyFilter);
    let request = state.search().unwrap().request.unwrap();
    update(
        &mut state,
        Action::DataLoaded(DataPayload::SearchResults {
            request,
            page: make_page(vec![make_film(5, "E"), make_film(6, "F")], 2, 1),
        }),
    );

    assert!(update(&mut state, Action::OpenSelected).is_empty());
    update(&mut state, Action::SearchPrevField);
    assert_eq!(state.search().unwrap().focus, SearchFocus::Results);
    update(&mut state, Action::MoveDown);
    update(&mut state, Action::OpenSelected);
    assert_eq!(state.route(), Route::FilmDetail(6));
}

#[test]
fn test_open_docs_and_quit() {
    let mut state = make_state();
    assert_eq!(
        update(&mut state, Action::OpenDocs),
        vec![SideEffect::OpenUrl("http://localhost:8000/docs".into())]
    );
    update(&mut state, Action::Quit);
    assert!(state.should_quit);
}

#[test]
fn test_reload_by_route() {
    let mut state = make_state();
    update(&mut state, Action::Navigate(Route::FilmDetail(3)));
    assert!(matches!(
        update(&mut state, Action::Reload)[0],
        SideEffect::FetchFilm { id: 3, .. }
    ));

    update(&mut state, Action::Navigate(Route::NewFilm));
    assert!(update(&mut state, Action::Reload).is_empty());

    update(&mut state, Action::Navigate(Route::Search));
    assert!(update(&mut state, Action::Reload).is_empty());

    assert!(matches!(state.screen, Screen::Search(_)));
}
