use crate::api::models::{Film, FilmPage, FilmPayload, FilmStats, ListQuery, SortField};
use crate::app::route::Route;

/// Identifies one outstanding fetch. Views remember the newest id they issued
/// and ignore completions carrying any other.
pub type RequestId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOrigin {
    List,
    Detail,
}

#[derive(Debug)]
pub enum Action {
    Navigate(Route),
    Quit,
    OpenDocs,

    MoveUp,
    MoveDown,
    OpenSelected,
    EditSelected,
    NextPage,
    PrevPage,
    SortBy(SortField),
    Reload,

    RequestDelete,
    ConfirmDelete,
    CancelDelete,
    DismissAlert,

    FormInput(char),
    FormBackspace,
    FormNextField,
    FormPrevField,
    FormSubmit,
    FormCancel,

    SearchInput(char),
    SearchBackspace,
    SearchNextField,
    SearchPrevField,
    SubmitSearch,
    ApplyFilter,
    CycleFilterSort,
    ToggleFilterOrder,
    ClearFilters,

    DataLoaded(DataPayload),
    LoadFailed {
        source: LoadSource,
        request: RequestId,
        message: String,
    },
    DeleteFailed {
        origin: DeleteOrigin,
        message: String,
    },
}

#[derive(Debug)]
pub enum DataPayload {
    ListPage {
        request: RequestId,
        page: FilmPage,
    },
    DetailFilm {
        request: RequestId,
        film: Option<Film>,
    },
    FormFilm {
        request: RequestId,
        film: Option<Film>,
    },
    SearchResults {
        request: RequestId,
        page: FilmPage,
    },
    Stats {
        request: RequestId,
        stats: FilmStats,
    },
    Saved {
        request: RequestId,
        film: Film,
    },
    Deleted {
        id: i64,
        origin: DeleteOrigin,
    },
}

/// Which view a failed request belonged to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadSource {
    List,
    Detail,
    FormLoad,
    FormSubmit,
    Search,
    Stats,
}

/// Where a page of films is delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageTarget {
    List,
    Search,
}

/// Where a single film is delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilmTarget {
    Detail,
    Form,
}

#[derive(Debug, PartialEq)]
pub enum SideEffect {
    FetchFilms {
        request: RequestId,
        query: ListQuery,
        target: PageTarget,
    },
    FetchFilm {
        request: RequestId,
        id: i64,
        target: FilmTarget,
    },
    SearchFilms {
        request: RequestId,
        query: String,
        page: u32,
        size: u32,
    },
    FetchStats {
        request: RequestId,
    },
    CreateFilm {
        request: RequestId,
        payload: FilmPayload,
    },
    UpdateFilm {
        request: RequestId,
        id: i64,
        payload: FilmPayload,
    },
    DeleteFilm {
        id: i64,
        origin: DeleteOrigin,
    },
    OpenUrl(String),
}
