use crate::api::models::{Film, FilmStats, ListQuery, SortField, SortOrder};
use crate::app::actions::{DeleteOrigin, RequestId};
use crate::app::form::FilmForm;
use crate::app::route::Route;

/// Films per page in the list and search views.
pub const PAGE_SIZE: u32 = 12;

#[derive(Debug, Clone, PartialEq)]
pub struct ListView {
    pub page: u32,
    pub sort_field: SortField,
    pub sort_order: SortOrder,
    pub films: Vec<Film>,
    pub total: u64,
    pub pages: u32,
    pub cursor: usize,
    pub loading: bool,
    pub error: Option<String>,
    pub request: Option<RequestId>,
}

impl Default for ListView {
    fn default() -> Self {
        Self {
            page: 1,
            sort_field: SortField::Id,
            sort_order: SortOrder::Asc,
            films: Vec::new(),
            total: 0,
            pages: 1,
            cursor: 0,
            loading: false,
            error: None,
            request: None,
        }
    }
}

impl ListView {
    pub fn query(&self) -> ListQuery {
        ListQuery::page(self.page, PAGE_SIZE, self.sort_field, self.sort_order)
    }

    pub fn selected(&self) -> Option<&Film> {
        self.films.get(self.cursor)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DetailStatus {
    Loading,
    Loaded(Film),
    NotFound,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct DetailView {
    pub id: i64,
    pub status: DetailStatus,
    pub request: Option<RequestId>,
}

impl DetailView {
    pub fn new(id: i64) -> Self {
        Self {
            id,
            status: DetailStatus::Loading,
            request: None,
        }
    }

    pub fn film(&self) -> Option<&Film> {
        match &self.status {
            DetailStatus::Loaded(film) => Some(film),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(i64),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormView {
    pub mode: FormMode,
    pub form: FilmForm,
    /// False while an edit form waits for (or failed to get) its film.
    pub ready: bool,
    pub loading_film: bool,
    pub submitting: bool,
    pub error: Option<String>,
    pub request: Option<RequestId>,
}

impl FormView {
    pub fn create(current_year: i32) -> Self {
        Self {
            mode: FormMode::Create,
            form: FilmForm::new(current_year),
            ready: true,
            loading_film: false,
            submitting: false,
            error: None,
            request: None,
        }
    }

    pub fn edit(id: i64, current_year: i32) -> Self {
        Self {
            mode: FormMode::Edit(id),
            form: FilmForm::new(current_year),
            ready: false,
            loading_film: true,
            submitting: false,
            error: None,
            request: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    Title,
    Filter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchFocus {
    Query,
    YearMin,
    YearMax,
    RatingMin,
    RatingMax,
    Genre,
    Results,
}

impl SearchFocus {
    const ORDER: [SearchFocus; 7] = [
        SearchFocus::Query,
        SearchFocus::YearMin,
        SearchFocus::YearMax,
        SearchFocus::RatingMin,
        SearchFocus::RatingMax,
        SearchFocus::Genre,
        SearchFocus::Results,
    ];

    fn index(self) -> usize {
        Self::ORDER.iter().position(|f| *f == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ORDER[(self.index() + 1) % Self::ORDER.len()]
    }

    pub fn prev(self) -> Self {
        Self::ORDER[(self.index() + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }

    pub fn label(self) -> &'static str {
        match self {
            SearchFocus::Query => "Title",
            SearchFocus::YearMin => "Year from",
            SearchFocus::YearMax => "Year to",
            SearchFocus::RatingMin => "Rating from",
            SearchFocus::RatingMax => "Rating to",
            SearchFocus::Genre => "Genre",
            SearchFocus::Results => "Results",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SearchPhase {
    Idle,
    Loading,
    Results,
    Failed(String),
}

/// Raw filter inputs. Bounds stay as typed text until a query is built.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterFields {
    pub year_min: String,
    pub year_max: String,
    pub rating_min: String,
    pub rating_max: String,
    pub genre: String,
    pub sort_field: SortField,
    pub sort_order: SortOrder,
}

impl Default for FilterFields {
    fn default() -> Self {
        Self {
            year_min: String::new(),
            year_max: String::new(),
            rating_min: String::new(),
            rating_max: String::new(),
            genre: String::new(),
            sort_field: SortField::Rating,
            sort_order: SortOrder::Desc,
        }
    }
}

impl FilterFields {
    /// Build the list query; blank or unparseable bounds are left out.
    pub fn to_query(&self, page: u32, size: u32) -> ListQuery {
        let mut query = ListQuery::page(page, size, self.sort_field, self.sort_order);
        query.year_min = self.year_min.trim().parse().ok();
        query.year_max = self.year_max.trim().parse().ok();
        query.rating_min = self.rating_min.trim().parse().ok();
        query.rating_max = self.rating_max.trim().parse().ok();
        let genre = self.genre.trim();
        if !genre.is_empty() {
            query.genre = Some(genre.to_string());
        }
        query
    }

    pub fn has_bounds(&self) -> bool {
        [
            &self.year_min,
            &self.year_max,
            &self.rating_min,
            &self.rating_max,
            &self.genre,
        ]
        .iter()
        .any(|value| !value.trim().is_empty())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchView {
    pub query: String,
    pub filters: FilterFields,
    pub mode: SearchMode,
    pub focus: SearchFocus,
    pub phase: SearchPhase,
    pub films: Vec<Film>,
    pub total: u64,
    pub pages: u32,
    pub page: u32,
    pub cursor: usize,
    pub stats: Option<FilmStats>,
    pub request: Option<RequestId>,
    pub stats_request: Option<RequestId>,
}

impl Default for SearchView {
    fn default() -> Self {
        Self {
            query: String::new(),
            filters: FilterFields::default(),
            mode: SearchMode::Title,
            focus: SearchFocus::Query,
            phase: SearchPhase::Idle,
            films: Vec::new(),
            total: 0,
            pages: 1,
            page: 1,
            cursor: 0,
            stats: None,
            request: None,
            stats_request: None,
        }
    }
}

impl SearchView {
    pub fn selected(&self) -> Option<&Film> {
        self.films.get(self.cursor)
    }

    pub fn focused_input(&mut self) -> Option<&mut String> {
        match self.focus {
            SearchFocus::Query => Some(&mut self.query),
            SearchFocus::YearMin => Some(&mut self.filters.year_min),
            SearchFocus::YearMax => Some(&mut self.filters.year_max),
            SearchFocus::RatingMin => Some(&mut self.filters.rating_min),
            SearchFocus::RatingMax => Some(&mut self.filters.rating_max),
            SearchFocus::Genre => Some(&mut self.filters.genre),
            SearchFocus::Results => None,
        }
    }
}

/// The active screen. Each navigation builds a fresh one.
#[derive(Debug, Clone, PartialEq)]
pub enum Screen {
    List(ListView),
    Detail(DetailView),
    Form(FormView),
    Search(SearchView),
}

/// A delete awaiting the user's answer.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfirmDelete {
    pub id: i64,
    pub title: String,
    pub origin: DeleteOrigin,
}

#[derive(Debug)]
pub struct AppState {
    pub screen: Screen,
    pub confirm: Option<ConfirmDelete>,
    pub alert: Option<String>,
    pub api_url: String,
    pub current_year: i32,
    pub should_quit: bool,
    next_request: RequestId,
}

impl AppState {
    pub fn new(api_url: String, current_year: i32) -> Self {
        Self {
            screen: Screen::List(ListView::default()),
            confirm: None,
            alert: None,
            api_url,
            current_year,
            should_quit: false,
            next_request: 0,
        }
    }

    /// Hand out the next request id.
    pub fn issue_request(&mut self) -> RequestId {
        self.next_request += 1;
        self.next_request
    }

    pub fn route(&self) -> Route {
        match &self.screen {
            Screen::List(_) => Route::FilmList,
            Screen::Detail(detail) => Route::FilmDetail(detail.id),
            Screen::Form(form) => match form.mode {
                FormMode::Create => Route::NewFilm,
                FormMode::Edit(id) => Route::EditFilm(id),
            },
            Screen::Search(_) => Route::Search,
        }
    }

    pub fn list(&self) -> Option<&ListView> {
        match &self.screen {
            Screen::List(list) => Some(list),
            _ => None,
        }
    }

    pub fn detail(&self) -> Option<&DetailView> {
        match &self.screen {
            Screen::Detail(detail) => Some(detail),
            _ => None,
        }
    }

    pub fn form(&self) -> Option<&FormView> {
        match &self.screen {
            Screen::Form(form) => Some(form),
            _ => None,
        }
    }

    pub fn search(&self) -> Option<&SearchView> {
        match &self.screen {
            Screen::Search(search) => Some(search),
            _ => None,
        }
    }

    /// True while the active view waits on the network.
    pub fn is_loading(&self) -> bool {
        match &self.screen {
            Screen::List(list) => list.loading,
            Screen::Detail(detail) => detail.status == DetailStatus::Loading,
            Screen::Form(form) => form.loading_film || form.submitting,
            Screen::Search(search) => search.phase == SearchPhase::Loading,
        }
    }

    /// Whether typed characters go into a text field on this screen.
    pub fn captures_text(&self) -> bool {
        match &self.screen {
            Screen::Form(form) => form.ready,
            Screen::Search(search) => search.focus != SearchFocus::Results,
            _ => false,
        }
    }
}
