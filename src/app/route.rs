use std::fmt;
use std::str::FromStr;

/// The screens of the application, addressed by the same paths the catalog's
/// web client used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    FilmList,
    NewFilm,
    EditFilm(i64),
    FilmDetail(i64),
    Search,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown route: {0}")]
pub struct UnknownRoute(pub String);

impl Route {
    pub fn parse(path: &str) -> Option<Self> {
        let trimmed = path.trim();
        let trimmed = if trimmed.len() > 1 {
            trimmed.trim_end_matches('/')
        } else {
            trimmed
        };

        let segments: Vec<&str> = trimmed.split('/').skip(1).collect();
        if !trimmed.starts_with('/') {
            return None;
        }

        match segments.as_slice() {
            [""] => Some(Route::FilmList),
            ["search"] => Some(Route::Search),
            ["films", "new"] => Some(Route::NewFilm),
            ["films", id] => parse_id(id).map(Route::FilmDetail),
            ["films", id, "edit"] => parse_id(id).map(Route::EditFilm),
            _ => None,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::FilmList => "/".to_string(),
            Route::NewFilm => "/films/new".to_string(),
            Route::EditFilm(id) => format!("/films/{id}/edit"),
            Route::FilmDetail(id) => format!("/films/{id}"),
            Route::Search => "/search".to_string(),
        }
    }

    /// Tab highlighted in the navigation bar, if any.
    pub fn tab(&self) -> Option<Tab> {
        match self {
            Route::FilmList | Route::FilmDetail(_) => Some(Tab::Films),
            Route::NewFilm => Some(Tab::AddFilm),
            Route::Search => Some(Tab::Search),
            Route::EditFilm(_) => None,
        }
    }
}

fn parse_id(raw: &str) -> Option<i64> {
    raw.parse::<i64>().ok().filter(|id| *id > 0)
}

impl FromStr for Route {
    type Err = UnknownRoute;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Route::parse(s).ok_or_else(|| UnknownRoute(s.to_string()))
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Films,
    AddFilm,
    Search,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Films, Tab::AddFilm, Tab::Search];

    pub fn label(self) -> &'static str {
        match self {
            Tab::Films => "Films",
            Tab::AddFilm => "Add film",
            Tab::Search => "Search",
        }
    }

    pub fn route(self) -> Route {
        match self {
            Tab::Films => Route::FilmList,
            Tab::AddFilm => Route::NewFilm,
            Tab::Search => Route::Search,
        }
    }
}
