use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Wrap},
};

use crate::api::models::{Film, FilmStats, SortField};
use crate::app::actions::DeleteOrigin;
use crate::app::form::FormField;
use crate::app::route::Tab;
use crate::app::state::{
    AppState, DetailStatus, DetailView, FormMode, FormView, ListView, Screen, SearchFocus,
    SearchMode, SearchPhase, SearchView,
};
use crate::ui::theme;
use crate::util::time::{format_timestamp, relative_time};

pub fn render_tab_bar(f: &mut Frame, area: Rect, state: &AppState) {
    let active = state.route().tab();

    let mut spans = vec![Span::styled(" filmdeck ", theme::HEADER)];
    for (i, tab) in Tab::ALL.iter().enumerate() {
        let style = if active == Some(*tab) {
            theme::TAB_ACTIVE
        } else {
            theme::TAB_INACTIVE
        };
        spans.push(Span::raw("  "));
        spans.push(Span::styled(format!("F{} {}", i + 1, tab.label()), style));
    }
    spans.push(Span::styled(format!("   {}", state.route()), theme::DIM));

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn rating_label(rating: f64) -> String {
    format!("★ {rating:.1}")
}

fn film_table<'a>(films: &'a [Film], cursor: Option<usize>, block: Block<'a>) -> Table<'a> {
    let header = Row::new(vec![
        Cell::from("Title").style(theme::HEADER),
        Cell::from("Director").style(theme::HEADER),
        Cell::from("Year").style(theme::HEADER),
        Cell::from("Genre").style(theme::HEADER),
        Cell::from("Rating").style(theme::HEADER),
    ])
    .height(1);

    let rows: Vec<Row> = films
        .iter()
        .enumerate()
        .map(|(i, film)| {
            let selected = cursor == Some(i);
            let pick = |style: Style| if selected { theme::HIGHLIGHT } else { style };

            Row::new(vec![
                Cell::from(film.title.as_str()).style(pick(theme::FILM_TITLE)),
                Cell::from(film.director.as_str()).style(pick(theme::DIRECTOR)),
                Cell::from(film.year.to_string()).style(pick(Style::default())),
                Cell::from(film.genre.as_str()).style(pick(Style::default())),
                Cell::from(rating_label(film.rating)).style(pick(theme::RATING)),
            ])
            .height(1)
        })
        .collect();

    let widths = [
        Constraint::Min(24),
        Constraint::Length(22),
        Constraint::Length(6),
        Constraint::Length(14),
        Constraint::Length(7),
    ];

    Table::new(rows, widths)
        .header(header)
        .block(block)
        .row_highlight_style(theme::HIGHLIGHT)
}

fn sort_marker(list: &ListView, field: SortField) -> String {
    if list.sort_field == field {
        format!("{} {}", field.label(), list.sort_order.arrow())
    } else {
        field.label().to_string()
    }
}

pub fn render_film_list(f: &mut Frame, area: Rect, list: &ListView) {
    let sorting = [SortField::Title, SortField::Year, SortField::Rating]
        .iter()
        .map(|field| sort_marker(list, *field))
        .collect::<Vec<_>>()
        .join(" | ");

    let title = format!(
        " Film catalog  [sort: {}]{} ",
        sorting,
        if list.loading { "  loading..." } else { "" }
    );

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(theme::BORDER_FOCUSED);

    if let Some(ref err) = list.error {
        let para = Paragraph::new(vec![
            Line::from(Span::styled(format!("Error: {}", err), theme::ERROR)),
            Line::from(""),
            Line::from(Span::styled("Press r to retry", theme::DIM)),
        ])
        .wrap(Wrap { trim: true })
        .block(block);
        f.render_widget(para, area);
        return;
    }

    if list.films.is_empty() {
        let msg = if list.loading {
            "Loading films..."
        } else {
            "No films found. Press n to add the first one."
        };
        f.render_widget(Paragraph::new(msg).style(theme::DIM).block(block), area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(area);

    f.render_widget(film_table(&list.films, Some(list.cursor), block), chunks[0]);

    if list.pages > 1 {
        let footer = format!(
            " Page {} of {} ({} films)  [ prev | next ]",
            list.page, list.pages, list.total
        );
        f.render_widget(Paragraph::new(footer).style(theme::DIM), chunks[1]);
    } else {
        let footer = format!(" {} films", list.total);
        f.render_widget(Paragraph::new(footer).style(theme::DIM), chunks[1]);
    }
}

pub fn render_film_detail(f: &mut Frame, area: Rect, detail: &DetailView) {
    let block = Block::default()
        .title(format!(" Film #{} ", detail.id))
        .borders(Borders::ALL)
        .border_style(theme::BORDER_FOCUSED);

    let film = match &detail.status {
        DetailStatus::Loading => {
            let para = Paragraph::new("Loading film...").style(theme::DIM).block(block);
            f.render_widget(para, area);
            return;
        }
        DetailStatus::NotFound => {
            let para = Paragraph::new("Film not found").style(theme::ERROR).block(block);
            f.render_widget(para, area);
            return;
        }
        DetailStatus::Failed(msg) => {
            let para = Paragraph::new(vec![
                Line::from(Span::styled(msg.as_str(), theme::ERROR)),
                Line::from(""),
                Line::from(Span::styled("Esc: back to list | r: retry", theme::DIM)),
            ])
            .wrap(Wrap { trim: true })
            .block(block);
            f.render_widget(para, area);
            return;
        }
        DetailStatus::Loaded(film) => film,
    };

    let field = |label: &str, value: String| {
        Line::from(vec![
            Span::styled(format!("{:<10}", label), theme::LABEL),
            Span::raw(value),
        ])
    };

    let mut lines = vec![
        Line::from(vec![
            Span::styled(film.title.as_str(), theme::FILM_TITLE),
            Span::raw("  "),
            Span::styled(rating_label(film.rating), theme::RATING),
        ]),
        Line::from(""),
        field("Director", film.director.clone()),
        field("Year", film.year.to_string()),
        field("Genre", film.genre.clone()),
    ];

    if let Some(created) = &film.created_at {
        lines.push(field(
            "Added",
            format!("{} ({})", format_timestamp(created), relative_time(created)),
        ));
    }
    if let Some(updated) = &film.updated_at {
        lines.push(field(
            "Updated",
            format!("{} ({})", format_timestamp(updated), relative_time(updated)),
        ));
    }

    lines.push(Line::from(""));
    match film.description.as_deref() {
        Some(description) if !description.is_empty() => {
            lines.push(Line::from(Span::styled("Description", theme::HEADER)));
            lines.push(Line::from(description.to_string()));
        }
        _ => lines.push(Line::from(Span::styled("No description", theme::DIM))),
    }

    let para = Paragraph::new(lines).wrap(Wrap { trim: false }).block(block);
    f.render_widget(para, area);
}

pub fn render_film_form(f: &mut Frame, area: Rect, view: &FormView) {
    let title = match view.mode {
        FormMode::Create => " Add a new film ".to_string(),
        FormMode::Edit(id) => format!(" Edit film #{} ", id),
    };

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(theme::BORDER_FOCUSED);

    if view.loading_film {
        let para = Paragraph::new("Loading film...").style(theme::DIM).block(block);
        f.render_widget(para, area);
        return;
    }

    let mut lines = Vec::new();
    if let Some(ref err) = view.error {
        lines.push(Line::from(Span::styled(err.as_str(), theme::ERROR)));
        lines.push(Line::from(""));
    }

    if view.ready {
        for field in FormField::ALL {
            let value = view.form.value(field);
            let is_active = view.form.active == field;
            let marker = if field.required() { " *" } else { "" };

            let display = if value.is_empty() && field.required() {
                "<required>".to_string()
            } else {
                value.to_string()
            };
            let style = if is_active {
                theme::INPUT_ACTIVE
            } else if value.is_empty() {
                theme::DIM
            } else {
                Style::default()
            };

            let cursor = if is_active { "▏" } else { "" };
            lines.push(Line::from(vec![
                Span::styled(
                    format!("{:>13}: ", format!("{}{}", field.label(), marker)),
                    theme::LABEL,
                ),
                Span::styled(display, style),
                Span::styled(cursor, theme::INPUT_ACTIVE),
            ]));

            if let Some(msg) = view.form.errors.get(&field) {
                lines.push(Line::from(Span::styled(
                    format!("{:>15}{}", "", msg),
                    theme::ERROR,
                )));
            }
        }

        lines.push(Line::from(""));
        let hint = if view.submitting {
            "Saving...".to_string()
        } else {
            let count = view.form.description.chars().count();
            format!("Description: {}/1000 characters", count)
        };
        lines.push(Line::from(Span::styled(hint, theme::DIM)));
    }

    let para = Paragraph::new(lines).wrap(Wrap { trim: false }).block(block);
    f.render_widget(para, area);
}

pub fn render_search(f: &mut Frame, area: Rect, search: &SearchView) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(38), Constraint::Min(20)])
        .split(area);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(9), Constraint::Min(6)])
        .split(columns[0]);

    render_stats(f, left[0], search.stats.as_ref());
    render_search_inputs(f, left[1], search);
    render_search_results(f, columns[1], search);
}

fn render_stats(f: &mut Frame, area: Rect, stats: Option<&FilmStats>) {
    let block = Block::default()
        .title(" Stats ")
        .borders(Borders::ALL)
        .border_style(theme::BORDER_UNFOCUSED);

    let Some(stats) = stats else {
        f.render_widget(Paragraph::new("").block(block), area);
        return;
    };

    let mut lines = vec![
        Line::from(format!("Films: {}", stats.total_films)),
        Line::from(vec![
            Span::raw("Average: "),
            Span::styled(rating_label(stats.average_rating), theme::RATING),
        ]),
        Line::from(format!(
            "Range: {:.1} - {:.1}",
            stats.min_rating, stats.max_rating
        )),
    ];

    let genres = stats.top_genres(3);
    if !genres.is_empty() {
        let text = genres
            .iter()
            .map(|(genre, count)| format!("{genre} ({count})"))
            .collect::<Vec<_>>()
            .join(", ");
        lines.push(Line::from(Span::styled(format!("Genres: {}", text), theme::DIM)));
    }

    let years = stats.top_years(3);
    if !years.is_empty() {
        let text = years
            .iter()
            .map(|(year, count)| format!("{year} ({count})"))
            .collect::<Vec<_>>()
            .join(", ");
        lines.push(Line::from(Span::styled(format!("Years: {}", text), theme::DIM)));
    }

    let para = Paragraph::new(lines).wrap(Wrap { trim: true }).block(block);
    f.render_widget(para, area);
}

fn render_search_inputs(f: &mut Frame, area: Rect, search: &SearchView) {
    let focused = search.focus != SearchFocus::Results;
    let block = Block::default()
        .title(" Search & filter ")
        .borders(Borders::ALL)
        .border_style(if focused {
            theme::BORDER_FOCUSED
        } else {
            theme::BORDER_UNFOCUSED
        });

    let input = |focus: SearchFocus, value: &str| {
        let active = search.focus == focus;
        Line::from(vec![
            Span::styled(format!("{:>12}: ", focus.label()), theme::LABEL),
            Span::styled(
                value.to_string(),
                if active {
                    theme::INPUT_ACTIVE
                } else {
                    Style::default()
                },
            ),
            Span::styled(if active { "▏" } else { "" }, theme::INPUT_ACTIVE),
        ])
    };

    let filters = &search.filters;
    let lines = vec![
        input(SearchFocus::Query, &search.query),
        Line::from(""),
        input(SearchFocus::YearMin, &filters.year_min),
        input(SearchFocus::YearMax, &filters.year_max),
        input(SearchFocus::RatingMin, &filters.rating_min),
        input(SearchFocus::RatingMax, &filters.rating_max),
        input(SearchFocus::Genre, &filters.genre),
        Line::from(vec![
            Span::styled(format!("{:>12}: ", "Sort"), theme::LABEL),
            Span::raw(format!(
                "{} {}",
                filters.sort_field.label(),
                filters.sort_order.arrow()
            )),
        ]),
    ];

    let para = Paragraph::new(lines).block(block);
    f.render_widget(para, area);
}

fn render_search_results(f: &mut Frame, area: Rect, search: &SearchView) {
    let mode = match search.mode {
        SearchMode::Title => "title",
        SearchMode::Filter => "filter",
    };
    let focused = search.focus == SearchFocus::Results;
    let block = Block::default()
        .title(format!(" Results ({}) [{}] ", search.total, mode))
        .borders(Borders::ALL)
        .border_style(if focused {
            theme::BORDER_FOCUSED
        } else {
            theme::BORDER_UNFOCUSED
        });

    let message = match &search.phase {
        SearchPhase::Idle => Some(Span::styled(
            "Type a title and press Enter, or fill in filters and press Enter on any filter field",
            theme::DIM,
        )),
        SearchPhase::Loading => Some(Span::styled("Searching...", theme::DIM)),
        SearchPhase::Failed(msg) => Some(Span::styled(msg.as_str(), theme::ERROR)),
        SearchPhase::Results if search.films.is_empty() => Some(Span::styled(
            "No films found. Ctrl+X clears the filters.",
            theme::WARNING,
        )),
        SearchPhase::Results => None,
    };

    if let Some(message) = message {
        let para = Paragraph::new(Line::from(message))
            .wrap(Wrap { trim: true })
            .block(block);
        f.render_widget(para, area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(area);

    let cursor = focused.then_some(search.cursor);
    f.render_widget(film_table(&search.films, cursor, block), chunks[0]);

    if search.pages > 1 {
        let footer = format!(" Page {} of {}  PgUp | PgDn", search.page, search.pages);
        f.render_widget(Paragraph::new(footer).style(theme::DIM), chunks[1]);
    }
}

pub fn render_status_bar(f: &mut Frame, area: Rect, state: &AppState) {
    let key_hints = match &state.screen {
        Screen::List(_) => {
            "j/k: move | Enter: open | n: new | e: edit | d: delete | t/y/R: sort | [/]: page | /: search | q: quit"
        }
        Screen::Detail(_) => "e: edit | d: delete | Esc: back | r: reload | q: quit",
        Screen::Form(_) => "Tab: next field | Enter: save | Esc: cancel",
        Screen::Search(_) if state.captures_text() => {
            "Tab: next field | Enter: search/filter | ^S: sort | ^O: order | ^X: clear | Esc: back"
        }
        Screen::Search(_) => "j/k: move | Enter: open | PgUp/PgDn: page | Tab: inputs | Esc: back",
    };

    let right_text = format!("API: {}", state.api_url);
    let status = if state.is_loading() { "Loading..." } else { "" };

    let total_width = area.width as usize;
    let used = key_hints.chars().count() + status.len() + right_text.len() + 2;
    let padding = total_width.saturating_sub(used);

    let line = Line::from(vec![
        Span::styled(key_hints, theme::STATUS_BAR),
        Span::styled(" ", theme::STATUS_BAR),
        Span::styled(status, theme::STATUS_BAR),
        Span::styled(" ".repeat(padding), theme::STATUS_BAR),
        Span::styled(right_text, theme::STATUS_BAR),
    ]);

    let bar = Paragraph::new(line).style(theme::STATUS_BAR);
    f.render_widget(bar, area);
}

fn modal_area(area: Rect, height: u16) -> Rect {
    let modal_width = (area.width / 2).max(40).min(area.width.saturating_sub(4));
    let x = area.x + (area.width.saturating_sub(modal_width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect {
        x,
        y,
        width: modal_width,
        height: height.min(area.height),
    }
}

pub fn render_confirm_modal(f: &mut Frame, area: Rect, state: &AppState) {
    let Some(ref confirm) = state.confirm else {
        return;
    };

    let modal = modal_area(area, 6);
    f.render_widget(Clear, modal);

    let block = Block::default()
        .title(" Confirm ")
        .borders(Borders::ALL)
        .border_style(theme::WARNING);

    let after = match confirm.origin {
        DeleteOrigin::List => "The list will refresh afterwards.",
        DeleteOrigin::Detail => "You will return to the list afterwards.",
    };

    let text = vec![
        Line::from(Span::styled(
            format!("Delete film \"{}\"?", confirm.title),
            theme::HEADER,
        )),
        Line::from(Span::styled(after, theme::DIM)),
        Line::from(""),
        Line::from(Span::styled("y: delete | n: cancel", theme::DIM)),
    ];

    let para = Paragraph::new(text).wrap(Wrap { trim: true }).block(block);
    f.render_widget(para, modal);
}

pub fn render_alert_modal(f: &mut Frame, area: Rect, state: &AppState) {
    let Some(ref msg) = state.alert else {
        return;
    };

    let modal = modal_area(area, 6);
    f.render_widget(Clear, modal);

    let block = Block::default()
        .title(" Error ")
        .borders(Borders::ALL)
        .border_style(theme::ERROR);

    let text = vec![
        Line::from(Span::styled(msg.as_str(), theme::ERROR)),
        Line::from(""),
        Line::from(Span::styled("Press Esc to dismiss", theme::DIM)),
    ];

    let para = Paragraph::new(text).wrap(Wrap { trim: true }).block(block);
    f.render_widget(para, modal);
}
