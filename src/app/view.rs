use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
};

use crate::app::state::{AppState, Screen};
use crate::ui::widgets;

pub fn render(f: &mut Frame, state: &AppState) {
    // Tab bar + body + status bar
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(f.area());

    let tabs_area = vertical[0];
    let body_area = vertical[1];
    let status_area = vertical[2];

    widgets::render_tab_bar(f, tabs_area, state);
    match &state.screen {
        Screen::List(list) => widgets::render_film_list(f, body_area, list),
        Screen::Detail(detail) => widgets::render_film_detail(f, body_area, detail),
        Screen::Form(form) => widgets::render_film_form(f, body_area, form),
        Screen::Search(search) => widgets::render_search(f, body_area, search),
    }
    widgets::render_status_bar(f, status_area, state);

    // Overlays
    if state.confirm.is_some() {
        widgets::render_confirm_modal(f, f.area(), state);
    }
    if state.alert.is_some() {
        widgets::render_alert_modal(f, f.area(), state);
    }
}
