use ratatui::style::{Color, Modifier, Style};

pub const HIGHLIGHT: Style = Style::new()
    .fg(Color::Black)
    .bg(Color::Cyan)
    .add_modifier(Modifier::BOLD);

pub const HEADER: Style = Style::new().fg(Color::White).add_modifier(Modifier::BOLD);

pub const DIM: Style = Style::new().fg(Color::DarkGray);

pub const ERROR: Style = Style::new().fg(Color::Red).add_modifier(Modifier::BOLD);

pub const WARNING: Style = Style::new().fg(Color::Yellow);

pub const BORDER_FOCUSED: Style = Style::new().fg(Color::Cyan);

pub const BORDER_UNFOCUSED: Style = Style::new().fg(Color::DarkGray);

pub const STATUS_BAR: Style = Style::new().fg(Color::White).bg(Color::DarkGray);

pub const TAB_ACTIVE: Style = Style::new()
    .fg(Color::Magenta)
    .add_modifier(Modifier::BOLD)
    .add_modifier(Modifier::UNDERLINED);

pub const TAB_INACTIVE: Style = Style::new().fg(Color::Gray);

pub const FILM_TITLE: Style = Style::new().fg(Color::White).add_modifier(Modifier::BOLD);

pub const RATING: Style = Style::new().fg(Color::Yellow);

pub const DIRECTOR: Style = Style::new().fg(Color::Cyan);

pub const INPUT_ACTIVE: Style = Style::new().fg(Color::Yellow);

pub const LABEL: Style = Style::new().fg(Color::Gray);
