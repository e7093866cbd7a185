pub mod actions;
pub mod event_loop;
pub mod form;
pub mod route;
pub mod state;
pub mod update;
pub mod view;
