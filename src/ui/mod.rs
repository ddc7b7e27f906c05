pub mod components;
pub mod tui;
pub mod view;
