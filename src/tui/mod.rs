//! Full-screen terminal interface for managing students

pub mod action;
pub mod app;
pub mod components;
pub mod event;
pub mod terminal;
pub mod widgets;

#[cfg(test)]
pub mod test_helpers;
