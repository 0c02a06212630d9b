//! Month calendar for tracking skincare routines and products.
//!
//! [`calendar`] holds the pure month-grid layout and cursor navigation,
//! [`store`] the document persistence for profiles, products, routines and
//! completions. The remaining modules make up the terminal front end.

pub mod app;
pub mod calendar;
pub mod components;
pub mod config;
pub mod event;
pub mod logging;
pub mod store;
pub mod theme;
pub mod tui;
