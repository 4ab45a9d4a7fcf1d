//! Staff-side appointment panel for the turnos scheduling server.

pub mod agenda;
pub mod availability;
pub mod book;
pub mod config;
pub mod error;
pub mod form;
pub mod http;
pub mod models;
pub mod picker;
pub mod reference;
pub mod render;
pub mod selector;

#[cfg(test)]
mod testing;
