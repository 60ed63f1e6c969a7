//! Tic-tac-toe game store.
//!
//! # Architecture
//!
//! - **Game**: the [`Game`] aggregate with its ordered [`Round`]s
//! - **Db**: SQLite persistence through diesel; rounds are kept as a JSON
//!   document inside the game row
//! - **Store**: [`GameStore`], the validation and status rules
//! - **Api**: axum routes under `/api`
//! - **Config**: [`ServerConfig`] from TOML, environment and `.env`

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod api;
mod config;
mod db;
mod game;
mod server;
mod store;

pub use config::{ConfigError, ServerConfig, parse_origins};
pub use db::{DbError, DbErrorKind, GameRecord, GameRepository};
pub use game::{Game, Round, Tally};
pub use server::{open_store, serve};
pub use store::{GameStore, StoreError};
