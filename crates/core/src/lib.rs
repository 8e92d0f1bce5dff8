#![warn(clippy::all, missing_docs)]

//! Core logic for the gamedex catalog browser.
//!
//! This crate hosts the view models, configuration handling, the gateway
//! to the upstream game catalog, and the filter/pagination state machines
//! used by the terminal UI and any future frontends.

pub mod browse;
pub mod catalog;
pub mod config;
pub mod models;
pub mod route;

pub use browse::{BrowseState, DetailState, FetchRequest, ResultSet};
pub use catalog::{CatalogError, CatalogGateway};
pub use config::AppConfig;
pub use models::{FilterKey, FilterSet, Game, GamePage, NamedRef, Taxonomy};
pub use route::Route;
