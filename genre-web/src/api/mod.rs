//! HTTP API handlers for genre-web

pub mod buildinfo;
pub mod health;
pub mod predict;
pub mod ui;

pub use buildinfo::get_build_info;
pub use health::health_routes;
pub use predict::{list_genres, predict};
pub use ui::{serve_index, submit_form};
