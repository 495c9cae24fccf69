pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use crate::config::{cli::LocalStorage, toml_config::TomlConfig, CliConfig};
pub use crate::core::{
    boundary_store::{BoundaryStore, HttpBoundarySource},
    render::MapRenderer,
    viewer::{MapViewer, RenderReport},
};
pub use crate::utils::error::{MapError, Result};
