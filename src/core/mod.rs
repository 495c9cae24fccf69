pub mod boundary_store;
pub mod bounds;
pub mod district_filter;
pub mod marker_table;
pub mod render;
pub mod session;
pub mod viewer;

pub use crate::domain::model::{BoundaryCollection, MarkerRow, Selection};
pub use crate::domain::ports::{BoundarySource, ConfigProvider, Storage};
pub use crate::utils::error::Result;
