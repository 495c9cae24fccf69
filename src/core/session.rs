//! Session state for one viewer, driven by user events.
//!
//! [`SessionState::apply`] is a pure transition; [`SessionState::plan`]
//! derives what the next render should show. Neither touches I/O, so the
//! whole interaction flow can be exercised without a UI.

use crate::core::bounds::compute_bounds;
use crate::core::district_filter::filter;
use crate::core::marker_table::distinct_districts;
use crate::core::{BoundaryCollection, MarkerRow, Selection};
use crate::domain::model::BoundingBox;

#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// A new table replaced the previous upload.
    TableUploaded(Vec<MarkerRow>),
    /// The upload could not be read; the message is shown to the user.
    UploadFailed(String),
    TableCleared,
    SelectionChanged(Selection),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    pub markers: Vec<MarkerRow>,
    /// Multi-select options: distinct districts of the current table.
    pub districts: Vec<String>,
    pub selection: Selection,
    pub upload_warning: Option<String>,
    pub ignored_districts: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderPlan {
    pub markers: Vec<MarkerRow>,
    pub bounds: Option<BoundingBox>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(self, event: SessionEvent) -> SessionState {
        match event {
            SessionEvent::TableUploaded(rows) => {
                let districts = distinct_districts(&rows);
                let selection = self
                    .selection
                    .iter()
                    .filter(|name| districts.iter().any(|d| d.as_str() == *name))
                    .collect();
                tracing::debug!(
                    "Table uploaded: {} rows across {} districts",
                    rows.len(),
                    districts.len()
                );
                SessionState {
                    markers: rows,
                    districts,
                    selection,
                    upload_warning: None,
                    ignored_districts: Vec::new(),
                }
            }
            SessionEvent::UploadFailed(message) => SessionState {
                upload_warning: Some(message),
                ..SessionState::default()
            },
            SessionEvent::TableCleared => SessionState::default(),
            SessionEvent::SelectionChanged(requested) => {
                let (kept, ignored): (Vec<&str>, Vec<&str>) = requested
                    .iter()
                    .partition(|name| self.districts.iter().any(|d| d.as_str() == *name));

                let selection: Selection = kept.into_iter().collect();

                // 上傳失敗時已有警告，不再逐一回報
                let ignored_districts = if self.upload_warning.is_some() {
                    Vec::new()
                } else {
                    for name in &ignored {
                        tracing::warn!("District '{}' is not in the uploaded table; ignoring", name);
                    }
                    ignored.into_iter().map(str::to_string).collect()
                };
                SessionState {
                    selection,
                    ignored_districts,
                    ..self
                }
            }
        }
    }

    pub fn plan(&self, boundaries: &BoundaryCollection) -> RenderPlan {
        RenderPlan {
            markers: filter(&self.markers, &self.selection),
            bounds: compute_bounds(boundaries, &self.selection),
        }
    }

    pub fn warnings(&self) -> Vec<String> {
        self.upload_warning
            .iter()
            .cloned()
            .chain(
                self.ignored_districts
                    .iter()
                    .map(|name| format!("District '{}' is not in the uploaded table", name)),
            )
            .collect()
    }
}
