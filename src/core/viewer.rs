use crate::core::boundary_store::BoundaryStore;
use crate::core::marker_table;
use crate::core::render::MapRenderer;
use crate::core::session::{SessionEvent, SessionState};
use crate::core::{BoundarySource, ConfigProvider, MarkerRow, Result, Selection, Storage};
use crate::domain::model::BoundingBox;
use std::path::Path;
use std::sync::Arc;

/// Outcome of one render cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderReport {
    pub output_path: String,
    pub boundaries_loaded: bool,
    pub boundary_count: usize,
    pub marker_count: usize,
    pub bounds: Option<BoundingBox>,
    pub warnings: Vec<String>,
}

pub struct MapViewer<B: BoundarySource, S: Storage, C: ConfigProvider> {
    store: Arc<BoundaryStore<B>>,
    storage: S,
    config: C,
    renderer: MapRenderer,
}

impl<B: BoundarySource, S: Storage, C: ConfigProvider> MapViewer<B, S, C> {
    pub fn new(store: Arc<BoundaryStore<B>>, storage: S, config: C) -> Self {
        let renderer = MapRenderer::new(config.render_options());
        Self {
            store,
            storage,
            config,
            renderer,
        }
    }

    /// Read and parse the configured upload, if any.
    async fn read_upload(&self) -> Option<Result<Vec<MarkerRow>>> {
        let path = self.config.upload_file()?;
        tracing::info!("📄 Reading uploaded table: {}", path);
        let result = match self.storage.read_file(path).await {
            Ok(bytes) => marker_table::parse(bytes.as_slice()),
            Err(e) => Err(e),
        };
        Some(result)
    }

    /// Multi-select options offered by the uploaded table.
    pub async fn districts(&self) -> Result<Vec<String>> {
        match self.read_upload().await {
            Some(rows) => Ok(marker_table::distinct_districts(&rows?)),
            None => Ok(Vec::new()),
        }
    }

    pub async fn run(&self) -> Result<RenderReport> {
        tracing::info!("Starting render cycle...");

        let mut state = SessionState::new();

        // 上傳事件
        let event = match self.read_upload().await {
            Some(Ok(rows)) => {
                tracing::info!("Parsed {} marker rows", rows.len());
                SessionEvent::TableUploaded(rows)
            }
            Some(Err(e)) => {
                tracing::warn!("⚠️ Upload rejected: {}", e);
                SessionEvent::UploadFailed(e.user_friendly_message())
            }
            None => {
                tracing::debug!("No table uploaded; rendering boundaries only");
                SessionEvent::TableCleared
            }
        };
        state = state.apply(event);

        // 選取事件
        let requested: Selection = self
            .config
            .selected_districts()
            .iter()
            .map(String::as_str)
            .collect();
        state = state.apply(SessionEvent::SelectionChanged(requested));

        let warnings = state.warnings();
        let url = self.config.boundary_url();

        let (map, report) = match self.store.load(url).await {
            Ok(boundaries) => {
                let plan = state.plan(&boundaries);
                match &plan.bounds {
                    Some(bounds) => tracing::info!(
                        "Fitting view to ({}, {}) - ({}, {})",
                        bounds.southwest.lat,
                        bounds.southwest.lon,
                        bounds.northeast.lat,
                        bounds.northeast.lon
                    ),
                    None => tracing::debug!("No bounds for selection, using default view"),
                }
                let map = self
                    .renderer
                    .render(&boundaries, &plan.markers, plan.bounds, &warnings)?;
                let report = RenderReport {
                    output_path: String::new(),
                    boundaries_loaded: true,
                    boundary_count: boundaries.len(),
                    marker_count: plan.markers.len(),
                    bounds: plan.bounds,
                    warnings,
                };
                (map, report)
            }
            Err(e) => {
                tracing::warn!("⚠️ Boundary data unavailable: {}", e);
                tracing::warn!("💡 {}", e.recovery_suggestion());
                let message = e.user_friendly_message();
                let map = self.renderer.render_unavailable(&message, &warnings)?;
                let report = RenderReport {
                    output_path: String::new(),
                    boundaries_loaded: false,
                    boundary_count: 0,
                    marker_count: 0,
                    bounds: None,
                    warnings: std::iter::once(message).chain(warnings).collect(),
                };
                (map, report)
            }
        };

        let file_name = self.config.output_file();
        tracing::debug!("Writing map ({} bytes) to storage", map.html.len());
        self.storage.write_file(file_name, map.html.as_bytes()).await?;

        let output_path = Path::new(self.config.output_path())
            .join(file_name)
            .to_string_lossy()
            .into_owned();
        tracing::info!("Map saved to: {}", output_path);

        Ok(RenderReport {
            output_path,
            ..report
        })
    }
}
