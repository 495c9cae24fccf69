use crate::core::{BoundaryCollection, MarkerRow, Result};
use crate::domain::model::{BoundingBox, RenderOptions, ViewableMap};
use serde_json::json;
use tera::{escape_html, Context, Tera};

const MAP_PAGE_HTML: &str = include_str!("../../templates/map.html");
const UNAVAILABLE_PAGE_HTML: &str = include_str!("../../templates/unavailable.html");

/// Builds the Leaflet page for a render cycle.
#[derive(Debug, Clone, Default)]
pub struct MapRenderer {
    options: RenderOptions,
}

impl MapRenderer {
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    pub fn render(
        &self,
        boundaries: &BoundaryCollection,
        markers: &[MarkerRow],
        bounds: Option<BoundingBox>,
        warnings: &[String],
    ) -> Result<ViewableMap> {
        let features: Vec<serde_json::Value> = boundaries
            .features()
            .iter()
            .map(|feature| {
                json!({
                    "type": "Feature",
                    "properties": {
                        "district": feature.district_name,
                        "tooltip": format!("District: {}", escape_html(&feature.district_name)),
                    },
                    "geometry": {
                        "type": feature.geometry.type_name(),
                        "coordinates": feature.geometry.coordinates_json(),
                    },
                })
            })
            .collect();
        let boundary_layer = json!({ "type": "FeatureCollection", "features": features });

        let mut skipped = 0usize;
        let marker_layer: Vec<serde_json::Value> = markers
            .iter()
            .filter_map(|row| match row.location() {
                Some(location) => Some(json!({
                    "lat": location.lat,
                    "lon": location.lon,
                    "popup": marker_popup(row),
                    "tooltip": escape_html(&row.branch_name),
                })),
                None => {
                    skipped += 1;
                    None
                }
            })
            .collect();
        if skipped > 0 {
            tracing::debug!("{} markers have no usable coordinates", skipped);
        }

        let style = &self.options.style;
        let view = json!({
            "center": [self.options.center.lat, self.options.center.lon],
            "zoom": self.options.zoom,
            "bounds": bounds.map(|b| b.to_leaflet()),
            "style": {
                "fillColor": style.fill_color,
                "color": style.color,
                "weight": style.weight,
                "fillOpacity": style.fill_opacity,
            },
        });

        let mut context = Context::new();
        context.insert("title", &self.options.title);
        context.insert("width", &self.options.width);
        context.insert("height", &self.options.height);
        context.insert("warnings", warnings);
        context.insert("view", &script_json(&view)?);
        context.insert("boundaries", &script_json(&boundary_layer)?);
        context.insert("markers", &script_json(&marker_layer)?);

        let html = Tera::one_off(MAP_PAGE_HTML, &context, true)?;
        Ok(ViewableMap { html })
    }

    /// Page shown when no boundary data could be loaded: the warning and
    /// nothing else.
    pub fn render_unavailable(&self, message: &str, warnings: &[String]) -> Result<ViewableMap> {
        let all: Vec<&str> = std::iter::once(message)
            .chain(warnings.iter().map(String::as_str))
            .collect();

        let mut context = Context::new();
        context.insert("title", &self.options.title);
        context.insert("warnings", &all);

        let html = Tera::one_off(UNAVAILABLE_PAGE_HTML, &context, true)?;
        Ok(ViewableMap { html })
    }
}

fn marker_popup(row: &MarkerRow) -> String {
    format!(
        "<b>{}</b><br>{} <br>{}",
        escape_html(&row.branch_name),
        escape_html(&row.sol_id),
        escape_html(&row.block_name)
    )
}

/// JSON that is safe inside a `<script>` element.
fn script_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string(value)?.replace("</", "<\\/"))
}
