use crate::core::boundary_store::{DEFAULT_BOUNDARY_URL, DEFAULT_NAME_PROPERTY};
use crate::core::ConfigProvider;
use crate::domain::model::{BoundaryStyle, LatLng, RenderOptions};
use crate::utils::error::{MapError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

const DEFAULT_OUTPUT_FILE: &str = "district_map.html";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub boundary: BoundaryConfig,
    pub markers: Option<MarkersConfig>,
    pub map: Option<MapConfig>,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoundaryConfig {
    #[serde(default = "default_boundary_url")]
    pub url: String,
    pub name_property: Option<String>,
}

impl Default for BoundaryConfig {
    fn default() -> Self {
        Self {
            url: default_boundary_url(),
            name_property: None,
        }
    }
}

fn default_boundary_url() -> String {
    DEFAULT_BOUNDARY_URL.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkersConfig {
    pub upload: Option<String>,
    #[serde(default)]
    pub districts: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapConfig {
    pub title: Option<String>,
    pub center_lat: Option<f64>,
    pub center_lon: Option<f64>,
    pub zoom: Option<u8>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub style: Option<StyleConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StyleConfig {
    pub fill_color: Option<String>,
    pub color: Option<String>,
    pub weight: Option<f64>,
    pub fill_opacity: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub path: String,
    pub file: Option<String>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(MapError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| MapError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validation::validate_url("boundary.url", &self.boundary.url)?;
        if let Some(name_property) = &self.boundary.name_property {
            validation::validate_non_empty_string("boundary.name_property", name_property)?;
        }

        validation::validate_path("output.path", &self.output.path)?;
        validation::validate_path("output.file", self.output_file())?;

        if let Some(markers) = &self.markers {
            // 沒有上傳檔就沒有可選的行政區
            if !markers.districts.is_empty() {
                validation::validate_required_field("markers.upload", &markers.upload)?;
            }
            if let Some(upload) = &markers.upload {
                validation::validate_file_extensions(
                    "markers.upload",
                    std::slice::from_ref(upload),
                    &["csv"],
                )?;
            }
        }

        let options = self.render_options();
        validation::validate_non_empty_string("map.title", &options.title)?;
        validation::validate_range("map.center_lat", options.center.lat, -90.0, 90.0)?;
        validation::validate_range("map.center_lon", options.center.lon, -180.0, 180.0)?;
        validation::validate_range("map.zoom", options.zoom, 0, 22)?;
        validation::validate_range("map.width", options.width, 100, 10_000)?;
        validation::validate_range("map.height", options.height, 100, 10_000)?;
        validation::validate_range("map.style.weight", options.style.weight, 0.0, 20.0)?;
        validation::validate_range("map.style.fill_opacity", options.style.fill_opacity, 0.0, 1.0)?;

        Ok(())
    }
}

impl ConfigProvider for TomlConfig {
    fn boundary_url(&self) -> &str {
        &self.boundary.url
    }

    fn name_property(&self) -> &str {
        self.boundary
            .name_property
            .as_deref()
            .unwrap_or(DEFAULT_NAME_PROPERTY)
    }

    fn upload_file(&self) -> Option<&str> {
        self.markers.as_ref().and_then(|m| m.upload.as_deref())
    }

    fn selected_districts(&self) -> &[String] {
        self.markers
            .as_ref()
            .map(|m| m.districts.as_slice())
            .unwrap_or(&[])
    }

    fn output_path(&self) -> &str {
        &self.output.path
    }

    fn output_file(&self) -> &str {
        self.output.file.as_deref().unwrap_or(DEFAULT_OUTPUT_FILE)
    }

    fn render_options(&self) -> RenderOptions {
        let defaults = RenderOptions::default();
        let Some(map) = &self.map else {
            return defaults;
        };

        let style = match &map.style {
            Some(style) => {
                let base = BoundaryStyle::default();
                BoundaryStyle {
                    fill_color: style.fill_color.clone().unwrap_or(base.fill_color),
                    color: style.color.clone().unwrap_or(base.color),
                    weight: style.weight.unwrap_or(base.weight),
                    fill_opacity: style.fill_opacity.unwrap_or(base.fill_opacity),
                }
            }
            None => defaults.style,
        };

        RenderOptions {
            title: map.title.clone().unwrap_or(defaults.title),
            center: LatLng::new(
                map.center_lat.unwrap_or(defaults.center.lat),
                map.center_lon.unwrap_or(defaults.center.lon),
            ),
            zoom: map.zoom.unwrap_or(defaults.zoom),
            width: map.width.unwrap_or(defaults.width),
            height: map.height.unwrap_or(defaults.height),
            style,
        }
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
