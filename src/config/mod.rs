pub mod cli;
pub mod toml_config;

use crate::core::boundary_store::{DEFAULT_BOUNDARY_URL, DEFAULT_NAME_PROPERTY};
use crate::core::ConfigProvider;
use crate::domain::model::RenderOptions;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use clap::Parser;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "district-map")]
#[command(about = "Render Rajasthan district boundaries with branch markers as a Leaflet page")]
pub struct CliConfig {
    #[arg(long, default_value = DEFAULT_BOUNDARY_URL)]
    pub boundary_url: String,

    #[arg(long, default_value = DEFAULT_NAME_PROPERTY, help = "GeoJSON property holding the district name")]
    pub name_property: String,

    #[arg(long, help = "CSV table of branch locations")]
    pub upload: Option<String>,

    #[arg(long = "district", value_delimiter = ',', help = "District to show (repeatable)")]
    pub districts: Vec<String>,

    #[arg(long, default_value = "./output")]
    pub output_path: String,

    #[arg(long, default_value = "district_map.html")]
    pub output_file: String,

    #[arg(long, help = "Print the districts found in the uploaded table and exit")]
    pub list_districts: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl ConfigProvider for CliConfig {
    fn boundary_url(&self) -> &str {
        &self.boundary_url
    }

    fn name_property(&self) -> &str {
        &self.name_property
    }

    fn upload_file(&self) -> Option<&str> {
        self.upload.as_deref()
    }

    fn selected_districts(&self) -> &[String] {
        &self.districts
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn output_file(&self) -> &str {
        &self.output_file
    }

    fn render_options(&self) -> RenderOptions {
        RenderOptions::default()
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_url("boundary_url", &self.boundary_url)?;
        validation::validate_non_empty_string("name_property", &self.name_property)?;
        validation::validate_path("output_path", &self.output_path)?;
        validation::validate_path("output_file", &self.output_file)?;
        if let Some(upload) = &self.upload {
            validation::validate_path("upload", upload)?;
            validation::validate_file_extensions("upload", std::slice::from_ref(upload), &["csv"])?;
        }
        Ok(())
    }
}
