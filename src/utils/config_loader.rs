use crate::core::inputs::StaticInputs;
use crate::utils::{ConfigurationError, Logger, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "packcfg.config.json";

/// Project layout file format (packcfg.config.json)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LayoutFile {
    /// Source directory used as the build context (default: "src")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_dir: Option<String>,

    /// Entry point file (default: "src/index.js")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry: Option<String>,

    /// HTML template (default: "./index.html")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,

    /// Emitted HTML file name (default: "./index.html")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html_filename: Option<String>,

    /// Output directory (default: "dist")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<String>,

    /// Bundle file name pattern (default: "[name].js")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_filename: Option<String>,

    /// Directory the dev server serves (default: "./dist")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_base: Option<String>,
}

/// Command-line values that win over the layout file
#[derive(Debug, Clone, Default)]
pub struct LayoutOverrides {
    pub entry: Option<String>,
    pub template: Option<String>,
    pub output_dir: Option<String>,
}

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load the layout file from the project root, if there is one
    pub fn load_from_file(root: &Path) -> Result<Option<LayoutFile>> {
        let config_path = root.join(CONFIG_FILE_NAME);

        if !config_path.exists() {
            Logger::debug(&format!("No {} found, using defaults", CONFIG_FILE_NAME));
            return Ok(None);
        }

        Logger::debug(&format!("Loading layout from {}", config_path.display()));

        let content =
            std::fs::read_to_string(&config_path).map_err(|e| ConfigurationError::Unreadable {
                field: "config_file",
                path: config_path.clone(),
                reason: e.to_string(),
            })?;

        let layout: LayoutFile = serde_json::from_str(&content).map_err(|e| {
            ConfigurationError::invalid(format!("Failed to parse {}: {}", CONFIG_FILE_NAME, e))
        })?;

        Logger::debug("✅ Layout file loaded");
        Ok(Some(layout))
    }

    /// Precedence: command line, then layout file, then defaults
    pub fn merge_with_cli(
        file: Option<LayoutFile>,
        root: PathBuf,
        overrides: &LayoutOverrides,
    ) -> StaticInputs {
        let file = file.unwrap_or_default();
        let mut inputs = StaticInputs::for_root(root);

        let pick = |cli: &Option<String>, from_file: Option<String>, default: &mut String| {
            if let Some(value) = cli.clone().or(from_file) {
                *default = value;
            }
        };

        pick(&overrides.entry, file.entry, &mut inputs.entry);
        pick(&overrides.template, file.template, &mut inputs.template);
        pick(&overrides.output_dir, file.output_dir, &mut inputs.output_dir);
        pick(&None, file.source_dir, &mut inputs.source_dir);
        pick(&None, file.html_filename, &mut inputs.html_filename);
        pick(&None, file.output_filename, &mut inputs.output_filename);
        pick(&None, file.content_base, &mut inputs.content_base);

        inputs
    }

    /// Example layout file with every field at its default
    pub fn generate_example() -> Result<String> {
        let defaults = StaticInputs::for_root(PathBuf::new());
        let example = LayoutFile {
            source_dir: Some(defaults.source_dir),
            entry: Some(defaults.entry),
            template: Some(defaults.template),
            html_filename: Some(defaults.html_filename),
            output_dir: Some(defaults.output_dir),
            output_filename: Some(defaults.output_filename),
            content_base: Some(defaults.content_base),
        };
        Ok(serde_json::to_string_pretty(&example)?)
    }
}
