use crate::core::inputs::EnvDescriptor;
use crate::core::rules::Rule;
use crate::plugins::PluginSequence;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// The single configuration axis. Exactly one is active per resolution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Production,
    #[default]
    Development,
}

impl Environment {
    /// Production iff the descriptor carries a truthy production signal.
    pub fn from_descriptor(env: &EnvDescriptor) -> Self {
        if env.is_production() {
            Environment::Production
        } else {
            Environment::Development
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Environment::Production => "production",
            Environment::Development => "development",
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Source-map strategy, a direct function of the environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Devtool {
    /// Full, separate source maps. Slow to build.
    #[serde(rename = "source-map")]
    SourceMap,
    /// Modules wrapped in `eval` with sourceURL comments. Fast rebuilds.
    #[serde(rename = "eval")]
    Eval,
}

impl Devtool {
    pub fn for_environment(environment: Environment) -> Self {
        match environment {
            Environment::Production => Devtool::SourceMap,
            Environment::Development => Devtool::Eval,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Devtool::SourceMap => "source-map",
            Devtool::Eval => "eval",
        }
    }
}

impl fmt::Display for Devtool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputConfig {
    /// Bundle filename pattern, e.g. `[name].js`
    pub filename: String,
    /// Absolute output directory
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModuleConfig {
    pub rules: Vec<Rule>,
}

impl ModuleConfig {
    /// Every rule that applies to `path`, in declaration order.
    /// Matching is not exclusive: one file may hit several rules.
    pub fn matching(&self, path: impl AsRef<Path>) -> Vec<&Rule> {
        let path = path.as_ref();
        self.rules.iter().filter(|rule| rule.matches(path)).collect()
    }
}

/// Module lookup strategy handed to the build engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveStrategy {
    pub extensions: Vec<String>,
    pub modules: Vec<String>,
    pub description_files: Vec<String>,
    pub main_fields: Vec<String>,
}

impl ResolveStrategy {
    pub fn standard() -> Self {
        Self {
            extensions: strings(&[".js", ".jsx", ".json"]),
            modules: strings(&["node_modules", "bower_components"]),
            description_files: strings(&["bower.json", "package.json"]),
            main_fields: strings(&["browser", "module", "main"]),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatsColors {
    pub green: String,
}

/// Reduced-verbosity stats reporting for the dev server
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsOptions {
    pub assets: bool,
    pub children: bool,
    pub chunks: bool,
    pub hash: bool,
    pub modules: bool,
    pub public_path: bool,
    pub timings: bool,
    pub version: bool,
    pub warnings: bool,
    pub colors: StatsColors,
}

impl Default for StatsOptions {
    fn default() -> Self {
        Self {
            assets: true,
            children: false,
            chunks: false,
            hash: false,
            modules: false,
            public_path: false,
            timings: true,
            version: false,
            warnings: true,
            colors: StatsColors {
                green: "\u{1b}[32m".to_string(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DevServerProfile {
    pub host: String,
    pub headers: BTreeMap<String, String>,
    pub content_base: String,
    pub history_api_fallback: bool,
    pub port: u16,
    pub compress: bool,
    pub stats: StatsOptions,
}

impl DevServerProfile {
    pub const DEFAULT_PORT: u16 = 4000;

    pub fn standard(content_base: &str) -> Self {
        let mut headers = BTreeMap::new();
        headers.insert("Access-Control-Allow-Origin".to_string(), "*".to_string());

        Self {
            host: "localhost".to_string(),
            headers,
            content_base: content_base.to_string(),
            history_api_fallback: true,
            port: Self::DEFAULT_PORT,
            compress: true,
            stats: StatsOptions::default(),
        }
    }
}

/// The fully resolved configuration consumed by the external build engine.
///
/// Built once per resolution and never mutated afterwards; two resolutions
/// with equal inputs compare equal.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedConfig {
    /// Selected variant. Not part of the engine-facing output; the engine
    /// sees it through the environment plugin.
    #[serde(skip)]
    pub environment: Environment,
    pub devtool: Devtool,
    pub context: PathBuf,
    pub entry: PathBuf,
    pub output: OutputConfig,
    pub module: ModuleConfig,
    pub resolve: ResolveStrategy,
    pub plugins: PluginSequence,
    pub dev_server: DevServerProfile,
}

impl ResolvedConfig {
    pub fn to_json(&self) -> crate::utils::Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }

    pub fn to_json_string(&self, pretty: bool) -> crate::utils::Result<String> {
        let text = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(text)
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
