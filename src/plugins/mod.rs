// Plugin descriptors handed to the build engine, and their ordered sequence

pub mod environment;

pub use environment::EnvironmentInjection;

use crate::utils::{ConfigurationError, Result};
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use serde_json::{json, Map, Value};

/// Identity of a plugin, without its options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PluginKind {
    HtmlGenerator,
    EnvironmentInjection,
    LoaderOptions,
    Minify,
    HotModuleReplacement,
}

impl PluginKind {
    /// Present in every resolution, ahead of variant plugins
    pub fn is_base(&self) -> bool {
        matches!(self, PluginKind::HtmlGenerator | PluginKind::EnvironmentInjection)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MinifyOptions {
    pub warnings: bool,
    pub ie8: bool,
    /// Empty: compression runs with the engine's own defaults
    pub compress: Map<String, Value>,
}

impl Default for MinifyOptions {
    fn default() -> Self {
        Self {
            warnings: false,
            ie8: true,
            compress: Map::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PluginDescriptor {
    HtmlGenerator { template: String, filename: String },
    EnvironmentInjection(EnvironmentInjection),
    /// Sets the flags the minifier reads, so it must come first
    LoaderOptions { minimize: bool, debug: bool },
    Minify(MinifyOptions),
    HotModuleReplacement,
}

impl PluginDescriptor {
    pub fn kind(&self) -> PluginKind {
        match self {
            PluginDescriptor::HtmlGenerator { .. } => PluginKind::HtmlGenerator,
            PluginDescriptor::EnvironmentInjection(_) => PluginKind::EnvironmentInjection,
            PluginDescriptor::LoaderOptions { .. } => PluginKind::LoaderOptions,
            PluginDescriptor::Minify(_) => PluginKind::Minify,
            PluginDescriptor::HotModuleReplacement => PluginKind::HotModuleReplacement,
        }
    }

    /// Name the build engine knows the plugin by
    pub fn name(&self) -> &'static str {
        match self {
            PluginDescriptor::HtmlGenerator { .. } => "HtmlWebpackPlugin",
            PluginDescriptor::EnvironmentInjection(_) => "EnvironmentPlugin",
            PluginDescriptor::LoaderOptions { .. } => "LoaderOptionsPlugin",
            PluginDescriptor::Minify(_) => "UglifyJsPlugin",
            PluginDescriptor::HotModuleReplacement => "HotModuleReplacementPlugin",
        }
    }

    pub fn options(&self) -> Value {
        match self {
            PluginDescriptor::HtmlGenerator { template, filename } => {
                json!({ "template": template, "filename": filename })
            }
            PluginDescriptor::EnvironmentInjection(injection) => json!(injection.variables()),
            PluginDescriptor::LoaderOptions { minimize, debug } => {
                json!({ "minimize": minimize, "debug": debug })
            }
            PluginDescriptor::Minify(options) => json!({
                "uglifyOptions": {
                    "warnings": options.warnings,
                    "ie8": options.ie8,
                    "compress": options.compress,
                }
            }),
            PluginDescriptor::HotModuleReplacement => json!({}),
        }
    }
}

impl Serialize for PluginDescriptor {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("name", self.name())?;
        map.serialize_entry("options", &self.options())?;
        map.end()
    }
}

/// Ordered plugin list. Order is significant to the engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PluginSequence {
    plugins: Vec<PluginDescriptor>,
}

impl PluginSequence {
    pub fn new() -> Self {
        Self {
            plugins: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, plugin: PluginDescriptor) {
        self.plugins.push(plugin);
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&PluginDescriptor> {
        self.plugins.get(index)
    }

    pub fn last(&self) -> Option<&PluginDescriptor> {
        self.plugins.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PluginDescriptor> {
        self.plugins.iter()
    }

    pub fn kinds(&self) -> Vec<PluginKind> {
        self.plugins.iter().map(PluginDescriptor::kind).collect()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.plugins.iter().map(PluginDescriptor::name).collect()
    }

    pub fn position(&self, kind: PluginKind) -> Option<usize> {
        self.plugins.iter().position(|p| p.kind() == kind)
    }

    pub fn contains(&self, kind: PluginKind) -> bool {
        self.position(kind).is_some()
    }

    /// Variables the sequence publishes to built code
    pub fn environment_injection(&self) -> Option<&EnvironmentInjection> {
        self.plugins.iter().find_map(|plugin| match plugin {
            PluginDescriptor::EnvironmentInjection(injection) => Some(injection),
            _ => None,
        })
    }

    /// Check the ordering contract: the base pair leads, loader options are
    /// immediately followed by the minifier, and hot replacement never
    /// shares a sequence with minification.
    pub fn check_order(&self) -> Result<()> {
        let kinds = self.kinds();

        if kinds.len() < 2
            || kinds[0] != PluginKind::HtmlGenerator
            || kinds[1] != PluginKind::EnvironmentInjection
        {
            return Err(ConfigurationError::invalid(
                "plugin sequence must start with the HTML generator and environment injector",
            ));
        }
        if kinds[2..].iter().any(PluginKind::is_base) {
            return Err(ConfigurationError::invalid(
                "base plugins must precede all variant plugins",
            ));
        }

        match (self.position(PluginKind::LoaderOptions), self.position(PluginKind::Minify)) {
            (Some(options), Some(minify)) if minify == options + 1 => {}
            (None, None) => {}
            _ => {
                return Err(ConfigurationError::invalid(
                    "loader options must be immediately followed by minification",
                ))
            }
        }

        if self.contains(PluginKind::HotModuleReplacement) && self.contains(PluginKind::Minify) {
            return Err(ConfigurationError::invalid(
                "hot module replacement and minification are mutually exclusive",
            ));
        }

        Ok(())
    }
}

impl<'a> IntoIterator for &'a PluginSequence {
    type Item = &'a PluginDescriptor;
    type IntoIter = std::slice::Iter<'a, PluginDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.plugins.iter()
    }
}
