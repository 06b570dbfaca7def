// Module rules: which loaders the build engine runs for which files

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::fmt;
use std::path::Path;

static SCRIPT_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.(js|jsx)$").unwrap());
static DEPENDENCY_DIR_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"node_modules").unwrap());
static STYLESHEET_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.css$").unwrap());
static PREPROCESSED_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.scss$").unwrap());
static FONT_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.(woff|woff2|ttf|eot)$").unwrap());
static IMAGE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\.(png|jpe?g|gif|svg|ico)$").unwrap());

static PLACEHOLDER_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[(name|ext|local|hash)(?::([A-Za-z0-9]+))?\]").unwrap());

pub const LOCAL_IDENT_NAME: &str = "[name]_[local]_[hash:base64]";
pub const FONT_NAME_TEMPLATE: &str = "assets/fonts/[name].[hash].[ext]";
pub const IMAGE_NAME_TEMPLATE: &str = "assets/images/[name].[ext]?[hash]";

/// What a rule is for. Not part of the engine-facing output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleKind {
    Script,
    Stylesheet,
    PreprocessedStylesheet,
    Font,
    Image,
}

/// A single loader invocation with its options
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoaderDescriptor {
    pub loader: String,
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub options: Map<String, Value>,
}

impl LoaderDescriptor {
    pub fn new(loader: &str) -> Self {
        Self {
            loader: loader.to_string(),
            options: Map::new(),
        }
    }

    pub fn with_options(loader: &str, options: Value) -> Self {
        let options = match options {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Self {
            loader: loader.to_string(),
            options,
        }
    }

    pub fn option(&self, key: &str) -> Option<&Value> {
        self.options.get(key)
    }
}

/// How a rule names its loaders.
///
/// `Use` and `Chain` serialize under a `use` key; `Inline` puts `loader`
/// and `options` directly on the rule.
#[derive(Debug, Clone, PartialEq)]
pub enum RuleUse {
    Use(LoaderDescriptor),
    Chain(Vec<LoaderDescriptor>),
    Inline(LoaderDescriptor),
}

impl RuleUse {
    pub fn loaders(&self) -> Vec<&LoaderDescriptor> {
        match self {
            RuleUse::Use(loader) | RuleUse::Inline(loader) => vec![loader],
            RuleUse::Chain(chain) => chain.iter().collect(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Rule {
    pub kind: RuleKind,
    pub test: Regex,
    pub exclude: Option<Regex>,
    pub uses: RuleUse,
}

impl Rule {
    pub fn matches(&self, path: &Path) -> bool {
        let path = path.to_string_lossy();
        if !self.test.is_match(&path) {
            return false;
        }
        match &self.exclude {
            Some(exclude) => !exclude.is_match(&path),
            None => true,
        }
    }

    /// Loader names in execution-declaration order
    pub fn loader_names(&self) -> Vec<&str> {
        self.uses.loaders().into_iter().map(|l| l.loader.as_str()).collect()
    }

    pub fn loader(&self, name: &str) -> Option<&LoaderDescriptor> {
        self.uses.loaders().into_iter().find(|l| l.loader == name)
    }

    /// Output name template of a file-emitting rule
    pub fn name_template(&self) -> Option<NameTemplate> {
        self.uses
            .loaders()
            .into_iter()
            .find_map(|l| l.option("name"))
            .and_then(Value::as_str)
            .map(NameTemplate::new)
    }
}

// Regex has no equality; two rules are equal when their patterns are.
impl PartialEq for Rule {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
            && self.test.as_str() == other.test.as_str()
            && self.exclude.as_ref().map(Regex::as_str) == other.exclude.as_ref().map(Regex::as_str)
            && self.uses == other.uses
    }
}

impl Serialize for Rule {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("test", self.test.as_str())?;
        if let Some(exclude) = &self.exclude {
            map.serialize_entry("exclude", exclude.as_str())?;
        }
        match &self.uses {
            RuleUse::Use(loader) => map.serialize_entry("use", loader)?,
            RuleUse::Chain(chain) => map.serialize_entry("use", chain)?,
            RuleUse::Inline(loader) => {
                map.serialize_entry("loader", &loader.loader)?;
                map.serialize_entry("options", &loader.options)?;
            }
        }
        map.end()
    }
}

/// The five module rules, in match order
pub fn standard_rules() -> Vec<Rule> {
    vec![
        Rule {
            kind: RuleKind::Script,
            test: SCRIPT_PATTERN.clone(),
            exclude: Some(DEPENDENCY_DIR_PATTERN.clone()),
            uses: RuleUse::Use(LoaderDescriptor::new("babel-loader")),
        },
        Rule {
            kind: RuleKind::Stylesheet,
            test: STYLESHEET_PATTERN.clone(),
            exclude: None,
            uses: RuleUse::Chain(vec![
                LoaderDescriptor::new("style-loader"),
                LoaderDescriptor::with_options(
                    "css-loader",
                    json!({
                        "modules": true,
                        "importLoaders": 1,
                        "localIdentName": LOCAL_IDENT_NAME,
                        "sourceMap": true,
                        "minimize": true
                    }),
                ),
            ]),
        },
        Rule {
            kind: RuleKind::PreprocessedStylesheet,
            test: PREPROCESSED_PATTERN.clone(),
            exclude: None,
            uses: RuleUse::Chain(vec![
                LoaderDescriptor::new("style-loader"),
                LoaderDescriptor::new("css-loader"),
                LoaderDescriptor::new("sass-loader"),
            ]),
        },
        Rule {
            kind: RuleKind::Font,
            test: FONT_PATTERN.clone(),
            exclude: None,
            uses: RuleUse::Inline(LoaderDescriptor::with_options(
                "file-loader",
                json!({ "name": FONT_NAME_TEMPLATE }),
            )),
        },
        Rule {
            kind: RuleKind::Image,
            test: IMAGE_PATTERN.clone(),
            exclude: None,
            uses: RuleUse::Inline(LoaderDescriptor::with_options(
                "file-loader",
                json!({ "name": IMAGE_NAME_TEMPLATE }),
            )),
        },
    ]
}

/// Values substituted into a name template
#[derive(Debug, Clone, Default)]
pub struct TemplateVars {
    pub name: String,
    pub ext: String,
    pub local: Option<String>,
    /// Already-encoded content hash. Digest-qualified placeholders such as
    /// `[hash:base64]` take it as-is.
    pub hash: String,
}

impl TemplateVars {
    pub fn new(name: &str, ext: &str, hash: &str) -> Self {
        Self {
            name: name.to_string(),
            ext: ext.to_string(),
            local: None,
            hash: hash.to_string(),
        }
    }

    pub fn with_local(mut self, local: &str) -> Self {
        self.local = Some(local.to_string());
        self
    }
}

/// A file-name template such as `assets/fonts/[name].[hash].[ext]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameTemplate(String);

/// A rendered template split into the emitted file path and the query
/// string appended to references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedName {
    pub path: String,
    pub query: Option<String>,
}

impl fmt::Display for RenderedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.query {
            Some(query) => write!(f, "{}?{}", self.path, query),
            None => f.write_str(&self.path),
        }
    }
}

impl NameTemplate {
    pub fn new(template: &str) -> Self {
        Self(template.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Unknown placeholders, and `[local]` without a value, are left intact.
    pub fn render(&self, vars: &TemplateVars) -> RenderedName {
        let rendered = PLACEHOLDER_PATTERN.replace_all(&self.0, |caps: &Captures| {
            match &caps[1] {
                "name" => vars.name.clone(),
                "ext" => vars.ext.clone(),
                "hash" => vars.hash.clone(),
                "local" => vars.local.clone().unwrap_or_else(|| caps[0].to_string()),
                _ => caps[0].to_string(),
            }
        });

        match rendered.split_once('?') {
            Some((path, query)) => RenderedName {
                path: path.to_string(),
                query: Some(query.to_string()),
            },
            None => RenderedName {
                path: rendered.to_string(),
                query: None,
            },
        }
    }

    /// Whether the content hash ends up in the emitted file name
    pub fn hash_in_file_name(&self) -> bool {
        let path_part = self.0.split('?').next().unwrap_or_default();
        PLACEHOLDER_PATTERN
            .captures_iter(path_part)
            .any(|caps| &caps[1] == "hash")
    }
}
