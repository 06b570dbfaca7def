use crate::utils::{ConfigurationError, Result};
use serde_json::{Map, Value};
use std::fs::File;
use std::path::{Component, Path, PathBuf};

/// Environment-descriptor mapping passed at invocation time.
///
/// An absent descriptor and an empty one both select development.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnvDescriptor {
    values: Option<Map<String, Value>>,
}

impl EnvDescriptor {
    pub const PRODUCTION_KEY: &'static str = "prod";

    /// No descriptor at all
    pub fn none() -> Self {
        Self { values: None }
    }

    pub fn empty() -> Self {
        Self {
            values: Some(Map::new()),
        }
    }

    pub fn production() -> Self {
        Self::empty().with(Self::PRODUCTION_KEY, true)
    }

    pub fn from_map(values: Map<String, Value>) -> Self {
        Self {
            values: Some(values),
        }
    }

    pub fn with(self, key: &str, value: impl Into<Value>) -> Self {
        let mut values = self.values.unwrap_or_default();
        values.insert(key.to_string(), value.into());
        Self {
            values: Some(values),
        }
    }

    /// Entries of `other` win over entries already present. An absent
    /// descriptor extended with an absent one stays absent.
    pub fn extend(self, other: EnvDescriptor) -> Self {
        match other.values {
            Some(entries) => entries
                .into_iter()
                .fold(self, |descriptor, (key, value)| descriptor.with(&key, value)),
            None => self,
        }
    }

    /// Parse a JSON object. `null` means no descriptor.
    pub fn from_json(text: &str) -> Result<Self> {
        match serde_json::from_str::<Value>(text)? {
            Value::Null => Ok(Self::none()),
            Value::Object(map) => Ok(Self::from_map(map)),
            other => Err(ConfigurationError::invalid(format!(
                "environment descriptor must be a JSON object, got {}",
                other
            ))),
        }
    }

    /// Parse `key=value` pairs. A bare `key` means `key=true`; values are
    /// read as JSON scalars when they parse, otherwise kept as strings.
    pub fn from_pairs<I, S>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut descriptor = Self::empty();
        for pair in pairs {
            let pair = pair.as_ref().trim();
            let (key, value) = match pair.split_once('=') {
                Some((key, raw)) => (key.trim(), parse_scalar(raw.trim())),
                None => (pair, Value::Bool(true)),
            };
            if key.is_empty() {
                return Err(ConfigurationError::invalid(format!(
                    "environment entry `{}` has no key",
                    pair
                )));
            }
            descriptor = descriptor.with(key, value);
        }
        Ok(descriptor)
    }

    pub fn is_present(&self) -> bool {
        self.values.is_some()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.as_ref().and_then(|values| values.get(key))
    }

    pub fn production_signal(&self) -> Option<&Value> {
        self.get(Self::PRODUCTION_KEY)
    }

    pub fn is_production(&self) -> bool {
        self.production_signal().map(is_truthy).unwrap_or(false)
    }
}

fn parse_scalar(raw: &str) -> Value {
    match serde_json::from_str::<Value>(raw) {
        Ok(value) if !value.is_object() && !value.is_array() => value,
        _ => Value::String(raw.to_string()),
    }
}

/// Truthiness as the descriptor's producers understand it: `false`,
/// `null`, zero, NaN and the empty string are falsy, everything else is
/// truthy (including the string `"false"`).
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Static path and template inputs of a resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticInputs {
    /// Absolute project directory everything else is relative to
    pub project_root: PathBuf,
    pub source_dir: String,
    pub entry: String,
    pub template: String,
    pub html_filename: String,
    pub output_dir: String,
    pub output_filename: String,
    pub content_base: String,
}

impl StaticInputs {
    pub fn for_root(project_root: impl Into<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
            source_dir: "src".to_string(),
            entry: "src/index.js".to_string(),
            template: "./index.html".to_string(),
            html_filename: "./index.html".to_string(),
            output_dir: "dist".to_string(),
            output_filename: "[name].js".to_string(),
            content_base: "./dist".to_string(),
        }
    }

    /// Shape checks only; touches no file.
    pub fn validate(&self) -> Result<()> {
        if self.project_root.as_os_str().is_empty() {
            return Err(ConfigurationError::missing("project_root"));
        }
        if !self.project_root.is_absolute() {
            return Err(ConfigurationError::malformed(
                "project_root",
                format!("{} is not absolute", self.project_root.display()),
            ));
        }

        let required = [
            ("source_dir", &self.source_dir),
            ("entry", &self.entry),
            ("template", &self.template),
            ("html_filename", &self.html_filename),
            ("output_dir", &self.output_dir),
            ("output_filename", &self.output_filename),
            ("content_base", &self.content_base),
        ];
        for (field, value) in required {
            require_path(field, value)?;
        }

        if self.output_filename.ends_with('/') || self.output_filename.ends_with('\\') {
            return Err(ConfigurationError::malformed(
                "output_filename",
                "must name a file, not a directory",
            ));
        }
        if self.entry.ends_with('/') || self.entry.ends_with('\\') {
            return Err(ConfigurationError::malformed("entry", "must name a file, not a directory"));
        }

        Ok(())
    }

    /// Check that the template and entry files exist and can be opened.
    pub fn verify_on_disk(&self) -> Result<()> {
        self.validate()?;
        for (field, path) in [("template", self.template_path()), ("entry", self.entry_path())] {
            verify_readable(field, &path)?;
        }
        Ok(())
    }

    pub fn context(&self) -> PathBuf {
        join_normalized(&self.project_root, &self.source_dir)
    }

    pub fn entry_path(&self) -> PathBuf {
        join_normalized(&self.project_root, &self.entry)
    }

    pub fn template_path(&self) -> PathBuf {
        join_normalized(&self.project_root, &self.template)
    }

    pub fn output_path(&self) -> PathBuf {
        join_normalized(&self.project_root, &self.output_dir)
    }
}

fn require_path(field: &'static str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ConfigurationError::missing(field));
    }
    if value.contains('\0') {
        return Err(ConfigurationError::malformed(field, "contains a NUL byte"));
    }
    Ok(())
}

fn verify_readable(field: &'static str, path: &Path) -> Result<()> {
    let unreadable = |reason: String| ConfigurationError::Unreadable {
        field,
        path: path.to_path_buf(),
        reason,
    };

    let metadata = std::fs::metadata(path).map_err(|e| unreadable(e.to_string()))?;
    if !metadata.is_file() {
        return Err(unreadable("not a regular file".to_string()));
    }
    File::open(path).map_err(|e| unreadable(e.to_string()))?;
    Ok(())
}

/// Join `relative` under `root`, dropping `.` segments so `./src` and
/// `src` resolve to the same path. A leading `/` stays under `root`:
/// `/dist` joins to `<root>/dist`.
fn join_normalized(root: &Path, relative: &str) -> PathBuf {
    let mut joined = root.to_path_buf();
    for component in Path::new(relative).components() {
        match component {
            Component::CurDir | Component::RootDir | Component::Prefix(_) => {}
            other => joined.push(other.as_os_str()),
        }
    }
    joined
}
