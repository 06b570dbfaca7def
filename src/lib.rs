//! Resolves a declarative front-end build configuration into the concrete,
//! ordered settings an external bundling engine consumes.
//!
//! ```no_run
//! use packcfg::{resolve, EnvDescriptor, StaticInputs};
//!
//! let inputs = StaticInputs::for_root("/srv/app");
//! let config = resolve(&inputs, &EnvDescriptor::production())?;
//! assert_eq!(config.plugins.len(), 4);
//! # Ok::<(), packcfg::ConfigurationError>(())
//! ```

pub mod core;
pub mod plugins;
pub mod utils;

pub use crate::core::{
    resolve, ConfigResolver, Devtool, EnvDescriptor, Environment, ResolvedConfig, StaticInputs,
};
pub use crate::plugins::{PluginDescriptor, PluginKind, PluginSequence};
pub use crate::utils::{ConfigurationError, Result};
