use crate::core::inputs::{EnvDescriptor, StaticInputs};
use crate::core::models::*;
use crate::core::rules::standard_rules;
use crate::plugins::{EnvironmentInjection, MinifyOptions, PluginDescriptor, PluginSequence};
use crate::utils::{Logger, Result, Timer};

/// Turns an environment descriptor into a [`ResolvedConfig`].
///
/// Resolution is pure: no I/O, no shared state, and equal inputs always
/// produce equal configurations. The only failure is a
/// [`ConfigurationError`](crate::utils::ConfigurationError) for malformed
/// static inputs, reported before any plugin is built.
#[derive(Debug, Clone)]
pub struct ConfigResolver {
    inputs: StaticInputs,
}

impl ConfigResolver {
    pub fn new(inputs: StaticInputs) -> Self {
        Self { inputs }
    }

    pub fn inputs(&self) -> &StaticInputs {
        &self.inputs
    }

    pub fn resolve(&self, env: &EnvDescriptor) -> Result<ResolvedConfig> {
        let _timer = Timer::start("configuration resolution");

        self.inputs.validate()?;

        let environment = Environment::from_descriptor(env);
        Logger::resolution_start(environment.name(), &self.inputs.project_root.to_string_lossy());
        Logger::environment_selected(environment.name(), env.production_signal().is_some());

        let plugins = build_plugins(&self.inputs, environment);
        debug_assert!(plugins.check_order().is_ok());

        let devtool = Devtool::for_environment(environment);

        let rules = standard_rules();
        Logger::rules_assembled(rules.len());

        let config = ResolvedConfig {
            environment,
            devtool,
            context: self.inputs.context(),
            entry: self.inputs.entry_path(),
            output: OutputConfig {
                filename: self.inputs.output_filename.clone(),
                path: self.inputs.output_path(),
            },
            module: ModuleConfig { rules },
            resolve: ResolveStrategy::standard(),
            plugins,
            dev_server: DevServerProfile::standard(&self.inputs.content_base),
        };

        Logger::resolution_complete(environment.name(), config.plugins.len(), devtool.as_str());
        Ok(config)
    }
}

/// Resolve `env` against `inputs` in one call
pub fn resolve(inputs: &StaticInputs, env: &EnvDescriptor) -> Result<ResolvedConfig> {
    ConfigResolver::new(inputs.clone()).resolve(env)
}

fn build_plugins(inputs: &StaticInputs, environment: Environment) -> PluginSequence {
    let mut plugins = PluginSequence::new();

    plugins.push(PluginDescriptor::HtmlGenerator {
        template: inputs.template.clone(),
        filename: inputs.html_filename.clone(),
    });
    plugins.push(PluginDescriptor::EnvironmentInjection(
        EnvironmentInjection::for_environment(environment),
    ));

    match environment {
        Environment::Production => {
            plugins.push(PluginDescriptor::LoaderOptions {
                minimize: true,
                debug: false,
            });
            plugins.push(PluginDescriptor::Minify(MinifyOptions::default()));
        }
        Environment::Development => {
            plugins.push(PluginDescriptor::HotModuleReplacement);
        }
    }

    for (position, plugin) in plugins.iter().enumerate() {
        Logger::plugin_added(position, plugin.name());
    }

    plugins
}
