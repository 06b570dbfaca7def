use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::*;
use packcfg::utils::{ConfigLoader, LayoutOverrides, Logger};
use packcfg::{ConfigResolver, EnvDescriptor, PluginKind, ResolvedConfig, StaticInputs};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "packcfg")]
#[command(about = "Resolve a front-end build configuration for the bundling engine")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Clone)]
pub struct EnvArgs {
    /// Project root directory
    #[arg(short, long, default_value = ".")]
    pub root: String,
    /// Environment entries as key=value (a bare key means key=true)
    #[arg(short, long = "env", value_name = "KEY=VALUE")]
    pub env: Vec<String>,
    /// Environment descriptor as a JSON object; --env entries override it
    #[arg(long, value_name = "JSON")]
    pub env_json: Option<String>,
    /// Shorthand for --env prod=true
    #[arg(long)]
    pub prod: bool,
    /// Entry file, relative to the root
    #[arg(long)]
    pub entry: Option<String>,
    /// HTML template, relative to the root
    #[arg(long)]
    pub template: Option<String>,
    /// Output directory, relative to the root
    #[arg(long)]
    pub output_dir: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the resolved configuration as JSON
    Resolve {
        #[command(flatten)]
        env: EnvArgs,
        /// Fail unless the template and entry files exist
        #[arg(long)]
        check_files: bool,
        /// Single-line JSON output
        #[arg(long)]
        compact: bool,
    },
    /// List the plugins in the order the engine will run them
    Plugins {
        #[command(flatten)]
        env: EnvArgs,
    },
    /// Print an example packcfg.config.json
    Init,
}

pub struct CliHandler;

impl CliHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn run(&self) -> Result<()> {
        Logger::init();

        let cli = Cli::parse();

        match cli.command {
            Commands::Resolve {
                env,
                check_files,
                compact,
            } => self.handle_resolve_command(&env, check_files, compact),
            Commands::Plugins { env } => self.handle_plugins_command(&env),
            Commands::Init => self.handle_init_command(),
        }
    }

    fn handle_resolve_command(
        &self,
        args: &EnvArgs,
        check_files: bool,
        compact: bool,
    ) -> Result<()> {
        let inputs = self.load_inputs(args)?;
        if check_files {
            inputs.verify_on_disk()?;
        }

        let config = self.resolve(inputs, args)?;
        println!("{}", config.to_json_string(!compact)?);
        Ok(())
    }

    fn handle_plugins_command(&self, args: &EnvArgs) -> Result<()> {
        let inputs = self.load_inputs(args)?;
        let config = self.resolve(inputs, args)?;

        println!(
            "\n  {} {}",
            "PLUGINS".bright_cyan().bold(),
            config.environment.name().bright_white()
        );
        println!();
        for (i, plugin) in config.plugins.iter().enumerate() {
            let marker = if plugin.kind().is_base() {
                "base".bright_black()
            } else if plugin.kind() == PluginKind::HotModuleReplacement {
                "dev".bright_green()
            } else {
                "prod".bright_yellow()
            };
            println!("  {}. {} {}", i + 1, plugin.name().bright_cyan(), format!("({})", marker));
        }

        if let Some(injection) = config.plugins.environment_injection() {
            println!();
            for (expression, literal) in injection.definitions() {
                println!("  {} = {}", expression.bright_black(), literal.bright_white());
            }
        }

        println!();
        println!(
            "  {} devtool {}",
            "✓".bright_green(),
            config.devtool.as_str().bright_white().bold()
        );

        Ok(())
    }

    fn handle_init_command(&self) -> Result<()> {
        println!("{}", ConfigLoader::generate_example()?);
        Ok(())
    }

    fn load_inputs(&self, args: &EnvArgs) -> Result<StaticInputs> {
        let root = absolute_root(Path::new(&args.root))?;
        let file = ConfigLoader::load_from_file(&root)?;
        let overrides = LayoutOverrides {
            entry: args.entry.clone(),
            template: args.template.clone(),
            output_dir: args.output_dir.clone(),
        };
        Ok(ConfigLoader::merge_with_cli(file, root, &overrides))
    }

    fn resolve(&self, inputs: StaticInputs, args: &EnvArgs) -> Result<ResolvedConfig> {
        let mut descriptor = match &args.env_json {
            Some(text) => EnvDescriptor::from_json(text)?,
            None => EnvDescriptor::none(),
        };
        if !args.env.is_empty() {
            descriptor = descriptor.extend(EnvDescriptor::from_pairs(&args.env)?);
        }
        if args.prod {
            descriptor = descriptor.with(EnvDescriptor::PRODUCTION_KEY, true);
        }

        let config = ConfigResolver::new(inputs).resolve(&descriptor)?;
        Ok(config)
    }
}

impl Default for CliHandler {
    fn default() -> Self {
        Self::new()
    }
}

fn absolute_root(root: &Path) -> Result<PathBuf> {
    root.canonicalize()
        .with_context(|| format!("cannot resolve project root {}", root.display()))
}
