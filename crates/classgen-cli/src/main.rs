//! classgen: output paths and template replacements for generated C++ classes.

use std::env;
use std::fmt::Write as _;
use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use env_logger::fmt::WriteStyle;
use log::{LevelFilter, debug, info};
use serde::Serialize;

use classgen_core::paths::write_default_config;
use classgen_core::{
    AppConfig, AppPaths, FixedClock, PathSet, Profile, ProfileRegistry, ReplacementMap, Resolver,
    generate_example_config, generate_schema,
};

const APP_NAME: &str = "classgen";
const REPO_URL: &str = "https://github.com/byteowlz/classgen";

fn main() {
    if let Err(err) = try_main() {
        let _ = writeln!(io::stderr(), "{err:?}");
        std::process::exit(1);
    }
}

fn try_main() -> Result<()> {
    let cli = Cli::parse();

    let ctx = RuntimeContext::new(cli.common.clone())?;
    ctx.init_logging()?;
    debug!("resolved paths: {}", ctx.paths);

    match cli.command {
        Command::Paths(cmd) => handle_paths(&ctx, cmd),
        Command::Replacements(cmd) => handle_replacements(&ctx, cmd),
        Command::Profiles { command } => handle_profiles(&ctx, command),
        Command::Init(cmd) => handle_init(&ctx, cmd),
        Command::Config { command } => handle_config(&ctx, command),
        Command::Completions { shell } => handle_completions(shell),
    }
}

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Compute file locations and template replacements for generated C++ classes.",
    propagate_version = true
)]
struct Cli {
    #[command(flatten)]
    common: CommonOpts,
    #[command(subcommand)]
    command: Command,
}

/// Options shared by every subcommand.
#[derive(Debug, Clone, Args)]
pub struct CommonOpts {
    /// Override the config file path
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,
    /// Reduce output to only errors
    #[arg(short, long, action = clap::ArgAction::SetTrue, global = true)]
    pub quiet: bool,
    /// Increase logging verbosity (stackable)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
    /// Enable debug logging (equivalent to -vv)
    #[arg(long, global = true)]
    pub debug: bool,
    /// Enable trace logging (overrides other levels)
    #[arg(long, global = true)]
    pub trace: bool,
    /// Output machine readable JSON
    #[arg(long, global = true, conflicts_with = "yaml")]
    pub json: bool,
    /// Output machine readable YAML
    #[arg(long, global = true)]
    pub yaml: bool,
    /// Disable ANSI colors in output
    #[arg(long = "no-color", global = true, conflicts_with = "color")]
    pub no_color: bool,
    /// Control color output (auto, always, never)
    #[arg(long, value_enum, default_value_t = ColorOption::Auto, global = true)]
    pub color: ColorOption,
    /// Do not change anything on disk
    #[arg(long = "dry-run", global = true)]
    pub dry_run: bool,
    /// Assume "yes" for interactive prompts
    #[arg(short = 'y', long = "yes", global = true)]
    pub assume_yes: bool,
    /// Emit additional diagnostics for troubleshooting
    #[arg(long = "diagnostics", global = true)]
    pub diagnostics: bool,
}

/// When to colorize log output.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ColorOption {
    /// Colorize when stderr is a terminal.
    Auto,
    /// Always colorize.
    Always,
    /// Never colorize.
    Never,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print where the header, source and test of a class belong
    Paths(PathsCommand),
    /// Print the template replacements for a class
    Replacements(ReplacementsCommand),
    /// Inspect the available project profiles
    Profiles {
        #[command(subcommand)]
        command: ProfilesCommand,
    },
    /// Create the config directory and default file
    Init(InitCommand),
    /// Inspect and manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Debug, Clone, Args)]
struct PathsCommand {
    /// Qualified class name, e.g. caf::io::basp::header
    #[arg(value_name = "NAME")]
    name: String,
    /// Root directory of the project checkout
    #[arg(long, value_name = "DIR")]
    root: Option<PathBuf>,
    /// Profile to use instead of the configured one
    #[arg(long, value_name = "PROFILE")]
    profile: Option<String>,
    /// Component to place the class in, bypassing prefix selection
    #[arg(long, value_name = "COMPONENT")]
    component: Option<String>,
}

#[derive(Debug, Clone, Args)]
struct ReplacementsCommand {
    /// Qualified class name, e.g. caf::io::basp::header
    #[arg(value_name = "NAME")]
    name: String,
    /// Profile to use instead of the configured one
    #[arg(long, value_name = "PROFILE")]
    profile: Option<String>,
    /// Use this year instead of the current one
    #[arg(long, value_name = "YEAR")]
    year: Option<i32>,
}

#[derive(Debug, Subcommand)]
enum ProfilesCommand {
    /// List profile names and root namespaces
    List,
    /// Print the full definition of a profile
    Show {
        /// Profile name
        #[arg(value_name = "PROFILE")]
        name: String,
    },
}

#[derive(Debug, Clone, Args)]
struct InitCommand {
    /// Recreate configuration even if it already exists
    #[arg(long = "force")]
    force: bool,
}

#[derive(Debug, Subcommand)]
enum ConfigCommand {
    /// Output the effective configuration
    Show,
    /// Print the resolved config file path
    Path,
    /// Print the JSON schema for the config file
    Schema,
    /// Print an example config with a custom profile
    Example,
    /// Regenerate the default configuration file
    Reset,
}

#[derive(Debug, Serialize)]
struct ProfileSummary<'a> {
    name: &'a str,
    root_namespace: &'a str,
    components: Vec<&'a str>,
}

impl<'a> From<&'a Profile> for ProfileSummary<'a> {
    fn from(profile: &'a Profile) -> Self {
        Self {
            name: &profile.name,
            root_namespace: &profile.root_namespace,
            components: profile.components.iter().map(|c| c.name.as_str()).collect(),
        }
    }
}

#[derive(Debug, Clone)]
struct RuntimeContext {
    common: CommonOpts,
    paths: AppPaths,
    config: AppConfig,
}

impl RuntimeContext {
    fn new(common: CommonOpts) -> Result<Self> {
        let paths = AppPaths::discover(common.config.clone())?;
        let config = AppConfig::load(&paths, common.dry_run)?;
        Ok(Self {
            common,
            paths,
            config,
        })
    }

    fn init_logging(&self) -> Result<()> {
        if self.common.quiet {
            log::set_max_level(LevelFilter::Off);
            return Ok(());
        }

        let mut builder =
            env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));

        builder.filter_level(self.effective_log_level());

        let force_color = matches!(self.common.color, ColorOption::Always)
            || env::var_os("FORCE_COLOR").is_some();
        let disable_color = self.common.no_color
            || matches!(self.common.color, ColorOption::Never)
            || env::var_os("NO_COLOR").is_some()
            || (!force_color && !io::stderr().is_terminal());

        if disable_color {
            builder.write_style(WriteStyle::Never);
        } else if force_color {
            builder.write_style(WriteStyle::Always);
        } else {
            builder.write_style(WriteStyle::Auto);
        }

        if self.common.diagnostics {
            builder.format_timestamp_millis();
            builder.format_module_path(true);
            builder.format_target(true);
        }

        builder.try_init().or_else(|err| {
            if self.common.verbose > 0 {
                eprintln!("logger already initialized: {err}");
            }
            Ok(())
        })
    }

    fn effective_log_level(&self) -> LevelFilter {
        if self.common.trace {
            LevelFilter::Trace
        } else if self.common.debug {
            LevelFilter::Debug
        } else {
            match self.common.verbose {
                0 => self.config.logging.level.to_level_filter(),
                1 => LevelFilter::Debug,
                _ => LevelFilter::Trace,
            }
        }
    }

    fn registry(&self) -> Result<ProfileRegistry> {
        self.config
            .registry()
            .with_context(|| format!("loading profiles from {}", self.paths.config_file.display()))
    }

    /// Resolver for `name`, honoring a command-line profile override.
    fn resolver(&self, profile: Option<&str>, name: &str) -> Result<Resolver> {
        let registry = self.registry()?;
        let requested = profile.or_else(|| self.config.requested_profile());
        let profile = registry.select(requested, name)?;
        debug!("using profile `{}` for {name}", profile.name);
        Ok(Resolver::new(profile.clone()))
    }

    /// Serialize `value` as JSON or YAML if requested, else print `human`.
    fn emit<T: Serialize>(&self, value: &T, human: impl FnOnce() -> String) -> Result<()> {
        let output = if self.common.json {
            serde_json::to_string_pretty(value).context("serializing output to JSON")?
        } else if self.common.yaml {
            serde_yaml::to_string(value).context("serializing output to YAML")?
        } else {
            human()
        };
        println!("{}", output.trim_end());
        Ok(())
    }
}

fn handle_paths(ctx: &RuntimeContext, cmd: PathsCommand) -> Result<()> {
    let resolver = ctx.resolver(cmd.profile.as_deref(), &cmd.name)?;
    let root = cmd.root.unwrap_or_else(|| ctx.config.root_dir());
    let paths = resolver
        .resolve_paths(&root, &cmd.name, cmd.component.as_deref())
        .with_context(|| format!("resolving paths for {}", cmd.name))?;
    ctx.emit(&paths, || format_paths(&resolver.profile().name, &paths))
}

fn handle_replacements(ctx: &RuntimeContext, cmd: ReplacementsCommand) -> Result<()> {
    let mut resolver = ctx.resolver(cmd.profile.as_deref(), &cmd.name)?;
    if let Some(year) = cmd.year {
        resolver = Resolver::with_clock(resolver.profile().clone(), FixedClock(year));
    }
    let map = resolver
        .resolve_replacements(&cmd.name)
        .with_context(|| format!("building replacements for {}", cmd.name))?;
    ctx.emit(&map, || format_replacements(&map))
}

fn handle_profiles(ctx: &RuntimeContext, command: ProfilesCommand) -> Result<()> {
    let registry = ctx.registry()?;
    match command {
        ProfilesCommand::List => {
            let summaries: Vec<ProfileSummary<'_>> =
                registry.iter().map(ProfileSummary::from).collect();
            ctx.emit(&summaries, || {
                let mut out = String::new();
                for summary in &summaries {
                    let _ = writeln!(
                        out,
                        "{:<10} {}:: ({})",
                        summary.name,
                        summary.root_namespace,
                        summary.components.join(", ")
                    );
                }
                out
            })
        }
        ProfilesCommand::Show { name } => {
            let profile = registry.get(&name)?;
            if ctx.common.json {
                ctx.emit(profile, String::new)
            } else {
                print!(
                    "{}",
                    serde_yaml::to_string(profile).context("serializing profile to YAML")?
                );
                Ok(())
            }
        }
    }
}

fn handle_init(ctx: &RuntimeContext, cmd: InitCommand) -> Result<()> {
    if ctx.paths.config_file.exists() && !(cmd.force || ctx.common.assume_yes) {
        return Err(anyhow!(
            "config already exists at {} (use --force to overwrite)",
            ctx.paths.config_file.display()
        ));
    }

    if ctx.common.dry_run {
        info!(
            "dry-run: would write default config to {}",
            ctx.paths.config_file.display()
        );
        return Ok(());
    }

    write_default_config(&ctx.paths.config_file)
}

fn handle_config(ctx: &RuntimeContext, command: ConfigCommand) -> Result<()> {
    match command {
        ConfigCommand::Show => ctx.emit(&ctx.config, || format!("{:#?}", ctx.config)),
        ConfigCommand::Path => {
            println!("{}", ctx.paths.config_file.display());
            Ok(())
        }
        ConfigCommand::Schema => {
            println!("{}", generate_schema(REPO_URL)?);
            Ok(())
        }
        ConfigCommand::Example => {
            print!("{}", generate_example_config()?);
            Ok(())
        }
        ConfigCommand::Reset => {
            if ctx.common.dry_run {
                info!(
                    "dry-run: would reset config at {}",
                    ctx.paths.config_file.display()
                );
                return Ok(());
            }
            write_default_config(&ctx.paths.config_file)
        }
    }
}

fn handle_completions(shell: Shell) -> Result<()> {
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, APP_NAME, &mut io::stdout());
    Ok(())
}

fn format_paths(profile: &str, paths: &PathSet) -> String {
    let cmake = &paths.cmake;
    let mut out = String::new();
    let _ = writeln!(out, "profile:     {profile}");
    let _ = writeln!(out, "component:   {}", paths.component);
    let _ = writeln!(out, "header:      {}", paths.header.display());
    let _ = writeln!(out, "source:      {}", paths.source.display());
    let _ = writeln!(out, "test:        {}", paths.test.display());
    let _ = writeln!(out, "cmake file:  {}", cmake.file.display());
    let _ = writeln!(
        out,
        "  {} += {}",
        cmake.source_var,
        cmake.source_path.display()
    );
    let _ = writeln!(out, "test cmake:  {}", cmake.test_file.display());
    let _ = writeln!(out, "  {} += {}", cmake.test_var, cmake.test_path.display());
    if let Some(suite) = &cmake.test_suite {
        let _ = writeln!(out, "test suite:  {}", suite.display());
    }
    out
}

fn format_replacements(map: &ReplacementMap) -> String {
    let mut out = String::new();
    for (key, value) in map.iter() {
        let text = value.to_string();
        if text.contains('\n') {
            let _ = writeln!(out, "{key}:");
            for line in text.lines() {
                let _ = writeln!(out, "    {line}");
            }
        } else {
            let _ = writeln!(out, "{key}: {text}");
        }
    }
    out
}
