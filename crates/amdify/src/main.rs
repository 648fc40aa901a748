use std::{io, path::PathBuf, process::ExitCode};

use amdify::{
    config::{Config, ConvertOptions, ConvertSettings, Mode},
    orchestrator::{ConversionOutput, Converter},
    output::{OutputTarget, write_file, write_modules, write_stream},
};
use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use log::{LevelFilter, error, info};

#[derive(Parser, Debug)]
#[command(name = "amdify")]
#[command(about = "Convert CommonJS modules into AMD define()/require() wrappers")]
#[command(version)]
struct Cli {
    /// Input file path
    #[arg(value_name = "INPUT")]
    input_arg: Option<PathBuf>,

    /// Input file path (overrides the positional argument)
    #[arg(short, long, value_name = "PATH")]
    input: Option<PathBuf>,

    /// Output file path, or output directory with --recursive
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Root path for resolving module names, defaults to the current directory
    #[arg(short, long, value_name = "PATH")]
    root: Option<PathBuf>,

    /// Module name in define(), or global export variable name
    #[arg(short, long)]
    name: Option<String>,

    /// Convert the file and all of its dependencies
    #[arg(short = 'R', long)]
    recursive: bool,

    /// Write to stdout
    #[arg(short, long)]
    stdout: bool,

    /// Bundle all dependencies into a single file
    #[arg(short, long)]
    bundle: bool,

    /// Use require() instead of define() for the input module
    #[arg(long)]
    require: bool,

    /// Export module.exports as a global variable (needs --name)
    #[arg(short, long)]
    global: bool,

    /// Print the input's dependencies and exit
    #[arg(short, long)]
    dependencies: bool,

    /// Name package main entries by their package name
    #[arg(long)]
    short_names: bool,

    /// Leave the runtime loader out of the bundle
    #[arg(long)]
    no_require_shim: bool,

    /// Leave the input module's own code out of the bundle
    #[arg(long)]
    no_define_self: bool,

    /// Extra config file, applied after the user and project config
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Don't log warnings and errors
    #[arg(long)]
    silent: bool,

    /// Increase verbosity (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn log_level(&self) -> LevelFilter {
        if self.silent {
            return LevelFilter::Off;
        }
        match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }

    fn into_options(self) -> ConvertOptions {
        ConvertOptions {
            input: self.input.or(self.input_arg),
            root: self.root,
            output: self.output,
            stdout: self.stdout,
            name: self.name,
            require: self.require,
            recursive: self.recursive,
            bundle: self.bundle,
            global: self.global,
            dependencies: self.dependencies,
            short_names: self.short_names,
            no_require_shim: self.no_require_shim,
            no_define_self: self.no_define_self,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.log_level())
        .parse_env("RUST_LOG")
        .format_timestamp(None)
        .format_target(false)
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref())?;
    let options = cli.into_options();
    options.warn_ignored();

    let cwd = std::env::current_dir().context("Can't determine the current directory")?;
    let settings = options.validate(&config, &cwd)?;
    let converter = Converter::new(&settings)?;

    match &settings.mode {
        Mode::ListDependencies => list_dependencies(&converter),
        Mode::Convert(target) => convert(&converter, &settings, target),
    }
}

fn list_dependencies(converter: &Converter) -> Result<()> {
    let listing = converter
        .dependencies()?
        .iter()
        .map(|dep| format!("{} -> {}", dep.original_path, dep.resolved_path))
        .collect::<Vec<_>>();
    if !listing.is_empty() {
        write_stream(&mut io::stdout().lock(), &listing.join("\n"))?;
    }
    Ok(())
}

fn convert(converter: &Converter, settings: &ConvertSettings, target: &OutputTarget) -> Result<()> {
    match (converter.convert()?, target) {
        (ConversionOutput::Modules { table, .. }, OutputTarget::Directory(dir)) => {
            write_modules(dir, &table)?;
        }
        (ConversionOutput::Bundle { entry, code }, OutputTarget::File(path)) => {
            write_file(path, &code)?;
            info!("Bundle {entry} -> {}", path.display());
        }
        (ConversionOutput::Module(code), OutputTarget::File(path)) => {
            write_file(path, &code)?;
            info!("Convert {} -> {}", settings.input.display(), path.display());
        }
        (
            ConversionOutput::Module(code) | ConversionOutput::Bundle { code, .. },
            OutputTarget::Stdout,
        ) => {
            write_stream(&mut io::stdout().lock(), &code)?;
        }
        (output, target) => {
            anyhow::bail!("Unsupported output {target:?} for {}", describe(&output));
        }
    }
    Ok(())
}

fn describe(output: &ConversionOutput) -> &'static str {
    match output {
        ConversionOutput::Module(_) => "a single module",
        ConversionOutput::Modules { .. } => "a module table",
        ConversionOutput::Bundle { .. } => "a bundle",
    }
}
