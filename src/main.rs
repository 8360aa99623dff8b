use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use verstamp::{
    Config, VersionInfo,
    cli::{
        Cli, Commands, ConfigCommands,
        generate::{self, Generated},
    },
    core::header::CppOptions,
    core::output::{self, WriteOutcome},
};

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    match cli.command {
        Commands::Render {
            project,
            namespace,
            version_number,
            hash,
            modified,
            format,
            version_type,
            version_include,
            template,
            output,
        } => {
            let info = VersionInfo {
                project,
                namespace,
                version: version_number,
                hash,
                modified,
            };
            let cpp = CppOptions {
                version_type,
                version_include,
            };
            let rendered = generate::render_explicit(&info, format, template.as_deref(), &cpp)?;

            match output {
                Some(path) => {
                    if output::write_if_changed(&path, &rendered)? == WriteOutcome::Unchanged {
                        tracing::info!(path = %path.display(), "already up to date");
                    }
                }
                None => print!("{rendered}"),
            }
        }

        Commands::Generate {
            config,
            output,
            check,
        } => {
            let config = Config::load(config.as_deref())?;
            let info = config.resolve()?;

            match generate::generate(&config, &info, output.as_deref(), check)? {
                Generated::Stdout(text) => print!("{text}"),
                Generated::File { path, outcome } => {
                    tracing::debug!(path = %path.display(), ?outcome, "generate finished");
                }
                Generated::UpToDate(path) => {
                    tracing::info!(path = %path.display(), "up to date");
                }
                Generated::Stale(path) => {
                    eprintln!("{} is out of date", path.display());
                    return Ok(ExitCode::FAILURE);
                }
            }
        }

        Commands::Show { config, format } => {
            let config = Config::load(config.as_deref())?;
            let info = config.resolve()?;

            if format == "json" {
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("project:   {}", info.project);
                println!("namespace: {}", info.namespace);
                println!("version:   {}", info.version);
                println!("hash:      {}", info.hash);
                println!("modified:  {}", info.modified);
            }
        }

        Commands::Placeholders { template } => {
            let template = generate::read_template(&template)?;
            for name in template.placeholders() {
                println!("{name}");
            }
        }

        Commands::Config { command } => match command {
            ConfigCommands::Show { config } => {
                let config = Config::load(config.as_deref())?;
                println!("{}", toml::to_string_pretty(&config)?);
            }
            ConfigCommands::Path => {
                println!("{}", Config::config_path()?.display());
            }
        },
    }

    Ok(ExitCode::SUCCESS)
}
