use std::path::PathBuf;

use clap::Parser;

use crate::formatter::{FormatOutcome, Formatter};
use crate::settings::Settings;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// PHP files to fix in place.
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Coding standard passed to the formatter.
    #[arg(long)]
    standard: Option<String>,

    /// Location of the formatter executable.
    #[arg(long)]
    executable_path: Option<String>,

    /// Settings file (JSON5) to load before applying the flags above.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Report which files would change without rewriting them.
    #[arg(long)]
    check: bool,
}

pub fn cli() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut settings = match &cli.config {
        Some(path) => Settings::from_json_str(&std::fs::read_to_string(path)?)?,
        None => Settings::default(),
    };
    if let Some(standard) = cli.standard {
        settings.standard = Some(standard);
    }
    if let Some(executable_path) = cli.executable_path {
        settings.executable_path = executable_path;
        settings.executable_path_windows = None;
    }

    let workspace_root = std::env::current_dir().ok();
    let formatter = Formatter::new(
        settings.resolved_executable_path(workspace_root.as_deref()),
        settings.standard.clone(),
    );

    let mut failed = 0usize;
    let mut dirty = 0usize;
    for file in &cli.files {
        let content = std::fs::read_to_string(file)?;
        match formatter.format(&content) {
            Ok(FormatOutcome::Unchanged) => println!("{}: already clean", file.display()),
            Ok(FormatOutcome::Fixed(fixed)) if fixed == content => {
                println!("{}: already clean", file.display())
            }
            Ok(FormatOutcome::Fixed(fixed)) => {
                dirty += 1;
                if cli.check {
                    println!("{}: would fix", file.display());
                } else {
                    std::fs::write(file, fixed)?;
                    println!("{}: fixed", file.display());
                }
            }
            Err(error) => {
                failed += 1;
                log::error!("cli: failed to format {}: {error:?}", file.display());
                eprintln!("{}: {error}", file.display());
            }
        }
    }

    if failed > 0 {
        anyhow::bail!("{failed} file(s) failed to format");
    }
    if cli.check && dirty > 0 {
        anyhow::bail!("{dirty} file(s) would be fixed");
    }
    Ok(())
}
