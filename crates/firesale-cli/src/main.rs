#![forbid(unsafe_code)]

use std::{
    io::{Read as _, Write as _},
    path::{Path, PathBuf},
};

use anyhow::Context;
use clap::{Parser, Subcommand};
use firesale_core::{disk, markdown};

#[derive(Parser)]
#[command(
    name = "firesale-cli",
    about = "Render markdown the way Fire Sale's \"Save as HTML\" does",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render markdown to an HTML fragment.
    Html {
        /// Path to a markdown file. Use `-` to read from stdin.
        path: PathBuf,
        /// Write the HTML here instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn read_source(path: &Path) -> anyhow::Result<String> {
    if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read markdown from stdin")?;
        return Ok(buf);
    }

    disk::read_text(path)
        .with_context(|| format!("failed to read markdown from {}", path.display()))
}

fn render(path: &Path, output: Option<&Path>) -> anyhow::Result<()> {
    let source = read_source(path)?;
    let html = markdown::to_html(&source);

    match output {
        Some(output) => {
            disk::write_text(output, &html)
                .with_context(|| format!("failed to write html to {}", output.display()))?;
            log::info!("wrote {} bytes to {}", html.len(), output.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(html.as_bytes())
                .context("failed to write html to stdout")?;
        }
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    match cli.command {
        Command::Html { path, output } => render(&path, output.as_deref()),
    }
}
