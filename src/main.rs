#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::style)]

use anyhow::{Context, Result};
use clap::Parser;
use proxyline::cli::Args;
use proxyline::{Proxy, ProxyRegistry};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tracing::Level;

#[tokio::main]
async fn main() {
    let args = Args::parse();
    let is_verbose = args.verbose;
    tracing_subscriber::fmt()
        .with_max_level(if is_verbose {
            Level::TRACE
        } else {
            Level::INFO
        })
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(args).await {
        tracing::error!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<()> {
    let content = read_input(&args.input).await?;
    let registry = ProxyRegistry::with_builtin_parsers();

    let proxies = if args.strict {
        decode_strict(&registry, &content)?
    } else {
        registry.parse_lines_lossy(&content)
    };
    tracing::info!("Decoded {} proxies", proxies.len());

    let json = if args.pretty {
        serde_json::to_string_pretty(&proxies)
    } else {
        serde_json::to_string(&proxies)
    }
    .context("Failed to serialize proxies to JSON")?;

    write_output(args.output.as_deref(), &json).await
}

fn decode_strict(registry: &ProxyRegistry, content: &str) -> Result<Vec<Proxy>> {
    content
        .lines()
        .enumerate()
        .map(|(index, line)| (index + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
        .map(|(number, line)| {
            registry
                .parse_line(line)
                .with_context(|| format!("Failed to decode line {}", number))
        })
        .collect()
}

async fn read_input(input: &str) -> Result<String> {
    if input == "-" {
        tracing::info!("Reading proxy list from stdin");
        let mut content = String::new();
        tokio::io::stdin()
            .read_to_string(&mut content)
            .await
            .context("Failed to read proxy list from stdin")?;
        return Ok(content);
    }

    tracing::info!("Reading proxy list from: {}", input);
    tokio::fs::read_to_string(input)
        .await
        .with_context(|| format!("Failed to read proxy list from {}", input))
}

async fn write_output(output: Option<&str>, json: &str) -> Result<()> {
    match output {
        Some(path) => {
            if let Some(parent) = std::path::Path::new(path).parent()
                && !parent.as_os_str().is_empty()
            {
                tokio::fs::create_dir_all(parent)
                    .await
                    .with_context(|| format!("Failed to create output directory {:?}", parent))?;
            }
            tokio::fs::write(path, json)
                .await
                .with_context(|| format!("Failed to write proxies to {}", path))?;
            tracing::info!("Proxies written to {}", path);
        }
        None => {
            let mut stdout = tokio::io::stdout();
            stdout
                .write_all(json.as_bytes())
                .await
                .context("Failed to write proxies to stdout")?;
            stdout.write_all(b"\n").await?;
            stdout.flush().await?;
        }
    }
    Ok(())
}
