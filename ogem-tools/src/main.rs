#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod args;

use anyhow::Context;
use args::{Args, Command, GenerateArgs, ScrapeArgs};
use clap::Parser;
use ogem_codegen::{Recipe, process_files, recipes};
use ogem_config::Config;
use ogem_pricing::{Aggregator, ScrapeSettings, render};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = Config::load_optional(args.config.as_deref())?;

    ogem_telemetry::init(&config.log)?;

    match args.command {
        Command::VertexGen(files) => generate(&recipes::VERTEX, &files),
        Command::VclaudeGen(files) => generate(&recipes::VCLAUDE, &files),
        Command::ScrapePricing(scrape) => scrape_pricing(&config, scrape).await,
    }
}

fn generate(recipe: &Recipe, files: &GenerateArgs) -> anyhow::Result<()> {
    tracing::info!(recipe = recipe.name, files = files.srcs.len(), "{}", recipe.description);

    let written = process_files(recipe, &files.srcs, &files.outs)
        .with_context(|| format!("{} generation failed", recipe.name))?;

    tracing::info!(recipe = recipe.name, count = written.len(), "generation complete");
    Ok(())
}

async fn scrape_pricing(config: &Config, scrape: ScrapeArgs) -> anyhow::Result<()> {
    let settings = ScrapeSettings::from_config(&config.pricing)?;
    let aggregator = Aggregator::new(&settings).context("failed to set up provider scrapers")?;

    let keys: Vec<String> = match scrape.provider.key() {
        Some(key) => vec![key.to_owned()],
        None => aggregator.keys().map(str::to_owned).collect(),
    };

    tracing::info!(providers = ?keys, "scraping pricing");

    let report = aggregator.scrape_all(&keys).await;
    let rendered = render(&report, scrape.output.into()).context("failed to render pricing report")?;

    match scrape.file {
        Some(path) => {
            std::fs::write(&path, rendered).with_context(|| format!("failed to write {}", path.display()))?;
            tracing::info!(path = %path.display(), "pricing data saved");
        }
        None => println!("{rendered}"),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn files(srcs: &[PathBuf], outs: &[PathBuf]) -> GenerateArgs {
        GenerateArgs {
            srcs: srcs.to_vec(),
            outs: outs.to_vec(),
        }
    }

    #[test]
    fn vertex_gen_writes_each_output() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("studio.go");
        let output = dir.path().join("vertex.go");
        std::fs::write(&source, "package studio\r\n\r\nfunc (e *Endpoint) Region() string {\r\n\treturn \"studio\"\r\n}\r\n").unwrap();

        generate(&recipes::VERTEX, &files(&[source], &[output.clone()])).unwrap();

        let generated = std::fs::read_to_string(&output).unwrap();
        assert!(generated.starts_with(ogem_codegen::GENERATED_BANNER));
        assert!(generated.contains("package vertex\n"));
        assert!(!generated.contains('\r'));
    }

    #[test]
    fn vclaude_gen_rejects_mismatched_lists() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("vclaude.go");

        let err = generate(
            &recipes::VCLAUDE,
            &files(&[dir.path().join("a.go"), dir.path().join("b.go")], &[output.clone()]),
        )
        .unwrap_err();

        assert!(format!("{err:#}").contains("vclaude generation failed"));
        assert!(!output.exists());
    }

    #[test]
    fn missing_source_fails_with_path() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.go");

        let err = generate(&recipes::VERTEX, &files(&[missing], &[dir.path().join("out.go")])).unwrap_err();

        assert!(format!("{err:#}").contains("missing.go"));
    }
}
