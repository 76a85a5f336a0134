use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use ogem_pricing::OutputFormat;

/// Ogem maintenance tools
#[derive(Debug, Parser)]
#[command(name = "ogem-tools", about = "Code generation and pricing tools for the Ogem proxy")]
pub struct Args {
    /// Path to an optional configuration file
    #[arg(short, long, global = true, env = "OGEM_TOOLS_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate Vertex AI providers from Studio providers
    VertexGen(GenerateArgs),
    /// Generate Vertex-hosted Claude providers from Claude providers
    VclaudeGen(GenerateArgs),
    /// Scrape model pricing from provider websites
    ScrapePricing(ScrapeArgs),
}

#[derive(Debug, ClapArgs)]
pub struct GenerateArgs {
    /// Source files
    #[arg(long, num_args = 1.., required = true)]
    pub srcs: Vec<PathBuf>,

    /// Output files, one per source
    #[arg(long, num_args = 1.., required = true)]
    pub outs: Vec<PathBuf>,
}

#[derive(Debug, ClapArgs)]
pub struct ScrapeArgs {
    /// Provider to scrape
    #[arg(long, value_enum, default_value_t = ProviderArg::All)]
    pub provider: ProviderArg,

    /// Output format
    #[arg(long, value_enum, default_value_t = FormatArg::Json)]
    pub output: FormatArg,

    /// Write the output to this file instead of stdout
    #[arg(long)]
    pub file: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ProviderArg {
    Openai,
    Anthropic,
    Google,
    Azure,
    All,
}

impl ProviderArg {
    /// Provider key, or `None` for all providers
    pub const fn key(self) -> Option<&'static str> {
        match self {
            Self::Openai => Some("openai"),
            Self::Anthropic => Some("anthropic"),
            Self::Google => Some("google"),
            Self::Azure => Some("azure"),
            Self::All => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Json,
    Yaml,
    Go,
}

impl From<FormatArg> for OutputFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Json => Self::Json,
            FormatArg::Yaml => Self::Yaml,
            FormatArg::Go => Self::Go,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generator_takes_path_lists() {
        let args = Args::try_parse_from(["ogem-tools", "vertex-gen", "--srcs", "a.go", "b.go", "--outs", "c.go", "d.go"]).unwrap();

        let Command::VertexGen(files) = args.command else {
            panic!("expected vertex-gen");
        };
        assert_eq!(files.srcs, [PathBuf::from("a.go"), PathBuf::from("b.go")]);
        assert_eq!(files.outs.len(), 2);
    }

    #[test]
    fn generator_requires_both_lists() {
        assert!(Args::try_parse_from(["ogem-tools", "vclaude-gen", "--srcs", "a.go"]).is_err());
    }

    #[test]
    fn scrape_defaults() {
        let args = Args::try_parse_from(["ogem-tools", "scrape-pricing"]).unwrap();

        let Command::ScrapePricing(scrape) = args.command else {
            panic!("expected scrape-pricing");
        };
        assert_eq!(scrape.provider, ProviderArg::All);
        assert_eq!(scrape.output, FormatArg::Json);
        assert_eq!(scrape.file, None);
    }

    #[test]
    fn scrape_options() {
        let args = Args::try_parse_from([
            "ogem-tools",
            "scrape-pricing",
            "--provider",
            "google",
            "--output",
            "go",
            "--file",
            "pricing.go",
            "--config",
            "tools.toml",
        ])
        .unwrap();

        assert_eq!(args.config, Some(PathBuf::from("tools.toml")));
        let Command::ScrapePricing(scrape) = args.command else {
            panic!("expected scrape-pricing");
        };
        assert_eq!(scrape.provider.key(), Some("google"));
        assert_eq!(OutputFormat::from(scrape.output), OutputFormat::Go);
    }

    #[test]
    fn unknown_provider_is_rejected() {
        assert!(Args::try_parse_from(["ogem-tools", "scrape-pricing", "--provider", "mistral"]).is_err());
    }
}
