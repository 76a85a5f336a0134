use std::fmt::{self, Write as _};
use std::str::FromStr;

use crate::error::{PricingError, Result};
use crate::types::PricingReport;

/// Output format of a pricing report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Pretty-printed JSON
    Json,
    /// YAML document
    Yaml,
    /// Go `map[string]ModelPricing` literal
    Go,
}

impl FromStr for OutputFormat {
    type Err = PricingError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "json" => Ok(Self::Json),
            "yaml" => Ok(Self::Yaml),
            "go" => Ok(Self::Go),
            other => Err(PricingError::UnsupportedFormat(other.to_owned())),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Json => "json",
            Self::Yaml => "yaml",
            Self::Go => "go",
        };

        f.write_str(name)
    }
}

/// Render a report in the requested format
pub fn render(report: &PricingReport, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
        OutputFormat::Yaml => Ok(serde_yaml::to_string(report)?),
        OutputFormat::Go => Ok(render_go(report)),
    }
}

fn render_go(report: &PricingReport) -> String {
    let mut lines = vec![
        "// Auto-generated pricing data".to_owned(),
        format!("// Generated at: {}", report.scraped_at),
        String::new(),
        "var modelPricing = map[string]ModelPricing{".to_owned(),
    ];

    for (name, entry) in &report.providers {
        let Some(models) = entry.models() else {
            continue;
        };

        lines.push(format!("\t// {} Models", name.to_uppercase()));

        for (model, price) in models {
            let mut block = String::new();
            let _ = writeln!(block, "\t\"{model}\": {{");
            let _ = writeln!(block, "\t\tInputTokenPrice:    {:.3},", price.input_price_per_1m);
            let _ = writeln!(block, "\t\tOutputTokenPrice:   {:.3},", price.output_price_per_1m);

            if let Some(reasoning) = price.reasoning_price_per_1m.filter(|r| *r > 0.0) {
                let _ = writeln!(block, "\t\tReasoningTokenPrice: {reasoning:.3},");
            }

            block.push_str("\t},");
            lines.push(block);
        }

        lines.push(String::new());
    }

    lines.push("}".to_owned());
    lines.join("\n")
}
