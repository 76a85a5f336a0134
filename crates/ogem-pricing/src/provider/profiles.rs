use super::{FallbackPrice, ProviderProfile};

const fn price(model: &'static str, input: f64, output: f64) -> FallbackPrice {
    FallbackPrice {
        model,
        input,
        output,
        reasoning: None,
    }
}

const fn reasoning(model: &'static str, input: f64, output: f64, reasoning: f64) -> FallbackPrice {
    FallbackPrice {
        model,
        input,
        output,
        reasoning: Some(reasoning),
    }
}

pub const OPENAI: ProviderProfile = ProviderProfile {
    key: "openai",
    provider: "openai",
    url: "https://openai.com/api/pricing/",
    keywords: &["gpt-4o", "gpt-4", "gpt-3.5", "o1", "o3"],
    fallback_source: "openai_fallback",
    fallback: &[
        price("gpt-4o", 2.5, 10.0),
        price("gpt-4o-mini", 0.15, 0.6),
        price("gpt-4-turbo", 10.0, 30.0),
        price("gpt-4", 30.0, 60.0),
        price("gpt-3.5-turbo", 0.5, 1.5),
        price("o1-preview", 15.0, 60.0),
        price("o1-mini", 3.0, 12.0),
    ],
};

pub const ANTHROPIC: ProviderProfile = ProviderProfile {
    key: "anthropic",
    provider: "anthropic",
    url: "https://www.anthropic.com/pricing",
    keywords: &["claude"],
    fallback_source: "anthropic_api",
    fallback: &[
        price("claude-3-5-sonnet", 3.0, 15.0),
        price("claude-3-5-haiku", 0.8, 4.0),
        price("claude-3-opus", 15.0, 75.0),
        price("claude-3-sonnet", 3.0, 15.0),
        price("claude-3-haiku", 0.25, 1.25),
    ],
};

pub const GOOGLE: ProviderProfile = ProviderProfile {
    key: "google",
    provider: "google_cloud",
    url: "https://cloud.google.com/vertex-ai/generative-ai/pricing",
    keywords: &["gemini"],
    fallback_source: "vertex_ai",
    fallback: &[
        reasoning("gemini-2.5-pro", 1.25, 5.0, 10.0),
        reasoning("gemini-2.5-flash", 0.075, 0.3, 1.5),
        reasoning("gemini-2.5-flash-8b", 0.0375, 0.15, 0.75),
        price("gemini-1.5-pro", 1.25, 5.0),
        price("gemini-1.5-flash", 0.075, 0.3),
    ],
};

pub const AZURE: ProviderProfile = ProviderProfile {
    key: "azure",
    provider: "azure",
    url: "https://azure.microsoft.com/en-us/pricing/details/cognitive-services/openai-service/",
    keywords: &["gpt"],
    fallback_source: "azure_openai",
    fallback: &[
        price("azure-gpt-4o", 5.0, 15.0),
        price("azure-gpt-4o-mini", 0.165, 0.66),
        price("azure-gpt-4-turbo", 10.0, 30.0),
        price("azure-gpt-4", 30.0, 60.0),
        price("azure-gpt-35-turbo", 0.5, 1.5),
    ],
};

/// Built-in providers, in the order `all` scrapes them
pub const DEFAULTS: [&ProviderProfile; 4] = [&OPENAI, &ANTHROPIC, &GOOGLE, &AZURE];
