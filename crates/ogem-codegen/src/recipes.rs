//! Substitution tables for the Vertex AI hosted providers
//!
//! Step order matters. Both tables rewrite the constructor signature twice: the
//! first step targets the full declaration line and the second catches any
//! remaining bare signature, so collapsing them changes the output.

use crate::recipe::{Recipe, Substitution};

/// Gemini Studio provider to Gemini on Vertex AI
pub const VERTEX: Recipe = Recipe {
    name: "vertex",
    description: "Generate Vertex AI files from Studio AI files",
    substitutions: &[
        Substitution::new("package studio", "package vertex"),
        Substitution::new("\n\t\"google.golang.org/api/option\"", ""),
        Substitution::new(
            "\n\n// A unique identifier for the Gemini Studio provider\nconst REGION = \"studio\"",
            "",
        ),
        Substitution::new(
            "type Endpoint struct {\n\tclient *genai.Client\n}",
            "type Endpoint struct {\n\tclient *genai.Client\n\tregion string\n}",
        ),
        Substitution::new(
            "func NewEndpoint(apiKey string) (*Endpoint, error) {",
            "func NewEndpoint(projectId string, region string) (*Endpoint, error) {",
        ),
        Substitution::new(
            "func NewEndpoint(apiKey string)",
            "func NewEndpoint(projectId string, region string)",
        ),
        Substitution::new(
            "&genai.ClientConfig{\n\t\tAPIKey: apiKey,\n\t\tBackend: genai.BackendGeminiAPI,\n\t}",
            "&genai.ClientConfig{\n\t\tProject: projectId,\n\t\tLocation: region,\n\t\tBackend: genai.BackendVertexAI,\n\t}",
        ),
        Substitution::new(
            "return &Endpoint{client: client}, nil",
            "return &Endpoint{client: client, region: region}, nil",
        ),
        Substitution::new("return \"studio\"", "return \"vertex\""),
        Substitution::new(
            "func (ep *Endpoint) Region() string {\n\treturn REGION\n}",
            "func (ep *Endpoint) Region() string {\n\treturn ep.region\n}",
        ),
    ],
};

/// Anthropic Claude provider to Claude on Vertex AI
pub const VCLAUDE: Recipe = Recipe {
    name: "vclaude",
    description: "Generate Vertex AI Claude files from Claude files",
    substitutions: &[
        Substitution::new("package claude", "package vclaude"),
        Substitution::new(
            "\"github.com/anthropics/anthropic-sdk-go/option\"",
            "\"github.com/anthropics/anthropic-sdk-go/vertex\"",
        ),
        Substitution::new(
            "\n\n// A unique identifier for the Claude provider\nconst REGION = \"claude\"",
            "",
        ),
        Substitution::new(
            "type Endpoint struct {\n\tclient *anthropic.Client\n}",
            "type Endpoint struct {\n\tclient *anthropic.Client\n\tregion string\n}",
        ),
        Substitution::new(
            "func NewEndpoint(apiKey string) (*Endpoint, error) {",
            "func NewEndpoint(projectId string, region string) (*Endpoint, error) {",
        ),
        Substitution::new(
            "anthropic.NewClient(option.WithAPIKey(apiKey))",
            "anthropic.NewClient(vertex.WithGoogleAuth(context.Background(), region, projectId))",
        ),
        Substitution::new(
            "return &Endpoint{client: client}, nil",
            "return &Endpoint{client: client, region: region}, nil",
        ),
        Substitution::new(
            "Model:     anthropic.F(anthropic.ModelClaude_3_Haiku_20240307),",
            "Model:     anthropic.F(\"claude-3-haiku@20240307\"),",
        ),
        Substitution::new("return \"claude\"", "return \"vclaude\""),
        Substitution::new(
            "func (ep *Endpoint) Region() string {\n\treturn REGION\n}",
            "func (ep *Endpoint) Region() string {\n\treturn ep.region\n}",
        ),
        Substitution::new("claude-3-5-sonnet-20240620", "claude-3-5-sonnet@20240620"),
        Substitution::new("claude-3-opus-20240229", "claude-3-opus@20240229"),
        Substitution::new("claude-3-sonnet-20240229", "claude-3-sonnet@20240229"),
        Substitution::new("claude-3-haiku-20240307", "claude-3-haiku@20240307"),
    ],
};

/// All known recipes, looked up by generated provider name
pub const ALL: &[Recipe] = &[VERTEX, VCLAUDE];

/// Find a recipe by the name of the provider it generates
pub fn find(name: &str) -> Option<&'static Recipe> {
    ALL.iter().find(|recipe| recipe.name == name)
}
