use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Map, Value};

use super::message::{Message, ResponseFormat, Tool};

/// Chat completion request builder
///
/// Setters take the builder by value and return it, so a value produced by
/// [`build`](Self::build) never changes afterwards. Only fields that were set
/// are sent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatCompletionRequest {
    pub(crate) model: String,
    pub(crate) messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    n: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stream: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stop: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    presence_penalty: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    frequency_penalty: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    logit_bias: Option<BTreeMap<String, i32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    user: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    functions: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    function_call: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<Tool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_choice: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    seed: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    logprobs: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_logprobs: Option<u32>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl ChatCompletionRequest {
    pub fn new(model: impl Into<String>, messages: Vec<Message>) -> Self {
        Self {
            model: model.into(),
            messages,
            max_tokens: None,
            temperature: None,
            top_p: None,
            n: None,
            stream: None,
            stop: None,
            presence_penalty: None,
            frequency_penalty: None,
            logit_bias: None,
            user: None,
            functions: None,
            function_call: None,
            tools: None,
            tool_choice: None,
            response_format: None,
            seed: None,
            logprobs: None,
            top_logprobs: None,
            extra: Map::new(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    #[must_use]
    pub const fn max_tokens(mut self, value: u32) -> Self {
        self.max_tokens = Some(value);
        self
    }

    /// Sampling temperature, 0 to 2
    #[must_use]
    pub const fn temperature(mut self, value: f64) -> Self {
        self.temperature = Some(value);
        self
    }

    #[must_use]
    pub const fn top_p(mut self, value: f64) -> Self {
        self.top_p = Some(value);
        self
    }

    /// Number of completions to generate
    #[must_use]
    pub const fn n(mut self, value: u32) -> Self {
        self.n = Some(value);
        self
    }

    /// Ask for a streamed response
    ///
    /// The resource methods override this with the mode they implement.
    #[must_use]
    pub const fn stream(mut self, value: bool) -> Self {
        self.stream = Some(value);
        self
    }

    /// Stop sequences; always sent as a list
    #[must_use]
    pub fn stop<I, S>(mut self, sequences: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stop = Some(sequences.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub const fn presence_penalty(mut self, value: f64) -> Self {
        self.presence_penalty = Some(value);
        self
    }

    #[must_use]
    pub const fn frequency_penalty(mut self, value: f64) -> Self {
        self.frequency_penalty = Some(value);
        self
    }

    /// Token id to bias, -100 to 100
    #[must_use]
    pub fn logit_bias(mut self, bias: BTreeMap<String, i32>) -> Self {
        self.logit_bias = Some(bias);
        self
    }

    /// End-user identifier for abuse tracking
    #[must_use]
    pub fn user(mut self, value: impl Into<String>) -> Self {
        self.user = Some(value.into());
        self
    }

    /// Legacy function definitions; prefer [`tools`](Self::tools)
    #[must_use]
    pub fn functions(mut self, functions: Vec<Value>) -> Self {
        self.functions = Some(functions);
        self
    }

    /// Legacy function selection; prefer [`tool_choice`](Self::tool_choice)
    #[must_use]
    pub fn function_call(mut self, value: Value) -> Self {
        self.function_call = Some(value);
        self
    }

    #[must_use]
    pub fn tools(mut self, tools: Vec<Tool>) -> Self {
        self.tools = Some(tools);
        self
    }

    /// `"auto"`, `"none"`, or a specific function object
    #[must_use]
    pub fn tool_choice(mut self, value: impl Into<Value>) -> Self {
        self.tool_choice = Some(value.into());
        self
    }

    #[must_use]
    pub const fn response_format(mut self, format: ResponseFormat) -> Self {
        self.response_format = Some(format);
        self
    }

    #[must_use]
    pub const fn seed(mut self, value: i64) -> Self {
        self.seed = Some(value);
        self
    }

    #[must_use]
    pub const fn logprobs(mut self, value: bool) -> Self {
        self.logprobs = Some(value);
        self
    }

    #[must_use]
    pub const fn top_logprobs(mut self, value: u32) -> Self {
        self.top_logprobs = Some(value);
        self
    }

    /// Extra body parameter; overrides a typed field of the same name
    #[must_use]
    pub fn param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// The JSON body as an owned map
    pub fn build(&self) -> Map<String, Value> {
        to_object(self)
    }
}

/// Input of an embeddings request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum EmbeddingInput {
    Text(String),
    Texts(Vec<String>),
    Tokens(Vec<u32>),
    TokenBatches(Vec<Vec<u32>>),
}

impl EmbeddingInput {
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(text) => text.is_empty(),
            Self::Texts(texts) => texts.is_empty(),
            Self::Tokens(tokens) => tokens.is_empty(),
            Self::TokenBatches(batches) => batches.is_empty(),
        }
    }
}

impl From<&str> for EmbeddingInput {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

impl From<String> for EmbeddingInput {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<Vec<String>> for EmbeddingInput {
    fn from(texts: Vec<String>) -> Self {
        Self::Texts(texts)
    }
}

impl From<Vec<&str>> for EmbeddingInput {
    fn from(texts: Vec<&str>) -> Self {
        Self::Texts(texts.into_iter().map(str::to_owned).collect())
    }
}

impl From<Vec<u32>> for EmbeddingInput {
    fn from(tokens: Vec<u32>) -> Self {
        Self::Tokens(tokens)
    }
}

impl From<Vec<Vec<u32>>> for EmbeddingInput {
    fn from(batches: Vec<Vec<u32>>) -> Self {
        Self::TokenBatches(batches)
    }
}

/// Embeddings request builder
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmbeddingRequest {
    pub(crate) model: String,
    pub(crate) input: EmbeddingInput,
    #[serde(skip_serializing_if = "Option::is_none")]
    encoding_format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    dimensions: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    user: Option<String>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl EmbeddingRequest {
    pub fn new(model: impl Into<String>, input: impl Into<EmbeddingInput>) -> Self {
        Self {
            model: model.into(),
            input: input.into(),
            encoding_format: None,
            dimensions: None,
            user: None,
            extra: Map::new(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub const fn input(&self) -> &EmbeddingInput {
        &self.input
    }

    /// `float` or `base64`
    #[must_use]
    pub fn encoding_format(mut self, value: impl Into<String>) -> Self {
        self.encoding_format = Some(value.into());
        self
    }

    /// Output dimensions, for models that support shortening
    #[must_use]
    pub const fn dimensions(mut self, value: u32) -> Self {
        self.dimensions = Some(value);
        self
    }

    #[must_use]
    pub fn user(mut self, value: impl Into<String>) -> Self {
        self.user = Some(value.into());
        self
    }

    #[must_use]
    pub fn param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// The JSON body as an owned map
    pub fn build(&self) -> Map<String, Value> {
        to_object(self)
    }
}

fn to_object<T: Serialize>(value: &T) -> Map<String, Value> {
    // Structs with string-keyed maps always serialize to an object.
    let Ok(Value::Object(object)) = serde_json::to_value(value) else {
        unreachable!("request builders serialize to JSON objects");
    };

    object
}
