use std::borrow::Cow;

/// Banner prepended to every generated file
pub const GENERATED_BANNER: &str = "// This file is auto-generated. Do not edit manually.\n\n";

/// A single literal find/replace step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Substitution {
    /// Exact text to look for
    pub from: &'static str,
    /// Replacement text
    pub to: &'static str,
}

impl Substitution {
    /// Create a substitution step
    pub const fn new(from: &'static str, to: &'static str) -> Self {
        Self { from, to }
    }
}

/// An ordered substitution list that turns one provider into its variant
#[derive(Debug, Clone, Copy)]
pub struct Recipe {
    /// Name of the generated provider
    pub name: &'static str,
    /// Human-readable summary used in CLI help
    pub description: &'static str,
    /// Steps applied in order
    pub substitutions: &'static [Substitution],
}

impl Recipe {
    /// Transform provider source text into the variant
    ///
    /// Steps run one after another over the output of the previous step, so a
    /// later pattern can match text that only exists because of an earlier
    /// replacement.
    ///
    /// Line endings are normalized to `\n` first; every multi-line pattern is
    /// written with bare newlines.
    pub fn apply(&self, content: &str) -> String {
        let mut output = String::with_capacity(GENERATED_BANNER.len() + content.len());
        output.push_str(GENERATED_BANNER);
        output.push_str(&normalize_newlines(content));

        self.substitutions.iter().fold(output, |text, step| {
            if text.contains(step.from) {
                text.replace(step.from, step.to)
            } else {
                text
            }
        })
    }
}

/// Convert `\r\n` and lone `\r` line endings to `\n`
fn normalize_newlines(content: &str) -> Cow<'_, str> {
    if content.contains('\r') {
        Cow::Owned(content.replace("\r\n", "\n").replace('\r', "\n"))
    } else {
        Cow::Borrowed(content)
    }
}
