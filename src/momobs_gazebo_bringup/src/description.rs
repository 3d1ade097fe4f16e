//! Robot description loading
//!
//! The description template is expanded by an external processor (normally
//! `xacro`), checked for well-formedness and stripped of XML comments before
//! it is embedded as a node parameter.

use crate::error::{LaunchError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::{
    path::{Path, PathBuf},
    process::Command,
};

/// Non-greedy, multi-line `<!-- ... -->` match
static COMMENT_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<!--(.*?)-->").expect("comment pattern is valid"));

/// Remove every `<!-- ... -->` region, leaving all other bytes untouched
pub fn strip_comments(text: &str) -> String {
    COMMENT_PATTERN.replace_all(text, "").into_owned()
}

/// Expands a description template into markup text
pub trait TemplateProcessor {
    fn process(&self, path: &Path) -> Result<String>;
}

/// Runs an external `xacro` executable and captures its output
#[derive(Debug, Clone)]
pub struct XacroCommand {
    program: PathBuf,
}

impl XacroCommand {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl TemplateProcessor for XacroCommand {
    fn process(&self, path: &Path) -> Result<String> {
        log::debug!(
            "Expanding {} with {}",
            path.display(),
            self.program.display()
        );

        let output = Command::new(&self.program)
            .arg(path)
            .output()
            .map_err(|e| {
                template_error(
                    path,
                    format!("failed to run {}: {}", self.program.display(), e),
                )
            })?;

        if !output.status.success() {
            let mut message = format!("{} exited with {}", self.program.display(), output.status);
            let stderr = String::from_utf8_lossy(&output.stderr);
            if !stderr.trim().is_empty() {
                message.push_str(": ");
                message.push_str(stderr.trim());
            }
            return Err(template_error(path, message));
        }

        String::from_utf8(output.stdout)
            .map_err(|e| template_error(path, format!("output is not UTF-8: {}", e)))
    }
}

/// Reads the template verbatim, for descriptions that need no macro expansion
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTemplate;

impl TemplateProcessor for PlainTemplate {
    fn process(&self, path: &Path) -> Result<String> {
        std::fs::read_to_string(path).map_err(|e| template_error(path, e.to_string()))
    }
}

/// Expanded, validated and comment-free robot description
#[derive(Debug, Clone, PartialEq)]
pub struct DescriptionDocument {
    text: String,
}

impl DescriptionDocument {
    /// Expand `path` with `processor`, then validate and strip comments
    pub fn load(path: &Path, processor: &dyn TemplateProcessor) -> Result<Self> {
        let expanded = processor.process(path)?;
        Self::from_markup(path, &expanded)
    }

    fn from_markup(path: &Path, markup: &str) -> Result<Self> {
        roxmltree::Document::parse(markup).map_err(|e| template_error(path, e.to_string()))?;

        let text = strip_comments(markup);
        log::debug!(
            "Loaded description {} ({} bytes, {} after stripping comments)",
            path.display(),
            markup.len(),
            text.len()
        );
        Ok(Self { text })
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn into_string(self) -> String {
        self.text
    }
}

fn template_error(path: &Path, message: impl Into<String>) -> LaunchError {
    LaunchError::TemplateProcessing {
        path: path.to_path_buf(),
        message: message.into(),
    }
}
