//! Helpful error types for CLI commands
//!
//! Every error carries what went wrong, optional context, and suggestions
//! for fixing it.

use std::fmt;
use std::path::Path;

/// An error with helpful context and suggestions
#[derive(Debug)]
pub struct HelpfulError {
    /// The main error message
    pub message: String,
    /// Additional context about what was happening
    pub context: Option<String>,
    /// Suggestions for how to fix the error
    pub suggestions: Vec<String>,
}

impl HelpfulError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: None,
            suggestions: Vec::new(),
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    pub fn with_suggestions(mut self, suggestions: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.suggestions.extend(suggestions.into_iter().map(|s| s.into()));
        self
    }

    // === Common error constructors ===

    /// Render root does not exist
    pub fn path_not_found(path: &Path) -> Self {
        Self::new(format!("Path not found: {}", path.display()))
            .with_context("The render root does not exist on the filesystem")
            .with_suggestions([
                format!("TRY: Check that the path exists: ls -la {}", path.display()),
                "TRY: Pass the folder holding the RND_* layer folders".to_string(),
            ])
    }

    /// Render root is a file
    pub fn not_a_directory(path: &Path) -> Self {
        Self::new(format!("Not a directory: {}", path.display()))
            .with_context("The layers command expects the render root directory, not a file")
            .with_suggestion(format!(
                "TRY: Use the parent directory: render-manager layers {}",
                path.parent()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| ".".to_string())
            ))
    }

    /// Scene state file could not be used
    pub fn invalid_scene(path: &Path, reason: &str) -> Self {
        Self::new(format!("Cannot read scene state: {}", path.display()))
            .with_context(reason.to_string())
            .with_suggestions([
                "TRY: Export the scene state as {\"layers\": {\"RND_BG_TECH\": {\"version\": 24}}}".to_string(),
                "TRY: Omit --scene to treat every layer as unloaded".to_string(),
            ])
    }

    /// Config file could not be parsed
    pub fn invalid_config(path: &Path, reason: &str) -> Self {
        Self::new(format!("Invalid configuration: {}", path.display()))
            .with_context(reason.to_string())
            .with_suggestions([
                format!("TRY: Fix or remove {}", path.display()),
                "TRY: render-manager config   # show the resolved settings".to_string(),
            ])
    }

    /// No layer of that name in a snapshot
    pub fn layer_not_found(name: &str, available: &[String]) -> Self {
        let err = Self::new(format!("Render layer not found: {}", name))
            .with_context("The snapshot holds no valid job for this layer");
        if available.is_empty() {
            err.with_suggestion("TRY: render-manager farm collect --seq SEQ --shot SHOT   # refresh the snapshot")
        } else {
            err.with_suggestion(format!("TRY: One of: {}", available.join(", ")))
        }
    }
}

impl fmt::Display for HelpfulError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "ERROR: {}", self.message)?;

        if let Some(ctx) = &self.context {
            writeln!(f, "CONTEXT: {}", ctx)?;
        }

        if !self.suggestions.is_empty() {
            writeln!(f)?;
            for suggestion in &self.suggestions {
                writeln!(f, "  {}", suggestion)?;
            }
        }

        Ok(())
    }
}

impl std::error::Error for HelpfulError {}

/// Print a command failure as a JSON document on stdout.
pub fn print_json_error(err: &anyhow::Error) {
    let payload = match err.downcast_ref::<HelpfulError>() {
        Some(helpful) => serde_json::json!({
            "error": helpful.message,
            "context": helpful.context,
            "suggestions": helpful.suggestions,
        }),
        None => serde_json::json!({
            "error": format!("{:#}", err),
        }),
    };
    match serde_json::to_string_pretty(&payload) {
        Ok(text) => println!("{}", text),
        Err(_) => eprintln!("{:?}", err),
    }
}
