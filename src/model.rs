//! Model name resolution.

/// Short name aliases for the models this tool talks to.
const ALIASES: &[(&str, &str)] = &[
    ("nano-banana", "gemini-2.5-flash-image"),
    ("nano-banana-pro", "gemini-3-pro-image-preview"),
    ("flash", "gemini-2.5-flash"),
    ("pro", "gemini-2.5-pro"),
];

/// Resolve a model name (alias or exact) to the full model identifier.
#[must_use]
pub fn resolve_model(name: &str) -> String {
    for &(alias, full) in ALIASES {
        if name == alias {
            return full.to_string();
        }
    }
    name.to_string()
}

/// Resolve a configured model name and check that it is a Gemini model.
///
/// # Errors
///
/// Returns an error if the resolved name is not a `gemini-*` model.
pub fn resolve_gemini_model(name: &str) -> Result<String, String> {
    let resolved = resolve_model(name);
    if resolved.starts_with("gemini") {
        Ok(resolved)
    } else {
        Err(format!("Unsupported model '{name}'. Expected a 'gemini-*' model or an alias."))
    }
}
