//! Parameter validation for values forwarded to the image model.

/// Aspect ratios accepted by the Gemini image models.
pub const SUPPORTED_ASPECT_RATIOS: &[&str] =
    &["1:1", "2:3", "3:2", "3:4", "4:3", "4:5", "5:4", "9:16", "16:9", "21:9"];

/// Validate that an aspect ratio is supported by the image model.
///
/// # Errors
///
/// Returns an error if the ratio is not recognized.
pub fn validate_aspect_ratio(ratio: &str) -> Result<(), String> {
    if SUPPORTED_ASPECT_RATIOS.contains(&ratio) {
        Ok(())
    } else {
        Err(format!("Unsupported aspect ratio '{ratio}'. Valid: {SUPPORTED_ASPECT_RATIOS:?}"))
    }
}

/// Get the file extension for an image MIME type.
#[must_use]
pub fn extension_for_mime(mime: &str) -> &'static str {
    match mime {
        "image/png" => "png",
        "image/webp" => "webp",
        // jpeg and anything unrecognised
        _ => "jpg",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_aspect_ratio_valid() {
        assert!(validate_aspect_ratio("1:1").is_ok());
        assert!(validate_aspect_ratio("3:4").is_ok());
        assert!(validate_aspect_ratio("21:9").is_ok());
    }

    #[test]
    fn validate_aspect_ratio_invalid() {
        let err = validate_aspect_ratio("35:45").unwrap_err();
        assert!(err.contains("Unsupported aspect ratio"));
    }

    #[test]
    fn extension_mapping() {
        assert_eq!(extension_for_mime("image/jpeg"), "jpg");
        assert_eq!(extension_for_mime("image/png"), "png");
        assert_eq!(extension_for_mime("image/webp"), "webp");
        assert_eq!(extension_for_mime("application/octet-stream"), "jpg");
    }
}
