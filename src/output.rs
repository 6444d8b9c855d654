//! Download naming and saving.

use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::media::sniff_mime;
use crate::params::extension_for_mime;

/// Sanitize a string for use in a filename.
///
/// Converts to lowercase, replaces non-alphanumeric chars with hyphens,
/// collapses consecutive hyphens, and trims to max length.
#[must_use]
pub fn sanitize_for_filename(input: &str, max_len: usize) -> String {
    let mut result = String::with_capacity(max_len);
    let mut last_was_hyphen = true; // Prevents leading hyphen

    for ch in input.chars() {
        if result.len() >= max_len {
            break;
        }
        if ch.is_ascii_alphanumeric() {
            result.push(ch.to_ascii_lowercase());
            last_was_hyphen = false;
        } else if !last_was_hyphen {
            result.push('-');
            last_was_hyphen = true;
        }
    }

    while result.ends_with('-') {
        result.pop();
    }

    if result.is_empty() {
        "image".to_string()
    } else {
        result
    }
}

/// Build the download stem `<original-stem>-<feature>-<variant>`.
#[must_use]
pub fn download_stem(source_name: &str, feature: &str, variant: &str) -> String {
    let original = Path::new(source_name)
        .file_stem()
        .map_or_else(String::new, |s| s.to_string_lossy().into_owned());
    format!(
        "{}-{feature}-{}",
        sanitize_for_filename(&original, 50),
        sanitize_for_filename(variant, 40)
    )
}

/// Pick the file extension for image bytes by sniffing magic bytes,
/// falling back to the declared MIME type.
#[must_use]
pub fn extension_for_image(data: &[u8], declared_mime: &str) -> &'static str {
    extension_for_mime(sniff_mime(data).unwrap_or(declared_mime))
}

/// Highest numeric suffix tried before giving up on a free name.
const MAX_COPIES: u32 = 999;

/// Write image bytes into `dir`, creating it if needed.
///
/// Existing files are never replaced: when `name.png` is taken the bytes go
/// to `name-2.png`, then `name-3.png`, and so on.
///
/// # Errors
///
/// Returns an error if the directory or file cannot be written, or if every
/// numbered name is taken.
pub fn save_download(dir: &Path, file_name: &str, data: &[u8]) -> std::io::Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    for copy in 1..=MAX_COPIES {
        let path = dir.join(numbered(file_name, copy));
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(mut file) => {
                file.write_all(data)?;
                return Ok(path);
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {}
            Err(e) => return Err(e),
        }
    }
    Err(std::io::Error::new(
        ErrorKind::AlreadyExists,
        format!("{file_name} and {MAX_COPIES} numbered copies already exist in {}", dir.display()),
    ))
}

/// `name.ext` for the first copy, `name-<copy>.ext` after that.
fn numbered(file_name: &str, copy: u32) -> String {
    if copy == 1 {
        return file_name.to_string();
    }
    match file_name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => format!("{stem}-{copy}.{ext}"),
        _ => format!("{file_name}-{copy}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_basic() {
        assert_eq!(sanitize_for_filename("Hello World", 50), "hello-world");
    }

    #[test]
    fn sanitize_special_chars() {
        assert_eq!(sanitize_for_filename("Schengen Area / EU", 50), "schengen-area-eu");
        assert_eq!(sanitize_for_filename("Minimalist B&W", 50), "minimalist-b-w");
    }

    #[test]
    fn sanitize_truncates() {
        let long = "a".repeat(100);
        assert!(sanitize_for_filename(&long, 10).len() <= 10);
    }

    #[test]
    fn sanitize_empty() {
        assert_eq!(sanitize_for_filename("", 50), "image");
        assert_eq!(sanitize_for_filename("!!!", 50), "image");
    }

    #[test]
    fn download_stem_strips_extension() {
        assert_eq!(
            download_stem("My Selfie.final.JPG", "passport", "United States"),
            "my-selfie-final-passport-united-states"
        );
        assert_eq!(
            download_stem("capture-1700000000000.jpg", "portrait", "Cinematic"),
            "capture-1700000000000-portrait-cinematic"
        );
    }

    #[test]
    fn download_stem_without_name() {
        assert_eq!(download_stem("", "portrait", "Fantasy Art"), "image-portrait-fantasy-art");
    }

    #[test]
    fn extension_from_magic_bytes_wins() {
        let png_magic = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];
        assert_eq!(extension_for_image(&png_magic, "image/jpeg"), "png");
        let jpeg_magic = [0xFF, 0xD8, 0xFF, 0xE0, 0, 0, 0, 0];
        assert_eq!(extension_for_image(&jpeg_magic, "image/png"), "jpg");
    }

    #[test]
    fn extension_falls_back_to_declared_mime() {
        assert_eq!(extension_for_image(b"????", "image/png"), "png");
    }

    #[test]
    fn save_download_creates_directory() {
        let dir = std::env::temp_dir().join("photoforge_output_test").join("nested");
        let _ = std::fs::remove_dir_all(&dir);
        let path = save_download(&dir, "x.png", &[1, 2, 3]).unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), vec![1, 2, 3]);
        let _ = std::fs::remove_dir_all(dir.parent().unwrap());
    }

    #[test]
    fn save_download_never_overwrites() {
        let dir = std::env::temp_dir().join("photoforge_output_no_overwrite");
        let _ = std::fs::remove_dir_all(&dir);

        let first = save_download(&dir, "me-passport-canada.png", &[1]).unwrap();
        let second = save_download(&dir, "me-passport-canada.png", &[2]).unwrap();
        let third = save_download(&dir, "me-passport-canada.png", &[3]).unwrap();

        assert_eq!(first.file_name().unwrap(), "me-passport-canada.png");
        assert_eq!(second.file_name().unwrap(), "me-passport-canada-2.png");
        assert_eq!(third.file_name().unwrap(), "me-passport-canada-3.png");
        assert_eq!(std::fs::read(&first).unwrap(), vec![1]);
        assert_eq!(std::fs::read(&third).unwrap(), vec![3]);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn numbered_names() {
        assert_eq!(numbered("a.png", 1), "a.png");
        assert_eq!(numbered("a.b.jpg", 4), "a.b-4.jpg");
        assert_eq!(numbered("noext", 2), "noext-2");
        assert_eq!(numbered(".hidden", 2), ".hidden-2");
    }
}
