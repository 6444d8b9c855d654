//! CLI argument and local validation tests, no network I/O.
//!
//! Every failure here must happen before any cassette or live adapter is
//! consulted, so none of these tests need an API key.

use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;

fn cmd(work_dir: &str) -> Command {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("photoforge");
    cmd.env("PHOTOFORGE_CONFIG", scratch(work_dir).join("absent.toml"))
        .env_remove("GEMINI_API_KEY")
        .env_remove("PHOTOFORGE_REC")
        .env_remove("PHOTOFORGE_REPLAY")
        .env_remove("PHOTOFORGE_LOG");
    cmd
}

/// Fresh per-test scratch directory.
fn scratch(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("photoforge_cli_{name}"));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn write_png(dir: &std::path::Path, name: &str) -> PathBuf {
    let img = image::DynamicImage::new_rgb8(8, 8);
    let path = dir.join(name);
    img.save_with_format(&path, image::ImageFormat::Png).unwrap();
    path
}

#[test]
fn missing_subcommand_exits_with_error() {
    cmd("nosub").assert().failure().stderr(predicate::str::contains("Usage"));
}

#[test]
fn missing_photo_exits_with_error() {
    cmd("nophoto")
        .args(["passport"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("IMAGE"));
}

#[test]
fn options_lists_reference_data() {
    cmd("options")
        .arg("options")
        .assert()
        .success()
        .stdout(predicate::str::contains("United Kingdom"))
        .stdout(predicate::str::contains("35x45 mm"))
        .stdout(predicate::str::contains("Corporate Headshot"))
        .stdout(predicate::str::contains("Story (9:16)"))
        .stdout(predicate::str::contains("Passport photo requirements:"))
        .stdout(predicate::str::contains("Face the camera directly with a neutral expression."))
        .stdout(predicate::str::contains("not stored by this tool"));
}

#[test]
fn oversized_file_is_rejected_locally() {
    let dir = scratch("oversized");
    let path = dir.join("big.jpg");
    std::fs::write(&path, vec![0u8; 5 * 1024 * 1024]).unwrap();

    cmd("oversized")
        .args(["passport", path.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("File size should not exceed 4MB."))
        .stderr(predicate::str::contains("No API key").not());

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn non_image_file_is_rejected_locally() {
    let dir = scratch("notimage");
    let path = dir.join("notes.png");
    std::fs::write(&path, "definitely not a picture").unwrap();

    cmd("notimage")
        .args(["portrait", path.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Please choose a PNG or JPG image."));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn unreadable_file_is_rejected_locally() {
    cmd("unreadable")
        .args(["passport", "/nonexistent/photoforge/selfie.jpg"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error reading file."));
}

#[test]
fn unknown_country_exits_with_error() {
    cmd("country")
        .args(["passport", "me.jpg", "--country", "atlantis"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown country 'atlantis'"));
}

#[test]
fn disallowed_background_exits_with_error() {
    cmd("background")
        .args(["passport", "me.jpg", "--country", "china", "--background", "light blue"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not allowed for China"));
}

#[test]
fn invalid_aspect_ratio_exits_with_error() {
    cmd("ratio")
        .args(["portrait", "me.jpg", "--aspect-ratio", "100:200"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported aspect ratio"));
}

#[test]
fn pick_out_of_range_exits_with_error() {
    cmd("pick").args(["portrait", "me.jpg", "--pick", "3"]).assert().failure();
}

#[test]
fn camera_without_command_is_unavailable() {
    cmd("nocamera")
        .args(["passport", "--camera", "--yes"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Camera capture is not available"));
}

#[test]
fn yes_needs_the_camera() {
    cmd("yes_file")
        .args(["passport", "me.jpg", "--yes"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn valid_photo_without_key_asks_for_one() {
    let dir = scratch("nokey");
    let photo = write_png(&dir, "me.png");

    cmd("nokey")
        .args(["passport", photo.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No API key for Gemini"));

    let _ = std::fs::remove_dir_all(&dir);
}
