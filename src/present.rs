//! Terminal rendering of workflow stages and reference data.

use std::fmt::Write as _;

use crate::catalog::{self, Choice};
use crate::options::{Feature, GenerationOptions};
use crate::workflow::Stage;

/// One line describing `stage`, or `None` when the stage needs no announcement.
#[must_use]
pub fn stage_message(feature: Feature, stage: &Stage, options: &GenerationOptions) -> Option<String> {
    match stage {
        Stage::Upload { error: Some(error) } => Some(format!("Error: {error}")),
        Stage::Upload { error: None } => None,
        Stage::Validating { .. } => Some("Analyzing your photo...".to_string()),
        Stage::CollectingOptions { error: Some(error), .. } => Some(format!("Error: {error}")),
        Stage::CollectingOptions { error: None, .. } => {
            Some("Photo accepted. Choose your portrait options.".to_string())
        }
        Stage::Generating { .. } => Some(match options {
            GenerationOptions::Passport(p) => {
                format!("Generating {} passport photo...", p.country.name)
            }
            GenerationOptions::Portrait(p) => format!("Generating {} portraits...", p.style.label),
        }),
        Stage::Result { result } => Some(match (feature, result.images().len()) {
            (Feature::Passport, _) => "Your passport photo is ready.".to_string(),
            (Feature::Portrait, 1) => "Your portrait is ready.".to_string(),
            (Feature::Portrait, n) => format!("{n} portraits are ready."),
        }),
    }
}

/// Print stage messages to stderr; suitable as a workflow observer.
///
/// Stage errors are skipped: the command reports them when it exits.
pub fn print_stage(feature: Feature, stage: &Stage, options: &GenerationOptions) {
    if stage.error().is_some() {
        return;
    }
    if let Some(message) = stage_message(feature, stage, options) {
        eprintln!("{message}");
    }
}

/// Guidance printed before a run of `feature`.
#[must_use]
pub fn preamble(feature: Feature) -> String {
    match feature {
        Feature::Passport => {
            let mut out = String::from("Photo requirements:\n");
            checklist(&mut out, catalog::PASSPORT_GUIDELINES);
            out.push_str(catalog::USER_RESPONSIBILITY);
            out
        }
        Feature::Portrait => format!("Disclaimer: {}", catalog::PORTRAIT_DISCLAIMER),
    }
}

/// Everything a user can pick, for the `options` subcommand.
#[must_use]
pub fn catalog_listing() -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Passport countries:");
    for c in catalog::COUNTRIES {
        let (lo, hi) = c.head_height_percent;
        let _ = writeln!(
            out,
            "  {:<20} {:<12} head {lo}-{hi}%  background: {}",
            c.name,
            c.dimensions,
            c.backgrounds.join(" / ")
        );
    }

    section(&mut out, "Attire", catalog::ATTIRE);
    section(&mut out, "Portrait styles", catalog::STYLES);
    section(&mut out, "Scenes", catalog::SCENES);
    section(&mut out, "Poses", catalog::POSES);
    section(&mut out, "Expressions", catalog::EXPRESSIONS);
    section(&mut out, "Aspect ratios", catalog::ASPECT_RATIOS);

    let _ = writeln!(out, "\nPassport photo requirements:");
    checklist(&mut out, catalog::PASSPORT_GUIDELINES);

    let _ = writeln!(out, "\nNotices:");
    for notice in [
        catalog::USER_RESPONSIBILITY,
        catalog::PORTRAIT_DISCLAIMER,
        catalog::PRIVACY_NOTICE,
    ] {
        let _ = writeln!(out, "  {notice}");
    }
    out
}

fn checklist(out: &mut String, items: &[&str]) {
    for item in items {
        let _ = writeln!(out, "  - {item}");
    }
}

fn section(out: &mut String, title: &str, choices: &[Choice]) {
    let _ = writeln!(out, "\n{title}:");
    for choice in choices {
        let _ = writeln!(out, "  {}", choice.label);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DefaultsConfig;

    fn passport() -> GenerationOptions {
        GenerationOptions::from_defaults(Feature::Passport, &DefaultsConfig::default()).unwrap()
    }

    #[test]
    fn generating_names_the_country() {
        let payload = crate::media::ImagePayload::from_bytes(
            crate::adapters::scripted::png_image(1),
            "me.png",
        )
        .unwrap();
        let msg =
            stage_message(Feature::Passport, &Stage::Generating { payload }, &passport()).unwrap();
        assert_eq!(msg, "Generating United States passport photo...");
    }

    #[test]
    fn upload_errors_are_shown() {
        let stage = Stage::Upload { error: Some("No face is visible.".into()) };
        assert_eq!(
            stage_message(Feature::Passport, &stage, &passport()).as_deref(),
            Some("Error: No face is visible.")
        );
        assert!(stage_message(Feature::Passport, &Stage::default(), &passport()).is_none());
    }

    #[test]
    fn listing_covers_every_catalog() {
        let listing = catalog_listing();
        for c in catalog::COUNTRIES {
            assert!(listing.contains(c.name));
        }
        assert!(listing.contains("35x45 mm"));
        assert!(listing.contains("Dark Suit & Tie"));
        assert!(listing.contains("Cinematic"));
        assert!(listing.contains("Landscape (16:9)"));
        assert!(listing.contains("Passport photo requirements:"));
        assert!(listing.contains("  - Ensure your eyes are open and clearly visible."));
        assert!(listing.contains(catalog::PRIVACY_NOTICE));
        assert!(listing.contains(catalog::USER_RESPONSIBILITY));
    }

    #[test]
    fn preamble_depends_on_feature() {
        let passport = preamble(Feature::Passport);
        assert!(passport.starts_with("Photo requirements:\n  - Use a recent"));
        assert!(passport.ends_with(catalog::USER_RESPONSIBILITY));
        assert!(!passport.contains("artistic interpretations"));

        let portrait = preamble(Feature::Portrait);
        assert!(portrait.starts_with("Disclaimer: AI-generated portraits"));
        assert!(!portrait.contains("Photo requirements"));
    }
}
