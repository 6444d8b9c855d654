//! Static reference data: passport country specs and selectable options.

use crate::output::sanitize_for_filename;

/// A selectable option: what the user sees and what goes into the instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Choice {
    /// Display label.
    pub label: &'static str,
    /// Instruction fragment.
    pub value: &'static str,
}

impl Choice {
    const fn new(label: &'static str, value: &'static str) -> Self {
        Self { label, value }
    }
}

/// Official passport photo requirements for one country.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CountrySpec {
    /// Country or region name.
    pub name: &'static str,
    /// Printed photo dimensions.
    pub dimensions: &'static str,
    /// Width divided by height.
    pub aspect_ratio: f64,
    /// Permitted head height, as a percentage range of the photo height.
    pub head_height_percent: (u8, u8),
    /// Permitted background colours, preferred first.
    pub backgrounds: &'static [&'static str],
    /// Closest aspect ratio the image model accepts.
    pub model_aspect_ratio: &'static str,
}

/// Supported passport specifications.
pub const COUNTRIES: &[CountrySpec] = &[
    CountrySpec {
        name: "United States",
        dimensions: "2x2 inches",
        aspect_ratio: 1.0,
        head_height_percent: (50, 69),
        backgrounds: &["white", "off-white"],
        model_aspect_ratio: "1:1",
    },
    CountrySpec {
        name: "Schengen Area / EU",
        dimensions: "35x45 mm",
        aspect_ratio: 35.0 / 45.0,
        head_height_percent: (70, 80),
        backgrounds: &["light grey", "light blue"],
        model_aspect_ratio: "3:4",
    },
    CountrySpec {
        name: "United Kingdom",
        dimensions: "35x45 mm",
        aspect_ratio: 35.0 / 45.0,
        head_height_percent: (70, 80),
        backgrounds: &["cream", "light grey"],
        model_aspect_ratio: "3:4",
    },
    // 31-36 mm head on a 70 mm photo
    CountrySpec {
        name: "Canada",
        dimensions: "50x70 mm",
        aspect_ratio: 50.0 / 70.0,
        head_height_percent: (44, 51),
        backgrounds: &["white", "light-coloured"],
        model_aspect_ratio: "3:4",
    },
    // 28-33 mm head on a 48 mm photo
    CountrySpec {
        name: "China",
        dimensions: "33x48 mm",
        aspect_ratio: 33.0 / 48.0,
        head_height_percent: (58, 75),
        backgrounds: &["white"],
        model_aspect_ratio: "2:3",
    },
];

/// Instruction value meaning "leave the clothing alone".
pub const NO_ATTIRE_CHANGE: &str = "no change to attire";

/// Attire options for passport photos. The last entry is the default.
pub const ATTIRE: &[Choice] = &[
    Choice::new("Dark Suit & Tie", "a dark suit with a white shirt and a tie"),
    Choice::new("Black Blazer", "a professional black blazer"),
    Choice::new("Collared Shirt", "a simple collared shirt"),
    Choice::new("No Change", NO_ATTIRE_CHANGE),
];

/// Portrait styles; the value is the style description sent to the model.
pub const STYLES: &[Choice] = &[
    Choice::new(
        "Corporate Headshot",
        "A professional corporate headshot. Business attire against a softly blurred office \
         background, with soft, flattering light for a confident and approachable look.",
    ),
    Choice::new(
        "Cinematic",
        "A cinematic portrait with dramatic Rembrandt or split lighting against a dark, moody \
         background. Thoughtful, intense mood with rich texture and detail.",
    ),
    Choice::new(
        "Vintage Film",
        "A portrait that looks shot on vintage film such as Kodachrome or Polaroid, with subtle \
         grain, warm tones, soft focus and a retro setting.",
    ),
    Choice::new(
        "Fantasy Art",
        "An epic, painterly fantasy portrait: the person as an elf or mage with glowing magical \
         effects, intricate armor or robes, and an enchanted forest or castle behind them.",
    ),
    Choice::new(
        "Minimalist B&W",
        "A timeless black and white portrait with high contrast lighting that sculpts the face \
         against a solid dark grey background.",
    ),
    Choice::new(
        "Futuristic Sci-Fi",
        "A futuristic sci-fi portrait with sleek modern clothing or subtle cybernetic details, \
         a neon-lit cityscape or starship interior, in cool blue and purple tones.",
    ),
];

/// Scene overrides. An empty value keeps whatever the style implies.
pub const SCENES: &[Choice] = &[
    Choice::new("Style Default", ""),
    Choice::new("Studio Backdrop", "a seamless professional studio backdrop"),
    Choice::new("City Street", "a lively city street with soft bokeh"),
    Choice::new("Nature Park", "a green park with dappled natural light"),
    Choice::new("Home Office", "a tidy, well-lit home office"),
    Choice::new("Beach at Sunset", "a beach at golden-hour sunset"),
];

/// Pose options. An empty value keeps the original pose.
pub const POSES: &[Choice] = &[
    Choice::new("Natural", ""),
    Choice::new("Head and Shoulders", "a straight-on head and shoulders framing"),
    Choice::new("Three-Quarter Turn", "body turned three-quarters with the face toward the camera"),
    Choice::new("Arms Crossed", "arms loosely crossed, upright posture"),
    Choice::new("Leaning Casually", "leaning casually against a surface, relaxed shoulders"),
];

/// Expression options. An empty value keeps the original expression.
pub const EXPRESSIONS: &[Choice] = &[
    Choice::new("Natural", ""),
    Choice::new("Warm Smile", "a warm, natural smile"),
    Choice::new("Confident", "a confident, composed look"),
    Choice::new("Serious", "a calm, serious expression"),
    Choice::new("Laughing", "a candid laugh"),
];

/// Output aspect ratios for portraits; the value is passed to the model.
pub const ASPECT_RATIOS: &[Choice] = &[
    Choice::new("Square (1:1)", "1:1"),
    Choice::new("Portrait (3:4)", "3:4"),
    Choice::new("Social (4:5)", "4:5"),
    Choice::new("Story (9:16)", "9:16"),
    Choice::new("Landscape (16:9)", "16:9"),
];

/// Photo requirements shown before a passport run.
pub const PASSPORT_GUIDELINES: &[&str] = &[
    "Use a recent, clear, in-focus photo.",
    "Face the camera directly with a neutral expression.",
    "Ensure your eyes are open and clearly visible.",
    "Avoid shadows on your face or in the background.",
    "The background and lighting are replaced for you.",
];

/// Passport output is an aid, not a compliance guarantee.
pub const USER_RESPONSIBILITY: &str = "You are responsible for the photos you use and the images \
    you create. This tool helps you meet common requirements but does not guarantee compliance: \
    check the final photo against the current rules of the authority you submit it to.";

/// Shown before a portrait run.
pub const PORTRAIT_DISCLAIMER: &str = "AI-generated portraits are artistic interpretations and \
    may not perfectly resemble the original photo. Facial features are preserved, but style, \
    clothing and background are altered.";

/// What happens to the user's photo.
pub const PRIVACY_NOTICE: &str = "Your photo is sent to the image service for processing and is \
    not stored by this tool. Only the download you save is written to disk.";

/// Find a choice by label, slug or value, ignoring case and punctuation.
#[must_use]
pub fn lookup(choices: &'static [Choice], key: &str) -> Option<&'static Choice> {
    let wanted = sanitize_for_filename(key, 64);
    choices.iter().find(|c| {
        c.label.eq_ignore_ascii_case(key)
            || (!c.value.is_empty() && c.value == key)
            || sanitize_for_filename(c.label, 64) == wanted
    })
}

/// Find a country by name or slug.
#[must_use]
pub fn country(key: &str) -> Option<&'static CountrySpec> {
    let wanted = sanitize_for_filename(key, 64);
    COUNTRIES
        .iter()
        .find(|c| c.name.eq_ignore_ascii_case(key) || sanitize_for_filename(c.name, 64) == wanted)
}

/// Comma-separated labels, for error messages.
#[must_use]
pub fn labels(choices: &[Choice]) -> String {
    choices.iter().map(|c| c.label).collect::<Vec<_>>().join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn country_lookup_accepts_name_and_slug() {
        assert_eq!(country("United States").unwrap().name, "United States");
        assert_eq!(country("united-states").unwrap().name, "United States");
        assert_eq!(country("schengen area / eu").unwrap().name, "Schengen Area / EU");
        assert!(country("atlantis").is_none());
    }

    #[test]
    fn choice_lookup_accepts_label_slug_and_value() {
        assert_eq!(lookup(ATTIRE, "No Change").unwrap().value, NO_ATTIRE_CHANGE);
        assert_eq!(lookup(ATTIRE, "dark-suit-tie").unwrap().label, "Dark Suit & Tie");
        assert_eq!(lookup(ASPECT_RATIOS, "16:9").unwrap().label, "Landscape (16:9)");
        assert!(lookup(STYLES, "watercolor").is_none());
    }

    #[test]
    fn empty_values_do_not_match_everything() {
        assert!(lookup(SCENES, "").is_none());
    }

    #[test]
    fn every_country_has_a_background_and_sane_bounds() {
        for c in COUNTRIES {
            assert!(!c.backgrounds.is_empty(), "{} has no background", c.name);
            let (lo, hi) = c.head_height_percent;
            assert!(lo < hi && hi <= 100, "{} head bounds", c.name);
            assert!(crate::params::validate_aspect_ratio(c.model_aspect_ratio).is_ok());
        }
    }

    #[test]
    fn guidelines_cover_pose_and_lighting() {
        assert_eq!(PASSPORT_GUIDELINES.len(), 5);
        assert!(PASSPORT_GUIDELINES.iter().any(|g| g.contains("neutral expression")));
        assert!(PASSPORT_GUIDELINES.iter().any(|g| g.contains("shadows")));
        assert!(USER_RESPONSIBILITY.contains("does not guarantee compliance"));
    }

    #[test]
    fn default_attire_is_no_change() {
        assert_eq!(ATTIRE.last().unwrap().value, NO_ATTIRE_CHANGE);
    }
}
