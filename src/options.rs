//! Features and their user-selected generation options.

use crate::catalog::{self, Choice, CountrySpec};
use crate::config::DefaultsConfig;
use crate::generation::CandidateCount;

/// The two workflows this tool offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feature {
    /// Official passport photo conversion.
    Passport,
    /// Stylized portrait generation.
    Portrait,
}

impl Feature {
    /// Lowercase name used in file names.
    #[must_use]
    pub fn slug(self) -> &'static str {
        match self {
            Self::Passport => "passport",
            Self::Portrait => "portrait",
        }
    }

    /// Number of candidates generated per run.
    #[must_use]
    pub fn candidate_count(self) -> CandidateCount {
        match self {
            Self::Passport => CandidateCount::One,
            Self::Portrait => CandidateCount::Two,
        }
    }

    /// Whether a passing verdict pauses for option collection instead of
    /// generating straight away.
    #[must_use]
    pub fn collects_options_after_validation(self) -> bool {
        matches!(self, Self::Portrait)
    }

    /// Whether a failed generation keeps the photo for another attempt.
    #[must_use]
    pub fn keeps_photo_on_generation_failure(self) -> bool {
        matches!(self, Self::Portrait)
    }
}

/// Passport photo options.
#[derive(Debug, Clone, PartialEq)]
pub struct PassportOptions {
    /// Target country specification.
    pub country: &'static CountrySpec,
    /// Attire change, or the "No Change" entry.
    pub attire: &'static Choice,
    /// Background colour; always one of the country's allowed colours.
    pub background: &'static str,
}

impl PassportOptions {
    /// Options for `country` with its preferred background and no attire change.
    #[must_use]
    pub fn for_country(country: &'static CountrySpec) -> Self {
        Self {
            country,
            attire: default_attire(),
            background: country.backgrounds.first().copied().unwrap_or("white"),
        }
    }

    /// Switch country, keeping the background if the new country allows it.
    pub fn set_country(&mut self, country: &'static CountrySpec) {
        if !country.backgrounds.contains(&self.background) {
            self.background = country.backgrounds.first().copied().unwrap_or("white");
        }
        self.country = country;
    }

    /// Pick a background colour among the country's allowed ones.
    ///
    /// # Errors
    ///
    /// Returns an error listing the allowed colours if `colour` is not one of them.
    pub fn set_background(&mut self, colour: &str) -> Result<(), String> {
        let found =
            self.country.backgrounds.iter().copied().find(|b| b.eq_ignore_ascii_case(colour));
        match found {
            Some(b) => {
                self.background = b;
                Ok(())
            }
            None => Err(format!(
                "Background '{colour}' is not allowed for {}. Valid: {}",
                self.country.name,
                self.country.backgrounds.join(", ")
            )),
        }
    }
}

/// Portrait options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortraitOptions {
    /// Overall style.
    pub style: &'static Choice,
    /// Scene override.
    pub scene: &'static Choice,
    /// Pose override.
    pub pose: &'static Choice,
    /// Expression override.
    pub expression: &'static Choice,
    /// Output aspect ratio.
    pub aspect_ratio: &'static Choice,
    /// Free-text additions from the user.
    pub extra_instructions: String,
}

impl Default for PortraitOptions {
    fn default() -> Self {
        Self {
            style: &catalog::STYLES[0],
            scene: &catalog::SCENES[0],
            pose: &catalog::POSES[0],
            expression: &catalog::EXPRESSIONS[0],
            aspect_ratio: &catalog::ASPECT_RATIOS[0],
            extra_instructions: String::new(),
        }
    }
}

/// Options for one feature instance.
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationOptions {
    /// Passport options.
    Passport(PassportOptions),
    /// Portrait options.
    Portrait(PortraitOptions),
}

impl GenerationOptions {
    /// Defaults for `feature`, taken from config where set.
    ///
    /// # Errors
    ///
    /// Returns an error if a configured default names an unknown entry.
    pub fn from_defaults(feature: Feature, defaults: &DefaultsConfig) -> Result<Self, String> {
        match feature {
            Feature::Passport => {
                let country = catalog::country(&defaults.country)
                    .ok_or_else(|| format!("Unknown default country '{}'", defaults.country))?;
                let attire = catalog::lookup(catalog::ATTIRE, &defaults.attire)
                    .ok_or_else(|| format!("Unknown default attire '{}'", defaults.attire))?;
                let mut options = PassportOptions::for_country(country);
                options.attire = attire;
                Ok(Self::Passport(options))
            }
            Feature::Portrait => {
                let style = catalog::lookup(catalog::STYLES, &defaults.style)
                    .ok_or_else(|| format!("Unknown default style '{}'", defaults.style))?;
                Ok(Self::Portrait(PortraitOptions { style, ..PortraitOptions::default() }))
            }
        }
    }

    /// The feature these options belong to.
    #[must_use]
    pub fn feature(&self) -> Feature {
        match self {
            Self::Passport(_) => Feature::Passport,
            Self::Portrait(_) => Feature::Portrait,
        }
    }

    /// Label identifying the variant in download names (country or style).
    #[must_use]
    pub fn variant_label(&self) -> &'static str {
        match self {
            Self::Passport(p) => p.country.name,
            Self::Portrait(p) => p.style.label,
        }
    }

    /// Aspect ratio hint forwarded to the image model.
    #[must_use]
    pub fn model_aspect_ratio(&self) -> &'static str {
        match self {
            Self::Passport(p) => p.country.model_aspect_ratio,
            Self::Portrait(p) => p.aspect_ratio.value,
        }
    }
}

fn default_attire() -> &'static Choice {
    catalog::lookup(catalog::ATTIRE, catalog::NO_ATTIRE_CHANGE).unwrap_or(&catalog::ATTIRE[0])
}
