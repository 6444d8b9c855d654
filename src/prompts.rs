//! Instruction text sent to the remote model.
//!
//! Every generation instruction opens with the identity lock: the person's
//! face, hair, head shape and skin tone must come out unchanged.

use std::fmt::Write as _;

use crate::catalog::NO_ATTIRE_CHANGE;
use crate::config::ValidationCriteria;
use crate::options::{GenerationOptions, PassportOptions, PortraitOptions};

const VERDICT_FORMAT: &str = "Return a JSON object with \"isValid\" (boolean) and \"feedback\" \
                              (string). If the photo is invalid, give one short, plain reason.";

/// Build the instruction used to judge whether an upload is usable.
#[must_use]
pub fn validation_instruction(options: &GenerationOptions, criteria: &ValidationCriteria) -> String {
    let purpose = match options {
        GenerationOptions::Passport(p) => format!("a passport photo for {}", p.country.name),
        GenerationOptions::Portrait(_) => "a creative portrait".to_string(),
    };
    format!(
        "Analyze this photo for its suitability as a base for {purpose}. \
         The photo is valid if {}. It is invalid if {}. {VERDICT_FORMAT}",
        criteria.accept, criteria.reject
    )
}

/// Build the instruction used to generate the derivative image.
#[must_use]
pub fn generation_instruction(options: &GenerationOptions) -> String {
    match options {
        GenerationOptions::Passport(p) => passport_instruction(p),
        GenerationOptions::Portrait(p) => portrait_instruction(p),
    }
}

fn passport_instruction(options: &PassportOptions) -> String {
    let country = options.country;
    let (head_min, head_max) = country.head_height_percent;

    let attire = if options.attire.value == NO_ATTIRE_CHANGE {
        "Keep the original clothing. Make sure it is simple and does not resemble a uniform, \
         and remove distracting jewelry."
            .to_string()
    } else {
        format!(
            "Dress the person in {}. The clothing must be professional, simple, and must not \
             cover the neck.",
            options.attire.value
        )
    };

    format!(
        "**PRIMARY DIRECTIVE: DO NOT CHANGE THE FACE, HAIR, HEAD SHAPE, OR SKIN TONE.**\n\
         \n\
         Preserving the person's identity comes before every other rule. The result must be \
         the same person; any change to their facial features is a failure.\n\
         \n\
         **Task**: Turn this photo into an official passport photo for **{name}** \
         ({dimensions}).\n\
         \n\
         1. **Identity Lock**: Keep the exact facial likeness, hair and head shape of the \
         original photo.\n\
         2. **Background**: Replace the background with a solid, uniform, featureless \
         **{background}** colour.\n\
         3. **Head Size**: Center the head. Head height, chin to top of hair, must be between \
         **{head_min}% and {head_max}%** of the photo height.\n\
         4. **Attire**: {attire}\n\
         5. **Pose**: Face directly forward with a neutral expression, both eyes open and mouth \
         closed.\n\
         6. **Lighting**: Even out lighting and remove shadows on the face and background. Keep \
         natural skin tones and apply no artistic filters.\n\
         7. **Output**: Aspect ratio **{ratio:.3}** (width/height), high resolution, \
         photorealistic, suitable for official use.\n",
        name = country.name,
        dimensions = country.dimensions,
        background = options.background,
        ratio = country.aspect_ratio,
    )
}

fn portrait_instruction(options: &PortraitOptions) -> String {
    let mut text = format!(
        "**PRIMARY DIRECTIVE: DO NOT CHANGE THE FACE. The result must look like the same \
         person, with the same face, hair, head shape and skin tone.**\n\
         \n\
         **Task**: Transform this photo into a high-quality portrait.\n\
         \n\
         **Style**: {}\n",
        options.style.value
    );

    for (heading, choice) in
        [("Scene", options.scene), ("Pose", options.pose), ("Expression", options.expression)]
    {
        if !choice.value.is_empty() {
            let _ = writeln!(text, "**{heading}**: {}", choice.value);
        }
    }

    let extra = options.extra_instructions.trim();
    let _ = write!(
        text,
        "**Aspect Ratio**: {}\n\
         **User's Additional Instructions**: {}\n\
         \n\
         1. **Identity Lock**: Keep the person's exact facial features, skin tone and core \
         identity.\n\
         2. **Apply Style**: Apply the style to the background, clothing, lighting and mood.\n\
         3. **Quality**: High resolution, aesthetically pleasing.\n",
        options.aspect_ratio.value,
        if extra.is_empty() { "None." } else { extra },
    );
    text
}
