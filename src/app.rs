//! Runs one command: resolve options, acquire the photo, drive the workflow, save.

use std::io::BufRead;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::adapters::live::command_camera::CommandCamera;
use crate::camera::CameraSession;
use crate::catalog::{self, Choice};
use crate::cli::{Cli, Command, PassportArgs, PortraitArgs, SourceArgs};
use crate::config::{self, CameraConfig, Config, DefaultsConfig, ValidationCriteria};
use crate::context::ServiceContext;
use crate::error::AppError;
use crate::media::{self, AcquisitionError, ImagePayload};
use crate::options::{Feature, GenerationOptions, PassportOptions, PortraitOptions};
use crate::params::validate_aspect_ratio;
use crate::present;
use crate::workflow::{Stage, Workflow, WorkflowSettings};

/// Execute the parsed command line.
///
/// # Errors
///
/// Returns an error for bad arguments or config, a rejected photo, a failed
/// generation, or a download that cannot be written.
pub async fn run(cli: Cli) -> Result<(), AppError> {
    let config_path = config::discover_config_path(cli.config.as_deref());
    let config = Config::load(&config_path).map_err(AppError::Config)?;

    match cli.command {
        Command::Options => {
            print!("{}", present::catalog_listing());
            Ok(())
        }
        Command::Passport(args) => {
            let options = passport_options(&config.defaults, &args)?;
            run_feature(&config, &args.source, options, 0).await
        }
        Command::Portrait(args) => {
            let options = portrait_options(&config.defaults, &args)?;
            let pick = usize::from(args.pick.saturating_sub(1));
            run_feature(&config, &args.source, GenerationOptions::Portrait(options), pick).await
        }
    }
}

async fn run_feature(
    config: &Config,
    source: &SourceArgs,
    options: GenerationOptions,
    pick: usize,
) -> Result<(), AppError> {
    let feature = options.feature();
    let defaults =
        GenerationOptions::from_defaults(feature, &config.defaults).map_err(AppError::Config)?;
    let settings = WorkflowSettings {
        criteria: criteria_for(feature, config).clone(),
        policy: config.generation.candidate_policy,
        defaults,
    };
    let out_dir = source.resolve_out_dir(&config.defaults.out_dir);
    eprintln!("{}\n", present::preamble(feature));

    // Local rejections never reach the remote client, so they need no API key.
    let photo = acquire(source, &config.camera)?;

    let (ctx, recording) = ServiceContext::from_env(config)?;
    let mut workflow =
        Workflow::new(ctx.client, settings).with_observer(Box::new(present::print_stage));
    let outcome = drive(&mut workflow, photo, options, pick, &out_dir).await;
    drop(workflow);

    if let Some(session) = recording {
        match session.finish() {
            Ok(path) => eprintln!("Cassette saved: {}", path.display()),
            Err(e) => eprintln!("Warning: failed to save cassette: {e}"),
        }
    }

    let path = outcome?;
    eprintln!("Saved: {}", path.display());
    Ok(())
}

async fn drive(
    workflow: &mut Workflow,
    photo: ImagePayload,
    options: GenerationOptions,
    pick: usize,
    out_dir: &Path,
) -> Result<PathBuf, AppError> {
    let mut pending = Some(options);
    if !workflow.feature().collects_options_after_validation() {
        if let Some(options) = pending.take() {
            *workflow.options_mut()? = options;
        }
    }

    info!(
        feature = workflow.feature().slug(),
        variant = workflow.options().variant_label(),
        "starting"
    );
    workflow.submit(Ok(photo)).await?;

    if matches!(workflow.stage(), Stage::CollectingOptions { .. }) {
        if let Some(options) = pending.take() {
            *workflow.options_mut()? = options;
        }
        workflow.generate().await?;
    }

    let available = match workflow.stage() {
        Stage::Result { result } => result.images().len(),
        other => {
            let message = other.error().unwrap_or("Nothing was generated.").to_string();
            return Err(AppError::Rejected(message));
        }
    };
    if pick < available {
        workflow.select(pick)?;
    } else {
        debug!(pick, available, "requested candidate missing");
        eprintln!("Only {available} image(s) generated; saving #1.");
    }

    let path = workflow.download(out_dir)?;
    workflow.reset();
    Ok(path)
}

fn criteria_for(feature: Feature, config: &Config) -> &ValidationCriteria {
    match feature {
        Feature::Passport => &config.validation.passport,
        Feature::Portrait => &config.validation.portrait,
    }
}

fn passport_options(
    defaults: &DefaultsConfig,
    args: &PassportArgs,
) -> Result<GenerationOptions, AppError> {
    let country_key = args.country.as_deref().unwrap_or(&defaults.country);
    let country = catalog::country(country_key).ok_or_else(|| {
        let names: Vec<&str> = catalog::COUNTRIES.iter().map(|c| c.name).collect();
        AppError::InvalidArgument(format!(
            "Unknown country '{country_key}'. Valid: {}",
            names.join(", ")
        ))
    })?;

    let mut options = PassportOptions::for_country(country);
    options.attire =
        choice(catalog::ATTIRE, args.attire.as_deref().unwrap_or(&defaults.attire), "attire")?;
    if let Some(background) = &args.background {
        options.set_background(background).map_err(AppError::InvalidArgument)?;
    }
    Ok(GenerationOptions::Passport(options))
}

fn portrait_options(
    defaults: &DefaultsConfig,
    args: &PortraitArgs,
) -> Result<PortraitOptions, AppError> {
    let mut options = PortraitOptions {
        style: choice(catalog::STYLES, args.style.as_deref().unwrap_or(&defaults.style), "style")?,
        ..PortraitOptions::default()
    };
    if let Some(scene) = &args.scene {
        options.scene = choice(catalog::SCENES, scene, "scene")?;
    }
    if let Some(pose) = &args.pose {
        options.pose = choice(catalog::POSES, pose, "pose")?;
    }
    if let Some(expression) = &args.expression {
        options.expression = choice(catalog::EXPRESSIONS, expression, "expression")?;
    }
    if let Some(ratio) = &args.aspect_ratio {
        if ratio.contains(':') {
            validate_aspect_ratio(ratio).map_err(AppError::InvalidArgument)?;
        }
        options.aspect_ratio = choice(catalog::ASPECT_RATIOS, ratio, "aspect ratio")?;
    }
    if let Some(prompt) = &args.prompt {
        options.extra_instructions = prompt.trim().to_string();
    }
    Ok(options)
}

fn choice(choices: &'static [Choice], key: &str, what: &str) -> Result<&'static Choice, AppError> {
    catalog::lookup(choices, key).ok_or_else(|| {
        AppError::InvalidArgument(format!(
            "Unknown {what} '{key}'. Valid: {}",
            catalog::labels(choices)
        ))
    })
}

fn rejected(e: AcquisitionError) -> AppError {
    debug!(error = %e, "photo not acquired");
    AppError::Rejected(e.user_message())
}

fn acquire(source: &SourceArgs, camera: &CameraConfig) -> Result<ImagePayload, AppError> {
    match &source.image {
        Some(path) => media::acquire_file(path).map_err(rejected),
        None => capture_from_camera(camera, source.yes),
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Decision {
    Use,
    Retake,
    Cancel,
}

fn read_decision(input: &mut impl BufRead) -> std::io::Result<Decision> {
    loop {
        eprint!("[u]se / [r]etake / [c]ancel: ");
        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Ok(Decision::Cancel);
        }
        match line.trim().to_ascii_lowercase().as_str() {
            "" | "u" | "use" => return Ok(Decision::Use),
            "r" | "retake" => return Ok(Decision::Retake),
            "c" | "cancel" => return Ok(Decision::Cancel),
            other => eprintln!("Unknown choice '{other}'."),
        }
    }
}

fn capture_from_camera(config: &CameraConfig, auto_confirm: bool) -> Result<ImagePayload, AppError> {
    let device = CommandCamera::new(config.command.clone());
    let mut session = CameraSession::open(&device).map_err(rejected)?;
    let mut input = std::io::stdin().lock();

    loop {
        let (width, height) = session.capture().map_err(rejected)?;
        eprintln!("Captured {width}x{height} photo.");
        if auto_confirm {
            break;
        }
        match read_decision(&mut input)? {
            Decision::Use => break,
            Decision::Retake => session.retake(),
            Decision::Cancel => {
                session.cancel();
                return Err(AppError::Cancelled);
            }
        }
    }

    let photo = session.use_photo().map_err(rejected)?;
    info!(name = photo.source_name(), "camera photo accepted");
    Ok(photo)
}
