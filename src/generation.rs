//! Candidate fan-out: one or two parallel generation calls joined under a policy.

use serde::Deserialize;
use tracing::debug;

use crate::ports::{CandidateRequest, GeneratedImage, GenerationClient, GenerationError};

/// How many candidates a feature asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateCount {
    /// A single call.
    One,
    /// Two independent calls issued concurrently.
    Two,
}

/// What to do when some of the parallel candidates fail.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CandidatePolicy {
    /// Any failed candidate fails the whole operation.
    #[default]
    RequireAll,
    /// Succeed with whichever candidates returned, if at least one did.
    AtLeastOne,
}

/// Generate `count` candidates for `request`.
///
/// # Errors
///
/// Returns the first candidate's error when the policy is not satisfied.
pub async fn generate(
    client: &dyn GenerationClient,
    request: CandidateRequest<'_>,
    count: CandidateCount,
    policy: CandidatePolicy,
) -> Result<Vec<GeneratedImage>, GenerationError> {
    match count {
        CandidateCount::One => Ok(vec![client.generate_candidate(request).await?]),
        CandidateCount::Two => {
            let (first, second) = tokio::join!(
                client.generate_candidate(request),
                client.generate_candidate(request)
            );
            combine(vec![first, second], policy)
        }
    }
}

fn combine(
    outcomes: Vec<Result<GeneratedImage, GenerationError>>,
    policy: CandidatePolicy,
) -> Result<Vec<GeneratedImage>, GenerationError> {
    match policy {
        CandidatePolicy::RequireAll => outcomes.into_iter().collect(),
        CandidatePolicy::AtLeastOne => {
            let mut images = Vec::with_capacity(outcomes.len());
            let mut first_error = None;
            for outcome in outcomes {
                match outcome {
                    Ok(image) => images.push(image),
                    Err(e) => {
                        debug!(error = %e, "candidate failed");
                        first_error.get_or_insert(e);
                    }
                }
            }
            if images.is_empty() {
                Err(first_error.unwrap_or(GenerationError::NoCandidate { reason: None }))
            } else {
                debug!(kept = images.len(), "partial candidate success");
                Ok(images)
            }
        }
    }
}
