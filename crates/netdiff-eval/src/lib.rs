//! Goodness-of-fit and invariant checks comparing a simulated diffusion
//! trajectory against its closed-form reference.

pub mod fit;
pub mod invariants;

pub use fit::r_squared;
pub use invariants::{
    check_conservation, check_entropy, ConservationCheck, EntropyCheck, CONSERVATION_TOL,
    ENTROPY_STEP_TOL,
};

use netdiff_core::{ResistanceField, Trajectory};
use serde::{Deserialize, Serialize};

/// Everything the evaluator can say about one trajectory.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    /// `None` when no closed-form reference exists.
    pub r_squared: Option<f64>,
    /// Only checked for zero resistance.
    pub conservation: Option<ConservationCheck>,
    /// Only checked for positive resistance.
    pub entropy: Option<EntropyCheck>,
}

pub fn evaluate(
    simulated: &Trajectory,
    reference: Option<&Trajectory>,
    resistance: &ResistanceField,
) -> Evaluation {
    let (conservation, entropy) = if resistance.is_zero() {
        (Some(check_conservation(simulated, CONSERVATION_TOL)), None)
    } else {
        (None, Some(check_entropy(simulated, ENTROPY_STEP_TOL)))
    };

    Evaluation {
        r_squared: reference.map(|r| r_squared(simulated, r)),
        conservation,
        entropy,
    }
}
