//! Client core of the batch reactor simulator: form validation, request
//! compilation, response reconciliation and the submission controller.

pub mod cancel;
pub mod compiler;
pub mod controller;
pub mod error;
pub mod export;
pub mod fallback;
pub mod form;
mod numeric;
pub mod presentation;
pub mod reconcile;
pub mod transport;
pub mod validation;

pub use cancel::CancelToken;
pub use compiler::compile;
pub use controller::{
    EquilibriumDialog, SubmissionController, SubmissionOutcome, SubmissionPhase, DEFAULT_TIMEOUT,
};
pub use error::{CorrectionError, FormError, SubmissionError};
pub use fallback::fallback_result;
pub use form::{ModeSelection, ReactorForm};
pub use numeric::parse_decimal;
pub use presentation::{reaction_equation, significant_points};
pub use reconcile::{derive_concentrations, inverse_rate, reconcile, Stoichiometry};
pub use transport::{
    HttpSimulationTransport, MissingSimulationTransport, SimulationTransport, TransportError,
};
pub use validation::{validate, validate_configuration, ValidationErrors, ValidationModes};
