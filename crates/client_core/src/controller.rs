//! Submission state machine: validate, compile, call the service, reconcile,
//! and run the equilibrium correction loop.

use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Duration,
};

use shared::{
    domain::{ParameterField, ReactorConfiguration},
    protocol::{RawSimulationResponse, SimulationResult},
};
use storage::ConfigurationStore;
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::{
    cancel::CancelToken,
    compiler::compile,
    error::{CorrectionError, SubmissionError},
    fallback::fallback_result,
    form::ReactorForm,
    reconcile::reconcile,
    transport::{SimulationTransport, TransportError},
    validation::validate_configuration,
};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

const EQUILIBRIUM_MARKERS: &[&str] = &[
    "excede la conversión de equilibrio",
    "exceeds equilibrium conversion",
];
const SUGGESTION_FACTOR: f64 = 0.95;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmissionPhase {
    #[default]
    Idle,
    Validating,
    Invalid,
    Compiling,
    AwaitingService,
    NetworkError,
    ParseError,
    ServiceError,
    EquilibriumWarning,
    Success,
}

/// State of the "target conversion exceeds equilibrium" dialog.
#[derive(Debug, Clone, PartialEq)]
pub struct EquilibriumDialog {
    pub message: String,
    pub target_conversion: String,
    pub equilibrium_conversion: f64,
    /// Suggested replacement, 95% of the equilibrium conversion.
    pub temp_conversion: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionOutcome {
    Completed(SimulationResult),
    EquilibriumWarning(EquilibriumDialog),
}

/// True when the service rejected the target conversion as thermodynamically unreachable.
pub fn is_equilibrium_violation(raw: &RawSimulationResponse) -> bool {
    (raw.warning || !raw.success)
        && EQUILIBRIUM_MARKERS
            .iter()
            .any(|marker| raw.message().contains(marker))
}

fn reported_equilibrium(raw: &RawSimulationResponse) -> Option<f64> {
    raw.summary
        .as_ref()
        .and_then(|summary| summary.x_eq)
        .or_else(|| {
            raw.additional_data
                .as_ref()
                .and_then(|data| data.equilibrium_conversion)
        })
        .filter(|x_eq| x_eq.is_finite())
}

fn suggested_conversion(equilibrium: f64) -> String {
    let rounded = (equilibrium * SUGGESTION_FACTOR * 10_000.0).round() / 10_000.0;
    rounded.to_string()
}

struct LoadingGuard(Arc<AtomicBool>);

impl LoadingGuard {
    fn acquire(flag: &Arc<AtomicBool>) -> Option<Self> {
        if flag.swap(true, Ordering::AcqRel) {
            None
        } else {
            Some(Self(Arc::clone(flag)))
        }
    }
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct SubmissionController {
    transport: Arc<dyn SimulationTransport>,
    store: Option<ConfigurationStore>,
    timeout: Duration,
    cancel: CancelToken,
    loading: Arc<AtomicBool>,
    phase: SubmissionPhase,
    last_error: Option<SubmissionError>,
    last_result: Option<SimulationResult>,
    last_submitted: Option<ReactorConfiguration>,
    dialog: Option<EquilibriumDialog>,
}

impl SubmissionController {
    pub fn new(transport: Arc<dyn SimulationTransport>) -> Self {
        Self {
            transport,
            store: None,
            timeout: DEFAULT_TIMEOUT,
            cancel: CancelToken::new(),
            loading: Arc::new(AtomicBool::new(false)),
            phase: SubmissionPhase::Idle,
            last_error: None,
            last_result: None,
            last_submitted: None,
            dialog: None,
        }
    }

    pub fn with_store(mut self, store: ConfigurationStore) -> Self {
        self.store = Some(store);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn phase(&self) -> SubmissionPhase {
        self.phase
    }

    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::Acquire)
    }

    pub fn last_error(&self) -> Option<&SubmissionError> {
        self.last_error.as_ref()
    }

    pub fn last_result(&self) -> Option<&SimulationResult> {
        self.last_result.as_ref()
    }

    pub fn last_submitted(&self) -> Option<&ReactorConfiguration> {
        self.last_submitted.as_ref()
    }

    pub fn equilibrium_dialog(&self) -> Option<&EquilibriumDialog> {
        self.dialog.as_ref()
    }

    /// Handle that aborts the in-flight service call from another task.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// The last result, or the canned dataset after a transport failure.
    pub fn display_result(&self) -> Option<SimulationResult> {
        if self
            .last_error
            .as_ref()
            .is_some_and(SubmissionError::is_recoverable)
        {
            return Some(fallback_result());
        }
        self.last_result.clone()
    }

    pub async fn submit(
        &mut self,
        config: &ReactorConfiguration,
    ) -> Result<SubmissionOutcome, SubmissionError> {
        if self.is_loading() {
            return Err(self.record(SubmissionError::Busy, self.phase));
        }

        self.phase = SubmissionPhase::Validating;
        self.dialog = None;
        let config = config.clone().normalized();
        let errors = validate_configuration(&config);
        if errors.has_errors() {
            warn!(fields = errors.len(), "submission blocked by invalid fields");
            let error = SubmissionError::Validation(errors);
            return Err(self.record(error, SubmissionPhase::Invalid));
        }

        self.last_submitted = Some(config.clone());
        self.run_attempt(config).await
    }

    /// Resubmits the last configuration with `value` as target conversion.
    ///
    /// The accepted value is also written into `form`.
    pub async fn confirm_correction(
        &mut self,
        value: &str,
        form: &mut ReactorForm,
    ) -> Result<SubmissionOutcome, CorrectionError> {
        let dialog = self.dialog.as_ref().ok_or(CorrectionError::NotPending)?;
        let equilibrium = dialog.equilibrium_conversion;

        let text = value.trim();
        let accepted = text
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite())
            .ok_or_else(|| CorrectionError::NotANumber(text.to_string()))?;
        if accepted <= 0.0 || accepted > 1.0 {
            return Err(CorrectionError::OutOfRange(accepted));
        }
        if accepted > equilibrium {
            return Err(CorrectionError::AboveEquilibrium {
                value: accepted,
                equilibrium,
            });
        }

        let mut patched = self
            .last_submitted
            .clone()
            .unwrap_or_else(|| form.configuration().clone());
        patched.set_parameter(ParameterField::TargetConversion, text);
        form.set_parameter(ParameterField::TargetConversion, text);

        info!(target_conversion = accepted, equilibrium, "resubmitting with corrected conversion");
        self.dialog = None;
        self.last_submitted = Some(patched.clone());
        Ok(self.run_attempt(patched).await?)
    }

    pub fn cancel_correction(&mut self) {
        if self.dialog.take().is_some() {
            self.phase = SubmissionPhase::Idle;
        }
    }

    fn record(&mut self, error: SubmissionError, phase: SubmissionPhase) -> SubmissionError {
        // A rejected re-entry leaves the running attempt's state alone.
        if matches!(error, SubmissionError::Busy) {
            return error;
        }
        self.phase = phase;
        self.last_error = Some(error.clone());
        error
    }

    async fn run_attempt(
        &mut self,
        config: ReactorConfiguration,
    ) -> Result<SubmissionOutcome, SubmissionError> {
        let attempt_id = Uuid::new_v4();
        let span = info_span!("simulation_attempt", %attempt_id);
        self.attempt(config).instrument(span).await
    }

    async fn attempt(
        &mut self,
        config: ReactorConfiguration,
    ) -> Result<SubmissionOutcome, SubmissionError> {
        let Some(_loading) = LoadingGuard::acquire(&self.loading) else {
            return Err(self.record(SubmissionError::Busy, self.phase));
        };

        self.phase = SubmissionPhase::Compiling;
        let request = compile(&config);

        self.phase = SubmissionPhase::AwaitingService;
        self.cancel.reset();
        let transport = Arc::clone(&self.transport);
        let cancel = self.cancel.clone();
        let timeout = self.timeout;
        info!(mode = ?request.mode_op, order = request.order, "sending simulation request");

        let response = tokio::select! {
            result = tokio::time::timeout(timeout, transport.simulate(&request)) => {
                result.unwrap_or(Err(TransportError::Timeout(timeout.as_millis())))
            }
            _ = cancel.cancelled() => Err(TransportError::Cancelled),
        };

        let raw = match response {
            Ok(raw) => raw,
            Err(err) => {
                warn!(error = %err, "simulation request failed");
                let error = SubmissionError::from(err);
                let phase = match error {
                    SubmissionError::MalformedResponse { .. } => SubmissionPhase::ParseError,
                    _ => SubmissionPhase::NetworkError,
                };
                return Err(self.record(error, phase));
            }
        };

        if is_equilibrium_violation(&raw) {
            if let Some(equilibrium) = reported_equilibrium(&raw) {
                let dialog = EquilibriumDialog {
                    message: raw.message().to_string(),
                    target_conversion: config
                        .parameter(ParameterField::TargetConversion)
                        .to_string(),
                    equilibrium_conversion: equilibrium,
                    temp_conversion: suggested_conversion(equilibrium),
                };
                info!(
                    equilibrium,
                    suggested = %dialog.temp_conversion,
                    "target conversion exceeds equilibrium"
                );
                self.phase = SubmissionPhase::EquilibriumWarning;
                self.last_error = None;
                self.dialog = Some(dialog.clone());
                return Ok(SubmissionOutcome::EquilibriumWarning(dialog));
            }
            warn!("equilibrium warning without an equilibrium conversion");
        }

        if !raw.success {
            warn!(service_message = raw.message(), "simulation service reported a failure");
            let error = SubmissionError::Service(raw.message().to_string());
            return Err(self.record(error, SubmissionPhase::ServiceError));
        }

        let result = reconcile(&raw, &config);
        info!(points = result.data.len(), warning = result.warning, "simulation completed");

        if let Some(store) = &self.store {
            if let Err(error) = store.save(&config).await {
                warn!(error = %error, "failed to persist submitted configuration");
            }
        }

        self.phase = SubmissionPhase::Success;
        self.last_error = None;
        self.last_result = Some(result.clone());
        Ok(SubmissionOutcome::Completed(result))
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
