//! Canned dataset shown when the simulation service cannot be reached.

use shared::{
    domain::ReactionOrder,
    protocol::{AdditionalData, SimulationPoint, SimulationResult},
};

use crate::reconcile::{derive_concentrations, inverse_rate, Stoichiometry};

pub const FALLBACK_MESSAGE: &str = "Servicio de simulación no disponible: datos de ejemplo";

const RATE_CONSTANT: f64 = 0.05;
const INITIAL_CONCENTRATION: f64 = 1.0;
const TIME_STEP: f64 = 6.0;
const STEPS: usize = 10;

/// First-order isothermal decay of A in `A + 2B -> 3C`, sampled every 6 minutes.
pub fn fallback_result() -> SimulationResult {
    let nu = Stoichiometry {
        a: -1.0,
        b: -2.0,
        c: 3.0,
        d: 0.0,
    };

    let data: Vec<SimulationPoint> = (0..=STEPS)
        .map(|step| {
            let time = step as f64 * TIME_STEP;
            let conversion = 1.0 - (-RATE_CONSTANT * time).exp();
            let species = derive_concentrations(conversion, INITIAL_CONCENTRATION, nu);
            SimulationPoint {
                time,
                conversion,
                concentration_a: species.a,
                concentration_b: species.b,
                concentration_c: species.c,
                concentration_d: species.d,
                inverse_rate: inverse_rate(
                    conversion,
                    INITIAL_CONCENTRATION,
                    RATE_CONSTANT,
                    ReactionOrder::First,
                ),
                ..SimulationPoint::default()
            }
        })
        .collect();

    let additional_data = AdditionalData {
        final_conversion: data.last().map(|point| point.conversion),
        reaction_time: data.last().map(|point| point.time),
        reaction_rate: Some(RATE_CONSTANT),
        ..AdditionalData::default()
    };

    SimulationResult {
        success: true,
        message: FALLBACK_MESSAGE.to_string(),
        warning: true,
        additional_data,
        data,
    }
}
