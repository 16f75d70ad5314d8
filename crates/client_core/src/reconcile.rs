//! Normalization of the service's response into [`SimulationResult`].
//!
//! The service answers either with per-point records or with parallel
//! arrays. Both are folded into the same point list, and any concentration
//! or inverse rate the service left out is derived from the conversion.

use shared::{
    domain::{ParameterField, ReactionOrder, ReactorConfiguration},
    protocol::{
        AdditionalData, BackendSummary, ColumnarSeries, RawSeries, RawSimulationResponse,
        SimulationPoint, SimulationResult, SpeciesValues,
    },
};
use tracing::debug;

use crate::numeric::parse_decimal;

/// Rate constant assumed for the inverse rate when the summary carries none.
pub const DEFAULT_RATE_CONSTANT: f64 = 0.05;

/// Stoichiometric coefficients of `aA + bB -> cC + dD`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Stoichiometry {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
}

impl Stoichiometry {
    /// Unparseable coefficients count as zero, i.e. the species does not take part.
    pub fn from_configuration(config: &ReactorConfiguration) -> Self {
        let coefficient =
            |field| parse_decimal(config.parameter(field)).unwrap_or_default();
        Self {
            a: coefficient(ParameterField::CoefficientA),
            b: coefficient(ParameterField::CoefficientB),
            c: coefficient(ParameterField::CoefficientC),
            d: coefficient(ParameterField::CoefficientD),
        }
    }
}

/// Concentrations at conversion `x` of the limiting reactant A.
///
/// Species with a zero coefficient are left out, as are values that come out
/// non-finite (a zero coefficient for A).
pub fn derive_concentrations(x: f64, ca0: f64, nu: Stoichiometry) -> SpeciesValues {
    let finite = |value: f64| value.is_finite().then_some(value);
    let when = |coefficient: f64, value: f64| {
        if coefficient != 0.0 {
            finite(value)
        } else {
            None
        }
    };

    SpeciesValues {
        a: finite(ca0 * (1.0 - x)),
        b: when(nu.b, ca0 * (1.0 - (nu.b / nu.a) * x)),
        c: when(nu.c, ca0 * (nu.c / nu.a.abs()) * x),
        d: when(nu.d, ca0 * (nu.d / nu.a.abs()) * x),
    }
}

/// Levenspiel inverse rate `1 / (-rA)` at conversion `x`.
///
/// `None` for `x <= 0` and for non-finite results such as full conversion.
pub fn inverse_rate(x: f64, ca0: f64, k: f64, order: ReactionOrder) -> Option<f64> {
    if x <= 0.0 {
        return None;
    }
    let remaining = 1.0 - x;
    let rate = match order {
        ReactionOrder::First => k * ca0 * remaining,
        ReactionOrder::Second => k * ca0.powi(2) * remaining.powi(2),
    };
    let value = 1.0 / rate;
    value.is_finite().then_some(value)
}

/// Fills every summary scalar the flat block lacks from the service summary.
pub fn merge_summary(
    additional: Option<&AdditionalData>,
    summary: Option<&BackendSummary>,
) -> AdditionalData {
    let mut merged = additional.cloned().unwrap_or_default();
    let Some(summary) = summary else {
        return merged;
    };

    let fallback = |slot: &mut Option<f64>, value: Option<f64>| {
        if slot.is_none() {
            *slot = value;
        }
    };
    fallback(&mut merged.final_conversion, summary.x_a_final);
    fallback(&mut merged.final_temperature, summary.temperature_final);
    fallback(&mut merged.reaction_time, summary.time_final);
    fallback(&mut merged.reaction_rate, summary.k_final);
    fallback(&mut merged.volume, summary.volume);
    fallback(&mut merged.equilibrium_conversion, summary.x_eq);
    fallback(&mut merged.target_conversion, summary.x_a_desired);
    merged
}

struct Derivation {
    ca0: Option<f64>,
    nu: Stoichiometry,
    order: ReactionOrder,
    rate_constant: f64,
    inverse_rate_applies: bool,
}

impl Derivation {
    fn new(config: &ReactorConfiguration, summary: &AdditionalData) -> Self {
        let volume_reported = summary.volume.is_some_and(|volume| volume != 0.0);
        Self {
            ca0: parse_decimal(config.parameter(ParameterField::InitialConcentration)),
            nu: Stoichiometry::from_configuration(config),
            order: config.reaction_order,
            rate_constant: summary.reaction_rate.unwrap_or(DEFAULT_RATE_CONSTANT),
            inverse_rate_applies: config.is_isothermal() && volume_reported,
        }
    }

    fn inverse_rate(&self, x: f64) -> Option<f64> {
        if !self.inverse_rate_applies {
            return None;
        }
        inverse_rate(x, self.ca0?, self.rate_constant, self.order)
    }

    fn is_complete(&self, point: &SimulationPoint) -> bool {
        point.has_concentration()
            && (point.inverse_rate.is_some() || self.inverse_rate(point.conversion).is_none())
    }

    fn enrich(&self, point: &mut SimulationPoint) {
        if let Some(ca0) = self.ca0 {
            let derived = derive_concentrations(point.conversion, ca0, self.nu);
            point.concentration_a = point.concentration_a.or(derived.a);
            point.concentration_b = point.concentration_b.or(derived.b);
            point.concentration_c = point.concentration_c.or(derived.c);
            point.concentration_d = point.concentration_d.or(derived.d);
        }
        if point.inverse_rate.is_none() {
            point.inverse_rate = self.inverse_rate(point.conversion);
        }
    }
}

fn pivot(columns: &ColumnarSeries) -> Vec<SimulationPoint> {
    let at = |column: &Option<Vec<f64>>, index: usize| {
        column.as_ref().and_then(|values| values.get(index).copied())
    };

    columns
        .t_eval
        .iter()
        .enumerate()
        .map(|(index, time)| {
            let species = columns
                .concentrations
                .as_ref()
                .map(|concentrations| concentrations.at(index))
                .unwrap_or_default();
            SimulationPoint {
                time: *time,
                conversion: columns.x_a_eval.get(index).copied().unwrap_or(0.0),
                temperature: at(&columns.temperature, index),
                cooling_temperature: at(&columns.cooling_temperature, index),
                equilibrium_conversion: columns.x_eq.as_ref().and_then(|x_eq| x_eq.at(index)),
                concentration_a: species.a,
                concentration_b: species.b,
                concentration_c: species.c,
                concentration_d: species.d,
                heat_generated: at(&columns.heat_generated, index),
                heat_removed: at(&columns.heat_removed, index),
                inverse_rate: at(&columns.rate, index)
                    .filter(|rate| *rate > 0.0)
                    .map(|rate| 1.0 / rate),
            }
        })
        .collect()
}

/// Builds the canonical result for `raw` as produced for `config`.
///
/// Unsuccessful responses keep their flags and message but carry no points
/// and no summary.
pub fn reconcile(raw: &RawSimulationResponse, config: &ReactorConfiguration) -> SimulationResult {
    if !raw.success {
        return SimulationResult {
            success: false,
            message: raw.message().to_string(),
            warning: raw.warning,
            ..SimulationResult::default()
        };
    }

    let additional_data = merge_summary(raw.additional_data.as_ref(), raw.summary.as_ref());
    let derivation = Derivation::new(config, &additional_data);

    let data = match &raw.data {
        None => Vec::new(),
        Some(RawSeries::Points(points)) => {
            if points.iter().all(|point| derivation.is_complete(point)) {
                points.clone()
            } else {
                let mut points = points.clone();
                points.iter_mut().for_each(|point| derivation.enrich(point));
                points
            }
        }
        Some(RawSeries::Columnar(columns)) => {
            let mut points = pivot(columns);
            points.iter_mut().for_each(|point| derivation.enrich(point));
            points
        }
    };

    debug!(points = data.len(), warning = raw.warning, "reconciled simulation response");

    SimulationResult {
        success: true,
        message: raw.message().to_string(),
        warning: raw.warning,
        additional_data,
        data,
    }
}

#[cfg(test)]
#[path = "tests/reconcile_tests.rs"]
mod tests;
