//! Mode-dependent field validation for the reactor form.
//!
//! [`validate`] is pure and total: every rule is evaluated independently and
//! the result only names fields that failed.

use std::{collections::BTreeMap, fmt};

use serde::Serialize;
use shared::domain::{
    EnergyMode, EquilibriumMethod, IsothermicMode, OperationType, ParameterField,
    RateConstantMode, ReactionType, ReactorConfiguration, ReactorParameters, VolumeCalculate,
};

use crate::numeric::parse_decimal;

pub const MSG_REQUIRED: &str = "Este campo es requerido";
pub const MSG_NOT_A_NUMBER: &str = "Debe ser un número válido";
pub const MSG_REACTANT_RANGE: &str = "Debe estar entre -10 y 0";
pub const MSG_PRODUCT_RANGE: &str = "Debe estar entre 0 y 10";
pub const MSG_NON_NEGATIVE: &str = "Debe ser mayor o igual a 0";
pub const MSG_POSITIVE: &str = "Debe ser mayor a 0";
pub const MSG_MAX_TEMPERATURE: &str = "Debe ser menor o igual a 3000 K";
pub const MSG_MAX_CONVERSION: &str = "Debe ser menor o igual a 1";

const MAX_TEMPERATURE_K: f64 = 3000.0;
const COEFFICIENT_BOUND: f64 = 10.0;

/// Mode selectors that decide which fields are live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ValidationModes {
    pub operation_type: OperationType,
    pub isothermic_mode: IsothermicMode,
    pub rate_constant_mode: RateConstantMode,
    pub equilibrium_method: EquilibriumMethod,
    pub energy_mode: EnergyMode,
    pub volume_calculate: VolumeCalculate,
    pub reaction_type: ReactionType,
}

impl From<&ReactorConfiguration> for ValidationModes {
    fn from(config: &ReactorConfiguration) -> Self {
        Self {
            operation_type: config.operation_type,
            isothermic_mode: config.isothermic_mode,
            rate_constant_mode: config.rate_constant_mode,
            equilibrium_method: config.equilibrium_method,
            energy_mode: config.energy_mode,
            volume_calculate: config.volume_calculate,
            reaction_type: config.reaction_type,
        }
    }
}

impl ValidationModes {
    fn isothermal(&self) -> bool {
        self.operation_type == OperationType::Isothermal
    }

    fn non_isothermal(&self) -> bool {
        self.operation_type == OperationType::NonIsothermal
    }

    fn heat_exchanger(&self) -> bool {
        self.non_isothermal() && self.energy_mode == EnergyMode::HeatExchanger
    }

    fn equilibrium(&self, method: EquilibriumMethod) -> bool {
        self.reaction_type == ReactionType::Reversible && self.equilibrium_method == method
    }
}

/// Field name to human-readable message. A missing key means the field is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<ParameterField, String>);

impl ValidationErrors {
    pub fn has_errors(&self) -> bool {
        !self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: ParameterField) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ParameterField, &str)> {
        self.0.iter().map(|(field, message)| (*field, message.as_str()))
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, (field, message)) in self.iter().enumerate() {
            if index > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
        }
        Ok(())
    }
}

struct FieldChecker<'a> {
    parameters: &'a ReactorParameters,
    errors: BTreeMap<ParameterField, String>,
}

impl<'a> FieldChecker<'a> {
    fn new(parameters: &'a ReactorParameters) -> Self {
        Self {
            parameters,
            errors: BTreeMap::new(),
        }
    }

    fn fail(&mut self, field: ParameterField, message: &str) {
        self.errors.insert(field, message.to_string());
    }

    fn number(&mut self, field: ParameterField) -> Option<f64> {
        let value = parse_decimal(self.parameters.get(field));
        if value.is_none() {
            self.fail(field, MSG_NOT_A_NUMBER);
        }
        value
    }

    fn coefficient(&mut self, field: ParameterField, min: f64, max: f64, message: &str) {
        if self.parameters.get(field).trim().is_empty() {
            self.fail(field, MSG_REQUIRED);
            return;
        }
        if let Some(value) = self.number(field) {
            if value < min || value > max {
                self.fail(field, message);
            }
        }
    }

    fn any_number(&mut self, field: ParameterField) {
        self.number(field);
    }

    fn non_negative(&mut self, field: ParameterField) {
        if let Some(value) = self.number(field) {
            if value < 0.0 {
                self.fail(field, MSG_NON_NEGATIVE);
            }
        }
    }

    fn positive(&mut self, field: ParameterField) {
        if let Some(value) = self.number(field) {
            if value <= 0.0 {
                self.fail(field, MSG_POSITIVE);
            }
        }
    }

    // Zero is accepted; only negative heat capacities are rejected.
    fn heat_capacity(&mut self, field: ParameterField) {
        if let Some(value) = self.number(field) {
            if value < 0.0 {
                self.fail(field, MSG_POSITIVE);
            }
        }
    }

    fn temperature(&mut self, field: ParameterField) {
        if let Some(value) = self.number(field) {
            if value <= 0.0 {
                self.fail(field, MSG_POSITIVE);
            } else if value > MAX_TEMPERATURE_K {
                self.fail(field, MSG_MAX_TEMPERATURE);
            }
        }
    }

    fn conversion(&mut self, field: ParameterField) {
        if let Some(value) = self.number(field) {
            if value <= 0.0 {
                self.fail(field, MSG_POSITIVE);
            } else if value > 1.0 {
                self.fail(field, MSG_MAX_CONVERSION);
            }
        }
    }

    fn finish(self) -> ValidationErrors {
        ValidationErrors(self.errors)
    }
}

pub fn validate(parameters: &ReactorParameters, modes: ValidationModes) -> ValidationErrors {
    use ParameterField::*;

    let mut check = FieldChecker::new(parameters);

    check.coefficient(CoefficientA, -COEFFICIENT_BOUND, 0.0, MSG_REACTANT_RANGE);
    check.coefficient(CoefficientB, -COEFFICIENT_BOUND, 0.0, MSG_REACTANT_RANGE);
    check.coefficient(CoefficientC, 0.0, COEFFICIENT_BOUND, MSG_PRODUCT_RANGE);
    check.coefficient(CoefficientD, 0.0, COEFFICIENT_BOUND, MSG_PRODUCT_RANGE);

    for field in [
        InitialConcentration,
        InitialConcentrationB,
        InitialConcentrationC,
        InitialConcentrationD,
    ] {
        check.non_negative(field);
    }

    if modes.isothermal() {
        check.temperature(Temperature);

        match modes.rate_constant_mode {
            RateConstantMode::Direct => check.positive(DirectRateConstant),
            RateConstantMode::Arrhenius => {
                check.positive(PreExponentialFactor);
                check.positive(ActivationEnergy);
            }
        }

        match modes.isothermic_mode {
            IsothermicMode::ByConversion => check.conversion(TargetConversion),
            IsothermicMode::ByTime => check.positive(ReactionTime),
        }

        if modes.volume_calculate == VolumeCalculate::Yes {
            check.positive(ProductionOfK);
            check.positive(CdmTime);
            check.positive(MolarMassK);
        }
    } else {
        check.non_negative(InertConcentration);
        check.temperature(InitialTemperature);
        for field in [
            HeatCapacityA,
            HeatCapacityB,
            HeatCapacityC,
            HeatCapacityD,
            HeatCapacityI,
        ] {
            check.heat_capacity(field);
        }
        check.positive(PreExponentialFactorT);
        check.positive(ActivationEnergyT);
        check.any_number(ReactionEnthalpy);
    }

    if modes.heat_exchanger() {
        check.temperature(CoolingFluidTemperature);
        check.heat_capacity(HeatCapacityRef);
        check.positive(HeatTransferCoefficient);
        check.positive(HeatExchangeArea);
        check.positive(FluidRateRef);
    }

    if modes.equilibrium(EquilibriumMethod::VantHoff) {
        check.positive(KeRef);
        check.temperature(TRef);
        check.any_number(DeltaHrxn);
    }
    if modes.equilibrium(EquilibriumMethod::Gibbs) {
        for field in [GibbsEnergyA, GibbsEnergyB, GibbsEnergyC, GibbsEnergyD] {
            check.any_number(field);
        }
    }
    if modes.isothermal() && modes.equilibrium(EquilibriumMethod::Direct) {
        check.positive(Ke);
    }

    check.finish()
}

/// Validates a whole configuration against its own modes.
pub fn validate_configuration(config: &ReactorConfiguration) -> ValidationErrors {
    validate(&config.parameters, ValidationModes::from(config))
}

#[cfg(test)]
#[path = "tests/validation_tests.rs"]
mod tests;
