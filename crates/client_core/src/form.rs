use std::str::FromStr;

use shared::domain::{
    EnergyMode, EquilibriumMethod, IsothermicMode, OperationType, ParameterField,
    ProductOfInterest, RateConstantMode, ReactionOrder, ReactionType, ReactorConfiguration,
    UnitOfTime, VolumeCalculate,
};

use crate::{
    error::FormError,
    validation::{validate_configuration, ValidationErrors},
};

/// One mode selector change, named the way the persisted record names it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeSelection {
    OperationType(OperationType),
    IsothermicMode(IsothermicMode),
    EnergyMode(EnergyMode),
    ReactionOrder(ReactionOrder),
    ReactionType(ReactionType),
    EquilibriumMethod(EquilibriumMethod),
    RateConstantMode(RateConstantMode),
    VolumeCalculate(VolumeCalculate),
    ProductOfInterest(ProductOfInterest),
    ExcessB(bool),
    UnitOfTime(UnitOfTime),
}

impl ModeSelection {
    pub const NAMES: &'static [&'static str] = &[
        "operationType",
        "isothermicMode",
        "energyMode",
        "reactionOrder",
        "reactionType",
        "equilibriumMethod",
        "rateConstantMode",
        "volumeCalculate",
        "productOfInterest",
        "excessB",
        "unitOfTime",
    ];

    pub fn parse(name: &str, value: &str) -> Result<Self, FormError> {
        let selection = match name.trim() {
            "operationType" => Self::OperationType(OperationType::from_str(value)?),
            "isothermicMode" => Self::IsothermicMode(IsothermicMode::from_str(value)?),
            "energyMode" => Self::EnergyMode(EnergyMode::from_str(value)?),
            "reactionOrder" => Self::ReactionOrder(ReactionOrder::from_str(value)?),
            "reactionType" => Self::ReactionType(ReactionType::from_str(value)?),
            "equilibriumMethod" => Self::EquilibriumMethod(EquilibriumMethod::from_str(value)?),
            "rateConstantMode" => Self::RateConstantMode(RateConstantMode::from_str(value)?),
            "volumeCalculate" => Self::VolumeCalculate(VolumeCalculate::from_str(value)?),
            "productOfInterest" => Self::ProductOfInterest(ProductOfInterest::from_str(value)?),
            "excessB" => match value.trim() {
                "true" => Self::ExcessB(true),
                "false" => Self::ExcessB(false),
                other => return Err(FormError::InvalidFlag(other.to_string())),
            },
            "unitOfTime" => Self::UnitOfTime(UnitOfTime::from_str(value)?),
            other => return Err(FormError::UnknownMode(other.to_string())),
        };
        Ok(selection)
    }
}

/// Live configuration plus the error map computed after the last change.
#[derive(Debug, Clone)]
pub struct ReactorForm {
    config: ReactorConfiguration,
    errors: ValidationErrors,
}

impl Default for ReactorForm {
    fn default() -> Self {
        Self::new(ReactorConfiguration::default())
    }
}

impl ReactorForm {
    pub fn new(config: ReactorConfiguration) -> Self {
        let config = config.normalized();
        let errors = validate_configuration(&config);
        Self { config, errors }
    }

    pub fn configuration(&self) -> &ReactorConfiguration {
        &self.config
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn has_errors(&self) -> bool {
        self.errors.has_errors()
    }

    pub fn set_parameter(
        &mut self,
        field: ParameterField,
        value: impl Into<String>,
    ) -> &ValidationErrors {
        self.config.set_parameter(field, value);
        self.revalidate()
    }

    pub fn select(&mut self, selection: ModeSelection) -> &ValidationErrors {
        let config = &mut self.config;
        match selection {
            ModeSelection::OperationType(value) => config.operation_type = value,
            ModeSelection::IsothermicMode(value) => config.isothermic_mode = value,
            ModeSelection::EnergyMode(value) => config.energy_mode = value,
            ModeSelection::ReactionOrder(value) => config.reaction_order = value,
            ModeSelection::ReactionType(value) => config.reaction_type = value,
            ModeSelection::EquilibriumMethod(value) => config.equilibrium_method = value,
            ModeSelection::RateConstantMode(value) => config.rate_constant_mode = value,
            ModeSelection::VolumeCalculate(value) => config.volume_calculate = value,
            ModeSelection::ProductOfInterest(value) => config.product_of_interest = value,
            ModeSelection::ExcessB(value) => config.excess_b = value,
            ModeSelection::UnitOfTime(value) => config.unit_of_time = value,
        }
        self.config = std::mem::take(&mut self.config).normalized();
        self.revalidate()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn revalidate(&mut self) -> &ValidationErrors {
        self.errors = validate_configuration(&self.config);
        &self.errors
    }

    pub fn into_configuration(self) -> ReactorConfiguration {
        self.config
    }
}

#[cfg(test)]
#[path = "tests/form_tests.rs"]
mod tests;
