use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} value '{value}'")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

macro_rules! mode_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $wire:literal),+ $(,)? } default $default:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $wire)]
                $variant,
            )+
        }

        impl Default for $name {
            fn default() -> Self {
                Self::$default
            }
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$(Self::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $wire,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnknownVariant;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                match value.trim() {
                    $($wire => Ok(Self::$variant),)+
                    other => Err(UnknownVariant {
                        kind: stringify!($name),
                        value: other.to_string(),
                    }),
                }
            }
        }
    };
}

mode_enum!(OperationType {
    Isothermal => "isothermic",
    NonIsothermal => "non-isothermic",
} default Isothermal);

mode_enum!(IsothermicMode {
    ByConversion => "x",
    ByTime => "t",
} default ByConversion);

mode_enum!(EnergyMode {
    Adiabatic => "adiabatic",
    HeatExchanger => "icq",
} default Adiabatic);

mode_enum!(ReactionOrder {
    First => "1",
    Second => "2",
} default First);

mode_enum!(ReactionType {
    Reversible => "reversible",
    Irreversible => "irreversible",
} default Reversible);

mode_enum!(
    /// `Direct` is only legal for isothermal operation; see [`ReactorConfiguration::normalized`].
    EquilibriumMethod {
        VantHoff => "vanthoff",
        Gibbs => "gibbs",
        Direct => "direct",
    } default VantHoff
);

mode_enum!(RateConstantMode {
    Direct => "direct",
    Arrhenius => "arrhenius",
} default Direct);

mode_enum!(VolumeCalculate {
    Yes => "s",
    No => "n",
} default Yes);

mode_enum!(ProductOfInterest {
    C => "C",
    D => "D",
} default C);

mode_enum!(UnitOfTime {
    Minute => "min",
    Second => "seg",
} default Minute);

impl ReactionOrder {
    pub fn as_u8(self) -> u8 {
        match self {
            Self::First => 1,
            Self::Second => 2,
        }
    }
}

/// Chemical species addressed by the reaction `aA + bB -> cC + dD` plus the inert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Species {
    A,
    B,
    C,
    D,
    I,
}

macro_rules! parameter_fields {
    ($($variant:ident => $field:ident, $wire:literal, $default:literal;)+) => {
        /// Every numeric input of the form, keyed by its persisted camelCase name.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub enum ParameterField {
            $(
                #[serde(rename = $wire)]
                $variant,
            )+
        }

        impl ParameterField {
            pub const ALL: &'static [ParameterField] = &[$(Self::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $wire,)+
                }
            }
        }

        impl FromStr for ParameterField {
            type Err = UnknownVariant;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                match value.trim() {
                    $($wire => Ok(Self::$variant),)+
                    other => Err(UnknownVariant {
                        kind: "ParameterField",
                        value: other.to_string(),
                    }),
                }
            }
        }

        /// Raw text of every numeric input. Values stay unparsed until validation.
        #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(default)]
        pub struct ReactorParameters {
            $(
                #[serde(rename = $wire)]
                pub $field: String,
            )+
        }

        impl Default for ReactorParameters {
            fn default() -> Self {
                Self {
                    $($field: $default.to_string(),)+
                }
            }
        }

        impl ReactorParameters {
            pub fn get(&self, field: ParameterField) -> &str {
                match field {
                    $(ParameterField::$variant => &self.$field,)+
                }
            }

            pub fn set(&mut self, field: ParameterField, value: impl Into<String>) {
                let slot = match field {
                    $(ParameterField::$variant => &mut self.$field,)+
                };
                *slot = value.into();
            }
        }
    };
}

parameter_fields! {
    CoefficientA => coefficient_a, "coefficientA", "-1";
    CoefficientB => coefficient_b, "coefficientB", "-2";
    CoefficientC => coefficient_c, "coefficientC", "3";
    CoefficientD => coefficient_d, "coefficientD", "0";

    InitialConcentration => initial_concentration, "initialConcentration", "1.0";
    InitialConcentrationB => initial_concentration_b, "initialConcentrationB", "1.0";
    InitialConcentrationC => initial_concentration_c, "initialConcentrationC", "0";
    InitialConcentrationD => initial_concentration_d, "initialConcentrationD", "0";
    InertConcentration => inert_concentration, "inertConcentration", "1.0";

    DirectRateConstant => direct_rate_constant, "directRateConstant", "0.05";
    PreExponentialFactor => pre_exponential_factor, "preExponentialFactor", "1.0e10";
    ActivationEnergy => activation_energy, "activationEnergy", "50000";
    PreExponentialFactorT => pre_exponential_factor_t, "preExponentialFactorT", "1.0e10";
    ActivationEnergyT => activation_energy_t, "activationEnergyT", "50000";

    Temperature => temperature, "temperature", "298.15";
    TargetConversion => target_conversion, "targetConversion", "0.8";
    ReactionTime => reaction_time, "reactionTime", "60";

    InitialTemperature => initial_temperature, "initialTemperature", "298.15";
    HeatCapacityA => heat_capacity_a, "heatCapacityA", "35";
    HeatCapacityB => heat_capacity_b, "heatCapacityB", "18";
    HeatCapacityC => heat_capacity_c, "heatCapacityC", "46";
    HeatCapacityD => heat_capacity_d, "heatCapacityD", "0";
    HeatCapacityI => heat_capacity_i, "heatCapacityI", "19.5";
    ReactionEnthalpy => reaction_enthalpy, "reactionEnthalpy", "-50000";

    CoolingFluidTemperature => cooling_fluid_temperature, "coolingFluidTemperature", "288.15";
    HeatTransferCoefficient => heat_transfer_coefficient, "heatTransferCoefficient", "500";
    HeatExchangeArea => heat_exchange_area, "heatExchangeArea", "2.0";
    HeatCapacityRef => heat_capacity_ref, "heatCapacityRef", "4.18";
    FluidRateRef => fluid_rate_ref, "fluidRateRef", "10";

    KeRef => ke_ref, "keRef", "1.5";
    TRef => t_ref, "tRef", "298.15";
    DeltaHrxn => delta_hrxn, "deltaHrxn", "-50000";

    GibbsEnergyA => gibbs_energy_a, "gibbsEnergyA", "-50000";
    GibbsEnergyB => gibbs_energy_b, "gibbsEnergyB", "-30000";
    GibbsEnergyC => gibbs_energy_c, "gibbsEnergyC", "-70000";
    GibbsEnergyD => gibbs_energy_d, "gibbsEnergyD", "0";

    Ke => ke, "ke", "1.5";

    ProductionOfK => production_of_k, "productionOfk", "100";
    CdmTime => cdm_time, "cdmTime", "10";
    MolarMassK => molar_mass_k, "molarMassK", "45";
}

impl fmt::Display for ParameterField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The whole form: every mode selector plus the raw parameter text.
///
/// Serialized as one record; unknown or missing keys fall back to defaults so
/// records written by older front ends still load.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReactorConfiguration {
    pub operation_type: OperationType,
    pub isothermic_mode: IsothermicMode,
    pub energy_mode: EnergyMode,
    pub reaction_order: ReactionOrder,
    pub reaction_type: ReactionType,
    pub equilibrium_method: EquilibriumMethod,
    pub rate_constant_mode: RateConstantMode,
    pub volume_calculate: VolumeCalculate,
    pub product_of_interest: ProductOfInterest,
    pub excess_b: bool,
    pub unit_of_time: UnitOfTime,
    pub parameters: ReactorParameters,
}

impl ReactorConfiguration {
    pub fn parameter(&self, field: ParameterField) -> &str {
        self.parameters.get(field)
    }

    pub fn set_parameter(&mut self, field: ParameterField, value: impl Into<String>) {
        self.parameters.set(field, value);
    }

    pub fn is_isothermal(&self) -> bool {
        self.operation_type == OperationType::Isothermal
    }

    pub fn is_reversible(&self) -> bool {
        self.reaction_type == ReactionType::Reversible
    }

    /// Coerces mode combinations the form cannot express.
    ///
    /// Direct Ke entry only exists for isothermal runs, so a non-isothermal
    /// configuration falls back to Van't Hoff.
    pub fn normalized(mut self) -> Self {
        if self.operation_type == OperationType::NonIsothermal
            && self.equilibrium_method == EquilibriumMethod::Direct
        {
            self.equilibrium_method = EquilibriumMethod::VantHoff;
        }
        self
    }
}
