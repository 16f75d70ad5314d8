//! Projection of the form into the simulation service's request document.

use shared::{
    domain::{
        EnergyMode, EquilibriumMethod, IsothermicMode, OperationType, ParameterField,
        RateConstantMode, ReactionOrder, ReactorConfiguration, Species, VolumeCalculate,
    },
    protocol::{ConversionOption, EquilibriumTag, ModeOp, SimulationRequest, SpeciesMap},
};

use crate::numeric::parse_decimal;

pub fn equilibrium_tag(method: EquilibriumMethod) -> EquilibriumTag {
    match method {
        EquilibriumMethod::VantHoff => EquilibriumTag::VantHoff,
        EquilibriumMethod::Gibbs => EquilibriumTag::Gibbs,
        EquilibriumMethod::Direct => EquilibriumTag::Direct,
    }
}

struct Source<'a> {
    config: &'a ReactorConfiguration,
}

impl Source<'_> {
    fn value(&self, field: ParameterField) -> Option<f64> {
        parse_decimal(self.config.parameter(field))
    }

    fn when(&self, active: bool, field: ParameterField) -> Option<f64> {
        if active {
            self.value(field)
        } else {
            None
        }
    }

    fn participates(&self, coefficient: ParameterField) -> bool {
        self.value(coefficient).is_some_and(|value| value != 0.0)
    }
}

/// Builds the request for `config`, nulling every field owned by an inactive mode.
pub fn compile(config: &ReactorConfiguration) -> SimulationRequest {
    use ParameterField::*;

    let config = config.clone().normalized();
    let src = Source { config: &config };

    let isothermal = config.operation_type == OperationType::Isothermal;
    let non_isothermal = !isothermal;
    let reversible = config.is_reversible();
    let method = config.equilibrium_method;
    let vant_hoff = reversible && method == EquilibriumMethod::VantHoff;
    let gibbs = reversible && method == EquilibriumMethod::Gibbs;
    let direct_ke = reversible && isothermal && method == EquilibriumMethod::Direct;
    let direct_k = isothermal && config.rate_constant_mode == RateConstantMode::Direct;
    let by_conversion = isothermal && config.isothermic_mode == IsothermicMode::ByConversion;
    let by_time = isothermal && config.isothermic_mode == IsothermicMode::ByTime;
    let sizing = isothermal && config.volume_calculate == VolumeCalculate::Yes;
    let exchanger = non_isothermal && config.energy_mode == EnergyMode::HeatExchanger;

    let b_participates = src.participates(CoefficientB);
    let c_participates = src.participates(CoefficientC);
    let d_participates = src.participates(CoefficientD);

    let mut stoichiometry = SpeciesMap::new();
    for (species, field) in [
        (Species::A, CoefficientA),
        (Species::B, CoefficientB),
        (Species::C, CoefficientC),
        (Species::D, CoefficientD),
    ] {
        if let Some(value) = src.value(field).filter(|value| *value != 0.0) {
            stoichiometry.insert(species, value);
        }
    }

    let c_p_dict = non_isothermal.then(|| {
        let mut map = SpeciesMap::new();
        let optional = [
            (Species::B, HeatCapacityB, b_participates),
            (Species::C, HeatCapacityC, c_participates),
            (Species::D, HeatCapacityD, d_participates),
        ];
        let always = [(Species::A, HeatCapacityA, true), (Species::I, HeatCapacityI, true)];
        for (species, field, include) in always.into_iter().chain(optional) {
            if let Some(value) = src.when(include, field) {
                map.insert(species, value);
            }
        }
        map
    });

    let dg_dict = gibbs.then(|| {
        let mut map = SpeciesMap::new();
        for (species, field, include) in [
            (Species::A, GibbsEnergyA, true),
            (Species::B, GibbsEnergyB, b_participates),
            (Species::C, GibbsEnergyC, true),
            (Species::D, GibbsEnergyD, d_participates),
        ] {
            if let Some(value) = src.when(include, field) {
                map.insert(species, value);
            }
        }
        map
    });

    let (pre_exponential_factor, activation_energy) = if direct_k {
        (None, None)
    } else if isothermal {
        (src.value(PreExponentialFactor), src.value(ActivationEnergy))
    } else {
        (src.value(PreExponentialFactorT), src.value(ActivationEnergyT))
    };

    let delta_h_rxn = if non_isothermal {
        src.value(ReactionEnthalpy)
    } else {
        src.when(vant_hoff, DeltaHrxn)
    };

    let option = isothermal.then_some(match config.isothermic_mode {
        IsothermicMode::ByConversion => ConversionOption::Conversion,
        IsothermicMode::ByTime => ConversionOption::Time,
    });

    SimulationRequest {
        mode_op: if isothermal {
            ModeOp::Isothermal
        } else {
            ModeOp::NonIsothermal
        },
        reversible,
        k_eq_method: reversible.then(|| equilibrium_tag(method)),
        k_eq_direct: src.when(direct_ke, Ke),
        k_eq_ref: src.when(vant_hoff, KeRef),
        t_ref: src.when(vant_hoff, TRef),
        delta_h_rxn,
        dg_dict,
        k_det: src.when(direct_k, DirectRateConstant),
        pre_exponential_factor,
        activation_energy,
        t_iso: src.when(isothermal, Temperature),
        option,
        x_a_desired: src.when(by_conversion, TargetConversion),
        t_reaction_det: src.when(by_time, ReactionTime),
        c_a0: src.value(InitialConcentration),
        c_b0: src.value(InitialConcentrationB),
        c_c0: src.value(InitialConcentrationC),
        c_d0: src.value(InitialConcentrationD),
        c_i: src.when(non_isothermal, InertConcentration),
        order: config.reaction_order.as_u8(),
        stoichiometry,
        excess_b: config.reaction_order == ReactionOrder::Second
            && b_participates
            && config.excess_b,
        ans_volume: isothermal.then_some(config.volume_calculate),
        p_k: src.when(sizing, ProductionOfK),
        t_c_d: src.when(sizing, CdmTime),
        product_k: sizing.then_some(config.product_of_interest),
        m_k: src.when(sizing, MolarMassK),
        t0: src.when(non_isothermal, InitialTemperature),
        c_p_dict,
        mode_energy: non_isothermal.then_some(config.energy_mode),
        u: src.when(exchanger, HeatTransferCoefficient),
        a_icq: src.when(exchanger, HeatExchangeArea),
        t_cool: src.when(exchanger, CoolingFluidTemperature),
        cp_ref: src.when(exchanger, HeatCapacityRef),
        m_c: src.when(exchanger, FluidRateRef),
        time_unit: config.unit_of_time,
        return_series: true,
    }
}

#[cfg(test)]
#[path = "tests/compiler_tests.rs"]
mod tests;
