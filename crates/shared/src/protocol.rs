use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::{EnergyMode, ProductOfInterest, Species, UnitOfTime, VolumeCalculate};

pub type SpeciesMap = BTreeMap<Species, f64>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModeOp {
    #[serde(rename = "isothermal")]
    Isothermal,
    #[serde(rename = "non-isothermal")]
    NonIsothermal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConversionOption {
    #[serde(rename = "X")]
    Conversion,
    #[serde(rename = "t")]
    Time,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EquilibriumTag {
    VantHoff,
    Gibbs,
    Direct,
}

/// Body of `POST /simulate`.
///
/// Every field is always serialized. Inapplicable fields are `null` so the
/// service can tell "not applicable" apart from "missing".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationRequest {
    pub mode_op: ModeOp,
    pub reversible: bool,
    pub k_eq_method: Option<EquilibriumTag>,
    #[serde(rename = "K_eq_direct")]
    pub k_eq_direct: Option<f64>,
    #[serde(rename = "K_eq_ref")]
    pub k_eq_ref: Option<f64>,
    #[serde(rename = "T_ref")]
    pub t_ref: Option<f64>,
    #[serde(rename = "delta_H_rxn")]
    pub delta_h_rxn: Option<f64>,
    #[serde(rename = "DG_dict")]
    pub dg_dict: Option<SpeciesMap>,
    #[serde(rename = "K_det")]
    pub k_det: Option<f64>,
    #[serde(rename = "A")]
    pub pre_exponential_factor: Option<f64>,
    #[serde(rename = "E")]
    pub activation_energy: Option<f64>,
    #[serde(rename = "T_iso")]
    pub t_iso: Option<f64>,
    pub option: Option<ConversionOption>,
    #[serde(rename = "X_A_desired")]
    pub x_a_desired: Option<f64>,
    pub t_reaction_det: Option<f64>,
    #[serde(rename = "C_A0")]
    pub c_a0: Option<f64>,
    #[serde(rename = "C_B0")]
    pub c_b0: Option<f64>,
    #[serde(rename = "C_C0")]
    pub c_c0: Option<f64>,
    #[serde(rename = "C_D0")]
    pub c_d0: Option<f64>,
    #[serde(rename = "C_I")]
    pub c_i: Option<f64>,
    pub order: u8,
    pub stoichiometry: SpeciesMap,
    #[serde(rename = "excess_B")]
    pub excess_b: bool,
    pub ans_volume: Option<VolumeCalculate>,
    #[serde(rename = "P_k")]
    pub p_k: Option<f64>,
    pub t_c_d: Option<f64>,
    pub product_k: Option<ProductOfInterest>,
    pub m_k: Option<f64>,
    #[serde(rename = "T0")]
    pub t0: Option<f64>,
    #[serde(rename = "C_p_dict")]
    pub c_p_dict: Option<SpeciesMap>,
    pub mode_energy: Option<EnergyMode>,
    #[serde(rename = "U")]
    pub u: Option<f64>,
    #[serde(rename = "A_ICQ")]
    pub a_icq: Option<f64>,
    #[serde(rename = "T_cool")]
    pub t_cool: Option<f64>,
    #[serde(rename = "Cp_ref")]
    pub cp_ref: Option<f64>,
    pub m_c: Option<f64>,
    pub time_unit: UnitOfTime,
    pub return_series: bool,
}

/// Summary block in the service's own vocabulary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BackendSummary {
    #[serde(default, rename = "X_A_final")]
    pub x_a_final: Option<f64>,
    #[serde(default, rename = "T_final")]
    pub temperature_final: Option<f64>,
    #[serde(default, rename = "t_final")]
    pub time_final: Option<f64>,
    #[serde(default, rename = "k_final")]
    pub k_final: Option<f64>,
    #[serde(default)]
    pub volume: Option<f64>,
    #[serde(default, rename = "X_eq")]
    pub x_eq: Option<f64>,
    #[serde(default, rename = "X_A_desired")]
    pub x_a_desired: Option<f64>,
}

/// Summary scalars in presentation vocabulary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AdditionalData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_conversion: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reaction_time: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reaction_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub equilibrium_conversion: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_conversion: Option<f64>,
}

impl AdditionalData {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationPoint {
    pub time: f64,
    #[serde(default)]
    pub conversion: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cooling_temperature: Option<f64>,
    #[serde(
        default,
        alias = "equilibrium",
        skip_serializing_if = "Option::is_none"
    )]
    pub equilibrium_conversion: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub concentration_a: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub concentration_b: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub concentration_c: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub concentration_d: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heat_generated: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heat_removed: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inverse_rate: Option<f64>,
}

impl SimulationPoint {
    pub fn has_concentration(&self) -> bool {
        self.concentration_a.is_some()
            || self.concentration_b.is_some()
            || self.concentration_c.is_some()
            || self.concentration_d.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScalarOrSeries {
    Scalar(f64),
    Series(Vec<f64>),
}

impl ScalarOrSeries {
    pub fn at(&self, index: usize) -> Option<f64> {
        match self {
            Self::Scalar(value) => Some(*value),
            Self::Series(values) => values.get(index).copied(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpeciesColumns {
    #[serde(default, rename = "A")]
    pub a: Option<Vec<f64>>,
    #[serde(default, rename = "B")]
    pub b: Option<Vec<f64>>,
    #[serde(default, rename = "C")]
    pub c: Option<Vec<f64>>,
    #[serde(default, rename = "D")]
    pub d: Option<Vec<f64>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpeciesValues {
    #[serde(default, rename = "A")]
    pub a: Option<f64>,
    #[serde(default, rename = "B")]
    pub b: Option<f64>,
    #[serde(default, rename = "C")]
    pub c: Option<f64>,
    #[serde(default, rename = "D")]
    pub d: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConcentrationColumns {
    PerPoint(Vec<SpeciesValues>),
    BySpecies(SpeciesColumns),
}

impl ConcentrationColumns {
    pub fn at(&self, index: usize) -> SpeciesValues {
        match self {
            Self::PerPoint(rows) => rows.get(index).cloned().unwrap_or_default(),
            Self::BySpecies(columns) => {
                let pick = |column: &Option<Vec<f64>>| {
                    column
                        .as_ref()
                        .and_then(|values| values.get(index).copied())
                };
                SpeciesValues {
                    a: pick(&columns.a),
                    b: pick(&columns.b),
                    c: pick(&columns.c),
                    d: pick(&columns.d),
                }
            }
        }
    }
}

/// Legacy parallel-array payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColumnarSeries {
    #[serde(default)]
    pub t_eval: Vec<f64>,
    #[serde(default, rename = "X_A_eval")]
    pub x_a_eval: Vec<f64>,
    #[serde(default, rename = "X_eq")]
    pub x_eq: Option<ScalarOrSeries>,
    #[serde(default, rename = "T_eval")]
    pub temperature: Option<Vec<f64>>,
    #[serde(default, rename = "Ta2")]
    pub cooling_temperature: Option<Vec<f64>>,
    #[serde(default)]
    pub concentrations: Option<ConcentrationColumns>,
    #[serde(default, rename = "Qgb_eval")]
    pub heat_generated: Option<Vec<f64>>,
    #[serde(default, rename = "Qrb_eval")]
    pub heat_removed: Option<Vec<f64>>,
    #[serde(default, alias = "r_eval")]
    pub rate: Option<Vec<f64>>,
}

/// The two shapes `data` arrives in, told apart by JSON structure alone:
/// an array of point records, or an object of parallel arrays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawSeries {
    Points(Vec<SimulationPoint>),
    Columnar(ColumnarSeries),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawSimulationResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub warning: bool,
    #[serde(default)]
    pub summary: Option<BackendSummary>,
    #[serde(default, rename = "additionalData")]
    pub additional_data: Option<AdditionalData>,
    #[serde(default)]
    pub data: Option<RawSeries>,
}

impl RawSimulationResponse {
    pub fn message(&self) -> &str {
        self.message.as_deref().unwrap_or_default()
    }
}

/// Canonical, presentation-ready outcome of one submission.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationResult {
    pub success: bool,
    pub message: String,
    pub warning: bool,
    pub additional_data: AdditionalData,
    pub data: Vec<SimulationPoint>,
}
