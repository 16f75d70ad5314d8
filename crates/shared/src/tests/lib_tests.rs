use crate::{
    domain::{
        EnergyMode, EquilibriumMethod, IsothermicMode, OperationType, ParameterField,
        ReactionType, ReactorConfiguration, ReactorParameters, UnitOfTime, VolumeCalculate,
    },
    error::{ApiError, ErrorCode},
    protocol::{ConcentrationColumns, RawSeries, RawSimulationResponse, ScalarOrSeries},
};

#[test]
fn loads_record_written_by_browser_form() {
    let raw = serde_json::json!({
        "operationType": "non-isothermic",
        "isothermicMode": "t",
        "energyMode": "icq",
        "reactionOrder": "2",
        "equilibriumMethod": "gibbs",
        "volumeCalculate": "n",
        "rateConstantMode": "arrhenius",
        "parameters": {
            "coefficientA": "-1",
            "initialConcentration": "2.5",
            "productK": "C",
            "deathTime": "5"
        }
    });

    let config: ReactorConfiguration = serde_json::from_value(raw).expect("record");
    assert_eq!(config.operation_type, OperationType::NonIsothermal);
    assert_eq!(config.isothermic_mode, IsothermicMode::ByTime);
    assert_eq!(config.energy_mode, EnergyMode::HeatExchanger);
    assert_eq!(config.volume_calculate, VolumeCalculate::No);
    assert_eq!(config.reaction_type, ReactionType::Reversible);
    assert_eq!(config.unit_of_time, UnitOfTime::Minute);
    assert_eq!(config.parameter(ParameterField::InitialConcentration), "2.5");
    assert_eq!(
        config.parameter(ParameterField::HeatCapacityA),
        ReactorParameters::default().heat_capacity_a
    );
}

#[test]
fn parameter_fields_round_trip_through_their_names() {
    for field in ParameterField::ALL {
        let parsed: ParameterField = field.as_str().parse().expect("known field");
        assert_eq!(parsed, *field);
    }
    assert!("productK".parse::<ParameterField>().is_err());
}

#[test]
fn set_parameter_updates_only_the_named_field() {
    let mut config = ReactorConfiguration::default();
    config.set_parameter(ParameterField::TargetConversion, "0.42");
    assert_eq!(config.parameters.target_conversion, "0.42");
    assert_eq!(config.parameters.reaction_time, "60");
}

#[test]
fn normalization_moves_non_isothermal_direct_ke_to_vant_hoff() {
    let config = ReactorConfiguration {
        operation_type: OperationType::NonIsothermal,
        equilibrium_method: EquilibriumMethod::Direct,
        ..ReactorConfiguration::default()
    }
    .normalized();
    assert_eq!(config.equilibrium_method, EquilibriumMethod::VantHoff);

    let isothermal = ReactorConfiguration {
        equilibrium_method: EquilibriumMethod::Direct,
        ..ReactorConfiguration::default()
    }
    .normalized();
    assert_eq!(isothermal.equilibrium_method, EquilibriumMethod::Direct);
}

#[test]
fn mode_values_parse_from_wire_strings() {
    assert_eq!("icq".parse::<EnergyMode>(), Ok(EnergyMode::HeatExchanger));
    assert_eq!(
        " vanthoff ".parse::<EquilibriumMethod>(),
        Ok(EquilibriumMethod::VantHoff)
    );
    let err = "cstr".parse::<OperationType>().expect_err("unknown");
    assert_eq!(err.kind, "OperationType");
}

#[test]
fn series_shape_is_resolved_by_structure() {
    let points: RawSimulationResponse = serde_json::from_value(serde_json::json!({
        "success": true,
        "data": [{"time": 0.0, "conversion": 0.0}]
    }))
    .expect("points");
    assert!(matches!(points.data, Some(RawSeries::Points(ref p)) if p.len() == 1));

    let columnar: RawSimulationResponse = serde_json::from_value(serde_json::json!({
        "success": true,
        "data": {"t_eval": [0.0, 1.0], "X_A_eval": [0.0, 0.1], "X_eq": 0.7}
    }))
    .expect("columnar");
    match columnar.data {
        Some(RawSeries::Columnar(series)) => {
            assert_eq!(series.t_eval.len(), 2);
            assert_eq!(series.x_eq, Some(ScalarOrSeries::Scalar(0.7)));
        }
        other => panic!("unexpected shape: {other:?}"),
    }
}

#[test]
fn concentration_columns_accept_both_layouts() {
    let by_species: ConcentrationColumns =
        serde_json::from_value(serde_json::json!({"A": [1.0, 0.5], "C": [0.0, 0.5]}))
            .expect("by species");
    let row = by_species.at(1);
    assert_eq!(row.a, Some(0.5));
    assert_eq!(row.b, None);

    let per_point: ConcentrationColumns =
        serde_json::from_value(serde_json::json!([{"A": 1.0}, {"A": 0.4, "D": 0.2}]))
            .expect("per point");
    assert_eq!(per_point.at(1).d, Some(0.2));
    assert_eq!(per_point.at(7).a, None);
}

#[test]
fn api_error_uses_snake_case_codes() {
    let body = serde_json::to_value(ApiError::new(ErrorCode::Upstream, "boom")).expect("json");
    assert_eq!(body, serde_json::json!({"code": "upstream", "message": "boom"}));
}
