use super::*;
use serde_json::json;
use shared::domain::OperationType;

fn raw(value: serde_json::Value) -> RawSimulationResponse {
    serde_json::from_value(value).expect("raw response")
}

fn assert_close(actual: Option<f64>, expected: f64) {
    let actual = actual.expect("value present");
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn points_are_enriched_with_derived_concentrations() {
    let response = raw(json!({
        "success": true,
        "message": "ok",
        "warning": false,
        "data": [
            {"time": 0, "conversion": 0},
            {"time": 10, "conversion": 0.4}
        ]
    }));

    let result = reconcile(&response, &ReactorConfiguration::default());
    assert!(result.success);
    assert_eq!(result.data.len(), 2);

    let last = &result.data[1];
    assert_eq!(last.time, 10.0);
    assert_close(last.concentration_a, 0.6);
    assert_close(last.concentration_b, 0.2);
    assert_close(last.concentration_c, 1.2);
    assert_eq!(last.concentration_d, None);

    let first = &result.data[0];
    assert_close(first.concentration_a, 1.0);
    assert_close(first.concentration_c, 0.0);
}

#[test]
fn reconcile_is_idempotent_on_enriched_points() {
    let config = ReactorConfiguration::default();
    let response = raw(json!({
        "success": true,
        "summary": {"volume": 12.5, "k_final": 0.1},
        "data": [
            {"time": 0, "conversion": 0},
            {"time": 5, "conversion": 0.25},
            {"time": 10, "conversion": 0.5}
        ]
    }));

    let once = reconcile(&response, &config);
    let again = reconcile(
        &RawSimulationResponse {
            data: Some(RawSeries::Points(once.data.clone())),
            ..response.clone()
        },
        &config,
    );
    assert_eq!(once.data, again.data);
}

#[test]
fn complete_points_pass_through_unchanged() {
    let response = raw(json!({
        "success": true,
        "data": [
            {"time": 1, "conversion": 0.5, "concentrationA": 42.0}
        ]
    }));

    let result = reconcile(&response, &ReactorConfiguration::default());
    assert_eq!(result.data[0].concentration_a, Some(42.0));
    assert_eq!(result.data[0].concentration_c, None);
}

#[test]
fn columnar_and_point_paths_derive_the_same_concentrations() {
    let config = ReactorConfiguration::default();
    let points = raw(json!({
        "success": true,
        "data": [
            {"time": 0, "conversion": 0.0},
            {"time": 2, "conversion": 0.3},
            {"time": 4, "conversion": 0.55}
        ]
    }));
    let columns = raw(json!({
        "success": true,
        "data": {
            "t_eval": [0, 2, 4],
            "X_A_eval": [0.0, 0.3, 0.55]
        }
    }));

    let from_points = reconcile(&points, &config);
    let from_columns = reconcile(&columns, &config);
    assert_eq!(from_points.data, from_columns.data);
}

#[test]
fn columnar_series_is_pivoted_per_point() {
    let config = ReactorConfiguration {
        operation_type: OperationType::NonIsothermal,
        ..ReactorConfiguration::default()
    };
    let response = raw(json!({
        "success": true,
        "data": {
            "t_eval": [0, 1, 2],
            "X_A_eval": [0.0, 0.2],
            "X_eq": 0.9,
            "T_eval": [300, 310, 320],
            "Ta2": [290, 291, 292],
            "concentrations": {"A": [1.0, 0.8, 0.6], "C": [0.0, 0.6, 1.2]},
            "Qgb_eval": [5, 6, 7],
            "Qrb_eval": [1, 2, 3]
        }
    }));

    let result = reconcile(&response, &config);
    assert_eq!(result.data.len(), 3);

    let last = &result.data[2];
    assert_eq!(last.time, 2.0);
    assert_eq!(last.conversion, 0.0);
    assert_eq!(last.temperature, Some(320.0));
    assert_eq!(last.cooling_temperature, Some(292.0));
    assert_eq!(last.equilibrium_conversion, Some(0.9));
    assert_eq!(last.concentration_a, Some(0.6));
    assert_eq!(last.concentration_c, Some(1.2));
    assert_eq!(last.heat_generated, Some(7.0));
    assert_eq!(last.heat_removed, Some(3.0));
    assert_eq!(last.inverse_rate, None);
}

#[test]
fn columnar_concentrations_accept_row_layout_and_rate_column() {
    let response = raw(json!({
        "success": true,
        "data": {
            "t_eval": [0, 1],
            "X_A_eval": [0.0, 0.5],
            "X_eq": [0.7, 0.7],
            "concentrations": [{"A": 1.0}, {"A": 0.5, "B": 0.0}],
            "r_eval": [0.0, 0.25]
        }
    }));

    let result = reconcile(&response, &ReactorConfiguration::default());
    assert_eq!(result.data[1].concentration_b, Some(0.0));
    assert_eq!(result.data[1].equilibrium_conversion, Some(0.7));
    assert_eq!(result.data[0].inverse_rate, None);
    assert_eq!(result.data[1].inverse_rate, Some(4.0));
}

#[test]
fn inverse_rate_needs_isothermal_run_with_reported_volume() {
    let data = json!([
        {"time": 0, "conversion": 0.0},
        {"time": 5, "conversion": 0.5},
        {"time": 9, "conversion": 1.0}
    ]);

    let without_volume = raw(json!({"success": true, "data": data.clone()}));
    let result = reconcile(&without_volume, &ReactorConfiguration::default());
    assert!(result.data.iter().all(|point| point.inverse_rate.is_none()));

    let with_volume = raw(json!({
        "success": true,
        "summary": {"volume": 3.2},
        "data": data.clone()
    }));
    let result = reconcile(&with_volume, &ReactorConfiguration::default());
    assert_eq!(result.data[0].inverse_rate, None);
    assert_close(result.data[1].inverse_rate, 1.0 / (0.05 * 0.5));
    assert_eq!(result.data[2].inverse_rate, None);

    let non_isothermal = ReactorConfiguration {
        operation_type: OperationType::NonIsothermal,
        ..ReactorConfiguration::default()
    };
    let result = reconcile(&with_volume, &non_isothermal);
    assert!(result.data.iter().all(|point| point.inverse_rate.is_none()));
}

#[test]
fn inverse_rate_follows_reaction_order() {
    assert_eq!(inverse_rate(0.0, 1.0, 0.1, ReactionOrder::First), None);
    assert_close(inverse_rate(0.5, 2.0, 0.1, ReactionOrder::First), 10.0);
    assert_close(inverse_rate(0.5, 2.0, 0.1, ReactionOrder::Second), 10.0);
    assert_close(inverse_rate(0.75, 2.0, 0.5, ReactionOrder::Second), 8.0);
    assert_eq!(inverse_rate(1.0, 1.0, 0.1, ReactionOrder::Second), None);
}

#[test]
fn summary_fills_gaps_in_additional_data() {
    let response = raw(json!({
        "success": true,
        "summary": {
            "X_A_final": 0.79,
            "T_final": 305.0,
            "t_final": 32.0,
            "k_final": 0.07,
            "volume": 4.1,
            "X_eq": 0.9,
            "X_A_desired": 0.8
        },
        "additionalData": {"finalConversion": 0.8}
    }));

    let result = reconcile(&response, &ReactorConfiguration::default());
    let summary = &result.additional_data;
    assert_eq!(summary.final_conversion, Some(0.8));
    assert_eq!(summary.final_temperature, Some(305.0));
    assert_eq!(summary.reaction_time, Some(32.0));
    assert_eq!(summary.reaction_rate, Some(0.07));
    assert_eq!(summary.volume, Some(4.1));
    assert_eq!(summary.equilibrium_conversion, Some(0.9));
    assert_eq!(summary.target_conversion, Some(0.8));
    assert!(result.data.is_empty());
}

#[test]
fn unsuccessful_response_yields_empty_result() {
    let response = raw(json!({
        "success": false,
        "message": "fallo numérico",
        "summary": {"X_eq": 0.6},
        "data": [{"time": 0, "conversion": 0}]
    }));

    let result = reconcile(&response, &ReactorConfiguration::default());
    assert!(!result.success);
    assert_eq!(result.message, "fallo numérico");
    assert!(result.data.is_empty());
    assert!(result.additional_data.is_empty());
}

#[test]
fn derivation_skips_non_participating_species() {
    let nu = Stoichiometry {
        a: -2.0,
        b: 0.0,
        c: 1.0,
        d: 4.0,
    };
    let values = derive_concentrations(0.5, 2.0, nu);
    assert_close(values.a, 1.0);
    assert_eq!(values.b, None);
    assert_close(values.c, 0.5);
    assert_close(values.d, 2.0);

    let degenerate = Stoichiometry {
        a: 0.0,
        b: -1.0,
        c: 1.0,
        d: 0.0,
    };
    let values = derive_concentrations(0.5, 1.0, degenerate);
    assert_close(values.a, 0.5);
    assert_eq!(values.b, None);
    assert_eq!(values.c, None);
}
