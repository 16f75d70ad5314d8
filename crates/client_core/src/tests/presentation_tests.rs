use shared::domain::{ParameterField, ReactorConfiguration};

use super::*;

fn series(conversions: impl IntoIterator<Item = f64>) -> Vec<SimulationPoint> {
    conversions
        .into_iter()
        .enumerate()
        .map(|(index, conversion)| SimulationPoint {
            time: index as f64,
            conversion,
            ..SimulationPoint::default()
        })
        .collect()
}

fn times(rows: &[&SimulationPoint]) -> Vec<f64> {
    rows.iter().map(|point| point.time).collect()
}

#[test]
fn default_reaction_renders_reactants_and_products() {
    let nu = Stoichiometry::from_configuration(&ReactorConfiguration::default());
    assert_eq!(reaction_equation(nu), "A + 2B → 3C");
}

#[test]
fn fractional_coefficients_are_kept_and_units_dropped() {
    let nu = Stoichiometry {
        a: -1.5,
        b: 0.0,
        c: 1.0,
        d: 1.0,
    };
    assert_eq!(reaction_equation(nu), "1.5A → C + D");
}

#[test]
fn empty_sides_show_placeholder() {
    assert_eq!(reaction_equation(Stoichiometry::default()), "? → ?");

    let only_products = Stoichiometry {
        c: 2.0,
        ..Stoichiometry::default()
    };
    assert_eq!(reaction_equation(only_products), "? → 2C");
}

#[test]
fn unparseable_coefficient_is_left_out_of_the_equation() {
    let mut config = ReactorConfiguration::default();
    config.set_parameter(ParameterField::CoefficientD, "abc");
    config.set_parameter(ParameterField::CoefficientB, "0");
    let nu = Stoichiometry::from_configuration(&config);
    assert_eq!(reaction_equation(nu), "A → 3C");
}

#[test]
fn short_series_is_tabulated_whole() {
    let points = series([0.0, 0.1, 0.2, 0.3]);
    let rows = significant_points(&points);
    assert_eq!(rows.len(), 4);
    assert!(significant_points(&[]).is_empty());
}

#[test]
fn steep_series_is_capped_and_keeps_the_last_point() {
    let points = series((0..40).map(|index| index as f64 * 0.025));
    let rows = significant_points(&points);

    assert_eq!(rows.len(), TABLE_MAX_POINTS);
    let mut expected: Vec<f64> = (0..14).map(f64::from).collect();
    expected.push(39.0);
    assert_eq!(times(&rows), expected);
}

#[test]
fn flat_series_is_padded_at_even_intervals() {
    let points = series(std::iter::repeat(0.5).take(30));
    let rows = significant_points(&points);

    assert_eq!(rows.len(), TABLE_MIN_POINTS);
    assert_eq!(
        times(&rows),
        vec![0.0, 3.0, 6.0, 9.0, 12.0, 15.0, 18.0, 21.0, 24.0, 29.0]
    );
}

#[test]
fn sampled_rows_are_ordered_and_bounded() {
    let points = series((0..200).map(|index| 1.0 - (-(index as f64) * 0.03).exp()));
    let rows = significant_points(&points);

    assert!(rows.len() >= TABLE_MIN_POINTS && rows.len() <= TABLE_MAX_POINTS);
    assert_eq!(rows[0].time, 0.0);
    assert!(rows.windows(2).all(|pair| pair[0].time < pair[1].time));
}
