//! Text helpers for front ends: the reaction equation and the sampled
//! result table.

use shared::protocol::SimulationPoint;

use crate::reconcile::Stoichiometry;

pub const TABLE_MIN_POINTS: usize = 10;
pub const TABLE_MAX_POINTS: usize = 15;

const SIGNIFICANT_SHARE: f64 = 0.02;
const SIGNIFICANT_FLOOR: f64 = 0.01;

/// Renders `nu` as `2A + B → 3C`.
///
/// Species with a zero coefficient are left out, a unit coefficient is not
/// printed, and an empty side shows as `?`.
pub fn reaction_equation(nu: Stoichiometry) -> String {
    let species = [('A', nu.a), ('B', nu.b), ('C', nu.c), ('D', nu.d)];
    let term = |name: char, coefficient: f64| {
        if coefficient == 1.0 {
            name.to_string()
        } else {
            format!("{coefficient}{name}")
        }
    };

    let mut reactants = Vec::new();
    let mut products = Vec::new();
    for (name, coefficient) in species {
        if coefficient < 0.0 {
            reactants.push(term(name, coefficient.abs()));
        } else if coefficient > 0.0 {
            products.push(term(name, coefficient));
        }
    }

    let side = |terms: Vec<String>| {
        if terms.is_empty() {
            "?".to_string()
        } else {
            terms.join(" + ")
        }
    };
    format!("{} → {}", side(reactants), side(products))
}

/// Picks the rows worth tabulating from a long series.
///
/// Keeps the first and last points and every point whose conversion moved by
/// at least `max(2% of the conversion range, 0.01)` since the last kept one,
/// then pads evenly up to [`TABLE_MIN_POINTS`]. Never returns more than
/// [`TABLE_MAX_POINTS`] rows, ordered by time.
pub fn significant_points(points: &[SimulationPoint]) -> Vec<&SimulationPoint> {
    if points.len() <= TABLE_MIN_POINTS {
        return points.iter().collect();
    }

    let last = points.len() - 1;
    let mut kept = Selection::default();
    kept.insert(points, 0);
    if points[last].time != points[0].time {
        kept.insert(points, last);
    }

    let (low, high) = points
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), point| {
            (lo.min(point.conversion), hi.max(point.conversion))
        });
    let threshold = ((high - low) * SIGNIFICANT_SHARE).max(SIGNIFICANT_FLOOR);

    let mut reference = points[0].conversion;
    for index in 1..last {
        if (points[index].conversion - reference).abs() >= threshold {
            kept.insert(points, index);
            reference = points[index].conversion;
            if kept.len() >= TABLE_MAX_POINTS {
                break;
            }
        }
    }

    if kept.len() < TABLE_MIN_POINTS {
        let missing = TABLE_MIN_POINTS - kept.len();
        let interval = (points.len() / (missing + 1)).max(1);
        for step in 1..=missing {
            let index = step * interval;
            if index > 0 && index < last && !kept.has_time(points, points[index].time) {
                kept.insert(points, index);
            }
            if kept.len() >= TABLE_MIN_POINTS {
                break;
            }
        }
    }

    let mut rows: Vec<&SimulationPoint> = kept.0.iter().map(|&index| &points[index]).collect();
    rows.sort_by(|a, b| a.time.total_cmp(&b.time));
    rows.truncate(TABLE_MAX_POINTS);
    rows
}

/// Kept indices, at most one per distinct time; a later point replaces an
/// earlier one with the same time.
#[derive(Default)]
struct Selection(Vec<usize>);

impl Selection {
    fn len(&self) -> usize {
        self.0.len()
    }

    fn has_time(&self, points: &[SimulationPoint], time: f64) -> bool {
        self.0.iter().any(|&kept| points[kept].time == time)
    }

    fn insert(&mut self, points: &[SimulationPoint], index: usize) {
        let time = points[index].time;
        match self.0.iter_mut().find(|kept| points[**kept].time == time) {
            Some(slot) => *slot = index,
            None => self.0.push(index),
        }
    }
}

#[cfg(test)]
#[path = "tests/presentation_tests.rs"]
mod tests;
