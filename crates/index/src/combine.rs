//! Fixed linear combinations of box-mean series.

use std::collections::BTreeMap;

use tracing::debug;
use ttt_grid::{BoundingBox, TimestampedField, box_mean};

use crate::error::IndexError;

/// One weighted group of series: contributes `weight * mean(series...)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Term {
    weight: f64,
    series: Vec<String>,
}

impl Term {
    /// Creates a term averaging `series` and scaling by `weight`.
    pub fn new<S: Into<String>>(weight: f64, series: impl IntoIterator<Item = S>) -> Self {
        Self {
            weight,
            series: series.into_iter().map(Into::into).collect(),
        }
    }

    /// Weight applied to the group mean.
    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// Names of the averaged series.
    pub fn series(&self) -> &[String] {
        &self.series
    }
}

/// A fixed linear index formula `Σ weight_k * mean(group_k)`.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexFormula {
    terms: Vec<Term>,
}

impl IndexFormula {
    /// Creates a formula from its terms.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::InvalidFormula`] if there are no terms, a term
    /// has no series, or a weight is not finite.
    pub fn new(terms: Vec<Term>) -> Result<Self, IndexError> {
        if terms.is_empty() {
            return Err(IndexError::InvalidFormula {
                reason: "formula has no terms".into(),
            });
        }
        for (i, t) in terms.iter().enumerate() {
            if t.series.is_empty() {
                return Err(IndexError::InvalidFormula {
                    reason: format!("term {i} has no series"),
                });
            }
            if !t.weight.is_finite() {
                return Err(IndexError::InvalidFormula {
                    reason: format!("term {i} weight is not finite"),
                });
            }
        }
        Ok(Self { terms })
    }

    /// The TTT formula: `0.4 * mean(E1, E2) - 0.6 * mean(W1, W2)`.
    pub fn ttt() -> Self {
        Self {
            terms: vec![Term::new(0.4, ["E1", "E2"]), Term::new(-0.6, ["W1", "W2"])],
        }
    }

    /// Formula terms.
    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    /// Names of every series the formula reads, in term order.
    pub fn series_names(&self) -> impl Iterator<Item = &str> {
        self.terms
            .iter()
            .flat_map(|t| t.series.iter().map(String::as_str))
    }

    /// Evaluates the formula at every time step.
    ///
    /// NaN in any input yields NaN at that step.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::MissingSeries`] if a referenced series is absent
    /// and [`IndexError::LengthMismatch`] if the series differ in length.
    pub fn combine(&self, inputs: &BTreeMap<String, Vec<f64>>) -> Result<Vec<f64>, IndexError> {
        let mut resolved: Vec<(f64, Vec<&[f64]>)> = Vec::with_capacity(self.terms.len());
        let mut n: Option<usize> = None;
        for term in &self.terms {
            let mut group = Vec::with_capacity(term.series.len());
            for name in &term.series {
                let s = inputs
                    .get(name)
                    .ok_or_else(|| IndexError::MissingSeries { name: name.clone() })?;
                match n {
                    None => n = Some(s.len()),
                    Some(expected) if expected != s.len() => {
                        return Err(IndexError::LengthMismatch {
                            field: name.clone(),
                            expected,
                            got: s.len(),
                        });
                    }
                    Some(_) => {}
                }
                group.push(s.as_slice());
            }
            resolved.push((term.weight, group));
        }

        let n = n.unwrap_or(0);
        Ok((0..n)
            .map(|t| {
                resolved
                    .iter()
                    .map(|(w, group)| {
                        let sum: f64 = group.iter().map(|s| s[t]).sum();
                        w * (sum / group.len() as f64)
                    })
                    .sum()
            })
            .collect())
    }
}

/// The four OLR boxes of the TTT index on the 2.5 degree grid.
///
/// | Box | Longitude | Latitude |
/// |-----|-----------|----------|
/// | E1 | 37.5E - 42.5E | 17.5S - 12.5S |
/// | E2 | 45E - 50E | 22.5S - 15S |
/// | W1 | 22.5E - 32.5E | 25S - 17.5S |
/// | W2 | 32.5E - 42.5E | 35S - 27.5S |
pub fn ttt_boxes() -> [BoundingBox; 4] {
    [
        BoundingBox::new("E1", 37.5, -17.5, 42.5, -12.5),
        BoundingBox::new("E2", 45.0, -22.5, 50.0, -15.0),
        BoundingBox::new("W1", 22.5, -25.0, 32.5, -17.5),
        BoundingBox::new("W2", 32.5, -35.0, 42.5, -27.5),
    ]
}

/// Reduces each box over `anomalies` and evaluates `formula` on the results.
///
/// # Errors
///
/// Propagates box lookup failures and formula errors.
pub fn box_index(
    anomalies: &TimestampedField,
    boxes: &[BoundingBox],
    formula: &IndexFormula,
) -> Result<Vec<f64>, IndexError> {
    let mut inputs = BTreeMap::new();
    for b in boxes {
        inputs.insert(b.name().to_string(), box_mean(anomalies, b)?);
    }
    debug!(n_boxes = boxes.len(), "box means computed");
    formula.combine(&inputs)
}
