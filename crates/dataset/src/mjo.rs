//! MJO phase from the two OMI principal components.

use chrono::NaiveDate;

use crate::error::DatasetError;
use crate::series::check_aligned;

/// Classifies an OMI (pc1, pc2) pair into MJO phase 1..=8.
///
/// The phase plane is split into octants by the axes and the diagonals
/// `pc2 = ±pc1`. Points exactly on a diagonal take the even phase of the
/// two it separates. Returns `None` if either component is NaN.
pub fn mjo_phase(pc1: f64, pc2: f64) -> Option<u8> {
    if pc1.is_nan() || pc2.is_nan() {
        return None;
    }
    let phase = if pc2 < 0.0 {
        if pc1 >= 0.0 {
            if pc2 < -pc1 { 1 } else { 2 }
        } else if -pc2 < -pc1 {
            7
        } else {
            8
        }
    } else if pc1 > 0.0 {
        if -pc2 > -pc1 { 3 } else { 4 }
    } else if pc2 > -pc1 {
        5
    } else {
        6
    };
    Some(phase)
}

/// Daily OMI record series.
#[derive(Debug, Clone, PartialEq)]
pub struct MjoIndex {
    dates: Vec<NaiveDate>,
    pc1: Vec<f64>,
    pc2: Vec<f64>,
    amplitude: Vec<f64>,
}

impl MjoIndex {
    /// Creates an index from aligned daily components.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::LengthMismatch`] if the vectors differ in
    /// length, or [`DatasetError::UnsortedDates`] if dates are not ascending.
    pub fn new(
        dates: Vec<NaiveDate>,
        pc1: Vec<f64>,
        pc2: Vec<f64>,
        amplitude: Vec<f64>,
    ) -> Result<Self, DatasetError> {
        check_aligned("mjo pc1", &dates, pc1.len())?;
        check_aligned("mjo pc2", &dates, pc2.len())?;
        check_aligned("mjo amplitude", &dates, amplitude.len())?;
        Ok(Self {
            dates,
            pc1,
            pc2,
            amplitude,
        })
    }

    /// Dates, ascending.
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Number of days.
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// `true` if the index has no days.
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// `(phase, amplitude)` on `date`, if present.
    pub fn on(&self, date: NaiveDate) -> Option<(Option<u8>, f64)> {
        let i = self.dates.binary_search(&date).ok()?;
        Some((mjo_phase(self.pc1[i], self.pc2[i]), self.amplitude[i]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn octant_interiors() {
        // Sample each octant at an angle well away from any boundary.
        let cases = [
            ((0.3, -1.0), 1),
            ((1.0, -0.3), 2),
            ((1.0, 0.3), 3),
            ((0.3, 1.0), 4),
            ((-0.3, 1.0), 5),
            ((-1.0, 0.3), 6),
            ((-1.0, -0.3), 7),
            ((-0.3, -1.0), 8),
        ];
        for ((pc1, pc2), expected) in cases {
            assert_eq!(
                mjo_phase(pc1, pc2),
                Some(expected),
                "pc1={pc1}, pc2={pc2}"
            );
        }
    }

    #[test]
    fn diagonal_boundaries() {
        assert_eq!(mjo_phase(1.0, -1.0), Some(2));
        assert_eq!(mjo_phase(-1.0, 1.0), Some(6));
        assert_eq!(mjo_phase(1.0, 1.0), Some(4));
        assert_eq!(mjo_phase(-1.0, -1.0), Some(8));
    }

    #[test]
    fn axis_boundaries() {
        assert_eq!(mjo_phase(0.0, -1.0), Some(1));
        assert_eq!(mjo_phase(1.0, 0.0), Some(3));
        assert_eq!(mjo_phase(0.0, 1.0), Some(5));
        assert_eq!(mjo_phase(-1.0, 0.0), Some(6));
        assert_eq!(mjo_phase(0.0, 0.0), Some(6));
    }

    #[test]
    fn nan_has_no_phase() {
        assert_eq!(mjo_phase(f64::NAN, 1.0), None);
        assert_eq!(mjo_phase(1.0, f64::NAN), None);
    }

    #[test]
    fn lookup_by_date() {
        let d = NaiveDate::from_ymd_opt(1990, 1, 1).unwrap();
        let m = MjoIndex::new(vec![d], vec![0.3], vec![-1.0], vec![1.04]).unwrap();
        assert_eq!(m.on(d), Some((Some(1), 1.04)));
        assert_eq!(m.on(d.succ_opt().unwrap()), None);
    }

    #[test]
    fn rejects_misaligned_components() {
        let d = NaiveDate::from_ymd_opt(1990, 1, 1).unwrap();
        let err = MjoIndex::new(vec![d], vec![0.3], vec![], vec![1.0]).unwrap_err();
        assert!(matches!(err, DatasetError::LengthMismatch { .. }));
    }
}
