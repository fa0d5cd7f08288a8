// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Decibel conversion for array factors.
 */

use ndarray::{Array, ArrayBase, Data, Dimension};
use num_complex::Complex64 as c64;

use crate::constants::AF_MAG_FLOOR;

/// Convert a linear-scale complex array factor to magnitude in dB,
/// `20 * log10(|AF| + 1e-5)`.
///
/// The additive epsilon saturates nulls at -100 dB instead of letting them
/// fall to -inf.
pub fn magnitude_db<S, D>(array_factor: &ArrayBase<S, D>) -> Array<f64, D>
where
    S: Data<Elem = c64>,
    D: Dimension,
{
    array_factor.mapv(|af| 20.0 * (af.norm() + AF_MAG_FLOOR).log10())
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    use super::*;

    #[test]
    fn unit_magnitude_is_near_zero_db() {
        let af = array![c64::new(1.0, 0.0), c64::new(0.0, -1.0)];
        let db = magnitude_db(&af);
        for v in db.iter() {
            assert_abs_diff_eq!(*v, 0.0, epsilon = 1e-4);
        }
    }

    #[test]
    fn nulls_saturate_at_minus_100_db() {
        let af = array![c64::new(0.0, 0.0)];
        let db = magnitude_db(&af);
        assert_abs_diff_eq!(db[0], -100.0, epsilon = 1e-12);
    }
}
