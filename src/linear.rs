// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Uniformly spaced linear arrays.
 */

use std::f64::consts::TAU;

use ndarray::{Array1, Zip};
use num_complex::Complex64 as c64;

use crate::{
    constants::DEFAULT_SPACING, errors::ArrayError, geometry::ArrayGeometry, window::Window,
};

/// A uniform linear array along the x axis: element `i` sits at
/// `i * spacing` wavelengths.
#[derive(Clone, Debug, PartialEq)]
pub struct LinearArray {
    size: usize,
    spacing: f64,
    geometry: ArrayGeometry,
}

/// A partial parameter update for a [`LinearArray`]. Unset fields keep their
/// current values; applying an update rebuilds the whole geometry.
#[derive(Clone, Copy, Debug, Default)]
pub struct LinearArrayUpdate {
    pub size: Option<usize>,
    pub spacing: Option<f64>,
}

/// The steered, tapered pattern of a linear array over a theta grid
/// \[degrees\]. `array_factor` is in linear scale; `weight` is the
/// L1-normalized steering-times-taper vector that produced it.
#[derive(Clone, Debug)]
pub struct LinearPattern {
    pub array_factor: Array1<c64>,
    pub weight: Array1<c64>,
    pub theta: Array1<f64>,
}

impl LinearArray {
    pub fn new(size: usize, spacing: f64) -> Result<LinearArray, ArrayError> {
        if size == 0 {
            return Err(ArrayError::InvalidSize);
        }
        if !(spacing.is_finite() && spacing > 0.0) {
            return Err(ArrayError::InvalidSpacing { got: spacing });
        }
        let geometry = ArrayGeometry::new(
            Array1::from_shape_fn(size, |i| i as f64 * spacing),
            Array1::zeros(size),
        )?;
        Ok(LinearArray {
            size,
            spacing,
            geometry,
        })
    }

    /// A linear array at the classic half-wavelength spacing.
    pub fn half_wavelength(size: usize) -> Result<LinearArray, ArrayError> {
        LinearArray::new(size, DEFAULT_SPACING)
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn spacing(&self) -> f64 {
        self.spacing
    }

    /// The element coordinates, usable with the direct evaluator in
    /// [`crate::geometry`].
    pub fn geometry(&self) -> &ArrayGeometry {
        &self.geometry
    }

    /// Merge the set fields of `update` into the current parameters and
    /// rebuild the geometry from scratch. An empty update is the identity.
    pub fn update_parameters(&mut self, update: LinearArrayUpdate) -> Result<(), ArrayError> {
        *self = LinearArray::new(
            update.size.unwrap_or(self.size),
            update.spacing.unwrap_or(self.spacing),
        )?;
        Ok(())
    }

    /// Array factor over `theta_deg`, steered to `beam_deg` with the given
    /// amplitude taper.
    ///
    /// The steering weight is the conjugate of the sample-direction phase at
    /// the beam angle, so the peak magnitude is exactly 1 at `beam_deg` for
    /// any taper.
    pub fn pattern(
        &self,
        theta_deg: &[f64],
        beam_deg: f64,
        window: Window,
    ) -> Result<LinearPattern, ArrayError> {
        let taper = window.synthesize(self.size)?;
        let sin_beam = beam_deg.to_radians().sin();
        let x = self.geometry.x();

        let mut weight = Array1::from_shape_fn(self.size, |k| {
            let (s, c) = (TAU * x[k] * sin_beam).sin_cos();
            c64::new(c, s) * taper[k]
        });
        let norm: f64 = weight.iter().map(|w| w.norm()).sum();
        if !(norm.is_finite() && norm > 0.0) {
            return Err(ArrayError::DegenerateWeight);
        }
        weight.mapv_inplace(|w| w / norm);

        let theta = Array1::from(theta_deg.to_vec());
        let mut array_factor = Array1::zeros(theta.len());
        Zip::from(&mut array_factor)
            .and(&theta)
            .par_for_each(|af, t| {
                let sin_t = t.to_radians().sin();
                let mut acc = c64::new(0.0, 0.0);
                for (&xk, w) in x.iter().zip(weight.iter()) {
                    let (s, c) = (-TAU * xk * sin_t).sin_cos();
                    acc += w * c64::new(c, s);
                }
                *af = acc;
            });

        Ok(LinearPattern {
            array_factor,
            weight,
            theta,
        })
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    fn theta_grid() -> Vec<f64> {
        // -90..90 in steps of 0.1 degrees.
        (0..1800).map(|i| -90.0 + i as f64 * 0.1).collect()
    }

    fn peak(af: &Array1<c64>) -> (usize, f64) {
        af.iter()
            .map(|v| v.norm())
            .enumerate()
            .fold((0, f64::MIN), |acc, (i, v)| if v > acc.1 { (i, v) } else { acc })
    }

    #[test]
    fn element_positions() {
        let array = LinearArray::half_wavelength(16).unwrap();
        for (i, x) in array.geometry().x().iter().enumerate() {
            assert_eq!(*x, i as f64 * 0.5);
        }
        assert!(array.geometry().y().iter().all(|y| *y == 0.0));

        let array = LinearArray::new(32, 1.0).unwrap();
        for (i, x) in array.geometry().x().iter().enumerate() {
            assert_eq!(*x, i as f64);
        }
    }

    #[test]
    fn invalid_parameters() {
        assert!(matches!(LinearArray::new(0, 0.5), Err(ArrayError::InvalidSize)));
        assert!(matches!(
            LinearArray::new(8, 0.0),
            Err(ArrayError::InvalidSpacing { .. })
        ));
        assert!(matches!(
            LinearArray::new(8, -0.5),
            Err(ArrayError::InvalidSpacing { .. })
        ));
    }

    #[test]
    fn empty_update_is_identity() {
        let mut array = LinearArray::half_wavelength(16).unwrap();
        let before = array.clone();
        array.update_parameters(LinearArrayUpdate::default()).unwrap();
        assert_eq!(array, before);
    }

    #[test]
    fn update_merges_and_rebuilds() {
        let mut array = LinearArray::half_wavelength(16).unwrap();
        array
            .update_parameters(LinearArrayUpdate {
                size: Some(8),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(array.size(), 8);
        // Unnamed fields are retained.
        assert_eq!(array.spacing(), 0.5);
        assert_eq!(array.geometry().size(), 8);

        array
            .update_parameters(LinearArrayUpdate {
                spacing: Some(1.0),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(array.geometry().x()[7], 7.0);
    }

    #[test]
    fn square_window_unsteered_peak_is_unity_at_broadside() {
        let array = LinearArray::half_wavelength(16).unwrap();
        let theta = theta_grid();
        let pattern = array.pattern(&theta, 0.0, Window::Square).unwrap();

        for w in pattern.weight.iter() {
            assert_abs_diff_eq!(w.norm(), 1.0 / 16.0, epsilon = 1e-12);
        }
        let (i, max) = peak(&pattern.array_factor);
        assert_abs_diff_eq!(max, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(theta[i], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn steered_peak_lands_on_the_beam_angle() {
        let array = LinearArray::half_wavelength(16).unwrap();
        let theta = theta_grid();
        let pattern = array.pattern(&theta, 10.0, Window::Square).unwrap();

        let (i, max) = peak(&pattern.array_factor);
        // The steering angle sits on the grid, where the matched weight sums
        // to exactly 1.
        assert_abs_diff_eq!(max, 1.0, epsilon = 1e-9);
        assert!((theta[i] - 10.0).abs() <= 0.1 + 1e-9);
    }

    #[test]
    fn tapered_patterns_keep_a_unit_peak() {
        let array = LinearArray::half_wavelength(16).unwrap();
        let theta = theta_grid();
        for window in [
            Window::Chebyshev { sidelobe_db: 60.0 },
            Window::Taylor {
                sidelobe_db: 30.0,
                nbar: 4,
            },
            Window::Hamming,
            Window::Hann,
        ] {
            let pattern = array.pattern(&theta, -20.0, window).unwrap();
            let (i, max) = peak(&pattern.array_factor);
            assert_abs_diff_eq!(max, 1.0, epsilon = 1e-9);
            assert!((theta[i] + 20.0).abs() <= 0.1 + 1e-9);
        }
    }

    #[test]
    fn all_zero_taper_is_rejected() {
        // The length-2 Hann window is [0, 0]; nothing is left to normalize.
        let array = LinearArray::half_wavelength(2).unwrap();
        assert!(matches!(
            array.pattern(&[0.0, 10.0], 0.0, Window::Hann),
            Err(ArrayError::DegenerateWeight)
        ));
    }

    #[test]
    fn chebyshev_taper_suppresses_sidelobes() {
        let array = LinearArray::half_wavelength(16).unwrap();
        let theta = theta_grid();
        let pattern = array
            .pattern(&theta, 0.0, Window::Chebyshev { sidelobe_db: 60.0 })
            .unwrap();

        // Past the first null (near 18.5 deg for 16 elements at 60 dB) every
        // sample must sit at least 60 dB down.
        let limit = 10_f64.powf(-60.0 / 20.0) * (1.0 + 1e-6);
        for (t, af) in theta.iter().zip(pattern.array_factor.iter()) {
            if t.abs() > 20.0 {
                assert!(
                    af.norm() <= limit,
                    "sidelobe at {t} deg is {} (limit {limit})",
                    af.norm()
                );
            }
        }
    }
}
