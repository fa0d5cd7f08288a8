// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Amplitude-taper window synthesis.

A window trades mainlobe width against sidelobe suppression. The Taylor and
Dolph-Chebyshev windows are synthesized in closed form; the classic cosine
windows come from their textbook coefficients. All windows are symmetric and
real-valued.
 */

use std::f64::consts::{PI, TAU};

use ndarray::Array1;

use crate::errors::ArrayError;

/// An amplitude taper applied across the elements of one array axis.
///
/// `sidelobe_db` is the attenuation of the highest sidelobe below the
/// mainlobe, as a positive number of dB (e.g. `60.0` puts sidelobes 60 dB
/// down).
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub enum Window {
    /// Uniform weighting (no taper).
    #[default]
    Square,

    /// Dolph-Chebyshev window: all sidelobes at exactly `sidelobe_db` below
    /// the mainlobe.
    Chebyshev { sidelobe_db: f64 },

    /// Taylor window: `nbar` near-constant sidelobes adjacent to the mainlobe
    /// at `sidelobe_db` below it, decaying further out. Common in radar
    /// processing (Carrara et al., "Spotlight Synthetic Aperture Radar",
    /// 1995, pp. 512-513).
    Taylor { sidelobe_db: f64, nbar: usize },

    Hamming,

    Hann,
}

impl Window {
    /// Synthesize the window as a real sequence of length `len`.
    ///
    /// Lengths of 0 or 1 degenerate to an all-ones sequence for every kind.
    pub fn synthesize(self, len: usize) -> Result<Array1<f64>, ArrayError> {
        match self {
            Window::Square => Ok(Array1::ones(len)),
            Window::Chebyshev { sidelobe_db } => chebyshev(len, sidelobe_db),
            Window::Taylor { sidelobe_db, nbar } => taylor(len, sidelobe_db, nbar),
            Window::Hamming => Ok(general_cosine(len, 0.54)),
            Window::Hann => Ok(general_cosine(len, 0.5)),
        }
    }
}

fn check_sidelobe_level(sidelobe_db: f64) -> Result<(), ArrayError> {
    if sidelobe_db.is_finite() && sidelobe_db > 0.0 {
        Ok(())
    } else {
        Err(ArrayError::InvalidSidelobeLevel { got: sidelobe_db })
    }
}

/// Symmetric raised-cosine window `alpha - (1 - alpha) * cos(2*pi*n/(N-1))`.
/// Hamming is `alpha = 0.54`, Hann is `alpha = 0.5`.
fn general_cosine(len: usize, alpha: f64) -> Array1<f64> {
    if len <= 1 {
        return Array1::ones(len);
    }
    let denom = (len - 1) as f64;
    Array1::from_shape_fn(len, |n| alpha - (1.0 - alpha) * (TAU * n as f64 / denom).cos())
}

/// Dolph-Chebyshev window with all sidelobes `at_db` below the mainlobe.
///
/// The frequency response is the order-(N-1) Chebyshev polynomial evaluated
/// on a cosine grid; the time-domain window is its real inverse transform,
/// centred on (N-1)/2 so even lengths stay symmetric.
fn chebyshev(len: usize, at_db: f64) -> Result<Array1<f64>, ArrayError> {
    check_sidelobe_level(at_db)?;
    if len <= 1 {
        return Ok(Array1::ones(len));
    }

    let m = len as f64;
    let order = m - 1.0;
    let ripple = 10_f64.powf(at_db / 20.0);
    let beta = (ripple.acosh() / order).cosh();

    // T_{N-1}(beta * cos(pi*k/N)); the polynomial needs its hyperbolic
    // continuation outside [-1, 1].
    let below_sign = if len % 2 == 0 { -1.0 } else { 1.0 };
    let response: Vec<f64> = (0..len)
        .map(|k| {
            let x = beta * (PI * k as f64 / m).cos();
            if x.abs() <= 1.0 {
                (order * x.acos()).cos()
            } else if x > 1.0 {
                (order * x.acosh()).cosh()
            } else {
                below_sign * (order * (-x).acosh()).cosh()
            }
        })
        .collect();

    let centre = order / 2.0;
    let mut w = Array1::from_shape_fn(len, |n| {
        response
            .iter()
            .enumerate()
            .map(|(k, r)| r * (TAU * k as f64 * (n as f64 - centre) / m).cos())
            .sum::<f64>()
    });

    let peak = w.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()));
    w.mapv_inplace(|v| v / peak);
    Ok(w)
}

/// Taylor window with `nbar` near-constant sidelobes at `at_db` below the
/// mainlobe.
fn taylor(len: usize, at_db: f64, nbar: usize) -> Result<Array1<f64>, ArrayError> {
    check_sidelobe_level(at_db)?;
    let max_nbar = len.div_ceil(2);
    if nbar == 0 || nbar > max_nbar.max(1) {
        return Err(ArrayError::InvalidNbar {
            got: nbar,
            len,
            max: max_nbar.max(1),
        });
    }
    if len <= 1 {
        return Ok(Array1::ones(len));
    }

    let b = 10_f64.powf(at_db / 20.0);
    let a = (b + (b * b - 1.0).sqrt()).ln() / PI;
    let a2 = a * a;
    let nbar_f = nbar as f64;
    let s2 = nbar_f * nbar_f / (a2 + (nbar_f - 0.5).powi(2));

    // Fourier coefficients F_m for m = 1..nbar-1. The j == m factor is
    // excluded from the denominator product; it would be zero.
    let mut fm = Vec::with_capacity(nbar.saturating_sub(1));
    for m in 1..nbar {
        let m2 = (m * m) as f64;
        let mut numer = if m % 2 == 1 { 1.0 } else { -1.0 };
        for j in 1..nbar {
            numer *= 1.0 - m2 / s2 / (a2 + (j as f64 - 0.5).powi(2));
        }
        let mut denom = 2.0;
        for j in (1..nbar).filter(|&j| j != m) {
            denom *= 1.0 - m2 / (j * j) as f64;
        }
        fm.push(numer / denom);
    }

    let n_f = len as f64;
    let centre = (n_f - 1.0) / 2.0;
    let sample = |n: f64| -> f64 {
        1.0 + 2.0
            * fm.iter()
                .enumerate()
                .map(|(i, f)| f * (TAU * (i + 1) as f64 * (n - centre) / n_f).cos())
                .sum::<f64>()
    };

    // Normalize on the centre sample; it equals exactly 1 only for odd
    // lengths, by construction.
    let scale = sample(centre);
    Ok(Array1::from_shape_fn(len, |n| sample(n as f64) / scale))
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    fn assert_symmetric(w: &Array1<f64>) {
        for i in 0..w.len() / 2 {
            assert_abs_diff_eq!(w[i], w[w.len() - 1 - i], epsilon = 1e-12);
        }
    }

    #[test]
    fn square_is_all_ones() {
        let w = Window::Square.synthesize(8).unwrap();
        assert_eq!(w, Array1::ones(8));
    }

    #[test]
    fn degenerate_lengths() {
        for kind in [
            Window::Square,
            Window::Chebyshev { sidelobe_db: 60.0 },
            Window::Taylor {
                sidelobe_db: 60.0,
                nbar: 1,
            },
            Window::Hamming,
            Window::Hann,
        ] {
            assert_eq!(kind.synthesize(0).unwrap().len(), 0);
            assert_eq!(kind.synthesize(1).unwrap(), Array1::ones(1));
        }
    }

    #[test]
    fn hamming_matches_textbook() {
        // scipy.signal.windows.hamming(5, sym=True)
        let w = Window::Hamming.synthesize(5).unwrap();
        let expected = [0.08, 0.54, 1.0, 0.54, 0.08];
        for (got, exp) in w.iter().zip(expected) {
            assert_abs_diff_eq!(*got, exp, epsilon = 1e-12);
        }
    }

    #[test]
    fn hann_matches_textbook() {
        // scipy.signal.windows.hann(5, sym=True)
        let w = Window::Hann.synthesize(5).unwrap();
        let expected = [0.0, 0.5, 1.0, 0.5, 0.0];
        for (got, exp) in w.iter().zip(expected) {
            assert_abs_diff_eq!(*got, exp, epsilon = 1e-12);
        }
    }

    #[test]
    fn chebyshev_is_symmetric_with_unit_peak() {
        for len in [8, 9, 16, 33] {
            let w = Window::Chebyshev { sidelobe_db: 60.0 }.synthesize(len).unwrap();
            assert_symmetric(&w);
            let peak = w.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()));
            assert_abs_diff_eq!(peak, 1.0, epsilon = 1e-12);
            // The taper must pinch the edges in.
            assert!(w[0] < w[len / 2]);
        }
    }

    #[test]
    fn chebyshev_reference_values() {
        // Dolph-Chebyshev design, N = 7, 100 dB attenuation.
        let w = Window::Chebyshev { sidelobe_db: 100.0 }.synthesize(7).unwrap();
        let expected = [
            0.05650405, 0.31660853, 0.76012081, 1.0, 0.76012081, 0.31660853, 0.05650405,
        ];
        for (got, exp) in w.iter().zip(expected) {
            assert_abs_diff_eq!(*got, exp, epsilon = 1e-7);
        }
    }

    #[test]
    fn taylor_centre_sample_is_one_for_odd_lengths() {
        for len in [7, 15, 33] {
            let w = Window::Taylor {
                sidelobe_db: 30.0,
                nbar: 4,
            }
            .synthesize(len)
            .unwrap();
            assert_abs_diff_eq!(w[(len - 1) / 2], 1.0, epsilon = 1e-12);
            assert_symmetric(&w);
        }
    }

    #[test]
    fn taylor_reference_values() {
        // N = 7, 30 dB sidelobes, nbar = 4.
        let w = Window::Taylor {
            sidelobe_db: 30.0,
            nbar: 4,
        }
        .synthesize(7)
        .unwrap();
        let expected = [
            0.29009531, 0.57821260, 0.87800822, 1.0, 0.87800822, 0.57821260, 0.29009531,
        ];
        for (got, exp) in w.iter().zip(expected) {
            assert_abs_diff_eq!(*got, exp, epsilon = 1e-7);
        }
    }

    #[test]
    fn taylor_nbar_one_is_uniform() {
        // With no controlled sidelobes there are no Fourier terms left.
        let w = Window::Taylor {
            sidelobe_db: 30.0,
            nbar: 1,
        }
        .synthesize(8)
        .unwrap();
        for v in w.iter() {
            assert_abs_diff_eq!(*v, 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn taylor_rejects_bad_nbar() {
        let result = Window::Taylor {
            sidelobe_db: 30.0,
            nbar: 0,
        }
        .synthesize(8);
        assert!(matches!(result, Err(ArrayError::InvalidNbar { got: 0, .. })));

        let result = Window::Taylor {
            sidelobe_db: 30.0,
            nbar: 9,
        }
        .synthesize(8);
        assert!(matches!(result, Err(ArrayError::InvalidNbar { got: 9, .. })));
    }

    #[test]
    fn negative_sidelobe_level_is_rejected() {
        for kind in [
            Window::Chebyshev { sidelobe_db: -60.0 },
            Window::Taylor {
                sidelobe_db: -60.0,
                nbar: 4,
            },
        ] {
            assert!(matches!(
                kind.synthesize(8),
                Err(ArrayError::InvalidSidelobeLevel { .. })
            ));
        }
    }
}
