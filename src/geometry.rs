// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Element geometry and the direct array-factor evaluator.

An [`ArrayGeometry`] is an ordered set of element coordinates normalized to
the wavelength. Any geometry can be evaluated directly by summing per-element
phase contributions; the separable FFT path for rectangular grids lives in
[`crate::rect`].
 */

use std::f64::consts::TAU;

use ndarray::{Array1, Array2, ArrayView1, Zip};
use num_complex::Complex64 as c64;

use crate::errors::ArrayError;

/// A single antenna element: a wavelength-normalized position with an
/// excitation amplitude and phase \[radians\].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Element {
    pub x: f64,
    pub y: f64,
    pub amplitude: f64,
    pub phase: f64,
}

impl Element {
    /// An element with unit amplitude and zero phase.
    pub fn new(x: f64, y: f64) -> Element {
        Element {
            x,
            y,
            amplitude: 1.0,
            phase: 0.0,
        }
    }

    pub fn with_excitation(x: f64, y: f64, amplitude: f64, phase: f64) -> Element {
        Element {
            x,
            y,
            amplitude,
            phase,
        }
    }

    /// The element's excitation as a complex weight.
    pub fn weight(&self) -> c64 {
        c64::from_polar(self.amplitude, self.phase)
    }
}

/// Ordered element coordinates of an antenna array, normalized to the
/// wavelength.
#[derive(Clone, Debug, PartialEq)]
pub struct ArrayGeometry {
    pub(crate) x: Array1<f64>,
    pub(crate) y: Array1<f64>,
}

/// The output of the direct evaluator: the complex array factor over a 2-D
/// direction grid, in linear scale, along with the L1-normalized weight that
/// produced it and the directional-cosine grids it was sampled on.
///
/// The first axis follows the first angle argument, the second axis the
/// second. Freshly allocated on every call.
#[derive(Clone, Debug)]
pub struct Pattern2d {
    pub array_factor: Array2<c64>,
    pub weight: Array1<c64>,
    pub u: Array2<f64>,
    pub v: Array2<f64>,
}

impl ArrayGeometry {
    /// Create a geometry from per-element x and y coordinates.
    pub fn new(x: Array1<f64>, y: Array1<f64>) -> Result<ArrayGeometry, ArrayError> {
        if x.len() != y.len() {
            return Err(ArrayError::CoordinateLengthMismatch {
                x: x.len(),
                y: y.len(),
            });
        }
        if x.is_empty() {
            return Err(ArrayError::InvalidSize);
        }
        Ok(ArrayGeometry { x, y })
    }

    /// Collect element positions into a geometry. Element excitations are not
    /// carried; map [`Element::weight`] over the same slice to use them as a
    /// weight vector.
    pub fn from_elements(elements: &[Element]) -> Result<ArrayGeometry, ArrayError> {
        ArrayGeometry::new(
            elements.iter().map(|e| e.x).collect(),
            elements.iter().map(|e| e.y).collect(),
        )
    }

    /// The number of elements.
    pub fn size(&self) -> usize {
        self.x.len()
    }

    pub fn x(&self) -> ArrayView1<f64> {
        self.x.view()
    }

    pub fn y(&self) -> ArrayView1<f64> {
        self.y.view()
    }

    /// Array factor over azimuth/elevation angle grids \[degrees\], with
    /// directional cosines `u = sin(az)`, `v = sin(el)`.
    ///
    /// `weight` defaults to uniform; it is always re-normalized so its
    /// magnitudes sum to 1, which pins the matched-beam peak at exactly 1.
    pub fn pattern(
        &self,
        azimuth_deg: &[f64],
        elevation_deg: &[f64],
        weight: Option<&[c64]>,
    ) -> Result<Pattern2d, ArrayError> {
        let us: Vec<f64> = azimuth_deg.iter().map(|a| a.to_radians().sin()).collect();
        let vs: Vec<f64> = elevation_deg.iter().map(|e| e.to_radians().sin()).collect();
        let shape = (us.len(), vs.len());
        let u = Array2::from_shape_fn(shape, |(i, _)| us[i]);
        let v = Array2::from_shape_fn(shape, |(_, j)| vs[j]);
        self.pattern_on_grids(u, v, weight)
    }

    /// Array factor over raw directional-cosine grids; `u` and `v` are used
    /// as-is.
    pub fn pattern_uv(
        &self,
        u: &[f64],
        v: &[f64],
        weight: Option<&[c64]>,
    ) -> Result<Pattern2d, ArrayError> {
        let shape = (u.len(), v.len());
        let u_grid = Array2::from_shape_fn(shape, |(i, _)| u[i]);
        let v_grid = Array2::from_shape_fn(shape, |(_, j)| v[j]);
        self.pattern_on_grids(u_grid, v_grid, weight)
    }

    /// Array factor over spherical angle grids \[degrees\], with
    /// `u = sin(theta)*cos(phi)` and `v = sin(theta)*sin(phi)`.
    pub fn pattern_spherical(
        &self,
        theta_deg: &[f64],
        phi_deg: &[f64],
        weight: Option<&[c64]>,
    ) -> Result<Pattern2d, ArrayError> {
        let shape = (theta_deg.len(), phi_deg.len());
        let sin_theta: Vec<f64> = theta_deg.iter().map(|t| t.to_radians().sin()).collect();
        let (sin_phi, cos_phi): (Vec<f64>, Vec<f64>) = phi_deg
            .iter()
            .map(|p| {
                let rad = p.to_radians();
                (rad.sin(), rad.cos())
            })
            .unzip();
        let u = Array2::from_shape_fn(shape, |(i, j)| sin_theta[i] * cos_phi[j]);
        let v = Array2::from_shape_fn(shape, |(i, j)| sin_theta[i] * sin_phi[j]);
        self.pattern_on_grids(u, v, weight)
    }

    fn pattern_on_grids(
        &self,
        u: Array2<f64>,
        v: Array2<f64>,
        weight: Option<&[c64]>,
    ) -> Result<Pattern2d, ArrayError> {
        let weight = self.normalized_weight(weight)?;
        let mut array_factor = Array2::zeros(u.raw_dim());
        // One independent summation per direction; rayon splits the grid.
        Zip::from(&mut array_factor)
            .and(&u)
            .and(&v)
            .par_for_each(|af, &u, &v| {
                let mut acc = c64::new(0.0, 0.0);
                for ((&x, &y), w) in self.x.iter().zip(self.y.iter()).zip(weight.iter()) {
                    let phase = -TAU * (x * u + y * v);
                    let (s, c) = phase.sin_cos();
                    acc += w * c64::new(c, s);
                }
                *af = acc;
            });
        Ok(Pattern2d {
            array_factor,
            weight,
            u,
            v,
        })
    }

    /// Uniform weight when unset, checked length otherwise, and always
    /// re-normalized so the magnitudes sum to 1.
    pub(crate) fn normalized_weight(
        &self,
        weight: Option<&[c64]>,
    ) -> Result<Array1<c64>, ArrayError> {
        let mut weight = match weight {
            Some(w) => {
                if w.len() != self.size() {
                    return Err(ArrayError::WeightLengthMismatch {
                        expected: self.size(),
                        got: w.len(),
                    });
                }
                Array1::from(w.to_vec())
            }
            None => Array1::from_elem(self.size(), c64::new(1.0, 0.0)),
        };
        let norm: f64 = weight.iter().map(|w| w.norm()).sum();
        if !(norm.is_finite() && norm > 0.0) {
            return Err(ArrayError::DegenerateWeight);
        }
        weight.mapv_inplace(|w| w / norm);
        Ok(weight)
    }
}
