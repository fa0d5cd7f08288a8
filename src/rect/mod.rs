// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Rectangular arrays and the FFT beamformer.

A rectangular array is separable: its taper is an outer product of two 1-D
windows and its array factor is a 2-D Fourier transform of the weight grid.
The beamformer zero-pads that transform, recentres it, tiles it to cover the
grating-lobe replicas that appear when the spacing exceeds half a wavelength,
and keeps only the visible region where the directional cosines stay within
[-1, 1], mapping the surviving bins back to angles.
 */


use std::f64::consts::TAU;

use ndarray::{Array1, Array2, ArrayView1, Axis};
use num_complex::Complex64 as c64;
use rustfft::FftPlanner;

use crate::{
    constants::{DEFAULT_NFFT, DEFAULT_SPACING},
    errors::ArrayError,
    geometry::ArrayGeometry,
    window::Window,
};

/// A rectangular array on a separable grid: `sizex` columns spaced by
/// `spacingx` along the x (azimuth) axis and `sizey` rows spaced by
/// `spacingy` along the y (elevation) axis, all in wavelengths.
#[derive(Clone, Debug, PartialEq)]
pub struct RectArray {
    sizex: usize,
    sizey: usize,
    spacingx: f64,
    spacingy: f64,
    x: Array1<f64>,
    y: Array1<f64>,
}

/// A partial parameter update for a [`RectArray`]. Unset fields keep their
/// current values; applying an update rebuilds the whole geometry.
#[derive(Clone, Copy, Debug, Default)]
pub struct RectArrayUpdate {
    pub sizex: Option<usize>,
    pub sizey: Option<usize>,
    pub spacingx: Option<f64>,
    pub spacingy: Option<f64>,
}

/// Configuration for one FFT beamforming evaluation.
///
/// The FFT sizes select one of three mutually exclusive modes: azimuth-only
/// (`nfft_el <= 1`), elevation-only (`nfft_az <= 1`), or full 2-D. Leaving
/// both at 1 or below is a configuration error. In the single-axis modes the
/// other axis is contracted at `plot_el`/`plot_az`, which default to the beam
/// angles.
#[derive(Clone, Copy, Debug)]
pub struct FftConfig {
    pub nfft_az: usize,
    pub nfft_el: usize,
    /// Mainbeam azimuth \[degrees\].
    pub beam_az: f64,
    /// Mainbeam elevation \[degrees\].
    pub beam_el: f64,
    pub window_az: Window,
    pub window_el: Window,
    pub plot_az: Option<f64>,
    pub plot_el: Option<f64>,
}

impl Default for FftConfig {
    fn default() -> FftConfig {
        FftConfig {
            nfft_az: DEFAULT_NFFT,
            nfft_el: DEFAULT_NFFT,
            beam_az: 0.0,
            beam_el: 0.0,
            window_az: Window::Square,
            window_el: Window::Square,
            plot_az: None,
            plot_el: None,
        }
    }
}

/// The output of the FFT beamformer. `array_factor` is always 2-D with
/// azimuth on the first axis; a contracted axis has length 1. `azimuth` and
/// `elevation` give the angles \[degrees\] of the corresponding bins, and
/// `weight` is the L1-normalized steering-times-taper grid that was
/// transformed. `weight` is `(sizex, sizey)` in standard (row-major) layout,
/// so flattening it in iteration order yields x varying slowest, matching
/// the element order of [`RectArray::geometry`].
#[derive(Clone, Debug)]
pub struct RectPattern {
    pub array_factor: Array2<c64>,
    pub weight: Array2<c64>,
    pub x_grid: Array2<f64>,
    pub y_grid: Array2<f64>,
    pub azimuth: Array1<f64>,
    pub elevation: Array1<f64>,
}

impl RectArray {
    pub fn new(
        sizex: usize,
        sizey: usize,
        spacingx: f64,
        spacingy: f64,
    ) -> Result<RectArray, ArrayError> {
        if sizex == 0 || sizey == 0 {
            return Err(ArrayError::InvalidSize);
        }
        for spacing in [spacingx, spacingy] {
            if !(spacing.is_finite() && spacing > 0.0) {
                return Err(ArrayError::InvalidSpacing { got: spacing });
            }
        }
        Ok(RectArray {
            sizex,
            sizey,
            spacingx,
            spacingy,
            x: Array1::from_shape_fn(sizex, |i| i as f64 * spacingx),
            y: Array1::from_shape_fn(sizey, |j| j as f64 * spacingy),
        })
    }

    /// A rectangular array at half-wavelength spacing on both axes.
    pub fn half_wavelength(sizex: usize, sizey: usize) -> Result<RectArray, ArrayError> {
        RectArray::new(sizex, sizey, DEFAULT_SPACING, DEFAULT_SPACING)
    }

    pub fn sizex(&self) -> usize {
        self.sizex
    }

    pub fn sizey(&self) -> usize {
        self.sizey
    }

    pub fn spacingx(&self) -> f64 {
        self.spacingx
    }

    pub fn spacingy(&self) -> f64 {
        self.spacingy
    }

    /// Column coordinates along x.
    pub fn x(&self) -> ArrayView1<f64> {
        self.x.view()
    }

    /// Row coordinates along y.
    pub fn y(&self) -> ArrayView1<f64> {
        self.y.view()
    }

    /// The full element set as an ordered geometry (the Cartesian product of
    /// the axis coordinates, x varying slowest), usable with the direct
    /// evaluator.
    pub fn geometry(&self) -> ArrayGeometry {
        let n = self.sizex * self.sizey;
        ArrayGeometry {
            x: Array1::from_shape_fn(n, |k| self.x[k / self.sizey]),
            y: Array1::from_shape_fn(n, |k| self.y[k % self.sizey]),
        }
    }

    /// Merge the set fields of `update` into the current parameters and
    /// rebuild the geometry from scratch. An empty update is the identity.
    pub fn update_parameters(&mut self, update: RectArrayUpdate) -> Result<(), ArrayError> {
        *self = RectArray::new(
            update.sizex.unwrap_or(self.sizex),
            update.sizey.unwrap_or(self.sizey),
            update.spacingx.unwrap_or(self.spacingx),
            update.spacingy.unwrap_or(self.spacingy),
        )?;
        Ok(())
    }

    /// Evaluate the array factor by FFT beamforming.
    pub fn pattern(&self, config: &FftConfig) -> Result<RectPattern, ArrayError> {
        if config.nfft_az <= 1 && config.nfft_el <= 1 {
            return Err(ArrayError::NoFftAxis);
        }

        let weight = self.steered_weight(config)?;

        let (array_factor, azimuth, elevation) = if config.nfft_el <= 1 {
            // Azimuth cut: FFT along x, contract y at a single elevation.
            let shifted = fft_shifted_lanes(&weight, config.nfft_az, Axis(0));
            let plot_el = config.plot_el.unwrap_or(config.beam_el);
            let cut = shifted.dot(&sample_phases(self.y.view(), plot_el));

            let (reps, k_az) = k_axis(config.nfft_az, self.spacingx);
            let (af, azimuth) = crop_to_visible(tile(&cut, reps), k_az);
            (af.insert_axis(Axis(1)), azimuth, ndarray::array![plot_el])
        } else if config.nfft_az <= 1 {
            // Elevation cut: FFT along y, contract x at a single azimuth.
            let shifted = fft_shifted_lanes(&weight, config.nfft_el, Axis(1));
            let plot_az = config.plot_az.unwrap_or(config.beam_az);
            let cut = shifted.t().dot(&sample_phases(self.x.view(), plot_az));

            let (reps, k_el) = k_axis(config.nfft_el, self.spacingy);
            let (af, elevation) = crop_to_visible(tile(&cut, reps), k_el);
            (af.insert_axis(Axis(0)), ndarray::array![plot_az], elevation)
        } else {
            let shifted = fft_shifted_lanes(&weight, config.nfft_az, Axis(0));
            let shifted = fft_shifted_lanes(&shifted, config.nfft_el, Axis(1));

            let (reps_az, k_az) = k_axis(config.nfft_az, self.spacingx);
            let (reps_el, k_el) = k_axis(config.nfft_el, self.spacingy);
            let tiled = tile_axis(&tile_axis(&shifted, reps_az, Axis(0)), reps_el, Axis(1));

            let keep_az = visible_indices(&k_az);
            let keep_el = visible_indices(&k_el);
            let af = tiled
                .select(Axis(0), &keep_az)
                .select(Axis(1), &keep_el);
            (
                af,
                bins_to_degrees(k_az.select(Axis(0), &keep_az)),
                bins_to_degrees(k_el.select(Axis(0), &keep_el)),
            )
        };

        Ok(RectPattern {
            array_factor,
            weight,
            x_grid: Array2::from_shape_fn((self.sizex, self.sizey), |(i, _)| self.x[i]),
            y_grid: Array2::from_shape_fn((self.sizex, self.sizey), |(_, j)| self.y[j]),
            azimuth,
            elevation,
        })
    }

    /// The steering phase grid (conjugate of the sample-direction phase at
    /// the beam angles) times the separable taper, L1-normalized.
    fn steered_weight(&self, config: &FftConfig) -> Result<Array2<c64>, ArrayError> {
        let win_x = config.window_az.synthesize(self.sizex)?;
        let win_y = config.window_el.synthesize(self.sizey)?;
        let sin_az = config.beam_az.to_radians().sin();
        let sin_el = config.beam_el.to_radians().sin();

        let mut weight = Array2::from_shape_fn((self.sizex, self.sizey), |(i, j)| {
            let (s, c) = (TAU * (self.x[i] * sin_az + self.y[j] * sin_el)).sin_cos();
            c64::new(c, s) * (win_x[i] * win_y[j])
        });
        let norm: f64 = weight.iter().map(|w| w.norm()).sum();
        if !(norm.is_finite() && norm > 0.0) {
            return Err(ArrayError::DegenerateWeight);
        }
        weight.mapv_inplace(|w| w / norm);
        Ok(weight)
    }
}

/// Sample-direction phases `exp(-i*2*pi*coord*sin(angle))` used to contract
/// the non-FFT axis of a cut.
fn sample_phases(coords: ArrayView1<f64>, angle_deg: f64) -> Array1<c64> {
    let sin_angle = angle_deg.to_radians().sin();
    coords.mapv(|coord| {
        let (s, c) = (-TAU * coord * sin_angle).sin_cos();
        c64::new(c, s)
    })
}

/// Zero-padded (or truncated) forward FFT of every lane along `axis`, with
/// the zero-frequency bin rotated to the centre.
fn fft_shifted_lanes(input: &Array2<c64>, nfft: usize, axis: Axis) -> Array2<c64> {
    let mut planner = FftPlanner::new();
    let fft = planner.plan_fft_forward(nfft);

    let mut dim = input.raw_dim();
    dim[axis.index()] = nfft;
    let mut out = Array2::zeros(dim);

    let shift = nfft - nfft / 2;
    let mut buf = vec![c64::new(0.0, 0.0); nfft];
    for (lane, mut out_lane) in input.lanes(axis).into_iter().zip(out.lanes_mut(axis)) {
        buf.iter_mut().for_each(|b| *b = c64::new(0.0, 0.0));
        for (b, v) in buf.iter_mut().zip(lane.iter()) {
            *b = *v;
        }
        fft.process(&mut buf);
        for (i, o) in out_lane.iter_mut().enumerate() {
            *o = buf[(i + shift) % nfft];
        }
    }
    out
}

/// How many FFT periods cover the visible directional-cosine range [-1, 1].
/// One period spans `1/spacing` in u, so spacings above half a wavelength
/// need extra replicas on both sides (the grating lobes).
fn tile_factor(spacing: f64) -> usize {
    let extra = (spacing - 0.5).ceil().max(0.0) as usize;
    2 * extra + 1
}

/// The directional-cosine value of every tiled FFT bin.
fn k_axis(nfft: usize, spacing: f64) -> (usize, Array1<f64>) {
    let reps = tile_factor(spacing);
    let k = Array1::linspace(-(reps as f64), reps as f64, nfft * reps)
        .mapv(|v| 0.5 * v / spacing);
    (reps, k)
}

fn tile(cut: &Array1<c64>, reps: usize) -> Array1<c64> {
    let n = cut.len();
    Array1::from_shape_fn(n * reps, |i| cut[i % n])
}

fn tile_axis(af: &Array2<c64>, reps: usize, axis: Axis) -> Array2<c64> {
    let n = af.raw_dim()[axis.index()];
    let mut dim = af.raw_dim();
    dim[axis.index()] = n * reps;
    Array2::from_shape_fn(dim, |(i, j)| match axis {
        Axis(0) => af[(i % n, j)],
        _ => af[(i, j % n)],
    })
}

fn visible_indices(k: &Array1<f64>) -> Vec<usize> {
    k.iter()
        .enumerate()
        .filter(|(_, &v)| (-1.0..=1.0).contains(&v))
        .map(|(i, _)| i)
        .collect()
}

/// Keep the bins whose directional cosine lies in the visible region and map
/// them to angles \[degrees\].
fn crop_to_visible(af: Array1<c64>, k: Array1<f64>) -> (Array1<c64>, Array1<f64>) {
    let keep = visible_indices(&k);
    (
        af.select(Axis(0), &keep),
        bins_to_degrees(k.select(Axis(0), &keep)),
    )
}

fn bins_to_degrees(k: Array1<f64>) -> Array1<f64> {
    k.mapv(|v| v.asin().to_degrees())
}
