// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Errors associated with all aspects of antarray.
 */

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ArrayError {
    #[error("An array needs at least one element; got a size of 0")]
    InvalidSize,

    /// Spacings are normalized to the wavelength and must be positive.
    #[error("Element spacing must be a positive number of wavelengths (got {got})")]
    InvalidSpacing { got: f64 },

    #[error("Got {x} x coordinates but {y} y coordinates; every element needs both")]
    CoordinateLengthMismatch { x: usize, y: usize },

    #[error("Got {got} weights for an array of {expected} elements")]
    WeightLengthMismatch { expected: usize, got: usize },

    /// Sidelobe levels are specified as positive dB of attenuation below the
    /// mainlobe.
    #[error("Sidelobe level must be positive dB below the mainlobe (got {got})")]
    InvalidSidelobeLevel { got: f64 },

    /// Taylor synthesis diverges when there are more near-constant sidelobes
    /// than the aperture can hold.
    #[error("nbar must be between 1 and {max} for a {len}-element Taylor window (got {got})")]
    InvalidNbar { got: usize, len: usize, max: usize },

    /// Weights are L1-normalized before use, which needs a positive, finite
    /// sum of magnitudes.
    #[error("Weight magnitudes must sum to a positive, finite value")]
    DegenerateWeight,

    #[error("At least one of nfft_az and nfft_el must be greater than 1")]
    NoFftAxis,
}
