// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Useful constants.
 */

/// Additive floor applied to array factor magnitudes before taking the log,
/// saturating the dB scale at -100 dB instead of -inf.
pub(crate) const AF_MAG_FLOOR: f64 = 1e-5;

/// Default element spacing \[wavelengths\].
pub(crate) const DEFAULT_SPACING: f64 = 0.5;

/// Default FFT size for the rectangular-array beamformer.
pub(crate) const DEFAULT_NFFT: usize = 512;
