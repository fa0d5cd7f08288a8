// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Antenna array factor analysis.

Element positions are normalized to the wavelength, angles are taken in
degrees, and every evaluator returns the complex array factor in linear
scale; [`db::magnitude_db`] converts to decibels with a -100 dB floor.
 */

mod constants;
pub mod db;
pub mod errors;
pub mod geometry;
pub mod linear;
pub mod rect;
pub mod window;

pub use errors::ArrayError;
pub use geometry::{ArrayGeometry, Element, Pattern2d};
pub use linear::{LinearArray, LinearArrayUpdate, LinearPattern};
pub use rect::{FftConfig, RectArray, RectArrayUpdate, RectPattern};
pub use window::Window;
