// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Contains the PlaneMapper struct, which describes a relationship
//! between a rectangle on the integral plane with an origin at 0,0 in
//! the upper left, and a window on the complex plane.  Row 0 of the
//! image is the top of the window, so the imaginary axis runs the
//! other way from the rows.

use error::RenderError;
use num::Complex;

/// Describes the width and height of an integral plane that is
/// assumed to start at 0,0.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct IntegralPlane(pub usize, pub usize);

/// Describes the x, y (column, row) of a point in a region.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Pixel(pub usize, pub usize);

/// The rectangle of the complex plane being rendered, treating the
/// real part as the x-component and the imaginary part as the
/// y-component.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Window {
    /// Left edge.
    pub re_min: f64,
    /// Right edge.
    pub re_max: f64,
    /// Bottom edge.
    pub im_min: f64,
    /// Top edge.
    pub im_max: f64,
}

impl Window {
    /// Constructor.  The minimum of each axis must not lie above its
    /// maximum, and all four edges must be finite.
    pub fn new(re_min: f64, re_max: f64, im_min: f64, im_max: f64) -> Result<Window, RenderError> {
        let window = Window {
            re_min,
            re_max,
            im_min,
            im_max,
        };
        window.validate()?;
        Ok(window)
    }

    /// The window between a left-lower and a right-upper corner.
    pub fn from_corners(
        leftlower: Complex<f64>,
        rightupper: Complex<f64>,
    ) -> Result<Window, RenderError> {
        Window::new(leftlower.re, rightupper.re, leftlower.im, rightupper.im)
    }

    /// Checks a window that may have been built field by field.
    pub fn validate(&self) -> Result<(), RenderError> {
        let edges = [self.re_min, self.re_max, self.im_min, self.im_max];
        if edges.iter().any(|e| !e.is_finite()) {
            return Err(RenderError::NonFiniteWindow);
        }
        if self.re_max < self.re_min {
            return Err(RenderError::InvertedWindow {
                axis: "real",
                min: self.re_min,
                max: self.re_max,
            });
        }
        if self.im_max < self.im_min {
            return Err(RenderError::InvertedWindow {
                axis: "imaginary",
                min: self.im_min,
                max: self.im_max,
            });
        }
        Ok(())
    }
}

/// Contains the definitions of two planes: an integral cartesian
/// plane, and a complex window.  Maps pixels of the one to points of
/// the other.  The first and last column land exactly on the left and
/// right edges of the window, the first and last row on the top and
/// bottom edges.
#[derive(Debug)]
pub struct PlaneMapper {
    /// The size of the integral plane.
    pub integral_plane: IntegralPlane,
    /// The complex window.
    pub window: Window,
    // Complex distance between neighbouring columns and rows.
    grid_factors: (f64, f64),
}

/// Distance between neighbouring samples when `count` samples span
/// `extent`.  A single sample sits on the lower edge.
fn step(extent: f64, count: usize) -> f64 {
    if count > 1 {
        extent / ((count - 1) as f64)
    } else {
        0.0
    }
}

impl PlaneMapper {
    /// Map a `width` by `height` image onto `window`.
    pub fn new(width: usize, height: usize, window: Window) -> PlaneMapper {
        PlaneMapper {
            integral_plane: IntegralPlane(width, height),
            window,
            grid_factors: (
                step(window.re_max - window.re_min, width),
                step(window.im_max - window.im_min, height),
            ),
        }
    }

    /// The total number of points in the integral grid.
    pub fn len(&self) -> usize {
        self.integral_plane.0 * self.integral_plane.1
    }

    /// Describes that the integral plane is of a size.
    pub fn is_empty(&self) -> bool {
        self.integral_plane.0 == 0 || self.integral_plane.1 == 0
    }

    /// Given a pixel on the integral plane, return the complex number
    /// at the equivalent location of the window.
    pub fn pixel_to_point(&self, pixel: &Pixel) -> Complex<f64> {
        let height = self.integral_plane.1 as f64;
        Complex::new(
            (pixel.0 as f64) * self.grid_factors.0 + self.window.re_min,
            (height - 1.0 - (pixel.1 as f64)) * self.grid_factors.1 + self.window.im_min,
        )
    }
}
