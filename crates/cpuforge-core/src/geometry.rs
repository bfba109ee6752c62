//! Geometric primitives for canvas positioning and hit testing.
//!
//! This module provides the small set of geometric types the diagram model
//! needs to place components, anchor pins and answer "what is under the
//! pointer" queries.
//!
//! # Overview
//!
//! - [`Point`] - A 2D coordinate in canvas space
//! - [`Size`] - Width and height dimensions
//! - [`Bounds`] - An axis-aligned rectangle defined by minimum and maximum coordinates
//!
//! # Coordinate System
//!
//! Cpuforge uses the canvas coordinate system of the editing surface:
//!
//! ```text
//!   (0,0) ────────► +X
//!     │
//!     │
//!     │
//!     ▼
//!    +Y
//! ```
//!
//! - **Origin**: Top-left corner at `(0, 0)`
//! - **X-axis**: Increases rightward
//! - **Y-axis**: Increases downward
//!
//! Component positions are stored as the top-left corner of the component;
//! pin offsets are relative to that corner.

/// A 2D point representing a position in canvas coordinate space.
///
/// # Examples
///
/// ```
/// # use cpuforge_core::geometry::Point;
/// let corner = Point::new(10.0, 20.0);
/// let offset = Point::new(100.0, 30.0);
///
/// let anchor = corner.add_point(offset);
/// assert_eq!(anchor.x(), 110.0);
/// assert_eq!(anchor.y(), 50.0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    x: f64,
    y: f64,
}

impl Point {
    /// Creates a new point with the specified coordinates
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Returns the x-coordinate of the point
    pub fn x(self) -> f64 {
        self.x
    }

    /// Returns the y-coordinate of the point
    pub fn y(self) -> f64 {
        self.y
    }

    /// Returns `true` if neither coordinate is NaN or infinite.
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Adds another point to this point, returning a new point.
    pub fn add_point(self, other: Point) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }

    /// Subtracts another point from this point, returning a new point
    pub fn sub_point(self, other: Point) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }

    /// Euclidean distance between this point and another point.
    ///
    /// # Examples
    ///
    /// ```
    /// # use cpuforge_core::geometry::Point;
    /// let a = Point::new(0.0, 0.0);
    /// let b = Point::new(3.0, 4.0);
    /// assert_eq!(a.distance(b), 5.0);
    /// ```
    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Represents the dimensions of an element with width and height
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Size {
    width: f64,
    height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Returns the width dimension of this size
    pub fn width(self) -> f64 {
        self.width
    }

    /// Returns the height dimension of this size
    pub fn height(self) -> f64 {
        self.height
    }

    pub fn is_finite(self) -> bool {
        self.width.is_finite() && self.height.is_finite()
    }

    /// Returns half of this size, the offset from a corner to the center
    pub fn half_extents(self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }
}

/// Represents a rectangular bounding box with minimum and maximum coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    min_x: f64,
    min_y: f64,
    max_x: f64,
    max_y: f64,
}

impl Bounds {
    /// Creates a new bounds from a center point and a size
    pub fn new_from_center(center: Point, size: Size) -> Self {
        let half_width = size.width / 2.0;
        let half_height = size.height / 2.0;
        Self {
            min_x: center.x - half_width,
            min_y: center.y - half_height,
            max_x: center.x + half_width,
            max_y: center.y + half_height,
        }
    }

    /// Creates a new bounds from a top-left point and a size
    pub fn new_from_top_left(top_left: Point, size: Size) -> Self {
        Self {
            min_x: top_left.x,
            min_y: top_left.y,
            max_x: top_left.x + size.width,
            max_y: top_left.y + size.height,
        }
    }

    /// Returns the minimum x-coordinate of the bounds
    pub fn min_x(self) -> f64 {
        self.min_x
    }

    /// Returns the minimum y-coordinate of the bounds
    pub fn min_y(self) -> f64 {
        self.min_y
    }

    /// Returns the maximum x-coordinate of the bounds
    pub fn max_x(self) -> f64 {
        self.max_x
    }

    /// Returns the maximum y-coordinate of the bounds
    pub fn max_y(self) -> f64 {
        self.max_y
    }

    /// Returns the center point of the bounds
    pub fn center(self) -> Point {
        Point::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    /// Returns true if the point lies inside the bounds or on their edge.
    ///
    /// # Examples
    ///
    /// ```
    /// # use cpuforge_core::geometry::{Bounds, Point, Size};
    /// let bounds = Bounds::new_from_top_left(Point::new(10.0, 10.0), Size::new(100.0, 60.0));
    ///
    /// assert!(bounds.contains(Point::new(60.0, 40.0)));
    /// assert!(bounds.contains(Point::new(110.0, 70.0))); // corner is inclusive
    /// assert!(!bounds.contains(Point::new(111.0, 40.0)));
    /// ```
    pub fn contains(self, point: Point) -> bool {
        point.x >= self.min_x
            && point.x <= self.max_x
            && point.y >= self.min_y
            && point.y <= self.max_y
    }
}


#[cfg(test)]
mod proptest_tests {
    use float_cmp::approx_eq;
    use proptest::prelude::*;

    use super::*;

    // ===================
    // Strategies
    // ===================

    fn point_strategy() -> impl Strategy<Value = Point> {
        (-1000.0f64..1000.0, -1000.0f64..1000.0).prop_map(|(x, y)| Point::new(x, y))
    }

    fn size_strategy() -> impl Strategy<Value = Size> {
        (0.0f64..1000.0, 0.0f64..1000.0).prop_map(|(w, h)| Size::new(w, h))
    }

    // ===================
    // Property Test Functions
    // ===================

    /// A bounds built around a center always contains that center.
    fn check_bounds_contain_center(center: Point, size: Size) -> Result<(), TestCaseError> {
        let bounds = Bounds::new_from_center(center, size);
        prop_assert!(bounds.contains(center), "{bounds:?} misses {center:?}");
        Ok(())
    }

    /// Distance is symmetric and never negative.
    fn check_distance_symmetric(a: Point, b: Point) -> Result<(), TestCaseError> {
        let ab = a.distance(b);
        let ba = b.distance(a);
        prop_assert!(ab >= 0.0);
        prop_assert!(approx_eq!(f64, ab, ba, ulps = 2), "{ab} != {ba}");
        Ok(())
    }

    proptest! {
        #[test]
        fn bounds_contain_center(center in point_strategy(), size in size_strategy()) {
            check_bounds_contain_center(center, size)?;
        }

        #[test]
        fn distance_symmetric(a in point_strategy(), b in point_strategy()) {
            check_distance_symmetric(a, b)?;
        }
    }
}
