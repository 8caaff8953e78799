//! Screen-space geometry primitives shared by the chrome logic and the Win32 layer.
//!
//! These mirror the Win32 `POINT` / `RECT` layout (signed 32-bit device pixels, exclusive
//! right/bottom edges) but carry no platform dependency so the drag and hit-test logic can be
//! exercised on any host.

use std::ops::Sub;
#[cfg(test)]
use std::ops::Add;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Unpack the signed x/y pair the OS packs into a message `lparam`.
    ///
    /// The low and high words are sign extended so positions on monitors left of or above
    /// the primary monitor stay negative.
    pub const fn from_lparam(lparam: isize) -> Self {
        Self {
            x: (lparam & 0xffff) as i16 as i32,
            y: ((lparam >> 16) & 0xffff) as i16 as i32,
        }
    }
}

#[cfg(test)]
impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

/// Axis aligned rectangle with exclusive right/bottom edges.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    #[cfg(test)]
    pub fn from_origin_size(origin: Point, size: Size) -> Self {
        Self::new(
            origin.x,
            origin.y,
            origin.x + size.width,
            origin.y + size.height,
        )
    }

    pub const fn origin(&self) -> Point {
        Point::new(self.left, self.top)
    }

    pub const fn width(&self) -> i32 {
        self.right - self.left
    }

    pub const fn height(&self) -> i32 {
        self.bottom - self.top
    }

    pub const fn size(&self) -> Size {
        Size::new(self.width(), self.height())
    }
}

/// Scale a 96-DPI logical length to physical pixels for `dpi`.
pub fn scale_for_dpi(value: i32, dpi: u32) -> i32 {
    const DEFAULT_DPI: f64 = 96.0;
    (value as f64 * dpi as f64 / DEFAULT_DPI).round() as i32
}
