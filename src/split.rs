//! Bisection of a search box into quadrants.

use crate::interval::Interval;
use crate::types::SearchBox;

/// Number of sub-boxes produced by one bisection of a 2D box.
///
/// This is a property of the geometry and is unrelated to the number of
/// workers, even though both happen to be four.
pub const QUADRANT_COUNT: usize = 4;

/// Split a box into four equal quadrants by halving both dimensions.
///
/// The quadrants are returned in the order `(xl, yl)`, `(xl, yr)`,
/// `(xr, yl)`, `(xr, yr)`. Their union is the input box and their interiors
/// are pairwise disjoint. A zero-width dimension yields zero-width halves.
pub fn split_box(region: &SearchBox) -> [SearchBox; QUADRANT_COUNT] {
    let (xl, xr) = bisect(region.x());
    let (yl, yr) = bisect(region.y());
    [
        SearchBox::new(xl, yl),
        SearchBox::new(xl, yr),
        SearchBox::new(xr, yl),
        SearchBox::new(xr, yr),
    ]
}

#[inline]
fn bisect(i: Interval) -> (Interval, Interval) {
    let m = i.mid();
    (Interval::new(i.left(), m), Interval::new(m, i.right()))
}
