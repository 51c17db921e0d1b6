//! Standard bivariate test functions in interval form.
//!
//! Each function is written once over [`Interval`] arguments; evaluating it
//! on a box yields an enclosure of its range there. Squares use
//! [`Interval::sqr`] rather than self-multiplication to keep the enclosures
//! reasonably tight.
//!
//! | Name               | Domain                    | Global minimum          |
//! |--------------------|---------------------------|-------------------------|
//! | `sphere`           | [-2, 2] × [-2, 2]         | 0 at (0, 0)             |
//! | `double_well`      | [-2, 2] × [-1, 1]         | 0 at x = ±1             |
//! | `booth`            | [-10, 10] × [-10, 10]     | 0 at (1, 3)             |
//! | `beale`            | [-4.5, 4.5] × [-4.5, 4.5] | 0 at (3, 0.5)           |
//! | `matyas`           | [-10, 10] × [-10, 10]     | 0 at (0, 0)             |
//! | `three_hump_camel` | [-5, 5] × [-5, 5]         | 0 at (0, 0)             |
//! | `six_hump_camel`   | [-3, 3] × [-2, 2]         | -1.0316284534898774     |
//! | `goldstein_price`  | [-2, 2] × [-2, 2]         | 3 at (0, -1)            |
//! | `rosenbrock`       | [-2, 2] × [-1, 3]         | 0 at (1, 1)             |

use crate::error::Result;
use crate::interval::Interval;
use crate::objective::FunctionRegistry;
use crate::types::SearchBox;

/// `x² + y²`
pub fn sphere(x: Interval, y: Interval) -> Interval {
    x.sqr() + y.sqr()
}

/// `(x² - 1)²`, minimal on the two lines `x = -1` and `x = 1`.
pub fn double_well(x: Interval, _y: Interval) -> Interval {
    (x.sqr() - 1.0).sqr()
}

/// `(x + 2y - 7)² + (2x + y - 5)²`
pub fn booth(x: Interval, y: Interval) -> Interval {
    (x + 2.0 * y - 7.0).sqr() + (2.0 * x + y - 5.0).sqr()
}

/// `(1.5 - x + xy)² + (2.25 - x + xy²)² + (2.625 - x + xy³)²`
pub fn beale(x: Interval, y: Interval) -> Interval {
    (1.5 - x + x * y).sqr() + (2.25 - x + x * y.sqr()).sqr() + (2.625 - x + x * y.powi(3)).sqr()
}

/// `0.26(x² + y²) - 0.48xy`
pub fn matyas(x: Interval, y: Interval) -> Interval {
    0.26 * (x.sqr() + y.sqr()) - 0.48 * x * y
}

/// `2x² - 1.05x⁴ + x⁶/6 + xy + y²`
pub fn three_hump_camel(x: Interval, y: Interval) -> Interval {
    2.0 * x.sqr() - 1.05 * x.powi(4) + x.powi(6) * (1.0 / 6.0) + x * y + y.sqr()
}

/// `(4 - 2.1x² + x⁴/3)x² + xy + (-4 + 4y²)y²`
pub fn six_hump_camel(x: Interval, y: Interval) -> Interval {
    (4.0 - 2.1 * x.sqr() + x.powi(4) * (1.0 / 3.0)) * x.sqr()
        + x * y
        + (-4.0 + 4.0 * y.sqr()) * y.sqr()
}

/// Goldstein–Price function.
pub fn goldstein_price(x: Interval, y: Interval) -> Interval {
    let a = (x + y + 1.0).sqr()
        * (19.0 - 14.0 * x + 3.0 * x.sqr() - 14.0 * y + 6.0 * x * y + 3.0 * y.sqr());
    let b = (2.0 * x - 3.0 * y).sqr()
        * (18.0 - 32.0 * x + 12.0 * x.sqr() + 48.0 * y - 36.0 * x * y + 27.0 * y.sqr());
    (1.0 + a) * (30.0 + b)
}

/// `100(y - x²)² + (1 - x)²`
pub fn rosenbrock(x: Interval, y: Interval) -> Interval {
    100.0 * (y - x.sqr()).sqr() + (1.0 - x).sqr()
}

/// Minimum value of the six-hump camel function.
pub const SIX_HUMP_CAMEL_MINIMUM: f64 = -1.031_628_453_489_877_4;

impl FunctionRegistry {
    /// Registry holding every function of this module with its usual domain.
    pub fn standard() -> Result<Self> {
        let mut reg = Self::new();
        reg.register_with_minimum("sphere", sphere, SearchBox::from_bounds((-2.0, 2.0), (-2.0, 2.0))?, 0.0)
            .register_with_minimum("double_well", double_well, SearchBox::from_bounds((-2.0, 2.0), (-1.0, 1.0))?, 0.0)
            .register_with_minimum("booth", booth, SearchBox::from_bounds((-10.0, 10.0), (-10.0, 10.0))?, 0.0)
            .register_with_minimum("beale", beale, SearchBox::from_bounds((-4.5, 4.5), (-4.5, 4.5))?, 0.0)
            .register_with_minimum("matyas", matyas, SearchBox::from_bounds((-10.0, 10.0), (-10.0, 10.0))?, 0.0)
            .register_with_minimum(
                "three_hump_camel",
                three_hump_camel,
                SearchBox::from_bounds((-5.0, 5.0), (-5.0, 5.0))?,
                0.0,
            )
            .register_with_minimum(
                "six_hump_camel",
                six_hump_camel,
                SearchBox::from_bounds((-3.0, 3.0), (-2.0, 2.0))?,
                SIX_HUMP_CAMEL_MINIMUM,
            )
            .register_with_minimum(
                "goldstein_price",
                goldstein_price,
                SearchBox::from_bounds((-2.0, 2.0), (-2.0, 2.0))?,
                3.0,
            )
            .register_with_minimum("rosenbrock", rosenbrock, SearchBox::from_bounds((-2.0, 2.0), (-1.0, 3.0))?, 0.0);
        Ok(reg)
    }
}
