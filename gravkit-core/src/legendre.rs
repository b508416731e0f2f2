//! Legendre polynomials and fully-normalized associated Legendre functions
//!
//! Two families are needed when building load models:
//!
//! - [`legendre_polynomials`]: unnormalized zonal polynomials $P_l(x)$, used to
//!   integrate an axisymmetric load (such as a spherical cap) over colatitude.
//! - [`plm_colombo`]: fully-normalized (geodesy, $4\pi$) associated functions
//!   $\bar{P}_{lm}(\cos\theta)$ used to rotate that load to its centre.
//!
//! # Examples
//!
//! ```rust
//! use gravkit_core::legendre::{legendre_polynomials, plm_colombo};
//!
//! let pl = legendre_polynomials(2, 0.5).unwrap();
//! assert!((pl[2] - (-0.125)).abs() < 1e-15);
//!
//! let (plm, _dplm) = plm_colombo(1, 1.0).unwrap();
//! assert!((plm[[1, 0]] - 3.0_f64.sqrt()).abs() < 1e-15);
//! ```

use crate::errors::{GravError, GravResult};
use crate::FloatValue;
use ndarray::{s, Array1, Array2, Array3};

fn check_domain(x: FloatValue) -> GravResult<()> {
    if !x.is_finite() || x.abs() > 1.0 {
        return Err(GravError::InvalidCoordinate(format!(
            "Legendre argument must lie in [-1, 1], got {}",
            x
        )));
    }
    Ok(())
}

/// Unnormalized Legendre polynomials $P_l(x)$ for $l = 0..=l_{max}$
///
/// Uses Bonnet's recursion:
///
/// $$(l + 1) P_{l+1}(x) = (2l + 1) x P_l(x) - l P_{l-1}(x)$$
pub fn legendre_polynomials(lmax: usize, x: FloatValue) -> GravResult<Array1<FloatValue>> {
    check_domain(x)?;

    let mut pl = Array1::zeros(lmax + 1);
    pl[0] = 1.0;
    if lmax >= 1 {
        pl[1] = x;
    }
    for l in 1..lmax {
        let lf = l as FloatValue;
        pl[l + 1] = ((2.0 * lf + 1.0) * x * pl[l] - lf * pl[l - 1]) / (lf + 1.0);
    }
    Ok(pl)
}

/// Fully-normalized associated Legendre functions and their derivatives
///
/// Standard forward column method (Colombo, 1981), the most common recursion
/// for geodesy-normalized functions. The sectorial terms are seeded from
/// $\bar{P}_{00} = 1$ and $\bar{P}_{11} = \sqrt{3} u$ with $u = \sqrt{1 - x^2}$:
///
/// $$\bar{P}_{ll} = u \sqrt{\frac{2l + 1}{2l}} \bar{P}_{l-1,l-1}$$
///
/// and the remaining terms follow
///
/// $$\bar{P}_{lm} = a_{lm} x \bar{P}_{l-1,m} - b_{lm} \bar{P}_{l-2,m}$$
///
/// The second array holds the first derivatives with respect to colatitude.
/// They involve $1/\sin\theta$ and are left at zero at the poles.
///
/// Both arrays have shape `(lmax + 1, lmax + 1)` indexed `[l, m]`.
pub fn plm_colombo(
    lmax: usize,
    x: FloatValue,
) -> GravResult<(Array2<FloatValue>, Array2<FloatValue>)> {
    check_domain(x)?;

    let mut plm = Array2::zeros((lmax + 1, lmax + 1));
    let mut dplm = Array2::zeros((lmax + 1, lmax + 1));
    // for x = cos(theta): u = sin(theta)
    let u = (1.0 - x * x).sqrt();
    let at_pole = u == 0.0;

    plm[[0, 0]] = 1.0;
    if lmax == 0 {
        return Ok((plm, dplm));
    }

    let sqrt3 = (3.0 as FloatValue).sqrt();
    plm[[1, 0]] = sqrt3 * x;
    plm[[1, 1]] = sqrt3 * u;
    if !at_pole {
        dplm[[1, 0]] = (x * plm[[1, 0]] - sqrt3 * plm[[0, 0]]) / u;
        dplm[[1, 1]] = (x / u) * plm[[1, 1]];
    }

    for l in 2..=lmax {
        let lf = l as FloatValue;
        // Zonal and tesseral terms from the previously computed columns
        for m in 0..l {
            let mf = m as FloatValue;
            let alm = (((2.0 * lf - 1.0) * (2.0 * lf + 1.0)) / ((lf - mf) * (lf + mf))).sqrt();
            let blm = (((2.0 * lf + 1.0) * (lf + mf - 1.0) * (lf - mf - 1.0))
                / ((lf - mf) * (lf + mf) * (2.0 * lf - 3.0)))
                .sqrt();
            // plm[l-2, m] is zero when m == l-1
            plm[[l, m]] = alm * x * plm[[l - 1, m]] - blm * plm[[l - 2, m]];

            if !at_pole {
                let flm = (((lf * lf - mf * mf) * (2.0 * lf + 1.0)) / (2.0 * lf - 1.0)).sqrt();
                dplm[[l, m]] = (lf * x * plm[[l, m]] - flm * plm[[l - 1, m]]) / u;
            }
        }

        // Sectorial terms seed the next column
        plm[[l, l]] = u * ((2.0 * lf + 1.0) / (2.0 * lf)).sqrt() * plm[[l - 1, l - 1]];
        if !at_pole {
            dplm[[l, l]] = lf * (x / u) * plm[[l, l]];
        }
    }

    Ok((plm, dplm))
}

/// [`plm_colombo`] evaluated at many arguments
///
/// Returns arrays of shape `(lmax + 1, lmax + 1, x.len())` indexed
/// `[l, m, i]`. Every argument is checked before any is evaluated.
pub fn plm_colombo_points(
    lmax: usize,
    x: &[FloatValue],
) -> GravResult<(Array3<FloatValue>, Array3<FloatValue>)> {
    x.iter().try_for_each(|&xi| check_domain(xi))?;

    let mut plm = Array3::zeros((lmax + 1, lmax + 1, x.len()));
    let mut dplm = Array3::zeros((lmax + 1, lmax + 1, x.len()));
    for (i, &xi) in x.iter().enumerate() {
        let (p, dp) = plm_colombo(lmax, xi)?;
        plm.slice_mut(s![.., .., i]).assign(&p);
        dplm.slice_mut(s![.., .., i]).assign(&dp);
    }
    Ok((plm, dplm))
}
