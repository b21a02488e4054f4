//! Scalars that trajectory functions are written against.
//!
//! A trajectory evaluated with `f64` yields a plain pose. The same function evaluated with a
//! [`Jet`] seeded by [`Jet::variable`] carries the truncated Taylor series of every output
//! through each operation, which gives exact time derivatives up to [`MAX_DERIVATIVE_ORDER`]
//! (forward-mode automatic differentiation).

use std::fmt;
use std::fmt::Formatter;
use std::ops::{Add, Div, Mul, Neg, Sub};

/// Highest derivative order a [`Jet`] tracks, 4 is snap
pub const MAX_DERIVATIVE_ORDER: usize = 4;

const JET_LEN: usize = MAX_DERIVATIVE_ORDER + 1;

// k! for each Taylor coefficient index
const FACTORIALS: [f64; JET_LEN] = [1., 1., 2., 6., 24.];

/// Numeric operations a trajectory function needs from its time argument
pub trait Scalar:
    Copy
    + fmt::Debug
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Neg<Output = Self>
    + Add<f64, Output = Self>
    + Sub<f64, Output = Self>
    + Mul<f64, Output = Self>
    + Div<f64, Output = Self>
{
    /// A value that does not depend on time
    fn constant(value: f64) -> Self;

    /// The plain value, with any derivative information dropped
    fn value(&self) -> f64;

    fn sin(self) -> Self;

    fn cos(self) -> Self;
}

impl Scalar for f64 {
    fn constant(value: f64) -> Self {
        value
    }

    fn value(&self) -> f64 {
        *self
    }

    fn sin(self) -> Self {
        f64::sin(self)
    }

    fn cos(self) -> Self {
        f64::cos(self)
    }
}

/// A truncated Taylor series `c0 + c1 e + c2 e^2 + ...` where `ck = f^(k)(t) / k!`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Jet {
    coeffs: [f64; JET_LEN],
}

impl Jet {
    /// Returns a jet for a value with all derivatives equal to zero
    ///
    /// # Examples
    ///
    /// ```
    /// use quadtraj::Jet;
    /// let c = Jet::constant(2.5);
    /// assert_eq!(Some(0.), c.derivative(1));
    /// ```
    pub fn constant(value: f64) -> Jet {
        let mut coeffs = [0.; JET_LEN];
        coeffs[0] = value;
        Jet { coeffs }
    }

    /// Returns the independent variable seeded at `t`, i.e. dt/dt = 1
    ///
    /// # Examples
    ///
    /// ```
    /// use quadtraj::Jet;
    /// let t = Jet::variable(1.5);
    /// let sq = t * t;
    /// assert_eq!(Some(2.25), sq.derivative(0));
    /// assert_eq!(Some(3.), sq.derivative(1));
    /// assert_eq!(Some(2.), sq.derivative(2));
    /// ```
    pub fn variable(t: f64) -> Jet {
        let mut coeffs = [0.; JET_LEN];
        coeffs[0] = t;
        coeffs[1] = 1.;
        Jet { coeffs }
    }

    /// Returns the `order`-th derivative, or `None` above [`MAX_DERIVATIVE_ORDER`]
    pub fn derivative(&self, order: usize) -> Option<f64> {
        self.coeffs.get(order).map(|c| c * FACTORIALS[order])
    }

    /// Raw Taylor coefficients
    pub fn coeffs(&self) -> &[f64] {
        &self.coeffs
    }

    fn map(self, f: impl Fn(f64) -> f64) -> Jet {
        let mut coeffs = self.coeffs;
        for c in coeffs.iter_mut() {
            *c = f(*c);
        }
        Jet { coeffs }
    }

    fn sin_cos(self) -> (Jet, Jet) {
        let a = &self.coeffs;
        let mut s = [0.; JET_LEN];
        let mut c = [0.; JET_LEN];
        s[0] = a[0].sin();
        c[0] = a[0].cos();

        // (sin u)' = u' cos u and (cos u)' = -u' sin u, written on Taylor coefficients
        for k in 1..JET_LEN {
            let mut sk = 0.;
            let mut ck = 0.;
            for j in 1..=k {
                let ja = j as f64 * a[j];
                sk += ja * c[k - j];
                ck -= ja * s[k - j];
            }
            s[k] = sk / k as f64;
            c[k] = ck / k as f64;
        }

        (Jet { coeffs: s }, Jet { coeffs: c })
    }
}

impl fmt::Display for Jet {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let derivs: Vec<String> = (0..JET_LEN)
            .map(|k| format!("{}", self.coeffs[k] * FACTORIALS[k]))
            .collect();
        write!(f, "Jet({})", derivs.join(", "))
    }
}

impl Add for Jet {
    type Output = Jet;

    fn add(self, rhs: Jet) -> Jet {
        let mut coeffs = self.coeffs;
        for (c, r) in coeffs.iter_mut().zip(rhs.coeffs.iter()) {
            *c += r;
        }
        Jet { coeffs }
    }
}

impl Sub for Jet {
    type Output = Jet;

    fn sub(self, rhs: Jet) -> Jet {
        self + (-rhs)
    }
}

impl Mul for Jet {
    type Output = Jet;

    fn mul(self, rhs: Jet) -> Jet {
        let mut coeffs = [0.; JET_LEN];
        for k in 0..JET_LEN {
            for i in 0..=k {
                coeffs[k] += self.coeffs[i] * rhs.coeffs[k - i];
            }
        }
        Jet { coeffs }
    }
}

impl Neg for Jet {
    type Output = Jet;

    fn neg(self) -> Jet {
        self.map(|c| -c)
    }
}

impl Add<f64> for Jet {
    type Output = Jet;

    fn add(mut self, rhs: f64) -> Jet {
        self.coeffs[0] += rhs;
        self
    }
}

impl Sub<f64> for Jet {
    type Output = Jet;

    fn sub(mut self, rhs: f64) -> Jet {
        self.coeffs[0] -= rhs;
        self
    }
}

impl Mul<f64> for Jet {
    type Output = Jet;

    fn mul(self, rhs: f64) -> Jet {
        self.map(|c| c * rhs)
    }
}

impl Div<f64> for Jet {
    type Output = Jet;

    fn div(self, rhs: f64) -> Jet {
        self.map(|c| c / rhs)
    }
}

impl Scalar for Jet {
    fn constant(value: f64) -> Self {
        Jet::constant(value)
    }

    fn value(&self) -> f64 {
        self.coeffs[0]
    }

    fn sin(self) -> Self {
        self.sin_cos().0
    }

    fn cos(self) -> Self {
        self.sin_cos().1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert::close;

    fn derivs(jet: &Jet) -> Vec<f64> {
        (0..=MAX_DERIVATIVE_ORDER).map(|k| jet.derivative(k).unwrap()).collect()
    }

    #[test]
    fn jet_constant_and_variable() {
        let c = Jet::constant(3.5);
        assert_eq!(vec![3.5, 0., 0., 0., 0.], derivs(&c));

        let t = Jet::variable(-1.25);
        assert_eq!(vec![-1.25, 1., 0., 0., 0.], derivs(&t));
        assert_eq!(-1.25, t.value());
    }

    #[test]
    fn jet_derivative_out_of_range() {
        assert_eq!(None, Jet::variable(0.).derivative(MAX_DERIVATIVE_ORDER + 1));
    }

    #[test]
    fn jet_polynomial() {
        // f(t) = 2 - 3t + t^3 at t = 2
        let t = Jet::variable(2.);
        let f = t * t * t - t * 3. + 2.;
        let d = derivs(&f);
        close(4., d[0], 1e-12);
        close(9., d[1], 1e-12);
        close(12., d[2], 1e-12);
        close(6., d[3], 1e-12);
        close(0., d[4], 1e-12);
    }

    #[test]
    fn jet_sin_cos() {
        let t0: f64 = 0.73;
        let s = Jet::variable(t0).sin();
        let c = Jet::variable(t0).cos();

        let expected_sin = [t0.sin(), t0.cos(), -t0.sin(), -t0.cos(), t0.sin()];
        let expected_cos = [t0.cos(), -t0.sin(), -t0.cos(), t0.sin(), t0.cos()];
        for k in 0..=MAX_DERIVATIVE_ORDER {
            close(expected_sin[k], s.derivative(k).unwrap(), 1e-12);
            close(expected_cos[k], c.derivative(k).unwrap(), 1e-12);
        }
    }

    #[test]
    fn jet_chain_rule() {
        // f(t) = sin(w t), f^(k) = w^k sin(w t + k pi / 2)
        let w: f64 = 2.7;
        let t0: f64 = -0.4;
        let f = (Jet::variable(t0) * w).sin();
        for k in 0..=MAX_DERIVATIVE_ORDER {
            let expected = w.powi(k as i32) * (w * t0 + k as f64 * std::f64::consts::FRAC_PI_2).sin();
            close(expected, f.derivative(k).unwrap(), 1e-9);
        }
    }

    #[test]
    fn jet_product_rule() {
        // f(t) = t sin(t), f' = sin t + t cos t, f'' = 2 cos t - t sin t
        let t0: f64 = 1.1;
        let t = Jet::variable(t0);
        let f = t * t.sin();
        close(t0 * t0.sin(), f.derivative(0).unwrap(), 1e-12);
        close(t0.sin() + t0 * t0.cos(), f.derivative(1).unwrap(), 1e-12);
        close(2. * t0.cos() - t0 * t0.sin(), f.derivative(2).unwrap(), 1e-12);
    }

    #[test]
    fn jet_scalar_ops() {
        let t = Jet::variable(1.);
        let f = (t - 0.5) / 2. + 1.;
        assert_eq!(vec![1.25, 0.5, 0., 0., 0.], derivs(&f));

        let g = -(t - Jet::constant(1.));
        assert_eq!(vec![0., -1., 0., 0., 0.], derivs(&g));
    }

    #[test]
    fn jet_fmt() {
        let t = Jet::variable(2.);
        assert_eq!("Jet(2, 1, 0, 0, 0)", format!("{}", t));
    }

    #[test]
    fn f64_scalar() {
        assert_eq!(1.5, <f64 as Scalar>::constant(1.5));
        assert_eq!(0., Scalar::sin(0f64));
        assert_eq!(1., Scalar::cos(0f64));
    }
}
