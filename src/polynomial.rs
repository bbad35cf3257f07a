//! Polynomials and the associated Legendre functions built from them.

use std::collections::HashMap;

use log::trace;

/// A real polynomial. The coefficient at index `i` multiplies `x^i`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Polynomial {
    coefficients: Vec<f64>,
}

impl Polynomial {
    /// e.g. for `2x^2 - 1`, use `Polynomial::new(vec![-1.0, 0.0, 2.0])`.
    pub fn new(coefficients: Vec<f64>) -> Self {
        Self { coefficients }
    }

    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    /// Evaluate at `x` (Horner's scheme). The empty polynomial is zero
    /// everywhere.
    pub fn evaluate(&self, x: f64) -> f64 {
        self.coefficients
            .iter()
            .rev()
            .fold(0.0, |acc, &c| acc * x + c)
    }

    /// The `k`-th derivative. Differentiating a constant gives the empty (zero)
    /// polynomial.
    pub fn derivative(&self, k: usize) -> Polynomial {
        let mut coefficients = self.coefficients.clone();
        for _ in 0..k {
            if coefficients.len() <= 1 {
                return Polynomial::default();
            }
            coefficients = coefficients
                .iter()
                .enumerate()
                .skip(1)
                .map(|(i, &c)| i as f64 * c)
                .collect();
        }
        Polynomial { coefficients }
    }
}

/// `a! / b!` as a running product, so large factorials never appear.
pub fn factorial_ratio(a: usize, b: usize) -> f64 {
    if a >= b {
        (b + 1..=a).fold(1.0, |acc, i| acc * i as f64)
    } else {
        1.0 / factorial_ratio(b, a)
    }
}

/// The ordinary Legendre polynomial of degree `n`.
pub fn legendre_polynomial(n: usize) -> Polynomial {
    let mut c = vec![0.0; n + 1];
    let scale = 0.5f64.powi(n as i32);
    for m in 0..=n / 2 {
        let sign = if m % 2 == 0 { 1.0 } else { -1.0 };
        // (2n-2m)! / (m! (n-m)! (n-2m)!)
        let ratio = factorial_ratio(2 * n - 2 * m, n - m)
            / factorial_ratio(m, 0)
            / factorial_ratio(n - 2 * m, 0);
        c[n - 2 * m] = sign * scale * ratio;
    }
    Polynomial::new(c)
}

/// Schmidt quasi-normalisation factor `sqrt(2 (n-m)! / (n+m)!)`; 1 when
/// `m == 0`.
pub fn schmidt_factor(n: usize, m: usize) -> f64 {
    if m == 0 {
        1.0
    } else {
        (2.0 / factorial_ratio(n + m, n - m)).sqrt()
    }
}

/// Memo of `d^m/dx^m P_n(x)` keyed by `(n, m)`. Entries are never evicted;
/// the model's degree bound keeps the table small.
#[derive(Debug, Default)]
pub struct LegendreCache {
    derivatives: HashMap<(usize, usize), Polynomial>,
}

impl LegendreCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The associated Legendre function `(1-x^2)^(m/2) d^m/dx^m P_n(x)`,
    /// without Condon-Shortley phase or normalisation. Callers must ensure
    /// `m <= n`.
    pub fn legendre_function(&mut self, n: usize, m: usize, x: f64) -> f64 {
        let p = self.derivatives.entry((n, m)).or_insert_with(|| {
            trace!("Caching derivative {m} of Legendre polynomial {n}");
            legendre_polynomial(n).derivative(m)
        });
        (1.0 - x * x).max(0.0).powf(m as f64 / 2.0) * p.evaluate(x)
    }

    pub fn len(&self) -> usize {
        self.derivatives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.derivatives.is_empty()
    }
}
