use std::f64::consts::TAU;

use num_complex::Complex64;

use crate::spectrum::component::Spectrum;

/// Inverse transform back to `N` real samples.
///
/// Each component contributes at its own `freq`, so the result is the same whether or not the
/// spectrum was magnitude-sorted.
pub fn inverse(spectrum: &Spectrum) -> Vec<f64> {
    (0..spectrum.len())
        .map(|n| evaluate_at(spectrum, n as f64))
        .collect()
}

/// Evaluate the inverse transform at (possibly fractional) sample position `n`.
///
/// `x(n) = (1/N) * Re(sum_k X[k] * e^(+2 pi i freq_k n / N))`. An empty spectrum yields `0`.
pub fn evaluate_at(spectrum: &Spectrum, n: f64) -> f64 {
    let len = spectrum.len();
    if len == 0 {
        return 0.0;
    }
    let len_f = len as f64;

    let sum = spectrum
        .iter()
        .fold(Complex64::new(0.0, 0.0), |acc, c| {
            let arg = TAU * n * (c.freq as f64) / len_f;
            acc + c.amplitude * Complex64::new(arg.cos(), arg.sin())
        });
    sum.re / len_f
}

#[cfg(test)]
#[path = "../../tests/unit/spectrum/idft.rs"]
mod tests;
