use std::f64::consts::TAU;

use num_complex::Complex64;

use crate::spectrum::component::{SpectralComponent, Spectrum};

/// Direct discrete Fourier transform of a real sequence.
///
/// `X[k] = sum_n x[n] * (cos(2 pi n k / N) - i sin(2 pi n k / N))`, one component per input
/// sample with `freq = k`. When `sort_by_magnitude` is set the components are reordered by
/// descending magnitude (ties by ascending `freq`).
///
/// This is the O(N^2) summation; `N` is bounded by what a user draws by hand.
#[tracing::instrument(skip(samples), fields(n = samples.len()))]
pub fn transform(samples: &[f64], sort_by_magnitude: bool) -> Spectrum {
    let n = samples.len();
    let n_f = n as f64;

    let components = (0..n)
        .map(|k| {
            let amplitude = samples
                .iter()
                .enumerate()
                .fold(Complex64::new(0.0, 0.0), |acc, (i, &x)| {
                    let arg = TAU * (i as f64) * (k as f64) / n_f;
                    acc + x * Complex64::new(arg.cos(), -arg.sin())
                });
            SpectralComponent::new(k, amplitude)
        })
        .collect();

    let mut spectrum = Spectrum::from_components(components);
    if sort_by_magnitude {
        spectrum.sort_by_magnitude();
    }
    spectrum
}

#[cfg(test)]
#[path = "../../tests/unit/spectrum/dft.rs"]
mod tests;
