use super::*;
use crate::spectrum::dft::transform;

fn assert_samples_close(got: &[f64], want: &[f64]) {
    assert_eq!(got.len(), want.len());
    for (g, w) in got.iter().zip(want) {
        let tol = 1e-9 * w.abs().max(1.0);
        assert!((g - w).abs() < tol, "expected {w}, got {g}");
    }
}

#[test]
fn round_trip_restores_samples() {
    let x = [0.0, 1.0, 0.0, -1.0];
    assert_samples_close(&inverse(&transform(&x, false)), &x);

    let x: Vec<f64> = (0..37)
        .map(|i| (i as f64 * 0.31).cos() * 120.0 - (i as f64) * 3.5)
        .collect();
    assert_samples_close(&inverse(&transform(&x, false)), &x);
}

#[test]
fn round_trip_ignores_component_order() {
    let x = [12.0, -4.0, 7.5, 0.25, 3.0, -9.0];
    assert_samples_close(&inverse(&transform(&x, true)), &x);
}

#[test]
fn empty_spectrum_inverts_to_nothing() {
    assert!(inverse(&Spectrum::default()).is_empty());
    assert_eq!(evaluate_at(&Spectrum::default(), 3.0), 0.0);
}

#[test]
fn evaluate_at_matches_inverse_on_integer_positions() {
    let x = [1.0, 4.0, -2.0, 8.0, 0.5];
    let spectrum = transform(&x, true);
    let samples = inverse(&spectrum);
    for (n, s) in samples.iter().enumerate() {
        assert!((evaluate_at(&spectrum, n as f64) - s).abs() < 1e-12);
    }
}
