use super::*;
use crate::spectrum::idft::inverse;

const EPS: f64 = 1e-9;

fn assert_close(a: Complex64, b: Complex64) {
    assert!((a - b).norm() < EPS, "expected {b}, got {a}");
}

#[test]
fn quarter_wave_spectrum_matches_hand_computation() {
    let spectrum = transform(&[0.0, 1.0, 0.0, -1.0], false);
    assert_eq!(spectrum.len(), 4);

    let expected = [
        Complex64::new(0.0, 0.0),
        Complex64::new(0.0, -2.0),
        Complex64::new(0.0, 0.0),
        Complex64::new(0.0, 2.0),
    ];
    for (k, (c, want)) in spectrum.iter().zip(expected).enumerate() {
        assert_eq!(c.freq, k);
        assert_close(c.amplitude, want);
    }
}

#[test]
fn single_sample_is_its_own_dc_term() {
    let spectrum = transform(&[5.0], true);
    assert_eq!(spectrum.len(), 1);
    assert_eq!(spectrum.components()[0].freq, 0);
    assert_close(spectrum.components()[0].amplitude, Complex64::new(5.0, 0.0));
    assert_eq!(inverse(&spectrum), vec![5.0]);
}

#[test]
fn empty_input_yields_empty_spectrum() {
    assert!(transform(&[], false).is_empty());
    assert!(transform(&[], true).is_empty());
}

#[test]
fn length_is_preserved() {
    for n in 0..12 {
        let x: Vec<f64> = (0..n).map(|i| (i as f64 * 0.7).sin() * 10.0).collect();
        assert_eq!(transform(&x, false).len(), n);
        assert_eq!(transform(&x, true).len(), n);
    }
}

#[test]
fn sorted_spectrum_is_a_permutation_of_unsorted() {
    let x = [3.0, -1.5, 4.0, 1.0, -5.0, 9.0, 2.0];
    let plain = transform(&x, false);
    let mut sorted = transform(&x, true);

    for w in sorted.components().windows(2) {
        assert!(w[0].magnitude() >= w[1].magnitude());
    }

    sorted.sort_by_freq();
    assert_eq!(sorted, plain);
}

#[test]
fn magnitude_sort_breaks_ties_by_frequency() {
    let mut spectrum = Spectrum::from_components(vec![
        SpectralComponent::new(0, Complex64::new(1.0, 0.0)),
        SpectralComponent::new(1, Complex64::new(0.0, 3.0)),
        SpectralComponent::new(2, Complex64::new(0.0, -1.0)),
        SpectralComponent::new(3, Complex64::new(-3.0, 0.0)),
    ]);
    spectrum.sort_by_magnitude();
    let order: Vec<usize> = spectrum.iter().map(|c| c.freq).collect();
    assert_eq!(order, vec![1, 3, 0, 2]);
}

#[test]
fn derived_polar_values_follow_the_amplitude() {
    let c = SpectralComponent::new(2, Complex64::new(0.0, -2.0));
    assert!((c.magnitude() - 2.0).abs() < EPS);
    assert!((c.phase() + std::f64::consts::FRAC_PI_2).abs() < EPS);
}
