use num_complex::Complex64;

/// One frequency bin of a [`Spectrum`].
///
/// Only the frequency index and the complex amplitude are stored. Magnitude and phase are
/// derived on demand so a reordered spectrum can never carry stale polar values.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SpectralComponent {
    /// Frequency index in `[0, N)`.
    pub freq: usize,
    /// Complex amplitude `X[freq]` (unnormalized DFT output).
    pub amplitude: Complex64,
}

impl SpectralComponent {
    pub fn new(freq: usize, amplitude: Complex64) -> Self {
        Self { freq, amplitude }
    }

    /// `|amplitude|`.
    pub fn magnitude(&self) -> f64 {
        self.amplitude.norm()
    }

    /// `arg(amplitude)` in `(-pi, pi]`.
    pub fn phase(&self) -> f64 {
        self.amplitude.arg()
    }
}

/// An ordered set of exactly `N` components for an `N`-sample signal.
///
/// Position in the sequence carries no meaning once the spectrum has been reordered; every
/// consumer reads [`SpectralComponent::freq`] instead.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Spectrum {
    components: Vec<SpectralComponent>,
}

impl Spectrum {
    pub fn from_components(components: Vec<SpectralComponent>) -> Self {
        Self { components }
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn components(&self) -> &[SpectralComponent] {
        &self.components
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SpectralComponent> {
        self.components.iter()
    }

    /// Reorder by descending magnitude.
    ///
    /// Equal magnitudes fall back to ascending `freq`, so the resulting order is fully
    /// determined by the content of the spectrum.
    pub fn sort_by_magnitude(&mut self) {
        self.components.sort_by(|a, b| {
            b.magnitude()
                .total_cmp(&a.magnitude())
                .then_with(|| a.freq.cmp(&b.freq))
        });
    }

    /// Order by ascending `freq` (the natural DFT output order).
    pub fn sort_by_freq(&mut self) {
        self.components.sort_by_key(|c| c.freq);
    }
}

impl<'a> IntoIterator for &'a Spectrum {
    type Item = &'a SpectralComponent;
    type IntoIter = std::slice::Iter<'a, SpectralComponent>;

    fn into_iter(self) -> Self::IntoIter {
        self.components.iter()
    }
}

/// The x- and y-axis spectra computed from one stroke.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SpectrumPair {
    pub x: Spectrum,
    pub y: Spectrum,
}

impl SpectrumPair {
    /// Number of samples (and therefore frames) both spectra describe.
    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}
