//! Biquad (bi-quadratic) filter node.
//!
//! A second-order IIR filter configured as one of eight kinds, running
//! independently on each channel of an interleaved block.
//!
//! Coefficient calculation uses the RBJ Audio EQ Cookbook formulas.

#[cfg(not(feature = "std"))]
use alloc::string::ToString;

use core::f64::consts::PI;
use core::str::FromStr;
use libm::{cos, pow, sin, sqrt};

use crate::buffer::{BufferPool, MAX_SUBCHANNELS, SampleBuffer};
use crate::error::FilterError;
use crate::filter::Filter;

/// The response shape of a [`Biquad`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BiquadKind {
    /// Second-order low-pass.
    Lowpass,
    /// Second-order high-pass.
    Highpass,
    /// Band-pass with constant 0 dB peak gain.
    Bandpass,
    /// Low shelf; boosts or cuts below the corner by `gain` dB.
    Lowshelf,
    /// High shelf; boosts or cuts above the corner by `gain` dB.
    Highshelf,
    /// Peaking EQ; boosts or cuts around the center by `gain` dB.
    Peaking,
    /// Band-reject.
    Notch,
    /// All-pass; flat magnitude, phase rotates around the center.
    Allpass,
}

impl BiquadKind {
    /// Every kind, in declaration order.
    pub const ALL: [BiquadKind; 8] = [
        BiquadKind::Lowpass,
        BiquadKind::Highpass,
        BiquadKind::Bandpass,
        BiquadKind::Lowshelf,
        BiquadKind::Highshelf,
        BiquadKind::Peaking,
        BiquadKind::Notch,
        BiquadKind::Allpass,
    ];

    /// The lowercase name accepted by [`FromStr`].
    pub fn name(self) -> &'static str {
        match self {
            BiquadKind::Lowpass => "lowpass",
            BiquadKind::Highpass => "highpass",
            BiquadKind::Bandpass => "bandpass",
            BiquadKind::Lowshelf => "lowshelf",
            BiquadKind::Highshelf => "highshelf",
            BiquadKind::Peaking => "peaking",
            BiquadKind::Notch => "notch",
            BiquadKind::Allpass => "allpass",
        }
    }

    /// Whether the `gain` parameter affects this kind.
    pub fn uses_gain(self) -> bool {
        matches!(
            self,
            BiquadKind::Lowshelf | BiquadKind::Highshelf | BiquadKind::Peaking
        )
    }

    /// Calculates raw (unnormalized) coefficients using the RBJ cookbook formula.
    ///
    /// # Arguments
    ///
    /// * `frequency` - Cutoff or center frequency in Hz
    /// * `q` - Q factor (0.707 gives a Butterworth response for low/high-pass)
    /// * `gain_db` - Gain in decibels (shelving and peaking kinds only)
    /// * `sample_rate` - Sample rate in Hz
    ///
    /// # Returns
    ///
    /// (b0, b1, b2, a0, a1, a2) coefficients, kept in f64 until normalized
    pub fn raw_coefficients(
        self,
        frequency: f32,
        q: f32,
        gain_db: f32,
        sample_rate: u32,
    ) -> (f64, f64, f64, f64, f64, f64) {
        let a = pow(10.0, f64::from(gain_db) / 40.0);
        let w0 = 2.0 * PI * f64::from(frequency) / f64::from(sample_rate);
        let cos_w0 = cos(w0);
        let sin_w0 = sin(w0);
        let alpha = sin_w0 / (2.0 * f64::from(q));

        match self {
            BiquadKind::Lowpass => (
                (1.0 - cos_w0) / 2.0,
                1.0 - cos_w0,
                (1.0 - cos_w0) / 2.0,
                1.0 + alpha,
                -2.0 * cos_w0,
                1.0 - alpha,
            ),
            BiquadKind::Highpass => (
                (1.0 + cos_w0) / 2.0,
                -(1.0 + cos_w0),
                (1.0 + cos_w0) / 2.0,
                1.0 + alpha,
                -2.0 * cos_w0,
                1.0 - alpha,
            ),
            BiquadKind::Bandpass => (
                alpha,
                0.0,
                -alpha,
                1.0 + alpha,
                -2.0 * cos_w0,
                1.0 - alpha,
            ),
            BiquadKind::Notch => (
                1.0,
                -2.0 * cos_w0,
                1.0,
                1.0 + alpha,
                -2.0 * cos_w0,
                1.0 - alpha,
            ),
            BiquadKind::Allpass => (
                1.0 - alpha,
                -2.0 * cos_w0,
                1.0 + alpha,
                1.0 + alpha,
                -2.0 * cos_w0,
                1.0 - alpha,
            ),
            BiquadKind::Peaking => (
                1.0 + alpha * a,
                -2.0 * cos_w0,
                1.0 - alpha * a,
                1.0 + alpha / a,
                -2.0 * cos_w0,
                1.0 - alpha / a,
            ),
            BiquadKind::Lowshelf => {
                let shelf = 2.0 * sqrt(a) * alpha;
                (
                    a * ((a + 1.0) - (a - 1.0) * cos_w0 + shelf),
                    2.0 * a * ((a - 1.0) - (a + 1.0) * cos_w0),
                    a * ((a + 1.0) - (a - 1.0) * cos_w0 - shelf),
                    (a + 1.0) + (a - 1.0) * cos_w0 + shelf,
                    -2.0 * ((a - 1.0) + (a + 1.0) * cos_w0),
                    (a + 1.0) + (a - 1.0) * cos_w0 - shelf,
                )
            }
            BiquadKind::Highshelf => {
                let shelf = 2.0 * sqrt(a) * alpha;
                (
                    a * ((a + 1.0) + (a - 1.0) * cos_w0 + shelf),
                    -2.0 * a * ((a - 1.0) + (a + 1.0) * cos_w0),
                    a * ((a + 1.0) + (a - 1.0) * cos_w0 - shelf),
                    (a + 1.0) - (a - 1.0) * cos_w0 + shelf,
                    2.0 * ((a - 1.0) - (a + 1.0) * cos_w0),
                    (a + 1.0) - (a - 1.0) * cos_w0 - shelf,
                )
            }
        }
    }
}

impl FromStr for BiquadKind {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BiquadKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| FilterError::InvalidKind(s.to_string()))
    }
}

impl core::fmt::Display for BiquadKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// Normalized biquad coefficients (`a0` divided out).
///
/// ```text
/// y[n] = cx0*x[n] + cx1*x[n-1] + cx2*x[n-2]
///                 - cy1*y[n-1] - cy2*y[n-2]
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coefficients {
    /// Feedforward, current input.
    pub cx0: f32,
    /// Feedforward, one sample back.
    pub cx1: f32,
    /// Feedforward, two samples back.
    pub cx2: f32,
    /// Feedback, one sample back.
    pub cy1: f32,
    /// Feedback, two samples back.
    pub cy2: f32,
}

impl Coefficients {
    /// Identity response: `y[n] = x[n]`.
    pub const PASSTHROUGH: Coefficients = Coefficients {
        cx0: 1.0,
        cx1: 0.0,
        cx2: 0.0,
        cy1: 0.0,
        cy2: 0.0,
    };

    /// Divides raw coefficients by `a0` in f64, then narrows each result once.
    pub fn normalize(b0: f64, b1: f64, b2: f64, a0: f64, a1: f64, a2: f64) -> Self {
        Self {
            cx0: (b0 / a0) as f32,
            cx1: (b1 / a0) as f32,
            cx2: (b2 / a0) as f32,
            cy1: (a1 / a0) as f32,
            cy2: (a2 / a0) as f32,
        }
    }

    /// Computes normalized coefficients for a kind and parameter set.
    pub fn design(
        kind: BiquadKind,
        frequency: f32,
        q: f32,
        gain_db: f32,
        sample_rate: u32,
    ) -> Self {
        let (b0, b1, b2, a0, a1, a2) = kind.raw_coefficients(frequency, q, gain_db, sample_rate);
        Self::normalize(b0, b1, b2, a0, a1, a2)
    }
}

/// Second-order IIR filter with per-channel Direct Form I state.
///
/// Coefficients are fixed by the first [`prepare`](Filter::prepare) call. The
/// last two inputs and outputs of every channel persist across
/// [`apply`](Filter::apply) calls and are only cleared by building a new filter.
#[derive(Debug, Clone)]
pub struct Biquad {
    kind: BiquadKind,
    frequency: f32,
    q: f32,
    gain: f32,
    /// Sample rate the coefficients were computed for.
    sample_rate: Option<u32>,
    coefficients: Coefficients,

    /// Input history per channel: x[n-1], x[n-2]
    x1: [f32; MAX_SUBCHANNELS],
    x2: [f32; MAX_SUBCHANNELS],

    /// Output history per channel: y[n-1], y[n-2]
    y1: [f32; MAX_SUBCHANNELS],
    y2: [f32; MAX_SUBCHANNELS],
}

impl Biquad {
    /// Creates an unprepared biquad.
    ///
    /// # Arguments
    ///
    /// * `kind` - Response shape
    /// * `frequency` - Cutoff or center frequency in Hz
    /// * `q` - Quality factor, must be positive
    /// * `gain` - Gain in dB, used by shelving and peaking kinds only
    pub fn new(kind: BiquadKind, frequency: f32, q: f32, gain: f32) -> Self {
        Self {
            kind,
            frequency,
            q,
            gain,
            sample_rate: None,
            coefficients: Coefficients::PASSTHROUGH,
            x1: [0.0; MAX_SUBCHANNELS],
            x2: [0.0; MAX_SUBCHANNELS],
            y1: [0.0; MAX_SUBCHANNELS],
            y2: [0.0; MAX_SUBCHANNELS],
        }
    }

    /// Creates a biquad from a kind name such as `"lowpass"`.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::InvalidKind`] if `kind` is not one of the eight
    /// supported names; no filter is produced.
    pub fn from_name(kind: &str, frequency: f32, q: f32, gain: f32) -> Result<Self, FilterError> {
        Ok(Self::new(kind.parse()?, frequency, q, gain))
    }

    /// Response shape.
    pub fn kind(&self) -> BiquadKind {
        self.kind
    }

    /// Cutoff or center frequency in Hz.
    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    /// Quality factor.
    pub fn q(&self) -> f32 {
        self.q
    }

    /// Gain in dB.
    pub fn gain(&self) -> f32 {
        self.gain
    }

    /// Whether [`prepare`](Filter::prepare) has computed coefficients.
    pub fn is_prepared(&self) -> bool {
        self.sample_rate.is_some()
    }

    /// The sample rate the coefficients were computed for, if prepared.
    pub fn sample_rate(&self) -> Option<u32> {
        self.sample_rate
    }

    /// Current normalized coefficients (passthrough until prepared).
    pub fn coefficients(&self) -> Coefficients {
        self.coefficients
    }
}

impl Filter for Biquad {
    fn check_subchannels(&self, subchannels: usize) -> Result<usize, FilterError> {
        if (1..=MAX_SUBCHANNELS).contains(&subchannels) {
            Ok(subchannels)
        } else {
            Err(FilterError::UnsupportedSubchannels {
                subchannels,
                min: 1,
                max: MAX_SUBCHANNELS,
            })
        }
    }

    fn prepare(&mut self, sample_rate: u32) {
        if let Some(prepared) = self.sample_rate {
            if prepared != sample_rate {
                #[cfg(feature = "tracing")]
                tracing::warn!(
                    "biquad {} already prepared at {prepared} Hz, ignoring {sample_rate} Hz",
                    self.kind
                );
            }
            return;
        }

        self.coefficients =
            Coefficients::design(self.kind, self.frequency, self.q, self.gain, sample_rate);
        self.sample_rate = Some(sample_rate);
        #[cfg(feature = "tracing")]
        tracing::debug!(
            "biquad_prepare: {} f={} q={} gain={} at {sample_rate} Hz -> {:?}",
            self.kind,
            self.frequency,
            self.q,
            self.gain,
            self.coefficients
        );
    }

    fn apply(&mut self, input: &SampleBuffer, pool: &mut BufferPool) -> Option<SampleBuffer> {
        assert!(self.sample_rate.is_some(), "biquad applied before prepare");
        let subchannels = input.subchannels();
        assert!(
            (1..=MAX_SUBCHANNELS).contains(&subchannels),
            "biquad cannot process {subchannels} subchannels"
        );

        let mut output = pool.allocate(subchannels, input.len());
        let Coefficients {
            cx0,
            cx1,
            cx2,
            cy1,
            cy2,
        } = self.coefficients;
        let src = input.samples();
        let dst = output.samples_mut();

        for ch in 0..subchannels {
            let mut x1 = self.x1[ch];
            let mut x2 = self.x2[ch];
            let mut y1 = self.y1[ch];
            let mut y2 = self.y2[ch];

            for i in (ch..src.len()).step_by(subchannels) {
                let x0 = src[i];
                let y0 = cx0 * x0 + cx1 * x1 + cx2 * x2 - cy1 * y1 - cy2 * y2;
                dst[i] = y0;

                x2 = x1;
                x1 = x0;
                y2 = y1;
                y1 = y0;
            }

            self.x1[ch] = x1;
            self.x2[ch] = x2;
            self.y1[ch] = y1;
            self.y2[ch] = y2;
        }

        Some(output)
    }
}
