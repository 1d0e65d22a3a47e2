//! Sound definitions as data
//!
//! A sound is one or more tone sources sharing a gain envelope. Envelopes are
//! time-stamped set-points; the backend decides how to realize them.

/// How a point is reached from the previous one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ramp {
    /// Jump to the value at the point's time
    Set,
    /// Exponential glide ending at the point (values must be > 0)
    Exponential,
}

/// One envelope set-point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnvelopePoint {
    /// Seconds from the start of the sound
    pub at: f64,
    pub value: f32,
    pub ramp: Ramp,
}

/// Ordered list of set-points for one parameter
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Envelope {
    pub points: Vec<EnvelopePoint>,
}

impl Envelope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start at `value` with no glide
    pub fn starting_at(value: f32) -> Self {
        Self::new().set(0.0, value)
    }

    pub fn set(self, at: f64, value: f32) -> Self {
        self.push(at, value, Ramp::Set)
    }

    pub fn exponential(self, at: f64, value: f32) -> Self {
        self.push(at, value, Ramp::Exponential)
    }

    fn push(mut self, at: f64, value: f32, ramp: Ramp) -> Self {
        debug_assert!(
            self.points.last().is_none_or(|p| p.at <= at),
            "envelope points must be in time order"
        );
        self.points.push(EnvelopePoint { at, value, ramp });
        self
    }

    /// Time of the last point
    pub fn end_time(&self) -> f64 {
        self.points.last().map(|p| p.at).unwrap_or(0.0)
    }
}

/// Oscillator shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Waveform {
    #[default]
    Sine,
    Triangle,
}

/// A single tone source
#[derive(Debug, Clone, PartialEq)]
pub struct ToneDef {
    pub waveform: Waveform,
    /// Frequency in Hz over time
    pub frequency: Envelope,
}

/// A complete sound: tones mixed through one gain envelope
#[derive(Debug, Clone, PartialEq)]
pub struct SoundDef {
    pub tones: Vec<ToneDef>,
    pub gain: Envelope,
    /// Seconds after which every tone stops
    pub duration: f64,
}
