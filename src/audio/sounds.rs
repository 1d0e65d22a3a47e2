//! The game's sound effects and background melody
//!
//! Procedurally defined - no audio files needed.

use super::envelope::{Envelope, SoundDef, ToneDef, Waveform};

/// Level every effect decays toward (exponential ramps can't reach zero)
const SILENCE: f32 = 0.01;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Button press / topping picked
    Click,
    /// Player hit the avoided topping
    Collision,
    /// Run ended
    GameOver,
}

impl SoundEffect {
    pub fn definition(self) -> SoundDef {
        match self {
            SoundEffect::Click => click(),
            SoundEffect::Collision => collision(),
            SoundEffect::GameOver => game_over(),
        }
    }
}

/// Descending sweep from `from` to `to` Hz
fn sweep(from: f32, to: f32, duration: f64) -> ToneDef {
    ToneDef {
        waveform: Waveform::Sine,
        frequency: Envelope::starting_at(from).exponential(duration, to),
    }
}

/// Attack at `level`, fade to near-silence
fn decay(level: f32, duration: f64) -> Envelope {
    Envelope::starting_at(level).exponential(duration, SILENCE)
}

/// Click - short soft blip
fn click() -> SoundDef {
    SoundDef {
        tones: vec![sweep(600.0, 400.0, 0.1)],
        gain: decay(0.1, 0.1),
        duration: 0.1,
    }
}

/// Collision - falling zap
fn collision() -> SoundDef {
    SoundDef {
        tones: vec![sweep(800.0, 200.0, 0.3)],
        gain: decay(0.3, 0.3),
        duration: 0.3,
    }
}

/// Game over - two-tone descending harmony
fn game_over() -> SoundDef {
    SoundDef {
        tones: vec![sweep(400.0, 200.0, 0.5), sweep(300.0, 150.0, 0.5)],
        gain: decay(0.2, 0.5),
        duration: 0.5,
    }
}

/// A melody note: frequency (Hz) and length (seconds)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Note {
    pub freq: f32,
    pub duration: f64,
}

const fn note(freq: f32, duration: f64) -> Note {
    Note { freq, duration }
}

/// C-D-E-F-G-E-D-C
pub const MELODY: [Note; 8] = [
    note(262.0, 0.3), // C
    note(294.0, 0.3), // D
    note(330.0, 0.3), // E
    note(349.0, 0.3), // F
    note(392.0, 0.3), // G
    note(330.0, 0.3), // E
    note(294.0, 0.3), // D
    note(262.0, 0.6), // C
];

/// Melody volume
const MELODY_GAIN: f32 = 0.05;

/// Gain hold extends past the last note
const MELODY_GAIN_TAIL: f64 = 0.5;

/// Period of the melody loop (notes end at 2.7s, then silence)
pub const MELODY_LOOP_MS: u32 = 3600;

/// One pass of the background melody on a single triangle tone
pub fn melody() -> SoundDef {
    let mut frequency = Envelope::new();
    let mut t = 0.0;
    for note in MELODY {
        frequency = frequency.set(t, note.freq);
        t += note.duration;
    }

    SoundDef {
        tones: vec![ToneDef {
            waveform: Waveform::Triangle,
            frequency,
        }],
        // Flat hold: both points carry the same level
        gain: Envelope::starting_at(MELODY_GAIN)
            .exponential(t + MELODY_GAIN_TAIL, MELODY_GAIN),
        duration: t,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::envelope::Ramp;

    #[test]
    fn test_effect_shapes() {
        let click = SoundEffect::Click.definition();
        assert_eq!(click.tones.len(), 1);
        assert_eq!(click.duration, 0.1);
        assert_eq!(click.gain.points[0].value, 0.1);

        let hit = SoundEffect::Collision.definition();
        let freq = &hit.tones[0].frequency.points;
        assert_eq!((freq[0].value, freq[1].value), (800.0, 200.0));
        assert_eq!(freq[1].ramp, Ramp::Exponential);
        assert_eq!(hit.duration, 0.3);

        let over = SoundEffect::GameOver.definition();
        assert_eq!(over.tones.len(), 2);
        assert_eq!(over.tones[1].frequency.points[1].value, 150.0);
        assert_eq!(over.gain.end_time(), 0.5);
    }

    #[test]
    fn test_every_effect_fades_out() {
        for effect in [
            SoundEffect::Click,
            SoundEffect::Collision,
            SoundEffect::GameOver,
        ] {
            let def = effect.definition();
            let last = def.gain.points.last().unwrap();
            assert_eq!(last.value, SILENCE, "{effect:?}");
            assert_eq!(last.at, def.duration, "{effect:?}");
        }
    }

    #[test]
    fn test_melody_timing() {
        let def = melody();
        let points = &def.tones[0].frequency.points;
        assert_eq!(points.len(), 8);
        assert!(points.iter().all(|p| p.ramp == Ramp::Set));
        assert!((points[7].at - 2.1).abs() < 1e-9);
        assert!((def.duration - 2.7).abs() < 1e-9);
        assert!(def.duration * 1000.0 < MELODY_LOOP_MS as f64);
    }

    #[test]
    fn test_melody_gain_is_flat() {
        let gain = melody().gain.points;
        assert_eq!(gain.len(), 2);
        assert_eq!(gain[0].value, gain[1].value);
        assert!((gain[1].at - 3.2).abs() < 1e-9);
    }
}
