//! Web Audio API backend

use web_sys::{
    AudioContext, AudioContextState, AudioParam, GainNode, OscillatorNode, OscillatorType,
};

use super::envelope::{Envelope, Ramp, SoundDef, Waveform};
use super::{AudioError, ToneBackend};

fn js_err(e: wasm_bindgen::JsValue) -> AudioError {
    AudioError::Schedule(format!("{:?}", e))
}

impl From<Waveform> for OscillatorType {
    fn from(w: Waveform) -> Self {
        match w {
            Waveform::Sine => OscillatorType::Sine,
            Waveform::Triangle => OscillatorType::Triangle,
        }
    }
}

/// Oscillators making up one scheduled sound
pub struct WebVoice {
    oscillators: Vec<OscillatorNode>,
    _gain: GainNode,
}

/// Backend driving an `AudioContext`
pub struct WebAudioBackend {
    ctx: AudioContext,
}

impl WebAudioBackend {
    /// Create the audio context (may fail outside a secure context)
    pub fn open() -> Result<Self, AudioError> {
        let ctx = AudioContext::new()
            .map_err(|e| AudioError::Unavailable(format!("{:?}", e)))?;
        log::info!("AudioContext created ({:?})", ctx.state());
        Ok(Self { ctx })
    }

    /// Resume context if suspended (browsers require a user gesture)
    fn resume(&self) {
        if self.ctx.state() == AudioContextState::Suspended {
            if let Err(e) = self.ctx.resume() {
                log::error!("Failed to resume AudioContext: {:?}", e);
            }
        }
    }
}

/// Replay an envelope onto an audio parameter starting at `t`
fn apply(param: &AudioParam, envelope: &Envelope, t: f64) -> Result<(), AudioError> {
    for point in &envelope.points {
        let at = t + point.at;
        match point.ramp {
            Ramp::Set => param.set_value_at_time(point.value, at),
            Ramp::Exponential => param.exponential_ramp_to_value_at_time(point.value, at),
        }
        .map_err(js_err)?;
    }
    Ok(())
}

impl ToneBackend for WebAudioBackend {
    type Voice = WebVoice;

    fn schedule(&mut self, sound: &SoundDef) -> Result<WebVoice, AudioError> {
        self.resume();
        let ctx = &self.ctx;
        let t = ctx.current_time();

        let gain = ctx.create_gain().map_err(js_err)?;
        gain.connect_with_audio_node(&ctx.destination()).map_err(js_err)?;
        apply(&gain.gain(), &sound.gain, t)?;

        let mut oscillators = Vec::with_capacity(sound.tones.len());
        for tone in &sound.tones {
            let osc = ctx.create_oscillator().map_err(js_err)?;
            osc.set_type(tone.waveform.into());
            osc.connect_with_audio_node(&gain).map_err(js_err)?;
            apply(&osc.frequency(), &tone.frequency, t)?;
            osc.start_with_when(t).map_err(js_err)?;
            osc.stop_with_when(t + sound.duration).map_err(js_err)?;
            oscillators.push(osc);
        }

        Ok(WebVoice {
            oscillators,
            _gain: gain,
        })
    }

    fn stop(&mut self, voice: &WebVoice) {
        for osc in &voice.oscillators {
            // Already-finished oscillators throw; nothing to do then
            osc.stop().ok();
        }
    }
}
