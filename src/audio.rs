use crate::effects::Sound;
use fundsp::prelude::*;
use log::{debug, warn};
use rodio::{OutputStream, OutputStreamHandle, Sink, buffer::SamplesBuffer};

pub const SAMPLE_RATE: u32 = 44_100;

// ── Synthesis ───────────────────────────────────────────────────────────────

/// `from` to `to` exponentially over `secs`, held at `to` afterwards.
fn exp_ramp(from: f32, to: f32, t: f32, secs: f32) -> f32 {
    from * (to / from).powf((t / secs).min(1.0))
}

fn samples(secs: f32) -> usize {
    (SAMPLE_RATE as f32 * secs) as usize
}

/// Crash: a burst of fading noise through a resonant highpass, plus two
/// decaying metallic triangle tones.
fn render_hit() -> Vec<f32> {
    const NOISE_SECS: f32 = 0.1;
    let sr = SAMPLE_RATE as f64;

    let mut noise_src = noise();
    let mut hp = highpass_hz(300.0, 10.0);
    let mut metal1 = triangle_hz(600.0);
    let mut metal2 = triangle_hz(450.0);
    noise_src.set_sample_rate(sr);
    hp.set_sample_rate(sr);
    metal1.set_sample_rate(sr);
    metal2.set_sample_rate(sr);

    (0..samples(0.3))
        .map(|i| {
            let t = i as f32 / SAMPLE_RATE as f32;
            let amp = (1.0 - t / NOISE_SECS).max(0.0);
            let crash = hp.filter_mono(noise_src.get_mono() * amp * amp * 0.4);
            let ring1 = metal1.get_mono() * exp_ramp(0.2, 0.001, t, 0.3);
            let ring2 = metal2.get_mono() * exp_ramp(0.2, 0.001, t, 0.2);
            (crash + ring1 + ring2) * 0.7
        })
        .collect()
}

/// Rising five-note sine arpeggio.
fn render_celebration() -> Vec<f32> {
    const NOTES: [f32; 5] = [440.0, 494.0, 523.0, 587.0, 659.0];
    const NOTE_SECS: f32 = 0.1;

    let mut out = Vec::with_capacity(samples(NOTE_SECS) * NOTES.len());
    for hz in NOTES {
        let mut osc = sine_hz::<f32>(hz);
        osc.set_sample_rate(SAMPLE_RATE as f64);
        out.extend((0..samples(NOTE_SECS)).map(|i| {
            let t = i as f32 / SAMPLE_RATE as f32;
            osc.get_mono() * exp_ramp(0.2, 0.001, t, NOTE_SECS)
        }));
    }
    out
}

pub fn render(sound: Sound) -> Vec<f32> {
    match sound {
        Sound::Hit => render_hit(),
        Sound::Celebration => render_celebration(),
    }
}

// ── Playback ────────────────────────────────────────────────────────────────

struct Output {
    // Dropping the stream stops all sound.
    _stream: OutputStream,
    handle: OutputStreamHandle,
}

/// Fire-and-forget sound playback. Silent when disabled or when no output
/// device is available.
pub struct Audio {
    output: Option<Output>,
    hit: Vec<f32>,
    celebration: Vec<f32>,
}

impl Audio {
    pub fn new(enabled: bool) -> Self {
        let output = if enabled {
            match OutputStream::try_default() {
                Ok((stream, handle)) => Some(Output {
                    _stream: stream,
                    handle,
                }),
                Err(e) => {
                    warn!("no audio output, playing silently: {e}");
                    None
                }
            }
        } else {
            None
        };
        Self {
            output,
            hit: render(Sound::Hit),
            celebration: render(Sound::Celebration),
        }
    }

    pub fn is_active(&self) -> bool {
        self.output.is_some()
    }

    pub fn play(&self, sound: Sound) {
        let Some(out) = &self.output else {
            return;
        };
        let data = match sound {
            Sound::Hit => &self.hit,
            Sound::Celebration => &self.celebration,
        };
        match Sink::try_new(&out.handle) {
            Ok(sink) => {
                sink.append(SamplesBuffer::new(1, SAMPLE_RATE, data.clone()));
                sink.detach();
                debug!("playing {sound:?}");
            }
            Err(e) => warn!("cannot play {sound:?}: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn peak(buf: &[f32]) -> f32 {
        buf.iter().fold(0.0f32, |m, s| m.max(s.abs()))
    }

    #[test]
    fn test_hit_shape() {
        let buf = render(Sound::Hit);
        assert_eq!(buf.len(), samples(0.3));
        assert!(buf.iter().all(|s| s.is_finite()));
        let head = peak(&buf[..samples(0.05)]);
        let tail = peak(&buf[samples(0.25)..]);
        assert!(head > 0.01);
        assert!(tail < head);
    }

    #[test]
    fn test_celebration_is_five_notes() {
        let buf = render(Sound::Celebration);
        assert_eq!(buf.len(), samples(0.1) * 5);
        assert!(peak(&buf) <= 0.2 + 1e-3);
        assert!(peak(&buf) > 0.05);
    }

    #[test]
    fn test_exp_ramp_endpoints() {
        assert!((exp_ramp(0.2, 0.001, 0.0, 0.3) - 0.2).abs() < 1e-6);
        assert!((exp_ramp(0.2, 0.001, 0.3, 0.3) - 0.001).abs() < 1e-6);
        assert!((exp_ramp(0.2, 0.001, 1.0, 0.3) - 0.001).abs() < 1e-6);
    }

    #[test]
    fn test_disabled_audio_is_silent() {
        let audio = Audio::new(false);
        assert!(!audio.is_active());
        audio.play(Sound::Hit);
    }
}
