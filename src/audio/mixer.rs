//! Two-bed looping mixer implementing the playback transport.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::beds::BedBuffer;
use crate::session::{Bed, Transport};

/// Hard output limit
const LIMIT: f32 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Fade {
    from: f32,
    to: f32,
    start_ms: f64,
    duration_ms: f64,
}

impl Fade {
    fn level_at(&self, now_ms: f64) -> f32 {
        if self.duration_ms <= 0.0 {
            return self.to;
        }
        let t = ((now_ms - self.start_ms) / self.duration_ms).clamp(0.0, 1.0) as f32;
        self.from + (self.to - self.from) * t
    }

    fn finished_at(&self, now_ms: f64) -> bool {
        now_ms - self.start_ms >= self.duration_ms
    }
}

#[derive(Debug, Clone)]
struct Channel {
    samples: Vec<f32>,
    cursor: usize,
    playing: bool,
    volume: f32,
    fade: Option<Fade>,
}

impl Channel {
    fn new(buffer: BedBuffer) -> Self {
        Self {
            samples: buffer.samples,
            cursor: 0,
            playing: false,
            volume: 0.0,
            fade: None,
        }
    }

    fn level_at(&self, now_ms: f64) -> f32 {
        self.fade
            .map(|fade| fade.level_at(now_ms))
            .unwrap_or(self.volume)
    }

    fn next_sample(&mut self) -> f32 {
        if self.samples.is_empty() {
            return 0.0;
        }
        let sample = self.samples[self.cursor];
        self.cursor = (self.cursor + 1) % self.samples.len();
        sample
    }
}

/// Mixes the looping river and ocean beds under a master gain
///
/// Fades are evaluated against the frame clock set by `advance`. Every
/// rendered sample is also kept in a tap buffer for analysis.
#[derive(Debug, Clone)]
pub struct Mixer {
    channels: [Channel; 2],
    sample_rate: u32,
    now_ms: f64,
    gain: f32,
    tap: Vec<f32>,
    tap_capacity: usize,
}

fn slot(bed: Bed) -> usize {
    match bed {
        Bed::River => 0,
        Bed::Ocean => 1,
    }
}

impl Mixer {
    pub fn new(river: BedBuffer, ocean: BedBuffer, sample_rate: u32) -> Self {
        Self {
            channels: [Channel::new(river), Channel::new(ocean)],
            sample_rate,
            now_ms: 0.0,
            gain: 1.0,
            tap: Vec::new(),
            tap_capacity: sample_rate.max(1) as usize,
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn gain(&self) -> f32 {
        self.gain
    }

    /// Fill `out` with mono samples and copy them into the tap
    pub fn render(&mut self, out: &mut [f32]) {
        let levels = [
            self.channels[0].level_at(self.now_ms),
            self.channels[1].level_at(self.now_ms),
        ];

        for sample in out.iter_mut() {
            let mut mix = 0.0;
            for (channel, level) in self.channels.iter_mut().zip(levels) {
                if channel.playing {
                    mix += channel.next_sample() * level;
                }
            }
            *sample = (mix * self.gain).clamp(-LIMIT, LIMIT);
        }

        self.tap.extend_from_slice(out);
        if self.tap.len() > self.tap_capacity {
            let excess = self.tap.len() - self.tap_capacity;
            self.tap.drain(..excess);
        }
    }

    /// Take every sample rendered since the last call
    pub fn drain_tap(&mut self) -> Vec<f32> {
        std::mem::take(&mut self.tap)
    }
}

impl Transport for Mixer {
    fn play_loop(&mut self, bed: Bed) {
        self.channels[slot(bed)].playing = true;
    }

    fn pause(&mut self, bed: Bed) {
        let channel = &mut self.channels[slot(bed)];
        channel.volume = channel.level_at(self.now_ms);
        channel.fade = None;
        channel.playing = false;
    }

    fn set_volume(&mut self, bed: Bed, volume: f32) {
        let channel = &mut self.channels[slot(bed)];
        channel.volume = volume.clamp(0.0, 1.0);
        channel.fade = None;
    }

    fn fade(&mut self, bed: Bed, from: f32, to: f32, duration_ms: f64, now_ms: f64) {
        self.channels[slot(bed)].fade = Some(Fade {
            from: from.clamp(0.0, 1.0),
            to: to.clamp(0.0, 1.0),
            start_ms: now_ms,
            duration_ms,
        });
    }

    fn is_playing(&self, bed: Bed) -> bool {
        self.channels[slot(bed)].playing
    }

    fn volume(&self, bed: Bed) -> f32 {
        self.channels[slot(bed)].level_at(self.now_ms)
    }

    fn set_gain(&mut self, gain: f32) {
        self.gain = if gain.is_finite() { gain.max(0.0) } else { 1.0 };
    }

    fn advance(&mut self, now_ms: f64) {
        self.now_ms = now_ms;
        for channel in &mut self.channels {
            if let Some(fade) = channel.fade {
                if fade.finished_at(now_ms) {
                    channel.volume = fade.to;
                    channel.fade = None;
                }
            }
        }
    }
}

/// Mixer shared between the frame loop and the audio callback
#[derive(Debug, Clone)]
pub struct SharedMixer(Arc<Mutex<Mixer>>);

impl SharedMixer {
    pub fn new(mixer: Mixer) -> Self {
        Self(Arc::new(Mutex::new(mixer)))
    }

    /// Lock the mixer; a panicked holder leaves plain sample data, so poisoning is ignored
    pub fn lock(&self) -> MutexGuard<'_, Mixer> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Transport for SharedMixer {
    fn play_loop(&mut self, bed: Bed) {
        self.lock().play_loop(bed);
    }

    fn pause(&mut self, bed: Bed) {
        self.lock().pause(bed);
    }

    fn set_volume(&mut self, bed: Bed, volume: f32) {
        self.lock().set_volume(bed, volume);
    }

    fn fade(&mut self, bed: Bed, from: f32, to: f32, duration_ms: f64, now_ms: f64) {
        self.lock().fade(bed, from, to, duration_ms, now_ms);
    }

    fn is_playing(&self, bed: Bed) -> bool {
        self.lock().is_playing(bed)
    }

    fn volume(&self, bed: Bed) -> f32 {
        self.lock().volume(bed)
    }

    fn set_gain(&mut self, gain: f32) {
        self.lock().set_gain(gain);
    }

    fn advance(&mut self, now_ms: f64) {
        self.lock().advance(now_ms);
    }
}
