use std::time::Duration;

use rodio::{OutputStream, OutputStreamHandle, Sink, Source};

const SAMPLE_RATE: u32 = 44_100;
const AMPLITUDE: f32 = 0.22;

/// Fire-and-forget game cues. Each one is a short synthesized note
/// sequence, so no sound files ship with the binary.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cue {
    ShipFire,
    PowerUpFire,
    LevelComplete,
    ShipHit,
    GameOver,
    PowerUpPickup,
}

impl Cue {
    /// (frequency Hz, duration ms); 0.0 Hz is a rest.
    fn notes(&self) -> &'static [(f32, u64)] {
        match self {
            Cue::ShipFire => &[(880.0, 40), (660.0, 30)],
            Cue::PowerUpFire => &[(1320.0, 35), (990.0, 35), (1320.0, 25)],
            Cue::LevelComplete => &[(523.0, 90), (659.0, 90), (784.0, 140)],
            Cue::ShipHit => &[(220.0, 120), (165.0, 160)],
            Cue::GameOver => &[(330.0, 160), (262.0, 160), (196.0, 320)],
            Cue::PowerUpPickup => &[(784.0, 60), (988.0, 60), (1175.0, 110)],
        }
    }
}

/// A finite mono tone sequence with a short fade envelope at note
/// boundaries.
struct Blip {
    notes: &'static [(f32, u64)],
    note_idx: usize,
    sample_in_note: u32,
    note_total_samples: u32,
    phase: f32,
    phase_step: f32,
}

impl Blip {
    fn new(notes: &'static [(f32, u64)]) -> Self {
        let (freq_hz, total) = Self::note_at(notes, 0);
        Blip {
            notes,
            note_idx: 0,
            sample_in_note: 0,
            note_total_samples: total,
            phase: 0.0,
            phase_step: Self::phase_step(freq_hz),
        }
    }

    fn note_at(notes: &'static [(f32, u64)], idx: usize) -> (f32, u32) {
        let (freq, ms) = notes[idx];
        let samples = ((ms * SAMPLE_RATE as u64) / 1000).max(1) as u32;
        (freq, samples)
    }

    fn phase_step(freq_hz: f32) -> f32 {
        if freq_hz <= 0.0 {
            0.0
        } else {
            std::f32::consts::TAU * freq_hz / SAMPLE_RATE as f32
        }
    }

    fn advance_note(&mut self) -> bool {
        self.note_idx += 1;
        if self.note_idx >= self.notes.len() {
            return false;
        }
        let (freq_hz, total) = Self::note_at(self.notes, self.note_idx);
        self.sample_in_note = 0;
        self.note_total_samples = total;
        self.phase = 0.0;
        self.phase_step = Self::phase_step(freq_hz);
        true
    }

    fn total_ms(&self) -> u64 {
        self.notes.iter().map(|&(_, ms)| ms).sum()
    }
}

impl Iterator for Blip {
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        if self.note_idx >= self.notes.len() {
            return None;
        }

        // Fade in/out over the first and last slice of each note to
        // avoid clicks at the boundaries.
        let fade = 200u32.min(self.note_total_samples / 4).max(1);
        let left = self.note_total_samples - self.sample_in_note;
        let env = if self.sample_in_note < fade {
            self.sample_in_note as f32 / fade as f32
        } else if left <= fade {
            left as f32 / fade as f32
        } else {
            1.0
        };

        let sample = if self.phase_step == 0.0 {
            0.0
        } else {
            let s1 = self.phase.sin();
            let s2 = (self.phase * 2.0).sin() * 0.3;
            (s1 + s2) * AMPLITUDE * env
        };

        self.phase += self.phase_step;
        if self.phase >= std::f32::consts::TAU {
            self.phase -= std::f32::consts::TAU;
        }

        self.sample_in_note += 1;
        if self.sample_in_note >= self.note_total_samples && !self.advance_note() {
            self.note_idx = self.notes.len();
        }

        Some(sample)
    }
}

impl Source for Blip {
    fn current_frame_len(&self) -> Option<usize> {
        None
    }

    fn channels(&self) -> u16 {
        1
    }

    fn sample_rate(&self) -> u32 {
        SAMPLE_RATE
    }

    fn total_duration(&self) -> Option<Duration> {
        Some(Duration::from_millis(self.total_ms()))
    }
}

/// Handle to the audio device. Construction is best-effort; a machine
/// with no output device plays nothing.
pub struct Sfx {
    _stream: OutputStream,
    handle: OutputStreamHandle,
}

impl Sfx {
    pub fn new() -> Option<Self> {
        match OutputStream::try_default() {
            Ok((stream, handle)) => Some(Sfx {
                _stream: stream,
                handle,
            }),
            Err(err) => {
                log::warn!("no audio output, running silent: {err}");
                None
            }
        }
    }

    pub fn play(&self, cue: Cue) {
        let Ok(sink) = Sink::try_new(&self.handle) else {
            return;
        };
        sink.append(Blip::new(cue.notes()));
        sink.detach();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blip_emits_expected_sample_count() {
        let blip = Blip::new(Cue::ShipFire.notes());
        let expected: u64 = Cue::ShipFire
            .notes()
            .iter()
            .map(|&(_, ms)| (ms * SAMPLE_RATE as u64) / 1000)
            .sum();
        assert_eq!(blip.count() as u64, expected);
    }

    #[test]
    fn samples_stay_in_unit_range() {
        for &cue in &[Cue::ShipFire, Cue::GameOver, Cue::PowerUpPickup] {
            for sample in Blip::new(cue.notes()) {
                assert!(sample.abs() <= 1.0);
            }
        }
    }
}
