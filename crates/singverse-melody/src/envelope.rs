//! ADSR amplitude envelope.
//!
//! Each rendered note ramps up over the attack, falls to the sustain level
//! over the decay, holds until its scheduled duration ends, then fades out
//! linearly over the release. The envelope is evaluated in closed form, so a
//! note's curve depends only on its duration and the sample rate.

/// ADSR envelope parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdsrParams {
    /// Attack time in seconds.
    pub attack: f64,
    /// Decay time in seconds.
    pub decay: f64,
    /// Sustain level (0.0 to 1.0).
    pub sustain: f64,
    /// Release time in seconds.
    pub release: f64,
}

impl Default for AdsrParams {
    /// The reader's synth voice: a quick pluck settling to a soft sustain
    /// with a long tail.
    fn default() -> Self {
        Self {
            attack: 0.005,
            decay: 0.1,
            sustain: 0.3,
            release: 1.0,
        }
    }
}

impl AdsrParams {
    fn held_level(&self, t: f64) -> f64 {
        if t < self.attack {
            return t / self.attack;
        }
        let t = t - self.attack;
        if t < self.decay {
            return 1.0 - (t / self.decay) * (1.0 - self.sustain);
        }
        self.sustain
    }

    /// Envelope level `t` seconds after note-on, for a note released at
    /// `gate` seconds.
    pub fn level_at(&self, t: f64, gate: f64) -> f64 {
        if t < 0.0 {
            return 0.0;
        }
        if t < gate {
            return self.held_level(t);
        }
        let since_release = t - gate;
        if since_release >= self.release {
            return 0.0;
        }
        self.held_level(gate) * (1.0 - since_release / self.release)
    }

    /// Sampled envelope of a note held for `gate` seconds, through the end of
    /// its release. The last sample is always silent.
    pub fn note_curve(&self, sample_rate: f64, gate: f64) -> Vec<f64> {
        let gate = gate.max(0.0);
        let len = ((gate + self.release.max(0.0)) * sample_rate).ceil() as usize + 1;
        (0..len)
            .map(|i| self.level_at(i as f64 / sample_rate, gate))
            .collect()
    }
}
