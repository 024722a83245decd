// Timeline - Musical grid representation
// Positions are expressed in bars; one bar = 4 beats, one beat = 4 subbeats

use std::fmt;

/// Number of beats in one bar
pub const BEATS_PER_BAR: u32 = 4;

/// Number of subbeats in one beat
pub const SUBBEATS_PER_BEAT: u32 = 4;

/// Number of subbeats in one bar (finest grid resolution)
pub const SUBBEATS_PER_BAR: u32 = BEATS_PER_BAR * SUBBEATS_PER_BEAT;

/// Length of one beat in bars
pub const BEAT: f64 = 1.0 / BEATS_PER_BAR as f64;

/// Length of one subbeat in bars (1/16 bar)
pub const SUBBEAT: f64 = 1.0 / SUBBEATS_PER_BAR as f64;

/// Tempo in BPM (Beats Per Minute)
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Tempo {
    bpm: f64,
}

impl Tempo {
    pub const MIN_BPM: f64 = 20.0;
    pub const MAX_BPM: f64 = 999.0;

    /// Creates a new tempo
    /// BPM is clamped to [20.0, 999.0]; NaN falls back to 120
    pub fn new(bpm: f64) -> Self {
        let bpm = if bpm.is_nan() {
            120.0
        } else {
            bpm.clamp(Self::MIN_BPM, Self::MAX_BPM)
        };
        Self { bpm }
    }

    /// Get BPM value
    pub fn bpm(&self) -> f64 {
        self.bpm
    }

    /// Set BPM value (clamped like `new`)
    pub fn set_bpm(&mut self, bpm: f64) {
        *self = Self::new(bpm);
    }

    /// Duration of one beat in seconds
    pub fn beat_duration_seconds(&self) -> f64 {
        60.0 / self.bpm
    }

    /// Duration of one bar in seconds
    pub fn bar_duration_seconds(&self) -> f64 {
        self.beat_duration_seconds() * BEATS_PER_BAR as f64
    }

    /// Convert a span of wall-clock seconds into bars
    pub fn seconds_to_bars(&self, seconds: f64) -> f64 {
        seconds / self.bar_duration_seconds()
    }

}

impl Default for Tempo {
    fn default() -> Self {
        Self::new(120.0)
    }
}

impl fmt::Display for Tempo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1} BPM", self.bpm)
    }
}

/// Musical time representation on the subbeat grid
/// Bar, beat and subbeat are all 1-based
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct MusicalTime {
    pub bar: u64,
    pub beat: u8,
    pub subbeat: u8,
}

impl MusicalTime {
    /// Creates a new musical time position
    pub fn new(bar: u64, beat: u8, subbeat: u8) -> Self {
        Self { bar, beat, subbeat }
    }

    /// Zero position (bar 1, beat 1, subbeat 1)
    pub fn zero() -> Self {
        Self::new(1, 1, 1)
    }

    /// Create from a count of subbeats since the start of the timeline
    pub fn from_total_subbeats(total: u64) -> Self {
        let per_bar = SUBBEATS_PER_BAR as u64;
        let per_beat = SUBBEATS_PER_BEAT as u64;

        let bar = total / per_bar + 1;
        let remaining = total % per_bar;
        let beat = remaining / per_beat + 1;
        let subbeat = remaining % per_beat + 1;

        Self::new(bar, beat as u8, subbeat as u8)
    }

    /// Create from a position in bars, rounded to the nearest subbeat
    ///
    /// Positions past the last representable subbeat saturate.
    pub fn from_bars(position: f64) -> Self {
        let total = (position.max(0.0) * SUBBEATS_PER_BAR as f64).round() as u64;
        Self::from_total_subbeats(total)
    }

    /// Time at `subbeat_in_bar` subbeats into the 0-based bar `bar_index`
    ///
    /// `subbeat_in_bar` may reach `SUBBEATS_PER_BAR`, which is the first
    /// subbeat of the next bar.
    pub fn in_bar(bar_index: u64, subbeat_in_bar: u32) -> Self {
        let bar = bar_index
            .saturating_add((subbeat_in_bar / SUBBEATS_PER_BAR) as u64)
            .saturating_add(1);
        let remaining = subbeat_in_bar % SUBBEATS_PER_BAR;
        let beat = remaining / SUBBEATS_PER_BEAT + 1;
        let subbeat = remaining % SUBBEATS_PER_BEAT + 1;

        Self::new(bar, beat as u8, subbeat as u8)
    }

    /// Convert to total subbeats from start
    pub fn to_total_subbeats(&self) -> u64 {
        let bar_0 = self.bar.saturating_sub(1);
        let beat_0 = self.beat.saturating_sub(1) as u64;
        let subbeat_0 = self.subbeat.saturating_sub(1) as u64;

        bar_0
            .saturating_mul(SUBBEATS_PER_BAR as u64)
            .saturating_add(beat_0 * SUBBEATS_PER_BEAT as u64 + subbeat_0)
    }

    /// Position in bars
    pub fn to_bars(&self) -> f64 {
        self.to_total_subbeats() as f64 * SUBBEAT
    }

    /// Short label used by the rangehead picker
    ///
    /// Beat and subbeat segments are omitted while they sit on their first
    /// subdivision: "3", "3.2", "3.1.4", "3.2.3".
    pub fn label(&self) -> String {
        let mut label = self.bar.to_string();
        if self.subbeat > 1 || self.beat > 1 {
            label.push_str(&format!(".{}", self.beat));
        }
        if self.subbeat > 1 {
            label.push_str(&format!(".{}", self.subbeat));
        }
        label
    }
}

impl Default for MusicalTime {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for MusicalTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.bar, self.beat, self.subbeat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_constants() {
        assert_eq!(SUBBEATS_PER_BAR, 16);
        assert_eq!(BEAT, 0.25);
        assert_eq!(SUBBEAT, 0.0625);
    }

    #[test]
    fn test_tempo_clamping() {
        assert_eq!(Tempo::new(10.0).bpm(), 20.0);
        assert_eq!(Tempo::new(5000.0).bpm(), 999.0);
        assert_eq!(Tempo::new(f64::NAN).bpm(), 120.0);

        let mut tempo = Tempo::default();
        tempo.set_bpm(90.0);
        assert_eq!(tempo.bpm(), 90.0);
    }

    #[test]
    fn test_tempo_conversion() {
        let tempo = Tempo::new(120.0);

        // At 120 BPM: one beat = 0.5s, one bar = 2s
        assert_eq!(tempo.beat_duration_seconds(), 0.5);
        assert_eq!(tempo.bar_duration_seconds(), 2.0);
        assert_eq!(tempo.seconds_to_bars(1.0), 0.5);
    }

    #[test]
    fn test_musical_time_round_trip() {
        for total in [0u64, 1, 3, 4, 15, 16, 17, 63, 64] {
            let time = MusicalTime::from_total_subbeats(total);
            assert_eq!(time.to_total_subbeats(), total);
        }

        let time = MusicalTime::from_total_subbeats(21);
        assert_eq!(time, MusicalTime::new(2, 2, 2));
        assert_eq!(time.to_bars(), 21.0 / 16.0);
    }

    #[test]
    fn test_musical_time_from_bars() {
        assert_eq!(MusicalTime::from_bars(0.0), MusicalTime::zero());
        assert_eq!(MusicalTime::from_bars(1.25), MusicalTime::new(2, 2, 1));
        assert_eq!(MusicalTime::from_bars(-3.0), MusicalTime::zero());
    }

    #[test]
    fn test_musical_time_far_from_origin() {
        let far = MusicalTime::from_bars(1.0e18);
        assert_eq!(far.bar, 1_000_000_000_000_000_001);
        assert_eq!(far.label(), "1000000000000000001");

        let last = MusicalTime::from_bars(f64::MAX);
        assert_eq!(last.to_total_subbeats(), u64::MAX);
    }

    #[test]
    fn test_in_bar() {
        assert_eq!(MusicalTime::in_bar(0, 0), MusicalTime::zero());
        assert_eq!(MusicalTime::in_bar(1, 5), MusicalTime::new(2, 2, 2));
        assert_eq!(MusicalTime::in_bar(1, 16), MusicalTime::new(3, 1, 1));
        assert_eq!(MusicalTime::in_bar(u64::MAX, 16).bar, u64::MAX);
    }

    #[test]
    fn test_label_omits_first_subdivisions() {
        assert_eq!(MusicalTime::new(3, 1, 1).label(), "3");
        assert_eq!(MusicalTime::new(3, 2, 1).label(), "3.2");
        assert_eq!(MusicalTime::new(3, 1, 4).label(), "3.1.4");
        assert_eq!(MusicalTime::new(3, 4, 3).label(), "3.4.3");
    }

    #[test]
    fn test_display() {
        assert_eq!(MusicalTime::new(2, 3, 4).to_string(), "2:3:4");
        assert_eq!(Tempo::new(96.0).to_string(), "96.0 BPM");
    }
}
