//! Session state and playback crossfade control.
//!
//! The first interaction starts the experience and fades both beds in.
//! Later interactions alternate between fading out (followed by a pause once
//! the fade and a short grace period have elapsed) and fading back in. The
//! deferred pause is a deadline checked on every tick, never a timer.

use tracing::info;

use crate::params::SessionParams;

/// One of the two independently leveled audio beds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bed {
    River,
    Ocean,
}

impl Bed {
    pub const ALL: [Bed; 2] = [Bed::River, Bed::Ocean];

    /// Target volume once faded in
    pub fn target(self, params: &SessionParams) -> f32 {
        match self {
            Bed::River => params.river_volume,
            Bed::Ocean => params.ocean_volume,
        }
    }
}

/// Audio transport collaborator
pub trait Transport {
    /// Start (or keep) the bed looping
    fn play_loop(&mut self, bed: Bed);

    fn pause(&mut self, bed: Bed);

    fn set_volume(&mut self, bed: Bed, volume: f32);

    /// Linear ramp from `from` to `to` starting at `now_ms`
    fn fade(&mut self, bed: Bed, from: f32, to: f32, duration_ms: f64, now_ms: f64);

    fn is_playing(&self, bed: Bed) -> bool;

    /// Bed volume at the transport's current time
    fn volume(&self, bed: Bed) -> f32;

    /// Master gain applied on top of the bed volumes
    fn set_gain(&mut self, gain: f32);

    /// Move the transport clock to `now_ms`
    fn advance(&mut self, now_ms: f64);
}

/// What an interaction did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interaction {
    /// First interaction: session started, beds fading in
    Started,
    /// Beds fading out, pause scheduled
    Stopping,
    /// Beds fading back in
    Resumed,
}

/// Process-wide session flags plus the pending pause deadline
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    started: bool,
    intro_alpha: f32,
    playing: bool,
    pause_deadline: Option<f64>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            started: false,
            intro_alpha: 255.0,
            playing: false,
            pause_deadline: None,
        }
    }
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn started(&self) -> bool {
        self.started
    }

    pub fn playing(&self) -> bool {
        self.playing
    }

    pub fn intro_alpha(&self) -> f32 {
        self.intro_alpha
    }

    pub fn pause_deadline(&self) -> Option<f64> {
        self.pause_deadline
    }

    /// Alpha the intro text is drawn at, `None` once it has fully faded
    pub fn intro_text_alpha(&self) -> Option<f32> {
        if !self.started {
            Some(255.0)
        } else if self.intro_alpha > 0.0 {
            Some(self.intro_alpha)
        } else {
            None
        }
    }

    /// Handle a user interaction (click)
    pub fn interact(
        &mut self,
        now_ms: f64,
        transport: &mut dyn Transport,
        params: &SessionParams,
    ) -> Interaction {
        if !self.started {
            self.started = true;
            self.intro_alpha = 255.0;
            self.fade_in(now_ms, transport, params);
            info!("Session started");
            return Interaction::Started;
        }

        if Bed::ALL.iter().any(|&bed| transport.is_playing(bed)) {
            for bed in Bed::ALL {
                let from = transport.volume(bed);
                transport.fade(bed, from, 0.0, params.fade_ms, now_ms);
            }
            let deadline = now_ms + params.fade_ms + params.pause_grace_ms;
            self.playing = false;
            self.pause_deadline = Some(deadline);
            info!("Fading out, pause at {:.0} ms", deadline);
            Interaction::Stopping
        } else {
            self.fade_in(now_ms, transport, params);
            info!("Resuming playback");
            Interaction::Resumed
        }
    }

    fn fade_in(&mut self, now_ms: f64, transport: &mut dyn Transport, params: &SessionParams) {
        for bed in Bed::ALL {
            transport.play_loop(bed);
            transport.set_volume(bed, 0.0);
            transport.fade(bed, 0.0, bed.target(params), params.fade_ms, now_ms);
        }
        self.playing = true;
        self.pause_deadline = None;
    }

    /// Per-frame update: fire a due pause and decay the intro text
    pub fn tick(&mut self, now_ms: f64, transport: &mut dyn Transport, params: &SessionParams) {
        transport.advance(now_ms);

        if let Some(deadline) = self.pause_deadline {
            if now_ms >= deadline {
                for bed in Bed::ALL {
                    transport.pause(bed);
                }
                self.pause_deadline = None;
                info!("Beds paused");
            }
        }

        if self.started {
            self.intro_alpha = (self.intro_alpha - params.intro_decay).max(0.0);
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Transport that evaluates fades exactly and records pauses
    #[derive(Debug, Default)]
    pub(crate) struct FakeTransport {
        pub now_ms: f64,
        pub playing: [bool; 2],
        pub volume: [f32; 2],
        pub fades: Vec<(Bed, f32, f32, f64, f64)>,
        pub pauses: usize,
        pub gain: f32,
    }

    fn slot(bed: Bed) -> usize {
        match bed {
            Bed::River => 0,
            Bed::Ocean => 1,
        }
    }

    impl FakeTransport {
        fn current_fade(&self, bed: Bed) -> Option<&(Bed, f32, f32, f64, f64)> {
            self.fades.iter().rev().find(|f| f.0 == bed)
        }
    }

    impl Transport for FakeTransport {
        fn play_loop(&mut self, bed: Bed) {
            self.playing[slot(bed)] = true;
        }

        fn pause(&mut self, bed: Bed) {
            self.playing[slot(bed)] = false;
            self.pauses += 1;
        }

        fn set_volume(&mut self, bed: Bed, volume: f32) {
            self.volume[slot(bed)] = volume;
        }

        fn fade(&mut self, bed: Bed, from: f32, to: f32, duration_ms: f64, now_ms: f64) {
            self.fades.push((bed, from, to, duration_ms, now_ms));
        }

        fn is_playing(&self, bed: Bed) -> bool {
            self.playing[slot(bed)]
        }

        fn volume(&self, bed: Bed) -> f32 {
            match self.current_fade(bed) {
                Some(&(_, from, to, duration, start)) => {
                    let t = ((self.now_ms - start) / duration).clamp(0.0, 1.0) as f32;
                    from + (to - from) * t
                }
                None => self.volume[slot(bed)],
            }
        }

        fn set_gain(&mut self, gain: f32) {
            self.gain = gain;
        }

        fn advance(&mut self, now_ms: f64) {
            self.now_ms = now_ms;
        }
    }

    #[test]
    fn test_first_interaction_starts_once() {
        let params = SessionParams::default();
        let mut session = SessionState::new();
        let mut transport = FakeTransport::default();

        assert_eq!(session.intro_text_alpha(), Some(255.0));
        assert_eq!(session.interact(0.0, &mut transport, &params), Interaction::Started);
        assert!(session.started());
        assert!(session.playing());
        assert_eq!(session.intro_alpha(), 255.0);
        assert_eq!(
            transport.fades,
            vec![
                (Bed::River, 0.0, 0.8, 3000.0, 0.0),
                (Bed::Ocean, 0.0, 0.4, 3000.0, 0.0),
            ]
        );

        // Later interactions never restart the session
        session.tick(1_000.0, &mut transport, &params);
        assert_ne!(session.interact(1_000.0, &mut transport, &params), Interaction::Started);
    }

    #[test]
    fn test_intro_decays_after_start() {
        let params = SessionParams::default();
        let mut session = SessionState::new();
        let mut transport = FakeTransport::default();

        session.tick(0.0, &mut transport, &params);
        assert_eq!(session.intro_alpha(), 255.0);

        session.interact(0.0, &mut transport, &params);
        for frame in 1..=42 {
            session.tick(frame as f64 * 16.0, &mut transport, &params);
        }
        assert_eq!(session.intro_alpha(), 3.0);
        assert_eq!(session.intro_text_alpha(), Some(3.0));
        session.tick(700.0, &mut transport, &params);
        assert_eq!(session.intro_alpha(), 0.0);
        assert_eq!(session.intro_text_alpha(), None);
    }

    #[test]
    fn test_stop_pauses_after_fade_and_grace() {
        let params = SessionParams::default();
        let mut session = SessionState::new();
        let mut transport = FakeTransport::default();

        session.interact(0.0, &mut transport, &params);
        session.tick(5_000.0, &mut transport, &params);
        assert_eq!(session.interact(5_000.0, &mut transport, &params), Interaction::Stopping);
        assert!(!session.playing());
        assert_eq!(transport.fades[2], (Bed::River, 0.8, 0.0, 3000.0, 5_000.0));
        assert_eq!(session.pause_deadline(), Some(8_200.0));

        session.tick(8_199.0, &mut transport, &params);
        assert_eq!(transport.pauses, 0);
        session.tick(8_200.0, &mut transport, &params);
        assert_eq!(transport.pauses, 2);
        assert!(!transport.is_playing(Bed::River));

        assert_eq!(session.interact(9_000.0, &mut transport, &params), Interaction::Resumed);
        assert!(transport.is_playing(Bed::Ocean));
        assert_eq!(transport.fades.last(), Some(&(Bed::Ocean, 0.0, 0.4, 3000.0, 9_000.0)));
    }

    #[test]
    fn test_interaction_mid_fade_out_refades_from_current_level() {
        let params = SessionParams::default();
        let mut session = SessionState::new();
        let mut transport = FakeTransport::default();

        session.interact(0.0, &mut transport, &params);
        session.tick(4_000.0, &mut transport, &params);
        session.interact(4_000.0, &mut transport, &params);

        // Halfway through the fade-out the river sits at 0.4
        session.tick(5_500.0, &mut transport, &params);
        assert_eq!(session.interact(5_500.0, &mut transport, &params), Interaction::Stopping);
        let &(bed, from, to, _, start) = transport.fades.iter().rev().nth(1).unwrap();
        assert_eq!((bed, to, start), (Bed::River, 0.0, 5_500.0));
        assert!((from - 0.4).abs() < 1e-6);

        // The first deadline was replaced, the pause still fires exactly once
        assert_eq!(session.pause_deadline(), Some(8_700.0));
        session.tick(7_200.0, &mut transport, &params);
        assert_eq!(transport.pauses, 0);
        session.tick(8_700.0, &mut transport, &params);
        assert_eq!(transport.pauses, 2);
        assert_eq!(session.pause_deadline(), None);
    }
}
