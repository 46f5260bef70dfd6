//! Overlay line lifecycle.

use glam::Vec2;

use crate::params::OverlayParams;

/// Lifecycle stage; ordering follows the only allowed progression
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LineState {
    FadingIn,
    Visible,
    FadingOut,
    Dead,
}

/// One transient line of on-screen text
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayLine {
    pub text: String,
    pub position: Vec2,
    /// [0, 255]
    pub alpha: f32,
    /// Frames spent in the current state
    pub age: u32,
    pub state: LineState,
}

impl OverlayLine {
    pub fn new(text: String, position: Vec2) -> Self {
        Self {
            text,
            position,
            alpha: 0.0,
            age: 0,
            state: LineState::FadingIn,
        }
    }

    pub fn is_dead(&self) -> bool {
        self.state == LineState::Dead
    }

    /// Advance one frame
    pub fn step(&mut self, params: &OverlayParams) {
        self.age = self.age.saturating_add(1);

        match self.state {
            LineState::FadingIn => {
                self.alpha += params.fade_in_step;
                if self.alpha >= params.alpha_ceiling {
                    self.alpha = params.alpha_ceiling;
                    self.enter(LineState::Visible);
                }
            }
            LineState::Visible => {
                if self.age >= params.hold_frames {
                    self.enter(LineState::FadingOut);
                }
            }
            LineState::FadingOut => {
                self.alpha -= params.fade_out_step;
                if self.alpha <= 0.0 {
                    self.alpha = 0.0;
                    self.enter(LineState::Dead);
                }
            }
            LineState::Dead => {}
        }

        self.alpha = self.alpha.clamp(0.0, 255.0);
    }

    fn enter(&mut self, state: LineState) {
        self.state = state;
        self.age = 0;
    }
}
