//! Controller input wiring and toss capture
//!
//! Button edges arrive as discrete press/release notifications. A trigger
//! press opens a capture window that tracks the peak acceleration until the
//! matching release turns it into a `TossInput`.

/// Controller buttons the game listens to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    Trigger,
    Touchpad,
    Back,
}

/// A discrete button transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonEdge {
    Pressed(Button),
    Released(Button),
}

/// What a button edge means to the game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    /// Spawn a snowball in hand and start capturing the throw
    BeginThrow,
    /// Let go of the held snowball
    ReleaseThrow,
    /// Toggle trail/spark effects
    ToggleTrails,
    /// Clear score and rings
    RestartRound,
}

impl ButtonEdge {
    /// Map an edge to a game action (unbound edges map to None)
    pub fn action(&self) -> Option<InputAction> {
        match self {
            ButtonEdge::Pressed(Button::Trigger) => Some(InputAction::BeginThrow),
            ButtonEdge::Released(Button::Trigger) => Some(InputAction::ReleaseThrow),
            ButtonEdge::Pressed(Button::Touchpad) => Some(InputAction::ToggleTrails),
            ButtonEdge::Pressed(Button::Back) => Some(InputAction::RestartRound),
            ButtonEdge::Released(_) => None,
        }
    }
}

/// Device motion signals sampled on demand
pub trait DeviceSignals {
    /// Current acceleration magnitude (device units)
    fn acceleration(&self) -> f32;

    /// Current orientation heading in degrees, [0, 360)
    fn heading(&self) -> f32;
}

/// Signals held in plain fields; the caller updates them each frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FixedSignals {
    pub acceleration: f32,
    pub heading: f32,
}

impl DeviceSignals for FixedSignals {
    fn acceleration(&self) -> f32 {
        self.acceleration
    }

    fn heading(&self) -> f32 {
        self.heading
    }
}

/// Everything captured between trigger press and release
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TossInput {
    /// Largest acceleration magnitude seen while held
    pub peak_acceleration: f32,
    /// When the peak was sampled
    pub peak_at: f32,
    /// When the trigger was released
    pub released_at: f32,
    /// Orientation heading at release (degrees)
    pub heading: f32,
}

#[derive(Debug, Clone, Copy)]
struct CaptureWindow {
    pressed_at: f32,
    peak: f32,
    peak_at: f32,
}

/// Tracks the press-to-release window of one throw
#[derive(Debug, Clone, Default)]
pub struct TossCapture {
    window: Option<CaptureWindow>,
}

impl TossCapture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_capturing(&self) -> bool {
        self.window.is_some()
    }

    /// Open a capture window. A second press while open is ignored.
    pub fn press(&mut self, now: f32) {
        if self.window.is_some() {
            log::debug!("Trigger pressed while already capturing, ignoring");
            return;
        }
        self.window = Some(CaptureWindow {
            pressed_at: now,
            peak: 0.0,
            peak_at: now,
        });
    }

    /// Feed one acceleration sample
    pub fn sample(&mut self, acceleration: f32, now: f32) {
        if let Some(window) = &mut self.window {
            if acceleration > window.peak {
                window.peak = acceleration;
                window.peak_at = now;
            }
        }
    }

    /// Close the window and produce the toss input (once per press)
    pub fn release(&mut self, now: f32, heading: f32) -> Option<TossInput> {
        let Some(window) = self.window.take() else {
            log::warn!("Trigger released without a matching press");
            return None;
        };
        log::debug!(
            "Captured throw: held {:.2}s, peak {:.0} at {:.2}",
            now - window.pressed_at,
            window.peak,
            window.peak_at
        );
        Some(TossInput {
            peak_acceleration: window.peak,
            peak_at: window.peak_at,
            released_at: now,
            heading,
        })
    }

    /// Drop any open window without producing input
    pub fn cancel(&mut self) {
        self.window = None;
    }
}
