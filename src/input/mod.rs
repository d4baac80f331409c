// SPDX-License-Identifier: MPL-2.0
//! Input handling and controls-overlay visibility.
//!
//! [`InputController`] subscribes to the host's global input signals,
//! translates keyboard input through [`keymap`] into player commands,
//! and runs the auto-hide state machine for the controls overlay:
//! recognized activity shows the controls and re-arms a hide timer;
//! once the timer lapses with no further activity, the controls hide.
//!
//! Signal delivery is split in two. Keyboard and fullscreen signals act
//! immediately inside the handler. Mouse movement and window resizes are
//! only recorded there; the debounced outcome is produced by [`tick`],
//! which the host is expected to drive from its frame or timer loop.
//!
//! [`tick`]: InputController::tick

pub mod keymap;

pub use keymap::{action_for, PlayerAction};

use crate::config::Tunables;
use crate::host::{Dimensions, InputSignal, InputSource, ListenerHandle, ViewportHost};
use crate::player::Player;
use crate::timing::{Clock, DebounceTimer, MouseSampler};
use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

/// Whether the controls overlay should currently be drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlsVisibility {
    Visible,
    Hidden,
}

/// State shared between the controller and its input handler closure.
struct ControllerShared {
    visible: Cell<bool>,
    is_fullscreen: Cell<bool>,
    hide_timer: DebounceTimer,
    mouse: MouseSampler,
    resize_timer: DebounceTimer,
    pending_resize: Cell<Option<Dimensions>>,
}

/// Keyboard/mouse front end for one [`Player`] plus the overlay
/// auto-hide state machine.
pub struct InputController {
    player: Rc<Player>,
    source: Rc<dyn InputSource>,
    viewport: Rc<dyn ViewportHost>,
    clock: Rc<dyn Clock>,
    shared: Rc<ControllerShared>,
    listener: Cell<Option<ListenerHandle>>,
    arrow_seek_step_secs: f64,
    arrow_volume_step_percent: i8,
}

impl InputController {
    /// Wires the controller to `source`, starting with the controls
    /// visible and the hide timer armed.
    #[must_use]
    pub fn new(
        player: Rc<Player>,
        source: Rc<dyn InputSource>,
        viewport: Rc<dyn ViewportHost>,
        clock: Rc<dyn Clock>,
        tunables: &Tunables,
    ) -> Self {
        let shared = Rc::new(ControllerShared {
            visible: Cell::new(true),
            is_fullscreen: Cell::new(viewport.is_fullscreen()),
            hide_timer: DebounceTimer::new(tunables.hide_delay),
            mouse: MouseSampler::new(
                tunables.mouse_sample_interval,
                tunables.mouse_move_threshold_px,
            ),
            resize_timer: DebounceTimer::new(tunables.resize_debounce),
            pending_resize: Cell::new(None),
        });
        shared.hide_timer.arm(clock.now());

        let handler: Rc<dyn Fn(&InputSignal)> = {
            let player = Rc::clone(&player);
            let viewport = Rc::clone(&viewport);
            let clock = Rc::clone(&clock);
            let shared = Rc::clone(&shared);
            let seek_step = tunables.arrow_seek_step_secs;
            let volume_step = tunables.arrow_volume_step_percent;
            Rc::new(move |signal| {
                handle_input(
                    &player,
                    &viewport,
                    &shared,
                    clock.now(),
                    seek_step,
                    volume_step,
                    signal,
                );
            })
        };
        let listener = source.subscribe(handler);

        Self {
            player,
            source,
            viewport,
            clock,
            shared,
            listener: Cell::new(Some(listener)),
            arrow_seek_step_secs: tunables.arrow_seek_step_secs,
            arrow_volume_step_percent: tunables.arrow_volume_step_percent,
        }
    }

    #[must_use]
    pub fn visibility(&self) -> ControlsVisibility {
        if self.shared.visible.get() {
            ControlsVisibility::Visible
        } else {
            ControlsVisibility::Hidden
        }
    }

    /// Shows the controls and restarts the auto-hide countdown, as if
    /// the user had just interacted.
    pub fn show_controls(&self) {
        show_controls(&self.shared, self.clock.now());
    }

    /// Drives every debounced outcome due at `now`: sampled mouse
    /// movement shows the controls, a settled resize runs the
    /// fullscreen-on-maximize heuristic, and a lapsed hide timer hides
    /// the controls. Call from the host's frame or timer loop.
    pub fn tick(&self, now: Instant) {
        if self.shared.mouse.sample_if_due(now) {
            show_controls(&self.shared, now);
        }

        if self.shared.resize_timer.fire_if_due(now) {
            if let Some(size) = self.shared.pending_resize.take() {
                self.handle_settled_resize(size);
            }
        }

        if self.shared.hide_timer.fire_if_due(now) {
            self.shared.visible.set(false);
        }
    }

    /// Convenience for hosts driving the controller off wall time.
    pub fn tick_now(&self) {
        self.tick(self.clock.now());
    }

    /// A window resized to exactly the screen size while windowed is
    /// treated as a maximize gesture and promoted to real fullscreen.
    fn handle_settled_resize(&self, size: Dimensions) {
        if self.shared.is_fullscreen.get() {
            return;
        }
        if size == self.viewport.screen_size() {
            if let Err(err) = self.viewport.request_fullscreen_enter() {
                log::warn!("fullscreen request rejected: {err}");
            }
        }
    }

    /// Unsubscribes from the input source and cancels every pending
    /// timer. Idempotent; also runs on `Drop`.
    pub fn detach(&self) {
        if let Some(handle) = self.listener.take() {
            self.source.unsubscribe(handle);
        }
        self.shared.hide_timer.cancel();
        self.shared.mouse.cancel();
        self.shared.resize_timer.cancel();
        self.shared.pending_resize.set(None);
    }

    /// Arrow-key seek step this controller dispatches, in seconds.
    #[must_use]
    pub fn arrow_seek_step_secs(&self) -> f64 {
        self.arrow_seek_step_secs
    }

    /// Arrow-key volume step this controller dispatches, in percent.
    #[must_use]
    pub fn arrow_volume_step_percent(&self) -> i8 {
        self.arrow_volume_step_percent
    }

    #[must_use]
    pub fn player(&self) -> &Rc<Player> {
        &self.player
    }
}

impl Drop for InputController {
    fn drop(&mut self) {
        self.detach();
    }
}

impl std::fmt::Debug for InputController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InputController")
            .field("visibility", &self.visibility())
            .finish_non_exhaustive()
    }
}

fn show_controls(shared: &ControllerShared, now: Instant) {
    shared.visible.set(true);
    shared.hide_timer.arm(now);
}

fn handle_input(
    player: &Player,
    viewport: &Rc<dyn ViewportHost>,
    shared: &ControllerShared,
    now: Instant,
    seek_step: f64,
    volume_step: i8,
    signal: &InputSignal,
) {
    match signal {
        InputSignal::MouseMove { x, y } => {
            // Recorded only; tick decides whether it counts as activity.
            shared.mouse.record(*x, *y, now);
        }
        InputSignal::Resize { width, height } => {
            shared.pending_resize.set(Some(Dimensions {
                width: *width,
                height: *height,
            }));
            shared.resize_timer.arm(now);
        }
        InputSignal::FullscreenChange { active } => {
            shared.is_fullscreen.set(*active);
        }
        InputSignal::Key(key) => {
            let Some(action) = action_for(key) else {
                // Unrecognized keys are not activity.
                return;
            };
            if matches!(action, PlayerAction::HideControls) {
                shared.visible.set(false);
                shared.hide_timer.cancel();
                return;
            }
            show_controls(shared, now);
            dispatch(player, viewport, shared, seek_step, volume_step, action);
        }
    }
}

fn dispatch(
    player: &Player,
    viewport: &Rc<dyn ViewportHost>,
    shared: &ControllerShared,
    seek_step: f64,
    volume_step: i8,
    action: PlayerAction,
) {
    match action {
        PlayerAction::TogglePlayback => player.toggle(),
        PlayerAction::ToggleMute => player.toggle_mute(),
        PlayerAction::ToggleFullscreen => {
            if shared.is_fullscreen.get() {
                viewport.request_fullscreen_exit();
            } else if let Err(err) = viewport.request_fullscreen_enter() {
                log::warn!("fullscreen request rejected: {err}");
            }
        }
        PlayerAction::SetVolumePercent(percent) => player.change_volume(f64::from(percent)),
        PlayerAction::SeekToFraction(fraction) => {
            player.seek_to(player.duration() * fraction);
        }
        PlayerAction::SeekBy(raw_step) => {
            // Config overrides the default step but keeps the direction.
            let step = seek_step * raw_step.signum();
            player.seek_to(player.current_time() + step);
        }
        PlayerAction::VolumeBy(raw_step) => {
            let step = volume_step * raw_step.signum();
            player.change_volume(f64::from(player.volume_percent()) + f64::from(step));
        }
        PlayerAction::HideControls => {
            // Handled before dispatch; reaching here is a logic error
            // upstream but harmless.
        }
    }
}
