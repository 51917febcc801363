use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

use crate::config::PanelConfig;
use crate::error::{BoardError, Result};

/// Resting positions the panel animates to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapTarget {
    Collapsed,
    HalfOpen,
}

/// Presentation mode for the toggle icon and label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PanelMode {
    Collapsed,
    Expanded,
}

/// Snap geometry for one viewport height
#[derive(Debug, Clone, Copy)]
struct Geometry<'a> {
    config: &'a PanelConfig,
    viewport_height: f64,
}

impl<'a> Geometry<'a> {
    fn min_offset(&self) -> f64 {
        self.config.expanded_fraction * self.viewport_height
    }

    fn max_offset(&self) -> f64 {
        self.config.collapsed_fraction * self.viewport_height
    }

    fn clamp(&self, offset: f64) -> f64 {
        offset.max(self.min_offset()).min(self.max_offset())
    }

    fn snap_offset(&self, target: SnapTarget) -> f64 {
        match target {
            SnapTarget::Collapsed => self.max_offset(),
            SnapTarget::HalfOpen => self.config.half_open_fraction * self.viewport_height,
        }
    }

    fn release_target(&self, offset: f64) -> SnapTarget {
        if offset > self.config.drag_release_threshold * self.viewport_height {
            SnapTarget::Collapsed
        } else {
            SnapTarget::HalfOpen
        }
    }

    fn click_target(&self, offset: f64) -> SnapTarget {
        if offset > self.config.click_toggle_threshold * self.viewport_height {
            SnapTarget::HalfOpen
        } else {
            SnapTarget::Collapsed
        }
    }

    fn release(&self, offset: f64, clicked: bool) -> GestureFrame {
        let target = if clicked {
            self.click_target(offset)
        } else {
            self.release_target(offset)
        };
        GestureFrame {
            offset,
            snap_target: Some(target),
            target_offset: Some(self.snap_offset(target)),
        }
    }
}

fn check_viewport(viewport_height: f64) -> Result<()> {
    if !viewport_height.is_finite() || viewport_height < 0.0 {
        return Err(BoardError::InvalidArgument(format!(
            "viewport height must be a finite non-negative number, got {}",
            viewport_height
        )));
    }
    Ok(())
}

/// Outcome of one gesture step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureFrame {
    /// Live offset after applying the delta
    pub offset: f64,
    /// Set on release
    pub snap_target: Option<SnapTarget>,
    /// Pixel offset of `snap_target`
    pub target_offset: Option<f64>,
}

/// Computes the panel offset for a gesture that started at `current_offset`
/// and has moved by `delta` in total.
///
/// On release a zero `delta` is a click and uses the click-toggle
/// threshold; any movement uses the drag-release threshold. The
/// controller tracks movement itself, so a drag that returns to its
/// origin is still released as a drag.
pub fn offset_for_gesture(
    config: &PanelConfig,
    viewport_height: f64,
    current_offset: f64,
    delta: f64,
    released: bool,
) -> GestureFrame {
    let geometry = Geometry {
        config,
        viewport_height,
    };
    let offset = geometry.clamp(current_offset + delta);

    if !released {
        return GestureFrame {
            offset,
            snap_target: None,
            target_offset: None,
        };
    }

    geometry.release(offset, delta == 0.0)
}

#[derive(Debug, Clone, Copy)]
struct DragTrack {
    origin: f64,
    delta: f64,
    /// Set by any nonzero move, even if the pointer later returns
    moved: bool,
}

/// Vertical drag state machine of the backlog bottom sheet.
///
/// The host feeds pointer events and animation frames; the controller
/// decides where the panel should come to rest.
#[derive(Debug, Clone)]
pub struct DragGestureController {
    config: PanelConfig,
    viewport_height: f64,
    offset: f64,
    drag: Option<DragTrack>,
    target: Option<SnapTarget>,
    animating: bool,
    last_release: Option<Instant>,
}

impl DragGestureController {
    /// Starts collapsed.
    ///
    /// Fails on an invalid panel config or a negative, infinite or NaN
    /// viewport height.
    pub fn new(config: PanelConfig, viewport_height: f64) -> Result<Self> {
        config.validate()?;
        check_viewport(viewport_height)?;

        let mut controller = Self {
            config,
            viewport_height,
            offset: 0.0,
            drag: None,
            target: Some(SnapTarget::Collapsed),
            animating: false,
            last_release: None,
        };
        controller.offset = controller.geometry().snap_offset(SnapTarget::Collapsed);
        Ok(controller)
    }

    fn geometry(&self) -> Geometry<'_> {
        Geometry {
            config: &self.config,
            viewport_height: self.viewport_height,
        }
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn viewport_height(&self) -> f64 {
        self.viewport_height
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn mode(&self) -> PanelMode {
        if self.offset > self.config.click_toggle_threshold * self.viewport_height {
            PanelMode::Collapsed
        } else {
            PanelMode::Expanded
        }
    }

    /// Pixel offset the host should animate towards, if any
    pub fn animation_target(&self) -> Option<f64> {
        if !self.animating {
            return None;
        }
        self.target.map(|t| self.geometry().snap_offset(t))
    }

    pub fn snap_offset(&self, target: SnapTarget) -> f64 {
        self.geometry().snap_offset(target)
    }

    /// Takes gesture ownership from the rendered offset, which may be
    /// mid-animation; any running snap animation is abandoned.
    pub fn drag_start(&mut self, current_offset: f64) {
        let origin = self.geometry().clamp(current_offset);
        self.offset = origin;
        self.animating = false;
        self.drag = Some(DragTrack {
            origin,
            delta: 0.0,
            moved: false,
        });
    }

    /// Applies an incremental pointer delta; ignored when not dragging
    pub fn drag_move(&mut self, delta: f64) -> f64 {
        if let Some(track) = self.drag.as_mut() {
            track.delta += delta;
            track.moved |= delta != 0.0;
            let track = *track;
            self.offset = offset_for_gesture(
                &self.config,
                self.viewport_height,
                track.origin,
                track.delta,
                false,
            )
            .offset;
        }
        self.offset
    }

    /// Releases the gesture and picks a snap target.
    ///
    /// A release that never moved counts as the click itself, so the
    /// click event that follows it falls inside the cool-down. Any drag,
    /// including one that returns to its origin, uses the release threshold.
    pub fn drag_end(&mut self, now: Instant) -> Option<SnapTarget> {
        let track = self.drag.take()?;
        let geometry = self.geometry();
        let frame = geometry.release(geometry.clamp(track.origin + track.delta), !track.moved);

        self.offset = frame.offset;
        self.last_release = Some(now);
        self.snap_to(frame.snap_target)
    }

    /// Click on the panel handle.
    ///
    /// Returns `None` while dragging or within the cool-down after a
    /// release.
    pub fn click(&mut self, now: Instant) -> Option<SnapTarget> {
        if self.is_dragging() {
            return None;
        }
        if let Some(released) = self.last_release {
            let cooldown = Duration::from_millis(self.config.click_cooldown_ms);
            if now.saturating_duration_since(released) < cooldown {
                tracing::trace!("click suppressed after drag release");
                return None;
            }
        }

        let target = self.geometry().click_target(self.offset);
        self.snap_to(Some(target))
    }

    fn snap_to(&mut self, target: Option<SnapTarget>) -> Option<SnapTarget> {
        self.target = target;
        self.animating = target.is_some();
        tracing::debug!(offset = self.offset, ?target, "panel snapping");
        target
    }

    /// Reports an intermediate offset of the running animation
    pub fn animation_frame(&mut self, offset: f64) {
        if self.drag.is_none() {
            self.offset = self.geometry().clamp(offset);
        }
    }

    /// Marks the running animation as finished at its target
    pub fn settle(&mut self) {
        if !self.animating {
            return;
        }
        if let Some(target) = self.target {
            self.offset = self.geometry().snap_offset(target);
        }
        self.animating = false;
    }

    /// Recomputes pixel geometry for a new viewport height.
    ///
    /// A live drag keeps ownership and is re-clamped; a panel at rest
    /// follows its snap target. An invalid height leaves the panel as is.
    pub fn resize(&mut self, viewport_height: f64) -> Result<()> {
        check_viewport(viewport_height)?;
        self.viewport_height = viewport_height;

        match self.drag.as_mut() {
            Some(track) => {
                let geometry = Geometry {
                    config: &self.config,
                    viewport_height,
                };
                track.origin = geometry.clamp(track.origin);
                self.offset = geometry.clamp(track.origin + track.delta);
            }
            None => {
                self.offset = match (self.animating, self.target) {
                    (false, Some(target)) => self.geometry().snap_offset(target),
                    _ => self.geometry().clamp(self.offset),
                };
            }
        }
        Ok(())
    }
}
