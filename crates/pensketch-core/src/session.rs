//! Gesture session: the draw/erase state machine.
//!
//! ```text
//! IDLE --down(primary)--> DRAWING --up/leave--> IDLE
//! IDLE --down(other)----> ERASING --up/leave--> IDLE
//! ```
//!
//! A [`Session`] owns its [`Surface`] and a [`GestureObserver`]. Every
//! pointer sample is handled synchronously and explicitly: the sample is
//! passed down the call chain, and nothing about the current event is
//! kept outside the active gesture.
//!
//! # Drawing
//!
//! Samples go through temporal interpolation, then spatial decimation.
//! Each committed point re-encodes the whole buffer into the in-progress
//! stroke. On pointer-up (or leave) the buffer is back-filled and written
//! one last time. [`Session::cancel`] discards the in-progress stroke
//! instead.
//!
//! # Erasing
//!
//! Each sample at least `eraser_min_dist` from the previous recorded
//! eraser position is recorded in the cursor trail and erased at with
//! the configured [`Eraser`].

use crate::codec::encode;
use crate::erase::{EraseDelta, EraseStrategy, Eraser};
use crate::input::{PointerEvent, PointerPhase, PointerSample};
use crate::sampler::{StrokeSampler, TemporalInterpolator};
use crate::surface::Surface;
use crate::types::{
    ConfigError, EraserMode, Point, PointSequence, SessionConfig, SessionError, StrokeId,
};

/// Callbacks fired at gesture milestones.
///
/// Every method has an empty default, so implementors override only the
/// milestones they care about.
pub trait GestureObserver {
    /// A drawing gesture created `stroke`.
    fn draw_start(&mut self, _stroke: StrokeId, _sample: &PointerSample) {}
    /// A sample (real or synthetic) was committed to `stroke`.
    fn draw_progress(&mut self, _stroke: StrokeId, _sample: &PointerSample) {}
    /// `stroke` was finalized.
    fn draw_end(&mut self, _stroke: StrokeId, _sample: &PointerSample) {}
    /// A drawing gesture was cancelled and `stroke` discarded.
    fn draw_cancel(&mut self, _stroke: StrokeId) {}
    /// An erasing gesture began; `affected` lists strokes touched by the
    /// first sample.
    fn erase_start(&mut self, _affected: &[StrokeId]) {}
    /// An eraser sample was recorded; `affected` lists strokes it touched.
    fn erase_progress(&mut self, _affected: &[StrokeId]) {}
    /// The erasing gesture ended; `affected` lists every removed stroke
    /// followed by every surviving created stroke.
    fn erase_end(&mut self, _affected: &[StrokeId]) {}
}

/// Observer that ignores every milestone.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl GestureObserver for NoopObserver {}

/// Net effect of one erasing gesture.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EraseReport {
    /// Strokes that existed before the gesture and were removed.
    pub removed: Vec<StrokeId>,
    /// Strokes created by the gesture that are still on the surface.
    pub created: Vec<StrokeId>,
}

impl EraseReport {
    /// Fold one erase step into the report.
    ///
    /// A stroke both created and removed within the gesture appears in
    /// neither list.
    pub fn absorb(&mut self, delta: &EraseDelta) {
        for id in &delta.removed {
            if let Some(pos) = self.created.iter().position(|c| c == id) {
                self.created.remove(pos);
            } else {
                self.removed.push(*id);
            }
        }
        self.created.extend_from_slice(&delta.created);
    }

    /// Every handle affected, removed first.
    #[must_use]
    pub fn affected(&self) -> Vec<StrokeId> {
        self.removed.iter().chain(&self.created).copied().collect()
    }
}

/// How a gesture ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// A stroke was finalized.
    Drawn {
        /// The finalized stroke.
        stroke: StrokeId,
        /// Number of points after back-fill.
        points: usize,
    },
    /// An erasing gesture ended.
    Erased(EraseReport),
    /// A drawing gesture was discarded.
    Cancelled,
}

/// Which gesture, if any, is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Waiting for a pointer-down.
    Idle,
    /// A stroke is being drawn.
    Drawing,
    /// The eraser is active.
    Erasing,
}

#[derive(Debug)]
struct DrawGesture {
    stroke: StrokeId,
    sampler: StrokeSampler,
    interpolator: TemporalInterpolator,
}

#[derive(Debug, Default)]
struct EraseGesture {
    cursor_trail: PointSequence,
    report: EraseReport,
}

#[derive(Debug)]
enum Gesture {
    Idle,
    Drawing(DrawGesture),
    Erasing(EraseGesture),
}

/// Drives draw and erase gestures against a surface.
#[derive(Debug)]
pub struct Session<S, O = NoopObserver> {
    surface: S,
    observer: O,
    config: SessionConfig,
    eraser: Option<Eraser>,
    gesture: Gesture,
    pen_active: bool,
}

impl<S: Surface> Session<S> {
    /// Create a session with no observer.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `config` fails validation.
    pub fn new(surface: S, config: SessionConfig) -> Result<Self, ConfigError> {
        Self::with_observer(surface, config, NoopObserver)
    }
}

impl<S: Surface, O: GestureObserver> Session<S, O> {
    /// Create a session that reports milestones to `observer`.
    ///
    /// The eraser mode is resolved here. An
    /// [`EraserMode::Unsupported`] mode is not an error: it is logged and
    /// every erase sample becomes a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `config` fails validation.
    pub fn with_observer(
        surface: S,
        config: SessionConfig,
        observer: O,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let eraser = match config.eraser_mode {
            EraserMode::Object => Some(Eraser::Object),
            EraserMode::Pixel => Some(Eraser::Pixel),
            EraserMode::Unsupported => {
                tracing::warn!("unsupported eraser mode configured; erasing is disabled");
                None
            }
        };
        Ok(Self {
            surface,
            observer,
            config,
            eraser,
            gesture: Gesture::Idle,
            pen_active: false,
        })
    }

    /// The surface.
    pub const fn surface(&self) -> &S {
        &self.surface
    }

    /// Mutable access to the surface.
    ///
    /// Mutating strokes while a gesture is active is the caller's
    /// responsibility.
    pub const fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Consume the session and return the surface.
    pub fn into_surface(self) -> S {
        self.surface
    }

    /// The observer.
    pub const fn observer(&self) -> &O {
        &self.observer
    }

    /// The configuration in effect.
    pub const fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Which gesture is active.
    pub const fn state(&self) -> SessionState {
        match self.gesture {
            Gesture::Idle => SessionState::Idle,
            Gesture::Drawing(_) => SessionState::Drawing,
            Gesture::Erasing(_) => SessionState::Erasing,
        }
    }

    /// Returns `true` if the last pointer-down came from a pen or mouse.
    ///
    /// Hosts use this to suppress touch scrolling while a pen is in use.
    pub const fn blocks_touch_scroll(&self) -> bool {
        self.pen_active
    }

    /// Points committed to the in-progress stroke (empty unless drawing).
    pub fn in_progress_points(&self) -> &[Point] {
        match &self.gesture {
            Gesture::Drawing(draw) => draw.sampler.points(),
            _ => &[],
        }
    }

    /// Eraser positions recorded so far (empty unless erasing).
    pub fn cursor_trail(&self) -> &[Point] {
        match &self.gesture {
            Gesture::Erasing(erase) => erase.cursor_trail.points(),
            _ => &[],
        }
    }

    /// Dispatch an event by phase.
    ///
    /// Returns the completion when the event ends a gesture.
    ///
    /// # Errors
    ///
    /// See [`pointer_down`](Self::pointer_down) and the surface errors
    /// of the other handlers.
    pub fn handle(&mut self, event: PointerEvent) -> Result<Option<Completion>, SessionError> {
        match event.phase {
            PointerPhase::Down => self.pointer_down(event.sample).map(|()| None),
            PointerPhase::Move => self.pointer_move(event.sample).map(|()| None),
            PointerPhase::Up => self.pointer_up(event.sample),
            PointerPhase::Leave => self.pointer_leave(event.sample),
            PointerPhase::Cancel => self.cancel(),
        }
    }

    /// Start a gesture.
    ///
    /// Touch contacts never start a gesture and are ignored while one is
    /// active. A primary-button contact starts drawing unless
    /// `force_eraser` is set; anything else starts erasing. The down
    /// sample is handled like any later sample.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::GestureInProgress`] if a pen or mouse
    /// contact arrives while a gesture is already active, or a surface
    /// error from handling the sample.
    pub fn pointer_down(&mut self, sample: PointerSample) -> Result<(), SessionError> {
        let idle = matches!(self.gesture, Gesture::Idle);
        if !sample.draws_ink() {
            if idle {
                self.pen_active = false;
            }
            tracing::debug!("touch contact ignored");
            return Ok(());
        }
        if !idle {
            return Err(SessionError::GestureInProgress);
        }
        self.pen_active = true;

        if sample.button.is_primary() && !self.config.force_eraser {
            let stroke = self.surface.add_path(&self.config.stroke_style);
            tracing::info!(%stroke, "draw started");
            self.gesture = Gesture::Drawing(DrawGesture {
                stroke,
                sampler: StrokeSampler::new(self.config.min_dist),
                interpolator: TemporalInterpolator::new(self.config.max_time_delta),
            });
            self.observer.draw_start(stroke, &sample);
            self.draw_sample(sample)
        } else {
            tracing::info!(button = sample.button.0, "erase started");
            self.gesture = Gesture::Erasing(EraseGesture::default());
            let affected = self.erase_sample(sample)?.unwrap_or_default();
            self.observer.erase_start(&affected);
            Ok(())
        }
    }

    /// Continue the active gesture. Ignored when idle.
    ///
    /// # Errors
    ///
    /// Returns a surface error from handling the sample.
    pub fn pointer_move(&mut self, sample: PointerSample) -> Result<(), SessionError> {
        match self.gesture {
            Gesture::Idle => Ok(()),
            Gesture::Drawing(_) => self.draw_sample(sample),
            Gesture::Erasing(_) => {
                if let Some(affected) = self.erase_sample(sample)? {
                    self.observer.erase_progress(&affected);
                }
                Ok(())
            }
        }
    }

    /// Handle the final sample and end the active gesture.
    ///
    /// Returns `None` when idle. A touch lift is ignored and leaves the
    /// gesture active.
    ///
    /// # Errors
    ///
    /// Returns a surface error from handling the sample or finalizing.
    pub fn pointer_up(&mut self, sample: PointerSample) -> Result<Option<Completion>, SessionError> {
        if !sample.draws_ink() {
            return Ok(None);
        }
        match self.gesture {
            Gesture::Idle => Ok(None),
            Gesture::Drawing(_) => {
                self.draw_sample(sample)?;
                self.finish_draw(&sample).map(Some)
            }
            Gesture::Erasing(_) => {
                if let Some(affected) = self.erase_sample(sample)? {
                    self.observer.erase_progress(&affected);
                }
                Ok(Some(self.finish_erase()))
            }
        }
    }

    /// The pointer left the surface; ends the gesture like
    /// [`pointer_up`](Self::pointer_up).
    ///
    /// # Errors
    ///
    /// As for [`pointer_up`](Self::pointer_up).
    pub fn pointer_leave(
        &mut self,
        sample: PointerSample,
    ) -> Result<Option<Completion>, SessionError> {
        self.pointer_up(sample)
    }

    /// Abort the active gesture.
    ///
    /// A drawing gesture's stroke is removed without back-fill. Erasing
    /// has already been applied sample by sample, so an erasing gesture
    /// simply ends.
    ///
    /// # Errors
    ///
    /// Returns a surface error if the in-progress stroke has vanished.
    pub fn cancel(&mut self) -> Result<Option<Completion>, SessionError> {
        match std::mem::replace(&mut self.gesture, Gesture::Idle) {
            Gesture::Idle => Ok(None),
            Gesture::Drawing(draw) => {
                self.surface.remove_path(draw.stroke)?;
                tracing::info!(stroke = %draw.stroke, "draw cancelled");
                self.observer.draw_cancel(draw.stroke);
                Ok(Some(Completion::Cancelled))
            }
            erasing @ Gesture::Erasing(_) => {
                self.gesture = erasing;
                Ok(Some(self.finish_erase()))
            }
        }
    }

    /// Feed one raw sample through interpolation and decimation.
    fn draw_sample(&mut self, sample: PointerSample) -> Result<(), SessionError> {
        let Gesture::Drawing(draw) = &mut self.gesture else {
            return Ok(());
        };
        if !sample.draws_ink() {
            return Ok(());
        }
        for s in draw.interpolator.expand(sample) {
            if draw.sampler.accept(s.position()) {
                self.surface
                    .set_path_data(draw.stroke, encode(draw.sampler.points()))?;
                self.observer.draw_progress(draw.stroke, &s);
            }
        }
        Ok(())
    }

    fn finish_draw(&mut self, sample: &PointerSample) -> Result<Completion, SessionError> {
        let Gesture::Drawing(draw) = std::mem::replace(&mut self.gesture, Gesture::Idle) else {
            return Ok(Completion::Cancelled);
        };
        let stroke = draw.stroke;
        if draw.sampler.is_empty() {
            self.surface.remove_path(stroke)?;
            tracing::info!(%stroke, "draw ended with no points; stroke discarded");
            self.observer.draw_cancel(stroke);
            return Ok(Completion::Cancelled);
        }
        let points = draw.sampler.finish();
        self.surface.set_path_data(stroke, encode(points.points()))?;
        tracing::info!(%stroke, points = points.len(), "draw ended");
        self.observer.draw_end(stroke, sample);
        Ok(Completion::Drawn {
            stroke,
            points: points.len(),
        })
    }

    /// Record and erase at one eraser sample.
    ///
    /// Returns the strokes touched, or `None` if the sample was dropped.
    fn erase_sample(
        &mut self,
        sample: PointerSample,
    ) -> Result<Option<Vec<StrokeId>>, SessionError> {
        let Gesture::Erasing(erase) = &mut self.gesture else {
            return Ok(None);
        };
        let position = sample.position();
        if !sample.draws_ink() || !position.is_finite() {
            return Ok(None);
        }
        let far_enough = erase
            .cursor_trail
            .last()
            .is_none_or(|last| last.distance(position) >= self.config.eraser_min_dist);
        if !far_enough {
            return Ok(None);
        }

        erase.cursor_trail.push(position);
        let radius = self.config.eraser_radius;
        self.surface.set_eraser_cursor(Some((position, radius)));

        let Some(eraser) = self.eraser else {
            tracing::debug!(?position, "eraser mode unsupported; sample ignored");
            return Ok(Some(Vec::new()));
        };
        let delta = eraser.erase_at(&mut self.surface, position, radius)?;
        erase.report.absorb(&delta);
        Ok(Some(delta.affected()))
    }

    fn finish_erase(&mut self) -> Completion {
        let report = match std::mem::replace(&mut self.gesture, Gesture::Idle) {
            Gesture::Erasing(erase) => erase.report,
            _ => EraseReport::default(),
        };
        self.surface.set_eraser_cursor(None);
        tracing::info!(
            removed = report.removed.len(),
            created = report.created.len(),
            "erase ended"
        );
        self.observer.erase_end(&report.affected());
        Completion::Erased(report)
    }
}
