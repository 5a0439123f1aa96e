//! Interaction state machine.
//!
//! [`InteractionController`] is the single owner of the pipeline state. Every
//! input (keys, pointer, file drops, decode completions, render ticks) goes
//! through one of its methods on the event-loop thread.

use chrono::Local;
use image::RgbaImage;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::buffers::Slot;
use crate::compositor::{LayerCompositor, ViewComposite};
use crate::export::{self, Export};
use crate::input::{Command, Key, Modifiers, PointerEvent, bind, is_image_mime};
use crate::mode::{Mode, ModeState};
use crate::options::PipelineOptions;
use crate::render::{BrushCursor, Frame, RenderSurface};
use crate::scheduler::FrameScheduler;
use crate::state::PipelineState;
use crate::text::{HELP_TEXT, PROCESSING_TEXT, status_lines};
use crate::view::{ViewState, paint_scale};
use crate::{PipelineError, Result};

/// Which composite routine a deferred recomposite runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CompositeKind {
    Paint,
    View,
}

/// Identifies one accepted file drop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct LoadTicket(u64);

impl LoadTicket {
    pub fn id(&self) -> u64 {
        self.0
    }
}

#[derive(Debug)]
pub enum LoadOutcome {
    /// The decoded image replaced the previous one.
    Loaded { width: u32, height: u32 },
    /// Decoding failed; the previous image is still shown.
    Failed(PipelineError),
    /// A newer drop superseded this one; the result was discarded.
    Stale,
}

#[derive(Debug)]
pub enum KeyOutcome {
    /// Unbound, or not allowed in the current mode.
    Ignored,
    Applied,
    Exported(Export),
}

/// Serializable summary of the controller, for status reporting.
#[derive(Debug, Clone, Serialize)]
pub struct StatusSnapshot {
    pub mode: Mode,
    pub view: ViewState,
    pub image_width: u32,
    pub image_height: u32,
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub offset_max: i32,
    pub erase_mode: bool,
    pub show_ui: bool,
    pub threshold_recomputations: u64,
    pub pending_load: Option<LoadTicket>,
}

#[derive(Debug, Default)]
struct PointerState {
    pressed: bool,
    /// Last in-canvas point of the current stroke, in image space.
    previous: Option<(f32, f32)>,
    /// Last in-canvas pointer position, in canvas space.
    position: Option<(f32, f32)>,
}

pub struct InteractionController {
    options: PipelineOptions,
    compositor: LayerCompositor,
    state: PipelineState,
    mode: ModeState,
    scheduler: FrameScheduler<CompositeKind>,
    pointer: PointerState,
    erase_mode: bool,
    show_ui: bool,
    canvas: (u32, u32),
    presented_canvas: Option<(u32, u32)>,
    pending_load: Option<LoadTicket>,
    next_ticket: u64,
    last_view: Option<ViewComposite>,
}

impl InteractionController {
    /// Start in view mode with `image` composited.
    pub fn new(image: RgbaImage, options: PipelineOptions) -> Result<Self> {
        ensure_not_empty(&image)?;
        let compositor = LayerCompositor::from_options(&options);
        let state = PipelineState::new(image, &options);
        let canvas = (options.display_size, options.display_size);

        let mut controller = Self {
            options,
            compositor,
            state,
            mode: ModeState::new(),
            scheduler: FrameScheduler::new(),
            pointer: PointerState::default(),
            erase_mode: false,
            show_ui: true,
            canvas,
            presented_canvas: None,
            pending_load: None,
            next_ticket: 0,
            last_view: None,
        };
        controller.compose(CompositeKind::View);

        let (width, height) = controller.state.image.dimensions();
        info!(width, height, "Interaction controller started");
        Ok(controller)
    }

    /// Translate a key press and run it.
    pub fn handle_key(&mut self, key: Key, mods: Modifiers) -> Result<KeyOutcome> {
        let painting = self.mode.underlying() == Mode::Painting;
        match bind(key, mods, painting) {
            Some(command) => self.execute(command),
            None => {
                debug!(?key, "Unbound key ignored");
                Ok(KeyOutcome::Ignored)
            }
        }
    }

    pub fn execute(&mut self, command: Command) -> Result<KeyOutcome> {
        let current = self.mode.current();
        match (current, command) {
            (_, Command::ToggleHelp) => {
                let mode = self.mode.toggle_help();
                if mode != Mode::Help {
                    self.state.dirty = true;
                }
                info!(?mode, "Help toggled");
            }
            (Mode::Help, Command::TogglePaint) if self.mode.underlying() != Mode::Processing => {
                self.mode.close_help();
                self.toggle_paint();
            }
            (Mode::Help | Mode::Processing, _) => {
                debug!(?command, ?current, "Command ignored in current mode");
                return Ok(KeyOutcome::Ignored);
            }
            (_, Command::TogglePaint) => self.toggle_paint(),
            (_, Command::AdjustThreshold(delta)) => {
                self.state.view.adjust_threshold(delta);
                self.recompose_now();
            }
            (_, Command::Reset) => {
                self.state.view.reset(self.options.threshold);
                self.recompose_now();
            }
            (_, Command::Invert) => {
                self.state.view.toggle_invert();
                self.recompose_now();
            }
            (_, Command::ToggleFit) => {
                self.state.view.fit_to_width = !self.state.view.fit_to_width;
                self.state.refresh_offset_max(self.options.output_size);
                self.recompose_now();
            }
            (_, Command::ToggleUi) => {
                self.show_ui = !self.show_ui;
                self.state.dirty = true;
            }
            (Mode::Viewing, Command::AdjustZoom(delta)) => {
                self.state.view.adjust_zoom(delta);
                self.compose(CompositeKind::View);
            }
            (Mode::Viewing, Command::Pan(steps)) => {
                let delta = steps.saturating_mul(self.options.pan_step);
                self.state.view.adjust_pan(delta, self.state.offset_max);
                self.compose(CompositeKind::View);
            }
            (Mode::Viewing, Command::Export) => {
                return self.export().map(KeyOutcome::Exported);
            }
            (Mode::Painting, Command::AdjustBrush(delta)) => {
                self.state.view.adjust_brush(delta);
                self.state.dirty = true;
            }
            (Mode::Painting, Command::ToggleErase) => {
                self.erase_mode = !self.erase_mode;
                self.state.dirty = true;
                debug!(erase = self.erase_mode, "Erase mode toggled");
            }
            (Mode::Painting, Command::ClearPaint) => {
                self.state.paint.clear();
                self.compose(CompositeKind::Paint);
            }
            (_, command) => {
                debug!(?command, ?current, "Command ignored in current mode");
                return Ok(KeyOutcome::Ignored);
            }
        }
        Ok(KeyOutcome::Applied)
    }

    /// Apply pointer input in canvas coordinates. Only paint mode reacts.
    ///
    /// Strokes land on the paint layer immediately; the recomposite waits for
    /// the next tick.
    pub fn handle_pointer(&mut self, event: PointerEvent) {
        if self.mode.current() != Mode::Painting {
            return;
        }
        match event {
            PointerEvent::Down { x, y } => {
                if !self.in_canvas(x, y) {
                    return;
                }
                self.pointer.pressed = true;
                self.pointer.position = Some((x, y));
                let point = self.to_image_space(x, y);
                self.stroke(point, point);
                self.pointer.previous = Some(point);
            }
            PointerEvent::Move { x, y } => {
                if !self.in_canvas(x, y) {
                    self.pointer.position = None;
                    self.pointer.previous = None;
                    return;
                }
                self.pointer.position = Some((x, y));
                if !self.pointer.pressed {
                    return;
                }
                let point = self.to_image_space(x, y);
                let from = self.pointer.previous.unwrap_or(point);
                self.stroke(from, point);
                self.pointer.previous = Some(point);
            }
            PointerEvent::Up => {
                self.pointer.pressed = false;
                self.pointer.previous = None;
            }
        }
    }

    /// Accept a file drop if its MIME type is an image.
    ///
    /// Returns the ticket the decode completion must present to
    /// [`InteractionController::complete_load`]. A newer drop makes older
    /// tickets stale.
    pub fn drop_file(&mut self, mime: &str) -> Option<LoadTicket> {
        if !is_image_mime(mime) {
            debug!(mime, "Ignoring non-image drop");
            return None;
        }
        if self.mode.underlying() == Mode::Painting {
            self.leave_paint();
        }
        self.scheduler.cancel();
        self.pointer = PointerState::default();

        self.next_ticket += 1;
        let ticket = LoadTicket(self.next_ticket);
        if let Some(previous) = self.pending_load.replace(ticket) {
            debug!(previous = previous.id(), "Pending load superseded");
        }
        self.mode.set(Mode::Processing);
        info!(mime, ticket = ticket.id(), "Image drop accepted");
        Some(ticket)
    }

    /// Deliver the decode result for `ticket`.
    pub fn complete_load(&mut self, ticket: LoadTicket, result: Result<RgbaImage>) -> LoadOutcome {
        if self.pending_load != Some(ticket) {
            debug!(ticket = ticket.id(), "Discarding stale load");
            return LoadOutcome::Stale;
        }
        self.pending_load = None;
        self.mode.set(Mode::Viewing);

        let outcome = match result.and_then(|image| ensure_not_empty(&image).map(|()| image)) {
            Ok(image) => {
                let (width, height) = image.dimensions();
                self.state.replace_image(image, self.options.output_size);
                LoadOutcome::Loaded { width, height }
            }
            Err(e) => {
                warn!(ticket = ticket.id(), "Image load failed, keeping previous image: {e}");
                LoadOutcome::Failed(e)
            }
        };
        self.canvas = (self.options.display_size, self.options.display_size);
        self.compose(CompositeKind::View);
        outcome
    }

    /// Render tick: run the deferred composite and present if anything changed.
    ///
    /// Returns `true` when a frame was presented.
    pub fn tick<S: RenderSurface + ?Sized>(&mut self, surface: &mut S) -> bool {
        match self.mode.current() {
            Mode::Help => {
                surface.show_help(HELP_TEXT);
                return false;
            }
            Mode::Processing => {
                surface.show_processing(PROCESSING_TEXT);
                return false;
            }
            Mode::Viewing | Mode::Painting => {}
        }

        if let Some(kind) = self.scheduler.take_due() {
            self.compose(kind);
        }
        if self.presented_canvas != Some(self.canvas) {
            surface.resize(self.canvas.0, self.canvas.1);
            self.presented_canvas = Some(self.canvas);
        }
        if !self.state.dirty {
            return false;
        }
        let Some(buffer) = self.state.buffers.get(Slot::Display) else {
            return false;
        };

        let painting = self.mode.current() == Mode::Painting;
        let status = self
            .show_ui
            .then(|| status_lines(&self.state.view, painting, self.erase_mode));
        let brush_cursor = if painting {
            self.pointer.position.map(|(x, y)| BrushCursor {
                x,
                y,
                diameter: self.state.view.brush_size as f32 * self.paint_scale() as f32,
            })
        } else {
            None
        };

        surface.present(&Frame {
            buffer,
            canvas_width: self.canvas.0,
            canvas_height: self.canvas.1,
            status,
            brush_cursor,
        });
        // The brush cursor follows the pointer, so paint mode redraws every tick
        self.state.dirty = painting;
        true
    }

    pub fn snapshot(&self) -> StatusSnapshot {
        let (image_width, image_height) = self.state.image.dimensions();
        StatusSnapshot {
            mode: self.mode.current(),
            view: self.state.view,
            image_width,
            image_height,
            canvas_width: self.canvas.0,
            canvas_height: self.canvas.1,
            offset_max: self.state.offset_max,
            erase_mode: self.erase_mode,
            show_ui: self.show_ui,
            threshold_recomputations: self.state.cache.recomputations(),
            pending_load: self.pending_load,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode.current()
    }

    pub fn view(&self) -> &ViewState {
        &self.state.view
    }

    pub fn state(&self) -> &PipelineState {
        &self.state
    }

    pub fn display(&self) -> Option<&RgbaImage> {
        self.state.display()
    }

    pub fn canvas_size(&self) -> (u32, u32) {
        self.canvas
    }

    /// Geometry of the most recent view composite.
    pub fn last_view(&self) -> Option<ViewComposite> {
        self.last_view
    }

    /// Scale from image pixels to paint-mode canvas pixels.
    pub fn paint_scale(&self) -> f64 {
        let (width, height) = self.state.image.dimensions();
        paint_scale(self.options.display_size, width, height)
    }

    pub fn erase_mode(&self) -> bool {
        self.erase_mode
    }

    pub fn show_ui(&self) -> bool {
        self.show_ui
    }

    pub fn is_dirty(&self) -> bool {
        self.state.dirty
    }

    pub fn has_pending_composite(&self) -> bool {
        self.scheduler.is_pending()
    }

    fn toggle_paint(&mut self) {
        if self.mode.underlying() == Mode::Painting {
            self.leave_paint();
        } else {
            self.enter_paint();
        }
    }

    fn enter_paint(&mut self) {
        let (width, height) = self.state.image.dimensions();
        let scale = self.paint_scale();
        self.canvas = (scaled(width, scale), scaled(height, scale));
        self.state.buffers.release(Slot::Composite);
        self.scheduler.cancel();
        self.pointer = PointerState::default();
        self.mode.set(Mode::Painting);
        self.compose(CompositeKind::Paint);
        info!(
            canvas_width = self.canvas.0,
            canvas_height = self.canvas.1,
            scale,
            "Entered paint mode"
        );
    }

    fn leave_paint(&mut self) {
        self.canvas = (self.options.display_size, self.options.display_size);
        self.scheduler.cancel();
        self.pointer = PointerState::default();
        self.mode.set(Mode::Viewing);
        self.compose(CompositeKind::View);
        info!("Left paint mode");
    }

    fn current_kind(&self) -> CompositeKind {
        if self.mode.underlying() == Mode::Painting {
            CompositeKind::Paint
        } else {
            CompositeKind::View
        }
    }

    /// Composite for the current mode right away, dropping any deferred job.
    fn recompose_now(&mut self) {
        self.scheduler.cancel();
        self.compose(self.current_kind());
    }

    fn compose(&mut self, kind: CompositeKind) {
        match kind {
            CompositeKind::Paint => self.compositor.compose_paint(&mut self.state),
            CompositeKind::View => {
                self.last_view = Some(self.compositor.compose_view(&mut self.state));
            }
        }
    }

    fn export(&mut self) -> Result<Export> {
        if let Some(kind) = self.scheduler.take_due() {
            self.compose(kind);
        }
        if self.state.buffers.get(Slot::Display).is_none() {
            self.compose(CompositeKind::View);
        }
        match self.state.buffers.get(Slot::Display) {
            Some(buffer) => export::export(buffer, Local::now().naive_local()),
            None => Err(PipelineError::EmptyImage {
                width: 0,
                height: 0,
            }),
        }
    }

    fn stroke(&mut self, from: (f32, f32), to: (f32, f32)) {
        let brush = self.state.view.brush_size;
        self.state.paint.stroke_line(from, to, brush, self.erase_mode);
        self.scheduler.request(CompositeKind::Paint);
    }

    fn in_canvas(&self, x: f32, y: f32) -> bool {
        x >= 0.0 && y >= 0.0 && x < self.canvas.0 as f32 && y < self.canvas.1 as f32
    }

    fn to_image_space(&self, x: f32, y: f32) -> (f32, f32) {
        let scale = self.paint_scale() as f32;
        (x / scale, y / scale)
    }
}

fn scaled(len: u32, scale: f64) -> u32 {
    (f64::from(len) * scale).round().max(1.0) as u32
}

fn ensure_not_empty(image: &RgbaImage) -> Result<()> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(PipelineError::EmptyImage { width, height });
    }
    Ok(())
}
