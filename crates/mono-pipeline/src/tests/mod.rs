//! End-to-end scenarios driven through the interaction controller.

use image::{Rgba, RgbaImage};
use mono_image::{BLACK, WHITE};

use crate::buffers::Slot;
use crate::options::DEFAULT_MAX_COMPOSITE_PIXELS;
use crate::render::{BrushCursor, Frame, RenderSurface};
use crate::view::{BRUSH_MAX, BRUSH_MIN, ZOOM_MAX_PERCENT, ZOOM_MIN_PERCENT};
use crate::{
    Command, InteractionController, Key, KeyOutcome, LoadOutcome, Mode, Modifiers,
    PipelineOptions, PointerEvent, decode_image,
};

#[derive(Default)]
struct RecordingSurface {
    resizes: Vec<(u32, u32)>,
    frames: usize,
    last_status: Option<Vec<String>>,
    last_cursor: Option<BrushCursor>,
    help_shown: usize,
    processing_shown: usize,
}

impl RenderSurface for RecordingSurface {
    fn resize(&mut self, width: u32, height: u32) {
        self.resizes.push((width, height));
    }

    fn present(&mut self, frame: &Frame<'_>) {
        self.frames += 1;
        self.last_status = frame.status.clone();
        self.last_cursor = frame.brush_cursor;
    }

    fn show_help(&mut self, _text: &str) {
        self.help_shown += 1;
    }

    fn show_processing(&mut self, _text: &str) {
        self.processing_shown += 1;
    }
}

/// White image with a dark block covering `[from, to)` on both axes.
fn block_image(width: u32, height: u32, from: u32, to: u32) -> RgbaImage {
    let mut img = RgbaImage::from_pixel(width, height, WHITE);
    for y in from..to.min(height) {
        for x in from..to.min(width) {
            img.put_pixel(x, y, Rgba([30, 30, 30, 255]));
        }
    }
    img
}

fn small_options() -> PipelineOptions {
    PipelineOptions::new()
        .with_output_size(100)
        .with_display_size(60)
}

fn key(controller: &mut InteractionController, c: char) -> KeyOutcome {
    controller.handle_key(Key::Char(c), Modifiers::NONE).unwrap()
}

/// Deterministic xorshift so the command sequence is reproducible.
struct XorShift(u64);

impl XorShift {
    fn next(&mut self) -> u64 {
        self.0 ^= self.0 << 13;
        self.0 ^= self.0 >> 7;
        self.0 ^= self.0 << 17;
        self.0
    }

    fn delta(&mut self) -> i32 {
        (self.next() % 61) as i32 - 30
    }
}

#[test]
fn test_clamp_laws_hold_under_arbitrary_commands() {
    let mut controller =
        InteractionController::new(block_image(20, 60, 5, 15), small_options()).unwrap();
    let mut rng = XorShift(0x9E37_79B9_7F4A_7C15);

    for _ in 0..600 {
        let command = match rng.next() % 8 {
            0 => Command::AdjustThreshold(rng.delta() * 3),
            1 => Command::AdjustZoom(rng.delta() * 20),
            2 => Command::AdjustBrush(rng.delta()),
            3 => Command::Pan(rng.delta()),
            4 => Command::TogglePaint,
            5 => Command::Invert,
            6 => Command::ToggleFit,
            _ => Command::Reset,
        };
        controller.execute(command).unwrap();

        let view = *controller.view();
        let offset_max = controller.state().offset_max();
        assert!((ZOOM_MIN_PERCENT..=ZOOM_MAX_PERCENT).contains(&view.zoom_percent));
        assert!((0.01..=10.0).contains(&view.size_ratio()));
        assert!((BRUSH_MIN..=BRUSH_MAX).contains(&view.brush_size));
        assert!(offset_max >= 0);
        assert!(view.pan_offset.abs() <= offset_max, "{view:?} {offset_max}");
        assert_eq!(
            controller.state().paint().dimensions(),
            controller.state().image().dimensions()
        );
    }
}

#[test]
fn test_paint_toggle_round_trip_keeps_view_buffer() {
    let mut controller =
        InteractionController::new(block_image(40, 30, 10, 25), small_options()).unwrap();
    controller.execute(Command::AdjustZoom(-30)).unwrap();
    let before = controller.display().unwrap().clone();
    let report = controller.last_view();

    key(&mut controller, 'p');
    assert_eq!(controller.mode(), Mode::Painting);
    assert_eq!(controller.display().unwrap().dimensions(), (40, 30));
    key(&mut controller, 'p');

    assert_eq!(controller.mode(), Mode::Viewing);
    assert_eq!(controller.display().unwrap(), &before);
    assert_eq!(controller.last_view(), report);
    assert_eq!(controller.canvas_size(), (60, 60));
}

#[test]
fn test_stroke_keeps_relative_position_across_zoom() {
    let image = block_image(100, 100, 20, 80);
    let mut controller = InteractionController::new(image, PipelineOptions::default()).unwrap();
    let mut surface = RecordingSurface::default();

    key(&mut controller, 'p');
    assert!((controller.paint_scale() - 6.0).abs() < 1e-9);
    assert_eq!(controller.canvas_size(), (600, 600));

    // Canvas (300, 300) is image (50, 50)
    controller.handle_pointer(PointerEvent::Down { x: 300.0, y: 300.0 });
    controller.handle_pointer(PointerEvent::Up);
    controller.tick(&mut surface);
    assert_eq!(*controller.display().unwrap().get_pixel(50, 50), WHITE);
    assert_eq!(*controller.display().unwrap().get_pixel(30, 30), BLACK);

    key(&mut controller, 'p');
    // Crop is the block, [200, 800) in the composite, refit to the full output
    let display = controller.display().unwrap();
    assert_eq!(*display.get_pixel(500, 500), WHITE);
    assert_eq!(*display.get_pixel(300, 300), BLACK);

    controller.execute(Command::AdjustZoom(100)).unwrap();
    let display = controller.display().unwrap();
    assert_eq!(*display.get_pixel(500, 500), WHITE);
    assert_eq!(*display.get_pixel(100, 100), BLACK);

    controller.execute(Command::AdjustZoom(-150)).unwrap();
    let display = controller.display().unwrap();
    assert_eq!(*display.get_pixel(500, 500), WHITE);
    assert_eq!(*display.get_pixel(260, 260), BLACK);
    assert_eq!(*display.get_pixel(100, 100), WHITE);
}

#[test]
fn test_all_white_image_renders_background() {
    let image = RgbaImage::from_pixel(100, 50, WHITE);
    let controller = InteractionController::new(image, PipelineOptions::default()).unwrap();

    let report = controller.last_view().unwrap();
    assert_eq!((report.crop.width, report.crop.height), (1000, 500));
    let display = controller.display().unwrap();
    assert_eq!(display.dimensions(), (1000, 1000));
    assert!(display.pixels().all(|p| *p == WHITE && p[3] == 255));
}

#[test]
fn test_empty_image_rejected() {
    let result = InteractionController::new(RgbaImage::new(0, 4), small_options());
    assert!(result.is_err());
}

#[test]
fn test_newest_drop_wins() {
    let mut controller =
        InteractionController::new(block_image(20, 20, 5, 15), small_options()).unwrap();
    let first = controller.drop_file("image/png").unwrap();
    let second = controller.drop_file("image/jpeg").unwrap();
    assert!(second > first);
    assert_eq!(controller.mode(), Mode::Processing);

    let stale = controller.complete_load(first, Ok(block_image(8, 8, 0, 4)));
    assert!(matches!(stale, LoadOutcome::Stale));
    assert_eq!(controller.mode(), Mode::Processing);

    let loaded = controller.complete_load(second, Ok(block_image(30, 90, 0, 10)));
    assert!(matches!(loaded, LoadOutcome::Loaded { width: 30, height: 90 }));
    assert_eq!(controller.mode(), Mode::Viewing);
    assert_eq!(controller.state().image().dimensions(), (30, 90));
    assert_eq!(controller.state().paint().dimensions(), (30, 90));
    assert_eq!(controller.view().pan_offset, 0);
    assert_eq!(controller.state().offset_max(), 100);

    // A late duplicate of the applied ticket is stale too
    let again = controller.complete_load(second, Ok(block_image(8, 8, 0, 4)));
    assert!(matches!(again, LoadOutcome::Stale));
}

#[test]
fn test_failed_decode_keeps_previous_image() {
    let mut controller =
        InteractionController::new(block_image(20, 20, 5, 15), small_options()).unwrap();
    let before = controller.display().unwrap().clone();
    let ticket = controller.drop_file("image/png").unwrap();

    let outcome = controller.complete_load(ticket, decode_image(b"definitely not a png"));

    assert!(matches!(outcome, LoadOutcome::Failed(_)));
    assert_eq!(controller.mode(), Mode::Viewing);
    assert_eq!(controller.state().image().dimensions(), (20, 20));
    assert_eq!(controller.display().unwrap(), &before);
}

#[test]
fn test_non_image_drop_ignored() {
    let mut controller =
        InteractionController::new(block_image(20, 20, 5, 15), small_options()).unwrap();
    assert!(controller.drop_file("text/plain").is_none());
    assert_eq!(controller.mode(), Mode::Viewing);
    assert!(controller.snapshot().pending_load.is_none());
}

#[test]
fn test_drop_while_painting_leaves_paint_mode() {
    let mut controller =
        InteractionController::new(block_image(20, 40, 5, 15), small_options()).unwrap();
    key(&mut controller, 'p');
    assert_eq!(controller.canvas_size(), (30, 60));

    let ticket = controller.drop_file("image/png").unwrap();
    assert_eq!(controller.canvas_size(), (60, 60));

    let mut surface = RecordingSurface::default();
    assert!(!controller.tick(&mut surface));
    assert_eq!(surface.processing_shown, 1);

    controller.complete_load(ticket, Ok(block_image(10, 10, 2, 8)));
    assert_eq!(controller.mode(), Mode::Viewing);
}

#[test]
fn test_processing_accepts_only_help() {
    let mut controller =
        InteractionController::new(block_image(20, 20, 5, 15), small_options()).unwrap();
    controller.drop_file("image/png").unwrap();

    assert!(matches!(
        controller.handle_key(Key::Up, Modifiers::NONE).unwrap(),
        KeyOutcome::Ignored
    ));
    assert!(matches!(key(&mut controller, 'p'), KeyOutcome::Ignored));
    assert_eq!(controller.view().threshold, 128);

    key(&mut controller, '?');
    assert_eq!(controller.mode(), Mode::Help);
    key(&mut controller, '?');
    assert_eq!(controller.mode(), Mode::Processing);
}

#[test]
fn test_pointer_moves_coalesce_until_tick() {
    let mut controller =
        InteractionController::new(block_image(60, 60, 0, 60), small_options()).unwrap();
    let mut surface = RecordingSurface::default();
    key(&mut controller, 'p');
    controller.tick(&mut surface);
    let frames = surface.frames;

    controller.handle_pointer(PointerEvent::Down { x: 10.0, y: 30.0 });
    for x in 11..50 {
        controller.handle_pointer(PointerEvent::Move { x: x as f32, y: 30.0 });
    }
    controller.handle_pointer(PointerEvent::Up);

    // Strokes are on the layer but not yet composited
    assert!(!controller.state().paint().is_blank());
    assert!(controller.has_pending_composite());
    assert_eq!(*controller.display().unwrap().get_pixel(30, 30), BLACK);

    assert!(controller.tick(&mut surface));
    assert!(!controller.has_pending_composite());
    assert_eq!(surface.frames, frames + 1);
    assert_eq!(*controller.display().unwrap().get_pixel(30, 30), WHITE);
}

#[test]
fn test_pointer_outside_canvas_ignored() {
    let mut controller =
        InteractionController::new(block_image(60, 60, 0, 60), small_options()).unwrap();
    key(&mut controller, 'p');

    controller.handle_pointer(PointerEvent::Down { x: -5.0, y: 10.0 });
    controller.handle_pointer(PointerEvent::Move { x: 80.0, y: 10.0 });
    assert!(controller.state().paint().is_blank());
    assert!(!controller.has_pending_composite());
}

#[test]
fn test_erase_removes_paint() {
    let mut controller =
        InteractionController::new(block_image(60, 60, 0, 60), small_options()).unwrap();
    let mut surface = RecordingSurface::default();
    key(&mut controller, 'p');

    controller.handle_pointer(PointerEvent::Down { x: 30.0, y: 30.0 });
    controller.handle_pointer(PointerEvent::Up);
    key(&mut controller, 'x');
    assert!(controller.erase_mode());
    controller.handle_pointer(PointerEvent::Down { x: 30.0, y: 30.0 });
    controller.handle_pointer(PointerEvent::Up);
    controller.tick(&mut surface);

    assert!(controller.state().paint().is_blank());
    assert_eq!(*controller.display().unwrap().get_pixel(30, 30), BLACK);
}

#[test]
fn test_clear_paint_only_in_paint_mode() {
    let mut controller =
        InteractionController::new(block_image(60, 60, 0, 60), small_options()).unwrap();
    key(&mut controller, 'p');
    controller.handle_pointer(PointerEvent::Down { x: 30.0, y: 30.0 });
    controller.handle_pointer(PointerEvent::Up);
    key(&mut controller, 'p');

    let outcome = controller.handle_key(Key::Backspace, Modifiers::NONE).unwrap();
    assert!(matches!(outcome, KeyOutcome::Ignored));
    assert!(!controller.state().paint().is_blank());

    key(&mut controller, 'p');
    controller.handle_key(Key::Delete, Modifiers::NONE).unwrap();
    assert!(controller.state().paint().is_blank());
}

#[test]
fn test_help_returns_to_painting() {
    let mut controller =
        InteractionController::new(block_image(20, 20, 5, 15), small_options()).unwrap();
    let mut surface = RecordingSurface::default();
    key(&mut controller, 'p');
    key(&mut controller, '?');
    assert_eq!(controller.mode(), Mode::Help);

    assert!(!controller.tick(&mut surface));
    assert_eq!(surface.help_shown, 1);
    assert_eq!(surface.frames, 0);
    assert!(matches!(
        controller.handle_key(Key::Up, Modifiers::NONE).unwrap(),
        KeyOutcome::Ignored
    ));

    key(&mut controller, '?');
    assert_eq!(controller.mode(), Mode::Painting);
    assert!(controller.tick(&mut surface));
}

#[test]
fn test_paint_toggle_closes_help() {
    let mut controller =
        InteractionController::new(block_image(20, 20, 5, 15), small_options()).unwrap();
    key(&mut controller, '?');
    key(&mut controller, 'p');
    assert_eq!(controller.mode(), Mode::Painting);
}

#[test]
fn test_export_only_in_view_mode() {
    let mut controller =
        InteractionController::new(block_image(20, 20, 5, 15), small_options()).unwrap();

    key(&mut controller, 'p');
    let outcome = controller.handle_key(Key::Char('s'), Modifiers::CTRL).unwrap();
    assert!(matches!(outcome, KeyOutcome::Ignored));

    key(&mut controller, 'p');
    let outcome = controller.handle_key(Key::Char('s'), Modifiers::CTRL).unwrap();
    let KeyOutcome::Exported(export) = outcome else {
        panic!("expected an export, got {outcome:?}");
    };
    assert!(export.filename.starts_with("monochrome_image."));
    assert!(export.filename.ends_with(".png"));
    let decoded = image::load_from_memory(&export.png).unwrap().to_rgba8();
    assert_eq!(&decoded, controller.display().unwrap());
}

#[test]
fn test_tick_presents_only_when_dirty() {
    let mut controller =
        InteractionController::new(block_image(20, 20, 5, 15), small_options()).unwrap();
    let mut surface = RecordingSurface::default();

    assert!(controller.tick(&mut surface));
    assert_eq!(surface.resizes, vec![(60, 60)]);
    assert!(!controller.tick(&mut surface));

    controller.handle_key(Key::Up, Modifiers::SHIFT).unwrap();
    assert!(controller.tick(&mut surface));
    assert_eq!(
        surface.last_status.as_deref().map(|s| s[0].as_str()),
        Some("threshold: 129")
    );

    key(&mut controller, 'h');
    assert!(controller.tick(&mut surface));
    assert!(surface.last_status.is_none());
    assert_eq!(surface.frames, 3);
}

#[test]
fn test_paint_mode_redraws_brush_cursor() {
    let mut controller =
        InteractionController::new(block_image(20, 20, 5, 15), small_options()).unwrap();
    let mut surface = RecordingSurface::default();
    key(&mut controller, 'p');
    controller.handle_pointer(PointerEvent::Move { x: 12.0, y: 20.0 });

    assert!(controller.tick(&mut surface));
    assert!(controller.tick(&mut surface));
    assert_eq!(surface.resizes, vec![(60, 60)]);

    let cursor = surface.last_cursor.unwrap();
    assert_eq!((cursor.x, cursor.y), (12.0, 20.0));
    // Brush 10 image pixels at paint scale 3
    assert!((cursor.diameter - 30.0).abs() < 1e-4);
}

#[test]
fn test_invert_flips_background() {
    let mut controller =
        InteractionController::new(RgbaImage::from_pixel(30, 30, WHITE), small_options()).unwrap();
    key(&mut controller, 'i');
    assert_eq!(controller.view().background(), BLACK);
    assert!(controller.display().unwrap().pixels().all(|p| *p == BLACK));

    key(&mut controller, 'r');
    assert!(controller.view().invert);
}

#[test]
fn test_snapshot_serializes() {
    let controller =
        InteractionController::new(block_image(20, 20, 5, 15), small_options()).unwrap();
    let snapshot = controller.snapshot();
    assert_eq!(snapshot.threshold_recomputations, 1);

    let json = serde_json::to_string(&snapshot).unwrap();
    assert!(json.contains(r#""mode":"viewing""#), "{json}");

    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["image_width"], 20);
    assert_eq!(value["view"]["threshold"], 128);
    assert_eq!(value["view"]["zoom_percent"], 100);
    assert!(value["pending_load"].is_null());
}

#[test]
fn test_thin_image_stays_within_composite_budget() {
    let controller =
        InteractionController::new(block_image(4, 400, 0, 2), PipelineOptions::default()).unwrap();
    let (w, h) = controller
        .state()
        .buffers()
        .dimensions(Slot::Composite)
        .unwrap();
    assert!(u64::from(w) * u64::from(h) <= DEFAULT_MAX_COMPOSITE_PIXELS, "{w}x{h}");
    assert_eq!(controller.display().unwrap().dimensions(), (1000, 1000));
}
