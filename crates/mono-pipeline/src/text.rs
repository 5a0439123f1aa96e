//! On-screen text supplied to the render surface.

use crate::view::ViewState;

pub const HELP_TEXT: &str = "\
Help

? - show/hide this help screen
h - show/hide UI
r - reset threshold and zoom
i - invert
p - paint mode
x - toggle erase mode (paint mode)
f - toggle fit to width
backspace/delete - clear paint (paint mode)
up/down - increase/decrease threshold
right/left - increase/decrease zoom
right/left - increase/decrease brush size (paint mode)
> / < - pan down/up
ctrl-s / cmd-s - save image
hold shift for fine steps";

pub const PROCESSING_TEXT: &str = "Processing new image, please wait...";

fn on_off(flag: bool) -> &'static str {
    if flag { "ON" } else { "OFF" }
}

/// Status overlay lines for the current view.
pub fn status_lines(view: &ViewState, painting: bool, erase_mode: bool) -> Vec<String> {
    let mut lines = vec![format!("threshold: {}", view.threshold)];
    if !painting {
        lines.push(format!("zoom: {}%", view.zoom_percent));
        lines.push(format!("offset: {}", view.pan_offset));
    }
    lines.push(format!("paint mode: {}", on_off(painting)));
    if painting {
        lines.push(format!("brush size: {}", view.brush_size));
        lines.push(format!("erase mode: {}", on_off(erase_mode)));
    }
    lines
}
