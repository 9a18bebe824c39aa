//! CLI output formatting for session events.
//!
//! # Output Format
//!
//! ```text
//! Photo    portrait.jpg
//!     Natural: 4000x3000
//!     Editor:  752x564
//! Crop     1596x1596 (412 KB)
//! Confirmed
//! Export   out/framed-photo.png (500x500)
//! ```
//!
//! Crop adjustments only print their rectangle:
//!
//! ```text
//! Adjust   x 16.3%  y 5.0%  w 67.5%  h 90.0%
//! ```
//!
//! # Architecture
//!
//! [`format_event`] returns `Vec<String>` for testability and [`print_event`]
//! writes it to stdout. With `--json`, [`format_event_json`] emits one JSON
//! object per event instead. Format functions are pure, no I/O.

use crate::imaging::Dimensions;
use crate::orchestrator::SessionEvent;

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn size(d: Dimensions) -> String {
    format!("{}x{}", d.width, d.height)
}

/// Human-readable byte count, rounded to whole units.
fn byte_size(bytes: usize) -> String {
    match bytes {
        b if b < 1024 => format!("{b} B"),
        b if b < 1024 * 1024 => format!("{} KB", (b as f64 / 1024.0).round()),
        b => format!("{:.1} MB", b as f64 / (1024.0 * 1024.0)),
    }
}

/// Format one event as display lines.
pub fn format_event(event: &SessionEvent) -> Vec<String> {
    match event {
        SessionEvent::FileSelected {
            file,
            natural,
            displayed,
        } => vec![
            format!("Photo    {file}"),
            format!("{}Natural: {}", indent(1), size(*natural)),
            format!("{}Editor:  {}", indent(1), size(*displayed)),
        ],
        SessionEvent::CropAdjusted { crop } => vec![format!(
            "Adjust   x {:.1}%  y {:.1}%  w {:.1}%  h {:.1}%",
            crop.x, crop.y, crop.width, crop.height
        )],
        SessionEvent::CropRasterized {
            width,
            height,
            bytes,
        } => vec![format!(
            "Crop     {width}x{height} ({})",
            byte_size(*bytes)
        )],
        SessionEvent::CropConfirmed => vec!["Confirmed".to_string()],
        SessionEvent::Exported {
            path,
            width,
            height,
        } => vec![format!("Export   {path} ({width}x{height})")],
    }
}

/// Format one event as a single JSON line.
pub fn format_event_json(event: &SessionEvent) -> Result<String, serde_json::Error> {
    serde_json::to_string(event)
}

/// Print one event to stdout, as text or JSON.
pub fn print_event(event: &SessionEvent, json: bool) {
    if json {
        match format_event_json(event) {
            Ok(line) => println!("{line}"),
            Err(e) => log::warn!("could not serialize event: {e}"),
        }
    } else {
        for line in format_event(event) {
            println!("{line}");
        }
    }
}
