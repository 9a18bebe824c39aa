//! Composition view: the decorative frame with the circular crop beneath it.
//!
//! ```text
//! ┌───────────────────────────┐  view (default 500x500)
//! │   frame field             │
//! │      ┌─────────────┐      │
//! │      │   ╭─────╮   │      │  overlay box: 60% of width and height,
//! │      │  │ crop  │  │      │  centered; the crop is scaled to cover it
//! │      │   ╰─────╯   │      │  and clipped to the inscribed circle
//! │      └─────────────┘      │
//! └───────────────────────────┘
//! ```
//!
//! Layers, bottom to top: transparent canvas, circular crop, frame. The
//! frame's cutout sits [`CUTOUT_OVERLAP`] pixels inside the crop circle, so
//! the crop's anti-aliased rim is always under opaque frame and an opaque
//! crop yields a fully opaque view.
//!
//! Shapes are drawn with `tiny_skia` paths. Rendering is pure: same inputs,
//! same pixels.

use crate::imaging::{Dimensions, OverlayBox, overlay_box};
use image::imageops::FilterType;
use image::{DynamicImage, RgbaImage};
use rayon::prelude::*;
use tiny_skia::{
    BlendMode, Color, ColorU8, FillRule, Mask, Paint, PathBuilder, Pixmap, PixmapPaint, Rect,
    Stroke, Transform,
};

/// Share of the view's width and height taken by the crop.
pub const CROP_SCALE: f64 = 0.6;

/// How far, in pixels, the frame's cutout radius stays inside the crop circle.
pub const CUTOUT_OVERLAP: f32 = 2.0;

/// Field color of the stock frame.
const FRAME_FIELD: [u8; 3] = [0x1f, 0x4e, 0x3d];
/// Ring and border accent of the stock frame.
const FRAME_ACCENT: [u8; 3] = [0xd4, 0xaf, 0x37];
/// Ring thickness, relative to the crop radius.
const RING_WIDTH: f32 = 0.06;
/// Inset of the thin border line, relative to the shorter view side.
const BORDER_INSET: f32 = 0.04;
const BORDER_WIDTH: f32 = 0.008;

/// Fixed-size layout of frame and crop.
///
/// The stock frame is drawn once, at the view's own size.
#[derive(Debug, Clone)]
pub struct CompositionView {
    size: Dimensions,
    /// `None` only for a zero-sized view.
    frame: Option<Pixmap>,
}

impl CompositionView {
    pub fn new(size: Dimensions) -> Self {
        let frame = stock_frame(size, overlay_box(size, CROP_SCALE));
        Self { size, frame }
    }

    /// Rendered size; also the size of every export.
    pub fn size(&self) -> Dimensions {
        self.size
    }

    pub fn overlay_box(&self) -> OverlayBox {
        overlay_box(self.size, CROP_SCALE)
    }

    /// The built-in decorative frame as straight-alpha RGBA.
    pub fn frame_image(&self) -> RgbaImage {
        match &self.frame {
            Some(frame) => to_rgba(frame),
            None => RgbaImage::new(self.size.width, self.size.height),
        }
    }

    /// Render the view. Without a crop only the frame is drawn.
    pub fn render(&self, crop: Option<&DynamicImage>) -> RgbaImage {
        let Dimensions { width, height } = self.size;
        let Some(frame) = &self.frame else {
            return RgbaImage::new(width, height);
        };
        let canvas = crop
            .and_then(|crop| self.crop_layer(crop))
            .or_else(|| Pixmap::new(width, height));
        let Some(mut canvas) = canvas else {
            return RgbaImage::new(width, height);
        };
        canvas.draw_pixmap(
            0,
            0,
            frame.as_ref(),
            &PixmapPaint::default(),
            Transform::identity(),
            None,
        );
        to_rgba(&canvas)
    }

    /// View-sized layer holding only the crop, cover-scaled into the overlay
    /// box and masked to its inscribed circle.
    fn crop_layer(&self, crop: &DynamicImage) -> Option<Pixmap> {
        let b = self.overlay_box();
        if b.width == 0 || b.height == 0 {
            return None;
        }
        let circle = PathBuilder::from_oval(Rect::from_xywh(
            b.x as f32,
            b.y as f32,
            b.width as f32,
            b.height as f32,
        )?)?;
        let mut mask = Mask::new(self.size.width, self.size.height)?;
        mask.fill_path(&circle, FillRule::Winding, true, Transform::identity());

        let disc = to_pixmap(
            &crop
                .resize_to_fill(b.width, b.height, FilterType::Lanczos3)
                .to_rgba8(),
        )?;
        let mut layer = Pixmap::new(self.size.width, self.size.height)?;
        layer.draw_pixmap(
            b.x as i32,
            b.y as i32,
            disc.as_ref(),
            &PixmapPaint::default(),
            Transform::identity(),
            Some(&mask),
        );
        Some(layer)
    }
}

/// Solid field, accent ring around the crop circle, transparent cutout and a
/// thin inset border.
fn stock_frame(size: Dimensions, crop: OverlayBox) -> Option<Pixmap> {
    let mut frame = Pixmap::new(size.width, size.height)?;
    let [r, g, b] = FRAME_FIELD;
    frame.fill(Color::from_rgba8(r, g, b, 255));

    let mut accent = Paint::default();
    let [r, g, b] = FRAME_ACCENT;
    accent.set_color_rgba8(r, g, b, 255);
    accent.anti_alias = true;

    let (width, height) = (size.width as f32, size.height as f32);
    let short = width.min(height);
    let inset = short * BORDER_INSET;
    if let Some(border) = Rect::from_ltrb(inset, inset, width - inset, height - inset) {
        let stroke = Stroke {
            width: (short * BORDER_WIDTH).max(1.0),
            ..Stroke::default()
        };
        frame.stroke_path(
            &PathBuilder::from_rect(border),
            &accent,
            &stroke,
            Transform::identity(),
            None,
        );
    }

    let cx = crop.x as f32 + crop.width as f32 / 2.0;
    let cy = crop.y as f32 + crop.height as f32 / 2.0;
    let (rx, ry) = (crop.width as f32 / 2.0, crop.height as f32 / 2.0);

    if let Some(ring) = oval(cx, cy, rx * (1.0 + RING_WIDTH), ry * (1.0 + RING_WIDTH)) {
        frame.fill_path(&ring, &accent, FillRule::Winding, Transform::identity(), None);
    }

    let mut clear = Paint::default();
    clear.blend_mode = BlendMode::Clear;
    clear.anti_alias = true;
    if let Some(cutout) = oval(cx, cy, rx - CUTOUT_OVERLAP, ry - CUTOUT_OVERLAP) {
        frame.fill_path(&cutout, &clear, FillRule::Winding, Transform::identity(), None);
    }
    Some(frame)
}

/// Ellipse path around a center; `None` when a radius is not positive.
fn oval(cx: f32, cy: f32, rx: f32, ry: f32) -> Option<tiny_skia::Path> {
    if rx <= 0.0 || ry <= 0.0 {
        return None;
    }
    PathBuilder::from_oval(Rect::from_xywh(cx - rx, cy - ry, rx * 2.0, ry * 2.0)?)
}

/// Straight-alpha RGBA into a premultiplied pixmap.
fn to_pixmap(image: &RgbaImage) -> Option<Pixmap> {
    let mut pixmap = Pixmap::new(image.width(), image.height())?;
    pixmap
        .pixels_mut()
        .par_iter_mut()
        .zip(image.as_raw().par_chunks_exact(4))
        .for_each(|(dst, px)| {
            *dst = ColorU8::from_rgba(px[0], px[1], px[2], px[3]).premultiply();
        });
    Some(pixmap)
}

/// Premultiplied pixmap back into straight-alpha RGBA.
fn to_rgba(pixmap: &Pixmap) -> RgbaImage {
    let mut image = RgbaImage::new(pixmap.width(), pixmap.height());
    image
        .par_chunks_exact_mut(4)
        .zip(pixmap.pixels().par_iter())
        .for_each(|(dst, px)| {
            let c = px.demultiply();
            dst.copy_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
        });
    image
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{assert_rgb_near, quadrant_image, solid_image};

    fn view() -> CompositionView {
        CompositionView::new(Dimensions::new(500, 500))
    }

    #[test]
    fn stock_frame_has_view_size() {
        let frame = view().frame_image();
        assert_eq!(frame.dimensions(), (500, 500));
    }

    #[test]
    fn stock_frame_cutout_is_transparent() {
        let frame = view().frame_image();
        // Center of the cutout
        assert_eq!(frame.get_pixel(250, 250)[3], 0);
        // Just inside the cutout edge (radius 148)
        assert_eq!(frame.get_pixel(250, 105)[3], 0);
    }

    #[test]
    fn stock_frame_field_is_opaque() {
        let frame = view().frame_image();
        let corner = frame.get_pixel(60, 60);
        assert_eq!(corner[3], 255);
        assert_eq!([corner[0], corner[1], corner[2]], FRAME_FIELD);
    }

    #[test]
    fn stock_frame_ring_hugs_cutout() {
        let frame = view().frame_image();
        // Radius 148..159 is the ring
        let ring = frame.get_pixel(250, 95);
        assert_eq!(ring[3], 255);
        assert_eq!([ring[0], ring[1], ring[2]], FRAME_ACCENT);
        // Inside the crop circle but outside the cutout
        let rim = frame.get_pixel(250, 100);
        assert_eq!(rim[3], 255);
    }

    #[test]
    fn stock_frame_border_is_inset() {
        let frame = view().frame_image();
        // Inset 20px, 4px wide
        let border = frame.get_pixel(250, 20);
        assert_eq!([border[0], border[1], border[2]], FRAME_ACCENT);
        let outside = frame.get_pixel(250, 10);
        assert_eq!([outside[0], outside[1], outside[2]], FRAME_FIELD);
    }

    #[test]
    fn zero_sized_view_renders_empty() {
        let v = CompositionView::new(Dimensions::new(0, 0));
        assert_eq!(v.render(Some(&solid_image(4, 4, [1, 2, 3]))).dimensions(), (0, 0));
        assert_eq!(v.frame_image().dimensions(), (0, 0));
    }

    #[test]
    fn render_without_crop_is_only_frame() {
        let v = view();
        assert_eq!(v.render(None), v.frame_image());
    }

    #[test]
    fn render_shows_crop_through_cutout() {
        let v = view();
        let crop = solid_image(120, 120, [220, 30, 30]);
        let rendered = v.render(Some(&crop));

        assert_eq!(rendered.dimensions(), (500, 500));
        assert_rgb_near(*rendered.get_pixel(250, 250), [220, 30, 30], 2);
        // Left edge of the cutout, still inside
        assert_rgb_near(*rendered.get_pixel(105, 250), [220, 30, 30], 2);
        // Overlay box corner lies outside the circle: frame field
        assert_rgb_near(*rendered.get_pixel(110, 110), FRAME_FIELD, 0);
    }

    #[test]
    fn opaque_crop_gives_fully_opaque_view() {
        for size in [Dimensions::new(500, 500), Dimensions::new(320, 240)] {
            let v = CompositionView::new(size);
            let rendered = v.render(Some(&quadrant_image(300, 300)));
            let translucent = rendered.pixels().filter(|p| p[3] < 255).count();
            assert_eq!(translucent, 0, "translucent pixels in {size:?} view");
        }
    }

    #[test]
    fn crop_layer_is_sixty_percent_and_centered() {
        let v = view();
        let layer = to_rgba(&v.crop_layer(&solid_image(40, 40, [0, 0, 255])).unwrap());

        // Circle spans x in [100, 400) on the center row
        assert_eq!(layer.get_pixel(98, 250)[3], 0);
        assert_eq!(layer.get_pixel(102, 250)[3], 255);
        assert_eq!(layer.get_pixel(397, 250)[3], 255);
        assert_eq!(layer.get_pixel(401, 250)[3], 0);
        // and y in [100, 400) on the center column
        assert_eq!(layer.get_pixel(250, 98)[3], 0);
        assert_eq!(layer.get_pixel(250, 102)[3], 255);
        // Overlay box corners are masked off
        assert_eq!(layer.get_pixel(101, 101)[3], 0);
        assert_eq!(layer.get_pixel(398, 398)[3], 0);
    }

    #[test]
    fn crop_layer_covers_non_square_crop() {
        let v = view();
        let layer = to_rgba(&v.crop_layer(&solid_image(300, 100, [10, 200, 10])).unwrap());
        // Cover-scaled: the full circle height is filled
        assert_eq!(layer.get_pixel(250, 102)[3], 255);
        assert_eq!(layer.get_pixel(250, 397)[3], 255);
        assert_rgb_near(*layer.get_pixel(250, 250), [10, 200, 10], 2);
    }

    #[test]
    fn pixmap_conversion_keeps_opaque_pixels() {
        let image = quadrant_image(8, 6).to_rgba8();
        assert_eq!(to_rgba(&to_pixmap(&image).unwrap()), image);
    }
}
