//! Frame rendering and GIF assembly.
//!
//! Frames are drawn with plotters into a transient RGB buffer, converted to
//! an [`RgbaImage`] and handed straight to the GIF encoder, so only one frame
//! is alive at a time regardless of animation length.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use anyhow::Result;
use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, Frame, Rgba, RgbaImage};
use plotters::coord::Shift;
use plotters::prelude::*;

pub const FRAME_WIDTH: u32 = 600;
pub const FRAME_HEIGHT: u32 = 400;

/// Playback rate of exported animations, frames per second.
pub const PLAYBACK_FPS: u32 = 20;

/// Render one animation frame. The closure draws onto a fresh
/// `FRAME_WIDTH` x `FRAME_HEIGHT` bitmap backend.
pub fn render_frame<F>(draw: F) -> Result<RgbaImage>
where
    F: for<'a> FnOnce(&DrawingArea<BitMapBackend<'a>, Shift>) -> Result<()>,
{
    let mut buf = vec![0u8; (FRAME_WIDTH * FRAME_HEIGHT * 3) as usize];
    {
        let root =
            BitMapBackend::with_buffer(&mut buf, (FRAME_WIDTH, FRAME_HEIGHT)).into_drawing_area();
        draw(&root)?;
        root.present()?;
    }
    Ok(rgb_to_rgba(&buf))
}

/// Assemble frames into an animated GIF, consuming the iterator one frame at
/// a time.
pub fn write_gif<I>(path: &Path, frames: I) -> Result<()>
where
    I: IntoIterator<Item = Result<RgbaImage>>,
{
    let file = File::create(path)?;
    let mut encoder = GifEncoder::new(BufWriter::new(file));
    encoder.set_repeat(Repeat::Infinite)?;

    let delay = Delay::from_numer_denom_ms(1000, PLAYBACK_FPS);
    for frame in frames {
        encoder.encode_frame(Frame::from_parts(frame?, 0, 0, delay))?;
    }
    Ok(())
}

fn rgb_to_rgba(rgb: &[u8]) -> RgbaImage {
    let mut img = RgbaImage::new(FRAME_WIDTH, FRAME_HEIGHT);
    for (i, px) in img.pixels_mut().enumerate() {
        let j = i * 3;
        *px = Rgba([rgb[j], rgb[j + 1], rgb[j + 2], 255]);
    }
    img
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::codecs::gif::GifDecoder;
    use image::AnimationDecoder;
    use std::io::BufReader;

    fn solid(r: u8, g: u8, b: u8) -> RgbaImage {
        RgbaImage::from_pixel(FRAME_WIDTH, FRAME_HEIGHT, Rgba([r, g, b, 255]))
    }

    #[test]
    fn gif_preserves_frame_count_and_order() {
        let path = std::env::temp_dir().join("fdmviz_animation_order.gif");
        let frames = vec![
            Ok(solid(255, 0, 0)),
            Ok(solid(0, 255, 0)),
            Ok(solid(0, 0, 255)),
        ];
        write_gif(&path, frames).unwrap();

        let decoder = GifDecoder::new(BufReader::new(File::open(&path).unwrap())).unwrap();
        let decoded = decoder.into_frames().collect_frames().unwrap();
        assert_eq!(decoded.len(), 3);

        // First frame stays red, last stays blue.
        let first = decoded[0].buffer().get_pixel(0, 0);
        assert!(first[0] > 200 && first[2] < 80);
        let last = decoded[2].buffer().get_pixel(0, 0);
        assert!(last[2] > 200 && last[0] < 80);
    }

    #[test]
    fn gif_frames_play_at_twenty_fps() {
        let path = std::env::temp_dir().join("fdmviz_animation_fps.gif");
        write_gif(&path, vec![Ok(solid(10, 20, 30))]).unwrap();

        let decoder = GifDecoder::new(BufReader::new(File::open(&path).unwrap())).unwrap();
        let decoded = decoder.into_frames().collect_frames().unwrap();
        let (numer, denom) = decoded[0].delay().numer_denom_ms();
        assert!((numer as f64 / denom as f64 - 50.0).abs() < 1e-9);
    }

    #[test]
    fn frame_error_aborts_the_export() {
        let path = std::env::temp_dir().join("fdmviz_animation_err.gif");
        let frames: Vec<Result<RgbaImage>> =
            vec![Ok(solid(0, 0, 0)), Err(anyhow::anyhow!("render failed"))];
        assert!(write_gif(&path, frames).is_err());
    }

    #[test]
    fn render_frame_produces_filled_raster() {
        let image = render_frame(|root| {
            root.fill(&RED)?;
            Ok(())
        })
        .unwrap();
        assert_eq!(image.dimensions(), (FRAME_WIDTH, FRAME_HEIGHT));
        let px = image.get_pixel(FRAME_WIDTH / 2, FRAME_HEIGHT / 2);
        assert_eq!((px[0], px[1], px[2], px[3]), (255, 0, 0, 255));
    }
}
