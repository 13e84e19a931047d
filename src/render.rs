use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::error::{Result, TurmiteError};
use crate::grid::Grid;
use crate::palette::{ColorIndex, Palette};

/// RGBA8 pixel buffer with fixed rectangular bounds
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    pub width: u32,
    pub height: u32,
    /// Row-major RGBA bytes, 4 per pixel
    pixels: Vec<u8>,
}

impl PixelBuffer {
    pub fn new(width: u32, height: u32) -> Self {
        PixelBuffer {
            width,
            height,
            pixels: vec![0; width as usize * height as usize * 4],
        }
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 4
    }

    /// Pixel at (x, y), or None outside the bounds
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let o = self.offset(x, y);
        Some([self.pixels[o], self.pixels[o + 1], self.pixels[o + 2], self.pixels[o + 3]])
    }

    /// Set pixel at (x, y); writes outside the bounds are ignored
    pub fn set_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        if x < self.width && y < self.height {
            let o = self.offset(x, y);
            self.pixels[o..o + 4].copy_from_slice(&rgba);
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }
}

/// Render the grid: pixel (x, y) is the display value of the cell's index
pub fn render(grid: &Grid, palette: &Palette) -> PixelBuffer {
    let mut image = PixelBuffer::new(grid.width as u32, grid.height as u32);
    for (id, &index) in grid.cells().iter().enumerate() {
        let o = id * 4;
        image.pixels[o..o + 4].copy_from_slice(&palette.display_value(index));
    }
    image
}

/// Encode the rendered grid as an 8-bit RGBA PNG
pub fn encode_png<W: Write>(grid: &Grid, palette: &Palette, w: W) -> Result<()> {
    let image = render(grid, palette);

    let mut encoder = png::Encoder::new(w, image.width, image.height);
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);

    let mut writer = encoder.write_header()?;
    writer.write_image_data(image.as_bytes())?;
    writer.finish()?;
    Ok(())
}

/// Write the rendered grid to `path`
///
/// The image goes to a sibling temp file that replaces `path` only once it is
/// fully written and synced. On failure `path` is left as it was.
pub fn write_png(grid: &Grid, palette: &Palette, path: &Path) -> Result<()> {
    write_atomically(path, |w| encode_png(grid, palette, w))?;

    info!(path = %path.display(), width = grid.width, height = grid.height, "Wrote image");
    Ok(())
}

/// Sibling path used while `path` is being written
pub fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(OsString::from).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Run `write` against a temp file, then rename it over `path`
///
/// The temp file is removed if any step fails.
pub(crate) fn write_atomically<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<File>) -> Result<()>,
{
    let tmp = temp_path(path);
    let result = write_and_rename(&tmp, path, write);
    if result.is_err() {
        if let Err(e) = fs::remove_file(&tmp) {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!(path = %tmp.display(), error = %e, "Failed to remove partial image");
            }
        }
    }
    result
}

fn write_and_rename<F>(tmp: &Path, path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<File>) -> Result<()>,
{
    let file = File::create(tmp)?;
    let mut w = BufWriter::new(file);

    write(&mut w)?;

    w.flush()?;
    let file = w.into_inner().map_err(|e| e.into_error())?;
    file.sync_all()?;
    drop(file);

    fs::rename(tmp, path)?;
    Ok(())
}

/// Decode an 8-bit RGBA PNG into a pixel buffer
pub fn decode_png<R: Read>(r: R) -> Result<PixelBuffer> {
    let decoder = png::Decoder::new(r);
    let mut reader = decoder.read_info()?;
    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader.next_frame(&mut buf)?;

    if info.color_type != png::ColorType::Rgba || info.bit_depth != png::BitDepth::Eight {
        return Err(TurmiteError::UnsupportedImage(format!(
            "{:?} at {:?}, expected 8-bit RGBA",
            info.color_type, info.bit_depth
        )));
    }

    buf.truncate(info.buffer_size());
    Ok(PixelBuffer {
        width: info.width,
        height: info.height,
        pixels: buf,
    })
}

/// Read a PNG file written by `write_png`
pub fn read_png(path: &Path) -> Result<PixelBuffer> {
    let file = File::open(path)?;
    decode_png(BufReader::new(file))
}

/// Recover the index grid from a rendered image by reverse palette lookup
///
/// Any pixel that is not an exact palette entry is fatal.
pub fn decode_grid(image: &PixelBuffer, palette: &Palette) -> Result<Grid> {
    if image.width > i32::MAX as u32 || image.height > i32::MAX as u32 {
        return Err(TurmiteError::UnsupportedImage(format!(
            "{}x{} exceeds the largest grid dimension",
            image.width, image.height
        )));
    }
    let mut cells: Vec<ColorIndex> = Vec::with_capacity(image.width as usize * image.height as usize);
    for y in 0..image.height {
        for x in 0..image.width {
            let rgba = image.pixel(x, y).unwrap_or_default();
            let index = palette.index_of(rgba).ok_or(TurmiteError::ColorNotInPalette {
                x: x as i32,
                y: y as i32,
                rgba,
            })?;
            cells.push(index);
        }
    }
    Grid::from_cells(image.width as i32, image.height as i32, cells)
}

/// Check a decoded image has the expected dimensions
pub fn check_size(image: &PixelBuffer, width: u32, height: u32) -> Result<()> {
    if image.width != width || image.height != height {
        return Err(TurmiteError::ImageSizeMismatch {
            width,
            height,
            actual_width: image.width,
            actual_height: image.height,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_maps_indices_to_display_values() {
        let palette = Palette::new(4).unwrap();
        let grid = Grid::from_cells(2, 2, vec![0, 1, 2, 3]).unwrap();
        let image = render(&grid, &palette);

        assert_eq!(image.pixel(0, 0), Some([255, 255, 255, 255]));
        assert_eq!(image.pixel(1, 0), Some([170, 170, 170, 255]));
        assert_eq!(image.pixel(0, 1), Some([85, 85, 85, 255]));
        assert_eq!(image.pixel(1, 1), Some([0, 0, 0, 255]));
        assert_eq!(image.pixel(2, 0), None);
    }

    #[test]
    fn test_png_in_memory_decodes_to_same_grid() {
        let palette = Palette::new(256).unwrap();
        let cells: Vec<u8> = (0..=255u8).collect();
        let grid = Grid::from_cells(16, 16, cells).unwrap();

        let mut bytes = Vec::new();
        encode_png(&grid, &palette, &mut bytes).unwrap();
        let image = decode_png(bytes.as_slice()).unwrap();
        check_size(&image, 16, 16).unwrap();

        assert_eq!(decode_grid(&image, &palette).unwrap(), grid);
    }

    #[test]
    fn test_unknown_pixel_is_fatal() {
        let palette = Palette::new(4).unwrap();
        let mut image = PixelBuffer::new(2, 1);
        image.set_pixel(0, 0, palette.display_value(2));
        image.set_pixel(1, 0, [10, 10, 10, 255]);

        let err = decode_grid(&image, &palette).unwrap_err();
        assert!(matches!(err, TurmiteError::ColorNotInPalette { x: 1, y: 0, rgba: [10, 10, 10, 255] }));
    }

    #[test]
    fn test_failed_write_leaves_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");

        let result = write_atomically(&path, |w| {
            w.write_all(b"\x89PNG partial")?;
            Err(TurmiteError::UnsupportedImage("encoder stopped".to_string()))
        });

        assert!(result.is_err());
        assert!(!path.exists());
        assert!(!temp_path(&path).exists());
    }

    #[test]
    fn test_failed_write_keeps_previous_image() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");
        fs::write(&path, b"previous").unwrap();

        let result = write_atomically(&path, |_| Err(TurmiteError::UnsupportedImage("nope".to_string())));

        assert!(result.is_err());
        assert_eq!(fs::read(&path).unwrap(), b"previous");
        assert!(!temp_path(&path).exists());
    }

    #[test]
    fn test_write_png_replaces_target() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");
        fs::write(&path, b"stale").unwrap();

        let palette = Palette::new(4).unwrap();
        let grid = Grid::from_cells(2, 1, vec![3, 1]).unwrap();
        write_png(&grid, &palette, &path).unwrap();

        assert!(!temp_path(&path).exists());
        assert_eq!(decode_grid(&read_png(&path).unwrap(), &palette).unwrap(), grid);
    }

    #[test]
    fn test_oversized_dimensions_rejected() {
        let palette = Palette::new(4).unwrap();
        let image = PixelBuffer {
            width: i32::MAX as u32 + 1,
            height: 0,
            pixels: Vec::new(),
        };
        assert!(matches!(decode_grid(&image, &palette), Err(TurmiteError::UnsupportedImage(_))));
    }

    #[test]
    fn test_size_mismatch() {
        let image = PixelBuffer::new(3, 2);
        assert!(check_size(&image, 3, 2).is_ok());
        assert!(matches!(check_size(&image, 2, 3), Err(TurmiteError::ImageSizeMismatch { .. })));
    }
}
