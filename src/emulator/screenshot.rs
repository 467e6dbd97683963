// Screenshot functionality
//
// Saves the last presented RGBA8 frame as a PNG file.

use crate::emulator::config::ScreenshotConfig;
use crate::machine::FrameGeometry;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Errors that can occur during screenshot operations
#[derive(Debug)]
pub enum ScreenshotError {
    /// I/O error
    Io(io::Error),

    /// PNG encoding error
    PngEncoding(png::EncodingError),

    /// Nothing has been presented yet
    NoFrame,
}

impl std::fmt::Display for ScreenshotError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScreenshotError::Io(e) => write!(f, "I/O error: {}", e),
            ScreenshotError::PngEncoding(e) => write!(f, "PNG encoding error: {}", e),
            ScreenshotError::NoFrame => write!(f, "No frame has been presented yet"),
        }
    }
}

impl std::error::Error for ScreenshotError {}

impl From<io::Error> for ScreenshotError {
    fn from(e: io::Error) -> Self {
        ScreenshotError::Io(e)
    }
}

impl From<png::EncodingError> for ScreenshotError {
    fn from(e: png::EncodingError) -> Self {
        ScreenshotError::PngEncoding(e)
    }
}

/// Save a screenshot of a presented frame
///
/// # Arguments
///
/// * `frame` - RGBA8 pixels, top row first, exactly `geometry.byte_len()` bytes
/// * `geometry` - Frame size
/// * `program_name` - Name of the running catalog entry (for the directory)
/// * `config` - Screenshot settings
///
/// # Returns
///
/// Result containing the path to the saved screenshot or an error
pub fn save_screenshot(
    frame: Option<&[u8]>,
    geometry: FrameGeometry,
    program_name: Option<&str>,
    config: &ScreenshotConfig,
) -> Result<PathBuf, ScreenshotError> {
    let frame = frame.ok_or(ScreenshotError::NoFrame)?;

    let screenshots_dir = get_screenshot_directory(&config.directory, program_name);
    fs::create_dir_all(&screenshots_dir)?;

    let filename = if config.include_timestamp {
        let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S%.3f");
        format!("screenshot_{}.png", timestamp)
    } else {
        "screenshot.png".to_string()
    };
    let file_path = screenshots_dir.join(filename);

    save_png(&file_path, frame, geometry.width, geometry.height)?;
    log::info!("Screenshot saved to {}", file_path.display());

    Ok(file_path)
}

/// Get the screenshot directory for the current program
///
/// Creates a directory structure like: screenshots/<program name>/
fn get_screenshot_directory(base_dir: &Path, program_name: Option<&str>) -> PathBuf {
    let name = program_name
        .map(sanitize_name)
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| "default".to_string());
    base_dir.join(name)
}

/// Keep a display name usable as a single path component
fn sanitize_name(name: &str) -> String {
    name.trim()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, ' ' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Save RGBA data as a PNG file
fn save_png(path: &Path, data: &[u8], width: u32, height: u32) -> Result<(), ScreenshotError> {
    let file = fs::File::create(path)?;
    let w = io::BufWriter::new(file);

    let mut encoder = png::Encoder::new(w, width, height);
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);

    let mut writer = encoder.write_header()?;
    writer.write_image_data(data)?;

    Ok(())
}
