use std::io::{Read, Write};
use std::path::Path;

use crate::foundation::core::Rgba;
use crate::foundation::error::{HikariError, HikariResult};

const FB_MAGIC: [u8; 4] = *b"HKFB";
const FB_VERSION: u32 = 1;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChannelLayout {
    Rgb,
    Rgba,
}

impl ChannelLayout {
    pub fn parse(s: &str) -> HikariResult<Self> {
        match s {
            "rgb" => Ok(Self::Rgb),
            "rgba" => Ok(Self::Rgba),
            other => Err(HikariError::validation(format!(
                "unknown framebuffer layout '{other}' (expected \"rgb\" or \"rgba\")"
            ))),
        }
    }

    pub fn channels(self) -> usize {
        match self {
            Self::Rgb => 3,
            Self::Rgba => 4,
        }
    }

    fn from_channels(n: u32) -> Option<Self> {
        match n {
            3 => Some(Self::Rgb),
            4 => Some(Self::Rgba),
            _ => None,
        }
    }
}

/// Row-major float image. Row 0 is the top of the picture.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameBuffer {
    width: u32,
    height: u32,
    layout: ChannelLayout,
    data: Vec<f32>,
}

impl FrameBuffer {
    pub fn new(width: u32, height: u32, layout: ChannelLayout) -> Self {
        Self {
            width,
            height,
            layout,
            data: vec![0.0; width as usize * height as usize * layout.channels()],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn layout(&self) -> ChannelLayout {
        self.layout
    }

    pub fn channels(&self) -> usize {
        self.layout.channels()
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Reallocates to the given size, clearing every pixel.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.data = vec![0.0; width as usize * height as usize * self.channels()];
    }

    /// Mutable rows, one slice of `width * channels` floats each.
    pub fn rows_mut(&mut self) -> std::slice::ChunksExactMut<'_, f32> {
        let stride = (self.width as usize * self.channels()).max(1);
        self.data.chunks_exact_mut(stride)
    }

    pub(crate) fn data_mut(&mut self) -> &mut [f32] {
        &mut self.data
    }

    pub fn row_stride(&self) -> usize {
        self.width as usize * self.channels()
    }

    pub fn pixel(&self, x: u32, y: u32) -> Rgba {
        let c = self.channels();
        let i = (y as usize * self.width as usize + x as usize) * c;
        let p = &self.data[i..i + c];
        Rgba::new(p[0], p[1], p[2], if c == 4 { p[3] } else { 1.0 })
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, px: Rgba) {
        let c = self.channels();
        let i = (y as usize * self.width as usize + x as usize) * c;
        write_pixel(&mut self.data[i..i + c], px);
    }

    /// Writes the native `.fb` layout: little-endian header then row-major `f32` samples.
    pub fn write_to(&self, mut w: impl Write) -> std::io::Result<()> {
        w.write_all(&FB_MAGIC)?;
        for v in [FB_VERSION, self.width, self.height, self.channels() as u32] {
            w.write_all(&v.to_le_bytes())?;
        }
        let mut bytes = Vec::with_capacity(self.data.len() * 4);
        for v in &self.data {
            bytes.extend_from_slice(&v.to_le_bytes());
        }
        w.write_all(&bytes)
    }

    pub fn read_from(mut r: impl Read) -> HikariResult<Self> {
        let mut head = [0u8; 20];
        r.read_exact(&mut head)
            .map_err(|e| HikariError::validation(format!("framebuffer header: {e}")))?;
        if head[0..4] != FB_MAGIC {
            return Err(HikariError::validation("not a framebuffer file (bad magic)"));
        }
        let field = |k: usize| u32::from_le_bytes([head[k], head[k + 1], head[k + 2], head[k + 3]]);
        let (version, width, height, channels) = (field(4), field(8), field(12), field(16));
        if version != FB_VERSION {
            return Err(HikariError::validation(format!(
                "unsupported framebuffer version {version}"
            )));
        }
        let layout = ChannelLayout::from_channels(channels).ok_or_else(|| {
            HikariError::validation(format!("unsupported channel count {channels}"))
        })?;
        let byte_len = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(layout.channels()))
            .and_then(|n| n.checked_mul(4))
            .ok_or_else(|| HikariError::validation("framebuffer dimensions overflow"))?;
        let mut bytes = Vec::new();
        r.take(byte_len as u64)
            .read_to_end(&mut bytes)
            .map_err(|e| HikariError::validation(format!("framebuffer data: {e}")))?;
        if bytes.len() != byte_len {
            return Err(HikariError::validation(format!(
                "framebuffer data: expected {byte_len} bytes, found {}",
                bytes.len()
            )));
        }
        let data = bytes
            .chunks_exact(4)
            .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
            .collect();
        Ok(Self {
            width,
            height,
            layout,
            data,
        })
    }

    pub fn save_fb(&self, path: &Path) -> HikariResult<()> {
        let f = std::fs::File::create(path)
            .map_err(|e| HikariError::io("create framebuffer file", path, e))?;
        let mut w = std::io::BufWriter::new(f);
        self.write_to(&mut w)
            .and_then(|()| w.flush())
            .map_err(|e| HikariError::io("write framebuffer file", path, e))
    }

    pub fn load_fb(path: &Path) -> HikariResult<Self> {
        let f = std::fs::File::open(path)
            .map_err(|e| HikariError::io("open framebuffer file", path, e))?;
        Self::read_from(std::io::BufReader::new(f))
    }

    /// Clamped, sRGB-encoded 8-bit RGBA with straight alpha.
    pub fn to_rgba8(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.width as usize * self.height as usize * 4);
        for y in 0..self.height {
            for x in 0..self.width {
                let p = self.pixel(x, y);
                let a = p.a.clamp(0.0, 1.0);
                let unpremul = |c: f32| if a > 0.0 { c / a } else { 0.0 };
                out.push(encode_srgb8(unpremul(p.r)));
                out.push(encode_srgb8(unpremul(p.g)));
                out.push(encode_srgb8(unpremul(p.b)));
                out.push((a * 255.0).round() as u8);
            }
        }
        out
    }

    pub fn save_png(&self, path: &Path) -> HikariResult<()> {
        image::save_buffer_with_format(
            path,
            &self.to_rgba8(),
            self.width,
            self.height,
            image::ColorType::Rgba8,
            image::ImageFormat::Png,
        )
        .map_err(|e| HikariError::Other(anyhow::Error::new(e).context(format!(
            "write png '{}'",
            path.display()
        ))))
    }

    /// Chooses the codec from the file extension: `.png` or the native `.fb` (default).
    pub fn save(&self, path: &Path) -> HikariResult<()> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("png") => self.save_png(path),
            _ => self.save_fb(path),
        }
    }
}

pub(crate) fn write_pixel(dst: &mut [f32], px: Rgba) {
    dst[0] = px.r;
    dst[1] = px.g;
    dst[2] = px.b;
    if dst.len() == 4 {
        dst[3] = px.a;
    }
}

fn encode_srgb8(c: f32) -> u8 {
    let c = c.clamp(0.0, 1.0);
    let s = if c <= 0.003_130_8 {
        c * 12.92
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    };
    (s * 255.0).round() as u8
}

/// Running arithmetic mean of a pixel's samples.
///
/// Identical samples reproduce the sample exactly, whatever the count.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PixelAccumulator {
    mean: Rgba,
    count: u32,
}

impl PixelAccumulator {
    pub fn add(&mut self, s: Rgba) {
        self.count += 1;
        let k = 1.0 / self.count as f32;
        self.mean.r += (s.r - self.mean.r) * k;
        self.mean.g += (s.g - self.mean.g) * k;
        self.mean.b += (s.b - self.mean.b) * k;
        self.mean.a += (s.a - self.mean.a) * k;
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn value(&self) -> Rgba {
        self.mean
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/framebuffer.rs"]
mod tests;
