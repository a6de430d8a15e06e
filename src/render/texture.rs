use std::path::Path;

use anyhow::Context;

use crate::foundation::core::Rgba;
use crate::foundation::error::{HikariError, HikariResult};

/// Linear float RGBA image used for environment maps and shader lookups.
#[derive(Clone, Debug, PartialEq)]
pub struct Texture {
    width: u32,
    height: u32,
    texels: Vec<[f32; 4]>,
}

fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

impl Texture {
    pub fn from_texels(width: u32, height: u32, texels: Vec<[f32; 4]>) -> HikariResult<Self> {
        if width == 0 || height == 0 {
            return Err(HikariError::validation("texture must be at least 1x1"));
        }
        if texels.len() != width as usize * height as usize {
            return Err(HikariError::validation(format!(
                "texture data has {} texels, expected {}x{}",
                texels.len(),
                width,
                height
            )));
        }
        Ok(Self {
            width,
            height,
            texels,
        })
    }

    /// Decodes encoded image bytes. Float formats (HDR, EXR) are kept linear; 8/16-bit
    /// images are treated as sRGB.
    pub fn decode(bytes: &[u8]) -> HikariResult<Self> {
        let dyn_img = image::load_from_memory(bytes).context("decode texture image")?;
        let is_float = matches!(
            dyn_img.color(),
            image::ColorType::Rgb32F | image::ColorType::Rgba32F
        );
        let rgba = dyn_img.to_rgba32f();
        let (width, height) = rgba.dimensions();
        let texels = rgba
            .pixels()
            .map(|p| {
                let [r, g, b, a] = p.0;
                if is_float {
                    [r, g, b, a]
                } else {
                    [srgb_to_linear(r), srgb_to_linear(g), srgb_to_linear(b), a]
                }
            })
            .collect();
        Self::from_texels(width, height, texels)
    }

    #[tracing::instrument]
    pub fn open(path: &Path) -> HikariResult<Self> {
        let bytes = std::fs::read(path).map_err(|e| HikariError::io("read texture", path, e))?;
        let tex = Self::decode(&bytes)?;
        tracing::debug!(width = tex.width, height = tex.height, "loaded texture");
        Ok(tex)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    fn texel(&self, x: i64, y: i64) -> [f32; 4] {
        let w = i64::from(self.width);
        let h = i64::from(self.height);
        let x = x.rem_euclid(w);
        let y = y.clamp(0, h - 1);
        self.texels[(y * w + x) as usize]
    }

    /// Bilinear lookup. `u` wraps, `v` clamps; `v = 1` is the top row.
    pub fn lookup(&self, u: f64, v: f64) -> Rgba {
        let fx = u * f64::from(self.width) - 0.5;
        let fy = (1.0 - v) * f64::from(self.height) - 0.5;
        let x0 = fx.floor();
        let y0 = fy.floor();
        let tx = (fx - x0) as f32;
        let ty = (fy - y0) as f32;
        let (x0, y0) = (x0 as i64, y0 as i64);

        let mut out = [0.0f32; 4];
        let corners = [
            (x0, y0, (1.0 - tx) * (1.0 - ty)),
            (x0 + 1, y0, tx * (1.0 - ty)),
            (x0, y0 + 1, (1.0 - tx) * ty),
            (x0 + 1, y0 + 1, tx * ty),
        ];
        for (x, y, w) in corners {
            let t = self.texel(x, y);
            for c in 0..4 {
                out[c] += t[c] * w;
            }
        }
        Rgba::new(out[0], out[1], out[2], out[3])
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/texture.rs"]
mod tests;
