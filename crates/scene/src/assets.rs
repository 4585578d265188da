/// A decoded RGBA8 raster, as fetched for the globe's surface layers.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterImage {
    pub width: u32,
    pub height: u32,
    pub rgba8: Vec<u8>,
}

impl RasterImage {
    /// Validates the byte length against the declared dimensions. Dimensions
    /// come from untrusted fetched headers, so the size arithmetic must not
    /// overflow `usize` on 32-bit wasm.
    pub fn new(width: u32, height: u32, rgba8: Vec<u8>) -> Result<Self, String> {
        if width == 0 || height == 0 {
            return Err("raster has zero extent".to_string());
        }
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|pixels| pixels.checked_mul(4))
            .ok_or_else(|| format!("raster dimensions {width}x{height} are out of range"))?;
        if rgba8.len() != expected {
            return Err(format!(
                "raster byte length {} does not match {width}x{height} RGBA8 ({expected})",
                rgba8.len()
            ));
        }
        Ok(Self {
            width,
            height,
            rgba8,
        })
    }
}

/// Outcome of one startup asset fetch, resolved before the first textured
/// frame. A failure degrades shading only; pin projection depends purely on
/// geometry and never on assets.
#[derive(Debug, Clone, PartialEq)]
pub enum AssetOutcome {
    Pending,
    Loaded(RasterImage),
    Failed(String),
}

impl AssetOutcome {
    pub fn raster(&self) -> Option<&RasterImage> {
        match self {
            AssetOutcome::Loaded(raster) => Some(raster),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{AssetOutcome, RasterImage};

    #[test]
    fn raster_length_is_validated() {
        assert!(RasterImage::new(2, 2, vec![0; 16]).is_ok());
        assert!(RasterImage::new(2, 2, vec![0; 15]).is_err());
        assert!(RasterImage::new(0, 4, vec![]).is_err());
    }

    #[test]
    fn hostile_dimensions_fail_without_overflowing() {
        assert!(RasterImage::new(u32::MAX, u32::MAX, vec![0; 4]).is_err());
    }

    #[test]
    fn only_loaded_outcomes_expose_a_raster() {
        let raster = RasterImage::new(1, 1, vec![0, 0, 0, 255]).unwrap();
        assert!(AssetOutcome::Loaded(raster).raster().is_some());
        assert!(AssetOutcome::Pending.raster().is_none());
        assert!(AssetOutcome::Failed("404".into()).raster().is_none());
    }
}
