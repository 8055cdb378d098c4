use std::path::Path;

use sc_core::Image;

use crate::error::ImageError;

/// Source of per-pixel opacity for a look's image file.
pub trait ImageProvider: Send + Sync {
    /// Decodes `path` into an opacity mask: non-zero where anything is drawn.
    fn load_mask(&self, path: &Path) -> Result<Image<u8>, ImageError>;
}

/// Decodes image files from disk with the `image` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsImageProvider;

impl ImageProvider for FsImageProvider {
    fn load_mask(&self, path: &Path) -> Result<Image<u8>, ImageError> {
        let rgba = image::open(path)
            .map_err(|source| ImageError::Decode {
                path: path.to_path_buf(),
                source,
            })?
            .to_rgba8();
        let (w, h) = rgba.dimensions();
        // A pixel counts when any channel is set, matching packed ARGB != 0.
        let mask = rgba
            .pixels()
            .map(|p| if p.0.iter().any(|&c| c != 0) { 255 } else { 0 })
            .collect::<Vec<u8>>();

        Image::from_vec(w as usize, h as usize, mask).map_err(|source| ImageError::Buffer {
            path: path.to_path_buf(),
            source,
        })
    }
}
