//! Optional on-disk copies of each request's images.

use crate::core::errors::{DigitError, DigitResult};
use crate::domain::{CanonicalTensor, RawImage};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// File name of the decoded upload.
pub const ORIGINAL_IMAGE_FILE: &str = "original_image.png";
/// File name of the normalized 28×28 image.
pub const CANONICAL_IMAGE_FILE: &str = "uploaded_image.png";

/// Writes the decoded input and the normalized tensor as PNGs.
///
/// Each request overwrites the previous files. Failures are logged and never
/// affect the request.
#[derive(Debug, Clone)]
pub struct DebugDumper {
    dir: PathBuf,
}

impl DebugDumper {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn dump_original(&self, image: &RawImage) {
        if let Err(e) = self.write_original(image) {
            warn!(
                "Failed to write {} to {}: {}",
                ORIGINAL_IMAGE_FILE,
                self.dir.display(),
                e.full_message()
            );
        }
    }

    pub fn dump_canonical(&self, tensor: &CanonicalTensor) {
        if let Err(e) = self.write_canonical(tensor) {
            warn!(
                "Failed to write {} to {}: {}",
                CANONICAL_IMAGE_FILE,
                self.dir.display(),
                e.full_message()
            );
        }
    }

    fn write_original(&self, image: &RawImage) -> DigitResult<()> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(ORIGINAL_IMAGE_FILE);
        image
            .to_dynamic()
            .save(&path)
            .map_err(|e| DigitError::debug_dump("could not encode the decoded image", e))?;
        debug!("Saved original image to {}", path.display());
        Ok(())
    }

    fn write_canonical(&self, tensor: &CanonicalTensor) -> DigitResult<()> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(CANONICAL_IMAGE_FILE);
        tensor
            .to_gray_image()
            .save(&path)
            .map_err(|e| DigitError::debug_dump("could not encode the normalized image", e))?;
        debug!("Saved normalized image to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma};
    use ndarray::Array4;

    #[test]
    fn test_dumps_both_images() {
        let dir = tempfile::tempdir().unwrap();
        let dumper = DebugDumper::new(dir.path().join("dumps"));

        dumper.dump_original(&RawImage::Gray(GrayImage::from_pixel(40, 30, Luma([200]))));
        let tensor = CanonicalTensor::new(Array4::from_elem((1, 28, 28, 1), 1.0)).unwrap();
        dumper.dump_canonical(&tensor);

        let original = image::open(dumper.dir().join(ORIGINAL_IMAGE_FILE)).unwrap();
        assert_eq!((original.width(), original.height()), (40, 30));
        let canonical = image::open(dumper.dir().join(CANONICAL_IMAGE_FILE))
            .unwrap()
            .to_luma8();
        assert_eq!(canonical.dimensions(), (28, 28));
        assert_eq!(canonical.get_pixel(10, 10), &Luma([255]));
    }

    #[test]
    fn test_unwritable_dir_only_warns() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, b"not a directory").unwrap();
        let dumper = DebugDumper::new(blocker.join("nested"));
        dumper.dump_original(&RawImage::Gray(GrayImage::new(2, 2)));
        assert!(!blocker.join("nested").exists());
    }
}
