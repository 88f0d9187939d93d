// src/staging.rs

use axum::body::Bytes;

use crate::errors::AppError;

/// Hard cap on staged attachments per editor session.
pub const MAX_STAGED_IMAGES: usize = 10;

/// An image file received from the form but not yet assigned a preview
/// handle.
#[derive(Debug, Clone)]
pub struct IncomingImage {
    pub filename: String,
    pub content_type: String,
    pub bytes: Bytes,
}

/// A staged image together with its live preview handle. The bytes stay in
/// memory exactly as long as the image is staged; dropping the entry releases
/// the handle and the preview stops resolving.
#[derive(Debug, Clone)]
pub struct StagedImage {
    pub preview_id: u64,
    pub filename: String,
    pub content_type: String,
    pub bytes: Bytes,
}

/// The ordered staged-attachment sequence of one editor session.
///
/// Preview ids are monotone within the session and never reused, so a removed
/// image's handle can not come back to life when later batches are staged.
#[derive(Debug, Default)]
pub struct StagedImages {
    images: Vec<StagedImage>,
    next_preview_id: u64,
}

impl StagedImages {
    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &StagedImage> {
        self.images.iter()
    }

    /// Stages a whole batch, assigning each file a fresh preview handle. A
    /// batch that would push the staged count past `MAX_STAGED_IMAGES` is
    /// rejected entirely: the staged set is left untouched.
    pub fn stage_batch(&mut self, batch: Vec<IncomingImage>) -> Result<(), AppError> {
        if self.images.len() + batch.len() > MAX_STAGED_IMAGES {
            return Err(AppError::StagingLimitExceeded {
                staged: self.images.len(),
                incoming: batch.len(),
            });
        }
        for incoming in batch {
            self.next_preview_id += 1;
            self.images.push(StagedImage {
                preview_id: self.next_preview_id,
                filename: incoming.filename,
                content_type: incoming.content_type,
                bytes: incoming.bytes,
            });
        }
        Ok(())
    }

    /// Removes a single staged image, releasing its preview handle. Returns
    /// `None` for an unknown handle; order of the rest is preserved.
    pub fn remove(&mut self, preview_id: u64) -> Option<StagedImage> {
        let index = self.images.iter().position(|i| i.preview_id == preview_id)?;
        Some(self.images.remove(index))
    }

    /// Resolves a live preview handle to its staged image.
    pub fn preview(&self, preview_id: u64) -> Option<&StagedImage> {
        self.images.iter().find(|i| i.preview_id == preview_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn batch_of(count: usize) -> Vec<IncomingImage> {
        (0..count)
            .map(|n| IncomingImage {
                filename: format!("unit-{n}.jpg"),
                content_type: "image/jpeg".to_string(),
                bytes: Bytes::from_static(b"jpeg-bytes"),
            })
            .collect()
    }

    #[test]
    fn batch_over_the_limit_is_rejected_entirely() {
        let mut staged = StagedImages::default();
        staged.stage_batch(batch_of(7)).unwrap();

        let err = staged.stage_batch(batch_of(4)).unwrap_err();
        assert!(matches!(
            err,
            AppError::StagingLimitExceeded {
                staged: 7,
                incoming: 4
            }
        ));
        // The whole batch was discarded, not just the overflow.
        assert_eq!(staged.len(), 7);
    }

    #[test]
    fn batch_filling_the_limit_exactly_is_accepted() {
        let mut staged = StagedImages::default();
        staged.stage_batch(batch_of(7)).unwrap();
        staged.stage_batch(batch_of(3)).unwrap();
        assert_eq!(staged.len(), 10);
    }

    #[test]
    fn staged_order_follows_selection_order() {
        let mut staged = StagedImages::default();
        staged.stage_batch(batch_of(3)).unwrap();
        let names: Vec<_> = staged.iter().map(|i| i.filename.as_str()).collect();
        assert_eq!(names, vec!["unit-0.jpg", "unit-1.jpg", "unit-2.jpg"]);
    }

    #[test]
    fn remove_releases_the_preview_handle() {
        let mut staged = StagedImages::default();
        staged.stage_batch(batch_of(3)).unwrap();

        let id = staged.iter().nth(1).unwrap().preview_id;
        let removed = staged.remove(id).unwrap();
        assert_eq!(removed.filename, "unit-1.jpg");

        assert_eq!(staged.len(), 2);
        assert!(staged.preview(id).is_none());
        // Remaining order preserved.
        let names: Vec<_> = staged.iter().map(|i| i.filename.as_str()).collect();
        assert_eq!(names, vec!["unit-0.jpg", "unit-2.jpg"]);
    }

    #[test]
    fn remove_with_unknown_handle_is_none() {
        let mut staged = StagedImages::default();
        staged.stage_batch(batch_of(2)).unwrap();
        assert!(staged.remove(99).is_none());
        assert_eq!(staged.len(), 2);
    }

    #[test]
    fn preview_ids_are_never_reused() {
        let mut staged = StagedImages::default();
        staged.stage_batch(batch_of(2)).unwrap();
        let first_ids: Vec<_> = staged.iter().map(|i| i.preview_id).collect();

        let removed_id = first_ids[1];
        staged.remove(removed_id).unwrap();
        staged.stage_batch(batch_of(1)).unwrap();

        let new_id = staged.iter().last().unwrap().preview_id;
        assert!(new_id > removed_id);
        assert!(staged.preview(removed_id).is_none());
    }
}
