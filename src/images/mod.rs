// Filesystem store for post images. One file per post under
// <uploads>/<post_id>/, replaced wholesale on re-upload.

use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone)]
pub struct ImageStore {
    root: PathBuf,
}

impl ImageStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Store the image for a post, replacing any previous one. Rejects any
    /// declared content type that does not start with `image/`.
    pub fn put(
        &self,
        post_id: i64,
        content_type: &str,
        original_filename: Option<&str>,
        bytes: &[u8],
    ) -> AppResult<()> {
        if !content_type.to_ascii_lowercase().starts_with("image/") {
            return Err(AppError::UnsupportedMediaType(
                "Only image/* allowed".to_string(),
            ));
        }

        let dir = self.post_dir(post_id);
        fs::create_dir_all(&dir)?;

        // Remove the previous file first: a re-upload with a different
        // extension must not leave two files behind.
        for entry in fs::read_dir(&dir)? {
            let path = entry?.path();
            if path.is_file() {
                fs::remove_file(path)?;
            }
        }

        let ext = original_filename
            .and_then(|name| Path::new(name).extension())
            .and_then(OsStr::to_str)
            .map(|ext| format!(".{ext}"))
            .unwrap_or_default();

        fs::write(dir.join(format!("image{ext}")), bytes)?;
        Ok(())
    }

    /// The stored file for a post as (filename, bytes), or `None` when the
    /// post has no image.
    pub fn get(&self, post_id: i64) -> AppResult<Option<(String, Vec<u8>)>> {
        let dir = self.post_dir(post_id);
        if !dir.is_dir() {
            return Ok(None);
        }

        for entry in fs::read_dir(&dir)? {
            let path = entry?.path();
            if path.is_file() {
                let filename = path
                    .file_name()
                    .and_then(OsStr::to_str)
                    .unwrap_or("image")
                    .to_string();
                let bytes = fs::read(&path)?;
                return Ok(Some((filename, bytes)));
            }
        }

        Ok(None)
    }

    fn post_dir(&self, post_id: i64) -> PathBuf {
        self.root.join(post_id.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    fn store() -> (tempfile::TempDir, ImageStore) {
        let tmp = tempfile::tempdir().unwrap();
        let store = ImageStore::new(tmp.path().join("uploads"));
        (tmp, store)
    }

    #[test]
    fn put_then_get_roundtrips_bytes_and_filename() {
        let (_tmp, store) = store();

        store
            .put(1, "image/png", Some("photo.png"), b"\x89PNG data")
            .unwrap();

        let (filename, bytes) = store.get(1).unwrap().unwrap();
        assert_eq!(filename, "image.png");
        assert_eq!(bytes, b"\x89PNG data");
    }

    #[test]
    fn put_rejects_non_image_content_type() {
        let (_tmp, store) = store();

        let result = store.put(1, "text/plain", Some("notes.txt"), b"hello");
        assert!(matches!(result, Err(AppError::UnsupportedMediaType(_))));
        assert!(store.get(1).unwrap().is_none());
    }

    #[test]
    fn content_type_check_is_case_insensitive() {
        let (_tmp, store) = store();
        store.put(1, "IMAGE/JPEG", Some("a.jpg"), b"jpeg").unwrap();
        assert!(store.get(1).unwrap().is_some());
    }

    #[test]
    fn reupload_replaces_previous_file() {
        let (_tmp, store) = store();

        store.put(1, "image/png", Some("a.png"), b"old").unwrap();
        store.put(1, "image/jpeg", Some("b.jpg"), b"new").unwrap();

        let (filename, bytes) = store.get(1).unwrap().unwrap();
        assert_eq!(filename, "image.jpg");
        assert_eq!(bytes, b"new");

        // Exactly one file remains even though the extension changed
        let dir = store.post_dir(1);
        assert_eq!(std::fs::read_dir(dir).unwrap().count(), 1);
    }

    #[test]
    fn filename_without_extension_is_accepted() {
        let (_tmp, store) = store();
        store.put(1, "image/png", Some("raw"), b"data").unwrap();
        let (filename, _) = store.get(1).unwrap().unwrap();
        assert_eq!(filename, "image");
    }

    #[test]
    fn get_missing_post_returns_none() {
        let (_tmp, store) = store();
        assert!(store.get(77).unwrap().is_none());
    }

    #[test]
    fn images_are_scoped_per_post() {
        let (_tmp, store) = store();
        store.put(1, "image/png", Some("a.png"), b"one").unwrap();
        store.put(2, "image/png", Some("b.png"), b"two").unwrap();

        assert_eq!(store.get(1).unwrap().unwrap().1, b"one");
        assert_eq!(store.get(2).unwrap().unwrap().1, b"two");
    }
}
