use std::fs;
use std::path::Path;

use anyhow::Context;
use bytes::Bytes;
use image2text_core::{UploadCandidate, MAX_UPLOAD_BYTES};

const UNKNOWN_TYPE: &str = "application/octet-stream";

/// Declared MIME type, as a browser would derive it from the file name.
pub fn mime_for_path(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("jpg" | "jpeg" | "jfif") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("bmp") => "image/bmp",
        Some("svg") => "image/svg+xml",
        Some("tif" | "tiff") => "image/tiff",
        _ => UNKNOWN_TYPE,
    }
}

/// Reads `path` into a candidate. Oversized files are not read: the declared
/// size alone is enough for validation to reject them.
pub fn load_candidate(path: &Path) -> anyhow::Result<UploadCandidate> {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .with_context(|| format!("{} does not name a file", path.display()))?;
    let declared_size = fs::metadata(path)
        .with_context(|| format!("cannot access {}", path.display()))?
        .len();
    let declared_type = mime_for_path(path).to_string();

    if declared_size > MAX_UPLOAD_BYTES {
        return Ok(UploadCandidate {
            file_name,
            bytes: Bytes::new(),
            declared_size,
            declared_type,
        });
    }

    let bytes = fs::read(path).with_context(|| format!("cannot read {}", path.display()))?;
    Ok(UploadCandidate::new(file_name, declared_type, bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image2text_core::{validate, RejectReason};
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn extensions_map_case_insensitively() {
        assert_eq!(mime_for_path(Path::new("a/b/Cat.JPG")), "image/jpeg");
        assert_eq!(mime_for_path(Path::new("cat.jpeg")), "image/jpeg");
        assert_eq!(mime_for_path(Path::new("cat.png")), "image/png");
        assert_eq!(mime_for_path(Path::new("cat.gif")), "image/gif");
        assert_eq!(mime_for_path(Path::new("cat.WebP")), "image/webp");
    }

    #[test]
    fn unknown_extensions_are_rejected_by_validation() {
        for name in ["scan.bmp", "notes.txt", "no_extension"] {
            let path = PathBuf::from(name);
            let candidate = UploadCandidate::new(name, mime_for_path(&path), vec![1u8]);
            assert_eq!(validate(&candidate), Err(RejectReason::Type), "{name}");
        }
    }

    #[test]
    fn loads_small_file_contents() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("tiny.png");
        fs::write(&path, [1u8, 2, 3]).unwrap();

        let candidate = load_candidate(&path).unwrap();
        assert_eq!(candidate.file_name, "tiny.png");
        assert_eq!(candidate.declared_type, "image/png");
        assert_eq!(candidate.declared_size, 3);
        assert_eq!(candidate.bytes.as_ref(), &[1u8, 2, 3]);
    }

    #[test]
    fn oversized_file_is_not_read() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("huge.jpg");
        let file = fs::File::create(&path).unwrap();
        file.set_len(MAX_UPLOAD_BYTES + 1).unwrap();

        let candidate = load_candidate(&path).unwrap();
        assert_eq!(candidate.declared_size, MAX_UPLOAD_BYTES + 1);
        assert!(candidate.bytes.is_empty());
        assert_eq!(validate(&candidate), Err(RejectReason::Size));
    }

    #[test]
    fn missing_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        assert!(load_candidate(&temp.path().join("gone.png")).is_err());
    }
}
