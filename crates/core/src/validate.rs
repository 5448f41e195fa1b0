//! Upload file validation.
//!
//! Gates every upload before any network call: a fixed size ceiling and a
//! single supported container type.  Pure and synchronous.

/// Maximum accepted upload size (100 MiB).
pub const MAX_UPLOAD_BYTES: u64 = 100 * 1024 * 1024;

/// The only supported media type.
pub const SUPPORTED_MEDIA_TYPE: &str = "video/mp4";

/// Descriptor of a candidate upload, as known before reading the bytes.
#[derive(Debug, Clone)]
pub struct UploadFile {
    /// Original file name.
    pub file_name: String,
    /// Declared size in bytes.
    pub size_bytes: u64,
    /// Declared media type, e.g. `video/mp4`.
    pub media_type: String,
}

/// Why an upload was rejected locally. Exactly two kinds exist.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("File size {size_bytes} bytes exceeds the {MAX_UPLOAD_BYTES} byte limit")]
    TooLarge { size_bytes: u64 },

    #[error("Unsupported media type '{media_type}', only {SUPPORTED_MEDIA_TYPE} is accepted")]
    UnsupportedType { media_type: String },
}

/// Validate a candidate upload against the size/type policy.
pub fn validate_upload(file: &UploadFile) -> Result<(), ValidationError> {
    if file.size_bytes > MAX_UPLOAD_BYTES {
        return Err(ValidationError::TooLarge {
            size_bytes: file.size_bytes,
        });
    }
    if file.media_type != SUPPORTED_MEDIA_TYPE {
        return Err(ValidationError::UnsupportedType {
            media_type: file.media_type.clone(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn mp4(size_bytes: u64) -> UploadFile {
        UploadFile {
            file_name: "clip.mp4".into(),
            size_bytes,
            media_type: SUPPORTED_MEDIA_TYPE.into(),
        }
    }

    #[test]
    fn accepts_supported_file_under_limit() {
        assert!(validate_upload(&mp4(1024)).is_ok());
    }

    #[test]
    fn accepts_file_exactly_at_limit() {
        assert!(validate_upload(&mp4(MAX_UPLOAD_BYTES)).is_ok());
    }

    #[test]
    fn rejects_oversize_file() {
        let err = validate_upload(&mp4(MAX_UPLOAD_BYTES + 1)).unwrap_err();
        assert_matches!(err, ValidationError::TooLarge { size_bytes } if size_bytes == MAX_UPLOAD_BYTES + 1);
    }

    #[test]
    fn rejects_unsupported_media_type() {
        let file = UploadFile {
            file_name: "clip.mov".into(),
            size_bytes: 1024,
            media_type: "video/quicktime".into(),
        };
        let err = validate_upload(&file).unwrap_err();
        assert_matches!(err, ValidationError::UnsupportedType { media_type } if media_type == "video/quicktime");
    }

    #[test]
    fn size_check_runs_before_type_check() {
        let file = UploadFile {
            file_name: "huge.mov".into(),
            size_bytes: MAX_UPLOAD_BYTES + 1,
            media_type: "video/quicktime".into(),
        };
        assert_matches!(
            validate_upload(&file).unwrap_err(),
            ValidationError::TooLarge { .. }
        );
    }
}
