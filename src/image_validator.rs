// src/image_validator.rs
use thiserror::Error;

use crate::app_log;

#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct ImageValidationError {
    pub file_name: String,
    pub error_type: ImageErrorType,
    pub message: String,
    pub suggestion: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageErrorType {
    WrongFormat,
    TooLarge,
    UnreadableFile,
}

impl ImageErrorType {
    pub fn code(&self) -> &'static str {
        match self {
            Self::WrongFormat => "IMAGE_WRONG_FORMAT",
            Self::TooLarge => "IMAGE_TOO_LARGE",
            Self::UnreadableFile => "IMAGE_UNREADABLE",
        }
    }
}

impl ImageValidationError {
    /// Text shown to the user in the blocking notification.
    pub fn user_message(&self) -> String {
        format!("{} {}", self.message, self.suggestion)
    }
}

pub struct ImageValidator;

impl ImageValidator {
    /// Check the declared content type and size of a selected file.
    pub fn validate_upload(
        file_name: &str,
        content_type: Option<&str>,
        size: u64,
        max_size: u64,
    ) -> Result<(), ImageValidationError> {
        if !Self::is_image_type(content_type) {
            app_log!(warn,
                "Rejected {}: declared type {:?} is not an image",
                file_name, content_type
            );
            return Err(ImageValidationError {
                file_name: file_name.to_string(),
                error_type: ImageErrorType::WrongFormat,
                message: "Please select an image file.".to_string(),
                suggestion: "Supported formats include PNG and JPEG.".to_string(),
            });
        }

        if size > max_size {
            app_log!(warn,
                "Rejected {}: {} bytes exceeds limit of {}",
                file_name, size, max_size
            );
            return Err(ImageValidationError {
                file_name: file_name.to_string(),
                error_type: ImageErrorType::TooLarge,
                message: format!(
                    "Image file too large: {:.1}MB (max {:.0}MB).",
                    size as f64 / 1024.0 / 1024.0,
                    max_size as f64 / 1024.0 / 1024.0
                ),
                suggestion: "Please resize or compress your image and try again.".to_string(),
            });
        }

        Ok(())
    }

    /// `image/*` with a non-empty subtype, case-insensitive.
    pub fn is_image_type(content_type: Option<&str>) -> bool {
        let Some(content_type) = content_type else {
            return false;
        };
        match content_type.trim().split_once('/') {
            Some((top, sub)) => top.eq_ignore_ascii_case("image") && !sub.is_empty(),
            None => false,
        }
    }

    pub fn unreadable(file_name: &str, cause: &std::io::Error) -> ImageValidationError {
        ImageValidationError {
            file_name: file_name.to_string(),
            error_type: ImageErrorType::UnreadableFile,
            message: format!("Cannot read image file: {}", cause),
            suggestion: "Check file permissions or try re-uploading the image.".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIMIT: u64 = 5 * 1024 * 1024;

    #[test]
    fn test_is_image_type() {
        assert!(ImageValidator::is_image_type(Some("image/png")));
        assert!(ImageValidator::is_image_type(Some("IMAGE/JPEG")));
        assert!(!ImageValidator::is_image_type(Some("text/plain")));
        assert!(!ImageValidator::is_image_type(Some("image/")));
        assert!(!ImageValidator::is_image_type(Some("image")));
        assert!(!ImageValidator::is_image_type(Some("")));
        assert!(!ImageValidator::is_image_type(None));
    }

    #[test]
    fn test_rejects_non_image() {
        let err = ImageValidator::validate_upload("notes.txt", Some("text/plain"), 10, LIMIT)
            .unwrap_err();
        assert_eq!(err.error_type, ImageErrorType::WrongFormat);
        assert_eq!(err.error_type.code(), "IMAGE_WRONG_FORMAT");
        assert_eq!(err.file_name, "notes.txt");
    }

    #[test]
    fn test_rejects_oversized_image() {
        let err = ImageValidator::validate_upload(
            "huge.png",
            Some("image/png"),
            10 * 1024 * 1024,
            LIMIT,
        )
        .unwrap_err();
        assert_eq!(err.error_type, ImageErrorType::TooLarge);
        assert!(err.message.contains("10.0MB"));
        assert!(err.user_message().contains("resize"));
    }

    #[test]
    fn test_limit_is_inclusive() {
        assert!(ImageValidator::validate_upload("a.png", Some("image/png"), LIMIT, LIMIT).is_ok());
        assert!(
            ImageValidator::validate_upload("a.png", Some("image/png"), LIMIT + 1, LIMIT).is_err()
        );
    }

    #[test]
    fn test_type_checked_before_size() {
        let err = ImageValidator::validate_upload("a.pdf", Some("application/pdf"), LIMIT * 4, LIMIT)
            .unwrap_err();
        assert_eq!(err.error_type, ImageErrorType::WrongFormat);
    }
}
