//! Magic-byte content sniffing for upload type enforcement.
//!
//! Acceptance is a hard rule, not a display hint, so detection is based on
//! payload bytes rather than file extensions: "document" uploads must be
//! PDF, "image" uploads must be one of the common raster formats.

/// A recognized raster image format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Png,
    Jpeg,
    Gif,
    Webp,
}

impl ImageKind {
    /// Canonical file extension for stored blob keys.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::Gif => "gif",
            Self::Webp => "webp",
        }
    }
}

/// Whether the payload is a PDF document.
pub fn is_pdf(data: &[u8]) -> bool {
    data.starts_with(b"%PDF-")
}

/// Detect a supported raster image format from the payload's magic bytes.
pub fn detect_image(data: &[u8]) -> Option<ImageKind> {
    if data.starts_with(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]) {
        Some(ImageKind::Png)
    } else if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
        Some(ImageKind::Jpeg)
    } else if data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a") {
        Some(ImageKind::Gif)
    } else if data.len() >= 12 && data.starts_with(b"RIFF") && &data[8..12] == b"WEBP" {
        Some(ImageKind::Webp)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pdf_detection() {
        assert!(is_pdf(b"%PDF-1.7 rest of file"));
        assert!(!is_pdf(b"PDF without marker"));
        assert!(!is_pdf(b""));
    }

    #[test]
    fn test_image_detection() {
        let png = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0x00];
        assert_eq!(detect_image(&png), Some(ImageKind::Png));

        let jpeg = [0xFF, 0xD8, 0xFF, 0xE0];
        assert_eq!(detect_image(&jpeg), Some(ImageKind::Jpeg));

        assert_eq!(detect_image(b"GIF89a...."), Some(ImageKind::Gif));

        let webp = b"RIFF\x00\x00\x00\x00WEBPVP8 ";
        assert_eq!(detect_image(webp), Some(ImageKind::Webp));

        assert_eq!(detect_image(b"%PDF-1.7"), None);
        assert_eq!(detect_image(b"RIFF1234WAVE"), None);
    }
}
