use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// A file staged for upload alongside a prompt.
///
/// The attachment travels as a multipart form part, so the raw bytes are kept
/// as read from disk. Staging an attachment does not send anything; the next
/// submitted prompt carries it, and the staging slot is cleared whether or
/// not that submission succeeds.
#[derive(Debug, Clone, PartialEq)]
pub struct Attachment {
    /// The file name presented to the agent.
    pub file_name: String,

    /// The media type of the file.
    pub media_type: AttachmentMediaType,

    /// The file contents.
    pub data: Vec<u8>,
}

/// Supported attachment media types
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum AttachmentMediaType {
    #[serde(rename = "application/pdf")]
    Pdf,

    #[serde(rename = "image/png")]
    Png,

    #[serde(rename = "image/jpeg")]
    Jpeg,

    #[serde(rename = "text/plain")]
    Text,
}

impl AttachmentMediaType {
    /// Returns the MIME type string for this media type.
    pub fn as_mime(&self) -> &'static str {
        match self {
            AttachmentMediaType::Pdf => "application/pdf",
            AttachmentMediaType::Png => "image/png",
            AttachmentMediaType::Jpeg => "image/jpeg",
            AttachmentMediaType::Text => "text/plain",
        }
    }
}

impl Attachment {
    /// Create a new Attachment from in-memory bytes.
    pub fn new(
        file_name: impl Into<String>,
        media_type: AttachmentMediaType,
        data: Vec<u8>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            media_type,
            data,
        }
    }

    /// Create an Attachment from a file path
    ///
    /// This will read the file and determine the media type from the file
    /// extension. Supported extensions are pdf, png, jpg/jpeg, and txt.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, std::io::Error> {
        let path = path.as_ref();

        let media_type = match path.extension().and_then(|ext| ext.to_str()) {
            Some("pdf") => AttachmentMediaType::Pdf,
            Some("png") => AttachmentMediaType::Png,
            Some("jpg") | Some("jpeg") => AttachmentMediaType::Jpeg,
            Some("txt") => AttachmentMediaType::Text,
            _ => {
                return Err(std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    "Unsupported file extension. Must be pdf, png, jpg, or txt",
                ));
            }
        };

        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .map(|name| name.to_string())
            .ok_or_else(|| {
                std::io::Error::new(std::io::ErrorKind::InvalidInput, "File name is not valid")
            })?;

        let mut file = File::open(path)?;
        let mut data = Vec::new();
        file.read_to_end(&mut data)?;

        Ok(Self {
            file_name,
            media_type,
            data,
        })
    }

    /// Returns the size of the attachment in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the attachment holds no bytes.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mime_strings() {
        assert_eq!(AttachmentMediaType::Pdf.as_mime(), "application/pdf");
        assert_eq!(AttachmentMediaType::Png.as_mime(), "image/png");
        assert_eq!(AttachmentMediaType::Jpeg.as_mime(), "image/jpeg");
        assert_eq!(AttachmentMediaType::Text.as_mime(), "text/plain");
    }

    #[test]
    fn unsupported_extension_is_invalid_input() {
        let err = Attachment::from_path("transcript.docx").unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::InvalidInput);
    }

    #[test]
    fn missing_extension_is_invalid_input() {
        let err = Attachment::from_path("transcript").unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::InvalidInput);
    }

    #[test]
    fn from_path_reads_bytes_and_name() {
        let dir = std::env::temp_dir().join("wayfinder_attachment_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("essay.txt");
        std::fs::write(&path, b"draft essay").unwrap();

        let attachment = Attachment::from_path(&path).unwrap();
        assert_eq!(attachment.file_name, "essay.txt");
        assert_eq!(attachment.media_type, AttachmentMediaType::Text);
        assert_eq!(attachment.data, b"draft essay");
        assert_eq!(attachment.len(), 11);
        assert!(!attachment.is_empty());

        std::fs::remove_dir_all(&dir).ok();
    }
}
