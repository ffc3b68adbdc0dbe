//! Documents submitted for extraction.

use std::path::Path;

use base64::Engine;

/// Media type accepted for extraction.
pub const PDF_MEDIA_TYPE: &str = "application/pdf";

/// Media type declared by a file's extension, without reading the file.
pub fn media_type_of(path: &Path) -> String {
    mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}

/// A file picked by the user, with its declared media type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// File name as shown in the selection list.
    pub name: String,
    /// Declared media type (e.g. `application/pdf`).
    pub media_type: String,
    /// Raw file contents.
    pub data: Vec<u8>,
}

impl Document {
    /// Create a document from in-memory contents.
    pub fn new(name: impl Into<String>, media_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.into(),
            data,
        }
    }

    /// Read a document from disk, declaring its media type from the file extension.
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let data = std::fs::read(path)?;
        let media_type = media_type_of(path);
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();

        Ok(Self::new(name, media_type, data))
    }

    /// Whether the declared media type is PDF.
    pub fn is_pdf(&self) -> bool {
        self.media_type == PDF_MEDIA_TYPE
    }

    /// Standard base64 encoding of the contents, as sent to the provider.
    pub fn to_base64(&self) -> String {
        base64::engine::general_purpose::STANDARD.encode(&self.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_media_type_from_extension() {
        let dir = TempDir::new().unwrap();
        let pdf = dir.path().join("holerite.pdf");
        let txt = dir.path().join("notes.txt");
        fs::write(&pdf, b"%PDF-1.7").unwrap();
        fs::write(&txt, b"hello").unwrap();

        let doc = Document::from_path(&pdf).unwrap();
        assert_eq!(doc.name, "holerite.pdf");
        assert!(doc.is_pdf());

        let doc = Document::from_path(&txt).unwrap();
        assert_eq!(doc.media_type, "text/plain");
        assert!(!doc.is_pdf());
    }

    #[test]
    fn test_media_type_of_does_not_touch_the_file() {
        let missing = Path::new("/nonexistent/folha/holerite.pdf");
        assert_eq!(media_type_of(missing), PDF_MEDIA_TYPE);
        assert_eq!(media_type_of(Path::new("scan.png")), "image/png");
        assert_eq!(media_type_of(Path::new("README")), "application/octet-stream");
    }

    #[test]
    fn test_base64_encoding() {
        let doc = Document::new("a.pdf", PDF_MEDIA_TYPE, b"%PDF".to_vec());
        assert_eq!(doc.to_base64(), "JVBERg==");
    }
}
