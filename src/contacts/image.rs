use std::path::{Path, PathBuf};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Read a file and encode it as a `data:` URL suitable for an inline document field.
/// No size or type checks are made.
pub fn encode_file(path: &Path) -> Result<String, ImageError> {
    let bytes = std::fs::read(path).map_err(|source| ImageError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(encode_bytes(&bytes, mime_for(path)))
}

pub fn encode_bytes(bytes: &[u8], mime: &str) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

fn mime_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        Some("bmp") => "image/bmp",
        _ => "application/octet-stream",
    }
}

/// Approximate decoded size of a data URL payload, for display.
pub fn payload_len(data_url: &str) -> usize {
    let payload = data_url
        .split_once(',')
        .map(|(_, p)| p)
        .unwrap_or(data_url);
    let padding = payload.bytes().rev().take_while(|b| *b == b'=').count();
    (payload.len() / 4 * 3).saturating_sub(padding)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_bytes_with_mime_prefix() {
        assert_eq!(encode_bytes(b"hi", "image/png"), "data:image/png;base64,aGk=");
    }

    #[test]
    fn mime_from_extension() {
        assert_eq!(mime_for(Path::new("a/photo.JPG")), "image/jpeg");
        assert_eq!(mime_for(Path::new("scan.webp")), "image/webp");
        assert_eq!(mime_for(Path::new("README")), "application/octet-stream");
    }

    #[test]
    fn encode_file_reads_from_disk() {
        let file = tempfile::Builder::new().suffix(".png").tempfile().unwrap();
        std::fs::write(file.path(), [0x89, b'P', b'N', b'G']).unwrap();
        assert_eq!(encode_file(file.path()).unwrap(), "data:image/png;base64,iVBORw==");
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("desk-image-does-not-exist.png");
        let err = encode_file(&path).unwrap_err();
        assert!(err.to_string().contains("desk-image-does-not-exist.png"));
    }

    #[test]
    fn payload_len_accounts_for_padding() {
        assert_eq!(payload_len("data:image/png;base64,aGk="), 2);
        assert_eq!(payload_len("data:image/png;base64,iVBORw=="), 4);
        assert_eq!(payload_len(""), 0);
    }
}
