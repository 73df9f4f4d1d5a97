//! Asset loading: photo, signature and logo payloads attached from a file
//! path or URL, wrapped into the inline form the record carries.

use crate::error::AppError;
use crate::record::ImageAsset;
use log::debug;
use std::io::Read;

/// Load an image from a local path or an http(s) URL and wrap it as an
/// inline record asset. The bytes are validated as a decodable image up
/// front so a bad file fails here, not mid-export.
pub fn load_image_asset(source: &str) -> Result<ImageAsset, AppError> {
    let bytes = if source.starts_with("http://") || source.starts_with("https://") {
        let response = ureq::get(source)
            .call()
            .map_err(|e| AppError::AssetError(format!("failed to fetch URL: {}", e)))?;
        let mut bytes = Vec::new();
        response
            .into_reader()
            .read_to_end(&mut bytes)
            .map_err(|e| AppError::AssetError(format!("failed to read response: {}", e)))?;
        bytes
    } else {
        std::fs::read(source).map_err(|e| AppError::AssetError(format!("{}: {}", source, e)))?
    };

    image::load_from_memory(&bytes)
        .map_err(|e| AppError::AssetError(format!("failed to decode image: {}", e)))?;
    debug!("loaded asset {} ({} bytes)", source, bytes.len());
    Ok(ImageAsset::from_bytes(&bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_an_asset_error() {
        let err = load_image_asset("/nonexistent/photo.png").unwrap_err();
        assert!(matches!(err, AppError::AssetError(_)));
    }

    #[test]
    fn non_image_file_is_an_asset_error() {
        let dir = std::env::temp_dir().join("idcard-pdf-asset-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("not-an-image.txt");
        std::fs::write(&path, b"plain text").unwrap();
        let err = load_image_asset(path.to_str().unwrap()).unwrap_err();
        assert!(matches!(err, AppError::AssetError(_)));
    }
}
