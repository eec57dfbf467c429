use std::fs;
use std::path::Path;

use base64::{Engine as _, engine::general_purpose::STANDARD};
use sha3::{Digest, Sha3_256};

use crate::error::ApiError;

/// Decode a `data:image/...;base64,...` payload and persist it under the
/// media root. The stored name is derived from the content hash, so
/// re-uploading the same image is a no-op. Returns the public URL path.
pub fn store_image(media_root: &str, data_uri: &str) -> Result<String, ApiError> {
    let (header, payload) = data_uri
        .split_once(";base64,")
        .ok_or_else(|| ApiError::ValidationError("Invalid image payload".to_string()))?;

    let extension = match header {
        "data:image/png" => "png",
        "data:image/jpeg" | "data:image/jpg" => "jpg",
        "data:image/gif" => "gif",
        "data:image/webp" => "webp",
        _ => {
            return Err(ApiError::ValidationError(
                "Unsupported image format".to_string(),
            ));
        }
    };

    let bytes = STANDARD
        .decode(payload)
        .map_err(|_| ApiError::ValidationError("Invalid image payload".to_string()))?;

    let digest = Sha3_256::digest(&bytes);
    let name = format!(
        "{}.{extension}",
        digest[..16]
            .iter()
            .map(|b| format!("{b:02x}"))
            .collect::<String>()
    );

    let dir = Path::new(media_root).join("recipes");
    fs::create_dir_all(&dir).map_err(|e| ApiError::InternalError(e.to_string()))?;
    fs::write(dir.join(&name), &bytes).map_err(|e| ApiError::InternalError(e.to_string()))?;

    Ok(format!("/media/recipes/{name}"))
}
