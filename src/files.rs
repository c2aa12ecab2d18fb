//! ローカル画像ファイルの読み込み
//!
//! ブラウザの `file.type` に相当するMIMEタイプは、ファイル内容から判定する。

use crate::error::{JewelSearchError, Result};
use jewel_search_common::{is_image_mime, SelectedFile};
use std::path::Path;

/// 画像ファイルを読み込んで選択ファイルにする
///
/// 内容から画像形式を判定できない場合は `NotAnImage`。
pub fn load_image(path: &Path) -> Result<SelectedFile<Vec<u8>>> {
    if !path.is_file() {
        return Err(JewelSearchError::FileNotFound(path.display().to_string()));
    }

    let bytes = std::fs::read(path)?;
    let mime = detect_mime(&bytes)
        .ok_or_else(|| JewelSearchError::NotAnImage(path.display().to_string()))?;

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "upload".to_string());

    Ok(SelectedFile::new(bytes, name, mime))
}

/// バイト列から画像MIMEタイプを判定する
pub fn detect_mime(bytes: &[u8]) -> Option<&'static str> {
    image::guess_format(bytes)
        .ok()
        .map(|format| format.to_mime_type())
        .filter(|mime| is_image_mime(mime))
}
