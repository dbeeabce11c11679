//! 静的ファイル配信
//!
//! ルートディレクトリ外に出るパスは400、存在しなければ404、読込失敗は500。

use std::path::{Component, Path, PathBuf};

use axum::{
    extract::State,
    http::{header, StatusCode, Uri},
    response::{IntoResponse, Response},
};

use crate::server::AppState;

pub const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";

pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

const CONTENT_TYPES: &[(&str, &str)] = &[
    ("html", HTML_CONTENT_TYPE),
    ("css", "text/css; charset=utf-8"),
    ("js", "application/javascript; charset=utf-8"),
    ("json", "application/json; charset=utf-8"),
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("webp", "image/webp"),
    ("svg", "image/svg+xml"),
    ("ico", "image/x-icon"),
    // クライアントバンドル
    ("wasm", "application/wasm"),
];

/// 拡張子からContent-Typeを決める
pub fn content_type_for(path: &Path) -> &'static str {
    let Some(ext) = path.extension().map(|e| e.to_string_lossy().to_lowercase()) else {
        return DEFAULT_CONTENT_TYPE;
    };
    CONTENT_TYPES
        .iter()
        .find(|(known, _)| *known == ext)
        .map(|(_, content_type)| *content_type)
        .unwrap_or(DEFAULT_CONTENT_TYPE)
}

/// ルート配下に正規化して結合する。ルート外に出る場合はNone
pub fn safe_join(root: &Path, target: &str) -> Option<PathBuf> {
    let mut joined = root.to_path_buf();
    let mut depth = 0usize;

    for component in Path::new(target.trim_start_matches('/')).components() {
        match component {
            Component::Normal(part) => {
                joined.push(part);
                depth += 1;
            }
            Component::CurDir => {}
            Component::ParentDir => {
                if depth == 0 {
                    return None;
                }
                joined.pop();
                depth -= 1;
            }
            Component::RootDir | Component::Prefix(_) => return None,
        }
    }

    Some(joined)
}

pub async fn serve_static(State(state): State<AppState>, uri: Uri) -> Response {
    let Ok(decoded) = urlencoding::decode(uri.path()) else {
        return plain(StatusCode::BAD_REQUEST);
    };
    let request_path = match decoded.as_ref() {
        "" | "/" => "/index.html",
        path => path,
    };

    let Some(file_path) = safe_join(&state.root, request_path) else {
        tracing::warn!(path = %request_path, "rejected path outside root");
        return plain(StatusCode::BAD_REQUEST);
    };

    let Ok(metadata) = tokio::fs::metadata(&file_path).await else {
        return plain(StatusCode::NOT_FOUND);
    };

    if metadata.is_dir() {
        return match tokio::fs::read(file_path.join("index.html")).await {
            Ok(data) => (StatusCode::OK, [(header::CONTENT_TYPE, HTML_CONTENT_TYPE)], data).into_response(),
            Err(_) => plain(StatusCode::NOT_FOUND),
        };
    }

    match tokio::fs::read(&file_path).await {
        Ok(data) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, content_type_for(&file_path))],
            data,
        )
            .into_response(),
        Err(e) => {
            tracing::error!(path = %file_path.display(), error = %e, "failed to read file");
            plain(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

fn plain(status: StatusCode) -> Response {
    let reason = status.canonical_reason().unwrap_or("Error");
    (status, reason).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_for_known_extensions() {
        assert_eq!(content_type_for(Path::new("index.html")), HTML_CONTENT_TYPE);
        assert_eq!(content_type_for(Path::new("photo.JPG")), "image/jpeg");
        assert_eq!(content_type_for(Path::new("pkg/app_bg.wasm")), "application/wasm");
    }

    #[test]
    fn test_content_type_default() {
        assert_eq!(content_type_for(Path::new("archive.tar.gz")), DEFAULT_CONTENT_TYPE);
        assert_eq!(content_type_for(Path::new("Makefile")), DEFAULT_CONTENT_TYPE);
    }

    #[test]
    fn test_safe_join_inside_root() {
        let root = Path::new("/srv/site");
        assert_eq!(
            safe_join(root, "/pages/soil-ai.html"),
            Some(PathBuf::from("/srv/site/pages/soil-ai.html"))
        );
        assert_eq!(
            safe_join(root, "/pages/../index.html"),
            Some(PathBuf::from("/srv/site/index.html"))
        );
        assert_eq!(safe_join(root, "/./a/./b"), Some(PathBuf::from("/srv/site/a/b")));
    }

    #[test]
    fn test_safe_join_rejects_escape() {
        let root = Path::new("/srv/site");
        assert_eq!(safe_join(root, "/../etc/passwd"), None);
        assert_eq!(safe_join(root, "/pages/../../secret"), None);
    }
}
