//! ページ断片の取得

use async_trait::async_trait;
use soil_search_common::{PageLoader, Result};
use web_sys::Request;

use super::{fetch_text, js_error};

#[derive(Debug, Clone, Copy, Default)]
pub struct FetchPageLoader;

#[async_trait(?Send)]
impl PageLoader for FetchPageLoader {
    async fn load(&self, path: &str) -> Result<String> {
        let request = Request::new_with_str(path).map_err(js_error)?;
        fetch_text(&request).await
    }
}
