//! Soil Search Common Library
//!
//! サーバーとWeb(WASM)で共有される型とロジック:
//! ページルート、ルーター、植物判定ワークフロー、結果の描画

pub mod data_url;
pub mod error;
pub mod identify;
pub mod pages;
pub mod render;
pub mod router;
pub mod workflow;

pub use data_url::{extract_base64_from_data_url, strip_data_url_prefix};
pub use error::{Error, Result};
pub use identify::{Classification, Details, IdentifyRequest, Suggestion, SuggestionView};
pub use pages::{extract_fragment, Page};
pub use render::ResultView;
pub use router::{Navigation, PageHost, PageLoader, Router};
pub use workflow::{
    submit, FileCandidate, IdentifyClient, IdentifyWorkflow, SelectionError, WorkflowState,
    WorkflowView, MAX_IMAGE_BYTES,
};
