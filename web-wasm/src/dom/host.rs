use std::cell::RefCell;

use soil_search_common::{Page, PageHost};
use web_sys::{Document, Element};

use super::IdentifyBinding;

/// `#app-content` にページ断片を差し込むホスト
pub struct ShellHost {
    container: Element,
    document: Document,
    identify: RefCell<Option<IdentifyBinding>>,
}

impl ShellHost {
    pub fn new(document: Document, container: Element) -> Self {
        Self {
            container,
            document,
            identify: RefCell::new(None),
        }
    }
}

impl PageHost for ShellHost {
    fn replace_content(&self, html: &str) {
        self.container.set_inner_html(html);
    }

    fn mount(&self, page: Page) {
        if !page.requires_identify() {
            return;
        }
        match IdentifyBinding::bind(&self.document) {
            Ok(binding) => {
                self.identify.replace(Some(binding));
            }
            Err(e) => {
                gloo::console::error!("Failed to initialise plant identification:", e.to_string());
            }
        }
    }

    fn unmount(&self, _page: Page) {
        // dropでリスナー解除
        self.identify.take();
    }
}
