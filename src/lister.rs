use std::rc::Rc;

use crate::api::FileShareApi;
use crate::view::{FileListView, ListItem, Placeholder};

/// Fetches the shared file set and renders it into a list view
pub struct FileLister<A> {
    api: Rc<A>,
    view: Rc<dyn FileListView>,
}

impl<A: FileShareApi> FileLister<A> {
    pub fn new(api: Rc<A>, view: Rc<dyn FileListView>) -> Self {
        Self { api, view }
    }

    /// Re-fetches the list and replaces whatever was shown. Never fails: a fetch
    /// error is logged and rendered as a single placeholder row.
    pub async fn refresh(&self) {
        let items = match self.api.list_files().await {
            Ok(files) if files.is_empty() => vec![ListItem::Placeholder(Placeholder::NoFiles)],
            Ok(files) => files
                .into_iter()
                .map(|file| ListItem::File { href: file.download_href(), name: file.name })
                .collect(),
            Err(e) => {
                tracing::error!("Failed to load file list: {}", e);
                vec![ListItem::Placeholder(Placeholder::Error)]
            }
        };

        tracing::debug!(rows = items.len(), "rendering file list");
        self.view.replace(items);
    }
}
