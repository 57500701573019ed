use async_trait::async_trait;
use common::{Error, Result};
use futures::FutureExt;
use futures::future::BoxFuture;
use tracing::debug;

use crate::storage::s3::PrefixLister;

/// Default recursion guard. Hitting it means the storage layout is deeper
/// than the expected year/month/day folders, so the walk aborts instead of
/// registering partitions from the wrong depth.
pub const DEFAULT_MAX_DEPTH: u32 = 10;

const DELIMITER: &str = "/";

/// Invoked once per leaf prefix, in listing order.
#[async_trait]
pub trait LeafHandler: Send + Sync {
    async fn on_leaf(&self, prefix: &str) -> Result<()>;
}

/// Depth-first walk over the "folder" prefixes under `prefix`.
///
/// Each level issues one delimiter-segmented listing, which returns only the
/// next path segment rather than the whole subtree. A prefix with no child
/// prefixes is a leaf and is handed to `handler`; any deeper level recurses
/// with one less unit of depth. Leaves are visited serially, so handler
/// failures abort the traversal with no partial-success reporting.
pub async fn walk(
    lister: &dyn PrefixLister,
    bucket: &str,
    prefix: &str,
    handler: &dyn LeafHandler,
    max_depth: u32,
) -> Result<()> {
    walk_level(lister, bucket, prefix.to_string(), handler, max_depth).await
}

// Async fns cannot recurse unboxed, hence the BoxFuture indirection.
fn walk_level<'a>(
    lister: &'a dyn PrefixLister,
    bucket: &'a str,
    prefix: String,
    handler: &'a dyn LeafHandler,
    depth: u32,
) -> BoxFuture<'a, Result<()>> {
    async move {
        if depth == 0 {
            return Err(Error::MaxDepthExceeded(prefix));
        }

        let children = lister
            .list_child_prefixes(bucket, &prefix, DELIMITER)
            .await?;

        if children.is_empty() {
            debug!(prefix = %prefix, "Reached leaf prefix");
            return handler.on_leaf(&prefix).await;
        }

        for child in children {
            walk_level(lister, bucket, child, handler, depth - 1).await?;
        }

        Ok(())
    }
    .boxed()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    struct TreeLister {
        children: HashMap<String, Vec<String>>,
    }

    impl TreeLister {
        fn new(edges: Vec<(&str, Vec<&str>)>) -> Self {
            let children = edges
                .into_iter()
                .map(|(parent, kids)| {
                    (
                        parent.to_string(),
                        kids.into_iter().map(|k| k.to_string()).collect(),
                    )
                })
                .collect();
            Self { children }
        }
    }

    #[async_trait]
    impl PrefixLister for TreeLister {
        async fn list_child_prefixes(
            &self,
            _bucket: &str,
            prefix: &str,
            _delimiter: &str,
        ) -> Result<Vec<String>> {
            Ok(self.children.get(prefix).cloned().unwrap_or_default())
        }
    }

    #[derive(Default)]
    struct CollectingHandler {
        leaves: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl LeafHandler for CollectingHandler {
        async fn on_leaf(&self, prefix: &str) -> Result<()> {
            self.leaves.lock().unwrap().push(prefix.to_string());
            Ok(())
        }
    }

    fn date_tree() -> TreeLister {
        TreeLister::new(vec![
            ("data/", vec!["data/2022/", "data/2023/"]),
            ("data/2022/", vec!["data/2022/12/"]),
            ("data/2022/12/", vec!["data/2022/12/01/", "data/2022/12/02/"]),
            ("data/2023/", vec!["data/2023/01/"]),
            ("data/2023/01/", vec!["data/2023/01/15/"]),
        ])
    }

    #[tokio::test]
    async fn visits_every_leaf_in_listing_order() {
        let lister = date_tree();
        let handler = CollectingHandler::default();

        walk(&lister, "b", "data/", &handler, DEFAULT_MAX_DEPTH)
            .await
            .unwrap();

        assert_eq!(
            *handler.leaves.lock().unwrap(),
            vec![
                "data/2022/12/01/",
                "data/2022/12/02/",
                "data/2023/01/15/",
            ]
        );
    }

    #[tokio::test]
    async fn depth_exhaustion_is_fatal_before_any_leaf() {
        let lister = date_tree();
        let handler = CollectingHandler::default();

        let result = walk(&lister, "b", "data/", &handler, 1).await;

        assert!(matches!(result, Err(Error::MaxDepthExceeded(_))));
        assert!(handler.leaves.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn childless_starting_prefix_is_itself_a_leaf() {
        let lister = TreeLister::new(Vec::new());
        let handler = CollectingHandler::default();

        walk(&lister, "b", "data/", &handler, DEFAULT_MAX_DEPTH)
            .await
            .unwrap();

        assert_eq!(*handler.leaves.lock().unwrap(), vec!["data/"]);
    }

    struct FailingHandler;

    #[async_trait]
    impl LeafHandler for FailingHandler {
        async fn on_leaf(&self, prefix: &str) -> Result<()> {
            Err(Error::Storage(format!("boom at {}", prefix)))
        }
    }

    #[tokio::test]
    async fn handler_failure_aborts_the_traversal() {
        let lister = date_tree();

        let result = walk(&lister, "b", "data/", &FailingHandler, DEFAULT_MAX_DEPTH).await;

        assert!(matches!(result, Err(Error::Storage(_))));
    }
}
