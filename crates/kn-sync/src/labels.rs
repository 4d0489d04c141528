//! Label resolver: read-through cache from label name to container page.

use std::collections::{HashMap, HashSet};

use kn_core::NotionTarget;
use kn_core::entities::LabelRef;
use kn_core::errors::TargetError;
use kn_core::ids::{ContainerId, PageId};

/// Resolves label names to container pages under the root.
///
/// Lookup order: the in-run cache, then an existing child page of the root
/// with the same title, then a newly created page. The cache is the only
/// source of truth for the run, so a name resolves to one container however
/// often it is asked for.
///
/// Imported item pages live under the root too. Pages registered with
/// [`exclude_item_page`](Self::exclude_item_page) are never taken as
/// containers, even when their title matches a label.
#[derive(Debug)]
pub struct LabelResolver {
    root: ContainerId,
    cache: HashMap<String, ContainerId>,
    item_pages: HashSet<String>,
    created: usize,
}

impl LabelResolver {
    #[must_use]
    pub fn new(root: ContainerId) -> Self {
        Self {
            root,
            cache: HashMap::new(),
            item_pages: HashSet::new(),
            created: 0,
        }
    }

    #[must_use]
    pub const fn root(&self) -> &ContainerId {
        &self.root
    }

    /// # Errors
    ///
    /// Returns the target's error if lookup or creation fails. Nothing is
    /// cached on failure, so a later item may retry the same label.
    pub async fn resolve<T: NotionTarget>(
        &mut self,
        target: &T,
        label: &LabelRef,
    ) -> Result<ContainerId, TargetError> {
        self.resolve_name(target, &label.name).await
    }

    /// Resolve a container by title. Also used for the kind containers.
    ///
    /// # Errors
    ///
    /// See [`resolve`](Self::resolve).
    pub async fn resolve_name<T: NotionTarget>(
        &mut self,
        target: &T,
        name: &str,
    ) -> Result<ContainerId, TargetError> {
        if let Some(id) = self.cache.get(name) {
            return Ok(id.clone());
        }

        let existing = target
            .find_child_pages(&self.root, name)
            .await?
            .into_iter()
            .find(|candidate| !self.item_pages.contains(candidate.as_str()));

        let id = match existing {
            Some(existing) => {
                tracing::debug!(label = name, container = %existing, "found existing container");
                existing
            }
            None => {
                let page = target.create_page(&self.root, name).await?;
                self.created += 1;
                tracing::info!(label = name, container = %page, "created container");
                ContainerId::from(page)
            }
        };

        self.cache.insert(name.to_string(), id.clone());
        Ok(id)
    }

    /// Mark `page` as an imported item page, never a container.
    pub fn exclude_item_page(&mut self, page: &PageId) {
        self.item_pages.insert(page.as_str().to_string());
    }

    #[must_use]
    pub fn is_item_page(&self, id: &str) -> bool {
        self.item_pages.contains(id)
    }

    #[must_use]
    pub fn cached(&self, name: &str) -> Option<&ContainerId> {
        self.cache.get(name)
    }

    /// Containers created during this run.
    #[must_use]
    pub const fn created(&self) -> usize {
        self.created
    }
}
