//! Rendered public pages keyed by page path. Writes drop stale entries
//! through [`CacheInvalidator`]; entries also expire after a TTL.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use configs::CacheConfig;
use moka::future::Cache;
use serde_json::Value;
use tracing::debug;

use service::CacheInvalidator;

use crate::metrics::record_cache;

pub struct PageCache {
    pages: Cache<String, Arc<Value>>,
}

/// A freshly rendered page body and whether it may be cached.
pub struct Rendered {
    pub body: Value,
    pub cacheable: bool,
}

impl PageCache {
    pub fn new(cfg: &CacheConfig) -> Self {
        let pages = Cache::builder()
            .max_capacity(cfg.max_pages)
            .time_to_live(Duration::from_secs(cfg.page_ttl_secs))
            .build();
        Self { pages }
    }

    /// Serve `page` from cache, or await `render` and keep its result when
    /// it is cacheable.
    pub async fn get_or_render<F, E>(&self, page: &str, render: F) -> Result<Arc<Value>, E>
    where
        F: Future<Output = Result<Rendered, E>>,
    {
        if let Some(hit) = self.pages.get(page).await {
            record_cache("hit");
            return Ok(hit);
        }
        record_cache("miss");
        let rendered = render.await?;
        let body = Arc::new(rendered.body);
        if rendered.cacheable {
            self.pages.insert(page.to_string(), Arc::clone(&body)).await;
        }
        Ok(body)
    }

    pub async fn contains(&self, page: &str) -> bool { self.pages.get(page).await.is_some() }
}

#[async_trait]
impl CacheInvalidator for PageCache {
    async fn invalidate(&self, page: &str) {
        debug!(%page, "invalidating cached page");
        record_cache("invalidate");
        self.pages.invalidate(page).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn cache() -> PageCache { PageCache::new(&CacheConfig::default()) }

    async fn render(n: i32, cacheable: bool) -> Result<Rendered, ()> {
        Ok(Rendered { body: json!({ "n": n }), cacheable })
    }

    #[tokio::test]
    async fn second_render_is_served_from_cache() {
        let cache = cache();
        let first = cache.get_or_render("/projects", render(1, true)).await.unwrap();
        let second = cache.get_or_render("/projects", render(2, true)).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(second["n"], 1);
    }

    #[tokio::test]
    async fn invalidation_forces_a_fresh_render() {
        let cache = cache();
        cache.get_or_render("/", render(1, true)).await.unwrap();
        cache.invalidate("/").await;
        let fresh = cache.get_or_render("/", render(2, true)).await.unwrap();
        assert_eq!(fresh["n"], 2);
    }

    #[tokio::test]
    async fn uncacheable_pages_are_not_kept() {
        let cache = cache();
        cache.get_or_render("/blog", render(1, false)).await.unwrap();
        assert!(!cache.contains("/blog").await);
    }
}
