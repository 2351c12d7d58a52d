//! `lessons` - print the catalog once.

use tracing::warn;

use lesson_shop_storefront::{HttpLessonsApi, Result, ShopConfig, SortOrder, Storefront};

use crate::render;

/// Fetch and print the catalog.
///
/// With a query the backend search is used; if it fails the full catalog is
/// fetched and filtered locally instead.
///
/// # Errors
///
/// Returns an error if the catalog cannot be fetched at all.
pub async fn list(
    config: &ShopConfig,
    query: Option<&str>,
    sort: SortOrder,
    json: bool,
) -> Result<()> {
    let mut store = Storefront::new(HttpLessonsApi::new(config)?);

    match query.map(str::trim).filter(|q| !q.is_empty()) {
        Some(query) => {
            store.set_search_query(query);
            if !store.run_search(query).await {
                warn!(%query, "Search failed, filtering the full catalog locally");
                store.load().await?;
            }
        }
        None => store.load().await?,
    }

    store.set_sort(sort);
    let view = store.view();

    if json {
        render::lessons_json(&view.lessons)?;
    } else {
        render::lessons(&view.lessons);
    }
    Ok(())
}
