mod common;

use std::sync::Arc;

use budget_client::{
    ClientError, ListState, QueryKey, Resource,
    queries::list_key,
    query::{TRANSACTION_FILTERS, FilterValue},
};
use common::{Backend, SLOW_SEARCH, TOTAL_TRANSACTIONS, query_client_for, spawn_backend};

#[tokio::test]
async fn concurrent_fetches_share_one_request() {
    let (addr, backend) = spawn_backend().await;
    let queries = query_client_for(addr);
    let state = ListState::new().with_filter(
        &TRANSACTION_FILTERS,
        "searchQuery",
        Some(FilterValue::from(SLOW_SEARCH)),
    );

    let (a, b) = tokio::join!(queries.transactions(&state), queries.transactions(&state));
    let (a, b) = (a.unwrap(), b.unwrap());

    assert!(Arc::ptr_eq(&a, &b));
    assert_eq!(Backend::count(&backend.transaction_lists), 1);
    assert_eq!(a.total, TOTAL_TRANSACTIONS);
    assert_eq!(a.items.len(), 20);
}

#[tokio::test]
async fn cached_page_is_served_without_a_request() {
    let (addr, backend) = spawn_backend().await;
    let queries = query_client_for(addr);
    let state = ListState::new().with_page(3);

    let first = queries.transactions(&state).await.unwrap();
    let second = queries.transactions(&state).await.unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(Backend::count(&backend.transaction_lists), 1);
    // Last page holds the remainder.
    assert_eq!(first.items.len(), 5);
    assert_eq!(first.items[0].id, 41);
}

#[tokio::test]
async fn page_past_the_end_is_empty_not_an_error() {
    let (addr, _backend) = spawn_backend().await;
    let queries = query_client_for(addr);

    let page = queries
        .transactions(&ListState::new().with_page(9))
        .await
        .unwrap();
    assert!(page.is_empty());
    assert_eq!(page.total, TOTAL_TRANSACTIONS);
}

#[tokio::test]
async fn failed_fetch_leaves_entry_absent_and_retries() {
    let (addr, backend) = spawn_backend().await;
    let queries = query_client_for(addr);
    let key = QueryKey::new(Resource::BehaviorInsights);
    backend
        .fail_next_insights
        .store(true, std::sync::atomic::Ordering::SeqCst);

    let err = queries.behavior_insights().await.unwrap_err();
    assert!(matches!(err.inner(), ClientError::Server(msg) if msg == "analytics unavailable"));
    assert!(!queries.cache().contains(&key));

    let insights = queries.behavior_insights().await.unwrap();
    assert_eq!(insights.most_active_window(), "14:00 - 15:00");
    assert_eq!(insights.most_active_day_name(), Some("Wednesday"));
    assert!(queries.cache().contains(&key));
    assert_eq!(Backend::count(&backend.insight_calls), 2);
}

/// In-flight requests are not cancelled when the view moves on. A slow
/// response for a superseded page still lands, under its own key only.
#[tokio::test]
async fn superseded_request_is_not_cancelled_and_keeps_its_own_key() {
    let (addr, backend) = spawn_backend().await;
    let queries = query_client_for(addr);
    let slow = ListState::new().with_filter(
        &TRANSACTION_FILTERS,
        "searchQuery",
        Some(FilterValue::from(SLOW_SEARCH)),
    );
    let current = ListState::new().with_page(2);

    let background = tokio::spawn({
        let queries = queries.clone();
        let slow = slow.clone();
        async move { queries.transactions(&slow).await }
    });
    tokio::time::sleep(std::time::Duration::from_millis(20)).await;

    let shown = queries.transactions(&current).await.unwrap();
    assert_eq!(shown.items[0].id, 21);

    let late = background.await.unwrap().unwrap();
    assert_eq!(late.items[0].id, 1);
    assert_eq!(Backend::count(&backend.transaction_lists), 2);

    let cache = queries.cache();
    let current_entry = cache
        .get::<api_types::page::Page<api_types::transaction::Transaction>>(&list_key(
            Resource::Transactions,
            &current,
        ))
        .unwrap();
    assert!(Arc::ptr_eq(&current_entry.value, &shown));
    assert!(cache.contains(&list_key(Resource::Transactions, &slow)));
}

#[tokio::test]
async fn invalidation_forces_a_refetch() {
    let (addr, backend) = spawn_backend().await;
    let queries = query_client_for(addr);
    let state = ListState::new();

    queries.transactions(&state).await.unwrap();
    queries.transactions(&state.with_page(2)).await.unwrap();
    queries.category_spending().await.unwrap();

    assert_eq!(queries.cache().invalidate(Resource::Transactions), 2);
    assert_eq!(queries.cache().len(), 1);

    queries.transactions(&state).await.unwrap();
    assert_eq!(Backend::count(&backend.transaction_lists), 3);
}

/// A fetch started after an invalidation must not join a request that began
/// before it; it runs its own and that result is the one kept.
#[tokio::test]
async fn fetch_after_invalidation_does_not_join_the_older_request() {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use budget_client::QueryCache;

    let cache = Arc::new(QueryCache::new());
    let key = QueryKey::new(Resource::Transactions);
    let calls = Arc::new(AtomicUsize::new(0));

    let before = tokio::spawn({
        let cache = Arc::clone(&cache);
        let key = key.clone();
        let calls = Arc::clone(&calls);
        async move {
            cache
                .fetch(key, || async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(100)).await;
                    Ok::<_, ClientError>("pre-mutation".to_string())
                })
                .await
        }
    });
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(cache.is_fetching(&key));

    cache.invalidate(Resource::Transactions);
    let after = cache
        .fetch(key.clone(), || {
            let calls = Arc::clone(&calls);
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok::<_, ClientError>("post-mutation".to_string())
            }
        })
        .await
        .unwrap();
    assert_eq!(after.as_str(), "post-mutation");
    assert_eq!(calls.load(Ordering::SeqCst), 2);

    // The older request still answers its own caller but neither stores its
    // result nor clears the newer marker.
    let old = before.await.unwrap().unwrap();
    assert_eq!(old.as_str(), "pre-mutation");
    let cached = cache.get::<String>(&key).unwrap();
    assert_eq!(cached.value.as_str(), "post-mutation");
    assert!(!cache.is_fetching(&key));
}
