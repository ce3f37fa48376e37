mod common;

use api_types::{category::CategoryListParams, item::ItemListParams};
use budget_client::{Client, ClientError, ListState};
use common::{ITEM_ID, client_for, query_client_for, spawn_backend};
use uuid::Uuid;

#[tokio::test]
async fn every_list_envelope_normalizes_to_a_page() {
    let (addr, _backend) = spawn_backend().await;
    let client = client_for(addr);

    // `{data, count}`
    let items = client
        .items_list(&ItemListParams { skip: 5, limit: 5 })
        .await
        .unwrap();
    assert_eq!(items.total, 7);
    assert_eq!(items.items[0].title, "item at 5");
    assert_eq!(items.items[0].tags.len(), 4);

    // bare array
    let categories = client
        .categories_list(&CategoryListParams {
            skip: 0,
            limit: 20,
            search_query: None,
        })
        .await
        .unwrap();
    assert_eq!(categories.total, 2);
    assert_eq!(categories.items[1].name, "Rent");

    // A bare array that fills the window may have more behind it.
    let full = client
        .categories_list(&CategoryListParams {
            skip: 0,
            limit: 2,
            search_query: None,
        })
        .await
        .unwrap();
    assert_eq!(full.total, 3);

    // `{items, total}` plus a bare statistics array
    let spending = client.category_spending(10).await.unwrap();
    assert_eq!(spending.len(), 2);
}

#[tokio::test]
async fn items_query_uses_its_own_page_size() {
    let (addr, _backend) = spawn_backend().await;
    let queries = query_client_for(addr);
    let page = queries
        .items(&ListState::new().with_page(2))
        .await
        .unwrap();
    assert_eq!(page.items[0].title, "item at 5");
}

#[tokio::test]
async fn comments_are_fetched_per_item() {
    let (addr, _backend) = spawn_backend().await;
    let queries = query_client_for(addr);
    let item_id = Uuid::parse_str(ITEM_ID).unwrap();

    let comments = queries.comments(item_id).await.unwrap();
    assert_eq!(comments.total, 1);
    assert!(!comments.items[0].is_edited());

    let missing = queries.comments(Uuid::nil()).await.unwrap_err();
    assert!(matches!(missing.inner(), ClientError::NotFound(_)));
}

#[tokio::test]
async fn bearer_token_is_sent() {
    let (addr, _backend) = spawn_backend().await;

    let user = client_for(addr).current_user().await.unwrap();
    assert_eq!(user.email, "ada@example.com");

    let anonymous = Client::new(&format!("http://{addr}/api/v1/")).unwrap();
    let err = anonymous.current_user().await.unwrap_err();
    assert!(matches!(err, ClientError::Unauthorized(_)));
}

#[tokio::test]
async fn delete_maps_status_codes() {
    let (addr, _backend) = spawn_backend().await;
    let client = client_for(addr);

    client.transaction_delete(7).await.unwrap();

    let err = client.transaction_delete(404).await.unwrap_err();
    assert!(matches!(err, ClientError::NotFound(_)));
    assert_eq!(err.user_message(), "Transaction not found");
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = Client::new(&format!("http://{addr}/api/v1"))
        .unwrap()
        .behavior_insights()
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Transport(_)));
    assert_eq!(err.user_message(), "Something went wrong.");
}
