mod common;

use budget_client::{
    ListState, MutationDialog, MutationStatus, NoticeLevel, Resource,
    forms::{Confirm, TransactionForm},
    mutation::{CREATE_TRANSACTION, DELETE_TRANSACTION, SubmitError},
};
use common::{Backend, query_client_for, spawn_backend};

fn filled(amount: &str) -> TransactionForm {
    TransactionForm {
        amount: amount.to_string(),
        category_id: Some(1),
        transaction_date: "2024-03-02".to_string(),
        ..TransactionForm::default()
    }
}

#[tokio::test]
async fn server_rejection_keeps_dialog_open_and_invalidates() {
    let (addr, backend) = spawn_backend().await;
    let queries = query_client_for(addr);
    queries.transactions(&ListState::new()).await.unwrap();
    queries.transactions(&ListState::new().with_page(2)).await.unwrap();
    queries.category_spending().await.unwrap();
    assert_eq!(queries.cache().len(), 3);

    let mut dialog = MutationDialog::new(CREATE_TRANSACTION);
    dialog.open_with(filled("5000"));
    let client = queries.client().clone();
    let settlement = dialog
        .submit(queries.cache(), |payload| async move {
            client.transaction_create(&payload).await
        })
        .await
        .unwrap();

    assert_eq!(settlement.notice.level, NoticeLevel::Error);
    assert_eq!(settlement.notice.message, "Amount exceeds the limit");
    assert!(!settlement.closed);
    assert!(dialog.is_open());
    assert!(dialog.can_submit());
    assert_eq!(dialog.form().amount, "5000");
    assert_eq!(
        dialog.status(),
        &MutationStatus::Error("Amount exceeds the limit".to_string())
    );
    assert!(settlement.invalidated.contains(&(Resource::Transactions, 2)));
    assert!(settlement.invalidated.contains(&(Resource::CategorySpending, 1)));
    assert!(queries.cache().is_empty());

    // Corrected and resubmitted from the same dialog.
    dialog.form_mut().amount = "50".to_string();
    let client = queries.client().clone();
    let settlement = dialog
        .submit(queries.cache(), |payload| async move {
            client.transaction_create(&payload).await
        })
        .await
        .unwrap();
    assert!(settlement.succeeded());
    assert!(!dialog.is_open());
    assert_eq!(Backend::count(&backend.transaction_creates), 2);
}

#[tokio::test]
async fn invalid_form_never_reaches_the_server() {
    let (addr, backend) = spawn_backend().await;
    let queries = query_client_for(addr);

    let mut dialog = MutationDialog::new(CREATE_TRANSACTION);
    dialog.open_with(TransactionForm {
        category_id: None,
        ..filled("12")
    });
    let client = queries.client().clone();
    let err = dialog
        .submit(queries.cache(), |payload| async move {
            client.transaction_create(&payload).await
        })
        .await
        .unwrap_err();

    let errors = match err {
        SubmitError::Invalid(errors) => errors,
        other => panic!("expected validation errors, got {other:?}"),
    };
    assert_eq!(errors.for_field("category_id"), Some("Category is required."));
    assert_eq!(dialog.status(), &MutationStatus::Idle);
    assert_eq!(Backend::count(&backend.transaction_creates), 0);
}

#[tokio::test]
async fn delete_settles_through_the_same_flow() {
    let (addr, _backend) = spawn_backend().await;
    let queries = query_client_for(addr);
    queries.transactions(&ListState::new()).await.unwrap();

    let mut dialog: MutationDialog<Confirm> = MutationDialog::new(DELETE_TRANSACTION);
    dialog.open();
    let client = queries.client().clone();
    let settlement = dialog
        .submit(queries.cache(), |()| async move { client.transaction_delete(3).await })
        .await
        .unwrap();

    assert!(settlement.succeeded());
    assert_eq!(settlement.notice.message, "Transaction deleted successfully.");
    assert!(queries.cache().is_empty());
}
