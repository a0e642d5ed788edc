//! Integration tests for the quotation repository.

mod common;

use std::collections::HashSet;

use futures::future::join_all;
use quotedesk_core::numbering::extract_sequence;
use quotedesk_core::quotation::{
    LineItem, LineItemInput, NewQuotation, NewQuotationInput, QuotationDefaults, QuotationError,
    QuotationStatus, QuotationUpdateInput, VatPercentage,
};
use quotedesk_db::QuotationRepository;
use quotedesk_db::repositories::{QuotationFilter, QuotationRepoError};
use quotedesk_shared::types::{CustomerId, PageRequest};
use rust_decimal_macros::dec;
use uuid::Uuid;

fn defaults() -> QuotationDefaults {
    QuotationDefaults {
        vat_percentage: VatPercentage::DEFAULT,
        prefix: "CRY".to_string(),
        terms: "Payment: 50% advance".to_string(),
    }
}

fn glass_and_aluminum(customer_id: Uuid) -> NewQuotation {
    NewQuotation::new(
        NewQuotationInput {
            customer_id: CustomerId(customer_id),
            project_name: "Villa Facade".to_string(),
            site_location: Some("Jumeirah".to_string()),
            status: None,
            vat_percentage: None,
            notes: None,
            terms: None,
            items: vec![
                LineItemInput {
                    scope_of_work: "12mm Clear Tempered Glass".to_string(),
                    description: None,
                    quantity: dec!(10),
                    rate: dec!(280.00),
                    vat_rate: None,
                    sort_order: None,
                },
                LineItemInput {
                    scope_of_work: "Aluminum Profile System".to_string(),
                    description: Some("Powder coated".to_string()),
                    quantity: dec!(5),
                    rate: dec!(85.00),
                    vat_rate: None,
                    sort_order: None,
                },
            ],
        },
        &defaults(),
    )
    .expect("valid quotation")
}

#[tokio::test]
async fn test_create_quotation_stores_totals_and_items() {
    let Some(db) = common::test_db().await else { return };
    let customer = common::create_customer(&db).await;
    let user = common::create_user(&db).await;
    let repo = QuotationRepository::new(db.clone());

    let created = repo
        .create_quotation(&glass_and_aluminum(customer.id), user.id, "CRY", 2025)
        .await
        .expect("Failed to create quotation");

    assert!(created.quotation.quotation_number.starts_with("CRY-2025-"));
    assert_eq!(created.quotation.subtotal, dec!(3225.00));
    assert_eq!(created.quotation.vat_amount, dec!(161.25));
    assert_eq!(created.quotation.total, dec!(3386.25));
    assert_eq!(created.quotation.terms.as_deref(), Some("Payment: 50% advance"));
    assert_eq!(created.items.len(), 2);
    assert_eq!(created.items[0].sub_total, dec!(2800.00));
    assert_eq!(created.items[1].vat_rate, dec!(21.25));
    assert_eq!(created.customer.map(|c| c.id), Some(customer.id));
    assert_eq!(created.created_by.map(|u| u.id), Some(user.id));

    let found = repo
        .find_by_id(created.quotation.id)
        .await
        .expect("Query should succeed")
        .expect("Quotation should exist");
    assert_eq!(found.quotation.quotation_number, created.quotation.quotation_number);
    assert_eq!(found.items[0].scope_of_work, "12mm Clear Tempered Glass");
    assert_eq!(found.items[1].description.as_deref(), Some("Powder coated"));
}

#[tokio::test]
async fn test_numbers_increase_and_keep_sequence_across_years() {
    let Some(db) = common::test_db().await else { return };
    let customer = common::create_customer(&db).await;
    let user = common::create_user(&db).await;
    let repo = QuotationRepository::new(db.clone());
    let input = glass_and_aluminum(customer.id);

    let first = repo.create_quotation(&input, user.id, "CRY", 2025).await.unwrap();
    let second = repo.create_quotation(&input, user.id, "CRY", 2026).await.unwrap();

    assert!(second.quotation.quotation_number.starts_with("CRY-2026-"));
    let first_seq = extract_sequence(&first.quotation.quotation_number).unwrap();
    let second_seq = extract_sequence(&second.quotation.quotation_number).unwrap();
    assert!(second_seq > first_seq);
}

#[tokio::test]
async fn test_concurrent_creates_get_distinct_numbers() {
    let Some(db) = common::test_db().await else { return };
    let customer = common::create_customer(&db).await;
    let user = common::create_user(&db).await;
    let input = glass_and_aluminum(customer.id);

    let creates = (0..8).map(|_| {
        let repo = QuotationRepository::new(db.clone());
        let input = input.clone();
        async move { repo.create_quotation(&input, user.id, "CRY", 2025).await }
    });

    let results = join_all(creates).await;
    let numbers: HashSet<String> = results
        .into_iter()
        .map(|r| r.expect("every create should succeed").quotation.quotation_number)
        .collect();

    assert_eq!(numbers.len(), 8);
}

#[tokio::test]
async fn test_create_with_unknown_customer_fails() {
    let Some(db) = common::test_db().await else { return };
    let user = common::create_user(&db).await;
    let repo = QuotationRepository::new(db.clone());
    let missing = Uuid::new_v4();

    let result = repo
        .create_quotation(&glass_and_aluminum(missing), user.id, "CRY", 2025)
        .await;

    assert!(matches!(result, Err(QuotationRepoError::CustomerNotFound(id)) if id == missing));
}

#[tokio::test]
async fn test_update_vat_only_preserves_line_vat() {
    let Some(db) = common::test_db().await else { return };
    let customer = common::create_customer(&db).await;
    let user = common::create_user(&db).await;
    let repo = QuotationRepository::new(db.clone());

    let created = repo
        .create_quotation(&glass_and_aluminum(customer.id), user.id, "CRY", 2025)
        .await
        .unwrap();

    let updated = repo
        .update_quotation(
            created.quotation.id,
            QuotationUpdateInput {
                vat_percentage: Some(dec!(10)),
                status: Some("sent".to_string()),
                ..QuotationUpdateInput::default()
            },
        )
        .await
        .expect("Failed to update quotation");

    assert_eq!(updated.quotation.vat_percentage, dec!(10));
    assert_eq!(updated.quotation.vat_amount, dec!(322.5));
    assert_eq!(updated.quotation.total, dec!(3547.5));
    assert_eq!(
        QuotationStatus::from(updated.quotation.status),
        QuotationStatus::Sent
    );
    // Per-line amounts keep the percentage they were priced with.
    assert_eq!(updated.items[0].vat_rate, dec!(140));
    assert_eq!(updated.items[1].vat_rate, dec!(21.25));
}

#[tokio::test]
async fn test_update_rejects_invalid_vat() {
    let Some(db) = common::test_db().await else { return };
    let customer = common::create_customer(&db).await;
    let user = common::create_user(&db).await;
    let repo = QuotationRepository::new(db.clone());

    let created = repo
        .create_quotation(&glass_and_aluminum(customer.id), user.id, "CRY", 2025)
        .await
        .unwrap();

    let result = repo
        .update_quotation(
            created.quotation.id,
            QuotationUpdateInput {
                vat_percentage: Some(dec!(25)),
                ..QuotationUpdateInput::default()
            },
        )
        .await;

    assert!(matches!(
        result,
        Err(QuotationRepoError::Validation(QuotationError::VatPercentageOutOfRange { .. }))
    ));
}

#[tokio::test]
async fn test_replace_items_retotals() {
    let Some(db) = common::test_db().await else { return };
    let customer = common::create_customer(&db).await;
    let user = common::create_user(&db).await;
    let repo = QuotationRepository::new(db.clone());

    let created = repo
        .create_quotation(&glass_and_aluminum(customer.id), user.id, "CRY", 2025)
        .await
        .unwrap();

    let item = LineItem::from_input(
        LineItemInput {
            scope_of_work: "Installation labour".to_string(),
            description: None,
            quantity: dec!(2),
            rate: dec!(150),
            vat_rate: None,
            sort_order: None,
        },
        0,
        VatPercentage::DEFAULT,
    )
    .unwrap();

    let replaced = repo
        .replace_quotation_items(created.quotation.id, &[item])
        .await
        .expect("Failed to replace items");

    assert_eq!(replaced.items.len(), 1);
    assert_eq!(replaced.quotation.subtotal, dec!(300));
    assert_eq!(replaced.quotation.vat_amount, dec!(15));
    assert_eq!(replaced.quotation.total, dec!(315));
}

#[tokio::test]
async fn test_list_filters_by_customer_and_delete_cascades() {
    let Some(db) = common::test_db().await else { return };
    let customer = common::create_customer(&db).await;
    let user = common::create_user(&db).await;
    let repo = QuotationRepository::new(db.clone());

    let first = repo
        .create_quotation(&glass_and_aluminum(customer.id), user.id, "CRY", 2025)
        .await
        .unwrap();
    let second = repo
        .create_quotation(&glass_and_aluminum(customer.id), user.id, "CRY", 2025)
        .await
        .unwrap();

    let filter = QuotationFilter {
        customer_id: Some(customer.id),
        ..QuotationFilter::default()
    };
    let (rows, total) = repo.list(&filter, &PageRequest::default()).await.unwrap();
    assert_eq!(total, 2);
    // Newest first.
    assert_eq!(rows[0].quotation.id, second.quotation.id);
    assert_eq!(rows[1].quotation.id, first.quotation.id);
    assert!(rows.iter().all(|r| r.customer.is_some()));

    repo.delete(first.quotation.id).await.expect("Failed to delete");
    assert!(repo.find_by_id(first.quotation.id).await.unwrap().is_none());
    assert!(matches!(
        repo.delete(first.quotation.id).await,
        Err(QuotationRepoError::NotFound(_))
    ));

    let (_, total) = repo.list(&filter, &PageRequest::default()).await.unwrap();
    assert_eq!(total, 1);
}
