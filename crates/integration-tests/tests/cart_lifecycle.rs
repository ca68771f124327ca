//! Cart persistence semantics against a real database.
//!
//! Run with: `cargo test -p tadka-integration-tests -- --ignored`

use rust_decimal::Decimal;

use tadka_core::{DeviceId, GuestId};
use tadka_integration_tests::test_pool;
use tadka_server::db::CartRepository;
use tadka_server::models::cart::CartItem;

fn line(id: &str, quantity: u32, price: Decimal) -> CartItem {
    CartItem {
        item_id: id.to_owned(),
        item_name: format!("Item {id}"),
        quantity,
        price,
        customization: None,
    }
}

#[tokio::test]
#[ignore = "Requires a running PostgreSQL database"]
async fn test_replaying_the_same_cart_write_changes_nothing() {
    let pool = test_pool().await;
    let repo = CartRepository::new(&pool);

    let cart = repo
        .create(DeviceId::generate(), GuestId::generate())
        .await
        .expect("failed to create cart");

    let items = vec![
        line("ITEM_1", 2, Decimal::new(2580, 2)),
        line("ITEM_2", 1, Decimal::new(450, 2)),
    ];

    let first = repo.replace_items(cart.id, &items).await.expect("first write failed");
    let second = repo.replace_items(cart.id, &items).await.expect("second write failed");

    // Same list in, same cart out: items match and the basket token is stable.
    assert_eq!(first.items, items);
    assert_eq!(second.items, first.items);
    assert_eq!(second.basket_id.as_str(), cart.basket_id.as_str());
}

#[tokio::test]
#[ignore = "Requires a running PostgreSQL database"]
async fn test_empty_flag_delete_invalidates_the_basket_token() {
    let pool = test_pool().await;
    let repo = CartRepository::new(&pool);

    let device_id = DeviceId::generate();
    let guest_id = GuestId::generate();

    let cart = repo.create(device_id, guest_id).await.expect("failed to create cart");
    repo.replace_items(cart.id, &[line("ITEM_1", 1, Decimal::new(1000, 2))])
        .await
        .expect("write failed");

    repo.delete_by_device_id(device_id).await.expect("delete failed");

    assert!(
        repo.find_by_device_id(device_id).await.expect("lookup failed").is_none(),
        "cart should be gone after the empty-flag delete"
    );
    assert!(
        repo.find_by_basket_id(&cart.basket_id).await.expect("lookup failed").is_none(),
        "the old basket token should resolve to nothing"
    );

    // The next write starts a fresh cart under a fresh basket token.
    let next = repo.create(device_id, guest_id).await.expect("recreate failed");
    assert_ne!(next.basket_id.as_str(), cart.basket_id.as_str());
    assert!(next.items.is_empty());
}
