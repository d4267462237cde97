//! Cart synchronization: snapshot replacement, failure semantics, and
//! derived values.

use std::sync::Arc;

use rust_decimal::Decimal;
use verdant_client::Storefront;
use verdant_core::ProductId;
use verdant_integration_tests::{MockBackend, MockOp, init_tracing, product};

fn storefront_with(products: &[(&str, i64)]) -> (Arc<MockBackend>, Storefront<MockBackend>) {
    init_tracing();
    let backend = Arc::new(MockBackend::new());
    for (id, price) in products {
        backend.seed_product(product(id, *price));
    }
    let store = Storefront::with_backend(Arc::clone(&backend));
    (backend, store)
}

#[tokio::test]
async fn local_cart_always_equals_server_snapshot() {
    let (backend, store) = storefront_with(&[("p1", 500), ("p2", 1200)]);
    let p1 = ProductId::new("p1");
    let p2 = ProductId::new("p2");

    let outcome = store.cart().add_item(&p1, 2).await;
    assert!(outcome.success);
    assert_eq!(outcome.message, "Item added to cart");
    assert_eq!(store.cart().snapshot(), Some(backend.cart_snapshot()));

    store.cart().add_item(&p2, 1).await;
    store.cart().update_quantity(&p1, 5).await;
    store.cart().remove_item(&p2).await;
    assert_eq!(store.cart().snapshot(), Some(backend.cart_snapshot()));
}

#[tokio::test]
async fn failed_mutation_leaves_state_untouched() {
    let (backend, store) = storefront_with(&[("p1", 500)]);
    let p1 = ProductId::new("p1");

    store.cart().add_item(&p1, 2).await;
    let before = store.cart().snapshot();

    backend.fail_next(MockOp::UpdateCartItem, 400, "Quantity exceeds stock");
    let outcome = store.cart().update_quantity(&p1, 99).await;

    assert!(!outcome.success);
    assert_eq!(outcome.message, "Quantity exceeds stock");
    assert_eq!(store.cart().snapshot(), before);
}

#[tokio::test]
async fn add_unknown_product_fails_with_server_message() {
    let (_backend, store) = storefront_with(&[]);

    let outcome = store.cart().add_item(&ProductId::new("ghost"), 1).await;
    assert!(!outcome.success);
    assert_eq!(outcome.message, "Product not found");
    assert_eq!(store.cart().total_quantity(), 0);
}

#[tokio::test]
async fn success_without_server_message_keeps_success_wording() {
    let (backend, store) = storefront_with(&[("p1", 500)]);
    backend.omit_success_messages();
    let p1 = ProductId::new("p1");

    let outcome = store.cart().add_item(&p1, 1).await;
    assert!(outcome.success);
    assert_eq!(outcome.message, "Item added to cart");

    let outcome = store.cart().update_quantity(&p1, 3).await;
    assert!(outcome.success);
    assert_eq!(outcome.message, "Cart updated");

    let outcome = store.cart().remove_item(&p1).await;
    assert!(outcome.success);
    assert_eq!(outcome.message, "Item removed from cart");
}

#[tokio::test]
async fn derived_values_recomputed_from_snapshot() {
    let (_backend, store) = storefront_with(&[("p1", 500), ("p2", 1200)]);

    store.cart().add_item(&ProductId::new("p1"), 2).await;
    store.cart().add_item(&ProductId::new("p2"), 1).await;

    assert_eq!(store.cart().total_quantity(), 3);
    assert_eq!(store.cart().subtotal(), Decimal::from(2200));

    store.cart().remove_item(&ProductId::new("p2")).await;
    assert_eq!(store.cart().total_quantity(), 2);
    assert_eq!(store.cart().subtotal(), Decimal::from(1000));
}

#[tokio::test]
async fn set_quantity_maps_non_positive_to_removal() {
    let (_backend, store) = storefront_with(&[("p1", 500), ("p2", 300)]);
    let p1 = ProductId::new("p1");
    let p2 = ProductId::new("p2");

    store.cart().add_item(&p1, 2).await;
    store.cart().add_item(&p2, 2).await;

    let outcome = store.set_quantity(&p1, 0).await;
    assert!(outcome.success);
    let outcome = store.set_quantity(&p2, -3).await;
    assert!(outcome.success);

    let cart = store.cart().snapshot().unwrap_or_default();
    assert!(cart.items.is_empty());
}

#[tokio::test]
async fn set_quantity_positive_updates_the_line() {
    let (_backend, store) = storefront_with(&[("p1", 500)]);
    let p1 = ProductId::new("p1");

    store.cart().add_item(&p1, 1).await;
    let outcome = store.set_quantity(&p1, 4).await;
    assert!(outcome.success);
    assert_eq!(store.cart().total_quantity(), 4);
}

#[tokio::test]
async fn initialization_failure_is_swallowed_and_state_stays_empty() {
    let (backend, store) = storefront_with(&[("p1", 500)]);
    backend.fail_next(MockOp::FetchCart, 500, "Internal error");
    backend.fail_next(MockOp::FetchWishlist, 500, "Internal error");

    store.initialize().await;

    assert_eq!(store.cart().snapshot(), None);
    assert!(store.wishlist().is_empty());

    // The services keep working after a failed initial fetch
    let outcome = store.cart().add_item(&ProductId::new("p1"), 1).await;
    assert!(outcome.success);
    assert_eq!(store.cart().total_quantity(), 1);
}

#[tokio::test]
async fn initialize_adopts_server_state() {
    let (backend, store) = storefront_with(&[("p1", 500)]);

    // Another session on the same identity already filled the cart
    let warm = Storefront::with_backend(Arc::clone(&backend));
    warm.cart().add_item(&ProductId::new("p1"), 3).await;

    store.initialize().await;
    assert_eq!(store.cart().snapshot(), Some(backend.cart_snapshot()));
    assert_eq!(store.cart().total_quantity(), 3);
}
