//! Wishlist membership and the two-phase move operations.

use std::sync::Arc;

use verdant_client::Storefront;
use verdant_core::ProductId;
use verdant_integration_tests::{MockBackend, MockOp, init_tracing, product};

fn storefront_with(products: &[&str]) -> (Arc<MockBackend>, Storefront<MockBackend>) {
    init_tracing();
    let backend = Arc::new(MockBackend::new());
    for id in products {
        backend.seed_product(product(id, 100));
    }
    let store = Storefront::with_backend(Arc::clone(&backend));
    (backend, store)
}

#[tokio::test]
async fn membership_follows_mutations() {
    let (_backend, store) = storefront_with(&["p1"]);
    let p1 = ProductId::new("p1");

    assert!(!store.wishlist().is_member(&p1));

    let outcome = store.wishlist().add_item(&p1).await;
    assert!(outcome.success);
    assert!(store.wishlist().is_member(&p1));

    let outcome = store.wishlist().remove_item(&p1).await;
    assert!(outcome.success);
    assert!(!store.wishlist().is_member(&p1));
}

#[tokio::test]
async fn removing_non_member_is_a_successful_no_op() {
    let (_backend, store) = storefront_with(&["p1", "p2"]);
    let p1 = ProductId::new("p1");

    store.wishlist().add_item(&p1).await;
    let before = store.wishlist().items();

    let outcome = store.wishlist().remove_item(&ProductId::new("p2")).await;
    assert!(outcome.success);
    assert_eq!(store.wishlist().items(), before);
}

#[tokio::test]
async fn duplicate_add_keeps_single_entry() {
    let (_backend, store) = storefront_with(&["p1"]);
    let p1 = ProductId::new("p1");

    store.wishlist().add_item(&p1).await;
    store.wishlist().add_item(&p1).await;

    assert_eq!(store.wishlist().len(), 1);
}

#[tokio::test]
async fn success_without_server_message_keeps_success_wording() {
    let (backend, store) = storefront_with(&["p1"]);
    backend.omit_success_messages();
    let p1 = ProductId::new("p1");

    let outcome = store.wishlist().add_item(&p1).await;
    assert!(outcome.success);
    assert_eq!(outcome.message, "Item added to wishlist");

    let outcome = store.wishlist().remove_item(&p1).await;
    assert!(outcome.success);
    assert_eq!(outcome.message, "Item removed from wishlist");
}

#[tokio::test]
async fn failed_add_leaves_wishlist_untouched() {
    let (backend, store) = storefront_with(&["p1", "p2"]);
    store.wishlist().add_item(&ProductId::new("p1")).await;
    let before = store.wishlist().items();

    backend.fail_next(MockOp::AddToWishlist, 500, "Wishlist unavailable");
    let outcome = store.wishlist().add_item(&ProductId::new("p2")).await;

    assert!(!outcome.success);
    assert_eq!(outcome.message, "Wishlist unavailable");
    assert_eq!(store.wishlist().items(), before);
}

#[tokio::test]
async fn move_to_cart_add_then_remove() {
    let (_backend, store) = storefront_with(&["p1"]);
    let p1 = ProductId::new("p1");
    store.wishlist().add_item(&p1).await;

    let outcome = store.move_to_cart(&p1).await;
    assert!(outcome.success);
    assert_eq!(store.cart().total_quantity(), 1);
    assert!(!store.wishlist().is_member(&p1));
}

#[tokio::test]
async fn move_to_cart_partial_failure_keeps_item_in_both() {
    let (backend, store) = storefront_with(&["p1"]);
    let p1 = ProductId::new("p1");
    store.wishlist().add_item(&p1).await;

    backend.fail_next(MockOp::RemoveFromWishlist, 500, "Could not update wishlist");
    let outcome = store.move_to_cart(&p1).await;

    // Accepted inconsistency window: the add already happened, so the
    // item must be in both collections, never lost.
    assert!(!outcome.success);
    assert_eq!(outcome.message, "Could not update wishlist");
    assert_eq!(store.cart().total_quantity(), 1);
    assert!(store.wishlist().is_member(&p1));
}

#[tokio::test]
async fn move_to_cart_failed_add_changes_nothing() {
    let (backend, store) = storefront_with(&["p1"]);
    let p1 = ProductId::new("p1");
    store.wishlist().add_item(&p1).await;

    backend.fail_next(MockOp::AddToCart, 400, "Product is out of stock");
    let outcome = store.move_to_cart(&p1).await;

    assert!(!outcome.success);
    assert_eq!(outcome.message, "Product is out of stock");
    assert_eq!(store.cart().total_quantity(), 0);
    assert!(store.wishlist().is_member(&p1));
}

#[tokio::test]
async fn move_to_wishlist_never_loses_the_item() {
    let (backend, store) = storefront_with(&["p1"]);
    let p1 = ProductId::new("p1");
    store.cart().add_item(&p1, 1).await;

    // Phase 1 (add to wishlist) fails: the cart must be untouched.
    backend.fail_next(MockOp::AddToWishlist, 500, "Wishlist unavailable");
    let outcome = store.move_to_wishlist(&p1).await;
    assert!(!outcome.success);
    assert_eq!(store.cart().total_quantity(), 1);
    assert!(!store.wishlist().is_member(&p1));

    // Without injected failure the move completes.
    let outcome = store.move_to_wishlist(&p1).await;
    assert!(outcome.success);
    assert_eq!(store.cart().total_quantity(), 0);
    assert!(store.wishlist().is_member(&p1));
}
