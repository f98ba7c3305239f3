//! Integration tests for the persistent cart: identity merge, removal, the quantity floor,
//! totals, persistence across reloads, degraded storage, and signalling within and across tabs.

use rust_decimal::Decimal;
use testresult::TestResult;

use shopfront::{
    cart::{CART_KEY, CartChange, CartRepository, LocalCartStore, StorageWarning},
    items::LineItem,
    storage::{FileStorage, KeyValueStorage, MemoryStorage},
    views::{CartView, HeaderBadge},
};

fn item(product_id: &str, color: &str, size: &str, price: i64, quantity: u32) -> LineItem {
    LineItem {
        product_id: product_id.to_string(),
        name: format!("Sản phẩm {product_id}"),
        image: format!("{product_id}.jpg"),
        price: Decimal::from(price),
        original_price: Decimal::from(price),
        discount: Decimal::ZERO,
        promo_code: None,
        promo_discount: None,
        size: size.to_string(),
        color: color.to_string(),
        quantity,
    }
}

#[test]
fn same_variant_merges_and_other_sizes_stay_apart() -> TestResult {
    let cart = LocalCartStore::new(MemoryStorage::new());

    cart.merge(item("P1", "Đen", "M", 100_000, 1))?;
    cart.merge(item("P1", "Đen", "M", 100_000, 2))?;
    let update = cart.merge(item("P1", "Đen", "L", 100_000, 1))?;

    assert_eq!(update.items.len(), 2);
    assert_eq!(update.items.first().map(|line| line.quantity), Some(3));
    assert_eq!(update.items.get(1).map(|line| line.size.as_str()), Some("L"));

    Ok(())
}

#[test]
fn removal_keeps_the_other_lines_in_order() -> TestResult {
    let cart = LocalCartStore::new(MemoryStorage::new());
    cart.merge(item("P1", "Đen", "M", 100_000, 1))?;
    cart.merge(item("P2", "Trắng", "L", 50_000, 1))?;
    cart.merge(item("P3", "Xanh", "S", 70_000, 1))?;

    let update = cart.remove(1)?;

    let ids: Vec<&str> = update
        .items
        .iter()
        .map(|line| line.product_id.as_str())
        .collect();
    assert_eq!(ids, ["P1", "P3"]);

    Ok(())
}

#[test]
fn add_readd_then_remove_leaves_an_empty_cart() -> TestResult {
    let cart = LocalCartStore::new(MemoryStorage::new());

    cart.merge(item("P1", "Đen", "M", 100_000, 1))?;
    let update = cart.merge(item("P1", "Đen", "M", 100_000, 2))?;

    assert_eq!(update.items.len(), 1);
    assert_eq!(update.items.first().map(|line| line.quantity), Some(3));
    assert_eq!(update.total, Decimal::from(300_000));

    let update = cart.remove(0)?;

    assert!(update.items.is_empty());
    assert_eq!(update.total, Decimal::ZERO);
    assert!(cart.items().is_empty());
    assert_eq!(cart.total(), Decimal::ZERO);
    assert_eq!(cart.item_count(), 0);

    Ok(())
}

#[test]
fn quantity_never_drops_below_one() -> TestResult {
    let cart = LocalCartStore::new(MemoryStorage::new());
    cart.merge(item("P1", "Đen", "M", 100_000, 2))?;
    let mut subscription = cart.subscribe();

    let update = cart.update_quantity(0, 0)?;

    assert_eq!(update.items.first().map(|line| line.quantity), Some(2));
    assert_eq!(subscription.try_changed(), None);

    Ok(())
}

#[test]
fn total_is_the_sum_of_line_totals() -> TestResult {
    let cart = LocalCartStore::new(MemoryStorage::new());

    cart.merge(item("P1", "Đen", "M", 180_000, 2))?;
    let update = cart.merge(item("P2", "Trắng", "L", 45_500, 3))?;

    let expected: Decimal = update.items.iter().map(LineItem::line_total).sum();
    assert_eq!(update.total, expected);
    assert_eq!(cart.total(), Decimal::from(496_500));
    assert_eq!(cart.item_count(), 5);

    Ok(())
}

#[test]
fn cart_survives_a_reload() -> TestResult {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("storage.json");

    let before = {
        let cart = LocalCartStore::new(FileStorage::open(&path));
        cart.merge(item("P1", "Đen", "M", 180_000, 2))?;
        cart.merge(item("P2", "Trắng", "L", 50_000, 1))?;
        cart.merge(LineItem {
            original_price: Decimal::from(200_000),
            promo_code: Some("SALE10".to_string()),
            promo_discount: Some(Decimal::from(20_000)),
            ..item("P3", "Xanh", "S", 180_000, 1)
        })?;
        cart.items()
    };

    let reloaded = LocalCartStore::new(FileStorage::open(&path));
    let items = reloaded.items();

    assert_eq!(items, before);

    let promoted = items.get(2).ok_or("promoted line missing")?;
    assert_eq!(promoted.promo_code.as_deref(), Some("SALE10"));
    assert_eq!(promoted.promo_discount, Some(Decimal::from(20_000)));
    assert_eq!(promoted.price, Decimal::from(180_000));
    assert_eq!(promoted.original_price, Decimal::from(200_000));

    Ok(())
}

#[test]
fn unreadable_cart_data_is_an_empty_cart() -> TestResult {
    let storage = MemoryStorage::new();
    storage.set_item(CART_KEY, "{not json")?;

    let cart = LocalCartStore::new(storage);

    assert!(cart.items().is_empty());
    assert_eq!(cart.total(), Decimal::ZERO);

    Ok(())
}

#[test]
fn full_storage_keeps_the_cart_in_memory() -> TestResult {
    let cart = LocalCartStore::new(MemoryStorage::with_quota(0));

    let update = cart.merge(item("P1", "Đen", "M", 100_000, 1))?;

    assert_eq!(update.warning, Some(StorageWarning::NotPersisted));
    assert!(cart.is_degraded());
    assert_eq!(cart.item_count(), 1);

    Ok(())
}

#[tokio::test]
async fn another_tab_sees_changes() -> TestResult {
    let dir = tempfile::tempdir()?;
    let first_tab = FileStorage::open(dir.path().join("storage.json"));
    let second_tab = first_tab.open_tab();

    let here = LocalCartStore::new(first_tab);
    let there = LocalCartStore::new(second_tab);
    let mut subscription = here.subscribe();

    there.merge(item("P1", "Đen", "M", 100_000, 2))?;

    assert_eq!(subscription.changed().await, Some(CartChange::External));
    assert_eq!(here.item_count(), 2);

    Ok(())
}

#[test]
fn stores_sharing_a_tab_share_the_signal() -> TestResult {
    let storage = MemoryStorage::new();
    let a = LocalCartStore::new(storage.clone());
    let b = LocalCartStore::new(storage.clone());
    let mut badge = HeaderBadge::new(&b);
    let mut subscription = b.subscribe();

    a.merge(item("P1", "Đen", "M", 100_000, 1))?;

    assert_eq!(badge.poll(), 1);
    assert_eq!(subscription.try_changed(), Some(CartChange::Local));
    assert_eq!(subscription.try_changed(), None);

    Ok(())
}

#[test]
fn badge_and_view_follow_the_same_cart() -> TestResult {
    let cart = LocalCartStore::new(MemoryStorage::new());
    let mut badge = HeaderBadge::new(&cart);
    let mut view = CartView::new(&cart, "http://localhost:5000/uploads/categories");

    cart.merge(item("P1", "Đen", "M", 100_000, 1))?;
    view.refresh();
    view.increment(0)?;

    assert_eq!(badge.poll(), 2);

    view.decrement(0)?;
    view.decrement(0)?;

    assert_eq!(badge.poll(), 0);
    assert!(view.is_empty());

    Ok(())
}
