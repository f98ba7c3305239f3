//! End-to-end storefront flow against a fake backend: pick a product, apply a promo code, add
//! it to the cart and check out.

use rust_decimal::Decimal;
use serde_json::json;
use testresult::TestResult;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{header, method, path},
};

use shopfront::{
    api::{HttpShopApi, PaymentMethod},
    cart::{CartRepository, LocalCartStore},
    flows::{Checkout, CheckoutError, CheckoutForm, ProductDetail},
    navigation::Navigation,
    session::{Session, UserProfile},
    storage::MemoryStorage,
    views::HeaderBadge,
};

async fn backend() -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/products/P1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {
                "_id": "P1",
                "name": "Áo sơ mi",
                "price": 200000,
                "discount": 0,
                "colors": ["Đen", "Trắng"],
                "sizes": ["M", "L"],
                "images": ["ao-so-mi.jpg"],
                "stock": 5
            }
        })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/promotions/validate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": { "code": "SALE10", "type": "percentage", "discountValue": 10 }
        })))
        .mount(&server)
        .await;

    server
}

fn session() -> Session {
    Session {
        token: "token-1".to_string(),
        user: Some(UserProfile {
            id: "U1".to_string(),
            username: "lan".to_string(),
            email: "lan@example.com".to_string(),
            role: "user".to_string(),
            phone: None,
        }),
    }
}

fn form() -> CheckoutForm {
    CheckoutForm {
        name: "Lan".to_string(),
        email: "lan@example.com".to_string(),
        phone: "0900000000".to_string(),
        address: "1 Lê Lợi, Quận 1".to_string(),
        note: "Giao giờ hành chính".to_string(),
        payment_method: PaymentMethod::BankTransfer,
    }
}

#[tokio::test]
async fn promo_add_and_checkout_empties_the_cart() -> TestResult {
    let server = backend().await;

    Mock::given(method("POST"))
        .and(path("/orders"))
        .and(header("authorization", "Bearer token-1"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "success": true,
            "message": "Đặt hàng thành công"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let api = HttpShopApi::new(server.uri());
    let cart = LocalCartStore::new(MemoryStorage::new());
    let mut badge = HeaderBadge::new(&cart);
    let session = session();

    let mut detail = ProductDetail::load(&api, "P1").await?;
    detail.select_size("L")?;
    detail.set_quantity(2);
    let price = detail.apply_promo_code(&api, "SALE10").await?;
    let update = detail.add_to_cart(&cart, Some(&session))?;

    assert_eq!(price.net, Decimal::from(180_000));
    assert_eq!(update.total, Decimal::from(360_000));
    assert_eq!(badge.poll(), 2);

    let mut checkout = Checkout::open(&cart)?;
    let receipt = checkout.submit(&form(), Some(&session), &api).await?;

    assert_eq!(receipt.navigate, Navigation::Home);
    assert_eq!(receipt.message, "Đặt hàng thành công");
    assert!(cart.items().is_empty());
    assert_eq!(badge.poll(), 0);

    let orders = server.received_requests().await.unwrap_or_default();
    let order = orders
        .iter()
        .find(|request| request.url.path() == "/orders")
        .ok_or("order was not sent")?;
    let body: serde_json::Value = serde_json::from_slice(&order.body)?;
    assert_eq!(body["userId"], "U1");
    assert_eq!(body["totalAmount"], 360_000.0);
    assert_eq!(body["paymentMethod"], "bank_transfer");
    assert_eq!(body["status"], "pending");
    assert_eq!(body["items"][0]["promoCode"], "SALE10");

    Ok(())
}

#[tokio::test]
async fn refused_order_leaves_the_cart_alone() -> TestResult {
    let server = backend().await;

    Mock::given(method("POST"))
        .and(path("/orders"))
        .respond_with(ResponseTemplate::new(500).set_body_string("oops"))
        .mount(&server)
        .await;

    let api = HttpShopApi::new(server.uri());
    let cart = LocalCartStore::new(MemoryStorage::new());
    let session = session();

    ProductDetail::load(&api, "P1")
        .await?
        .add_to_cart(&cart, Some(&session))?;

    let mut checkout = Checkout::open(&cart)?;
    let result = checkout.submit(&form(), Some(&session), &api).await;

    assert_eq!(
        result,
        Err(CheckoutError::Rejected("Có lỗi xảy ra khi đặt hàng".to_string()))
    );
    assert_eq!(cart.item_count(), 1);

    Ok(())
}

#[tokio::test]
async fn signed_out_customer_is_sent_to_login() -> TestResult {
    let server = backend().await;
    let api = HttpShopApi::new(server.uri());
    let cart = LocalCartStore::new(MemoryStorage::new());

    let detail = ProductDetail::load(&api, "P1").await?;
    let error = detail.add_to_cart(&cart, None).err();

    assert_eq!(
        error.and_then(|error| error.navigation()),
        Some(Navigation::Login)
    );
    assert!(cart.items().is_empty());

    Ok(())
}
