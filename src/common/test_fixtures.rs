// src/common/test_fixtures.rs

//! Cadastros mínimos para os testes que rodam contra o Postgres (`#[sqlx::test]`).

use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    db::{ClientRepository, CouponRepository, DressRepository, OrderRepository, PaymentRepository},
    models::{
        catalog::{HennaStyle, ServiceKind},
        client::CreateClientPayload,
        dress::CreateDressPayload,
        order::{CreateOrderPayload, NewOrderItem, OrderItemType},
    },
    services::{order_service::OrderService, payment_service::PaymentService},
};

pub fn dec(v: &str) -> Decimal {
    v.parse().unwrap()
}

pub fn order_service(pool: &PgPool) -> OrderService {
    OrderService::new(
        OrderRepository::new(pool.clone()),
        PaymentRepository::new(pool.clone()),
        CouponRepository::new(pool.clone()),
        pool.clone(),
    )
}

pub fn payment_service(pool: &PgPool) -> PaymentService {
    PaymentService::new(
        PaymentRepository::new(pool.clone()),
        OrderRepository::new(pool.clone()),
        pool.clone(),
    )
}

pub async fn client(pool: &PgPool, full_name: &str) -> Uuid {
    let payload = CreateClientPayload {
        full_name: full_name.to_string(),
        phone: "01012345678".to_string(),
        email: None,
        address: None,
        governorate_id: None,
        city_id: None,
        client_code: None,
        notes: None,
    };
    ClientRepository::new(pool.clone()).create(pool, &payload).await.unwrap()
}

pub async fn dress(pool: &PgPool, name: &str) -> Uuid {
    let payload = CreateDressPayload {
        name: name.to_string(),
        category: Some("bridal".to_string()),
        size: Some("M".to_string()),
        color: Some("ivory".to_string()),
        rental_price: dec("1500"),
        sale_price: Some(dec("12000")),
        is_available: None,
        condition: None,
        notes: None,
    };
    DressRepository::new(pool.clone()).create(pool, &payload).await.unwrap()
}

pub fn henna_item(price: &str, quantity: i32) -> NewOrderItem {
    NewOrderItem {
        item_type: OrderItemType::Service,
        service_kind: Some(ServiceKind::Henna(HennaStyle::Guest)),
        dress_id: None,
        description: None,
        price: dec(price),
        quantity: Some(quantity),
    }
}

pub fn dress_item(item_type: OrderItemType, dress_id: Uuid, price: &str) -> NewOrderItem {
    NewOrderItem {
        item_type,
        service_kind: None,
        dress_id: Some(dress_id),
        description: None,
        price: dec(price),
        quantity: None,
    }
}

/// Pedido sem cupom; `total` vazio faz o total sair dos itens.
pub fn new_order(client_id: Uuid, total: Option<&str>, paid: Option<&str>, items: Vec<NewOrderItem>) -> CreateOrderPayload {
    CreateOrderPayload {
        client_id,
        employee_id: None,
        order_date: None,
        event_date: None,
        total_amount: total.map(dec),
        paid_amount: paid.map(dec),
        coupon_code: None,
        status: None,
        notes: None,
        items,
    }
}
