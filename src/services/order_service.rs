// src/services/order_service.rs

use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{order_repo::NewOrder, CouponRepository, OrderRepository, PaymentRepository},
    models::{
        order::{
            amount_too_large, CreateOrderPayload, NewOrderItem, OrderDetail, OrderFilter, OrderStatus, OrderView,
            UpdateOrderPayload, MAX_AMOUNT,
        },
        payment::{CreatePaymentPayload, PaymentMethod},
    },
};

/// Subtotal do pedido: o total informado ou, na falta dele, a soma dos itens.
pub fn order_subtotal(total_amount: Option<Decimal>, items: &[NewOrderItem]) -> Result<Decimal, AppError> {
    for item in items {
        item.check()?;
    }

    let subtotal = match total_amount {
        Some(total) => total,
        None if !items.is_empty() => items.iter().try_fold(Decimal::ZERO, |acc, item| {
            acc.checked_add(item.line_total()?).ok_or_else(amount_too_large)
        })?,
        None => return Err(AppError::BusinessRule("rule.order_total_required")),
    };

    if subtotal < Decimal::ZERO {
        return Err(AppError::BusinessRule("rule.order_negative_amount"));
    }
    if subtotal > MAX_AMOUNT {
        return Err(amount_too_large());
    }
    Ok(subtotal)
}

/// O valor já pago precisa estar entre zero e o total.
pub fn check_paid(paid_amount: Decimal, total_amount: Decimal) -> Result<(), AppError> {
    if paid_amount < Decimal::ZERO {
        return Err(AppError::BusinessRule("rule.order_negative_amount"));
    }
    if paid_amount > total_amount {
        return Err(AppError::BusinessRule("rule.order_paid_exceeds_total"));
    }
    Ok(())
}

#[derive(Clone)]
pub struct OrderService {
    repo: OrderRepository,
    payment_repo: PaymentRepository,
    coupon_repo: CouponRepository,
    pool: PgPool,
}

impl OrderService {
    pub fn new(
        repo: OrderRepository,
        payment_repo: PaymentRepository,
        coupon_repo: CouponRepository,
        pool: PgPool,
    ) -> Self {
        Self { repo, payment_repo, coupon_repo, pool }
    }

    pub async fn list(&self, filter: &OrderFilter) -> Result<Vec<OrderView>, AppError> {
        let orders = self.repo.list(filter).await?;
        Ok(orders.into_iter().map(OrderView::from).collect())
    }

    pub async fn get(&self, id: Uuid) -> Result<OrderDetail, AppError> {
        let summary = self
            .repo
            .find_summary(id)
            .await?
            .ok_or(AppError::ResourceNotFound("order"))?;

        let items = self.repo.list_items(&self.pool, id).await?;
        let payments = self.payment_repo.list_by_order(&self.pool, id).await?;

        Ok(OrderDetail { header: summary.into(), items, payments })
    }

    /// Pedido + itens + cupom + sinal numa única transação.
    pub async fn create(&self, payload: &CreateOrderPayload) -> Result<Uuid, AppError> {
        let subtotal = order_subtotal(payload.total_amount, &payload.items)?;
        let paid_amount = payload.paid_amount.unwrap_or(Decimal::ZERO);

        let mut tx = self.pool.begin().await?;

        // 1. Cupom de indicação (valida, calcula o desconto e conta o uso)
        let (coupon_id, discount_amount) = match payload.coupon_code.as_deref().map(str::trim) {
            Some(code) if !code.is_empty() => {
                let coupon = self
                    .coupon_repo
                    .find_by_code(&mut *tx, code)
                    .await?
                    .ok_or(AppError::ResourceNotFound("coupon"))?;
                let discount = coupon.discount_for(subtotal, Utc::now().date_naive())?;
                self.coupon_repo.increment_usage(&mut *tx, coupon.id).await?;
                (Some(coupon.id), discount)
            }
            _ => (None, Decimal::ZERO),
        };

        let total_amount = subtotal - discount_amount;
        check_paid(paid_amount, total_amount)?;

        // 2. Cabeçalho
        let order = NewOrder {
            client_id: payload.client_id,
            employee_id: payload.employee_id,
            coupon_id,
            order_date: payload.order_date,
            event_date: payload.event_date,
            total_amount,
            discount_amount,
            paid_amount,
            status: payload.status.unwrap_or(OrderStatus::Pending),
            notes: payload.notes.as_deref(),
        };
        let order_id = self.repo.create(&mut *tx, &order).await?;

        // 3. Itens
        for item in &payload.items {
            self.repo.add_item(&mut *tx, order_id, item).await?;
        }

        // 4. O sinal vira um pagamento, para os relatórios baterem com `paid_amount`
        if paid_amount > Decimal::ZERO {
            let deposit = CreatePaymentPayload {
                order_id,
                amount: paid_amount,
                payment_date: payload.order_date,
                payment_method: Some(PaymentMethod::Cash),
                notes: None,
            };
            self.payment_repo.create(&mut *tx, &deposit).await?;
        }

        tx.commit().await?;

        tracing::info!("Pedido {} criado ({} itens, total {})", order_id, payload.items.len(), total_amount);
        Ok(order_id)
    }

    pub async fn update(&self, id: Uuid, payload: UpdateOrderPayload) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        // Um novo total não pode ficar abaixo do que já foi pago
        if let Some(new_total) = payload.total_amount {
            let current = self
                .repo
                .lock_amounts(&mut *tx, id)
                .await?
                .ok_or(AppError::ResourceNotFound("order"))?;
            check_paid(current.paid_amount, new_total)?;
        }

        if !self.repo.update(&mut *tx, id, payload).await? {
            return Err(AppError::ResourceNotFound("order"));
        }

        tx.commit().await?;
        Ok(())
    }

    /// Ao concluir, os vestidos vendidos saem do estoque.
    pub async fn update_status(&self, id: Uuid, status: OrderStatus) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        if !self.repo.update_status(&mut *tx, id, status).await? {
            return Err(AppError::ResourceNotFound("order"));
        }

        if status == OrderStatus::Completed {
            let sold = self.repo.mark_sold_dresses_unavailable(&mut *tx, id).await?;
            if sold > 0 {
                tracing::info!("Pedido {} concluído: {} vestido(s) retirados do estoque", id, sold);
            }
        }

        tx.commit().await?;
        Ok(())
    }

    /// Itens e pagamentos saem antes do pedido.
    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        self.repo.delete_items(&mut *tx, id).await?;
        self.payment_repo.delete_by_order(&mut *tx, id).await?;

        if !self.repo.delete(&mut *tx, id).await? {
            return Err(AppError::ResourceNotFound("order"));
        }

        tx.commit().await?;
        tracing::info!("Pedido {} removido", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        common::test_fixtures,
        db::DressRepository,
        models::{catalog::HennaStyle, catalog::ServiceKind, order::OrderItemType},
    };

    fn dec(v: &str) -> Decimal {
        v.parse().unwrap()
    }

    fn henna(price: &str, quantity: i32) -> NewOrderItem {
        NewOrderItem {
            item_type: OrderItemType::Service,
            service_kind: Some(ServiceKind::Henna(HennaStyle::Guest)),
            dress_id: None,
            description: None,
            price: dec(price),
            quantity: Some(quantity),
        }
    }

    #[test]
    fn subtotal_is_computed_from_items_when_missing() {
        let items = vec![henna("300", 4), henna("1200", 1)];
        assert_eq!(order_subtotal(None, &items).unwrap(), dec("2400"));
    }

    #[test]
    fn explicit_total_wins_over_items() {
        let items = vec![henna("300", 4)];
        assert_eq!(order_subtotal(Some(dec("1000")), &items).unwrap(), dec("1000"));
    }

    #[test]
    fn order_needs_items_or_total() {
        let err = order_subtotal(None, &[]).unwrap_err();
        assert_eq!(err.message_key(), "rule.order_total_required");
        assert_eq!(order_subtotal(Some(dec("5000")), &[]).unwrap(), dec("5000"));
    }

    #[test]
    fn invalid_items_reject_the_whole_order() {
        let mut broken = henna("300", 1);
        broken.service_kind = None;
        assert!(order_subtotal(Some(dec("300")), &[broken]).is_err());
    }

    #[test]
    fn oversized_amounts_are_a_business_error() {
        let mut huge = henna("1", 2);
        huge.price = Decimal::MAX;
        assert_eq!(
            order_subtotal(None, &[huge]).unwrap_err().message_key(),
            "rule.order_amount_too_large"
        );

        // Cada item cabe, a soma não
        let items = vec![henna("9999999999.99", 1), henna("0.01", 1)];
        assert_eq!(
            order_subtotal(None, &items).unwrap_err().message_key(),
            "rule.order_amount_too_large"
        );
        assert!(order_subtotal(Some(dec("10000000000")), &[]).is_err());
    }

    #[test]
    fn paid_cannot_exceed_total() {
        assert!(check_paid(dec("2000"), dec("5000")).is_ok());
        assert!(check_paid(dec("5000"), dec("5000")).is_ok());
        assert_eq!(
            check_paid(dec("5000.01"), dec("5000")).unwrap_err().message_key(),
            "rule.order_paid_exceeds_total"
        );
        assert!(check_paid(dec("-1"), dec("5000")).is_err());
    }

    // --- Contra o banco ---

    #[sqlx::test(migrations = "./migrations")]
    async fn created_orders_are_listed_with_their_items(pool: PgPool) {
        let service = test_fixtures::order_service(&pool);
        let client_id = test_fixtures::client(&pool, "Sara Ahmed").await;
        let other_client = test_fixtures::client(&pool, "Mona Youssef").await;

        let items = vec![test_fixtures::henna_item("300", 4), test_fixtures::henna_item("1200", 1)];
        let order_id = service
            .create(&test_fixtures::new_order(client_id, None, Some("400"), items))
            .await
            .unwrap();
        service
            .create(&test_fixtures::new_order(other_client, Some("900"), None, vec![]))
            .await
            .unwrap();

        let filter = OrderFilter { client_id: Some(client_id), ..Default::default() };
        let listed = service.list(&filter).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].summary.order.id, order_id);
        assert_eq!(listed[0].summary.client_name, "Sara Ahmed");
        assert_eq!(listed[0].summary.order.total_amount, dec("2400"));
        assert_eq!(listed[0].balance.remaining_amount, dec("2000"));

        let detail = service.get(order_id).await.unwrap();
        assert_eq!(detail.items.len(), 2);
        assert_eq!(detail.payments.len(), 1);
        assert_eq!(detail.payments[0].amount, dec("400"));

        let everything = service.list(&OrderFilter::default()).await.unwrap();
        assert_eq!(everything.len(), 2);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn deleting_an_order_removes_its_items_and_payments(pool: PgPool) {
        let service = test_fixtures::order_service(&pool);
        let client_id = test_fixtures::client(&pool, "Huda Salem").await;
        let order_id = service
            .create(&test_fixtures::new_order(
                client_id,
                None,
                Some("300"),
                vec![test_fixtures::henna_item("300", 2)],
            ))
            .await
            .unwrap();

        service.delete(order_id).await.unwrap();

        assert!(matches!(service.get(order_id).await, Err(AppError::ResourceNotFound("order"))));
        for table in ["order_items", "payments"] {
            let left: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table} WHERE order_id = $1"))
                .bind(order_id)
                .fetch_one(&pool)
                .await
                .unwrap();
            assert_eq!(left, 0, "{table} ficou com linhas do pedido removido");
        }

        assert!(matches!(service.delete(order_id).await, Err(AppError::ResourceNotFound("order"))));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn completing_an_order_takes_sold_dresses_out_of_stock(pool: PgPool) {
        let service = test_fixtures::order_service(&pool);
        let dresses = DressRepository::new(pool.clone());
        let client_id = test_fixtures::client(&pool, "Sara Ahmed").await;
        let sold = test_fixtures::dress(&pool, "Layla").await;
        let made = test_fixtures::dress(&pool, "Yasmin").await;
        let rented = test_fixtures::dress(&pool, "Noor").await;

        let items = vec![
            test_fixtures::dress_item(OrderItemType::DressSale, sold, "12000"),
            test_fixtures::dress_item(OrderItemType::AtelierSale, made, "15000"),
            test_fixtures::dress_item(OrderItemType::DressRental, rented, "1500"),
        ];
        let order_id = service
            .create(&test_fixtures::new_order(client_id, None, None, items))
            .await
            .unwrap();

        // Outros status não mexem no estoque
        service.update_status(order_id, OrderStatus::InProgress).await.unwrap();
        assert!(dresses.find_by_id(sold).await.unwrap().unwrap().is_available);

        service.update_status(order_id, OrderStatus::Completed).await.unwrap();

        assert!(!dresses.find_by_id(sold).await.unwrap().unwrap().is_available);
        assert!(!dresses.find_by_id(made).await.unwrap().unwrap().is_available);
        assert!(dresses.find_by_id(rented).await.unwrap().unwrap().is_available);

        let detail = service.get(order_id).await.unwrap();
        assert_eq!(detail.header.summary.order.status, OrderStatus::Completed);
        assert!(matches!(
            service.update_status(Uuid::new_v4(), OrderStatus::Completed).await,
            Err(AppError::ResourceNotFound("order"))
        ));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn a_new_total_cannot_drop_below_what_was_paid(pool: PgPool) {
        let service = test_fixtures::order_service(&pool);
        let client_id = test_fixtures::client(&pool, "Mona Youssef").await;
        let order_id = service
            .create(&test_fixtures::new_order(client_id, Some("5000"), Some("2000"), vec![]))
            .await
            .unwrap();

        let lower = UpdateOrderPayload {
            employee_id: None,
            order_date: None,
            event_date: None,
            total_amount: Some(dec("1500")),
            notes: None,
        };
        let err = service.update(order_id, lower).await.unwrap_err();
        assert_eq!(err.message_key(), "rule.order_paid_exceeds_total");

        let detail = service.get(order_id).await.unwrap();
        assert_eq!(detail.header.summary.order.total_amount, dec("5000"));
    }
}
