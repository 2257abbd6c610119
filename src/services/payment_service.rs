// src/services/payment_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{OrderRepository, PaymentRepository},
    models::payment::{CreatePaymentPayload, PaymentFilter, PaymentView, PendingPayment},
};

#[derive(Clone)]
pub struct PaymentService {
    repo: PaymentRepository,
    order_repo: OrderRepository,
    pool: PgPool,
}

impl PaymentService {
    pub fn new(repo: PaymentRepository, order_repo: OrderRepository, pool: PgPool) -> Self {
        Self { repo, order_repo, pool }
    }

    pub async fn list(&self, filter: &PaymentFilter) -> Result<Vec<PaymentView>, AppError> {
        self.repo.list(filter).await
    }

    pub async fn list_pending(&self) -> Result<Vec<PendingPayment>, AppError> {
        self.repo.list_pending().await
    }

    /// Registra o pagamento e soma exatamente `amount` ao pago do pedido.
    /// A linha do pedido fica travada até o commit, então dois pagamentos
    /// simultâneos nunca passam do saldo.
    pub async fn record(&self, payload: &CreatePaymentPayload) -> Result<Uuid, AppError> {
        let mut tx = self.pool.begin().await?;

        let order = self
            .order_repo
            .lock_amounts(&mut *tx, payload.order_id)
            .await?
            .ok_or(AppError::ResourceNotFound("order"))?;

        // Nada é gravado se a regra falhar (rollback no drop)
        order.check_payment(payload.amount)?;

        let payment_id = self.repo.create(&mut *tx, payload).await?;
        self.order_repo.add_paid(&mut *tx, payload.order_id, payload.amount).await?;

        tx.commit().await?;

        tracing::info!(
            "Pagamento {} de {} registrado no pedido {}",
            payment_id,
            payload.amount,
            payload.order_id
        );
        Ok(payment_id)
    }

    /// Remove o pagamento e desconta o valor do pedido (sem ficar negativo).
    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        let payment = self
            .repo
            .delete_returning(&mut *tx, id)
            .await?
            .ok_or(AppError::ResourceNotFound("payment"))?;

        self.order_repo
            .subtract_paid(&mut *tx, payment.order_id, payment.amount)
            .await?;

        tx.commit().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    use crate::common::test_fixtures::{self, dec};

    fn payment(order_id: Uuid, amount: &str) -> CreatePaymentPayload {
        CreatePaymentPayload {
            order_id,
            amount: dec(amount),
            payment_date: None,
            payment_method: Some(crate::models::payment::PaymentMethod::Card),
            notes: None,
        }
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn payments_move_the_order_balance_both_ways(pool: PgPool) {
        let orders = test_fixtures::order_service(&pool);
        let payments = test_fixtures::payment_service(&pool);
        let client_id = test_fixtures::client(&pool, "Sara Ahmed").await;

        // Pedido de 5000 com sinal de 2000
        let order_id = orders
            .create(&test_fixtures::new_order(client_id, Some("5000"), Some("2000"), vec![]))
            .await
            .unwrap();

        let payment_id = payments.record(&payment(order_id, "1000")).await.unwrap();

        let detail = orders.get(order_id).await.unwrap();
        assert_eq!(detail.header.summary.order.paid_amount, dec("3000"));
        assert_eq!(detail.header.balance.remaining_amount, dec("2000"));
        // Sinal + pagamento
        assert_eq!(detail.payments.len(), 2);

        payments.delete(payment_id).await.unwrap();

        let detail = orders.get(order_id).await.unwrap();
        assert_eq!(detail.header.summary.order.paid_amount, dec("2000"));
        assert_eq!(detail.header.balance.remaining_amount, dec("3000"));
        assert_eq!(detail.payments.len(), 1);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn overpayment_writes_nothing(pool: PgPool) {
        let orders = test_fixtures::order_service(&pool);
        let payments = test_fixtures::payment_service(&pool);
        let client_id = test_fixtures::client(&pool, "Mona Youssef").await;
        let order_id = orders
            .create(&test_fixtures::new_order(client_id, Some("5000"), Some("2000"), vec![]))
            .await
            .unwrap();

        let err = payments.record(&payment(order_id, "3000.01")).await.unwrap_err();
        assert_eq!(err.message_key(), "rule.payment_exceeds_balance");

        let detail = orders.get(order_id).await.unwrap();
        assert_eq!(detail.header.summary.order.paid_amount, dec("2000"));
        assert_eq!(detail.payments.len(), 1);

        // O saldo exato fecha o pedido
        payments.record(&payment(order_id, "3000")).await.unwrap();
        let pending = payments.list_pending().await.unwrap();
        assert!(pending.iter().all(|p| p.order_id != order_id));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn removing_a_payment_never_leaves_paid_below_zero(pool: PgPool) {
        let orders = test_fixtures::order_service(&pool);
        let client_id = test_fixtures::client(&pool, "Huda Salem").await;
        let order_id = orders
            .create(&test_fixtures::new_order(client_id, Some("1000"), None, vec![]))
            .await
            .unwrap();

        // Pagamento gravado sem passar pelo saldo do pedido (paid continua 0)
        let repo = PaymentRepository::new(pool.clone());
        let orphan = repo.create(&pool, &payment(order_id, "500")).await.unwrap();

        test_fixtures::payment_service(&pool).delete(orphan).await.unwrap();

        let detail = orders.get(order_id).await.unwrap();
        assert_eq!(detail.header.summary.order.paid_amount, Decimal::ZERO);
        assert_eq!(detail.header.balance.remaining_amount, dec("1000"));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn payments_for_missing_orders_are_not_found(pool: PgPool) {
        let payments = test_fixtures::payment_service(&pool);

        let err = payments.record(&payment(Uuid::new_v4(), "100")).await.unwrap_err();
        assert!(matches!(err, AppError::ResourceNotFound("order")));

        let err = payments.delete(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::ResourceNotFound("payment")));
    }
}
