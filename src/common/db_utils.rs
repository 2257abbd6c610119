// src/common/db_utils.rs

use sqlx::{Encode, Executor, Postgres, QueryBuilder, Type};
use uuid::Uuid;

use crate::common::error::AppError;

// ---
// Tradução de violações de constraint
// ---

/// Converte violações de unicidade/FK em erros amigáveis; o resto vira `DatabaseError`.
pub fn map_constraint_error(e: sqlx::Error, field: &str) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() {
            return AppError::UniqueConstraintViolation(field.to_string());
        }
        if db_err.is_foreign_key_violation() {
            let constraint = db_err.constraint().unwrap_or(field);
            return AppError::ForeignKeyViolation(constraint.to_string());
        }
    }
    e.into()
}

// ---
// UPDATE parcial
// ---

/// Monta um `UPDATE <tabela> SET ...` só com os campos presentes no payload.
/// Campos ausentes (`None`) não entram na query e mantêm o valor atual.
pub struct PartialUpdate<'args> {
    builder: QueryBuilder<'args, Postgres>,
    fields: usize,
}

impl<'args> PartialUpdate<'args> {
    pub fn new(table: &str) -> Self {
        Self {
            builder: QueryBuilder::new(format!("UPDATE {table} SET ")),
            fields: 0,
        }
    }

    pub fn set<T>(&mut self, column: &str, value: Option<T>) -> &mut Self
    where
        T: 'args + Encode<'args, Postgres> + Type<Postgres> + Send,
    {
        if let Some(value) = value {
            if self.fields > 0 {
                self.builder.push(", ");
            }
            self.builder.push(column).push(" = ").push_bind(value);
            self.fields += 1;
        }
        self
    }

    /// Marca `updated_at` quando a tabela tem a coluna. Não conta como campo.
    pub fn touch(&mut self) -> &mut Self {
        if self.fields > 0 {
            self.builder.push(", updated_at = NOW()");
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.fields == 0
    }

    #[cfg(test)]
    pub fn sql(&self) -> &str {
        self.builder.sql()
    }

    /// Executa filtrando pela chave primária. Retorna `true` se alguma linha foi alterada.
    pub async fn execute<'e, E>(mut self, executor: E, key_column: &str, id: Uuid) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        if self.is_empty() {
            return Err(AppError::EmptyUpdate);
        }

        self.builder.push(" WHERE ").push(key_column).push(" = ").push_bind(id);

        let result = self.builder.build().execute(executor).await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_present_fields_are_written() {
        let mut update = PartialUpdate::new("clients");
        update
            .set("full_name", Some("Sara Ahmed".to_string()))
            .set("phone", None::<String>)
            .set("email", Some("sara@example.com".to_string()));

        assert_eq!(update.sql(), "UPDATE clients SET full_name = $1, email = $2");
    }

    #[test]
    fn touch_appends_updated_at_after_fields() {
        let mut update = PartialUpdate::new("dresses");
        update.set("is_available", Some(false)).touch();

        assert_eq!(update.sql(), "UPDATE dresses SET is_available = $1, updated_at = NOW()");
    }

    #[test]
    fn empty_update_has_no_fields() {
        let mut update = PartialUpdate::new("orders");
        update.set("notes", None::<String>).touch();

        assert!(update.is_empty());
        assert_eq!(update.sql(), "UPDATE orders SET ");
    }
}
