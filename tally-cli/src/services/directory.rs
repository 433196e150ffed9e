//! Customer Directory Service
//!
//! Owns customer records; enforces email uniqueness. Deletion takes an
//! externally supplied "has orders" predicate so the directory never
//! depends on the order lifecycle directly.

use std::future::Future;
use std::sync::Arc;

use shared::models::{Customer, CustomerCreate, CustomerUpdate};
use tally_store::{from_row, to_row, Filter, OrderBy, RowStore};

use crate::error::{AppError, AppResult};
use crate::services::{expect_row, find_one, LIST_LIMIT};

const TABLE: &str = "customers";

/// Customer directory operations
#[derive(Clone)]
pub struct CustomerService {
    store: Arc<dyn RowStore>,
}

impl CustomerService {
    pub fn new(store: Arc<dyn RowStore>) -> Self {
        Self { store }
    }

    // ========== Create ==========

    pub async fn add(&self, data: CustomerCreate) -> AppResult<Customer> {
        let existing =
            find_one(&*self.store, TABLE, &[Filter::eq("email", data.email.clone())]).await?;
        if existing.is_some() {
            return Err(AppError::DuplicateEmail(data.email));
        }

        let inserted = self.store.insert(TABLE, to_row(&data)?).await?;
        let customer: Customer = from_row(expect_row(inserted)?)?;

        tracing::info!(cust_id = customer.cust_id, "customer added");
        Ok(customer)
    }

    // ========== Read ==========

    pub async fn get_by_id(&self, cust_id: i64) -> AppResult<Customer> {
        let row = find_one(&*self.store, TABLE, &[Filter::eq("cust_id", cust_id)])
            .await?
            .ok_or_else(|| AppError::not_found("Customer", cust_id))?;
        Ok(from_row(row)?)
    }

    pub async fn get_by_email(&self, email: &str) -> AppResult<Customer> {
        let row = find_one(&*self.store, TABLE, &[Filter::eq("email", email)])
            .await?
            .ok_or_else(|| AppError::not_found("Customer", email))?;
        Ok(from_row(row)?)
    }

    pub async fn list(&self, city: Option<&str>, limit: usize) -> AppResult<Vec<Customer>> {
        let mut filters = Vec::new();
        if let Some(city) = city {
            filters.push(Filter::eq("city", city));
        }

        let rows = self
            .store
            .select(TABLE, &filters, Some(OrderBy::asc("cust_id")), Some(limit))
            .await?;
        rows.into_iter()
            .map(|row| from_row(row).map_err(AppError::from))
            .collect()
    }

    /// Union of the email match (if any) and the city matches, without
    /// duplicating the email hit
    pub async fn search(
        &self,
        email: Option<&str>,
        city: Option<&str>,
    ) -> AppResult<Vec<Customer>> {
        let mut results: Vec<Customer> = Vec::new();

        if let Some(email) = email {
            if let Some(row) = find_one(&*self.store, TABLE, &[Filter::eq("email", email)]).await? {
                results.push(from_row(row)?);
            }
        }

        if let Some(city) = city {
            for customer in self.list(Some(city), LIST_LIMIT).await? {
                if !results.iter().any(|c| c.cust_id == customer.cust_id) {
                    results.push(customer);
                }
            }
        }

        Ok(results)
    }

    // ========== Update ==========

    pub async fn update(&self, cust_id: i64, fields: CustomerUpdate) -> AppResult<Customer> {
        if fields.is_empty() {
            return Err(AppError::NoFieldsProvided);
        }
        self.get_by_id(cust_id).await?;

        let updated = self
            .store
            .update(TABLE, &[Filter::eq("cust_id", cust_id)], to_row(&fields)?)
            .await?;
        Ok(from_row(expect_row(updated)?)?)
    }

    // ========== Delete ==========

    /// Remove a customer, returning the removed record.
    ///
    /// `has_orders` is a capability supplied by the caller; deletion is
    /// blocked while it reports existing orders for this customer.
    pub async fn delete<F, Fut>(&self, cust_id: i64, has_orders: F) -> AppResult<Customer>
    where
        F: FnOnce(i64) -> Fut,
        Fut: Future<Output = AppResult<bool>>,
    {
        let customer = self.get_by_id(cust_id).await?;

        if has_orders(cust_id).await? {
            return Err(AppError::HasExistingOrders);
        }

        self.store
            .delete(TABLE, &[Filter::eq("cust_id", cust_id)])
            .await?;

        tracing::info!(cust_id, "customer deleted");
        Ok(customer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tally_store::MemoryStore;

    fn service() -> CustomerService {
        CustomerService::new(Arc::new(MemoryStore::new()))
    }

    fn ana() -> CustomerCreate {
        CustomerCreate {
            name: "Ana".into(),
            email: "ana@example.com".into(),
            phone: "111".into(),
            city: "Lisbon".into(),
        }
    }

    #[tokio::test]
    async fn add_and_fetch_by_email() {
        let directory = service();
        let created = directory.add(ana()).await.unwrap();

        let fetched = directory.get_by_email("ana@example.com").await.unwrap();
        assert_eq!(fetched.cust_id, created.cust_id);
        assert_eq!(fetched.city.as_deref(), Some("Lisbon"));
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let directory = service();
        directory.add(ana()).await.unwrap();

        let err = directory.add(ana()).await.unwrap_err();
        assert!(matches!(err, AppError::DuplicateEmail(email) if email == "ana@example.com"));
    }

    #[tokio::test]
    async fn update_requires_at_least_one_field() {
        let directory = service();
        let customer = directory.add(ana()).await.unwrap();

        let err = directory
            .update(customer.cust_id, CustomerUpdate::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NoFieldsProvided));

        let updated = directory
            .update(
                customer.cust_id,
                CustomerUpdate {
                    city: Some("Porto".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.city.as_deref(), Some("Porto"));
        assert_eq!(updated.phone.as_deref(), Some("111"));
    }

    #[tokio::test]
    async fn delete_is_blocked_while_orders_exist() {
        let directory = service();
        let customer = directory.add(ana()).await.unwrap();

        let err = directory
            .delete(customer.cust_id, |_| async { Ok(true) })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::HasExistingOrders));

        let removed = directory
            .delete(customer.cust_id, |_| async { Ok(false) })
            .await
            .unwrap();
        assert_eq!(removed.email, "ana@example.com");
    }

    #[tokio::test]
    async fn delete_of_unknown_customer_is_not_found() {
        let directory = service();

        let err = directory.delete(42, |_| async { Ok(false) }).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound { kind: "Customer", .. }));
    }

    #[tokio::test]
    async fn search_unions_email_and_city_without_duplicates() {
        let directory = service();
        let a = directory.add(ana()).await.unwrap();
        directory
            .add(CustomerCreate {
                name: "Bea".into(),
                email: "bea@example.com".into(),
                phone: "222".into(),
                city: "Lisbon".into(),
            })
            .await
            .unwrap();

        let hits = directory
            .search(Some("ana@example.com"), Some("Lisbon"))
            .await
            .unwrap();

        assert_eq!(hits.len(), 2);
        // the email hit comes first and is not repeated among city hits
        assert_eq!(hits[0].cust_id, a.cust_id);
    }
}
