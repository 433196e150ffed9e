//! Product Catalog Service
//!
//! Owns product records and stock counts. Enforces SKU uniqueness and
//! positive pricing; stock never goes negative through this service.

use std::sync::Arc;

use serde_json::json;

use shared::models::{Product, ProductCreate, ProductUpdate};
use tally_store::{from_row, to_row, Filter, OrderBy, RowStore};

use crate::error::{AppError, AppResult};
use crate::services::{expect_row, find_one};

const TABLE: &str = "products";

/// Soft cap for the low-stock scan; not a pagination contract
const LOW_STOCK_SCAN_LIMIT: usize = 1000;

/// Product catalog operations
#[derive(Clone)]
pub struct CatalogService {
    store: Arc<dyn RowStore>,
}

impl CatalogService {
    pub fn new(store: Arc<dyn RowStore>) -> Self {
        Self { store }
    }

    // ========== Create ==========

    /// Validate and insert a new product. Stock defaults to 0.
    pub async fn add(&self, data: ProductCreate) -> AppResult<Product> {
        if data.price <= 0.0 {
            return Err(AppError::InvalidPrice);
        }

        let existing = find_one(&*self.store, TABLE, &[Filter::eq("sku", data.sku.clone())]).await?;
        if existing.is_some() {
            return Err(AppError::DuplicateSku(data.sku));
        }

        let row = to_row(&json!({
            "name": data.name,
            "sku": data.sku,
            "price": data.price,
            "stock": data.stock.unwrap_or(0),
            "category": data.category,
        }))?;
        let inserted = self.store.insert(TABLE, row).await?;
        let product: Product = from_row(expect_row(inserted)?)?;

        tracing::info!(prod_id = product.prod_id, sku = %product.sku, "product added");
        Ok(product)
    }

    // ========== Read ==========

    pub async fn get_by_id(&self, prod_id: i64) -> AppResult<Product> {
        let row = find_one(&*self.store, TABLE, &[Filter::eq("prod_id", prod_id)])
            .await?
            .ok_or_else(|| AppError::not_found("Product", prod_id))?;
        Ok(from_row(row)?)
    }

    pub async fn get_by_sku(&self, sku: &str) -> AppResult<Product> {
        let row = find_one(&*self.store, TABLE, &[Filter::eq("sku", sku)])
            .await?
            .ok_or_else(|| AppError::not_found("Product", sku))?;
        Ok(from_row(row)?)
    }

    pub async fn list(&self, category: Option<&str>, limit: usize) -> AppResult<Vec<Product>> {
        let mut filters = Vec::new();
        if let Some(category) = category {
            filters.push(Filter::eq("category", category));
        }

        let rows = self
            .store
            .select(TABLE, &filters, Some(OrderBy::asc("prod_id")), Some(limit))
            .await?;
        rows.into_iter()
            .map(|row| from_row(row).map_err(AppError::from))
            .collect()
    }

    /// Products with stock at or below the threshold, scanning at most
    /// the first `LOW_STOCK_SCAN_LIMIT` catalog rows
    pub async fn low_stock(&self, threshold: i64) -> AppResult<Vec<Product>> {
        let all = self.list(None, LOW_STOCK_SCAN_LIMIT).await?;
        Ok(all.into_iter().filter(|p| p.stock <= threshold).collect())
    }

    // ========== Update ==========

    pub async fn update(&self, prod_id: i64, fields: ProductUpdate) -> AppResult<Product> {
        if fields.is_empty() {
            return Err(AppError::NoFieldsProvided);
        }
        // existence check first, so an absent id reports NotFound
        self.get_by_id(prod_id).await?;

        let updated = self
            .store
            .update(TABLE, &[Filter::eq("prod_id", prod_id)], to_row(&fields)?)
            .await?;
        Ok(from_row(expect_row(updated)?)?)
    }

    /// Add `delta` units of stock. Delta must be positive.
    pub async fn restock(&self, prod_id: i64, delta: i64) -> AppResult<Product> {
        if delta <= 0 {
            return Err(AppError::InvalidDelta);
        }
        let product = self.get_by_id(prod_id).await?;

        let updated = self
            .store
            .update(
                TABLE,
                &[Filter::eq("prod_id", prod_id)],
                to_row(&json!({ "stock": product.stock + delta }))?,
            )
            .await?;
        let product: Product = from_row(expect_row(updated)?)?;

        tracing::info!(prod_id, delta, stock = product.stock, "product restocked");
        Ok(product)
    }

    // ========== Delete ==========

    /// Remove a product, returning the removed record
    pub async fn delete(&self, prod_id: i64) -> AppResult<Product> {
        let product = self.get_by_id(prod_id).await?;
        self.store
            .delete(TABLE, &[Filter::eq("prod_id", prod_id)])
            .await?;

        tracing::info!(prod_id, sku = %product.sku, "product deleted");
        Ok(product)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tally_store::MemoryStore;

    fn service() -> CatalogService {
        CatalogService::new(Arc::new(MemoryStore::new()))
    }

    fn mug(sku: &str) -> ProductCreate {
        ProductCreate {
            name: "Mug".into(),
            sku: sku.into(),
            price: 9.5,
            stock: None,
            category: Some("kitchen".into()),
        }
    }

    #[tokio::test]
    async fn add_defaults_stock_to_zero_and_echoes_input() {
        let catalog = service();

        let product = catalog.add(mug("MUG-1")).await.unwrap();

        assert_eq!(product.name, "Mug");
        assert_eq!(product.sku, "MUG-1");
        assert_eq!(product.price, 9.5);
        assert_eq!(product.stock, 0);
        assert_eq!(product.category.as_deref(), Some("kitchen"));
    }

    #[tokio::test]
    async fn duplicate_sku_is_rejected() {
        let catalog = service();
        catalog.add(mug("MUG-1")).await.unwrap();

        let err = catalog.add(mug("MUG-1")).await.unwrap_err();
        assert!(matches!(err, AppError::DuplicateSku(sku) if sku == "MUG-1"));
    }

    #[tokio::test]
    async fn non_positive_price_is_rejected() {
        let catalog = service();
        let mut data = mug("MUG-1");
        data.price = 0.0;

        let err = catalog.add(data).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidPrice));
    }

    #[tokio::test]
    async fn restock_adds_delta_to_stock() {
        let catalog = service();
        let mut data = mug("MUG-1");
        data.stock = Some(3);
        let product = catalog.add(data).await.unwrap();

        let product = catalog.restock(product.prod_id, 4).await.unwrap();
        assert_eq!(product.stock, 7);
    }

    #[tokio::test]
    async fn restock_rejects_non_positive_delta() {
        let catalog = service();
        let product = catalog.add(mug("MUG-1")).await.unwrap();

        let err = catalog.restock(product.prod_id, 0).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidDelta));
    }

    #[tokio::test]
    async fn restock_of_unknown_product_is_not_found() {
        let catalog = service();

        let err = catalog.restock(99, 1).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound { kind: "Product", .. }));
    }

    #[tokio::test]
    async fn update_rejects_empty_field_set() {
        let catalog = service();
        let product = catalog.add(mug("MUG-1")).await.unwrap();

        let err = catalog
            .update(product.prod_id, ProductUpdate::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NoFieldsProvided));
    }

    #[tokio::test]
    async fn update_changes_only_the_given_fields() {
        let catalog = service();
        let product = catalog.add(mug("MUG-1")).await.unwrap();

        let update = ProductUpdate {
            price: Some(12.0),
            ..Default::default()
        };
        let product = catalog.update(product.prod_id, update).await.unwrap();

        assert_eq!(product.price, 12.0);
        assert_eq!(product.name, "Mug");
    }

    #[tokio::test]
    async fn low_stock_filters_at_or_below_threshold() {
        let catalog = service();
        for (sku, stock) in [("A-1", 2), ("B-1", 5), ("C-1", 9)] {
            let mut data = mug(sku);
            data.stock = Some(stock);
            catalog.add(data).await.unwrap();
        }

        let low = catalog.low_stock(5).await.unwrap();
        let skus: Vec<_> = low.iter().map(|p| p.sku.as_str()).collect();
        assert_eq!(skus, vec!["A-1", "B-1"]);
    }

    #[tokio::test]
    async fn delete_returns_the_removed_product() {
        let catalog = service();
        let product = catalog.add(mug("MUG-1")).await.unwrap();

        let removed = catalog.delete(product.prod_id).await.unwrap();
        assert_eq!(removed.sku, "MUG-1");

        let err = catalog.get_by_id(product.prod_id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn list_filters_by_category() {
        let catalog = service();
        catalog.add(mug("MUG-1")).await.unwrap();
        let mut other = mug("PEN-1");
        other.category = Some("office".into());
        catalog.add(other).await.unwrap();

        let office = catalog.list(Some("office"), 100).await.unwrap();
        assert_eq!(office.len(), 1);
        assert_eq!(office[0].sku, "PEN-1");
    }
}
