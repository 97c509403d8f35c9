use crate::errors::AppError;
use storefront_types::domain::cart::Cart;
use storefront_types::domain::catalog::{categories, filter_products, CategoryFilter};
use storefront_types::domain::product::{NewProduct, Product, ProductPatch};
use storefront_types::domain::Id;
use storefront_types::ports::repository::Repository;

pub struct CatalogService<R: Repository<Product>> {
    repo: R,
}

impl<R: Repository<Product>> CatalogService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Products matching `search` and `category`, in catalog order.
    pub async fn list_products(
        &self,
        search: &str,
        category: &CategoryFilter,
    ) -> Result<Vec<Product>, AppError> {
        let all = self.repo.get_all().await?;
        let found = filter_products(&all, search, category);
        tracing::debug!(search, ?category, total = all.len(), found = found.len(), "listed products");
        Ok(found)
    }

    pub async fn categories(&self) -> Result<Vec<String>, AppError> {
        Ok(categories(&self.repo.get_all().await?))
    }

    pub async fn get_product(&self, id: Id) -> Result<Product, AppError> {
        Ok(self.repo.get_by_id(id).await?)
    }

    pub async fn create_product(&self, draft: NewProduct) -> Result<Product, AppError> {
        draft.validate()?;
        let product = self.repo.create(draft).await?;
        tracing::info!(product_id = product.id, name = %product.name, "product created");
        Ok(product)
    }

    pub async fn update_product(&self, id: Id, patch: ProductPatch) -> Result<Product, AppError> {
        patch.validate()?;
        let product = self.repo.update(id, patch).await?;
        tracing::info!(product_id = id, "product updated");
        Ok(product)
    }

    pub async fn delete_product(&self, id: Id) -> Result<Product, AppError> {
        let product = self.repo.delete(id).await?;
        tracing::info!(product_id = id, "product deleted");
        Ok(product)
    }

    /// Looks the product up and adds it to `cart`. Out-of-stock products
    /// are refused.
    pub async fn add_to_cart(
        &self,
        cart: &mut Cart,
        product_id: Id,
        quantity: u32,
    ) -> Result<(), AppError> {
        let product = self.repo.get_by_id(product_id).await?;
        if !product.in_stock {
            return Err(AppError::BadRequest(format!(
                "product {product_id} is out of stock"
            )));
        }
        cart.add_item(&product, quantity)?;
        Ok(())
    }
}
