use crate::errors::AppError;
use storefront_types::domain::cart::Cart;
use storefront_types::domain::order::{CheckoutDetails, NewOrder, Order, OrderStatus, Party};
use storefront_types::domain::order_view::{
    filter_orders, status_counts, OrderView, StatusCounts, StatusFilter,
};
use storefront_types::domain::role::Role;
use storefront_types::domain::Id;
use storefront_types::ports::repository::Repository;

pub struct OrderService<R: Repository<Order>> {
    repo: R,
}

impl<R: Repository<Order>> OrderService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Places the order for everything in `cart`. The cart is emptied only
    /// once the order is stored; on error it is left as it was.
    pub async fn checkout(
        &self,
        cart: &mut Cart,
        details: CheckoutDetails,
        customer: Party,
    ) -> Result<Order, AppError> {
        let draft = NewOrder::from_cart(cart, details, customer)?;
        let order = self.repo.create(draft).await?;
        cart.clear();
        tracing::info!(
            order_id = order.id,
            total = order.total_amount,
            lines = order.lines.len(),
            "order placed"
        );
        Ok(order)
    }

    pub async fn get_order(&self, id: Id) -> Result<Order, AppError> {
        Ok(self.repo.get_by_id(id).await?)
    }

    pub async fn list_orders(&self, filter: StatusFilter) -> Result<Vec<Order>, AppError> {
        let all = self.repo.get_all().await?;
        Ok(filter_orders(&all, filter))
    }

    pub async fn status_counts(&self) -> Result<StatusCounts, AppError> {
        Ok(status_counts(&self.repo.get_all().await?))
    }

    pub async fn view_order(&self, id: Id, role: Role) -> Result<OrderView, AppError> {
        let order = self.repo.get_by_id(id).await?;
        Ok(OrderView::new(&order, role))
    }

    /// Applies a status change requested by `actor` acting as `role`.
    pub async fn transition(
        &self,
        id: Id,
        to: OrderStatus,
        role: Role,
        actor: &Party,
    ) -> Result<Order, AppError> {
        let order = self.repo.get_by_id(id).await?;
        let patch = order.transition(to, role, actor)?;
        let updated = self.repo.update(id, patch).await?;
        tracing::info!(
            order_id = id,
            from = %order.status,
            to = %updated.status,
            %role,
            "order status changed"
        );
        Ok(updated)
    }

    pub async fn delete_order(&self, id: Id) -> Result<Order, AppError> {
        let order = self.repo.delete(id).await?;
        tracing::info!(order_id = id, "order deleted");
        Ok(order)
    }
}
