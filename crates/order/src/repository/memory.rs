//! Process-local store backing all four repository traits.
//!
//! Every guarded write takes the single store lock for its whole
//! check-and-set, which gives the same atomicity the Postgres repositories
//! get from conditional `UPDATE ... WHERE` statements.

use crate::{
    abstract_trait::{
        order::repository::{AssignOutcome, OrderCommandRepositoryTrait, OrderQueryRepositoryTrait},
        product::{ProductCommandRepositoryTrait, ProductQueryRepositoryTrait},
    },
    domain::{
        status::OrderStatus,
        stock::{StockDelta, StockLevel, StockLine, StockUpdateOutcome},
    },
    model::{
        order::{Order, OrderPatch, StatusHistoryEntry},
        payment::PaymentIntentRecord,
        product::Product,
    },
};
use async_trait::async_trait;
use chrono::Utc;
use shared::errors::RepositoryError;
use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard},
};
use uuid::Uuid;

#[derive(Debug, Default)]
struct Inner {
    products: HashMap<Uuid, Product>,
    orders: HashMap<Uuid, Order>,
    intents: HashMap<String, PaymentIntentRecord>,
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    inner: Arc<Mutex<Inner>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>, RepositoryError> {
        self.inner
            .lock()
            .map_err(|_| RepositoryError::Custom("in-memory store lock poisoned".into()))
    }

    pub fn upsert_product(&self, product: Product) -> Result<(), RepositoryError> {
        self.lock()?.products.insert(product.product_id, product);
        Ok(())
    }

    pub fn product(&self, id: Uuid) -> Result<Option<Product>, RepositoryError> {
        Ok(self.lock()?.products.get(&id).cloned())
    }

    // seeds fixtures as-is, bypassing every guard
    pub fn insert_order(&self, order: Order) -> Result<(), RepositoryError> {
        self.lock()?.orders.insert(order.id, order);
        Ok(())
    }

    pub fn order(&self, id: Uuid) -> Result<Option<Order>, RepositoryError> {
        Ok(self.lock()?.orders.get(&id).cloned())
    }
}

#[async_trait]
impl ProductQueryRepositoryTrait for InMemoryStore {
    async fn find_product(&self, id: Uuid) -> Result<Option<Product>, RepositoryError> {
        self.product(id)
    }
}

#[async_trait]
impl ProductCommandRepositoryTrait for InMemoryStore {
    async fn conditional_update_product_stock(
        &self,
        deltas: &[StockDelta],
    ) -> Result<StockUpdateOutcome, RepositoryError> {
        let mut inner = self.lock()?;

        // validate the whole batch against a scratch copy before touching anything
        let mut scratch: HashMap<Uuid, (i32, i32)> = HashMap::new();
        let mut levels = Vec::with_capacity(deltas.len());

        for delta in deltas {
            let (quantity, sold) = match scratch.get(&delta.product_id) {
                Some(current) => *current,
                None => match inner.products.get(&delta.product_id) {
                    Some(product) => (product.quantity, product.sold),
                    None => return Ok(StockUpdateOutcome::Missing(delta.product_id)),
                },
            };

            if quantity < delta.qty_guard {
                return Ok(StockUpdateOutcome::Insufficient {
                    product_id: delta.product_id,
                    available: quantity,
                });
            }

            let quantity_after = quantity + delta.delta;
            scratch.insert(delta.product_id, (quantity_after, (sold - delta.delta).max(0)));
            levels.push(StockLevel {
                product_id: delta.product_id,
                quantity_before: quantity,
                quantity_after,
            });
        }

        let now = Utc::now();
        for (product_id, (quantity, sold)) in scratch {
            if let Some(product) = inner.products.get_mut(&product_id) {
                product.quantity = quantity;
                product.sold = sold;
                product.updated_at = now;
            }
        }

        Ok(StockUpdateOutcome::Applied(levels))
    }
}

#[async_trait]
impl OrderQueryRepositoryTrait for InMemoryStore {
    async fn find_order(&self, id: Uuid) -> Result<Option<Order>, RepositoryError> {
        self.order(id)
    }

    async fn list_orders_by_worker(
        &self,
        worker_id: Uuid,
        exclude_statuses: &[OrderStatus],
    ) -> Result<Vec<Order>, RepositoryError> {
        let inner = self.lock()?;
        let mut orders: Vec<Order> = inner
            .orders
            .values()
            .filter(|o| o.assigned_to == Some(worker_id) && !exclude_statuses.contains(&o.status))
            .cloned()
            .collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(orders)
    }

    async fn list_orders_by_buyer(&self, buyer_id: Uuid) -> Result<Vec<Order>, RepositoryError> {
        let inner = self.lock()?;
        let mut orders: Vec<Order> = inner
            .orders
            .values()
            .filter(|o| o.buyer_id == buyer_id)
            .cloned()
            .collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(orders)
    }

    async fn find_intent(
        &self,
        intent_id: &str,
    ) -> Result<Option<PaymentIntentRecord>, RepositoryError> {
        Ok(self.lock()?.intents.get(intent_id).cloned())
    }
}

#[async_trait]
impl OrderCommandRepositoryTrait for InMemoryStore {
    async fn create_order(&self, order: &Order) -> Result<Order, RepositoryError> {
        let mut inner = self.lock()?;
        if inner.orders.contains_key(&order.id) {
            return Err(RepositoryError::AlreadyExists(format!("order {}", order.id)));
        }
        if let Some(payment) = &order.payment_details {
            let reused = inner.orders.values().any(|o| {
                o.payment_details
                    .as_ref()
                    .is_some_and(|p| p.payment_id == payment.payment_id)
            });
            if reused {
                return Err(RepositoryError::AlreadyExists(format!(
                    "payment for order {}",
                    order.id
                )));
            }
        }
        inner.orders.insert(order.id, order.clone());
        Ok(order.clone())
    }

    async fn record_intent(&self, intent: &PaymentIntentRecord) -> Result<(), RepositoryError> {
        let mut inner = self.lock()?;
        if inner.intents.contains_key(&intent.intent_id) {
            return Err(RepositoryError::AlreadyExists(format!(
                "payment intent {}",
                intent.intent_id
            )));
        }
        inner.intents.insert(intent.intent_id.clone(), intent.clone());
        Ok(())
    }

    async fn conditional_update_order(
        &self,
        id: Uuid,
        expected_version: i64,
        patch: &OrderPatch,
    ) -> Result<Option<Order>, RepositoryError> {
        let mut inner = self.lock()?;
        match inner.orders.get_mut(&id) {
            Some(order) if order.version == expected_version => {
                order.apply_patch(patch, Utc::now());
                Ok(Some(order.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn assign_worker(
        &self,
        order_id: Uuid,
        worker_id: Uuid,
        entry: &StatusHistoryEntry,
    ) -> Result<AssignOutcome, RepositoryError> {
        let mut inner = self.lock()?;

        let worker_busy = inner.orders.values().any(|o| {
            o.id != order_id && o.assigned_to == Some(worker_id) && !o.status.is_terminal()
        });

        let Some(order) = inner.orders.get_mut(&order_id) else {
            return Ok(AssignOutcome::NotFound);
        };
        if order.assigned_to.is_some() {
            return Ok(AssignOutcome::AlreadyAssigned);
        }
        if order.status != OrderStatus::OrderPlaced {
            return Ok(AssignOutcome::NotAssignable(order.status));
        }
        if worker_busy {
            return Ok(AssignOutcome::WorkerBusy);
        }

        let patch = OrderPatch {
            status: Some(OrderStatus::Confirmed),
            assigned_to: Some(worker_id),
            history: Some(entry.clone()),
            ..Default::default()
        };
        order.apply_patch(&patch, Utc::now());

        Ok(AssignOutcome::Assigned(order.clone()))
    }

    async fn cancel_and_release(
        &self,
        id: Uuid,
        expected_version: i64,
        patch: &OrderPatch,
        release: &[StockLine],
    ) -> Result<Option<Order>, RepositoryError> {
        let mut inner = self.lock()?;
        let now = Utc::now();

        let cancelled = match inner.orders.get_mut(&id) {
            Some(order) if order.version == expected_version => {
                order.apply_patch(patch, now);
                order.clone()
            }
            _ => return Ok(None),
        };

        for line in release {
            if let Some(product) = inner.products.get_mut(&line.product_id) {
                product.quantity += line.qty;
                product.sold = (product.sold - line.qty).max(0);
                product.updated_at = now;
            }
        }

        Ok(Some(cancelled))
    }
}
