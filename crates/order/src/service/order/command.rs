use super::OrderSettings;
use crate::{
    abstract_trait::{
        gateway::{DynPaymentGateway, PaymentIntent},
        notifier::DynStatusNotifier,
        order::{
            repository::{DynOrderCommandRepository, DynOrderQueryRepository},
            service::OrderCommandServiceTrait,
        },
        product::{DynProductCommandRepository, DynProductQueryRepository},
    },
    domain::{
        actor::{Actor, Role},
        event::OrderEvent,
        requests::{
            order::{CreateOrderLineRequest, CreateOrderRequest, PaymentProof},
            payment::CreatePaymentIntentRequest,
            validation_messages,
        },
        response::{
            api::ApiResponse,
            order::{CancelOrderResponse, OrderResponse},
            payment::PaymentIntentResponse,
        },
        snapshot::CURRENT_SNAPSHOT_VERSION,
        status::{OrderStatus, PaymentMethod},
        stock::StockLine,
    },
    model::{
        order::{
            CurrentStatus, Order, OrderLine, OrderPatch, PaymentDetails, RefundDetails,
            RefundStatus, StatusHistoryEntry,
        },
        payment::PaymentIntentRecord,
        product::Product,
    },
    service::{
        assignment::AssignmentGuard, instrument::ServiceInstrument,
        snapshot::SnapshotBuilder, state_machine::OrderStateMachine, stock_ledger::StockLedger,
    },
};
use async_trait::async_trait;
use chrono::Utc;
use opentelemetry::KeyValue;
use prometheus_client::registry::Registry;
use shared::{
    errors::{RepositoryError, ServiceError},
    utils::Method,
};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info, warn};
use uuid::Uuid;
use validator::Validate;

const MAX_WRITE_ATTEMPTS: usize = 3;

#[derive(Clone)]
pub struct OrderCommandService {
    products: DynProductQueryRepository,
    ledger: StockLedger,
    guard: AssignmentGuard,
    query: DynOrderQueryRepository,
    command: DynOrderCommandRepository,
    gateway: DynPaymentGateway,
    notifier: DynStatusNotifier,
    settings: OrderSettings,
    instrument: ServiceInstrument,
}

pub struct OrderCommandServiceDeps {
    pub product_query: DynProductQueryRepository,
    pub product_command: DynProductCommandRepository,
    pub query: DynOrderQueryRepository,
    pub command: DynOrderCommandRepository,
    pub gateway: DynPaymentGateway,
    pub notifier: DynStatusNotifier,
    pub settings: OrderSettings,
    pub registry: Arc<Mutex<Registry>>,
}

struct PricedLine {
    product: Product,
    qty: i32,
}

impl OrderCommandService {
    pub async fn new(deps: OrderCommandServiceDeps) -> Self {
        let OrderCommandServiceDeps {
            product_query,
            product_command,
            query,
            command,
            gateway,
            notifier,
            settings,
            registry,
        } = deps;

        let instrument = ServiceInstrument::new(
            "order-command-service",
            "order_command_service",
            "OrderCommandService",
            &registry,
        )
        .await;

        Self {
            products: product_query,
            ledger: StockLedger::new(product_command),
            guard: AssignmentGuard::new(query.clone(), command.clone()),
            query,
            command,
            gateway,
            notifier,
            settings,
            instrument,
        }
    }

    async fn load_order(&self, order_id: Uuid) -> Result<Order, ServiceError> {
        self.query
            .find_order(order_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Order {order_id}")))
    }

    // duplicate lines merge, the catalog price always wins
    async fn price_lines(
        &self,
        lines: &[CreateOrderLineRequest],
    ) -> Result<Vec<PricedLine>, ServiceError> {
        let merged = StockLedger::merge_lines(
            &lines
                .iter()
                .map(|l| StockLine {
                    product_id: l.product_id,
                    qty: l.qty,
                })
                .collect::<Vec<_>>(),
        );

        let mut priced = Vec::with_capacity(merged.len());
        for line in merged {
            let product = self
                .products
                .find_product(line.product_id)
                .await?
                .ok_or(ServiceError::ProductNotFound(line.product_id))?;

            if let Some(client_price) = lines
                .iter()
                .filter(|l| l.product_id == line.product_id)
                .find_map(|l| l.price)
                .filter(|price| *price != product.price)
            {
                warn!(
                    "⚠️ Client price {client_price} for product {} ignored, catalog price is {}",
                    product.product_id, product.price
                );
            }

            priced.push(PricedLine {
                product,
                qty: line.qty,
            });
        }

        Ok(priced)
    }

    fn total_for(&self, lines: &[PricedLine]) -> Result<i64, ServiceError> {
        lines
            .iter()
            .try_fold(self.settings.shipping_fee, |acc, line| {
                line.product
                    .price
                    .checked_mul(i64::from(line.qty))
                    .and_then(|subtotal| acc.checked_add(subtotal))
            })
            .ok_or_else(|| ServiceError::Validation(vec!["order total is too large".into()]))
    }

    fn payment_proof<'r>(
        &self,
        req: &'r CreateOrderRequest,
    ) -> Result<Option<&'r PaymentProof>, ServiceError> {
        match (req.payment_method, &req.payment_proof) {
            (PaymentMethod::Cod, None) => Ok(None),
            (PaymentMethod::Cod, Some(_)) => Err(ServiceError::Validation(vec![
                "paymentProof: not accepted for COD orders".into(),
            ])),
            (PaymentMethod::Online, None) => Err(ServiceError::Validation(vec![
                "paymentProof: required for Online orders".into(),
            ])),
            (PaymentMethod::Online, Some(proof)) => {
                self.gateway.verify(proof)?;
                Ok(Some(proof))
            }
        }
    }

    async fn bind_intent(
        &self,
        actor: &Actor,
        proof: &PaymentProof,
        total: i64,
    ) -> Result<PaymentDetails, ServiceError> {
        let Some(intent) = self.query.find_intent(&proof.intent_id).await? else {
            warn!("⚠️ Payment intent {} was never opened here", proof.intent_id);
            return Err(ServiceError::PaymentVerificationFailed);
        };

        if intent.buyer_id != actor.id
            || intent.amount != total
            || intent.currency != self.settings.currency
        {
            warn!(
                "⚠️ Payment intent {} covers {} {} for buyer {}, order needs {} {} for buyer {}",
                intent.intent_id,
                intent.amount,
                intent.currency,
                intent.buyer_id,
                total,
                self.settings.currency,
                actor.id
            );
            return Err(ServiceError::PaymentVerificationFailed);
        }

        Ok(PaymentDetails::from(proof.clone()))
    }

    async fn place_order(&self, actor: &Actor, req: &CreateOrderRequest) -> Result<Order, ServiceError> {
        actor.require(Role::Buyer)?;
        req.validate()
            .map_err(|e| ServiceError::Validation(validation_messages(&e)))?;

        let proof = self.payment_proof(req)?;
        let priced = self.price_lines(&req.lines).await?;
        let total = self.total_for(&priced)?;
        let payment_details = match proof {
            Some(proof) => Some(self.bind_intent(actor, proof, total).await?),
            None => None,
        };

        let stock_lines: Vec<StockLine> = priced
            .iter()
            .map(|l| StockLine {
                product_id: l.product.product_id,
                qty: l.qty,
            })
            .collect();
        let reservations = self.ledger.reserve(&stock_lines).await?;

        let lines: Vec<OrderLine> = priced
            .iter()
            .zip(&reservations)
            .map(|(line, reservation)| OrderLine {
                product_id: line.product.product_id,
                qty: line.qty,
                price_at_purchase: line.product.price,
                snapshot: SnapshotBuilder::freeze(&line.product, reservation.stock_before),
            })
            .collect();

        let now = Utc::now();
        let order = Order {
            id: Uuid::new_v4(),
            buyer_id: actor.id,
            lines,
            address: req.address.clone(),
            payment_method: req.payment_method,
            shipping_fee: self.settings.shipping_fee,
            total,
            status: OrderStatus::OrderPlaced,
            assigned_to: None,
            status_history: vec![StatusHistoryEntry {
                status: OrderStatus::OrderPlaced,
                changed_at: now,
                changed_by: actor.id,
            }],
            current_status: CurrentStatus {
                status: OrderStatus::OrderPlaced,
                updated_at: now,
            },
            payment_details,
            refund_details: None,
            cancelled_at: None,
            snapshot_version: CURRENT_SNAPSHOT_VERSION.to_string(),
            version: 0,
            created_at: now,
            updated_at: now,
        };

        match self.command.create_order(&order).await {
            Ok(order) => Ok(order),
            Err(RepositoryError::AlreadyExists(what)) if order.payment_details.is_some() => {
                warn!("⚠️ Rejecting order {}, {what} is already taken", order.id);
                self.ledger.compensate(&reservations).await;
                Err(ServiceError::PaymentVerificationFailed)
            }
            Err(e) => {
                error!("❌ Persisting order {} failed, releasing stock: {e}", order.id);
                self.ledger.compensate(&reservations).await;
                Err(e.into())
            }
        }
    }

    async fn transition(
        &self,
        actor: &Actor,
        order_id: Uuid,
        requested: OrderStatus,
    ) -> Result<Order, ServiceError> {
        for attempt in 1..=MAX_WRITE_ATTEMPTS {
            let order = self.load_order(order_id).await?;
            let patch = OrderStateMachine::plan(&order, requested, actor, Utc::now())?;

            let written = match requested {
                OrderStatus::Cancelled => {
                    let release = StockLedger::merge_lines(&order.stock_lines());
                    self.command
                        .cancel_and_release(order_id, order.version, &patch, &release)
                        .await?
                }
                _ => {
                    self.command
                        .conditional_update_order(order_id, order.version, &patch)
                        .await?
                }
            };

            if let Some(updated) = written {
                info!("🔄 Order {order_id} moved {} -> {}", order.status, updated.status);
                self.notify_status(&updated, actor);
                return Ok(updated);
            }

            warn!("⚠️ Version conflict on order {order_id} (attempt {attempt})");
        }

        Err(RepositoryError::Conflict(format!("order {order_id} is being modified concurrently")).into())
    }

    async fn cancel(&self, actor: &Actor, order_id: Uuid) -> Result<Order, ServiceError> {
        let cancelled = self.transition(actor, order_id, OrderStatus::Cancelled).await?;

        if !cancelled.has_captured_payment() {
            return Ok(cancelled);
        }

        let refund = self.refund(&cancelled).await;
        self.record_refund(cancelled, refund).await
    }

    async fn refund(&self, order: &Order) -> RefundDetails {
        let payment_id = order
            .payment_details
            .as_ref()
            .map(|details| details.payment_id.as_str())
            .unwrap_or_default();

        match self.gateway.refund(payment_id, order.total).await {
            Ok(receipt) => RefundDetails {
                refund_id: Some(receipt.refund_id),
                amount: receipt.amount,
                status: RefundStatus::Processed,
                error: false,
                error_message: None,
                processed_at: Utc::now(),
            },
            Err(e) => {
                warn!("⚠️ Refund for order {} failed, recording it: {e}", order.id);
                RefundDetails {
                    refund_id: None,
                    amount: order.total,
                    status: RefundStatus::Failed,
                    error: true,
                    error_message: Some(e.to_string()),
                    processed_at: Utc::now(),
                }
            }
        }
    }

    async fn record_refund(
        &self,
        mut order: Order,
        refund: RefundDetails,
    ) -> Result<Order, ServiceError> {
        let patch = OrderPatch {
            refund_details: Some(refund),
            ..Default::default()
        };

        for attempt in 1..=MAX_WRITE_ATTEMPTS {
            if let Some(updated) = self
                .command
                .conditional_update_order(order.id, order.version, &patch)
                .await?
            {
                return Ok(updated);
            }

            warn!("⚠️ Version conflict recording refund on {} (attempt {attempt})", order.id);
            order = self.load_order(order.id).await?;
        }

        Err(RepositoryError::Conflict(format!("order {} refund could not be recorded", order.id)).into())
    }

    async fn open_intent(
        &self,
        actor: &Actor,
        req: &CreatePaymentIntentRequest,
    ) -> Result<PaymentIntent, ServiceError> {
        actor.require(Role::Buyer)?;
        req.validate()
            .map_err(|e| ServiceError::Validation(validation_messages(&e)))?;

        let priced = self.price_lines(&req.lines).await?;
        if let Some(short) = priced.iter().find(|l| l.product.quantity < l.qty) {
            return Err(ServiceError::OutOfStock {
                product_id: short.product.product_id,
                requested: short.qty,
                available: short.product.quantity,
            });
        }

        let amount = self.total_for(&priced)?;
        let receipt = format!("rcpt_{}", Uuid::new_v4().simple());
        let intent = self
            .gateway
            .create_intent(amount, &self.settings.currency, &receipt)
            .await?;

        self.command
            .record_intent(&PaymentIntentRecord {
                intent_id: intent.intent_id.clone(),
                buyer_id: actor.id,
                amount: intent.amount,
                currency: intent.currency.clone(),
                created_at: Utc::now(),
            })
            .await?;

        Ok(intent)
    }

    fn notify_status(&self, order: &Order, actor: &Actor) {
        self.notifier.notify(OrderEvent::StatusChanged {
            order_id: order.id,
            buyer_id: order.buyer_id,
            assigned_to: order.assigned_to,
            status: order.status,
            changed_by: actor.id,
            changed_at: order.current_status.updated_at,
        });
    }
}

#[async_trait]
impl OrderCommandServiceTrait for OrderCommandService {
    async fn create_order(
        &self,
        actor: &Actor,
        req: &CreateOrderRequest,
    ) -> Result<ApiResponse<OrderResponse>, ServiceError> {
        info!("🏗️ Creating new order for buyer_id={}", actor.id);

        let method = Method::Post;
        let tracing_ctx = self.instrument.start_tracing(
            "create_order",
            vec![
                KeyValue::new("component", "order"),
                KeyValue::new("operation", "create"),
                KeyValue::new("order.buyer_id", actor.id.to_string()),
            ],
        );

        let result = self.place_order(actor, req).await;
        let order = self
            .instrument
            .finish(&tracing_ctx, method, "Order created", result)?;

        self.notifier.notify(OrderEvent::Created {
            order_id: order.id,
            buyer_id: order.buyer_id,
            total: order.total,
        });

        Ok(ApiResponse::success(
            "Order created successfully",
            OrderResponse::from(order),
        ))
    }

    async fn cancel_order(
        &self,
        actor: &Actor,
        order_id: Uuid,
    ) -> Result<ApiResponse<CancelOrderResponse>, ServiceError> {
        info!("🛑 Cancelling order {order_id} for actor {}", actor.id);

        let method = Method::Post;
        let tracing_ctx = self.instrument.start_tracing(
            "cancel_order",
            vec![
                KeyValue::new("component", "order"),
                KeyValue::new("operation", "cancel"),
                KeyValue::new("order_id", order_id.to_string()),
            ],
        );

        let result = self.cancel(actor, order_id).await;
        let order = self
            .instrument
            .finish(&tracing_ctx, method, "Order cancelled", result)?;

        Ok(ApiResponse::success(
            "Order cancelled successfully",
            CancelOrderResponse::from(&order),
        ))
    }

    async fn assign_order(
        &self,
        actor: &Actor,
        order_id: Uuid,
    ) -> Result<ApiResponse<OrderResponse>, ServiceError> {
        info!("🤝 Worker {} claiming order {order_id}", actor.id);

        let method = Method::Post;
        let tracing_ctx = self.instrument.start_tracing(
            "assign_order",
            vec![
                KeyValue::new("component", "order"),
                KeyValue::new("operation", "assign"),
                KeyValue::new("order_id", order_id.to_string()),
                KeyValue::new("worker_id", actor.id.to_string()),
            ],
        );

        let result = self.guard.try_assign(actor, order_id).await;
        let order = self
            .instrument
            .finish(&tracing_ctx, method, "Order assigned", result)?;

        self.notify_status(&order, actor);

        Ok(ApiResponse::success(
            "Order assigned successfully",
            OrderResponse::from(order),
        ))
    }

    async fn advance_status(
        &self,
        actor: &Actor,
        order_id: Uuid,
        status: OrderStatus,
    ) -> Result<ApiResponse<OrderResponse>, ServiceError> {
        info!("✏️ Moving order {order_id} to {status}");

        let method = Method::Put;
        let tracing_ctx = self.instrument.start_tracing(
            "advance_status",
            vec![
                KeyValue::new("component", "order"),
                KeyValue::new("operation", "advance_status"),
                KeyValue::new("order_id", order_id.to_string()),
                KeyValue::new("status", status.as_str()),
            ],
        );

        let result = match status {
            OrderStatus::Cancelled => self.cancel(actor, order_id).await,
            _ => self.transition(actor, order_id, status).await,
        };
        let order = self
            .instrument
            .finish(&tracing_ctx, method, "Order status updated", result)?;

        Ok(ApiResponse::success(
            "Order status updated successfully",
            OrderResponse::from(order),
        ))
    }

    async fn create_payment_intent(
        &self,
        actor: &Actor,
        req: &CreatePaymentIntentRequest,
    ) -> Result<ApiResponse<PaymentIntentResponse>, ServiceError> {
        info!("💳 Creating payment intent for buyer_id={}", actor.id);

        let method = Method::Post;
        let tracing_ctx = self.instrument.start_tracing(
            "create_payment_intent",
            vec![
                KeyValue::new("component", "payment"),
                KeyValue::new("operation", "create_intent"),
                KeyValue::new("buyer_id", actor.id.to_string()),
            ],
        );

        let result = self.open_intent(actor, req).await;

        let intent = self
            .instrument
            .finish(&tracing_ctx, method, "Payment intent created", result)?;

        Ok(ApiResponse::success(
            "Payment intent created successfully",
            PaymentIntentResponse {
                intent_id: intent.intent_id,
                amount: intent.amount,
                currency: intent.currency,
                receipt: intent.receipt,
                checkout_payload: intent.checkout_payload,
            },
        ))
    }
}
