mod command;
mod query;

pub use self::command::OrderCommandRepository;
pub use self::query::OrderQueryRepository;

pub(crate) const ORDER_COLUMNS: &str = r#"
    order_id, buyer_id, lines, address, payment_method, shipping_fee, total,
    status, assigned_to, status_history, status_updated_at, payment_details,
    refund_details, cancelled_at, snapshot_version, version, created_at, updated_at
"#;
