use crate::domain::event::OrderEvent;
use std::sync::Arc;

pub type DynStatusNotifier = Arc<dyn StatusNotifierTrait + Send + Sync>;

// implementations must not block the caller
pub trait StatusNotifierTrait {
    fn notify(&self, event: OrderEvent);
}
