pub mod assignment;
pub mod instrument;
pub mod order;
pub mod snapshot;
pub mod state_machine;
pub mod stock_ledger;
