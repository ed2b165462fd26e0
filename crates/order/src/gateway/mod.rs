mod razorpay;
mod signature;

pub use self::razorpay::RazorpayGateway;
pub use self::signature::{sign_payment, verify_payment_signature};
