use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum OrderStatus {
    OrderPlaced,
    Confirmed,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub const TERMINAL: [OrderStatus; 2] = [OrderStatus::Delivered, OrderStatus::Cancelled];

    pub fn is_terminal(self) -> bool {
        Self::TERMINAL.contains(&self)
    }

    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        use OrderStatus::*;

        matches!(
            (self, next),
            (OrderPlaced, Confirmed)
                | (Confirmed, Shipped)
                | (Shipped, Delivered)
                | (OrderPlaced, Cancelled)
                | (Confirmed, Cancelled)
                | (Shipped, Cancelled)
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::OrderPlaced => "OrderPlaced",
            OrderStatus::Confirmed => "Confirmed",
            OrderStatus::Shipped => "Shipped",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Cancelled => "Cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "OrderPlaced" => Ok(OrderStatus::OrderPlaced),
            "Confirmed" => Ok(OrderStatus::Confirmed),
            "Shipped" => Ok(OrderStatus::Shipped),
            "Delivered" => Ok(OrderStatus::Delivered),
            "Cancelled" => Ok(OrderStatus::Cancelled),
            other => Err(format!("unknown order status '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum PaymentMethod {
    #[serde(rename = "COD")]
    Cod,
    Online,
}

impl PaymentMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            PaymentMethod::Cod => "COD",
            PaymentMethod::Online => "Online",
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "COD" => Ok(PaymentMethod::Cod),
            "Online" => Ok(PaymentMethod::Online),
            other => Err(format!("unknown payment method '{other}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [OrderStatus; 5] = [
        OrderStatus::OrderPlaced,
        OrderStatus::Confirmed,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    #[test]
    fn test_only_listed_transitions_are_accepted() {
        let accepted: Vec<(OrderStatus, OrderStatus)> = ALL
            .iter()
            .flat_map(|from| ALL.iter().map(move |to| (*from, *to)))
            .filter(|(from, to)| from.can_transition_to(*to))
            .collect();

        assert_eq!(
            accepted,
            vec![
                (OrderStatus::OrderPlaced, OrderStatus::Confirmed),
                (OrderStatus::OrderPlaced, OrderStatus::Cancelled),
                (OrderStatus::Confirmed, OrderStatus::Shipped),
                (OrderStatus::Confirmed, OrderStatus::Cancelled),
                (OrderStatus::Shipped, OrderStatus::Delivered),
                (OrderStatus::Shipped, OrderStatus::Cancelled),
            ]
        );
    }

    #[test]
    fn test_terminal_states_have_no_exit() {
        for terminal in OrderStatus::TERMINAL {
            assert!(terminal.is_terminal());
            assert!(ALL.iter().all(|next| !terminal.can_transition_to(*next)));
        }
    }

    #[test]
    fn test_status_parses_its_own_name() {
        for status in ALL {
            assert_eq!(status.as_str().parse::<OrderStatus>(), Ok(status));
        }
        assert!("Refunded".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn test_payment_method_wire_names() {
        assert_eq!(serde_json::to_string(&PaymentMethod::Cod).unwrap(), "\"COD\"");
        assert_eq!(
            serde_json::from_str::<PaymentMethod>("\"Online\"").unwrap(),
            PaymentMethod::Online
        );
    }
}
