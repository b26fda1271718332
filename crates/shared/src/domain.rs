use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub i64);

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_newtype!(NotificationId);
id_newtype!(RequestId);
id_newtype!(OfferId);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShipmentStatus {
    Accepted,
    Confirmed,
    Shipped,
    Completed,
    Resold,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProgressStep {
    Awarded,
    ContainerConfirmed,
    Shipped,
    Delivered,
}

impl ProgressStep {
    pub fn label(self) -> &'static str {
        match self {
            ProgressStep::Awarded => "Awarded",
            ProgressStep::ContainerConfirmed => "Container confirmed",
            ProgressStep::Shipped => "Shipped",
            ProgressStep::Delivered => "Delivered",
        }
    }
}

impl ShipmentStatus {
    pub fn completed_steps(self) -> &'static [ProgressStep] {
        use ProgressStep::*;
        match self {
            ShipmentStatus::Accepted => &[Awarded],
            ShipmentStatus::Confirmed => &[Awarded, ContainerConfirmed],
            ShipmentStatus::Shipped => &[Awarded, ContainerConfirmed, Shipped],
            ShipmentStatus::Completed => &[Awarded, ContainerConfirmed, Shipped, Delivered],
            ShipmentStatus::Resold => &[Awarded],
            ShipmentStatus::Other => &[],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OfferStatus {
    Accepted,
    Rejected,
    Other,
}

impl OfferStatus {
    pub fn from_wire(raw: &str) -> Self {
        match raw {
            "ACCEPTED" => OfferStatus::Accepted,
            "REJECTED" => OfferStatus::Rejected,
            _ => OfferStatus::Other,
        }
    }
}
