use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeliveryRider {
    pub id: i64,
    pub name: String,
    pub phone: String,
    pub is_active: bool,
}

/// The rider details copied onto an order when it is assigned.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RiderRef {
    pub id: i64,
    pub name: String,
    pub phone: String,
}

impl From<&DeliveryRider> for RiderRef {
    fn from(rider: &DeliveryRider) -> Self {
        Self {
            id: rider.id,
            name: rider.name.clone(),
            phone: rider.phone.clone(),
        }
    }
}
