// models/availability.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::staff::StaffProfile;

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilitySlot {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub is_reserved: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PublicStaffWithAvailability {
    pub staff: StaffProfile,
    pub availability: Vec<AvailabilitySlot>,
}
