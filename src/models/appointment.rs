// models/appointment.rs

use chrono::{DateTime, Utc};
use rocket::FromFormField;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, FromFormField)]
pub enum AppointmentStatus {
    #[serde(rename = "PENDING")]
    #[field(value = "PENDING")]
    Pending,
    #[serde(rename = "CONFIRMED")]
    #[field(value = "CONFIRMED")]
    Confirmed,
    #[serde(rename = "COMPLETED")]
    #[field(value = "COMPLETED")]
    Completed,
    #[serde(rename = "CANCELLED")]
    #[field(value = "CANCELLED")]
    Cancelled,
    #[serde(rename = "NO_SHOW")]
    #[field(value = "NO_SHOW")]
    NoShow,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppointmentSource {
    #[serde(rename = "ADMIN")]
    Admin,
    #[serde(rename = "PUBLIC")]
    Public,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: String,
    pub salon_id: String,
    pub service_id: String,
    pub staff_id: String,
    pub customer_id: String,
    pub start_time: DateTime<Utc>, // half-open interval [start_time, end_time)
    pub end_time: DateTime<Utc>,
    pub status: AppointmentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<AppointmentSource>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
