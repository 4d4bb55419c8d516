// models/report.rs

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TopServiceMetric {
    pub service_id: String,
    pub count: u64,
    pub revenue_cents: i64,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct DailyReport {
    pub date: String, // "YYYY-MM-DD"
    pub total_revenue_cents: i64,
    pub total_appointments: u64,
    pub no_show_count: u64,
    pub top_services: Vec<TopServiceMetric>,
}
