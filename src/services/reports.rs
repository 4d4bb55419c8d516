// services/reports.rs
//
// Folds appointment and service data into revenue and ranking metrics.
// Revenue counts COMPLETED appointments only; booking counts exclude
// CANCELLED; the raw totalAppointments tally includes everything. Ties in
// the ranking order by serviceId ascending.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};

use crate::models::appointment::{Appointment, AppointmentStatus};
use crate::models::report::{DailyReport, TopServiceMetric};
use crate::models::service::Service;

const DAILY_TOP_SERVICES: usize = 5;

fn price_of(services: &[Service], service_id: &str) -> Option<i64> {
    services
        .iter()
        .find(|s| s.id == service_id)
        .map(|s| s.price_cents)
}

fn rank(counts: HashMap<String, (u64, i64)>, limit: usize) -> Vec<TopServiceMetric> {
    let mut metrics: Vec<TopServiceMetric> = counts
        .into_iter()
        .map(|(service_id, (count, revenue_cents))| TopServiceMetric {
            service_id,
            count,
            revenue_cents,
        })
        .collect();
    metrics.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.service_id.cmp(&b.service_id))
    });
    metrics.truncate(limit);
    metrics
}

fn accumulate(
    counts: &mut HashMap<String, (u64, i64)>,
    services: &[Service],
    appointment: &Appointment,
) {
    if appointment.status == AppointmentStatus::Cancelled {
        return;
    }
    let Some(price) = price_of(services, &appointment.service_id) else {
        return;
    };
    let entry = counts.entry(appointment.service_id.clone()).or_insert((0, 0));
    entry.0 += 1;
    if appointment.status == AppointmentStatus::Completed {
        entry.1 += price;
    }
}

pub fn daily_report(
    appointments: &[Appointment],
    services: &[Service],
    date: NaiveDate,
) -> DailyReport {
    let day_appointments: Vec<&Appointment> = appointments
        .iter()
        .filter(|a| a.start_time.date_naive() == date)
        .collect();

    let mut total_revenue_cents = 0;
    let mut no_show_count = 0;
    let mut counts: HashMap<String, (u64, i64)> = HashMap::new();

    for apt in &day_appointments {
        if apt.status == AppointmentStatus::Completed {
            total_revenue_cents += price_of(services, &apt.service_id).unwrap_or(0);
        }
        if apt.status == AppointmentStatus::NoShow {
            no_show_count += 1;
        }
        accumulate(&mut counts, services, apt);
    }

    DailyReport {
        date: date.format("%Y-%m-%d").to_string(),
        total_revenue_cents,
        total_appointments: day_appointments.len() as u64,
        no_show_count,
        top_services: rank(counts, DAILY_TOP_SERVICES),
    }
}

pub fn top_services(
    appointments: &[Appointment],
    services: &[Service],
    from: Option<DateTime<Utc>>,
    to_exclusive: Option<DateTime<Utc>>,
    limit: usize,
) -> Vec<TopServiceMetric> {
    let mut counts: HashMap<String, (u64, i64)> = HashMap::new();

    for apt in appointments {
        if from.is_some_and(|from| apt.start_time < from) {
            continue;
        }
        if to_exclusive.is_some_and(|to| apt.start_time >= to) {
            continue;
        }
        accumulate(&mut counts, services, apt);
    }

    rank(counts, limit)
}
