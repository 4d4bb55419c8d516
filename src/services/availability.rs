// services/availability.rs
//
// Turns a staff member's working hours into discrete 30-minute slots.
// Working hours define the availability windows; break intervals are carved
// out, past slots are dropped, and slots overlapping an existing
// non-cancelled appointment are flagged as reserved.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Utc};

use crate::models::appointment::{Appointment, AppointmentStatus};
use crate::models::availability::AvailabilitySlot;
use crate::models::staff::{StaffProfile, WorkingHours};
use crate::repository::appointment_repository::intervals_overlap;

pub const SLOT_MINUTES: i64 = 30;

fn parse_hhmm(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value, "%H:%M").ok()
}

fn to_utc(date: NaiveDate, time: NaiveTime) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(time))
}

fn in_break(hours: &WorkingHours, date: NaiveDate, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
    let Some(breaks) = &hours.breaks else {
        return false;
    };
    breaks.iter().any(|brk| {
        match (parse_hhmm(&brk.start_time), parse_hhmm(&brk.end_time)) {
            (Some(brk_start), Some(brk_end)) => {
                intervals_overlap(start, end, to_utc(date, brk_start), to_utc(date, brk_end))
            }
            _ => false,
        }
    })
}

fn is_reserved(appointments: &[Appointment], staff_id: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
    appointments.iter().any(|apt| {
        apt.staff_id == staff_id
            && apt.status != AppointmentStatus::Cancelled
            && intervals_overlap(start, end, apt.start_time, apt.end_time)
    })
}

pub fn slots_for_date(
    staff: &StaffProfile,
    appointments: &[Appointment],
    date: NaiveDate,
    now: DateTime<Utc>,
) -> Vec<AvailabilitySlot> {
    let day_of_week = date.weekday().num_days_from_sunday();
    let Some(hours) = staff
        .working_hours
        .as_ref()
        .and_then(|all| all.iter().find(|wh| wh.day_of_week == day_of_week))
    else {
        return Vec::new();
    };

    let (Some(day_start), Some(day_end)) = (parse_hhmm(&hours.start_time), parse_hhmm(&hours.end_time))
    else {
        return Vec::new();
    };

    let mut slots = Vec::new();
    let mut slot_start = to_utc(date, day_start);
    let shift_end = to_utc(date, day_end);

    while slot_start + Duration::minutes(SLOT_MINUTES) <= shift_end {
        let slot_end = slot_start + Duration::minutes(SLOT_MINUTES);

        if slot_start >= now && !in_break(hours, date, slot_start, slot_end) {
            slots.push(AvailabilitySlot {
                start_time: slot_start,
                end_time: slot_end,
                is_reserved: is_reserved(appointments, &staff.id, slot_start, slot_end),
            });
        }
        slot_start = slot_end;
    }

    slots
}

// The public staff listing shows each member's slots for the coming week.
pub fn slots_for_week(
    staff: &StaffProfile,
    appointments: &[Appointment],
    start: NaiveDate,
    now: DateTime<Utc>,
) -> Vec<AvailabilitySlot> {
    (0..7)
        .filter_map(|offset| start.checked_add_signed(Duration::days(offset)))
        .flat_map(|date| slots_for_date(staff, appointments, date, now))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::appointment::AppointmentSource;
    use crate::models::staff::WorkingHoursBreak;

    fn staff_with_hours() -> StaffProfile {
        StaffProfile {
            id: "staff-1".to_string(),
            salon_id: "salon-1".to_string(),
            user_id: None,
            name: "Sophie Martinez".to_string(),
            bio: None,
            avatar_url: None,
            skills: None,
            rating: None,
            // Monday 09:00-12:00 with a 10:00-10:30 break.
            working_hours: Some(vec![WorkingHours {
                day_of_week: 1,
                start_time: "09:00".to_string(),
                end_time: "12:00".to_string(),
                breaks: Some(vec![WorkingHoursBreak {
                    start_time: "10:00".to_string(),
                    end_time: "10:30".to_string(),
                }]),
            }]),
        }
    }

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 2).unwrap()
    }

    fn long_ago() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn slots_follow_working_hours_minus_breaks() {
        let slots = slots_for_date(&staff_with_hours(), &[], monday(), long_ago());
        // 09:00-12:00 is six half-hour slots; the 10:00-10:30 break drops one.
        assert_eq!(slots.len(), 5);
        assert!(slots.iter().all(|s| !s.is_reserved));
        assert!(!slots
            .iter()
            .any(|s| s.start_time == to_utc(monday(), parse_hhmm("10:00").unwrap())));
    }

    #[test]
    fn no_working_hours_means_no_slots() {
        let sunday = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let slots = slots_for_date(&staff_with_hours(), &[], sunday, long_ago());
        assert!(slots.is_empty());
    }

    #[test]
    fn past_slots_are_skipped() {
        let now = to_utc(monday(), parse_hhmm("11:00").unwrap());
        let slots = slots_for_date(&staff_with_hours(), &[], monday(), now);
        assert_eq!(slots.len(), 2); // 11:00 and 11:30 remain
    }

    #[test]
    fn booked_slots_are_flagged_reserved() {
        let appointment = Appointment {
            id: "a1".to_string(),
            salon_id: "salon-1".to_string(),
            service_id: "svc-1".to_string(),
            staff_id: "staff-1".to_string(),
            customer_id: "cust-1".to_string(),
            start_time: to_utc(monday(), parse_hhmm("09:00").unwrap()),
            end_time: to_utc(monday(), parse_hhmm("10:00").unwrap()),
            status: AppointmentStatus::Confirmed,
            notes: None,
            source: Some(AppointmentSource::Public),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let slots = slots_for_date(&staff_with_hours(), &[appointment], monday(), long_ago());
        let reserved: Vec<_> = slots.iter().filter(|s| s.is_reserved).collect();
        assert_eq!(reserved.len(), 2); // 09:00 and 09:30
    }
}
