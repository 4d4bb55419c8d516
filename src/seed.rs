// seed.rs
//
// Demo tenant fixture: one salon with staff, services, customers and a
// handful of appointments spread around the current date so dashboards and
// reports have material straight away.

use std::sync::Arc;

use chrono::{Duration, NaiveTime, TimeZone, Utc};
use tracing::info;
use uuid::Uuid;

use crate::models::appointment::{Appointment, AppointmentSource, AppointmentStatus};
use crate::models::customer::Customer;
use crate::models::salon::{Salon, SalonBranding};
use crate::models::service::Service;
use crate::models::staff::{StaffProfile, WorkingHours, WorkingHoursBreak};
use crate::models::user::{StoredUser, User, UserRole};
use crate::repository::store::BookingStore;

pub const DEMO_SLUG: &str = "demo-salon";
pub const DEMO_ADMIN_EMAIL: &str = "admin@demo.local";
pub const DEMO_ADMIN_PASSWORD: &str = "Password123!";

fn hours(day_of_week: u32, start: &str, end: &str, lunch: Option<(&str, &str)>) -> WorkingHours {
    WorkingHours {
        day_of_week,
        start_time: start.to_string(),
        end_time: end.to_string(),
        breaks: lunch.map(|(brk_start, brk_end)| {
            vec![WorkingHoursBreak {
                start_time: brk_start.to_string(),
                end_time: brk_end.to_string(),
            }]
        }),
    }
}

pub fn seed_demo_data(store: &Arc<BookingStore>) {
    let salon_id = Uuid::new_v4().to_string();
    let salon = Salon {
        id: salon_id.clone(),
        slug: DEMO_SLUG.to_string(),
        name: "GLOWNOVA Demo Salon".to_string(),
        address: Some("123 Beauty Lane, San Francisco, CA 94103".to_string()),
        phone: Some("+1 (555) 123-4567".to_string()),
        email: Some("contact@demo-salon.com".to_string()),
        timezone: Some("America/Los_Angeles".to_string()),
        branding: Some(SalonBranding {
            primary_color: Some("#E6A4B4".to_string()),
            secondary_color: Some("#A8C3A2".to_string()),
            background_color: Some("#FAF7F5".to_string()),
            logo_url: None,
            dark_mode_enabled: Some(true),
        }),
    };

    let admin = StoredUser {
        user: User {
            id: Uuid::new_v4().to_string(),
            email: DEMO_ADMIN_EMAIL.to_string(),
            role: UserRole::Admin,
            name: Some("Admin User".to_string()),
            avatar_url: None,
            salon_id: salon_id.clone(),
        },
        password: DEMO_ADMIN_PASSWORD.to_string(),
    };

    let weekdays = |start: &str, end: &str, lunch: (&str, &str)| -> Vec<WorkingHours> {
        (1..=5).map(|day| hours(day, start, end, Some(lunch))).collect()
    };

    let staff = vec![
        StaffProfile {
            id: Uuid::new_v4().to_string(),
            salon_id: salon_id.clone(),
            user_id: None,
            name: "Sophie Martinez".to_string(),
            bio: Some(
                "Expert stylist with 10+ years of experience specializing in color and balayage."
                    .to_string(),
            ),
            avatar_url: None,
            skills: Some(vec![
                "Haircut".to_string(),
                "Color".to_string(),
                "Balayage".to_string(),
                "Styling".to_string(),
            ]),
            rating: Some(4.9),
            working_hours: Some(weekdays("09:00", "17:00", ("12:00", "13:00"))),
        },
        StaffProfile {
            id: Uuid::new_v4().to_string(),
            salon_id: salon_id.clone(),
            user_id: None,
            name: "Emma Thompson".to_string(),
            bio: Some(
                "Nail artist extraordinaire with a passion for creative designs and nail health."
                    .to_string(),
            ),
            avatar_url: None,
            skills: Some(vec![
                "Manicure".to_string(),
                "Pedicure".to_string(),
                "Nail Art".to_string(),
                "Gel Nails".to_string(),
            ]),
            rating: Some(4.8),
            working_hours: Some({
                let mut all = weekdays("10:00", "18:00", ("13:00", "14:00"));
                all.push(hours(6, "10:00", "16:00", None));
                all
            }),
        },
        StaffProfile {
            id: Uuid::new_v4().to_string(),
            salon_id: salon_id.clone(),
            user_id: None,
            name: "Lisa Chen".to_string(),
            bio: Some("Skincare specialist focused on natural, holistic beauty treatments.".to_string()),
            avatar_url: None,
            skills: Some(vec![
                "Facial".to_string(),
                "Massage".to_string(),
                "Waxing".to_string(),
                "Skincare Consultation".to_string(),
            ]),
            rating: Some(5.0),
            working_hours: Some({
                let mut all: Vec<WorkingHours> = (2..=5)
                    .map(|day| hours(day, "11:00", "19:00", Some(("14:00", "15:00"))))
                    .collect();
                all.push(hours(6, "09:00", "17:00", None));
                all
            }),
        },
    ];

    let menu: [(&str, &str, i64, i64); 10] = [
        ("Women's Haircut", "Professional cut tailored to your style and face shape", 60, 7500),
        ("Men's Haircut", "Classic or modern men's cut with styling", 45, 5500),
        ("Balayage Color", "Hand-painted highlights for a natural sun-kissed look", 180, 22500),
        ("Full Color", "All-over color with toner", 120, 15000),
        ("Manicure", "Classic manicure with polish of your choice", 45, 4500),
        ("Gel Manicure", "Long-lasting gel manicure", 60, 6500),
        ("Pedicure", "Relaxing pedicure with foot massage", 60, 5500),
        ("Facial Treatment", "Customized facial for your skin type", 75, 9500),
        ("Deep Tissue Massage", "Therapeutic massage to release tension", 90, 12000),
        ("Eyebrow Waxing", "Professional eyebrow shaping", 15, 2500),
    ];
    let services: Vec<Service> = menu
        .iter()
        .map(|(name, description, duration_minutes, price_cents)| Service {
            id: Uuid::new_v4().to_string(),
            salon_id: salon_id.clone(),
            name: (*name).to_string(),
            description: Some((*description).to_string()),
            duration_minutes: *duration_minutes,
            price_cents: *price_cents,
            currency: Some("USD".to_string()),
            is_active: Some(true),
        })
        .collect();

    let now = Utc::now();
    let customer = |name: &str, email: &str, notes: Option<&str>, phone: &str, age_days: i64| Customer {
        id: Uuid::new_v4().to_string(),
        salon_id: salon_id.clone(),
        name: name.to_string(),
        email: Some(email.to_string()),
        phone: Some(phone.to_string()),
        notes: notes.map(str::to_string),
        created_at: now - Duration::days(age_days),
        updated_at: now - Duration::days(age_days / 10),
    };
    let customers = vec![
        customer(
            "Sarah Johnson",
            "sarah.j@example.com",
            Some("Prefers natural colors, allergic to ammonia"),
            "+1 (555) 234-5678",
            90,
        ),
        customer("Michael Brown", "m.brown@example.com", None, "+1 (555) 345-6789", 60),
        customer(
            "Emily Davis",
            "emily.d@example.com",
            Some("Regular gel manicure client, prefers nude colors"),
            "+1 (555) 456-7890",
            120,
        ),
        customer("Jessica Wilson", "j.wilson@example.com", None, "+1 (555) 567-8901", 30),
        customer("David Martinez", "david.m@example.com", None, "+1 (555) 678-9012", 45),
    ];

    let at = |day_offset: i64, hhmm: &str| {
        let date = (now + Duration::days(day_offset)).date_naive();
        let time = NaiveTime::parse_from_str(hhmm, "%H:%M").unwrap_or(NaiveTime::MIN);
        Utc.from_utc_datetime(&date.and_time(time))
    };
    let appointment = |service: &Service,
                       staff: &StaffProfile,
                       cust: &Customer,
                       day_offset: i64,
                       hhmm: &str,
                       status: AppointmentStatus,
                       source: AppointmentSource,
                       notes: Option<&str>| {
        let start_time = at(day_offset, hhmm);
        Appointment {
            id: Uuid::new_v4().to_string(),
            salon_id: salon_id.clone(),
            service_id: service.id.clone(),
            staff_id: staff.id.clone(),
            customer_id: cust.id.clone(),
            start_time,
            end_time: start_time + Duration::minutes(service.duration_minutes),
            status,
            notes: notes.map(str::to_string),
            source: Some(source),
            created_at: now - Duration::days(2),
            updated_at: now - Duration::days(1),
        }
    };

    let appointments = vec![
        appointment(
            &services[0],
            &staff[0],
            &customers[0],
            0,
            "10:00",
            AppointmentStatus::Confirmed,
            AppointmentSource::Public,
            Some("First time client"),
        ),
        appointment(
            &services[4],
            &staff[1],
            &customers[2],
            0,
            "14:00",
            AppointmentStatus::Confirmed,
            AppointmentSource::Admin,
            None,
        ),
        appointment(
            &services[7],
            &staff[2],
            &customers[3],
            1,
            "11:00",
            AppointmentStatus::Confirmed,
            AppointmentSource::Public,
            None,
        ),
        appointment(
            &services[2],
            &staff[0],
            &customers[1],
            7,
            "15:00",
            AppointmentStatus::Confirmed,
            AppointmentSource::Admin,
            Some("Client wants cool tones"),
        ),
        appointment(
            &services[1],
            &staff[0],
            &customers[4],
            -7,
            "13:00",
            AppointmentStatus::Completed,
            AppointmentSource::Public,
            None,
        ),
    ];

    let mut inner = store.lock();
    inner.users.insert(admin.user.id.clone(), admin);
    inner.staff_profiles.insert(salon_id.clone(), staff);
    inner.services.insert(salon_id.clone(), services);
    inner.customers.insert(salon_id.clone(), customers);
    inner.appointments.insert(salon_id.clone(), appointments);
    inner.salons.insert(salon_id.clone(), salon);
    drop(inner);

    info!(slug = DEMO_SLUG, admin = DEMO_ADMIN_EMAIL, "demo data seeded");
}
