use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use fake::{
    Fake,
    faker::{address::en::CityName, company::en::CompanyName},
};
use kickoff_core::{Booking, BookingFilter, BookingStatus, SportType, Turf, TurfFilter};
use pretty_assertions::assert_eq;
use rstest::rstest;

fn now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, 10)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
}

fn booking(id: &str, day: u32, start: &str, status: BookingStatus) -> Booking {
    let start = NaiveTime::parse_from_str(start, "%H:%M").unwrap();
    Booking {
        id: id.to_string(),
        resource_id: "turf-1".to_string(),
        requester_id: "user-1".to_string(),
        date: NaiveDate::from_ymd_opt(2024, 3, day).unwrap(),
        start,
        end: start + chrono::Duration::hours(1),
        status,
        total_price: 500.0,
    }
}

fn bookings() -> Vec<Booking> {
    vec![
        booking("past", 9, "18:00", BookingStatus::Confirmed),
        booking("earlier-today", 10, "09:00", BookingStatus::Confirmed),
        booking("later-today", 10, "18:00", BookingStatus::Confirmed),
        booking("tomorrow", 11, "07:00", BookingStatus::Confirmed),
        booking("cancelled-tomorrow", 11, "08:00", BookingStatus::Cancelled),
        booking("cancelled-today", 10, "15:00", BookingStatus::Cancelled),
    ]
}

#[rstest]
#[case(BookingFilter::All, vec!["past", "earlier-today", "later-today", "tomorrow", "cancelled-tomorrow", "cancelled-today"])]
#[case(BookingFilter::Upcoming, vec!["later-today", "tomorrow"])]
#[case(BookingFilter::Today, vec!["earlier-today", "later-today", "cancelled-today"])]
#[case(BookingFilter::Cancelled, vec!["cancelled-tomorrow", "cancelled-today"])]
fn test_booking_filters(#[case] filter: BookingFilter, #[case] expected: Vec<&str>) {
    let bookings = bookings();

    let ids: Vec<&str> = filter
        .apply(&bookings, now())
        .into_iter()
        .map(|b| b.id.as_str())
        .collect();

    assert_eq!(ids, expected);
}

#[rstest]
#[case("all", BookingFilter::All)]
#[case("Upcoming", BookingFilter::Upcoming)]
#[case("today", BookingFilter::Today)]
#[case("canceled", BookingFilter::Cancelled)]
fn test_booking_filter_from_str(#[case] input: &str, #[case] expected: BookingFilter) {
    assert_eq!(input.parse::<BookingFilter>(), Ok(expected));
}

fn turf(id: &str, name: &str, location: &str, sport_type: SportType, price: f64) -> Turf {
    Turf {
        id: id.to_string(),
        name: name.to_string(),
        location: location.to_string(),
        sport_type,
        price_per_hour: price,
        operating_start: NaiveTime::from_hms_opt(6, 0, 0).unwrap(),
        operating_end: NaiveTime::from_hms_opt(22, 0, 0).unwrap(),
        owner_id: None,
        description: None,
    }
}

fn turfs() -> Vec<Turf> {
    vec![
        turf("1", "Green Arena", "Koramangala", SportType::Football, 1200.0),
        turf("2", "Smash Court", "Indiranagar", SportType::Badminton, 400.0),
        turf("3", "Kick Zone", "HSR Layout", SportType::Futsal, 900.0),
        turf("4", "Arena 51", "Whitefield", SportType::Football, 700.0),
    ]
}

fn ids(turfs: Vec<&Turf>) -> Vec<&str> {
    turfs.into_iter().map(|t| t.id.as_str()).collect()
}

#[test]
fn test_empty_turf_filter_matches_everything() {
    let turfs = turfs();

    assert_eq!(ids(TurfFilter::default().apply(&turfs)), vec!["1", "2", "3", "4"]);
}

#[test]
fn test_turf_search_covers_name_and_location() {
    let turfs = turfs();
    let filter = TurfFilter {
        search: Some("ARENA".to_string()),
        ..Default::default()
    };
    assert_eq!(ids(filter.apply(&turfs)), vec!["1", "4"]);

    let filter = TurfFilter {
        search: Some("layout".to_string()),
        ..Default::default()
    };
    assert_eq!(ids(filter.apply(&turfs)), vec!["3"]);
}

#[test]
fn test_turf_filter_combines_criteria() {
    let turfs = turfs();
    let filter = TurfFilter {
        sport_type: Some(SportType::Football),
        min_price: Some(700.0),
        max_price: Some(1000.0),
        ..Default::default()
    };

    assert_eq!(ids(filter.apply(&turfs)), vec!["4"]);
}

#[test]
fn test_blank_text_criteria_are_ignored() {
    let turfs = turfs();
    let filter = TurfFilter {
        search: Some("   ".to_string()),
        location: Some(String::new()),
        ..Default::default()
    };

    assert_eq!(filter.apply(&turfs).len(), 4);
}

#[test]
fn test_location_filter_with_generated_turfs() {
    let city: String = CityName().fake();
    let mut turfs: Vec<Turf> = (0..5)
        .map(|i| {
            let name: String = CompanyName().fake();
            turf(&i.to_string(), &name, "Elsewhere", SportType::Cricket, 600.0)
        })
        .collect();
    turfs[2].location = format!("North {city}");

    let filter = TurfFilter {
        location: Some(city.to_lowercase()),
        ..Default::default()
    };

    assert_eq!(ids(filter.apply(&turfs)), vec!["2"]);
}
