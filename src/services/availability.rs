//! Motor de disponibilidad
//!
//! Decide si un coche está libre para el intervalo `[start, end)` y, si no,
//! enumera las reservas en conflicto. Es una función pura sobre el snapshot
//! de reservas que le pasa el caller; no guarda estado ni cachea nada, así
//! que debe reevaluarse en cada intento de reserva.

use chrono::{DateTime, Utc};

use crate::models::booking::Booking;

/// Resultado de una consulta de disponibilidad
#[derive(Debug)]
pub struct AvailabilityResult {
    pub available: bool,
    pub conflicts: Vec<Booking>,
}

/// Test de intersección de intervalos semiabiertos.
///
/// Los extremos que se tocan no cuentan como solape: una reserva que
/// termina exactamente cuando empieza otra es legal (back-to-back).
pub fn overlaps(
    requested_start: DateTime<Utc>,
    requested_end: DateTime<Utc>,
    booking_start: DateTime<Utc>,
    booking_end: DateTime<Utc>,
) -> bool {
    requested_start < booking_end && requested_end > booking_start
}

/// Enumerar las reservas que bloquean el intervalo pedido.
///
/// Una reserva ocupa el calendario salvo que esté cancelada: pending,
/// confirmed y completed bloquean por igual (una completed sigue
/// representando un hueco histórico, y una pending aún no fue rechazada).
pub fn find_conflicts(
    bookings: &[Booking],
    requested_start: DateTime<Utc>,
    requested_end: DateTime<Utc>,
) -> Vec<Booking> {
    bookings
        .iter()
        .filter(|b| !b.is_cancelled())
        .filter(|b| overlaps(requested_start, requested_end, b.start_date, b.end_date))
        .cloned()
        .collect()
}

/// Evaluar disponibilidad sobre un snapshot de reservas
pub fn check_availability(
    bookings: &[Booking],
    requested_start: DateTime<Utc>,
    requested_end: DateTime<Utc>,
) -> AvailabilityResult {
    let conflicts = find_conflicts(bookings, requested_start, requested_end);
    AvailabilityResult {
        available: conflicts.is_empty(),
        conflicts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::booking::BookingStatus;
    use chrono::TimeZone;
    use rust_decimal::Decimal;
    use uuid::Uuid;

    fn hour(h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 8, 18, h, 0, 0).unwrap()
    }

    fn booking(start: DateTime<Utc>, end: DateTime<Utc>, status: BookingStatus) -> Booking {
        Booking {
            id: Uuid::new_v4(),
            car_id: Uuid::new_v4(),
            car_name: "Seat Ibiza".to_string(),
            renter_name: "Laura".to_string(),
            renter_email: "laura@example.com".to_string(),
            renter_phone: "+34600111222".to_string(),
            start_date: start,
            end_date: end,
            total_hours: 2,
            total_price: Decimal::new(3000, 2),
            status: status.as_str().to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_overlap_basic() {
        assert!(overlaps(hour(10), hour(12), hour(11), hour(13)));
        assert!(overlaps(hour(11), hour(13), hour(10), hour(12)));
        assert!(!overlaps(hour(10), hour(12), hour(13), hour(15)));
    }

    #[test]
    fn test_back_to_back_is_not_conflict() {
        // [10,12) y [12,14) comparten extremo pero no se solapan
        assert!(!overlaps(hour(12), hour(14), hour(10), hour(12)));
        assert!(!overlaps(hour(10), hour(12), hour(12), hour(14)));
    }

    #[test]
    fn test_fully_contained_interval_conflicts() {
        let existing = booking(hour(9), hour(18), BookingStatus::Confirmed);
        let conflicts = find_conflicts(&[existing.clone()], hour(10), hour(11));
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].id, existing.id);
    }

    #[test]
    fn test_containing_interval_conflicts() {
        let existing = booking(hour(10), hour(11), BookingStatus::Pending);
        let conflicts = find_conflicts(&[existing], hour(9), hour(18));
        assert_eq!(conflicts.len(), 1);
    }

    #[test]
    fn test_identical_interval_conflicts() {
        let existing = booking(hour(10), hour(12), BookingStatus::Pending);
        let result = check_availability(&[existing], hour(10), hour(12));
        assert!(!result.available);
        assert_eq!(result.conflicts.len(), 1);
    }

    #[test]
    fn test_cancelled_booking_never_blocks() {
        let cancelled = booking(hour(10), hour(12), BookingStatus::Cancelled);
        let result = check_availability(&[cancelled], hour(10), hour(12));
        assert!(result.available);
        assert!(result.conflicts.is_empty());
    }

    #[test]
    fn test_pending_confirmed_completed_all_block() {
        for status in [
            BookingStatus::Pending,
            BookingStatus::Confirmed,
            BookingStatus::Completed,
        ] {
            let existing = booking(hour(10), hour(12), status);
            let result = check_availability(&[existing], hour(11), hour(13));
            assert!(!result.available, "status {:?} debería bloquear", status);
        }
    }

    #[test]
    fn test_multiple_overlapping_bookings_all_reported() {
        let a = booking(hour(9), hour(11), BookingStatus::Confirmed);
        let b = booking(hour(11), hour(13), BookingStatus::Pending);
        let cancelled = booking(hour(9), hour(13), BookingStatus::Cancelled);
        let result = check_availability(&[a.clone(), b.clone(), cancelled], hour(10), hour(12));
        assert!(!result.available);
        let ids: Vec<_> = result.conflicts.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![a.id, b.id]);
    }

    #[test]
    fn test_no_bookings_is_vacuously_available() {
        let result = check_availability(&[], hour(10), hour(12));
        assert!(result.available);
        assert!(result.conflicts.is_empty());
    }

    #[test]
    fn test_available_iff_no_conflicts() {
        let existing = booking(hour(10), hour(12), BookingStatus::Confirmed);
        let free = check_availability(&[existing.clone()], hour(12), hour(14));
        assert!(free.available);
        assert!(free.conflicts.is_empty());

        let busy = check_availability(&[existing], hour(11), hour(14));
        assert_eq!(busy.available, busy.conflicts.is_empty());
        assert!(!busy.available);
    }
}
