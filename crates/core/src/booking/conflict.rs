use crate::models::appointment::Appointment;

/// First existing appointment of the candidate's doctor that intersects the
/// candidate's half-open interval.
pub fn find_conflict<'a>(
    candidate: &Appointment,
    existing: &'a [Appointment],
) -> Option<&'a Appointment> {
    existing
        .iter()
        .find(|booked| booked.conflicts_with(candidate))
}
