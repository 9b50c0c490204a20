use chrono::NaiveDate;

use crate::error::AppError;

/// Time-of-day band a slot falls into, keyed off the starting hour. Used only
/// for grouping slots in listings; the ledger itself never looks at bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HourBand {
    Dawn,
    Morning,
    Afternoon,
    Evening,
}

impl HourBand {
    pub fn label(self) -> &'static str {
        match self {
            HourBand::Dawn => "dawn",
            HourBand::Morning => "morning",
            HourBand::Afternoon => "afternoon",
            HourBand::Evening => "evening",
        }
    }
}

/// Parse a `HH:MM` fragment into minutes since midnight.
fn parse_hhmm(s: &str) -> Option<u32> {
    let (hh, mm) = s.split_once(':')?;
    if hh.len() != 2 || mm.len() != 2 {
        return None;
    }
    let hours: u32 = hh.parse().ok()?;
    let minutes: u32 = mm.parse().ok()?;
    if hours > 23 || minutes > 59 {
        return None;
    }
    Some(hours * 60 + minutes)
}

/// Validate a `HH:MM-HH:MM` slot label: both halves zero-padded and in range,
/// start strictly before end.
pub fn validate_slot_label(label: &str) -> Result<(), AppError> {
    let err = || AppError::validation(format!("time slot must be HH:MM-HH:MM, got '{}'", label));

    let (start, end) = label.split_once('-').ok_or_else(err)?;
    let start = parse_hhmm(start).ok_or_else(err)?;
    let end = parse_hhmm(end).ok_or_else(err)?;

    if start >= end {
        return Err(AppError::validation(format!(
            "time slot '{}' must start before it ends",
            label
        )));
    }
    Ok(())
}

/// Validate a `YYYY-MM-DD` date string. The canonical zero-padded form also
/// makes lexical string comparison agree with chronological order, which the
/// booking listings rely on.
pub fn validate_date(date: &str) -> Result<(), AppError> {
    if date.len() != 10 || NaiveDate::parse_from_str(date, "%Y-%m-%d").is_err() {
        return Err(AppError::validation(format!(
            "date must be YYYY-MM-DD, got '{}'",
            date
        )));
    }
    Ok(())
}

/// Minimal email shape check, matching what the booking form enforces:
/// something, an @, something, a dot, something. Not an RFC validator.
pub fn validate_email(email: &str) -> Result<(), AppError> {
    let ok = email
        .split_once('@')
        .map(|(local, domain)| {
            !local.is_empty()
                && !local.contains(char::is_whitespace)
                && domain.split_once('.').is_some_and(|(host, tld)| {
                    !host.is_empty() && !tld.is_empty() && !domain.contains(char::is_whitespace)
                })
        })
        .unwrap_or(false);

    if ok {
        Ok(())
    } else {
        Err(AppError::validation(format!("invalid email address '{}'", email)))
    }
}

/// Check that a room actually offers the requested slot label. A slot being
/// free in the ledger is irrelevant here; a label outside the room's
/// configured list is a validation failure, never a conflict.
pub fn check_slot_membership(offered: &[String], label: &str) -> Result<(), AppError> {
    if offered.iter().any(|s| s == label) {
        Ok(())
    } else {
        Err(AppError::validation(format!(
            "time slot '{}' is not offered by this room",
            label
        )))
    }
}

/// Bucket a slot into its band by the leading hour. Assumes a validated label.
pub fn hour_band(label: &str) -> HourBand {
    let hour: u32 = label
        .get(..2)
        .and_then(|hh| hh.parse().ok())
        .unwrap_or(0);
    match hour {
        0..=5 => HourBand::Dawn,
        6..=11 => HourBand::Morning,
        12..=17 => HourBand::Afternoon,
        _ => HourBand::Evening,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_slot_labels() {
        assert!(validate_slot_label("09:00-10:00").is_ok());
        assert!(validate_slot_label("00:00-23:59").is_ok());
        assert!(validate_slot_label("13:30-14:00").is_ok());
    }

    #[test]
    fn test_invalid_slot_labels() {
        assert!(validate_slot_label("9:00-10:00").is_err()); // not zero-padded
        assert!(validate_slot_label("09:00").is_err()); // no range
        assert!(validate_slot_label("09:00-09:00").is_err()); // zero length
        assert!(validate_slot_label("10:00-09:00").is_err()); // backwards
        assert!(validate_slot_label("24:00-25:00").is_err()); // out of range
        assert!(validate_slot_label("09:60-10:00").is_err()); // bad minutes
        assert!(validate_slot_label("ab:cd-ef:gh").is_err());
    }

    #[test]
    fn test_valid_dates() {
        assert!(validate_date("2024-06-01").is_ok());
        assert!(validate_date("2024-02-29").is_ok()); // leap year
    }

    #[test]
    fn test_invalid_dates() {
        assert!(validate_date("2024-6-1").is_err());
        assert!(validate_date("2024-13-01").is_err());
        assert!(validate_date("2023-02-29").is_err()); // not a leap year
        assert!(validate_date("01-06-2024").is_err());
        assert!(validate_date("tomorrow").is_err());
    }

    #[test]
    fn test_email_shape() {
        assert!(validate_email("alice@example.com").is_ok());
        assert!(validate_email("a.b+c@mail.example.org").is_ok());
        assert!(validate_email("alice").is_err());
        assert!(validate_email("alice@example").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("al ice@example.com").is_err());
    }

    #[test]
    fn test_offered_slot_is_accepted() {
        let offered = vec!["09:00-10:00".to_string(), "10:00-11:00".to_string()];
        assert!(check_slot_membership(&offered, "09:00-10:00").is_ok());
        assert!(check_slot_membership(&offered, "10:00-11:00").is_ok());
    }

    #[test]
    fn test_unoffered_slot_fails_validation_even_when_free() {
        // Nothing books "11:00-12:00" anywhere; the label is simply not one
        // the room offers, and that alone must fail as a validation error.
        let offered = vec!["09:00-10:00".to_string(), "10:00-11:00".to_string()];
        let err = check_slot_membership(&offered, "11:00-12:00").unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_membership_is_exact_string_match() {
        let offered = vec!["09:00-10:00".to_string()];
        assert!(check_slot_membership(&offered, "9:00-10:00").is_err());
        assert!(check_slot_membership(&offered, "09:00-10:30").is_err());
        assert!(check_slot_membership(&[], "09:00-10:00").is_err());
    }

    #[test]
    fn test_hour_bands() {
        assert_eq!(hour_band("05:00-06:00"), HourBand::Dawn);
        assert_eq!(hour_band("06:00-07:00"), HourBand::Morning);
        assert_eq!(hour_band("11:30-12:30"), HourBand::Morning);
        assert_eq!(hour_band("12:00-13:00"), HourBand::Afternoon);
        assert_eq!(hour_band("18:00-19:00"), HourBand::Evening);
        assert_eq!(hour_band("23:00-23:59"), HourBand::Evening);
    }
}
