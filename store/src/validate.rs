use crate::error::ValidationError;
use crate::types::HEADER;
use crate::types::Record;
use chrono::NaiveDate;

/// Parse a strict `YYYY-MM-DD` calendar date.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    // chrono tolerates signs, spaces and unpadded fields; only the exact
    // `dddd-dd-dd` shape is accepted here.
    let bytes = s.as_bytes();
    let shaped = bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !shaped {
        return None;
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

/// Check a record before it is written.
///
/// Every text field except the follow-up date must be non-empty. The
/// category is always set by construction. The follow-up date may be empty,
/// the `N/A` sentinel or a real date.
pub fn validate(record: &Record) -> Result<(), ValidationError> {
    let required = [
        (HEADER[0], record.date.as_str()),
        (HEADER[1], record.company.as_str()),
        (HEADER[2], record.position.as_str()),
        (HEADER[3], record.status.as_str()),
        (HEADER[6], record.company_website.as_str()),
    ];
    let fields: Vec<&'static str> = required
        .into_iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(name, _)| name)
        .collect();
    if !fields.is_empty() {
        return Err(ValidationError::MissingFields { fields });
    }

    if parse_date(&record.date).is_none() {
        return Err(ValidationError::InvalidDate {
            field: HEADER[0],
            value: record.date.clone(),
        });
    }
    if record.has_follow_up() && parse_date(&record.followed_up).is_none() {
        return Err(ValidationError::InvalidDate {
            field: HEADER[5],
            value: record.followed_up.clone(),
        });
    }
    Ok(())
}
