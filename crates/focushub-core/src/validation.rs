//! Range and format checks for user input.
//!
//! Every check either returns the accepted (possibly normalized) value or a
//! [`ValidationError`]; callers validate before mutating anything.

use crate::error::ValidationError;

pub const WORK_MINUTES: (u32, u32) = (1, 120);
pub const SHORT_BREAK_MINUTES: (u32, u32) = (1, 30);
pub const LONG_BREAK_MINUTES: (u32, u32) = (1, 60);
pub const SESSIONS_BEFORE_LONG_BREAK: (u32, u32) = (2, 8);

pub const TASK_TITLE_MAX: usize = 200;
pub const ESTIMATED_SESSIONS: (u32, u32) = (1, 99);

/// Check that `value` lies in `min..=max`.
pub fn validate_range(
    value: u32,
    min: u32,
    max: u32,
    label: &str,
    unit: &'static str,
) -> Result<u32, ValidationError> {
    if (min..=max).contains(&value) {
        Ok(value)
    } else {
        Err(ValidationError::OutOfRange {
            label: label.to_string(),
            min,
            max,
            unit,
        })
    }
}

/// Duration in minutes within `min..=max`.
pub fn validate_duration(
    value: u32,
    min: u32,
    max: u32,
    label: &str,
) -> Result<u32, ValidationError> {
    validate_range(value, min, max, label, " minutes")
}

pub fn validate_work_duration(value: u32) -> Result<u32, ValidationError> {
    validate_duration(value, WORK_MINUTES.0, WORK_MINUTES.1, "Work duration")
}

pub fn validate_short_break_duration(value: u32) -> Result<u32, ValidationError> {
    validate_duration(
        value,
        SHORT_BREAK_MINUTES.0,
        SHORT_BREAK_MINUTES.1,
        "Short break duration",
    )
}

pub fn validate_long_break_duration(value: u32) -> Result<u32, ValidationError> {
    validate_duration(
        value,
        LONG_BREAK_MINUTES.0,
        LONG_BREAK_MINUTES.1,
        "Long break duration",
    )
}

pub fn validate_sessions_before_long_break(value: u32) -> Result<u32, ValidationError> {
    validate_range(
        value,
        SESSIONS_BEFORE_LONG_BREAK.0,
        SESSIONS_BEFORE_LONG_BREAK.1,
        "Sessions before long break",
        "",
    )
}

/// Trim a task title and check its length in characters.
pub fn validate_task_title(title: &str) -> Result<String, ValidationError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyTitle);
    }
    if trimmed.chars().count() > TASK_TITLE_MAX {
        return Err(ValidationError::TitleTooLong {
            max: TASK_TITLE_MAX,
        });
    }
    Ok(trimmed.to_string())
}

/// `None` means "no estimate" and is always accepted.
pub fn validate_estimated_sessions(value: Option<u32>) -> Result<Option<u32>, ValidationError> {
    value
        .map(|v| {
            validate_range(
                v,
                ESTIMATED_SESSIONS.0,
                ESTIMATED_SESSIONS.1,
                "Estimated sessions",
                "",
            )
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_bounds_are_inclusive() {
        assert_eq!(validate_work_duration(1), Ok(1));
        assert_eq!(validate_work_duration(120), Ok(120));
        assert!(validate_work_duration(0).is_err());
        assert!(validate_work_duration(121).is_err());
    }

    #[test]
    fn break_bounds() {
        assert!(validate_short_break_duration(30).is_ok());
        assert!(validate_short_break_duration(31).is_err());
        assert!(validate_long_break_duration(60).is_ok());
        assert!(validate_long_break_duration(61).is_err());
    }

    #[test]
    fn sessions_before_long_break_bounds() {
        assert!(validate_sessions_before_long_break(1).is_err());
        assert_eq!(validate_sessions_before_long_break(2), Ok(2));
        assert_eq!(validate_sessions_before_long_break(8), Ok(8));
        assert!(validate_sessions_before_long_break(9).is_err());
    }

    #[test]
    fn title_is_trimmed() {
        assert_eq!(validate_task_title("  write report \n").unwrap(), "write report");
    }

    #[test]
    fn blank_title_rejected() {
        assert_eq!(validate_task_title("   "), Err(ValidationError::EmptyTitle));
    }

    #[test]
    fn title_length_counts_characters_not_bytes() {
        let ok = "é".repeat(TASK_TITLE_MAX);
        assert!(validate_task_title(&ok).is_ok());
        let long = "a".repeat(TASK_TITLE_MAX + 1);
        assert_eq!(
            validate_task_title(&long),
            Err(ValidationError::TitleTooLong { max: TASK_TITLE_MAX })
        );
    }

    #[test]
    fn estimated_sessions() {
        assert_eq!(validate_estimated_sessions(None), Ok(None));
        assert_eq!(validate_estimated_sessions(Some(4)), Ok(Some(4)));
        assert!(validate_estimated_sessions(Some(0)).is_err());
        assert!(validate_estimated_sessions(Some(100)).is_err());
    }
}
