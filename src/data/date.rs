use chrono::NaiveDate;

// ---------------------------------------------------------------------------
// DD/MM/YYYY day strings
// ---------------------------------------------------------------------------

/// Parse a `DD/MM/YYYY` day string into a calendar date.
///
/// Exactly three `/`-separated decimal integers are accepted. The date must
/// exist: `31/04/2021`, `29/02/2021` and `00/01/2020` all return `None`
/// instead of rolling over into a neighbouring day.
pub fn parse_day(text: &str) -> Option<NaiveDate> {
    let mut parts = text.trim().split('/');
    let (Some(d), Some(m), Some(y), None) = (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        log::debug!("Rejecting day '{text}': expected DD/MM/YYYY");
        return None;
    };

    let (Some(day), Some(month), Some(year)) = (
        parse_component::<u32>(d),
        parse_component::<u32>(m),
        parse_component::<i32>(y),
    ) else {
        log::debug!("Rejecting day '{text}': non-numeric component");
        return None;
    };

    let date = NaiveDate::from_ymd_opt(year, month, day);
    if date.is_none() {
        log::debug!("Rejecting day '{text}': no such calendar date");
    }
    date
}

/// Whether `text` names a real calendar date in `DD/MM/YYYY` form.
pub fn is_valid_date(text: &str) -> bool {
    parse_day(text).is_some()
}

/// Format a date back into the `DD/MM/YYYY` form used by the source files.
pub fn format_day(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

fn parse_component<T: std::str::FromStr>(s: &str) -> Option<T> {
    let s = s.trim();
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_real_dates() {
        assert!(is_valid_date("01/01/2020"));
        assert!(is_valid_date("29/02/2020"));
        assert!(is_valid_date("30/04/2021"));
        assert!(is_valid_date("31/12/2023"));
    }

    #[test]
    fn rejects_overflowing_days() {
        assert!(!is_valid_date("31/02/2020"));
        assert!(!is_valid_date("29/02/2021"));
        assert!(!is_valid_date("00/01/2020"));
        assert!(!is_valid_date("32/01/2020"));
        assert!(!is_valid_date("31/04/2021"));
    }

    #[test]
    fn rejects_malformed_text() {
        assert!(!is_valid_date(""));
        assert!(!is_valid_date("2020-01-01"));
        assert!(!is_valid_date("01/13/2020"));
        assert!(!is_valid_date("1/1"));
        assert!(!is_valid_date("01/01/2020/1"));
        assert!(!is_valid_date("aa/01/2020"));
        assert!(!is_valid_date("-1/01/2020"));
    }

    #[test]
    fn month_lengths_are_respected() {
        let lengths = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];
        for (i, len) in lengths.iter().enumerate() {
            let month = i + 1;
            assert!(is_valid_date(&format!("{len:02}/{month:02}/2021")));
            assert!(!is_valid_date(&format!("{:02}/{month:02}/2021", len + 1)));
        }
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        assert_eq!(
            parse_day(" 15/03/2020 "),
            NaiveDate::from_ymd_opt(2020, 3, 15)
        );
    }
}
