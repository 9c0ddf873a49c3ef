use chrono::{DateTime, Utc};

/// 以印度數字分組（12,34,567）格式化整數
pub fn format_number(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let grouped = if digits.len() <= 3 {
        digits
    } else {
        let (head, tail) = digits.split_at(digits.len() - 3);
        let mut groups: Vec<&str> = Vec::new();
        let mut end = head.len();
        while end > 0 {
            let start = end.saturating_sub(2);
            groups.push(&head[start..end]);
            end = start;
        }
        groups.reverse();
        format!("{},{}", groups.join(","), tail)
    };

    if value < 0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

pub fn format_currency(amount: i64) -> String {
    let number = format_number(amount);
    match number.strip_prefix('-') {
        Some(abs) => format!("-₹{}.00", abs),
        None => format!("₹{}.00", number),
    }
}

pub fn format_monthly(amount: i64) -> String {
    format!("₹{}/month", amount)
}

pub fn format_date(at: &DateTime<Utc>) -> String {
    at.format("%-d %B %Y").to_string()
}

pub fn format_time(at: &DateTime<Utc>) -> String {
    at.format("%I:%M %p").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_indian_grouping() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1500), "1,500");
        assert_eq!(format_number(123456), "1,23,456");
        assert_eq!(format_number(12345678), "1,23,45,678");
        assert_eq!(format_number(-1500), "-1,500");
    }

    #[test]
    fn test_currency() {
        assert_eq!(format_currency(1500), "₹1,500.00");
        assert_eq!(format_currency(-250), "-₹250.00");
        assert_eq!(format_monthly(3000), "₹3000/month");
    }

    #[test]
    fn test_date_and_time() {
        let at = Utc.with_ymd_and_hms(2024, 3, 5, 14, 7, 0).unwrap();
        assert_eq!(format_date(&at), "5 March 2024");
        assert_eq!(format_time(&at), "02:07 PM");
    }
}
