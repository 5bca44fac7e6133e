use crate::models::BookingExportRow;

pub const EXPORT_HEADER: &str = "Booking ID,Hostel Name,User Email,Check-in,Check-out,Total Price,Guests,Status,Discount (%),Booking Date";

// One header row, one row per booking; string fields quoted with embedded
// quotes doubled.
pub fn bookings_to_csv(rows: &[BookingExportRow]) -> String {
    let mut out = String::from(EXPORT_HEADER);
    out.push('\n');

    for row in rows {
        out.push_str(&format!(
            "{},{},{},{},{},{},{},{},{},{}\n",
            row.booking_id,
            quote(&row.hostel_name),
            quote(&row.user_email),
            row.check_in.format("%Y-%m-%d"),
            row.check_out.format("%Y-%m-%d"),
            row.total_price,
            row.guests,
            quote(&row.status),
            row.discount_percent,
            row.created_at.format("%Y-%m-%d %H:%M:%S"),
        ));
    }

    out
}

fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use chrono::Utc;
    use rust_decimal::Decimal;
    use uuid::Uuid;

    fn row(hostel_name: &str) -> BookingExportRow {
        BookingExportRow {
            booking_id: Uuid::new_v4(),
            hostel_name: hostel_name.to_string(),
            user_email: "traveler@example.com".to_string(),
            check_in: Utc.with_ymd_and_hms(2024, 6, 1, 14, 0, 0).unwrap(),
            check_out: Utc.with_ymd_and_hms(2024, 6, 4, 10, 0, 0).unwrap(),
            total_price: Decimal::new(12050, 2),
            guests: 2,
            status: "confirmed".to_string(),
            discount_percent: Decimal::from(10),
            created_at: Utc.with_ymd_and_hms(2024, 5, 20, 9, 30, 0).unwrap(),
        }
    }

    #[test]
    fn one_header_plus_one_row_per_booking() {
        let rows = vec![row("Harbor Bunk"), row("Alpine Lodge")];
        let csv = bookings_to_csv(&rows);
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], EXPORT_HEADER);
    }

    #[test]
    fn string_fields_are_quoted() {
        let csv = bookings_to_csv(&[row("Harbor Bunk")]);
        let data_line = csv.lines().nth(1).unwrap();

        assert!(data_line.contains("\"Harbor Bunk\""));
        assert!(data_line.contains("\"traveler@example.com\""));
        assert!(data_line.contains("\"confirmed\""));
        assert!(data_line.contains("120.50"));
        assert!(data_line.contains("2024-06-01"));
    }

    #[test]
    fn embedded_quotes_are_doubled() {
        let csv = bookings_to_csv(&[row("The \"Cozy\" Bunk")]);
        assert!(csv.contains("\"The \"\"Cozy\"\" Bunk\""));
    }

    #[test]
    fn empty_input_yields_header_only() {
        let csv = bookings_to_csv(&[]);
        assert_eq!(csv, format!("{}\n", EXPORT_HEADER));
    }
}
