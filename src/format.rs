//! Display formatting for byte counts and image dimensions.

/// Assumed screen resolution when converting pixel dimensions to
/// physical units.
pub const DPI: f64 = 96.0;

const SIZE_UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

/// Renders a byte count with the largest unit that keeps the value at or
/// above one, to at most two decimal places with trailing zeros dropped.
/// Zero is spelled `0 Bytes`. Counts past the terabyte mark stay in GB.
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    let exp = (bytes.ilog(1024) as usize).min(SIZE_UNITS.len() - 1);
    let value = bytes as f64 / 1024f64.powi(exp as i32);
    format!("{} {}", trim_fixed(value), SIZE_UNITS[exp])
}

// "5.00" -> "5", "1.50" -> "1.5", "1.07" stays as is
fn trim_fixed(value: f64) -> String {
    let fixed = format!("{value:.2}");
    fixed.trim_end_matches('0').trim_end_matches('.').to_string()
}

pub fn format_dimensions_px(width: u32, height: u32) -> String {
    format!("{width} x {height} px")
}

/// Inches at the assumed DPI, always two decimal places.
pub fn format_dimensions_in(width: u32, height: u32) -> String {
    format!("{:.2} x {:.2} in", f64::from(width) / DPI, f64::from(height) / DPI)
}

/// Centimeters at the assumed DPI, always two decimal places.
pub fn format_dimensions_cm(width: u32, height: u32) -> String {
    format!(
        "{:.2} x {:.2} cm",
        f64::from(width) / DPI * 2.54,
        f64::from(height) / DPI * 2.54
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_bytes() {
        assert_eq!(format_file_size(0), "0 Bytes");
    }

    #[test]
    fn bytes_below_one_kilobyte() {
        assert_eq!(format_file_size(1), "1 Bytes");
        assert_eq!(format_file_size(500), "500 Bytes");
        assert_eq!(format_file_size(1023), "1023 Bytes");
    }

    #[test]
    fn whole_units_lose_their_decimals() {
        assert_eq!(format_file_size(1024), "1 KB");
        assert_eq!(format_file_size(1_048_576), "1 MB");
        assert_eq!(format_file_size(5 * 1024 * 1024), "5 MB");
        assert_eq!(format_file_size(1_073_741_824), "1 GB");
    }

    #[test]
    fn fractional_values_keep_up_to_two_decimals() {
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(1100), "1.07 KB");
        assert_eq!(format_file_size(1_610_612_736), "1.5 GB");
    }

    #[test]
    fn terabytes_stay_in_gigabytes() {
        assert_eq!(format_file_size(2_199_023_255_552), "2048 GB");
    }

    #[test]
    fn pixel_dimensions() {
        assert_eq!(format_dimensions_px(1920, 1080), "1920 x 1080 px");
    }

    #[test]
    fn physical_dimensions_keep_trailing_zeros() {
        assert_eq!(format_dimensions_in(1920, 1080), "20.00 x 11.25 in");
        assert_eq!(format_dimensions_in(96, 96), "1.00 x 1.00 in");
        assert_eq!(format_dimensions_cm(96, 96), "2.54 x 2.54 cm");
        assert_eq!(format_dimensions_cm(1920, 1080), "50.80 x 28.57 cm");
    }

    #[test]
    fn physical_dimensions_round_to_two_places() {
        assert_eq!(format_dimensions_in(800, 600), "8.33 x 6.25 in");
        assert_eq!(format_dimensions_cm(640, 480), "16.93 x 12.70 cm");
    }
}
