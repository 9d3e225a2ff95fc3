// Number and currency handling for Brazilian-formatted data: `,` as decimal
// separator, `.` as thousands separator.
pub mod brazilian_format {
    use anyhow::{anyhow, Result};
    use std::str::FromStr;

    const CURRENCY_PREFIX: &str = "R$ ";
    // Temporary stand-in while the two separators trade places.
    const SWAP_PLACEHOLDER: &str = "X";

    // Parses decimals like "1.234,56" or "123,45" into f64
    pub fn parse_decimal(s: &str) -> Result<f64> {
        let normalized = s.trim()
            .replace('.', "")  // Remove thousand separators
            .replace(',', "."); // Replace decimal separator

        f64::from_str(&normalized)
            .map_err(|e| anyhow!("Failed to parse decimal '{}': {}", s, e))
    }

    /// Shortest representation that parses back to the same `f64`, with `,`
    /// as the decimal separator and no grouping.
    pub fn format_decimal(value: f64) -> String {
        value.to_string().replace('.', ",")
    }

    /// `1234.5` -> `"1,234.50"`: two decimals, `,` thousands groups.
    pub fn group_thousands(value: f64) -> String {
        let fixed = format!("{:.2}", value);
        if !value.is_finite() {
            return fixed;
        }

        let (sign, unsigned) = match fixed.strip_prefix('-') {
            Some(rest) => ("-", rest),
            None => ("", fixed.as_str()),
        };
        let (int_part, frac_part) = unsigned.split_once('.').unwrap_or((unsigned, "00"));

        let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
        for (i, digit) in int_part.chars().enumerate() {
            if i > 0 && (int_part.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(digit);
        }

        format!("{sign}{grouped}.{frac_part}")
    }

    /// `1234.5` -> `"R$ 1.234,50"`.
    pub fn format_currency(value: f64) -> String {
        let swapped = group_thousands(value)
            .replace(',', SWAP_PLACEHOLDER)
            .replace('.', ",")
            .replace(SWAP_PLACEHOLDER, ".");
        format!("{CURRENCY_PREFIX}{swapped}")
    }

    /// `45.24` -> `"45.2%"`.
    pub fn format_percent(value: f64) -> String {
        format!("{:.1}%", value)
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_parse_decimal_simple() {
            assert_eq!(parse_decimal("123,45").unwrap(), 123.45);
        }

        #[test]
        fn test_parse_decimal_with_thousands() {
            assert_eq!(parse_decimal("1.234,56").unwrap(), 1234.56);
        }

        #[test]
        fn test_parse_decimal_negative_and_integer() {
            assert_eq!(parse_decimal("-12,3").unwrap(), -12.3);
            assert_eq!(parse_decimal(" 150 ").unwrap(), 150.0);
        }

        #[test]
        fn test_parse_decimal_rejects_garbage() {
            assert!(parse_decimal("").is_err());
            assert!(parse_decimal("abc").is_err());
        }

        #[test]
        fn test_format_decimal_round_trips() {
            for value in [548.9715, 0.1, 100.0, -3.25, 1e-7] {
                let text = format_decimal(value);
                assert!(!text.contains('.'), "unexpected '.' in {}", text);
                assert_eq!(parse_decimal(&text).unwrap(), value);
            }
            assert_eq!(format_decimal(548.9715), "548,9715");
        }

        #[test]
        fn test_group_thousands() {
            assert_eq!(group_thousands(0.0), "0.00");
            assert_eq!(group_thousands(999.5), "999.50");
            assert_eq!(group_thousands(1234.5), "1,234.50");
            assert_eq!(group_thousands(1234567.891), "1,234,567.89");
            assert_eq!(group_thousands(-1234.5), "-1,234.50");
        }

        #[test]
        fn test_format_currency() {
            assert_eq!(format_currency(1234.5), "R$ 1.234,50");
            assert_eq!(format_currency(0.0), "R$ 0,00");
            assert_eq!(format_currency(-12.3), "R$ -12,30");
            assert_eq!(format_currency(150.0), "R$ 150,00");
            assert_eq!(format_currency(1234567.891), "R$ 1.234.567,89");
            assert_eq!(format_currency(-98765.4), "R$ -98.765,40");
        }

        #[test]
        fn test_format_percent() {
            assert_eq!(format_percent(45.2), "45.2%");
            assert_eq!(format_percent(100.0), "100.0%");
            assert_eq!(format_percent(0.0), "0.0%");
        }
    }
}
