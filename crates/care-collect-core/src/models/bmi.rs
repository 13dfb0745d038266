//! Body mass index.

/// BMI for a height in centimetres and a weight in kilograms.
///
/// Returns `None` unless both are positive.
pub fn bmi_value(height_cm: f64, weight_kg: f64) -> Option<f64> {
    if height_cm > 0.0 && weight_kg > 0.0 && height_cm.is_finite() && weight_kg.is_finite() {
        let height_m = height_cm / 100.0;
        Some(weight_kg / (height_m * height_m))
    } else {
        None
    }
}

/// BMI from form input, rounded half-up to one decimal place.
///
/// Returns an empty string when either input is not a positive number.
pub fn compute_bmi(height_cm: &str, weight_kg: &str) -> String {
    match (parse_leading_number(height_cm), parse_leading_number(weight_kg)) {
        (Some(h), Some(w)) => bmi_value(h, w)
            .map(|bmi| format!("{:.1}", (bmi * 10.0).round() / 10.0))
            .unwrap_or_default(),
        _ => String::new(),
    }
}

/// Parse the numeric prefix of a form value ("170cm" -> 170.0, "1.7e2" -> 170.0).
fn parse_leading_number(input: &str) -> Option<f64> {
    let s = input.trim();
    let bytes = s.as_bytes();
    let digits_from = |mut i: usize| {
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        i
    };

    let mut end = 0;
    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end = 1;
    }
    end = digits_from(end);
    if bytes.get(end) == Some(&b'.') {
        end = digits_from(end + 1);
    }

    // An exponent only counts when at least one digit follows it.
    if matches!(bytes.get(end), Some(b'e') | Some(b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+') | Some(b'-')) {
            exp += 1;
        }
        let exp_end = digits_from(exp);
        if exp_end > exp {
            end = exp_end;
        }
    }
    s[..end].parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_bmi() {
        assert_eq!(compute_bmi("170", "65"), "22.5");
        assert_eq!(compute_bmi("160", "50"), "19.5");
        assert_eq!(compute_bmi(" 180 ", "90"), "27.8");
    }

    #[test]
    fn test_non_positive_inputs() {
        assert_eq!(compute_bmi("0", "65"), "");
        assert_eq!(compute_bmi("170", "0"), "");
        assert_eq!(compute_bmi("-170", "65"), "");
    }

    #[test]
    fn test_unparseable_inputs() {
        assert_eq!(compute_bmi("", "65"), "");
        assert_eq!(compute_bmi("tall", "65"), "");
        assert_eq!(compute_bmi(".", "65"), "");
    }

    #[test]
    fn test_exact_ties_round_up() {
        // 89 / 2^2 = 22.25 and 81 / 2^2 = 20.25 are exact in binary.
        assert_eq!(compute_bmi("200", "89"), "22.3");
        assert_eq!(compute_bmi("200", "81"), "20.3");
    }

    #[test]
    fn test_exponent_inputs() {
        assert_eq!(compute_bmi("1.7e2", "65"), "22.5");
        assert_eq!(compute_bmi("17E+1", "6.5e1kg"), "22.5");
        assert_eq!(parse_leading_number("1e2"), Some(100.0));
        assert_eq!(parse_leading_number("2e"), Some(2.0));
        assert_eq!(parse_leading_number("3e-x"), Some(3.0));
    }

    #[test]
    fn test_unit_suffix_ignored() {
        assert_eq!(compute_bmi("170cm", "65kg"), "22.5");
    }

    #[test]
    fn test_bmi_value() {
        let bmi = bmi_value(200.0, 80.0).unwrap();
        assert!((bmi - 20.0).abs() < 1e-9);
        assert_eq!(bmi_value(f64::NAN, 80.0), None);
    }
}
