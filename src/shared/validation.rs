use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Regex for equipment chassis numbers
    /// Uppercase alphanumeric segments separated by single hyphens
    /// - Valid: "CHS-2023001", "WDB9634031L123456", "CAT-320-X1"
    /// - Invalid: "chs-2023001", "-CHS", "CHS--1", "CHS 1"
    pub static ref CHASSIS_NUMBER_REGEX: Regex =
        Regex::new(r"^[A-Z0-9]+(?:-[A-Z0-9]+)*$").unwrap();

    /// Regex for phone numbers (optional leading +, digits, spaces and hyphens)
    pub static ref PHONE_REGEX: Regex = Regex::new(r"^\+?[0-9][0-9 \-]{5,19}$").unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chassis_number_regex_valid() {
        assert!(CHASSIS_NUMBER_REGEX.is_match("CHS-2023001"));
        assert!(CHASSIS_NUMBER_REGEX.is_match("WDB9634031L123456"));
        assert!(CHASSIS_NUMBER_REGEX.is_match("CAT-320-X1"));
    }

    #[test]
    fn test_chassis_number_regex_invalid() {
        assert!(!CHASSIS_NUMBER_REGEX.is_match("chs-2023001")); // lowercase
        assert!(!CHASSIS_NUMBER_REGEX.is_match("-CHS")); // starts with hyphen
        assert!(!CHASSIS_NUMBER_REGEX.is_match("CHS--1")); // double hyphen
        assert!(!CHASSIS_NUMBER_REGEX.is_match("CHS 1")); // space
        assert!(!CHASSIS_NUMBER_REGEX.is_match("")); // empty
    }

    #[test]
    fn test_phone_regex() {
        assert!(PHONE_REGEX.is_match("+62 812-3456-7890"));
        assert!(PHONE_REGEX.is_match("0812345678"));
        assert!(!PHONE_REGEX.is_match("call me"));
        assert!(!PHONE_REGEX.is_match("12"));
    }
}
