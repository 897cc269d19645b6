//! NUBAN account-number generation.
//!
//! A NUBAN is a structured 10-digit account identifier: 3-digit bank code,
//! 3-digit branch code, 4-digit account segment. The generator guarantees the
//! shape only — uniqueness is enforced by the store's unique constraint, and
//! the caller retries with a fresh number on a duplicate-key error.

use rand::Rng;

/// Institution bank code segment (3 digits).
pub const BANK_CODE: &str = "090";

/// Branch code segment (3 digits).
pub const BRANCH_CODE: &str = "001";

/// Total NUBAN length in digits.
pub const NUBAN_LEN: usize = 10;

#[derive(Debug, Clone)]
pub struct NubanGenerator {
    bank_code: &'static str,
    branch_code: &'static str,
}

impl NubanGenerator {
    pub fn new() -> Self {
        NubanGenerator {
            bank_code: BANK_CODE,
            branch_code: BRANCH_CODE,
        }
    }

    /// Produce a 10-digit account number: bank code + branch code + a random
    /// 4-digit account segment.
    pub fn generate(&self) -> String {
        let mut rng = rand::rng();
        let serial: u16 = rng.random_range(0..10_000);
        format!("{}{}{:04}", self.bank_code, self.branch_code, serial)
    }
}

impl Default for NubanGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Shape check for account numbers arriving from the outside.
pub fn is_valid_account_number(value: &str) -> bool {
    value.len() == NUBAN_LEN && value.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_generate_ten_digit_numbers() {
        let generator = NubanGenerator::new();
        for _ in 0..100 {
            let nuban = generator.generate();
            assert_eq!(nuban.len(), 10, "wrong length: {nuban}");
            assert!(nuban.bytes().all(|b| b.is_ascii_digit()), "non-digit: {nuban}");
        }
    }

    #[test]
    fn should_compose_bank_branch_and_serial_segments() {
        let nuban = NubanGenerator::new().generate();
        assert_eq!(&nuban[..3], BANK_CODE);
        assert_eq!(&nuban[3..6], BRANCH_CODE);
        assert_eq!(nuban[6..].len(), 4);
    }

    #[test]
    fn should_validate_account_number_shape() {
        assert!(is_valid_account_number("0900011234"));
        assert!(!is_valid_account_number("090001123"));
        assert!(!is_valid_account_number("09000112345"));
        assert!(!is_valid_account_number("09000a1234"));
        assert!(!is_valid_account_number(""));
    }
}
