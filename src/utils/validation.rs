// Règles de validation métier : politiques de mot de passe, username,
// dates du tracker. Deux politiques de mot de passe coexistent
// volontairement (voir DESIGN.md) :
//   - "basique" (inscription, reset) : 6 à 255 caractères, une lettre,
//     un chiffre et un caractère spécial parmi @$!%*?&
//   - "stricte" (création de compte via /api/user) : 8 caractères minimum,
//     une majuscule et un chiffre
use chrono::{NaiveDate, NaiveDateTime};
use validator::ValidationError;

const SPECIAL_CHARS: &str = "@$!%*?&";

/// Username : 3 à 50 caractères alphanumériques ou underscore
pub fn username_valid(username: &str) -> bool {
    (3..=50).contains(&username.len())
        && username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Politique basique : lettre + chiffre + caractère spécial, 6 à 255
/// caractères, uniquement dans l'alphabet [A-Za-z0-9@$!%*?&]
pub fn password_basic_valid(password: &str) -> bool {
    (6..=255).contains(&password.len())
        && password
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || SPECIAL_CHARS.contains(c))
        && password.chars().any(|c| c.is_ascii_alphabetic())
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(|c| SPECIAL_CHARS.contains(c))
}

/// Politique stricte : au moins 8 caractères, une majuscule et un chiffre
pub fn password_strict_valid(password: &str) -> bool {
    password.len() >= 8
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_digit())
}

// Adaptateurs pour #[validate(custom(...))] sur les DTOs

pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    if username_valid(username) {
        Ok(())
    } else {
        let mut error = ValidationError::new("username");
        error.message = Some(
            "Le nom d'utilisateur doit contenir 3 à 50 caractères alphanumériques ou underscore"
                .into(),
        );
        Err(error)
    }
}

pub fn validate_password_basic(password: &str) -> Result<(), ValidationError> {
    if password_basic_valid(password) {
        Ok(())
    } else {
        let mut error = ValidationError::new("password");
        error.message = Some(
            "Le mot de passe doit contenir au moins 6 caractères, une lettre, un chiffre et un caractère spécial"
                .into(),
        );
        Err(error)
    }
}

/// Parse une date "YYYY-MM-DD" en vérifiant strictement le format
/// (dix caractères, tirets en position fixe) et la validité calendaire
/// ("2024-02-30" est rejetée, "2024-02-29" est acceptée).
pub fn parse_day(date: &str) -> Option<NaiveDate> {
    let bytes = date.as_bytes();
    if bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
        return None;
    }
    if !date
        .char_indices()
        .all(|(i, c)| matches!(i, 4 | 7) || c.is_ascii_digit())
    {
        return None;
    }
    NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
}

/// Vérifie qu'un couple (année, mois) désigne un mois calendaire réel
pub fn month_valid(year: i32, month: u32) -> bool {
    NaiveDate::from_ymd_opt(year, month, 1).is_some()
}

/// Parse un datetime ISO-8601 ("YYYY-MM-DDTHH:MM:SS"), avec tolérance
/// pour le séparateur espace, les secondes omises et la date seule
pub fn parse_datetime(value: &str) -> Option<NaiveDateTime> {
    const FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ];

    for format in FORMATS {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(value, format) {
            return Some(datetime);
        }
    }

    // Date seule : minuit
    parse_day(value).and_then(|d| d.and_hms_opt(0, 0, 0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_username_policy() {
        assert!(username_valid("marie_dupont"));
        assert!(username_valid("abc"));
        assert!(!username_valid("ab")); // trop court
        assert!(!username_valid(&"a".repeat(51))); // trop long
        assert!(!username_valid("marie dupont")); // espace interdit
        assert!(!username_valid("marie-dupont")); // tiret interdit
        assert!(!username_valid(""));
    }

    #[test]
    fn test_password_basic_policy() {
        assert!(password_basic_valid("abc12!"));
        assert!(password_basic_valid("Soleil2024&"));
        assert!(!password_basic_valid("abc1!")); // trop court
        assert!(!password_basic_valid("abcdef!")); // pas de chiffre
        assert!(!password_basic_valid("123456!")); // pas de lettre
        assert!(!password_basic_valid("abc123")); // pas de caractère spécial
        assert!(!password_basic_valid("abc 12!")); // caractère hors alphabet
    }

    #[test]
    fn test_password_strict_policy() {
        assert!(password_strict_valid("Password1"));
        assert!(!password_strict_valid("Pass1")); // trop court
        assert!(!password_strict_valid("password1")); // pas de majuscule
        assert!(!password_strict_valid("Password")); // pas de chiffre
    }

    #[test]
    fn test_parse_day() {
        let day = parse_day("2024-02-29").unwrap(); // année bissextile
        assert_eq!((day.year(), day.month(), day.day()), (2024, 2, 29));

        assert!(parse_day("2024-02-30").is_none()); // date inexistante
        assert!(parse_day("2023-02-29").is_none()); // pas bissextile
        assert!(parse_day("2024-13-01").is_none());
        assert!(parse_day("2024-2-03").is_none()); // format non strict
        assert!(parse_day("24-02-03").is_none());
        assert!(parse_day("2024/02/03").is_none());
        assert!(parse_day("n'importe quoi").is_none());
    }

    #[test]
    fn test_month_valid() {
        assert!(month_valid(2024, 1));
        assert!(month_valid(2024, 12));
        assert!(!month_valid(2024, 0));
        assert!(!month_valid(2024, 13));
    }

    #[test]
    fn test_parse_datetime() {
        let dt = parse_datetime("2024-05-12T14:30:00").unwrap();
        assert_eq!((dt.hour(), dt.minute()), (14, 30));

        assert!(parse_datetime("2024-05-12 14:30:00").is_some());
        assert!(parse_datetime("2024-05-12T14:30").is_some());

        // Date seule : minuit
        let midnight = parse_datetime("2024-05-12").unwrap();
        assert_eq!((midnight.hour(), midnight.minute()), (0, 0));

        assert!(parse_datetime("pas une date").is_none());
        assert!(parse_datetime("2024-02-30T10:00:00").is_none());
    }
}
