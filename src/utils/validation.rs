//! Utilidades de validación
//!
//! Este módulo contiene las reglas de formato para los formularios de
//! flota: matrículas tailandesas, cédulas/NIT con dígito verificador,
//! y rangos numéricos de capacidad.

use lazy_static::lazy_static;
use regex::Regex;
use validator::ValidationError;

/// Estados válidos de un camión
pub const TRUCK_STATUSES: [&str; 5] = ["active", "inactive", "maintenance", "insurance_claim", "sold"];

/// Tipos de propiedad de un camión
pub const OWNERSHIP_KINDS: [&str; 2] = ["own", "subcontractor"];

/// Tipos de subcontratista
pub const SUBCONTRACTOR_TYPES: [&str; 2] = ["individual", "company"];

/// Estados válidos de un subcontratista
pub const SUBCONTRACTOR_STATUSES: [&str; 3] = ["active", "pending", "suspended"];

/// Roles válidos de usuario
pub const USER_ROLES: [&str; 5] = ["admin", "partner", "subcontractor", "customer", "user"];

lazy_static! {
    // Dos formatos aceptados: "กก-1234" y "1กก-1234"
    static ref PLATE_TWO_LETTERS: Regex = Regex::new(r"^[ก-ฮ]{2}-[0-9]{1,4}$").unwrap();
    static ref PLATE_DIGIT_PREFIX: Regex = Regex::new(r"^[0-9][ก-ฮ]{2}-[0-9]{1,4}$").unwrap();
    static ref YEAR_FORMAT: Regex = Regex::new(r"^[0-9]{4}$").unwrap();
}

/// Validar formato de matrícula tailandesa
pub fn validate_license_plate(value: &str) -> Result<(), ValidationError> {
    if PLATE_TWO_LETTERS.is_match(value) || PLATE_DIGIT_PREFIX.is_match(value) {
        return Ok(());
    }
    let mut error = ValidationError::new("license_plate");
    error.message = Some("License plate must match กก-1234 or 1กก-1234".into());
    error.add_param("value".into(), &value.to_string());
    Err(error)
}

/// Validar VIN: exactamente 17 caracteres
pub fn validate_vin(value: &str) -> Result<(), ValidationError> {
    if value.chars().count() == 17 {
        return Ok(());
    }
    let mut error = ValidationError::new("vin");
    error.message = Some("VIN must be exactly 17 characters".into());
    error.add_param("actual".into(), &value.chars().count());
    Err(error)
}

/// Validar número de motor: exactamente 10 caracteres
pub fn validate_engine_number(value: &str) -> Result<(), ValidationError> {
    if value.chars().count() == 10 {
        return Ok(());
    }
    let mut error = ValidationError::new("engine_number");
    error.message = Some("Engine number must be exactly 10 characters".into());
    error.add_param("actual".into(), &value.chars().count());
    Err(error)
}

/// Validar año: exactamente 4 dígitos, como string
pub fn validate_year(value: &str) -> Result<(), ValidationError> {
    if YEAR_FORMAT.is_match(value) {
        return Ok(());
    }
    let mut error = ValidationError::new("year");
    error.message = Some("Year must be exactly 4 digits".into());
    error.add_param("value".into(), &value.to_string());
    Err(error)
}

/// Validar asientos: string opcional que debe parsear a entero en [0, 10]
pub fn validate_seats(value: &str) -> Result<(), ValidationError> {
    match value.parse::<i64>() {
        Ok(n) if (0..=10).contains(&n) => Ok(()),
        _ => {
            let mut error = ValidationError::new("seats");
            error.message = Some("Seats must be an integer between 0 and 10".into());
            error.add_param("value".into(), &value.to_string());
            Err(error)
        }
    }
}

/// Validar estado de camión: membresía en el enum, string vacío rechazado
pub fn validate_truck_status(value: &str) -> Result<(), ValidationError> {
    if TRUCK_STATUSES.contains(&value) {
        return Ok(());
    }
    let mut error = ValidationError::new("status");
    error.message = Some("Status must be one of the allowed truck statuses".into());
    error.add_param("value".into(), &value.to_string());
    error.add_param("allowed_values".into(), &format!("{:?}", TRUCK_STATUSES));
    Err(error)
}

/// Validar membresía en una lista de valores permitidos
pub fn validate_one_of(code: &'static str, value: &str, allowed: &[&str]) -> Result<(), ValidationError> {
    if allowed.contains(&value) {
        return Ok(());
    }
    let mut error = ValidationError::new(code);
    error.add_param("value".into(), &value.to_string());
    error.add_param("allowed_values".into(), &format!("{:?}", allowed));
    Err(error)
}

/// Cota única para numéricos de capacidad: no negativo y dentro del máximo
pub fn validate_capacity(code: &'static str, value: f64, max: f64) -> Result<(), ValidationError> {
    if value.is_finite() && value >= 0.0 && value <= max {
        return Ok(());
    }
    let mut error = ValidationError::new(code);
    error.message = Some("Value must be a non-negative number within the allowed range".into());
    error.add_param("max".into(), &max);
    error.add_param("actual".into(), &value);
    Err(error)
}

/// Dígito verificador tailandés (cédula nacional y NIT usan el mismo algoritmo):
/// cada uno de los primeros 12 dígitos se multiplica por (13 - posición),
/// y el dígito 13 debe ser (11 - suma % 11) % 10.
pub fn thai_check_digit_ok(value: &str) -> bool {
    if value.chars().count() != 13 || !value.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }
    let digits: Vec<u32> = value.chars().filter_map(|c| c.to_digit(10)).collect();
    let sum: u32 = digits[..12]
        .iter()
        .enumerate()
        .map(|(i, d)| d * (13 - i as u32))
        .sum();
    let expected = (11 - sum % 11) % 10;
    digits[12] == expected
}

/// Validar cédula nacional tailandesa
pub fn validate_thai_id(value: &str) -> Result<(), ValidationError> {
    if thai_check_digit_ok(value) {
        return Ok(());
    }
    let mut error = ValidationError::new("thai_id");
    error.message = Some("Identification number failed the check-digit validation".into());
    error.add_param("value".into(), &value.to_string());
    Err(error)
}

/// Validar que un valor sea no negativo
pub fn validate_non_negative<T: PartialOrd + std::fmt::Display + num_traits::Zero + serde::Serialize>(
    value: T,
) -> Result<(), ValidationError> {
    if value < T::zero() {
        let mut error = ValidationError::new("non_negative");
        error.add_param("value".into(), &value);
        return Err(error);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_license_plate_accepted_formats() {
        assert!(validate_license_plate("กก-1234").is_ok());
        assert!(validate_license_plate("1กก-1234").is_ok());
        assert!(validate_license_plate("ขค-1").is_ok());
    }

    #[test]
    fn test_validate_license_plate_rejected_formats() {
        // sin guión
        assert!(validate_license_plate("กก1234").is_err());
        // letras latinas
        assert!(validate_license_plate("abc-1234").is_err());
        // tres letras
        assert!(validate_license_plate("กกก-1234").is_err());
        assert!(validate_license_plate("").is_err());
        assert!(validate_license_plate("กก-12345").is_err());
    }

    #[test]
    fn test_validate_vin_exact_length() {
        assert!(validate_vin("MP1TFR86JGT000123").is_ok());
        assert!(validate_vin("MP1TFR86JGT00012").is_err());
        assert!(validate_vin("MP1TFR86JGT0001234").is_err());
    }

    #[test]
    fn test_validate_engine_number_exact_length() {
        assert!(validate_engine_number("4JJ1E12345").is_ok());
        assert!(validate_engine_number("4JJ1E1234").is_err());
        assert!(validate_engine_number("4JJ1E123456").is_err());
    }

    #[test]
    fn test_validate_year() {
        assert!(validate_year("2024").is_ok());
        assert!(validate_year("202").is_err());
        assert!(validate_year("20245").is_err());
        assert!(validate_year("20a4").is_err());
    }

    #[test]
    fn test_validate_seats() {
        assert!(validate_seats("0").is_ok());
        assert!(validate_seats("10").is_ok());
        assert!(validate_seats("11").is_err());
        assert!(validate_seats("-1").is_err());
        assert!(validate_seats("dos").is_err());
    }

    #[test]
    fn test_validate_truck_status() {
        assert!(validate_truck_status("active").is_ok());
        assert!(validate_truck_status("insurance_claim").is_ok());
        // string vacío rechazado aunque el tipo lo permita
        assert!(validate_truck_status("").is_err());
        assert!(validate_truck_status("bogus").is_err());
    }

    #[test]
    fn test_validate_capacity_single_pass() {
        assert!(validate_capacity("engine_capacity", 0.0, 20000.0).is_ok());
        assert!(validate_capacity("engine_capacity", 20000.0, 20000.0).is_ok());
        assert!(validate_capacity("engine_capacity", 20001.0, 20000.0).is_err());
        assert!(validate_capacity("engine_capacity", -1.0, 20000.0).is_err());
        assert!(validate_capacity("fuel_capacity", f64::NAN, 1000.0).is_err());
    }

    #[test]
    fn test_thai_check_digit() {
        // 12 dígitos arbitrarios + dígito verificador calculado
        let body = "110170203451";
        let sum: u32 = body
            .chars()
            .filter_map(|c| c.to_digit(10))
            .enumerate()
            .map(|(i, d)| d * (13 - i as u32))
            .sum();
        let check = (11 - sum % 11) % 10;
        let id = format!("{}{}", body, check);
        assert!(thai_check_digit_ok(&id));

        // mutar cualquier dígito sin recalcular el checksum falla
        let mut chars: Vec<char> = id.chars().collect();
        chars[4] = if chars[4] == '9' { '0' } else {
            char::from_digit(chars[4].to_digit(10).unwrap() + 1, 10).unwrap()
        };
        let mutated: String = chars.into_iter().collect();
        assert!(!thai_check_digit_ok(&mutated));
    }

    #[test]
    fn test_thai_check_digit_shape() {
        assert!(!thai_check_digit_ok(""));
        assert!(!thai_check_digit_ok("123456789012"));
        assert!(!thai_check_digit_ok("1234567890123a"));
        assert!(!thai_check_digit_ok("12345678901x3"));
    }

    #[test]
    fn test_validate_non_negative() {
        assert!(validate_non_negative(0.0).is_ok());
        assert!(validate_non_negative(5.5).is_ok());
        assert!(validate_non_negative(-0.1).is_err());
    }
}
