//! Utilidades de validación
//!
//! Este módulo contiene funciones helper para validación de datos
//! y conversión de tipos (horas del día, coordenadas, importes).

use chrono::{NaiveTime, Timelike};
use rust_decimal::Decimal;
use validator::ValidationError;

const MINUTES_PER_DAY: f64 = 24.0 * 60.0;

/// Convertir "HH:MM" o "HH:MM:SS" a minutos desde medianoche
pub fn parse_time_of_day(value: &str) -> Option<u32> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .ok()
        .map(|time| time.hour() * 60 + time.minute())
}

/// Formatear minutos del día como "H:MM"
pub fn format_minutes(minutes: f64) -> String {
    let total = minutes.floor().max(0.0) as u64;
    format!("{}:{:02}", total / 60, total % 60)
}

/// Convertir minutos desde medianoche a hora del día (módulo 24h)
pub fn minutes_to_time(minutes: f64) -> Option<NaiveTime> {
    if !minutes.is_finite() || minutes < 0.0 {
        return None;
    }
    let seconds = ((minutes % MINUTES_PER_DAY) * 60.0).round() as u32;
    NaiveTime::from_num_seconds_from_midnight_opt(seconds.min(86_399), 0)
}

/// Convertir un importe f64 a Decimal, con cero para valores no representables
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64_retain(value)
        .map(|d| d.round_dp(2))
        .unwrap_or(Decimal::ZERO)
}

/// Validar formato de coordenadas GPS
pub fn validate_coordinates(lat: f64, lng: f64) -> Result<(), ValidationError> {
    if !(-90.0..=90.0).contains(&lat) {
        let mut error = ValidationError::new("latitude");
        error.add_param("value".into(), &lat);
        error.add_param("range".into(), &"-90.0 to 90.0".to_string());
        return Err(error);
    }

    if !(-180.0..=180.0).contains(&lng) {
        let mut error = ValidationError::new("longitude");
        error.add_param("value".into(), &lng);
        error.add_param("range".into(), &"-180.0 to 180.0".to_string());
        return Err(error);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_time_of_day() {
        assert_eq!(parse_time_of_day("09:00"), Some(540));
        assert_eq!(parse_time_of_day("10:30:00"), Some(630));
        assert_eq!(parse_time_of_day(" 7:05 "), Some(425));
        assert_eq!(parse_time_of_day("25:00"), None);
        assert_eq!(parse_time_of_day("noon"), None);
    }

    #[test]
    fn test_format_minutes() {
        assert_eq!(format_minutes(630.0), "10:30");
        assert_eq!(format_minutes(510.0), "8:30");
        assert_eq!(format_minutes(5.0), "0:05");
    }

    #[test]
    fn test_minutes_to_time() {
        assert_eq!(minutes_to_time(630.0), NaiveTime::from_hms_opt(10, 30, 0));
        assert_eq!(minutes_to_time(-1.0), None);
        assert_eq!(minutes_to_time(1500.0), NaiveTime::from_hms_opt(1, 0, 0));
    }

    #[test]
    fn test_to_decimal() {
        assert_eq!(to_decimal(10.256).to_string(), "10.26");
        assert_eq!(to_decimal(f64::NAN), Decimal::ZERO);
    }

    #[test]
    fn test_validate_coordinates() {
        assert!(validate_coordinates(41.0, 29.0).is_ok());
        assert!(validate_coordinates(91.0, 29.0).is_err());
        assert!(validate_coordinates(41.0, -181.0).is_err());
    }
}
