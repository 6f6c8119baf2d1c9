use std::error::Error;

use hitcounter::errors::{HitError, Result};

#[cfg(test)]
mod error_creation_tests {
    use super::*;

    #[test]
    fn test_database_operation_error() {
        let error = HitError::database_operation("写入失败");

        assert!(matches!(error, HitError::DatabaseOperation(_)));
        assert!(error.to_string().contains("Database Operation Error"));
        assert!(error.to_string().contains("写入失败"));
        assert!(error.is_storage());
    }

    #[test]
    fn test_validation_error() {
        let error = HitError::validation("start is after end");

        assert!(matches!(error, HitError::Validation(_)));
        assert_eq!(error.code(), "E007");
        assert_eq!(error.message(), "start is after end");
        assert!(!error.is_storage());
    }

    #[test]
    fn test_date_parse_error() {
        let error = HitError::date_parse("bad date");
        assert_eq!(error.code(), "E012");
        assert_eq!(error.error_type(), "Date Parse Error");
    }

    #[test]
    fn test_codes_are_unique() {
        let errors = [
            HitError::config(""),
            HitError::database_config(""),
            HitError::database_connection(""),
            HitError::database_operation(""),
            HitError::file_operation(""),
            HitError::validation(""),
            HitError::serialization(""),
            HitError::date_parse(""),
        ];
        let mut codes: Vec<&str> = errors.iter().map(|e| e.code()).collect();
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }
}

#[cfg(test)]
mod error_conversion_tests {
    use super::*;

    #[test]
    fn test_from_db_err() {
        let error: HitError = sea_orm::DbErr::Custom("boom".to_string()).into();
        assert!(matches!(error, HitError::DatabaseOperation(_)));
        assert!(error.message().contains("boom"));
    }

    #[test]
    fn test_from_io_error() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let error: HitError = io.into();
        assert!(matches!(error, HitError::FileOperation(_)));
    }

    #[test]
    fn test_from_chrono_parse_error() {
        let parse_err = chrono::NaiveDate::parse_from_str("nope", "%Y-%m-%d").unwrap_err();
        let error: HitError = parse_err.into();
        assert!(matches!(error, HitError::DateParse(_)));
    }

    #[test]
    fn test_from_serde_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error: HitError = json_err.into();
        assert!(matches!(error, HitError::Serialization(_)));
    }

    #[test]
    fn test_question_mark_propagation() {
        fn parse(input: &str) -> Result<chrono::NaiveDate> {
            Ok(chrono::NaiveDate::parse_from_str(input, "%Y-%m-%d")?)
        }
        assert!(parse("2025-01-31").is_ok());
        assert!(matches!(parse("31/01/2025"), Err(HitError::DateParse(_))));
    }
}

#[cfg(test)]
mod error_format_tests {
    use super::*;

    #[test]
    fn test_format_simple() {
        let error = HitError::config("bad timezone");
        assert_eq!(error.format_simple(), "Configuration Error: bad timezone");
        assert_eq!(error.to_string(), error.format_simple());
    }

    #[test]
    fn test_format_colored_contains_code() {
        let error = HitError::file_operation("disk full");
        let colored = error.format_colored();
        assert!(colored.contains("E006"));
        assert!(colored.contains("disk full"));
    }

    #[test]
    fn test_implements_std_error() {
        let error = HitError::validation("x");
        let dyn_error: &dyn Error = &error;
        assert!(dyn_error.source().is_none());
    }
}
