use super::{Monetary, MonetaryError};
use anyhow::{anyhow, Result};
use std::str::FromStr;

fn amounts(values: &[&str]) -> Result<Vec<Monetary>> {
    values.iter().map(|value| Ok(Monetary::from_str(value)?)).collect()
}

#[test]
fn test_monetary_successfully_parses_valid_strings() -> Result<()> {
    let test_cases = vec![
        ("0", "0"),
        ("100", "100"),
        ("100.00", "100.00"),
        ("1.05", "1.05"),
        ("0012.50", "0012.50"),
    ];

    for (input_string, expected_output) in test_cases {
        assert_eq!(Monetary::from_str(input_string)?.to_string(), expected_output);
    }

    Ok(())
}

#[test]
fn test_monetary_fails_to_parse_invalid_strings() {
    assert!(Monetary::from_str("abc").is_err());
    assert!(Monetary::from_str("").is_err());
    assert!(Monetary::from_str("1.5").is_err());
    assert!(Monetary::from_str("1.234").is_err());
    assert!(Monetary::from_str("1.").is_err());
    assert!(Monetary::from_str(".50").is_err());
    assert!(Monetary::from_str("-1.00").is_err());
    assert!(Monetary::from_str("+1.00").is_err());
    assert!(Monetary::from_str(" 1.00").is_err());
    assert!(Monetary::from_str("1,000.00").is_err());
}

#[test]
fn test_monetary_reports_overflow_for_oversized_values() {
    let result = Monetary::from_str("99999999999999999999999999999999999999.00");

    assert!(matches!(result, Err(MonetaryError::Overflow)));
}

#[test]
fn test_monetary_equality_ignores_scale() -> Result<()> {
    assert_eq!(Monetary::from_str("100")?, Monetary::from_str("100.00")?);
    assert!(Monetary::from_str("99.99")? < Monetary::from_str("100")?);
    assert!(!Monetary::from_str("0.00")?.is_negative());

    Ok(())
}

#[test]
fn test_monetary_mean_rounds_midpoint_up() -> Result<()> {
    let mean = Monetary::mean(&amounts(&["100.00", "100.01"])?).ok_or_else(|| anyhow!("mean missing"))?;

    assert_eq!(mean.to_string(), "100.01");

    Ok(())
}

#[test]
fn test_monetary_mean_rounds_below_midpoint_down() -> Result<()> {
    let mean = Monetary::mean(&amounts(&["10.00", "10.00", "10.01"])?).ok_or_else(|| anyhow!("mean missing"))?;

    assert_eq!(mean.to_string(), "10.00");

    Ok(())
}

#[test]
fn test_monetary_mean_of_single_value_is_the_value() -> Result<()> {
    let mean = Monetary::mean(&amounts(&["42.17"])?).ok_or_else(|| anyhow!("mean missing"))?;

    assert_eq!(mean, Monetary::from_str("42.17")?);

    Ok(())
}

#[test]
fn test_monetary_mean_of_empty_slice_is_none() {
    assert!(Monetary::mean(&[]).is_none());
}

#[test]
fn test_monetary_serializes_as_text_by_default() -> Result<()> {
    let value = serde_json::to_string(&Monetary::from_str("100.00")?)?;

    assert_eq!(value, "\"100.00\"");

    Ok(())
}

#[test]
fn test_monetary_serializes_as_number_on_request() -> Result<()> {
    let mut output = Vec::new();
    let mut serializer = serde_json::Serializer::new(&mut output);
    Monetary::serialize_number(&Monetary::from_str("100.01")?, &mut serializer)?;

    assert_eq!(String::from_utf8(output)?, "100.01");

    Ok(())
}

#[test]
fn test_monetary_deserializes_from_text() -> Result<()> {
    let value: Monetary = serde_json::from_str("\"12.34\"")?;

    assert_eq!(value.to_string(), "12.34");
    assert!(serde_json::from_str::<Monetary>("\"12.3\"").is_err());

    Ok(())
}
