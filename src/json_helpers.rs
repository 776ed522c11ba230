//! JSON helpers for wear percentages
//!
//! A part with a degenerate lifespan evaluates to a NaN or infinite
//! percentage. JSON has no literal for those, so they are written as the
//! strings `"NaN"`, `"Infinity"` and `"-Infinity"` and read back the same way.

use serde::{Deserializer, Serializer};

/// Serialize an `f64`, writing non-finite values as strings
///
/// # Examples
///
/// ```rust,ignore
/// #[serde(serialize_with = "partlife::json_helpers::serialize_f64")]
/// pub percentage_used: f64,
/// ```
pub fn serialize_f64<S>(value: &f64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    if value.is_nan() {
        serializer.serialize_str("NaN")
    } else if value.is_infinite() && value.is_sign_positive() {
        serializer.serialize_str("Infinity")
    } else if value.is_infinite() {
        serializer.serialize_str("-Infinity")
    } else {
        serializer.serialize_f64(*value)
    }
}

/// Deserialize an `f64` from a number or one of the special strings
/// written by [`serialize_f64`].
pub fn deserialize_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::{self, Visitor};
    use std::fmt;

    struct PercentageVisitor;

    impl<'de> Visitor<'de> for PercentageVisitor {
        type Value = f64;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a number or one of \"NaN\", \"Infinity\", \"-Infinity\"")
        }

        fn visit_f64<E>(self, value: f64) -> Result<f64, E>
        where
            E: de::Error,
        {
            Ok(value)
        }

        fn visit_i64<E>(self, value: i64) -> Result<f64, E>
        where
            E: de::Error,
        {
            Ok(value as f64)
        }

        fn visit_u64<E>(self, value: u64) -> Result<f64, E>
        where
            E: de::Error,
        {
            Ok(value as f64)
        }

        fn visit_str<E>(self, value: &str) -> Result<f64, E>
        where
            E: de::Error,
        {
            match value {
                "NaN" => Ok(f64::NAN),
                "Infinity" => Ok(f64::INFINITY),
                "-Infinity" => Ok(f64::NEG_INFINITY),
                _ => Err(de::Error::invalid_value(
                    de::Unexpected::Str(value),
                    &"NaN, Infinity, or -Infinity",
                )),
            }
        }
    }

    deserializer.deserialize_any(PercentageVisitor)
}
