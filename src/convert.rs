//! Scalar ↔ typed-value conversion.
//!
//! Every stored scalar is a string; these traits are the boundary where
//! typed values enter and leave. Conversion failures carry
//! [`ErrorKind::Convert`](crate::ErrorKind) and are wrapped into access
//! errors at the node boundary.

use std::borrow::Cow;

use crate::error::{Error, Result};

/// Encode a typed value into its scalar string form.
pub trait ToScalar {
    fn encode_scalar(&self) -> Result<String>;
}

/// Decode a typed value out of a scalar string.
pub trait FromScalar: Sized {
    fn decode_scalar(text: &str) -> Result<Self>;
}

impl ToScalar for String {
    fn encode_scalar(&self) -> Result<String> {
        Ok(self.clone())
    }
}

impl FromScalar for String {
    fn decode_scalar(text: &str) -> Result<Self> {
        Ok(text.to_string())
    }
}

impl ToScalar for &str {
    fn encode_scalar(&self) -> Result<String> {
        Ok((*self).to_string())
    }
}

impl ToScalar for bool {
    fn encode_scalar(&self) -> Result<String> {
        Ok(if *self { "true" } else { "false" }.to_string())
    }
}

impl FromScalar for bool {
    fn decode_scalar(text: &str) -> Result<Self> {
        match text {
            "true" => Ok(true),
            "false" => Ok(false),
            _ => Err(Error::convert(format!(
                "unable to convert the string into a boolean: '{text}'"
            ))),
        }
    }
}

/// Split an optional sign and `0x`/`0o`/`0b` radix prefix, keeping the sign
/// attached to the digits so `from_str_radix` sees it.
fn split_radix_prefix(text: &str) -> (Cow<'_, str>, u32) {
    let (negative, body) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };
    let (digits, radix) = if let Some(hex) = body.strip_prefix("0x").or_else(|| body.strip_prefix("0X")) {
        (hex, 16)
    } else if let Some(oct) = body.strip_prefix("0o").or_else(|| body.strip_prefix("0O")) {
        (oct, 8)
    } else if let Some(bin) = body.strip_prefix("0b").or_else(|| body.strip_prefix("0B")) {
        (bin, 2)
    } else {
        (body, 10)
    };
    if negative {
        (Cow::Owned(format!("-{digits}")), radix)
    } else {
        (Cow::Borrowed(digits), radix)
    }
}

macro_rules! convert_int {
    ($label:expr => $($ty:ty),*) => {$(
        impl ToScalar for $ty {
            fn encode_scalar(&self) -> Result<String> {
                Ok(itoa::Buffer::new().format(*self).to_string())
            }
        }

        impl FromScalar for $ty {
            fn decode_scalar(text: &str) -> Result<Self> {
                let (digits, radix) = split_radix_prefix(text);
                <$ty>::from_str_radix(&digits, radix).map_err(|_| {
                    Error::convert(format!(
                        concat!("unable to convert the string into ", $label, ": '{}'"),
                        text
                    ))
                })
            }
        }
    )*};
}

convert_int!("a signed integer" => i8, i16, i32, i64, isize);
convert_int!("an unsigned integer" => u8, u16, u32, u64, usize);

macro_rules! convert_float {
    ($($ty:ty),*) => {$(
        impl ToScalar for $ty {
            fn encode_scalar(&self) -> Result<String> {
                Ok(ryu::Buffer::new().format(*self).to_string())
            }
        }

        impl FromScalar for $ty {
            fn decode_scalar(text: &str) -> Result<Self> {
                if text.is_empty() {
                    return Err(Error::convert(format!(
                        "unable to convert the string into a floating point: '{text}'"
                    )));
                }
                text.parse::<$ty>().map_err(|_| {
                    Error::convert(format!(
                        "unable to convert the string into a floating point: '{text}'"
                    ))
                })
            }
        }
    )*};
}

convert_float!(f32, f64);

#[cfg(test)]
mod tests {
    use super::*;

    #[rstest::rstest]
    fn test_int_round_trip() {
        assert_eq!(42_i64.encode_scalar().unwrap(), "42");
        assert_eq!(i64::decode_scalar("42").unwrap(), 42);
        assert_eq!(i64::decode_scalar("-17").unwrap(), -17);
        assert_eq!(u32::decode_scalar("0x10").unwrap(), 16);
        assert_eq!(i32::decode_scalar("-0x10").unwrap(), -16);
        assert_eq!(u8::decode_scalar("0b101").unwrap(), 5);
    }

    #[rstest::rstest]
    fn test_int_decode_failures() {
        let err = i64::decode_scalar("12abc").unwrap_err();
        assert!(err.message.contains("a signed integer"));
        let err = u64::decode_scalar("-1").unwrap_err();
        assert!(err.message.contains("an unsigned integer"));
        assert!(i64::decode_scalar("").is_err());
    }

    #[rstest::rstest]
    fn test_float_round_trip() {
        assert_eq!(1.5_f64.encode_scalar().unwrap(), "1.5");
        assert_eq!(f64::decode_scalar("1.5").unwrap(), 1.5);
        assert!(f64::decode_scalar("not a float").is_err());
    }

    #[rstest::rstest]
    fn test_bool_and_string() {
        assert_eq!(true.encode_scalar().unwrap(), "true");
        assert!(bool::decode_scalar("yes").is_err());
        assert_eq!(String::decode_scalar("plain").unwrap(), "plain");
        assert_eq!("borrowed".encode_scalar().unwrap(), "borrowed");
    }
}
