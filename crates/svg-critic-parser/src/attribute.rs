//! Numeric attribute parsing.
//!
//! Attribute values are free text. These helpers pull numbers out of them
//! without ever failing the parse: callers fall back to defaults when a value
//! is absent or not understood.

use winnow::{
    Parser as _,
    ascii::{digit1, float, multispace0},
    combinator::{delimited, opt, preceded},
    error::ModalResult,
    token::take_till,
};

/// A length: optional surrounding whitespace, a float, an optional `px` unit.
fn length(input: &mut &str) -> ModalResult<f64> {
    delimited(multispace0, float, (opt("px"), multispace0)).parse_next(input)
}

/// The first run of ASCII digits anywhere in the input.
fn first_digits(input: &mut &str) -> ModalResult<u32> {
    preceded(
        take_till(0.., |c: char| c.is_ascii_digit()),
        digit1.try_map(str::parse::<u32>),
    )
    .parse_next(input)
}

/// Parses a user-space length such as `"120"`, `"12.5px"` or `" -4 "`.
///
/// Returns `None` for other units, percentages, non-finite values and
/// anything else that is not a plain number.
///
/// # Examples
///
/// ```
/// use svg_critic_parser::attribute::parse_length;
///
/// assert_eq!(parse_length("12.5px"), Some(12.5));
/// assert_eq!(parse_length("50%"), None);
/// ```
pub fn parse_length(value: &str) -> Option<f64> {
    length.parse(value).ok().filter(|v: &f64| v.is_finite())
}

/// Parses a length, falling back to `0` when absent or unparsable.
pub fn length_or_zero(value: Option<&str>) -> f64 {
    value.and_then(parse_length).unwrap_or(0.0)
}

/// Returns the integer formed by the first run of digits in `value`.
///
/// This is the "numeric portion" of a font size: `"9.5px"` yields `9`,
/// `"small"` yields `None`.
///
/// # Examples
///
/// ```
/// use svg_critic_parser::attribute::leading_integer;
///
/// assert_eq!(leading_integer("14px"), Some(14));
/// assert_eq!(leading_integer("9.5"), Some(9));
/// assert_eq!(leading_integer("large"), None);
/// ```
pub fn leading_integer(value: &str) -> Option<u32> {
    let mut input = value;
    first_digits.parse_next(&mut input).ok()
}

/// Returns the value as an integer if it consists of ASCII digits only.
pub fn plain_integer(value: &str) -> Option<u32> {
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    value.parse().ok()
}
