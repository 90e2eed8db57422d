// Renders floats as their shortest round-trip decimal text.
// Integral values keep a trailing `.0`, values with a decimal exponent below -4
// or at/above 16 switch to scientific notation with a signed two-digit exponent.

const SCIENTIFIC_MIN_EXP: i32 = -4;
const SCIENTIFIC_MAX_EXP: i32 = 16;

pub(crate) fn shortest_repr(value: f64) -> String {
    if value.is_nan() {
        return "nan".into();
    }
    if value.is_infinite() {
        return if value.is_sign_negative() { "-inf" } else { "inf" }.into();
    }

    // `{:e}` yields the shortest digits that round-trip, e.g. `-2.5e-1`
    let scientific = format!("{:e}", value);
    let (sign, unsigned) = match scientific.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", scientific.as_str()),
    };
    let (mantissa, exponent) = unsigned
        .split_once('e')
        .unwrap_or((unsigned, "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();

    let body = if exponent < SCIENTIFIC_MIN_EXP || exponent >= SCIENTIFIC_MAX_EXP {
        scientific_text(&digits, exponent)
    } else {
        fixed_text(&digits, exponent)
    };

    format!("{}{}", sign, body)
}

fn scientific_text(digits: &str, exponent: i32) -> String {
    let (first, rest) = digits.split_at(1);
    let exp_sign = if exponent < 0 { '-' } else { '+' };
    if rest.is_empty() {
        format!("{}e{}{:02}", first, exp_sign, exponent.abs())
    } else {
        format!("{}.{}e{}{:02}", first, rest, exp_sign, exponent.abs())
    }
}

fn fixed_text(digits: &str, exponent: i32) -> String {
    // position of the decimal point relative to the first digit
    let point = exponent + 1;
    if point <= 0 {
        format!("0.{}{}", "0".repeat(point.unsigned_abs() as usize), digits)
    } else {
        let point = point as usize;
        if point >= digits.len() {
            format!("{}{}.0", digits, "0".repeat(point - digits.len()))
        } else {
            format!("{}.{}", &digits[..point], &digits[point..])
        }
    }
}
