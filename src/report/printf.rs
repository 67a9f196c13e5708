//! Print-style format specifiers, as stored in a column header and used to
//! render cell values.
//!
//! A specifier holds at most one conversion, optionally surrounded by
//! literal text: `%d`, `%.4f`, `%-8s`, `rate=%.2e%%`. Supported conversions
//! are `d`, `x`, `f`, `e`, `g`, `s` and `c` (upper case variants upper-case
//! the output). Rendering never fails: a value the conversion cannot
//! represent is rendered with its plain display text.

use super::datatype::Value;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Flags {
    left: bool,
    plus: bool,
    space: bool,
    zero: bool,
    grouping: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Conversion {
    flags: Flags,
    width: Option<usize>,
    precision: Option<usize>,
    kind: char,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatSpec {
    raw: String,
    prefix: String,
    conversion: Option<Conversion>,
    suffix: String,
}

impl FormatSpec {
    pub fn parse(raw: &str) -> FormatSpec {
        let mut prefix = String::new();
        let mut suffix = String::new();
        let mut conversion = None;

        let mut chars = raw.chars().peekable();
        while let Some(c) = chars.next() {
            let literal = if conversion.is_some() {
                &mut suffix
            } else {
                &mut prefix
            };

            if c != '%' {
                literal.push(c);
                continue;
            }
            if chars.peek() == Some(&'%') {
                chars.next();
                literal.push('%');
                continue;
            }
            if conversion.is_some() {
                // Only the first conversion is honoured.
                literal.push(c);
                continue;
            }

            let mut flags = Flags::default();
            while let Some(&flag) = chars.peek() {
                match flag {
                    '-' => flags.left = true,
                    '+' => flags.plus = true,
                    ' ' => flags.space = true,
                    '0' => flags.zero = true,
                    ',' => flags.grouping = true,
                    '#' => {}
                    _ => break,
                }
                chars.next();
            }

            let width = take_number(&mut chars);
            let precision = if chars.peek() == Some(&'.') {
                chars.next();
                Some(take_number(&mut chars).unwrap_or(0))
            } else {
                None
            };

            match chars.next() {
                Some(kind) => {
                    conversion = Some(Conversion {
                        flags,
                        width,
                        precision,
                        kind,
                    })
                }
                None => prefix.push('%'),
            }
        }

        FormatSpec {
            raw: raw.to_string(),
            prefix,
            conversion,
            suffix,
        }
    }

    pub fn as_str(&self) -> &str {
        self.raw.as_str()
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    pub fn render(&self, value: &Value) -> String {
        //! Render `value` through this specifier.
        //!
        //! The empty specifier renders the plain display text of the value.

        let body = match &self.conversion {
            Some(conversion) => conversion.render(value),
            None if self.raw.is_empty() => value.to_string(),
            None => String::new(),
        };

        format!("{}{}{}", self.prefix, body, self.suffix)
    }
}

impl Conversion {
    fn render(&self, value: &Value) -> String {
        let upper = self.kind.is_ascii_uppercase();
        let numeric = matches!(self.kind.to_ascii_lowercase(), 'd' | 'x' | 'f' | 'e' | 'g');

        let text = match (self.kind.to_ascii_lowercase(), value) {
            ('d', Value::Integer(v)) => self.signed(v.unsigned_abs().to_string(), *v < 0),
            ('x', Value::Integer(v)) => format!("{:x}", v),
            ('f', Value::Integer(v)) => self.fixed(*v as f64),
            ('f', Value::Decimal(v)) => self.fixed(*v),
            ('e', Value::Integer(v)) => self.scientific(*v as f64),
            ('e', Value::Decimal(v)) => self.scientific(*v),
            ('g', Value::Integer(v)) => self.general(*v as f64),
            ('g', Value::Decimal(v)) => self.general(*v),
            ('c', Value::String(v)) if v.chars().count() == 1 => v.clone(),
            ('s', value) | ('c', value) => match self.precision {
                Some(precision) => value.to_string().chars().take(precision).collect(),
                None => value.to_string(),
            },
            (_, value) => value.to_string(),
        };

        let text = if upper { text.to_uppercase() } else { text };
        self.pad(text, numeric && matches!(value, Value::Integer(_) | Value::Decimal(_)))
    }

    fn signed(&self, digits: String, negative: bool) -> String {
        let digits = if self.flags.grouping {
            group_thousands(&digits)
        } else {
            digits
        };

        if negative {
            format!("-{}", digits)
        } else if self.flags.plus {
            format!("+{}", digits)
        } else if self.flags.space {
            format!(" {}", digits)
        } else {
            digits
        }
    }

    fn fixed(&self, value: f64) -> String {
        if !value.is_finite() {
            return non_finite(value);
        }

        let precision = self.precision.unwrap_or(6);
        let text = format!("{:.*}", precision, value.abs());
        let text = match (self.flags.grouping, text.split_once('.')) {
            (true, Some((whole, fraction))) => format!("{}.{}", group_thousands(whole), fraction),
            (true, None) => group_thousands(&text),
            (false, _) => text,
        };

        self.signed(text, value.is_sign_negative() && value != 0.0)
    }

    fn scientific(&self, value: f64) -> String {
        if !value.is_finite() {
            return non_finite(value);
        }

        let precision = self.precision.unwrap_or(6);
        let text = format!("{:.*e}", precision, value.abs());
        self.signed(exponent_with_sign(&text), value.is_sign_negative() && value != 0.0)
    }

    fn general(&self, value: f64) -> String {
        if !value.is_finite() {
            return non_finite(value);
        }

        let precision = self.precision.unwrap_or(6).max(1);
        let magnitude = value.abs();
        if magnitude == 0.0 || (1e-4..10f64.powi(precision as i32)).contains(&magnitude) {
            let exponent = if magnitude == 0.0 {
                0
            } else {
                magnitude.log10().floor() as i32
            };
            let decimals = (precision as i32 - 1 - exponent).max(0) as usize;
            let text = format!("{:.*}", decimals, magnitude);
            self.signed(text, value.is_sign_negative() && value != 0.0)
        } else {
            let text = format!("{:.*e}", precision - 1, magnitude);
            self.signed(exponent_with_sign(&text), value.is_sign_negative())
        }
    }

    fn pad(&self, text: String, numeric: bool) -> String {
        let width = match self.width {
            Some(width) => width,
            None => return text,
        };

        let length = text.chars().count();
        if length >= width {
            return text;
        }

        let fill = width - length;
        if self.flags.left {
            format!("{}{}", text, " ".repeat(fill))
        } else if self.flags.zero && numeric {
            let sign_length = text
                .chars()
                .take_while(|c| matches!(c, '-' | '+' | ' '))
                .count();
            let (sign, digits) = text.split_at(sign_length);
            format!("{}{}{}", sign, "0".repeat(fill), digits)
        } else {
            format!("{}{}", " ".repeat(fill), text)
        }
    }
}

fn take_number(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> Option<usize> {
    let mut digits = String::new();
    while let Some(&c) = chars.peek() {
        if !c.is_ascii_digit() {
            break;
        }
        digits.push(c);
        chars.next();
    }
    digits.parse().ok()
}

fn non_finite(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value > 0.0 {
        "Infinity".to_string()
    } else {
        "-Infinity".to_string()
    }
}

fn exponent_with_sign(text: &str) -> String {
    //! Turn Rust's `1.5e3` into the conventional `1.5e+03`.

    match text.split_once('e') {
        Some((mantissa, exponent)) => {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exponent),
            };
            format!("{}e{}{:0>2}", mantissa, sign, digits)
        }
        None => text.to_string(),
    }
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, c) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(raw: &str, value: impl Into<Value>) -> String {
        FormatSpec::parse(raw).render(&value.into())
    }

    #[test]
    fn integers() {
        assert_eq!(render("%d", 5i64), "5");
        assert_eq!(render("%5d", -42i64), "  -42");
        assert_eq!(render("%-5d|", 42i64), "42   |");
        assert_eq!(render("%05d", -42i64), "-0042");
        assert_eq!(render("%+d", 7i64), "+7");
        assert_eq!(render("%,d", 1234567i64), "1,234,567");
        assert_eq!(render("%x", 255i64), "ff");
    }

    #[test]
    fn decimals() {
        assert_eq!(render("%.2f", 3.14159), "3.14");
        assert_eq!(render("%f", 0.5), "0.500000");
        assert_eq!(render("%8.3f", -1.5), "  -1.500");
        assert_eq!(render("%.2e", 12345.678), "1.23e+04");
        assert_eq!(render("%.3E", 0.000123), "1.230E-04");
        assert_eq!(render("%.3g", 3.14159), "3.14");
        assert_eq!(render("%.2f", f64::NAN), "NaN");
    }

    #[test]
    fn text_and_literals() {
        assert_eq!(render("%s", "abc"), "abc");
        assert_eq!(render("%.2s", "abc"), "ab");
        assert_eq!(render("%S", "abc"), "ABC");
        assert_eq!(render("%c", 'q'), "q");
        assert_eq!(render("%.1f%%", 12.34), "12.3%");
        assert_eq!(render("n=%d", 3i64), "n=3");
        assert_eq!(render("", 2.5), "2.5");
    }

    #[test]
    fn mismatched_values_render_as_display_text() {
        assert_eq!(render("%d", "abc"), "abc");
        assert_eq!(render("%d", 1.5), "1.5");
    }
}
