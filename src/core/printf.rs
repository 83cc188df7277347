//! printf-style template formatting into bounded strings
//!
//! Templates follow the C `printf` conventions: `%[flags][width][.precision][length]conv`
//! with flags `- + space 0 #`, `*` for width or precision taken from the argument
//! list, and the conversions `d i u x X o c s f F e E g G %`. Length modifiers are
//! accepted and ignored since every [`Arg`] carries its own width. `%t` is the
//! duration placeholder and renders like `%f`.
//!
//! Output never grows past [`MAX_MESSAGE_LEN`] characters; the rest is cut off.

use super::args::Arg;
use super::error::{LoggerError, Result};
use std::fmt;
use std::iter::Peekable;
use std::str::CharIndices;

/// Maximum length of a formatted message, in characters
pub const MAX_MESSAGE_LEN: usize = 1024;

/// String buffer with a fixed character capacity
///
/// Writes past the capacity are dropped and remembered as truncation.
#[derive(Debug, Clone)]
pub struct BoundedString {
    buf: String,
    chars: usize,
    cap: usize,
    truncated: bool,
}

impl BoundedString {
    pub fn new(cap: usize) -> Self {
        Self {
            buf: String::with_capacity(cap.min(256)),
            chars: 0,
            cap,
            truncated: false,
        }
    }

    pub fn push_str(&mut self, s: &str) {
        if s.is_empty() {
            return;
        }
        let room = self.cap - self.chars;
        if s.len() <= room {
            self.buf.push_str(s);
            self.chars += s.chars().count();
            return;
        }
        for (taken, (idx, _)) in s.char_indices().enumerate() {
            if taken == room {
                self.buf.push_str(&s[..idx]);
                self.chars += taken;
                self.truncated = true;
                return;
            }
        }
        self.chars += s.chars().count();
        self.buf.push_str(s);
    }

    pub fn push(&mut self, c: char) {
        if self.chars < self.cap {
            self.buf.push(c);
            self.chars += 1;
        } else {
            self.truncated = true;
        }
    }

    /// Append `count` copies of `c`, stopping at the capacity
    pub fn pad(&mut self, c: char, count: usize) {
        let room = self.cap - self.chars;
        let n = count.min(room);
        if n < count {
            self.truncated = true;
        }
        for _ in 0..n {
            self.buf.push(c);
        }
        self.chars += n;
    }

    pub fn len_chars(&self) -> usize {
        self.chars
    }

    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    pub fn as_str(&self) -> &str {
        &self.buf
    }

    pub fn into_string(self) -> String {
        self.buf
    }
}

impl fmt::Write for BoundedString {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.push_str(s);
        Ok(())
    }
}

/// Cut an already formatted message down to [`MAX_MESSAGE_LEN`] characters
pub fn truncate_message(msg: &str) -> String {
    let mut out = BoundedString::new(MAX_MESSAGE_LEN);
    out.push_str(msg);
    out.into_string()
}

/// Substitute `args` into `template`, bounded by [`MAX_MESSAGE_LEN`]
///
/// # Examples
///
/// ```
/// use rust_section_logger::core::printf::format_message;
/// use rust_section_logger::Arg;
///
/// let msg = format_message("%s: %5.2f%%", &[Arg::from("load"), Arg::from(42.127)]).unwrap();
/// assert_eq!(msg, "load: 42.13%");
/// ```
pub fn format_message(template: &str, args: &[Arg]) -> Result<String> {
    let mut out = BoundedString::new(MAX_MESSAGE_LEN);
    format_into(&mut out, template, args)?;
    Ok(out.into_string())
}

#[derive(Debug, Default, Clone, Copy)]
struct Spec {
    left: bool,
    plus: bool,
    space: bool,
    zero: bool,
    alt: bool,
    width: Option<usize>,
    precision: Option<usize>,
}

/// Substitute `args` into `template`, appending to `out`
pub fn format_into(out: &mut BoundedString, template: &str, args: &[Arg]) -> Result<()> {
    let mut chars = template.char_indices().peekable();
    let mut cursor = 0usize;
    let mut literal_start = 0usize;

    while let Some((pos, c)) = chars.next() {
        if c != '%' {
            continue;
        }
        out.push_str(&template[literal_start..pos]);

        let mut spec = Spec::default();
        while let Some(&(_, flag)) = chars.peek() {
            match flag {
                '-' => spec.left = true,
                '+' => spec.plus = true,
                ' ' => spec.space = true,
                '0' => spec.zero = true,
                '#' => spec.alt = true,
                _ => break,
            }
            chars.next();
        }

        if matches!(chars.peek(), Some(&(_, '*'))) {
            chars.next();
            let width = int_arg(args, &mut cursor, template, '*')?;
            if width < 0 {
                spec.left = true;
            }
            spec.width = Some(clamp(width.unsigned_abs()));
        } else {
            spec.width = read_number(&mut chars);
        }

        if matches!(chars.peek(), Some(&(_, '.'))) {
            chars.next();
            if matches!(chars.peek(), Some(&(_, '*'))) {
                chars.next();
                let precision = int_arg(args, &mut cursor, template, '*')?;
                spec.precision = (precision >= 0).then(|| clamp(precision.unsigned_abs()));
            } else {
                spec.precision = Some(read_number(&mut chars).unwrap_or(0));
            }
        }

        while let Some(&(at, modifier)) = chars.peek() {
            let is_length = match modifier {
                'h' | 'l' | 'L' | 'q' | 'j' | 'z' => true,
                // `t` is ptrdiff_t before an integer conversion, a duration otherwise
                't' => template[at + 1..].starts_with(&['d', 'i', 'u', 'x', 'X', 'o'][..]),
                _ => false,
            };
            if !is_length {
                break;
            }
            chars.next();
        }

        let (conv_pos, conv) = chars
            .next()
            .ok_or_else(|| LoggerError::format(template, "dangling '%' at end of template"))?;
        literal_start = conv_pos + conv.len_utf8();

        match conv {
            '%' => out.push('%'),
            'd' | 'i' => {
                let value = int_arg(args, &mut cursor, template, conv)?;
                write_signed(out, value, &spec);
            }
            'u' | 'x' | 'X' | 'o' => {
                let value = int_arg(args, &mut cursor, template, conv)?;
                write_unsigned(out, as_unsigned(value), conv, &spec);
            }
            'c' => {
                let arg = next_arg(args, &mut cursor, template)?;
                let ch = match arg {
                    Arg::Char(c) => Some(*c),
                    Arg::Int(_) | Arg::UInt(_) => {
                        arg.as_i128().and_then(|v| u32::try_from(v).ok()).and_then(char::from_u32)
                    }
                    _ => None,
                }
                .ok_or_else(|| LoggerError::argument_type(cursor, conv, arg.kind()))?;
                let mut buf = [0u8; 4];
                write_padded(out, "", ch.encode_utf8(&mut buf), &spec, false);
            }
            's' => {
                let arg = next_arg(args, &mut cursor, template)?;
                let text = arg.to_string();
                let text = match spec.precision {
                    Some(p) => text.chars().take(p).collect::<String>(),
                    None => text,
                };
                write_padded(out, "", &text, &spec, false);
            }
            'f' | 'F' | 't' | 'e' | 'E' | 'g' | 'G' => {
                let arg = next_arg(args, &mut cursor, template)?;
                let value = arg
                    .as_f64()
                    .ok_or_else(|| LoggerError::argument_type(cursor, conv, arg.kind()))?;
                write_float(out, value, conv, &spec);
            }
            other => {
                return Err(LoggerError::format(
                    template,
                    format!("unsupported conversion '%{}'", other),
                ))
            }
        }
    }

    out.push_str(&template[literal_start..]);
    Ok(())
}

fn clamp(n: u128) -> usize {
    n.min(MAX_MESSAGE_LEN as u128) as usize
}

fn read_number(chars: &mut Peekable<CharIndices<'_>>) -> Option<usize> {
    let mut value: Option<usize> = None;
    while let Some(&(_, c)) = chars.peek() {
        let Some(digit) = c.to_digit(10) else { break };
        let acc = value.unwrap_or(0);
        value = Some(
            acc.saturating_mul(10)
                .saturating_add(digit as usize)
                .min(MAX_MESSAGE_LEN),
        );
        chars.next();
    }
    value
}

fn next_arg<'a>(args: &'a [Arg], cursor: &mut usize, template: &str) -> Result<&'a Arg> {
    let arg = args
        .get(*cursor)
        .ok_or_else(|| LoggerError::missing_argument(template, *cursor + 1))?;
    *cursor += 1;
    Ok(arg)
}

fn int_arg(args: &[Arg], cursor: &mut usize, template: &str, conv: char) -> Result<i128> {
    let arg = next_arg(args, cursor, template)?;
    arg.as_i128()
        .ok_or_else(|| LoggerError::argument_type(*cursor, conv, arg.kind()))
}

/// Negative values reinterpret as 64-bit two's complement, as C does
fn as_unsigned(value: i128) -> u128 {
    if value < 0 {
        (value as i64) as u64 as u128
    } else {
        value as u128
    }
}

fn sign_for(negative: bool, spec: &Spec) -> &'static str {
    if negative {
        "-"
    } else if spec.plus {
        "+"
    } else if spec.space {
        " "
    } else {
        ""
    }
}

fn apply_int_precision(digits: String, spec: &Spec) -> String {
    match spec.precision {
        Some(0) if digits == "0" => String::new(),
        Some(p) if digits.len() < p => format!("{}{}", "0".repeat(p - digits.len()), digits),
        _ => digits,
    }
}

fn write_signed(out: &mut BoundedString, value: i128, spec: &Spec) {
    let digits = apply_int_precision(value.unsigned_abs().to_string(), spec);
    let sign = sign_for(value < 0, spec);
    write_padded(out, sign, &digits, spec, spec.precision.is_none());
}

fn write_unsigned(out: &mut BoundedString, value: u128, conv: char, spec: &Spec) {
    let raw = match conv {
        'x' => format!("{:x}", value),
        'X' => format!("{:X}", value),
        'o' => format!("{:o}", value),
        _ => value.to_string(),
    };
    let digits = apply_int_precision(raw, spec);
    let prefix = match conv {
        'x' if spec.alt && value != 0 => "0x",
        'X' if spec.alt && value != 0 => "0X",
        'o' if spec.alt && !digits.starts_with('0') => "0",
        _ => "",
    };
    write_padded(out, prefix, &digits, spec, spec.precision.is_none());
}

fn write_float(out: &mut BoundedString, value: f64, conv: char, spec: &Spec) {
    let upper = conv.is_ascii_uppercase();
    let sign = sign_for(value.is_sign_negative() && !value.is_nan(), spec);
    let magnitude = value.abs();

    if !magnitude.is_finite() {
        let text = match (magnitude.is_nan(), upper) {
            (true, false) => "nan",
            (true, true) => "NAN",
            (false, false) => "inf",
            (false, true) => "INF",
        };
        write_padded(out, sign, text, spec, false);
        return;
    }

    let precision = spec.precision.unwrap_or(6);
    let body = match conv {
        'e' | 'E' => exponential(magnitude, precision, upper, spec.alt),
        'g' | 'G' => general(magnitude, precision, upper, spec.alt),
        _ => {
            let mut s = format!("{:.*}", precision, magnitude);
            if spec.alt && precision == 0 {
                s.push('.');
            }
            s
        }
    };
    write_padded(out, sign, &body, spec, true);
}

fn exponential(magnitude: f64, precision: usize, upper: bool, alt: bool) -> String {
    let raw = format!("{:.*e}", precision, magnitude);
    let (mantissa, exp) = raw.split_once('e').unwrap_or((raw.as_str(), "0"));
    let exp: i32 = exp.parse().unwrap_or(0);
    let mut s = mantissa.to_string();
    if alt && precision == 0 {
        s.push('.');
    }
    s.push(if upper { 'E' } else { 'e' });
    s.push(if exp < 0 { '-' } else { '+' });
    s.push_str(&format!("{:02}", exp.unsigned_abs()));
    s
}

fn general(magnitude: f64, precision: usize, upper: bool, alt: bool) -> String {
    let p = precision.max(1);
    let exp = if magnitude == 0.0 {
        0
    } else {
        format!("{:.*e}", p - 1, magnitude)
            .split_once('e')
            .and_then(|(_, e)| e.parse::<i64>().ok())
            .unwrap_or(0)
    };

    let s = if exp >= -4 && exp < p as i64 {
        format!("{:.*}", (p as i64 - 1 - exp) as usize, magnitude)
    } else {
        exponential(magnitude, p - 1, upper, alt)
    };

    if alt {
        s
    } else {
        strip_trailing_zeros(&s)
    }
}

fn strip_trailing_zeros(s: &str) -> String {
    let split = s.find(['e', 'E']).unwrap_or(s.len());
    let (mantissa, exp) = s.split_at(split);
    if !mantissa.contains('.') {
        return s.to_string();
    }
    let trimmed = mantissa.trim_end_matches('0').trim_end_matches('.');
    format!("{}{}", trimmed, exp)
}

fn write_padded(out: &mut BoundedString, sign: &str, body: &str, spec: &Spec, zero_ok: bool) {
    let len = sign.chars().count() + body.chars().count();
    let fill = spec.width.unwrap_or(0).saturating_sub(len);
    if spec.left {
        out.push_str(sign);
        out.push_str(body);
        out.pad(' ', fill);
    } else if spec.zero && zero_ok {
        out.push_str(sign);
        out.pad('0', fill);
        out.push_str(body);
    } else {
        out.pad(' ', fill);
        out.push_str(sign);
        out.push_str(body);
    }
}
