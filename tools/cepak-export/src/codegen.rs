//! C array emission.
//!
//! Output follows the CE toolchain's conventions: `const uint8_t` arrays with
//! a trailing comma after the last element, which C accepts.

use std::fmt::Display;

use serde::Deserialize;

/// Layout of emitted values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ArrayStyle {
    /// Values per line; 0 puts every value on one line.
    pub values_per_line: usize,
    /// Also emit `const uint32_t <symbol>_len = N;` before the array.
    pub emit_length: bool,
}

impl ArrayStyle {
    pub fn wrapped(values_per_line: usize) -> Self {
        Self {
            values_per_line,
            ..Self::default()
        }
    }
}

/// Emit `const uint8_t <symbol>[] = { ... };`.
///
/// With the default style the result is
///
/// ```text
/// const uint8_t beep[] = {
/// 0,128,255,
/// };
/// ```
pub fn render_array(symbol: &str, values: &[u8], style: &ArrayStyle) -> String {
    render_typed_array("uint8_t", symbol, values, style)
}

/// Emit an array of any integer C type.
///
/// `values` must not be empty: C rejects an empty initializer list. Decoding
/// never yields an empty asset.
pub fn render_typed_array<T: Display>(
    c_type: &str,
    symbol: &str,
    values: &[T],
    style: &ArrayStyle,
) -> String {
    let mut out = String::with_capacity(values.len() * 4 + symbol.len() + 32);

    if style.emit_length {
        out.push_str(&render_scalar("uint32_t", &format!("{}_len", symbol), values.len()));
    }

    out.push_str(&format!("const {} {}[] = {{\n", c_type, symbol));
    if style.values_per_line == 0 {
        for value in values {
            out.push_str(&value.to_string());
            out.push(',');
        }
        out.push('\n');
    } else {
        for row in values.chunks(style.values_per_line) {
            out.push_str("  ");
            for value in row {
                out.push_str(&value.to_string());
                out.push(',');
            }
            out.push('\n');
        }
    }
    out.push_str("};\n");

    out
}

/// Identifiers [`render_array`] declares for `symbol`.
pub fn array_names(symbol: &str, style: &ArrayStyle) -> Vec<String> {
    let mut names = vec![symbol.to_string()];
    if style.emit_length {
        names.push(format!("{}_len", symbol));
    }
    names
}

/// Emit `const <type> <name> = <value>;`.
pub fn render_scalar(c_type: &str, name: &str, value: impl Display) -> String {
    format!("const {} {} = {};\n", c_type, name, value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout() {
        let text = render_array("beep", &[0, 128, 255], &ArrayStyle::default());
        assert_eq!(text, "const uint8_t beep[] = {\n0,128,255,\n};\n");
    }

    #[test]
    fn test_trailing_separator_after_last_element() {
        let text = render_array("one", &[7], &ArrayStyle::default());
        assert!(text.contains("7,\n};"));
    }

    #[test]
    fn test_deterministic() {
        let values: Vec<u8> = (0..=255).collect();
        let style = ArrayStyle::wrapped(16);
        assert_eq!(
            render_array("ramp", &values, &style),
            render_array("ramp", &values, &style)
        );
    }

    #[test]
    fn test_wrapped_rows() {
        let text = render_array("grid", &[1, 2, 3, 4, 5], &ArrayStyle::wrapped(2));
        assert_eq!(
            text,
            "const uint8_t grid[] = {\n  1,2,\n  3,4,\n  5,\n};\n"
        );
    }

    #[test]
    fn test_emit_length() {
        let style = ArrayStyle {
            emit_length: true,
            ..ArrayStyle::default()
        };
        let text = render_array("sfx", &[9, 9], &style);
        assert!(text.starts_with("const uint32_t sfx_len = 2;\n"));
        assert!(text.ends_with("const uint8_t sfx[] = {\n9,9,\n};\n"));
    }

    #[test]
    fn test_array_names_follow_style() {
        assert_eq!(array_names("sfx", &ArrayStyle::default()), ["sfx"]);
        let style = ArrayStyle {
            emit_length: true,
            ..ArrayStyle::default()
        };
        assert_eq!(array_names("sfx", &style), ["sfx", "sfx_len"]);
    }

    #[test]
    fn test_typed_array() {
        let text = render_typed_array("uint16_t", "map", &[0u16, 300], &ArrayStyle::default());
        assert_eq!(text, "const uint16_t map[] = {\n0,300,\n};\n");
    }

    #[test]
    fn test_values_out_of_nominal_range_are_kept() {
        let text = render_array("white", &[16, 16], &ArrayStyle::default());
        assert!(text.contains("16,16,"));
    }
}
