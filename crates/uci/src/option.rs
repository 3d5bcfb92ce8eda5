//! `option` declarations sent by the engine during the handshake.

use crate::UciError;

/// An option the engine advertises, e.g.
/// `option name Skill Level type spin default 20 min 0 max 20`.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionDecl {
    /// Option name, may contain spaces.
    pub name: String,
    /// Option type (`check`, `spin`, `combo`, `button`, `string`).
    pub kind: String,
    /// Default value, if any.
    pub default: Option<String>,
}

impl OptionDecl {
    /// Parse a full `option ...` line.
    pub fn parse(line: &str) -> Result<Self, UciError> {
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.first() != Some(&"option") || parts.get(1) != Some(&"name") {
            return Err(UciError::ParseError(format!("Malformed option line: '{}'", line)));
        }

        let type_idx = parts
            .iter()
            .position(|&p| p == "type")
            .ok_or_else(|| UciError::ParseError(format!("Option without type: '{}'", line)))?;

        let name = parts[2..type_idx].join(" ");
        if name.is_empty() {
            return Err(UciError::ParseError(format!("Option without name: '{}'", line)));
        }

        let kind = parts
            .get(type_idx + 1)
            .map(|s| s.to_string())
            .ok_or_else(|| UciError::ParseError(format!("Option without type: '{}'", line)))?;

        // Default runs until the next option keyword; string defaults may hold spaces.
        let default = parts.iter().position(|&p| p == "default").map(|idx| {
            parts[idx + 1..]
                .iter()
                .take_while(|p| !matches!(**p, "min" | "max" | "var"))
                .copied()
                .collect::<Vec<_>>()
                .join(" ")
        });

        Ok(Self {
            name,
            kind,
            default,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_spin_option() {
        let opt =
            OptionDecl::parse("option name Skill Level type spin default 20 min 0 max 20").unwrap();
        assert_eq!(opt.name, "Skill Level");
        assert_eq!(opt.kind, "spin");
        assert_eq!(opt.default.as_deref(), Some("20"));
    }

    #[test]
    fn parse_button_option() {
        let opt = OptionDecl::parse("option name Clear Hash type button").unwrap();
        assert_eq!(opt.name, "Clear Hash");
        assert_eq!(opt.kind, "button");
        assert_eq!(opt.default, None);
    }

    #[test]
    fn parse_string_option_with_empty_default() {
        let opt = OptionDecl::parse("option name Debug Log File type string default").unwrap();
        assert_eq!(opt.name, "Debug Log File");
        assert_eq!(opt.default.as_deref(), Some(""));
    }

    #[test]
    fn reject_malformed_option() {
        assert!(OptionDecl::parse("option Threads type spin").is_err());
        assert!(OptionDecl::parse("option name Threads").is_err());
        assert!(OptionDecl::parse("option name type spin").is_err());
    }
}
