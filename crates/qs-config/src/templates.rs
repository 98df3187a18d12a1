//! Configuration templates for `qs init`.
//!
//! Templates are kept as valid TOML and handed out fully commented, so a fresh
//! file changes nothing until the user uncomments a line.

/// Local configuration template (valid TOML).
const LOCAL_TEMPLATE: &str = include_str!("../templates/config.toml");

/// Global configuration template (valid TOML).
const GLOBAL_TEMPLATE: &str = include_str!("../templates/config-global.toml");

/// Returns the local configuration template as a commented-out example.
pub fn local_template() -> String {
    comment_template(LOCAL_TEMPLATE)
}

/// Returns the global configuration template as a commented-out example.
pub fn global_template() -> String {
    comment_template(GLOBAL_TEMPLATE)
}

/// Prefixes every non-empty, non-comment line with `# `.
fn comment_template(template: &str) -> String {
    let mut result = String::with_capacity(template.len() + template.lines().count() * 2);
    for line in template.lines() {
        if !line.is_empty() && !line.starts_with('#') {
            result.push_str("# ");
        }
        result.push_str(line);
        result.push('\n');
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_config;

    #[test]
    fn templates_parse_as_valid_toml() {
        for template in [LOCAL_TEMPLATE, GLOBAL_TEMPLATE] {
            let result = parse_config(template);
            assert!(result.is_ok(), "template failed to parse: {result:?}");
        }
    }

    #[test]
    fn commented_templates_are_inert() {
        for template in [local_template(), global_template()] {
            let config = parse_config(&template).unwrap();
            assert!(config.parser.is_none());
            assert!(config.output.is_none());
            assert!(config.log.is_none());
        }
    }

    #[test]
    fn comment_template_keeps_comments_and_blank_lines() {
        let input = "# note\n[parser]\n\nmax_depth = 3\n";
        assert_eq!(
            comment_template(input),
            "# note\n# [parser]\n\n# max_depth = 3\n"
        );
    }
}
