//! Query template rendering.
//!
//! Templates use a strict subset of Jinja syntax:
//!
//! ```text
//! {# comment, dropped #}
//! SELECT id, amount FROM {{ table }} WHERE amount >= {{ min_amount }}
//! ```
//!
//! `{% ... %}` blocks are rejected when the template is parsed. Rendering
//! fails on any placeholder the tenant's `vars` do not define; unused
//! variables are ignored.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::{RenderError, TemplateError};
use crate::validation::is_valid_identifier;

static TAG_OPEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{[{#%]").expect("valid tag regex"));

#[derive(Debug, Clone, PartialEq)]
enum Segment {
    Text(String),
    Var(String),
}

/// A parsed query template, rendered once per tenant.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryTemplate {
    segments: Vec<Segment>,
}

impl QueryTemplate {
    /// Read and parse a template file.
    pub fn load(path: &Path) -> Result<Self, TemplateError> {
        let source = fs::read_to_string(path).map_err(|source| TemplateError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&source)
    }

    /// Parse template source.
    pub fn parse(source: &str) -> Result<Self, TemplateError> {
        // Jinja drops a single trailing newline by default
        let source = source
            .strip_suffix("\r\n")
            .or_else(|| source.strip_suffix('\n'))
            .unwrap_or(source);

        let mut segments = Vec::new();
        let mut text = String::new();
        let mut pos = 0;

        while let Some(open) = TAG_OPEN.find_at(source, pos) {
            text.push_str(&source[pos..open.start()]);
            let start = open.start();

            match open.as_str() {
                "{{" => {
                    let close = find_close(source, open.end(), "}}", "{{", start)?;
                    let name = source[open.end()..close].trim();
                    if !is_valid_identifier(name) {
                        return Err(TemplateError::InvalidPlaceholder {
                            name: name.to_string(),
                            offset: start,
                        });
                    }
                    if !text.is_empty() {
                        segments.push(Segment::Text(std::mem::take(&mut text)));
                    }
                    segments.push(Segment::Var(name.to_string()));
                    pos = close + 2;
                }
                "{#" => {
                    let close = find_close(source, open.end(), "#}", "{#", start)?;
                    pos = close + 2;
                }
                _ => return Err(TemplateError::UnsupportedBlock(start)),
            }
        }

        text.push_str(&source[pos..]);
        if !text.is_empty() {
            segments.push(Segment::Text(text));
        }

        Ok(Self { segments })
    }

    /// Substitute `vars` into every placeholder.
    pub fn render(&self, vars: &HashMap<String, Value>) -> Result<String, RenderError> {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Text(text) => out.push_str(text),
                Segment::Var(name) => {
                    let value = vars
                        .get(name)
                        .ok_or_else(|| RenderError::Undefined(name.clone()))?;
                    out.push_str(&render_value(name, value)?);
                }
            }
        }
        Ok(out)
    }
}

fn find_close(
    source: &str,
    from: usize,
    close: &str,
    tag: &'static str,
    start: usize,
) -> Result<usize, TemplateError> {
    source[from..]
        .find(close)
        .map(|i| from + i)
        .ok_or(TemplateError::Unterminated { tag, offset: start })
}

fn render_value(name: &str, value: &Value) -> Result<String, RenderError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(true) => Ok("True".to_string()),
        Value::Bool(false) => Ok("False".to_string()),
        Value::Null => Ok("None".to_string()),
        Value::Array(_) | Value::Object(_) => Err(RenderError::NonScalar(name.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn vars(value: Value) -> HashMap<String, Value> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_render_table() {
        let template = QueryTemplate::parse("SELECT * FROM {{ table }}").unwrap();
        let sql = template.render(&vars(json!({"table": "orders"}))).unwrap();
        assert_eq!(sql, "SELECT * FROM orders");
    }

    #[test]
    fn test_whitespace_inside_braces() {
        let template = QueryTemplate::parse("{{table}} {{   table   }}").unwrap();
        let sql = template.render(&vars(json!({"table": "t"}))).unwrap();
        assert_eq!(sql, "t t");
    }

    #[test]
    fn test_scalar_values() {
        let template =
            QueryTemplate::parse("{{ n }} {{ f }} {{ yes }} {{ no }} {{ nothing }}").unwrap();
        let sql = template
            .render(&vars(json!({"n": 10, "f": 2.5, "yes": true, "no": false, "nothing": null})))
            .unwrap();
        assert_eq!(sql, "10 2.5 True False None");
    }

    #[test]
    fn test_missing_variable_is_error() {
        let template = QueryTemplate::parse("SELECT * FROM {{ table }} WHERE r = '{{ region }}'")
            .unwrap();
        let err = template.render(&vars(json!({"table": "orders"}))).unwrap_err();
        assert!(matches!(err, RenderError::Undefined(name) if name == "region"));
    }

    #[test]
    fn test_extra_variables_ignored() {
        let template = QueryTemplate::parse("SELECT 1 FROM {{ table }}").unwrap();
        let sql = template
            .render(&vars(json!({"table": "a", "unused": "x"})))
            .unwrap();
        assert_eq!(sql, "SELECT 1 FROM a");
    }

    #[test]
    fn test_non_scalar_value() {
        let template = QueryTemplate::parse("{{ list }}").unwrap();
        let err = template.render(&vars(json!({"list": [1, 2]}))).unwrap_err();
        assert!(matches!(err, RenderError::NonScalar(_)));
    }

    #[test]
    fn test_comments_dropped_and_trailing_newline_stripped() {
        let template = QueryTemplate::parse("{# header #}SELECT 1\n").unwrap();
        assert_eq!(template.render(&HashMap::new()).unwrap(), "SELECT 1");
    }

    #[test]
    fn test_unterminated_placeholder() {
        let err = QueryTemplate::parse("SELECT {{ table").unwrap_err();
        assert!(matches!(err, TemplateError::Unterminated { tag: "{{", offset: 7 }));
    }

    #[test]
    fn test_block_tags_rejected() {
        let err = QueryTemplate::parse("{% if x %}1{% endif %}").unwrap_err();
        assert!(matches!(err, TemplateError::UnsupportedBlock(0)));
    }

    #[test]
    fn test_expression_placeholder_rejected() {
        let err = QueryTemplate::parse("{{ table | upper }}").unwrap_err();
        assert!(matches!(err, TemplateError::InvalidPlaceholder { .. }));
    }

    #[test]
    fn test_single_braces_are_text() {
        let template = QueryTemplate::parse("SELECT '{a}' FROM {{ table }}").unwrap();
        let sql = template.render(&vars(json!({"table": "t"}))).unwrap();
        assert_eq!(sql, "SELECT '{a}' FROM t");
    }
}
