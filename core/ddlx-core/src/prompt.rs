//! Prompt templates for DDL optimization requests.
//!
//! Templates are Handlebars text rendered against a [`DdlRecord`]:
//! `{{context}}` and `{{sql_statement}}` are the available variables.
//! Rendering is strict (an unknown variable is an error) and does not HTML-escape.

use crate::error::{DdlxError, DdlxResult};
use crate::record::DdlRecord;
use handlebars::Handlebars;
use std::sync::OnceLock;

/// Built-in template for "optimized DDL" requests.
pub const DEFAULT_OPTIMIZED_DDL_TEMPLATE: &str = "\
You are a database schema expert. Rewrite the DDL statement below so that it is \
optimized for the described workload: pick appropriate data types, keys, constraints \
and indexes while preserving the statement's intent.

Context:
{{context}}

DDL statement:
{{sql_statement}}

Return only the optimized DDL.";

fn engine() -> &'static Handlebars<'static> {
    static ENGINE: OnceLock<Handlebars<'static>> = OnceLock::new();
    ENGINE.get_or_init(|| {
        let mut engine = Handlebars::new();
        engine.set_strict_mode(true);
        engine.register_escape_fn(handlebars::no_escape);
        engine
    })
}

/// Source of prompt templates
pub trait PromptProvider: Send + Sync {
    /// Template used to request an optimized rewrite of one DDL statement
    fn optimized_ddl_prompt(&self) -> DdlxResult<PromptTemplate>;
}

/// Renderable prompt template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    source: String,
}

impl PromptTemplate {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }

    /// Raw template text
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Render the template against one record.
    pub fn render(&self, record: &DdlRecord) -> DdlxResult<String> {
        engine()
            .render_template(&self.source, record)
            .map_err(|e| DdlxError::Render(e.to_string()))
    }
}

/// Prompt provider with the built-in template, optionally overridden
#[derive(Debug, Clone, Default)]
pub struct DefaultPrompts {
    optimized_ddl: Option<String>,
}

impl DefaultPrompts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the "optimized DDL" template
    pub fn with_optimized_ddl(mut self, template: impl Into<String>) -> Self {
        self.optimized_ddl = Some(template.into());
        self
    }
}

impl PromptProvider for DefaultPrompts {
    fn optimized_ddl_prompt(&self) -> DdlxResult<PromptTemplate> {
        Ok(PromptTemplate::new(
            self.optimized_ddl
                .as_deref()
                .unwrap_or(DEFAULT_OPTIMIZED_DDL_TEMPLATE),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> DdlRecord {
        DdlRecord::new("OLTP, 10M rows", "CREATE TABLE users (id INT)")
    }

    #[test]
    fn test_render_placeholders() {
        let template = PromptTemplate::new("ctx={{context}}; sql={{sql_statement}}");
        assert_eq!(
            template.render(&record()).unwrap(),
            "ctx=OLTP, 10M rows; sql=CREATE TABLE users (id INT)"
        );
    }

    #[test]
    fn test_render_single_braces_are_literal() {
        let template = PromptTemplate::new("{\"ddl\": \"{{sql_statement}}\"}");
        assert_eq!(
            template.render(&record()).unwrap(),
            "{\"ddl\": \"CREATE TABLE users (id INT)\"}"
        );
    }

    #[test]
    fn test_render_does_not_escape_sql() {
        let record = DdlRecord::new("a < b & c", "ALTER TABLE t ADD CHECK (x > 'y')");
        let template = PromptTemplate::new("{{context}} | {{sql_statement}}");
        assert_eq!(
            template.render(&record).unwrap(),
            "a < b & c | ALTER TABLE t ADD CHECK (x > 'y')"
        );
    }

    #[test]
    fn test_render_keeps_non_ascii_text() {
        let template = PromptTemplate::new("컨텍스트: {{context}} → {{sql_statement}}");
        assert_eq!(
            template.render(&record()).unwrap(),
            "컨텍스트: OLTP, 10M rows → CREATE TABLE users (id INT)"
        );
    }

    #[test]
    fn test_render_unknown_placeholder() {
        let template = PromptTemplate::new("{{table}}");
        let err = template.render(&record()).unwrap_err();
        assert!(matches!(err, DdlxError::Render(ref m) if m.contains("table")));
    }

    #[test]
    fn test_render_unclosed_placeholder() {
        let template = PromptTemplate::new("sql: {{sql_statement");
        assert!(matches!(
            template.render(&record()),
            Err(DdlxError::Render(_))
        ));
    }

    #[test]
    fn test_default_prompts_builtin_template() {
        let prompts = DefaultPrompts::new();
        let template = prompts.optimized_ddl_prompt().unwrap();
        assert_eq!(template.source(), DEFAULT_OPTIMIZED_DDL_TEMPLATE);

        let rendered = template.render(&record()).unwrap();
        assert!(rendered.contains("OLTP, 10M rows"));
        assert!(rendered.contains("CREATE TABLE users (id INT)"));
        assert!(!rendered.contains("{{"));
    }

    #[test]
    fn test_default_prompts_override() {
        let prompts = DefaultPrompts::new().with_optimized_ddl("-- {{sql_statement}}");
        let template = prompts.optimized_ddl_prompt().unwrap();
        assert_eq!(
            template.render(&record()).unwrap(),
            "-- CREATE TABLE users (id INT)"
        );
    }
}
