//! Prompt templates — named, placeholder-based prompts plus a simple in-memory registry.

pub mod builders;
pub mod handlers;

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error, PartialEq)]
pub enum TemplateError {
    #[error("Missing value for template variable '{0}'")]
    MissingVariable(String),

    #[error("Unbalanced brace at byte {position}")]
    Unbalanced { position: usize },
}

/// A reusable prompt with `{name}` placeholders. `{{` and `}}` render literal braces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptTemplate {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub template: String,
    #[serde(default)]
    pub variables: Vec<String>,
    #[serde(default)]
    pub examples: Vec<Value>,
    #[serde(default)]
    pub metadata: HashMap<String, Value>,
}

impl PromptTemplate {
    pub fn format(&self, values: &HashMap<String, String>) -> Result<String, TemplateError> {
        let source = self.template.as_str();
        let mut out = String::with_capacity(source.len());
        let mut chars = source.char_indices().peekable();

        while let Some((i, c)) = chars.next() {
            match c {
                '{' if matches!(chars.peek(), Some((_, '{'))) => {
                    chars.next();
                    out.push('{');
                }
                '{' => {
                    let start = i + 1;
                    let end = source[start..]
                        .find('}')
                        .map(|offset| start + offset)
                        .ok_or(TemplateError::Unbalanced { position: i })?;
                    let name = &source[start..end];
                    let value = values
                        .get(name)
                        .ok_or_else(|| TemplateError::MissingVariable(name.to_string()))?;
                    out.push_str(value);
                    // skip past the closing brace
                    for (j, _) in chars.by_ref() {
                        if j == end {
                            break;
                        }
                    }
                }
                '}' if matches!(chars.peek(), Some((_, '}'))) => {
                    chars.next();
                    out.push('}');
                }
                '}' => return Err(TemplateError::Unbalanced { position: i }),
                other => out.push(other),
            }
        }

        Ok(out)
    }

    /// True when every declared variable has a value.
    pub fn validate(&self, values: &HashMap<String, String>) -> bool {
        self.variables.iter().all(|v| values.contains_key(v))
    }
}

#[derive(Debug, Default)]
pub struct TemplateRegistry {
    templates: BTreeMap<String, PromptTemplate>,
}

impl TemplateRegistry {
    /// Registers a template, replacing (and returning) any previous one with the same name.
    pub fn register(&mut self, template: PromptTemplate) -> Option<PromptTemplate> {
        info!("Registered prompt template '{}'", template.name);
        self.templates.insert(template.name.clone(), template)
    }

    pub fn get(&self, name: &str) -> Option<&PromptTemplate> {
        self.templates.get(name)
    }

    pub fn names(&self) -> Vec<String> {
        self.templates.keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn template(body: &str, variables: &[&str]) -> PromptTemplate {
        PromptTemplate {
            name: "greeting".to_string(),
            description: "says hello".to_string(),
            template: body.to_string(),
            variables: variables.iter().map(|v| v.to_string()).collect(),
            examples: vec![],
            metadata: HashMap::new(),
        }
    }

    fn values(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_format_substitutes_variables() {
        let t = template("Hello {name}, you are {age}.", &["name", "age"]);
        let out = t.format(&values(&[("name", "Ada"), ("age", "36")])).unwrap();
        assert_eq!(out, "Hello Ada, you are 36.");
    }

    #[test]
    fn test_format_escaped_braces() {
        let t = template("Return {{\"key\": \"{value}\"}}", &["value"]);
        let out = t.format(&values(&[("value", "x")])).unwrap();
        assert_eq!(out, "Return {\"key\": \"x\"}");
    }

    #[test]
    fn test_format_missing_variable() {
        let t = template("Hi {name}", &["name"]);
        assert_eq!(
            t.format(&HashMap::new()).unwrap_err(),
            TemplateError::MissingVariable("name".to_string())
        );
    }

    #[test]
    fn test_format_unbalanced_braces() {
        let t = template("Hi {name", &["name"]);
        assert!(matches!(
            t.format(&values(&[("name", "x")])),
            Err(TemplateError::Unbalanced { position: 3 })
        ));
        let t = template("Hi name}", &[]);
        assert!(matches!(
            t.format(&HashMap::new()),
            Err(TemplateError::Unbalanced { .. })
        ));
    }

    #[test]
    fn test_format_handles_multibyte_text() {
        let t = template("Café {dish} — très bon", &["dish"]);
        let out = t.format(&values(&[("dish", "crêpe")])).unwrap();
        assert_eq!(out, "Café crêpe — très bon");
    }

    #[test]
    fn test_validate_requires_all_declared_variables() {
        let t = template("{a} {b}", &["a", "b"]);
        assert!(t.validate(&values(&[("a", "1"), ("b", "2")])));
        assert!(!t.validate(&values(&[("a", "1")])));
    }

    #[test]
    fn test_registry_register_and_replace() {
        let mut registry = TemplateRegistry::default();
        assert!(registry.register(template("v1", &[])).is_none());
        let previous = registry.register(template("v2", &[])).unwrap();
        assert_eq!(previous.template, "v1");
        assert_eq!(registry.get("greeting").unwrap().template, "v2");
        assert_eq!(registry.names(), vec!["greeting".to_string()]);
        assert!(registry.get("missing").is_none());
    }
}
