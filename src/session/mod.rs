//! Per-session script and stylesheet bookkeeping.
//!
//! A [`Session`] is created when a browser session starts and handed to every
//! layout render. It remembers which support scripts were already shipped so
//! they are emitted once, no matter how many layouts a page instantiates.

use std::collections::HashMap;

use blake3::Hash;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::layout::RenderConfig;
use crate::logging::{LogLevel, Logger, emit, json_str};

const LOG_TARGET: &str = "trellis::session";

/// Named rendering-agent capabilities queried by the generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentCapabilities {
    /// The agent sizes a `width: 100%` block inside a fixed-layout table cell
    /// correctly, so justified cells may force full width.
    pub justify_width_ok: bool,
}

impl Default for AgentCapabilities {
    fn default() -> Self {
        Self {
            justify_width_ok: true,
        }
    }
}

/// Session configuration knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// JavaScript object that owns the client layout registry.
    pub script_namespace: String,
    pub capabilities: AgentCapabilities,
    #[serde(skip)]
    pub logger: Option<Logger>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            script_namespace: "trellis".to_string(),
            capabilities: AgentCapabilities::default(),
            logger: None,
        }
    }
}

impl SessionConfig {
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

/// Instructions queued for delivery to the client.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// A support script body registered through [`Session::ensure_script_loaded`].
    LoadScript { key: String, body: String },
    /// Register (or replace) the client layout described by the config.
    RegisterLayout(RenderConfig),
    /// Mark one layout dirty, or run every registered layout when `None`.
    AdjustLayouts(Option<String>),
}

impl Statement {
    pub fn to_javascript(&self, namespace: &str) -> Result<String> {
        let script = match self {
            Statement::LoadScript { body, .. } => body.clone(),
            Statement::RegisterLayout(config) => format!(
                "{namespace}.layouts.add(new {namespace}.GridLayout('{}', {}));",
                config.id,
                serde_json::to_string(config)?
            ),
            Statement::AdjustLayouts(Some(id)) => format!("{namespace}.layouts.adjust('{id}');"),
            Statement::AdjustLayouts(None) => format!("{namespace}.layouts.adjust();"),
        };
        Ok(script)
    }
}

#[derive(Debug)]
pub struct Session {
    config: SessionConfig,
    loaded: HashMap<String, Hash>,
    stylesheet: Vec<(String, String)>,
    statements: Vec<Statement>,
    auto_statements: Vec<Statement>,
}

impl Session {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            loaded: HashMap::new(),
            stylesheet: Vec::new(),
            statements: Vec::new(),
            auto_statements: Vec::new(),
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn capabilities(&self) -> &AgentCapabilities {
        &self.config.capabilities
    }

    pub fn logger(&self) -> Option<&Logger> {
        self.config.logger.as_ref()
    }

    /// Queue `body` for delivery unless `key` was already loaded this session.
    ///
    /// Returns `true` when the script was queued by this call.
    pub fn ensure_script_loaded(&mut self, key: &str, body: &str) -> bool {
        let digest = blake3::hash(body.as_bytes());
        if let Some(existing) = self.loaded.get(key) {
            if *existing != digest {
                emit(
                    self.logger(),
                    LogLevel::Warn,
                    LOG_TARGET,
                    "script key reused with a different body",
                    [json_str("key", key)],
                );
            }
            return false;
        }
        self.loaded.insert(key.to_string(), digest);
        self.statements.push(Statement::LoadScript {
            key: key.to_string(),
            body: body.to_string(),
        });
        true
    }

    pub fn is_script_loaded(&self, key: &str) -> bool {
        self.loaded.contains_key(key)
    }

    pub fn add_stylesheet_rule(&mut self, selector: &str, declarations: &str) {
        let exists = self
            .stylesheet
            .iter()
            .any(|(s, d)| s == selector && d == declarations);
        if !exists {
            self.stylesheet
                .push((selector.to_string(), declarations.to_string()));
        }
    }

    pub fn stylesheet(&self) -> &[(String, String)] {
        &self.stylesheet
    }

    /// Serialised stylesheet, one rule per line.
    pub fn stylesheet_text(&self) -> String {
        self.stylesheet
            .iter()
            .map(|(selector, declarations)| format!("{selector} {{{declarations}}}\n"))
            .collect()
    }

    pub fn do_javascript(&mut self, statement: Statement) {
        self.statements.push(statement);
    }

    /// Statement replayed after every update the session ships.
    pub fn add_auto_javascript(&mut self, statement: Statement) {
        if !self.auto_statements.contains(&statement) {
            self.auto_statements.push(statement);
        }
    }

    pub fn auto_statements(&self) -> &[Statement] {
        &self.auto_statements
    }

    /// Drain queued statements followed by the auto statements, in delivery order.
    pub fn take_statements(&mut self) -> Vec<Statement> {
        let mut out = std::mem::take(&mut self.statements);
        out.extend(self.auto_statements.iter().cloned());
        out
    }

    pub fn take_javascript(&mut self) -> Result<String> {
        let namespace = self.config.script_namespace.clone();
        let mut script = String::new();
        for statement in self.take_statements() {
            script.push_str(&statement.to_javascript(&namespace)?);
            script.push('\n');
        }
        Ok(script)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::MemorySink;
    use std::sync::Arc;

    #[test]
    fn scripts_load_once_per_session() {
        let mut session = Session::default();
        assert!(session.ensure_script_loaded("js/grid.js", "body"));
        assert!(!session.ensure_script_loaded("js/grid.js", "body"));
        assert!(session.is_script_loaded("js/grid.js"));

        let statements = session.take_statements();
        assert_eq!(statements.len(), 1);
        assert!(session.take_statements().is_empty());
    }

    #[test]
    fn conflicting_script_body_is_reported() {
        let sink = Arc::new(MemorySink::new());
        let config = SessionConfig {
            logger: Some(Logger::from_shared(sink.clone())),
            ..SessionConfig::default()
        };
        let mut session = Session::new(config);
        session.ensure_script_loaded("js/grid.js", "one");
        session.ensure_script_loaded("js/grid.js", "two");

        let events = sink.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].level, LogLevel::Warn);
    }

    #[test]
    fn auto_statements_follow_queued_ones() {
        let mut session = Session::default();
        session.add_auto_javascript(Statement::AdjustLayouts(None));
        session.add_auto_javascript(Statement::AdjustLayouts(None));
        session.do_javascript(Statement::AdjustLayouts(Some("g1".into())));

        let script = session.take_javascript().unwrap();
        assert_eq!(
            script,
            "trellis.layouts.adjust('g1');\ntrellis.layouts.adjust();\n"
        );
        assert_eq!(session.take_statements(), vec![Statement::AdjustLayouts(None)]);
    }

    #[test]
    fn config_loads_from_json_with_defaults() {
        let config =
            SessionConfig::from_json(r#"{"capabilities": {"justify_width_ok": false}}"#).unwrap();
        assert_eq!(config.script_namespace, "trellis");
        assert!(!config.capabilities.justify_width_ok);
    }

    #[test]
    fn stylesheet_rules_are_deduplicated() {
        let mut session = Session::default();
        session.add_stylesheet_rule("table.center-wrapper", "margin: 0 auto");
        session.add_stylesheet_rule("table.center-wrapper", "margin: 0 auto");
        assert_eq!(session.stylesheet_text(), "table.center-wrapper {margin: 0 auto}\n");
    }
}
