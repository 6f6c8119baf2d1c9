//! User-agent bot filter
//!
//! Case-insensitive substring matching against a configured pattern list.

use crate::config::HitsConfig;

#[derive(Debug, Clone, Default)]
pub struct BotFilter {
    patterns: Vec<String>,
}

impl BotFilter {
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            patterns: patterns
                .into_iter()
                .map(|p| p.as_ref().to_lowercase())
                .filter(|p| !p.is_empty())
                .collect(),
        }
    }

    pub fn from_config(config: &HitsConfig) -> Self {
        Self::new(&config.bot_user_agents)
    }

    /// First configured pattern contained in `user_agent`
    pub fn matched_pattern(&self, user_agent: &str) -> Option<&str> {
        if self.patterns.is_empty() {
            return None;
        }
        let user_agent = user_agent.to_lowercase();
        self.patterns
            .iter()
            .find(|pattern| user_agent.contains(pattern.as_str()))
            .map(String::as_str)
    }

    pub fn is_bot(&self, user_agent: &str) -> bool {
        self.matched_pattern(user_agent).is_some()
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }
}
