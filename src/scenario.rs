use serde::{Deserialize, Serialize};

use crate::properties::Properties;

/// Title and tags of the running scenario.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioInfo {
    title: String,
    tags: Vec<String>,
}

impl ScenarioInfo {
    pub fn new(title: impl Into<String>, tags: Vec<String>) -> Self {
        Self {
            title: title.into(),
            tags,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Tags in scope, in declaration order.
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// Read access to the running scenario plus its property bag.
pub trait ScenarioContext {
    fn scenario_info(&self) -> &ScenarioInfo;
    fn properties(&self) -> &Properties;
    fn properties_mut(&mut self) -> &mut Properties;
}
