//! Static prompt templates.
//!
//! Prompts never touch the upstream. Each one is a fixed user message that
//! tells the model which resources to load and what to look for.

use std::collections::HashMap;

use async_trait::async_trait;
use pmcp::types::{Content, GetPromptResult, PromptInfo, PromptMessage, Role};
use pmcp::{PromptHandler, RequestHandlerExtra};

/// A named, static prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptTemplate {
    pub name: &'static str,
    pub description: &'static str,
    pub body: &'static str,
}

const ANALYZE_HEALTH_SUMMARY: &str = "\
Please analyze the following health summary data and provide insights:

1. Identify any metrics that are outside of normal ranges
2. Highlight trends or patterns in the data
3. Suggest potential actions based on the data

You can load the health data from:
- senechal://health/summary/day?span=7 for daily data
- senechal://health/summary/week?span=4 for weekly data
- senechal://health/summary/month?span=3 for monthly data

For the user's baseline and goals, check senechal://health/profile.
For available metrics information, check senechal://health/availablemetrics.
";

const COMPARE_HEALTH_TRENDS: &str = "\
Please compare recent health trends against the longer-term picture:

1. Load short-term trends from senechal://health/trends?days=7&interval=day
2. Load long-term trends from senechal://health/trends?days=90&interval=week
3. Load reference statistics from senechal://health/stats?days=90
4. For each metric, say whether the recent values are improving, stable or
   worsening relative to the 90-day statistics
5. Call out any metric whose recent average falls outside its 90-day range

Use senechal://health/current to confirm the latest measurement of any metric
you flag, and keep the comparison grounded in the numbers returned.
";

/// Every prompt the server offers
pub static PROMPTS: &[PromptTemplate] = &[
    PromptTemplate {
        name: "analyze_health_summary",
        description: "Analyze health summaries for out-of-range metrics, patterns and suggested actions",
        body: ANALYZE_HEALTH_SUMMARY,
    },
    PromptTemplate {
        name: "compare_health_trends",
        description: "Compare short-term health trends with 90-day statistics",
        body: COMPARE_HEALTH_TRENDS,
    },
];

/// Look up a prompt by name
pub fn prompt_named(name: &str) -> Option<&'static PromptTemplate> {
    PROMPTS.iter().find(|p| p.name == name)
}

impl PromptTemplate {
    /// Render as a role-tagged message sequence
    pub fn render(&self) -> GetPromptResult {
        GetPromptResult {
            description: Some(self.description.to_string()),
            messages: vec![PromptMessage {
                role: Role::User,
                content: Content::Text {
                    text: self.body.to_string(),
                },
            }],
        }
    }

    pub fn info(&self) -> PromptInfo {
        PromptInfo {
            name: self.name.to_string(),
            description: Some(self.description.to_string()),
            arguments: None,
        }
    }
}

/// Serves one static template over `prompts/get`
#[derive(Debug, Clone, Copy)]
pub struct PromptAdapter {
    template: &'static PromptTemplate,
}

impl PromptAdapter {
    pub fn new(template: &'static PromptTemplate) -> Self {
        Self { template }
    }
}

#[async_trait]
impl PromptHandler for PromptAdapter {
    async fn handle(
        &self,
        _args: HashMap<String, String>,
        _extra: RequestHandlerExtra,
    ) -> Result<GetPromptResult, pmcp::Error> {
        tracing::info!("Prompt requested: {}", self.template.name);
        Ok(self.template.render())
    }

    fn metadata(&self) -> Option<PromptInfo> {
        Some(self.template.info())
    }
}
