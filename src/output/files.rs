use std::path::PathBuf;

use async_trait::async_trait;
use serde_json::Value;
use tokio::fs;
use tracing::info;

use crate::calendar::{CalendarEntry, PlannedContent};
use crate::config::OutputConfig;
use crate::error::Result;
use crate::slug::slugify_truncate;

use super::OutputWriter;

/// File-based output writer that generates markdown files
pub struct FileOutputWriter {
    config: OutputConfig,
}

impl FileOutputWriter {
    pub fn new(config: OutputConfig) -> Self {
        Self { config }
    }

    async fn ensure_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.config.dir).await?;
        Ok(())
    }

    /// `<date>-<slug>.md`, so a directory listing sorts by schedule
    pub fn file_name(planned: &PlannedContent) -> String {
        format!(
            "{}-{}.md",
            planned.scheduled_date.format("%Y-%m-%d"),
            slugify_truncate(planned.plan.title())
        )
    }

    fn planned_to_markdown(&self, planned: &PlannedContent) -> String {
        let plan = &planned.plan;
        let mut md = String::new();

        md.push_str(&format!("# {}\n\n", plan.title()));
        md.push_str(&format!(
            "**Scheduled**: {}\n",
            planned.scheduled_date.format("%Y-%m-%d")
        ));
        md.push_str(&format!("**Audience**: {}\n", plan.target_audience));
        md.push_str(&format!(
            "**Target length**: {} words (about {} minutes to write)\n",
            plan.target_word_count, plan.estimated_completion_time
        ));
        if !plan.topic.keywords.is_empty() {
            md.push_str(&format!("**Keywords**: {}\n", plan.topic.keyword_list()));
        }
        if let Some(volume) = &plan.topic.search_volume {
            md.push_str(&format!("**Search volume**: {}\n", volume));
        }
        if let Some(competition) = plan.topic.competition {
            md.push_str(&format!("**Competition**: {:.2}\n", competition));
        }
        md.push('\n');

        if !plan.outline.is_empty() {
            md.push_str("## Outline\n\n");
            for (i, section) in plan.outline.iter().enumerate() {
                md.push_str(&format!("{}. {}\n", i + 1, section));
            }
            md.push('\n');
        }

        if !plan.key_points.is_empty() {
            md.push_str("## Key Points\n\n");
            for point in &plan.key_points {
                md.push_str(&format!("- {}\n", point));
            }
            md.push('\n');
        }

        if !planned.competition_analysis.is_empty() {
            md.push_str("## Competition Analysis\n\n");
            for (key, value) in &planned.competition_analysis {
                md.push_str(&format!("### {}\n\n", heading(key)));
                render_value(&mut md, value);
                md.push('\n');
            }
        }

        if !plan.references.is_empty() {
            md.push_str("## References\n\n");
            for reference in &plan.references {
                md.push_str(&format!("- {}\n", reference));
            }
            md.push('\n');
        }

        md
    }

    fn calendar_to_markdown(&self, niche: &str, entries: &[CalendarEntry]) -> String {
        let mut md = String::new();
        md.push_str(&format!("# Content Calendar: {}\n\n", niche));

        if entries.is_empty() {
            md.push_str("_Nothing scheduled._\n");
            return md;
        }

        md.push_str("| Date | Title | Status | Words |\n");
        md.push_str("|------|-------|--------|-------|\n");
        for entry in entries {
            md.push_str(&format!(
                "| {} | {} | {} | {} |\n",
                entry.scheduled_date.format("%Y-%m-%d"),
                entry.title().replace('|', "\\|"),
                entry.status,
                entry.plan.target_word_count
            ));
        }
        md
    }
}

/// `content_gaps` -> `Content Gaps`
fn heading(key: &str) -> String {
    key.split(['_', ' '])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

fn render_value(md: &mut String, value: &Value) {
    match value {
        Value::String(s) => md.push_str(&format!("{}\n", s)),
        Value::Array(items) => {
            for item in items {
                match item {
                    Value::String(s) => md.push_str(&format!("- {}\n", s)),
                    other => md.push_str(&format!("- {}\n", other)),
                }
            }
        }
        Value::Object(_) => {
            let pretty = serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string());
            md.push_str(&format!("```json\n{}\n```\n", pretty));
        }
        other => md.push_str(&format!("{}\n", other)),
    }
}

#[async_trait]
impl OutputWriter for FileOutputWriter {
    async fn write_planned(&self, planned: &PlannedContent) -> Result<PathBuf> {
        self.ensure_dir().await?;

        let path = self.config.dir.join(Self::file_name(planned));
        fs::write(&path, self.planned_to_markdown(planned)).await?;

        info!("Wrote {:?}", path);
        Ok(path)
    }

    async fn write_calendar(&self, niche: &str, entries: &[CalendarEntry]) -> Result<PathBuf> {
        self.ensure_dir().await?;

        let path = self.config.dir.join("calendar.md");
        fs::write(&path, self.calendar_to_markdown(niche, entries)).await?;
        info!("Wrote {:?}", path);

        // Machine-readable copy for scripting
        let json_path = self.config.dir.join("calendar.json");
        fs::write(&json_path, serde_json::to_string_pretty(entries)?).await?;
        info!("Wrote {:?}", json_path);

        Ok(path)
    }
}
