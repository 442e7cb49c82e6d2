use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::info;

use crate::error::{ContentError, Result};
use crate::models::{CompetitionAnalysis, ContentPlan};
use crate::research::Researcher;

use super::{CalendarEntry, ContentCalendar};

/// Weeks of content planned per call
const PLANNING_WEEKS: u32 = 4;

/// One scheduled post produced by [`ContentStrategy::plan_content_calendar`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedContent {
    pub plan: ContentPlan,
    pub competition_analysis: CompetitionAnalysis,
    pub scheduled_date: DateTime<Utc>,
}

/// Day offset of the `index`-th post at `posts_per_week` posts per week.
///
/// Floor division, so two posts a week land on days 0, 3, 7, 10, 14, 17, 21, 24.
/// `posts_per_week` must be non-zero.
pub fn schedule_offset_days(index: usize, posts_per_week: u32) -> i64 {
    (index as i64 * 7) / i64::from(posts_per_week)
}

/// Turns a niche and a posting cadence into scheduled content plans.
///
/// The calendar is shared behind a mutex that is only held for individual
/// calendar operations, never across model calls.
pub struct ContentStrategy<R>
where
    R: Researcher,
{
    researcher: R,
    calendar: Arc<Mutex<ContentCalendar>>,
}

impl<R> ContentStrategy<R>
where
    R: Researcher,
{
    pub fn new(researcher: R) -> Self {
        Self::with_calendar(researcher, Arc::new(Mutex::new(ContentCalendar::new())))
    }

    pub fn with_calendar(researcher: R, calendar: Arc<Mutex<ContentCalendar>>) -> Self {
        Self {
            researcher,
            calendar,
        }
    }

    pub fn researcher(&self) -> &R {
        &self.researcher
    }

    /// Shared handle to the calendar
    pub fn calendar(&self) -> Arc<Mutex<ContentCalendar>> {
        Arc::clone(&self.calendar)
    }

    /// Plan four weeks of content starting now.
    pub async fn plan_content_calendar(
        &self,
        niche: &str,
        posts_per_week: u32,
    ) -> Result<Vec<PlannedContent>> {
        self.plan_content_calendar_from(niche, posts_per_week, Utc::now())
            .await
    }

    /// Plan four weeks of content starting at `start`.
    ///
    /// Topics are processed one at a time. If any step fails the error is
    /// returned and entries already added by this call stay on the calendar.
    pub async fn plan_content_calendar_from(
        &self,
        niche: &str,
        posts_per_week: u32,
        start: DateTime<Utc>,
    ) -> Result<Vec<PlannedContent>> {
        if posts_per_week == 0 {
            return Err(ContentError::InvalidInput(
                "posts_per_week must be at least 1".to_string(),
            ));
        }

        let count = posts_per_week.saturating_mul(PLANNING_WEEKS) as usize;
        info!(
            "Planning content calendar for '{}': {} posts/week, {} topics",
            niche, posts_per_week, count
        );

        let topics = self.researcher.research_topics(niche, count).await?;
        let mut planned = Vec::with_capacity(topics.len());

        for (index, topic) in topics.iter().enumerate() {
            let plan = self.researcher.create_content_plan(topic).await?;
            let competition_analysis = self.researcher.analyze_competition(topic).await?;

            let offset = schedule_offset_days(index, posts_per_week);
            let scheduled_date = start + TimeDelta::days(offset);

            self.calendar
                .lock()
                .await
                .add(plan.clone(), scheduled_date);

            info!(
                "Scheduled {}/{} '{}' on day +{}",
                index + 1,
                topics.len(),
                topic.title,
                offset
            );

            planned.push(PlannedContent {
                plan,
                competition_analysis,
                scheduled_date,
            });
        }

        Ok(planned)
    }

    /// See [`ContentCalendar::upcoming`].
    pub async fn upcoming(&self, days: i64) -> Vec<CalendarEntry> {
        self.calendar.lock().await.upcoming(days)
    }

    /// See [`ContentCalendar::update_status`].
    pub async fn update_status(&self, title: &str, status: &str) -> bool {
        self.calendar.lock().await.update_status(title, status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::STATUS_PLANNED;
    use crate::llm::{LlmError, ScriptedClient};
    use crate::prompts::PromptLibrary;
    use crate::research::LlmResearcher;
    use chrono::TimeZone;
    use serde_json::json;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 5, 9, 0, 0).unwrap()
    }

    fn strategy(client: Arc<ScriptedClient>) -> ContentStrategy<LlmResearcher> {
        let prompts = Arc::new(PromptLibrary::bundled().unwrap());
        ContentStrategy::new(LlmResearcher::new(client, prompts, "gpt-4"))
    }

    async fn script_topics(client: &ScriptedClient, titles: &[&str]) {
        let topics: Vec<_> = titles
            .iter()
            .map(|title| {
                json!({
                    "title": title,
                    "keywords": ["kw"],
                    "search_volume": "medium",
                    "competition": 0.4
                })
            })
            .collect();
        client.push_json(json!({ "topics": topics })).await;
    }

    async fn script_plan_and_analysis(client: &ScriptedClient) {
        client
            .push_json(json!({
                "outline": ["Intro"],
                "key_points": ["Point"],
                "word_count": 1200,
                "references": [],
                "audience": "Beginners",
                "writing_time": 60
            }))
            .await;
        client.push_json(json!({ "gaps": ["depth"] })).await;
    }

    #[tokio::test]
    async fn test_zero_posts_per_week_rejected_before_any_call() {
        let client = Arc::new(ScriptedClient::new());
        let strategy = strategy(client.clone());

        let result = strategy.plan_content_calendar("fitness", 0).await;

        assert!(matches!(result, Err(ContentError::InvalidInput(_))));
        assert!(client.requests().await.is_empty());
        assert!(strategy.calendar().lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_schedules_each_topic_and_records_on_calendar() {
        let client = Arc::new(ScriptedClient::new());
        script_topics(&client, &["One", "Two", "Three"]).await;
        for _ in 0..3 {
            script_plan_and_analysis(&client).await;
        }
        let strategy = strategy(client.clone());

        let planned = strategy
            .plan_content_calendar_from("fitness", 1, start())
            .await
            .unwrap();

        let days: Vec<i64> = planned
            .iter()
            .map(|p| (p.scheduled_date - start()).num_days())
            .collect();
        assert_eq!(days, vec![0, 7, 14]);
        assert_eq!(planned[1].plan.title(), "Two");
        assert_eq!(planned[1].competition_analysis["gaps"], json!(["depth"]));

        let calendar = strategy.calendar();
        let calendar = calendar.lock().await;
        assert_eq!(calendar.len(), 3);
        assert!(calendar.entries().iter().all(|e| e.status == STATUS_PLANNED));

        // one research call, then plan + analysis per topic
        let requests = client.requests().await;
        assert_eq!(requests.len(), 7);
        assert!(requests[0].user_prompt().unwrap().contains("Suggest 4 blog post topics"));
    }

    #[tokio::test]
    async fn test_failure_midway_keeps_earlier_entries() {
        let client = Arc::new(ScriptedClient::new());
        script_topics(&client, &["First", "Second"]).await;
        script_plan_and_analysis(&client).await;
        client.push_error(LlmError::RateLimited("quota".to_string())).await;
        let strategy = strategy(client);

        let result = strategy
            .plan_content_calendar_from("fitness", 2, start())
            .await;

        assert!(matches!(
            result,
            Err(ContentError::Llm(LlmError::RateLimited(_)))
        ));
        let calendar = strategy.calendar();
        let calendar = calendar.lock().await;
        assert_eq!(calendar.len(), 1);
        assert_eq!(calendar.entries()[0].title(), "First");
    }

    #[tokio::test]
    async fn test_fewer_topics_than_requested_is_not_an_error() {
        let client = Arc::new(ScriptedClient::new());
        script_topics(&client, &[]).await;
        let strategy = strategy(client);

        let planned = strategy
            .plan_content_calendar_from("fitness", 2, start())
            .await
            .unwrap();

        assert!(planned.is_empty());
    }

    #[test]
    fn test_offsets_two_posts_per_week() {
        let offsets: Vec<i64> = (0..8).map(|i| schedule_offset_days(i, 2)).collect();
        assert_eq!(offsets, vec![0, 3, 7, 10, 14, 17, 21, 24]);
    }

    #[test]
    fn test_offsets_three_posts_per_week() {
        let offsets: Vec<i64> = (0..6).map(|i| schedule_offset_days(i, 3)).collect();
        assert_eq!(offsets, vec![0, 2, 4, 7, 9, 11]);
    }

    #[test]
    fn test_offsets_one_post_per_week() {
        let offsets: Vec<i64> = (0..4).map(|i| schedule_offset_days(i, 1)).collect();
        assert_eq!(offsets, vec![0, 7, 14, 21]);
    }
}
