//! Issue-tracker client: fetches work items with their changelogs over
//! the tracker's JQL search endpoint and maps them into `WorkItem`
//! snapshots. Everything algorithmic happens downstream of this module.

use crate::config::TrackerConfig;
use crate::error::{ImpactError, Result};
use crate::types::{SprintCandidate, StatusChange, WorkItem};
use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;
use std::time::Duration;

const SEARCH_PATH: &str = "/rest/api/3/search/jql";
const PAGE_SIZE: &str = "100";
pub const TOKEN_ENV: &str = "IMPACT_TRACKER_TOKEN";

/// Some tracker deployments return sprint associations as opaque
/// strings rather than objects; the name is embedded as `name=...`.
fn sprint_name_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"name=([^,]+)").expect("valid regex"))
}

// ---------------------------------------------------------------------------
// TrackerClient
// ---------------------------------------------------------------------------

pub struct TrackerClient {
    http: reqwest::blocking::Client,
    base_url: String,
    user: String,
    token: String,
    config: TrackerConfig,
}

impl TrackerClient {
    /// Build a client from config. The token may come from the
    /// `IMPACT_TRACKER_TOKEN` env var when not configured directly.
    pub fn new(config: &TrackerConfig) -> Result<Self> {
        let base_url = config
            .base_url
            .clone()
            .ok_or_else(|| ImpactError::TrackerNotConfigured("tracker.base_url".to_string()))?;
        let user = config
            .user
            .clone()
            .ok_or_else(|| ImpactError::TrackerNotConfigured("tracker.user".to_string()))?;
        let token = config
            .token
            .clone()
            .or_else(|| std::env::var(TOKEN_ENV).ok())
            .ok_or_else(|| {
                ImpactError::TrackerNotConfigured(format!("tracker.token (or {TOKEN_ENV})"))
            })?;

        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            user,
            token,
            config: config.clone(),
        })
    }

    /// Fetch all work items for the configured project and team,
    /// following pagination until the tracker stops handing out a next
    /// page token. An empty result set is not an error.
    pub fn fetch_items(&self, team_filter: &str) -> Result<Vec<WorkItem>> {
        let jql = format!(
            r#"project = "{}" AND "{}" = "{}" ORDER BY created DESC"#,
            self.config.project_key, self.config.field_team, team_filter
        );
        let fields = format!(
            "summary,status,issuetype,created,updated,{},{},{}",
            self.config.field_story_points, self.config.field_sprint, self.config.field_team
        );

        let mut items = Vec::new();
        let mut next_token: Option<String> = None;

        loop {
            let mut request = self
                .http
                .get(format!("{}{}", self.base_url, SEARCH_PATH))
                .basic_auth(&self.user, Some(&self.token))
                .query(&[
                    ("jql", jql.as_str()),
                    ("maxResults", PAGE_SIZE),
                    ("expand", "changelog"),
                    ("fields", fields.as_str()),
                ]);
            if let Some(token) = &next_token {
                request = request.query(&[("nextPageToken", token.as_str())]);
            }

            let body: Value = request.send()?.error_for_status()?.json()?;
            let issues = body
                .get("issues")
                .and_then(Value::as_array)
                .ok_or_else(|| {
                    ImpactError::MalformedResponse("missing 'issues' array".to_string())
                })?;

            for issue in issues {
                items.push(self.parse_issue(issue)?);
            }

            next_token = body
                .get("nextPageToken")
                .and_then(Value::as_str)
                .map(str::to_string);
            if next_token.is_none() {
                break;
            }
        }

        Ok(items)
    }

    fn parse_issue(&self, issue: &Value) -> Result<WorkItem> {
        let key = issue
            .get("key")
            .and_then(Value::as_str)
            .ok_or_else(|| ImpactError::MalformedResponse("issue without key".to_string()))?
            .to_string();
        let fields = issue.get("fields").cloned().unwrap_or(Value::Null);

        let issue_type = fields["issuetype"]["name"]
            .as_str()
            .unwrap_or("Unknown")
            .to_string();
        // Status usually comes as an object; tolerate a bare string.
        let status = fields["status"]["name"]
            .as_str()
            .or_else(|| fields["status"].as_str())
            .unwrap_or("")
            .to_string();
        let created = fields["created"].as_str().unwrap_or("").to_string();
        let story_points = fields[&self.config.field_story_points].as_f64();

        let sprints = fields[&self.config.field_sprint]
            .as_array()
            .map(|entries| entries.iter().filter_map(parse_sprint).collect())
            .unwrap_or_default();

        let events = parse_changelog(issue.get("changelog").unwrap_or(&Value::Null));

        Ok(WorkItem {
            key,
            issue_type,
            story_points,
            created,
            status,
            sprints,
            events,
        })
    }
}

fn parse_sprint(entry: &Value) -> Option<SprintCandidate> {
    if let Some(obj) = entry.as_object() {
        let name = obj.get("name")?.as_str()?.to_string();
        let goal = obj
            .get("goal")
            .and_then(Value::as_str)
            .map(str::to_string);
        return Some(SprintCandidate { name, goal });
    }
    // Opaque string form: pull the name out, goal is unavailable.
    let raw = entry.as_str()?;
    let name = sprint_name_pattern()
        .captures(raw)
        .map(|caps| caps[1].to_string())
        .unwrap_or_else(|| raw.to_string());
    Some(SprintCandidate { name, goal: None })
}

/// Flatten the changelog into status-change entries, ordered by the
/// history timestamp (ISO strings sort chronologically).
fn parse_changelog(changelog: &Value) -> Vec<StatusChange> {
    let Some(histories) = changelog.get("histories").and_then(Value::as_array) else {
        return Vec::new();
    };

    let mut sorted: Vec<&Value> = histories.iter().collect();
    sorted.sort_by_key(|h| h["created"].as_str().unwrap_or(""));

    let mut events = Vec::new();
    for history in sorted {
        let Some(at) = history["created"].as_str() else {
            continue;
        };
        let Some(entries) = history["items"].as_array() else {
            continue;
        };
        for entry in entries {
            if entry["field"].as_str() != Some("status") {
                continue;
            }
            events.push(StatusChange {
                at: at.to_string(),
                from: entry["fromString"].as_str().map(str::to_string),
                to: entry["toString"].as_str().map(str::to_string),
            });
        }
    }
    events
}
