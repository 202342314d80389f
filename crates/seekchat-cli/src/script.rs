//! Interaction scripts
//!
//! A script seeds a transcript with `[[item]]` tables and then replays
//! `[[step]]` tables, each either an event dispatch or an edit-mode switch.

use anyhow::{bail, Context, Result};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use seekchat_core::{
    ChatItem, ChatSession, Completion, DispatchMode, EventName, EventResult, ItemId,
    MemoryTranscript, MessageEvent, Payload, SelectionObserver,
};

#[derive(Debug, Deserialize)]
pub struct Script {
    #[serde(default, rename = "item")]
    pub items: Vec<ChatItem>,
    #[serde(default, rename = "step")]
    pub steps: Vec<Step>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Step {
    Editing(EditingStep),
    Event(EventStep),
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EditingStep {
    pub editing: bool,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EventStep {
    pub event: EventName,
    pub target: Option<ItemId>,
    /// Overrides the session's dispatch mode
    pub mode: Option<DispatchMode>,
    #[serde(default)]
    pub payload: Payload,
}

/// What happened at one step
#[derive(Debug, Serialize)]
pub struct StepReport {
    pub step: usize,
    pub action: String,
    /// None for edit-mode switches
    pub handled: Option<bool>,
    /// Completion result, if a handler reported one
    pub outcome: Option<String>,
    pub editing: bool,
    pub selected: Vec<ItemId>,
}

impl std::fmt::Display for StepReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {:<14}", self.step, self.action)?;
        if let Some(handled) = self.handled {
            write!(f, " handled={}", handled)?;
        }
        if let Some(outcome) = &self.outcome {
            write!(f, " {}", outcome)?;
        }
        let selected: Vec<&str> = self.selected.iter().map(ItemId::as_str).collect();
        write!(f, " editing={} selected=[{}]", self.editing, selected.join(", "))
    }
}

impl Script {
    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read script {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Failed to parse script {}", path.display()))
    }
}

/// Logs selection updates as they are broadcast
pub struct LogObserver;

impl SelectionObserver for LogObserver {
    fn editing_changed(&self, editing: bool, duration: Duration) {
        info!("Edit mode {} ({:?})", if editing { "on" } else { "off" }, duration);
    }

    fn selection_changed(&self, selected: &HashSet<ItemId>) {
        info!("{} item(s) selected", selected.len());
    }
}

/// Replay every step against the session, stopping at the first bad step
pub fn replay(
    script: &Script,
    session: &ChatSession,
    transcript: &MemoryTranscript,
) -> Result<Vec<StepReport>> {
    let mut reports = Vec::with_capacity(script.steps.len());

    for (idx, step) in script.steps.iter().enumerate() {
        let step_no = idx + 1;
        let (action, handled, outcome) = match step {
            Step::Editing(EditingStep { editing }) => {
                session.set_editing(*editing);
                (format!("editing={}", editing), None, None)
            }
            Step::Event(event_step) => {
                let (handled, outcome) = run_event(step_no, event_step, session, transcript)?;
                (event_step.event.to_string(), Some(handled), outcome)
            }
        };

        let selection = session.selection().lock();
        reports.push(StepReport {
            step: step_no,
            action,
            handled,
            outcome,
            editing: selection.is_editing(),
            selected: selection.selected_sorted(),
        });
    }

    Ok(reports)
}

fn run_event(
    step_no: usize,
    step: &EventStep,
    session: &ChatSession,
    transcript: &MemoryTranscript,
) -> Result<(bool, Option<String>)> {
    // Snapshot the target so the backend can mutate the transcript mid-dispatch
    let target = match &step.target {
        Some(id) => match transcript.get(id) {
            Some(item) => Some(item),
            None => bail!("step {}: unknown target '{}'", step_no, id),
        },
        None => None,
    };

    let slot: Arc<Mutex<Option<String>>> = Arc::new(Mutex::new(None));
    let sink = Arc::clone(&slot);
    let completion = Completion::new(move |result| {
        *sink.lock() = Some(describe(result));
    });

    let mut event = MessageEvent::new(step.event.clone())
        .with_payload_ref(&step.payload)
        .with_completion(completion);
    if let Some(target) = &target {
        event = event.with_target(target);
        if let Some(position) = transcript.position(&target.id) {
            event = event.with_position(position);
        }
    }

    let handled = match step.mode {
        Some(mode) => session.dispatch_with(&event, mode),
        None => session.dispatch(&event),
    };
    let outcome = slot.lock().take();
    Ok((handled, outcome))
}

fn describe(result: EventResult) -> String {
    match result {
        Ok(None) => "ok".to_string(),
        Ok(Some(value)) => match serde_json::to_string(&value) {
            Ok(json) => format!("ok {}", json),
            Err(_) => format!("ok {:?}", value),
        },
        Err(e) => format!("error: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use seekchat_core::SessionConfig;
    use std::io::Write;

    const SCRIPT: &str = r#"
[[item]]
id = "u1"
role = "user"
content = "What is Rust?"

[[item]]
id = "a1"
role = "assistant"
content = "A systems language."

[[step]]
event = "copy"
target = "a1"

[[step]]
event = "select"
target = "u1"
payload = { animated = false }

[[step]]
event = "tap"
target = "a1"

[[step]]
event = "delete"

[[step]]
editing = true

[[step]]
event = "like"
"#;

    fn setup(script: &Script) -> (ChatSession, Arc<MemoryTranscript>) {
        let transcript = Arc::new(MemoryTranscript::new(script.items.clone()));
        let session = ChatSession::new(SessionConfig::default(), transcript.clone());
        (session, transcript)
    }

    #[test]
    fn test_parse_script() {
        let script = Script::parse(SCRIPT).unwrap();
        assert_eq!(script.items.len(), 2);
        assert_eq!(script.steps.len(), 6);
        assert!(matches!(
            script.steps[4],
            Step::Editing(EditingStep { editing: true })
        ));
        assert!(matches!(
            &script.steps[0],
            Step::Event(EventStep { event: EventName::Copy, .. })
        ));
    }

    #[test]
    fn test_replay_script() {
        let script = Script::parse(SCRIPT).unwrap();
        let (session, transcript) = setup(&script);

        let reports = replay(&script, &session, &transcript).unwrap();

        assert_eq!(reports.len(), 6);
        assert_eq!(reports[0].outcome.as_deref(), Some("ok \"A systems language.\""));
        assert_eq!(transcript.clipboard().as_deref(), Some("A systems language."));

        assert!(reports[1].editing);
        assert_eq!(reports[1].selected, vec![ItemId::from("u1")]);
        assert_eq!(reports[2].selected.len(), 2);

        // Bulk delete empties the transcript and leaves edit mode
        assert_eq!(reports[3].outcome.as_deref(), Some("ok 2"));
        assert!(!reports[3].editing);
        assert!(transcript.is_empty());

        assert_eq!(reports[4].handled, None);
        assert!(reports[4].editing);

        assert_eq!(reports[5].handled, Some(true));
        assert!(reports[5]
            .outcome
            .as_deref()
            .is_some_and(|o| o.starts_with("error:")));
    }

    #[test]
    fn test_unknown_target_stops_replay() {
        let script = Script::parse(
            r#"
[[step]]
event = "copy"
target = "ghost"
"#,
        )
        .unwrap();
        let (session, transcript) = setup(&script);

        let err = replay(&script, &session, &transcript).unwrap_err();
        assert!(err.to_string().contains("unknown target 'ghost'"));
    }

    #[test]
    fn test_misspelled_key_is_rejected() {
        let err = Script::parse(
            r#"
[[step]]
event = "copy"
targt = "a1"
"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("did not match any variant"));
    }

    #[test]
    fn test_event_and_editing_in_one_step_is_rejected() {
        let result = Script::parse(
            r#"
[[step]]
event = "tap"
editing = true
"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", SCRIPT).unwrap();

        let script = Script::load(file.path()).unwrap();
        let (session, transcript) = setup(&script);
        let reports = replay(&script, &session, &transcript).unwrap();

        assert_eq!(reports.len(), 6);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Script::load(&dir.path().join("missing.toml")).unwrap_err();
        assert!(err.to_string().starts_with("Failed to read script"));
    }

    #[test]
    fn test_report_display() {
        let report = StepReport {
            step: 2,
            action: "tap".to_string(),
            handled: Some(false),
            outcome: None,
            editing: false,
            selected: Vec::new(),
        };
        assert_eq!(
            report.to_string(),
            "[2] tap            handled=false editing=false selected=[]"
        );
    }
}
