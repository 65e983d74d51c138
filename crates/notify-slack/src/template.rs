//! Default notification layout built from the workflow run context.

use crate::attachment::{Attachment, Field};
use crate::config::RunContext;

pub const FOOTER: &str =
    "<https://github.com/ReasonSoftware/action-notify-slack|ReasonSoftware/action-notify-slack>";
pub const FOOTER_ICON: &str = "https://cdn.reasonsecurity.com/images/logo.png";

/// Status label shown when a failure is forced.
const FAILED: &str = "failed";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
    InProgress,
    Deploying,
    Success,
    Failure,
    Unknown,
}

impl Bucket {
    pub fn color(self) -> &'static str {
        match self {
            Bucket::InProgress => "#fbf000",
            Bucket::Deploying => "#fda100",
            Bucket::Success => "#0ce823",
            Bucket::Failure => "#fd0000",
            Bucket::Unknown => "#777777",
        }
    }
}

const STATUSES: &[(&str, Bucket)] = &[
    ("running", Bucket::InProgress),
    ("started", Bucket::InProgress),
    ("building", Bucket::InProgress),
    ("initializing", Bucket::InProgress),
    ("deploying", Bucket::Deploying),
    ("uploading", Bucket::Deploying),
    ("publishing", Bucket::Deploying),
    ("creating", Bucket::Deploying),
    ("finished", Bucket::Success),
    ("succeeded", Bucket::Success),
    ("passed", Bucket::Success),
    ("built", Bucket::Success),
    ("released", Bucket::Success),
    ("failed", Bucket::Failure),
    ("aborted", Bucket::Failure),
    ("canceled", Bucket::Failure),
    ("terminated", Bucket::Failure),
];

/// Case-insensitive exact match against the known status words.
pub fn classify(status: &str) -> Bucket {
    let status = status.to_lowercase();
    STATUSES
        .iter()
        .find(|(word, _)| *word == status)
        .map(|(_, bucket)| *bucket)
        .unwrap_or(Bucket::Unknown)
}

/// Build the standard attachment: four run fields, then `additions` in order.
pub fn build_template(
    run: &RunContext,
    status: &str,
    failed: bool,
    additions: &[Field],
) -> Attachment {
    let (color, label) = if failed {
        (Bucket::Failure.color(), FAILED)
    } else {
        (classify(status).color(), status)
    };

    let server = run.server_url.as_str();
    let repo = run.repository.as_str();
    let repo_name = repo.rsplit('/').next().unwrap_or(repo);

    let mut fields = vec![
        Field::short("Repository", format!("<{server}/{repo}|{repo_name}>")),
        Field::short(
            "Workflow",
            format!(
                "<{server}/{repo}/actions?query=workflow%3A{}|{}>",
                urlencoding::encode(&run.workflow),
                run.workflow
            ),
        ),
        Field::short("Initiator", format!("<{server}/{0}|{0}>", run.actor)),
        Field::short(
            "Status",
            format!(
                "<{server}/{repo}/actions/runs/{}|{}>",
                run.run_id,
                label.to_uppercase()
            ),
        ),
    ];
    fields.extend_from_slice(additions);

    Attachment {
        color: color.to_string(),
        fields,
        footer: FOOTER.to_string(),
        footer_icon: FOOTER_ICON.to_string(),
        ts: Some(chrono::Utc::now().timestamp().into()),
        ..Default::default()
    }
}
