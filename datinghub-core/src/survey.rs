//! Dating-site recommendation survey: validation, submissions and the
//! notification messages sent for them.
//!
//! Delivery is someone else's job. [`Mailer`] is the seam; [`LogMailer`]
//! only records what would have been sent.

use crate::config::SurveyConfig;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Question fields collected by the survey form, in display order
pub const QUESTION_FIELDS: [&str; 7] = ["gender", "q1", "q2", "q3", "q4", "q5", "q6"];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SurveyError {
    #[error("Please provide a valid email address.")]
    InvalidEmail,

    #[error("Submission not found: {0}")]
    NotFound(u64),

    #[error("Failed to send message: {0}")]
    Delivery(String),

    #[error("Submission storage failed: {0}")]
    Storage(String),
}

/// Raw form fields as posted by the browser
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SurveyForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub name: String,
    /// Any non-empty value means the visitor skipped the questions
    #[serde(default)]
    pub skip_survey: String,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub q1: String,
    #[serde(default)]
    pub q2: String,
    #[serde(default)]
    pub q3: String,
    #[serde(default)]
    pub q4: String,
    #[serde(default)]
    pub q5: String,
    #[serde(default)]
    pub q6: String,
}

impl SurveyForm {
    fn answer(&self, field: &str) -> &str {
        match field {
            "gender" => &self.gender,
            "q1" => &self.q1,
            "q2" => &self.q2,
            "q3" => &self.q3,
            "q4" => &self.q4,
            "q5" => &self.q5,
            "q6" => &self.q6,
            _ => "",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SurveyType {
    Completed,
    Skipped,
}

impl SurveyType {
    pub fn description(&self) -> &'static str {
        match self {
            SurveyType::Completed => "Completed Survey - Personalized Recommendations",
            SurveyType::Skipped => "Skipped Survey - Basic Recommendations",
        }
    }
}

/// A stored survey submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurveySubmission {
    pub id: u64,
    pub name: Option<String>,
    pub email: String,
    pub survey_type: SurveyType,
    /// Question field to answer; absent for skipped surveys
    pub answers: Option<BTreeMap<String, String>>,
    pub submitted_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub processed: bool,
    pub notes: String,
}

impl SurveySubmission {
    /// Validate a posted form into an unsaved submission
    pub fn from_form(form: &SurveyForm) -> Result<Self, SurveyError> {
        let email = form.email.trim();
        if email.is_empty() || !email.contains('@') {
            return Err(SurveyError::InvalidEmail);
        }

        let name = Some(form.name.trim())
            .filter(|n| !n.is_empty())
            .map(str::to_string);

        let (survey_type, answers) = if form.skip_survey.trim().is_empty() {
            let answers = QUESTION_FIELDS
                .iter()
                .map(|field| (field.to_string(), form.answer(field).trim().to_string()))
                .collect();
            (SurveyType::Completed, Some(answers))
        } else {
            (SurveyType::Skipped, None)
        };

        let now = Utc::now();
        Ok(Self {
            id: 0,
            name,
            email: email.to_string(),
            survey_type,
            answers,
            submitted_at: now,
            updated_at: now,
            processed: false,
            notes: String::new(),
        })
    }

    /// Number of questions answered with a non-empty value
    pub fn answer_count(&self) -> usize {
        self.answers
            .as_ref()
            .map(|a| a.values().filter(|v| !v.is_empty()).count())
            .unwrap_or(0)
    }

    pub fn display_name(&self) -> String {
        match &self.name {
            Some(name) => format!("{} - {}", name, self.email),
            None => format!("Anonymous - {}", self.email),
        }
    }
}

/// A composed outgoing message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmailMessage {
    pub subject: String,
    pub body: String,
    pub from: String,
    pub to: Vec<String>,
}

/// Confirmation sent to the visitor
pub fn confirmation_message(submission: &SurveySubmission, config: &SurveyConfig) -> EmailMessage {
    let greeting = submission.name.as_deref().unwrap_or("there");
    let body = format!(
        "Hi {greeting},\n\n\
         Thank you for using our AI Dating Site Matchmaker!\n\n\
         We've received your request for dating site recommendations.\n\n\
         {survey_type}\n\n\
         Our team will analyze your preferences and send personalized recommendations \
         within {hours} hours.\n\n\
         In the meantime, you can browse our research:\n\
         {research_url}\n\n\
         Best regards,\n\
         {signature}\n",
        survey_type = submission.survey_type.description(),
        hours = config.response_window_hours,
        research_url = config.research_url,
        signature = config.signature,
    );

    EmailMessage {
        subject: "Dating Site Recommendations - Coming Soon!".to_string(),
        body,
        from: config.from_email.clone(),
        to: vec![submission.email.clone()],
    }
}

/// Heads-up sent to the site owner
pub fn admin_notification(submission: &SurveySubmission, config: &SurveyConfig) -> EmailMessage {
    let answers = match &submission.answers {
        Some(answers) => answers
            .iter()
            .map(|(field, value)| format!("  {field}: {value}"))
            .collect::<Vec<_>>()
            .join("\n"),
        None => "Survey skipped".to_string(),
    };

    let body = format!(
        "New Dating Recommendations Request:\n\n\
         Email: {email}\n\
         Name: {name}\n\
         Type: {survey_type}\n\n\
         Answers:\n{answers}\n\n\
         Send recommendations within {hours} hours.\n",
        email = submission.email,
        name = submission.name.as_deref().unwrap_or("Not provided"),
        survey_type = submission.survey_type.description(),
        hours = config.response_window_hours,
    );

    EmailMessage {
        subject: "New Dating Recommendations Request".to_string(),
        body,
        from: config.from_email.clone(),
        to: vec![config.admin_email.clone()],
    }
}

/// Outgoing message transport
pub trait Mailer: Send + Sync {
    fn send(&self, message: &EmailMessage) -> Result<(), SurveyError>;
}

/// Mailer that only logs and remembers messages
#[derive(Default)]
pub struct LogMailer {
    sent: RwLock<Vec<EmailMessage>>,
}

impl LogMailer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<EmailMessage> {
        self.sent.read().clone()
    }
}

impl Mailer for LogMailer {
    fn send(&self, message: &EmailMessage) -> Result<(), SurveyError> {
        tracing::info!(
            to = ?message.to,
            subject = %message.subject,
            "Queued email"
        );
        self.sent.write().push(message.clone());
        Ok(())
    }
}

/// Submissions in memory, optionally snapshotted to a JSON file.
/// Listed newest first.
#[derive(Default)]
pub struct SubmissionStore {
    inner: RwLock<Vec<SurveySubmission>>,
    snapshot: Option<PathBuf>,
}

impl SubmissionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a store backed by a JSON snapshot. A missing file starts empty.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, SurveyError> {
        let path = path.as_ref();
        let submissions = if path.exists() {
            let contents = std::fs::read_to_string(path).map_err(storage_error)?;
            let submissions: Vec<SurveySubmission> =
                serde_json::from_str(&contents).map_err(storage_error)?;
            tracing::info!("Loaded {} submissions from {:?}", submissions.len(), path);
            submissions
        } else {
            Vec::new()
        };

        Ok(Self {
            inner: RwLock::new(submissions),
            snapshot: Some(path.to_path_buf()),
        })
    }

    fn persist(&self, submissions: &[SurveySubmission]) -> Result<(), SurveyError> {
        let Some(path) = &self.snapshot else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(storage_error)?;
        }
        let json = serde_json::to_string_pretty(submissions).map_err(storage_error)?;
        std::fs::write(path, json).map_err(storage_error)
    }

    /// Store a submission under the next free id
    pub fn add(&self, mut submission: SurveySubmission) -> Result<SurveySubmission, SurveyError> {
        let mut inner = self.inner.write();
        submission.id = inner.iter().map(|s| s.id).max().unwrap_or(0) + 1;
        inner.push(submission.clone());
        if let Err(err) = self.persist(&inner) {
            inner.pop();
            return Err(err);
        }
        Ok(submission)
    }

    pub fn list(&self) -> Vec<SurveySubmission> {
        let mut all = self.inner.read().clone();
        all.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at).then(b.id.cmp(&a.id)));
        all
    }

    /// Flag a submission as handled (recommendations sent), with admin notes
    pub fn mark_processed(
        &self,
        id: u64,
        processed: bool,
        notes: Option<&str>,
    ) -> Result<SurveySubmission, SurveyError> {
        let mut inner = self.inner.write();
        let index = inner
            .iter()
            .position(|s| s.id == id)
            .ok_or(SurveyError::NotFound(id))?;

        let previous = inner[index].clone();
        let submission = &mut inner[index];
        submission.processed = processed;
        if let Some(notes) = notes {
            submission.notes = notes.to_string();
        }
        submission.updated_at = Utc::now();
        let updated = submission.clone();

        if let Err(err) = self.persist(&inner) {
            inner[index] = previous;
            return Err(err);
        }
        Ok(updated)
    }
}

fn storage_error(err: impl std::fmt::Display) -> SurveyError {
    SurveyError::Storage(err.to_string())
}

/// Validate, store and notify. Returns the stored submission.
pub fn submit(
    form: &SurveyForm,
    store: &SubmissionStore,
    mailer: &dyn Mailer,
    config: &SurveyConfig,
) -> Result<SurveySubmission, SurveyError> {
    let submission = store.add(SurveySubmission::from_form(form)?)?;
    tracing::info!(
        id = submission.id,
        survey_type = ?submission.survey_type,
        answers = submission.answer_count(),
        "Survey submitted"
    );

    mailer.send(&confirmation_message(&submission, config))?;
    mailer.send(&admin_notification(&submission, config))?;
    Ok(submission)
}
