use std::{sync::Arc, time::Duration};

use chrono::Utc;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::{
    catalog::Catalog,
    config::Latency,
    error::{FieldErrors, FormError},
    models::{
        Course, FacultyMember, FeedbackDraft, FeedbackField, FeedbackReceipt, FeedbackSubmission,
        FeedbackUpdate, FormBuilderView, FormDefinition, FormDetailsUpdate, FormPhase,
    },
};

pub const MAX_RATING: u8 = 5;

pub type FeedbackFormHandle = Arc<Mutex<FeedbackFormState>>;
pub type FormBuilderHandle = Arc<Mutex<FormBuilderState>>;

/// Resettable
///
/// A form whose state can be put back to its initial shape by a timer. A successful submit
/// raises the success indicator and schedules a reset; each state carries a generation counter
/// and a timer only resets the generation it was scheduled for.
pub trait Resettable: Send + 'static {
    fn generation(&self) -> u64;
    fn reset(&mut self);
}

/// Resets the form after `delay`, unless it was reset or resubmitted in the meantime.
fn schedule_reset<T: Resettable>(handle: Arc<Mutex<T>>, generation: u64, delay: Duration) {
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        let mut state = handle.lock().await;
        if state.generation() == generation {
            state.reset();
            tracing::debug!(generation, "form reset after success indicator");
        }
    });
}

// --- Feedback Form ---

/// FeedbackFormState
///
/// The student's feedback form: the draft, the message attached to each invalid field, and the
/// phase that doubles as loading flag and success indicator.
#[derive(Debug, Default)]
pub struct FeedbackFormState {
    pub draft: FeedbackDraft,
    pub errors: FieldErrors,
    pub phase: FormPhase,
    generation: u64,
}

impl FeedbackFormState {
    /// Applies a partial edit. Each touched field loses its validation message.
    pub fn apply(&mut self, update: FeedbackUpdate) -> Result<(), FormError> {
        ensure_editing(self.phase)?;

        if let Some(course) = update.course {
            self.draft.course = Some(course);
            self.errors.remove(&FeedbackField::Course);
        }
        if let Some(faculty) = update.faculty {
            self.draft.faculty = Some(faculty);
            self.errors.remove(&FeedbackField::Faculty);
        }
        if let Some(rating) = update.teaching_quality {
            self.draft.teaching_quality = rating;
            self.errors.remove(&FeedbackField::TeachingQuality);
        }
        if let Some(rating) = update.course_content {
            self.draft.course_content = rating;
            self.errors.remove(&FeedbackField::CourseContent);
        }
        if let Some(rating) = update.communication {
            self.draft.communication = rating;
            self.errors.remove(&FeedbackField::Communication);
        }
        if let Some(rating) = update.overall_satisfaction {
            self.draft.overall_satisfaction = rating;
            self.errors.remove(&FeedbackField::OverallSatisfaction);
        }
        if let Some(comments) = update.comments {
            self.draft.comments = comments;
            self.errors.remove(&FeedbackField::Comments);
        }
        Ok(())
    }

    /// Checks every field and collects all problems instead of stopping at the first.
    pub fn validate(
        &self,
        courses: &[Course],
        faculty: &[FacultyMember],
    ) -> Result<FeedbackSubmission, FieldErrors> {
        let mut errors = FieldErrors::new();
        let draft = &self.draft;

        let course = draft
            .course
            .and_then(|id| courses.iter().find(|course| course.id == id));
        if course.is_none() {
            errors.insert(FeedbackField::Course, "Please select a course".to_string());
        }

        let member = draft
            .faculty
            .and_then(|id| faculty.iter().find(|member| member.id == id));
        if member.is_none() {
            errors.insert(
                FeedbackField::Faculty,
                "Please select a faculty member".to_string(),
            );
        }

        let ratings = [
            (FeedbackField::TeachingQuality, draft.teaching_quality),
            (FeedbackField::CourseContent, draft.course_content),
            (FeedbackField::Communication, draft.communication),
            (FeedbackField::OverallSatisfaction, draft.overall_satisfaction),
        ];
        for (field, rating) in ratings {
            if let Some(message) = rating_error(field, rating) {
                errors.insert(field, message);
            }
        }

        if draft.comments.trim().is_empty() {
            errors.insert(FeedbackField::Comments, "Please provide comments".to_string());
        }

        match (course, member) {
            (Some(course), Some(member)) if errors.is_empty() => Ok(FeedbackSubmission {
                course: course.clone(),
                faculty: member.clone(),
                teaching_quality: draft.teaching_quality,
                course_content: draft.course_content,
                communication: draft.communication,
                overall_satisfaction: draft.overall_satisfaction,
                comments: draft.comments.trim().to_string(),
            }),
            _ => Err(errors),
        }
    }
}

impl Resettable for FeedbackFormState {
    fn generation(&self) -> u64 {
        self.generation
    }

    fn reset(&mut self) {
        self.draft = FeedbackDraft::default();
        self.errors.clear();
        self.phase = FormPhase::Editing;
        self.generation += 1;
    }
}

fn rating_error(field: FeedbackField, rating: u8) -> Option<String> {
    let label = match field {
        FeedbackField::TeachingQuality => "teaching quality",
        FeedbackField::CourseContent => "course content",
        FeedbackField::Communication => "communication",
        FeedbackField::OverallSatisfaction => "overall satisfaction",
        _ => return None,
    };

    match rating {
        0 => Some(format!("Please rate {label}")),
        1..=MAX_RATING => None,
        _ => {
            let mut chars = label.chars();
            let capitalized: String = chars
                .next()
                .map(|first| first.to_uppercase().chain(chars).collect())
                .unwrap_or_default();
            Some(format!("{capitalized} must be between 1 and {MAX_RATING}"))
        }
    }
}

/// submit_feedback
///
/// Validates the draft, holds the loading state for the simulated round-trip, raises the
/// success indicator and schedules the reset. The submission itself goes nowhere.
pub async fn submit_feedback(
    form: &FeedbackFormHandle,
    catalog: &dyn Catalog,
    latency: &Latency,
) -> Result<FeedbackReceipt, FormError> {
    let courses = catalog.courses().await;
    let faculty = catalog.faculty().await;

    let (submission, generation) = {
        let mut state = form.lock().await;
        ensure_editing(state.phase)?;

        match state.validate(&courses, &faculty) {
            Ok(submission) => {
                state.errors.clear();
                state.phase = FormPhase::Submitting;
                (submission, state.generation)
            }
            Err(errors) => {
                state.errors = errors.clone();
                return Err(FormError::InvalidFields(errors));
            }
        }
    };

    tokio::time::sleep(latency.feedback_submit).await;

    let receipt = FeedbackReceipt {
        id: Uuid::new_v4(),
        course: submission.course.name.clone(),
        faculty: submission.faculty.name.clone(),
        submitted_at: Utc::now(),
    };

    {
        let mut state = form.lock().await;
        // A logout during the round-trip already cleared the form.
        if state.generation == generation {
            state.phase = FormPhase::Submitted;
            schedule_reset(form.clone(), generation, latency.feedback_reset);
        }
    }

    tracing::info!(
        receipt = %receipt.id,
        course = %receipt.course,
        faculty = %receipt.faculty,
        overall = submission.overall_satisfaction,
        "feedback submitted"
    );
    Ok(receipt)
}

// --- Form Builder ---

/// FormBuilderState
///
/// The faculty member's form under construction. Always holds at least one question slot.
#[derive(Debug)]
pub struct FormBuilderState {
    pub title: String,
    pub description: String,
    questions: Vec<String>,
    pub error: Option<String>,
    pub phase: FormPhase,
    generation: u64,
}

impl Default for FormBuilderState {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            questions: vec![String::new()],
            error: None,
            phase: FormPhase::Editing,
            generation: 0,
        }
    }
}

impl FormBuilderState {
    pub fn questions(&self) -> &[String] {
        &self.questions
    }

    pub fn view(&self) -> FormBuilderView {
        FormBuilderView {
            title: self.title.clone(),
            description: self.description.clone(),
            questions: self.questions.clone(),
            can_delete: self.questions.len() > 1,
            error: self.error.clone(),
            phase: self.phase,
        }
    }

    pub fn set_details(&mut self, update: FormDetailsUpdate) -> Result<(), FormError> {
        ensure_editing(self.phase)?;
        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        Ok(())
    }

    /// Appends an empty question slot and returns its index.
    pub fn add_question(&mut self) -> Result<usize, FormError> {
        ensure_editing(self.phase)?;
        self.questions.push(String::new());
        Ok(self.questions.len() - 1)
    }

    pub fn update_question(&mut self, index: usize, text: String) -> Result<(), FormError> {
        ensure_editing(self.phase)?;
        let slot = self
            .questions
            .get_mut(index)
            .ok_or(FormError::QuestionNotFound(index))?;
        *slot = text;
        Ok(())
    }

    /// Deletes the question at `index`. The last remaining slot cannot be deleted.
    pub fn remove_question(&mut self, index: usize) -> Result<(), FormError> {
        ensure_editing(self.phase)?;
        if index >= self.questions.len() {
            return Err(FormError::QuestionNotFound(index));
        }
        if self.questions.len() == 1 {
            return Err(FormError::LastQuestion);
        }
        self.questions.remove(index);
        Ok(())
    }

    /// Title first, then at least one non-blank question. Blank slots are dropped.
    pub fn validate(&self, created_by: &str) -> Result<FormDefinition, FormError> {
        if self.title.trim().is_empty() {
            return Err(FormError::MissingField("Please enter a form title"));
        }

        let questions: Vec<String> = self
            .questions
            .iter()
            .map(|question| question.trim())
            .filter(|question| !question.is_empty())
            .map(str::to_string)
            .collect();
        if questions.is_empty() {
            return Err(FormError::NoQuestions);
        }

        let description = Some(self.description.trim())
            .filter(|description| !description.is_empty())
            .map(str::to_string);

        Ok(FormDefinition {
            title: self.title.trim().to_string(),
            description,
            questions,
            created_by: created_by.to_string(),
            created_at: Utc::now(),
        })
    }
}

impl Resettable for FormBuilderState {
    fn generation(&self) -> u64 {
        self.generation
    }

    fn reset(&mut self) {
        let generation = self.generation + 1;
        *self = FormBuilderState {
            generation,
            ..FormBuilderState::default()
        };
    }
}

/// submit_form
///
/// Validates the form being built. On success the success indicator is raised at once and the
/// builder is emptied after `reset_delay`.
pub async fn submit_form(
    builder: &FormBuilderHandle,
    created_by: &str,
    reset_delay: Duration,
) -> Result<FormDefinition, FormError> {
    let mut state = builder.lock().await;
    ensure_editing(state.phase)?;
    state.error = None;

    let definition = match state.validate(created_by) {
        Ok(definition) => definition,
        Err(err) => {
            state.error = Some(err.to_string());
            return Err(err);
        }
    };

    state.phase = FormPhase::Submitted;
    schedule_reset(builder.clone(), state.generation, reset_delay);

    tracing::info!(
        title = %definition.title,
        questions = definition.questions.len(),
        created_by = %definition.created_by,
        "feedback form created"
    );
    Ok(definition)
}

fn ensure_editing(phase: FormPhase) -> Result<(), FormError> {
    match phase {
        FormPhase::Editing => Ok(()),
        FormPhase::Submitting | FormPhase::Submitted => Err(FormError::InProgress),
    }
}
