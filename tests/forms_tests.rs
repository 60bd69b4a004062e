use course_feedback::{
    DemoCatalog,
    config::Latency,
    error::FormError,
    forms::{self, FeedbackFormHandle, FormBuilderHandle, Resettable},
    models::{FeedbackDraft, FeedbackField, FeedbackUpdate, FormDetailsUpdate, FormPhase},
};
use std::time::Duration;

// --- Helpers ---

fn complete_update() -> FeedbackUpdate {
    FeedbackUpdate {
        course: Some(1),
        faculty: Some(2),
        teaching_quality: Some(5),
        course_content: Some(4),
        communication: Some(3),
        overall_satisfaction: Some(4),
        comments: Some("Great pacing, more exercises please.".to_string()),
    }
}

async fn filled_form() -> FeedbackFormHandle {
    let form = FeedbackFormHandle::default();
    form.lock().await.apply(complete_update()).unwrap();
    form
}

// --- Feedback validation ---

#[tokio::test]
async fn test_empty_draft_reports_every_field() {
    let form = FeedbackFormHandle::default();
    let err = forms::submit_feedback(&form, &DemoCatalog::new(), &Latency::instant())
        .await
        .unwrap_err();

    let errors = match err {
        FormError::InvalidFields(errors) => errors,
        other => panic!("expected field errors, got {other:?}"),
    };
    assert_eq!(errors.len(), 7);
    assert_eq!(errors[&FeedbackField::Course], "Please select a course");
    assert_eq!(errors[&FeedbackField::Faculty], "Please select a faculty member");
    assert_eq!(
        errors[&FeedbackField::TeachingQuality],
        "Please rate teaching quality"
    );
    assert_eq!(errors[&FeedbackField::CourseContent], "Please rate course content");
    assert_eq!(errors[&FeedbackField::Communication], "Please rate communication");
    assert_eq!(
        errors[&FeedbackField::OverallSatisfaction],
        "Please rate overall satisfaction"
    );
    assert_eq!(errors[&FeedbackField::Comments], "Please provide comments");

    // The messages stay on the form until the fields are edited.
    let state = form.lock().await;
    assert_eq!(state.errors, errors);
    assert_eq!(state.phase, FormPhase::Editing);
}

#[tokio::test]
async fn test_editing_a_field_clears_only_its_error() {
    let form = FeedbackFormHandle::default();
    let _ = forms::submit_feedback(&form, &DemoCatalog::new(), &Latency::instant()).await;

    let mut state = form.lock().await;
    state
        .apply(FeedbackUpdate {
            course: Some(3),
            comments: Some("ok".to_string()),
            ..FeedbackUpdate::default()
        })
        .unwrap();

    assert!(!state.errors.contains_key(&FeedbackField::Course));
    assert!(!state.errors.contains_key(&FeedbackField::Comments));
    assert!(state.errors.contains_key(&FeedbackField::Faculty));
    assert_eq!(state.errors.len(), 5);
}

#[tokio::test]
async fn test_unknown_selection_and_out_of_range_rating() {
    let form = filled_form().await;
    form.lock()
        .await
        .apply(FeedbackUpdate {
            course: Some(99),
            communication: Some(7),
            comments: Some("   ".to_string()),
            ..FeedbackUpdate::default()
        })
        .unwrap();

    let err = forms::submit_feedback(&form, &DemoCatalog::new(), &Latency::instant())
        .await
        .unwrap_err();
    let errors = match err {
        FormError::InvalidFields(errors) => errors,
        other => panic!("expected field errors, got {other:?}"),
    };

    assert_eq!(errors.len(), 3);
    assert_eq!(errors[&FeedbackField::Course], "Please select a course");
    assert_eq!(
        errors[&FeedbackField::Communication],
        "Communication must be between 1 and 5"
    );
    assert_eq!(errors[&FeedbackField::Comments], "Please provide comments");
}

// --- Feedback lifecycle ---

#[tokio::test(start_paused = true)]
async fn test_valid_submit_shows_success_then_resets() {
    let form = filled_form().await;
    let latency = Latency::default();
    let catalog = DemoCatalog::new();

    let (receipt, ()) = tokio::join!(
        forms::submit_feedback(&form, &catalog, &latency),
        async {
            // Halfway through the simulated round-trip.
            tokio::time::sleep(Duration::from_millis(400)).await;
            let mut state = form.lock().await;
            assert_eq!(state.phase, FormPhase::Submitting);
            assert_eq!(
                state.apply(FeedbackUpdate::default()),
                Err(FormError::InProgress)
            );
        }
    );

    let receipt = receipt.unwrap();
    assert_eq!(receipt.course, "Introduction to React");
    assert_eq!(receipt.faculty, "Prof. Sarah Johnson");
    assert_eq!(form.lock().await.phase, FormPhase::Submitted);

    // A second submit while the success indicator is up is refused.
    assert_eq!(
        forms::submit_feedback(&form, &catalog, &latency)
            .await
            .unwrap_err(),
        FormError::InProgress
    );

    tokio::time::sleep(Duration::from_millis(2900)).await;
    assert_eq!(form.lock().await.phase, FormPhase::Submitted);

    tokio::time::sleep(Duration::from_millis(200)).await;
    let state = form.lock().await;
    assert_eq!(state.phase, FormPhase::Editing);
    assert_eq!(state.draft, FeedbackDraft::default());
    assert!(state.errors.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_stale_reset_timer_leaves_new_submission_alone() {
    let form = filled_form().await;
    let latency = Latency::default();
    let catalog = DemoCatalog::new();

    // First cycle: success at 800ms, reset due at 3800ms.
    forms::submit_feedback(&form, &catalog, &latency).await.unwrap();

    // Cleared early (as on logout) and submitted again at 1000ms.
    tokio::time::sleep(Duration::from_millis(200)).await;
    {
        let mut state = form.lock().await;
        state.reset();
        state.apply(complete_update()).unwrap();
    }
    forms::submit_feedback(&form, &catalog, &latency).await.unwrap();

    // 4000ms: the first timer has fired and must not have touched the second cycle.
    tokio::time::sleep(Duration::from_millis(2200)).await;
    assert_eq!(form.lock().await.phase, FormPhase::Submitted);

    // 4900ms: the second timer has fired.
    tokio::time::sleep(Duration::from_millis(900)).await;
    assert_eq!(form.lock().await.phase, FormPhase::Editing);
}

#[tokio::test(start_paused = true)]
async fn test_reset_during_submission_discards_success() {
    let form = filled_form().await;
    let latency = Latency::default();
    let catalog = DemoCatalog::new();

    let (receipt, ()) = tokio::join!(
        forms::submit_feedback(&form, &catalog, &latency),
        async {
            tokio::time::sleep(Duration::from_millis(400)).await;
            form.lock().await.reset();
        }
    );

    assert!(receipt.is_ok());
    let state = form.lock().await;
    assert_eq!(state.phase, FormPhase::Editing);
    assert_eq!(state.draft, FeedbackDraft::default());
}

// --- Form builder ---

#[tokio::test]
async fn test_builder_validation_messages() {
    let builder = FormBuilderHandle::default();

    let err = forms::submit_form(&builder, "Dr. Smith", Duration::ZERO)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Please enter a form title");
    assert_eq!(
        builder.lock().await.view().error.as_deref(),
        Some("Please enter a form title")
    );

    {
        let mut state = builder.lock().await;
        state
            .set_details(FormDetailsUpdate {
                title: Some("Midterm Feedback".to_string()),
                description: None,
            })
            .unwrap();
        state.add_question().unwrap();
        state.update_question(1, "   ".to_string()).unwrap();
    }

    let err = forms::submit_form(&builder, "Dr. Smith", Duration::ZERO)
        .await
        .unwrap_err();
    assert_eq!(err, FormError::NoQuestions);
    assert_eq!(err.to_string(), "Please add at least one question");
}

#[tokio::test]
async fn test_builder_question_indices() {
    let builder = FormBuilderHandle::default();
    let mut state = builder.lock().await;

    assert_eq!(state.questions().len(), 1);
    assert!(!state.view().can_delete);
    assert_eq!(
        state.update_question(1, "Too far".to_string()),
        Err(FormError::QuestionNotFound(1))
    );
    assert_eq!(state.remove_question(3), Err(FormError::QuestionNotFound(3)));
    assert_eq!(state.remove_question(0), Err(FormError::LastQuestion));

    assert_eq!(state.add_question(), Ok(1));
    state.update_question(0, "First".to_string()).unwrap();
    state.update_question(1, "Second".to_string()).unwrap();
    assert!(state.view().can_delete);

    state.remove_question(0).unwrap();
    assert_eq!(state.questions(), &["Second".to_string()]);
}

#[tokio::test(start_paused = true)]
async fn test_builder_submit_keeps_non_blank_questions_then_resets() {
    let builder = FormBuilderHandle::default();
    {
        let mut state = builder.lock().await;
        state
            .set_details(FormDetailsUpdate {
                title: Some("  Course Review  ".to_string()),
                description: Some("   ".to_string()),
            })
            .unwrap();
        state.update_question(0, "How clear were the lectures?".to_string()).unwrap();
        state.add_question().unwrap();
        state.add_question().unwrap();
        state.update_question(2, " Would you recommend it? ".to_string()).unwrap();
    }

    let definition = forms::submit_form(&builder, "Prof. Sarah Johnson", Duration::from_millis(2000))
        .await
        .unwrap();

    assert_eq!(definition.title, "Course Review");
    assert_eq!(definition.description, None);
    assert_eq!(
        definition.questions,
        vec![
            "How clear were the lectures?".to_string(),
            "Would you recommend it?".to_string()
        ]
    );
    assert_eq!(definition.created_by, "Prof. Sarah Johnson");

    {
        let mut state = builder.lock().await;
        assert_eq!(state.phase, FormPhase::Submitted);
        assert_eq!(state.add_question(), Err(FormError::InProgress));
    }

    tokio::time::sleep(Duration::from_millis(2100)).await;
    let view = builder.lock().await.view();
    assert_eq!(view.phase, FormPhase::Editing);
    assert!(view.title.is_empty());
    assert_eq!(view.questions, vec![String::new()]);
    assert_eq!(view.error, None);
}
