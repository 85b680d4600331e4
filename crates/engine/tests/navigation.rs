use pipegate_api::{CloudBackend, FixtureBackend, RecordedCall};
use pipegate_engine::presentation;
use pipegate_engine::{
    ActionKind, Catalog, Choice, Fetched, InputMode, LocatorOptions, LocatorStep, OperationSpec, PreconditionError, ProviderSpec,
    ScreenId, TargetItem, TaskCompletion, TaskOutcome, TaskPayload, TaskRequest, Transition, ValidationError, Wizard,
};
use pipegate_types::{ApprovalItem, InputEvent, Locator, ResourceItem};

const FIXTURE: &str = r#"
profiles: [default, staging]
regions: [us-east-1, eu-west-1]
accounts:
  default/us-east-1:
    approvals:
      - { collection_name: pipe1, stage_name: Approve, action_name: Gate, token: tok-1 }
    pipelines:
      - name: pipe1
        stages: [{ name: Source, status: Succeeded }]
      - name: pipe2
  staging/us-east-1:
    fail:
      list_approvals: "access denied"
  staging/nowhere-1:
    fail:
      open_session: "could not resolve endpoint"
"#;

fn backend() -> FixtureBackend {
    FixtureBackend::from_yaml_str(FIXTURE).expect("fixture parses")
}

fn wizard_for(backend: &FixtureBackend) -> Wizard {
    Wizard::new(LocatorOptions {
        profiles: backend.list_locator_options(),
        regions: backend.fixed_region_list(),
    })
}

fn aws() -> &'static ProviderSpec {
    Catalog::global().provider("aws").expect("aws provider")
}

fn operation(id: &str) -> &'static OperationSpec {
    aws()
        .service("codepipeline")
        .and_then(|service| service.category("operations"))
        .and_then(|category| category.operation(id))
        .expect("operation exists")
}

fn gate_approval() -> ApprovalItem {
    ApprovalItem {
        collection_name: "pipe1".into(),
        stage_name: "Approve".into(),
        action_name: "Gate".into(),
        token: "tok-1".into(),
    }
}

/// Performs a request against the fixture the way the terminal runtime does.
async fn perform(backend: &FixtureBackend, request: TaskRequest) -> TaskOutcome {
    let result = match request {
        TaskRequest::OpenSession { locator } => backend.open_session(&locator).await.map(TaskPayload::SessionOpened),
        TaskRequest::ListPendingApprovals { session } => {
            session.list_pending_approvals().await.map(TaskPayload::ApprovalsFetched)
        }
        TaskRequest::ListResourceStatus { session } => session.list_resource_status().await.map(TaskPayload::StatusFetched),
        TaskRequest::DecideApproval {
            session,
            item,
            approved,
            comment,
        } => session
            .decide_approval(&item, approved, &comment)
            .await
            .map(|()| TaskPayload::ActionCompleted {
                summary: format!("decided {}", item.label()),
            }),
        TaskRequest::TriggerResource {
            session,
            resource_name,
            revision,
        } => session
            .trigger_resource(&resource_name, revision.as_deref())
            .await
            .map(|()| TaskPayload::ActionCompleted {
                summary: format!("started {resource_name}"),
            }),
    };
    match result {
        Ok(payload) => TaskOutcome::Success(payload),
        Err(error) => TaskOutcome::Failure(error.to_string()),
    }
}

/// Runs the transition's task, if any, and applies its completion.
async fn settle(backend: &FixtureBackend, transition: Transition) -> Wizard {
    match transition.task {
        Some(task) => {
            let outcome = perform(backend, task.request).await;
            transition.wizard.complete(TaskCompletion {
                ticket: task.ticket,
                outcome,
            })
        }
        None => transition.wizard,
    }
}

async fn press(backend: &FixtureBackend, wizard: Wizard, event: InputEvent) -> Wizard {
    settle(backend, wizard.handle(event).expect("event accepted")).await
}

async fn choose(backend: &FixtureBackend, wizard: Wizard, choice: Choice) -> Wizard {
    settle(backend, wizard.advance(choice).expect("choice accepted")).await
}

fn type_text(wizard: Wizard, text: &str) -> Wizard {
    text.chars().fold(wizard, |wizard, c| {
        wizard.handle(InputEvent::Character(c)).expect("character accepted").wizard
    })
}

async fn to_operations(backend: &FixtureBackend, profile: &str) -> Wizard {
    let service = aws().service("codepipeline").expect("codepipeline");
    let category = service.category("operations").expect("operations");

    let wizard = choose(backend, wizard_for(backend), Choice::Provider(aws())).await;
    let wizard = choose(backend, wizard, Choice::Profile(profile.into())).await;
    let wizard = choose(backend, wizard, Choice::Region("us-east-1".into())).await;
    assert_eq!(wizard.screen(), ScreenId::ChooseService);
    let wizard = choose(backend, wizard, Choice::Service(service)).await;
    choose(backend, wizard, Choice::Category(category)).await
}

#[tokio::test]
async fn approving_a_pending_approval_returns_to_operations() {
    let backend = backend();
    let wizard = to_operations(&backend, "default").await;
    assert_eq!(wizard.screen(), ScreenId::ChooseOperation);

    // Manual Approval is the first operation.
    let wizard = press(&backend, wizard, InputEvent::Confirm).await;
    assert_eq!(wizard.screen(), ScreenId::ChooseTarget);
    assert_eq!(
        presentation::rows(&wizard),
        vec![vec!["pipe1".to_string(), "Approve".to_string(), "Gate".to_string()]]
    );

    let wizard = press(&backend, wizard, InputEvent::Confirm).await;
    assert_eq!(wizard.screen(), ScreenId::ConfirmAction);
    let wizard = press(&backend, wizard, InputEvent::Confirm).await;
    assert_eq!(wizard.screen(), ScreenId::EnterComment);
    assert_eq!(wizard.selection().action(), Some(ActionKind::Approve));
    assert!(wizard.input().is_manual());

    let wizard = type_text(wizard, "looks good");
    let transition = wizard.handle(InputEvent::Confirm).expect("comment accepted");
    assert_eq!(transition.wizard.screen(), ScreenId::Executing);
    assert!(transition.wizard.is_busy());
    match &transition.task.as_ref().expect("execution task").request {
        TaskRequest::DecideApproval {
            item, approved, comment, ..
        } => {
            assert_eq!(item.token, "tok-1");
            assert!(*approved);
            assert_eq!(comment, "looks good");
        }
        other => panic!("unexpected request {other:?}"),
    }

    let wizard = settle(&backend, transition).await;
    assert_eq!(wizard.screen(), ScreenId::ChooseOperation);
    assert_eq!(wizard.selection().operation(), Some(operation("manual-approval")));
    assert!(wizard.selection().fetched().is_none());
    assert!(wizard.selection().target().is_none());
    assert!(wizard.notice().is_some());
    assert_eq!(
        backend.journal().await,
        vec![RecordedCall::Decision {
            locator: Locator::new("default", "us-east-1"),
            token: "tok-1".into(),
            approved: true,
            comment: "looks good".into(),
        }]
    );

    // The list is fetched again; the decided approval is gone.
    let wizard = press(&backend, wizard, InputEvent::Confirm).await;
    assert_eq!(wizard.screen(), ScreenId::ChooseTarget);
    assert!(presentation::rows(&wizard).is_empty());
    assert!(presentation::empty_message(&wizard).is_some());
}

#[tokio::test]
async fn empty_manual_submission_only_leaves_manual_mode() {
    let backend = backend();
    let wizard = choose(&backend, wizard_for(&backend), Choice::Provider(aws())).await;
    let before = choose(&backend, wizard, Choice::Profile("default".into())).await;
    assert_eq!(before.locator_step(), LocatorStep::Region);

    let manual = press(&backend, before.clone(), InputEvent::ToggleMode).await;
    assert!(manual.input().is_manual());

    let after = press(&backend, manual, InputEvent::Confirm).await;
    assert_eq!(after, before);
    assert!(!after.is_busy());
}

#[tokio::test]
async fn manual_row_enters_manual_mode() {
    let backend = backend();
    let wizard = choose(&backend, wizard_for(&backend), Choice::Provider(aws())).await;
    assert_eq!(wizard.cursor(), 0);
    let wizard = press(&backend, wizard, InputEvent::Confirm).await;
    assert_eq!(wizard.input(), &InputMode::Manual(Default::default()));
    assert_eq!(wizard.screen(), ScreenId::ChooseLocator);

    // Cancel leaves manual mode before it leaves the screen.
    let wizard = press(&backend, wizard, InputEvent::Cancel).await;
    assert_eq!(wizard.screen(), ScreenId::ChooseLocator);
    assert!(!wizard.input().is_manual());
}

#[tokio::test]
async fn failed_fetch_shows_error_and_cancel_keeps_operation() {
    let backend = backend();
    let wizard = to_operations(&backend, "staging").await;

    let wizard = press(&backend, wizard, InputEvent::Confirm).await;
    assert_eq!(wizard.screen(), ScreenId::Error);
    let failure = wizard.failure().expect("failure recorded");
    assert_eq!(failure.message, "access denied");
    assert_eq!(failure.origin, ScreenId::ChooseOperation);

    // Input other than cancel is ignored on the error screen.
    let ignored = press(&backend, wizard.clone(), InputEvent::Confirm).await;
    assert_eq!(ignored, wizard);

    let wizard = press(&backend, wizard, InputEvent::Cancel).await;
    assert_eq!(wizard.screen(), ScreenId::ChooseOperation);
    assert_eq!(wizard.selection().operation(), Some(operation("manual-approval")));
    assert!(wizard.failure().is_none());
    assert_eq!(wizard.cursor(), 0);

    let retry = wizard.handle(InputEvent::Confirm).expect("retry accepted");
    assert!(matches!(
        retry.task.map(|task| task.request),
        Some(TaskRequest::ListPendingApprovals { .. })
    ));
}

fn approval_path() -> Vec<Choice> {
    let service = aws().service("codepipeline").expect("codepipeline");
    let category = service.category("operations").expect("operations");
    vec![
        Choice::Provider(aws()),
        Choice::Profile("default".into()),
        Choice::Region("us-east-1".into()),
        Choice::Service(service),
        Choice::Category(category),
        Choice::Operation(operation("manual-approval")),
        Choice::Target(TargetItem::Approval(gate_approval())),
        Choice::Action(ActionKind::Reject),
        Choice::Text("not today".into()),
    ]
}

fn pipeline_path(action: ActionKind) -> Vec<Choice> {
    let mut path = approval_path();
    path.truncate(5);
    path.push(Choice::Operation(operation("start-pipeline")));
    path.push(Choice::Target(TargetItem::Pipeline(ResourceItem::named("pipe1"))));
    path.push(Choice::Action(action));
    if action == ActionKind::StartAtRevision {
        path.push(Choice::Text("abc123".into()));
    }
    path
}

#[tokio::test]
async fn retreat_undoes_any_sequence_of_advances() {
    let paths = [
        approval_path(),
        pipeline_path(ActionKind::Start),
        pipeline_path(ActionKind::StartAtRevision),
    ];
    for path in paths {
        for steps in 1..=path.len() {
            let backend = backend();
            let mut wizard = wizard_for(&backend);
            for (index, choice) in path[..steps].iter().cloned().enumerate() {
                let transition = wizard.advance(choice).expect("choice accepted");
                wizard = if index + 1 < steps {
                    settle(&backend, transition).await
                } else {
                    transition.wizard
                };
            }
            assert_eq!(wizard.selection().len(), steps);

            for _ in 0..steps {
                wizard = wizard.retreat();
            }
            assert_eq!(wizard.screen(), ScreenId::INITIAL, "after {steps} steps");
            assert!(wizard.selection().is_empty(), "after {steps} steps");
            assert!(!wizard.is_busy());
            assert_eq!(wizard.retreat(), wizard);
        }
    }
}

#[tokio::test]
async fn typed_values_match_list_picks() {
    let backend = backend();
    let at_profiles = choose(&backend, wizard_for(&backend), Choice::Provider(aws())).await;

    let picked = press(&backend, at_profiles.clone(), InputEvent::NavigateDown).await;
    let picked = press(&backend, picked, InputEvent::Confirm).await;
    let typed = press(&backend, at_profiles, InputEvent::ToggleMode).await;
    let typed = type_text(typed, "default");
    let typed = press(&backend, typed, InputEvent::Confirm).await;
    assert_eq!(picked, typed);

    let session = backend
        .open_session(&Locator::new("default", "us-east-1"))
        .await
        .expect("session opens");
    let picked = picked
        .handle(InputEvent::NavigateDown)
        .expect("down")
        .wizard
        .handle(InputEvent::Confirm)
        .expect("region picked");
    let typed = type_text(typed.toggle_mode(), "us-east-1")
        .handle(InputEvent::Confirm)
        .expect("region typed");
    assert_eq!(picked.task, typed.task);
    let ticket = picked.task.as_ref().expect("session task").ticket;
    let completion = TaskCompletion {
        ticket,
        outcome: TaskOutcome::Success(TaskPayload::SessionOpened(session)),
    };
    assert_eq!(
        picked.wizard.complete(completion.clone()),
        typed.wizard.complete(completion)
    );
}

#[tokio::test]
async fn typed_pipeline_name_resolves_to_the_listed_item() {
    let backend = backend();
    let wizard = to_operations(&backend, "default").await;
    let wizard = choose(&backend, wizard, Choice::Operation(operation("start-pipeline"))).await;
    assert_eq!(wizard.screen(), ScreenId::ChooseTarget);
    assert_eq!(presentation::rows(&wizard).len(), 3);

    let picked = press(&backend, wizard.clone(), InputEvent::NavigateDown).await;
    let picked = press(&backend, picked, InputEvent::Confirm).await;
    let typed = type_text(wizard.toggle_mode(), "pipe1");
    let typed = press(&backend, typed, InputEvent::Confirm).await;
    assert_eq!(picked, typed);
    match picked.selection().target() {
        Some(TargetItem::Pipeline(item)) => assert_eq!(item.stages.len(), 1),
        other => panic!("unexpected target {other:?}"),
    }

    // An unlisted name is still accepted and fails remotely.
    let unknown = type_text(wizard.toggle_mode(), "pipe9");
    let unknown = press(&backend, unknown, InputEvent::Confirm).await;
    assert_eq!(unknown.screen(), ScreenId::ConfirmAction);
    let failed = press(&backend, unknown, InputEvent::Confirm).await;
    assert_eq!(failed.screen(), ScreenId::Error);
    assert_eq!(
        failed.failure().map(|failure| failure.message.as_str()),
        Some("pipeline 'pipe9' not found")
    );
    let back = failed.retreat();
    assert_eq!(back.screen(), ScreenId::ConfirmAction);
    assert_eq!(back.selection().action(), Some(ActionKind::Start));
}

#[tokio::test]
async fn choosing_another_operation_drops_the_old_records() {
    let backend = backend();
    let wizard = to_operations(&backend, "default").await;
    let wizard = choose(&backend, wizard, Choice::Operation(operation("manual-approval"))).await;
    let wizard = choose(&backend, wizard, Choice::Target(TargetItem::Approval(gate_approval()))).await;
    assert_eq!(wizard.screen(), ScreenId::ConfirmAction);

    let wizard = wizard.retreat();
    assert_eq!(wizard.screen(), ScreenId::ChooseTarget);
    assert!(wizard.selection().target().is_none());
    assert_eq!(wizard.cursor(), 0);

    let wizard = wizard.retreat();
    assert_eq!(wizard.screen(), ScreenId::ChooseOperation);
    assert!(wizard.selection().operation().is_none());

    let wizard = choose(&backend, wizard, Choice::Operation(operation("start-pipeline"))).await;
    assert!(matches!(wizard.selection().fetched(), Some(Fetched::Pipelines(_))));
    assert_eq!(wizard.selection().len(), 6);
}

#[tokio::test]
async fn late_completion_for_abandoned_task_is_ignored() {
    let backend = backend();
    let wizard = choose(&backend, wizard_for(&backend), Choice::Provider(aws())).await;
    let wizard = choose(&backend, wizard, Choice::Profile("default".into())).await;

    let transition = wizard.advance(Choice::Region("eu-west-1".into())).expect("region accepted");
    let task = transition.task.expect("session task");
    assert!(transition.wizard.is_busy());

    let abandoned = transition.wizard.handle(InputEvent::Cancel).expect("cancel").wizard;
    assert!(!abandoned.is_busy());
    assert_eq!(abandoned.screen(), ScreenId::ChooseLocator);
    assert_eq!(abandoned.locator_step(), LocatorStep::Region);
    assert!(abandoned.selection().locator().is_none());
    // Cursor returns to the abandoned region (row 0 is manual entry).
    assert_eq!(abandoned.cursor(), 2);

    let outcome = perform(&backend, task.request).await;
    let late = abandoned.complete(TaskCompletion {
        ticket: task.ticket,
        outcome,
    });
    assert_eq!(late, abandoned);

    let retry = abandoned.handle(InputEvent::Confirm).expect("retry");
    assert_ne!(retry.task.map(|task| task.ticket), Some(task.ticket));
}

#[tokio::test]
async fn completion_is_applied_exactly_once() {
    let backend = backend();
    let wizard = choose(&backend, wizard_for(&backend), Choice::Provider(aws())).await;
    let wizard = choose(&backend, wizard, Choice::Profile("default".into())).await;
    let transition = wizard.advance(Choice::Region("us-east-1".into())).expect("region accepted");
    let task = transition.task.expect("session task");

    let still_busy = transition.wizard.complete(TaskCompletion {
        ticket: task.ticket,
        outcome: TaskOutcome::Busy,
    });
    assert!(still_busy.is_busy());

    let completion = TaskCompletion {
        ticket: task.ticket,
        outcome: perform(&backend, task.request).await,
    };
    let done = still_busy.complete(completion.clone());
    assert_eq!(done.screen(), ScreenId::ChooseService);
    assert_eq!(done.complete(completion), done);

    let duplicate_failure = done.complete(TaskCompletion {
        ticket: task.ticket,
        outcome: TaskOutcome::Failure("late".into()),
    });
    assert_eq!(duplicate_failure, done);
}

#[tokio::test]
async fn cancelling_execution_returns_to_the_prefilled_comment() {
    let backend = backend();
    let wizard = to_operations(&backend, "default").await;
    let wizard = choose(&backend, wizard, Choice::Operation(operation("manual-approval"))).await;
    let wizard = choose(&backend, wizard, Choice::Target(TargetItem::Approval(gate_approval()))).await;
    let wizard = choose(&backend, wizard, Choice::Action(ActionKind::Reject)).await;
    let wizard = type_text(wizard, "ship it");

    let executing = wizard.handle(InputEvent::Confirm).expect("comment accepted").wizard;
    assert_eq!(executing.screen(), ScreenId::Executing);

    let back = executing.handle(InputEvent::Cancel).expect("cancel").wizard;
    assert_eq!(back.screen(), ScreenId::EnterComment);
    assert!(!back.is_busy());
    assert!(back.selection().text().is_none());
    assert_eq!(back.input().buffer().map(|buffer| buffer.text()), Some("ship it"));
    assert!(backend.journal().await.is_empty());
}

#[tokio::test]
async fn cancelling_a_plain_start_returns_to_the_action_list() {
    let backend = backend();
    let wizard = to_operations(&backend, "default").await;
    let wizard = choose(&backend, wizard, Choice::Operation(operation("start-pipeline"))).await;
    let wizard = press(&backend, wizard, InputEvent::NavigateDown).await;
    let wizard = press(&backend, wizard, InputEvent::Confirm).await;
    assert_eq!(wizard.screen(), ScreenId::ConfirmAction);

    let executing = wizard.handle(InputEvent::Confirm).expect("start accepted");
    assert!(matches!(
        executing.task.as_ref().map(|task| &task.request),
        Some(TaskRequest::TriggerResource { revision: None, .. })
    ));
    assert_eq!(executing.wizard.screen(), ScreenId::Executing);

    let back = executing.wizard.handle(InputEvent::Cancel).expect("cancel").wizard;
    assert_eq!(back.screen(), ScreenId::ConfirmAction);
    assert!(!back.is_busy());
    assert!(back.selection().action().is_none());
    assert_eq!(back.cursor(), 0);
    assert!(backend.journal().await.is_empty());
}

#[tokio::test]
async fn failed_session_returns_to_the_typed_region() {
    let backend = backend();
    let wizard = choose(&backend, wizard_for(&backend), Choice::Provider(aws())).await;
    let wizard = choose(&backend, wizard, Choice::Profile("staging".into())).await;
    let wizard = type_text(wizard.toggle_mode(), "nowhere-1");
    let wizard = press(&backend, wizard, InputEvent::Confirm).await;

    assert_eq!(wizard.screen(), ScreenId::Error);
    let failure = wizard.failure().expect("failure recorded");
    assert_eq!(failure.message, "could not resolve endpoint");
    assert_eq!(failure.origin, ScreenId::ChooseLocator);

    let back = press(&backend, wizard, InputEvent::Cancel).await;
    assert_eq!(back.screen(), ScreenId::ChooseLocator);
    assert_eq!(back.locator_step(), LocatorStep::Region);
    assert_eq!(back.selection().len(), 3);
    assert!(back.selection().session().is_none());
    assert_eq!(back.input().buffer().map(|buffer| buffer.text()), Some("nowhere-1"));
}

#[tokio::test]
async fn comment_is_sent_exactly_as_typed() {
    let backend = backend();
    let wizard = to_operations(&backend, "default").await;
    let wizard = choose(&backend, wizard, Choice::Operation(operation("manual-approval"))).await;
    let wizard = choose(&backend, wizard, Choice::Target(TargetItem::Approval(gate_approval()))).await;
    let wizard = choose(&backend, wizard, Choice::Action(ActionKind::Approve)).await;

    // Fix a typo mid-line with the arrow keys.
    let wizard = type_text(wizard, "  lgtm, shp it ");
    let wizard = (0..5).fold(wizard, |wizard, _| {
        wizard.handle(InputEvent::CursorLeft).expect("cursor moved").wizard
    });
    let wizard = wizard.handle(InputEvent::Character('i')).expect("character accepted").wizard;
    let wizard = wizard.handle(InputEvent::CursorRight).expect("cursor moved").wizard;
    assert_eq!(wizard.input().buffer().map(|buffer| buffer.text()), Some("  lgtm, ship it "));

    let transition = wizard.handle(InputEvent::Confirm).expect("comment accepted");
    match transition.task.map(|task| task.request) {
        Some(TaskRequest::DecideApproval { comment, .. }) => assert_eq!(comment, "  lgtm, ship it "),
        other => panic!("unexpected request {other:?}"),
    }
}

#[tokio::test]
async fn blank_comment_is_rejected_with_a_hint() {
    let backend = backend();
    let wizard = to_operations(&backend, "default").await;
    let wizard = choose(&backend, wizard, Choice::Operation(operation("manual-approval"))).await;
    let wizard = choose(&backend, wizard, Choice::Target(TargetItem::Approval(gate_approval()))).await;
    let wizard = choose(&backend, wizard, Choice::Action(ActionKind::Approve)).await;

    let wizard = type_text(wizard, "   ");
    let transition = wizard.handle(InputEvent::Confirm).expect("submission handled");
    assert!(transition.task.is_none());
    assert_eq!(transition.wizard.screen(), ScreenId::EnterComment);
    assert_eq!(
        transition.wizard.validation(),
        Some(ValidationError::RequiredField { field: "comment" })
    );

    let edited = transition.wizard.handle(InputEvent::Backspace).expect("edit").wizard;
    assert!(edited.validation().is_none());
}

#[tokio::test]
async fn typed_values_are_rejected_where_no_manual_entry_exists() {
    let backend = backend();
    let wizard = wizard_for(&backend);
    assert_eq!(
        wizard.submit("aws").unwrap_err(),
        PreconditionError::WrongChoice {
            screen: ScreenId::ChooseProvider,
            choice: "typed",
        }
    );
}
