use roadmap_core::{
    DraftError, MemoryGateway, NoteDraft, Phase, Roadmap, RoadmapStore, Section, SectionPath,
    SelectionController, SelectionState, StoreConfig, Task, TaskDraft, TaskPath, UndoController,
    UndoState,
};
use std::sync::Arc;
use std::time::{Duration, Instant};

fn roadmap() -> Roadmap {
    Roadmap::new(vec![
        Phase::new(1, "Core").with_section(
            Section::new("Basics")
                .with_task(Task::new("read the book", None))
                .with_task(Task::new("write a cli", Some("2030-01-15"))),
        ),
        Phase::new(2, "Web")
            .with_section(Section::new("Http").with_task(Task::new("axum hello", None)))
            .with_section(Section::new("Db").with_task(Task::new("migrations", None))),
    ])
}

fn open_store(gateway: &MemoryGateway) -> RoadmapStore<&MemoryGateway> {
    RoadmapStore::open(gateway, &StoreConfig::default(), roadmap)
}

#[test]
fn unchecking_opens_an_undo_window_that_rechecks() {
    let gateway = MemoryGateway::new();
    let mut store = open_store(&gateway);
    let mut undo = UndoController::new(Duration::from_secs(4));
    let path = TaskPath::new(0, 0, 1);
    let start = Instant::now();

    undo.toggle(&mut store, path, start);
    assert_eq!(undo.state(), UndoState::Idle, "checking is not undoable");

    let unchecked = undo.toggle(&mut store, path, start);
    let id = unchecked.task(path).unwrap().id;
    assert!(!unchecked.task(path).unwrap().checked);
    assert_eq!(undo.pending(start + Duration::from_secs(1)), Some(id));

    let restored = undo
        .undo(&mut store, start + Duration::from_secs(2))
        .expect("undo should apply");
    assert!(restored.task(path).unwrap().checked);
    assert_eq!(undo.state(), UndoState::Idle);
    assert!(undo.undo(&mut store, start + Duration::from_secs(2)).is_none());
}

#[test]
fn undo_window_comes_from_config() {
    let config = StoreConfig::default().with_undo_timeout(Duration::from_millis(500));
    let undo = UndoController::from_config(&config);
    assert_eq!(undo.timeout(), Duration::from_millis(500));
    assert_eq!(UndoController::default().timeout(), Duration::from_secs(4));
}

#[test]
fn unbounded_undo_window_stays_open() {
    let gateway = MemoryGateway::new();
    let config = StoreConfig::default().with_undo_timeout(Duration::MAX);
    let mut store = RoadmapStore::open(&gateway, &config, roadmap);
    let mut undo = UndoController::from_config(&config);
    let path = TaskPath::new(0, 0, 0);
    let start = Instant::now();

    undo.toggle(&mut store, path, start);
    let unchecked = undo.toggle(&mut store, path, start);
    assert!(!unchecked.task(path).unwrap().checked);

    let later = start + Duration::from_secs(3_600);
    assert!(!undo.expire(later));
    let restored = undo.undo(&mut store, later).unwrap();
    assert!(restored.task(path).unwrap().checked);
}

#[test]
fn newer_uncheck_replaces_the_pending_one() {
    let gateway = MemoryGateway::new();
    let mut store = open_store(&gateway);
    let mut undo = UndoController::default();
    let first = TaskPath::new(0, 0, 0);
    let second = TaskPath::new(1, 1, 0);
    let start = Instant::now();

    store.toggle_task_checked(first);
    store.toggle_task_checked(second);
    undo.toggle(&mut store, first, start);
    undo.toggle(&mut store, second, start + Duration::from_secs(1));

    let restored = undo
        .undo(&mut store, start + Duration::from_secs(2))
        .unwrap();
    assert!(!restored.task(first).unwrap().checked);
    assert!(restored.task(second).unwrap().checked);
}

#[test]
fn expired_undo_changes_nothing() {
    let gateway = MemoryGateway::new();
    let mut store = open_store(&gateway);
    let mut undo = UndoController::new(Duration::from_secs(4));
    let path = TaskPath::new(0, 0, 0);
    let start = Instant::now();

    store.toggle_task_checked(path);
    undo.toggle(&mut store, path, start);
    let before = store.snapshot();

    assert!(undo.expire(start + Duration::from_secs(4)));
    assert!(undo.undo(&mut store, start + Duration::from_secs(5)).is_none());
    assert!(Arc::ptr_eq(&before, &store.snapshot()));
}

#[test]
fn undo_finds_the_task_after_it_moved() {
    let gateway = MemoryGateway::new();
    let mut store = open_store(&gateway);
    let mut undo = UndoController::default();
    let start = Instant::now();

    store.toggle_task_checked(TaskPath::new(0, 0, 1));
    undo.toggle(&mut store, TaskPath::new(0, 0, 1), start);
    store.remove_task(TaskPath::new(0, 0, 0));

    let restored = undo.undo(&mut store, start).unwrap();
    let task = restored.task(TaskPath::new(0, 0, 0)).unwrap();
    assert_eq!(task.text, "write a cli");
    assert!(task.checked);
}

#[test]
fn task_draft_commits_and_clears() {
    let gateway = MemoryGateway::new();
    let mut store = open_store(&gateway);
    let mut draft = TaskDraft::new();
    let target = SectionPath::new(1, 0);

    assert_eq!(draft.commit(&mut store), Err(DraftError::NoTarget));

    draft.begin(target);
    assert!(!draft.can_commit());
    draft.set_text("   ");
    assert_eq!(draft.commit(&mut store), Err(DraftError::BlankText));
    assert_eq!(draft.target(), Some(target), "failed commit keeps the draft");

    draft.set_text("tower middleware");
    draft.set_deadline("2030-03-01");
    assert!(draft.can_commit());
    let next = draft.commit(&mut store).unwrap();

    let added = next.section(target).unwrap().tasks.last().unwrap().clone();
    assert_eq!(added.text, "tower middleware");
    assert_eq!(added.deadline.as_deref(), Some("2030-03-01"));
    assert_eq!(draft, TaskDraft::new());
}

#[test]
fn task_draft_without_deadline_adds_undated_task() {
    let gateway = MemoryGateway::new();
    let mut store = open_store(&gateway);
    let mut draft = TaskDraft::new();

    draft.begin(SectionPath::new(0, 0));
    draft.set_text("exercises");
    let next = draft.commit(&mut store).unwrap();

    let added = next.task(TaskPath::new(0, 0, 2)).unwrap();
    assert_eq!(added.deadline, None);
}

#[test]
fn task_draft_for_missing_section_fails() {
    let gateway = MemoryGateway::new();
    let mut store = open_store(&gateway);
    let mut draft = TaskDraft::new();

    draft.begin(SectionPath::new(0, 3));
    draft.set_text("orphan");

    assert_eq!(draft.commit(&mut store), Err(DraftError::TargetMissing));
    assert!(gateway.is_empty());
}

#[test]
fn note_draft_prefills_then_sets_and_clears() {
    let gateway = MemoryGateway::new();
    let mut store = open_store(&gateway);
    let path = TaskPath::new(0, 0, 0);
    let mut draft = NoteDraft::new();

    draft.begin(&store.snapshot(), path);
    assert_eq!(draft.text(), "");
    draft.set_text("chapters 1-8");
    let next = draft.commit(&mut store).unwrap();
    assert_eq!(next.task(path).unwrap().note.as_deref(), Some("chapters 1-8"));
    assert_eq!(draft.target(), None);

    draft.begin(&store.snapshot(), path);
    assert_eq!(draft.text(), "chapters 1-8");
    draft.set_text("  ");
    let cleared = draft.commit(&mut store).unwrap();
    assert_eq!(cleared.task(path).unwrap().note, None);
}

#[test]
fn cancelled_note_draft_writes_nothing() {
    let gateway = MemoryGateway::new();
    let store = open_store(&gateway);
    let mut draft = NoteDraft::new();

    draft.begin(&store.snapshot(), TaskPath::new(1, 0, 0));
    draft.set_text("never saved");
    draft.cancel();

    assert_eq!(draft, NoteDraft::new());
    assert!(gateway.is_empty());
}

#[test]
fn selection_tracks_the_visible_sections() {
    let gateway = MemoryGateway::new();
    let store = open_store(&gateway);
    let snapshot = store.snapshot();
    let mut selection = SelectionController::new();

    selection.select_phase(1);
    let titles: Vec<_> = selection
        .visible_sections(&snapshot)
        .into_iter()
        .map(|(_, section)| section.title.clone())
        .collect();
    assert_eq!(titles, vec!["Http", "Db"]);

    selection.select_section(Some(1));
    let visible = selection.visible_sections(&snapshot);
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].1.title, "Db");

    selection.select_phase(0);
    assert_eq!(
        selection.state(),
        SelectionState {
            phase_index: 0,
            section_index: None
        }
    );
    assert_eq!(selection.current_phase(&snapshot).unwrap().title, "Core");
}
