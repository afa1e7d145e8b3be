use std::cell::Cell;
use std::rc::Rc;
use todomind_core::db::open_db_in_memory;
use todomind_core::repo::task_repo::is_task_deleted;
use todomind_core::{
    AppSettings, EditTarget, LinkPreviewService, MindMapEditor, MindMapService, OgpError,
    PageFetcher, SqliteMindMapRepository, SqliteTaskRepository, TaskEditor, TaskService,
    TaskServiceError, TaskStatus,
};

struct OnePageFetcher {
    calls: Rc<Cell<usize>>,
}

impl PageFetcher for OnePageFetcher {
    fn fetch_html(&self, _url: &str) -> Result<String, OgpError> {
        self.calls.set(self.calls.get() + 1);
        Ok(r#"<meta property="og:title" content="Trip plan">"#.to_string())
    }
}

#[test]
fn untouched_new_task_is_not_saved() {
    let conn = open_db_in_memory().unwrap();
    let service = TaskService::try_new(SqliteTaskRepository::try_new(&conn).unwrap()).unwrap();

    let mut editor = TaskEditor::open(EditTarget::New, &service).unwrap();
    assert!(!editor.is_editing());
    assert_eq!(editor.leave(&service).unwrap(), None);
    assert_eq!(is_task_deleted(&conn, editor.id()).unwrap(), None);
}

#[test]
fn leave_creates_then_updates() {
    let conn = open_db_in_memory().unwrap();
    let service = TaskService::try_new(SqliteTaskRepository::try_new(&conn).unwrap()).unwrap();

    let mut editor = TaskEditor::new_task();
    editor.set_title("plan trip");
    editor.set_due_at(Some(1_900_000_000_000));
    let created = editor.leave(&service).unwrap().unwrap();
    assert!(editor.is_editing());
    assert!(!editor.is_auto_save_needed());

    let mut editor = TaskEditor::open(EditTarget::Existing(created.id), &service).unwrap();
    editor.set_status(TaskStatus::Complete);
    editor.set_description("book flights");
    editor.leave(&service).unwrap().unwrap();

    let stored = service.get_task(created.id).unwrap().unwrap();
    assert_eq!(stored.title.as_deref(), Some("plan trip"));
    assert_eq!(stored.description.as_deref(), Some("book flights"));
    assert_eq!(stored.status, TaskStatus::Complete);
}

#[test]
fn opening_unknown_task_fails() {
    let conn = open_db_in_memory().unwrap();
    let service = TaskService::try_new(SqliteTaskRepository::try_new(&conn).unwrap()).unwrap();

    assert!(matches!(
        TaskEditor::open(EditTarget::Existing(uuid::Uuid::new_v4()), &service),
        Err(TaskServiceError::TaskNotFound(_))
    ));
}

#[test]
fn child_node_is_saved_under_parent() {
    let conn = open_db_in_memory().unwrap();
    let maps = MindMapService::new(
        SqliteMindMapRepository::try_new(&conn).unwrap(),
        SqliteTaskRepository::try_new(&conn).unwrap(),
    );
    let service = TaskService::try_new(SqliteTaskRepository::try_new(&conn).unwrap()).unwrap();

    let mut map_editor = MindMapEditor::new_mind_map();
    map_editor.set_title("vacation");
    let map = map_editor.leave(&maps).unwrap().unwrap();

    let mut root_editor = TaskEditor::new_task();
    root_editor.set_mind_map(Some(map.id));
    root_editor.set_title("root");
    let root = root_editor.save(&service).unwrap();

    let mut child_editor = TaskEditor::child_of(&root);
    let child = child_editor.leave(&service).unwrap().unwrap();
    assert_eq!(child.parent_task_id, Some(root.id));
    assert_eq!(child.mind_map_id, Some(map.id));
    assert_eq!(child.status, TaskStatus::Open);
    assert_eq!(maps.progress(map.id).unwrap(), 0.0);
}

#[test]
fn deleting_existing_task_goes_through_undo() {
    let conn = open_db_in_memory().unwrap();
    let mut service = TaskService::try_new(SqliteTaskRepository::try_new(&conn).unwrap()).unwrap();

    let mut editor = TaskEditor::new_task();
    editor.set_title("to remove");
    let task = editor.save(&service).unwrap();

    editor.set_title("edited after");
    let removed = editor.delete(&mut service).unwrap().unwrap();
    assert_eq!(removed.id, task.id);
    assert!(!editor.is_auto_save_needed());
    assert_eq!(editor.leave(&service).unwrap(), None);

    assert_eq!(service.undo_delete().unwrap().unwrap().title.as_deref(), Some("to remove"));
}

#[test]
fn deleting_new_draft_only_discards() {
    let conn = open_db_in_memory().unwrap();
    let mut service = TaskService::try_new(SqliteTaskRepository::try_new(&conn).unwrap()).unwrap();

    let mut editor = TaskEditor::new_task();
    editor.set_title("never stored");
    assert_eq!(editor.delete(&mut service).unwrap(), None);
    assert!(editor.is_deleted());
    assert!(service.pending_undo().is_none());
}

#[test]
fn mind_map_editor_round_trip_and_delete() {
    let conn = open_db_in_memory().unwrap();
    let maps = MindMapService::new(
        SqliteMindMapRepository::try_new(&conn).unwrap(),
        SqliteTaskRepository::try_new(&conn).unwrap(),
    );

    let mut editor = MindMapEditor::open(EditTarget::New, &maps).unwrap();
    editor.set_title("garden");
    editor.set_color(Some(0xFF8B_C34A));
    editor.set_position(120.0, 80.0);
    let created = editor.leave(&maps).unwrap().unwrap();

    let mut editor = MindMapEditor::open(EditTarget::Existing(created.id), &maps).unwrap();
    editor.set_completed(true);
    let updated = editor.leave(&maps).unwrap().unwrap();
    assert!(updated.is_completed);
    assert_eq!((updated.x, updated.y), (120.0, 80.0));

    assert_eq!(editor.delete(&maps).unwrap(), Some(0));
    assert!(maps.get_mind_map(created.id).unwrap().is_none());
}

#[test]
fn mind_map_preview_follows_settings() {
    let calls = Rc::new(Cell::new(0));
    let mut previews = LinkPreviewService::new(OnePageFetcher {
        calls: Rc::clone(&calls),
    });
    let mut editor = MindMapEditor::new_mind_map();
    editor.set_description("itinerary at https://trips.example.com/42");

    let disabled = AppSettings {
        show_ogp_preview: false,
        ..AppSettings::default()
    };
    assert!(editor.refresh_preview(&mut previews, &disabled).is_none());
    assert_eq!(calls.get(), 0);

    let preview = editor
        .refresh_preview(&mut previews, &AppSettings::default())
        .cloned()
        .unwrap();
    assert_eq!(preview.title.as_deref(), Some("Trip plan"));
    assert_eq!(editor.draft().ogp_preview, Some(preview));
    assert_eq!(calls.get(), 1);
}
