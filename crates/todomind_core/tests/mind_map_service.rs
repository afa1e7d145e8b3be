use todomind_core::db::open_db_in_memory;
use todomind_core::repo::task_repo::is_task_deleted;
use todomind_core::{
    MindMap, MindMapService, MindMapServiceError, SqliteMindMapRepository,
    SqliteTaskRepository, Task, TaskService, TaskStatus,
};

#[test]
fn create_update_and_list_newest_first() {
    let conn = open_db_in_memory().unwrap();
    let service = MindMapService::new(
        SqliteMindMapRepository::try_new(&conn).unwrap(),
        SqliteTaskRepository::try_new(&conn).unwrap(),
    );

    let mut older = MindMap::new();
    older.title = Some("older".to_string());
    older.created_at -= 1_000;
    service.create_mind_map(&older).unwrap();

    let mut newer = MindMap::new();
    newer.title = Some("newer".to_string());
    newer.color = Some(0xFF00_FF00);
    let mut newer = service.create_mind_map(&newer).unwrap();

    newer.x = 40.0;
    newer.y = -12.0;
    let updated = service.update_mind_map(&newer).unwrap();
    assert_eq!((updated.x, updated.y), (40.0, -12.0));
    assert_eq!(updated.color_hex().as_deref(), Some("#00FF00"));

    let listed: Vec<_> = service
        .list_mind_maps()
        .unwrap()
        .into_iter()
        .map(|map| map.title.unwrap())
        .collect();
    assert_eq!(listed, ["newer", "older"]);
}

#[test]
fn progress_counts_complete_tasks() {
    let conn = open_db_in_memory().unwrap();
    let maps = MindMapService::new(
        SqliteMindMapRepository::try_new(&conn).unwrap(),
        SqliteTaskRepository::try_new(&conn).unwrap(),
    );
    let tasks = TaskService::try_new(SqliteTaskRepository::try_new(&conn).unwrap()).unwrap();
    let map = maps.create_mind_map(&MindMap::new()).unwrap();
    assert_eq!(maps.progress(map.id).unwrap(), 0.0);

    for status in [
        TaskStatus::Complete,
        TaskStatus::Open,
        TaskStatus::InProgress,
        TaskStatus::Complete,
    ] {
        let mut task = Task::new();
        task.mind_map_id = Some(map.id);
        task.status = status;
        tasks.create_task(task).unwrap();
    }

    assert_eq!(maps.progress(map.id).unwrap(), 50.0);
}

#[test]
fn completion_flag_leaves_tasks_alone() {
    let conn = open_db_in_memory().unwrap();
    let maps = MindMapService::new(
        SqliteMindMapRepository::try_new(&conn).unwrap(),
        SqliteTaskRepository::try_new(&conn).unwrap(),
    );
    let tasks = TaskService::try_new(SqliteTaskRepository::try_new(&conn).unwrap()).unwrap();
    let map = maps.create_mind_map(&MindMap::new()).unwrap();

    let mut task = Task::titled("still open");
    task.mind_map_id = Some(map.id);
    task.status = TaskStatus::Open;
    let task = tasks.create_task(task).unwrap();

    let completed = maps.set_completed(map.id, true).unwrap();
    assert!(completed.is_completed);
    assert_eq!(
        tasks.get_task(task.id).unwrap().unwrap().status,
        TaskStatus::Open
    );

    tasks.toggle_complete(task.id).unwrap();
    let reopened = maps.set_completed(map.id, false).unwrap();
    assert!(!reopened.is_completed);
    assert_eq!(
        tasks.get_task(task.id).unwrap().unwrap().status,
        TaskStatus::Complete
    );
}

#[test]
fn delete_cascades_to_tasks() {
    let conn = open_db_in_memory().unwrap();
    let maps = MindMapService::new(
        SqliteMindMapRepository::try_new(&conn).unwrap(),
        SqliteTaskRepository::try_new(&conn).unwrap(),
    );
    let tasks = TaskService::try_new(SqliteTaskRepository::try_new(&conn).unwrap()).unwrap();
    let map = maps.create_mind_map(&MindMap::new()).unwrap();

    let mut root = Task::titled("root");
    root.mind_map_id = Some(map.id);
    let root = tasks.create_task(root).unwrap();
    let mut child = Task::titled("child");
    child.mind_map_id = Some(map.id);
    child.parent_task_id = Some(root.id);
    let child = tasks.create_task(child).unwrap();
    let loose = tasks.create_task(Task::titled("loose")).unwrap();

    assert_eq!(maps.delete_mind_map(map.id).unwrap(), 2);

    assert!(maps.get_mind_map(map.id).unwrap().is_none());
    assert_eq!(is_task_deleted(&conn, root.id).unwrap(), None);
    assert_eq!(is_task_deleted(&conn, child.id).unwrap(), None);
    assert!(tasks.get_task(loose.id).unwrap().is_some());
}

#[test]
fn unknown_mind_map_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let maps = MindMapService::new(
        SqliteMindMapRepository::try_new(&conn).unwrap(),
        SqliteTaskRepository::try_new(&conn).unwrap(),
    );

    assert!(matches!(
        maps.set_completed(uuid::Uuid::new_v4(), true),
        Err(MindMapServiceError::MindMapNotFound(_))
    ));
    assert!(matches!(
        maps.delete_mind_map(uuid::Uuid::new_v4()),
        Err(MindMapServiceError::MindMapNotFound(_))
    ));
}
