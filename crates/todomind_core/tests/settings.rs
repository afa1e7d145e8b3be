use todomind_core::db::open_db_in_memory;
use todomind_core::service::settings_service::KEY_DEFAULT_MIND_MAP_SCALE;
use todomind_core::{
    AppSettings, SettingsError, SettingsRepository, SettingsService, SqliteSettingsRepository,
};

#[test]
fn fresh_store_loads_defaults() {
    let conn = open_db_in_memory().unwrap();
    let service = SettingsService::new(SqliteSettingsRepository::try_new(&conn).unwrap());

    assert_eq!(service.load().unwrap(), AppSettings::default());
}

#[test]
fn saved_values_round_trip() {
    let conn = open_db_in_memory().unwrap();
    let service = SettingsService::new(SqliteSettingsRepository::try_new(&conn).unwrap());
    let wanted = AppSettings {
        show_ogp_preview: false,
        remind_task_deadline: false,
        default_mind_map_scale: 0.75,
    };

    service.save(&wanted).unwrap();
    assert_eq!(service.load().unwrap(), wanted);

    service.set_show_ogp_preview(true).unwrap();
    assert!(service.load().unwrap().show_ogp_preview);
}

#[test]
fn invalid_scale_is_rejected_and_not_stored() {
    let conn = open_db_in_memory().unwrap();
    let service = SettingsService::new(SqliteSettingsRepository::try_new(&conn).unwrap());

    for bad in [0.0, -1.0, f32::NAN, f32::INFINITY] {
        assert!(matches!(
            service.set_default_mind_map_scale(bad),
            Err(SettingsError::InvalidScale(_))
        ));
    }
    assert_eq!(service.load().unwrap().default_mind_map_scale, 1.0);
}

#[test]
fn garbage_values_fall_back_to_defaults() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteSettingsRepository::try_new(&conn).unwrap();
    repo.set_value("show_ogp_preview", "maybe").unwrap();
    repo.set_value(KEY_DEFAULT_MIND_MAP_SCALE, "-3").unwrap();

    let service = SettingsService::new(SqliteSettingsRepository::try_new(&conn).unwrap());
    assert_eq!(service.load().unwrap(), AppSettings::default());
}

#[test]
fn reset_drops_overrides() {
    let conn = open_db_in_memory().unwrap();
    let service = SettingsService::new(SqliteSettingsRepository::try_new(&conn).unwrap());
    service.set_remind_task_deadline(false).unwrap();
    service.set_default_mind_map_scale(2.5).unwrap();

    service.reset().unwrap();
    assert_eq!(service.load().unwrap(), AppSettings::default());
}
