use callboard_agents::{
    create_profile, duplicate_profile, list_profiles, load_profiles, SEEDED_TEMPLATE_COUNT,
};
use callboard_db::{create_pool, run_migrations, DbRuntimeSettings};
use callboard_types::AgentProfile;

#[test]
fn profiles_persist_across_pools() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("agents.db");
    let path = path.to_str().expect("utf-8 path");

    let created_id = {
        let pool = create_pool(path, DbRuntimeSettings::default()).expect("pool");
        let conn = pool.get().expect("connection");
        run_migrations(&conn).expect("migrations");

        let profile = AgentProfile {
            name: "Night Desk".to_string(),
            description: Some("After-hours line".to_string()),
            system_prompt: "Take messages.".to_string(),
            ..Default::default()
        };
        let created = create_profile(&conn, profile).expect("create");
        duplicate_profile(&conn, &created.id).expect("duplicate");
        created.id
    };

    let pool = create_pool(path, DbRuntimeSettings::default()).expect("pool");
    let conn = pool.get().expect("connection");
    let profiles = load_profiles(&conn).expect("load");
    assert_eq!(profiles.len(), SEEDED_TEMPLATE_COUNT + 2);
    assert!(profiles.iter().any(|p| p.id == created_id));

    let hits = list_profiles(&conn, Some("night desk")).expect("search");
    let names: Vec<_> = hits.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Night Desk", "Night Desk (Copy)"]);
}
