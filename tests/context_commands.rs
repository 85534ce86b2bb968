//! Context commands against the master config, followed by a remerge.

mod fixtures;

use fixtures::{kubeconfig, Home};
use ks::commands::{self, CommandError, NewContext};
use ks::{discover, run_startup, KsError, ReconcileOutcome};

fn merged_home() -> Home {
    let home = Home::initialized();
    home.write(
        ".kube/config",
        &kubeconfig(&[("dev", "dev-cluster", "app"), ("prod", "prod-cluster", "")], Some("dev")),
    );
    home.write(".kube/staging.yaml", &kubeconfig(&[("staging", "stg", "")], None));
    run_startup(&home.settings("~/.kube", None)).unwrap();
    home
}

#[test]
fn test_list_after_merge() {
    let home = merged_home();
    let settings = home.settings("~/.kube", Some(&home.master()));

    let (path, config) = commands::load_active_config(&settings).unwrap();
    assert_eq!(path, home.master());

    let listing = commands::list_contexts(&config);
    let names: Vec<_> = listing.contexts.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["dev", "prod", "staging"]);
    assert!(listing.contexts[0].current);

    let json: serde_json::Value = serde_json::from_str(&listing.to_json().unwrap()).unwrap();
    assert_eq!(json["contexts"][0]["name"], "dev");
}

#[test]
fn test_switch_persists_across_remerge() {
    let home = merged_home();
    let settings = home.settings("~/.kube", Some(&home.master()));

    let (path, mut config) = commands::load_active_config(&settings).unwrap();
    let switched = commands::switch_context(&mut config, Some("prod"), Some("web")).unwrap();
    assert_eq!(
        switched.to_string(),
        r#"Switched to context "prod" (namespace: "web")"#
    );
    commands::store_config(&path, &config).unwrap();

    let report = run_startup(&settings).unwrap().unwrap();
    assert_eq!(
        report.outcome,
        ReconcileOutcome::Restored {
            context: "prod".to_string(),
            namespace: "web".to_string()
        }
    );

    let (_, config) = commands::load_active_config(&settings).unwrap();
    let current = commands::current_context(&config).unwrap();
    assert_eq!(current.name, "prod");
    assert_eq!(current.namespace, "web");
}

#[test]
fn test_rename_of_source_context_reappears() {
    let home = merged_home();
    let settings = home.settings("~/.kube", Some(&home.master()));

    let (path, mut config) = commands::load_active_config(&settings).unwrap();
    commands::rename_context(&mut config, "staging", "stage").unwrap();
    commands::store_config(&path, &config).unwrap();

    // The source file still defines staging; the renamed copy lives on in the master
    run_startup(&settings).unwrap();
    let (_, config) = commands::load_active_config(&settings).unwrap();
    assert!(config.contexts.contains_key("staging"));
    assert!(config.contexts.contains_key("stage"));
}

#[test]
fn test_delete_current_then_remerge() {
    let home = merged_home();
    let settings = home.settings("~/.kube", Some(&home.master()));

    let (path, mut config) = commands::load_active_config(&settings).unwrap();
    let deleted = commands::delete_contexts(&mut config, &["dev".to_string()]);
    assert!(deleted.warning().is_some());
    commands::store_config(&path, &config).unwrap();

    // No selection recorded, so the merged current-context wins again
    let report = run_startup(&settings).unwrap().unwrap();
    assert_eq!(report.outcome, ReconcileOutcome::NoPriorState);
    assert_eq!(report.merged.current_context, "dev");
}

#[test]
fn test_new_context_rejects_unknown_user() {
    let home = merged_home();
    let settings = home.settings("~/.kube", Some(&home.master()));

    let (_, mut config) = commands::load_active_config(&settings).unwrap();
    let err = commands::new_context(
        &mut config,
        NewContext {
            name: "scratch".to_string(),
            cluster: Some("stg".to_string()),
            user: Some("nobody".to_string()),
            ..Default::default()
        },
    )
    .unwrap_err();

    assert!(matches!(err, CommandError::NoSuchUser(name) if name == "nobody"));
}

#[test]
fn test_commands_need_kubeconfig() {
    let home = merged_home();
    let settings = home.settings("~/.kube", None);

    assert!(matches!(
        commands::load_active_config(&settings),
        Err(KsError::Config(_))
    ));
}

#[test]
fn test_whence_lists_defining_files() {
    let home = merged_home();
    let settings = home.settings("~/.kube", Some(&home.master()));

    let mut list = discover(&settings.search_paths, &settings.home_dir).unwrap();
    list.append_master(&settings.master_path).unwrap();

    let report = commands::whence(&list, Some("staging"), settings.prior_config.as_deref());
    let files: Vec<_> = report.files.iter().map(|f| f.path.clone()).collect();
    assert_eq!(
        files,
        vec![
            home.path().join(".kube/staging.yaml").display().to_string(),
            home.master().display().to_string(),
        ]
    );
    assert!(report.files[1].current);
}
