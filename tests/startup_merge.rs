//! Startup merge: discovery, precedence, master file and context restoration.

mod fixtures;

use std::fs;

use fixtures::{kubeconfig, Home};
use ks::commands;
use ks::{run_startup, KsError, ReconcileOutcome};
use ks_kubeconfig::Kubeconfig;

fn load_master(home: &Home) -> Kubeconfig {
    Kubeconfig::load_from_file(&home.master()).expect("master config")
}

#[test]
fn test_earlier_search_path_wins() {
    let home = Home::initialized();
    home.write("a/config", &kubeconfig(&[("dev", "x", "")], None));
    home.write("b/config", &kubeconfig(&[("dev", "y", "")], None));

    run_startup(&home.settings("~/a:~/b", None)).unwrap();
    assert_eq!(load_master(&home).contexts["dev"].cluster, "x");

    fs::remove_file(home.master()).unwrap();
    run_startup(&home.settings("~/b:~/a", None)).unwrap();
    assert_eq!(load_master(&home).contexts["dev"].cluster, "y");
}

#[test]
fn test_absolute_search_paths_and_single_files() {
    let home = Home::initialized();
    let a = home.write("a/dev.yaml", &kubeconfig(&[("dev", "x", "")], None));
    home.write("b/dev.yaml", &kubeconfig(&[("dev", "y", ""), ("qa", "q", "")], None));

    let kspath = format!("{}:{}", a.display(), home.path().join("b").display());
    let report = run_startup(&home.settings(&kspath, None)).unwrap().unwrap();

    assert_eq!(report.precedence.len(), 2);
    assert_eq!(report.precedence[0], a);
    let master = load_master(&home);
    assert_eq!(master.contexts["dev"].cluster, "x");
    assert_eq!(master.contexts["qa"].cluster, "q");
}

#[test]
fn test_remerge_is_byte_stable() {
    let home = Home::initialized();
    home.write(".kube/config", &kubeconfig(&[("dev", "x", "app"), ("prod", "p", "")], Some("prod")));
    home.write(".kube/extra/staging.yaml", &kubeconfig(&[("staging", "s", "")], None));
    let settings = home.settings("~/.kube", None);

    let first = run_startup(&settings).unwrap().unwrap();
    assert!(!first.master_included);
    let bytes = fs::read(home.master()).unwrap();

    let second = run_startup(&settings).unwrap().unwrap();
    assert!(second.master_included);
    assert_eq!(second.precedence.last(), Some(&home.master()));
    assert_eq!(fs::read(home.master()).unwrap(), bytes);
}

#[test]
fn test_unparsable_files_are_skipped() {
    let home = Home::initialized();
    home.write(".kube/config", &kubeconfig(&[("dev", "x", "")], None));
    home.write(".kube/README.md", "# My clusters\n\nAsk ops for access.\n");
    home.write(".kube/broken.yaml", "clusters: [oops\n");
    home.write(".kube/cache/discovery/servergroups.json", r#"{"kind":"APIGroupList","apiVersion":"v1","groups":[]}"#);

    let report = run_startup(&home.settings("~/.kube", None)).unwrap().unwrap();

    assert_eq!(report.precedence, vec![home.path().join(".kube/config")]);
    assert_eq!(report.merged.contexts.len(), 1);
}

#[test]
fn test_missing_search_path_aborts() {
    let home = Home::initialized();
    let err = run_startup(&home.settings("~/.kube", None)).unwrap_err();

    assert!(matches!(err, KsError::Discovery(_)));
    assert!(!home.master().exists());
}

#[test]
fn test_not_initialized_does_nothing() {
    let home = Home::new();
    home.write(".kube/config", &kubeconfig(&[("dev", "x", "")], None));

    assert!(run_startup(&home.settings("~/.kube", None)).unwrap().is_none());
    assert!(!home.master().exists());
}

#[test]
fn test_master_only_keys_survive_remerge() {
    let home = Home::initialized();
    home.write(".kube/config", &kubeconfig(&[("dev", "x", "")], None));
    let settings = home.settings("~/.kube", Some(&home.master()));
    run_startup(&settings).unwrap();

    // Hand-made context added directly to the master file
    let mut master = load_master(&home);
    commands::new_context(
        &mut master,
        commands::NewContext {
            name: "dev-admin".to_string(),
            from: Some("dev".to_string()),
            namespace: Some("kube-system".to_string()),
            ..Default::default()
        },
    )
    .unwrap();
    commands::store_config(&home.master(), &master).unwrap();

    run_startup(&settings).unwrap();
    let master = load_master(&home);
    assert_eq!(master.contexts["dev-admin"].namespace, "kube-system");
    assert_eq!(master.contexts["dev-admin"].cluster, "x");
}

#[test]
fn test_selection_survives_source_edit() {
    let home = Home::initialized();
    home.write(".kube/config", &kubeconfig(&[("foo", "x", ""), ("other", "o", "")], Some("other")));
    let settings = home.settings("~/.kube", Some(&home.master()));
    run_startup(&settings).unwrap();

    // ks switch foo -n bar
    let mut master = load_master(&home);
    commands::switch_context(&mut master, Some("foo"), Some("bar")).unwrap();
    commands::store_config(&home.master(), &master).unwrap();

    // Source file now points foo at another cluster
    home.write(".kube/config", &kubeconfig(&[("foo", "y", "default"), ("other", "o", "")], Some("other")));

    let report = run_startup(&settings).unwrap().unwrap();
    assert_eq!(
        report.outcome,
        ReconcileOutcome::Restored {
            context: "foo".to_string(),
            namespace: "bar".to_string()
        }
    );

    let master = load_master(&home);
    assert_eq!(master.current_context, "foo");
    assert_eq!(master.contexts["foo"].namespace, "bar");
    assert_eq!(master.contexts["foo"].cluster, "y");
}

#[test]
fn test_vanished_context_falls_back_with_warning() {
    let home = Home::initialized();
    home.write(".kube/config", &kubeconfig(&[("prod", "p", "web")], Some("prod")));
    // The shell was using a config that is not part of KSPATH
    let prior = home.write("elsewhere/config", &kubeconfig(&[("dev", "d", "ns1")], Some("dev")));

    let report = run_startup(&home.settings("~/.kube", Some(&prior)))
        .unwrap()
        .unwrap();

    let warning = report.outcome.warning().expect("fallback warning");
    assert!(warning.contains(r#"Context "dev" no longer exists"#));
    assert!(warning.contains(r#"Current context is now "prod" (namespace: "web")"#));

    let master = load_master(&home);
    assert_eq!(master.current_context, "prod");
    assert!(!master.contexts.contains_key("dev"));
}

#[test]
fn test_fallback_clears_current_context_without_definition() {
    let home = Home::initialized();
    home.write(".kube/config", &kubeconfig(&[("prod", "p", "")], Some("gone")));
    let prior = home.write("elsewhere/config", &kubeconfig(&[("dev", "d", "")], Some("dev")));

    let report = run_startup(&home.settings("~/.kube", Some(&prior)))
        .unwrap()
        .unwrap();

    assert!(matches!(report.outcome, ReconcileOutcome::FellBack { .. }));
    assert_eq!(load_master(&home).current_context, "");
}

#[test]
fn test_missing_prior_config_is_not_an_error() {
    let home = Home::initialized();
    home.write(".kube/config", &kubeconfig(&[("dev", "x", "")], Some("dev")));
    let prior = home.path().join("deleted/config");

    let report = run_startup(&home.settings("~/.kube", Some(&prior)))
        .unwrap()
        .unwrap();

    assert_eq!(report.outcome, ReconcileOutcome::NoPriorState);
    assert_eq!(load_master(&home).current_context, "dev");
}

#[test]
fn test_relative_certificate_paths_become_absolute() {
    let home = Home::initialized();
    home.write(
        "project/conf/kubeconfig",
        "clusters:\n- name: local\n  cluster:\n    server: https://127.0.0.1:6443\n    certificate-authority: ca.crt\ncontexts:\n- name: local\n  context: {cluster: local, user: local}\n",
    );

    run_startup(&home.settings("~/project/conf", None)).unwrap();

    let master = load_master(&home);
    let ca = master.clusters["local"].certificate_authority.clone().unwrap();
    assert_eq!(
        std::path::PathBuf::from(ca),
        home.path().join("project/conf/ca.crt")
    );
}

#[test]
fn test_relative_exec_command_becomes_absolute() {
    let home = Home::initialized();
    home.write(
        "project/conf/kubeconfig",
        "users:\n- name: local\n  user:\n    exec:\n      apiVersion: client.authentication.k8s.io/v1beta1\n      command: bin/get-token\ncontexts:\n- name: local\n  context: {cluster: local, user: local}\n",
    );

    run_startup(&home.settings("~/project/conf", None)).unwrap();

    let master = load_master(&home);
    let command = master.auth_infos["local"].extra["exec"]["command"]
        .as_str()
        .unwrap()
        .to_string();
    assert_eq!(
        std::path::PathBuf::from(command),
        home.path().join("project/conf/bin/get-token")
    );
}

#[cfg(unix)]
#[test]
fn test_master_is_owner_only() {
    use std::os::unix::fs::PermissionsExt;

    let home = Home::initialized();
    home.write(".kube/config", &kubeconfig(&[("dev", "x", "")], None));
    run_startup(&home.settings("~/.kube", None)).unwrap();

    let mode = fs::metadata(home.master()).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
}
