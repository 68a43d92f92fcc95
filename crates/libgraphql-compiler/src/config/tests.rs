use crate::codegen::ArtifactOutput;
use crate::config::CONFIG_FILE_NAME;
use crate::config::CompilerConfig;
use crate::config::ConfigError;
use crate::config::SourceControlKind;
use pretty_assertions::assert_eq;
use std::path::Path;
use std::path::PathBuf;

#[test]
fn defaults_apply_to_omitted_keys() {
    let config = CompilerConfig::from_toml_str(r#"schema = ["schema.graphql"]"#, "/project").unwrap();
    assert_eq!(config, CompilerConfig {
        schema: vec![PathBuf::from("schema.graphql")],
        ..CompilerConfig::for_root("/project")
    });
    assert_eq!(config.artifact_output(), ArtifactOutput::Colocated);
    assert_eq!(config.schema_paths(), vec![PathBuf::from("/project/schema.graphql")]);
}

#[test]
fn paths_resolve_against_the_config_directory() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join(CONFIG_FILE_NAME),
        r#"
            src = "app"
            artifact_directory = "app/__generated__"
            source_control = "git"
        "#,
    ).unwrap();

    let config = CompilerConfig::load(dir.path()).unwrap();
    assert_eq!(config.src_dir(), dir.path().join("app"));
    assert_eq!(
        config.artifact_output(),
        ArtifactOutput::Directory(dir.path().join("app/__generated__")),
    );
    assert_eq!(config.source_control, Some(SourceControlKind::Git));
}

#[test]
fn unknown_keys_are_rejected() {
    let err = CompilerConfig::from_toml_str("sources = 'src'", "/project").unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
}

#[test]
fn missing_config_file_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    assert_eq!(CompilerConfig::load(dir.path()).unwrap(), CompilerConfig::for_root(dir.path()));
}

#[test]
fn source_paths_filter_by_extension_and_excluded_directories() {
    let config = CompilerConfig::for_root("/project");
    assert!(config.is_source_path(Path::new("/project/src/User.graphql")));
    assert!(config.is_source_path(Path::new("/project/src/User.tsx")));
    assert!(!config.is_source_path(Path::new("/project/src/User.css")));

    assert!(config.is_excluded(Path::new("/project/node_modules/pkg/a.graphql")));
    assert!(config.is_excluded(Path::new("/project/src/__generated__/A.graphql")));
    assert!(!config.is_excluded(Path::new("/project/src/a.graphql")));
}
