//! Integration tests for config

#[cfg(test)]
mod tests {
    use imgsweep_config::*;
    use imgsweep_types::{ColorChoice, OutputFormat};
    use std::io::Write;
    use std::sync::Mutex;
    use tempfile::NamedTempFile;

    // Mutex to ensure env var tests don't run concurrently
    static ENV_TEST_MUTEX: Mutex<()> = Mutex::new(());

    const ENV_VARS: &[&str] = &[
        "IMGSWEEP_OUTPUT",
        "IMGSWEEP_COLOR",
        "IMGSWEEP_VAULT",
        "IMGSWEEP_CANONICAL_FOLDER",
        "IMGSWEEP_COLLISION_POLICY",
        "IMGSWEEP_SKIP_HIDDEN",
    ];

    fn clear_env() {
        for var in ENV_VARS {
            std::env::remove_var(var);
        }
    }

    #[tokio::test]
    async fn test_load_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
[general]
default_output = "plain"
color = "never"

[sweep]
vault_root = "/tmp/vault"
canonical_folder = "attachments"
image_extensions = ["PNG", ".jpg"]
collision_policy = "suffix"
skip_hidden = false
        "#
        )
        .unwrap();

        let config = Config::load_from_file(temp_file.path()).await.unwrap();
        assert_eq!(config.general.default_output, OutputFormat::Plain);
        assert_eq!(config.general.color, ColorChoice::Never);
        assert_eq!(
            config.sweep.vault_root.as_deref(),
            Some(std::path::Path::new("/tmp/vault"))
        );
        assert_eq!(config.sweep.canonical_folder, "attachments");
        assert!(config.sweep.image_extensions.matches("a.png"));
        assert!(config.sweep.image_extensions.matches("a.JPG"));
        assert!(!config.sweep.image_extensions.matches("a.gif"));
        assert_eq!(config.sweep.collision_policy, CollisionPolicy::Suffix);
        assert!(!config.sweep.skip_hidden);
        // untouched keys keep their defaults
        assert!(config.sweep.document_extensions.matches("note.md"));
    }

    #[tokio::test]
    async fn test_empty_file_yields_defaults() {
        let temp_file = NamedTempFile::new().unwrap();
        let config = Config::load_from_file(temp_file.path()).await.unwrap();
        assert_eq!(config.sweep.canonical_folder, constants::DEFAULT_CANONICAL_FOLDER);
        assert_eq!(config.sweep.collision_policy, CollisionPolicy::Skip);
        assert!(config.sweep.skip_hidden);
        assert!(config.sweep.validate().is_ok());
    }

    #[tokio::test]
    async fn test_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load_from_file(&dir.path().join("nope.toml"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            imgsweep_errors::Error::Config(imgsweep_errors::ConfigError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_invalid_toml_is_parse_error() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "[sweep\ncanonical_folder = 3").unwrap();
        let err = Config::load_from_file(temp_file.path()).await.unwrap_err();
        assert!(matches!(
            err,
            imgsweep_errors::Error::Config(imgsweep_errors::ConfigError::ParseError { .. })
        ));
    }

    #[test]
    fn test_merge_env() {
        let _guard = ENV_TEST_MUTEX.lock().unwrap();
        clear_env();

        std::env::set_var("IMGSWEEP_OUTPUT", "json");
        std::env::set_var("IMGSWEEP_COLOR", "always");
        std::env::set_var("IMGSWEEP_VAULT", "/srv/notes");
        std::env::set_var("IMGSWEEP_CANONICAL_FOLDER", "media");
        std::env::set_var("IMGSWEEP_COLLISION_POLICY", "suffix");
        std::env::set_var("IMGSWEEP_SKIP_HIDDEN", "no");

        let mut config = Config::default();
        config.merge_env().unwrap();

        assert_eq!(config.general.default_output, OutputFormat::Json);
        assert_eq!(config.general.color, ColorChoice::Always);
        assert_eq!(
            config.sweep.vault_root,
            Some(std::path::PathBuf::from("/srv/notes"))
        );
        assert_eq!(config.sweep.canonical_folder, "media");
        assert_eq!(config.sweep.collision_policy, CollisionPolicy::Suffix);
        assert!(!config.sweep.skip_hidden);

        clear_env();
    }

    #[test]
    fn test_invalid_env_value() {
        let _guard = ENV_TEST_MUTEX.lock().unwrap();
        clear_env();

        std::env::set_var("IMGSWEEP_OUTPUT", "invalid");

        let mut config = Config::default();
        let result = config.merge_env();
        assert!(result.is_err());

        clear_env();
    }

    #[test]
    fn test_invalid_collision_policy_env() {
        let _guard = ENV_TEST_MUTEX.lock().unwrap();
        clear_env();

        std::env::set_var("IMGSWEEP_COLLISION_POLICY", "overwrite");

        let mut config = Config::default();
        let err = config.merge_env().unwrap_err();
        assert!(err.to_string().contains("IMGSWEEP_COLLISION_POLICY"));

        clear_env();
    }

    #[test]
    fn test_resolve_vault_root_requires_directory() {
        let dir = tempfile::tempdir().unwrap();
        let mut sweep = SweepConfig {
            vault_root: Some(dir.path().to_path_buf()),
            ..SweepConfig::default()
        };
        assert_eq!(sweep.resolve_vault_root().unwrap(), dir.path());

        sweep.vault_root = Some(dir.path().join("missing"));
        assert!(sweep.resolve_vault_root().is_err());
    }
}
