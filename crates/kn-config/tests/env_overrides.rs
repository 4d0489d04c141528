use figment::Jail;
use kn_config::KnConfig;

#[test]
fn env_vars_fill_config_values() {
    Jail::expect_with(|jail| {
        jail.set_env("KEEP2NOTION_KEEP__EMAIL", "env@example.com");
        jail.set_env("KEEP2NOTION_NOTION__TOKEN", "secret_from_env");
        jail.set_env("KEEP2NOTION_KEEP__IMPORT_MEDIA", "false");

        let config = KnConfig::load(None).expect("config loads");
        assert_eq!(config.keep.email, "env@example.com");
        assert_eq!(config.notion.token, "secret_from_env");
        assert!(!config.keep.import_media);
        Ok(())
    });
}

#[test]
fn env_beats_project_file() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "keep2notion.toml",
            r#"
[notion]
token = "secret_from_file"
"#,
        )?;
        jail.set_env("KEEP2NOTION_NOTION__TOKEN", "secret_from_env");

        let config = KnConfig::load(None).expect("config loads");
        assert_eq!(config.notion.token, "secret_from_env");
        Ok(())
    });
}
