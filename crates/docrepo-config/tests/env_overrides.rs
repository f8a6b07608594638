use docrepo_config::DocRepoConfig;
use figment::Jail;

#[test]
fn env_vars_fill_nested_sections() {
    Jail::expect_with(|jail| {
        jail.set_env("DOCREPO_MONGO__URI", "mongodb://env-host:27017");
        jail.set_env("DOCREPO_MONGO__DATABASE", "env_db");
        jail.set_env("DOCREPO_MONGO__MAX_POOL_SIZE", "8");
        jail.set_env("DOCREPO_GENERAL__DEFAULT_PAGE_SIZE", "5");

        let config = DocRepoConfig::load().map_err(|e| e.to_string())?;
        assert_eq!(config.mongo.uri, "mongodb://env-host:27017");
        assert_eq!(config.mongo.database, "env_db");
        assert_eq!(config.mongo.max_pool_size, Some(8));
        assert_eq!(config.general.default_page_size, 5);
        assert!(config.mongo.is_configured());
        Ok(())
    });
}

#[test]
fn env_beats_project_file() {
    Jail::expect_with(|jail| {
        jail.create_dir(".docrepo")?;
        jail.create_file(
            ".docrepo/config.toml",
            r#"
[mongo]
uri = "mongodb://from-file:27017"
database = "file_db"
"#,
        )?;
        jail.set_env("DOCREPO_MONGO__DATABASE", "env_db");

        let config = DocRepoConfig::load().map_err(|e| e.to_string())?;
        assert_eq!(config.mongo.uri, "mongodb://from-file:27017");
        assert_eq!(config.mongo.database, "env_db");
        Ok(())
    });
}

#[test]
fn invalid_env_value_is_rejected() {
    Jail::expect_with(|jail| {
        jail.set_env("DOCREPO_MONGO__URI", "redis://localhost:6379");
        assert!(DocRepoConfig::load().is_err());
        Ok(())
    });
}
