//! Integration tests for TOML configuration loading.
//!
//! Uses figment::Jail for sandboxed working directory and env var changes.

use figment::{
    Figment, Jail,
    providers::{Format, Serialized, Toml},
};
use kanri_config::KanriConfig;
use pretty_assertions::assert_eq;

#[test]
fn loads_board_config_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[board]
page_size = 25
rollback_on_failure = false
"#,
        )?;

        let config: KanriConfig = Figment::from(Serialized::defaults(KanriConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.board.page_size, 25);
        assert!(!config.board.rollback_on_failure);
        assert_eq!(config.general.default_limit, 20);
        Ok(())
    });
}

#[test]
fn partial_section_keeps_other_defaults() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[general]
user = "dr-lee"
"#,
        )?;

        let config: KanriConfig = Figment::from(Serialized::defaults(KanriConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.general.user, "dr-lee");
        assert_eq!(config.general.default_limit, 20);
        assert_eq!(config.board.page_size, 10);
        Ok(())
    });
}

#[test]
fn project_config_is_read_from_dot_kanri() {
    Jail::expect_with(|jail| {
        std::fs::create_dir_all(jail.directory().join(".kanri")).expect("mkdir");
        jail.create_file(
            ".kanri/config.toml",
            r#"
[database]
path = "data/clinic.db"
"#,
        )?;

        let config = KanriConfig::load().expect("config loads");
        assert_eq!(config.database.path, "data/clinic.db");

        let from_root = KanriConfig::load_for_project(jail.directory()).expect("config loads");
        assert_eq!(from_root.database.path, "data/clinic.db");
        Ok(())
    });
}

#[test]
fn invalid_page_size_fails_to_load() {
    Jail::expect_with(|jail| {
        std::fs::create_dir_all(jail.directory().join(".kanri")).expect("mkdir");
        jail.create_file(".kanri/config.toml", "[board]\npage_size = 0\n")?;

        let err = KanriConfig::load().unwrap_err();
        assert!(err.to_string().contains("board.page_size"));
        Ok(())
    });
}
