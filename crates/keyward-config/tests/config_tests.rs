// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::io::Write;

use keyward_config::diagnostic::figment_to_config_errors;
use keyward_config::{
    ConfigError, KeywardConfig, load_and_validate_str, load_config_from_path, load_config_from_str,
};
use keyward_core::{KdfConfig, KdfType};
use serial_test::serial;

fn write_config(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .expect("create temp config");
    file.write_all(content.as_bytes()).expect("write temp config");
    file
}

#[test]
fn full_toml_deserializes() {
    let toml = r#"
[kdf]
default_type = "argon2id"
pbkdf2_iterations = 700000
argon2_iterations = 4
argon2_memory_mib = 128
argon2_parallelism = 2

[migration]
min_pbkdf2_iterations = 600000
target_pbkdf2_iterations = 650000

[logging]
level = "debug"
"#;
    let config = load_config_from_str(toml).expect("valid TOML");

    assert_eq!(config.kdf.default_type, KdfType::Argon2id);
    assert_eq!(
        config.kdf.default_kdf_config(),
        KdfConfig::Argon2id {
            iterations: 4,
            memory_mib: 128,
            parallelism: 2
        }
    );
    assert_eq!(config.migration.target_pbkdf2_iterations, 650_000);
    assert_eq!(config.logging.level, "debug");
}

#[test]
fn missing_sections_use_defaults() {
    let config = load_config_from_str("[logging]\nlevel = \"warn\"\n").unwrap();
    assert_eq!(config.kdf, KeywardConfig::default().kdf);
    assert_eq!(config.migration, KeywardConfig::default().migration);
}

#[test]
fn unknown_key_suggests_correction() {
    let toml = "[migration]\nmin_pbkdf2_iteration = 600000\n";
    let errors = load_and_validate_str(toml).unwrap_err();

    assert_eq!(errors.len(), 1);
    match &errors[0] {
        ConfigError::UnknownKey {
            key, suggestion, ..
        } => {
            assert_eq!(key, "min_pbkdf2_iteration");
            assert_eq!(suggestion.as_deref(), Some("min_pbkdf2_iterations"));
        }
        other => panic!("expected UnknownKey, got {other:?}"),
    }
}

#[test]
fn unknown_top_level_section_is_rejected() {
    let err = load_config_from_str("[vault]\npath = \"x\"\n").unwrap_err();
    let errors = figment_to_config_errors(err, &[]);
    assert!(matches!(&errors[0], ConfigError::UnknownKey { key, .. } if key == "vault"));
}

#[test]
fn wrong_type_is_reported() {
    let errors = load_and_validate_str("[kdf]\npbkdf2_iterations = \"many\"\n").unwrap_err();
    assert!(
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::InvalidType { .. })),
        "expected a type error, got {errors:?}"
    );
}

#[test]
fn validation_errors_surface_through_load() {
    let errors = load_and_validate_str("[kdf]\npbkdf2_iterations = 1000\n").unwrap_err();
    assert!(matches!(errors[0], ConfigError::Validation { .. }));
}

#[test]
fn diagnostics_render_with_miette() {
    let errors = load_and_validate_str("[logging]\nlevl = \"info\"\n").unwrap_err();
    let handler = miette::GraphicalReportHandler::new_themed(miette::GraphicalTheme::unicode_nocolor());
    let mut out = String::new();
    handler
        .render_report(&mut out, &errors[0] as &dyn miette::Diagnostic)
        .unwrap();
    assert!(out.contains("levl"));
    assert!(out.contains("level"));
}

#[test]
#[serial]
fn file_values_load_from_explicit_path() {
    let file = write_config("[migration]\ntarget_pbkdf2_iterations = 800000\n");
    let config = load_config_from_path(file.path()).expect("valid file");
    assert_eq!(config.migration.target_pbkdf2_iterations, 800_000);
}

#[test]
#[serial]
fn env_overrides_file_values() {
    let file = write_config("[migration]\ntarget_pbkdf2_iterations = 800000\n[logging]\nlevel = \"info\"\n");

    // SAFETY: serialized with every other env-reading test in this binary.
    unsafe {
        std::env::set_var("KEYWARD_MIGRATION_TARGET_PBKDF2_ITERATIONS", "900000");
        std::env::set_var("KEYWARD_LOGGING_LEVEL", "trace");
    }
    let result = load_config_from_path(file.path());
    unsafe {
        std::env::remove_var("KEYWARD_MIGRATION_TARGET_PBKDF2_ITERATIONS");
        std::env::remove_var("KEYWARD_LOGGING_LEVEL");
    }

    let config = result.expect("env overrides validate");
    assert_eq!(config.migration.target_pbkdf2_iterations, 900_000);
    assert_eq!(config.logging.level, "trace");
}

#[test]
#[serial]
fn invalid_env_value_fails_validation() {
    let file = write_config("");

    unsafe {
        std::env::set_var("KEYWARD_KDF_PBKDF2_ITERATIONS", "10");
    }
    let result = load_config_from_path(file.path());
    unsafe {
        std::env::remove_var("KEYWARD_KDF_PBKDF2_ITERATIONS");
    }

    let errors = result.unwrap_err();
    assert!(matches!(errors[0], ConfigError::Validation { .. }));
}

#[test]
#[serial]
fn missing_file_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = load_config_from_path(&dir.path().join("absent.toml")).unwrap();
    assert_eq!(config, KeywardConfig::default());
}
