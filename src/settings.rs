use std::path::Path;

use serde::Deserialize;

/// User-facing configuration, keyed the way a host editor stores it.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct Settings {
    /// Master switch; when off the runner never touches a document.
    pub enable: bool,
    /// Whether to format before a document is persisted.
    pub onsave: bool,
    /// Location of the formatter binary, a path or a command name.
    pub executable_path: String,
    /// Windows-specific override, taking precedence there when non-empty.
    pub executable_path_windows: Option<String>,
    /// Coding standard passed through to the tool.
    pub standard: Option<String>,
    /// Whether this runner registers as the editor's formatting backend.
    pub document_formatting_provider: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            enable: true,
            onsave: true,
            executable_path: default_executable_path().to_string(),
            executable_path_windows: None,
            standard: None,
            document_formatting_provider: true,
        }
    }
}

/// `php-cbf.bat` is the launcher the tool ships for Windows.
fn default_executable_path() -> &'static str {
    if cfg!(windows) {
        "php-cbf.bat"
    } else {
        "phpcbf"
    }
}

impl Settings {
    /// Settings files are JSON5, so user configs may carry comments and
    /// trailing commas.
    pub fn from_json_str(json: &str) -> anyhow::Result<Self> {
        Ok(serde_json5::from_str(json)?)
    }

    /// The executable to invoke on this platform, with `${workspaceRoot}`
    /// substituted and a leading `~/` expanded to the home directory.
    pub fn resolved_executable_path(&self, workspace_root: Option<&Path>) -> String {
        let path = if cfg!(windows) {
            match &self.executable_path_windows {
                Some(windows_path) if !windows_path.is_empty() => windows_path,
                _ => &self.executable_path,
            }
        } else {
            &self.executable_path
        };
        expand_path(path, workspace_root)
    }
}

fn expand_path(path: &str, workspace_root: Option<&Path>) -> String {
    let path = match workspace_root {
        Some(root) => path.replace("${workspaceRoot}", &root.to_string_lossy()),
        None => path.to_string(),
    };
    match path.strip_prefix("~/") {
        Some(rest) => match etcetera::home_dir() {
            Ok(home) => home.join(rest).to_string_lossy().into_owned(),
            Err(error) => {
                log::info!("Failed to locate the home directory: {error:?}");
                path
            }
        },
        None => path,
    }
}

#[cfg(test)]
mod test_settings {
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    use super::{expand_path, Settings};

    #[test]
    fn defaults() {
        let settings = Settings::default();
        assert!(settings.enable);
        assert!(settings.onsave);
        assert!(settings.document_formatting_provider);
        assert_eq!(settings.standard, None);
        assert_eq!(settings.executable_path_windows, None);
        if cfg!(windows) {
            assert_eq!(settings.executable_path, "php-cbf.bat");
        } else {
            assert_eq!(settings.executable_path, "phpcbf");
        }
    }

    #[test]
    fn settings_files_may_carry_comments_and_omit_fields() -> anyhow::Result<()> {
        let settings = Settings::from_json_str(indoc! {r#"
            {
                // Use the project-local install.
                executablePath: "${workspaceRoot}/vendor/bin/phpcbf",
                standard: "PSR12",
                onsave: false,
            }
        "#})?;
        assert_eq!(
            settings.executable_path,
            "${workspaceRoot}/vendor/bin/phpcbf"
        );
        assert_eq!(settings.standard, Some("PSR12".to_string()));
        assert!(!settings.onsave);
        // Omitted fields keep their defaults.
        assert!(settings.enable);
        assert!(settings.document_formatting_provider);
        Ok(())
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(Settings::from_json_str(r#"{ "executibalePath": "phpcbf" }"#).is_err());
    }

    #[test]
    fn workspace_root_is_substituted() {
        let resolved = expand_path(
            "${workspaceRoot}/vendor/bin/phpcbf",
            Some(std::path::Path::new("/home/user/project")),
        );
        assert_eq!(resolved, "/home/user/project/vendor/bin/phpcbf");
    }

    #[test]
    fn workspace_root_placeholder_survives_without_a_root() {
        let resolved = expand_path("${workspaceRoot}/vendor/bin/phpcbf", None);
        assert_eq!(resolved, "${workspaceRoot}/vendor/bin/phpcbf");
    }

    #[test]
    fn leading_tilde_expands_to_the_home_directory() -> anyhow::Result<()> {
        let home = etcetera::home_dir()?;
        let resolved = expand_path("~/bin/phpcbf", None);
        assert_eq!(
            resolved,
            home.join("bin/phpcbf").to_string_lossy().into_owned()
        );
        Ok(())
    }

    #[test]
    fn tilde_is_only_expanded_as_a_leading_component() {
        assert_eq!(expand_path("/opt/~/phpcbf", None), "/opt/~/phpcbf");
    }

    #[cfg(not(windows))]
    #[test]
    fn the_windows_override_is_ignored_elsewhere() {
        let settings = Settings {
            executable_path_windows: Some("C:\\php\\php-cbf.bat".to_string()),
            ..Settings::default()
        };
        assert_eq!(settings.resolved_executable_path(None), "phpcbf");
    }
}
