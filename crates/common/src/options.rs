//! Plugin configuration
//!
//! Options are layered: defaults, then an optional YAML file, then CLI flags
//! or environment variables, then the `parameter` string protoc forwards from
//! `--protodoc_opt=...`.

use crate::{DocFormat, GeneratorError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Settings that control how documentation is rendered
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct PluginOptions {
    /// Output format of every generated document
    pub format: DocFormat,
    /// Template file replacing the built-in Markdown/HTML template
    pub template: Option<PathBuf>,
    /// Render message and enum type references as hyperlinks
    pub links: bool,
    /// Also document files from the protoc well-known library
    pub include_well_known: bool,
}

impl Default for PluginOptions {
    fn default() -> Self {
        Self {
            format: DocFormat::Markdown,
            template: None,
            links: true,
            include_well_known: false,
        }
    }
}

impl PluginOptions {
    /// Load options from a YAML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            GeneratorError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        serde_yaml::from_str(&content).map_err(|e| {
            GeneratorError::Config(format!(
                "Failed to parse config YAML from {:?}: {}",
                path, e
            ))
        })
    }

    /// Apply a protoc plugin parameter string on top of these options
    ///
    /// The parameter is a comma-separated list of `key=value` pairs. A bare
    /// format name (`html`, `json`, `markdown`) is accepted as shorthand for
    /// `format=<name>`.
    ///
    /// # Examples
    /// ```
    /// use protodoc_common::{DocFormat, PluginOptions};
    ///
    /// let mut options = PluginOptions::default();
    /// options.apply_parameter("format=html,links=false").unwrap();
    /// assert_eq!(options.format, DocFormat::Html);
    /// assert!(!options.links);
    /// ```
    pub fn apply_parameter(&mut self, parameter: &str) -> Result<()> {
        for entry in parameter
            .split(',')
            .map(str::trim)
            .filter(|e| !e.is_empty())
        {
            let Some((key, value)) = entry.split_once('=') else {
                self.format = entry.parse()?;
                continue;
            };

            let value = value.trim();
            match key.trim() {
                "format" => self.format = value.parse()?,
                "template" => {
                    self.template = if value.is_empty() {
                        None
                    } else {
                        Some(PathBuf::from(value))
                    }
                }
                "links" => self.links = parse_flag(key, value)?,
                "include_well_known" => self.include_well_known = parse_flag(key, value)?,
                other => {
                    return Err(GeneratorError::Config(format!(
                        "Unknown plugin parameter `{}`",
                        other
                    )))
                }
            }
        }

        Ok(())
    }
}

fn parse_flag(key: &str, value: &str) -> Result<bool> {
    value.parse().map_err(|_| {
        GeneratorError::Config(format!(
            "Parameter `{}` expects true or false, got `{}`",
            key.trim(),
            value
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let options = PluginOptions::default();
        assert_eq!(options.format, DocFormat::Markdown);
        assert!(options.links);
        assert!(!options.include_well_known);
        assert!(options.template.is_none());
    }

    #[test]
    fn test_apply_parameter() {
        let mut options = PluginOptions::default();
        options
            .apply_parameter("json, include_well_known=true ,template=docs/page.tera")
            .unwrap();

        assert_eq!(options.format, DocFormat::Json);
        assert!(options.include_well_known);
        assert_eq!(options.template, Some(PathBuf::from("docs/page.tera")));
    }

    #[test]
    fn test_apply_empty_parameter() {
        let mut options = PluginOptions::default();
        options.apply_parameter("").unwrap();
        assert_eq!(options, PluginOptions::default());
    }

    #[test]
    fn test_apply_parameter_rejects_unknown_key() {
        let mut options = PluginOptions::default();
        let err = options.apply_parameter("colour=blue").unwrap_err();
        assert!(matches!(err, GeneratorError::Config(_)));
    }

    #[test]
    fn test_apply_parameter_rejects_bad_flag() {
        let mut options = PluginOptions::default();
        assert!(options.apply_parameter("links=maybe").is_err());
    }

    #[test]
    fn test_load_yaml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "format: html\nlinks: false").unwrap();

        let options = PluginOptions::load(file.path()).unwrap();
        assert_eq!(options.format, DocFormat::Html);
        assert!(!options.links);
        assert!(!options.include_well_known);
    }

    #[test]
    fn test_load_yaml_rejects_unknown_field() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "formatt: html").unwrap();

        assert!(PluginOptions::load(file.path()).is_err());
    }
}
