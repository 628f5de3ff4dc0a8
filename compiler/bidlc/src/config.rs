//! Session configuration and command-line parsing.

use bidl_diagnostic::DiagnosticConfig;

/// Settings for one compilation session.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SessionConfig {
    pub diagnostics: DiagnosticConfig,
    /// Print the registry contents after compilation.
    pub dump_types: bool,
}

/// A type declared on the command line.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Declaration {
    Parcelable { package: String, name: String },
    Interface {
        package: String,
        name: String,
        oneway: bool,
    },
}

impl Declaration {
    fn parcelable(qualified: &str) -> Self {
        let (package, name) = split_qualified(qualified);
        Declaration::Parcelable { package, name }
    }

    fn interface(qualified: &str, oneway: bool) -> Self {
        let (package, name) = split_qualified(qualified);
        Declaration::Interface {
            package,
            name,
            oneway,
        }
    }
}

/// Everything the command line asks for.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct CliOptions {
    pub session: SessionConfig,
    /// Declarations, in command-line order.
    pub declarations: Vec<Declaration>,
    /// Type references to resolve and marshal.
    pub type_refs: Vec<String>,
}

#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum OptionError {
    #[error("invalid value for --error-limit: `{0}`")]
    BadErrorLimit(String),
    #[error("missing type name in `{0}`")]
    MissingName(String),
    #[error("unknown option `{0}`")]
    Unknown(String),
}

/// Split `pkg.sub.Name` at the last dot. No dot means the default package.
pub fn split_qualified(qualified: &str) -> (String, String) {
    match qualified.rsplit_once('.') {
        Some((package, name)) => (package.to_string(), name.to_string()),
        None => (String::new(), qualified.to_string()),
    }
}

fn declared_name<'a>(arg: &'a str, value: &'a str) -> Result<&'a str, OptionError> {
    if value.is_empty() || value.ends_with('.') {
        Err(OptionError::MissingName(arg.to_string()))
    } else {
        Ok(value)
    }
}

/// Parse command-line arguments (without the program name).
pub fn parse_options(args: &[String]) -> Result<CliOptions, OptionError> {
    let mut options = CliOptions::default();

    for arg in args {
        if let Some(limit) = arg.strip_prefix("--error-limit=") {
            options.session.diagnostics.error_limit = limit
                .parse()
                .map_err(|_| OptionError::BadErrorLimit(limit.to_string()))?;
        } else if arg == "--no-dedup" {
            options.session.diagnostics.deduplicate = false;
        } else if arg == "--dump-types" {
            options.session.dump_types = true;
        } else if let Some(name) = arg.strip_prefix("--parcelable=") {
            let name = declared_name(arg, name)?;
            options.declarations.push(Declaration::parcelable(name));
        } else if let Some(name) = arg.strip_prefix("--interface=") {
            let name = declared_name(arg, name)?;
            options.declarations.push(Declaration::interface(name, false));
        } else if let Some(name) = arg.strip_prefix("--oneway-interface=") {
            let name = declared_name(arg, name)?;
            options.declarations.push(Declaration::interface(name, true));
        } else if arg.starts_with("--") {
            return Err(OptionError::Unknown(arg.clone()));
        } else {
            options.type_refs.push(arg.clone());
        }
    }

    Ok(options)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn parses_flags_declarations_and_refs() {
        let options = parse_options(&args(&[
            "--error-limit=3",
            "--no-dedup",
            "--dump-types",
            "--parcelable=pkg.Foo",
            "--oneway-interface=pkg.sub.IBar",
            "List<pkg.Foo>",
        ]))
        .unwrap();

        assert_eq!(options.session.diagnostics.error_limit, 3);
        assert!(!options.session.diagnostics.deduplicate);
        assert!(options.session.dump_types);
        assert_eq!(
            options.declarations,
            vec![
                Declaration::Parcelable {
                    package: "pkg".to_string(),
                    name: "Foo".to_string(),
                },
                Declaration::Interface {
                    package: "pkg.sub".to_string(),
                    name: "IBar".to_string(),
                    oneway: true,
                },
            ]
        );
        assert_eq!(options.type_refs, vec!["List<pkg.Foo>".to_string()]);
    }

    #[test]
    fn defaults_without_flags() {
        let options = parse_options(&[]).unwrap();
        assert_eq!(options.session, SessionConfig::default());
        assert_eq!(options.session.diagnostics.error_limit, 10);
    }

    #[test]
    fn rejects_bad_input() {
        assert_eq!(
            parse_options(&args(&["--error-limit=many"])),
            Err(OptionError::BadErrorLimit("many".to_string()))
        );
        assert_eq!(
            parse_options(&args(&["--parcelable=pkg."])),
            Err(OptionError::MissingName("--parcelable=pkg.".to_string()))
        );
        assert_eq!(
            parse_options(&args(&["--verbose"])),
            Err(OptionError::Unknown("--verbose".to_string()))
        );
    }

    #[test]
    fn default_package_declaration() {
        assert_eq!(
            split_qualified("Loose"),
            (String::new(), "Loose".to_string())
        );
    }
}
