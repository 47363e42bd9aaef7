// SPDX-License-Identifier: MIT

//! Read-only queries over the JVM launch command.

use super::error::RewriteError;
use super::redirect;

/// Prefix of a JVM system property argument, `-D<name>=<value>`.
pub const PROPERTY_PREFIX: &str = "-D";

/// The JVM command line handed to the launcher, with the java executable as
/// the first argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchCommand {
    args: Vec<String>,
}

impl LaunchCommand {
    pub fn new(args: Vec<String>) -> Self {
        Self { args }
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn into_args(self) -> Vec<String> {
        self.args
    }

    /// Value of the first `-D<name>=` argument.
    pub fn jvm_property(&self, name: &str) -> Option<&str> {
        jvm_property(&self.args, name)
    }

    /// The java executable.  A bare command name is looked up on the `PATH`.
    pub fn application_path(&self) -> Result<Option<String>, RewriteError> {
        let Some(first) = self.args.first() else {
            return Ok(None);
        };
        if redirect::parent(first).is_some() {
            return Ok(Some(first.clone()));
        }
        which::which(first)
            .map(|path| Some(path.to_string_lossy().into_owned()))
            .map_err(|error| RewriteError::UnresolvedApplication { name: first.clone(), error })
    }

    /// The Java installation the executable belongs to; `<home>\bin\java.exe`
    /// gives `<home>`.
    pub fn java_home(&self) -> Result<Option<String>, RewriteError> {
        Ok(self
            .application_path()?
            .and_then(|app| redirect::parent(&app).and_then(redirect::parent).map(str::to_string)))
    }
}

impl From<Vec<String>> for LaunchCommand {
    fn from(args: Vec<String>) -> Self {
        Self::new(args)
    }
}

/// The `-D<name>=` prefix for a property.
pub fn property_prefix(name: &str) -> String {
    format!("{PROPERTY_PREFIX}{name}=")
}

/// Value of the first `-D<name>=` argument.
pub fn jvm_property<'a>(args: &'a [String], name: &str) -> Option<&'a str> {
    let prefix = property_prefix(name);
    args.iter().find_map(|arg| arg.strip_prefix(prefix.as_str()))
}


#[cfg(test)]
mod tests {
    use super::*;

    fn command(args: &[&str]) -> LaunchCommand {
        LaunchCommand::new(args.iter().map(|a| a.to_string()).collect())
    }

    #[test]
    fn first_property_value_wins() {
        let cmd = command(&["java", "-Djava.io.tmpdir=A", "-Djava.io.tmpdir=B", "-Dother=C"]);
        assert_eq!(cmd.jvm_property("java.io.tmpdir"), Some("A"));
        assert_eq!(cmd.jvm_property("other"), Some("C"));
        assert_eq!(cmd.jvm_property("java.io"), None);
    }

    #[test]
    fn empty_property_value() {
        let cmd = command(&["java", "-Dsandbox.namedPipe="]);
        assert_eq!(cmd.jvm_property("sandbox.namedPipe"), Some(""));
    }

    #[test]
    fn java_home_from_executable_path() {
        let cmd = command(&[r"C:\Program Files\Java\jdk-21\bin\javaw.exe", "-cp", "x"]);
        assert_eq!(
            cmd.application_path().unwrap().as_deref(),
            Some(r"C:\Program Files\Java\jdk-21\bin\javaw.exe")
        );
        assert_eq!(cmd.java_home().unwrap().as_deref(), Some(r"C:\Program Files\Java\jdk-21"));
    }

    #[test]
    fn empty_command_has_no_application() {
        let cmd = command(&[]);
        assert_eq!(cmd.application_path().unwrap(), None);
        assert_eq!(cmd.java_home().unwrap(), None);
    }

    #[test]
    fn unknown_bare_command_fails_lookup() {
        let cmd = command(&["definitely-not-a-real-java-launcher-9f2c"]);
        match cmd.application_path().unwrap_err() {
            RewriteError::UnresolvedApplication { name, .. } => {
                assert_eq!(name, "definitely-not-a-real-java-launcher-9f2c");
            }
            e => panic!("unexpected error variant: {:?}", e),
        }
    }
}
