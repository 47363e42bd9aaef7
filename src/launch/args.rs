// SPDX-License-Identifier: MIT

//! Rewrites the full JVM argument vector for the sandbox.
//!
//! A single left to right pass applies the per-argument rules.  Flag values are
//! rewritten at the value's index, and the index of the first `-D` argument is
//! remembered as the injection point for the sandbox-only properties that are
//! inserted once the pass is over.  Inserting as a block at the position of an
//! existing argument keeps every `<flag> <value>` pair together.

use tracing::{debug, warn};

use super::classpath::{ClasspathRewriter, StagedEntry};
use super::command::{PROPERTY_PREFIX, jvm_property, property_prefix};
use super::error::{RewriteError, RewriteWarning};
use super::fs::FileSystem;
use super::redirect;

/// JVM properties that set where native binaries are extracted and loaded from.
pub static NATIVE_PATH_PROPERTIES: &[&str] = &[
    "java.library.path",
    "jna.tmpdir",
    "org.lwjgl.system.SharedLibraryExtractPath",
    "io.netty.native.workdir",
];

pub const TMPDIR_PROPERTY: &str = "java.io.tmpdir";

const CLASSPATH_FLAGS: [&str; 2] = ["-classpath", "-cp"];
const VERSION_TYPE_FLAG: &str = "--versionType";
const GAME_DIR_FLAG: &str = "--gameDir";
const ASSETS_DIR_FLAG: &str = "--assetsDir";
const JAVA_AGENT_PREFIX: &str = "-javaagent";

const ASSETS_DIR: &str = "assets";
const TEMP_DIR: &str = "temp";
const NATIVE_DIR: &str = "bin";

/// Tunables for the argument rewrite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteConfig {
    /// Main class the launcher is started with.
    pub entry_point: String,
    /// Main class of the runtime inside the sandbox, replacing `entry_point`.
    pub runtime_entry_point: String,
    /// Path properties redirected into the sandbox, on top of [`NATIVE_PATH_PROPERTIES`].
    pub extra_rewrite_properties: Vec<String>,
    /// Property that tells the sandboxed runtime where the named pipe lives.
    pub ipc_property: String,
    /// `--versionType` value that is replaced outright rather than suffixed.
    pub release_marker: String,
    pub sandbox_version_marker: String,
}

impl Default for RewriteConfig {
    fn default() -> Self {
        Self {
            entry_point: "net.fabricmc.sandbox.Main".to_string(),
            runtime_entry_point: "net.fabricmc.sandbox.runtime.Main".to_string(),
            extra_rewrite_properties: vec![],
            ipc_property: "sandbox.namedPipe".to_string(),
            release_marker: "release".to_string(),
            sandbox_version_marker: "Sandbox".to_string(),
        }
    }
}

/// The argument vector to execute, plus what happened while producing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewrittenLaunch {
    pub args: Vec<String>,
    pub staged: Vec<StagedEntry>,
    pub warnings: Vec<RewriteWarning>,
}

/// State carried across the scan of the argument vector.
#[derive(Debug, Default)]
struct ScanState {
    injection_point: Option<usize>,
    version_type: VersionType,
    staged: Vec<StagedEntry>,
    warnings: Vec<RewriteWarning>,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
enum VersionType {
    #[default]
    Absent,
    Tagged,
    /// `--versionType` is the last argument.
    MissingValue,
}

/// How the scan treats one argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rule {
    EntryPoint,
    Property,
    Flag(Flag),
    Other,
}

/// Flags whose following argument is rewritten.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flag {
    Classpath,
    VersionType,
    GameDir,
    AssetsDir,
}

pub struct ArgumentRewriter {
    config: RewriteConfig,
    install_root: String,
    sandbox_root: String,
}

impl ArgumentRewriter {
    pub fn new(
        config: RewriteConfig,
        install_root: impl Into<String>,
        sandbox_root: impl Into<String>,
    ) -> Self {
        Self {
            config,
            install_root: install_root.into(),
            sandbox_root: sandbox_root.into(),
        }
    }

    pub fn config(&self) -> &RewriteConfig {
        &self.config
    }

    /// Produce the arguments for the sandboxed JVM.
    pub fn rewrite<F: FileSystem + ?Sized>(
        &self,
        fs: &F,
        args: Vec<String>,
        ipc_endpoint: &str,
    ) -> Result<RewrittenLaunch, RewriteError> {
        debug!(?args, "sandboxing arguments");
        let mut args = args;

        let mut state = (0..args.len()).try_fold(ScanState::default(), |state, idx| {
            self.rewrite_arg(fs, &mut args, idx, state)
        })?;

        match state.injection_point {
            Some(at) => {
                let properties = self.sandbox_properties(&mut args, ipc_endpoint);
                args.splice(at..at, properties);
            }
            None => {
                let warning = RewriteWarning::NoInjectionPoint;
                warn!("{warning}");
                state.warnings.push(warning);
            }
        }

        match state.version_type {
            VersionType::Tagged => (),
            VersionType::Absent => {
                args.push(VERSION_TYPE_FLAG.to_string());
                args.push(self.config.sandbox_version_marker.clone());
            }
            // The dangling flag is still the last argument, give it the marker as its value.
            VersionType::MissingValue => args.push(self.config.sandbox_version_marker.clone()),
        }

        // Agents never attach to the sandboxed process.
        args.retain(|arg| {
            let agent = arg.starts_with(JAVA_AGENT_PREFIX);
            if agent {
                debug!(%arg, "dropping java agent");
            }
            !agent
        });

        debug!(?args, "sandboxed arguments");
        Ok(RewrittenLaunch {
            args,
            staged: state.staged,
            warnings: state.warnings,
        })
    }

    fn rewrite_arg<F: FileSystem + ?Sized>(
        &self,
        fs: &F,
        args: &mut [String],
        idx: usize,
        mut state: ScanState,
    ) -> Result<ScanState, RewriteError> {
        match self.rule_for(&args[idx]) {
            Rule::EntryPoint => args[idx] = self.config.runtime_entry_point.clone(),
            Rule::Property => {
                state.injection_point.get_or_insert(idx);
            }
            Rule::Flag(flag) if idx + 1 == args.len() => {
                if flag == Flag::VersionType {
                    state.version_type = VersionType::MissingValue;
                }
                let warning = RewriteWarning::MissingFlagValue { flag: args[idx].clone() };
                warn!("{warning}");
                state.warnings.push(warning);
            }
            Rule::Flag(flag) => self.rewrite_flag_value(fs, flag, &mut args[idx + 1], &mut state)?,
            Rule::Other => (),
        }

        if let Some(redirected) = self.redirect_property(&args[idx]) {
            args[idx] = redirected;
        }
        Ok(state)
    }

    fn rule_for(&self, arg: &str) -> Rule {
        if arg == self.config.entry_point {
            return Rule::EntryPoint;
        }
        if arg.starts_with(PROPERTY_PREFIX) {
            return Rule::Property;
        }
        match arg {
            _ if CLASSPATH_FLAGS.contains(&arg) => Rule::Flag(Flag::Classpath),
            VERSION_TYPE_FLAG => Rule::Flag(Flag::VersionType),
            GAME_DIR_FLAG => Rule::Flag(Flag::GameDir),
            ASSETS_DIR_FLAG => Rule::Flag(Flag::AssetsDir),
            _ => Rule::Other,
        }
    }

    fn rewrite_flag_value<F: FileSystem + ?Sized>(
        &self,
        fs: &F,
        flag: Flag,
        value: &mut String,
        state: &mut ScanState,
    ) -> Result<(), RewriteError> {
        match flag {
            Flag::Classpath => {
                let rewrite = ClasspathRewriter::new(fs, &self.install_root, &self.sandbox_root)
                    .rewrite(value)?;
                *value = rewrite.classpath;
                state.staged.extend(rewrite.staged);
                state.warnings.extend(rewrite.warnings);
            }
            Flag::VersionType => {
                state.version_type = VersionType::Tagged;
                *value = self.tag_version_type(value);
            }
            Flag::GameDir => *value = redirect::with_trailing_separator(&self.sandbox_root),
            Flag::AssetsDir => *value = redirect::join(&self.sandbox_root, ASSETS_DIR),
        }
        Ok(())
    }

    /// Mark the version type, so the game shows that it runs in a sandbox.
    fn tag_version_type(&self, value: &str) -> String {
        let marker = &self.config.sandbox_version_marker;
        if value == self.config.release_marker {
            marker.clone()
        } else {
            format!("{value}/{marker}")
        }
    }

    /// Move a path property's value into the sandbox.  Values outside of the
    /// installation directory are left alone.
    fn redirect_property(&self, arg: &str) -> Option<String> {
        let extra = self.config.extra_rewrite_properties.iter().map(String::as_str);
        NATIVE_PATH_PROPERTIES.iter().copied().chain(extra).find_map(|name| {
            let prefix = property_prefix(name);
            let value = arg.strip_prefix(prefix.as_str())?;
            let remapped = redirect::remap(value, &self.install_root, &self.sandbox_root).ok()?;
            debug!(property = name, value, %remapped, "redirected property");
            Some(format!("{prefix}{remapped}"))
        })
    }

    /// The properties to insert at the injection point.  Anything the launch
    /// already sets is kept; an existing named pipe property is updated in place.
    fn sandbox_properties(&self, args: &mut [String], ipc_endpoint: &str) -> Vec<String> {
        let temp_dir = redirect::join(&self.sandbox_root, TEMP_DIR);
        let native_dir = redirect::join(&temp_dir, NATIVE_DIR);
        let mut properties = vec![];

        // Block order is pipe, native paths last to first, then tmpdir.
        let ipc_prefix = property_prefix(&self.config.ipc_property);
        let ipc = format!("{ipc_prefix}{ipc_endpoint}");
        match args.iter_mut().find(|arg| arg.starts_with(ipc_prefix.as_str())) {
            Some(existing) => *existing = ipc,
            None => properties.push(ipc),
        }

        for name in NATIVE_PATH_PROPERTIES.iter().rev() {
            if jvm_property(args, name).is_none() {
                properties.push(format!("{}{native_dir}", property_prefix(name)));
            }
        }
        if jvm_property(args, TMPDIR_PROPERTY).is_none() {
            properties.push(format!("{}{temp_dir}", property_prefix(TMPDIR_PROPERTY)));
        }
        properties
    }
}
