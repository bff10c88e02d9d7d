//! UI build and embedding orchestration.
//!
//! Pipeline phases:
//! - **Stage** - Copy the UI project into the build tree, rewrite package.json
//! - **Gate** - Decide from the build mode whether the UI build runs
//! - **Build** - Version check, install, link, build script (only when gated in)
//! - **Embed** - Collect, compress, emit, render and write the header

use crate::{
    asset::collect,
    cli::Cli,
    config::{Config, OutputConfig, ToolConfig},
    core::{BuildMode, BuildRunner, CancelToken, Decision, EmbedResult, run_gated},
    debug, log,
    manifest::{Manifest, artifact_wanted, render, write, write_artifact},
    package::{UiPackage, stage, strip_resolutions},
    tool::{BuildScript, Tool, needs_install},
    utils::{path::normalize_path, plural_count},
};
use anyhow::Result;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;

/// Absolute locations used by one run.
#[derive(Debug, Clone)]
pub struct Layout {
    /// UI directory of the shared package (link target).
    pub package_ui: PathBuf,
    /// UI directory in the project sources.
    pub source_ui: PathBuf,
    /// Staged UI directory the build runs in.
    pub build_ui: PathBuf,
    /// Build output scanned for assets.
    pub dist: PathBuf,
    /// Generated header.
    pub artifact: PathBuf,
}

impl Layout {
    pub fn new(cli: &Cli, config: &Config) -> Self {
        let ui_dir = &config.package.ui_dir;
        let build_ui = normalize_path(&cli.build_root).join(ui_dir);
        let dist = build_ui.join(&config.output.dist_dir);

        Self {
            package_ui: normalize_path(&cli.package_root).join(ui_dir),
            source_ui: normalize_path(&cli.source_root).join(ui_dir),
            artifact: dist.join(&config.output.artifact),
            build_ui,
            dist,
        }
    }
}

/// Run the whole pipeline for the command line.
pub fn build_ui(cli: &Cli, config: &Config, cancel: CancelToken) -> Result<()> {
    let layout = Layout::new(cli, config);
    debug!("ui"; "{:#?}", layout);

    let shared = UiPackage::open(&layout.package_ui)?;
    let project = prepare_project(&layout, config)?;

    let runner = UiBuild {
        tool: &config.tool,
        link_target: config.tool.link.then(|| shared.dir()),
        cancel,
    };
    let decision = run_gated(cli.build_mode, &layout.artifact, &runner, project.dir())?;

    let manifest = embed(&layout.dist, &layout.artifact, &config.output, cli.build_mode)?;
    log_summary(&manifest, &layout.artifact, cli.build_mode, decision);

    Ok(())
}

/// Stage the project UI into the build tree and open it.
fn prepare_project(layout: &Layout, config: &Config) -> EmbedResult<UiPackage> {
    if layout.build_ui != layout.source_ui {
        let count = stage(&layout.source_ui, &layout.build_ui)?;
        debug!("ui"; "staged {} into {}", plural_count(count, "file"), layout.build_ui.display());
    }

    let project = UiPackage::open(&layout.build_ui)?;
    if config.package.strip_resolutions && strip_resolutions(&project.package_json())? {
        debug!("ui"; "removed resolutions from {}", project.package_json().display());
    }
    Ok(project)
}

/// Collect the build output and write every derived file.
///
/// The manifest is fully built before anything is written, so a collision
/// or a missing output directory leaves the disk untouched.
pub fn embed(dist: &Path, artifact: &Path, output: &OutputConfig, mode: BuildMode) -> EmbedResult<Manifest> {
    let raw = collect(dist, output.sort)?;
    let manifest = Manifest::build(raw)?;
    let text = render(&manifest, &output.style());

    write(&manifest)?;
    if artifact_wanted(&manifest, mode) {
        write_artifact(artifact, &text)?;
    }
    Ok(manifest)
}

fn log_summary(manifest: &Manifest, artifact: &Path, mode: BuildMode, decision: Decision) {
    if !artifact_wanted(manifest, mode) {
        log!("warning"; "no assets found, keeping {}", artifact.display());
        return;
    }
    let origin = match decision {
        Decision::Run => "",
        Decision::Skip(_) => " from previous build output",
    };
    log!(
        "embed";
        "{} ({} bytes compressed){} -> {}",
        plural_count(manifest.len(), "asset"),
        manifest.total_size(),
        origin,
        artifact.display()
    );
}

// ============================================================================
// UI build runner
// ============================================================================

/// The full external build: tool checks, dependency install, package link,
/// then the build script. Nothing here runs when the gate skips the build.
struct UiBuild<'a> {
    tool: &'a ToolConfig,
    link_target: Option<&'a Path>,
    cancel: CancelToken,
}

impl BuildRunner for UiBuild<'_> {
    fn describe(&self) -> String {
        format!("{} {}", self.tool.command, self.tool.build_script)
    }

    fn run(&self, working_dir: &Path) -> EmbedResult<ExitStatus> {
        let tool = Tool::resolve(self.tool, self.cancel.clone())?;
        if let Some(min) = self.tool.min_version() {
            tool.check_version(working_dir, &min)?;
        }

        if self.tool.install && needs_install(working_dir) {
            tool.install(working_dir)?;
        }
        if let Some(target) = self.link_target {
            tool.link(target, working_dir)?;
        }

        log!("ui"; "building {}", working_dir.display());
        BuildScript::new(&tool, &self.tool.build_script).run(working_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::EmbedError;
    use std::fs;
    use tempfile::TempDir;

    fn dist_with(files: &[(&str, &str)]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for (name, content) in files {
            fs::write(dir.path().join(name), content).unwrap();
        }
        dir
    }

    #[test]
    fn test_embed_end_to_end() {
        let dist = dist_with(&[("index.html", "<html></html>"), ("main.js", "console.log(1)")]);
        let artifact = dist.path().join("ui.hpp");

        let manifest = embed(dist.path(), &artifact, &OutputConfig::default(), BuildMode::Full).unwrap();
        assert_eq!(manifest.len(), 2);

        let header = fs::read_to_string(&artifact).unwrap();
        for symbol in ["index_html", "main_js"] {
            assert!(header.contains(&format!("extern \"C\" const uint8_t {symbol}_start[];")));
            assert!(header.contains(&format!("extern \"C\" const uint8_t {symbol}_end[];")));
        }
        assert!(header.contains("ui->addAsset(\"/\", \"text/html; charset=UTF-8\", index_html_start, index_html_end, \"gzip\""));
        assert!(header.contains("ui->addAsset(\"/main.js\", \"application/javascript\", main_js_start, main_js_end, \"gzip\""));

        for file in ["index.html.gz", "index.html.S", "main.js.gz", "main.js.S"] {
            assert!(dist.path().join(file).is_file(), "{file}");
        }
    }

    #[test]
    fn test_embed_is_reproducible() {
        let dist = dist_with(&[("index.html", "<html></html>"), ("app.js", "let a = 1;")]);
        let artifact = dist.path().join("ui.hpp");

        embed(dist.path(), &artifact, &OutputConfig::default(), BuildMode::Full).unwrap();
        let first = fs::read(&artifact).unwrap();
        // Second run also sees the .gz/.S outputs of the first; they are not embedded
        embed(dist.path(), &artifact, &OutputConfig::default(), BuildMode::Full).unwrap();
        assert_eq!(fs::read(&artifact).unwrap(), first);
    }

    #[test]
    fn test_embed_missing_dist_leaves_artifact() {
        let root = TempDir::new().unwrap();
        let artifact = root.path().join("ui.hpp");
        fs::write(&artifact, "previous").unwrap();

        let err = embed(&root.path().join("dist"), &artifact, &OutputConfig::default(), BuildMode::Full)
            .unwrap_err();
        assert!(matches!(err, EmbedError::DirectoryNotFound(_)));
        assert_eq!(fs::read_to_string(&artifact).unwrap(), "previous");
    }

    #[test]
    fn test_embed_collision_writes_nothing() {
        let dist = dist_with(&[("a-b.js", "1"), ("a.b.js", "2")]);
        let artifact = dist.path().join("ui.hpp");

        let err = embed(dist.path(), &artifact, &OutputConfig::default(), BuildMode::Full).unwrap_err();
        assert!(matches!(err, EmbedError::SymbolCollision { .. }));
        assert!(!artifact.exists());
        assert!(!dist.path().join("a-b.js.gz").exists());
    }

    #[test]
    fn test_embed_empty_full_keeps_artifact() {
        let dist = dist_with(&[("style.css", "body{}")]);
        let artifact = dist.path().join("ui.hpp");
        fs::write(&artifact, "previous").unwrap();

        let manifest = embed(dist.path(), &artifact, &OutputConfig::default(), BuildMode::Full).unwrap();
        assert!(manifest.is_empty());
        assert_eq!(fs::read_to_string(&artifact).unwrap(), "previous");
    }

    #[test]
    fn test_embed_empty_never_writes_artifact() {
        let dist = dist_with(&[]);
        let artifact = dist.path().join("ui.hpp");

        embed(dist.path(), &artifact, &OutputConfig::default(), BuildMode::Never).unwrap();
        let header = fs::read_to_string(&artifact).unwrap();
        assert!(header.contains("static inline void initUi(Ui* ui) {"));
        assert!(!header.contains("addAsset"));
    }

    #[test]
    fn test_layout() {
        let root = TempDir::new().unwrap();
        let cli = Cli {
            package_root: root.path().join("esp32m"),
            source_root: root.path().join("project"),
            build_root: root.path().join("build"),
            build_mode: BuildMode::Full,
            config: None,
            color: clap::ColorChoice::Auto,
            verbose: false,
        };
        let layout = Layout::new(&cli, &Config::default());

        assert!(layout.package_ui.ends_with("esp32m/web-ui"));
        assert!(layout.source_ui.ends_with("project/web-ui"));
        assert!(layout.build_ui.ends_with("build/web-ui"));
        assert!(layout.artifact.ends_with("build/web-ui/dist/ui.hpp"));
        assert!(layout.artifact.is_absolute());
    }

    #[test]
    fn test_prepare_project_stages_and_rewrites() {
        let root = TempDir::new().unwrap();
        let source_ui = root.path().join("project/web-ui");
        fs::create_dir_all(source_ui.join("node_modules/x")).unwrap();
        fs::write(source_ui.join("package.json"), r#"{"name":"ui","resolutions":{}}"#).unwrap();

        let layout = Layout {
            package_ui: root.path().join("esp32m/web-ui"),
            source_ui: source_ui.clone(),
            build_ui: root.path().join("build/web-ui"),
            dist: root.path().join("build/web-ui/dist"),
            artifact: root.path().join("build/web-ui/dist/ui.hpp"),
        };
        let project = prepare_project(&layout, &Config::default()).unwrap();

        assert_eq!(project.dir(), layout.build_ui);
        assert!(!layout.build_ui.join("node_modules").exists());
        let staged = fs::read_to_string(project.package_json()).unwrap();
        assert!(!staged.contains("resolutions"));
        // Source is untouched
        assert!(fs::read_to_string(source_ui.join("package.json")).unwrap().contains("resolutions"));
    }

    #[test]
    fn test_never_mode_skips_tool() {
        let root = TempDir::new().unwrap();
        let config = ToolConfig {
            command: "embedui-no-such-package-manager".into(),
            ..Default::default()
        };
        let runner = UiBuild {
            tool: &config,
            link_target: None,
            cancel: CancelToken::new(),
        };

        // The tool does not exist, so running it would fail
        let artifact = root.path().join("ui.hpp");
        assert!(run_gated(BuildMode::Never, &artifact, &runner, root.path()).is_ok());
        let err = run_gated(BuildMode::Full, &artifact, &runner, root.path()).unwrap_err();
        assert!(matches!(err, EmbedError::ToolNotFound { .. }));
    }
}
