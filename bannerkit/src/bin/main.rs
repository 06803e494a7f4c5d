//! CLI driver: decode a Wii banner/icon WAD and print a summary of the
//! resolved scene at one frame. See spec §6 for the documented surface and
//! exit codes; export bundling (ZIP/PNG/WAV writers) is an external
//! collaborator's job and is out of scope here — `--out` only writes a plain
//! text report, not rasterized assets.

use std::path::PathBuf;
use std::process::ExitCode;

use bannerkit_scene::{Engine, Locale, PlaybackMode, RenderState, SceneOptions, TitleLocale};
use bannerkit_syntax::diagnostics::{Level, Logger, RecordingLogger};
use bannerkit_syntax::error::ErrorKind;
use clap::Parser;

/// Decode a Wii banner/icon WAD into a resolved scene for one frame.
#[derive(Parser, Debug)]
#[command(name = "bannerkit", about = "Decode a Wii banner/icon WAD")]
struct Cli {
    /// Path to the input WAD file.
    input: PathBuf,

    /// Directory to write a plain-text parse/scene report into.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Render-state group to select, e.g. `RSO1`. Defaults to auto-selection.
    #[arg(long)]
    state: Option<String>,

    /// Title locale to filter panes by. Defaults to no filtering.
    #[arg(long, value_name = "JP|NE|GE|SP|IT|FR|US|KR")]
    locale: Option<String>,

    /// Frame to sample, as a global frame counter starting at 0.
    #[arg(long, default_value_t = 0.0)]
    frame: f32,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();
    ExitCode::from(run(&cli))
}

fn run(cli: &Cli) -> u8 {
    let recording = RecordingLogger::new();
    let logger: &dyn Logger = &recording;

    let data = match std::fs::read(&cli.input) {
        Ok(data) => data,
        Err(e) => {
            eprintln!("error: failed to read {}: {e}", cli.input.display());
            return 1;
        }
    };

    let loaded = match bannerkit::pipeline::load(&data, logger) {
        Ok(loaded) => loaded,
        Err(e) => {
            flush_log(&recording);
            eprintln!("error: {e}");
            return match e.kind {
                ErrorKind::DecryptFailure => 2,
                ErrorKind::NoRenderable => 3,
                _ => 1,
            };
        }
    };

    let options = match scene_options(cli) {
        Ok(options) => options,
        Err(msg) => {
            eprintln!("error: {msg}");
            return 1;
        }
    };

    let mut report = String::new();
    let mut any_target = false;

    if let Some(resource_set) = &loaded.banner {
        any_target = true;
        render_target("banner", resource_set, options.clone(), cli.frame, logger, &mut report);
    }
    if let Some(resource_set) = &loaded.icon {
        any_target = true;
        render_target("icon", resource_set, options, cli.frame, logger, &mut report);
    }

    if !any_target {
        flush_log(&recording);
        eprintln!("error: no renderable archive found");
        return 3;
    }

    flush_log(&recording);

    if let Some(out_dir) = &cli.out {
        if let Err(e) = std::fs::create_dir_all(out_dir) {
            eprintln!("error: failed to create {}: {e}", out_dir.display());
            return 1;
        }
        let report_path = out_dir.join("summary.txt");
        if let Err(e) = std::fs::write(&report_path, &report) {
            eprintln!("error: failed to write {}: {e}", report_path.display());
            return 1;
        }
        println!("wrote {}", report_path.display());
    } else {
        print!("{report}");
    }

    0
}

fn render_target(
    label: &str,
    resource_set: &bannerkit::pipeline::ResourceSet,
    options: SceneOptions,
    frame: f32,
    logger: &dyn Logger,
    report: &mut String,
) {
    use bannerkit::pipeline::layout_builder::deep_clone_for_mutation;
    use std::fmt::Write as _;

    let engine = Engine::new(
        deep_clone_for_mutation(&resource_set.layout),
        resource_set.animations.clone(),
        options,
        logger,
    );
    let sampled = engine.sample(frame, logger);

    let _ = writeln!(
        report,
        "== {label} ==\ncanvas: {}x{}\nframe: {frame}\ndraw items: {}",
        sampled.canvas_width,
        sampled.canvas_height,
        sampled.draw_items.len()
    );
    for item in &sampled.draw_items {
        let _ = writeln!(
            report,
            "  pane #{} {:?} alpha={:.3}",
            item.pane.index, item.pane.name, item.resolved.alpha
        );
    }
}

fn scene_options(cli: &Cli) -> Result<SceneOptions, String> {
    let render_state = match &cli.state {
        Some(name) => RenderState::Explicit(name.clone()),
        None => RenderState::Auto,
    };
    let title_locale = match &cli.locale {
        Some(code) => {
            let locale = Locale::from_code(code)
                .ok_or_else(|| format!("unrecognized locale code {code:?}"))?;
            TitleLocale::Explicit(locale)
        }
        None => TitleLocale::Auto,
    };

    Ok(SceneOptions {
        render_state,
        title_locale,
        pane_state_overrides: Default::default(),
        playback_mode: PlaybackMode::Loop,
        fps: 60,
    })
}

fn flush_log(recording: &RecordingLogger) {
    for entry in recording.entries() {
        let prefix = match entry.level {
            Level::Info => "info",
            Level::Warn => "warn",
            Level::Error => "error",
            Level::Success => "success",
        };
        eprintln!("[{prefix}] {}", entry.message);
    }
}
