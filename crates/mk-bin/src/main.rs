//! Modkey script runner.
//!
//! Feeds a keystroke script through the interpreter and prints the
//! stream of host effects (primitive key events, menu invocations,
//! mode changes, search submissions) one per line. Useful for
//! inspecting what a command sequence does to the host without
//! attaching to one.

mod notation;

use anyhow::{Context, Result};
use clap::Parser;
use core_dispatch::{Interpreter, KeyDisposition};
use core_host::{
    Host, HostError, InputSink, MenuAction, MenuActionInvoker, ModeIndicator, PrimitiveKey,
    SearchOverlay,
};
use core_keys::ModMask;
use core_state::Mode;
use std::io::Read;
use std::path::PathBuf;
use std::sync::Once;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "modkey", version, about = "Modal key interpreter script runner")]
struct Args {
    /// Keystroke script to interpret. Reads stdin when omitted.
    pub script: Option<String>,
    /// Read the script from a file instead of the command line.
    #[arg(long = "file", conflicts_with = "script")]
    pub file: Option<PathBuf>,
    /// Optional configuration file path (overrides discovery of `modkey.toml`).
    #[arg(long = "config")]
    pub config: Option<PathBuf>,
}

struct AppStartup {
    log_guard: Option<WorkerGuard>,
}

impl AppStartup {
    fn new() -> Self {
        Self { log_guard: None }
    }

    fn configure_logging(&mut self) {
        let file_appender = tracing_appender::rolling::never(".", "modkey.log");
        let (nb_writer, guard) = tracing_appender::non_blocking(file_appender);
        if tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_writer(nb_writer)
            .try_init()
            .is_ok()
        {
            self.log_guard = Some(guard);
        }
    }

    fn install_panic_hook() {
        static HOOK: Once = Once::new();
        HOOK.call_once(|| {
            let default_panic = std::panic::take_hook();
            std::panic::set_hook(Box::new(move |info| {
                tracing::error!(target: "runtime.panic", ?info, "panic");
                default_panic(info);
            }));
        });
    }
}

fn mods_suffix(mods: ModMask) -> String {
    let mut parts = Vec::new();
    if mods.contains(ModMask::CTRL) {
        parts.push("ctrl");
    }
    if mods.contains(ModMask::ALT) {
        parts.push("alt");
    }
    if mods.contains(ModMask::SHIFT) {
        parts.push("shift");
    }
    if mods.contains(ModMask::META) {
        parts.push("meta");
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!(" +{}", parts.join("+"))
    }
}

fn primitive_name(key: PrimitiveKey) -> &'static str {
    match key {
        PrimitiveKey::Left => "left",
        PrimitiveKey::Right => "right",
        PrimitiveKey::Up => "up",
        PrimitiveKey::Down => "down",
        PrimitiveKey::Home => "home",
        PrimitiveKey::End => "end",
        PrimitiveKey::Backspace => "backspace",
        PrimitiveKey::Enter => "enter",
        PrimitiveKey::Delete => "delete",
    }
}

struct PrintingSink;

impl InputSink for PrintingSink {
    fn send(&mut self, key: PrimitiveKey, mods: ModMask) {
        println!("key   {}{}", primitive_name(key), mods_suffix(mods));
    }
}

struct PrintingMenu;

impl MenuActionInvoker for PrintingMenu {
    fn invoke(&mut self, action: MenuAction) -> Result<(), HostError> {
        println!("menu  {}", action.name());
        Ok(())
    }
}

struct PrintingIndicator {
    last: Option<Mode>,
}

impl ModeIndicator for PrintingIndicator {
    fn show(&mut self, mode: Mode) {
        if self.last != Some(mode) {
            println!("mode  {mode}");
        }
        self.last = Some(mode);
    }
}

struct PrintingOverlay;

impl SearchOverlay for PrintingOverlay {
    async fn submit(&mut self, query: &str) -> Result<(), HostError> {
        println!("find  {query}");
        Ok(())
    }
}

fn read_script(args: &Args) -> Result<String> {
    if let Some(script) = &args.script {
        return Ok(script.clone());
    }
    if let Some(path) = &args.file {
        return std::fs::read_to_string(path)
            .with_context(|| format!("reading script {}", path.display()));
    }
    let mut buf = String::new();
    std::io::stdin()
        .read_to_string(&mut buf)
        .context("reading script from stdin")?;
    Ok(buf)
}

#[tokio::main]
async fn main() -> Result<()> {
    let mut startup = AppStartup::new();
    startup.configure_logging();
    AppStartup::install_panic_hook();

    let args = Args::parse();
    let config = core_config::load_from(args.config.clone())?;
    let keys = notation::parse_script(&read_script(&args)?)?;
    info!(target: "runtime", keys = keys.len(), "startup");

    let mut interp = Interpreter::new(&config);
    let mut host = Host::new(PrintingSink, PrintingMenu, PrintingIndicator { last: None });
    let mut overlay = PrintingOverlay;

    for key in keys {
        match interp.handle_key(key, &mut host) {
            KeyDisposition::PassThrough => println!("pass  {key}"),
            KeyDisposition::Handled => {}
            KeyDisposition::SearchStarted(query) => {
                interp.finish_search(&mut overlay, &mut host, &query).await;
            }
        }
    }

    info!(target: "runtime", final_mode = %interp.mode(), "shutdown");
    Ok(())
}
