//! cmantic - a modal, keyboard-driven source code editor
//! Main entry point

use anyhow::Context;
use cmantic::editor::Editor;
use cmantic::key::Key;
use cmantic::render::Renderer;
use cmantic::term::Term;
use std::path::PathBuf;
use std::time::Duration;

/// Input poll timeout; also the tick rate when idle
const POLL_INTERVAL: Duration = Duration::from_millis(33);

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let file = args.next().map(PathBuf::from);
    if args.next().is_some() {
        eprintln!("usage: cmantic [file]");
        std::process::exit(1);
    }

    match run(file) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("cmantic: {:#}", e);
            std::process::exit(1);
        }
    }
}

fn run(file: Option<PathBuf>) -> anyhow::Result<i32> {
    let mut editor = Editor::new(file.as_deref()).context("failed to open file")?;
    editor.load_default_colorscheme();

    // Terminal setup happens after loading so a load failure leaves the
    // terminal untouched.
    let mut term = Term::new().context("failed to initialize terminal")?;

    while !editor.should_quit {
        match term.poll_key(POLL_INTERVAL) {
            Ok(Some(Key::Resize(..))) | Ok(None) => {}
            Ok(Some(key)) => editor.handle_key(key),
            Err(e) => {
                log::error!("{}", e);
                break;
            }
        }

        editor.tick();

        let frame = editor.build_frame(&term);
        if let Err(e) = term.present(&frame) {
            log::error!("{}", e);
        }
    }

    Ok(editor.exit_code)
}
