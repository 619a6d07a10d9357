//! `glimpse [options.toml]`: open the viewer window.
//!
//! F2 saves a screenshot, F3 starts and stops GIF recording, Escape quits.
//! Set `RUST_LOG=info` to see where files are written.

use std::path::Path;

use glimpse::{options::Options, Viewer};

fn main() {
    env_logger::init();

    let options = match std::env::args().nth(1) {
        Some(path) => match Options::load(Path::new(&path)) {
            Ok(options) => options,
            Err(e) => {
                log::error!("failed to load options from {path}: {e}");
                std::process::exit(1);
            }
        },
        None => Options::default(),
    };

    if let Err(e) = Viewer::builder().with_options(options).build().run() {
        log::error!("{e}");
        std::process::exit(1);
    }
}
