use anyhow::{Context as _, Result};
use siteterm::config::Config;
use siteterm::interpreter::{Interpreter, InterpreterLoader, LocalInterpreter};
use siteterm::renderer::{App, CpuRenderer};
use siteterm::session::Session;
use winit::event_loop::EventLoop;

fn main() -> Result<()> {
    env_logger::init();

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Failed to load config, using defaults: {}", e);
            Config::default()
        }
    };

    let interpreter_config = config.interpreter.clone();
    let media_config = config.media.clone();
    let loader = InterpreterLoader::spawn(move || {
        let interpreter = LocalInterpreter::from_config(&interpreter_config, &media_config)?;
        Ok(Box::new(interpreter) as Box<dyn Interpreter>)
    });

    let session = Session::new(&config, loader);

    let event_loop = EventLoop::new().context("Failed to create event loop")?;
    let mut app = App::<CpuRenderer>::new(session, config);

    log::info!("Running event loop...");
    event_loop.run_app(&mut app)?;

    Ok(())
}
