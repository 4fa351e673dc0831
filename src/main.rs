//! Binary entrypoint: trains the toy MLP with settings from the environment.

use env_logger::Env;
use log::info;

use nodegrad::config::from_env;
use nodegrad::train;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = from_env()?;
    info!("config: {config:?}");

    let report = train::run(&config)?;
    if let Some(loss) = report.final_loss() {
        info!("final loss: {loss:.6}");
    }
    for (example, prediction) in train::toy_dataset().iter().zip(&report.predictions) {
        println!("target {:5.2} | prediction {:8.5}", example.target, prediction);
    }
    Ok(())
}
