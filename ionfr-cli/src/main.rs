use env_logger::{Builder, Target};
use log::info;

use ionfr::prelude::{predict, Ionex};

mod cli;
use cli::{Cli, CliError};

fn main() -> Result<(), CliError> {
    let mut builder = Builder::from_default_env();
    builder
        .target(Target::Stdout)
        .format_timestamp_secs()
        .format_module_path(false)
        .init();

    let cli = Cli::new();
    let cfg = cli.config()?;
    let request = cli.observation_request()?;

    let observer = &request.observer;
    info!(
        "observer: {} ({:.6}°, {:.6}°)",
        observer,
        observer.latitude_ddeg(),
        observer.longitude_ddeg()
    );
    info!(
        "source: ra={:.6}h dec={:.6}°",
        request.source.ra_hours(),
        request.source.dec_ddeg()
    );
    info!("day: {}", request.day);

    let fp = cli.ionex_filepath();
    info!("reading {}", fp.display());

    let ionex = if fp.extension().map_or(false, |ext| ext == "gz") {
        Ionex::from_gzip_file(&fp)?
    } else {
        Ionex::from_file(&fp)?
    };

    info!("ionosphere shell height: {} km", ionex.shell_height_km());

    let table = predict(request, &ionex, &cfg)?;
    table.to_csv_path(&cfg.output)?;

    info!(
        "{} hourly prediction(s) written to \"{}\"",
        table.len(),
        cfg.output.display()
    );
    Ok(())
}
