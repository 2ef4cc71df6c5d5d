mod app;

use anyhow::Result;
use app::App;
use app::core::AppConfig;
use clap::Parser;

fn main() -> Result<()> {
    init_tracing();

    let config = AppConfig::from(app::core::Args::parse());
    let mut app = App::load(config)?;
    app.run()
}

fn init_tracing() {
    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .finish();

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("tracing subscriber already set");
    }
}
