use tracing_subscriber::{FmtSubscriber, EnvFilter};

mod error;
mod config;
mod input;
mod formatting;
mod notify;
mod state;
mod cli;

fn main() {
    use tokio::runtime::Builder;

    FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init()
        .expect("failed to initialize global tracing subscriber");

    let rt = match Builder::new_multi_thread()
        .enable_io()
        .enable_time()
        .build() {
        Ok(rt) => rt,
        Err(err) => {
            panic!("failed to start tokio runtime. {}", err);
        }
    };

    if let Err(err) = rt.block_on(cli::start()) {
        eprintln!("{}", err);

        std::process::exit(1);
    }
}
