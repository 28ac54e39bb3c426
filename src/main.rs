pub mod cli;
pub mod codegen;
pub mod error;
pub mod interpret;
pub mod model;
pub mod path_de;
pub mod process;
pub mod reflect;
pub mod resolve;
pub mod schema;
pub mod simplify;

use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let command_line_interface = cli::CommandLineInterface::load();
    command_line_interface.run()
}
