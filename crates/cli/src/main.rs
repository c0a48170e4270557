use std::process::ExitCode;

fn main() -> ExitCode {
    rentwise_cli::run()
}
