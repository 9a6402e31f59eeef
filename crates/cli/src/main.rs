use std::process::ExitCode;

fn main() -> ExitCode {
    prodrec_cli::run()
}
