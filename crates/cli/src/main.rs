use std::process::ExitCode;

fn main() -> ExitCode {
    washdesk_cli::run()
}
