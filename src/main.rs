//! atomgit-code: browse and edit AtomGit repositories from the terminal.

use std::process::ExitCode;

fn main() -> ExitCode {
    match atomgit_code_api::cli::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            atomgit_code_api::ui::output::error(format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}
