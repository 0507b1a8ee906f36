pub mod file;
pub mod stdin;

use serde::de::DeserializeOwned;

/// Structured input from `--input <file>` or, failing that, piped stdin.
/// `None` means the caller should build the input from its flags.
pub fn load<T: DeserializeOwned>(path: Option<&str>) -> Result<Option<T>, Box<dyn std::error::Error>> {
    match path {
        Some(path) => file::read_input(path).map(Some),
        None => stdin::read_stdin(),
    }
}
