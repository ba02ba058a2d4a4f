//! Paths shared by the server's filter tree and the display client.

pub const DATA: &str = "data";
pub const TEMPERATURE: &str = "data/temp";

/// Reported by `/data/temp` until a sensor pushes its first reading.
pub const NO_READING: &str = "-1";

/// Base address of a page: its origin and path, without query or fragment.
pub fn page_base(origin: &str, pathname: &str) -> String {
    join(origin, pathname)
}

/// Joins `base` and `path` with exactly one `/` between them. Any query or fragment on
/// `base` is dropped.
pub fn join(base: &str, path: &str) -> String {
    let base = base.split(|c: char| c == '?' || c == '#').next().unwrap_or(base);
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
