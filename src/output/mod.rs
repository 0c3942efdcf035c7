mod exports;
mod progress;
mod styling;
mod tables;

pub use exports::export_listing;
pub use progress::PhaseProgress;
pub use styling::{dim, magenta_bold};

/// Prints the mergedlistr banner to stderr.
pub fn print_banner() {
    eprintln!(
        r"
{} {}
  {}
",
        magenta_bold("🔀 mergedlistr"),
        dim(env!("CARGO_PKG_VERSION")),
        dim("Merged GitLab merge requests by project")
    );
}
