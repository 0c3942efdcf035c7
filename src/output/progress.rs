use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

use super::styling::{bright, bright_green, bright_yellow};

/// Spinner tracking the three discovery phases on stderr.
pub struct PhaseProgress {
    pb: ProgressBar,
    visible: bool,
}

impl PhaseProgress {
    pub fn start_phase_1(visible: bool, group_count: usize) -> Self {
        if visible {
            eprintln!("{}  {}", bright("⚙️"), bright("Phases").underlined());
        }
        let pb = create_spinner(
            visible,
            bright_yellow(format!("Phase 1/3: Resolving {group_count} watched groups")).to_string(),
        );
        Self { pb, visible }
    }

    pub fn finish_phase_1_start_phase_2(self, group_count: usize) -> Self {
        self.pb.finish_with_message(
            bright_green(format!("Phase 1/3: Resolved {group_count} groups ✓")).to_string(),
        );
        let pb = create_spinner(
            self.visible,
            bright_yellow("Phase 2/3: Listing group projects").to_string(),
        );
        Self { pb, visible: self.visible }
    }

    pub fn finish_phase_2_start_phase_3(self, project_count: usize) -> Self {
        self.pb.finish_with_message(
            bright_green(format!("Phase 2/3: Found {project_count} projects ✓")).to_string(),
        );
        let pb = create_spinner(
            self.visible,
            bright_yellow("Phase 3/3: Fetching merged requests").to_string(),
        );
        Self { pb, visible: self.visible }
    }

    pub fn finish_phase_3(self, merge_request_count: usize) {
        self.pb.finish_with_message(
            bright_green(format!(
                "Phase 3/3: Listed {merge_request_count} merged requests ✓"
            ))
            .to_string(),
        );
        if self.visible {
            eprintln!();
        }
    }
}

fn create_spinner(visible: bool, message: String) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if !visible {
        pb.set_draw_target(ProgressDrawTarget::hidden());
        return pb;
    }
    pb.set_draw_target(ProgressDrawTarget::stderr());
    if let Ok(style) = ProgressStyle::default_spinner().template("  {msg} {spinner}") {
        pb.set_style(style);
    }
    pb.set_message(message);
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}
