//! README generated from the plan when no README file is configured

use super::plan::TaskPlan;
use super::profile::ProjectProfile;
use std::fmt::Write;

pub fn render_readme(profile: &ProjectProfile, plan: &TaskPlan) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# {}\n", profile.repo.name);

    if !profile.description.is_empty() {
        let _ = writeln!(out, "## Project Description\n\n{}\n", profile.description);
    }

    let _ = writeln!(out, "## Project Timeline and Tasks\n");
    if plan.milestones.is_empty() {
        let _ = writeln!(out, "No milestones planned yet.");
    }
    for milestone in &plan.milestones {
        match milestone.due_on {
            Some(due) => {
                let _ = writeln!(out, "### {} (due {})\n", milestone.title, due.format("%Y-%m-%d"));
            }
            None => {
                let _ = writeln!(out, "### {}\n", milestone.title);
            }
        }
        if !milestone.description.is_empty() {
            let _ = writeln!(out, "{}\n", milestone.description);
        }
        for task in &milestone.tasks {
            let _ = writeln!(out, "- {}", task.title);
        }
        out.push('\n');
    }

    let _ = writeln!(
        out,
        "Progress is tracked on the **{}** project board.",
        profile.project_title
    );
    out
}
