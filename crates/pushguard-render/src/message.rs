use crate::{FileListing, RenderableReport, RenderableStatus, RenderableVerdict};

const DENIED_MARKER: &str = "✖";
const OTHER_MARKER: &str = "·";

pub fn render_message(report: &RenderableReport, listing: FileListing) -> String {
    let mut out = String::new();

    let status = match report.status {
        RenderableStatus::Ok => "OK",
        RenderableStatus::Ko => "KO",
    };
    out.push_str(&format!(
        "[{}] RECEIPT GENERATED {}\n\n",
        status, report.generated_at
    ));
    out.push_str(&format!(
        "*{} files matched protected paths*\n\n",
        report.denied_count
    ));
    out.push_str(&format!(
        "repository `{}` ref `{}`\n\n",
        report.repository, report.git_ref
    ));

    let mut listed = 0;
    for file in &report.files {
        let denied = file.verdict == RenderableVerdict::Denied;
        match listing {
            FileListing::DeniedOnly if denied => out.push_str(&format!("- {}\n", file.path)),
            FileListing::DeniedOnly => continue,
            FileListing::All => {
                let marker = if denied { DENIED_MARKER } else { OTHER_MARKER };
                out.push_str(&format!("{} {}\n", marker, file.path));
            }
        }
        listed += 1;
    }
    if listed > 0 {
        out.push('\n');
    }

    out.push_str(&format!(
        "pushed by {} <{}>\n",
        report.pusher_name, report.pusher_email
    ));
    out.push_str(&format!("_{}_\n", report.context));

    out
}
